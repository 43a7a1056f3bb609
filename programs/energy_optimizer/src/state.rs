use anchor_lang::prelude::*;

use crate::constants::{
    CLEARTEXT_LEN, MAX_DECRYPTION_TIMEOUT_SLOTS, MAX_PARTICIPANTS, MIN_DECRYPTION_TIMEOUT_SLOTS,
};
use crate::errors::OptimizerError;

// `#[max_len]` takes a literal: every participant-sized Vec below uses 32.
const _: () = assert!(MAX_PARTICIPANTS == 32);

#[account]
#[derive(InitSpace, Default)]
pub struct Config {
    pub admin: Pubkey,
    pub bump: u8,

    // oracle key whose ed25519 signature authenticates decryption callbacks
    pub oracle_pubkey: Pubkey,

    pub paused: bool,
    pub version: u16,

    // run policy
    pub decryption_timeout_slots: u64,
    pub refund_pool_amount: u64,
    pub min_run_interval_slots: u64,

    // oracle client: request ids handed out by `request_decryption`
    pub next_request_id: u64,

    // refund SPL vault (authority = config PDA)
    pub refund_mint: Pubkey,
    pub refund_vault: Pubkey,
    pub refund_vault_bump: u8,
}

impl Config {
    pub fn apply_run_policy(
        &mut self,
        decryption_timeout_slots: u64,
        refund_pool_amount: u64,
        min_run_interval_slots: u64,
    ) -> Result<()> {
        require!(
            (MIN_DECRYPTION_TIMEOUT_SLOTS..=MAX_DECRYPTION_TIMEOUT_SLOTS)
                .contains(&decryption_timeout_slots),
            OptimizerError::InvalidTimeout
        );
        require!(refund_pool_amount > 0, OptimizerError::InvalidRefundPool);

        self.decryption_timeout_slots = decryption_timeout_slots;
        self.refund_pool_amount = refund_pool_amount;
        self.min_run_interval_slots = min_run_interval_slots;
        Ok(())
    }

    /// Oracle client side: hands out the id the callback will be correlated by.
    pub fn allocate_request_id(&mut self) -> Result<u64> {
        let request_id = self.next_request_id;
        self.next_request_id = request_id
            .checked_add(1)
            .ok_or(OptimizerError::MathOverflow)?;
        Ok(request_id)
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct RunRegistry {
    pub admin: Pubkey,
    pub bump: u8,
    pub next_run_id: u64,
    pub last_run_slot: u64,
    pub total_runs: u64,
    pub version: u16,
}

impl RunRegistry {
    /// The "valid window" predicate gating `start_run`.
    pub fn window_open(&self, current_slot: u64, min_interval_slots: u64) -> bool {
        self.total_runs == 0 || current_slot >= self.last_run_slot.saturating_add(min_interval_slots)
    }

    pub fn allocate_run_id(&mut self, current_slot: u64) -> Result<u64> {
        let run_id = self.next_run_id;
        self.next_run_id = run_id.checked_add(1).ok_or(OptimizerError::MathOverflow)?;
        self.total_runs = self
            .total_runs
            .checked_add(1)
            .ok_or(OptimizerError::MathOverflow)?;
        self.last_run_slot = current_slot;
        Ok(run_id)
    }
}

// ----------------------------
// Participant registry
// ----------------------------

#[derive(InitSpace, AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeviceEntry {
    pub owner: Pubkey,
    pub active: bool,
    pub registered_slot: u64,
    pub updated_slot: u64,
}

#[account]
#[derive(InitSpace, Default)]
pub struct ParticipantRegistry {
    pub bump: u8,

    /// Fixed max_len (= MAX_PARTICIPANTS) to keep account size deterministic.
    #[max_len(32)]
    pub devices: Vec<DeviceEntry>,

    pub version: u16,
}

impl ParticipantRegistry {
    /// Once the registry is full, a new device takes over the first
    /// deactivated entry. Runs already started keep their own snapshot.
    pub fn register(&mut self, owner: Pubkey, current_slot: u64) -> Result<()> {
        require!(
            !self.devices.iter().any(|d| d.owner == owner),
            OptimizerError::DeviceAlreadyRegistered
        );

        let entry = DeviceEntry {
            owner,
            active: true,
            registered_slot: current_slot,
            updated_slot: current_slot,
        };

        if self.devices.len() < MAX_PARTICIPANTS {
            self.devices.push(entry);
            return Ok(());
        }

        let slot = self
            .devices
            .iter_mut()
            .find(|d| !d.active)
            .ok_or(OptimizerError::RegistryFull)?;
        *slot = entry;
        Ok(())
    }

    pub fn set_active(&mut self, owner: &Pubkey, active: bool, current_slot: u64) -> Result<()> {
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.owner == *owner)
            .ok_or(OptimizerError::DeviceNotFound)?;
        device.active = active;
        device.updated_slot = current_slot;
        Ok(())
    }

    /// Copies the currently-active owners by value, in registration order.
    pub fn snapshot(&self) -> Vec<Pubkey> {
        self.devices
            .iter()
            .filter(|d| d.active)
            .map(|d| d.owner)
            .collect()
    }
}

// ----------------------------
// Analysis runs
// ----------------------------

#[derive(InitSpace, AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RunStatus {
    #[default]
    Pending,
    DecryptionRequested,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

#[derive(InitSpace, AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct AnalysisResult {
    pub target_consumption: u64,
    pub savings_bps: u64,
}

impl AnalysisResult {
    /// Fixed schema: two little-endian u64, nothing else.
    pub fn decode(cleartexts: &[u8]) -> Result<Self> {
        require!(
            cleartexts.len() == CLEARTEXT_LEN,
            OptimizerError::InvalidCleartextLength
        );

        let mut target = [0u8; 8];
        let mut savings = [0u8; 8];
        target.copy_from_slice(&cleartexts[0..8]);
        savings.copy_from_slice(&cleartexts[8..16]);

        Ok(Self {
            target_consumption: u64::from_le_bytes(target),
            savings_bps: u64::from_le_bytes(savings),
        })
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct AnalysisRun {
    pub run_id: u64,
    pub bump: u8,
    pub status: RunStatus,

    pub created_slot: u64,
    pub decryption_requested_slot: u64,
    // captured from config at creation
    pub timeout_slots: u64,

    pub oracle_request_id: u64,
    pub payload_digest: [u8; 32],

    /// Immutable snapshot of the active participants at creation.
    #[max_len(32)]
    pub participants: Vec<Pubkey>,

    pub result: Option<AnalysisResult>,
    pub completed_slot: u64,
    pub failed_slot: u64,
}

impl AnalysisRun {
    pub fn open(
        &mut self,
        run_id: u64,
        bump: u8,
        participants: Vec<Pubkey>,
        timeout_slots: u64,
        current_slot: u64,
    ) -> Result<()> {
        require!(!participants.is_empty(), OptimizerError::NoActiveParticipants);
        require!(
            participants.len() <= MAX_PARTICIPANTS,
            OptimizerError::RegistryFull
        );

        self.run_id = run_id;
        self.bump = bump;
        self.status = RunStatus::Pending;
        self.created_slot = current_slot;
        self.decryption_requested_slot = 0;
        self.timeout_slots = timeout_slots;
        self.oracle_request_id = 0;
        self.payload_digest = [0u8; 32];
        self.participants = participants;
        self.result = None;
        self.completed_slot = 0;
        self.failed_slot = 0;
        Ok(())
    }

    pub fn mark_decryption_requested(
        &mut self,
        oracle_request_id: u64,
        payload_digest: [u8; 32],
        current_slot: u64,
    ) -> Result<()> {
        require!(
            self.status == RunStatus::Pending,
            OptimizerError::InvalidRunStatus
        );

        self.oracle_request_id = oracle_request_id;
        self.payload_digest = payload_digest;
        self.decryption_requested_slot = current_slot;
        self.status = RunStatus::DecryptionRequested;
        Ok(())
    }

    pub fn deadline_slot(&self) -> Result<u64> {
        let deadline = self
            .decryption_requested_slot
            .checked_add(self.timeout_slots)
            .ok_or(OptimizerError::MathOverflow)?;
        Ok(deadline)
    }

    pub fn timeout_elapsed(&self, current_slot: u64) -> Result<bool> {
        Ok(current_slot >= self.deadline_slot()?)
    }

    /// Callback path. Only the first resolution of a run is accepted.
    pub fn complete(&mut self, result: AnalysisResult, current_slot: u64) -> Result<()> {
        require!(
            self.status == RunStatus::DecryptionRequested,
            OptimizerError::RunNotAwaitingDecryption
        );

        self.result = Some(result);
        self.completed_slot = current_slot;
        self.status = RunStatus::Completed;
        Ok(())
    }

    /// Watchdog path. `Ok(false)` when the run is already terminal or the
    /// deadline has not been reached; `Ok(true)` when this call failed it.
    pub fn try_fail(&mut self, current_slot: u64) -> Result<bool> {
        if self.status.is_terminal() {
            return Ok(false);
        }
        require!(
            self.status == RunStatus::DecryptionRequested,
            OptimizerError::InvalidRunStatus
        );

        if !self.timeout_elapsed(current_slot)? {
            return Ok(false);
        }

        self.failed_slot = current_slot;
        self.status = RunStatus::Failed;
        Ok(true)
    }

    pub fn is_participant(&self, key: &Pubkey) -> bool {
        self.participants.contains(key)
    }

    pub fn status_view(&self) -> Result<RunStatusView> {
        Ok(RunStatusView {
            run_id: self.run_id,
            status: self.status,
            oracle_request_id: self.oracle_request_id,
            participant_count: self.participants.len() as u64,
            decryption_requested_slot: self.decryption_requested_slot,
            deadline_slot: self.deadline_slot()?,
        })
    }
}

/// Returned by `get_status`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct RunStatusView {
    pub run_id: u64,
    pub status: RunStatus,
    pub oracle_request_id: u64,
    pub participant_count: u64,
    pub decryption_requested_slot: u64,
    pub deadline_slot: u64,
}

// ----------------------------
// Request registry
// ----------------------------

#[account]
#[derive(InitSpace, Default)]
pub struct RequestRecord {
    pub request_id: u64,
    pub run_id: u64,
    pub bump: u8,
    pub bound: bool,
    pub registered_slot: u64,
}

impl RequestRecord {
    pub fn bind(&mut self, request_id: u64, run_id: u64, bump: u8, current_slot: u64) -> Result<()> {
        require!(!self.bound, OptimizerError::DuplicateRequestId);

        self.request_id = request_id;
        self.run_id = run_id;
        self.bump = bump;
        self.bound = true;
        self.registered_slot = current_slot;
        Ok(())
    }

    pub fn resolve(&self, request_id: u64) -> Result<u64> {
        require!(
            self.bound && self.request_id == request_id,
            OptimizerError::RequestIdMismatch
        );
        Ok(self.run_id)
    }
}

// ----------------------------
// Refund ledger
// ----------------------------

#[account]
#[derive(InitSpace, Default)]
pub struct RefundLedger {
    pub run_id: u64,
    pub bump: u8,
    pub declared: bool,
    pub declared_slot: u64,

    pub pool_amount: u64,
    pub participant_count: u64,
    pub per_participant_amount: u64,
    // retained by the vault, never paid out
    pub remainder: u64,

    #[max_len(32)]
    pub claimed_by: Vec<Pubkey>,
    pub claimed_total: u64,
}

/// Even split of `pool` across `participant_count`, truncating.
/// Returns `(per_participant, remainder)`.
pub fn split_refund(pool: u64, participant_count: usize) -> Result<(u64, u64)> {
    let n = participant_count as u64;
    let per = pool.checked_div(n).ok_or(OptimizerError::NoActiveParticipants)?;
    let remainder = pool.checked_rem(n).ok_or(OptimizerError::NoActiveParticipants)?;
    Ok((per, remainder))
}

impl RefundLedger {
    pub fn declare(
        &mut self,
        run: &AnalysisRun,
        pool_amount: u64,
        bump: u8,
        current_slot: u64,
    ) -> Result<()> {
        require!(!self.declared, OptimizerError::RefundAlreadyDeclared);
        require!(run.status == RunStatus::Failed, OptimizerError::RunNotFailed);

        let (per, remainder) = split_refund(pool_amount, run.participants.len())?;

        self.run_id = run.run_id;
        self.bump = bump;
        self.declared = true;
        self.declared_slot = current_slot;
        self.pool_amount = pool_amount;
        self.participant_count = run.participants.len() as u64;
        self.per_participant_amount = per;
        self.remainder = remainder;
        self.claimed_by = Vec::new();
        self.claimed_total = 0;
        Ok(())
    }

    pub fn has_claimed(&self, key: &Pubkey) -> bool {
        self.claimed_by.contains(key)
    }

    /// Consumes `claimant`'s share and returns the amount owed.
    /// Must run before the token transfer.
    pub fn record_claim(&mut self, run: &AnalysisRun, claimant: Pubkey) -> Result<u64> {
        require!(self.declared, OptimizerError::RunNotFailed);
        require!(self.run_id == run.run_id, OptimizerError::RunIdMismatch);
        require!(run.is_participant(&claimant), OptimizerError::NotAParticipant);
        require!(!self.has_claimed(&claimant), OptimizerError::AlreadyClaimed);

        self.claimed_by.push(claimant);
        self.claimed_total = self
            .claimed_total
            .checked_add(self.per_participant_amount)
            .ok_or(OptimizerError::MathOverflow)?;

        Ok(self.per_participant_amount)
    }
}
