use anchor_lang::prelude::*;

use crate::state::AnalysisResult;

#[event]
pub struct ConfigUpdated {
    pub admin: Pubkey,
    pub decryption_timeout_slots: u64,
    pub refund_pool_amount: u64,
    pub min_run_interval_slots: u64,
    pub paused: bool,
}

#[event]
pub struct DeviceRegistered {
    pub owner: Pubkey,
    pub slot: u64,
    pub registered_count: u64,
}

#[event]
pub struct DeviceStatusChanged {
    pub owner: Pubkey,
    pub active: bool,
    pub slot: u64,
}

/// Consumed by the oracle network: decrypt `handles` and answer through
/// the instruction identified by `callback_selector`.
#[event]
pub struct DecryptionRequested {
    pub request_id: u64,
    pub run_id: u64,
    pub handles: Vec<[u8; 32]>,
    pub payload_digest: [u8; 32],
    pub callback_selector: Vec<u8>,
}

#[event]
pub struct RunStarted {
    pub run_id: u64,
    pub oracle_request_id: u64,
    pub participant_count: u64,
    pub decryption_requested_slot: u64,
    pub deadline_slot: u64,
}

#[event]
pub struct RunCompleted {
    pub run_id: u64,
    pub participants: Vec<Pubkey>,
    pub result: AnalysisResult,
}

#[event]
pub struct RunFailed {
    pub run_id: u64,
    pub failed_slot: u64,
    pub per_participant_amount: u64,
    pub remainder: u64,
}

#[event]
pub struct RefundClaimed {
    pub run_id: u64,
    pub participant: Pubkey,
    pub amount: u64,
    pub claimed_count: u64,
}
