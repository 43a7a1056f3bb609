use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;
pub mod contexts;
pub mod constants;

pub use utils::*;
pub use instructions::*;
pub use state::*;
pub use errors::*;
pub use contexts::*;
pub use constants::*;

use solana_security_txt::security_txt;

security_txt! {
    // Required fields
    name: "Energy Optimizer",
    project_url: "https://github.com/energy-optimizer/energy-optimizer",
    contacts: "link:https://github.com/energy-optimizer/energy-optimizer/issues",
    policy: "https://github.com/energy-optimizer/energy-optimizer/blob/main/SECURITY.md",

    // Optional fields
    preferred_languages: "en",
    source_code: "https://github.com/energy-optimizer/energy-optimizer"
}

declare_id!("GeA3JqAjAWBCoW3JVDbdTjEoxfUaSgtHuxiAeGG5PrUP");

#[program]
pub mod energy_optimizer {
    use super::*;
    use crate::instructions::{admin, analysis, lifecycle, oracle, participants, refund};

    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        decryption_timeout_slots: Option<u64>,
        refund_pool_amount: Option<u64>,
        min_run_interval_slots: Option<u64>,
    ) -> Result<()> {
        admin::initialize_config(
            ctx,
            decryption_timeout_slots,
            refund_pool_amount,
            min_run_interval_slots,
        )
    }

    pub fn initialize_registries(ctx: Context<InitializeRegistries>) -> Result<()> {
        admin::initialize_registries(ctx)
    }

    pub fn set_oracle_pubkey(ctx: Context<UpdateConfig>, oracle_pubkey: Pubkey) -> Result<()> {
        admin::set_oracle_pubkey(ctx, oracle_pubkey)
    }

    pub fn set_pause(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
        admin::set_pause(ctx, paused)
    }

    pub fn update_run_policy(
        ctx: Context<UpdateConfig>,
        decryption_timeout_slots: u64,
        refund_pool_amount: u64,
        min_run_interval_slots: u64,
    ) -> Result<()> {
        admin::update_run_policy(
            ctx,
            decryption_timeout_slots,
            refund_pool_amount,
            min_run_interval_slots,
        )
    }

    pub fn fund_refund_vault(ctx: Context<FundRefundVault>, amount: u64) -> Result<()> {
        admin::fund_refund_vault(ctx, amount)
    }

    // ----------------------------
    // Participant registry
    // ----------------------------
    pub fn register_device(ctx: Context<RegisterDevice>) -> Result<()> {
        participants::register_device(ctx)
    }

    pub fn set_device_active(
        ctx: Context<SetDeviceActive>,
        device: Pubkey,
        active: bool,
    ) -> Result<()> {
        participants::set_device_active(ctx, device, active)
    }

    // ----------------------------
    // Analysis runs
    // ----------------------------
    pub fn start_run(ctx: Context<StartRun>, ciphertext_handles: Vec<[u8; 32]>) -> Result<u64> {
        analysis::start_run(ctx, ciphertext_handles)
    }

    pub fn get_status(ctx: Context<GetStatus>, run_id: u64) -> Result<RunStatusView> {
        analysis::get_status(ctx, run_id)
    }

    /// Oracle callback. Must be preceded by an ed25519 verify instruction
    /// signed by the configured oracle key.
    pub fn deliver_callback(
        ctx: Context<DeliverCallback>,
        request_id: u64,
        cleartexts: Vec<u8>,
        proof: [u8; 64],
    ) -> Result<()> {
        oracle::deliver_callback(ctx, request_id, cleartexts, proof)
    }

    pub fn check_timeout(ctx: Context<CheckTimeout>, run_id: u64) -> Result<bool> {
        lifecycle::check_timeout(ctx, run_id)
    }

    pub fn claim_refund(ctx: Context<ClaimRefund>, run_id: u64) -> Result<u64> {
        refund::claim_refund(ctx, run_id)
    }
}
