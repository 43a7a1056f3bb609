// programs/energy_optimizer/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::state::{AnalysisRun, Config, ParticipantRegistry, RequestRecord, RunRegistry};

// ----------------------------
// Admin
// ----------------------------

#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [crate::CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, Config>,

    /// SPL mint refunds are paid in
    pub refund_mint: Account<'info, Mint>,

    /// Refund vault = TokenAccount PDA controlled by the program (authority = config PDA)
    #[account(
        init,
        payer = admin,
        seeds = [crate::REFUND_VAULT_SEED],
        bump,
        token::mint = refund_mint,
        token::authority = config
    )]
    pub refund_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct InitializeRegistries<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + RunRegistry::INIT_SPACE,
        seeds = [crate::RUN_REGISTRY_SEED, config.key().as_ref()],
        bump
    )]
    pub run_registry: Account<'info, RunRegistry>,

    #[account(
        init,
        payer = admin,
        space = 8 + ParticipantRegistry::INIT_SPACE,
        seeds = [crate::PARTICIPANTS_SEED, config.key().as_ref()],
        bump
    )]
    pub participant_registry: Account<'info, ParticipantRegistry>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct FundRefundVault<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(address = config.refund_mint)]
    pub refund_mint: Account<'info, Mint>,

    #[account(mut, address = config.refund_vault)]
    pub refund_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub funder: Signer<'info>,

    #[account(
        mut,
        constraint = funder_token_account.mint == refund_mint.key(),
        constraint = funder_token_account.owner == funder.key()
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

// ----------------------------
// Participant registry
// ----------------------------

#[derive(Accounts)]
pub struct RegisterDevice<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::PARTICIPANTS_SEED, config.key().as_ref()],
        bump = participant_registry.bump
    )]
    pub participant_registry: Account<'info, ParticipantRegistry>,

    pub owner: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetDeviceActive<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::PARTICIPANTS_SEED, config.key().as_ref()],
        bump = participant_registry.bump
    )]
    pub participant_registry: Account<'info, ParticipantRegistry>,

    /// Device owner or config admin
    pub authority: Signer<'info>,
}

// ----------------------------
// Analysis runs
// ----------------------------

#[derive(Accounts)]
pub struct StartRun<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::RUN_REGISTRY_SEED, config.key().as_ref()],
        bump = run_registry.bump
    )]
    pub run_registry: Account<'info, RunRegistry>,

    #[account(
        seeds = [crate::PARTICIPANTS_SEED, config.key().as_ref()],
        bump = participant_registry.bump
    )]
    pub participant_registry: Account<'info, ParticipantRegistry>,

    #[account(
        init,
        payer = payer,
        space = 8 + AnalysisRun::INIT_SPACE,
        seeds = [crate::RUN_SEED, run_registry.next_run_id.to_le_bytes().as_ref()],
        bump
    )]
    pub run: Account<'info, AnalysisRun>,

    // `init` fails if the request id was ever registered before
    #[account(
        init,
        payer = payer,
        space = 8 + RequestRecord::INIT_SPACE,
        seeds = [crate::REQUEST_SEED, config.next_request_id.to_le_bytes().as_ref()],
        bump
    )]
    pub request_record: Account<'info, RequestRecord>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(run_id: u64)]
pub struct GetStatus<'info> {
    #[account(
        seeds = [crate::RUN_SEED, run_id.to_le_bytes().as_ref()],
        bump = run.bump
    )]
    pub run: Account<'info, AnalysisRun>,
}

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct DeliverCallback<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [crate::REQUEST_SEED, request_id.to_le_bytes().as_ref()],
        bump = request_record.bump
    )]
    pub request_record: Account<'info, RequestRecord>,

    #[account(
        mut,
        seeds = [crate::RUN_SEED, request_record.run_id.to_le_bytes().as_ref()],
        bump = run.bump
    )]
    pub run: Account<'info, AnalysisRun>,

    /// CHECK: instruction sysvar (for ed25519 introspection). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(run_id: u64)]
pub struct CheckTimeout<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::RUN_SEED, run_id.to_le_bytes().as_ref()],
        bump = run.bump
    )]
    pub run: Account<'info, AnalysisRun>,

    /// CHECK: refund ledger PDA. Address enforced by seeds; the handler creates
    /// the account only when this call moves the run to Failed.
    #[account(
        mut,
        seeds = [crate::REFUND_SEED, run_id.to_le_bytes().as_ref()],
        bump
    )]
    pub refund_ledger: UncheckedAccount<'info>,

    #[account(mut)]
    pub cranker: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(run_id: u64)]
pub struct ClaimRefund<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [crate::RUN_SEED, run_id.to_le_bytes().as_ref()],
        bump = run.bump
    )]
    pub run: Account<'info, AnalysisRun>,

    /// CHECK: refund ledger PDA. Exists only once the run has failed; the handler
    /// checks the run status first, then loads it as `Account<RefundLedger>`.
    #[account(
        mut,
        seeds = [crate::REFUND_SEED, run_id.to_le_bytes().as_ref()],
        bump
    )]
    pub refund_ledger: UncheckedAccount<'info>,

    #[account(address = config.refund_mint)]
    pub refund_mint: Account<'info, Mint>,

    #[account(mut, address = config.refund_vault)]
    pub refund_vault: Account<'info, TokenAccount>,

    pub participant: Signer<'info>,

    #[account(
        mut,
        constraint = participant_token_account.mint == refund_mint.key(),
        constraint = participant_token_account.owner == participant.key()
    )]
    pub participant_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
