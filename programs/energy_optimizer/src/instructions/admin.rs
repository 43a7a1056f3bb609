use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::*;
use crate::errors::OptimizerError;
use crate::events::ConfigUpdated;
use crate::state::Config;
use crate::{FundRefundVault, InitializeConfig, InitializeRegistries, UpdateConfig};

/// `None` picks the protocol default for that parameter.
pub fn initialize_config(
    ctx: Context<InitializeConfig>,
    decryption_timeout_slots: Option<u64>,
    refund_pool_amount: Option<u64>,
    min_run_interval_slots: Option<u64>,
) -> Result<()> {
    let cfg: &mut Account<Config> = &mut ctx.accounts.config;

    cfg.admin = ctx.accounts.admin.key();
    cfg.bump = ctx.bumps.config;

    cfg.apply_run_policy(
        decryption_timeout_slots.unwrap_or(DEFAULT_DECRYPTION_TIMEOUT_SLOTS),
        refund_pool_amount.unwrap_or(DEFAULT_REFUND_POOL_AMOUNT),
        min_run_interval_slots.unwrap_or(DEFAULT_MIN_RUN_INTERVAL_SLOTS),
    )?;

    // oracle must be set explicitly before callbacks are accepted
    cfg.oracle_pubkey = Pubkey::default();
    cfg.paused = false;
    cfg.next_request_id = INITIAL_REQUEST_ID;
    cfg.version = INITIAL_VERSION;

    cfg.refund_mint = ctx.accounts.refund_mint.key();
    cfg.refund_vault = ctx.accounts.refund_vault.key();
    cfg.refund_vault_bump = ctx.bumps.refund_vault;

    emit_config(cfg);
    Ok(())
}

pub fn initialize_registries(ctx: Context<InitializeRegistries>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), OptimizerError::Unauthorized);

    let rr = &mut ctx.accounts.run_registry;
    rr.admin = cfg.admin;
    rr.bump = ctx.bumps.run_registry;
    rr.next_run_id = INITIAL_RUN_ID;
    rr.last_run_slot = 0;
    rr.total_runs = 0;
    rr.version = INITIAL_VERSION;

    let pr = &mut ctx.accounts.participant_registry;
    pr.bump = ctx.bumps.participant_registry;
    pr.devices = Vec::new();
    pr.version = INITIAL_VERSION;

    Ok(())
}

pub fn set_oracle_pubkey(ctx: Context<UpdateConfig>, oracle_pubkey: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), OptimizerError::Unauthorized);

    cfg.oracle_pubkey = oracle_pubkey;
    msg!("oracle pubkey set to {}", oracle_pubkey);
    Ok(())
}

pub fn set_pause(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), OptimizerError::Unauthorized);

    cfg.paused = paused;
    emit_config(cfg);
    Ok(())
}

/// Applies to runs started afterwards; open runs keep the timeout they were created with.
pub fn update_run_policy(
    ctx: Context<UpdateConfig>,
    decryption_timeout_slots: u64,
    refund_pool_amount: u64,
    min_run_interval_slots: u64,
) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), OptimizerError::Unauthorized);

    cfg.apply_run_policy(
        decryption_timeout_slots,
        refund_pool_amount,
        min_run_interval_slots,
    )?;

    emit_config(cfg);
    Ok(())
}

/// Anyone may top up the refund vault.
pub fn fund_refund_vault(ctx: Context<FundRefundVault>, amount: u64) -> Result<()> {
    require!(amount > 0, OptimizerError::InvalidAmount);

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder_token_account.to_account_info(),
                to: ctx.accounts.refund_vault.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    msg!("refund vault funded with {}", amount);
    Ok(())
}

fn emit_config(cfg: &Config) {
    emit!(ConfigUpdated {
        admin: cfg.admin,
        decryption_timeout_slots: cfg.decryption_timeout_slots,
        refund_pool_amount: cfg.refund_pool_amount,
        min_run_interval_slots: cfg.min_run_interval_slots,
        paused: cfg.paused,
    });
}
