use anchor_lang::prelude::*;

use crate::{
    events::RunFailed, state::RefundLedger, utils::create_pda_account, CheckTimeout, REFUND_SEED,
};

/// Permissionless watchdog. Returns `true` only for the call that failed the run.
/// The refund ledger account exists only for failed runs.
pub fn check_timeout(ctx: Context<CheckTimeout>, run_id: u64) -> Result<bool> {
    let cfg = &ctx.accounts.config;
    let run = &mut ctx.accounts.run;
    let current_slot = Clock::get()?.slot;

    if !run.try_fail(current_slot)? {
        return Ok(false);
    }

    let bump = ctx.bumps.refund_ledger;
    let mut ledger = RefundLedger::default();
    ledger.declare(run, cfg.refund_pool_amount, bump, current_slot)?;

    let ledger_info = ctx.accounts.refund_ledger.to_account_info();
    let run_le = run_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[REFUND_SEED, &run_le, &[bump]];

    create_pda_account(
        &ledger_info,
        &ctx.accounts.cranker.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        8 + RefundLedger::INIT_SPACE,
        ctx.program_id,
        signer_seeds,
    )?;

    {
        let mut data = ledger_info.try_borrow_mut_data()?;
        ledger.try_serialize(&mut &mut data[..])?;
    }

    msg!(
        "run {} timed out at slot {} (deadline {})",
        run_id,
        current_slot,
        run.deadline_slot()?
    );
    emit!(RunFailed {
        run_id,
        failed_slot: current_slot,
        per_participant_amount: ledger.per_participant_amount,
        remainder: ledger.remainder,
    });

    Ok(true)
}
