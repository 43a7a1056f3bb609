use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{
    errors::OptimizerError,
    events::RefundClaimed,
    state::{RefundLedger, RunStatus},
    ClaimRefund,
};

pub fn claim_refund(ctx: Context<ClaimRefund>, run_id: u64) -> Result<u64> {
    let cfg = &ctx.accounts.config;
    let run = &ctx.accounts.run;

    // no ledger account exists before the run fails
    require!(run.status == RunStatus::Failed, OptimizerError::RunNotFailed);

    let ledger_info: &AccountInfo = Box::leak(Box::new(ctx.accounts.refund_ledger.to_account_info()));
    let mut ledger: Account<RefundLedger> = Account::try_from(ledger_info)?;

    let participant = ctx.accounts.participant.key();
    let amount = ledger.record_claim(run, participant)?;
    let claimed_count = ledger.claimed_by.len() as u64;

    // persist the claim before paying; a failed transfer reverts both
    ledger.exit(ctx.program_id)?;

    require!(
        ctx.accounts.refund_vault.amount >= amount,
        OptimizerError::RefundTransferFailed
    );

    if amount > 0 {
        let cfg_seeds: &[&[&[u8]]] = &[&[crate::CONFIG_SEED, &[cfg.bump]]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.refund_vault.to_account_info(),
                    to: ctx.accounts.participant_token_account.to_account_info(),
                    authority: ctx.accounts.config.to_account_info(),
                },
                cfg_seeds,
            ),
            amount,
        )?;
    }

    emit!(RefundClaimed {
        run_id,
        participant,
        amount,
        claimed_count,
    });

    Ok(amount)
}
