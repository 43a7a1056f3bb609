use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::constants::MAX_CIPHERTEXT_HANDLES;
use crate::errors::OptimizerError;
use crate::events::RunStarted;
use crate::instructions::oracle::request_decryption;
use crate::state::RunStatusView;
use crate::{GetStatus, StartRun};

pub fn start_run(ctx: Context<StartRun>, ciphertext_handles: Vec<[u8; 32]>) -> Result<u64> {
    let cfg = &mut ctx.accounts.config;
    require!(!cfg.paused, OptimizerError::Paused);

    require!(!ciphertext_handles.is_empty(), OptimizerError::EmptyPayload);
    require!(
        ciphertext_handles.len() <= MAX_CIPHERTEXT_HANDLES,
        OptimizerError::TooManyHandles
    );

    let current_slot = Clock::get()?.slot;
    let registry = &mut ctx.accounts.run_registry;
    require!(
        registry.window_open(current_slot, cfg.min_run_interval_slots),
        OptimizerError::RunWindowClosed
    );

    let participants = ctx.accounts.participant_registry.snapshot();
    require!(!participants.is_empty(), OptimizerError::NoActiveParticipants);

    let run_id = registry.allocate_run_id(current_slot)?;

    let run = &mut ctx.accounts.run;
    run.open(
        run_id,
        ctx.bumps.run,
        participants,
        cfg.decryption_timeout_slots,
        current_slot,
    )?;

    let (request_id, digest) = request_decryption(
        cfg,
        run_id,
        &ciphertext_handles,
        crate::instruction::DeliverCallback::DISCRIMINATOR,
    )?;

    ctx.accounts.request_record.bind(
        request_id,
        run_id,
        ctx.bumps.request_record,
        current_slot,
    )?;

    run.mark_decryption_requested(request_id, digest, current_slot)?;

    msg!(
        "run {} started: {} participants, request {}",
        run_id,
        run.participants.len(),
        request_id
    );
    emit!(RunStarted {
        run_id,
        oracle_request_id: request_id,
        participant_count: run.participants.len() as u64,
        decryption_requested_slot: current_slot,
        deadline_slot: run.deadline_slot()?,
    });

    Ok(run_id)
}

pub fn get_status(ctx: Context<GetStatus>, _run_id: u64) -> Result<RunStatusView> {
    ctx.accounts.run.status_view()
}
