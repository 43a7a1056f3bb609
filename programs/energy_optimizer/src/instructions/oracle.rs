use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};

use crate::{
    errors::OptimizerError,
    events::{DecryptionRequested, RunCompleted},
    state::{AnalysisResult, Config},
    utils::{assert_oracle_attestation, expected_decryption_msg, payload_digest},
    DeliverCallback,
};

/// Oracle client: allocates a request id and publishes the ciphertext handles
/// for the oracle network. Returns `(request_id, payload_digest)` without
/// waiting; the answer comes back later through the instruction named by
/// `callback_selector`.
pub fn request_decryption(
    cfg: &mut Config,
    run_id: u64,
    handles: &[[u8; 32]],
    callback_selector: &[u8],
) -> Result<(u64, [u8; 32])> {
    let request_id = cfg.allocate_request_id()?;
    let digest = payload_digest(handles);

    emit!(DecryptionRequested {
        request_id,
        run_id,
        handles: handles.to_vec(),
        payload_digest: digest,
        callback_selector: callback_selector.to_vec(),
    });

    Ok((request_id, digest))
}

// Tx layout must be: [ ed25519_verify(oracle), deliver_callback ]
pub fn deliver_callback(
    ctx: Context<DeliverCallback>,
    request_id: u64,
    cleartexts: Vec<u8>,
    proof: [u8; 64],
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(cfg.oracle_pubkey != Pubkey::default(), OptimizerError::OracleNotSet);

    let run_id = ctx.accounts.request_record.resolve(request_id)?;

    let run = &mut ctx.accounts.run;
    require!(run.run_id == run_id, OptimizerError::RunIdMismatch);
    require!(
        run.oracle_request_id == request_id,
        OptimizerError::RequestIdMismatch
    );

    // --- ed25519 introspection ---
    let ix_sys = ctx.accounts.instructions.to_account_info();
    let current_ix = load_current_index_checked(&ix_sys)? as usize;
    require!(current_ix >= 1, OptimizerError::MissingOrInvalidEd25519Ix);

    let ed_ix = load_instruction_at_checked(current_ix - 1, &ix_sys)
        .map_err(|_| error!(OptimizerError::MissingOrInvalidEd25519Ix))?;

    let expected = expected_decryption_msg(
        ctx.program_id,
        request_id,
        run_id,
        &run.payload_digest,
        &cleartexts,
    );
    assert_oracle_attestation(&ed_ix, &cfg.oracle_pubkey, &expected, &proof)?;

    // proof holds: decode and resolve
    let result = AnalysisResult::decode(&cleartexts)?;
    let current_slot = Clock::get()?.slot;
    run.complete(result, current_slot)?;

    msg!("run {} completed via request {}", run_id, request_id);
    emit!(RunCompleted {
        run_id,
        participants: run.participants.clone(),
        result,
    });

    Ok(())
}
