use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};
use solana_sha256_hasher::hashv;

use crate::errors::OptimizerError;

// Ed25519SigVerify111111111111111111111111111
pub fn ed25519_program_id() -> Pubkey {
    Pubkey::new_from_array([
        3, 125, 70, 214, 124, 147, 251, 190, 18, 249, 66, 143, 131, 141, 64, 255,
        5, 112, 116, 73, 39, 244, 138, 100, 252, 202, 112, 68, 128, 0, 0, 0,
    ])
}

// -----------------
// Seeds
// -----------------
pub const CONFIG_SEED: &[u8] = b"config_v1";
pub const RUN_REGISTRY_SEED: &[u8] = b"run_registry_v1";
pub const PARTICIPANTS_SEED: &[u8] = b"participants_v1";
pub const RUN_SEED: &[u8] = b"run_v1";
pub const REQUEST_SEED: &[u8] = b"request_v1";
pub const REFUND_SEED: &[u8] = b"refund_v1";
pub const REFUND_VAULT_SEED: &[u8] = b"refund_vault_v1";

const DECRYPT_MSG_DOMAIN: &[u8] = b"energy-optimizer:decrypt_v1";

// -------------------------
// Payload digest
// -------------------------
pub fn payload_digest(handles: &[[u8; 32]]) -> [u8; 32] {
    let mut parts: Vec<&[u8]> = Vec::with_capacity(handles.len() + 1);
    parts.push(b"payload".as_ref());
    for h in handles {
        parts.push(h.as_ref());
    }
    hashv(&parts).to_bytes()
}

// -------------------------
// Expected oracle decryption msg
// -------------------------
pub fn expected_decryption_msg(
    program_id: &Pubkey,
    request_id: u64,
    run_id: u64,
    payload_digest: &[u8; 32],
    cleartexts: &[u8],
) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(DECRYPT_MSG_DOMAIN.len() + 32 + 8 + 8 + 32 + cleartexts.len());
    out.extend_from_slice(DECRYPT_MSG_DOMAIN);
    out.extend_from_slice(program_id.as_ref());
    out.extend_from_slice(&request_id.to_le_bytes());
    out.extend_from_slice(&run_id.to_le_bytes());
    out.extend_from_slice(payload_digest);
    out.extend_from_slice(cleartexts);
    out
}

// -------------------------
// ed25519 instruction parsing
// -------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Attestation {
    pub pubkey: Pubkey,
    pub signature: [u8; 64],
    pub message: Vec<u8>,
}

pub fn parse_ed25519_ix(ix: &Instruction) -> Result<Ed25519Attestation> {
    require!(
        ix.program_id == ed25519_program_id(),
        OptimizerError::MissingOrInvalidEd25519Ix
    );

    let data = &ix.data;
    require!(data.len() >= 16, OptimizerError::MissingOrInvalidEd25519Ix);

    let num_sigs = data[0];
    require!(num_sigs == 1, OptimizerError::MissingOrInvalidEd25519Ix);

    // Require "self-contained" offsets (instruction_index == u16::MAX)
    let sig_ix = u16::from_le_bytes([data[4], data[5]]);
    let pk_ix = u16::from_le_bytes([data[8], data[9]]);
    let msg_ix = u16::from_le_bytes([data[14], data[15]]);
    require!(sig_ix == u16::MAX, OptimizerError::MissingOrInvalidEd25519Ix);
    require!(pk_ix == u16::MAX, OptimizerError::MissingOrInvalidEd25519Ix);
    require!(msg_ix == u16::MAX, OptimizerError::MissingOrInvalidEd25519Ix);

    let sig_off = u16::from_le_bytes([data[2], data[3]]) as usize;
    let pk_off = u16::from_le_bytes([data[6], data[7]]) as usize;
    let msg_off = u16::from_le_bytes([data[10], data[11]]) as usize;
    let msg_sz = u16::from_le_bytes([data[12], data[13]]) as usize;

    require!(sig_off + 64 <= data.len(), OptimizerError::MissingOrInvalidEd25519Ix);
    require!(pk_off + 32 <= data.len(), OptimizerError::MissingOrInvalidEd25519Ix);
    require!(msg_off + msg_sz <= data.len(), OptimizerError::MissingOrInvalidEd25519Ix);

    let signature: [u8; 64] = data[sig_off..sig_off + 64]
        .try_into()
        .map_err(|_| error!(OptimizerError::MissingOrInvalidEd25519Ix))?;
    let pk_bytes: [u8; 32] = data[pk_off..pk_off + 32]
        .try_into()
        .map_err(|_| error!(OptimizerError::MissingOrInvalidEd25519Ix))?;

    Ok(Ed25519Attestation {
        pubkey: Pubkey::new_from_array(pk_bytes),
        signature,
        message: data[msg_off..msg_off + msg_sz].to_vec(),
    })
}

/// Checks that the (already runtime-verified) ed25519 instruction was signed
/// by `expected_pubkey` over `expected_msg` and carries `proof` as signature.
pub fn assert_oracle_attestation(
    ix: &Instruction,
    expected_pubkey: &Pubkey,
    expected_msg: &[u8],
    proof: &[u8; 64],
) -> Result<()> {
    let att = parse_ed25519_ix(ix)?;

    require_keys_eq!(att.pubkey, *expected_pubkey, OptimizerError::Ed25519PubkeyMismatch);
    require!(
        att.message.as_slice() == expected_msg,
        OptimizerError::Ed25519MessageMismatch
    );
    require!(
        att.signature == *proof,
        OptimizerError::Ed25519SignatureMismatch
    );

    Ok(())
}

// -------------------------
// PDA account creation
// -------------------------

/// Creates a program-owned PDA of `space` bytes, rent paid by `payer`.
/// An address that was pre-funded is topped up, allocated and assigned instead.
pub fn create_pda_account<'info>(
    target: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system: &AccountInfo<'info>,
    space: usize,
    owner: &Pubkey,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let rent = Rent::get()?.minimum_balance(space);
    let current = target.lamports();

    if current == 0 {
        system_program::create_account(
            CpiContext::new_with_signer(
                system.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: target.clone(),
                },
                &[signer_seeds],
            ),
            rent,
            space as u64,
            owner,
        )?;
        return Ok(());
    }

    let top_up = rent.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system.clone(),
                Transfer {
                    from: payer.clone(),
                    to: target.clone(),
                },
            ),
            top_up,
        )?;
    }

    system_program::allocate(
        CpiContext::new_with_signer(
            system.clone(),
            Allocate {
                account_to_allocate: target.clone(),
            },
            &[signer_seeds],
        ),
        space as u64,
    )?;

    system_program::assign(
        CpiContext::new_with_signer(
            system.clone(),
            Assign {
                account_to_assign: target.clone(),
            },
            &[signer_seeds],
        ),
        owner,
    )?;

    Ok(())
}
