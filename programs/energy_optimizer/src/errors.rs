use anchor_lang::prelude::*;

#[error_code]
pub enum OptimizerError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Protocol paused")]
    Paused,
    #[msg("Math overflow")]
    MathOverflow,

    // -----------------
    // Config
    // -----------------
    #[msg("Invalid decryption timeout")]
    InvalidTimeout,
    #[msg("Invalid refund pool amount")]
    InvalidRefundPool,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Oracle pubkey not set")]
    OracleNotSet,

    // -----------------
    // Participants
    // -----------------
    #[msg("Participant registry is full")]
    RegistryFull,
    #[msg("Device already registered")]
    DeviceAlreadyRegistered,
    #[msg("Device not found")]
    DeviceNotFound,

    // -----------------
    // Runs
    // -----------------
    #[msg("No active participants to snapshot")]
    NoActiveParticipants,
    #[msg("Ciphertext payload is empty")]
    EmptyPayload,
    #[msg("Too many ciphertext handles")]
    TooManyHandles,
    #[msg("Run window not open yet")]
    RunWindowClosed,
    #[msg("Run id mismatch")]
    RunIdMismatch,
    #[msg("Invalid run status for this operation")]
    InvalidRunStatus,
    #[msg("Run is not awaiting decryption")]
    RunNotAwaitingDecryption,

    // -----------------
    // Request registry
    // -----------------
    #[msg("Oracle request id already registered")]
    DuplicateRequestId,
    #[msg("Oracle request id mismatch")]
    RequestIdMismatch,

    // -----------------
    // Oracle proof
    // -----------------
    #[msg("Missing or invalid ed25519 verify instruction")]
    MissingOrInvalidEd25519Ix,
    #[msg("Ed25519 pubkey mismatch")]
    Ed25519PubkeyMismatch,
    #[msg("Ed25519 message mismatch")]
    Ed25519MessageMismatch,
    #[msg("Ed25519 signature does not match the supplied proof")]
    Ed25519SignatureMismatch,
    #[msg("Invalid cleartext length")]
    InvalidCleartextLength,

    // -----------------
    // Refunds
    // -----------------
    #[msg("Run has not failed")]
    RunNotFailed,
    #[msg("Refund already declared for this run")]
    RefundAlreadyDeclared,
    #[msg("Not a participant of this run")]
    NotAParticipant,
    #[msg("Already claimed")]
    AlreadyClaimed,
    #[msg("Refund transfer failed")]
    RefundTransferFailed,
}

#[cfg(test)]
pub(crate) fn error_name(err: anchor_lang::error::Error) -> String {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_name.clone(),
        anchor_lang::error::Error::ProgramError(e) => e.program_error.to_string(),
    }
}
