// Centralized Protocol Constants

// Oracle / Timeout Constants
// ==========================

/// Slots a run may sit in `DecryptionRequested` before anyone can fail it.
/// Once `current_slot >= decryption_requested_slot + timeout`, `check_timeout`
/// moves the run to `Failed` and opens the refund ledger.
///
/// 1500 slots ~ 10 minutes (@ 0.4s/slot).
pub const DEFAULT_DECRYPTION_TIMEOUT_SLOTS: u64 = 1500;

/// Lower bound accepted by `update_run_policy` for the decryption timeout.
pub const MIN_DECRYPTION_TIMEOUT_SLOTS: u64 = 10;

/// Upper bound for the decryption timeout, keeps `requested + timeout` far from overflow.
/// 1_512_000 slots ~ 7 days (@ 0.4s/slot).
pub const MAX_DECRYPTION_TIMEOUT_SLOTS: u64 = 1_512_000;

// Refund Constants
// ================

/// Default compensation pool per failed run, in base units of the refund mint
/// (1.0 token = 1_000_000_000, assuming 9 decimals).
pub const DEFAULT_REFUND_POOL_AMOUNT: u64 = 1_000_000_000;

// Run Window Constants
// ====================

/// Default minimum distance between two consecutive run starts (slots).
/// 0 means runs may be started back to back.
pub const DEFAULT_MIN_RUN_INTERVAL_SLOTS: u64 = 0;

// Sizing
// ======

/// Upper bound on registered devices, and therefore on any run's snapshot.
/// Account layouts spell it out as `#[max_len(32)]`; `state.rs` asserts they agree.
pub const MAX_PARTICIPANTS: usize = 32;

/// Upper bound on ciphertext handles submitted with one run.
pub const MAX_CIPHERTEXT_HANDLES: usize = 8;

/// Decrypted payload: target consumption (u64 LE) || savings in bps (u64 LE).
pub const CLEARTEXT_LEN: usize = 16;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;

/// Starting ids for new registries.
pub const INITIAL_RUN_ID: u64 = 0;
pub const INITIAL_REQUEST_ID: u64 = 1;
