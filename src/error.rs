//! Error types for the parts of DECS that are allowed to fail loudly.
//!
//! Per the protocol design, only two places ever produce a `Result`:
//! construction (`new_prover`/`new_verifier`) and entropy draws during
//! `commit_init`. Everything downstream of a commitment — `verify_commit`,
//! `verify_eval`, `verify_eval_at` — collapses to a boolean, including
//! frontier-decode failures (see [`DecodeError`] and
//! [`crate::opening::Opening::ensure_decoded`]).

#[cfg(not(feature = "std"))]
use alloc::string::String;

use thiserror::Error;

/// Fatal at constructor entry — never returned once a `Prover`/`Verifier` exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructError {
    #[error("degree {degree} out of range for ring size {size} (must be in [0, {size}))")]
    InvalidDegree { degree: usize, size: usize },

    #[error("eta must be positive, got {0}")]
    InvalidEta(usize),

    #[error("nonce byte length must be positive, got {0}")]
    InvalidNonceBytes(usize),

    #[error("ring size {0} is not a power of two")]
    RingSizeNotPowerOfTwo(usize),

    #[error("ring index field overflows 16 bits: N={0} exceeds 65536")]
    RingTooLarge(usize),

    #[error("r (number of committed polynomials) must be positive")]
    InvalidR,
}

/// Raised by `commit_init` when the entropy source fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("failed to sample entropy: {0}")]
    EntropyFailure(String),
}

/// Internal reasons a frontier multiproof failed to expand back into
/// per-leaf `(Nodes, PathIndex)` form. Never escapes to callers as a
/// `Result` — `verify_eval`/`verify_eval_at` flatten this to `false`, but
/// keeping it as a distinguishable enum makes unit tests and logs useful.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frontier depth is zero")]
    ZeroDepth,

    #[error("frontier proof/LR bitmap is truncated: need {need} bits, have {have}")]
    TruncatedBitmap { need: usize, have: usize },

    #[error("frontier reference {index} out of range (union size {union_size})")]
    ReferenceOutOfRange { index: usize, union_size: usize },

    #[error("frontier references exhausted before all unpaired entries were resolved")]
    ReferencesExhausted,

    #[error("frontier packed references table has {unused} unused entries")]
    UnusedReferences { unused: usize },

    #[error("reconstructed path length {got} does not match expected depth {want}")]
    PathLengthMismatch { got: usize, want: usize },

    #[error("unpaired active entry at leaf {leaf} level {level} has no proof bit set")]
    MissingProofBit { leaf: usize, level: usize },
}
