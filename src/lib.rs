//! decs-engine - Degree-Enforcing Commitment Scheme
//!
//! A three-move interactive commitment scheme: a prover commits to `r`
//! polynomials over a single-modulus evaluation ring, then proves (i) that a
//! random linear combination of those polynomials, masked by `eta` auxiliary
//! polynomials, has degree at most `d`, and (ii) that evaluations of the
//! committed polynomials at a challenge set agree with the commitment, via a
//! Merkle multiproof over the evaluation domain.
//!
//! # Features
//!
//! - `std` - Enable standard library features (default)
//! - `getrandom` - Draw the commitment nonce seed from the OS entropy source
//!   directly instead of the caller-supplied RNG
//! - `serde` - `Serialize`/`Deserialize` on the unpacked convenience view of
//!   [`opening::Opening`] (the wire-exact packed encodings in [`bitpack`] and
//!   [`frontier`] ride along since they're plain `Vec<u8>`/integers already)
//!
//! # Components
//!
//! - `field` - 64-bit modular arithmetic against a runtime prime `q`
//! - `nonce` - deterministic per-leaf nonce derivation
//! - `merkle` - SHAKE-256-based evaluation-domain Merkle tree
//! - `bitpack` - bit-exact tail/residue/path-matrix (de)serialization
//! - `frontier` - multiproof compaction via sibling deduplication
//! - `opening` - the prover-to-verifier message, packed or unpacked
//! - `gamma` - deterministic challenge-matrix derivation from the root
//! - `ring` - the external `Ring` collaborator trait, plus a reference impl
//! - `prover` / `verifier` - the three-move protocol state machines
//! - `params` - protocol parameters (degree bound, mask count, nonce length)
//! - `error` - error types for the few fallible boundaries
//! - `metrics` - optional byte accounting for an opening

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod bitpack;
pub mod error;
pub mod field;
pub mod frontier;
pub mod gamma;
pub mod merkle;
pub mod metrics;
pub mod nonce;
pub mod opening;
pub mod params;
pub mod prover;
pub mod ring;
pub mod verifier;

// Re-exports for convenience
pub use error::{CommitError, ConstructError, DecodeError};
pub use gamma::derive_gamma;
pub use merkle::{Hash, MerkleTree, HASH_SIZE};
pub use opening::Opening;
pub use params::Params;
pub use prover::{pack_opening, Prover};
pub use ring::{ReferenceRing, Ring};
pub use verifier::Verifier;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{CommitError, ConstructError, DecodeError};
    pub use crate::merkle::{Hash, MerkleTree};
    pub use crate::opening::Opening;
    pub use crate::params::Params;
    pub use crate::prover::{pack_opening, Prover};
    pub use crate::ring::{ReferenceRing, Ring};
    pub use crate::verifier::Verifier;
}
