//! Protocol parameters: degree bound, mask count, nonce length.
//!
//! A plain struct with a validating constructor and a `Default` impl for
//! the common case, rather than a config-file loader — these are protocol
//! parameters shared between a `Prover` and its matching `Verifier`, not
//! deployment configuration.

use crate::error::ConstructError;

/// Immutable triple `(Degree, Eta, NonceBytes)`. Constructed once and shared
/// between a `Prover` and its matching `Verifier`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Maximum allowed coefficient position of each `R_k`.
    pub degree: usize,
    /// Number of mask polynomials, `> 0`.
    pub eta: usize,
    /// Nonce length in bytes, `> 0`.
    pub nonce_bytes: usize,
}

impl Params {
    /// Validate and construct. `ring_size` is the ring's `N`, needed to
    /// check `degree < N`.
    pub fn new(degree: usize, eta: usize, nonce_bytes: usize, ring_size: usize) -> Result<Self, ConstructError> {
        if degree >= ring_size {
            return Err(ConstructError::InvalidDegree { degree, size: ring_size });
        }
        if eta == 0 {
            return Err(ConstructError::InvalidEta(eta));
        }
        if nonce_bytes == 0 {
            return Err(ConstructError::InvalidNonceBytes(nonce_bytes));
        }
        Ok(Self { degree, eta, nonce_bytes })
    }

    /// `DefaultParams = (Degree=4095, Eta=2, NonceBytes=24)`, for legacy
    /// callers that don't specify their own. Requires a ring of size at
    /// least 4096 to remain valid.
    pub fn default_for_ring(ring_size: usize) -> Result<Self, ConstructError> {
        Self::new(4095, 2, 24, ring_size)
    }
}
