//! Γ derivation: a deterministic η×r challenge matrix over `[0, q)`,
//! derived from the commitment root via SHA-256-based rejection sampling.
//!
//! Hash-then-reject-then-reduce against an arbitrary runtime `q`, rather
//! than a fixed-modulus shortcut: every candidate is drawn from the hash
//! stream and rejected until it lands below the largest multiple of `q`
//! under `2^64`.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use sha2::{Digest, Sha256};

/// `DeriveGamma(root, eta, r, q)`: an `eta x r` matrix with every entry
/// uniform in `[0, q)`. The rejection counter is global across **all**
/// cells, not reset per row — this is required for determinism parity with
/// the verifier, which must derive the identical matrix independently.
pub fn derive_gamma(root: &[u8], eta: usize, r: usize, q: u64) -> Vec<Vec<u64>> {
    let bound = rejection_threshold(q);

    let mut counter: u64 = 0;
    let mut out = Vec::with_capacity(eta);
    for _ in 0..eta {
        let mut row = Vec::with_capacity(r);
        for _ in 0..r {
            let x = loop {
                let candidate = sample_u64(root, counter);
                counter += 1;
                if candidate < bound {
                    break candidate;
                }
            };
            row.push(x % q);
        }
        out.push(row);
    }
    out
}

/// `floor(2^64 / q) * q`, computed in u128 to avoid overflow when `q == 1`
/// or when the product would exceed `u64::MAX`.
fn rejection_threshold(q: u64) -> u64 {
    let max_plus_one: u128 = 1u128 << 64;
    let quotient = max_plus_one / (q as u128);
    (quotient * (q as u128)) as u64
}

fn sample_u64(root: &[u8], counter: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(root);
    hasher.update(counter.to_le_bytes());
    let digest = hasher.finalize();
    u64::from_le_bytes(digest[0..8].try_into().unwrap())
}
