//! The verifier side of the protocol: `DeriveGamma`, `VerifyCommit`,
//! `VerifyEval`, `VerifyEvalAt`.
//!
//! A stateless struct holding only ring/shape context, with one method per
//! check and a boolean return on the verification path — no panics, no
//! retries.
//!
//! Single-threaded by contract, same as [`crate::prover::Prover`].

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeSet, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use crate::field::mul_add_mod;
use crate::gamma::derive_gamma;
use crate::merkle::{self, Hash};
use crate::opening::Opening;
use crate::params::Params;
use crate::ring::Ring;

/// Stateless across calls; holds only the ring context, `r`, and `params`.
pub struct Verifier<Rg: Ring> {
    ring: Rg,
    r: usize,
    params: Params,
}

impl<Rg: Ring> Verifier<Rg> {
    pub fn new_verifier(ring: Rg, r: usize, params: Params) -> Result<Self, crate::error::ConstructError> {
        use crate::error::ConstructError;
        let n = ring.size();
        if !n.is_power_of_two() {
            return Err(ConstructError::RingSizeNotPowerOfTwo(n));
        }
        if n > (1 << 16) {
            return Err(ConstructError::RingTooLarge(n));
        }
        if r == 0 {
            return Err(ConstructError::InvalidR);
        }
        Ok(Self { ring, r, params })
    }

    /// `DeriveGamma(root) → η×r`.
    #[tracing::instrument(skip(self))]
    pub fn derive_gamma(&self, root: &Hash) -> Vec<Vec<u64>> {
        derive_gamma(root, self.params.eta, self.r, self.ring.modulus())
    }

    /// Recompute Γ and reject unless it matches element-wise; reject
    /// unless every `R_k` has all coefficients at positions `> degree`
    /// equal to zero.
    #[tracing::instrument(skip(self, r_coeffs, gamma))]
    pub fn verify_commit(&self, root: &Hash, r_coeffs: &[Vec<u64>], gamma: &[Vec<u64>]) -> bool {
        let expected_gamma = self.derive_gamma(root);
        if expected_gamma != gamma {
            tracing::event!(tracing::Level::DEBUG, "gamma mismatch");
            return false;
        }
        if r_coeffs.len() != self.params.eta {
            return false;
        }
        for r_k in r_coeffs {
            for (i, &c) in r_k.iter().enumerate() {
                if i > self.params.degree && c != 0 {
                    tracing::event!(tracing::Level::DEBUG, position = i, "degree bound exceeded");
                    return false;
                }
            }
        }
        true
    }

    /// Full per-leaf verification: shape checks, Merkle path checks, and
    /// the masked-relation check, for every challenged entry.
    #[tracing::instrument(skip(self, gamma, r_coeffs, opening))]
    pub fn verify_eval(&self, root: &Hash, gamma: &[Vec<u64>], r_coeffs: &[Vec<u64>], opening: &Opening) -> bool {
        let mut opening = opening.clone();
        let n = self.ring.size();
        let entry_count = opening.entry_count();

        // Row counts must match `entry_count` before anything indexes a
        // per-leaf row by `t` (including the frontier-decode branch just
        // below, which rebuilds leaf payloads from these same rows) — a
        // malicious prover can otherwise submit an explicit `pvals`/`mvals`/
        // `nonces` shorter than `entry_count` and panic the verifier instead
        // of being rejected.
        if !opening.pvals.is_empty() && opening.pvals.len() != entry_count {
            return false;
        }
        if !opening.mvals.is_empty() && opening.mvals.len() != entry_count {
            return false;
        }
        if !opening.nonces.is_empty() && opening.nonces.len() != entry_count {
            return false;
        }

        if opening.nodes.is_empty() && opening.path_index.is_empty() && opening.path_bits.is_empty() {
            let leaf_hashes: Vec<Hash> = (0..entry_count)
                .map(|t| merkle::hash_leaf(&leaf_payload_for_index(&opening, t, opening.index_at(t))))
                .collect();
            if opening.ensure_decoded(&leaf_hashes).is_err() {
                tracing::event!(tracing::Level::DEBUG, "frontier decode failed");
                return false;
            }
        }

        if gamma.len() != self.params.eta || gamma.iter().any(|row| row.len() != self.r) {
            return false;
        }
        if r_coeffs.len() != self.params.eta {
            return false;
        }
        if r_coeffs.iter().any(|r_k| r_k.len() != n) {
            // A short `R_k` can pass `verify_commit`'s degree-bound scan
            // (it only inspects in-bounds coefficients) and would otherwise
            // panic the reference `Ring::ntt`'s length assertion below.
            return false;
        }

        for t in 0..entry_count {
            if let Some(len) = opening.pval_row_len(t) {
                if len != self.r {
                    return false;
                }
            }
            if let Some(len) = opening.mval_row_len(t) {
                if len != self.params.eta {
                    return false;
                }
            }
            if let Some(len) = opening.explicit_nonce_len(t) {
                if len != self.params.nonce_bytes {
                    return false;
                }
            }
        }

        let r_evals: Vec<Vec<u64>> = r_coeffs.iter().map(|rk| self.ring.ntt(rk)).collect();
        let q = self.ring.modulus();

        for t in 0..entry_count {
            let idx = opening.index_at(t);
            if idx as usize >= n {
                tracing::event!(tracing::Level::DEBUG, t, idx, "index out of range");
                return false;
            }
            let i = idx as usize;

            let nonce = opening.nonce_for(t, idx);
            if nonce.len() != self.params.nonce_bytes {
                return false;
            }

            let payload = leaf_payload_for_index(&opening, t, idx);
            let leaf_hash = merkle::hash_leaf(&payload);
            let path = opening.path_row(t);
            if path.len() != self.ring.size().trailing_zeros() as usize {
                // A single-leaf ring (depth 0) has an empty path; any other
                // size must match the tree's fixed depth exactly.
                if !(n == 1 && path.is_empty()) {
                    return false;
                }
            }
            if !merkle::verify_path(&leaf_hash, &path, root, i) {
                tracing::event!(tracing::Level::DEBUG, t, "merkle path rejected");
                return false;
            }

            for k in 0..self.params.eta {
                let mut expected = opening.get_mval(t, k);
                for j in 0..self.r {
                    expected = mul_add_mod(expected, gamma[k][j], opening.get_pval(t, j), q);
                }
                let actual = r_evals[k][i];
                if actual != expected {
                    tracing::event!(tracing::Level::DEBUG, t, k, "masked relation mismatch");
                    return false;
                }
            }
        }

        true
    }

    /// As [`Self::verify_eval`], additionally enforcing that the opening's
    /// indices are exactly a permutation of `e` (no duplicates, no
    /// out-of-range entries, no opened subset substitution).
    #[tracing::instrument(skip(self, gamma, r_coeffs, opening, e))]
    pub fn verify_eval_at(&self, root: &Hash, gamma: &[Vec<u64>], r_coeffs: &[Vec<u64>], opening: &Opening, e: &[u32]) -> bool {
        let n = self.ring.size() as u32;

        let mut seen = BTreeSet::new();
        for &idx in e {
            if idx >= n || !seen.insert(idx) {
                tracing::event!(tracing::Level::DEBUG, idx, "challenge set invalid: duplicate or out of range");
                return false;
            }
        }

        let opened = opening.all_indices();
        let opened_set: BTreeSet<u32> = opened.iter().copied().collect();
        let e_set: BTreeSet<u32> = e.iter().copied().collect();
        if opened.len() != e.len() || opened_set != e_set {
            tracing::event!(tracing::Level::DEBUG, "opened indices are not a permutation of the challenge set");
            return false;
        }

        self.verify_eval(root, gamma, r_coeffs, opening)
    }
}

/// Rebuild the exact leaf byte payload for challenge slot `t` (logical
/// index `idx`) from the opening's residues and nonce at that slot, in the
/// same byte order as the prover's leaf construction.
fn leaf_payload_for_index(opening: &Opening, t: usize, idx: u32) -> Vec<u8> {
    let nonce = opening.nonce_for(t, idx);
    let mut out = Vec::with_capacity((opening.r + opening.eta) * 4 + 2 + nonce.len());
    for j in 0..opening.r {
        out.extend_from_slice(&(opening.get_pval(t, j) as u32).to_le_bytes());
    }
    for k in 0..opening.eta {
        out.extend_from_slice(&(opening.get_mval(t, k) as u32).to_le_bytes());
    }
    out.extend_from_slice(&(idx as u16).to_le_bytes());
    out.extend_from_slice(&nonce);
    out
}
