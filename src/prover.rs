//! The prover side of the three-move protocol: `CommitInit`, `CommitStep2`,
//! `EvalOpen`, `PackOpening`.
//!
//! A config-like `Params` plus a stateful struct whose methods run the
//! commit sequence in stages, one per message of the protocol, rather than
//! a single monolithic `prove` call.
//!
//! Single-threaded by contract: a `Prover` is not meant to be shared
//! between workers or mutated concurrently. Callers sharding across
//! independent commitments should use one `Prover` per commitment.

#[cfg(not(feature = "std"))]
use alloc::{string::ToString, vec, vec::Vec};

use rand::RngCore;

use crate::error::{CommitError, ConstructError};
use crate::merkle::{Hash, MerkleTree};
use crate::nonce::derive_nonce;
use crate::opening::Opening;
use crate::params::Params;
use crate::ring::{poly_add, poly_scale, truncate_degree, Ring};

const MAX_RING_SIZE: usize = 1 << 16;

/// Holds everything the commit sequence produces, read-only once opening
/// begins.
pub struct Prover<Rg: Ring> {
    ring: Rg,
    params: Params,
    r: usize,
    p_coeffs: Vec<Vec<u64>>,
    pvals: Vec<Vec<u64>>,
    mvals: Vec<Vec<u64>>,
    nonce_seed: Vec<u8>,
    tree: Option<MerkleTree>,
    root: Option<Hash>,
    r_coeffs: Option<Vec<Vec<u64>>>,
}

impl<Rg: Ring> Prover<Rg> {
    /// Construct a prover over `p` (`r` polynomials, each `ring.size()`
    /// coefficients). Rejects an invalid ring shape; `params` is assumed
    /// already validated against `ring.size()` by [`Params::new`].
    #[tracing::instrument(skip(ring, p), fields(r = p.len(), n = ring.size()))]
    pub fn new_prover(ring: Rg, p: Vec<Vec<u64>>, params: Params) -> Result<Self, ConstructError> {
        let n = ring.size();
        if !n.is_power_of_two() {
            return Err(ConstructError::RingSizeNotPowerOfTwo(n));
        }
        if n > MAX_RING_SIZE {
            return Err(ConstructError::RingTooLarge(n));
        }
        let r = p.len();
        if r == 0 {
            return Err(ConstructError::InvalidR);
        }

        Ok(Self {
            ring,
            params,
            r,
            p_coeffs: p,
            pvals: Vec::new(),
            mvals: Vec::new(),
            nonce_seed: Vec::new(),
            tree: None,
            root: None,
            r_coeffs: None,
        })
    }

    /// Sample masks, NTT both sides, build the leaf-committed Merkle tree,
    /// and return its root.
    #[tracing::instrument(skip(self, rng))]
    pub fn commit_init(&mut self, rng: &mut dyn RngCore) -> Result<Hash, CommitError> {
        let eta = self.params.eta;

        let mut m_coeffs = Vec::with_capacity(eta);
        for _ in 0..eta {
            let mut m = self.ring.sample_uniform(rng);
            truncate_degree(&mut m, self.params.degree);
            m_coeffs.push(m);
        }

        self.pvals = self.p_coeffs.iter().map(|p| self.ring.ntt(p)).collect();
        self.mvals = m_coeffs.iter().map(|m| self.ring.ntt(m)).collect();

        self.nonce_seed = sample_seed(self.params.nonce_bytes, rng)?;

        let n = self.ring.size();
        let mut leaves: Vec<Vec<u8>> = Vec::with_capacity(n);
        for i in 0..n {
            leaves.push(leaf_payload(&self.pvals, &self.mvals, i, &self.nonce_seed, self.params.nonce_bytes));
        }

        let tree = MerkleTree::build(&leaves);
        let root = tree.root();
        self.tree = Some(tree);
        self.root = Some(root);

        tracing::event!(tracing::Level::DEBUG, leaf_count = n, "committed evaluation-domain Merkle tree");
        Ok(root)
    }

    /// `R_k = InvNTT(Mvals[k]) + Σ_j Γ[k][j]·InvNTT(Pvals[j])`, in
    /// coefficient form.
    #[tracing::instrument(skip(self, gamma))]
    pub fn commit_step2(&mut self, gamma: &[Vec<u64>]) -> Vec<Vec<u64>> {
        let q = self.ring.modulus();
        let p_coeffs: Vec<Vec<u64>> = self.pvals.iter().map(|pv| self.ring.intt(pv)).collect();

        let mut r_out = Vec::with_capacity(self.params.eta);
        for (k, mvals_k) in self.mvals.iter().enumerate() {
            let mut acc = self.ring.intt(mvals_k);
            for (j, pj) in p_coeffs.iter().enumerate() {
                let scaled = poly_scale(pj, gamma[k][j], q);
                acc = poly_add(&acc, &scaled, q);
            }
            r_out.push(acc);
        }

        self.r_coeffs = Some(r_out.clone());
        r_out
    }

    /// Produce an `Opening` for challenge set `e`. `mask_prefix`, when
    /// given as `(base, count)`, declares that `e`'s first `count` entries
    /// are exactly `base..base+count`; those go into the compact mask
    /// prefix instead of the tail.
    #[tracing::instrument(skip(self, e))]
    pub fn eval_open(&self, e: &[u32], mask_prefix: Option<(u32, u32)>) -> Opening {
        let tree = self.tree.as_ref().expect("eval_open called before commit_init");

        let (mask_base, mask_count, tail) = match mask_prefix {
            Some((base, count)) => (base as usize, count as usize, e[count as usize..].to_vec()),
            None => (0, 0, e.to_vec()),
        };

        let all_idx: Vec<u32> = (0..mask_count as u32).map(|o| mask_base as u32 + o).chain(tail.iter().copied()).collect();

        let mut pvals = Vec::with_capacity(all_idx.len());
        let mut mvals = Vec::with_capacity(all_idx.len());
        let mut nodes: Vec<Hash> = Vec::new();
        let mut path_index = Vec::with_capacity(all_idx.len());

        for &idx in &all_idx {
            let i = idx as usize;
            pvals.push(self.pvals.iter().map(|pv| pv[i]).collect::<Vec<u64>>());
            mvals.push(self.mvals.iter().map(|mv| mv[i]).collect::<Vec<u64>>());

            let path = tree.path_for(i);
            let mut row = Vec::with_capacity(path.len());
            for sib in path {
                let idx_in_table = match nodes.iter().position(|h| *h == sib) {
                    Some(found) => found,
                    None => {
                        nodes.push(sib);
                        nodes.len() - 1
                    }
                };
                row.push(idx_in_table);
            }
            path_index.push(row);
        }

        let tail_len = tail.len();
        Opening {
            r: self.r,
            eta: self.params.eta,
            mask_base,
            mask_count,
            indices: tail,
            tail_count: tail_len,
            pvals,
            mvals,
            nodes,
            path_index,
            nonce_seed: self.nonce_seed.clone(),
            nonce_bytes: self.params.nonce_bytes,
            ..Default::default()
        }
    }

    pub fn root(&self) -> Option<Hash> {
        self.root
    }

    /// `R[0..eta)` in coefficient form, once `commit_step2` has run.
    pub fn r_coeffs(&self) -> Option<&[Vec<u64>]> {
        self.r_coeffs.as_deref()
    }
}

/// `pack_opening(&mut Opening)` as specified — a thin named entry point
/// over `Opening::pack` so the prover-facing API matches the external
/// interface list verbatim.
#[tracing::instrument(skip(opening))]
pub fn pack_opening(opening: &mut Opening) {
    opening.pack();
}

fn sample_seed(len: usize, rng: &mut dyn RngCore) -> Result<Vec<u8>, CommitError> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "getrandom")] {
            let mut seed = vec![0u8; len];
            getrandom::getrandom(&mut seed).map_err(|e| CommitError::EntropyFailure(e.to_string()))?;
            Ok(seed)
        } else {
            let mut seed = vec![0u8; len];
            rng.fill_bytes(&mut seed);
            Ok(seed)
        }
    }
}

/// `LE32(Pvals[0][i])‖…‖LE32(Pvals[r-1][i])‖LE32(Mvals[0][i])‖…‖LE32(Mvals[η-1][i])‖LE16(i)‖ρ(seed,i,b)`.
pub fn leaf_payload(pvals: &[Vec<u64>], mvals: &[Vec<u64>], i: usize, seed: &[u8], nonce_bytes: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity((pvals.len() + mvals.len()) * 4 + 2 + nonce_bytes);
    for p in pvals {
        out.extend_from_slice(&(p[i] as u32).to_le_bytes());
    }
    for m in mvals {
        out.extend_from_slice(&(m[i] as u32).to_le_bytes());
    }
    out.extend_from_slice(&(i as u16).to_le_bytes());
    out.extend_from_slice(&derive_nonce(seed, i as u32, nonce_bytes));
    out
}
