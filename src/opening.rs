//! The prover→verifier message: challenged residues, Merkle multiproof, and
//! nonces, each carried as one of two representations — an explicit
//! (unpacked) form or a bit-packed form — with accessors that transparently
//! read whichever is live.
//!
//! A plain data struct with a `size()`-style accounting method (see
//! [`crate::metrics`]), built around the tagged explicit/packed duality the
//! commitment container needs.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::bitpack;
use crate::error::DecodeError;
use crate::frontier::{self, FrontierProof};
use crate::merkle::Hash;
use crate::nonce::derive_nonce;

/// The prover→verifier opening message (§3 "Opening").
///
/// Exactly one of each (explicit, packed) pair is populated at a time:
/// residues, tail indices, the multiproof, and nonces. `pack_opening`
/// transitions from all-explicit to all-packed and clears the fields it
/// replaces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opening {
    pub r: usize,
    pub eta: usize,

    pub mask_base: usize,
    pub mask_count: usize,

    /// Explicit tail indices. Empty when `index_bits` is populated.
    pub indices: Vec<u32>,
    /// 13-bit packed tail indices. Empty when `indices` is populated.
    pub index_bits: Vec<u8>,
    /// Tail length, valid regardless of which tail representation is live.
    pub tail_count: usize,

    /// `EntryCount x r`, explicit. Empty when `pvals_bits` is populated.
    pub pvals: Vec<Vec<u64>>,
    /// 20-bit packed row-major residues. Empty when `pvals` is populated.
    pub pvals_bits: Vec<u8>,

    /// `EntryCount x eta`, explicit. Empty when `mvals_bits` is populated.
    pub mvals: Vec<Vec<u64>>,
    pub mvals_bits: Vec<u8>,

    /// Legacy multiproof: deduplicated sibling table.
    pub nodes: Vec<Hash>,
    /// Legacy multiproof: `nodes` indices per leaf per level, explicit.
    pub path_index: Vec<Vec<usize>>,
    /// Legacy multiproof, packed: one row per leaf, `path_bit_width` bits
    /// per entry.
    pub path_bits: Vec<u8>,
    pub path_bit_width: u32,
    pub path_depth: usize,

    /// Frontier multiproof. When populated, `nodes`/`path_index`/
    /// `path_bits` are empty.
    pub frontier: Option<FrontierProof>,

    /// Explicit per-leaf nonces. Empty when `nonce_seed` is populated.
    pub nonces: Vec<Vec<u8>>,
    pub nonce_seed: Vec<u8>,
    pub nonce_bytes: usize,
}

impl Opening {
    /// `MaskCount + tailLen`.
    pub fn entry_count(&self) -> usize {
        self.mask_count + self.tail_len()
    }

    fn tail_len(&self) -> usize {
        if !self.indices.is_empty() {
            self.indices.len()
        } else {
            self.tail_count
        }
    }

    /// Logical index for challenge slot `t`: the mask prefix for
    /// `t < MaskCount`, otherwise the `t - MaskCount`-th tail entry (decoded
    /// from `index_bits` if the tail is packed). Never allocates.
    pub fn index_at(&self, t: usize) -> u32 {
        if t < self.mask_count {
            return (self.mask_base + t) as u32;
        }
        let tail_slot = t - self.mask_count;
        if !self.indices.is_empty() {
            self.indices[tail_slot]
        } else {
            let start_bit = tail_slot * 13;
            bitpack::read_field_at(&self.index_bits, start_bit, 13) as u32
        }
    }

    /// All challenged indices in order: mask prefix followed by tail.
    ///
    /// This reflects exactly what `MaskBase`/`MaskCount` claim, with no
    /// cross-check against the tail's actual content — `VerifyEvalAt`'s
    /// permutation check against the challenge set `E` is what catches a
    /// caller that lied about the prefix, not this accessor.
    pub fn all_indices(&self) -> Vec<u32> {
        (0..self.entry_count()).map(|t| self.index_at(t)).collect()
    }

    /// `Pvals[t][j]`.
    pub fn get_pval(&self, t: usize, j: usize) -> u64 {
        if !self.pvals.is_empty() {
            self.pvals[t][j]
        } else {
            let start_bit = (t * self.r + j) * bitpack::RESIDUE_WIDTH as usize;
            bitpack::read_field_at(&self.pvals_bits, start_bit, bitpack::RESIDUE_WIDTH)
        }
    }

    /// `Mvals[t][k]`.
    pub fn get_mval(&self, t: usize, k: usize) -> u64 {
        if !self.mvals.is_empty() {
            self.mvals[t][k]
        } else {
            let start_bit = (t * self.eta + k) * bitpack::RESIDUE_WIDTH as usize;
            bitpack::read_field_at(&self.mvals_bits, start_bit, bitpack::RESIDUE_WIDTH)
        }
    }

    /// Row `t`'s count of `Pvals` entries (for shape checks); `0` if the
    /// residues live in packed form, since packed rows carry no independent
    /// length of their own.
    pub fn pval_row_len(&self, t: usize) -> Option<usize> {
        if self.pvals.is_empty() {
            None
        } else {
            Some(self.pvals[t].len())
        }
    }

    pub fn mval_row_len(&self, t: usize) -> Option<usize> {
        if self.mvals.is_empty() {
            None
        } else {
            Some(self.mvals[t].len())
        }
    }

    /// Explicit nonce length, if present (for the boundary-rejection check
    /// "NonceBytes differs from params").
    pub fn explicit_nonce_len(&self, t: usize) -> Option<usize> {
        if self.nonces.is_empty() {
            None
        } else {
            Some(self.nonces[t].len())
        }
    }

    /// The nonce for leaf `t`: explicit if present, else derived from the
    /// seed.
    pub fn nonce_for(&self, t: usize, idx: u32) -> Vec<u8> {
        if !self.nonces.is_empty() {
            self.nonces[t].clone()
        } else {
            derive_nonce(&self.nonce_seed, idx, self.nonce_bytes)
        }
    }

    /// The sibling path for leaf `t`, reading whichever multiproof
    /// representation is live. Requires [`Opening::ensure_decoded`] to have
    /// already run if only the frontier form is present.
    pub fn path_row(&self, t: usize) -> Vec<Hash> {
        if !self.path_index.is_empty() {
            self.path_index[t].iter().map(|&i| self.nodes[i]).collect()
        } else if !self.path_bits.is_empty() {
            bitpack::unpack_path_row(&self.path_bits, t, self.path_depth, self.path_bit_width)
                .into_iter()
                .map(|i| self.nodes[i as usize])
                .collect()
        } else {
            Vec::new()
        }
    }

    /// If only the frontier form is populated, expand it into `nodes` +
    /// `path_index` so [`Opening::path_row`] (and therefore verification)
    /// can proceed uniformly. A no-op once the legacy form is already
    /// present. Mutates `self` to memoize the expansion.
    pub fn ensure_decoded(&mut self, leaf_hashes: &[Hash]) -> Result<(), DecodeError> {
        if !self.path_index.is_empty() || !self.path_bits.is_empty() {
            return Ok(());
        }
        let Some(frontier) = &self.frontier else {
            // Nothing to decode and nothing decoded: depth-0 / single-leaf
            // commitments never populate a multiproof at all.
            return Ok(());
        };

        let positions: Vec<usize> = (0..self.entry_count()).map(|t| self.index_at(t) as usize).collect();
        let paths = frontier::unpack(frontier, &positions, leaf_hashes)?;

        let mut nodes: Vec<Hash> = Vec::new();
        let mut path_index = Vec::with_capacity(paths.len());
        for path in paths {
            let mut row = Vec::with_capacity(path.len());
            for h in path {
                let idx = match nodes.iter().position(|n| *n == h) {
                    Some(idx) => idx,
                    None => {
                        nodes.push(h);
                        nodes.len() - 1
                    }
                };
                row.push(idx);
            }
            path_index.push(row);
        }

        self.nodes = nodes;
        self.path_index = path_index;
        Ok(())
    }

    /// Apply all packing steps in order (§4.5 `PackOpening`): residues,
    /// then tail indices, then the multiproof into frontier form, then (if
    /// a legacy path matrix still remains — which only happens when there
    /// was nothing to frontier-pack, e.g. a depth-0 commitment) the path
    /// matrix into `path_bits` at minimum width. Each step clears the
    /// explicit source field it replaces.
    pub fn pack(&mut self) {
        if !self.pvals.is_empty() {
            self.pvals_bits = bitpack::pack_residues(&self.pvals);
            self.pvals.clear();
        }
        if !self.mvals.is_empty() {
            self.mvals_bits = bitpack::pack_residues(&self.mvals);
            self.mvals.clear();
        }

        if !self.indices.is_empty() {
            let tail_len = self.indices.len();
            if let Some(packed) = bitpack::pack_tail_indices(&self.indices) {
                self.index_bits = packed;
                self.tail_count = tail_len;
                self.indices.clear();
            } else {
                self.tail_count = tail_len;
            }
        }

        if !self.path_index.is_empty() {
            let positions: Vec<usize> = (0..self.entry_count()).map(|t| self.index_at(t) as usize).collect();
            let depth = self.path_index.first().map(|r| r.len()).unwrap_or(0);
            if depth > 0 {
                let packed = frontier::pack(&positions, &self.nodes, &self.path_index, depth);
                self.frontier = Some(packed);
                self.nodes.clear();
                self.path_index.clear();
            } else if !self.nodes.is_empty() {
                let max_val = self.nodes.len().saturating_sub(1) as u64;
                let width = bitpack::width_for(max_val);
                let flat: Vec<Vec<u64>> = self
                    .path_index
                    .iter()
                    .map(|row| row.iter().map(|&i| i as u64).collect())
                    .collect();
                self.path_bits = bitpack::pack_path_matrix(&flat, width);
                self.path_bit_width = width;
                self.path_depth = depth;
                self.path_index.clear();
            }
        }
    }
}
