//! Merkle tree over 16-byte truncated SHAKE-256 hashes.
//!
//! Built whole from known leaves rather than incrementally, with a
//! sibling-path walk for opening individual leaves. Leaf and internal nodes
//! are domain-separated by a prefix byte rather than distinct hash
//! functions per layer.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

/// Hash output size in bytes (truncated SHAKE-256).
pub const HASH_SIZE: usize = 16;

/// A 16-byte hash value.
pub type Hash = [u8; HASH_SIZE];

/// Domain tag for leaf hashes.
pub const LEAF_PREFIX: u8 = 0x00;
/// Domain tag for interior node hashes.
pub const NODE_PREFIX: u8 = 0x01;

fn shake16(chunks: &[&[u8]]) -> Hash {
    let mut hasher = Shake256::default();
    for c in chunks {
        hasher.update(c);
    }
    let mut out = [0u8; HASH_SIZE];
    hasher.finalize_xof().read(&mut out);
    out
}

/// `H(0x00 ‖ leaf)`.
#[inline]
pub fn hash_leaf(leaf: &[u8]) -> Hash {
    shake16(&[&[LEAF_PREFIX], leaf])
}

/// `H(0x01 ‖ left ‖ right)`.
#[inline]
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    shake16(&[&[NODE_PREFIX], left, right])
}

/// Re-run the sibling hash chain for `leaf_hash` at `idx`, choosing
/// left/right at each level by the running index's low bit, and compare
/// against `root`. Any length mismatch anywhere is implicitly a rejection
/// because `Hash` is a fixed-size array.
pub fn verify_path(leaf_hash: &Hash, path: &[Hash], root: &Hash, idx: usize) -> bool {
    &compute_root_from_path(leaf_hash, path, idx) == root
}

/// Fold a sibling path up to a root, without comparing against anything.
pub fn compute_root_from_path(leaf_hash: &Hash, path: &[Hash], idx: usize) -> Hash {
    let mut current = *leaf_hash;
    let mut index = idx;
    for sibling in path {
        current = if index & 1 == 0 {
            hash_pair(&current, sibling)
        } else {
            hash_pair(sibling, &current)
        };
        index >>= 1;
    }
    current
}

/// A balanced binary Merkle tree built up front from a known set of leaves.
///
/// `n` leaves are padded to the next power of two `S` with a sentinel leaf
/// whose raw payload is empty (`hash_leaf(&[])`). Layers are stored dense,
/// layer 0 holding the `S` leaf hashes and the last layer holding the root.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    layers: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree over raw leaf payloads, applying the leaf domain tag
    /// and power-of-two padding internally.
    pub fn build(leaf_payloads: &[Vec<u8>]) -> Self {
        let hashes: Vec<Hash> = leaf_payloads.iter().map(|p| hash_leaf(p)).collect();
        Self::build_from_leaf_hashes(&hashes)
    }

    /// Build a tree directly over already-hashed leaves (no leaf prefixing
    /// is applied here — callers must have already run them through
    /// [`hash_leaf`]).
    pub fn build_from_leaf_hashes(hashes: &[Hash]) -> Self {
        assert!(!hashes.is_empty(), "merkle tree requires at least one leaf");

        let depth = (hashes.len() as f64).log2().ceil() as u32;
        let padded = 1usize << depth;

        let sentinel = hash_leaf(&[]);
        let mut level: Vec<Hash> = hashes.to_vec();
        level.resize(padded, sentinel);

        let mut layers = vec![level];
        while layers.last().unwrap().len() > 1 {
            let prev = layers.last().unwrap();
            let mut next = Vec::with_capacity(prev.len() / 2);
            for pair in prev.chunks(2) {
                next.push(hash_pair(&pair[0], &pair[1]));
            }
            layers.push(next);
        }

        Self { layers }
    }

    /// Number of leaves, including padding.
    pub fn size(&self) -> usize {
        self.layers[0].len()
    }

    /// Tree depth (number of sibling levels between a leaf and the root).
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn root(&self) -> Hash {
        *self.layers.last().unwrap().first().unwrap()
    }

    pub fn leaf_hash(&self, idx: usize) -> Hash {
        self.layers[0][idx]
    }

    /// Sibling path for `idx`: `layer[lvl][idx ^ 1]` for `lvl = 0..depth`,
    /// with `idx` right-shifted by one per level.
    pub fn path_for(&self, idx: usize) -> Vec<Hash> {
        assert!(idx < self.size(), "leaf index out of range");
        let mut siblings = Vec::with_capacity(self.depth());
        let mut i = idx;
        for lvl in 0..self.depth() {
            siblings.push(self.layers[lvl][i ^ 1]);
            i >>= 1;
        }
        siblings
    }
}
