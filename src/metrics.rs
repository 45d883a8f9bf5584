//! Optional byte-accounting diagnostics for an [`crate::opening::Opening`].
//!
//! Sums the serialized size of each field for diagnostics — not used on the
//! verification path.

use crate::merkle::HASH_SIZE;
use crate::opening::Opening;

/// A byte-count breakdown of an opening's live (not cleared) fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeReport {
    pub tail_bytes: usize,
    pub residue_bytes: usize,
    pub multiproof_bytes: usize,
    pub nonce_bytes: usize,
}

impl SizeReport {
    pub fn total(&self) -> usize {
        self.tail_bytes + self.residue_bytes + self.multiproof_bytes + self.nonce_bytes
    }
}

/// Measure the wire cost of `opening`'s currently-live representation.
/// Reads only, never mutates or decodes anything.
pub fn size_report(opening: &Opening) -> SizeReport {
    let tail_bytes = if !opening.indices.is_empty() {
        opening.indices.len() * core::mem::size_of::<u32>()
    } else {
        opening.index_bits.len()
    };

    let residue_bytes = if !opening.pvals.is_empty() {
        opening.pvals.iter().map(|row| row.len() * core::mem::size_of::<u64>()).sum::<usize>()
            + opening.mvals.iter().map(|row| row.len() * core::mem::size_of::<u64>()).sum::<usize>()
    } else {
        opening.pvals_bits.len() + opening.mvals_bits.len()
    };

    let multiproof_bytes = if let Some(frontier) = &opening.frontier {
        frontier.nodes.len() * HASH_SIZE + frontier.proof_bits.len() + frontier.lr_bits.len() + frontier.ref_bits.len()
    } else if !opening.path_bits.is_empty() {
        opening.nodes.len() * HASH_SIZE + opening.path_bits.len()
    } else {
        opening.nodes.len() * HASH_SIZE + opening.path_index.iter().map(|row| row.len() * core::mem::size_of::<usize>()).sum::<usize>()
    };

    let nonce_bytes = if !opening.nonces.is_empty() {
        opening.nonces.iter().map(|n| n.len()).sum()
    } else {
        opening.nonce_seed.len()
    };

    SizeReport { tail_bytes, residue_bytes, multiproof_bytes, nonce_bytes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_opening_reports_smaller_tail_than_explicit() {
        let mut opening = Opening {
            r: 1,
            eta: 1,
            indices: vec![1, 2, 3, 4, 5],
            tail_count: 5,
            ..Default::default()
        };
        let explicit_report = size_report(&opening);
        opening.pack();
        let packed_report = size_report(&opening);
        assert!(packed_report.tail_bytes < explicit_report.tail_bytes);
    }

    #[test]
    fn total_sums_all_components() {
        let opening = Opening {
            r: 1,
            eta: 1,
            indices: vec![1, 2],
            tail_count: 2,
            nonce_seed: vec![0u8; 24],
            nonce_bytes: 24,
            ..Default::default()
        };
        let report = size_report(&opening);
        assert_eq!(report.total(), report.tail_bytes + report.residue_bytes + report.multiproof_bytes + report.nonce_bytes);
    }
}
