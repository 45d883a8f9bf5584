//! Deterministic per-leaf nonce derivation, ρ(seed, idx, b).
//!
//! A label‖data construction over SHA-256, extended with a counter-expansion
//! scheme for `b` longer than a single digest.

use sha2::{Digest, Sha256};

const NONCE_LABEL: &[u8] = b"decs-nonce";

/// Derive a `b`-byte nonce for leaf `idx` under `seed`.
///
/// Replicates the source behavior verbatim for `b > 32`: the first 32 bytes
/// always come from `h0 = SHA-256(label ‖ seed ‖ LE32(idx))`; bytes beyond
/// that come from `SHA-256(label ‖ seed ‖ LE32(idx) ‖ LE32(counter))` for
/// `counter = 1, 2, …`, appended in order until `b` bytes are produced. When
/// `b == 32` exactly, the counter-expansion loop body never runs — this is
/// load-bearing compatibility behavior, not an oversight.
pub fn derive_nonce(seed: &[u8], idx: u32, b: usize) -> Vec<u8> {
    let h0 = hash_block(seed, idx, None);

    if b <= h0.len() {
        return h0[..b].to_vec();
    }

    let mut out = Vec::with_capacity(b);
    out.extend_from_slice(&h0);

    let mut counter: u32 = 1;
    while out.len() < b {
        let block = hash_block(seed, idx, Some(counter));
        let need = b - out.len();
        if need >= block.len() {
            out.extend_from_slice(&block);
        } else {
            out.extend_from_slice(&block[..need]);
        }
        counter += 1;
    }

    out
}

fn hash_block(seed: &[u8], idx: u32, counter: Option<u32>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(NONCE_LABEL);
    hasher.update(seed);
    hasher.update(idx.to_le_bytes());
    if let Some(c) = counter {
        hasher.update(c.to_le_bytes());
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b_under_32_is_a_prefix_of_h0() {
        let seed = b"some-seed-bytes";
        let full = derive_nonce(seed, 7, 32);
        let short = derive_nonce(seed, 7, 16);
        assert_eq!(&full[..16], short.as_slice());
    }

    #[test]
    fn b_equal_32_skips_counter_loop() {
        let seed = b"seed";
        let out = derive_nonce(seed, 3, 32);
        assert_eq!(out.len(), 32);
        assert_eq!(out, hash_block(seed, 3, None));
    }

    #[test]
    fn b_between_32_and_64_appends_counter_one_block() {
        let seed = b"seed";
        let out = derive_nonce(seed, 3, 48);
        assert_eq!(out.len(), 48);
        let h0 = hash_block(seed, 3, None);
        assert_eq!(&out[..32], &h0[..]);
        let h1 = hash_block(seed, 3, Some(1));
        assert_eq!(&out[32..48], &h1[..16]);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let a = derive_nonce(b"seed", 42, 24);
        let b = derive_nonce(b"seed", 42, 24);
        assert_eq!(a, b);
    }

    #[test]
    fn different_index_changes_output() {
        let a = derive_nonce(b"seed", 1, 24);
        let b = derive_nonce(b"seed", 2, 24);
        assert_ne!(a, b);
    }

    #[test]
    fn flipping_seed_bit_changes_output() {
        let mut seed = [0u8; 24];
        let a = derive_nonce(&seed, 0, 24);
        seed[0] ^= 0x01;
        let b = derive_nonce(&seed, 0, 24);
        assert_ne!(a, b);
    }

    #[test]
    fn large_b_spans_multiple_counter_blocks() {
        let out = derive_nonce(b"seed", 9, 96);
        assert_eq!(out.len(), 96);
        let h0 = hash_block(b"seed", 9, None);
        let h1 = hash_block(b"seed", 9, Some(1));
        let h2 = hash_block(b"seed", 9, Some(2));
        assert_eq!(&out[0..32], &h0[..]);
        assert_eq!(&out[32..64], &h1[..]);
        assert_eq!(&out[64..96], &h2[..]);
    }
}
