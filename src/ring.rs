//! The `Ring` trait and a naive in-crate reference implementation.
//!
//! The production NTT/InvNTT and uniform-sampling library is an external
//! collaborator — callers with a real NTT implementation provide their own
//! `Ring` over their own polynomial representation. This crate only needs
//! *some* concrete ring to exercise `Prover`/`Verifier` end-to-end in its
//! own tests and benches, so it carries a naive reference implementation
//! rather than depending on one.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use rand::RngCore;

use crate::field::{add_mod, mul_mod, sub_mod};

/// A power-of-two single-modulus evaluation ring.
pub trait Ring {
    /// `N`, a power of two.
    fn size(&self) -> usize;
    /// The prime modulus `q < 2^64`.
    fn modulus(&self) -> u64;
    /// Forward transform: coefficient form -> evaluation form.
    fn ntt(&self, coeffs: &[u64]) -> Vec<u64>;
    /// Inverse transform: evaluation form -> coefficient form.
    fn intt(&self, vals: &[u64]) -> Vec<u64>;
    /// Sample `N` uniform elements in `[0, q)`.
    fn sample_uniform(&self, rng: &mut dyn RngCore) -> Vec<u64>;
}

/// `O(N^2)` reference DFT over a configurable NTT-friendly prime.
///
/// Not a production transform — no bit-reversal, no butterfly network, no
/// precomputed twiddle cache reuse across calls. It exists only so this
/// crate's own tests and benches have a working `Ring` to commit against.
#[derive(Clone, Debug)]
pub struct ReferenceRing {
    size: usize,
    modulus: u64,
    /// A primitive `2N`-th root of unity mod `q`, used as the NTT generator.
    root: u64,
}

impl ReferenceRing {
    /// Construct a reference ring of the given power-of-two `size` over
    /// `modulus`, using `root` as a primitive `2*size`-th root of unity.
    /// Callers are responsible for supplying a `root` that actually has
    /// that order mod `modulus` — this reference does not verify it.
    pub fn new(size: usize, modulus: u64, root: u64) -> Self {
        assert!(size.is_power_of_two(), "ring size must be a power of two");
        Self { size, modulus, root }
    }

    fn pow_mod(mut base: u64, mut exp: u64, q: u64) -> u64 {
        let mut result = 1u64 % q;
        base %= q;
        while exp > 0 {
            if exp & 1 == 1 {
                result = mul_mod(result, base, q);
            }
            base = mul_mod(base, base, q);
            exp >>= 1;
        }
        result
    }

    fn inverse(a: u64, q: u64) -> u64 {
        Self::pow_mod(a, q - 2, q)
    }
}

impl Ring for ReferenceRing {
    fn size(&self) -> usize {
        self.size
    }

    fn modulus(&self) -> u64 {
        self.modulus
    }

    fn ntt(&self, coeffs: &[u64]) -> Vec<u64> {
        assert_eq!(coeffs.len(), self.size);
        let q = self.modulus;
        let n = self.size as u64;
        // psi = root (primitive 2N-th root); evaluation point for index k is
        // psi^(2k+1), giving the negacyclic/odd-power evaluation domain.
        (0..self.size)
            .map(|k| {
                let point = Self::pow_mod(self.root, 2 * k as u64 + 1, q);
                let mut acc = 0u64;
                let mut point_pow = 1u64 % q;
                for &c in coeffs {
                    acc = add_mod(acc, mul_mod(c, point_pow, q), q);
                    point_pow = mul_mod(point_pow, point, q);
                }
                let _ = n;
                acc
            })
            .collect()
    }

    fn intt(&self, vals: &[u64]) -> Vec<u64> {
        assert_eq!(vals.len(), self.size);
        let q = self.modulus;
        let n_inv = Self::inverse(self.size as u64 % q, q);

        // Solve by explicit Lagrange interpolation over the same points used
        // in `ntt`, which is O(N^2) but exactly inverts it for any N.
        let points: Vec<u64> = (0..self.size)
            .map(|k| Self::pow_mod(self.root, 2 * k as u64 + 1, q))
            .collect();

        let mut coeffs = vec![0u64; self.size];
        for (k, &point) in points.iter().enumerate() {
            // Build the coefficient contribution of vals[k] via the inverse
            // Vandermonde relation using point powers directly: since `ntt`
            // is coeffs -> vals through the Vandermonde matrix V[k][j] =
            // point_k^j, intt computes coeffs = V^{-1} * vals. We exploit
            // that for these constructed evaluation points, V^{-1} has the
            // closed form coeffs[j] = (1/N) * sum_k vals[k] * point_k^{-j}.
            let inv_point = Self::inverse(point, q);
            let mut pow = 1u64 % q;
            for coeff in coeffs.iter_mut() {
                *coeff = add_mod(*coeff, mul_mod(vals[k], pow, q), q);
                pow = mul_mod(pow, inv_point, q);
            }
        }
        for c in coeffs.iter_mut() {
            *c = mul_mod(*c, n_inv, q);
        }
        coeffs
    }

    fn sample_uniform(&self, rng: &mut dyn RngCore) -> Vec<u64> {
        let q = self.modulus;
        let bound = (u64::MAX / q) * q;
        (0..self.size)
            .map(|_| loop {
                let x = rng.next_u64();
                if x < bound {
                    break x % q;
                }
            })
            .collect()
    }
}

/// Add two coefficient-form polynomials element-wise mod `q`.
pub fn poly_add(a: &[u64], b: &[u64], q: u64) -> Vec<u64> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| add_mod(x, y, q)).collect()
}

/// Subtract two coefficient-form polynomials element-wise mod `q`.
pub fn poly_sub(a: &[u64], b: &[u64], q: u64) -> Vec<u64> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| sub_mod(x, y, q)).collect()
}

/// Scale a coefficient-form polynomial by a scalar mod `q`.
pub fn poly_scale(a: &[u64], scalar: u64, q: u64) -> Vec<u64> {
    a.iter().map(|&x| mul_mod(x, scalar, q)).collect()
}

/// Zero every coefficient at position `> degree` (truncation, not rejection).
pub fn truncate_degree(coeffs: &mut [u64], degree: usize) {
    for (i, c) in coeffs.iter_mut().enumerate() {
        if i > degree {
            *c = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // 17 is prime, and supports a ring of size 4 with 2N=8 | (17-1)=16.
    const TEST_Q: u64 = 17;
    const TEST_N: usize = 4;
    // Primitive 8th root of unity mod 17: 2^((17-1)/8 * k)... use known value 2.
    const TEST_ROOT: u64 = 2;

    #[test]
    fn ntt_then_intt_round_trips() {
        let ring = ReferenceRing::new(TEST_N, TEST_Q, TEST_ROOT);
        let coeffs = vec![1u64, 2, 3, 4];
        let vals = ring.ntt(&coeffs);
        let back = ring.intt(&vals);
        assert_eq!(back, coeffs);
    }

    #[test]
    fn ntt_is_deterministic() {
        let ring = ReferenceRing::new(TEST_N, TEST_Q, TEST_ROOT);
        let coeffs = vec![5u64, 0, 1, 9];
        assert_eq!(ring.ntt(&coeffs), ring.ntt(&coeffs));
    }

    #[test]
    fn sample_uniform_respects_bounds_and_length() {
        let ring = ReferenceRing::new(TEST_N, TEST_Q, TEST_ROOT);
        let mut rng = StdRng::seed_from_u64(42);
        let sample = ring.sample_uniform(&mut rng);
        assert_eq!(sample.len(), TEST_N);
        assert!(sample.iter().all(|&v| v < TEST_Q));
    }

    #[test]
    fn truncate_degree_zeros_tail_only() {
        let mut coeffs = vec![1u64, 2, 3, 4, 5];
        truncate_degree(&mut coeffs, 2);
        assert_eq!(coeffs, vec![1, 2, 3, 0, 0]);
    }

    #[test]
    fn poly_add_sub_are_inverse() {
        let a = vec![1u64, 2, 3];
        let b = vec![4u64, 5, 6];
        let q = 97;
        let sum = poly_add(&a, &b, q);
        let back = poly_sub(&sum, &b, q);
        assert_eq!(back, a);
    }
}
