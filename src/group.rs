// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primitive roots of the multiplicative group modulo a prime.

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;
use tracing::debug;

use crate::arith::mod_pow;
use crate::engine::SearchLimit;
use crate::rng::sample_scalar;
use crate::{Error, Result};

/// Distinct prime factors of `n` in ascending order, by trial division up to √n.
///
/// Cost grows with the square root of the largest-but-one prime factor, so this
/// is only practical for demonstration-sized moduli.
pub fn prime_factors(n: &BigUint) -> Vec<BigUint> {
    let mut factors = Vec::new();
    if n.is_zero() {
        return factors;
    }

    let mut rest = n.clone();
    let mut divisor = BigUint::from(2u32);

    while &divisor * &divisor <= rest {
        if rest.is_multiple_of(&divisor) {
            while rest.is_multiple_of(&divisor) {
                rest /= &divisor;
            }
            factors.push(divisor.clone());
        }
        divisor += 1u32;
    }

    if rest > BigUint::one() {
        factors.push(rest);
    }

    factors
}

/// Whether `g` generates the whole group ℤ*ₚ, given the distinct prime factors of
/// `p - 1`.
///
/// `g` has full order `p - 1` iff `g^((p-1)/q) ≠ 1 (mod p)` for every such `q`.
pub fn is_generator(g: &BigUint, p: &BigUint, factors_of_order: &[BigUint]) -> bool {
    if g <= &BigUint::one() || g >= p {
        return false;
    }

    let order = p - BigUint::one();
    factors_of_order
        .iter()
        .all(|q| !mod_pow(g, &(&order / q), p).is_one())
}

/// Sample `g ∈ [2, p - 2]` until it is a primitive root modulo the prime `p`.
///
/// `p - 1` is factored once up front. `φ(p - 1)` of the residues qualify, so the
/// search ends after a handful of draws.
pub fn find_generator<R: Rng>(p: &BigUint, limit: SearchLimit, rng: &mut R) -> Result<BigUint> {
    if p < &BigUint::from(5u32) {
        return Err(Error::ModulusTooSmall);
    }

    let factors = prime_factors(&(p - BigUint::one()));

    let mut attempts = 0u64;
    loop {
        limit.check("generator", attempts)?;
        attempts += 1;

        let candidate = sample_scalar(rng, p)?;
        if is_generator(&candidate, p, &factors) {
            debug!(attempts, factors = factors.len(), "found primitive root");
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::{MillerRabin, random_prime};
    use crate::rng::demo_rng;

    fn uints(values: &[u64]) -> Vec<BigUint> {
        values.iter().map(|&v| BigUint::from(v)).collect()
    }

    #[test]
    fn factors_are_distinct_and_sorted() {
        assert_eq!(prime_factors(&BigUint::from(360u32)), uints(&[2, 3, 5]));
        assert_eq!(prime_factors(&BigUint::from(97u32)), uints(&[97]));
        assert_eq!(prime_factors(&BigUint::from(2u32 * 65_521)), uints(&[2, 65_521]));
        assert_eq!(prime_factors(&BigUint::from(1024u32)), uints(&[2]));
        assert!(prime_factors(&BigUint::one()).is_empty());
        assert!(prime_factors(&BigUint::zero()).is_empty());
    }

    #[test]
    fn primitive_roots_mod_23() {
        let p = BigUint::from(23u32);
        let factors = prime_factors(&BigUint::from(22u32));
        let roots = [5u32, 7, 10, 11, 14, 15, 17, 19, 20, 21];

        for g in 0u32..30 {
            let expected = roots.contains(&g);
            assert_eq!(is_generator(&BigUint::from(g), &p, &factors), expected, "g={g}");
        }
    }

    #[test]
    fn found_generator_has_full_order() {
        let mut rng = demo_rng(Some(31));
        let p = random_prime(12, &MillerRabin::default(), SearchLimit::UNBOUNDED, &mut rng).unwrap();
        let g = find_generator(&p, SearchLimit::UNBOUNDED, &mut rng).unwrap();

        let order = &p - BigUint::one();
        let mut x = BigUint::one();
        let mut k = BigUint::zero();
        loop {
            x = (&x * &g) % &p;
            k += 1u32;
            if x.is_one() {
                break;
            }
        }
        assert_eq!(k, order);
    }

    #[test]
    fn small_prime_modulus() {
        let mut rng = demo_rng(Some(4));
        let g = find_generator(&BigUint::from(5u32), SearchLimit::UNBOUNDED, &mut rng).unwrap();
        assert!(g == BigUint::from(2u32) || g == BigUint::from(3u32));

        for p in [0u32, 1, 3] {
            assert_eq!(
                find_generator(&BigUint::from(p), SearchLimit::UNBOUNDED, &mut rng),
                Err(Error::ModulusTooSmall)
            );
        }
    }

    #[test]
    fn ceiling_stops_the_search() {
        let mut rng = demo_rng(Some(4));
        let result = find_generator(&BigUint::from(23u32), SearchLimit::attempts(0), &mut rng);
        assert_eq!(result, Err(Error::SearchExhausted { search: "generator", attempts: 0 }));
    }
}
