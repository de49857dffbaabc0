// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Probabilistic primality testing and random prime generation.

use num_bigint_dig::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;
use tracing::debug;

use crate::arith::mod_pow;
use crate::engine::SearchLimit;
use crate::rng::sample_scalar;
use crate::{Error, Result};

/// Capability to decide whether an integer is (probably) prime.
pub trait PrimalityOracle {
    /// `false` means definitely composite. `true` means prime with the error
    /// bound of the implementation.
    fn is_probable_prime<R: Rng>(&self, n: &BigUint, rng: &mut R) -> bool;
}

/// Miller-Rabin with uniformly random bases.
///
/// A composite passes all rounds with probability at most 4^-rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    rounds: usize,
}

impl MillerRabin {
    pub const DEFAULT_ROUNDS: usize = 5;

    /// Fails with [`Error::InvalidRounds`] for zero rounds, which would accept
    /// every odd number.
    pub fn new(rounds: usize) -> Result<Self> {
        if rounds == 0 {
            return Err(Error::InvalidRounds);
        }
        Ok(Self { rounds })
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self { rounds: Self::DEFAULT_ROUNDS }
    }
}

impl PrimalityOracle for MillerRabin {
    fn is_probable_prime<R: Rng>(&self, n: &BigUint, rng: &mut R) -> bool {
        let two = BigUint::from(2u32);
        let three = BigUint::from(3u32);

        if n < &two {
            return false;
        }
        if n == &two || n == &three {
            return true;
        }
        if n.is_even() {
            return false;
        }

        // n - 1 = 2^s · d with d odd
        let n_minus_1 = n - BigUint::one();
        let mut d = n_minus_1.clone();
        let mut s = 0usize;
        while d.is_even() {
            d = d >> 1usize;
            s += 1;
        }

        'rounds: for _ in 0..self.rounds {
            // n is odd and >= 5 here, so [2, n - 2] is never empty
            let Ok(a) = sample_scalar(rng, n) else {
                return false;
            };

            let mut x = mod_pow(&a, &d, n);
            if x.is_one() || x == n_minus_1 {
                continue;
            }

            for _ in 1..s {
                x = (&x * &x) % n;
                if x == n_minus_1 {
                    continue 'rounds;
                }
            }

            return false;
        }

        true
    }
}

/// Generate a random candidate of the specified bit length.
///
/// Ensures:
/// - Exact bit length (MSB set)
/// - Odd number (LSB set)
#[inline]
fn generate_candidate<R: Rng>(bits: usize, rng: &mut R) -> BigUint {
    let mut candidate = rng.gen_biguint(bits);
    candidate |= BigUint::one() << (bits - 1);
    candidate |= BigUint::one();
    candidate
}

/// Samples odd `bits`-bit integers until `oracle` accepts one.
///
/// Expected attempts grow like ln(2^bits) / 2. The loop is unbounded unless
/// `limit` sets a ceiling.
///
/// # Errors
///
/// [`Error::InvalidBitLength`] if `bits < 2`; [`Error::SearchExhausted`] when the
/// ceiling is reached.
pub fn random_prime<O, R>(bits: usize, oracle: &O, limit: SearchLimit, rng: &mut R) -> Result<BigUint>
where
    O: PrimalityOracle,
    R: Rng,
{
    if bits < 2 {
        return Err(Error::InvalidBitLength { bits, reason: "a prime needs at least 2 bits" });
    }

    let mut attempts = 0u64;
    loop {
        limit.check("prime", attempts)?;
        attempts += 1;

        let candidate = generate_candidate(bits, rng);
        if oracle.is_probable_prime(&candidate, rng) {
            debug!(bits, attempts, "found probable prime");
            return Ok(candidate);
        }
    }
}

/// Deterministic trial division, used as a reference in tests.
#[cfg(test)]
pub(crate) fn is_prime_by_trial_division(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2u64;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}
