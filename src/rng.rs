// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random source used for every sampling step in the crate.
//!
//! ## Security
//!
//! [`DemoRng`] is `rand`'s `StdRng`. It is a fine statistical generator but it is
//! **not** a source of key material: a seeded instance is fully reproducible and
//! nothing here was designed to resist an adversary. All sampling functions are
//! generic over [`rand::Rng`], so a caller who needs better randomness passes a
//! different generator (for example `rand::rngs::OsRng`) without any other change.

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::One;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Result};

/// Pseudo-random generator used by the demonstrations.
pub type DemoRng = StdRng;

/// Build the demonstration generator.
///
/// `Some(seed)` gives a reproducible stream, `None` seeds from system entropy.
pub fn demo_rng(seed: Option<u64>) -> DemoRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Uniformly sample from the inclusive range `[low, high]`.
///
/// Returns [`Error::ModulusTooSmall`] when the range is empty.
pub fn sample_inclusive<R: Rng>(rng: &mut R, low: &BigUint, high: &BigUint) -> Result<BigUint> {
    if low > high {
        return Err(Error::ModulusTooSmall);
    }

    let upper = high + BigUint::one();
    Ok(rng.gen_biguint_range(low, &upper))
}

/// Uniformly sample from `[2, modulus - 2]`, the range used for private scalars,
/// ephemeral exponents and Miller-Rabin bases.
pub fn sample_scalar<R: Rng>(rng: &mut R, modulus: &BigUint) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    if modulus < &BigUint::from(4u32) {
        return Err(Error::ModulusTooSmall);
    }

    sample_inclusive(rng, &two, &(modulus - &two))
}
