// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modular arithmetic shared by every scheme.

use std::mem;

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::{Error, Result};

/// Capability to invert an element modulo `m`.
///
/// Schemes take this as a type parameter through [`crate::Engine`] instead of
/// calling a particular algorithm directly.
pub trait ModularInverter {
    /// Return `x` with `a·x ≡ 1 (mod modulus)`, reduced into `[0, modulus)`.
    fn invert(&self, a: &BigUint, modulus: &BigUint) -> Result<BigUint>;
}

/// Inversion through the iterative extended Euclidean algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtendedEuclid;

impl ModularInverter for ExtendedEuclid {
    fn invert(&self, a: &BigUint, modulus: &BigUint) -> Result<BigUint> {
        mod_inverse(a, modulus)
    }
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` with `g = gcd(a, b) >= 0` and `a·x + b·y == g`.
/// Iterative, so operand size never affects stack depth.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let (q, rem) = old_r.div_mod_floor(&r);
        old_r = mem::replace(&mut r, rem);

        let next_x = &old_x - &q * &x;
        old_x = mem::replace(&mut x, next_x);

        let next_y = &old_y - &q * &y;
        old_y = mem::replace(&mut y, next_y);
    }

    if old_r.is_negative() {
        (-old_r, -old_x, -old_y)
    } else {
        (old_r, old_x, old_y)
    }
}

/// Computes the modular inverse a⁻¹ mod m.
///
/// Fails with [`Error::NoInverse`] when `gcd(a, m) != 1` and with
/// [`Error::ZeroModulus`] when `m == 0`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() {
        return Err(Error::ZeroModulus);
    }

    let a_signed = BigInt::from_biguint(Sign::Plus, a.clone());
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());

    let (g, x, _) = extended_gcd(&a_signed, &m_signed);
    if !g.is_one() {
        return Err(Error::NoInverse);
    }

    // mod_floor against a positive modulus is never negative
    x.mod_floor(&m_signed).to_biguint().ok_or(Error::NoInverse)
}

/// Greatest common divisor of two unsigned values.
#[inline]
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// base^exponent mod modulus, by windowed square-and-multiply.
///
/// # Panics
/// Panics if `modulus` is zero. Callers pass moduli that were generated or
/// validated beforehand.
#[inline]
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    debug_assert!(!modulus.is_zero(), "modulus must be nonzero in mod_pow");
    base.modpow(exponent, modulus)
}
