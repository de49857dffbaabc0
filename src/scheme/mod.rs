// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The four two-party demonstrations.
//!
//! Every driver (`run`) generates its parameters, builds a key pair for Alice
//! and one for Bob, performs the exchange locally and cross-checks the two
//! sides before returning its transcript. A disagreement means an arithmetic
//! bug and is reported as an error rather than as a transcript.

pub mod commutative;
pub mod dh;
pub mod elgamal;
pub mod rsa;

use num_bigint_dig::BigUint;
use rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::arith::ModularInverter;
use crate::engine::Engine;
use crate::prime::PrimalityOracle;
use crate::{Error, Result};

/// Message Alice sends to Bob in the integer demonstrations.
pub const ALICE_MESSAGE: u32 = 42;

/// Bob's reply to Alice in the integer demonstrations.
pub const BOB_REPLY: u32 = 24;

/// Encrypts a single integer message.
pub trait Encrypt {
    type Ciphertext;

    /// Encrypt `message`, which must be smaller than the key's modulus.
    ///
    /// Deterministic schemes ignore `rng`.
    fn encrypt<R: Rng>(&self, message: &BigUint, rng: &mut R) -> Result<Self::Ciphertext>;
}

/// Recovers the integer message from a ciphertext.
pub trait Decrypt {
    type Ciphertext;

    fn decrypt(&self, ciphertext: &Self::Ciphertext) -> Result<BigUint>;
}

/// A secret exponent, wiped from memory on drop.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct SecretExponent(BigUint);

impl SecretExponent {
    pub(crate) fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// Reveal the exponent, as the demonstration output does.
    pub fn expose(&self) -> &BigUint {
        &self.0
    }
}

/// One message sent from one party to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<C> {
    pub message: BigUint,
    pub ciphertext: C,
    pub recovered: BigUint,
}

impl<C> Delivery<C> {
    /// Encrypt with the recipient's public key, decrypt with its private key,
    /// and require the original message back.
    pub fn send<E, D, R>(message: BigUint, to_public: &E, to_private: &D, rng: &mut R) -> Result<Self>
    where
        E: Encrypt<Ciphertext = C>,
        D: Decrypt<Ciphertext = C>,
        R: Rng,
    {
        let ciphertext = to_public.encrypt(&message, rng)?;
        let recovered = to_private.decrypt(&ciphertext)?;

        if recovered != message {
            return Err(Error::RoundTripMismatch { expected: message, actual: recovered });
        }

        Ok(Self { message, ciphertext, recovered })
    }
}

/// Bit-length contract of the command-line front end: positive and a multiple of 8.
pub fn validate_bit_length(bits: usize) -> Result<usize> {
    if bits == 0 {
        return Err(Error::InvalidBitLength { bits, reason: "must be positive" });
    }
    if bits % 8 != 0 {
        return Err(Error::InvalidBitLength { bits, reason: "must be a multiple of 8" });
    }
    Ok(bits)
}

/// Reject a caller-supplied modulus that is not a probable prime.
pub(crate) fn ensure_prime_modulus<P, I, R>(engine: &Engine<P, I>, modulus: &BigUint, rng: &mut R) -> Result<()>
where
    P: PrimalityOracle,
    I: ModularInverter,
    R: Rng,
{
    if engine.is_probable_prime(modulus, rng) {
        Ok(())
    } else {
        Err(Error::CompositeModulus)
    }
}
