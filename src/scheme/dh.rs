// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diffie-Hellman key agreement over ℤ*ₚ, followed by XOR encryption under the
//! agreed session key.
//!
//! The base is a random residue in `[2, p - 2]` and is not checked to be a
//! primitive root, so the subgroup it generates may be small.

use num_bigint_dig::BigUint;
use rand::Rng;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{SecretExponent, ensure_prime_modulus};
use crate::arith::{ModularInverter, mod_pow};
use crate::cipher::xor_crypt;
use crate::engine::{Engine, warn_if_demo_sized};
use crate::prime::PrimalityOracle;
use crate::rng::sample_scalar;
use crate::{Error, Result};

/// Text Alice encrypts under the session key in [`run`].
pub const DEMO_TEXT: &str = "Hello, this is a secret message!";

/// Public group parameters shared by both parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhParams {
    modulus: BigUint,
    generator: BigUint,
}

impl DhParams {
    /// Validate caller-supplied parameters: `modulus` must pass the engine's
    /// primality test and `generator` must lie in `[2, modulus - 2]`.
    pub fn new<P, I, R>(engine: &Engine<P, I>, modulus: BigUint, generator: BigUint, rng: &mut R) -> Result<Self>
    where
        P: PrimalityOracle,
        I: ModularInverter,
        R: Rng,
    {
        ensure_prime_modulus(engine, &modulus, rng)?;

        let two = BigUint::from(2u32);
        if modulus < BigUint::from(5u32) {
            return Err(Error::ModulusTooSmall);
        }
        if generator < two || generator > &modulus - &two {
            return Err(Error::InvalidPublicKey);
        }

        Ok(Self { modulus, generator })
    }

    /// Fresh `bits`-bit prime modulus with a random base.
    pub fn generate<P, I, R>(engine: &Engine<P, I>, bits: usize, rng: &mut R) -> Result<Self>
    where
        P: PrimalityOracle,
        I: ModularInverter,
        R: Rng,
    {
        let modulus = engine.random_prime(bits, rng)?;
        let generator = sample_scalar(rng, &modulus)?;
        Ok(Self { modulus, generator })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// Private scalar `a ∈ [2, p - 2]`, public value `g^a mod p`.
    pub fn generate_keypair<R: Rng>(&self, rng: &mut R) -> Result<DhKeyPair> {
        let private = sample_scalar(rng, &self.modulus)?;
        let public = mod_pow(&self.generator, &private, &self.modulus);

        Ok(DhKeyPair { public, private: SecretExponent::new(private) })
    }
}

/// One party's key material.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct DhKeyPair {
    #[zeroize(skip)]
    public: BigUint,
    private: SecretExponent,
}

impl DhKeyPair {
    pub fn public_key(&self) -> &BigUint {
        &self.public
    }

    pub fn private_key(&self) -> &SecretExponent {
        &self.private
    }

    /// Session key with a peer: `peer_public^own_private mod p`.
    pub fn session_key(&self, peer_public: &BigUint, params: &DhParams) -> BigUint {
        compute_session_key(&self.private, peer_public, params.modulus())
    }
}

/// `peer_public^private mod modulus`. Both parties arrive at `g^(ab) mod p`.
pub fn compute_session_key(private: &SecretExponent, peer_public: &BigUint, modulus: &BigUint) -> BigUint {
    mod_pow(peer_public, private.expose(), modulus)
}

/// Everything produced by one key agreement.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct DhTranscript {
    pub params: DhParams,
    pub alice: DhKeyPair,
    pub bob: DhKeyPair,
    pub alice_session_key: BigUint,
    pub bob_session_key: BigUint,
    pub plaintext: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub recovered: Vec<u8>,
}

/// Agree on a session key over a fresh `bits`-bit prime, then have Alice XOR
/// `plaintext` under her key and Bob undo it under his.
pub fn run<P, I, R>(engine: &Engine<P, I>, bits: usize, plaintext: &[u8], rng: &mut R) -> Result<DhTranscript>
where
    P: PrimalityOracle,
    I: ModularInverter,
    R: Rng,
{
    warn_if_demo_sized("diffie-hellman", bits);
    let params = DhParams::generate(engine, bits, rng)?;
    info!(bits, modulus = %params.modulus, "diffie-hellman parameters ready");

    let alice = params.generate_keypair(rng)?;
    let bob = params.generate_keypair(rng)?;

    let alice_session_key = alice.session_key(bob.public_key(), &params);
    let bob_session_key = bob.session_key(alice.public_key(), &params);
    if alice_session_key != bob_session_key {
        return Err(Error::SessionKeyMismatch);
    }

    let ciphertext = xor_crypt(plaintext, &alice_session_key)?;
    let recovered = xor_crypt(&ciphertext, &bob_session_key)?;
    if recovered != plaintext {
        return Err(Error::PlaintextMismatch);
    }

    info!("session keys agree");
    Ok(DhTranscript {
        params,
        alice,
        bob,
        alice_session_key,
        bob_session_key,
        plaintext: plaintext.to_vec(),
        ciphertext,
        recovered,
    })
}
