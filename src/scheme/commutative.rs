// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-exponent encryption modulo a prime, known in the original programs as
//! the "Shamir" scheme.
//!
//! Each party holds `a ∈ [2, p - 2]` with `gcd(a, p - 1) = 1` and publishes
//! `a⁻¹ mod (p - 1)`. Encryption raises to the public exponent, decryption to
//! the private one. Despite the name this is neither Shamir's three-pass
//! protocol nor secret sharing: it is RSA with a prime modulus, and anyone who
//! knows `p` can invert the public exponent. The behavior is kept as-is; turning
//! it into a real three-pass exchange would be a different scheme.

use num_bigint_dig::BigUint;
use num_traits::One;
use rand::Rng;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{ALICE_MESSAGE, BOB_REPLY, Decrypt, Delivery, Encrypt, SecretExponent, ensure_prime_modulus};
use crate::arith::{ModularInverter, mod_pow};
use crate::ciphertext::Ciphertext;
use crate::engine::{Engine, warn_if_demo_sized};
use crate::prime::PrimalityOracle;
use crate::rng::sample_scalar;
use crate::{Error, Result};

/// Public exponent `a⁻¹ mod (p - 1)` and the prime modulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommutativePublicKey {
    modulus: BigUint,
    exponent: BigUint,
}

impl CommutativePublicKey {
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn exponent(&self) -> &BigUint {
        &self.exponent
    }
}

#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct CommutativePrivateKey {
    #[zeroize(skip)]
    modulus: BigUint,
    exponent: SecretExponent,
}

impl CommutativePrivateKey {
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn exponent(&self) -> &SecretExponent {
        &self.exponent
    }
}

#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct CommutativeKeyPair {
    #[zeroize(skip)]
    public: CommutativePublicKey,
    secret: CommutativePrivateKey,
}

impl CommutativeKeyPair {
    /// Draws private exponents until one is invertible modulo `modulus - 1`.
    pub fn generate<P, I, R>(engine: &Engine<P, I>, modulus: &BigUint, rng: &mut R) -> Result<Self>
    where
        P: PrimalityOracle,
        I: ModularInverter,
        R: Rng,
    {
        ensure_prime_modulus(engine, modulus, rng)?;

        let order = modulus - BigUint::one();
        let limit = engine.limit();

        let mut attempts = 0u64;
        let (private, public) = loop {
            limit.check("invertible exponent", attempts)?;
            attempts += 1;

            let candidate = sample_scalar(rng, modulus)?;
            match engine.invert(&candidate, &order) {
                Ok(inverse) => break (candidate, inverse),
                Err(Error::NoInverse) => continue,
                Err(e) => return Err(e),
            }
        };
        debug!(attempts, "chose invertible private exponent");

        Ok(Self {
            public: CommutativePublicKey { modulus: modulus.clone(), exponent: public },
            secret: CommutativePrivateKey {
                modulus: modulus.clone(),
                exponent: SecretExponent::new(private),
            },
        })
    }

    pub fn public_key(&self) -> &CommutativePublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &CommutativePrivateKey {
        &self.secret
    }
}

impl Encrypt for CommutativePublicKey {
    type Ciphertext = Ciphertext;

    /// `c = m^public mod p`.
    fn encrypt<R: Rng>(&self, message: &BigUint, _rng: &mut R) -> Result<Ciphertext> {
        if message >= &self.modulus {
            return Err(Error::MessageOutOfRange);
        }
        Ok(Ciphertext::new(mod_pow(message, &self.exponent, &self.modulus)))
    }
}

impl Decrypt for CommutativePrivateKey {
    type Ciphertext = Ciphertext;

    /// `m = c^private mod p`.
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        if ciphertext.value() >= &self.modulus {
            return Err(Error::InvalidCiphertext);
        }
        Ok(mod_pow(ciphertext.value(), self.exponent.expose(), &self.modulus))
    }
}

impl Encrypt for CommutativeKeyPair {
    type Ciphertext = Ciphertext;

    fn encrypt<R: Rng>(&self, message: &BigUint, rng: &mut R) -> Result<Ciphertext> {
        self.public.encrypt(message, rng)
    }
}

impl Decrypt for CommutativeKeyPair {
    type Ciphertext = Ciphertext;

    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        self.secret.decrypt(ciphertext)
    }
}

#[allow(missing_debug_implementations)]
#[derive(Clone)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct CommutativeTranscript {
    pub modulus: BigUint,
    pub alice: CommutativeKeyPair,
    pub bob: CommutativeKeyPair,
    pub to_bob: Delivery<Ciphertext>,
    pub to_alice: Delivery<Ciphertext>,
}

/// Shared `bits`-bit prime; Alice sends [`ALICE_MESSAGE`] to Bob, Bob replies
/// with [`BOB_REPLY`].
pub fn run<P, I, R>(engine: &Engine<P, I>, bits: usize, rng: &mut R) -> Result<CommutativeTranscript>
where
    P: PrimalityOracle,
    I: ModularInverter,
    R: Rng,
{
    warn_if_demo_sized("commutative", bits);
    let modulus = engine.random_prime(bits, rng)?;
    info!(bits, modulus = %modulus, "commutative scheme modulus ready");

    let alice = CommutativeKeyPair::generate(engine, &modulus, rng)?;
    let bob = CommutativeKeyPair::generate(engine, &modulus, rng)?;

    let to_bob = Delivery::send(BigUint::from(ALICE_MESSAGE), bob.public_key(), bob.private_key(), rng)?;
    let to_alice = Delivery::send(BigUint::from(BOB_REPLY), alice.public_key(), alice.private_key(), rng)?;

    info!("commutative round trips verified");
    Ok(CommutativeTranscript { modulus, alice, bob, to_bob, to_alice })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::gcd;
    use crate::rng::demo_rng;

    fn keypair(bits: usize, seed: u64) -> CommutativeKeyPair {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(seed));
        let p = engine.random_prime(bits, &mut rng).unwrap();
        CommutativeKeyPair::generate(&engine, &p, &mut rng).unwrap()
    }

    #[test]
    fn exponents_are_inverse_modulo_group_order() {
        for seed in 0..10 {
            let pair = keypair(32, seed);
            let p = pair.public_key().modulus();
            let order = p - 1u32;
            let private = pair.private_key().exponent().expose();

            assert!(gcd(private, &order).is_one());
            assert!((private * pair.public_key().exponent()) % &order == BigUint::one());
        }
    }

    #[test]
    fn round_trip_for_every_message_of_small_prime() {
        let pair = keypair(10, 2);
        let mut rng = demo_rng(Some(0));
        let p = pair.public_key().modulus().clone();

        let mut m = BigUint::from(0u32);
        while m < p {
            let c = pair.encrypt(&m, &mut rng).unwrap();
            assert_eq!(pair.decrypt(&c).unwrap(), m);
            m += 1u32;
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let pair = keypair(16, 3);
        let mut rng = demo_rng(Some(0));
        let p = pair.public_key().modulus().clone();

        assert_eq!(pair.encrypt(&p, &mut rng), Err(Error::MessageOutOfRange));
        assert_eq!(pair.decrypt(&Ciphertext::new(p)), Err(Error::InvalidCiphertext));
    }

    #[test]
    fn ceiling_applies_to_exponent_search() {
        let engine = Engine::builder().max_attempts(Some(0)).build().unwrap();
        let mut rng = demo_rng(Some(4));
        let result = CommutativeKeyPair::generate(&engine, &BigUint::from(23u32), &mut rng);
        assert!(matches!(
            result,
            Err(Error::SearchExhausted { search: "invertible exponent", .. })
        ));
    }

    #[test]
    fn demonstration_run() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(5));
        let transcript = run(&engine, 16, &mut rng).unwrap();

        assert_eq!(transcript.to_bob.recovered, BigUint::from(ALICE_MESSAGE));
        assert_eq!(transcript.to_alice.recovered, BigUint::from(BOB_REPLY));
    }
}
