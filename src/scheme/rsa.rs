// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textbook RSA: no padding, random public exponent.

use num_bigint_dig::BigUint;
use num_traits::One;
use rand::Rng;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{ALICE_MESSAGE, BOB_REPLY, Decrypt, Delivery, Encrypt, SecretExponent};
use crate::arith::{ModularInverter, gcd, mod_pow};
use crate::ciphertext::Ciphertext;
use crate::engine::{Engine, warn_if_demo_sized};
use crate::prime::PrimalityOracle;
use crate::rng::sample_inclusive;
use crate::{Error, Result};

/// Public key `(e, n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    e: BigUint,
    n: BigUint,
}

impl RsaPublicKey {
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }
}

/// Private key `(d, n)`.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct RsaPrivateKey {
    d: SecretExponent,
    #[zeroize(skip)]
    n: BigUint,
}

impl RsaPrivateKey {
    pub fn d(&self) -> &SecretExponent {
        &self.d
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }
}

#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct RsaKeyPair {
    #[zeroize(skip)]
    public: RsaPublicKey,
    secret: RsaPrivateKey,
}

impl RsaKeyPair {
    /// Smallest key size for which two distinct half-size primes exist.
    pub const MIN_KEY_BITS: usize = 8;

    /// Generates a key pair whose modulus is the product of two distinct
    /// `key_bits / 2`-bit probable primes.
    ///
    /// `e` is drawn uniformly from `[3, φ - 1]` until it is coprime to φ, and
    /// `d = e⁻¹ mod φ`.
    pub fn generate<P, I, R>(engine: &Engine<P, I>, key_bits: usize, rng: &mut R) -> Result<Self>
    where
        P: PrimalityOracle,
        I: ModularInverter,
        R: Rng,
    {
        if key_bits < Self::MIN_KEY_BITS {
            return Err(Error::InvalidBitLength {
                bits: key_bits,
                reason: "RSA needs at least 8 bits",
            });
        }

        let half = key_bits / 2;
        let limit = engine.limit();

        let p = engine.random_prime(half, rng)?;
        let mut attempts = 0u64;
        let q = loop {
            limit.check("distinct prime", attempts)?;
            attempts += 1;

            let candidate = engine.random_prime(half, rng)?;
            if candidate != p {
                break candidate;
            }
        };

        let one = BigUint::one();
        let n = &p * &q;
        let phi = (&p - &one) * (&q - &one);

        let low = BigUint::from(3u32);
        let high = &phi - &one;
        let mut attempts = 0u64;
        let e = loop {
            limit.check("public exponent", attempts)?;
            attempts += 1;

            let candidate = sample_inclusive(rng, &low, &high)?;
            if gcd(&candidate, &phi).is_one() {
                break candidate;
            }
        };
        debug!(attempts, "chose public exponent");

        let d = engine.invert(&e, &phi)?;

        Ok(Self {
            public: RsaPublicKey { e, n: n.clone() },
            secret: RsaPrivateKey { d: SecretExponent::new(d), n },
        })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.secret
    }
}

impl Encrypt for RsaPublicKey {
    type Ciphertext = Ciphertext;

    /// `c = m^e mod n`.
    fn encrypt<R: Rng>(&self, message: &BigUint, _rng: &mut R) -> Result<Ciphertext> {
        if message >= &self.n {
            return Err(Error::MessageOutOfRange);
        }
        Ok(Ciphertext::new(mod_pow(message, &self.e, &self.n)))
    }
}

impl Decrypt for RsaPrivateKey {
    type Ciphertext = Ciphertext;

    /// `m = c^d mod n`.
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        if ciphertext.value() >= &self.n {
            return Err(Error::InvalidCiphertext);
        }
        Ok(mod_pow(ciphertext.value(), self.d.expose(), &self.n))
    }
}

impl Encrypt for RsaKeyPair {
    type Ciphertext = Ciphertext;

    fn encrypt<R: Rng>(&self, message: &BigUint, rng: &mut R) -> Result<Ciphertext> {
        self.public.encrypt(message, rng)
    }
}

impl Decrypt for RsaKeyPair {
    type Ciphertext = Ciphertext;

    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        self.secret.decrypt(ciphertext)
    }
}

#[allow(missing_debug_implementations)]
#[derive(Clone)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct RsaTranscript {
    pub alice: RsaKeyPair,
    pub bob: RsaKeyPair,
    /// Alice's message under Bob's key.
    pub to_bob: Delivery<Ciphertext>,
    /// Bob's reply under Alice's key.
    pub to_alice: Delivery<Ciphertext>,
}

/// Both parties generate `key_bits`-bit keys; Alice sends [`ALICE_MESSAGE`] to
/// Bob and Bob answers with [`BOB_REPLY`].
pub fn run<P, I, R>(engine: &Engine<P, I>, key_bits: usize, rng: &mut R) -> Result<RsaTranscript>
where
    P: PrimalityOracle,
    I: ModularInverter,
    R: Rng,
{
    warn_if_demo_sized("rsa", key_bits);
    let alice = RsaKeyPair::generate(engine, key_bits, rng)?;
    let bob = RsaKeyPair::generate(engine, key_bits, rng)?;
    info!(key_bits, "rsa key pairs ready");

    let to_bob = Delivery::send(BigUint::from(ALICE_MESSAGE), bob.public_key(), bob.private_key(), rng)?;
    let to_alice = Delivery::send(BigUint::from(BOB_REPLY), alice.public_key(), alice.private_key(), rng)?;

    info!("rsa round trips verified");
    Ok(RsaTranscript { alice, bob, to_bob, to_alice })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::demo_rng;

    #[test]
    fn key_structure() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(1));

        for key_bits in [8usize, 16, 64, 256] {
            let pair = RsaKeyPair::generate(&engine, key_bits, &mut rng).unwrap();
            let public = pair.public_key();

            assert_eq!(public.n(), pair.private_key().n());
            assert!(public.e() >= &BigUint::from(3u32));
            assert!(public.n().bits() >= key_bits - 1 && public.n().bits() <= key_bits);
        }
    }

    #[test]
    fn encrypt_42_with_sixteen_bit_key() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(16));
        let pair = RsaKeyPair::generate(&engine, 16, &mut rng).unwrap();

        let message = BigUint::from(42u32);
        let c = pair.public_key().encrypt(&message, &mut rng).unwrap();
        assert_eq!(pair.private_key().decrypt(&c).unwrap(), message);
    }

    #[test]
    fn round_trip_for_every_message_of_small_key() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(3));
        let pair = RsaKeyPair::generate(&engine, 12, &mut rng).unwrap();
        let n = pair.public_key().n().clone();

        let mut m = BigUint::from(0u32);
        while m < n {
            let c = pair.encrypt(&m, &mut rng).unwrap();
            assert_eq!(pair.decrypt(&c).unwrap(), m);
            m += 1u32;
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(4));
        let pair = RsaKeyPair::generate(&engine, 16, &mut rng).unwrap();
        let n = pair.public_key().n().clone();

        assert_eq!(pair.encrypt(&n, &mut rng), Err(Error::MessageOutOfRange));
        assert_eq!(pair.decrypt(&Ciphertext::new(n)), Err(Error::InvalidCiphertext));
    }

    #[test]
    fn tiny_key_sizes_are_rejected() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(5));
        for bits in [0usize, 2, 7] {
            assert!(matches!(
                RsaKeyPair::generate(&engine, bits, &mut rng),
                Err(Error::InvalidBitLength { .. })
            ));
        }
    }

    #[test]
    fn demonstration_run() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(6));
        let transcript = run(&engine, 64, &mut rng).unwrap();

        assert_eq!(transcript.to_bob.recovered, BigUint::from(ALICE_MESSAGE));
        assert_eq!(transcript.to_alice.recovered, BigUint::from(BOB_REPLY));
        assert_ne!(transcript.alice.public_key(), transcript.bob.public_key());
    }
}
