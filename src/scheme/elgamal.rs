// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ElGamal encryption over ℤ*ₚ with a verified primitive root.

use num_bigint_dig::BigUint;
use num_traits::Zero;
use rand::Rng;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{BOB_REPLY, Decrypt, Delivery, Encrypt, SecretExponent, ensure_prime_modulus};
use crate::arith::{ModularInverter, mod_pow};
use crate::engine::{Engine, warn_if_demo_sized};
use crate::prime::PrimalityOracle;
use crate::rng::sample_scalar;
use crate::{Error, Result};

/// Public key `(p, g, y = g^x mod p)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElGamalPublicKey {
    modulus: BigUint,
    generator: BigUint,
    value: BigUint,
}

impl ElGamalPublicKey {
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// `y = g^x mod p`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }
}

/// Secret exponent `x` together with the public parameters it belongs to.
#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct ElGamalPrivateKey {
    #[zeroize(skip)]
    public_key: ElGamalPublicKey,
    exponent: SecretExponent,
}

impl ElGamalPrivateKey {
    pub fn public_key(&self) -> &ElGamalPublicKey {
        &self.public_key
    }

    pub fn exponent(&self) -> &SecretExponent {
        &self.exponent
    }
}

/// The ciphertext pair `(c1, c2) = (g^k, m·y^k) mod p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElGamalCiphertext {
    pub c1: BigUint,
    pub c2: BigUint,
}

#[allow(missing_debug_implementations)]
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct ElGamalKeyPair {
    #[zeroize(skip)]
    public: ElGamalPublicKey,
    secret: ElGamalPrivateKey,
}

impl ElGamalKeyPair {
    /// Generates a key pair over the prime `modulus`.
    ///
    /// A fresh primitive root is searched for every key pair, which factors
    /// `p - 1` by trial division. Keep `modulus` demonstration-sized.
    pub fn generate<P, I, R>(engine: &Engine<P, I>, modulus: &BigUint, rng: &mut R) -> Result<Self>
    where
        P: PrimalityOracle,
        I: ModularInverter,
        R: Rng,
    {
        ensure_prime_modulus(engine, modulus, rng)?;

        let generator = engine.find_generator(modulus, rng)?;
        let exponent = sample_scalar(rng, modulus)?;
        let value = mod_pow(&generator, &exponent, modulus);

        let public = ElGamalPublicKey { modulus: modulus.clone(), generator, value };
        let secret = ElGamalPrivateKey {
            public_key: public.clone(),
            exponent: SecretExponent::new(exponent),
        };

        Ok(Self { public, secret })
    }

    pub fn public_key(&self) -> &ElGamalPublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &ElGamalPrivateKey {
        &self.secret
    }
}

impl Encrypt for ElGamalPublicKey {
    type Ciphertext = ElGamalCiphertext;

    /// Draws a fresh ephemeral `k ∈ [2, p - 2]` on every call.
    fn encrypt<R: Rng>(&self, message: &BigUint, rng: &mut R) -> Result<ElGamalCiphertext> {
        if message >= &self.modulus {
            return Err(Error::MessageOutOfRange);
        }

        let k = sample_scalar(rng, &self.modulus)?;

        let c1 = mod_pow(&self.generator, &k, &self.modulus);
        let c2 = (message * mod_pow(&self.value, &k, &self.modulus)) % &self.modulus;

        Ok(ElGamalCiphertext { c1, c2 })
    }
}

impl Decrypt for ElGamalPrivateKey {
    type Ciphertext = ElGamalCiphertext;

    fn decrypt(&self, ciphertext: &ElGamalCiphertext) -> Result<BigUint> {
        let p = &self.public_key.modulus;
        if ciphertext.c1.is_zero() || &ciphertext.c1 >= p || &ciphertext.c2 >= p {
            return Err(Error::InvalidCiphertext);
        }

        // s⁻¹ = s^(p-2) by Fermat, valid because p is prime
        let s = mod_pow(&ciphertext.c1, self.exponent.expose(), p);
        let s_inv = mod_pow(&s, &(p - BigUint::from(2u32)), p);

        Ok((&ciphertext.c2 * s_inv) % p)
    }
}

impl Encrypt for ElGamalKeyPair {
    type Ciphertext = ElGamalCiphertext;

    fn encrypt<R: Rng>(&self, message: &BigUint, rng: &mut R) -> Result<ElGamalCiphertext> {
        self.public.encrypt(message, rng)
    }
}

impl Decrypt for ElGamalKeyPair {
    type Ciphertext = ElGamalCiphertext;

    fn decrypt(&self, ciphertext: &ElGamalCiphertext) -> Result<BigUint> {
        self.secret.decrypt(ciphertext)
    }
}

#[allow(missing_debug_implementations)]
#[derive(Clone)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct ElGamalTranscript {
    pub modulus: BigUint,
    pub alice: ElGamalKeyPair,
    pub bob: ElGamalKeyPair,
    /// Bob's reply, encrypted under Alice's key.
    pub to_alice: Delivery<ElGamalCiphertext>,
}

/// Generate a `bits`-bit prime, key pairs for both parties, and have Bob send
/// [`BOB_REPLY`] to Alice.
pub fn run<P, I, R>(engine: &Engine<P, I>, bits: usize, rng: &mut R) -> Result<ElGamalTranscript>
where
    P: PrimalityOracle,
    I: ModularInverter,
    R: Rng,
{
    warn_if_demo_sized("elgamal", bits);
    let modulus = engine.random_prime(bits, rng)?;
    info!(bits, modulus = %modulus, "elgamal modulus ready");

    let alice = ElGamalKeyPair::generate(engine, &modulus, rng)?;
    let bob = ElGamalKeyPair::generate(engine, &modulus, rng)?;

    let to_alice = Delivery::send(BigUint::from(BOB_REPLY), alice.public_key(), alice.private_key(), rng)?;

    info!("elgamal round trip verified");
    Ok(ElGamalTranscript { modulus, alice, bob, to_alice })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{is_generator, prime_factors};
    use crate::rng::demo_rng;

    fn keypair(bits: usize, seed: u64) -> ElGamalKeyPair {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(seed));
        let p = engine.random_prime(bits, &mut rng).unwrap();
        ElGamalKeyPair::generate(&engine, &p, &mut rng).unwrap()
    }

    #[test]
    fn generator_is_primitive_root() {
        let pair = keypair(24, 1);
        let public = pair.public_key();
        let factors = prime_factors(&(public.modulus() - 1u32));
        assert!(is_generator(public.generator(), public.modulus(), &factors));
    }

    #[test]
    fn round_trip_with_fresh_ephemerals() {
        let pair = keypair(32, 2);
        let mut rng = demo_rng(Some(20));
        let p = pair.public_key().modulus().clone();

        let messages = [BigUint::zero(), BigUint::from(1u32), BigUint::from(24u32), &p - 1u32];
        for m in &messages {
            let mut seen = Vec::new();
            for _ in 0..4 {
                let c = pair.encrypt(m, &mut rng).unwrap();
                assert_eq!(&pair.decrypt(&c).unwrap(), m);
                seen.push(c.c1);
            }
            seen.dedup();
            assert!(seen.len() > 1, "ephemeral k must vary between calls");
        }
    }

    #[test]
    fn message_must_be_below_modulus() {
        let pair = keypair(16, 3);
        let mut rng = demo_rng(Some(4));
        let p = pair.public_key().modulus().clone();

        assert_eq!(pair.encrypt(&p, &mut rng), Err(Error::MessageOutOfRange));
    }

    #[test]
    fn malformed_ciphertexts_are_rejected() {
        let pair = keypair(16, 5);
        let p = pair.public_key().modulus().clone();

        let too_large = ElGamalCiphertext { c1: p.clone(), c2: BigUint::from(1u32) };
        let zero_c1 = ElGamalCiphertext { c1: BigUint::zero(), c2: BigUint::from(1u32) };
        assert_eq!(pair.decrypt(&too_large), Err(Error::InvalidCiphertext));
        assert_eq!(pair.decrypt(&zero_c1), Err(Error::InvalidCiphertext));
    }

    #[test]
    fn composite_modulus_is_rejected() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(6));
        let result = ElGamalKeyPair::generate(&engine, &BigUint::from(221u32), &mut rng);
        assert!(matches!(result, Err(Error::CompositeModulus)));
    }

    #[test]
    fn demonstration_run() {
        let engine = Engine::new();
        let mut rng = demo_rng(Some(8));
        let transcript = run(&engine, 16, &mut rng).unwrap();

        assert_eq!(transcript.to_alice.message, BigUint::from(BOB_REPLY));
        assert_eq!(transcript.to_alice.recovered, BigUint::from(BOB_REPLY));
        assert_eq!(transcript.alice.public_key().modulus(), &transcript.modulus);
        assert_eq!(transcript.bob.public_key().modulus(), &transcript.modulus);
    }
}
