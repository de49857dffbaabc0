// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Classical public-key schemes
//!
//! Two simulated parties, Alice and Bob, run four textbook protocols over a
//! shared number-theory engine:
//!
//! - [`scheme::dh`]: Diffie-Hellman key agreement, then XOR under the session key
//! - [`scheme::elgamal`]: ElGamal encryption with a verified primitive root
//! - [`scheme::rsa`]: RSA with a random public exponent
//! - [`scheme::commutative`]: single-exponent encryption modulo a prime
//!
//! The engine ([`Engine`]) provides Miller-Rabin primality testing, random
//! prime generation, extended-Euclid inversion and primitive-root search.
//!
//! ## Security
//!
//! This is a teaching toolkit. Arithmetic is not constant-time, messages are
//! unpadded integers, and the default random source ([`rng::DemoRng`]) is not
//! cryptographically secure. Do not use any of it to protect real data.
//!
//! ## Example
//!
//! ```rust,no_run
//! use classic_pkc::{Engine, rng::demo_rng, scheme::rsa};
//!
//! let engine = Engine::new();
//! let mut rng = demo_rng(Some(7));
//!
//! let transcript = rsa::run(&engine, 64, &mut rng).expect("rsa demonstration failed");
//! assert_eq!(transcript.to_bob.recovered, transcript.to_bob.message);
//! ```

pub mod arith;
pub mod cipher;
mod ciphertext;
mod engine;
mod error;
pub mod group;
pub mod prime;
pub mod rng;
pub mod scheme;

pub use arith::{ExtendedEuclid, ModularInverter};
pub use cipher::{Stream, XorStream, xor_crypt};
pub use ciphertext::*;
pub use engine::*;
pub use error::*;
pub use prime::{MillerRabin, PrimalityOracle};
pub use scheme::{Decrypt, Delivery, Encrypt, SecretExponent, validate_bit_length};
