// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

/// Errors that can occur during key generation, encryption and key agreement.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid bit length {bits}: {reason}")]
    InvalidBitLength { bits: usize, reason: &'static str },

    #[error("Miller-Rabin needs at least one round")]
    InvalidRounds,

    #[error("Value has no inverse modulo the given modulus")]
    NoInverse,

    #[error("Modulus must be non-zero")]
    ZeroModulus,

    #[error("Modulus failed the primality test")]
    CompositeModulus,

    #[error("Modulus is too small to sample from [2, modulus - 2]")]
    ModulusTooSmall,

    #[error("{search} search gave up after {attempts} attempts")]
    SearchExhausted { search: &'static str, attempts: u64 },

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Message must be smaller than the modulus")]
    MessageOutOfRange,

    #[error("Ciphertext is invalid for this key")]
    InvalidCiphertext,

    #[error("Stream cipher key must be non-zero")]
    EmptyKey,

    #[error("Session keys derived by the two parties differ")]
    SessionKeyMismatch,

    #[error("Stream cipher round trip did not reproduce the plaintext")]
    PlaintextMismatch,

    #[error("Round trip failed: sent {expected}, recovered {actual}")]
    RoundTripMismatch { expected: BigUint, actual: BigUint },
}

impl Error {
    /// Whether the error comes from a rejected parameter rather than from a
    /// failed computation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidBitLength { .. } | Self::InvalidRounds)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
