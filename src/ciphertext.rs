// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::ops::Deref;

use num_bigint_dig::BigUint;

/// A ciphertext that is a single residue (RSA and the commutative scheme).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    value: BigUint,
}

impl Ciphertext {
    pub fn new(value: BigUint) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Big-endian bytes of the residue.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.value.to_bytes_be()
    }
}

impl Deref for Ciphertext {
    type Target = BigUint;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> From<T> for Ciphertext
where
    T: AsRef<[u8]>,
{
    fn from(data: T) -> Self {
        Self { value: BigUint::from_bytes_be(data.as_ref()) }
    }
}

impl std::fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.value, f)
    }
}
