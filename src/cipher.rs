// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repeating-key XOR keyed by an integer, used to show a Diffie-Hellman session
//! key in action. It offers no confidentiality of its own.

use num_bigint_dig::BigUint;
use num_traits::Zero;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, Result};

/// Stateful interface for incremental cryptographic processing.
///
/// Implementations accept input in chunks via [`update`](Stream::update) and
/// produce any immediately available output. Remaining buffered state is
/// returned by [`finalize`](Stream::finalize).
pub trait Stream {
    /// Processes the next chunk of input data.
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>>;

    /// Completes processing and returns any remaining output.
    fn finalize(self) -> Result<Vec<u8>>;
}

/// Minimal big-endian byte expansion of `key`: ⌈bits(key) / 8⌉ bytes.
///
/// A zero key has no bytes and is rejected with [`Error::EmptyKey`].
pub fn key_bytes(key: &BigUint) -> Result<Vec<u8>> {
    if key.is_zero() {
        return Err(Error::EmptyKey);
    }
    Ok(key.to_bytes_be())
}

/// `out[i] = data[i] ^ key_bytes[i mod len]`.
///
/// Self-inverse: applying it twice with the same key returns the input.
pub fn xor_crypt<D: AsRef<[u8]>>(data: D, key: &BigUint) -> Result<Vec<u8>> {
    let mut stream = XorStream::new(key)?;
    let mut out = stream.update(data)?;
    out.extend(stream.finalize()?);
    Ok(out)
}

/// Incremental form of [`xor_crypt`].
///
/// Keeps the key offset across calls, so splitting the input into arbitrary
/// chunks gives the same output as a single call.
#[allow(missing_debug_implementations)]
#[derive(Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct XorStream {
    key: Vec<u8>,
    position: usize,
}

impl XorStream {
    pub fn new(key: &BigUint) -> Result<Self> {
        Ok(Self { key: key_bytes(key)?, position: 0 })
    }
}

impl Stream for XorStream {
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>> {
        let key_len = self.key.len();
        let out = data
            .as_ref()
            .iter()
            .enumerate()
            .map(|(i, byte)| byte ^ self.key[(self.position + i) % key_len])
            .collect::<Vec<u8>>();

        self.position = (self.position + out.len()) % key_len;
        Ok(out)
    }

    /// Nothing is ever buffered, so this is always empty.
    fn finalize(self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
