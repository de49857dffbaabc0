// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use rand::Rng;
use tracing::{debug, warn};

use crate::arith::{ExtendedEuclid, ModularInverter};
use crate::prime::{self, MillerRabin, PrimalityOracle};
use crate::{Error, Result, group};

/// Optional ceiling on the retry loops (prime search, generator search,
/// exponent search).
///
/// The default is unbounded: the loops keep sampling until they succeed, which
/// for realistic bit lengths happens quickly. A ceiling turns a runaway search on
/// degenerate parameters into [`Error::SearchExhausted`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimit {
    max_attempts: Option<u64>,
}

impl SearchLimit {
    /// No ceiling.
    pub const UNBOUNDED: Self = Self { max_attempts: None };

    /// Give up after `max_attempts` samples.
    pub const fn attempts(max_attempts: u64) -> Self {
        Self { max_attempts: Some(max_attempts) }
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Called before each sample with the number of samples already drawn.
    #[inline]
    pub(crate) fn check(&self, search: &'static str, attempts: u64) -> Result<()> {
        match self.max_attempts {
            Some(max) if attempts >= max => Err(Error::SearchExhausted { search, attempts }),
            _ => Ok(()),
        }
    }
}

/// The number-theory engine consumed by every scheme.
///
/// Bundles a primality oracle, a modular inverter and the search ceiling so the
/// protocol drivers never pick an algorithm themselves.
#[derive(Debug, Clone, Default)]
pub struct Engine<P = MillerRabin, I = ExtendedEuclid> {
    oracle: P,
    inverter: I,
    limit: SearchLimit,
}

impl Engine {
    /// Engine with default parameters (Miller-Rabin, 5 rounds, unbounded searches).
    pub fn new() -> Self {
        Self::with_parts(MillerRabin::default(), ExtendedEuclid, SearchLimit::UNBOUNDED)
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }
}

impl<P: PrimalityOracle, I: ModularInverter> Engine<P, I> {
    /// Assemble an engine from custom capabilities.
    pub fn with_parts(oracle: P, inverter: I, limit: SearchLimit) -> Self {
        Self { oracle, inverter, limit }
    }

    pub fn oracle(&self) -> &P {
        &self.oracle
    }

    pub fn inverter(&self) -> &I {
        &self.inverter
    }

    pub fn limit(&self) -> SearchLimit {
        self.limit
    }

    pub fn is_probable_prime<R: Rng>(&self, n: &BigUint, rng: &mut R) -> bool {
        self.oracle.is_probable_prime(n, rng)
    }

    pub fn invert(&self, a: &BigUint, modulus: &BigUint) -> Result<BigUint> {
        self.inverter.invert(a, modulus)
    }

    /// Random probable prime of exactly `bits` bits.
    pub fn random_prime<R: Rng>(&self, bits: usize, rng: &mut R) -> Result<BigUint> {
        debug!(bits, "searching for a probable prime");
        prime::random_prime(bits, &self.oracle, self.limit, rng)
    }

    /// Random primitive root modulo the prime `p`.
    pub fn find_generator<R: Rng>(&self, p: &BigUint, rng: &mut R) -> Result<BigUint> {
        group::find_generator(p, self.limit, rng)
    }
}

/// Below this size every modulus is trivially breakable.
const WEAK_BITS: usize = 512;

/// Emitted once per protocol run, not per prime.
pub(crate) fn warn_if_demo_sized(scheme: &'static str, bits: usize) {
    if bits < WEAK_BITS {
        warn!(scheme, bits, "demonstration-sized modulus; not suitable for real keys");
    }
}

/// Builder for an [`Engine`] with configurable parameters.
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    rounds: Option<usize>,
    limit: SearchLimit,
}

impl EngineBuilder {
    /// Create a builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of Miller-Rabin rounds; false positives occur with probability ≤ 4^-rounds.
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Ceiling on every retry loop. `None` keeps them unbounded.
    pub fn max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.limit = match max_attempts {
            Some(n) => SearchLimit::attempts(n),
            None => SearchLimit::UNBOUNDED,
        };
        self
    }

    /// Fails with [`Error::InvalidRounds`] if zero rounds were requested.
    pub fn build(self) -> Result<Engine> {
        let oracle = self.rounds.map(MillerRabin::new).transpose()?.unwrap_or_default();
        Ok(Engine::with_parts(oracle, ExtendedEuclid, self.limit))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::rng::demo_rng;
    use crate::scheme::commutative::CommutativeKeyPair;
    use crate::scheme::rsa::RsaKeyPair;

    #[derive(Debug, Default)]
    struct CountingOracle {
        inner: MillerRabin,
        calls: Cell<usize>,
    }

    impl PrimalityOracle for CountingOracle {
        fn is_probable_prime<R: Rng>(&self, n: &BigUint, rng: &mut R) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.inner.is_probable_prime(n, rng)
        }
    }

    #[derive(Debug, Default)]
    struct CountingInverter {
        calls: Cell<usize>,
    }

    impl ModularInverter for CountingInverter {
        fn invert(&self, a: &BigUint, modulus: &BigUint) -> Result<BigUint> {
            self.calls.set(self.calls.get() + 1);
            ExtendedEuclid.invert(a, modulus)
        }
    }

    /// Declares everything composite.
    #[derive(Debug)]
    struct RejectAll;

    impl PrimalityOracle for RejectAll {
        fn is_probable_prime<R: Rng>(&self, _n: &BigUint, _rng: &mut R) -> bool {
            false
        }
    }

    fn counting_engine() -> Engine<CountingOracle, CountingInverter> {
        Engine::with_parts(CountingOracle::default(), CountingInverter::default(), SearchLimit::UNBOUNDED)
    }

    #[test]
    fn builder_defaults() {
        let engine = Engine::new();
        assert_eq!(engine.oracle().rounds(), MillerRabin::DEFAULT_ROUNDS);
        assert_eq!(engine.limit(), SearchLimit::UNBOUNDED);
    }

    #[test]
    fn builder_overrides() {
        let engine = Engine::builder().rounds(12).max_attempts(Some(40)).build().unwrap();
        assert_eq!(engine.oracle().rounds(), 12);
        assert_eq!(engine.limit().max_attempts(), Some(40));
    }

    #[test]
    fn limit_check_counts_attempts() {
        let limit = SearchLimit::attempts(3);
        assert!(limit.check("prime", 2).is_ok());
        assert_eq!(
            limit.check("prime", 3),
            Err(Error::SearchExhausted { search: "prime", attempts: 3 })
        );
        assert!(SearchLimit::UNBOUNDED.check("prime", u64::MAX).is_ok());
    }

    #[test]
    fn ceiling_surfaces_exhaustion() {
        // a 1-bit request is rejected outright, so force exhaustion with a zero ceiling
        let engine = Engine::builder().max_attempts(Some(0)).build().unwrap();
        let mut rng = demo_rng(Some(5));
        assert!(matches!(
            engine.random_prime(32, &mut rng),
            Err(Error::SearchExhausted { search: "prime", attempts: 0 })
        ));
    }

    #[test]
    fn zero_rounds_are_rejected_by_the_builder() {
        assert!(matches!(Engine::builder().rounds(0).build(), Err(Error::InvalidRounds)));
        assert!(Engine::builder().rounds(1).build().is_ok());
    }

    #[test]
    fn rsa_key_generation_goes_through_custom_capabilities() {
        let engine = counting_engine();
        let mut rng = demo_rng(Some(8));
        let pair = RsaKeyPair::generate(&engine, 32, &mut rng).unwrap();

        // at least one test per prime, and d is the only inverse computed
        assert!(engine.oracle().calls.get() >= 2);
        assert_eq!(engine.inverter().calls.get(), 1);

        let mut rng = demo_rng(Some(0));
        let message = BigUint::from(42u32);
        let c = crate::Encrypt::encrypt(&pair, &message, &mut rng).unwrap();
        assert_eq!(crate::Decrypt::decrypt(&pair, &c).unwrap(), message);
    }

    #[test]
    fn commutative_key_generation_goes_through_custom_capabilities() {
        let engine = counting_engine();
        let mut rng = demo_rng(Some(9));
        let p = BigUint::from(65_521u32);
        CommutativeKeyPair::generate(&engine, &p, &mut rng).unwrap();

        // the supplied modulus is checked once, then every candidate exponent is inverted
        assert_eq!(engine.oracle().calls.get(), 1);
        assert!(engine.inverter().calls.get() >= 1);
    }

    #[test]
    fn custom_oracle_decides_primality() {
        let engine = Engine::with_parts(RejectAll, ExtendedEuclid, SearchLimit::attempts(16));
        let mut rng = demo_rng(Some(10));

        assert!(matches!(
            CommutativeKeyPair::generate(&engine, &BigUint::from(65_521u32), &mut rng),
            Err(Error::CompositeModulus)
        ));
        assert!(matches!(
            RsaKeyPair::generate(&engine, 32, &mut rng),
            Err(Error::SearchExhausted { search: "prime", attempts: 16 })
        ));
    }
}
