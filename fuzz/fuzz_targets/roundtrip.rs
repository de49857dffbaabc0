#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;
use std::sync::OnceLock;

use classic_pkc::rng::demo_rng;
use classic_pkc::scheme::commutative::CommutativeKeyPair;
use classic_pkc::scheme::rsa::RsaKeyPair;
use classic_pkc::{Ciphertext, Decrypt, Encrypt, Engine, Error};

static RSA: OnceLock<RsaKeyPair> = OnceLock::new();
static COMMUTATIVE: OnceLock<CommutativeKeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let engine = Engine::new();
    let rsa = RSA.get_or_init(|| {
        RsaKeyPair::generate(&engine, 64, &mut demo_rng(Some(1))).expect("rsa key generation failed")
    });
    let commutative = COMMUTATIVE.get_or_init(|| {
        let mut rng = demo_rng(Some(2));
        let p = engine.random_prime(64, &mut rng).expect("prime generation failed");
        CommutativeKeyPair::generate(&engine, &p, &mut rng).expect("key generation failed")
    });

    let max_bytes = 9;
    let message = BigUint::from_bytes_be(if data.len() > max_bytes { &data[..max_bytes] } else { data });
    let mut rng = demo_rng(Some(0));

    match rsa.encrypt(&message, &mut rng) {
        Ok(c) => {
            // ciphertexts travel as big-endian bytes
            let received = Ciphertext::from(c.to_bytes());
            assert_eq!(received, c);
            assert_eq!(rsa.decrypt(&received).expect("rsa decryption failed"), message);
        }
        Err(Error::MessageOutOfRange) => assert!(&message >= rsa.public_key().n()),
        Err(e) => panic!("unexpected rsa error: {e}"),
    }

    match commutative.encrypt(&message, &mut rng) {
        Ok(c) => {
            let received = Ciphertext::from(c.to_bytes());
            assert_eq!(commutative.decrypt(&received).expect("decryption failed"), message);
        }
        Err(Error::MessageOutOfRange) => assert!(&message >= commutative.public_key().modulus()),
        Err(e) => panic!("unexpected commutative error: {e}"),
    }
});
