#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;

use classic_pkc::Error;
use classic_pkc::arith::{gcd, mod_inverse};

fuzz_target!(|input: (&[u8], &[u8])| {
    let a = BigUint::from_bytes_be(input.0);
    let m = BigUint::from_bytes_be(input.1);
    let one = BigUint::from(1u32);

    match mod_inverse(&a, &m) {
        Ok(inv) => {
            assert!(inv < m);
            if m > one {
                assert_eq!((&a * &inv) % &m, one, "a={a} m={m}");
            }
        }
        Err(Error::NoInverse) => assert_ne!(gcd(&a, &m), one),
        Err(Error::ZeroModulus) => assert_eq!(m, BigUint::from(0u32)),
        Err(e) => panic!("unexpected error: {e}"),
    }
});
