#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;

use classic_pkc::{Error, xor_crypt};

fuzz_target!(|input: (&[u8], &[u8])| {
    let (key_bytes, data) = input;
    let key = BigUint::from_bytes_be(key_bytes);

    match xor_crypt(data, &key) {
        Ok(encrypted) => {
            assert_eq!(encrypted.len(), data.len());
            let decrypted = xor_crypt(&encrypted, &key).expect("key accepted once must be accepted again");
            assert_eq!(decrypted, data, "XOR is not an involution for key {key}");
        }
        Err(Error::EmptyKey) => assert!(key_bytes.iter().all(|&b| b == 0)),
        Err(e) => panic!("unexpected error: {e}"),
    }
});
