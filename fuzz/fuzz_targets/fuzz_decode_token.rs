#![no_main]

use jwtkit::core::operations::peek_header;
use jwtkit::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = peek_header(data);

    // Arbitrary token text must be rejected, never panic
    let token = SecretValue::from(data);
    let secret = SecretValue::from("k".repeat(32));
    for alg in ["HS256", "none", "dir", "A256KW", "A256GCMKW"] {
        let _ = TokenVerifier::new(alg).verify(&token, &secret);
    }
    let _ = TokenVerifier::new("none").verify(&token, CredentialMode::None);
});
