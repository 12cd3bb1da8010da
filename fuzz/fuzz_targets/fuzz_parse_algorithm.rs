#![no_main]

use jwtkit::core::algorithm::{parse_content_encryption, parse_encryption, parse_signing};
use jwtkit::parse_algorithm;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing arbitrary identifiers should never panic
    let _ = parse_signing(data);
    let _ = parse_encryption(data);
    let _ = parse_content_encryption(data);
    let _ = parse_algorithm(data);
});
