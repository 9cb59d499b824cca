#![no_main]
use libfuzzer_sys::fuzz_target;

use notacalc::{evaluate, Notation};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = evaluate(s, Notation::Infix);
        let _ = evaluate(s, Notation::Prefix);
        let _ = evaluate(s, Notation::Postfix);
    }
});
