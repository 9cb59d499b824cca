#![no_main]
use libfuzzer_sys::fuzz_target;

use notacalc::evaluate_simple;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut parts = s.splitn(3, ';');
        if let (Some(a), Some(b), Some(op)) = (parts.next(), parts.next(), parts.next()) {
            let _ = evaluate_simple(a, b, op);
        }
    }
});
