#![no_main]
use libfuzzer_sys::fuzz_target;

use notacalc::{evaluate, parse, tokenize, EvalOutcome, Notation};

// renderings of a parsed tree have to evaluate to the value of the tree
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let tree = match tokenize(s).and_then(|tokens| parse(&tokens)) {
            Ok(Some(tree)) => tree,
            _ => return,
        };
        let reference: EvalOutcome = tree.eval().into();
        assert_eq!(evaluate(&tree.to_string(), Notation::Infix), reference);
        assert_eq!(evaluate(&tree.to_postfix(), Notation::Postfix), reference);
        assert_eq!(evaluate(&tree.to_prefix(), Notation::Prefix), reference);
    }
});
