use notacalc::{ErrorKind, EvalOutcome, Number};

pub fn rat(n: i64, d: i64) -> Number {
    Number::new(n.into(), d.into())
}

pub fn int(n: i64) -> Number {
    rat(n, 1)
}

pub fn assert_outcome_eq(outcome: &EvalOutcome, reference: &Number, msg: &str) {
    match outcome {
        EvalOutcome::Ok(x) => assert_eq!(x, reference, "{msg}"),
        EvalOutcome::Err(e) => panic!("expected {reference} but got error {e}. {msg}"),
    }
}

pub fn assert_kind(outcome: &EvalOutcome, kind: ErrorKind, msg: &str) {
    match outcome {
        EvalOutcome::Ok(x) => panic!("expected {kind} but got value {x}. {msg}"),
        EvalOutcome::Err(e) => assert_eq!(e.kind, kind, "{msg}: {e}"),
    }
}

pub fn assert_float_eq(f1: f64, f2: f64, atol: f64, rtol: f64, msg: &str) {
    if (f1 - f2).abs() >= atol + rtol * f2.abs() {
        println!("Floats not almost equal. {}\nf1: {}\nf2: {}\n", msg, f1, f2);
        unreachable!();
    }
}
