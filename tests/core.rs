mod utils;
use itertools::iproduct;
use notacalc::{
    evaluate, evaluate_infix, evaluate_postfix, evaluate_prefix, evaluate_simple, number, parse,
    tokenize, CalcResult, ErrorKind, EvalOutcome, Notation, Number,
};
use rand::{seq::SliceRandom, Rng};
use regex::Regex;
use std::fs::{self, File};
use std::io::{self, BufRead};
use utils::{assert_float_eq, assert_kind, assert_outcome_eq, int, rat};

#[test]
fn test_version() {
    // make sure the version strings in the Cargo.toml and lib.rs coincide
    let file = File::open("src/lib.rs").unwrap();
    let version_line_lib = io::BufReader::new(file)
        .lines()
        .find(|line| line.as_ref().unwrap().contains("html_root_url"))
        .unwrap()
        .unwrap();
    let re_version = Regex::new(r#"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}"#).unwrap();
    let match_lib = re_version.find(&version_line_lib).unwrap().as_str();

    let toml_string = fs::read_to_string("Cargo.toml").unwrap();
    let cargo_toml: toml::Value = toml::from_str(&toml_string).unwrap();
    let package = cargo_toml.get("package").unwrap().as_table().unwrap();
    let version = package.get("version").unwrap().as_str().unwrap();
    assert_eq!(match_lib, version);
}

#[test]
fn test_binary_ops_random() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let a: i64 = rng.gen_range(-1_000_000..1_000_000);
        let b: i64 = rng.gen_range(-1_000_000..1_000_000);
        let (ai, bi) = (a as i128, b as i128);
        for (op, reference) in [("+", ai + bi), ("-", ai - bi), ("*", ai * bi)] {
            let text = format!("{a} {op} {b}");
            let outcome = evaluate(&text, Notation::Infix);
            assert_eq!(outcome.to_string(), reference.to_string(), "{text}");
            let outcome = evaluate(&format!("{a} {b} {op}"), Notation::Postfix);
            assert_eq!(outcome.to_string(), reference.to_string(), "{text}");
            let outcome = evaluate(&format!("{op} {a} {b}"), Notation::Prefix);
            assert_eq!(outcome.to_string(), reference.to_string(), "{text}");
        }
        let text = format!("{a} / 0");
        assert_kind(&evaluate(&text, Notation::Infix), ErrorKind::DivisionByZero, &text);
        if b != 0 {
            let text = format!("{a} / {b}");
            assert_outcome_eq(&evaluate(&text, Notation::Infix), &rat(a, b), &text);
            let x = evaluate_infix(&text).unwrap();
            assert_float_eq(
                number::to_f64(&x).unwrap(),
                a as f64 / b as f64,
                1e-12,
                1e-12,
                &text,
            );
        }
    }
}

#[test]
fn test_precedence() {
    fn test(text: &str, reference: i64) {
        assert_outcome_eq(&evaluate(text, Notation::Infix), &int(reference), text);
    }
    test("2 + 3 * 4", 14);
    test("(2 + 3) * 4", 20);
    test("2 * 3 + 4", 10);
    test("2 * (3 + 4)", 14);
    test("20 / 5 / 2 * 3", 6);
    test("20 - 5 - 2 + 3", 16);
    test("20 - (5 - (2 + 3))", 20);
    test("1 + 2 * 3 - 4 / 2", 5);
    test("((1 + 2) * (3 - 4)) / -3", 1);
}

#[test]
fn test_unary_minus() {
    fn test(text: &str, reference: i64) {
        assert_outcome_eq(&evaluate(text, Notation::Infix), &int(reference), text);
    }
    test("-(3+4)", -7);
    test("-3 + 4", 1);
    test("- 3 + 4", 1);
    test("- (2 * 3) * 2", -12);
    test("- - 5", 5);
    test("-(-(-(1)))", -1);
    test("4 * -(2 + 1)", -12);
    test("4 - -2", 6);
    test("-0", 0);
}

#[test]
fn test_fused_minus() {
    assert_kind(&evaluate("3-4", Notation::Infix), ErrorKind::SyntaxError, "3-4");
    assert_kind(&evaluate("(1)-4", Notation::Infix), ErrorKind::SyntaxError, "(1)-4");
    assert_outcome_eq(&evaluate("3 - 4", Notation::Infix), &int(-1), "3 - 4");
    assert_outcome_eq(&evaluate("3 -(4)", Notation::Infix), &int(-1), "3 -(4)");
    assert_outcome_eq(&evaluate("-3 4 +", Notation::Postfix), &int(1), "-3 4 +");
    assert_outcome_eq(&evaluate("+ -3 4", Notation::Prefix), &int(1), "+ -3 4");
}

#[test]
fn test_notation_equivalence() {
    for (infix, prefix, postfix) in [
        ("3 + 4", "+ 3 4", "3 4 +"),
        ("5 - 2 * 3", "- 5 * 2 3", "5 2 3 * -"),
        ("(5 - 2) * 3", "* - 5 2 3", "5 2 - 3 *"),
        ("7 / 2", "/ 7 2", "7 2 /"),
        ("1 - 2 - 3", "- - 1 2 3", "1 2 - 3 -"),
        ("1 - (2 - 3)", "- 1 - 2 3", "1 2 3 - -"),
    ] {
        let reference = evaluate(infix, Notation::Infix);
        assert!(reference.is_ok(), "{infix}");
        assert_eq!(evaluate(prefix, Notation::Prefix), reference, "{prefix}");
        assert_eq!(evaluate(postfix, Notation::Postfix), reference, "{postfix}");
    }
}

#[test]
fn test_tree_renderings() -> CalcResult<()> {
    let operands = ["1", "-2", "3", "(4 - 5)", "-(6)"];
    let ops = ["+", "-", "*", "/"];
    for (a, op1, b, op2, c) in iproduct!(operands, ops, operands, ops, operands) {
        let text = format!("{a} {op1} {b} {op2} {c}");
        let tree = match parse(&tokenize(&text)?)? {
            Some(tree) => tree,
            None => panic!("{text} is not empty"),
        };
        let reference: EvalOutcome = tree.eval().into();
        assert_eq!(evaluate(&text, Notation::Infix), reference, "{text}");
        let postfix = tree.to_postfix();
        assert_eq!(evaluate(&postfix, Notation::Postfix), reference, "{postfix}");
        let prefix = tree.to_prefix();
        assert_eq!(evaluate(&prefix, Notation::Prefix), reference, "{prefix}");
        let rendered = tree.to_string();
        assert_eq!(evaluate(&rendered, Notation::Infix), reference, "{rendered}");
    }
    Ok(())
}

#[test]
fn test_linear_errors() {
    assert_kind(&evaluate("+", Notation::Postfix), ErrorKind::InvalidExpressionError, "+");
    assert_kind(&evaluate("+", Notation::Prefix), ErrorKind::InvalidExpressionError, "+");
    assert_kind(
        &evaluate("1 2 3 +", Notation::Postfix),
        ErrorKind::InvalidExpressionError,
        "leftover",
    );
    assert_kind(
        &evaluate("+ 1 2 3", Notation::Prefix),
        ErrorKind::InvalidExpressionError,
        "leftover",
    );
    assert_kind(
        &evaluate("( 1 2 + )", Notation::Postfix),
        ErrorKind::InvalidExpressionError,
        "parens",
    );
    assert_kind(&evaluate("4 0 /", Notation::Postfix), ErrorKind::DivisionByZero, "4 0 /");
    assert_kind(&evaluate("/ 4 0", Notation::Prefix), ErrorKind::DivisionByZero, "/ 4 0");
    assert!(evaluate_postfix("4 2 2 - /").is_err());
    assert!(evaluate_prefix("/ 4 - 2 2").is_err());
}

#[test]
fn test_error_handling() {
    fn test(text: &str, kind: ErrorKind) {
        assert_kind(&evaluate(text, Notation::Infix), kind, text);
    }
    test("", ErrorKind::EmptyInputError);
    test("   \t ", ErrorKind::EmptyInputError);
    test("z+/Q", ErrorKind::LexError);
    test("6-^6", ErrorKind::LexError);
    test("1.5 + 1", ErrorKind::LexError);
    test("5+5-(", ErrorKind::SyntaxError);
    test(")2*(5+5)*3-2)*2", ErrorKind::SyntaxError);
    test("2*(5+5))", ErrorKind::SyntaxError);
    test("+ 3 4", ErrorKind::SyntaxError);
    test("3 4", ErrorKind::SyntaxError);
    test("()", ErrorKind::SyntaxError);
    test("7 / (3 - 3)", ErrorKind::DivisionByZero);
    let err = evaluate("1 / 0", Notation::Infix);
    assert_eq!(err.to_string(), "DivisionByZero: division by zero");
}

#[test]
fn test_long_and_deep_input() {
    let sum = vec!["1"; 300].join(" + ");
    assert_outcome_eq(&evaluate(&sum, Notation::Infix), &int(300), "300 terms");
    let product = vec!["2"; 300].join(" * ");
    let reference = Number::from_integer(num::pow(num::BigInt::from(2), 300));
    assert_outcome_eq(&evaluate(&product, Notation::Infix), &reference, "300 factors");
    let sum = vec!["1"; 200_000].join(" + ");
    assert_outcome_eq(&evaluate(&sum, Notation::Infix), &int(200_000), "200k terms");

    let parens = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert_kind(&evaluate(&parens, Notation::Infix), ErrorKind::SyntaxError, "parens");
    let minuses = format!("{}1", "- ".repeat(200_000));
    assert_kind(&evaluate(&minuses, Notation::Infix), ErrorKind::SyntaxError, "minuses");
    let parens = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    assert_outcome_eq(&evaluate(&parens, Notation::Infix), &int(1), "20 parens");
}

#[test]
fn test_simple() {
    assert_outcome_eq(&evaluate_simple("2", "3", "+"), &int(5), "2 + 3");
    assert_outcome_eq(&evaluate_simple("2.5", "0.5", "-"), &int(2), "2.5 - 0.5");
    assert_outcome_eq(&evaluate_simple("-1.5", "4", "*"), &int(-6), "-1.5 * 4");
    assert_outcome_eq(&evaluate_simple("1", "8", "/"), &rat(1, 8), "1 / 8");
    assert_kind(&evaluate_simple("abc", "2", "+"), ErrorKind::InvalidInputError, "abc");
    assert_kind(&evaluate_simple("2", "1+1", "+"), ErrorKind::InvalidInputError, "1+1");
    assert_kind(&evaluate_simple("2", "0", "/"), ErrorKind::DivisionByZero, "2 / 0");
}

#[test]
fn test_purity() {
    let texts = [
        ("(2 + 3) * 4", Notation::Infix),
        ("1 / 0", Notation::Infix),
        ("3 4 + 2 /", Notation::Postfix),
        ("+ 1", Notation::Prefix),
        ("", Notation::Infix),
    ];
    let first = texts
        .iter()
        .map(|(text, notation)| evaluate(text, *notation))
        .collect::<Vec<_>>();
    let second = texts
        .iter()
        .map(|(text, notation)| evaluate(text, *notation))
        .collect::<Vec<_>>();
    assert_eq!(first, second);

    std::thread::scope(|s| {
        let handles = (0..8)
            .map(|_| {
                s.spawn(|| {
                    texts
                        .iter()
                        .map(|(text, notation)| evaluate(text, *notation))
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), first);
        }
    });
}

#[test]
fn test_big_numbers() {
    let big = "123456789012345678901234567890";
    let outcome = evaluate(&format!("{big} * {big} / {big}"), Notation::Infix);
    assert_eq!(outcome.to_string(), big);
    let outcome = evaluate(&format!("{big} 1 +"), Notation::Postfix);
    assert_eq!(outcome.to_string(), "123456789012345678901234567891");
}

#[test]
fn test_fuzz() {
    let alphabet = [
        "1", "23", "-4", "+", "-", "*", "/", "(", ")", " ", "0", "\t", "x", ".",
    ];
    let mut rng = rand::thread_rng();
    for _ in 0..2000 {
        let len = rng.gen_range(0..20);
        let text = (0..len)
            .map(|_| *alphabet.choose(&mut rng).unwrap())
            .collect::<String>();
        for notation in [Notation::Infix, Notation::Prefix, Notation::Postfix] {
            // must never panic
            let first = evaluate(&text, notation);
            assert_eq!(evaluate(&text, notation), first);
        }
    }
}
