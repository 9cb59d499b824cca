use crate::number::{parse_integer, Number};
use crate::operators::BinaryOperator;
use crate::parser::is_integer_atom;
use crate::{calc_err, format_calc_err, CalcResult};
use log::trace;
use smallvec::SmallVec;

/// Number of operands that are kept on the stack before spilling to the heap.
pub const N_OPERANDS_ON_STACK: usize = 16;

type OperandStack = SmallVec<[Number; N_OPERANDS_ON_STACK]>;

/// Direction of the scan over the atoms. The direction also fixes which of the two popped
/// operands is the left one.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum Scan {
    /// Left to right, the operand popped first is the right one.
    Postfix,
    /// Right to left, the operand popped first is the left one.
    Prefix,
}

enum Atom {
    Num(Number),
    Op(BinaryOperator),
}

fn parse_atom(atom: &str) -> CalcResult<Atom> {
    if is_integer_atom(atom) {
        Ok(Atom::Num(parse_integer(atom)?))
    } else if let Some(op) = BinaryOperator::from_repr(atom) {
        Ok(Atom::Op(op))
    } else {
        Err(format_calc_err!(
            InvalidExpressionError,
            "'{}' is neither an integer nor one of + - * /",
            atom
        ))
    }
}

fn eval_linear<'a, I>(atoms: I, scan: Scan) -> CalcResult<Number>
where
    I: Iterator<Item = &'a str>,
{
    let mut stack = OperandStack::new();
    for atom in atoms {
        match parse_atom(atom)? {
            Atom::Num(n) => stack.push(n),
            Atom::Op(op) => {
                let (first, second) = match (stack.pop(), stack.pop()) {
                    (Some(first), Some(second)) => (first, second),
                    _ => {
                        return Err(format_calc_err!(
                            InvalidExpressionError,
                            "operator {} needs two operands",
                            op
                        ))
                    }
                };
                let (a, b) = match scan {
                    Scan::Postfix => (second, first),
                    Scan::Prefix => (first, second),
                };
                stack.push(op.apply(&a, &b)?);
            }
        }
        trace!("{:?} after '{}': {} operand(s)", scan, atom, stack.len());
    }
    match stack.len() {
        1 => stack
            .pop()
            .ok_or_else(|| calc_err!(InvalidExpressionError, "no value left")),
        0 => Err(calc_err!(InvalidExpressionError, "expression has no operands")),
        n => Err(format_calc_err!(
            InvalidExpressionError,
            "{} values are left over, operators are missing",
            n
        )),
    }
}

/// Evaluates an expression in postfix notation (reverse Polish notation) such as `3 4 +`.
/// Atoms are separated by whitespace and scanned from left to right.
///
/// # Errors
///
/// * [`InvalidExpressionError`](crate::ErrorKind::InvalidExpressionError) for unknown atoms,
///   operators with less than two operands, or not exactly one value at the end,
/// * [`DivisionByZero`](crate::ErrorKind::DivisionByZero) for a division by zero.
///
pub fn evaluate_postfix(text: &str) -> CalcResult<Number> {
    eval_linear(text.split_whitespace(), Scan::Postfix)
}

/// Evaluates an expression in prefix notation (Polish notation) such as `+ 3 4`.
/// Atoms are separated by whitespace and scanned from right to left.
///
/// # Errors
///
/// See [`evaluate_postfix`](evaluate_postfix).
///
pub fn evaluate_prefix(text: &str) -> CalcResult<Number> {
    eval_linear(text.split_whitespace().rev(), Scan::Prefix)
}

#[cfg(test)]
use crate::{number::from_integer, ErrorKind};

#[test]
fn test_postfix() {
    fn test(text: &str, reference: i64) {
        assert_eq!(
            evaluate_postfix(text).unwrap(),
            from_integer(reference.into()),
            "{text}"
        );
    }
    test("3 4 +", 7);
    test("42", 42);
    test("-3 4 +", 1);
    test("10 4 -", 6);
    test("2 3 4 * +", 14);
    test("2 3 + 4 *", 20);
    test("  5\t1 2 + 4 * + 3 -  ", 14);
    test("8 2 / 2 /", 2);
    assert_eq!(
        evaluate_postfix("1 3 /").unwrap(),
        Number::new(1.into(), 3.into())
    );
}

#[test]
fn test_prefix() {
    fn test(text: &str, reference: i64) {
        assert_eq!(
            evaluate_prefix(text).unwrap(),
            from_integer(reference.into()),
            "{text}"
        );
    }
    test("+ 3 4", 7);
    test("42", 42);
    test("- 10 4", 6);
    test("+ 2 * 3 4", 14);
    test("* + 2 3 4", 20);
    test("- * / 15 - 7 + 1 1 3 + 2 + 1 1", 5);
    test("/ / 8 2 2", 2);
    test("- 0 -5", 5);
}

#[test]
fn test_linear_err() {
    fn test(text: &str, kind: ErrorKind) {
        assert_eq!(evaluate_postfix(text).unwrap_err().kind, kind, "postfix {text}");
        let reversed = text.split_whitespace().rev().collect::<Vec<_>>().join(" ");
        assert_eq!(
            evaluate_prefix(&reversed).unwrap_err().kind,
            kind,
            "prefix {reversed}"
        );
    }
    test("+", ErrorKind::InvalidExpressionError);
    test("1 +", ErrorKind::InvalidExpressionError);
    test("", ErrorKind::InvalidExpressionError);
    test("   ", ErrorKind::InvalidExpressionError);
    test("1 2", ErrorKind::InvalidExpressionError);
    test("1 2 3 +", ErrorKind::InvalidExpressionError);
    test("1 x +", ErrorKind::InvalidExpressionError);
    test("1.5 2 +", ErrorKind::InvalidExpressionError);
    test("1 2 ^", ErrorKind::InvalidExpressionError);

    // reversing swaps the operands, hence division by zero is checked separately
    for (postfix, prefix) in [("1 0 /", "/ 1 0"), ("1 1 1 - /", "/ 1 - 1 1")] {
        let err = evaluate_postfix(postfix).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = evaluate_prefix(prefix).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    let err = evaluate_postfix("1 2 3 +").unwrap_err();
    assert!(err.msg.contains("2 values are left over"));
    let err = evaluate_postfix("4 hello *").unwrap_err();
    assert!(err.msg.contains("'hello'"));
}
