use crate::expression::eval_tokens;
use crate::linear;
use crate::number::{format_number, parse_decimal, Number};
use crate::operators::BinaryOperator;
use crate::parser::tokenize;
use crate::{calc_err, format_calc_err, CalcError, CalcResult, ErrorKind};
use log::debug;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Notation of an expression, i.e., where operators are placed relative to their operands.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum Notation {
    /// `3 + 4`, precedence and parentheses decide the grouping.
    #[default]
    Infix,
    /// `+ 3 4`, evaluated from right to left with an operand stack.
    Prefix,
    /// `3 4 +`, evaluated from left to right with an operand stack.
    Postfix,
}

impl Notation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notation::Infix => "infix",
            Notation::Prefix => "prefix",
            Notation::Postfix => "postfix",
        }
    }
}

impl Display for Notation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Notation {
    type Err = CalcError;
    /// Accepts `infix`, `prefix`, `postfix` in any case, as well as `pn` for Polish and
    /// `rpn` for reverse Polish notation.
    fn from_str(s: &str) -> CalcResult<Notation> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infix" => Ok(Notation::Infix),
            "prefix" | "pn" => Ok(Notation::Prefix),
            "postfix" | "rpn" => Ok(Notation::Postfix),
            _ => Err(format_calc_err!(InvalidInputError, "unknown notation '{}'", s)),
        }
    }
}

/// Outcome of an evaluation as consumed by a user interface. Either a number or an error
/// with kind and message, never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalOutcome {
    Ok(Number),
    Err(CalcError),
}

impl EvalOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, EvalOutcome::Ok(_))
    }
    pub fn value(&self) -> Option<&Number> {
        match self {
            EvalOutcome::Ok(x) => Some(x),
            EvalOutcome::Err(_) => None,
        }
    }
    pub fn error(&self) -> Option<&CalcError> {
        match self {
            EvalOutcome::Ok(_) => None,
            EvalOutcome::Err(e) => Some(e),
        }
    }
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(|e| e.kind)
    }
    pub fn into_result(self) -> CalcResult<Number> {
        self.into()
    }
}

impl From<CalcResult<Number>> for EvalOutcome {
    fn from(res: CalcResult<Number>) -> Self {
        match res {
            Ok(x) => EvalOutcome::Ok(x),
            Err(e) => EvalOutcome::Err(e),
        }
    }
}

impl From<EvalOutcome> for CalcResult<Number> {
    fn from(outcome: EvalOutcome) -> Self {
        match outcome {
            EvalOutcome::Ok(x) => Ok(x),
            EvalOutcome::Err(e) => Err(e),
        }
    }
}

impl Display for EvalOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            EvalOutcome::Ok(x) => write!(f, "{}", format_number(x)),
            EvalOutcome::Err(e) => write!(f, "{e}"),
        }
    }
}

/// Tokenizes, parses, and evaluates an infix expression.
///
/// # Errors
///
/// [`LexError`](ErrorKind::LexError), [`SyntaxError`](ErrorKind::SyntaxError),
/// [`EmptyInputError`](ErrorKind::EmptyInputError), or
/// [`DivisionByZero`](ErrorKind::DivisionByZero).
///
pub fn evaluate_infix(text: &str) -> CalcResult<Number> {
    let tokens = tokenize(text)?;
    eval_tokens(&tokens)
}

/// Evaluates `text` in the given notation. Every failure is returned as
/// [`EvalOutcome::Err`](EvalOutcome::Err), nothing is thrown at you.
///
/// ```rust
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// #
/// use notacalc::{evaluate, ErrorKind, Notation};
/// let outcome = evaluate("(2 + 3) * 4", Notation::Infix);
/// assert_eq!(outcome.to_string(), "20");
/// let outcome = evaluate("7 2 /", Notation::Postfix);
/// assert_eq!(outcome.to_string(), "3.5");
/// let outcome = evaluate("/ 1 0", Notation::Prefix);
/// assert_eq!(outcome.error_kind(), Some(ErrorKind::DivisionByZero));
/// #
/// #     Ok(())
/// # }
/// ```
pub fn evaluate(text: &str, notation: Notation) -> EvalOutcome {
    debug!("evaluating '{}' in {} notation", text, notation);
    let res = match notation {
        Notation::Infix => evaluate_infix(text),
        Notation::Prefix => linear::evaluate_prefix(text),
        Notation::Postfix => linear::evaluate_postfix(text),
    };
    match &res {
        Ok(x) => debug!("'{}' evaluated to {}", text, x),
        Err(e) => debug!("'{}' failed with {}", text, e),
    }
    res.into()
}

/// Two-operand mode. The operands are decimal numbers like `2.5` or `-1e3` and `op`
/// is one of `+ - * /`.
///
/// # Errors
///
/// [`InvalidInputError`](ErrorKind::InvalidInputError) if an operand is not numeric or the
/// operator is unknown, [`DivisionByZero`](ErrorKind::DivisionByZero) for `/` with zero `b`.
///
pub fn evaluate_simple(a: &str, b: &str, op: &str) -> EvalOutcome {
    debug!("evaluating '{}' {} '{}'", a, op, b);
    let res = || -> CalcResult<Number> {
        let a = parse_decimal(a)?;
        let b = parse_decimal(b)?;
        let op = BinaryOperator::from_repr(op.trim())
            .ok_or_else(|| calc_err!(InvalidInputError, "operator must be one of + - * /"))?;
        op.apply(&a, &b)
    };
    res().into()
}

#[cfg(test)]
use crate::number::from_integer;

#[test]
fn test_notation() {
    assert_eq!("Infix".parse::<Notation>().unwrap(), Notation::Infix);
    assert_eq!(" PREFIX ".parse::<Notation>().unwrap(), Notation::Prefix);
    assert_eq!("rpn".parse::<Notation>().unwrap(), Notation::Postfix);
    assert_eq!("pn".parse::<Notation>().unwrap(), Notation::Prefix);
    assert!("sideways".parse::<Notation>().is_err());
    for notation in [Notation::Infix, Notation::Prefix, Notation::Postfix] {
        assert_eq!(notation.to_string().parse::<Notation>().unwrap(), notation);
    }
    assert_eq!(Notation::default(), Notation::Infix);
}

#[test]
fn test_evaluate() {
    let seven = EvalOutcome::Ok(from_integer(7.into()));
    assert_eq!(evaluate("3 + 4", Notation::Infix), seven);
    assert_eq!(evaluate("+ 3 4", Notation::Prefix), seven);
    assert_eq!(evaluate("3 4 +", Notation::Postfix), seven);
    assert_eq!(evaluate("3 4 +", Notation::Infix).error_kind(), Some(ErrorKind::SyntaxError));
    assert_eq!(evaluate("", Notation::Infix).error_kind(), Some(ErrorKind::EmptyInputError));
    assert_eq!(evaluate(" \t", Notation::Infix).error_kind(), Some(ErrorKind::EmptyInputError));
    assert_eq!(evaluate("1 $ 2", Notation::Infix).error_kind(), Some(ErrorKind::LexError));
    assert_eq!(
        evaluate("", Notation::Postfix).error_kind(),
        Some(ErrorKind::InvalidExpressionError)
    );
    assert!(evaluate("1 / 3", Notation::Infix).is_ok());
    assert_eq!(evaluate("1 / 3", Notation::Infix).to_string(), "0.333333333333");
}

#[test]
fn test_evaluate_simple() {
    assert_eq!(evaluate_simple("2", "3", "+").to_string(), "5");
    assert_eq!(evaluate_simple("2.5", "2", "*").to_string(), "5");
    assert_eq!(evaluate_simple(" 1 ", "4", "/").to_string(), "0.25");
    assert_eq!(evaluate_simple("0.1", "0.2", "+").to_string(), "0.3");
    assert_eq!(evaluate_simple("1", "3", "-").to_string(), "-2");
    assert_eq!(
        evaluate_simple("abc", "2", "+").error_kind(),
        Some(ErrorKind::InvalidInputError)
    );
    assert_eq!(
        evaluate_simple("1", "", "+").error_kind(),
        Some(ErrorKind::InvalidInputError)
    );
    assert_eq!(
        evaluate_simple("1", "2", "%").error_kind(),
        Some(ErrorKind::InvalidInputError)
    );
    assert_eq!(
        evaluate_simple("1", "0.0", "/").error_kind(),
        Some(ErrorKind::DivisionByZero)
    );
}
