#![doc(html_root_url = "https://docs.rs/notacalc/0.3.0")]
//! Notacalc is an exact arithmetic evaluator for integer expressions written in infix,
//! prefix, or postfix notation.
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use notacalc::{evaluate, Notation};
//! let outcome = evaluate("2 + 3 * 4", Notation::Infix);
//! assert_eq!(outcome.to_string(), "14");
//! let outcome = evaluate("2 3 4 * +", Notation::Postfix);
//! assert_eq!(outcome.to_string(), "14");
//! let outcome = evaluate("+ 2 * 3 4", Notation::Prefix);
//! assert_eq!(outcome.to_string(), "14");
//! #
//! #     Ok(())
//! # }
//! ```
//! Numbers are rationals with arbitrary precision. Hence, division is exact and
//! there is no overflow.
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use notacalc::{evaluate_infix, Number};
//! let x = evaluate_infix("7 / 2 - 1 / 6")?;
//! assert_eq!(x, Number::new(10.into(), 3.into()));
//! #
//! #     Ok(())
//! # }
//! ```
//!
//! ## Infix grammar
//!
//! Integer literals, `+`, `-`, `*`, `/`, and parentheses. Multiplication and division bind
//! stronger than addition and subtraction, all binary operators are left-associative.
//! A `-` that is not used as binary operator is a unary minus which binds stronger than
//! any binary operator. Spaces and tabs are ignored.
//!
//! A `-` directly followed by a digit is always part of a negative literal. Thus, `3 - 4`
//! is a subtraction but `3-4` consists of the two numbers `3` and `-4` and is reported as
//! [`SyntaxError`](ErrorKind::SyntaxError).
//!
//! ## Prefix and postfix
//!
//! Atoms are separated by whitespace. Since the position of the operators encodes the grouping,
//! there are neither parentheses nor priorities. Exactly one value must be left at the end.
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use notacalc::{evaluate_postfix, evaluate_prefix, ErrorKind};
//! assert_eq!(evaluate_postfix("10 4 -")?, evaluate_prefix("- 10 4")?);
//! assert_eq!(
//!     evaluate_postfix("1 2 3 +").unwrap_err().kind,
//!     ErrorKind::InvalidExpressionError
//! );
//! #
//! #     Ok(())
//! # }
//! ```
//!
//! ## Expression trees
//!
//! Infix expressions can be parsed into a tree that can be evaluated or rendered in any of the
//! three notations.
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! #
//! use notacalc::{parse, tokenize};
//! let tokens = tokenize("(1 + 2) * -(3)")?;
//! let tree = parse(&tokens)?.unwrap();
//! assert_eq!(tree.to_postfix(), "1 2 + 0 3 - *");
//! assert_eq!(tree.to_prefix(), "* + 1 2 - 0 3");
//! assert_eq!(tree.to_string(), "(1 + 2) * - 3");
//! #
//! #     Ok(())
//! # }
//! ```
//!
//! ## Serialization
//!
//! With the feature `serde`, notations, error kinds, and outcomes can be serialized.

mod calculate;
mod expression;
mod linear;
pub mod number;
mod operators;
mod parser;
mod result;
#[cfg(feature = "serde")]
mod serde;

pub use {
    calculate::{evaluate, evaluate_infix, evaluate_simple, EvalOutcome, Notation},
    expression::{eval_tokens, parse, Node, MAX_DEPTH},
    linear::{evaluate_postfix, evaluate_prefix},
    number::Number,
    operators::{BinOp, BinaryOperator, Operator, DEFAULT_OPERATORS},
    parser::{check_token_preconditions, tokenize, Token, TokenVec},
    result::{CalcError, CalcResult, ErrorKind},
};
