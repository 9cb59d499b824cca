use crate::number::{checked_div, Number};
use crate::{format_calc_err, CalcError, CalcResult};
use std::fmt::{self, Display, Formatter};

fn make_op_not_available_error(repr: &str, arity: &str) -> CalcError {
    format_calc_err!(SyntaxError, "operator {} not available as {} operator", repr, arity)
}

/// A binary operator that consists of a function pointer and a priority.
#[derive(Copy, Clone, Debug)]
pub struct BinOp {
    /// Implementation of the binary operation, e.g., `|a, b| Ok(a * b)` for multiplication.
    /// Fallible since a division by zero is reported as error.
    pub apply: fn(&Number, &Number) -> CalcResult<Number>,
    /// Priority of the binary operation. A binary operation with a
    /// higher number binds stronger. Operators with equal priority are left-associative.
    pub prio: i32,
}

/// Operator as it appears in the text of an expression.
#[derive(Copy, Clone, Debug)]
pub struct Operator {
    /// Representation of the operator in the string to be parsed, e.g., `-`.
    pub repr: &'static str,
    /// Binary operator that contains a priority besides a function pointer, if available.
    pub bin_op: Option<BinOp>,
    /// Unary operator that does not have an explicit priority. Unary operators have
    /// higher priority than binary operators, e.g., `-(1)*2 == -2`.
    pub unary_op: Option<fn(&Number) -> Number>,
}

fn unwrap_operator<'a, O>(wrapped_op: &'a Option<O>, repr: &str, arity: &str) -> CalcResult<&'a O> {
    wrapped_op
        .as_ref()
        .ok_or_else(|| make_op_not_available_error(repr, arity))
}

impl Operator {
    pub fn bin(&self) -> CalcResult<BinOp> {
        Ok(*unwrap_operator(&self.bin_op, self.repr, "binary")?)
    }
    pub fn unary(&self) -> CalcResult<fn(&Number) -> Number> {
        Ok(*unwrap_operator(&self.unary_op, self.repr, "unary")?)
    }
    pub fn repr(&self) -> &'static str {
        self.repr
    }
    pub fn has_bin(&self) -> bool {
        self.bin_op.is_some()
    }
    pub fn has_unary(&self) -> bool {
        self.unary_op.is_some()
    }
}

fn add(a: &Number, b: &Number) -> CalcResult<Number> {
    Ok(a + b)
}
fn sub(a: &Number, b: &Number) -> CalcResult<Number> {
    Ok(a - b)
}
fn mul(a: &Number, b: &Number) -> CalcResult<Number> {
    Ok(a * b)
}
fn neg(a: &Number) -> Number {
    -a
}

/// The four arithmetic operators. Only `-` can also be applied as unary operator.
pub static DEFAULT_OPERATORS: [Operator; 4] = [
    Operator {
        repr: "+",
        bin_op: Some(BinOp {
            apply: add,
            prio: 0,
        }),
        unary_op: None,
    },
    Operator {
        repr: "-",
        bin_op: Some(BinOp {
            apply: sub,
            prio: 0,
        }),
        unary_op: Some(neg),
    },
    Operator {
        repr: "*",
        bin_op: Some(BinOp {
            apply: mul,
            prio: 1,
        }),
        unary_op: None,
    },
    Operator {
        repr: "/",
        bin_op: Some(BinOp {
            apply: checked_div,
            prio: 1,
        }),
        unary_op: None,
    },
];

/// Handle of an entry in [`DEFAULT_OPERATORS`](DEFAULT_OPERATORS).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn from_repr(repr: &str) -> Option<BinaryOperator> {
        match repr {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Sub),
            "*" => Some(BinaryOperator::Mul),
            "/" => Some(BinaryOperator::Div),
            _ => None,
        }
    }

    pub fn operator(&self) -> &'static Operator {
        let idx = match self {
            BinaryOperator::Add => 0,
            BinaryOperator::Sub => 1,
            BinaryOperator::Mul => 2,
            BinaryOperator::Div => 3,
        };
        &DEFAULT_OPERATORS[idx]
    }

    pub fn repr(&self) -> &'static str {
        self.operator().repr
    }

    pub fn prio(&self) -> CalcResult<i32> {
        Ok(self.operator().bin()?.prio)
    }

    /// Applies the operator to `a` and `b` in this order.
    ///
    /// # Errors
    ///
    /// [`DivisionByZero`](crate::ErrorKind::DivisionByZero) for `/` with zero `b`.
    ///
    pub fn apply(&self, a: &Number, b: &Number) -> CalcResult<Number> {
        (self.operator().bin()?.apply)(a, b)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

#[cfg(test)]
use crate::{number::from_integer, ErrorKind};

#[test]
fn test_operator_table() {
    for op in [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
    ] {
        assert_eq!(BinaryOperator::from_repr(op.repr()), Some(op));
        assert!(op.operator().has_bin());
    }
    assert_eq!(BinaryOperator::from_repr("^"), None);
    assert!(BinaryOperator::Mul.prio().unwrap() > BinaryOperator::Add.prio().unwrap());
    assert_eq!(
        BinaryOperator::Div.prio().unwrap(),
        BinaryOperator::Mul.prio().unwrap()
    );
    assert!(BinaryOperator::Sub.operator().has_unary());
    assert!(!BinaryOperator::Add.operator().has_unary());
    let err = BinaryOperator::Mul.operator().unary().unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert!(err.msg.contains("not available as unary"));
}

#[test]
fn test_apply() {
    let (a, b) = (from_integer(7.into()), from_integer(2.into()));
    assert_eq!(BinaryOperator::Add.apply(&a, &b).unwrap(), from_integer(9.into()));
    assert_eq!(BinaryOperator::Sub.apply(&a, &b).unwrap(), from_integer(5.into()));
    assert_eq!(BinaryOperator::Mul.apply(&a, &b).unwrap(), from_integer(14.into()));
    assert_eq!(
        BinaryOperator::Div.apply(&a, &b).unwrap(),
        Number::new(7.into(), 2.into())
    );
    let zero = from_integer(0.into());
    assert_eq!(
        BinaryOperator::Div.apply(&a, &zero).unwrap_err().kind,
        ErrorKind::DivisionByZero
    );
    let minus = BinaryOperator::Sub.operator().unary().unwrap();
    assert_eq!(minus(&a), from_integer((-7).into()));
}
