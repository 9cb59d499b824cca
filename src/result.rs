use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Category of an [`CalcError`](CalcError). The UI only needs the kind to decide how to
/// render a failure, the message is for humans.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorKind {
    /// An unrecognized character appears in an infix expression.
    LexError,
    /// The tokens of an infix expression violate the grammar.
    SyntaxError,
    /// The infix expression is empty or consists of blanks only.
    EmptyInputError,
    /// Stack underflow or leftover operands in prefix or postfix notation.
    InvalidExpressionError,
    /// An operand of the two-operand mode is not a number.
    InvalidInputError,
    /// The right operand of a division evaluated to zero.
    DivisionByZero,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::LexError => "LexError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::EmptyInputError => "EmptyInputError",
            ErrorKind::InvalidExpressionError => "InvalidExpressionError",
            ErrorKind::InvalidInputError => "InvalidInputError",
            ErrorKind::DivisionByZero => "DivisionByZero",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// This will be thrown at you if something within Notacalc went wrong. Ok, obviously it is not an
/// exception, so thrown needs to be understood figuratively.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct CalcError {
    pub kind: ErrorKind,
    pub msg: String,
}
impl CalcError {
    pub fn new(kind: ErrorKind, msg: &str) -> CalcError {
        CalcError {
            kind,
            msg: msg.to_string(),
        }
    }
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
impl Display for CalcError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}
impl Error for CalcError {}

/// Notacalc' result type with [`CalcError`](CalcError) as error type.
pub type CalcResult<U> = Result<U, CalcError>;

/// Creates a [`CalcError`](CalcError) of the given [`ErrorKind`](ErrorKind) from a string slice.
#[macro_export]
macro_rules! calc_err {
    ($kind:ident, $s:expr) => {
        $crate::CalcError::new($crate::ErrorKind::$kind, $s)
    };
}

/// Creates a [`CalcError`](CalcError) of the given [`ErrorKind`](ErrorKind) with a formatted message.
#[macro_export]
macro_rules! format_calc_err {
    ($kind:ident, $s:literal, $( $exps:expr ),*) => {
        $crate::CalcError {
            kind: $crate::ErrorKind::$kind,
            msg: format!($s, $($exps,)*),
        }
    };
}

#[test]
fn test_macros() {
    let err = calc_err!(SyntaxError, "parentheses mismatch");
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
    assert_eq!(err.msg(), "parentheses mismatch");
    let err = format_calc_err!(LexError, "cannot tokenize '{}' at position {}", '$', 3);
    assert_eq!(err.msg, "cannot tokenize '$' at position 3");
    assert_eq!(format!("{err}"), "LexError: cannot tokenize '$' at position 3");
}
