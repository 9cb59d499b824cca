use crate::operators::{BinaryOperator, Operator};
use crate::{calc_err, format_calc_err, CalcResult};
use lazy_static::lazy_static;
use log::trace;
use num::{BigInt, Signed};
use regex::Regex;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Number of tokens that are kept on the stack before spilling to the heap.
pub const N_TOKENS_ON_STACK: usize = 32;

pub type TokenVec = SmallVec<[Token; N_TOKENS_ON_STACK]>;

lazy_static! {
    // a minus fused to digits is part of the literal, it beats the operator `-`
    static ref RE_INTEGER: Regex = Regex::new(r"^-?[0-9]+").unwrap();
}

/// Smallest lexical unit of an infix expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Num(BigInt),
    Plus,
    Minus,
    Times,
    Divide,
    LParen,
    RParen,
}

impl Token {
    fn from_char(c: char) -> Option<Token> {
        match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Times),
            '/' => Some(Token::Divide),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        }
    }

    /// Returns the binary operator this token stands for, if any.
    pub fn bin_operator(&self) -> Option<BinaryOperator> {
        match self {
            Token::Plus => Some(BinaryOperator::Add),
            Token::Minus => Some(BinaryOperator::Sub),
            Token::Times => Some(BinaryOperator::Mul),
            Token::Divide => Some(BinaryOperator::Div),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<&'static Operator> {
        self.bin_operator().map(|bo| bo.operator())
    }

    pub fn is_op(&self) -> bool {
        self.bin_operator().is_some()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{n}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            _ => match self.operator() {
                Some(op) => write!(f, "{}", op.repr()),
                None => Ok(()),
            },
        }
    }
}

/// Returns the integer literal at the beginning of `text`, i.e., an optional `-` directly
/// followed by digits.
pub fn is_numeric_text(text: &str) -> Option<&str> {
    RE_INTEGER.find(text).map(|m| m.as_str())
}

/// Checks whether the whole `atom` is an integer literal in the sense of
/// [`is_numeric_text`](is_numeric_text).
pub fn is_integer_atom(atom: &str) -> bool {
    is_numeric_text(atom).map_or(false, |num_str| num_str.len() == atom.len())
}

/// Splits an infix expression into tokens. Spaces and tabs are skipped.
///
/// # Arguments
///
/// * `text` - text to be tokenized
///
/// # Errors
///
/// [`LexError`](crate::ErrorKind::LexError) if the text contains a character that is not part
/// of the grammar.
///
pub fn tokenize(text: &str) -> CalcResult<TokenVec> {
    // Make sure that the text does not contain unicode characters
    if let Some((pos, c)) = text.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(format_calc_err!(
            LexError,
            "only ascii characters are supported, found '{}' at position {}",
            c,
            pos
        ));
    }

    let mut res = TokenVec::new();
    let mut cur_offset = 0usize;
    while cur_offset < text.len() {
        let text_rest = &text[cur_offset..];
        // ascii only, hence byte and char offsets coincide
        let c = text_rest.as_bytes()[0] as char;
        if c == ' ' || c == '\t' {
            cur_offset += 1;
            continue;
        }
        let next_token = if let Some(num_str) = is_numeric_text(text_rest) {
            cur_offset += num_str.len();
            let n = BigInt::from_str(num_str).map_err(|_| {
                format_calc_err!(LexError, "cannot read number {}", num_str)
            })?;
            Token::Num(n)
        } else if let Some(token) = Token::from_char(c) {
            cur_offset += 1;
            token
        } else {
            return Err(format_calc_err!(
                LexError,
                "illegal character '{}' at position {}",
                c,
                cur_offset
            ));
        };
        res.push(next_token);
    }
    trace!("tokens of '{}': {:?}", text, res);
    Ok(res)
}

struct PairPreCondition<'a> {
    apply: fn(&Token, &Token) -> bool,
    error_msg: &'a str,
}

fn make_pair_pre_conditions<'a>() -> [PairPreCondition<'a>; 7] {
    [
        PairPreCondition {
            apply: |left, right| {
                !matches!(
                    (left, right),
                    (Token::Num(_), Token::Num(n)) if n.is_negative()
                )
            },
            error_msg: "a negative number cannot follow a number, to subtract put a space between - and the digits",
        },
        PairPreCondition {
            apply: |left, right| !matches!((left, right), (Token::Num(_), Token::Num(_))),
            error_msg: "a number cannot be next to a number",
        },
        PairPreCondition {
            apply: |left, right| {
                !matches!(
                    (left, right),
                    (Token::RParen, Token::Num(_))
                        | (Token::Num(_), Token::LParen)
                        | (Token::RParen, Token::LParen)
                )
            },
            error_msg: "a number or parenthesis cannot be next to a parenthesis without an operator in between",
        },
        PairPreCondition {
            apply: |left, right| match (left.operator(), right.operator()) {
                (Some(_), Some(op_r)) => op_r.has_unary(),
                _ => true,
            },
            error_msg: "a binary operator cannot be on the right of an operator",
        },
        PairPreCondition {
            apply: |left, right| !(left.is_op() && *right == Token::RParen),
            error_msg: "an operator cannot be on the left of a closing paren",
        },
        PairPreCondition {
            apply: |left, right| match (left, right.operator()) {
                (Token::LParen, Some(op)) => op.has_unary(),
                _ => true,
            },
            error_msg: "a binary operator cannot be on the right of an opening paren",
        },
        PairPreCondition {
            apply: |left, right| !(*left == Token::LParen && *right == Token::RParen),
            error_msg: "an opening paren cannot be next to a closing paren",
        },
    ]
}

/// Tries to give useful error messages for invalid constellations of the tokens. An empty
/// token sequence passes, since it is the empty statement.
///
/// # Arguments
///
/// * `tokens` - tokens created with [`tokenize`](tokenize)
///
/// # Errors
///
/// [`SyntaxError`](crate::ErrorKind::SyntaxError) describing the first violation found.
///
pub fn check_token_preconditions(tokens: &[Token]) -> CalcResult<()> {
    if tokens.is_empty() {
        return Ok(());
    }
    if let Some(op) = tokens[0].operator() {
        if !op.has_unary() {
            return Err(format_calc_err!(
                SyntaxError,
                "an expression cannot start with the binary operator {}",
                op.repr()
            ));
        }
    }

    let pair_pre_conditions = make_pair_pre_conditions();
    for (left, right) in tokens.iter().zip(tokens.iter().skip(1)) {
        let failed = pair_pre_conditions
            .iter()
            .find(|ppc| !(ppc.apply)(left, right));
        if let Some(failed_ppc) = failed {
            return Err(format_calc_err!(
                SyntaxError,
                "{}, found '{} {}'",
                failed_ppc.error_msg,
                left,
                right
            ));
        }
    }

    let mut open_paren_cnt = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        open_paren_cnt += match token {
            Token::LParen => 1,
            Token::RParen => -1,
            _ => 0,
        };
        if open_paren_cnt < 0 {
            return Err(format_calc_err!(
                SyntaxError,
                "too many closing parentheses until position {}",
                i
            ));
        }
    }
    if open_paren_cnt != 0 {
        Err(calc_err!(SyntaxError, "parentheses mismatch"))
    } else if tokens[tokens.len() - 1].is_op() {
        Err(calc_err!(SyntaxError, "the last element cannot be an operator"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
use crate::ErrorKind;

#[test]
fn test_tokenize() {
    let tokens = tokenize("12 +(3\t* -4)").unwrap();
    assert_eq!(
        tokens.as_slice(),
        &[
            Token::Num(12.into()),
            Token::Plus,
            Token::LParen,
            Token::Num(3.into()),
            Token::Times,
            Token::Num((-4).into()),
            Token::RParen
        ]
    );
    // fusion of the minus is lexical only
    assert_eq!(
        tokenize("3-4").unwrap().as_slice(),
        &[Token::Num(3.into()), Token::Num((-4).into())]
    );
    assert_eq!(
        tokenize("3 - 4").unwrap().as_slice(),
        &[Token::Num(3.into()), Token::Minus, Token::Num(4.into())]
    );
    assert_eq!(
        tokenize("- 3").unwrap().as_slice(),
        &[Token::Minus, Token::Num(3.into())]
    );
    assert_eq!(
        tokenize("--3").unwrap().as_slice(),
        &[Token::Minus, Token::Num((-3).into())]
    );
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize(" \t ").unwrap().is_empty());
    let big = tokenize("123456789012345678901234567890").unwrap();
    assert_eq!(
        big[0],
        Token::Num(BigInt::from_str("123456789012345678901234567890").unwrap())
    );
}

#[test]
fn test_tokenize_err() {
    for text in [r"5\6", "ӭ", "3.5", "x+1", "2^3", "1,2", "4\n"] {
        let err = tokenize(text).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError, "{text}");
    }
    let err = tokenize("1 + a").unwrap_err();
    assert!(err.msg.contains("'a' at position 4"));
}

#[test]
fn test_is_numeric() {
    assert_eq!(is_numeric_text("5/6").unwrap(), "5");
    assert_eq!(is_numeric_text("-56)").unwrap(), "-56");
    assert!(is_numeric_text("- 5").is_none());
    assert!(is_numeric_text("+5").is_none());
    assert!(is_numeric_text("o4").is_none());
    assert!(is_integer_atom("-17"));
    assert!(is_integer_atom("0042"));
    assert!(!is_integer_atom("17a"));
    assert!(!is_integer_atom("-"));
    assert!(!is_integer_atom(""));
}

#[test]
fn test_preconditions() {
    fn test(text: &str, msg_part: &str) {
        let tokens = tokenize(text).unwrap();
        match check_token_preconditions(&tokens) {
            Ok(_) => panic!("expected an error that should contain '{}'", msg_part),
            Err(e) => {
                println!("msg '{}' should contain '{}'", e.msg, msg_part);
                assert_eq!(e.kind, ErrorKind::SyntaxError);
                assert!(e.msg.contains(msg_part));
            }
        }
    }
    test("3-4", "negative number cannot follow a number");
    test("3 4", "a number cannot be next to a number");
    test("2 (1)", "without an operator in between");
    test("(1)2", "without an operator in between");
    test("(1)(2)", "without an operator in between");
    test("1 * * 2", "binary operator cannot be on the right of an operator");
    test("1 - + 2", "binary operator cannot be on the right of an operator");
    test("(1 +)", "operator cannot be on the left of a closing");
    test("(* 2)", "binary operator cannot be on the right of an opening paren");
    test("12-()+(", "an opening paren cannot be next to a closing paren");
    test(")+12-(1+1) / (", "closing parentheses until position 0");
    test("12 - (3 - 4)*2+ (1/2))", "closing parentheses until");
    test("12 - (3 - 4)*2+ ((1/2)", "parentheses mismatch");
    test("1 +", "the last element cannot be an operator");
    test("+ 3 4", "cannot start with the binary operator +");
    test("* 3", "cannot start with the binary operator *");

    for ok in ["", "1", "-(3+4)", "- - 3", "3 - -4", "2 * -(1)", "((1))"] {
        assert!(
            check_token_preconditions(&tokenize(ok).unwrap()).is_ok(),
            "{ok}"
        );
    }
}
