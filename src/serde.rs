use std::{fmt, str::FromStr};

use ::serde::{
    de, de::Visitor, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{CalcError, ErrorKind, EvalOutcome, Notation};

const ERROR_KINDS: [ErrorKind; 6] = [
    ErrorKind::LexError,
    ErrorKind::SyntaxError,
    ErrorKind::EmptyInputError,
    ErrorKind::InvalidExpressionError,
    ErrorKind::InvalidInputError,
    ErrorKind::DivisionByZero,
];

impl Serialize for Notation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Notation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(NotationVisitor)
    }
}

#[derive(Debug)]
struct NotationVisitor;

impl<'de> Visitor<'de> for NotationVisitor {
    type Value = Notation;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "one of infix, prefix, or postfix")
    }

    fn visit_str<E>(self, unparsed: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Notation::from_str(unparsed).map_err(|e| E::custom(format!("Parse error - {}", e.msg)))
    }
}

impl Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ErrorKindVisitor)
    }
}

#[derive(Debug)]
struct ErrorKindVisitor;

impl<'de> Visitor<'de> for ErrorKindVisitor {
    type Value = ErrorKind;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "the name of an error kind like SyntaxError")
    }

    fn visit_str<E>(self, unparsed: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        ERROR_KINDS
            .iter()
            .find(|kind| kind.as_str() == unparsed)
            .copied()
            .ok_or_else(|| E::custom(format!("unknown error kind {unparsed}")))
    }
}

impl Serialize for CalcError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CalcError", 2)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("msg", &self.msg)?;
        state.end()
    }
}

/// Values are serialized exactly as `numerator/denominator`, integers without denominator.
impl Serialize for EvalOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EvalOutcome::Ok(x) => {
                serializer.serialize_newtype_variant("EvalOutcome", 0, "Ok", &x.to_string())
            }
            EvalOutcome::Err(e) => serializer.serialize_newtype_variant("EvalOutcome", 1, "Err", e),
        }
    }
}

#[cfg(test)]
use {
    crate::{evaluate, evaluate_simple},
    serde_test::{assert_de_tokens, assert_de_tokens_error, assert_ser_tokens, assert_tokens, Token},
};

#[test]
fn test_ser_de_notation() {
    assert_tokens(&Notation::Infix, &[Token::Str("infix")]);
    assert_tokens(&Notation::Prefix, &[Token::Str("prefix")]);
    assert_tokens(&Notation::Postfix, &[Token::Str("postfix")]);
    assert_de_tokens(&Notation::Postfix, &[Token::Str("RPN")]);
    assert_de_tokens_error::<Notation>(
        &[Token::Str("sideways")],
        "Parse error - unknown notation 'sideways'",
    );
    let notation: Notation = serde_json::from_str("\"prefix\"").unwrap();
    assert_eq!(notation, Notation::Prefix);
}

#[test]
fn test_ser_de_error_kind() {
    for kind in ERROR_KINDS {
        assert_tokens(&kind, &[Token::Str(kind.as_str())]);
    }
    assert_de_tokens_error::<ErrorKind>(&[Token::Str("Oops")], "unknown error kind Oops");
}

#[test]
fn test_ser_outcome() {
    let outcome = evaluate("7 / 2", Notation::Infix);
    assert_ser_tokens(
        &outcome,
        &[
            Token::NewtypeVariant {
                name: "EvalOutcome",
                variant: "Ok",
            },
            Token::Str("7/2"),
        ],
    );
    let outcome = evaluate_simple("1", "0", "/");
    assert_ser_tokens(
        &outcome,
        &[
            Token::NewtypeVariant {
                name: "EvalOutcome",
                variant: "Err",
            },
            Token::Struct {
                name: "CalcError",
                len: 2,
            },
            Token::Str("kind"),
            Token::Str("DivisionByZero"),
            Token::Str("msg"),
            Token::Str("division by zero"),
            Token::StructEnd,
        ],
    );
    let json = serde_json::to_string(&evaluate("3 4 +", Notation::Postfix)).unwrap();
    assert_eq!(json, r#"{"Ok":"7"}"#);
    let json = serde_json::to_string(&evaluate("", Notation::Infix)).unwrap();
    assert!(json.starts_with(r#"{"Err":{"kind":"EmptyInputError","msg":"#));
}
