//! Custom scalars: `UUID` identifiers and the `DeleteAck` marker

use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use uuid::Uuid;

/// Length of the hyphenated 8-4-4-4-12 form
const CANONICAL_LEN: usize = 36;

/// Entity identifier, accepted only in hyphenated form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UuidScalar(pub Uuid);

/// Parse `s` only if it is a 36-character hyphenated UUID
pub fn parse_canonical(s: &str) -> Option<Uuid> {
    if s.len() != CANONICAL_LEN {
        return None;
    }
    Uuid::try_parse(s).ok()
}

#[Scalar(name = "UUID")]
impl ScalarType for UuidScalar {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => parse_canonical(&s).map(UuidScalar).ok_or_else(|| {
                InputValueError::custom(format!("\"{}\" is not a valid UUID", s))
            }),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn is_valid(value: &Value) -> bool {
        matches!(value, Value::String(s) if parse_canonical(s).is_some())
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.hyphenated().to_string())
    }
}

impl From<Uuid> for UuidScalar {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<UuidScalar> for Uuid {
    fn from(id: UuidScalar) -> Self {
        id.0
    }
}

/// Returned by delete-style mutations; carries no entity payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAck;

#[Scalar(name = "DeleteAck")]
impl ScalarType for DeleteAck {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::Boolean(true) => Ok(DeleteAck),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Boolean(true)
    }
}
