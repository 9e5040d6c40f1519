//! Scalar kinds
//!
//! Each kind owns exactly one format grammar (see the validator crate) and one
//! JSON shape.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar kind of a primitive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    UnsignedInt,
    PositiveInt,
    Decimal,
    String,
    Code,
    Id,
    Markdown,
    Uri,
    Url,
    Canonical,
    Oid,
    Uuid,
    Base64Binary,
    Instant,
    Date,
    DateTime,
    Time,
}

/// How a primitive travels in the JSON wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Bool,
    Number,
    String,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 19] = [
        Self::Boolean,
        Self::Integer,
        Self::UnsignedInt,
        Self::PositiveInt,
        Self::Decimal,
        Self::String,
        Self::Code,
        Self::Id,
        Self::Markdown,
        Self::Uri,
        Self::Url,
        Self::Canonical,
        Self::Oid,
        Self::Uuid,
        Self::Base64Binary,
        Self::Instant,
        Self::Date,
        Self::DateTime,
        Self::Time,
    ];

    /// Wire name of the kind (`positiveInt`, `dateTime`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::UnsignedInt => "unsignedInt",
            Self::PositiveInt => "positiveInt",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Code => "code",
            Self::Id => "id",
            Self::Markdown => "markdown",
            Self::Uri => "uri",
            Self::Url => "url",
            Self::Canonical => "canonical",
            Self::Oid => "oid",
            Self::Uuid => "uuid",
            Self::Base64Binary => "base64Binary",
            Self::Instant => "instant",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Time => "time",
        }
    }

    pub fn json_shape(self) -> JsonShape {
        match self {
            Self::Boolean => JsonShape::Bool,
            Self::Integer | Self::UnsignedInt | Self::PositiveInt | Self::Decimal => {
                JsonShape::Number
            }
            _ => JsonShape::String,
        }
    }

    /// Integer kinds carry an `i64` payload; decimal does not.
    pub fn is_integral(self) -> bool {
        matches!(self, Self::Integer | Self::UnsignedInt | Self::PositiveInt)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SchemaError::UnknownPrimitiveKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.name().parse::<PrimitiveKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_names_match_wire_names() {
        for kind in PrimitiveKind::ALL {
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded, kind.name());
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("Quantity".parse::<PrimitiveKind>().is_err());
        assert!("String".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn json_shapes() {
        assert_eq!(PrimitiveKind::Boolean.json_shape(), JsonShape::Bool);
        assert_eq!(PrimitiveKind::PositiveInt.json_shape(), JsonShape::Number);
        assert_eq!(PrimitiveKind::Decimal.json_shape(), JsonShape::Number);
        assert_eq!(PrimitiveKind::Date.json_shape(), JsonShape::String);
        assert!(!PrimitiveKind::Decimal.is_integral());
    }
}
