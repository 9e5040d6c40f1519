//! Primitive format grammars
//!
//! One anchored regex per kind, compiled once into a shared read-only table.
//! Integer kinds additionally get a 32-bit range check and full calendar dates
//! are checked with `chrono` (the grammars alone accept `2023-02-31`).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tessera_models::Primitive;
use tessera_schema::PrimitiveKind;

const YEAR: &str = r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)";
const MONTH: &str = r"(0[1-9]|1[0-2])";
const DAY: &str = r"(0[1-9]|[1-2][0-9]|3[0-1])";
const TIME: &str = r"([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?";
const ZONE: &str = r"(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))";

fn grammar(kind: PrimitiveKind) -> String {
    match kind {
        PrimitiveKind::Boolean => "true|false".to_string(),
        PrimitiveKind::Integer => "0|[-+]?[1-9][0-9]*".to_string(),
        PrimitiveKind::UnsignedInt => "0|[1-9][0-9]*".to_string(),
        PrimitiveKind::PositiveInt => r"\+?[1-9][0-9]*".to_string(),
        PrimitiveKind::Decimal => r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?".to_string(),
        PrimitiveKind::String | PrimitiveKind::Markdown => r"[ \r\n\t\S]+".to_string(),
        PrimitiveKind::Code => r"[^\s]+( [^\s]+)*".to_string(),
        PrimitiveKind::Id => r"[A-Za-z0-9\-\.]{1,64}".to_string(),
        PrimitiveKind::Uri | PrimitiveKind::Url | PrimitiveKind::Canonical => r"\S*".to_string(),
        PrimitiveKind::Oid => r"urn:oid:[0-2](\.(0|[1-9][0-9]*))+".to_string(),
        PrimitiveKind::Uuid => {
            "urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}".to_string()
        }
        PrimitiveKind::Base64Binary => r"(\s*([0-9a-zA-Z\+/=]){4}\s*)+".to_string(),
        PrimitiveKind::Date => format!("{YEAR}(-{MONTH}(-{DAY})?)?"),
        PrimitiveKind::DateTime => {
            format!("{YEAR}(-{MONTH}(-{DAY}(T{TIME}{ZONE})?)?)?")
        }
        PrimitiveKind::Instant => format!("{YEAR}-{MONTH}-{DAY}T{TIME}{ZONE}"),
        PrimitiveKind::Time => TIME.to_string(),
    }
}

static GRAMMARS: Lazy<HashMap<PrimitiveKind, Regex>> = Lazy::new(|| {
    PrimitiveKind::ALL
        .iter()
        .map(|&kind| {
            let pattern = format!("^(?:{})$", grammar(kind));
            let regex = Regex::new(&pattern).expect("primitive grammar must compile");
            (kind, regex)
        })
        .collect()
});

/// Check a lexical value against the grammar of `kind`.
pub fn validate_primitive(kind: PrimitiveKind, lexical: &str) -> bool {
    let matches = GRAMMARS
        .get(&kind)
        .is_some_and(|regex| regex.is_match(lexical));
    if !matches {
        return false;
    }

    match kind {
        PrimitiveKind::Integer => lexical.parse::<i32>().is_ok(),
        PrimitiveKind::UnsignedInt | PrimitiveKind::PositiveInt => lexical
            .trim_start_matches('+')
            .parse::<i32>()
            .is_ok(),
        PrimitiveKind::Date | PrimitiveKind::DateTime | PrimitiveKind::Instant => {
            calendar_date_ok(lexical)
        }
        _ => true,
    }
}

/// Check a typed primitive against the grammar of its own kind.
pub fn validate_value(value: &Primitive) -> bool {
    validate_primitive(value.kind(), &value.lexical())
}

/// Full `YYYY-MM-DD` prefixes must name a real day; partial dates pass.
fn calendar_date_ok(lexical: &str) -> bool {
    match lexical.get(..10) {
        Some(date) if date.len() == 10 => NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_int() {
        assert!(!validate_primitive(PrimitiveKind::PositiveInt, "0"));
        assert!(validate_primitive(PrimitiveKind::PositiveInt, "7"));
        assert!(validate_primitive(PrimitiveKind::PositiveInt, "+7"));
        assert!(!validate_primitive(PrimitiveKind::PositiveInt, "07"));
        assert!(!validate_primitive(PrimitiveKind::PositiveInt, "-7"));
        assert!(!validate_primitive(PrimitiveKind::PositiveInt, "2147483648"));
    }

    #[test]
    fn integers() {
        assert!(validate_primitive(PrimitiveKind::Integer, "0"));
        assert!(validate_primitive(PrimitiveKind::Integer, "-2147483648"));
        assert!(!validate_primitive(PrimitiveKind::Integer, "-0"));
        assert!(!validate_primitive(PrimitiveKind::Integer, "1.0"));
        assert!(validate_primitive(PrimitiveKind::UnsignedInt, "0"));
        assert!(!validate_primitive(PrimitiveKind::UnsignedInt, "00"));
    }

    #[test]
    fn dates() {
        assert!(!validate_primitive(PrimitiveKind::Date, "2024-13-40"));
        assert!(!validate_primitive(PrimitiveKind::Date, "2023-02-29"));
        assert!(validate_primitive(PrimitiveKind::Date, "2024-02-29"));
        assert!(validate_primitive(PrimitiveKind::Date, "2024"));
        assert!(validate_primitive(PrimitiveKind::Date, "2024-05"));
        assert!(!validate_primitive(PrimitiveKind::Date, "24-05-01"));
    }

    #[test]
    fn date_times_and_instants() {
        assert!(validate_primitive(PrimitiveKind::DateTime, "2024-05-01T10:30:00Z"));
        assert!(validate_primitive(PrimitiveKind::DateTime, "2024-05"));
        assert!(!validate_primitive(PrimitiveKind::DateTime, "2024-05-01T10:30"));
        assert!(!validate_primitive(PrimitiveKind::DateTime, "2024-04-31T10:30:00Z"));
        assert!(validate_primitive(PrimitiveKind::Instant, "2024-05-01T10:30:00.123+02:00"));
        assert!(!validate_primitive(PrimitiveKind::Instant, "2024-05-01"));
        assert!(validate_primitive(PrimitiveKind::Time, "23:59:60"));
        assert!(!validate_primitive(PrimitiveKind::Time, "24:00:00"));
    }

    #[test]
    fn codes_and_ids() {
        assert!(validate_primitive(PrimitiveKind::Code, "active"));
        assert!(validate_primitive(PrimitiveKind::Code, "two words"));
        assert!(!validate_primitive(PrimitiveKind::Code, "two  spaces"));
        assert!(!validate_primitive(PrimitiveKind::Code, " leading"));
        assert!(!validate_primitive(PrimitiveKind::Code, ""));
        assert!(validate_primitive(PrimitiveKind::Id, "a-1.b"));
        assert!(!validate_primitive(PrimitiveKind::Id, "has_underscore"));
        assert!(!validate_primitive(PrimitiveKind::Id, &"x".repeat(65)));
    }

    #[test]
    fn identifiers_and_binary() {
        assert!(validate_primitive(PrimitiveKind::Oid, "urn:oid:1.2.840.10008"));
        assert!(!validate_primitive(PrimitiveKind::Oid, "1.2.840"));
        assert!(validate_primitive(
            PrimitiveKind::Uuid,
            "urn:uuid:c757873d-ec9a-4326-a141-556f43239520"
        ));
        assert!(!validate_primitive(PrimitiveKind::Uuid, "c757873d-ec9a-4326-a141-556f43239520"));
        assert!(validate_primitive(PrimitiveKind::Base64Binary, "aGVsbG8="));
        assert!(!validate_primitive(PrimitiveKind::Base64Binary, "abc"));
        assert!(!validate_primitive(PrimitiveKind::Uri, "has space"));
    }

    #[test]
    fn typed_values_use_their_lexical_form() {
        assert!(validate_value(&Primitive::boolean(false)));
        assert!(validate_value(&Primitive::integer(-4)));
        assert!(!validate_value(&Primitive::code("")));
        assert!(!validate_value(&Primitive::new(
            PrimitiveKind::PositiveInt,
            tessera_models::PrimitiveData::Integer(0)
        )));
        assert!(validate_value(&Primitive::decimal(tessera_models::Decimal::new(
            725, 1
        ))));
    }
}
