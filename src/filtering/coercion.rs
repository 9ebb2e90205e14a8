//! Raw filter literal -> typed value, driven by the field's declared kind.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::Value;

use crate::errors::{SearchError, SearchResult};
use crate::metadata::{EnumVariant, FieldDef, FieldKind};

/// The literal that means "no value" for every kind except enums.
pub const NULL_LITERAL: &str = "null";

/// A filter literal converted to its field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absence, remembering the kind so the store gets a typed null.
    Null(FieldKind),
    String(String),
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    Decimal(Decimal),
    Date(DateTime<Utc>),
    Enum(&'static EnumVariant),
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Store value, with typed nulls.
    #[must_use]
    pub fn to_db_value(&self) -> Value {
        match self {
            Self::Null(kind) => null_value(*kind),
            Self::String(value) => value.clone().into(),
            Self::Boolean(value) => (*value).into(),
            Self::Integer(value) => (*value).into(),
            Self::Long(value) => (*value).into(),
            Self::Double(value) => (*value).into(),
            Self::Decimal(value) => (*value).into(),
            Self::Date(value) => (*value).into(),
            Self::Enum(variant) => variant.name.into(),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        value.to_db_value()
    }
}

/// Canonical literal form; coercing it back yields the same value.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null(_) => f.write_str(NULL_LITERAL),
            Self::String(value) => f.write_str(value),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Long(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.timestamp_millis()),
            Self::Enum(variant) => f.write_str(variant.name),
        }
    }
}

fn null_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::String | FieldKind::Enum(_) | FieldKind::SearchableEnum(_) => {
            Option::<String>::None.into()
        }
        FieldKind::Boolean => Option::<bool>::None.into(),
        FieldKind::Integer => Option::<i32>::None.into(),
        FieldKind::Long => Option::<i64>::None.into(),
        FieldKind::Double => Option::<f64>::None.into(),
        FieldKind::Decimal => Option::<Decimal>::None.into(),
        FieldKind::Date => Option::<DateTime<Utc>>::None.into(),
    }
}

/// Convert `raw` to the type declared by `field`.
///
/// Enum fields match a variant name exactly (so `"null"` is not special for
/// them). For everything else `"null"` is the typed null. Booleans never
/// fail: anything but a case-insensitive `"true"` is `false`. Dates are
/// epoch milliseconds.
///
/// # Errors
///
/// Returns [`SearchError::InvalidValue`] when `raw` does not parse.
pub fn coerce(field: &FieldDef, raw: &str) -> SearchResult<FieldValue> {
    let invalid = || SearchError::invalid_value(field.name, raw, field.kind.label());
    match field.kind {
        FieldKind::Enum(descriptor) | FieldKind::SearchableEnum(descriptor) => descriptor
            .variant(raw)
            .map(FieldValue::Enum)
            .ok_or_else(invalid),
        kind if raw == NULL_LITERAL => Ok(FieldValue::Null(kind)),
        FieldKind::Decimal => parse_decimal(raw)
            .map(FieldValue::Decimal)
            .ok_or_else(invalid),
        FieldKind::Boolean => Ok(FieldValue::Boolean(raw.eq_ignore_ascii_case("true"))),
        FieldKind::Double => raw
            .parse::<f64>()
            .map(FieldValue::Double)
            .map_err(|_| invalid()),
        FieldKind::Integer => raw
            .parse::<i32>()
            .map(FieldValue::Integer)
            .map_err(|_| invalid()),
        FieldKind::Long => raw
            .parse::<i64>()
            .map(FieldValue::Long)
            .map_err(|_| invalid()),
        FieldKind::String => Ok(FieldValue::String(raw.to_string())),
        FieldKind::Date => raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(FieldValue::Date)
            .ok_or_else(invalid),
    }
}

/// Coerce each `|`-separated part of a membership literal.
///
/// # Errors
///
/// Fails on the first part that does not parse.
pub fn coerce_list(field: &FieldDef, raw: &str) -> SearchResult<Vec<FieldValue>> {
    raw.split('|').map(|part| coerce(field, part)).collect()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}
