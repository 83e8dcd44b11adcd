//! Attribute-level validation for JSON:API request documents.
//!
//! Every helper reports failures as `422 Unprocessable Entity` pointing at the
//! offending attribute, e.g. `/data/attributes/min-quantity`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use url::Url;

use crate::domain::Error;

/// Wire name of a request attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }

    pub(crate) fn pointer(&self) -> String {
        format!("/data/attributes/{}", self.0)
    }
}

/// Individual attribute failures and their client-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    NotNull,
    NotString,
    NotInteger,
    NotNumber,
    NotBoolean,
    NotUrl,
    NotDatetime,
    NotChoice,
    Negative,
}

impl Violation {
    fn message(self) -> &'static str {
        match self {
            Self::NotNull => "Field may not be null.",
            Self::NotString => "Not a valid string.",
            Self::NotInteger => "Not a valid integer.",
            Self::NotNumber => "Not a valid number.",
            Self::NotBoolean => "Not a valid boolean.",
            Self::NotUrl => "Not a valid URL.",
            Self::NotDatetime => "Not a valid datetime.",
            Self::NotChoice => "Not a valid choice.",
            Self::Negative => "Must be greater than or equal to 0.",
        }
    }

    pub(crate) fn at(self, field: FieldName) -> Error {
        Error::unprocessable(self.message()).with_pointer(field.pointer())
    }
}

/// Interpret a present attribute that may be null.
///
/// Returns `Ok(None)` for JSON null, otherwise applies `parse`.
pub(crate) fn nullable<T>(
    value: &Value,
    field: FieldName,
    parse: impl FnOnce(&Value, FieldName) -> Result<T, Error>,
) -> Result<Option<T>, Error> {
    if value.is_null() {
        Ok(None)
    } else {
        parse(value, field).map(Some)
    }
}

pub(crate) fn string(value: &Value, field: FieldName) -> Result<String, Error> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| Violation::NotString.at(field))
}

/// Integer `>= 0` that fits the storage column. Numeric strings are accepted.
pub(crate) fn non_negative_integer(value: &Value, field: FieldName) -> Result<i32, Error> {
    let parsed = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    };
    let raw = parsed.ok_or_else(|| Violation::NotInteger.at(field))?;
    if raw < 0 {
        return Err(Violation::Negative.at(field));
    }
    i32::try_from(raw).map_err(|_| Violation::NotInteger.at(field))
}

/// Finite number. Numeric strings are accepted.
pub(crate) fn number(value: &Value, field: FieldName) -> Result<f64, Error> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| Violation::NotNumber.at(field))
}

pub(crate) fn boolean(value: &Value, field: FieldName) -> Result<bool, Error> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::String(raw) => match raw.as_str() {
            "true" | "True" | "1" => Ok(true),
            "false" | "False" | "0" => Ok(false),
            _ => Err(Violation::NotBoolean.at(field)),
        },
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(Violation::NotBoolean.at(field)),
        },
        _ => Err(Violation::NotBoolean.at(field)),
    }
}

/// Absolute `http`, `https`, `ftp` or `ftps` URL with a host.
pub(crate) fn absolute_url(value: &Value, field: FieldName) -> Result<String, Error> {
    let raw = value.as_str().ok_or_else(|| Violation::NotUrl.at(field))?;
    let url = Url::parse(raw).map_err(|_| Violation::NotUrl.at(field))?;
    let scheme_ok = matches!(url.scheme(), "http" | "https" | "ftp" | "ftps");
    if !scheme_ok || url.host_str().is_none() {
        return Err(Violation::NotUrl.at(field));
    }
    Ok(raw.to_owned())
}

/// RFC 3339 timestamp. Timestamps without an offset are read as UTC.
pub(crate) fn timestamp(value: &Value, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let raw = value.as_str().ok_or_else(|| Violation::NotDatetime.at(field))?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| Violation::NotDatetime.at(field))
}

/// One of the values accepted by `T::from_str`.
pub(crate) fn choice<T: FromStr>(value: &Value, field: FieldName) -> Result<T, Error> {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| Violation::NotChoice.at(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiscountType, ErrorCode, ErrorSource};
    use rstest::rstest;
    use serde_json::json;

    const QTY: FieldName = FieldName::new("min-quantity");

    fn pointer_of(err: &Error) -> Option<&str> {
        match err.error_source() {
            Some(ErrorSource::Pointer(pointer)) => Some(pointer.as_str()),
            _ => None,
        }
    }

    #[rstest]
    #[case(json!(3), Ok(3))]
    #[case(json!("12"), Ok(12))]
    #[case(json!(0), Ok(0))]
    #[case(json!(-1), Err("Must be greater than or equal to 0."))]
    #[case(json!(1.5), Err("Not a valid integer."))]
    #[case(json!("many"), Err("Not a valid integer."))]
    #[case(json!(5_000_000_000_i64), Err("Not a valid integer."))]
    fn integers(#[case] input: Value, #[case] expected: Result<i32, &str>) {
        let outcome = non_negative_integer(&input, QTY);
        match expected {
            Ok(value) => assert_eq!(outcome.expect("valid"), value),
            Err(message) => {
                let err = outcome.expect_err("invalid");
                assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
                assert_eq!(err.message(), message);
                assert_eq!(pointer_of(&err), Some("/data/attributes/min-quantity"));
            }
        }
    }

    #[rstest]
    #[case("https://example.com/promo", true)]
    #[case("ftp://files.example.com", true)]
    #[case("mailto:someone@example.com", false)]
    #[case("/relative/path", false)]
    #[case("not a url", false)]
    fn urls(#[case] raw: &str, #[case] ok: bool) {
        let field = FieldName::new("discount-url");
        assert_eq!(absolute_url(&json!(raw), field).is_ok(), ok);
    }

    #[rstest]
    #[case("2024-06-01T10:00:00+02:00", "2024-06-01T08:00:00+00:00")]
    #[case("2024-06-01T10:00:00Z", "2024-06-01T10:00:00+00:00")]
    #[case("2024-06-01T10:00:00", "2024-06-01T10:00:00+00:00")]
    fn timestamps(#[case] raw: &str, #[case] expected: &str) {
        let field = FieldName::new("valid-from");
        let parsed = timestamp(&json!(raw), field).expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), expected);
    }

    #[test]
    fn choices_are_case_sensitive() {
        let field = FieldName::new("type");
        assert_eq!(
            choice::<DiscountType>(&json!("amount"), field).expect("valid"),
            DiscountType::Amount
        );
        let err = choice::<DiscountType>(&json!("Amount"), field).expect_err("invalid");
        assert_eq!(err.message(), "Not a valid choice.");
        assert_eq!(pointer_of(&err), Some("/data/attributes/type"));
    }

    #[test]
    fn nullable_passes_null_through() {
        let parsed = nullable(&Value::Null, QTY, non_negative_integer).expect("null allowed");
        assert_eq!(parsed, None);
    }

    #[rstest]
    #[case(json!(true), Some(true))]
    #[case(json!("false"), Some(false))]
    #[case(json!(1), Some(true))]
    #[case(json!("yes please"), None)]
    fn booleans(#[case] input: Value, #[case] expected: Option<bool>) {
        assert_eq!(boolean(&input, FieldName::new("is-active")).ok(), expected);
    }
}
