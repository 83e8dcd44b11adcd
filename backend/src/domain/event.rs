//! Events that discount codes are attached to.
//!
//! Events are owned by another part of the ticketing system; this service only
//! reads them to resolve URL scopes and relationship targets.

use std::fmt;

/// Numeric event primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(i32);

impl EventId {
    /// Wrap a raw primary key.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw primary key.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public slug identifying an event in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventIdentifier(String);

impl EventIdentifier {
    /// Wrap a slug. Surrounding whitespace is not significant.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self(raw.trim().to_owned())
    }

    /// Borrow the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event reference taken from a URL path segment.
///
/// A segment made only of ASCII digits that fits an [`EventId`] is an id;
/// anything else is treated as an identifier.
///
/// # Examples
/// ```
/// use ticketing_backend::domain::{EventId, EventRef};
///
/// assert_eq!(EventRef::parse("42"), EventRef::Id(EventId::new(42)));
/// assert_eq!(EventRef::parse("summer-fest").parameter_name(), "event_identifier");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRef {
    /// Reference by primary key.
    Id(EventId),
    /// Reference by slug.
    Identifier(EventIdentifier),
}

impl EventRef {
    /// Classify a raw path segment.
    pub fn parse(raw: &str) -> Self {
        let is_numeric = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
        match raw.parse::<i32>() {
            Ok(id) if is_numeric => Self::Id(EventId::new(id)),
            _ => Self::Identifier(EventIdentifier::new(raw)),
        }
    }

    /// Name of the URL parameter the reference came from.
    pub const fn parameter_name(&self) -> &'static str {
        match self {
            Self::Id(_) => "event_id",
            Self::Identifier(_) => "event_identifier",
        }
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::Identifier(identifier) => identifier.fmt(f),
        }
    }
}

/// Event as seen by the discount code service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub identifier: EventIdentifier,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", EventRef::Id(EventId::new(1)))]
    #[case("007", EventRef::Id(EventId::new(7)))]
    #[case("fest-2024", EventRef::Identifier(EventIdentifier::new("fest-2024")))]
    #[case("-3", EventRef::Identifier(EventIdentifier::new("-3")))]
    #[case("99999999999", EventRef::Identifier(EventIdentifier::new("99999999999")))]
    fn classifies_path_segments(#[case] raw: &str, #[case] expected: EventRef) {
        assert_eq!(EventRef::parse(raw), expected);
    }

    #[test]
    fn displays_the_raw_reference() {
        assert_eq!(EventRef::parse("12").to_string(), "12");
        assert_eq!(EventRef::parse("gala").to_string(), "gala");
    }
}
