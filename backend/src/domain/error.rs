//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope. Each error captures the
//! trace identifier of the request it was raised in, when one is in scope.

use std::fmt;

use crate::domain::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request is malformed.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with the target resource (wrong resource type).
    Conflict,
    /// The request is well formed but its content is rejected.
    UnprocessableEntity,
    /// A backing service (database, pool) is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// Snake-case identifier used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::UnprocessableEntity => "unprocessable_entity",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of the offending input.
///
/// A pointer is a JSON pointer into the request document; a parameter names a
/// URL path or query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSource {
    /// JSON pointer into the request body, e.g. `/data/attributes/value`.
    Pointer(String),
    /// Name of a path or query parameter, e.g. `event_id`.
    Parameter(String),
}

/// Error returned by every domain operation.
///
/// # Examples
/// ```
/// use ticketing_backend::domain::{Error, ErrorCode, ErrorSource};
///
/// let err = Error::unprocessable("Not a valid choice.")
///     .with_pointer("/data/attributes/type");
/// assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
/// assert_eq!(
///     err.error_source(),
///     Some(&ErrorSource::Pointer("/data/attributes/type".into()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    source: Option<ErrorSource>,
    trace_id: Option<String>,
}

impl Error {
    /// Create an error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Offending input location, if known.
    pub fn error_source(&self) -> Option<&ErrorSource> {
        self.source.as_ref()
    }

    /// Trace identifier of the request that raised the error.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach a JSON pointer into the request document.
    #[must_use]
    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.source = Some(ErrorSource::Pointer(pointer.into()));
        self
    }

    /// Attach the name of the offending URL parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.source = Some(ErrorSource::Parameter(parameter.into()));
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::UnprocessableEntity`].
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnprocessableEntity, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("x"), "invalid_request")]
    #[case(Error::conflict("x"), "conflict")]
    #[case(Error::unprocessable("x"), "unprocessable_entity")]
    #[case(Error::service_unavailable("x"), "service_unavailable")]
    fn codes_render_in_snake_case(#[case] err: Error, #[case] expected: &str) {
        assert_eq!(err.code().as_str(), expected);
    }

    #[test]
    fn later_source_replaces_earlier_one() {
        let err = Error::not_found("Event: x not found")
            .with_pointer("/data")
            .with_parameter("event_identifier");
        assert_eq!(
            err.error_source(),
            Some(&ErrorSource::Parameter("event_identifier".into()))
        );
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("valid uuid");
        let err = TraceId::scope(trace_id, async { Error::forbidden("no") }).await;
        assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn no_trace_id_out_of_scope() {
        assert!(Error::internal("boom").trace_id().is_none());
    }
}
