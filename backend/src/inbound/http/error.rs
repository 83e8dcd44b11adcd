//! HTTP adapter mapping for domain errors.
//!
//! Domain errors become JSON:API error documents. Internal errors are
//! redacted before they leave the process; the trace id is kept so operators
//! can find the logged cause.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use super::document::{JSONAPI_MEDIA_TYPE, JsonApiVersion};
use crate::domain::{Error, ErrorCode, ErrorSource, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `source` member of an error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSourceObject {
    Pointer(String),
    Parameter(String),
}

/// `meta` member of an error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMeta {
    pub trace_id: String,
}

/// One JSON:API error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorObject {
    #[schema(example = "422")]
    pub status: String,
    #[schema(example = "unprocessable_entity")]
    pub code: String,
    #[schema(example = "Unprocessable Entity")]
    pub title: String,
    #[schema(example = "min-quantity should be less than max-quantity")]
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ErrorMeta>,
}

/// JSON:API error document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
    pub jsonapi: JsonApiVersion,
}

impl ErrorDocument {
    fn from_error(error: &Error) -> Self {
        let status = status_for(error.code());
        let object = if matches!(error.code(), ErrorCode::InternalError) {
            ErrorObject {
                status: status.as_u16().to_string(),
                code: error.code().as_str().to_owned(),
                title: title_for(status),
                detail: "Internal server error".to_owned(),
                source: None,
                meta: trace_meta(error),
            }
        } else {
            ErrorObject {
                status: status.as_u16().to_string(),
                code: error.code().as_str().to_owned(),
                title: title_for(status),
                detail: error.message().to_owned(),
                source: error.error_source().map(|source| match source {
                    ErrorSource::Pointer(pointer) => ErrorSourceObject::Pointer(pointer.clone()),
                    ErrorSource::Parameter(name) => ErrorSourceObject::Parameter(name.clone()),
                }),
                meta: trace_meta(error),
            }
        };
        Self {
            errors: vec![object],
            jsonapi: JsonApiVersion::default(),
        }
    }
}

fn title_for(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Error").to_owned()
}

fn trace_meta(error: &Error) -> Option<ErrorMeta> {
    error.trace_id().map(|id| ErrorMeta {
        trace_id: id.to_owned(),
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(error = %self, trace_id = ?self.trace_id(), "internal error returned to client");
        }
        let mut builder = HttpResponse::build(self.status_code());
        builder.content_type(JSONAPI_MEDIA_TYPE);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorDocument::from_error(self))
    }
}

/// Turn JSON body failures into `400` documents.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match err {
        JsonPayloadError::ContentType => {
            Error::invalid_request(format!("Content-Type must be {JSONAPI_MEDIA_TYPE}"))
        }
        other => Error::invalid_request(format!("Request body is not valid JSON: {other}"))
            .with_pointer("/"),
    };
    error.into()
}

/// Turn query string failures into `400` documents.
pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("Invalid query string: {err}")).into()
}

/// Turn path segment failures into `404` documents.
pub(crate) fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::not_found(format!("Resource not found: {err}")).into()
}
