//! Bearer token authentication.
//!
//! The identity service signs HS256 tokens whose `identity` claim holds the
//! numeric user id. Tokens arrive as `Authorization: JWT <token>` or
//! `Authorization: Bearer <token>`. Handlers take an [`AuthenticatedCaller`]
//! argument to require a valid token and receive the caller's roles.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::HttpState;
use crate::domain::discount_code_service::STORE_UNAVAILABLE;
use crate::domain::ports::CallerDirectoryError;
use crate::domain::{Caller, Error, UserId};

const AUTH_SCHEMES: [&str; 2] = ["JWT", "Bearer"];

/// Claims read from an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User id.
    pub identity: i32,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Verifies access tokens signed with the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Verifier for HS256 tokens signed with `secret`.
    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Check signature and expiry and return the user id.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        decode::<IdentityClaims>(token, &self.key, &self.validation)
            .map(|data| UserId::new(data.claims.identity))
            .map_err(|err| {
                debug!(error = %err, "rejected access token");
                Error::unauthorized("Invalid or expired token")
            })
    }
}

/// Extract the token from an `Authorization` header value.
pub(crate) fn token_from_header(header: &str) -> Result<&str, Error> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("Authorization header must be `JWT <token>`"))?;
    if !AUTH_SCHEMES.contains(&scheme) {
        return Err(Error::unauthorized(format!(
            "Unsupported authorization scheme: {scheme}"
        )));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("Authorization token is empty"));
    }
    Ok(token)
}

/// The authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

impl AuthenticatedCaller {
    /// Borrow the caller.
    pub fn caller(&self) -> &Caller {
        &self.0
    }
}

fn map_directory_error(error: CallerDirectoryError) -> Error {
    match error {
        CallerDirectoryError::Connection { message } => {
            debug!(%message, "caller directory connection failed");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        CallerDirectoryError::Query { message } => {
            Error::internal(format!("caller directory query failed: {message}"))
        }
    }
}

async fn authenticate(state: web::Data<HttpState>, header: Option<String>) -> Result<Caller, Error> {
    let header = header.ok_or_else(|| Error::unauthorized("Authorization header is missing"))?;
    let user_id = state.tokens.verify(token_from_header(&header)?)?;
    state
        .callers
        .find_caller(user_id)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("User for this token no longer exists"))
}

impl FromRequest for AuthenticatedCaller {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            authenticate(state, header)
                .await
                .map(AuthenticatedCaller)
                .map_err(actix_web::Error::from)
        })
    }
}
