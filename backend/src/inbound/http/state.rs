//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use super::auth::TokenVerifier;
use crate::domain::ports::{CallerDirectory, DiscountCodeCommand, DiscountCodeQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub discount_codes: Arc<dyn DiscountCodeQuery>,
    pub discount_code_commands: Arc<dyn DiscountCodeCommand>,
    pub callers: Arc<dyn CallerDirectory>,
    pub tokens: TokenVerifier,
}

impl HttpState {
    /// Bundle the ports and the token verifier.
    pub fn new(
        discount_codes: Arc<dyn DiscountCodeQuery>,
        discount_code_commands: Arc<dyn DiscountCodeCommand>,
        callers: Arc<dyn CallerDirectory>,
        tokens: TokenVerifier,
    ) -> Self {
        Self {
            discount_codes,
            discount_code_commands,
            callers,
            tokens,
        }
    }
}
