//! Wire the Diesel adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use ticketing_backend::domain::DiscountCodeService;
use ticketing_backend::domain::ports::{DiscountCodeCommand, DiscountCodeQuery};
use ticketing_backend::inbound::http::auth::TokenVerifier;
use ticketing_backend::inbound::http::state::HttpState;
use ticketing_backend::outbound::persistence::{
    DbPool, DieselCallerDirectory, DieselDiscountCodeRepository, DieselEventRepository,
};

/// One service instance backs both the query and the command port.
pub(crate) fn build_http_state(pool: &DbPool, tokens: TokenVerifier) -> web::Data<HttpState> {
    let service = Arc::new(DiscountCodeService::new(
        Arc::new(DieselDiscountCodeRepository::new(pool.clone())),
        Arc::new(DieselEventRepository::new(pool.clone())),
    ));
    let query: Arc<dyn DiscountCodeQuery> = service.clone();
    let command: Arc<dyn DiscountCodeCommand> = service;
    web::Data::new(HttpState::new(
        query,
        command,
        Arc::new(DieselCallerDirectory::new(pool.clone())),
        tokens,
    ))
}
