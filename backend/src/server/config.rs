//! Inputs for building the HTTP server.

use std::net::SocketAddr;

use ticketing_backend::inbound::http::auth::TokenVerifier;
use ticketing_backend::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) tokens: TokenVerifier,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, tokens: TokenVerifier) -> Self {
        Self {
            bind_addr,
            db_pool,
            tokens,
        }
    }
}
