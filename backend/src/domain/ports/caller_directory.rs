//! Port resolving an authenticated user id into a [`Caller`].

use async_trait::async_trait;

use crate::domain::{Caller, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading caller identities.
    pub enum CallerDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } => "caller directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "caller directory query failed: {message}",
    }
}

/// Loads a user's administrator flags and event roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallerDirectory: Send + Sync {
    /// `None` when the user no longer exists.
    async fn find_caller(&self, user_id: UserId) -> Result<Option<Caller>, CallerDirectoryError>;
}
