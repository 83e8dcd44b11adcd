//! Port for discount code persistence.

use async_trait::async_trait;

use crate::domain::listing::{PageRequest, SortKey};
use crate::domain::{DiscountCode, DiscountCodeFilter, DiscountCodeId, EventId, NewDiscountCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by discount code repository adapters.
    pub enum DiscountCodeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "discount code repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "discount code repository query failed: {message}",
    }
}

/// One page of discount codes plus the size of the whole filtered set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountCodeSlice {
    pub codes: Vec<DiscountCode>,
    pub total: u64,
}

/// Storage of discount codes.
///
/// Sort keys are applied in order, then by ascending id so pages are stable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscountCodeRepository: Send + Sync {
    /// Fetch one page of the rows matching `filter`.
    async fn list(
        &self,
        filter: DiscountCodeFilter,
        page: PageRequest,
        sort: &[SortKey],
    ) -> Result<DiscountCodeSlice, DiscountCodeRepositoryError>;

    /// Fetch a code by id; `None` when it does not exist.
    async fn find_by_id(
        &self,
        id: DiscountCodeId,
    ) -> Result<Option<DiscountCode>, DiscountCodeRepositoryError>;

    /// Whether `event_id` already owns a `used_for = ticket` code.
    async fn ticket_code_exists(&self, event_id: EventId)
    -> Result<bool, DiscountCodeRepositoryError>;

    /// Insert a code and return it with its assigned id and timestamp.
    async fn insert(
        &self,
        code: &NewDiscountCode,
    ) -> Result<DiscountCode, DiscountCodeRepositoryError>;

    /// Overwrite every mutable column. Returns `false` when the row is gone.
    async fn update(&self, code: &DiscountCode) -> Result<bool, DiscountCodeRepositoryError>;

    /// Delete a code. Returns `false` when nothing was deleted.
    async fn delete(&self, id: DiscountCodeId) -> Result<bool, DiscountCodeRepositoryError>;
}
