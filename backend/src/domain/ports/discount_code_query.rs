//! Driving port for reading discount codes.
//!
//! Inbound adapters resolve the caller and the URL scope, then ask this port
//! for listings and single records. The service picks the serialization view;
//! adapters only render it.

use async_trait::async_trait;

use crate::domain::listing::{PageRequest, SortKey};
use crate::domain::{
    Caller, DiscountCode, DiscountCodeId, Error, Event, EventRef, SchemaView, ScopedEvent,
};

/// Parameters of a collection request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiscountCodesRequest {
    pub scope: Option<ScopedEvent>,
    pub page: PageRequest,
    pub sort: Vec<SortKey>,
}

/// A rendered-ready page of discount codes.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCodePage {
    pub view: SchemaView,
    pub codes: Vec<DiscountCode>,
    pub total: u64,
    pub page: PageRequest,
}

/// Domain use-case port for discount code reads.
#[async_trait]
pub trait DiscountCodeQuery: Send + Sync {
    /// Resolve an event scope from the URL and run the access guard on it.
    ///
    /// Unscoped requests pass through as `None`.
    async fn authorize_scope(
        &self,
        caller: &Caller,
        reference: Option<EventRef>,
    ) -> Result<Option<ScopedEvent>, Error>;

    /// List the codes the caller may see.
    async fn list(
        &self,
        caller: &Caller,
        request: ListDiscountCodesRequest,
    ) -> Result<DiscountCodePage, Error>;

    /// Fetch one code.
    async fn fetch(&self, caller: &Caller, id: DiscountCodeId) -> Result<DiscountCode, Error>;

    /// The event a code links to, or `None` when it is unlinked.
    async fn linked_event(&self, caller: &Caller, id: DiscountCodeId)
    -> Result<Option<Event>, Error>;
}
