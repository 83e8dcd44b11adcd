//! Driving port for discount code writes.

use async_trait::async_trait;

use crate::domain::{
    Caller, DiscountCode, DiscountCodeDraft, DiscountCodeId, Error, EventId, SchemaView,
    ScopedEvent,
};

/// Create request. `scope` must come from
/// [`DiscountCodeQuery::authorize_scope`](super::DiscountCodeQuery::authorize_scope).
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDiscountCodeRequest {
    pub scope: Option<ScopedEvent>,
    pub draft: DiscountCodeDraft,
}

/// Newly created code and the view it is rendered in.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedDiscountCode {
    pub view: SchemaView,
    pub code: DiscountCode,
}

/// Change to a code's event link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLinkChange {
    /// Point at the event, or clear the link.
    Replace(Option<EventId>),
    /// Point at the event.
    Add(EventId),
    /// Clear the link if it points at the event.
    Remove(EventId),
}

/// Domain use-case port for discount code writes.
#[async_trait]
pub trait DiscountCodeCommand: Send + Sync {
    /// Validate and insert a code.
    async fn create(
        &self,
        caller: &Caller,
        request: CreateDiscountCodeRequest,
    ) -> Result<CreatedDiscountCode, Error>;

    /// Merge proposed changes over the stored code, validate and persist.
    async fn update(
        &self,
        caller: &Caller,
        id: DiscountCodeId,
        draft: DiscountCodeDraft,
    ) -> Result<DiscountCode, Error>;

    /// Remove a code.
    async fn delete(&self, caller: &Caller, id: DiscountCodeId) -> Result<(), Error>;

    /// Change the event a code is linked to.
    async fn change_event_link(
        &self,
        caller: &Caller,
        id: DiscountCodeId,
        change: EventLinkChange,
    ) -> Result<DiscountCode, Error>;
}
