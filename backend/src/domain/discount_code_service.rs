//! Discount code use cases.
//!
//! [`DiscountCodeService`] implements the driving ports on top of the
//! discount code and event repositories. It owns the order of checks for each
//! write: access, field-level rules, the quantity rule, the creation table,
//! the ticket code uniqueness check and finally persistence.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::discount_code_access::{
    TICKET_CODE_EXISTS, authorize_scope, resolve_create_plan, resolve_list_plan,
};
use crate::domain::ports::{
    CreateDiscountCodeRequest, CreatedDiscountCode, DiscountCodeCommand, DiscountCodePage,
    DiscountCodeQuery, DiscountCodeRepository, DiscountCodeRepositoryError, EventLinkChange,
    EventRepository, EventRepositoryError, ListDiscountCodesRequest, find_by_ref,
};
use crate::domain::{
    Caller, DiscountCode, DiscountCodeDraft, DiscountCodeId, Error, Event, EventId, EventRef,
    ScopedEvent,
};

/// JSON pointer of the `used-for` attribute.
pub const USED_FOR_POINTER: &str = "/data/attributes/used-for";
/// JSON pointer of the event linkage id in a request body.
pub const EVENT_LINK_POINTER: &str = "/data/relationships/event/data/id";
/// Client-facing detail of a `503`; the cause is only logged.
pub const STORE_UNAVAILABLE: &str = "Storage is temporarily unavailable";

/// Discount code service backed by repository ports.
#[derive(Clone)]
pub struct DiscountCodeService<C, E> {
    codes: Arc<C>,
    events: Arc<E>,
}

impl<C, E> DiscountCodeService<C, E> {
    /// Create a new service.
    pub fn new(codes: Arc<C>, events: Arc<E>) -> Self {
        Self { codes, events }
    }
}

fn map_code_error(error: DiscountCodeRepositoryError) -> Error {
    match error {
        DiscountCodeRepositoryError::Connection { message } => {
            debug!(%message, "discount code store connection failed");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        DiscountCodeRepositoryError::Query { message } => {
            Error::internal(format!("discount code store error: {message}"))
        }
    }
}

fn map_event_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            debug!(%message, "event store connection failed");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        EventRepositoryError::Query { message } => {
            Error::internal(format!("event store error: {message}"))
        }
    }
}

fn code_not_found(id: DiscountCodeId) -> Error {
    Error::not_found(format!("DiscountCode: {id} not found"))
}

impl<C, E> DiscountCodeService<C, E>
where
    C: DiscountCodeRepository,
    E: EventRepository,
{
    async fn require_code(&self, id: DiscountCodeId) -> Result<DiscountCode, Error> {
        self.codes
            .find_by_id(id)
            .await
            .map_err(map_code_error)?
            .ok_or_else(|| code_not_found(id))
    }

    async fn require_event(&self, id: EventId, pointer: &str) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(format!("Event: {id} not found")).with_pointer(pointer))
    }

    async fn check_linked_event(&self, draft: &DiscountCodeDraft) -> Result<(), Error> {
        if let Some(Some(event_id)) = draft.event_id {
            self.require_event(event_id, EVENT_LINK_POINTER).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<C, E> DiscountCodeQuery for DiscountCodeService<C, E>
where
    C: DiscountCodeRepository,
    E: EventRepository,
{
    async fn authorize_scope(
        &self,
        caller: &Caller,
        reference: Option<EventRef>,
    ) -> Result<Option<ScopedEvent>, Error> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        let event = find_by_ref(self.events.as_ref(), &reference)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| {
                Error::not_found(format!("Event: {reference} not found"))
                    .with_parameter(reference.parameter_name())
            })?;
        let scope = ScopedEvent { reference, event };
        authorize_scope(caller, &scope)?;
        Ok(Some(scope))
    }

    async fn list(
        &self,
        caller: &Caller,
        request: ListDiscountCodesRequest,
    ) -> Result<DiscountCodePage, Error> {
        let plan = resolve_list_plan(caller, request.scope.as_ref())?;
        let slice = self
            .codes
            .list(plan.filter, request.page, &request.sort)
            .await
            .map_err(map_code_error)?;
        Ok(DiscountCodePage {
            view: plan.view,
            codes: slice.codes,
            total: slice.total,
            page: request.page,
        })
    }

    async fn fetch(&self, _caller: &Caller, id: DiscountCodeId) -> Result<DiscountCode, Error> {
        self.require_code(id).await
    }

    async fn linked_event(
        &self,
        _caller: &Caller,
        id: DiscountCodeId,
    ) -> Result<Option<Event>, Error> {
        let Some(event_id) = self.require_code(id).await?.event_id else {
            return Ok(None);
        };
        self.events.find_by_id(event_id).await.map_err(map_event_error)
    }
}

#[async_trait]
impl<C, E> DiscountCodeCommand for DiscountCodeService<C, E>
where
    C: DiscountCodeRepository,
    E: EventRepository,
{
    async fn create(
        &self,
        caller: &Caller,
        request: CreateDiscountCodeRequest,
    ) -> Result<CreatedDiscountCode, Error> {
        let CreateDiscountCodeRequest { scope, draft } = request;
        if let Some(scope) = scope.as_ref() {
            authorize_scope(caller, scope)?;
        }
        let used_for = draft.used_for().ok_or_else(|| {
            Error::unprocessable("Missing data for required field.").with_pointer(USED_FOR_POINTER)
        })?;
        draft.proposed_quantities().validate()?;

        let plan = resolve_create_plan(caller, scope.as_ref(), used_for)?;
        // Read-then-write: two concurrent creations for one event can both pass.
        if let Some(unique) = plan.uniqueness.as_ref() {
            let exists = self
                .codes
                .ticket_code_exists(unique.event_id)
                .await
                .map_err(map_code_error)?;
            if exists {
                return Err(Error::unprocessable(TICKET_CODE_EXISTS).with_parameter(unique.parameter));
            }
        }

        let mut record = draft.into_new(used_for);
        if let Some(event_id) = plan.stamp_event {
            record.event_id = Some(event_id);
        } else if let Some(event_id) = record.event_id {
            self.require_event(event_id, EVENT_LINK_POINTER).await?;
        }

        let code = self.codes.insert(&record).await.map_err(map_code_error)?;
        info!(
            user_id = %caller.user_id(),
            discount_code_id = %code.id,
            used_for = %used_for,
            "discount code created"
        );
        Ok(CreatedDiscountCode {
            view: plan.view,
            code,
        })
    }

    async fn update(
        &self,
        caller: &Caller,
        id: DiscountCodeId,
        draft: DiscountCodeDraft,
    ) -> Result<DiscountCode, Error> {
        let mut code = self.require_code(id).await?;
        draft
            .proposed_quantities()
            .defaulted_from(code.quantity_snapshot())
            .validate()?;
        self.check_linked_event(&draft).await?;

        draft.apply_to(&mut code);
        let updated = self.codes.update(&code).await.map_err(map_code_error)?;
        if !updated {
            return Err(code_not_found(id));
        }
        info!(user_id = %caller.user_id(), discount_code_id = %id, "discount code updated");
        Ok(code)
    }

    async fn delete(&self, caller: &Caller, id: DiscountCodeId) -> Result<(), Error> {
        let deleted = self.codes.delete(id).await.map_err(map_code_error)?;
        if !deleted {
            return Err(code_not_found(id));
        }
        info!(user_id = %caller.user_id(), discount_code_id = %id, "discount code deleted");
        Ok(())
    }

    async fn change_event_link(
        &self,
        caller: &Caller,
        id: DiscountCodeId,
        change: EventLinkChange,
    ) -> Result<DiscountCode, Error> {
        let mut code = self.require_code(id).await?;
        let target = match change {
            EventLinkChange::Replace(Some(event_id)) | EventLinkChange::Add(event_id) => {
                self.require_event(event_id, "/data/id").await?;
                Some(event_id)
            }
            EventLinkChange::Replace(None) => None,
            EventLinkChange::Remove(event_id) if code.event_id == Some(event_id) => None,
            EventLinkChange::Remove(_) => return Ok(code),
        };
        if code.event_id == target {
            return Ok(code);
        }

        code.event_id = target;
        if !self.codes.update(&code).await.map_err(map_code_error)? {
            return Err(code_not_found(id));
        }
        info!(
            user_id = %caller.user_id(),
            discount_code_id = %id,
            event_id = ?target.map(EventId::get),
            "discount code event link changed"
        );
        Ok(code)
    }
}

#[cfg(test)]
#[path = "discount_code_service_tests.rs"]
mod tests;
