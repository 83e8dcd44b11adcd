//! Who may list and create discount codes, and how the result is shaped.
//!
//! Both tables are pure: they take the caller, the already resolved URL scope
//! and (for creation) the requested `used_for`, and return a plan naming the
//! serialization view plus the filter or event stamp to apply. Rows are tried
//! top to bottom and the first match wins.

use tracing::warn;

use crate::domain::{Caller, Error, Event, EventId, EventRef, UsedFor};

/// Rejection for callers who neither administer nor organize.
pub const NEITHER_ADMIN_NOR_ORGANIZER: &str = "Neither Admin nor Organizer";
/// Rejection for scoped requests from callers outside the event.
pub const ORGANIZER_ACCESS_REQUIRED: &str = "Organizer access is required";
/// Rejection for ticket codes created without an event scope.
pub const ORGANIZERS_USE_EVENT_ENDPOINT: &str =
    "Organizers use v1/events/<int:event_id>/discount-codes endpoint";
/// Rejection for event codes created under an event scope.
pub const ADMINS_USE_ROOT_ENDPOINT: &str = "Admins use v1/discount-codes endpoint";
/// Rejection for a second ticket code on one event.
pub const TICKET_CODE_EXISTS: &str = "Discount Code already exists for the provided Event ID";

/// Serialization variant of a discount code.
///
/// Both views carry the same attributes; they differ in how the event link is
/// named and where its related link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaView {
    /// Organizer view: one owning event under the `event` key.
    Ticket,
    /// Administrator view: the `events` key.
    Event,
}

impl SchemaView {
    /// Key of the event relationship in the resource object.
    pub const fn relationship_key(self) -> &'static str {
        match self {
            Self::Ticket => "event",
            Self::Event => "events",
        }
    }
}

/// Event named by the URL, resolved against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedEvent {
    pub reference: EventRef,
    pub event: Event,
}

impl ScopedEvent {
    /// Event primary key.
    pub fn event_id(&self) -> EventId {
        self.event.id
    }
}

/// Rows a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountCodeFilter {
    /// Every discount code.
    All,
    /// Codes attached to one event.
    Event(EventId),
}

/// Outcome of the listing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPlan {
    pub view: SchemaView,
    pub filter: DiscountCodeFilter,
}

/// Uniqueness requirement attached to a creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCodeUniqueness {
    pub event_id: EventId,
    /// URL parameter a duplicate is reported against.
    pub parameter: &'static str,
}

/// Outcome of the creation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub view: SchemaView,
    /// Event to stamp on the new record, overriding the request body.
    pub stamp_event: Option<EventId>,
    /// Existing ticket code to rule out before inserting.
    pub uniqueness: Option<TicketCodeUniqueness>,
}

/// Access guard for event scoped URLs: administrators and the event's
/// organizers pass.
pub fn authorize_scope(caller: &Caller, scope: &ScopedEvent) -> Result<(), Error> {
    if caller.is_admin() || caller.manages_event(scope.event_id()) {
        return Ok(());
    }
    warn!(
        user_id = %caller.user_id(),
        event_id = %scope.event_id(),
        "caller does not manage scoped event"
    );
    Err(Error::forbidden(ORGANIZER_ACCESS_REQUIRED).with_parameter(scope.reference.parameter_name()))
}

/// Pick the view and filter for a listing.
///
/// # Examples
/// ```
/// use ticketing_backend::domain::discount_code_access::{resolve_list_plan, DiscountCodeFilter, SchemaView};
/// use ticketing_backend::domain::{Caller, UserId};
///
/// let admin = Caller::new(UserId::new(1)).with_admin(true);
/// let plan = resolve_list_plan(&admin, None).unwrap();
/// assert_eq!(plan.view, SchemaView::Event);
/// assert_eq!(plan.filter, DiscountCodeFilter::All);
/// ```
pub fn resolve_list_plan(caller: &Caller, scope: Option<&ScopedEvent>) -> Result<ListPlan, Error> {
    if let Some(scope) = scope {
        if caller.manages_event(scope.event_id()) {
            return Ok(ListPlan {
                view: SchemaView::Ticket,
                filter: DiscountCodeFilter::Event(scope.event_id()),
            });
        }
    }
    if caller.is_admin() {
        return Ok(ListPlan {
            view: SchemaView::Event,
            filter: DiscountCodeFilter::All,
        });
    }
    Err(Error::unprocessable(NEITHER_ADMIN_NOR_ORGANIZER))
}

/// Pick the view, event stamp and uniqueness check for a creation.
pub fn resolve_create_plan(
    caller: &Caller,
    scope: Option<&ScopedEvent>,
    used_for: UsedFor,
) -> Result<CreatePlan, Error> {
    match (scope, used_for) {
        (Some(scope), UsedFor::Ticket) if caller.is_organizer() => Ok(CreatePlan {
            view: SchemaView::Ticket,
            stamp_event: Some(scope.event_id()),
            uniqueness: Some(TicketCodeUniqueness {
                event_id: scope.event_id(),
                parameter: scope.reference.parameter_name(),
            }),
        }),
        (None, UsedFor::Ticket) => Err(Error::unprocessable(ORGANIZERS_USE_EVENT_ENDPOINT)),
        (None, UsedFor::Event) if caller.is_admin() => Ok(CreatePlan {
            view: SchemaView::Event,
            stamp_event: None,
            uniqueness: None,
        }),
        (Some(_), UsedFor::Event) if caller.is_admin() => {
            Err(Error::unprocessable(ADMINS_USE_ROOT_ENDPOINT))
        }
        _ => Err(Error::unprocessable(NEITHER_ADMIN_NOR_ORGANIZER)),
    }
}

#[cfg(test)]
mod tests {
    //! Decision table coverage.
    use super::*;
    use crate::domain::{ErrorCode, ErrorSource, EventIdentifier, EventRole, UserId};
    use rstest::{fixture, rstest};

    fn event(id: i32) -> Event {
        Event {
            id: EventId::new(id),
            identifier: EventIdentifier::new(format!("event-{id}")),
            name: format!("Event {id}"),
        }
    }

    fn by_id(id: i32) -> ScopedEvent {
        ScopedEvent {
            reference: EventRef::Id(EventId::new(id)),
            event: event(id),
        }
    }

    fn by_identifier(id: i32) -> ScopedEvent {
        ScopedEvent {
            reference: EventRef::Identifier(EventIdentifier::new(format!("event-{id}"))),
            event: event(id),
        }
    }

    fn admin_caller() -> Caller {
        Caller::new(UserId::new(1)).with_admin(true)
    }

    fn organizer_caller() -> Caller {
        Caller::new(UserId::new(2)).with_event_role(EventId::new(1), EventRole::Organizer)
    }

    fn plain_caller() -> Caller {
        Caller::new(UserId::new(3))
    }

    #[fixture]
    fn admin() -> Caller {
        admin_caller()
    }

    #[fixture]
    fn organizer() -> Caller {
        organizer_caller()
    }

    #[fixture]
    fn nobody() -> Caller {
        plain_caller()
    }

    #[rstest]
    fn guard_admits_admins_and_event_organizers(admin: Caller, organizer: Caller) {
        assert!(authorize_scope(&admin, &by_id(9)).is_ok());
        assert!(authorize_scope(&organizer, &by_id(1)).is_ok());
    }

    #[rstest]
    #[case(by_id(9), "event_id")]
    #[case(by_identifier(9), "event_identifier")]
    fn guard_rejects_outsiders(organizer: Caller, #[case] scope: ScopedEvent, #[case] parameter: &str) {
        let err = authorize_scope(&organizer, &scope).expect_err("not their event");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), ORGANIZER_ACCESS_REQUIRED);
        assert_eq!(err.error_source(), Some(&ErrorSource::Parameter(parameter.into())));
    }

    #[rstest]
    #[case(by_id(1))]
    #[case(by_identifier(1))]
    fn organizers_list_their_event_in_ticket_view(organizer: Caller, #[case] scope: ScopedEvent) {
        let plan = resolve_list_plan(&organizer, Some(&scope)).expect("organizer plan");
        assert_eq!(plan.view, SchemaView::Ticket);
        assert_eq!(plan.filter, DiscountCodeFilter::Event(EventId::new(1)));
    }

    #[rstest]
    fn admins_outside_the_event_fall_through_to_the_admin_row(admin: Caller) {
        let plan = resolve_list_plan(&admin, Some(&by_id(4))).expect("admin plan");
        assert_eq!(plan.view, SchemaView::Event);
        assert_eq!(plan.filter, DiscountCodeFilter::All);
    }

    #[rstest]
    fn organizers_without_scope_are_rejected(organizer: Caller) {
        let err = resolve_list_plan(&organizer, None).expect_err("no unscoped listing");
        assert_eq!(err.message(), NEITHER_ADMIN_NOR_ORGANIZER);
    }

    #[rstest]
    fn callers_without_roles_are_rejected(nobody: Caller) {
        let err = resolve_list_plan(&nobody, None).expect_err("no roles");
        assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
        assert_eq!(err.message(), NEITHER_ADMIN_NOR_ORGANIZER);
    }

    #[rstest]
    #[case(by_id(1), "event_id")]
    #[case(by_identifier(1), "event_identifier")]
    fn scoped_ticket_codes_are_stamped(
        organizer: Caller,
        #[case] scope: ScopedEvent,
        #[case] parameter: &'static str,
    ) {
        let plan = resolve_create_plan(&organizer, Some(&scope), UsedFor::Ticket).expect("plan");
        assert_eq!(
            plan,
            CreatePlan {
                view: SchemaView::Ticket,
                stamp_event: Some(EventId::new(1)),
                uniqueness: Some(TicketCodeUniqueness {
                    event_id: EventId::new(1),
                    parameter,
                }),
            }
        );
    }

    #[rstest]
    #[case(organizer_caller())]
    #[case(admin_caller())]
    #[case(plain_caller())]
    fn unscoped_ticket_codes_point_at_the_event_endpoint(#[case] caller: Caller) {
        let err = resolve_create_plan(&caller, None, UsedFor::Ticket).expect_err("needs scope");
        assert_eq!(err.message(), ORGANIZERS_USE_EVENT_ENDPOINT);
    }

    #[rstest]
    fn admins_create_event_codes_unscoped(admin: Caller) {
        let plan = resolve_create_plan(&admin, None, UsedFor::Event).expect("plan");
        assert_eq!(plan.view, SchemaView::Event);
        assert_eq!(plan.stamp_event, None);
        assert_eq!(plan.uniqueness, None);
    }

    #[rstest]
    fn admins_may_not_create_event_codes_under_a_scope(admin: Caller) {
        let err = resolve_create_plan(&admin, Some(&by_id(1)), UsedFor::Event).expect_err("scoped");
        assert_eq!(err.message(), ADMINS_USE_ROOT_ENDPOINT);
    }

    #[rstest]
    fn organizers_may_not_create_event_codes(organizer: Caller) {
        let scoped = resolve_create_plan(&organizer, Some(&by_id(1)), UsedFor::Event);
        let unscoped = resolve_create_plan(&organizer, None, UsedFor::Event);
        for outcome in [scoped, unscoped] {
            let err = outcome.expect_err("not an admin");
            assert_eq!(err.message(), NEITHER_ADMIN_NOR_ORGANIZER);
        }
    }

    #[test]
    fn views_name_their_relationship() {
        assert_eq!(SchemaView::Ticket.relationship_key(), "event");
        assert_eq!(SchemaView::Event.relationship_key(), "events");
    }
}
