//! Tests for the discount code service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::listing::PageRequest;
use crate::domain::ports::{DiscountCodeSlice, MockDiscountCodeRepository, MockEventRepository};
use crate::domain::{
    DiscountCodeFilter, DiscountType, ErrorCode, ErrorSource, EventIdentifier, EventRole,
    SchemaView, UsedFor, UserId,
};

type Service = DiscountCodeService<MockDiscountCodeRepository, MockEventRepository>;

fn make_service(codes: MockDiscountCodeRepository, events: MockEventRepository) -> Service {
    DiscountCodeService::new(Arc::new(codes), Arc::new(events))
}

fn event(id: i32) -> Event {
    Event {
        id: EventId::new(id),
        identifier: EventIdentifier::new(format!("event-{id}")),
        name: format!("Event {id}"),
    }
}

fn stored(id: i32) -> DiscountCode {
    DiscountCode {
        id: DiscountCodeId::new(id),
        code: Some("EARLY".into()),
        discount_url: None,
        value: Some(10.0),
        discount_type: Some(DiscountType::Amount),
        is_active: true,
        tickets_number: Some(100),
        min_quantity: Some(1),
        max_quantity: Some(50),
        valid_from: None,
        valid_till: None,
        tickets: None,
        used_for: Some(UsedFor::Ticket),
        event_id: Some(EventId::new(1)),
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[fixture]
fn organizer() -> Caller {
    Caller::new(UserId::new(2)).with_event_role(EventId::new(1), EventRole::Organizer)
}

#[fixture]
fn admin() -> Caller {
    Caller::new(UserId::new(1)).with_admin(true)
}

fn scoped(id: i32) -> ScopedEvent {
    ScopedEvent {
        reference: EventRef::Id(EventId::new(id)),
        event: event(id),
    }
}

fn ticket_draft() -> DiscountCodeDraft {
    DiscountCodeDraft {
        code: Some(Some("T10".into())),
        used_for: Some(Some(UsedFor::Ticket)),
        min_quantity: Some(Some(1)),
        max_quantity: Some(Some(5)),
        ..DiscountCodeDraft::default()
    }
}

#[rstest]
#[tokio::test]
async fn authorize_scope_reports_unknown_events_by_parameter(organizer: Caller) {
    let mut events = MockEventRepository::new();
    events
        .expect_find_by_identifier()
        .times(1)
        .return_once(|_| Ok(None));
    let service = make_service(MockDiscountCodeRepository::new(), events);

    let err = service
        .authorize_scope(&organizer, Some(EventRef::parse("nope")))
        .await
        .expect_err("unknown event");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Event: nope not found");
    assert_eq!(
        err.error_source(),
        Some(&ErrorSource::Parameter("event_identifier".into()))
    );
}

#[rstest]
#[tokio::test]
async fn authorize_scope_forbids_foreign_events(organizer: Caller) {
    let mut events = MockEventRepository::new();
    events
        .expect_find_by_id()
        .with(eq(EventId::new(8)))
        .return_once(|_| Ok(Some(event(8))));
    let service = make_service(MockDiscountCodeRepository::new(), events);

    let err = service
        .authorize_scope(&organizer, Some(EventRef::parse("8")))
        .await
        .expect_err("not their event");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn list_filters_by_the_scoped_event(organizer: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes
        .expect_list()
        .withf(|filter, page, sort| {
            *filter == DiscountCodeFilter::Event(EventId::new(1))
                && *page == PageRequest::default()
                && sort.is_empty()
        })
        .times(1)
        .return_once(|_, _, _| {
            Ok(DiscountCodeSlice {
                codes: vec![stored(3)],
                total: 1,
            })
        });
    let service = make_service(codes, MockEventRepository::new());

    let page = service
        .list(
            &organizer,
            ListDiscountCodesRequest {
                scope: Some(scoped(1)),
                ..ListDiscountCodesRequest::default()
            },
        )
        .await
        .expect("listing");
    assert_eq!(page.view, SchemaView::Ticket);
    assert_eq!(page.total, 1);
    assert_eq!(page.codes, vec![stored(3)]);
}

#[tokio::test]
async fn list_rejects_callers_without_roles() {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_list().never();
    let service = make_service(codes, MockEventRepository::new());

    let err = service
        .list(&Caller::new(UserId::new(9)), ListDiscountCodesRequest::default())
        .await
        .expect_err("no roles");
    assert_eq!(err.message(), "Neither Admin nor Organizer");
}

#[rstest]
#[tokio::test]
async fn fetch_reports_missing_codes(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(codes, MockEventRepository::new());

    let err = service
        .fetch(&admin, DiscountCodeId::new(77))
        .await
        .expect_err("missing");
    assert_eq!(err.message(), "DiscountCode: 77 not found");
}

#[rstest]
#[tokio::test]
async fn create_stamps_the_scoped_event(organizer: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes
        .expect_ticket_code_exists()
        .with(eq(EventId::new(1)))
        .return_once(|_| Ok(false));
    codes
        .expect_insert()
        .withf(|record| record.event_id == Some(EventId::new(1)) && record.used_for == UsedFor::Ticket)
        .times(1)
        .return_once(|_| Ok(stored(11)));
    let service = make_service(codes, MockEventRepository::new());

    let created = service
        .create(
            &organizer,
            CreateDiscountCodeRequest {
                scope: Some(scoped(1)),
                draft: ticket_draft(),
            },
        )
        .await
        .expect("created");
    assert_eq!(created.view, SchemaView::Ticket);
    assert_eq!(created.code.id, DiscountCodeId::new(11));
}

#[rstest]
#[tokio::test]
async fn create_rejects_a_second_ticket_code(organizer: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_ticket_code_exists().return_once(|_| Ok(true));
    codes.expect_insert().never();
    let service = make_service(codes, MockEventRepository::new());

    let err = service
        .create(
            &organizer,
            CreateDiscountCodeRequest {
                scope: Some(scoped(1)),
                draft: ticket_draft(),
            },
        )
        .await
        .expect_err("duplicate");
    assert_eq!(err.message(), "Discount Code already exists for the provided Event ID");
    assert_eq!(err.error_source(), Some(&ErrorSource::Parameter("event_id".into())));
}

#[rstest]
#[tokio::test]
async fn create_checks_quantities_before_the_decision_table(organizer: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_ticket_code_exists().never();
    let service = make_service(codes, MockEventRepository::new());
    let draft = DiscountCodeDraft {
        min_quantity: Some(Some(5)),
        max_quantity: Some(Some(3)),
        ..ticket_draft()
    };

    // Unscoped ticket codes are rejected by the table, but the range rule
    // runs first.
    let err = service
        .create(&organizer, CreateDiscountCodeRequest { scope: None, draft })
        .await
        .expect_err("bad range");
    assert_eq!(
        err.error_source(),
        Some(&ErrorSource::Pointer("/data/attributes/min-quantity".into()))
    );
}

#[rstest]
#[tokio::test]
async fn create_requires_used_for(admin: Caller) {
    let service = make_service(MockDiscountCodeRepository::new(), MockEventRepository::new());
    let err = service
        .create(
            &admin,
            CreateDiscountCodeRequest {
                scope: None,
                draft: DiscountCodeDraft::default(),
            },
        )
        .await
        .expect_err("used-for missing");
    assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
    assert_eq!(
        err.error_source(),
        Some(&ErrorSource::Pointer(USED_FOR_POINTER.into()))
    );
}

#[rstest]
#[tokio::test]
async fn admin_event_codes_keep_a_linked_event_that_exists(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes
        .expect_insert()
        .withf(|record| record.event_id == Some(EventId::new(4)))
        .return_once(|_| Ok(stored(2)));
    let mut events = MockEventRepository::new();
    events
        .expect_find_by_id()
        .with(eq(EventId::new(4)))
        .return_once(|_| Ok(Some(event(4))));
    let service = make_service(codes, events);

    let draft = DiscountCodeDraft {
        used_for: Some(Some(UsedFor::Event)),
        event_id: Some(Some(EventId::new(4))),
        ..DiscountCodeDraft::default()
    };
    let created = service
        .create(&admin, CreateDiscountCodeRequest { scope: None, draft })
        .await
        .expect("created");
    assert_eq!(created.view, SchemaView::Event);
}

#[rstest]
#[tokio::test]
async fn update_defaults_omitted_quantities_from_the_stored_code(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(|_| Ok(Some(stored(5))));
    codes.expect_update().never();
    let service = make_service(codes, MockEventRepository::new());

    let draft = DiscountCodeDraft {
        min_quantity: Some(Some(60)),
        ..DiscountCodeDraft::default()
    };
    let err = service
        .update(&admin, DiscountCodeId::new(5), draft)
        .await
        .expect_err("60 is not below the stored max of 50");
    assert_eq!(err.message(), "min-quantity should be less than max-quantity");
}

#[rstest]
#[tokio::test]
async fn update_persists_the_merged_record(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(|_| Ok(Some(stored(5))));
    codes
        .expect_update()
        .withf(|code| code.value == Some(25.0) && code.code.as_deref() == Some("EARLY"))
        .times(1)
        .return_once(|_| Ok(true));
    let service = make_service(codes, MockEventRepository::new());

    let draft = DiscountCodeDraft {
        value: Some(Some(25.0)),
        ..DiscountCodeDraft::default()
    };
    let updated = service
        .update(&admin, DiscountCodeId::new(5), draft)
        .await
        .expect("updated");
    assert_eq!(updated.value, Some(25.0));
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_codes(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_delete().return_once(|_| Ok(false));
    let service = make_service(codes, MockEventRepository::new());

    let err = service
        .delete(&admin, DiscountCodeId::new(5))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn removing_a_different_event_is_a_no_op(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(|_| Ok(Some(stored(5))));
    codes.expect_update().never();
    let service = make_service(codes, MockEventRepository::new());

    let code = service
        .change_event_link(&admin, DiscountCodeId::new(5), EventLinkChange::Remove(EventId::new(9)))
        .await
        .expect("no-op");
    assert_eq!(code.event_id, Some(EventId::new(1)));
}

#[rstest]
#[tokio::test]
async fn linking_requires_an_existing_event(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(|_| Ok(Some(stored(5))));
    let mut events = MockEventRepository::new();
    events.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(codes, events);

    let err = service
        .change_event_link(&admin, DiscountCodeId::new(5), EventLinkChange::Add(EventId::new(9)))
        .await
        .expect_err("unknown event");
    assert_eq!(err.message(), "Event: 9 not found");
}

#[rstest]
#[case(DiscountCodeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(DiscountCodeRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_error_codes(
    admin: Caller,
    #[case] failure: DiscountCodeRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(move |_| Err(failure));
    let service = make_service(codes, MockEventRepository::new());

    let err = service
        .fetch(&admin, DiscountCodeId::new(1))
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn unavailable_stores_do_not_leak_connection_details(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes
        .expect_find_by_id()
        .return_once(|_| Err(DiscountCodeRepositoryError::connection("password for db01 rejected")));
    let service = make_service(codes, MockEventRepository::new());

    let err = service
        .fetch(&admin, DiscountCodeId::new(1))
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.message(), STORE_UNAVAILABLE);
}

#[rstest]
#[tokio::test]
async fn linked_event_resolves_the_stored_link(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes
        .expect_find_by_id()
        .with(eq(DiscountCodeId::new(5)))
        .return_once(|_| Ok(Some(stored(5))));
    let mut events = MockEventRepository::new();
    events
        .expect_find_by_id()
        .with(eq(EventId::new(1)))
        .return_once(|_| Ok(Some(event(1))));
    let service = make_service(codes, events);

    let linked = service
        .linked_event(&admin, DiscountCodeId::new(5))
        .await
        .expect("linked event");
    assert_eq!(linked, Some(event(1)));
}

#[rstest]
#[tokio::test]
async fn unlinked_codes_have_no_related_event(admin: Caller) {
    let mut codes = MockDiscountCodeRepository::new();
    codes.expect_find_by_id().return_once(|_| {
        let mut code = stored(5);
        code.event_id = None;
        Ok(Some(code))
    });
    let service = make_service(codes, MockEventRepository::new());

    let linked = service
        .linked_event(&admin, DiscountCodeId::new(5))
        .await
        .expect("unlinked code");
    assert_eq!(linked, None);
}
