//! Behaviour tests for discount code management over the HTTP surface.
//!
//! Steps are synchronous, so the world owns a current-thread runtime and a
//! `LocalSet` to drive the actix service.

use std::cell::{Cell, RefCell};

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::test as actix_test;
use actix_web::{App, web};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use ticketing_backend::Trace;
use ticketing_backend::domain::{Caller, EventId, EventRole, UserId};
use ticketing_backend::inbound::http::configure;
use ticketing_backend::inbound::http::document::JSONAPI_MEDIA_TYPE;
use ticketing_backend::test_support::{TEST_JWT_SECRET, TestBackend, issue_token};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

const ADMIN: i32 = 1;
const ORGANIZER: i32 = 2;
const ATTENDEE: i32 = 3;

struct DiscountCodeWorld {
    runtime: Runtime,
    local: LocalSet,
    backend: TestBackend,
    user: Cell<i32>,
    last_status: Cell<Option<StatusCode>>,
    last_body: RefCell<Value>,
    code_id: RefCell<Option<String>>,
}

impl DiscountCodeWorld {
    fn new() -> Self {
        let backend = TestBackend::new();
        backend.events.add(1, "summer-fest", "Summer Fest");
        backend.events.add(2, "winter-fest", "Winter Fest");
        backend
            .callers
            .add(Caller::new(UserId::new(ADMIN)).with_admin(true));
        backend.callers.add(
            Caller::new(UserId::new(ORGANIZER))
                .with_event_role(EventId::new(1), EventRole::Organizer),
        );
        backend.callers.add(Caller::new(UserId::new(ATTENDEE)));

        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime"),
            local: LocalSet::new(),
            backend,
            user: Cell::new(ATTENDEE),
            last_status: Cell::new(None),
            last_body: RefCell::new(Value::Null),
            code_id: RefCell::new(None),
        }
    }

    fn send(&self, request: actix_test::TestRequest, body: Option<&Value>) {
        let token = issue_token(TEST_JWT_SECRET, self.user.get()).expect("token");
        let mut request = request.insert_header((AUTHORIZATION, format!("JWT {token}")));
        if let Some(body) = body {
            request = request
                .insert_header((CONTENT_TYPE, JSONAPI_MEDIA_TYPE))
                .set_payload(body.to_string());
        }
        let state = self.backend.http_state();

        let (status, bytes) = self.local.block_on(&self.runtime, async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .wrap(Trace)
                    .configure(configure),
            )
            .await;
            let res = actix_test::call_service(&app, request.to_request()).await;
            let status = res.status();
            (status, actix_test::read_body(res).await)
        });

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        if status == StatusCode::CREATED {
            *self.code_id.borrow_mut() = body["data"]["id"].as_str().map(str::to_owned);
        }
        self.last_status.set(Some(status));
        *self.last_body.borrow_mut() = body;
    }

    fn create(&self, uri: &str, attributes: Value) {
        let document = json!({ "data": { "type": "discount-code", "attributes": attributes } });
        self.send(actix_test::TestRequest::post().uri(uri), Some(&document));
    }

    fn code_id(&self) -> String {
        self.code_id.borrow().clone().expect("a created discount code")
    }

    fn first_error(&self) -> Value {
        self.last_body.borrow()["errors"][0].clone()
    }
}

#[fixture]
fn world() -> DiscountCodeWorld {
    DiscountCodeWorld::new()
}

#[given("an organizer of event 1")]
fn an_organizer_of_event_one(world: &DiscountCodeWorld) {
    world.user.set(ORGANIZER);
}

#[given("an administrator")]
fn an_administrator(world: &DiscountCodeWorld) {
    world.user.set(ADMIN);
}

#[given("an attendee")]
fn an_attendee(world: &DiscountCodeWorld) {
    world.user.set(ATTENDEE);
}

#[given("a ticket discount code \"{code}\" exists for event {event}")]
fn a_ticket_code_exists(world: &DiscountCodeWorld, code: String, event: i32) {
    world.create(
        &format!("/v1/events/{event}/discount-codes"),
        json!({ "used-for": "ticket", "code": code }),
    );
    assert_eq!(world.last_status.get(), Some(StatusCode::CREATED));
}

#[given("an event discount code \"{code}\" exists")]
fn an_event_code_exists(world: &DiscountCodeWorld, code: String) {
    world.create(
        "/v1/discount-codes",
        json!({ "used-for": "event", "code": code }),
    );
    assert_eq!(world.last_status.get(), Some(StatusCode::CREATED));
}

#[when("they create a ticket discount code \"{code}\" for event {event}")]
fn they_create_a_ticket_code(world: &DiscountCodeWorld, code: String, event: i32) {
    world.create(
        &format!("/v1/events/{event}/discount-codes"),
        json!({ "used-for": "ticket", "code": code }),
    );
}

#[when("they list all discount codes")]
fn they_list_all_codes(world: &DiscountCodeWorld) {
    world.send(actix_test::TestRequest::get().uri("/v1/discount-codes"), None);
}

#[when("they link the code to event {event} through an update")]
fn they_link_through_an_update(world: &DiscountCodeWorld, event: i32) {
    let id = world.code_id();
    let document = json!({
        "data": {
            "type": "discount-code",
            "id": id,
            "relationships": {
                "events": { "data": { "type": "event", "id": event.to_string() } }
            }
        }
    });
    world.send(
        actix_test::TestRequest::patch().uri(&format!("/v1/discount-codes/{id}")),
        Some(&document),
    );
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &DiscountCodeWorld, status: u16) {
    assert_eq!(
        world.last_status.get().map(|code| code.as_u16()),
        Some(status),
        "body: {}",
        world.last_body.borrow()
    );
}

#[then("the error detail is \"{detail}\"")]
fn the_error_detail_is(world: &DiscountCodeWorld, detail: String) {
    assert_eq!(world.first_error()["detail"], detail.as_str());
}

#[then("the error points at \"{pointer}\"")]
fn the_error_points_at(world: &DiscountCodeWorld, pointer: String) {
    assert_eq!(world.first_error()["source"]["pointer"], pointer.as_str());
}

#[then("the store holds {count} discount code")]
fn the_store_holds(world: &DiscountCodeWorld, count: usize) {
    assert_eq!(world.backend.codes.len(), count);
}

#[then("the code is not linked to any event")]
fn the_code_is_not_linked(world: &DiscountCodeWorld) {
    let id: i32 = world.code_id().parse().expect("numeric id");
    let stored = world.backend.codes.get(id).expect("stored code");
    assert_eq!(stored.event_id, None);
}

#[scenario(
    path = "tests/features/discount_codes.feature",
    name = "Organizer creates the ticket code of their event"
)]
fn organizer_creates_the_ticket_code_of_their_event(world: DiscountCodeWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/discount_codes.feature",
    name = "A second ticket code for the same event is rejected"
)]
fn a_second_ticket_code_for_the_same_event_is_rejected(world: DiscountCodeWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/discount_codes.feature",
    name = "Attendees cannot list every discount code"
)]
fn attendees_cannot_list_every_discount_code(world: DiscountCodeWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/discount_codes.feature",
    name = "An update linking an unknown event is rejected"
)]
fn an_update_linking_an_unknown_event_is_rejected(world: DiscountCodeWorld) {
    drop(world);
}
