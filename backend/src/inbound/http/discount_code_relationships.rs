//! Event relationship endpoints of a discount code.
//!
//! ```text
//! GET    /v1/discount-codes/{id}/relationships/event
//! PATCH  /v1/discount-codes/{id}/relationships/event   replace (null unlinks)
//! POST   /v1/discount-codes/{id}/relationships/event   link
//! DELETE /v1/discount-codes/{id}/relationships/event   unlink if it matches
//! GET    /v1/discount-codes/{id}/event                 related event
//! GET    /v1/discount-codes/{id}/events                related event
//! ```
//!
//! The two `related` paths serve the same event; which one a code advertises
//! depends on the view it was rendered in.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde_json::Value;

use super::auth::AuthenticatedCaller;
use super::document::{EventLinkageDocument, RelatedEventDocument, jsonapi_response};
use super::error::{ApiResult, ErrorDocument};
use super::request_document::parse_relationship_document;
use super::state::HttpState;
use crate::domain::ports::EventLinkChange;
use crate::domain::{Caller, DiscountCodeId, Error, EventId, SchemaView};

async fn apply_change(
    state: &HttpState,
    caller: &Caller,
    id: DiscountCodeId,
    change: EventLinkChange,
) -> ApiResult<HttpResponse> {
    let code = state
        .discount_code_commands
        .change_event_link(caller, id, change)
        .await?;
    Ok(jsonapi_response(StatusCode::OK, &EventLinkageDocument::render(&code)))
}

async fn related_event(
    state: &HttpState,
    caller: &Caller,
    id: DiscountCodeId,
    view: SchemaView,
) -> ApiResult<HttpResponse> {
    let event = state.discount_codes.linked_event(caller, id).await?;
    Ok(jsonapi_response(
        StatusCode::OK,
        &RelatedEventDocument::render(id, view, event.as_ref()),
    ))
}

fn required_event(body: &Value) -> Result<EventId, Error> {
    parse_relationship_document(body, false)?
        .ok_or_else(|| Error::invalid_request("`data` must be a resource identifier").with_pointer("/data"))
}

/// Read the event linkage.
#[utoipa::path(
    get,
    path = "/v1/discount-codes/{id}/relationships/event",
    params(("id" = i32, Path, description = "Discount code id")),
    responses(
        (status = 200, description = "Event linkage", body = EventLinkageDocument,
            content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 404, description = "Not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "getDiscountCodeEvent"
)]
#[get("/discount-codes/{id}/relationships/event")]
pub async fn get_event_link(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    let code = state.discount_codes.fetch(caller.caller(), id).await?;
    Ok(jsonapi_response(StatusCode::OK, &EventLinkageDocument::render(&code)))
}

/// Replace the event linkage.
#[utoipa::path(
    patch,
    path = "/v1/discount-codes/{id}/relationships/event",
    params(("id" = i32, Path, description = "Discount code id")),
    request_body(content = super::schemas::EventLinkageRequestSchema,
        content_type = "application/vnd.api+json"),
    responses(
        (status = 200, description = "Event linkage", body = EventLinkageDocument,
            content_type = "application/vnd.api+json"),
        (status = 400, description = "Malformed linkage", body = ErrorDocument),
        (status = 404, description = "Code or event not found", body = ErrorDocument),
        (status = 409, description = "Wrong resource type", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "replaceDiscountCodeEvent"
)]
#[patch("/discount-codes/{id}/relationships/event")]
pub async fn replace_event_link(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    let event = parse_relationship_document(&body, true)?;
    apply_change(&state, caller.caller(), id, EventLinkChange::Replace(event)).await
}

/// Link the code to an event.
#[utoipa::path(
    post,
    path = "/v1/discount-codes/{id}/relationships/event",
    params(("id" = i32, Path, description = "Discount code id")),
    request_body(content = super::schemas::EventLinkageRequestSchema,
        content_type = "application/vnd.api+json"),
    responses(
        (status = 200, description = "Event linkage", body = EventLinkageDocument,
            content_type = "application/vnd.api+json"),
        (status = 400, description = "Malformed linkage", body = ErrorDocument),
        (status = 404, description = "Code or event not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "addDiscountCodeEvent"
)]
#[post("/discount-codes/{id}/relationships/event")]
pub async fn add_event_link(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    let event = required_event(&body)?;
    apply_change(&state, caller.caller(), id, EventLinkChange::Add(event)).await
}

/// Unlink the event named in the body, if it is the linked one.
#[utoipa::path(
    delete,
    path = "/v1/discount-codes/{id}/relationships/event",
    params(("id" = i32, Path, description = "Discount code id")),
    request_body(content = super::schemas::EventLinkageRequestSchema,
        content_type = "application/vnd.api+json"),
    responses(
        (status = 200, description = "Event linkage", body = EventLinkageDocument,
            content_type = "application/vnd.api+json"),
        (status = 400, description = "Malformed linkage", body = ErrorDocument),
        (status = 404, description = "Code or event not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "removeDiscountCodeEvent"
)]
#[delete("/discount-codes/{id}/relationships/event")]
pub async fn remove_event_link(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    let event = required_event(&body)?;
    apply_change(&state, caller.caller(), id, EventLinkChange::Remove(event)).await
}

/// Fetch the linked event of a ticket code.
#[utoipa::path(
    get,
    path = "/v1/discount-codes/{id}/event",
    params(("id" = i32, Path, description = "Discount code id")),
    responses(
        (status = 200, description = "Linked event or null", body = RelatedEventDocument,
            content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 404, description = "Not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "getDiscountCodeRelatedEvent"
)]
#[get("/discount-codes/{id}/event")]
pub async fn get_related_event(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    related_event(&state, caller.caller(), id, SchemaView::Ticket).await
}

/// Fetch the linked event of an event code.
#[utoipa::path(
    get,
    path = "/v1/discount-codes/{id}/events",
    params(("id" = i32, Path, description = "Discount code id")),
    responses(
        (status = 200, description = "Linked event or null", body = RelatedEventDocument,
            content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 404, description = "Not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "getDiscountCodeRelatedEvents"
)]
#[get("/discount-codes/{id}/events")]
pub async fn get_related_events(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    related_event(&state, caller.caller(), id, SchemaView::Event).await
}
