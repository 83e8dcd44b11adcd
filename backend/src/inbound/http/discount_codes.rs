//! Discount code collection endpoints.
//!
//! ```text
//! GET  /v1/discount-codes
//! POST /v1/discount-codes
//! GET  /v1/events/{event_ref}/discount-codes
//! POST /v1/events/{event_ref}/discount-codes
//! ```
//!
//! `event_ref` is an event id when it is all digits and an event identifier
//! otherwise. Scoped requests run the access guard before anything else.

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use super::auth::AuthenticatedCaller;
use super::document::{
    CollectionMeta, CollectionPosition, DiscountCodeCollectionDocument, DiscountCodeDocument,
    DiscountCodeResource, JSONAPI_MEDIA_TYPE, JsonApiVersion, discount_code_path,
    jsonapi_response,
};
use super::error::{ApiResult, ErrorDocument};
use super::request_document::parse_create_document;
use super::state::HttpState;
use crate::domain::listing::{DEFAULT_PAGE_SIZE, PageRequest, SortKey};
use crate::domain::ports::{CreateDiscountCodeRequest, ListDiscountCodesRequest};
use crate::domain::{Caller, Error, EventRef};

/// Paging and ordering parameters of a collection request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// One-based page number (default 1).
    #[serde(rename = "page[number]")]
    #[param(rename = "page[number]", value_type = Option<u32>)]
    pub page_number: Option<String>,
    /// Page size (default 30; 0 returns every row).
    #[serde(rename = "page[size]")]
    #[param(rename = "page[size]", value_type = Option<u32>)]
    pub page_size: Option<String>,
    /// Comma separated attributes, `-` prefix for descending order.
    pub sort: Option<String>,
}

fn parse_page_param(raw: Option<&str>, name: &str, default: u32) -> Result<u32, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            Error::invalid_request(format!("{name} must be a non-negative integer"))
                .with_parameter(name)
        }),
    }
}

impl ListQuery {
    fn page(&self) -> Result<PageRequest, Error> {
        let number = parse_page_param(self.page_number.as_deref(), "page[number]", 1)?;
        let size = parse_page_param(self.page_size.as_deref(), "page[size]", DEFAULT_PAGE_SIZE)?;
        Ok(PageRequest::new(number, size))
    }

    fn sort_keys(&self) -> Result<Vec<SortKey>, Error> {
        match self.sort.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => SortKey::parse_list(raw)
                .map_err(|err| Error::invalid_request(err.to_string()).with_parameter("sort")),
        }
    }
}

async fn list_codes(
    state: &HttpState,
    caller: &Caller,
    path: &str,
    query: &ListQuery,
    reference: Option<EventRef>,
) -> ApiResult<HttpResponse> {
    let scope = state.discount_codes.authorize_scope(caller, reference).await?;
    let request = ListDiscountCodesRequest {
        scope,
        page: query.page()?,
        sort: query.sort_keys()?,
    };
    let page = state.discount_codes.list(caller, request).await?;

    let links = CollectionPosition {
        path,
        sort: query.sort.as_deref(),
        page: page.page,
        total: page.total,
    }
    .links();
    let document = DiscountCodeCollectionDocument {
        data: page
            .codes
            .iter()
            .map(|code| DiscountCodeResource::render(code, page.view))
            .collect(),
        links,
        meta: CollectionMeta { count: page.total },
        jsonapi: JsonApiVersion::default(),
    };
    Ok(jsonapi_response(StatusCode::OK, &document))
}

async fn create_code(
    state: &HttpState,
    caller: &Caller,
    reference: Option<EventRef>,
    body: &Value,
) -> ApiResult<HttpResponse> {
    let scope = state.discount_codes.authorize_scope(caller, reference).await?;
    let draft = parse_create_document(body)?;
    let created = state
        .discount_code_commands
        .create(caller, CreateDiscountCodeRequest { scope, draft })
        .await?;

    let document = DiscountCodeDocument::render(&created.code, created.view);
    Ok(HttpResponse::Created()
        .content_type(JSONAPI_MEDIA_TYPE)
        .insert_header((LOCATION, discount_code_path(created.code.id)))
        .json(document))
}

/// List the discount codes the caller may see.
#[utoipa::path(
    get,
    path = "/v1/discount-codes",
    params(ListQuery),
    responses(
        (status = 200, description = "Discount codes", body = DiscountCodeCollectionDocument,
            content_type = "application/vnd.api+json"),
        (status = 400, description = "Invalid paging or sort parameter", body = ErrorDocument),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 422, description = "Neither admin nor organizer", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "listDiscountCodes"
)]
#[get("/discount-codes")]
pub async fn list_discount_codes(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    request: HttpRequest,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    list_codes(&state, caller.caller(), request.path(), &query, None).await
}

/// List the discount codes of one event.
#[utoipa::path(
    get,
    path = "/v1/events/{event_ref}/discount-codes",
    params(
        ("event_ref" = String, Path, description = "Event id or identifier"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Discount codes of the event",
            body = DiscountCodeCollectionDocument, content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 403, description = "Caller does not manage the event", body = ErrorDocument),
        (status = 404, description = "Event not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "listEventDiscountCodes"
)]
#[get("/events/{event_ref}/discount-codes")]
pub async fn list_event_discount_codes(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    request: HttpRequest,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let reference = EventRef::parse(&path);
    list_codes(&state, caller.caller(), request.path(), &query, Some(reference)).await
}

/// Create an event discount code (administrators).
#[utoipa::path(
    post,
    path = "/v1/discount-codes",
    request_body(content = super::schemas::DiscountCodeRequestSchema,
        content_type = "application/vnd.api+json"),
    responses(
        (status = 201, description = "Created", body = DiscountCodeDocument,
            content_type = "application/vnd.api+json"),
        (status = 400, description = "Malformed document", body = ErrorDocument),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 409, description = "Wrong resource type", body = ErrorDocument),
        (status = 422, description = "Rejected attributes or route", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "createDiscountCode"
)]
#[post("/discount-codes")]
pub async fn create_discount_code(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    create_code(&state, caller.caller(), None, &body).await
}

/// Create a ticket discount code for one event (organizers).
#[utoipa::path(
    post,
    path = "/v1/events/{event_ref}/discount-codes",
    params(("event_ref" = String, Path, description = "Event id or identifier")),
    request_body(content = super::schemas::DiscountCodeRequestSchema,
        content_type = "application/vnd.api+json"),
    responses(
        (status = 201, description = "Created", body = DiscountCodeDocument,
            content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 403, description = "Caller does not manage the event", body = ErrorDocument),
        (status = 404, description = "Event not found", body = ErrorDocument),
        (status = 422, description = "Rejected attributes, route or duplicate",
            body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "createEventDiscountCode"
)]
#[post("/events/{event_ref}/discount-codes")]
pub async fn create_event_discount_code(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let reference = EventRef::parse(&path);
    create_code(&state, caller.caller(), Some(reference), &body).await
}
