//! Single discount code endpoints.
//!
//! ```text
//! GET    /v1/discount-codes/{id}
//! PATCH  /v1/discount-codes/{id}
//! DELETE /v1/discount-codes/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, patch, web};
use serde_json::Value;

use super::auth::AuthenticatedCaller;
use super::document::{DiscountCodeDocument, MetaDocument, jsonapi_response};
use super::error::{ApiResult, ErrorDocument};
use super::request_document::parse_update_document;
use super::state::HttpState;
use crate::domain::{DiscountCodeId, SchemaView};

/// Fetch one discount code.
#[utoipa::path(
    get,
    path = "/v1/discount-codes/{id}",
    params(("id" = i32, Path, description = "Discount code id")),
    responses(
        (status = 200, description = "Discount code", body = DiscountCodeDocument,
            content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 404, description = "Not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "getDiscountCode"
)]
#[get("/discount-codes/{id}")]
pub async fn get_discount_code(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    let code = state.discount_codes.fetch(caller.caller(), id).await?;
    Ok(jsonapi_response(
        StatusCode::OK,
        &DiscountCodeDocument::render(&code, SchemaView::Event),
    ))
}

/// Partially update one discount code.
///
/// Attributes left out of the document keep their stored values.
#[utoipa::path(
    patch,
    path = "/v1/discount-codes/{id}",
    params(("id" = i32, Path, description = "Discount code id")),
    request_body(content = super::schemas::DiscountCodeRequestSchema,
        content_type = "application/vnd.api+json"),
    responses(
        (status = 200, description = "Updated", body = DiscountCodeDocument,
            content_type = "application/vnd.api+json"),
        (status = 400, description = "Missing or mismatched id", body = ErrorDocument),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 404, description = "Not found", body = ErrorDocument),
        (status = 409, description = "Wrong resource type", body = ErrorDocument),
        (status = 422, description = "Rejected attributes", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "updateDiscountCode"
)]
#[patch("/discount-codes/{id}")]
pub async fn update_discount_code(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    let draft = parse_update_document(&body, id)?;
    let code = state
        .discount_code_commands
        .update(caller.caller(), id, draft)
        .await?;
    Ok(jsonapi_response(
        StatusCode::OK,
        &DiscountCodeDocument::render(&code, SchemaView::Event),
    ))
}

/// Delete one discount code.
#[utoipa::path(
    delete,
    path = "/v1/discount-codes/{id}",
    params(("id" = i32, Path, description = "Discount code id")),
    responses(
        (status = 200, description = "Deleted", body = MetaDocument,
            content_type = "application/vnd.api+json"),
        (status = 401, description = "Unauthorised", body = ErrorDocument),
        (status = 404, description = "Not found", body = ErrorDocument)
    ),
    tags = ["discount-codes"],
    security(("JwtAuth" = [])),
    operation_id = "deleteDiscountCode"
)]
#[delete("/discount-codes/{id}")]
pub async fn delete_discount_code(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = DiscountCodeId::new(path.into_inner());
    state.discount_code_commands.delete(caller.caller(), id).await?;
    Ok(jsonapi_response(StatusCode::OK, &MetaDocument::deleted()))
}
