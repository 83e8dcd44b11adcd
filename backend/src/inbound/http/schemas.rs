//! OpenAPI schema definitions for request documents.
//!
//! Request bodies are parsed from `serde_json::Value` so attribute errors can
//! carry JSON pointers. These wrappers describe the accepted shape for the
//! OpenAPI document only.

use utoipa::ToSchema;

/// Accepted discount type values.
#[derive(ToSchema)]
pub enum DiscountTypeSchema {
    #[schema(rename = "amount")]
    Amount,
    #[schema(rename = "percent")]
    Percent,
}

/// Accepted ticket scope values.
#[derive(ToSchema)]
pub enum TicketsScopeSchema {
    #[schema(rename = "event")]
    Event,
    #[schema(rename = "ticket")]
    Ticket,
}

/// Accepted `used-for` values.
#[derive(ToSchema)]
pub enum UsedForSchema {
    #[schema(rename = "ticket")]
    Ticket,
    #[schema(rename = "event")]
    Event,
}

/// Writable discount code attributes. Unknown keys are ignored.
#[derive(ToSchema)]
#[schema(rename_all = "kebab-case")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DiscountCodeAttributesSchema {
    #[schema(example = "SUMMER10")]
    code: Option<String>,
    #[schema(example = "https://example.com/tickets")]
    discount_url: Option<String>,
    #[schema(example = 10.0)]
    value: Option<f64>,
    #[schema(rename = "type")]
    discount_type: Option<DiscountTypeSchema>,
    is_active: Option<bool>,
    #[schema(minimum = 0)]
    tickets_number: Option<i32>,
    #[schema(minimum = 0)]
    min_quantity: Option<i32>,
    #[schema(minimum = 0)]
    max_quantity: Option<i32>,
    #[schema(example = "2024-06-01T10:00:00+00:00")]
    valid_from: Option<String>,
    valid_till: Option<String>,
    tickets: Option<TicketsScopeSchema>,
    /// Required on create.
    used_for: Option<UsedForSchema>,
}

/// `{type: "event", id}` linkage accepted in requests.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EventLinkageSchema {
    #[schema(rename = "type", example = "event")]
    kind: String,
    #[schema(example = "4")]
    id: String,
}

/// Relationship member wrapping an event linkage.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EventRelationshipSchema {
    data: Option<EventLinkageSchema>,
}

/// Relationships accepted on a discount code resource.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DiscountCodeRelationshipsSchema {
    /// Event link for ticket codes.
    event: Option<EventRelationshipSchema>,
    /// Event link for event codes.
    events: Option<EventRelationshipSchema>,
}

/// Resource object of a create or update request.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DiscountCodeRequestResourceSchema {
    #[schema(rename = "type", example = "discount-code")]
    kind: String,
    /// Required on update and must match the path.
    id: Option<String>,
    attributes: DiscountCodeAttributesSchema,
    relationships: Option<DiscountCodeRelationshipsSchema>,
}

/// Body of a create or update request.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DiscountCodeRequestSchema {
    data: DiscountCodeRequestResourceSchema,
}

/// Body of a relationship request.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EventLinkageRequestSchema {
    data: Option<EventLinkageSchema>,
}
