//! JSON:API response documents for discount codes.
//!
//! Attribute names are kebab-case on the wire. The event relationship is
//! named after the [`SchemaView`] the service picked.

use std::collections::BTreeMap;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::listing::PageRequest;
use crate::domain::{DiscountCode, DiscountCodeId, Event, EventId, SchemaView};

/// Media type of every request and response body.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";
/// Resource type of discount codes.
pub const DISCOUNT_CODE_TYPE: &str = "discount-code";
/// Resource type of events.
pub const EVENT_TYPE: &str = "event";
/// Prefix of every API path.
pub const API_PREFIX: &str = "/v1";

/// `{"version": "1.0"}` member of every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct JsonApiVersion {
    #[schema(example = "1.0")]
    pub version: String,
}

impl Default for JsonApiVersion {
    fn default() -> Self {
        Self {
            version: "1.0".to_owned(),
        }
    }
}

/// Discount code attributes as rendered.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub struct DiscountCodeAttributes {
    pub code: Option<String>,
    pub discount_url: Option<String>,
    pub value: Option<f64>,
    #[serde(rename = "type")]
    #[schema(example = "percent")]
    pub discount_type: Option<String>,
    pub is_active: bool,
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    #[schema(example = "2024-06-01T10:00:00+00:00")]
    pub valid_from: Option<String>,
    pub valid_till: Option<String>,
    pub tickets: Option<String>,
    pub created_at: String,
    #[schema(example = "ticket")]
    pub used_for: Option<String>,
}

/// `self` link of a resource or document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SelfLink {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Links of a relationship object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RelationshipLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub related: String,
}

/// Relationship member of a resource object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RelationshipObject {
    pub links: RelationshipLinks,
}

/// `{type, id}` pair identifying a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// A discount code resource object.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DiscountCodeResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: DiscountCodeAttributes,
    pub relationships: BTreeMap<String, RelationshipObject>,
    pub links: SelfLink,
}

/// Document holding one discount code.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DiscountCodeDocument {
    pub data: DiscountCodeResource,
    pub links: SelfLink,
    pub jsonapi: JsonApiVersion,
}

/// Pagination links of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Size of the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CollectionMeta {
    pub count: u64,
}

/// Document holding a page of discount codes.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DiscountCodeCollectionDocument {
    pub data: Vec<DiscountCodeResource>,
    pub links: CollectionLinks,
    pub meta: CollectionMeta,
    pub jsonapi: JsonApiVersion,
}

/// Document holding the event linkage of a discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventLinkageDocument {
    pub data: Option<ResourceIdentifier>,
    pub links: RelationshipLinks,
    pub jsonapi: JsonApiVersion,
}

/// Attributes of an event, as far as this service knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventAttributes {
    #[schema(example = "summer-fest")]
    pub identifier: String,
    pub name: String,
}

/// An event resource object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: EventAttributes,
}

/// Document served at a code's `related` event link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RelatedEventDocument {
    pub data: Option<EventResource>,
    pub links: SelfLink,
    pub jsonapi: JsonApiVersion,
}

/// `meta.message` member of a delete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageMeta {
    #[schema(example = "Object successfully deleted")]
    pub message: String,
}

/// Meta-only document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MetaDocument {
    pub meta: MessageMeta,
    pub jsonapi: JsonApiVersion,
}

impl MetaDocument {
    pub(crate) fn deleted() -> Self {
        Self {
            meta: MessageMeta {
                message: "Object successfully deleted".to_owned(),
            },
            jsonapi: JsonApiVersion::default(),
        }
    }
}

/// Path of a discount code resource.
pub fn discount_code_path(id: DiscountCodeId) -> String {
    format!("{API_PREFIX}/discount-codes/{id}")
}

fn rfc3339(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

fn event_relationship_links(id: DiscountCodeId, view: SchemaView) -> RelationshipLinks {
    let base = discount_code_path(id);
    RelationshipLinks {
        self_link: format!("{base}/relationships/event"),
        related: format!("{base}/{}", view.relationship_key()),
    }
}

impl DiscountCodeAttributes {
    fn from_code(code: &DiscountCode) -> Self {
        Self {
            code: code.code.clone(),
            discount_url: code.discount_url.clone(),
            value: code.value,
            discount_type: code.discount_type.map(|kind| kind.as_str().to_owned()),
            is_active: code.is_active,
            tickets_number: code.tickets_number,
            min_quantity: code.min_quantity,
            max_quantity: code.max_quantity,
            valid_from: code.valid_from.map(rfc3339),
            valid_till: code.valid_till.map(rfc3339),
            tickets: code.tickets.map(|scope| scope.as_str().to_owned()),
            created_at: rfc3339(code.created_at),
            used_for: code.used_for.map(|used_for| used_for.as_str().to_owned()),
        }
    }
}

impl DiscountCodeResource {
    /// Render a code in the given view.
    pub fn render(code: &DiscountCode, view: SchemaView) -> Self {
        let relationship = RelationshipObject {
            links: event_relationship_links(code.id, view),
        };
        Self {
            kind: DISCOUNT_CODE_TYPE.to_owned(),
            id: code.id.to_string(),
            attributes: DiscountCodeAttributes::from_code(code),
            relationships: BTreeMap::from([(view.relationship_key().to_owned(), relationship)]),
            links: SelfLink {
                self_link: discount_code_path(code.id),
            },
        }
    }
}

impl DiscountCodeDocument {
    /// Single-resource document.
    pub fn render(code: &DiscountCode, view: SchemaView) -> Self {
        Self {
            data: DiscountCodeResource::render(code, view),
            links: SelfLink {
                self_link: discount_code_path(code.id),
            },
            jsonapi: JsonApiVersion::default(),
        }
    }
}

impl EventLinkageDocument {
    /// Relationship document for a code's event link.
    pub fn render(code: &DiscountCode) -> Self {
        Self {
            data: code.event_id.map(event_identifier),
            links: event_relationship_links(code.id, SchemaView::Ticket),
            jsonapi: JsonApiVersion::default(),
        }
    }
}

impl RelatedEventDocument {
    /// The event a code links to, at the `related` link of `view`.
    pub fn render(id: DiscountCodeId, view: SchemaView, event: Option<&Event>) -> Self {
        Self {
            data: event.map(|event| EventResource {
                kind: EVENT_TYPE.to_owned(),
                id: event.id.to_string(),
                attributes: EventAttributes {
                    identifier: event.identifier.to_string(),
                    name: event.name.clone(),
                },
            }),
            links: SelfLink {
                self_link: event_relationship_links(id, view).related,
            },
            jsonapi: JsonApiVersion::default(),
        }
    }
}

fn event_identifier(id: EventId) -> ResourceIdentifier {
    ResourceIdentifier {
        kind: EVENT_TYPE.to_owned(),
        id: id.to_string(),
    }
}

/// Inputs for collection links.
pub(crate) struct CollectionPosition<'a> {
    pub path: &'a str,
    pub sort: Option<&'a str>,
    pub page: PageRequest,
    pub total: u64,
}

impl CollectionPosition<'_> {
    fn link(&self, number: Option<u64>) -> String {
        let mut params = Vec::new();
        if let (Some(number), Some(size)) = (number, self.page.size()) {
            params.push(format!("page[number]={number}"));
            params.push(format!("page[size]={size}"));
        }
        if let Some(sort) = self.sort {
            params.push(format!("sort={sort}"));
        }
        if params.is_empty() {
            self.path.to_owned()
        } else {
            format!("{}?{}", self.path, params.join("&"))
        }
    }

    pub(crate) fn links(&self) -> CollectionLinks {
        let current = u64::from(self.page.number());
        if self.page.size().is_none() {
            return CollectionLinks {
                self_link: self.link(None),
                first: None,
                last: None,
                prev: None,
                next: None,
            };
        }
        let last = self.page.last_page(self.total);
        CollectionLinks {
            self_link: self.link(Some(current)),
            first: Some(self.link(Some(1))),
            last: Some(self.link(Some(last))),
            prev: (current > 1).then(|| self.link(Some(current - 1))),
            next: (current < last).then(|| self.link(Some(current + 1))),
        }
    }
}

/// Serialize `body` as a JSON:API response.
pub(crate) fn jsonapi_response(status: StatusCode, body: &impl Serialize) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(JSONAPI_MEDIA_TYPE)
        .json(body)
}
