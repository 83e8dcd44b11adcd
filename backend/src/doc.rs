//! OpenAPI documentation for the discount code API.
//!
//! Served by Swagger UI at `/docs` in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::document::{
    CollectionLinks, CollectionMeta, DiscountCodeAttributes, DiscountCodeCollectionDocument,
    DiscountCodeDocument, DiscountCodeResource, EventAttributes, EventLinkageDocument,
    EventResource, JsonApiVersion, MessageMeta, MetaDocument, RelatedEventDocument,
    RelationshipLinks, RelationshipObject, ResourceIdentifier, SelfLink,
};
use crate::inbound::http::error::{ErrorDocument, ErrorMeta, ErrorObject, ErrorSourceObject};
use crate::inbound::http::schemas::{
    DiscountCodeAttributesSchema, DiscountCodeRelationshipsSchema,
    DiscountCodeRequestResourceSchema, DiscountCodeRequestSchema, DiscountTypeSchema,
    EventLinkageRequestSchema, EventLinkageSchema, EventRelationshipSchema, TicketsScopeSchema,
    UsedForSchema,
};

/// Registers the bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some(
                "HS256 token from the identity service; `Authorization: JWT <token>` is also accepted.",
            ))
            .build();
        components.add_security_scheme("JwtAuth", SecurityScheme::Http(scheme));
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ticketing discount code API",
        description = "JSON:API endpoints for event and ticket discount codes."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("JwtAuth" = [])),
    paths(
        crate::inbound::http::discount_codes::list_discount_codes,
        crate::inbound::http::discount_codes::create_discount_code,
        crate::inbound::http::discount_codes::list_event_discount_codes,
        crate::inbound::http::discount_codes::create_event_discount_code,
        crate::inbound::http::discount_code_detail::get_discount_code,
        crate::inbound::http::discount_code_detail::update_discount_code,
        crate::inbound::http::discount_code_detail::delete_discount_code,
        crate::inbound::http::discount_code_relationships::get_event_link,
        crate::inbound::http::discount_code_relationships::replace_event_link,
        crate::inbound::http::discount_code_relationships::add_event_link,
        crate::inbound::http::discount_code_relationships::remove_event_link,
        crate::inbound::http::discount_code_relationships::get_related_event,
        crate::inbound::http::discount_code_relationships::get_related_events,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        JsonApiVersion,
        DiscountCodeAttributes,
        SelfLink,
        RelationshipLinks,
        RelationshipObject,
        ResourceIdentifier,
        DiscountCodeResource,
        DiscountCodeDocument,
        CollectionLinks,
        CollectionMeta,
        DiscountCodeCollectionDocument,
        EventLinkageDocument,
        EventAttributes,
        EventResource,
        RelatedEventDocument,
        MessageMeta,
        MetaDocument,
        ErrorSourceObject,
        ErrorMeta,
        ErrorObject,
        ErrorDocument,
        DiscountTypeSchema,
        TicketsScopeSchema,
        UsedForSchema,
        DiscountCodeAttributesSchema,
        EventLinkageSchema,
        EventRelationshipSchema,
        DiscountCodeRelationshipsSchema,
        DiscountCodeRequestResourceSchema,
        DiscountCodeRequestSchema,
        EventLinkageRequestSchema,
    )),
    tags(
        (name = "discount-codes", description = "Discount code resources and their event link"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/v1/discount-codes")]
    #[case("/v1/events/{event_ref}/discount-codes")]
    #[case("/v1/discount-codes/{id}")]
    #[case("/v1/discount-codes/{id}/relationships/event")]
    #[case("/v1/discount-codes/{id}/event")]
    #[case("/v1/discount-codes/{id}/events")]
    #[case("/health/ready")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn registers_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("JwtAuth"));
        assert!(components.schemas.contains_key("ErrorDocument"));
    }
}
