//! HTTP inbound adapter exposing the JSON:API endpoints.

pub mod auth;
pub mod discount_code_detail;
pub mod discount_code_relationships;
pub mod discount_codes;
pub mod document;
pub mod error;
pub mod health;
pub mod request_document;
pub mod schemas;
pub mod state;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

use self::document::API_PREFIX;
use self::error::{json_error_handler, path_error_handler, query_error_handler};

/// Register the versioned API scope and its extractor error handlers.
///
/// The caller adds `web::Data<HttpState>` to the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope(API_PREFIX)
                .service(discount_codes::list_discount_codes)
                .service(discount_codes::create_discount_code)
                .service(discount_codes::list_event_discount_codes)
                .service(discount_codes::create_event_discount_code)
                .service(discount_code_relationships::get_event_link)
                .service(discount_code_relationships::replace_event_link)
                .service(discount_code_relationships::add_event_link)
                .service(discount_code_relationships::remove_event_link)
                .service(discount_code_relationships::get_related_event)
                .service(discount_code_relationships::get_related_events)
                .service(discount_code_detail::get_discount_code)
                .service(discount_code_detail::update_discount_code)
                .service(discount_code_detail::delete_discount_code),
        );
}
