//! Parsing of JSON:API request documents into domain drafts.
//!
//! Structural problems with the document (no `data`, id mismatch) are `400`,
//! a wrong resource `type` is `409`, and bad attribute values are `422` with a
//! pointer at the attribute. Unknown attributes are ignored, as is
//! `created-at`, which the server owns.

use serde_json::{Map, Value};

use super::document::{DISCOUNT_CODE_TYPE, EVENT_TYPE};
use super::validation::{
    FieldName, Violation, absolute_url, boolean, choice, non_negative_integer, nullable, number,
    string, timestamp,
};
use crate::domain::{DiscountCodeDraft, DiscountCodeId, Error, EventId};

const CODE: FieldName = FieldName::new("code");
const DISCOUNT_URL: FieldName = FieldName::new("discount-url");
const VALUE: FieldName = FieldName::new("value");
const TYPE: FieldName = FieldName::new("type");
const IS_ACTIVE: FieldName = FieldName::new("is-active");
const TICKETS_NUMBER: FieldName = FieldName::new("tickets-number");
const MIN_QUANTITY: FieldName = FieldName::new("min-quantity");
const MAX_QUANTITY: FieldName = FieldName::new("max-quantity");
const VALID_FROM: FieldName = FieldName::new("valid-from");
const VALID_TILL: FieldName = FieldName::new("valid-till");
const TICKETS: FieldName = FieldName::new("tickets");
const USED_FOR: FieldName = FieldName::new("used-for");

/// Relationship keys accepted for the event link, one per view.
const EVENT_RELATIONSHIP_KEYS: [&str; 2] = ["event", "events"];

fn top_level_data(body: &Value) -> Result<&Value, Error> {
    body.as_object()
        .and_then(|document| document.get("data"))
        .ok_or_else(|| Error::invalid_request("Object must include `data` key.").with_pointer("/"))
}

fn resource_object(body: &Value) -> Result<&Map<String, Value>, Error> {
    top_level_data(body)?
        .as_object()
        .ok_or_else(|| Error::unprocessable("`data` must be an object.").with_pointer("/data"))
}

fn check_type(object: &Map<String, Value>, expected: &str, pointer: &str) -> Result<(), Error> {
    match object.get("type") {
        Some(Value::String(kind)) if kind == expected => Ok(()),
        Some(_) => Err(Error::conflict(format!("Invalid type. Expected \"{expected}\"."))
            .with_pointer(format!("{pointer}/type"))),
        None => Err(
            Error::unprocessable(format!(
                "`{}` object must include `type` key.",
                pointer.trim_start_matches('/')
            ))
                .with_pointer(pointer.to_owned()),
        ),
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn attribute<T>(
    attributes: &Map<String, Value>,
    field: FieldName,
    parse: impl FnOnce(&Value, FieldName) -> Result<T, Error>,
) -> Result<Option<T>, Error> {
    attributes
        .get(field.as_str())
        .map(|value| parse(value, field))
        .transpose()
}

fn non_null_boolean(value: &Value, field: FieldName) -> Result<bool, Error> {
    if value.is_null() {
        return Err(Violation::NotNull.at(field));
    }
    boolean(value, field)
}

fn parse_attributes(resource: &Map<String, Value>) -> Result<DiscountCodeDraft, Error> {
    let empty = Map::new();
    let attributes = match resource.get("attributes") {
        None => &empty,
        Some(raw) => raw.as_object().ok_or_else(|| {
            Error::unprocessable("Invalid input type.").with_pointer("/data/attributes")
        })?,
    };

    Ok(DiscountCodeDraft {
        code: attribute(attributes, CODE, |v, f| nullable(v, f, string))?,
        discount_url: attribute(attributes, DISCOUNT_URL, |v, f| nullable(v, f, absolute_url))?,
        value: attribute(attributes, VALUE, |v, f| nullable(v, f, number))?,
        discount_type: attribute(attributes, TYPE, |v, f| nullable(v, f, choice))?,
        is_active: attribute(attributes, IS_ACTIVE, non_null_boolean)?,
        tickets_number: attribute(attributes, TICKETS_NUMBER, |v, f| {
            nullable(v, f, non_negative_integer)
        })?,
        min_quantity: attribute(attributes, MIN_QUANTITY, |v, f| {
            nullable(v, f, non_negative_integer)
        })?,
        max_quantity: attribute(attributes, MAX_QUANTITY, |v, f| {
            nullable(v, f, non_negative_integer)
        })?,
        valid_from: attribute(attributes, VALID_FROM, |v, f| nullable(v, f, timestamp))?,
        valid_till: attribute(attributes, VALID_TILL, |v, f| nullable(v, f, timestamp))?,
        tickets: attribute(attributes, TICKETS, |v, f| nullable(v, f, choice))?,
        used_for: attribute(attributes, USED_FOR, |v, f| nullable(v, f, choice))?,
        event_id: parse_event_relationship(resource)?,
    })
}

/// Parse a resource linkage `{type: "event", id}` or `null`.
fn parse_event_linkage(linkage: &Value, pointer: &str) -> Result<Option<EventId>, Error> {
    if linkage.is_null() {
        return Ok(None);
    }
    let object = linkage.as_object().ok_or_else(|| {
        Error::unprocessable("Must be a resource identifier object.").with_pointer(pointer.to_owned())
    })?;
    check_type(object, EVENT_TYPE, pointer)?;
    object
        .get("id")
        .and_then(id_text)
        .and_then(|raw| raw.trim().parse::<i32>().ok())
        .map(|raw| Some(EventId::new(raw)))
        .ok_or_else(|| Error::unprocessable("Not a valid event id.").with_pointer(format!("{pointer}/id")))
}

fn parse_event_relationship(resource: &Map<String, Value>) -> Result<Option<Option<EventId>>, Error> {
    let Some(raw) = resource.get("relationships") else {
        return Ok(None);
    };
    let relationships = raw.as_object().ok_or_else(|| {
        Error::unprocessable("Invalid input type.").with_pointer("/data/relationships")
    })?;
    for key in EVENT_RELATIONSHIP_KEYS {
        let Some(relationship) = relationships.get(key) else {
            continue;
        };
        let pointer = format!("/data/relationships/{key}");
        let linkage = relationship
            .as_object()
            .and_then(|object| object.get("data"))
            .ok_or_else(|| {
                Error::unprocessable("Must include a `data` key").with_pointer(pointer.clone())
            })?;
        return parse_event_linkage(linkage, &format!("{pointer}/data")).map(Some);
    }
    Ok(None)
}

/// Parse the body of a create request.
pub(crate) fn parse_create_document(body: &Value) -> Result<DiscountCodeDraft, Error> {
    let resource = resource_object(body)?;
    check_type(resource, DISCOUNT_CODE_TYPE, "/data")?;
    parse_attributes(resource)
}

/// Parse the body of an update request for the code at `id`.
pub(crate) fn parse_update_document(
    body: &Value,
    id: DiscountCodeId,
) -> Result<DiscountCodeDraft, Error> {
    let resource = resource_object(body)?;
    let supplied = resource
        .get("id")
        .and_then(id_text)
        .ok_or_else(|| Error::invalid_request("Missing id in \"data\" node").with_pointer("/data/id"))?;
    if supplied.trim() != id.to_string() {
        return Err(
            Error::invalid_request("Value of id does not match the resource identifier in url")
                .with_pointer("/data/id"),
        );
    }
    check_type(resource, DISCOUNT_CODE_TYPE, "/data")?;
    parse_attributes(resource)
}

/// Parse a relationship request body `{"data": linkage}`.
///
/// `null` linkage is only accepted when `allow_null` is set (full
/// replacement).
pub(crate) fn parse_relationship_document(
    body: &Value,
    allow_null: bool,
) -> Result<Option<EventId>, Error> {
    let linkage = top_level_data(body)?;
    let parsed = parse_event_linkage(linkage, "/data")?;
    if parsed.is_none() && !allow_null {
        return Err(Error::invalid_request("`data` must be a resource identifier").with_pointer("/data"));
    }
    Ok(parsed)
}
