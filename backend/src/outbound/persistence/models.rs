//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{discount_codes, events, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i32,
    pub identifier: String,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CallerRow {
    pub id: i32,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

/// Row read from `discount_codes`. Choice columns are still raw strings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = discount_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DiscountCodeRow {
    pub id: i32,
    pub code: Option<String>,
    pub discount_url: Option<String>,
    pub value: Option<f64>,
    pub discount_type: Option<String>,
    pub is_active: bool,
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub tickets: Option<String>,
    pub used_for: Option<String>,
    pub event_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Insert row; `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = discount_codes)]
pub(crate) struct NewDiscountCodeRow<'a> {
    pub code: Option<&'a str>,
    pub discount_url: Option<&'a str>,
    pub value: Option<f64>,
    pub discount_type: Option<&'static str>,
    pub is_active: bool,
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub tickets: Option<&'static str>,
    pub used_for: &'static str,
    pub event_id: Option<i32>,
}

/// Every mutable column; `None` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = discount_codes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DiscountCodeChangeset<'a> {
    pub code: Option<&'a str>,
    pub discount_url: Option<&'a str>,
    pub value: Option<f64>,
    pub discount_type: Option<&'static str>,
    pub is_active: bool,
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub tickets: Option<&'static str>,
    pub used_for: Option<&'static str>,
    pub event_id: Option<i32>,
}
