//! Diesel table definitions.
//!
//! Must match `backend/migrations`. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Events. Read-only for this service.
    events (id) {
        id -> Int4,
        /// Public slug, unique.
        identifier -> Varchar,
        name -> Varchar,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        email -> Varchar,
        is_admin -> Bool,
        is_super_admin -> Bool,
    }
}

diesel::table! {
    roles (id) {
        id -> Int4,
        /// `organizer`, `coorganizer`, and others this service ignores.
        name -> Varchar,
    }
}

diesel::table! {
    users_events_roles (id) {
        id -> Int4,
        user_id -> Int4,
        event_id -> Int4,
        role_id -> Int4,
    }
}

diesel::table! {
    discount_codes (id) {
        id -> Int4,
        code -> Nullable<Varchar>,
        discount_url -> Nullable<Varchar>,
        value -> Nullable<Float8>,
        #[sql_name = "type"]
        discount_type -> Nullable<Varchar>,
        is_active -> Bool,
        tickets_number -> Nullable<Int4>,
        min_quantity -> Nullable<Int4>,
        max_quantity -> Nullable<Int4>,
        valid_from -> Nullable<Timestamptz>,
        valid_till -> Nullable<Timestamptz>,
        tickets -> Nullable<Varchar>,
        used_for -> Nullable<Varchar>,
        event_id -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users_events_roles -> users (user_id));
diesel::joinable!(users_events_roles -> events (event_id));
diesel::joinable!(users_events_roles -> roles (role_id));
diesel::joinable!(discount_codes -> events (event_id));

diesel::allow_tables_to_appear_in_same_query!(
    events,
    users,
    roles,
    users_events_roles,
    discount_codes,
);
