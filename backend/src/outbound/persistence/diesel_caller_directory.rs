//! PostgreSQL-backed `CallerDirectory`.
//!
//! Reads the admin flags from `users` and the per-event roles from
//! `users_events_roles`. Role names other than `organizer` and `coorganizer`
//! are ignored.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CallerDirectory, CallerDirectoryError};
use crate::domain::{Caller, EventId, EventRole, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CallerRow;
use super::pool::{DbPool, PoolError};
use super::schema::{roles, users, users_events_roles};

#[derive(Clone)]
pub struct DieselCallerDirectory {
    pool: DbPool,
}

impl DieselCallerDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CallerDirectoryError {
    map_basic_pool_error(error, |message| CallerDirectoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CallerDirectoryError {
    map_basic_diesel_error(
        error,
        CallerDirectoryError::query,
        CallerDirectoryError::connection,
    )
}

type RoleGrants = diesel::dsl::Select<
    diesel::dsl::Filter<
        diesel::dsl::InnerJoin<users_events_roles::table, roles::table>,
        diesel::dsl::Eq<users_events_roles::user_id, i32>,
    >,
    (users_events_roles::event_id, roles::name),
>;

/// `(event_id, role name)` pairs granted to `user_id`.
fn role_grants(user_id: UserId) -> RoleGrants {
    users_events_roles::table
        .inner_join(roles::table)
        .filter(users_events_roles::user_id.eq(user_id.get()))
        .select((users_events_roles::event_id, roles::name))
}

fn build_caller(row: CallerRow, grants: Vec<(i32, String)>) -> Caller {
    grants.into_iter().fold(
        Caller::new(UserId::new(row.id))
            .with_admin(row.is_admin)
            .with_super_admin(row.is_super_admin),
        |caller, (event_id, role_name)| match EventRole::from_role_name(&role_name) {
            Some(role) => caller.with_event_role(EventId::new(event_id), role),
            None => caller,
        },
    )
}

#[async_trait]
impl CallerDirectory for DieselCallerDirectory {
    async fn find_caller(&self, user_id: UserId) -> Result<Option<Caller>, CallerDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = users::table
            .find(user_id.get())
            .select(CallerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let grants: Vec<(i32, String)> = role_grants(user_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Some(build_caller(row, grants)))
    }
}
