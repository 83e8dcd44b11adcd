//! PostgreSQL-backed `EventRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventId, EventIdentifier};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::EventRow;
use super::pool::{DbPool, PoolError};
use super::schema::events;

#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, |message| EventRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn row_to_event(row: EventRow) -> Event {
    Event {
        id: EventId::new(row.id),
        identifier: EventIdentifier::new(row.identifier),
        name: row.name,
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        events::table
            .find(id.get())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(row_to_event))
            .map_err(map_diesel_error)
    }

    async fn find_by_identifier(
        &self,
        identifier: &EventIdentifier,
    ) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        events::table
            .filter(events::identifier.eq(identifier.as_str()))
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(row_to_event))
            .map_err(map_diesel_error)
    }
}
