//! PostgreSQL-backed `DiscountCodeRepository` using Diesel.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::listing::{PageRequest, SortField, SortKey};
use crate::domain::ports::{
    DiscountCodeRepository, DiscountCodeRepositoryError, DiscountCodeSlice,
};
use crate::domain::{
    DiscountCode, DiscountCodeFilter, DiscountCodeId, EventId, NewDiscountCode, UnknownChoice,
    UsedFor,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DiscountCodeChangeset, DiscountCodeRow, NewDiscountCodeRow};
use super::pool::{DbPool, PoolError};
use super::schema::discount_codes;

/// Diesel implementation of [`DiscountCodeRepository`].
#[derive(Clone)]
pub struct DieselDiscountCodeRepository {
    pool: DbPool,
}

impl DieselDiscountCodeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DiscountCodeRepositoryError {
    map_basic_pool_error(error, |message| {
        DiscountCodeRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> DiscountCodeRepositoryError {
    map_basic_diesel_error(
        error,
        DiscountCodeRepositoryError::query,
        DiscountCodeRepositoryError::connection,
    )
}

fn decode_choice<T>(raw: Option<String>, column: &str) -> Result<Option<T>, DiscountCodeRepositoryError>
where
    T: FromStr<Err = UnknownChoice>,
{
    raw.map(|value| {
        value.parse().map_err(|err: UnknownChoice| {
            DiscountCodeRepositoryError::query(format!("invalid {column} column: {err}"))
        })
    })
    .transpose()
}

fn row_to_code(row: DiscountCodeRow) -> Result<DiscountCode, DiscountCodeRepositoryError> {
    Ok(DiscountCode {
        id: DiscountCodeId::new(row.id),
        code: row.code,
        discount_url: row.discount_url,
        value: row.value,
        discount_type: decode_choice(row.discount_type, "type")?,
        is_active: row.is_active,
        tickets_number: row.tickets_number,
        min_quantity: row.min_quantity,
        max_quantity: row.max_quantity,
        valid_from: row.valid_from,
        valid_till: row.valid_till,
        tickets: decode_choice(row.tickets, "tickets")?,
        used_for: decode_choice(row.used_for, "used_for")?,
        event_id: row.event_id.map(EventId::new),
        created_at: row.created_at,
    })
}

fn filtered(filter: DiscountCodeFilter) -> discount_codes::BoxedQuery<'static, Pg> {
    match filter {
        DiscountCodeFilter::All => discount_codes::table.into_boxed(),
        DiscountCodeFilter::Event(event_id) => discount_codes::table
            .filter(discount_codes::event_id.eq(event_id.get()))
            .into_boxed(),
    }
}

macro_rules! order_by_key {
    ($query:expr, $column:expr, $descending:expr) => {
        if $descending {
            $query.then_order_by($column.desc())
        } else {
            $query.then_order_by($column.asc())
        }
    };
}

fn ordered(
    mut query: discount_codes::BoxedQuery<'static, Pg>,
    sort: &[SortKey],
) -> discount_codes::BoxedQuery<'static, Pg> {
    for key in sort {
        query = match key.field {
            SortField::Id => order_by_key!(query, discount_codes::id, key.descending),
            SortField::Code => order_by_key!(query, discount_codes::code, key.descending),
            SortField::Value => order_by_key!(query, discount_codes::value, key.descending),
            SortField::TicketsNumber => {
                order_by_key!(query, discount_codes::tickets_number, key.descending)
            }
            SortField::MinQuantity => {
                order_by_key!(query, discount_codes::min_quantity, key.descending)
            }
            SortField::MaxQuantity => {
                order_by_key!(query, discount_codes::max_quantity, key.descending)
            }
            SortField::ValidFrom => order_by_key!(query, discount_codes::valid_from, key.descending),
            SortField::ValidTill => order_by_key!(query, discount_codes::valid_till, key.descending),
            SortField::CreatedAt => order_by_key!(query, discount_codes::created_at, key.descending),
        };
    }
    query.then_order_by(discount_codes::id.asc())
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn page_query(
    filter: DiscountCodeFilter,
    page: PageRequest,
    sort: &[SortKey],
) -> discount_codes::BoxedQuery<'static, Pg> {
    let query = ordered(filtered(filter), sort);
    match page.size() {
        Some(size) => query.limit(i64::from(size)).offset(to_i64(page.offset())),
        None => query,
    }
}

type TicketCodesOf = diesel::dsl::Filter<
    diesel::dsl::Filter<discount_codes::table, diesel::dsl::Eq<discount_codes::event_id, i32>>,
    diesel::dsl::Eq<discount_codes::used_for, &'static str>,
>;

/// Ticket codes attached to `event_id`; at most one should exist.
fn ticket_codes_of(event_id: EventId) -> TicketCodesOf {
    discount_codes::table
        .filter(discount_codes::event_id.eq(event_id.get()))
        .filter(discount_codes::used_for.eq(UsedFor::Ticket.as_str()))
}

fn changeset(code: &DiscountCode) -> DiscountCodeChangeset<'_> {
    DiscountCodeChangeset {
        code: code.code.as_deref(),
        discount_url: code.discount_url.as_deref(),
        value: code.value,
        discount_type: code.discount_type.map(|kind| kind.as_str()),
        is_active: code.is_active,
        tickets_number: code.tickets_number,
        min_quantity: code.min_quantity,
        max_quantity: code.max_quantity,
        valid_from: code.valid_from,
        valid_till: code.valid_till,
        tickets: code.tickets.map(|scope| scope.as_str()),
        used_for: code.used_for.map(|used_for| used_for.as_str()),
        event_id: code.event_id.map(EventId::get),
    }
}

#[async_trait]
impl DiscountCodeRepository for DieselDiscountCodeRepository {
    async fn list(
        &self,
        filter: DiscountCodeFilter,
        page: PageRequest,
        sort: &[SortKey],
    ) -> Result<DiscountCodeSlice, DiscountCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<DiscountCodeRow> = page_query(filter, page, sort)
            .select(DiscountCodeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(total, returned = rows.len(), "listed discount codes");
        Ok(DiscountCodeSlice {
            codes: rows.into_iter().map(row_to_code).collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find_by_id(
        &self,
        id: DiscountCodeId,
    ) -> Result<Option<DiscountCode>, DiscountCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = discount_codes::table
            .find(id.get())
            .select(DiscountCodeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_code).transpose()
    }

    async fn ticket_code_exists(
        &self,
        event_id: EventId,
    ) -> Result<bool, DiscountCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(ticket_codes_of(event_id)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert(
        &self,
        code: &NewDiscountCode,
    ) -> Result<DiscountCode, DiscountCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDiscountCodeRow {
            code: code.code.as_deref(),
            discount_url: code.discount_url.as_deref(),
            value: code.value,
            discount_type: code.discount_type.map(|kind| kind.as_str()),
            is_active: code.is_active,
            tickets_number: code.tickets_number,
            min_quantity: code.min_quantity,
            max_quantity: code.max_quantity,
            valid_from: code.valid_from,
            valid_till: code.valid_till,
            tickets: code.tickets.map(|scope| scope.as_str()),
            used_for: code.used_for.as_str(),
            event_id: code.event_id.map(EventId::get),
        };
        let inserted = diesel::insert_into(discount_codes::table)
            .values(&row)
            .returning(DiscountCodeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_code(inserted)
    }

    async fn update(&self, code: &DiscountCode) -> Result<bool, DiscountCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(discount_codes::table.find(code.id.get()))
            .set(&changeset(code))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: DiscountCodeId) -> Result<bool, DiscountCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(discount_codes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
