//! In-memory adapters and token helpers for tests.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites under `backend/tests`. The adapters keep their state
//! behind a `Mutex` and behave like the Diesel ones, including id assignment,
//! ordering and paging.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::domain::listing::{PageRequest, SortField, SortKey};
use crate::domain::ports::{
    CallerDirectory, CallerDirectoryError, DiscountCodeRepository, DiscountCodeRepositoryError,
    DiscountCodeSlice, EventRepository, EventRepositoryError,
};
use crate::domain::{
    Caller, DiscountCode, DiscountCodeFilter, DiscountCodeId, DiscountCodeService, Event, EventId,
    EventIdentifier, NewDiscountCode, UsedFor, UserId,
};
use crate::inbound::http::auth::{IdentityClaims, TokenVerifier};
use crate::inbound::http::state::HttpState;

/// Secret shared by [`TestBackend::http_state`] and [`issue_token`] callers.
pub const TEST_JWT_SECRET: &[u8] = b"ticketing-test-secret";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sign an access token for `user_id`, valid for an hour.
pub fn issue_token(secret: &[u8], user_id: i32) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = IdentityClaims {
        identity: user_id,
        exp: now + 3600,
        iat: Some(now),
        nbf: Some(now),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

#[derive(Default)]
struct CodeTable {
    rows: BTreeMap<i32, DiscountCode>,
    last_id: i32,
}

/// Discount codes held in memory.
#[derive(Default)]
pub struct InMemoryDiscountCodes {
    table: Mutex<CodeTable>,
}

fn nulls_last<T>(left: Option<T>, right: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_field(field: SortField, a: &DiscountCode, b: &DiscountCode) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Code => nulls_last(a.code.as_ref(), b.code.as_ref(), |x, y| x.cmp(y)),
        SortField::Value => nulls_last(a.value, b.value, f64::total_cmp),
        SortField::TicketsNumber => nulls_last(a.tickets_number, b.tickets_number, Ord::cmp),
        SortField::MinQuantity => nulls_last(a.min_quantity, b.min_quantity, Ord::cmp),
        SortField::MaxQuantity => nulls_last(a.max_quantity, b.max_quantity, Ord::cmp),
        SortField::ValidFrom => nulls_last(a.valid_from, b.valid_from, Ord::cmp),
        SortField::ValidTill => nulls_last(a.valid_till, b.valid_till, Ord::cmp),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn compare(sort: &[SortKey], a: &DiscountCode, b: &DiscountCode) -> Ordering {
    sort.iter()
        .map(|key| {
            let ordering = compare_field(key.field, a, b);
            if key.descending {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.id.cmp(&b.id))
}

impl InMemoryDiscountCodes {
    /// Store `code` as is, keeping its id.
    pub fn seed(&self, code: DiscountCode) {
        let mut table = lock(&self.table);
        table.last_id = table.last_id.max(code.id.get());
        table.rows.insert(code.id.get(), code);
    }

    /// Current copy of a stored code.
    pub fn get(&self, id: i32) -> Option<DiscountCode> {
        lock(&self.table).rows.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.table).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DiscountCodeRepository for InMemoryDiscountCodes {
    async fn list(
        &self,
        filter: DiscountCodeFilter,
        page: PageRequest,
        sort: &[SortKey],
    ) -> Result<DiscountCodeSlice, DiscountCodeRepositoryError> {
        let table = lock(&self.table);
        let mut matching: Vec<DiscountCode> = table
            .rows
            .values()
            .filter(|code| match filter {
                DiscountCodeFilter::All => true,
                DiscountCodeFilter::Event(event_id) => code.event_id == Some(event_id),
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(sort, a, b));
        let total = matching.len() as u64;
        let codes = match page.size() {
            Some(size) => matching
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(size as usize)
                .collect(),
            None => matching,
        };
        Ok(DiscountCodeSlice { codes, total })
    }

    async fn find_by_id(
        &self,
        id: DiscountCodeId,
    ) -> Result<Option<DiscountCode>, DiscountCodeRepositoryError> {
        Ok(self.get(id.get()))
    }

    async fn ticket_code_exists(
        &self,
        event_id: EventId,
    ) -> Result<bool, DiscountCodeRepositoryError> {
        Ok(lock(&self.table)
            .rows
            .values()
            .any(|code| code.event_id == Some(event_id) && code.used_for == Some(UsedFor::Ticket)))
    }

    async fn insert(
        &self,
        code: &NewDiscountCode,
    ) -> Result<DiscountCode, DiscountCodeRepositoryError> {
        let mut table = lock(&self.table);
        table.last_id += 1;
        let stored = DiscountCode {
            id: DiscountCodeId::new(table.last_id),
            code: code.code.clone(),
            discount_url: code.discount_url.clone(),
            value: code.value,
            discount_type: code.discount_type,
            is_active: code.is_active,
            tickets_number: code.tickets_number,
            min_quantity: code.min_quantity,
            max_quantity: code.max_quantity,
            valid_from: code.valid_from,
            valid_till: code.valid_till,
            tickets: code.tickets,
            used_for: Some(code.used_for),
            event_id: code.event_id,
            created_at: Utc::now(),
        };
        table.rows.insert(stored.id.get(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, code: &DiscountCode) -> Result<bool, DiscountCodeRepositoryError> {
        let mut table = lock(&self.table);
        match table.rows.get_mut(&code.id.get()) {
            Some(row) => {
                let created_at = row.created_at;
                *row = code.clone();
                row.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: DiscountCodeId) -> Result<bool, DiscountCodeRepositoryError> {
        Ok(lock(&self.table).rows.remove(&id.get()).is_some())
    }
}

/// Events held in memory.
#[derive(Default)]
pub struct InMemoryEvents {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEvents {
    pub fn add(&self, id: i32, identifier: &str, name: &str) {
        lock(&self.events).push(Event {
            id: EventId::new(id),
            identifier: EventIdentifier::new(identifier),
            name: name.to_owned(),
        });
    }
}

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(lock(&self.events).iter().find(|event| event.id == id).cloned())
    }

    async fn find_by_identifier(
        &self,
        identifier: &EventIdentifier,
    ) -> Result<Option<Event>, EventRepositoryError> {
        Ok(lock(&self.events)
            .iter()
            .find(|event| &event.identifier == identifier)
            .cloned())
    }
}

/// Callers held in memory, keyed by user id.
#[derive(Default)]
pub struct InMemoryCallers {
    callers: Mutex<HashMap<UserId, Caller>>,
}

impl InMemoryCallers {
    pub fn add(&self, caller: Caller) {
        lock(&self.callers).insert(caller.user_id(), caller);
    }
}

#[async_trait]
impl CallerDirectory for InMemoryCallers {
    async fn find_caller(&self, user_id: UserId) -> Result<Option<Caller>, CallerDirectoryError> {
        Ok(lock(&self.callers).get(&user_id).cloned())
    }
}

/// The in-memory adapters behind one [`HttpState`].
#[derive(Clone, Default)]
pub struct TestBackend {
    pub codes: Arc<InMemoryDiscountCodes>,
    pub events: Arc<InMemoryEvents>,
    pub callers: Arc<InMemoryCallers>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// State wired like production, verifying tokens with [`TEST_JWT_SECRET`].
    pub fn http_state(&self) -> HttpState {
        let service = Arc::new(DiscountCodeService::new(
            self.codes.clone(),
            self.events.clone(),
        ));
        HttpState::new(
            service.clone(),
            service,
            self.callers.clone(),
            TokenVerifier::hs256(TEST_JWT_SECRET),
        )
    }
}
