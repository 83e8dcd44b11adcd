//! Read-only port onto events.

use async_trait::async_trait;

use crate::domain::{Event, EventId, EventIdentifier, EventRef};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event lookups.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

/// Event lookups used to resolve URL scopes and relationship targets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fetch an event by primary key.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Fetch an event by its public slug.
    async fn find_by_identifier(
        &self,
        identifier: &EventIdentifier,
    ) -> Result<Option<Event>, EventRepositoryError>;
}

/// Resolve either kind of [`EventRef`].
pub async fn find_by_ref<R>(
    events: &R,
    reference: &EventRef,
) -> Result<Option<Event>, EventRepositoryError>
where
    R: EventRepository + ?Sized,
{
    match reference {
        EventRef::Id(id) => events.find_by_id(*id).await,
        EventRef::Identifier(identifier) => events.find_by_identifier(identifier).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn event() -> Event {
        Event {
            id: EventId::new(4),
            identifier: EventIdentifier::new("gala"),
            name: "Gala".into(),
        }
    }

    #[tokio::test]
    async fn numeric_refs_use_the_primary_key() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .with(eq(EventId::new(4)))
            .times(1)
            .return_once(|_| Ok(Some(event())));
        repo.expect_find_by_identifier().never();

        let found = find_by_ref(&repo, &EventRef::parse("4")).await.expect("lookup");
        assert_eq!(found, Some(event()));
    }

    #[tokio::test]
    async fn slug_refs_use_the_identifier() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_find_by_identifier()
            .withf(|identifier| identifier.as_str() == "gala")
            .times(1)
            .return_once(|_| Ok(None));

        let found = find_by_ref(&repo, &EventRef::parse("gala")).await.expect("lookup");
        assert_eq!(found, None);
    }
}
