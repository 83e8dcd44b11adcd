//! Authenticated caller and the roles they hold.
//!
//! A [`Caller`] is resolved once per request from the bearer token and passed
//! explicitly into every service operation.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::EventId;

/// Numeric user primary key, as carried by the token `identity` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw primary key.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw primary key.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a user holds on a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventRole {
    Organizer,
    CoOrganizer,
}

impl EventRole {
    /// Map a stored role name. Roles that do not grant event management
    /// (attendee, track organizer, ...) yield `None`.
    pub fn from_role_name(name: &str) -> Option<Self> {
        match name {
            "organizer" => Some(Self::Organizer),
            "coorganizer" => Some(Self::CoOrganizer),
            _ => None,
        }
    }
}

/// Identity and permissions of the requesting user.
///
/// # Examples
/// ```
/// use ticketing_backend::domain::{Caller, EventId, EventRole, UserId};
///
/// let caller = Caller::new(UserId::new(7)).with_event_role(EventId::new(1), EventRole::CoOrganizer);
/// assert!(caller.is_organizer());
/// assert!(caller.manages_event(EventId::new(1)));
/// assert!(!caller.manages_event(EventId::new(2)));
/// assert!(!caller.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    is_admin: bool,
    is_super_admin: bool,
    event_roles: BTreeMap<EventId, EventRole>,
}

impl Caller {
    /// Caller with no privileges.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
            is_super_admin: false,
            event_roles: BTreeMap::new(),
        }
    }

    /// Set the administrator flag.
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Set the super administrator flag.
    #[must_use]
    pub fn with_super_admin(mut self, is_super_admin: bool) -> Self {
        self.is_super_admin = is_super_admin;
        self
    }

    /// Grant a role on an event. An organizer grant is never downgraded by a
    /// later co-organizer grant for the same event.
    #[must_use]
    pub fn with_event_role(mut self, event_id: EventId, role: EventRole) -> Self {
        self.event_roles
            .entry(event_id)
            .and_modify(|held| *held = (*held).min(role))
            .or_insert(role);
        self
    }

    /// Authenticated user id.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Administrators and super administrators.
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.is_super_admin
    }

    /// Holds an organizer or co-organizer role on at least one event.
    pub fn is_organizer(&self) -> bool {
        !self.event_roles.is_empty()
    }

    /// Holds an organizer or co-organizer role on `event_id`.
    pub fn manages_event(&self, event_id: EventId) -> bool {
        self.event_roles.contains_key(&event_id)
    }

    /// Role held on `event_id`, if any.
    pub fn role_for(&self, event_id: EventId) -> Option<EventRole> {
        self.event_roles.get(&event_id).copied()
    }
}
