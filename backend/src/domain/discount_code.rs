//! Discount code aggregate and its attribute value types.
//!
//! A discount code reduces the price of tickets (`used_for = ticket`, owned by
//! one event) or of the event fee itself (`used_for = event`, managed by
//! administrators). Writes arrive as a [`DiscountCodeDraft`], a sparse set of
//! proposed changes that is either turned into a [`NewDiscountCode`] or merged
//! over a persisted [`DiscountCode`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::EventId;
use crate::domain::quantity_rules::{ProposedQuantities, QuantitySnapshot};

/// Numeric discount code primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiscountCodeId(i32);

impl DiscountCodeId {
    /// Wrap a raw primary key.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw primary key.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for DiscountCodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value was not one of the allowed choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not one of: {}", .allowed.join(", "))]
pub struct UnknownChoice {
    value: String,
    allowed: &'static [&'static str],
}

impl UnknownChoice {
    fn new(value: &str, allowed: &'static [&'static str]) -> Self {
        Self {
            value: value.to_owned(),
            allowed,
        }
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Accepted wire values.
            pub const CHOICES: &'static [&'static str] = &[$($wire),+];

            /// Wire representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownChoice::new(other, Self::CHOICES)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// How `value` is applied: a fixed amount or a percentage.
    DiscountType { Amount => "amount", Percent => "percent" }
}

choice_enum! {
    /// Display grouping hint for the tickets a code applies to.
    TicketsScope { Event => "event", Ticket => "ticket" }
}

choice_enum! {
    /// What the code discounts.
    UsedFor { Ticket => "ticket", Event => "event" }
}

/// Persisted discount code.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCode {
    pub id: DiscountCodeId,
    pub code: Option<String>,
    pub discount_url: Option<String>,
    pub value: Option<f64>,
    pub discount_type: Option<DiscountType>,
    pub is_active: bool,
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub tickets: Option<TicketsScope>,
    pub used_for: Option<UsedFor>,
    pub event_id: Option<EventId>,
    pub created_at: DateTime<Utc>,
}

impl DiscountCode {
    /// Quantity fields as stored, used to default omitted update fields.
    pub fn quantity_snapshot(&self) -> QuantitySnapshot {
        QuantitySnapshot {
            tickets_number: self.tickets_number,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        }
    }
}

/// Discount code ready to be inserted. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountCode {
    pub code: Option<String>,
    pub discount_url: Option<String>,
    pub value: Option<f64>,
    pub discount_type: Option<DiscountType>,
    pub is_active: bool,
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub tickets: Option<TicketsScope>,
    pub used_for: UsedFor,
    pub event_id: Option<EventId>,
}

/// Sparse set of proposed changes to a discount code.
///
/// For nullable attributes the outer `Option` records presence and the inner
/// one the value: `None` means the field was omitted, `Some(None)` that it was
/// explicitly set to null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountCodeDraft {
    pub code: Option<Option<String>>,
    pub discount_url: Option<Option<String>>,
    pub value: Option<Option<f64>>,
    pub discount_type: Option<Option<DiscountType>>,
    pub is_active: Option<bool>,
    pub tickets_number: Option<Option<i32>>,
    pub min_quantity: Option<Option<i32>>,
    pub max_quantity: Option<Option<i32>>,
    pub valid_from: Option<Option<DateTime<Utc>>>,
    pub valid_till: Option<Option<DateTime<Utc>>>,
    pub tickets: Option<Option<TicketsScope>>,
    pub used_for: Option<Option<UsedFor>>,
    pub event_id: Option<Option<EventId>>,
}

impl DiscountCodeDraft {
    /// Quantity fields exactly as proposed.
    pub fn proposed_quantities(&self) -> ProposedQuantities {
        ProposedQuantities {
            tickets_number: self.tickets_number,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        }
    }

    /// `used_for` when it was supplied with a value.
    pub fn used_for(&self) -> Option<UsedFor> {
        self.used_for.flatten()
    }

    /// Build an insertable record. Omitted fields take their defaults.
    pub fn into_new(self, used_for: UsedFor) -> NewDiscountCode {
        NewDiscountCode {
            code: self.code.flatten(),
            discount_url: self.discount_url.flatten(),
            value: self.value.flatten(),
            discount_type: self.discount_type.flatten(),
            is_active: self.is_active.unwrap_or(false),
            tickets_number: self.tickets_number.flatten(),
            min_quantity: self.min_quantity.flatten(),
            max_quantity: self.max_quantity.flatten(),
            valid_from: self.valid_from.flatten(),
            valid_till: self.valid_till.flatten(),
            tickets: self.tickets.flatten(),
            used_for,
            event_id: self.event_id.flatten(),
        }
    }

    /// Overwrite the fields of `target` that this draft supplies.
    pub fn apply_to(self, target: &mut DiscountCode) {
        fn merge<T>(slot: &mut T, proposed: Option<T>) {
            if let Some(value) = proposed {
                *slot = value;
            }
        }

        merge(&mut target.code, self.code);
        merge(&mut target.discount_url, self.discount_url);
        merge(&mut target.value, self.value);
        merge(&mut target.discount_type, self.discount_type);
        merge(&mut target.is_active, self.is_active);
        merge(&mut target.tickets_number, self.tickets_number);
        merge(&mut target.min_quantity, self.min_quantity);
        merge(&mut target.max_quantity, self.max_quantity);
        merge(&mut target.valid_from, self.valid_from);
        merge(&mut target.valid_till, self.valid_till);
        merge(&mut target.tickets, self.tickets);
        merge(&mut target.used_for, self.used_for);
        merge(&mut target.event_id, self.event_id);
    }
}
