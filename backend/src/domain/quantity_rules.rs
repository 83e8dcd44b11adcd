//! Range rule tying `min_quantity`, `max_quantity` and `tickets_number`.
//!
//! The rule only looks at the fields a request supplies. On update, omitted
//! fields are first defaulted from the persisted record so the comparison sees
//! the values the record will hold after the write.

use crate::domain::Error;

/// JSON pointer of the minimum quantity attribute.
pub const MIN_QUANTITY_POINTER: &str = "/data/attributes/min-quantity";
/// JSON pointer of the tickets number attribute.
pub const TICKETS_NUMBER_POINTER: &str = "/data/attributes/tickets-number";

/// Quantity fields of a request. Outer `None` means omitted, `Some(None)`
/// means explicit null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProposedQuantities {
    pub tickets_number: Option<Option<i32>>,
    pub min_quantity: Option<Option<i32>>,
    pub max_quantity: Option<Option<i32>>,
}

/// Quantity fields of a persisted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantitySnapshot {
    pub tickets_number: Option<i32>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
}

/// Reason a quantity combination was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuantityViolation {
    #[error("min-quantity should be less than max-quantity")]
    MinNotBelowMax,
    #[error("tickets-number should be greater than min-quantity")]
    TicketsBelowMin,
}

impl QuantityViolation {
    /// Attribute pointer the violation is reported against.
    pub const fn pointer(self) -> &'static str {
        match self {
            Self::MinNotBelowMax => MIN_QUANTITY_POINTER,
            Self::TicketsBelowMin => TICKETS_NUMBER_POINTER,
        }
    }
}

impl From<QuantityViolation> for Error {
    fn from(violation: QuantityViolation) -> Self {
        Self::unprocessable(violation.to_string()).with_pointer(violation.pointer())
    }
}

impl ProposedQuantities {
    /// Fill omitted fields from the persisted record. Every field is present
    /// afterwards, possibly as null.
    #[must_use]
    pub fn defaulted_from(self, snapshot: QuantitySnapshot) -> Self {
        Self {
            tickets_number: Some(self.tickets_number.unwrap_or(snapshot.tickets_number)),
            min_quantity: Some(self.min_quantity.unwrap_or(snapshot.min_quantity)),
            max_quantity: Some(self.max_quantity.unwrap_or(snapshot.max_quantity)),
        }
    }

    /// Check the range rule over the present fields.
    ///
    /// A comparison runs only when both of its operands hold values.
    ///
    /// # Examples
    /// ```
    /// use ticketing_backend::domain::quantity_rules::{ProposedQuantities, QuantityViolation};
    ///
    /// let proposed = ProposedQuantities {
    ///     min_quantity: Some(Some(5)),
    ///     max_quantity: Some(Some(3)),
    ///     ..ProposedQuantities::default()
    /// };
    /// assert_eq!(proposed.validate(), Err(QuantityViolation::MinNotBelowMax));
    /// ```
    pub fn validate(self) -> Result<(), QuantityViolation> {
        let min = self.min_quantity.flatten();
        let max = self.max_quantity.flatten();
        let tickets = self.tickets_number.flatten();

        if self.min_quantity.is_some() || self.max_quantity.is_some() {
            if let (Some(min), Some(max)) = (min, max) {
                if min >= max {
                    return Err(QuantityViolation::MinNotBelowMax);
                }
            }
        }

        if self.tickets_number.is_some() || self.max_quantity.is_some() {
            if let (Some(tickets), Some(min)) = (tickets, min) {
                if tickets < min {
                    return Err(QuantityViolation::TicketsBelowMin);
                }
            }
        }

        Ok(())
    }
}
