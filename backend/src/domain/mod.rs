//! Domain entities, rules and use cases for discount codes.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters call the driving
//! ports in [`ports`]; outbound adapters implement the driven ones.

pub mod caller;
pub mod discount_code;
pub mod discount_code_access;
pub mod discount_code_service;
pub mod error;
pub mod event;
pub mod listing;
pub mod ports;
pub mod quantity_rules;
pub mod trace_id;

pub use self::caller::{Caller, EventRole, UserId};
pub use self::discount_code::{
    DiscountCode, DiscountCodeDraft, DiscountCodeId, DiscountType, NewDiscountCode, TicketsScope,
    UnknownChoice, UsedFor,
};
pub use self::discount_code_access::{DiscountCodeFilter, SchemaView, ScopedEvent};
pub use self::discount_code_service::DiscountCodeService;
pub use self::error::{Error, ErrorCode, ErrorSource};
pub use self::event::{Event, EventId, EventIdentifier, EventRef};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
