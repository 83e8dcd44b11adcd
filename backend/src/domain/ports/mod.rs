//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the caller directory) are implemented by
//! outbound adapters. Driving ports (query and command) are implemented by the
//! domain service and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod caller_directory;
mod discount_code_command;
mod discount_code_query;
mod discount_code_repository;
mod event_repository;

#[cfg(test)]
pub use caller_directory::MockCallerDirectory;
pub use caller_directory::{CallerDirectory, CallerDirectoryError};
pub use discount_code_command::{
    CreateDiscountCodeRequest, CreatedDiscountCode, DiscountCodeCommand, EventLinkChange,
};
pub use discount_code_query::{DiscountCodePage, DiscountCodeQuery, ListDiscountCodesRequest};
#[cfg(test)]
pub use discount_code_repository::MockDiscountCodeRepository;
pub use discount_code_repository::{
    DiscountCodeRepository, DiscountCodeRepositoryError, DiscountCodeSlice,
};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError, find_by_ref};
