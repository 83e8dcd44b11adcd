//! Outbound adapters implementing the driven ports.
//!
//! Only PostgreSQL persistence lives here; adapters translate rows to domain
//! types and hold no business rules.

pub mod persistence;
