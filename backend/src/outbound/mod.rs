//! Outbound adapters implementing the domain ports.
//!
//! - **memory**: in-process stores used without a database and in tests
//! - **persistence**: PostgreSQL-backed adapters using Diesel
//! - **password**: Argon2 hashing shared by both identity providers
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub(crate) mod password;
pub mod persistence;
