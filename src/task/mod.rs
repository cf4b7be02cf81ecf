//! Task storage.
//!
//! Stores task records in `PostgreSQL` and lists them by identifier, author
//! or label. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The [`services::TaskStore`] entry point in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
