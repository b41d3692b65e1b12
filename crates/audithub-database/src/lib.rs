//! # audithub-database
//!
//! Durable store access for AuditHub. The store is an external
//! collaborator exposed through three narrow traits — session lookup,
//! share-grant persistence, and audit-log persistence — implemented here
//! over PostgreSQL. Services depend on the traits, never on SQL.

pub mod connection;
pub mod repositories;
pub mod store;

pub use connection::create_pool;
pub use store::{AuditLogStore, SessionDirectory, ShareGrantStore};
