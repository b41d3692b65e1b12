//! # audithub-api
//!
//! HTTP API layer for AuditHub built on Axum.
//!
//! Provides the share and audit endpoints, extractors (identity auth,
//! pagination), DTOs, error mapping, and the CORS/trace/timeout layers.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
