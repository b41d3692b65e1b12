pub mod model;

pub use model::{AuditEvent, CreateAuditEvent};
