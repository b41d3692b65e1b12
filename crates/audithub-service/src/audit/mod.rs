pub mod ingest;
pub mod query;

pub use ingest::{AuditIngestionService, EventDraft, IngestAuth};
pub use query::AuditQueryService;
