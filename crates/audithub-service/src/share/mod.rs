pub mod service;

pub use service::{CreatedShare, ShareTokenService, ShareValidation, SharedPayload};
