pub mod model;

pub use model::EditSession;
