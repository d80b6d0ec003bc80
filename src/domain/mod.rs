pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{Item, ItemOutcome, ItemResult, MediaFormat, SessionOutcome};
