//! Built-in pipeline stages.
//!
//! - [`DeserializeStage`] / [`DeserializeJsonStage`] - pre-handler input
//!   stages feeding the raw handler
//! - [`PaginateStage`] - post-handler envelope construction
//! - [`SerializeStage`] - post-handler response body construction
//! - [`CatchStage`] - domain-error-to-response translation

mod catch;
mod deserialize;
mod paginate;
mod serialize;

pub use catch::CatchStage;
pub use deserialize::{DeserializeJsonStage, DeserializeStage};
pub use paginate::PaginateStage;
pub use serialize::SerializeStage;
