//! Worker runtime adapters.

pub mod mock;
pub mod research;

pub use mock::{MockRuntime, RecordedCall};
pub use research::ResearchRuntime;
