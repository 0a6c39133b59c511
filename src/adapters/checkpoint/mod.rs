//! Human checkpoint adapters.

pub mod auto;
pub mod console;
pub mod scripted;

pub use auto::AutoAcceptCheckpoint;
pub use console::ConsoleCheckpoint;
pub use scripted::ScriptedCheckpoint;
