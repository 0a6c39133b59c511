//! Adapters implementing the domain ports.

pub mod checkpoint;
pub mod providers;
pub mod runtime;
pub mod sqlite;
