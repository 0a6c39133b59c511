//! Infrastructure layer module
//!
//! Process-wide concerns that sit outside the domain:
//! - Configuration loading (figment)
//! - Logging (tracing)

pub mod config;
pub mod logging;
