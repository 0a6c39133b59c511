//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - stderr output in JSON or pretty format
//! - optional daily-rolling JSON log files

pub mod logger;

pub use logger::LoggerImpl;
