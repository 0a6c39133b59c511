//! Domain layer for the osint-swarm orchestration engine
//!
//! This module contains the investigation model (workers, stages, plans,
//! run state) and the port traits adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, ProviderError, ReportWriteError};
