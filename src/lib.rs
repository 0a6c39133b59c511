//! osint-swarm - multi-worker OSINT investigation orchestrator
//!
//! A fixed roster of specialized workers jointly investigates one target.
//! The investigation plan is a predeclared list of stages, each bound to one
//! worker; stage outputs flow forward as context for later stages, optional
//! human checkpoints can accept, reject or abort, and the aggregated result
//! is written to a timestamped report file.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): plan building, the sequential and
//!   hierarchical orchestrators, checkpoint gating and report writing
//! - **Adapters** (`adapters`): search/scrape providers, worker runtimes,
//!   checkpoint front-ends and the SQLite memory store
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use osint_swarm::adapters::checkpoint::AutoAcceptCheckpoint;
//! use osint_swarm::adapters::runtime::MockRuntime;
//! use osint_swarm::domain::models::Profile;
//! use osint_swarm::services::{AbortSignal, InvestigationService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let profile = Arc::new(Profile::darknet()?);
//!     let service = InvestigationService::new(
//!         profile,
//!         Arc::new(MockRuntime::new()),
//!         Arc::new(AutoAcceptCheckpoint),
//!     );
//!     let outcome = service.investigate("example_handle_42", AbortSignal::never()).await?;
//!     println!("{}", outcome.result.body());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult, ProviderError, ReportWriteError};
pub use domain::models::{
    Config, ExecutionModel, InvestigationPlan, InvestigationResult, Profile, ProfileKind,
    RunState, Stage,
};
pub use domain::ports::{
    HumanCheckpoint, Manager, MemoryRepository, ScrapeProvider, SearchProvider, WorkerRuntime,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{build_plan, AbortSignal, InvestigationService, ReportWriter};
