//! Domain models for investigations.

pub mod checkpoint;
pub mod config;
pub mod context;
pub mod memory;
pub mod plan;
pub mod profile;
pub mod result;
pub mod roster;
pub mod run_state;
pub mod search;
pub mod stage;
pub mod target;
pub mod worker;

pub use checkpoint::{CheckpointDecision, CheckpointRequest, TimeoutAction};
pub use config::{
    CheckpointConfig, Config, LoggingConfig, MemoryConfig, OrchestrationConfig, ReportConfig,
    RetryConfig, ScrapeConfig, SearchConfig,
};
pub use context::{DelegationLink, ExecutionContext, InvestigationId, StageOutput};
pub use memory::{MemoryEntry, PriorFinding};
pub use plan::InvestigationPlan;
pub use profile::{ExecutionModel, Profile, ProfileKind, ReportSettings, SearchDefaults};
pub use result::InvestigationResult;
pub use roster::Roster;
pub use run_state::{RunState, RunStateMachine};
pub use search::{SearchHit, SearchOptions};
pub use stage::{
    ContractViolation, Dimension, OutputContract, Relevance, Stage, StageTemplate, ACCOUNTS_FOUND,
    NO_DATA_FOUND,
};
pub use target::{TargetQuery, TargetTraits};
pub use worker::{Capability, Worker, WorkerId};
