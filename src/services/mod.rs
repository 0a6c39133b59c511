//! Application services: planning, orchestration and reporting.

pub mod abort;
pub mod checkpoint_gate;
pub mod hierarchical;
pub mod investigation_service;
pub mod plan_builder;
pub mod report_writer;
pub mod rule_manager;
pub mod sequential;
pub mod stage_executor;
pub mod stage_runner;

pub use abort::{abort_pair, AbortHandle, AbortSignal};
pub use checkpoint_gate::CheckpointGate;
pub use hierarchical::HierarchicalOrchestrator;
pub use investigation_service::{InvestigationOutcome, InvestigationService, RunSettings};
pub use plan_builder::build_plan;
pub use report_writer::{render_report, ReportWriter};
pub use rule_manager::RuleBasedManager;
pub use sequential::SequentialOrchestrator;
pub use stage_executor::StageExecutor;
pub use stage_runner::StageRunner;
