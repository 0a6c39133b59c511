//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces the orchestration core depends on:
//! - SearchProvider / ScrapeProvider: external information capabilities
//! - WorkerRuntime: the backend that performs stages
//! - HumanCheckpoint: operator confirmation of stage outputs
//! - Manager: stage selection in the hierarchical model
//! - MemoryRepository: cross-run persistence of stage outputs

pub mod capability;
pub mod checkpoint;
pub mod manager;
pub mod memory_repository;
pub mod null_memory;
pub mod worker_runtime;

pub use capability::{ScrapeProvider, SearchProvider};
pub use checkpoint::HumanCheckpoint;
pub use manager::{Manager, ManagerDecision, ManagerView};
pub use memory_repository::MemoryRepository;
pub use null_memory::NullMemoryRepository;
pub use worker_runtime::{DelegatedAnswer, RequestKind, StageRequest, WorkerRuntime, WorkerTurn};
