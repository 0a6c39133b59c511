//! Worker roster.
//!
//! The roster is an immutable configuration object built once at process
//! start and shared by reference with the plan builder and orchestrators.

use serde::Serialize;

use super::worker::{Capability, Worker, WorkerId};
use crate::domain::errors::{DomainError, DomainResult};

/// Fixed set of workers available to an investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    workers: Vec<Worker>,
    manager: Option<Worker>,
}

impl Roster {
    /// Build a roster, rejecting duplicate worker ids.
    pub fn new(workers: Vec<Worker>) -> DomainResult<Self> {
        for (i, worker) in workers.iter().enumerate() {
            if workers[..i].iter().any(|w| w.id == worker.id) {
                return Err(DomainError::ValidationFailed(format!(
                    "duplicate worker id in roster: {}",
                    worker.id
                )));
            }
        }
        Ok(Self {
            workers,
            manager: None,
        })
    }

    /// Attach a managing worker for the hierarchical model.
    ///
    /// The manager has no capabilities of its own beyond delegation.
    pub fn with_manager(mut self, manager: Worker) -> DomainResult<Self> {
        if !manager.capabilities().is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "manager {} must not carry capabilities",
                manager.id
            )));
        }
        if self.workers.iter().any(|w| w.id == manager.id) {
            return Err(DomainError::ValidationFailed(format!(
                "manager id {} collides with a worker",
                manager.id
            )));
        }
        self.manager = Some(manager.with_delegation());
        Ok(self)
    }

    pub fn get(&self, id: &WorkerId) -> Option<&Worker> {
        self.workers.iter().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &WorkerId) -> bool {
        self.get(id).is_some()
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn manager(&self) -> Option<&Worker> {
        self.manager.as_ref()
    }

    /// First worker (in roster order) other than `except` that has `capability`.
    pub fn first_with(&self, capability: Capability, except: &WorkerId) -> Option<&Worker> {
        self.workers
            .iter()
            .find(|w| &w.id != except && w.has(capability))
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
