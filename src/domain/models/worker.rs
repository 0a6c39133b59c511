//! Worker domain model.
//!
//! A worker is a named investigative role with a fixed capability set.
//! Workers are immutable once constructed and never own stages.

use serde::{Deserialize, Serialize};

/// A kind of external capability a worker may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Web search returning titles, snippets and URLs
    Search,
    /// Page fetch returning the page text
    Scrape,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Scrape => "scrape",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a worker within a roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An investigative role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    /// Human-readable role name
    pub role: String,
    /// What this worker tries to achieve
    pub goal: String,
    /// Ordered, duplicate-free capability set
    capabilities: Vec<Capability>,
    /// Whether the worker may hand sub-questions to other workers
    pub delegation_allowed: bool,
}

impl Worker {
    pub fn new(id: impl Into<String>, role: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            id: WorkerId::new(id),
            role: role.into(),
            goal: goal.into(),
            capabilities: Vec::new(),
            delegation_allowed: false,
        }
    }

    /// Add a capability, keeping insertion order and ignoring duplicates.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn with_delegation(mut self) -> Self {
        self.delegation_allowed = true;
        self
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_are_ordered_and_unique() {
        let worker = Worker::new("w", "Role", "Goal")
            .with_capability(Capability::Scrape)
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape);

        assert_eq!(worker.capabilities(), &[Capability::Scrape, Capability::Search]);
        assert!(worker.has(Capability::Search));
        assert!(!worker.delegation_allowed);
    }

    #[test]
    fn test_worker_id_serializes_transparently() {
        let id = WorkerId::new("forum_expert");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"forum_expert\"");
    }
}
