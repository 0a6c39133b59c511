//! Stage domain model.
//!
//! A stage is one immutable unit of planned work bound to exactly one worker.
//! Stages are rendered from [`StageTemplate`]s when a plan is built, so the
//! target string is substituted at construction time, never at run time.

use serde::{Deserialize, Serialize};

use super::target::TargetTraits;
use super::worker::WorkerId;

/// Marker a stage output uses when it lists findings.
pub const ACCOUNTS_FOUND: &str = "Accounts found";

/// Marker a stage output uses when a line of inquiry came up empty.
pub const NO_DATA_FOUND: &str = "No data found for this line of inquiry.";

/// Placeholder substituted with the target in templates.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Investigative dimension a stage covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// First sweep: where does the target show up at all
    Reconnaissance,
    /// Marketplace and trading platform activity
    Marketplace,
    /// Forum presence and communication links
    Forum,
    /// Social network profiles and contacts
    Social,
    /// Domains, IPs, leaks and technical metadata
    Technical,
    /// Interests and behavioral patterns
    Behavioral,
    /// Wallets and transaction trails
    FinancialTrail,
    /// Merge everything gathered so far
    Synthesis,
    /// Archives and rare sources
    DeepSearch,
    /// Cross-source verification
    Verification,
}

/// How relevant a dimension looks for a given target before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relevance {
    Low,
    Normal,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reconnaissance => "reconnaissance",
            Self::Marketplace => "marketplace",
            Self::Forum => "forum",
            Self::Social => "social",
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::FinancialTrail => "financial_trail",
            Self::Synthesis => "synthesis",
            Self::DeepSearch => "deep_search",
            Self::Verification => "verification",
        }
    }

    /// Relevance judged from surface traits of the target.
    ///
    /// Financial-trail analysis is low value without a wallet-like identifier,
    /// technical analysis without an e-mail, domain or IP.
    pub fn relevance(&self, traits: &TargetTraits) -> Relevance {
        match self {
            Self::FinancialTrail if !traits.has_crypto_address => Relevance::Low,
            Self::Technical if !(traits.has_email || traits.has_domain || traits.has_ip) => {
                Relevance::Low
            }
            _ => Relevance::Normal,
        }
    }

    /// Whether this dimension only makes sense after every other stage has run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verification)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal-shape contract every stage output must satisfy.
///
/// The generative content is free text; the contract only requires that the
/// output carries at least one of the declared markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputContract {
    /// Free-text description of the expected report structure
    pub description: String,
    /// At least one must appear (case-insensitive)
    pub markers: Vec<String>,
}

/// A stage output that does not carry any contract marker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("output satisfies none of the markers: {markers:?}")]
pub struct ContractViolation {
    pub markers: Vec<String>,
}

impl OutputContract {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            markers: vec![ACCOUNTS_FOUND.to_string(), "No data found".to_string()],
        }
    }

    pub fn check(&self, output: &str) -> Result<(), ContractViolation> {
        let lowered = output.to_lowercase();
        if self
            .markers
            .iter()
            .any(|m| lowered.contains(&m.to_lowercase()))
        {
            Ok(())
        } else {
            Err(ContractViolation {
                markers: self.markers.clone(),
            })
        }
    }

    /// Return the output unchanged if it satisfies the contract, otherwise
    /// append the no-data marker so downstream readers see an explicit gap.
    pub fn enforce(&self, output: String) -> (String, Option<ContractViolation>) {
        match self.check(&output) {
            Ok(()) => (output, None),
            Err(violation) => {
                let mut normalized = output;
                if !normalized.is_empty() && !normalized.ends_with('\n') {
                    normalized.push('\n');
                }
                normalized.push_str(NO_DATA_FOUND);
                (normalized, Some(violation))
            }
        }
    }
}

/// Unrendered stage definition for one dimension of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTemplate {
    pub dimension: Dimension,
    pub title: String,
    pub worker: WorkerId,
    /// Description with `{target}` placeholders
    pub description: String,
    pub expected_output: String,
    /// Search queries with `{target}` placeholders
    pub queries: Vec<String>,
    pub human_checkpoint: bool,
}

impl StageTemplate {
    pub fn new(
        dimension: Dimension,
        title: impl Into<String>,
        worker: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            dimension,
            title: title.into(),
            worker: WorkerId::new(worker),
            description: description.into(),
            expected_output: expected_output.into(),
            queries: Vec::new(),
            human_checkpoint: false,
        }
    }

    pub fn with_queries<I, S>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries = queries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_checkpoint(mut self) -> Self {
        self.human_checkpoint = true;
        self
    }

    /// Specialize this template to a target.
    pub fn render(&self, index: usize, target: &str) -> Stage {
        Stage {
            index,
            dimension: self.dimension,
            title: self.title.clone(),
            description: self.description.replace(TARGET_PLACEHOLDER, target),
            expected_output: OutputContract::new(self.expected_output.clone()),
            worker: self.worker.clone(),
            queries: self
                .queries
                .iter()
                .map(|q| q.replace(TARGET_PLACEHOLDER, target))
                .collect(),
            human_checkpoint: self.human_checkpoint,
        }
    }
}

/// One unit of planned work, specialized to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Position in the plan (0-based)
    pub index: usize,
    pub dimension: Dimension,
    pub title: String,
    pub description: String,
    pub expected_output: OutputContract,
    pub worker: WorkerId,
    pub queries: Vec<String>,
    pub human_checkpoint: bool,
}
