//! Built-in investigation profiles.
//!
//! A profile bundles the worker roster, the ordered stage templates, the
//! execution model and the report settings for one kind of investigation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::SearchConfig;
use super::roster::Roster;
use super::search::SearchOptions;
use super::target::TargetQuery;
use super::stage::{Dimension, StageTemplate};
use super::worker::{Capability, Worker};
use crate::domain::errors::{DomainError, DomainResult};

/// How the orchestrator walks a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionModel {
    /// Strict plan order, one stage after another
    Sequential,
    /// A manager picks the next stage at every step
    Hierarchical,
}

impl ExecutionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Hierarchical => "hierarchical",
        }
    }
}

impl std::fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Darknet,
    Osint,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Darknet => "darknet",
            Self::Osint => "osint",
        }
    }
}

impl FromStr for ProfileKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "darknet" => Ok(Self::Darknet),
            "osint" => Ok(Self::Osint),
            _ => Err(DomainError::ValidationFailed(format!("Unknown profile: {s}"))),
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report header and file naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSettings {
    pub header: String,
    pub file_prefix: String,
}

/// Search options a profile prefers when the configuration does not override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchDefaults {
    pub result_limit: usize,
    pub country: Option<String>,
    pub locale: Option<String>,
}

/// Complete definition of one investigation program.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub kind: ProfileKind,
    pub model: ExecutionModel,
    pub roster: Roster,
    #[serde(skip)]
    pub templates: Vec<StageTemplate>,
    pub report: ReportSettings,
    pub search: SearchDefaults,
    pub memory_default: bool,
    pub planning_default: bool,
}

impl Profile {
    pub fn builtin(kind: ProfileKind) -> DomainResult<Self> {
        match kind {
            ProfileKind::Darknet => Self::darknet(),
            ProfileKind::Osint => Self::osint(),
        }
    }

    /// Sequential darknet investigation: five stages, each confirmed by a human.
    pub fn darknet() -> DomainResult<Self> {
        let roster = Roster::new(vec![
            Worker::new(
                "darknet_researcher",
                "Darknet researcher",
                "Find and analyze information about the target on darknet resources",
            )
            .with_capability(Capability::Search)
            .with_delegation(),
            Worker::new(
                "marketplace_analyst",
                "Darknet marketplace analyst",
                "Analyze activity on shadow trading platforms",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
            Worker::new(
                "forum_expert",
                "Darknet forum expert",
                "Investigate communications on closed forums",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
            Worker::new(
                "crypto_analyst",
                "Cryptocurrency analyst",
                "Analyze wallets and transaction trails",
            )
            .with_capability(Capability::Search),
            Worker::new(
                "verification_expert",
                "Verification expert",
                "Check the reliability of darknet-sourced data",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
        ])?;

        let templates = vec![
            StageTemplate::new(
                Dimension::Reconnaissance,
                "Initial darknet reconnaissance",
                "darknet_researcher",
                "Run an initial sweep for {target} across shadow marketplaces, closed forums \
                 and specialized boards. Identify possible accounts, related services and \
                 mentions in leaks. Confirm the findings with a human before finishing.",
                "Mentions found on marketplaces, forums and other sources; potential leads: \
                 accounts, related services, leaked data.",
            )
            .with_queries(["\"{target}\" darknet", "\"{target}\" onion", "\"{target}\" leak"])
            .with_checkpoint(),
            StageTemplate::new(
                Dimension::Marketplace,
                "Marketplace analysis",
                "marketplace_analyst",
                "Analyze the activity of {target} on shadow trading platforms: activity \
                 history, related accounts, transactions, interaction types and time \
                 patterns. Check the data with a human before finishing.",
                "Accounts found with activity history and related transactions; observed \
                 activity types, time periods and preferred services.",
            )
            .with_queries(["\"{target}\" marketplace vendor", "\"{target}\" market feedback"])
            .with_checkpoint(),
            StageTemplate::new(
                Dimension::Forum,
                "Forum analysis",
                "forum_expert",
                "Investigate the presence of {target} on darknet forums: profiles, message \
                 history, interactions, discussion topics, contacts and reputation. Check \
                 the profiles and links with a human.",
                "Profiles found with activity and key discussions; main contacts, groups \
                 and reputation metrics.",
            )
            .with_queries(["\"{target}\" forum profile", "\"{target}\" forum posts"])
            .with_checkpoint(),
            StageTemplate::new(
                Dimension::FinancialTrail,
                "Cryptocurrency analysis",
                "crypto_analyst",
                "Analyze the cryptocurrency activity of {target}: related wallets, \
                 transaction history, volumes, links to services and time patterns. \
                 Discuss the transactions found with a human.",
                "Wallets found with significant transactions and services used; volumes, \
                 periods and links to other addresses.",
            )
            .with_queries(["\"{target}\" bitcoin wallet", "\"{target}\" crypto address"])
            .with_checkpoint(),
            StageTemplate::new(
                Dimension::Verification,
                "Verification",
                "verification_expert",
                "Verify everything gathered about {target}: cross-check sources, confirm \
                 findings, surface contradictions, rate source reliability and possible \
                 falsification. Discuss the verification results with a human.",
                "Confirmed facts with sources and confidence; unverified data, \
                 contradictions and recommendations for further checks.",
            )
            .with_queries(["\"{target}\""])
            .with_checkpoint(),
        ];

        Ok(Self {
            kind: ProfileKind::Darknet,
            model: ExecutionModel::Sequential,
            roster,
            templates,
            report: ReportSettings {
                header: "Darknet Investigation Report".to_string(),
                file_prefix: "darknet_investigation".to_string(),
            },
            search: SearchDefaults {
                result_limit: 15,
                country: None,
                locale: None,
            },
            memory_default: true,
            planning_default: false,
        })
    }

    /// Hierarchical open-source investigation: seven stages under a manager.
    pub fn osint() -> DomainResult<Self> {
        let roster = Roster::new(vec![
            Worker::new(
                "lead_analyst",
                "Lead OSINT analyst",
                "Coordinate the investigation and analyze the gathered data",
            )
            .with_capability(Capability::Search)
            .with_delegation(),
            Worker::new(
                "social_expert",
                "Social media expert",
                "Find and analyze social network profiles",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
            Worker::new(
                "technical_analyst",
                "Technical analyst",
                "Analyze technical information and digital footprints",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
            Worker::new(
                "behavior_analyst",
                "Behavior analyst",
                "Analyze behavioral patterns and relationships",
            )
            .with_capability(Capability::Search),
            Worker::new(
                "verification_expert",
                "Data verification expert",
                "Check the reliability of the collected information",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
            Worker::new(
                "deep_search_expert",
                "Deep search expert",
                "Find hidden and hard-to-reach information",
            )
            .with_capability(Capability::Search)
            .with_capability(Capability::Scrape),
            Worker::new(
                "task_keeper",
                "Task keeper",
                "Keep the investigation focused on the stated task",
            )
            .with_capability(Capability::Search),
            Worker::new(
                "context_analyst",
                "Context analyst",
                "Maintain the contextual integrity of the investigation",
            )
            .with_capability(Capability::Search),
        ])?
        .with_manager(Worker::new(
            "osint_manager",
            "OSINT manager",
            "Run the investigation and coordinate the analysts",
        ))?;

        let templates = vec![
            StageTemplate::new(
                Dimension::Reconnaissance,
                "Initial analysis",
                "lead_analyst",
                "Run an initial analysis of the target: {target}. Determine the main \
                 platforms of presence, key identifiers (e-mail, username) and an initial \
                 profile; prioritize directions for deeper analysis. Delegate sub-tasks \
                 when useful.",
                "Platforms found, identifiers found, a short profile and priority \
                 directions for further analysis.",
            )
            .with_queries(["{target}", "\"{target}\" profile"]),
            StageTemplate::new(
                Dimension::Social,
                "Social media analysis",
                "social_expert",
                "Building on the initial analysis, investigate the social networks of \
                 {target}: linked profiles, contacts, activity history and behavioral \
                 patterns.",
                "Profiles found with links; main contacts; key activity moments; \
                 behavioral patterns.",
            )
            .with_queries(["\"{target}\" social profile", "\"{target}\" vk OR telegram OR instagram"]),
            StageTemplate::new(
                Dimension::Technical,
                "Technical analysis",
                "technical_analyst",
                "Run a technical analysis of the data found about {target}: data leaks, \
                 related domains and IPs, technical metadata, digital footprints.",
                "Leaks found, related technical identifiers, metadata analysis and a map \
                 of digital footprints.",
            )
            .with_queries(["\"{target}\" leak", "\"{target}\" whois OR domain"]),
            StageTemplate::new(
                Dimension::Behavioral,
                "Behavioral analysis",
                "behavior_analyst",
                "Using the collected data, analyze the behavior of {target}: main \
                 interests, behavioral patterns, social links and a psychological profile.",
                "Interest map, behavioral patterns, social link scheme and a psychological \
                 profile.",
            )
            .with_queries(["\"{target}\" interests", "\"{target}\" comments"]),
            StageTemplate::new(
                Dimension::Synthesis,
                "Synthesis",
                "lead_analyst",
                "Analyze everything collected about {target}: merge the findings of all \
                 workers, identify data gaps, plan additional directions and compile a \
                 detailed profile.",
                "Full profile, identified data gaps, further investigation plan, main \
                 conclusions.",
            )
            .with_queries(["\"{target}\""]),
            StageTemplate::new(
                Dimension::DeepSearch,
                "Deep search",
                "deep_search_expert",
                "Run a deep search for {target}: archives and historical records, \
                 specialized databases, non-obvious links and mentions, rare sources.",
                "Archive data found, specialized database results, non-obvious links, \
                 information from rare sources.",
            )
            .with_queries(["\"{target}\" archive", "\"{target}\" site:web.archive.org"]),
            StageTemplate::new(
                Dimension::Verification,
                "Verification",
                "verification_expert",
                "Verify all information collected about {target}: cross-reference the \
                 data, confirm it from multiple sources, expose possible disinformation \
                 and rate each source.",
                "Confirmed data with sources, refuted information, data needing more \
                 checks, source reliability ratings.",
            )
            .with_queries(["\"{target}\""]),
        ];

        Ok(Self {
            kind: ProfileKind::Osint,
            model: ExecutionModel::Hierarchical,
            roster,
            templates,
            report: ReportSettings {
                header: "OSINT Investigation Report".to_string(),
                file_prefix: "investigation".to_string(),
            },
            search: SearchDefaults {
                result_limit: 10,
                country: Some("ru".to_string()),
                locale: Some("ru".to_string()),
            },
            memory_default: false,
            planning_default: true,
        })
    }

    /// Number of investigative dimensions this profile plans.
    pub fn dimension_count(&self) -> usize {
        self.templates.len()
    }

    /// Search options with configured values taking precedence over profile defaults.
    pub fn search_options(&self, config: &SearchConfig) -> SearchOptions {
        SearchOptions {
            limit: config.result_limit.unwrap_or(self.search.result_limit),
            country: config.country.clone().or_else(|| self.search.country.clone()),
            locale: config.locale.clone().or_else(|| self.search.locale.clone()),
        }
    }

    /// Normalize raw operator input into the target string.
    ///
    /// The OSINT program strips a pasted prompt label; the darknet program
    /// only trims whitespace.
    pub fn normalize_target(&self, raw: &str) -> String {
        match self.kind {
            ProfileKind::Osint => TargetQuery::parse(raw).target,
            ProfileKind::Darknet => TargetQuery::raw(raw).target,
        }
    }

    /// Whether cross-run memory is used, given an optional override.
    pub fn memory_enabled(&self, configured: Option<bool>) -> bool {
        configured.unwrap_or(self.memory_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darknet_profile_shape() {
        let profile = Profile::darknet().unwrap();
        assert_eq!(profile.model, ExecutionModel::Sequential);
        assert_eq!(profile.dimension_count(), 5);
        assert!(profile.templates.iter().all(|t| t.human_checkpoint));
        assert!(profile.roster.manager().is_none());
        assert!(profile.memory_default);
    }

    #[test]
    fn test_osint_profile_shape() {
        let profile = Profile::osint().unwrap();
        assert_eq!(profile.model, ExecutionModel::Hierarchical);
        assert_eq!(profile.dimension_count(), 7);
        assert!(profile.templates.iter().all(|t| !t.human_checkpoint));
        assert_eq!(profile.roster.len(), 8);
        assert_eq!(
            profile.roster.manager().map(|m| m.id.as_str()),
            Some("osint_manager")
        );
    }

    #[test]
    fn test_templates_reference_roster_workers() {
        for kind in [ProfileKind::Darknet, ProfileKind::Osint] {
            let profile = Profile::builtin(kind).unwrap();
            for template in &profile.templates {
                assert!(
                    profile.roster.contains(&template.worker),
                    "{kind}: {} not in roster",
                    template.worker
                );
                assert!(template.description.contains("{target}"));
            }
        }
    }

    #[test]
    fn test_search_options_prefer_configuration() {
        let profile = Profile::osint().unwrap();

        let defaults = profile.search_options(&SearchConfig::default());
        assert_eq!(defaults.limit, 10);
        assert_eq!(defaults.country.as_deref(), Some("ru"));

        let configured = SearchConfig {
            result_limit: Some(3),
            country: Some("de".to_string()),
            ..Default::default()
        };
        let options = profile.search_options(&configured);
        assert_eq!(options.limit, 3);
        assert_eq!(options.country.as_deref(), Some("de"));
        assert_eq!(options.locale.as_deref(), Some("ru"));
    }

    #[test]
    fn test_memory_default_can_be_overridden() {
        let darknet = Profile::darknet().unwrap();
        assert!(darknet.memory_enabled(None));
        assert!(!darknet.memory_enabled(Some(false)));
        assert!(Profile::osint().unwrap().memory_enabled(Some(true)));
    }

    #[test]
    fn test_profile_kind_parsing() {
        assert_eq!("DARKNET".parse::<ProfileKind>().unwrap(), ProfileKind::Darknet);
        assert_eq!("osint".parse::<ProfileKind>().unwrap(), ProfileKind::Osint);
        let err = "other".parse::<ProfileKind>().unwrap_err();
        assert!(err.to_string().contains("Unknown profile: other"));
    }
}
