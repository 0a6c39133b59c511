//! Investigation target parsing and surface-trait detection.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label an operator may paste along with the target from the interactive prompt.
pub const PROMPT_LABEL: &str = "Enter target for OSINT:";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9-]+\.)+(?:com|net|org|ru|su|io|info|biz|me|co|onion)\b")
        .expect("valid domain regex")
});

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid ipv4 regex")
});

static CRYPTO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:[13][a-km-zA-HJ-NP-Z1-9]{25,34}|bc1[a-z0-9]{25,59}|0x[a-fA-F0-9]{40}|4[0-9AB][1-9A-HJ-NP-Za-km-z]{93})\b",
    )
    .expect("valid wallet regex")
});

static HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)@?[A-Za-z0-9_.]{3,}(?:\s|$)").expect("valid handle regex"));

/// Normalized free-text target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetQuery {
    pub target: String,
}

impl TargetQuery {
    /// Strip a pasted prompt label and surrounding whitespace.
    ///
    /// Everything else is kept verbatim; an empty target is accepted.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let target = trimmed
            .strip_prefix(PROMPT_LABEL)
            .map_or(trimmed, str::trim)
            .to_string();
        Self { target }
    }

    /// Trim only, keeping any label.
    pub fn raw(raw: &str) -> Self {
        Self {
            target: raw.trim().to_string(),
        }
    }

    pub fn traits(&self) -> TargetTraits {
        TargetTraits::detect(&self.target)
    }
}

/// Surface characteristics of a target, used by the planning pre-pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTraits {
    pub has_email: bool,
    pub has_domain: bool,
    pub has_ip: bool,
    pub has_crypto_address: bool,
    pub has_handle: bool,
}

impl TargetTraits {
    pub fn detect(target: &str) -> Self {
        Self {
            has_email: EMAIL.is_match(target),
            has_domain: DOMAIN.is_match(target),
            has_ip: IPV4.is_match(target),
            has_crypto_address: CRYPTO.is_match(target),
            has_handle: HANDLE.is_match(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_prompt_label() {
        let q = TargetQuery::parse("Enter target for OSINT:   john_doe 1990 ");
        assert_eq!(q.target, "john_doe 1990");

        let q = TargetQuery::parse("  plain target ");
        assert_eq!(q.target, "plain target");

        assert_eq!(TargetQuery::parse("").target, "");
    }

    #[test]
    fn test_raw_keeps_label() {
        let q = TargetQuery::raw(" Enter target for OSINT: x ");
        assert_eq!(q.target, "Enter target for OSINT: x");
    }

    #[test]
    fn test_detect_traits() {
        let t = TargetTraits::detect("contact: john@example.com");
        assert!(t.has_email);
        assert!(t.has_domain);
        assert!(!t.has_crypto_address);

        let t = TargetTraits::detect("wallet 0x52908400098527886E0F7030069857D2E4169EE7");
        assert!(t.has_crypto_address);

        let t = TargetTraits::detect("seen at 192.168.10.4");
        assert!(t.has_ip);

        let t = TargetTraits::detect("example_handle_42");
        assert!(t.has_handle);
        assert!(!t.has_domain);
        assert!(!t.has_crypto_address);
    }
}
