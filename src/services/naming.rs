//! Naming convention shared by agents and knowledge bases.
//!
//! An agent is named `"<brand> - <domain>"`. Its knowledge bases are named
//! `"<slug>-<suffix>"` where the slug is derived from the domain and the
//! suffix is one of [`KbSourceKind`]. Names are the only join key between
//! an agent and KBs the platform no longer reports as attached.

use serde::Serialize;

use crate::domain::models::KbSourceKind;

/// Separator between brand and domain in agent names.
const AGENT_NAME_SEPARATOR: &str = " - ";

/// Lower-case `domain` and replace every character outside `[a-z0-9]` with `-`.
///
/// Runs of separators are not collapsed: `"Acme, Inc."` becomes `"acme--inc-"`.
/// Replacement is per `char`, so a multi-byte character such as `é` yields a
/// single `-` and the slug keeps the input's character count.
pub fn derive_domain_slug(domain: &str) -> String {
    domain
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

/// The three knowledge base names expected for a domain slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedKbNames {
    pub crawl: String,
    pub uploads: String,
    pub structured: String,
}

impl ExpectedKbNames {
    pub fn name_for(&self, kind: KbSourceKind) -> &str {
        match kind {
            KbSourceKind::Crawl => &self.crawl,
            KbSourceKind::Uploads => &self.uploads,
            KbSourceKind::Structured => &self.structured,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.crawl.as_str(),
            self.uploads.as_str(),
            self.structured.as_str(),
        ]
        .into_iter()
    }
}

/// Compute `"<slug>-crawl"`, `"<slug>-uploads"` and `"<slug>-structured"`.
pub fn expected_kb_names(slug: &str) -> ExpectedKbNames {
    ExpectedKbNames {
        crawl: kb_name(slug, KbSourceKind::Crawl),
        uploads: kb_name(slug, KbSourceKind::Uploads),
        structured: kb_name(slug, KbSourceKind::Structured),
    }
}

pub fn kb_name(slug: &str, kind: KbSourceKind) -> String {
    format!("{slug}-{}", kind.suffix())
}

/// Split a knowledge base name into `(slug, kind)`.
///
/// Returns `None` for names that do not end in a known suffix.
pub fn parse_kb_name(name: &str) -> Option<(&str, KbSourceKind)> {
    let (slug, suffix) = name.rsplit_once('-')?;
    let kind = suffix.parse().ok()?;
    (!slug.is_empty()).then_some((slug, kind))
}

/// Resolves agent names for a fixed brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingResolver {
    brand: String,
}

impl NamingResolver {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Canonical display name for the agent serving `domain`.
    pub fn agent_display_name(&self, domain: &str) -> String {
        format!("{}{AGENT_NAME_SEPARATOR}{}", self.brand, domain.trim())
    }

    /// Parse `"<brand> - <domain>"` and return the domain.
    ///
    /// `None` means the agent cannot be reconciled by name; that is not an error.
    pub fn extract_domain(&self, agent_name: &str) -> Option<String> {
        let domain = agent_name
            .strip_prefix(self.brand.as_str())?
            .strip_prefix(AGENT_NAME_SEPARATOR)?
            .trim();
        (!domain.is_empty()).then(|| domain.to_string())
    }

    /// Expected knowledge base names for an agent, if its name carries a domain.
    pub fn expected_names_for_agent(&self, agent_name: &str) -> Option<ExpectedKbNames> {
        self.extract_domain(agent_name)
            .map(|domain| expected_kb_names(&derive_domain_slug(&domain)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_for_plain_domain() {
        assert_eq!(derive_domain_slug("acme.com"), "acme-com");
        assert_eq!(derive_domain_slug("Docs.Example.IO"), "docs-example-io");
    }

    #[test]
    fn test_slug_does_not_collapse_separators() {
        assert_eq!(derive_domain_slug("Acme, Inc."), "acme--inc-");
    }

    #[test]
    fn test_slug_replaces_multibyte_char_once() {
        assert_eq!(derive_domain_slug("café.fr"), "caf--fr");
    }

    #[test]
    fn test_expected_names() {
        let names = expected_kb_names("acme-com");
        assert_eq!(
            names.iter().collect::<Vec<_>>(),
            vec!["acme-com-crawl", "acme-com-uploads", "acme-com-structured"]
        );
        assert!(names.contains("acme-com-uploads"));
        assert!(!names.contains("acme-com-docs"));
        assert_eq!(names.name_for(KbSourceKind::Structured), "acme-com-structured");
    }

    #[test]
    fn test_parse_kb_name() {
        assert_eq!(
            parse_kb_name("acme-com-crawl"),
            Some(("acme-com", KbSourceKind::Crawl))
        );
        assert_eq!(parse_kb_name("acme-com-docs"), None);
        assert_eq!(parse_kb_name("-crawl"), None);
        assert_eq!(parse_kb_name("crawl"), None);
    }

    #[test]
    fn test_extract_domain() {
        let resolver = NamingResolver::new("Support Agent");
        assert_eq!(
            resolver.extract_domain("Support Agent - acme.com"),
            Some("acme.com".to_string())
        );
        assert_eq!(resolver.extract_domain("Support Agent - "), None);
        assert_eq!(resolver.extract_domain("Other Brand - acme.com"), None);
        assert_eq!(resolver.extract_domain("my-agent"), None);
    }

    #[test]
    fn test_display_name_round_trips() {
        let resolver = NamingResolver::new("Support Agent");
        let name = resolver.agent_display_name("acme.com");
        assert_eq!(name, "Support Agent - acme.com");
        assert_eq!(resolver.extract_domain(&name).as_deref(), Some("acme.com"));
    }
}
