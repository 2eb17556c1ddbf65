//! Property tests for domain slugs and knowledge base naming.

mod common;

use agentkb::services::naming::parse_kb_name;
use agentkb::{derive_domain_slug, expected_kb_names, KbSourceKind, NamingResolver, OrphanReconciler};
use proptest::prelude::*;

use common::{agent, knowledge_base, platform};

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

proptest! {
    #[test]
    fn expected_names_are_three_slug_safe_names(domain in "\\PC{0,40}") {
        let names = expected_kb_names(&derive_domain_slug(&domain));
        let all: Vec<&str> = names.iter().collect();

        prop_assert_eq!(all.len(), 3);
        for name in &all {
            prop_assert!(name.chars().all(is_slug_char), "unexpected char in {}", name);
        }
        prop_assert_eq!(expected_kb_names(&derive_domain_slug(&domain)), names.clone());
    }

    #[test]
    fn slug_preserves_char_count(domain in "\\PC{0,40}") {
        prop_assert_eq!(derive_domain_slug(&domain).chars().count(), domain.chars().count());
    }

    #[test]
    fn kb_names_parse_back(domain in "[a-zA-Z0-9.-]{1,30}") {
        let slug = derive_domain_slug(&domain);
        for kind in KbSourceKind::ALL {
            let name = expected_kb_names(&slug).name_for(kind).to_string();
            prop_assert_eq!(parse_kb_name(&name), Some((slug.as_str(), kind)));
        }
    }

    #[test]
    fn display_name_round_trips(domain in "[a-z0-9][a-z0-9.-]{0,30}") {
        let naming = NamingResolver::new("Support Agent");
        let display = naming.agent_display_name(&domain);
        prop_assert_eq!(naming.extract_domain(&display), Some(domain));
    }

    #[test]
    fn unbranded_names_are_never_reconciled(name in "[A-Za-z ]{0,30}") {
        prop_assume!(!name.starts_with("Support Agent"));
        let (mock, shared) = platform();
        let reconciler = OrphanReconciler::new(shared, NamingResolver::new("Support Agent"));

        let orphans = tokio_test::block_on(reconciler.find_orphaned_kbs(&agent("a-1", &name, &[])))
            .unwrap();

        prop_assert!(orphans.is_empty());
        prop_assert_eq!(tokio_test::block_on(mock.total_calls()), 0);
    }
}

#[test]
fn test_acme_com_scenario() {
    let slug = derive_domain_slug("acme.com");
    assert_eq!(slug, "acme-com");
    let expected = expected_kb_names(&slug);
    let names: Vec<&str> = expected.iter().collect();
    assert_eq!(
        names,
        vec!["acme-com-crawl", "acme-com-uploads", "acme-com-structured"]
    );
}

#[test]
fn test_punctuation_collapses_per_character() {
    assert_eq!(derive_domain_slug("Acme, Inc."), "acme--inc-");
}

#[tokio::test]
async fn test_duplicate_names_all_returned() {
    let (mock, shared) = platform();
    mock.add_knowledge_base(knowledge_base("kb-1", "acme-com-crawl", 1, None))
        .await;
    mock.add_knowledge_base(knowledge_base("kb-2", "acme-com-crawl", 1, None))
        .await;
    let reconciler = OrphanReconciler::new(shared, NamingResolver::new("Support Agent"));

    let orphans = reconciler
        .find_orphaned_kbs(&agent("a-1", "Support Agent - acme.com", &[]))
        .await
        .unwrap();

    assert_eq!(orphans.len(), 2);
}
