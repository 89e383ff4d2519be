//! Integration tests for casebook.

#![allow(clippy::expect_used)]

use casebook::{DirCollection, DocumentStore, StoreConfig};
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;

static TRACING: Once = Once::new();

/// Routes store logs through the test harness.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

fn write_study(dir: &Path, key: &str, title: &str, body: &str) {
    let text = format!("---\ntitle: {title}\nauthor: Dana\ntags: [infra]\n---\n{body}");
    fs::write(dir.join(format!("{key}.md")), text).expect("Failed to write study");
}

/// Helper to create a content directory with three studies.
fn create_test_content() -> TempDir {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_study(
        dir.path(),
        "beta-bank",
        "Beta Bank",
        "Migrating a ledger.\n## Challenge\nLegacy core\n## Notes\nThanks to the ops team\n",
    );
    write_study(
        dir.path(),
        "acme-retail",
        "Acme Retail",
        "## Challenge\nSlow checkout\n## Solution\nCaching\n## Results\n3x faster\n",
    );
    write_study(dir.path(), "gamma-health", "Gamma Health", "Short study.");
    fs::write(dir.path().join("draft.txt"), "not a study").expect("Failed to write draft");
    dir
}

fn store_for(dir: &TempDir) -> DocumentStore<DirCollection> {
    DocumentStore::from_config(&StoreConfig::new().content_dir(dir.path()))
}

mod store_tests {
    use super::*;

    #[test]
    fn test_listing_in_key_order() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let keys: Vec<String> = store
            .get_all(true)
            .iter()
            .map(|d| d.key.clone())
            .collect();
        assert_eq!(keys, vec!["acme-retail", "beta-bank", "gamma-health"]);
    }

    #[test]
    fn test_metadata_from_front_matter() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let doc = store.get_by_key("beta-bank", true).expect("document should exist");
        assert_eq!(doc.title, "Beta Bank");
        assert_eq!(doc.meta.author.as_deref(), Some("Dana"));
        assert_eq!(doc.meta.tags, vec!["infra"]);
        assert!(doc.body.starts_with("Migrating a ledger."));
    }

    #[test]
    fn test_edit_visible_after_invalidate() {
        let dir = create_test_content();
        let store = store_for(&dir);
        assert_eq!(store.get_all(true).len(), 3);

        write_study(dir.path(), "delta-energy", "Delta Energy", "New.");
        assert_eq!(store.get_all(true).len(), 3);

        store.invalidate();
        assert_eq!(store.get_all(true).len(), 4);
    }

    #[test]
    fn test_adjacent_navigation() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let adjacent = store.get_adjacent("beta-bank");
        assert_eq!(
            adjacent.prev.map(|d| d.key.clone()).as_deref(),
            Some("acme-retail")
        );
        assert_eq!(
            adjacent.next.map(|d| d.key.clone()).as_deref(),
            Some("gamma-health")
        );
        assert!(store.get_adjacent("unknown").next.is_none());
    }

    #[test]
    fn test_missing_and_hostile_keys() {
        let dir = create_test_content();
        let store = store_for(&dir);
        store.get_all(true);

        assert!(store.get_by_key("missing", true).is_none());
        assert!(store.get_by_key("../beta-bank", true).is_none());
        assert!(store.get_by_key("draft", true).is_none());
        assert!(store.is_fresh());
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = create_test_content();
        fs::write(dir.path().join("broken.md"), "---\ntitle: Broken\nno closing fence")
            .expect("Failed to write broken study");
        let store = store_for(&dir);

        assert_eq!(store.get_all(true).len(), 3);
        assert!(store.try_get_by_key("broken", true).is_err());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        init_tracing();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = DocumentStore::from_config(
            &StoreConfig::new().content_dir(dir.path().join("absent")),
        );

        assert!(store.get_all(true).is_empty());
        assert!(store.feed_entries().is_empty());
        assert!(store.get_by_key("anything", true).is_none());
    }
}

mod sectioning_tests {
    use super::*;
    use casebook::{SectionKind, split_sections};

    #[test]
    fn test_render_flow() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let doc = store.get_by_key("beta-bank", true).expect("document should exist");
        let outline = split_sections(doc.body.as_str()).expect("body has content");

        assert_eq!(outline.sections[0].kind, SectionKind::Intro);
        assert_eq!(outline.sections[0].content, "Migrating a ledger.");
        assert_eq!(outline.headings().collect::<Vec<_>>(), vec!["Challenge"]);
        let notes = outline.notes.expect("notes should be extracted");
        assert_eq!(notes.content, "Thanks to the ops team");
    }

    #[test]
    fn test_no_intro_when_body_opens_with_heading() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let doc = store.get_by_key("acme-retail", true).expect("document should exist");
        let outline = split_sections(doc.body.as_str()).expect("body has content");

        assert!(outline.sections.iter().all(|s| s.kind == SectionKind::Section));
        assert_eq!(
            outline.headings().collect::<Vec<_>>(),
            vec!["Challenge", "Solution", "Results"]
        );
        assert!(outline.notes.is_none());
    }

    #[test]
    fn test_body_without_headings() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let doc = store.get_by_key("gamma-health", true).expect("document should exist");
        let outline = split_sections(doc.body.as_str()).expect("body has content");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.sections[0].content, "Short study.");
    }
}

mod feed_tests {
    use super::*;
    use casebook::collection::Collection;

    #[test]
    fn test_feed_matches_listing() {
        let dir = create_test_content();
        let store = store_for(&dir);

        let entries = store.feed_entries();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["acme-retail", "beta-bank", "gamma-health"]);

        for entry in &entries {
            assert_eq!(entry.lastmod().len(), 10);
            let modified = store
                .collection()
                .modified(&entry.key)
                .expect("modified failed")
                .expect("file should exist");
            assert_eq!(entry.last_modified, chrono::DateTime::<chrono::Utc>::from(modified));
        }
    }
}

mod control_tests {
    use super::*;
    use casebook::invalidate_cache;

    #[test]
    fn test_invalidate_endpoint() {
        let dir = create_test_content();
        let store = store_for(&dir);
        store.get_all(true);

        let response = invalidate_cache(&store);
        assert!(response.success);
        assert_eq!(response.message, "Cache invalidated successfully");
        assert!(!store.is_fresh());
    }
}

mod property_tests {
    use casebook::{SectionKind, split_sections};
    use proptest::prelude::*;

    fn body_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-zA-Z ]{0,20}",
                "## [a-zA-Z ]{0,12}",
                Just("## Notes".to_string()),
                Just("### Detail".to_string()),
            ],
            0..12,
        )
        .prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn sectioning_is_deterministic(body in body_strategy()) {
            prop_assert_eq!(split_sections(body.as_str()), split_sections(body.as_str()));
        }

        #[test]
        fn sectioning_preserves_heading_order(body in body_strategy()) {
            let expected: Vec<String> = body
                .lines()
                .filter_map(|line| line.strip_prefix("## "))
                .map(|title| match title.trim() {
                    "" => "Untitled Section".to_string(),
                    t => t.to_string(),
                })
                .filter(|title| !title.to_lowercase().contains("notes"))
                .collect();

            if let Some(outline) = split_sections(body.as_str()) {
                let headings: Vec<String> = outline.headings().map(ToString::to_string).collect();
                prop_assert_eq!(headings, expected);
                prop_assert!(outline.sections.iter().skip(1).all(|s| s.kind == SectionKind::Section));
            } else {
                prop_assert!(body.trim().is_empty());
            }
        }

        #[test]
        fn blank_bodies_have_no_content(body in "[ \t\n]{0,20}") {
            prop_assert!(split_sections(body.as_str()).is_none());
        }
    }
}
