//! Catalog construction and validation.

use boardmend_core::errors::CatalogError;
use boardmend_core::traits::Localizer;
use boardmend_repair::catalog::{
    BulkAction, DetectMode, Detection, MessageSpec, RangePlan, Remediation, Rule, RuleCatalog,
};
use boardmend_repair::EnglishMessages;

fn rule(id: &'static str) -> Rule {
    Rule {
        id,
        detect: Detection {
            query: "SELECT id FROM items WHERE id BETWEEN ?1 AND ?2",
            mode: DetectMode::RowSet,
        },
        range: Some(RangePlan {
            step: 10,
            max_query: "SELECT MAX(id) FROM items",
        }),
        remediation: Remediation::IdCollectThenBulk {
            id_column: "id",
            action: BulkAction::Sql("DELETE FROM items WHERE id IN ({ids})"),
        },
        forces: &[],
        message: MessageSpec::PerRow {
            key: "item",
            columns: &["id"],
        },
    }
}

#[test]
fn forum_catalog_builds_in_order() {
    let catalog = RuleCatalog::forum().unwrap();
    assert_eq!(catalog.len(), 33);
    let ids: Vec<_> = catalog.ids().collect();
    assert_eq!(ids[0], "zero_topics");
    assert_eq!(ids[2], "missing_topics");
    assert_eq!(ids[32], "group_request_missing_group");
    assert_eq!(catalog.index_of("stats_topics"), Some(6));
    assert!(catalog.get("no_such_rule").is_none());
}

#[test]
fn forum_catalog_only_forces_forward() {
    let catalog = RuleCatalog::forum().unwrap();
    assert!(catalog.backward_force_edges().is_empty());
}

#[test]
fn every_forum_message_key_has_english_text() {
    let catalog = RuleCatalog::forum().unwrap();
    let english = EnglishMessages::new();
    for rule in catalog.rules() {
        let key = match rule.message {
            MessageSpec::Static(key) | MessageSpec::PerRow { key, .. } => key,
            MessageSpec::Predicate(_) => continue,
        };
        assert!(english.text(key).is_some(), "{} uses unknown key {key}", rule.id);
    }
    for key in ["repair_stats_topics_1", "repair_stats_topics_2", "salvaged_category_name"] {
        assert!(english.text(key).is_some(), "missing {key}");
    }
}

#[test]
fn per_row_templates_take_one_argument_per_column() {
    let catalog = RuleCatalog::forum().unwrap();
    let english = EnglishMessages::new();
    for rule in catalog.rules() {
        if let MessageSpec::PerRow { key, columns } = rule.message {
            let template = english.text(key).unwrap();
            assert_eq!(template.matches("{}").count(), columns.len(), "{}", rule.id);
        }
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = RuleCatalog::new(vec![rule("a"), rule("a")]).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateRule { ref id } if id == "a"));
}

#[test]
fn unknown_forced_rule_is_rejected() {
    let mut bad = rule("a");
    bad.forces = &["ghost"];
    let err = RuleCatalog::new(vec![bad]).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownForcedRule { ref forced, .. } if forced == "ghost"));
}

#[test]
fn zero_step_is_rejected() {
    let mut bad = rule("a");
    bad.range = Some(RangePlan {
        step: 0,
        max_query: "SELECT 1",
    });
    assert!(matches!(
        RuleCatalog::new(vec![bad]),
        Err(CatalogError::ZeroStep { .. })
    ));
}

#[test]
fn bulk_template_needs_ids_placeholder() {
    let mut bad = rule("a");
    bad.remediation = Remediation::IdCollectThenBulk {
        id_column: "id",
        action: BulkAction::Sql("DELETE FROM items"),
    };
    assert!(matches!(
        RuleCatalog::new(vec![bad]),
        Err(CatalogError::MissingIdsPlaceholder { .. })
    ));
}

#[test]
fn count_detection_cannot_feed_id_collection() {
    let mut bad = rule("a");
    bad.detect.mode = DetectMode::Count;
    bad.message = MessageSpec::Static("item");
    assert!(matches!(
        RuleCatalog::new(vec![bad]),
        Err(CatalogError::Inconsistent { .. })
    ));
}

#[test]
fn backward_force_edges_are_reported_not_rejected() {
    let first = rule("first");
    let mut second = rule("second");
    second.forces = &["first"];
    let catalog = RuleCatalog::new(vec![first, second]).unwrap();
    assert_eq!(catalog.backward_force_edges(), vec![("second", "first")]);
}
