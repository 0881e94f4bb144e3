//! Row, localizer and session store tests.

use boardmend_core::traits::{Localizer, MemorySessionStore, SessionStore};
use boardmend_core::types::{Row, RuleId, SqlValue};

#[test]
fn row_reads_integers_and_nulls() {
    let row = Row::from_pairs([
        ("id_topic", SqlValue::Integer(42)),
        ("id_board", SqlValue::Null),
        ("subject", SqlValue::Text("Hello".to_string())),
    ]);
    assert_eq!(row.get_i64("id_topic").unwrap(), 42);
    assert_eq!(row.get_i64("id_board").unwrap(), 0);
    assert_eq!(row.get_text("subject").unwrap(), "Hello");
    assert!(row.get_i64("missing").is_err());
    assert!(row.get_i64("subject").is_err());
}

#[test]
fn row_display_for_messages() {
    let row = Row::from_pairs([("id_msg", SqlValue::Integer(7))]);
    assert_eq!(row.display("id_msg"), "7");
    assert_eq!(row.display("nope"), "0");
}

struct Fixed;

impl Localizer for Fixed {
    fn text(&self, key: &str) -> Option<&str> {
        match key {
            "pair" => Some("Message #{} is in topic #{}."),
            _ => None,
        }
    }
}

#[test]
fn render_fills_placeholders_in_order() {
    assert_eq!(Fixed.render("pair", &[&3, &42]), "Message #3 is in topic #42.");
}

#[test]
fn render_unknown_key_falls_back_to_key() {
    assert_eq!(Fixed.render("repair_unknown", &[&1]), "repair_unknown");
}

#[test]
fn render_with_missing_args_keeps_placeholder() {
    assert_eq!(Fixed.render("pair", &[&3]), "Message #3 is in topic #{}.");
}

#[test]
fn memory_session_store_get_set_clear() {
    let store = MemorySessionStore::new();
    assert_eq!(store.get("k").unwrap(), None);
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    store.clear("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn rule_id_compares_with_str() {
    let id = RuleId::from("missing_topics");
    assert_eq!(id, "missing_topics");
    assert_eq!(id.to_string(), "missing_topics");
}
