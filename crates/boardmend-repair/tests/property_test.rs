mod common;

use std::collections::BTreeSet;

use boardmend_core::constants::MAX_SUBJECT_WORD_LEN;
use boardmend_repair::catalog::fixes::subject_words;
use boardmend_repair::engine::cursor::windows;
use common::{count, forum_db, unbounded_config, Harness, HEALTHY_FORUM};
use proptest::prelude::*;

proptest! {
    #[test]
    fn windows_cover_every_id_exactly_once(step in 1i64..700, max in 0i64..5_000) {
        let mut covered = 0i64;
        let mut next_low = 1;
        for window in windows(step, max) {
            prop_assert_eq!(window.low, next_low);
            prop_assert_eq!(window.high - window.low + 1, step);
            covered += window.high.min(max) - window.low + 1;
            next_low = window.high + 1;
        }
        prop_assert_eq!(covered, max);
        prop_assert!(next_low > max);
    }

    #[test]
    fn subject_words_are_short_lowercase_and_unique(subject in "[a-zA-Z0-9 ,.!?:-]{0,120}") {
        let words = subject_words(&subject);
        let unique: BTreeSet<_> = words.iter().collect();
        prop_assert_eq!(unique.len(), words.len());
        for word in &words {
            prop_assert!(!word.is_empty());
            prop_assert!(word.chars().count() <= MAX_SUBJECT_WORD_LEN);
            prop_assert!(word.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn orphan_messages_are_always_rehomed(
        orphans in prop::collection::btree_map(4i64..1_500, 100i64..106, 1..40)
    ) {
        let mut seed = HEALTHY_FORUM.to_string();
        for (id_msg, id_topic) in &orphans {
            seed.push_str(&format!(
                "INSERT INTO messages (id_msg, id_topic, id_board, id_member, subject)
                 VALUES ({id_msg}, {id_topic}, 1, 1, 'Lost post');"
            ));
        }
        let conn = forum_db(&seed);
        let harness = Harness::new(&conn, unbounded_config());

        let (broken, _) = harness.detect();
        prop_assert!(broken.contains(&"missing_topics".to_string()));

        harness.fix();
        let (broken, messages) = harness.detect();
        prop_assert!(broken.is_empty(), "still broken: {:?} {:?}", broken, messages);

        let total = 3 + orphans.len() as i64;
        prop_assert_eq!(count(&conn, "SELECT COUNT(*) FROM messages"), total);
        prop_assert_eq!(
            count(&conn, "SELECT COUNT(*) FROM messages AS m JOIN topics AS t ON t.id_topic = m.id_topic"),
            total
        );
    }
}

#[test]
fn subject_words_split_on_punctuation() {
    assert_eq!(subject_words("Re: Hello, WORLD! hello"), vec!["re", "hello", "world"]);
    assert_eq!(subject_words("Ünïcode naïve"), vec!["ünïcode", "naïve"]);
    assert!(subject_words("--- !!! ---").is_empty());

    let long = "a".repeat(MAX_SUBJECT_WORD_LEN + 5);
    assert_eq!(subject_words(&long), vec!["a".repeat(MAX_SUBJECT_WORD_LEN)]);
}
