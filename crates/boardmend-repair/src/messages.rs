//! English message catalog.

use boardmend_core::traits::Localizer;
use rustc_hash::FxHashMap;

const ENGLISH: &[(&str, &str)] = &[
    ("repair_zero_ids", "Some topics or messages have an id of 0."),
    ("repair_missing_topics", "Message #{} is in non-existent topic #{}."),
    ("repair_missing_messages", "Topic #{} contains no (actual) messages."),
    ("repair_poll_options_missing_poll", "Poll #{} has {} option(s) but the poll itself is missing."),
    ("repair_polls_missing_topics", "Poll #{} is not attached to any topic."),
    ("repair_stats_topics_1", "Topic #{} has the first message id {} set incorrectly."),
    ("repair_stats_topics_2", "Topic #{} has the last message id {} set incorrectly."),
    ("repair_stats_topics_3", "Topic #{} has the wrong number of replies, {}."),
    ("repair_stats_topics_4", "Topic #{} has the wrong number of unapproved posts, {}."),
    ("repair_missing_boards", "Topic #{} is in board #{}, which is missing."),
    ("repair_missing_categories", "Board #{} is in category #{}, which is missing."),
    ("repair_missing_posters", "Message #{} was posted by member #{}, who is now missing."),
    ("repair_missing_parents", "Board #{} is a child of board #{}, which is missing."),
    ("repair_missing_polls", "Topic #{} is tied to non-existent poll #{}."),
    ("repair_missing_calendar_topics", "Event #{} is tied to topic #{}, which is missing."),
    ("repair_missing_log_topics", "Topic #{} is marked as read for one or more people, but does not exist."),
    ("repair_missing_log_topics_members", "Member #{} has marked one or more topics as read, but does not exist."),
    ("repair_missing_log_boards", "Board #{} is marked as read for one or more people, but does not exist."),
    ("repair_missing_log_boards_members", "Member #{} has marked one or more boards as read, but does not exist."),
    ("repair_missing_log_mark_read", "Board #{} is marked as read for one or more people, but does not exist."),
    ("repair_missing_log_mark_read_members", "Member #{} has marked one or more boards as read, but does not exist."),
    ("repair_missing_pms", "Personal message #{} has been sent to one or more people, but does not exist."),
    ("repair_missing_recipients", "Member #{} has received one or more personal messages, but does not exist."),
    ("repair_missing_senders", "Personal message #{} was sent by member #{}, who does not exist."),
    ("repair_missing_notify_members", "Notifications have been requested by member #{} who does not exist."),
    ("repair_missing_cached_subject", "The subject of one or more topics is missing from the subject cache."),
    ("repair_missing_topic_for_cache", "Cached word linked to topic #{}, which does not exist."),
    ("repair_missing_member_vote", "Member #{} has voted in a poll, but does not exist."),
    ("repair_missing_log_poll_vote", "A vote was cast on poll #{}, which does not exist."),
    ("repair_report_missing_comments", "Report #{} of topic \"{}\" has no comments."),
    ("repair_comments_missing_report", "Report comment #{} was submitted for report #{}, which does not exist."),
    ("repair_group_request_missing_member", "Group request #{} is from member #{}, who does not exist."),
    ("repair_group_request_missing_group", "Group request #{} is for group #{}, which does not exist."),
    ("salvaged_category_name", "Salvage Area"),
    ("salvaged_board_name", "Salvaged Topics"),
    ("salvaged_board_description", "Topics created for messages with non-existent topics"),
    ("salvaged_board_recreated", "Recovered board #{}"),
    ("salvaged_poll_topic_name", "Salvaged Poll"),
    ("salvaged_poll_message_body", "This poll was found without a topic."),
    ("salvaged_poll_question", "This poll was found without a question."),
    ("guest_name", "Guest"),
];

/// Built-in English templates.
#[derive(Debug, Clone)]
pub struct EnglishMessages {
    templates: FxHashMap<&'static str, &'static str>,
}

impl EnglishMessages {
    pub fn new() -> Self {
        Self {
            templates: ENGLISH.iter().copied().collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.templates.keys().copied()
    }
}

impl Default for EnglishMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer for EnglishMessages {
    fn text(&self, key: &str) -> Option<&str> {
        self.templates.get(key).copied()
    }
}
