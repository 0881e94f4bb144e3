//! The built-in forum rule set, in execution order.
//!
//! Order matters: rules that create or move content run before the rules
//! that recount it, and every force edge points forward.

use super::fixes;
use super::{
    BulkAction, DetectMode, Detection, MessageSpec, RangePlan, Remediation, Rule,
};

const fn rows(query: &'static str) -> Detection {
    Detection {
        query,
        mode: DetectMode::RowSet,
    }
}

const fn count(query: &'static str) -> Detection {
    Detection {
        query,
        mode: DetectMode::Count,
    }
}

const fn range(step: i64, max_query: &'static str) -> Option<RangePlan> {
    Some(RangePlan { step, max_query })
}

const fn per_row(key: &'static str, columns: &'static [&'static str]) -> MessageSpec {
    MessageSpec::PerRow { key, columns }
}

const fn bulk(id_column: &'static str, sql: &'static str) -> Remediation {
    Remediation::IdCollectThenBulk {
        id_column,
        action: BulkAction::Sql(sql),
    }
}

fn row_fix(fix_query: Option<&'static str>, repair: super::RowRepairFn) -> Remediation {
    Remediation::RowCallback { fix_query, repair }
}

const MAX_TOPIC: &str = "SELECT MAX(id_topic) FROM topics";
const MAX_MSG: &str = "SELECT MAX(id_msg) FROM messages";

pub fn forum_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "zero_topics",
            detect: count("SELECT COUNT(*) FROM topics WHERE id_topic = 0"),
            range: None,
            remediation: Remediation::BlanketStatement {
                sql: concat!("UPDATE topics SET id_topic = ", unclaimed_topic_id!(), " WHERE id_topic = 0"),
            },
            forces: &["missing_topics", "missing_messages"],
            message: MessageSpec::Static("repair_zero_ids"),
        },
        Rule {
            id: "zero_messages",
            detect: count("SELECT COUNT(*) FROM messages WHERE id_msg = 0"),
            range: None,
            remediation: Remediation::BlanketStatement {
                sql: concat!("UPDATE messages SET id_msg = ", unclaimed_message_id!(), " WHERE id_msg = 0"),
            },
            forces: &["stats_topics"],
            message: MessageSpec::Static("repair_zero_ids"),
        },
        Rule {
            id: "missing_topics",
            detect: rows(
                "SELECT m.id_topic, m.id_msg
                 FROM messages AS m
                     LEFT JOIN topics AS t ON t.id_topic = m.id_topic
                 WHERE t.id_topic IS NULL
                     AND m.id_msg BETWEEN ?1 AND ?2
                 ORDER BY m.id_topic, m.id_msg",
            ),
            range: range(500, MAX_MSG),
            // Aggregates span every message of an orphaned topic, not only
            // the ones inside the window.
            remediation: row_fix(
                Some(
                    "SELECT m.id_topic, MAX(m.id_board) AS id_board,
                         MIN(m.id_msg) AS myid_first_msg,
                         COALESCE(MAX(CASE WHEN m.approved = 1 THEN m.id_msg END), MAX(m.id_msg)) AS myid_last_msg,
                         MAX(SUM(m.approved) - 1, 0) AS my_num_replies,
                         SUM(m.approved = 0) AS my_unapproved_posts
                     FROM messages AS m
                     WHERE m.id_topic IN (
                         SELECT o.id_topic
                         FROM messages AS o
                             LEFT JOIN topics AS t ON t.id_topic = o.id_topic
                         WHERE t.id_topic IS NULL
                             AND o.id_msg BETWEEN ?1 AND ?2)
                     GROUP BY m.id_topic",
                ),
                fixes::synthesize_orphan_topic,
            ),
            forces: &[
                "stats_topics",
                "stats_topics2",
                "stats_topics3",
                "missing_cached_subject",
                "missing_topic_for_cache",
            ],
            message: per_row("repair_missing_topics", &["id_msg", "id_topic"]),
        },
        Rule {
            id: "missing_messages",
            detect: rows(
                "SELECT t.id_topic
                 FROM topics AS t
                     LEFT JOIN messages AS m ON m.id_topic = t.id_topic
                 WHERE m.id_msg IS NULL
                     AND t.id_topic BETWEEN ?1 AND ?2
                 GROUP BY t.id_topic",
            ),
            range: range(500, MAX_TOPIC),
            remediation: bulk("id_topic", "DELETE FROM topics WHERE id_topic IN ({ids})"),
            forces: &[
                "missing_calendar_topics",
                "missing_log_topics",
                "missing_topic_for_cache",
            ],
            message: per_row("repair_missing_messages", &["id_topic"]),
        },
        Rule {
            id: "poll_options_missing_poll",
            detect: rows(
                "SELECT pc.id_poll, COUNT(*) AS amount
                 FROM poll_choices AS pc
                     LEFT JOIN polls AS p ON p.id_poll = pc.id_poll
                 WHERE p.id_poll IS NULL
                     AND pc.id_poll BETWEEN ?1 AND ?2
                 GROUP BY pc.id_poll",
            ),
            range: range(500, "SELECT MAX(id_poll) FROM poll_choices"),
            remediation: row_fix(None, fixes::recreate_salvaged_poll),
            forces: &["polls_missing_topics"],
            message: per_row("repair_poll_options_missing_poll", &["id_poll", "amount"]),
        },
        Rule {
            id: "polls_missing_topics",
            detect: rows(
                "SELECT p.id_poll, p.id_member, p.poster_name
                 FROM polls AS p
                     LEFT JOIN topics AS t ON t.id_poll = p.id_poll
                 WHERE t.id_topic IS NULL
                     AND p.id_poll BETWEEN ?1 AND ?2",
            ),
            range: range(500, "SELECT MAX(id_poll) FROM polls"),
            remediation: row_fix(None, fixes::attach_poll_to_salvage_topic),
            forces: &["stats_topics", "missing_cached_subject"],
            message: per_row("repair_polls_missing_topics", &["id_poll"]),
        },
        Rule {
            id: "stats_topics",
            detect: rows(
                "SELECT t.id_topic, t.id_first_msg, t.id_last_msg,
                     MIN(m.id_msg) AS myid_first_msg,
                     COALESCE(MAX(CASE WHEN m.approved = 1 THEN m.id_msg END), MAX(m.id_msg)) AS myid_last_msg
                 FROM topics AS t
                     JOIN messages AS m ON m.id_topic = t.id_topic
                 WHERE t.id_topic BETWEEN ?1 AND ?2
                 GROUP BY t.id_topic, t.id_first_msg, t.id_last_msg
                 HAVING t.id_first_msg != MIN(m.id_msg)
                     OR t.id_last_msg != COALESCE(MAX(CASE WHEN m.approved = 1 THEN m.id_msg END), MAX(m.id_msg))",
            ),
            range: range(200, MAX_TOPIC),
            remediation: row_fix(None, fixes::fix_topic_message_pointers),
            forces: &[],
            message: MessageSpec::Predicate(fixes::topic_pointer_messages),
        },
        Rule {
            id: "stats_topics2",
            detect: rows(
                "SELECT t.id_topic, t.num_replies,
                     MAX(SUM(m.approved) - 1, 0) AS my_num_replies
                 FROM topics AS t
                     JOIN messages AS m ON m.id_topic = t.id_topic
                 WHERE t.id_topic BETWEEN ?1 AND ?2
                 GROUP BY t.id_topic, t.num_replies
                 HAVING t.num_replies != MAX(SUM(m.approved) - 1, 0)",
            ),
            range: range(200, MAX_TOPIC),
            remediation: row_fix(None, fixes::fix_topic_reply_count),
            forces: &[],
            message: per_row("repair_stats_topics_3", &["id_topic", "num_replies"]),
        },
        Rule {
            id: "stats_topics3",
            detect: rows(
                "SELECT t.id_topic, t.unapproved_posts,
                     SUM(m.approved = 0) AS my_unapproved_posts
                 FROM topics AS t
                     JOIN messages AS m ON m.id_topic = t.id_topic
                 WHERE t.id_topic BETWEEN ?1 AND ?2
                 GROUP BY t.id_topic, t.unapproved_posts
                 HAVING t.unapproved_posts != SUM(m.approved = 0)",
            ),
            range: range(200, MAX_TOPIC),
            remediation: row_fix(None, fixes::fix_topic_unapproved_count),
            forces: &[],
            message: per_row("repair_stats_topics_4", &["id_topic", "unapproved_posts"]),
        },
        Rule {
            id: "missing_boards",
            detect: rows(
                "SELECT t.id_topic, t.id_board
                 FROM topics AS t
                     LEFT JOIN boards AS b ON b.id_board = t.id_board
                 WHERE b.id_board IS NULL
                     AND t.id_topic BETWEEN ?1 AND ?2",
            ),
            range: range(500, MAX_TOPIC),
            remediation: row_fix(
                Some(
                    "SELECT t.id_board, COUNT(*) AS my_num_topics
                     FROM topics AS t
                         LEFT JOIN boards AS b ON b.id_board = t.id_board
                     WHERE b.id_board IS NULL
                         AND t.id_topic BETWEEN ?1 AND ?2
                     GROUP BY t.id_board",
                ),
                fixes::recreate_missing_board,
            ),
            forces: &[],
            message: per_row("repair_missing_boards", &["id_topic", "id_board"]),
        },
        Rule {
            id: "missing_categories",
            detect: rows(
                "SELECT b.id_board, b.id_cat
                 FROM boards AS b
                     LEFT JOIN categories AS c ON c.id_cat = b.id_cat
                 WHERE c.id_cat IS NULL",
            ),
            range: None,
            remediation: Remediation::IdCollectThenBulk {
                id_column: "id_board",
                action: BulkAction::Custom(fixes::move_boards_to_salvage_category),
            },
            forces: &[],
            message: per_row("repair_missing_categories", &["id_board", "id_cat"]),
        },
        Rule {
            id: "missing_posters",
            detect: rows(
                "SELECT m.id_msg, m.id_member
                 FROM messages AS m
                     LEFT JOIN members AS mem ON mem.id_member = m.id_member
                 WHERE mem.id_member IS NULL
                     AND m.id_member != 0
                     AND m.id_msg BETWEEN ?1 AND ?2",
            ),
            range: range(500, MAX_MSG),
            remediation: bulk("id_msg", "UPDATE messages SET id_member = 0 WHERE id_msg IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_posters", &["id_msg", "id_member"]),
        },
        Rule {
            id: "missing_parents",
            detect: rows(
                "SELECT b.id_board, b.id_parent
                 FROM boards AS b
                     LEFT JOIN boards AS p ON p.id_board = b.id_parent
                 WHERE b.id_parent != 0
                     AND p.id_board IS NULL",
            ),
            range: None,
            remediation: Remediation::IdCollectThenBulk {
                id_column: "id_board",
                action: BulkAction::Custom(fixes::reparent_boards_under_salvage),
            },
            forces: &[],
            message: per_row("repair_missing_parents", &["id_board", "id_parent"]),
        },
        Rule {
            id: "missing_polls",
            detect: rows(
                "SELECT t.id_topic, t.id_poll
                 FROM topics AS t
                     LEFT JOIN polls AS p ON p.id_poll = t.id_poll
                 WHERE t.id_poll != 0
                     AND p.id_poll IS NULL
                     AND t.id_topic BETWEEN ?1 AND ?2",
            ),
            range: range(500, MAX_TOPIC),
            remediation: bulk("id_topic", "UPDATE topics SET id_poll = 0 WHERE id_topic IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_polls", &["id_topic", "id_poll"]),
        },
        Rule {
            id: "missing_calendar_topics",
            detect: rows(
                "SELECT cal.id_event, cal.id_topic
                 FROM calendar AS cal
                     LEFT JOIN topics AS t ON t.id_topic = cal.id_topic
                 WHERE cal.id_topic != 0
                     AND t.id_topic IS NULL
                     AND cal.id_topic BETWEEN ?1 AND ?2",
            ),
            range: range(1000, "SELECT MAX(id_topic) FROM calendar"),
            remediation: bulk(
                "id_event",
                "UPDATE calendar SET id_topic = 0, id_board = 0 WHERE id_event IN ({ids})",
            ),
            forces: &[],
            message: per_row("repair_missing_calendar_topics", &["id_event", "id_topic"]),
        },
        Rule {
            id: "missing_log_topics",
            detect: rows(
                "SELECT lt.id_topic
                 FROM log_topics AS lt
                     LEFT JOIN topics AS t ON t.id_topic = lt.id_topic
                 WHERE t.id_topic IS NULL
                     AND lt.id_topic BETWEEN ?1 AND ?2
                 GROUP BY lt.id_topic",
            ),
            range: range(500, "SELECT MAX(id_topic) FROM log_topics"),
            remediation: bulk("id_topic", "DELETE FROM log_topics WHERE id_topic IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_topics", &["id_topic"]),
        },
        Rule {
            id: "missing_log_topics_members",
            detect: rows(
                "SELECT lt.id_member
                 FROM log_topics AS lt
                     LEFT JOIN members AS mem ON mem.id_member = lt.id_member
                 WHERE mem.id_member IS NULL
                     AND lt.id_member BETWEEN ?1 AND ?2
                 GROUP BY lt.id_member",
            ),
            range: range(500, "SELECT MAX(id_member) FROM log_topics"),
            remediation: bulk("id_member", "DELETE FROM log_topics WHERE id_member IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_topics_members", &["id_member"]),
        },
        Rule {
            id: "missing_log_boards",
            detect: rows(
                "SELECT lb.id_board
                 FROM log_boards AS lb
                     LEFT JOIN boards AS b ON b.id_board = lb.id_board
                 WHERE b.id_board IS NULL
                 GROUP BY lb.id_board",
            ),
            range: None,
            remediation: bulk("id_board", "DELETE FROM log_boards WHERE id_board IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_boards", &["id_board"]),
        },
        Rule {
            id: "missing_log_boards_members",
            detect: rows(
                "SELECT lb.id_member
                 FROM log_boards AS lb
                     LEFT JOIN members AS mem ON mem.id_member = lb.id_member
                 WHERE mem.id_member IS NULL
                     AND lb.id_member BETWEEN ?1 AND ?2
                 GROUP BY lb.id_member",
            ),
            range: range(500, "SELECT MAX(id_member) FROM log_boards"),
            remediation: bulk("id_member", "DELETE FROM log_boards WHERE id_member IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_boards_members", &["id_member"]),
        },
        Rule {
            id: "missing_log_mark_read",
            detect: rows(
                "SELECT lmr.id_board
                 FROM log_mark_read AS lmr
                     LEFT JOIN boards AS b ON b.id_board = lmr.id_board
                 WHERE b.id_board IS NULL
                 GROUP BY lmr.id_board",
            ),
            range: None,
            remediation: bulk("id_board", "DELETE FROM log_mark_read WHERE id_board IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_mark_read", &["id_board"]),
        },
        Rule {
            id: "missing_log_mark_read_members",
            detect: rows(
                "SELECT lmr.id_member
                 FROM log_mark_read AS lmr
                     LEFT JOIN members AS mem ON mem.id_member = lmr.id_member
                 WHERE mem.id_member IS NULL
                     AND lmr.id_member BETWEEN ?1 AND ?2
                 GROUP BY lmr.id_member",
            ),
            range: range(500, "SELECT MAX(id_member) FROM log_mark_read"),
            remediation: bulk("id_member", "DELETE FROM log_mark_read WHERE id_member IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_mark_read_members", &["id_member"]),
        },
        Rule {
            id: "missing_pms",
            detect: rows(
                "SELECT pmr.id_pm
                 FROM pm_recipients AS pmr
                     LEFT JOIN personal_messages AS pm ON pm.id_pm = pmr.id_pm
                 WHERE pm.id_pm IS NULL
                     AND pmr.id_pm BETWEEN ?1 AND ?2
                 GROUP BY pmr.id_pm",
            ),
            range: range(500, "SELECT MAX(id_pm) FROM pm_recipients"),
            remediation: bulk("id_pm", "DELETE FROM pm_recipients WHERE id_pm IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_pms", &["id_pm"]),
        },
        Rule {
            id: "missing_recipients",
            detect: rows(
                "SELECT pmr.id_member
                 FROM pm_recipients AS pmr
                     LEFT JOIN members AS mem ON mem.id_member = pmr.id_member
                 WHERE mem.id_member IS NULL
                     AND pmr.id_member BETWEEN ?1 AND ?2
                 GROUP BY pmr.id_member",
            ),
            range: range(500, "SELECT MAX(id_member) FROM pm_recipients"),
            remediation: bulk("id_member", "DELETE FROM pm_recipients WHERE id_member IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_recipients", &["id_member"]),
        },
        Rule {
            id: "missing_senders",
            detect: rows(
                "SELECT pm.id_pm, pm.id_member_from
                 FROM personal_messages AS pm
                     LEFT JOIN members AS mem ON mem.id_member = pm.id_member_from
                 WHERE pm.id_member_from != 0
                     AND mem.id_member IS NULL
                     AND pm.id_pm BETWEEN ?1 AND ?2",
            ),
            range: range(500, "SELECT MAX(id_pm) FROM personal_messages"),
            remediation: bulk(
                "id_pm",
                "UPDATE personal_messages SET id_member_from = 0 WHERE id_pm IN ({ids})",
            ),
            forces: &[],
            message: per_row("repair_missing_senders", &["id_pm", "id_member_from"]),
        },
        Rule {
            id: "missing_notify_members",
            detect: rows(
                "SELECT ln.id_member
                 FROM log_notify AS ln
                     LEFT JOIN members AS mem ON mem.id_member = ln.id_member
                 WHERE mem.id_member IS NULL
                     AND ln.id_member BETWEEN ?1 AND ?2
                 GROUP BY ln.id_member",
            ),
            range: range(500, "SELECT MAX(id_member) FROM log_notify"),
            remediation: bulk("id_member", "DELETE FROM log_notify WHERE id_member IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_notify_members", &["id_member"]),
        },
        Rule {
            id: "missing_cached_subject",
            detect: rows(
                "SELECT t.id_topic, m.subject
                 FROM topics AS t
                     JOIN messages AS m ON m.id_msg = t.id_first_msg
                     LEFT JOIN log_search_subjects AS lss ON lss.id_topic = t.id_topic
                 WHERE lss.id_topic IS NULL
                     AND m.subject GLOB '*[A-Za-z0-9]*'
                     AND t.id_topic BETWEEN ?1 AND ?2",
            ),
            range: range(100, MAX_TOPIC),
            remediation: Remediation::FullStreamCallback {
                fix_query: None,
                stream: fixes::rebuild_subject_index,
            },
            forces: &[],
            message: MessageSpec::Static("repair_missing_cached_subject"),
        },
        Rule {
            id: "missing_topic_for_cache",
            detect: rows(
                "SELECT lss.id_topic
                 FROM log_search_subjects AS lss
                     LEFT JOIN topics AS t ON t.id_topic = lss.id_topic
                 WHERE t.id_topic IS NULL
                 GROUP BY lss.id_topic",
            ),
            range: None,
            remediation: bulk(
                "id_topic",
                "DELETE FROM log_search_subjects WHERE id_topic IN ({ids})",
            ),
            forces: &[],
            message: per_row("repair_missing_topic_for_cache", &["id_topic"]),
        },
        Rule {
            id: "missing_member_vote",
            detect: rows(
                "SELECT lp.id_member
                 FROM log_polls AS lp
                     LEFT JOIN members AS mem ON mem.id_member = lp.id_member
                 WHERE lp.id_member != 0
                     AND mem.id_member IS NULL
                     AND lp.id_member BETWEEN ?1 AND ?2
                 GROUP BY lp.id_member",
            ),
            range: range(500, "SELECT MAX(id_member) FROM log_polls"),
            remediation: bulk("id_member", "DELETE FROM log_polls WHERE id_member IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_member_vote", &["id_member"]),
        },
        Rule {
            id: "missing_log_poll_vote",
            detect: rows(
                "SELECT lp.id_poll
                 FROM log_polls AS lp
                     LEFT JOIN polls AS p ON p.id_poll = lp.id_poll
                 WHERE p.id_poll IS NULL
                     AND lp.id_poll BETWEEN ?1 AND ?2
                 GROUP BY lp.id_poll",
            ),
            range: range(500, "SELECT MAX(id_poll) FROM log_polls"),
            remediation: bulk("id_poll", "DELETE FROM log_polls WHERE id_poll IN ({ids})"),
            forces: &[],
            message: per_row("repair_missing_log_poll_vote", &["id_poll"]),
        },
        Rule {
            id: "report_missing_comments",
            detect: rows(
                "SELECT lr.id_report, lr.subject
                 FROM log_reported AS lr
                     LEFT JOIN log_reported_comments AS lrc ON lrc.id_report = lr.id_report
                 WHERE lrc.id_comment IS NULL",
            ),
            range: None,
            remediation: bulk("id_report", "DELETE FROM log_reported WHERE id_report IN ({ids})"),
            forces: &[],
            message: per_row("repair_report_missing_comments", &["id_report", "subject"]),
        },
        Rule {
            id: "comments_missing_report",
            detect: rows(
                "SELECT lrc.id_report, MIN(lrc.id_comment) AS id_comment
                 FROM log_reported_comments AS lrc
                     LEFT JOIN log_reported AS lr ON lr.id_report = lrc.id_report
                 WHERE lr.id_report IS NULL
                 GROUP BY lrc.id_report",
            ),
            range: None,
            remediation: bulk(
                "id_report",
                "DELETE FROM log_reported_comments WHERE id_report IN ({ids})",
            ),
            forces: &[],
            message: per_row("repair_comments_missing_report", &["id_comment", "id_report"]),
        },
        Rule {
            id: "group_request_missing_member",
            detect: rows(
                "SELECT lgr.id_request, lgr.id_member
                 FROM log_group_requests AS lgr
                     LEFT JOIN members AS mem ON mem.id_member = lgr.id_member
                 WHERE mem.id_member IS NULL",
            ),
            range: None,
            remediation: bulk(
                "id_request",
                "DELETE FROM log_group_requests WHERE id_request IN ({ids})",
            ),
            forces: &[],
            message: per_row("repair_group_request_missing_member", &["id_request", "id_member"]),
        },
        Rule {
            id: "group_request_missing_group",
            detect: rows(
                "SELECT lgr.id_request, lgr.id_group
                 FROM log_group_requests AS lgr
                     LEFT JOIN membergroups AS mg ON mg.id_group = lgr.id_group
                 WHERE mg.id_group IS NULL",
            ),
            range: None,
            remediation: bulk(
                "id_request",
                "DELETE FROM log_group_requests WHERE id_request IN ({ids})",
            ),
            forces: &[],
            message: per_row("repair_group_request_missing_group", &["id_request", "id_group"]),
        },
    ]
}
