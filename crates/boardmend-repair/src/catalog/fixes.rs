//! Repair callbacks referenced by the forum rules.

use boardmend_core::constants::MAX_SUBJECT_WORD_LEN;
use boardmend_core::errors::{RepairError, StorageError};
use boardmend_core::traits::{Localizer, SqlExecutor};
use boardmend_core::types::{Row, SqlValue};
use rustc_hash::FxHashSet;

use crate::engine::remediator::{expand_ids, RepairContext};

fn int(v: i64) -> SqlValue {
    SqlValue::Integer(v)
}

fn text(s: impl Into<String>) -> SqlValue {
    SqlValue::Text(s.into())
}

fn member_of(db: &dyn SqlExecutor, id_msg: i64) -> Result<i64, StorageError> {
    db.query_scalar("SELECT id_member FROM messages WHERE id_msg = ?1", &[int(id_msg)])
}

fn unclaimed_topic_id(db: &dyn SqlExecutor) -> Result<i64, StorageError> {
    db.query_scalar(concat!("SELECT ", unclaimed_topic_id!()), &[])
}

fn unclaimed_message_id(db: &dyn SqlExecutor) -> Result<i64, StorageError> {
    db.query_scalar(concat!("SELECT ", unclaimed_message_id!()), &[])
}

/// Give messages of a missing topic a new topic. Messages without a board go
/// to the salvage board.
pub fn synthesize_orphan_topic(ctx: &mut RepairContext<'_>, row: &Row) -> Result<bool, RepairError> {
    let old_topic = row.get_i64("id_topic")?;
    let first = row.get_i64("myid_first_msg")?;
    let last = row.get_i64("myid_last_msg")?;
    let mut board = row.get_i64("id_board")?;
    if board == 0 {
        board = ctx.salvage_board()?;
    }

    let db = ctx.db();
    // No other topic may keep claiming these messages.
    db.execute("UPDATE topics SET id_first_msg = 0 WHERE id_first_msg = ?1", &[int(first)])?;
    db.execute("UPDATE topics SET id_last_msg = 0 WHERE id_last_msg = ?1", &[int(last)])?;

    let new_topic = db.insert(
        "INSERT INTO topics
            (id_topic, id_board, id_member_started, id_member_updated, id_first_msg, id_last_msg,
             num_replies, unapproved_posts, approved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
        &[
            int(unclaimed_topic_id(db)?),
            int(board),
            int(member_of(db, first)?),
            int(member_of(db, last)?),
            int(first),
            int(last),
            int(row.get_i64("my_num_replies")?),
            int(row.get_i64("my_unapproved_posts")?),
        ],
    )?;

    let moved = db.execute(
        "UPDATE messages SET id_topic = ?1, id_board = ?2 WHERE id_topic = ?3",
        &[int(new_topic), int(board), int(old_topic)],
    )?;
    tracing::debug!(old_topic, new_topic, board, moved, "synthesized topic for orphan messages");
    Ok(true)
}

/// Recreate a poll record for choices whose poll vanished.
pub fn recreate_salvaged_poll(ctx: &mut RepairContext<'_>, row: &Row) -> Result<bool, RepairError> {
    let id_poll = row.get_i64("id_poll")?;
    let question = ctx.localizer().render("salvaged_poll_question", &[]);
    let created = ctx.db().execute(
        "INSERT OR IGNORE INTO polls (id_poll, question, id_member, poster_name)
         VALUES (?1, ?2, 0, ?3)",
        &[int(id_poll), text(question), text(ctx.localizer().render("guest_name", &[]))],
    )?;
    Ok(created > 0)
}

/// Attach a dangling poll to a new topic in the salvage board.
pub fn attach_poll_to_salvage_topic(
    ctx: &mut RepairContext<'_>,
    row: &Row,
) -> Result<bool, RepairError> {
    let id_poll = row.get_i64("id_poll")?;
    let id_member = row.get_i64("id_member")?;
    let poster_name = row.get_text("poster_name")?;
    let board = ctx.salvage_board()?;
    let subject = ctx.localizer().render("salvaged_poll_topic_name", &[]);
    let body = ctx.localizer().render("salvaged_poll_message_body", &[]);

    let db = ctx.db();
    let topic = db.insert(
        "INSERT INTO topics (id_topic, id_board, id_poll, id_member_started, id_member_updated, approved)
         VALUES (?1, ?2, ?3, ?4, ?4, 1)",
        &[int(unclaimed_topic_id(db)?), int(board), int(id_poll), int(id_member)],
    )?;
    let msg = db.insert(
        "INSERT INTO messages
            (id_msg, id_topic, id_board, id_member, poster_name, subject, body, approved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
        &[
            int(unclaimed_message_id(db)?),
            int(topic),
            int(board),
            int(id_member),
            text(poster_name),
            text(subject),
            text(body),
        ],
    )?;
    db.execute(
        "UPDATE topics SET id_first_msg = ?1, id_last_msg = ?1 WHERE id_topic = ?2",
        &[int(msg), int(topic)],
    )?;
    tracing::debug!(id_poll, topic, msg, "attached poll to salvage topic");
    Ok(true)
}

/// Point a topic at its real first and last message.
pub fn fix_topic_message_pointers(ctx: &mut RepairContext<'_>, row: &Row) -> Result<bool, RepairError> {
    let id_topic = row.get_i64("id_topic")?;
    let first = row.get_i64("myid_first_msg")?;
    let last = row.get_i64("myid_last_msg")?;
    if row.get_i64("id_first_msg")? == first && row.get_i64("id_last_msg")? == last {
        return Ok(false);
    }
    let db = ctx.db();
    db.execute(
        "UPDATE topics SET id_first_msg = ?1, id_last_msg = ?2,
            id_member_started = ?3, id_member_updated = ?4
         WHERE id_topic = ?5",
        &[
            int(first),
            int(last),
            int(member_of(db, first)?),
            int(member_of(db, last)?),
            int(id_topic),
        ],
    )?;
    Ok(true)
}

pub fn fix_topic_reply_count(ctx: &mut RepairContext<'_>, row: &Row) -> Result<bool, RepairError> {
    let wanted = row.get_i64("my_num_replies")?;
    if row.get_i64("num_replies")? == wanted {
        return Ok(false);
    }
    ctx.db().execute(
        "UPDATE topics SET num_replies = ?1 WHERE id_topic = ?2",
        &[int(wanted), int(row.get_i64("id_topic")?)],
    )?;
    Ok(true)
}

pub fn fix_topic_unapproved_count(ctx: &mut RepairContext<'_>, row: &Row) -> Result<bool, RepairError> {
    let wanted = row.get_i64("my_unapproved_posts")?;
    if row.get_i64("unapproved_posts")? == wanted {
        return Ok(false);
    }
    ctx.db().execute(
        "UPDATE topics SET unapproved_posts = ?1 WHERE id_topic = ?2",
        &[int(wanted), int(row.get_i64("id_topic")?)],
    )?;
    Ok(true)
}

/// Recreate a missing board inside the salvage category, keeping its id so
/// the topics in it become reachable again. Topics in board 0 move to the
/// salvage board instead.
pub fn recreate_missing_board(ctx: &mut RepairContext<'_>, row: &Row) -> Result<bool, RepairError> {
    let id_board = row.get_i64("id_board")?;
    if id_board == 0 {
        let salvage = ctx.salvage_board()?;
        let db = ctx.db();
        db.execute(
            "UPDATE messages SET id_board = ?1
             WHERE id_topic IN (SELECT id_topic FROM topics WHERE id_board = 0)",
            &[int(salvage)],
        )?;
        db.execute("UPDATE topics SET id_board = ?1 WHERE id_board = 0", &[int(salvage)])?;
        return Ok(true);
    }

    let category = ctx.salvage_category()?;
    let name = ctx.localizer().render("salvaged_board_recreated", &[&id_board]);
    let description = ctx.localizer().render("salvaged_board_description", &[]);
    let created = ctx.db().execute(
        "INSERT OR IGNORE INTO boards (id_board, id_cat, name, description, board_order)
         VALUES (?1, ?2, ?3, ?4,
                 (SELECT COALESCE(MAX(board_order), 0) + 1 FROM boards WHERE id_cat = ?2))",
        &[int(id_board), int(category), text(name), text(description)],
    )?;
    Ok(created > 0)
}

/// Move boards whose category vanished into the salvage category.
pub fn move_boards_to_salvage_category(
    ctx: &mut RepairContext<'_>,
    ids: &[i64],
) -> Result<usize, RepairError> {
    let category = ctx.salvage_category()?;
    let mut affected = 0;
    for chunk in ids.chunks(ctx.bulk_chunk_size()) {
        let (sql, mut params) = expand_ids("UPDATE boards SET id_cat = ?1 WHERE id_board IN ({ids})", chunk, 1);
        params.insert(0, int(category));
        affected += ctx.db().execute(&sql, &params)?;
    }
    Ok(affected)
}

/// Hang boards whose parent vanished under the salvage board.
pub fn reparent_boards_under_salvage(
    ctx: &mut RepairContext<'_>,
    ids: &[i64],
) -> Result<usize, RepairError> {
    let board = ctx.salvage_board()?;
    let category = ctx.salvage_category()?;
    let mut affected = 0;
    for chunk in ids.chunks(ctx.bulk_chunk_size()) {
        let (sql, mut params) = expand_ids(
            "UPDATE boards SET id_parent = ?1, id_cat = ?2, child_level = 1 WHERE id_board IN ({ids})",
            chunk,
            2,
        );
        params.splice(0..0, [int(board), int(category)]);
        affected += ctx.db().execute(&sql, &params)?;
    }
    Ok(affected)
}

/// Index words of topic subjects that are missing from the subject cache.
///
/// Iterates the cursor directly and writes in chunks of `index_batch_size`
/// rows.
pub fn rebuild_subject_index(
    ctx: &mut RepairContext<'_>,
    sql: &str,
    params: &[SqlValue],
) -> Result<usize, RepairError> {
    let db = ctx.db();
    let batch = ctx.index_batch_size();
    let mut pending: Vec<(String, i64)> = Vec::with_capacity(batch);
    let mut topics = 0usize;

    db.for_each_row(sql, params, &mut |row| {
        let id_topic = row.get_i64("id_topic")?;
        for word in subject_words(&row.get_text("subject")?) {
            pending.push((word, id_topic));
        }
        topics += 1;
        if pending.len() >= batch {
            flush_subject_words(db, &mut pending)?;
        }
        Ok(())
    })?;
    flush_subject_words(db, &mut pending)?;
    Ok(topics)
}

fn flush_subject_words(db: &dyn SqlExecutor, pending: &mut Vec<(String, i64)>) -> Result<(), StorageError> {
    if pending.is_empty() {
        return Ok(());
    }
    let mut sql = String::from("INSERT OR IGNORE INTO log_search_subjects (word, id_topic) VALUES ");
    let mut params = Vec::with_capacity(pending.len() * 2);
    for (i, (word, id_topic)) in pending.drain(..).enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("(?{}, ?{})", i * 2 + 1, i * 2 + 2));
        params.push(text(word));
        params.push(int(id_topic));
    }
    db.execute(&sql, &params)?;
    Ok(())
}

/// Lowercase alphanumeric words of a subject, deduplicated in first-seen
/// order and truncated to the index word length.
pub fn subject_words(subject: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    subject
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase().chars().take(MAX_SUBJECT_WORD_LEN).collect::<String>())
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Messages for topics whose first/last message pointers are wrong; one per
/// wrong pointer.
pub fn topic_pointer_messages(
    row: &Row,
    localizer: &dyn Localizer,
    out: &mut Vec<String>,
) -> Result<bool, StorageError> {
    let id_topic = row.get_i64("id_topic")?;
    let mut found = false;
    if row.get_i64("id_first_msg")? != row.get_i64("myid_first_msg")? {
        out.push(localizer.render(
            "repair_stats_topics_1",
            &[&id_topic, &row.get_i64("id_first_msg")?],
        ));
        found = true;
    }
    if row.get_i64("id_last_msg")? != row.get_i64("myid_last_msg")? {
        out.push(localizer.render(
            "repair_stats_topics_2",
            &[&id_topic, &row.get_i64("id_last_msg")?],
        ));
        found = true;
    }
    Ok(found)
}
