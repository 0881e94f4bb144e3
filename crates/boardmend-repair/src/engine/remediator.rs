//! Applies a rule's remediation strategy.

use boardmend_core::config::RepairConfig;
use boardmend_core::errors::{RepairError, StorageError};
use boardmend_core::traits::{BoardCreator, Localizer, SqlExecutor};
use boardmend_core::types::SqlValue;

use super::cursor::Window;
use super::detector::{window_params, ViolationDetector};
use super::salvage::SalvageArea;
use crate::catalog::{BulkAction, Remediation, Rule};

/// Everything a repair callback may touch.
pub struct RepairContext<'a> {
    db: &'a dyn SqlExecutor,
    localizer: &'a dyn Localizer,
    creator: &'a dyn BoardCreator,
    salvage: &'a mut SalvageArea,
    config: &'a RepairConfig,
}

impl<'a> RepairContext<'a> {
    pub fn new(
        db: &'a dyn SqlExecutor,
        localizer: &'a dyn Localizer,
        creator: &'a dyn BoardCreator,
        salvage: &'a mut SalvageArea,
        config: &'a RepairConfig,
    ) -> Self {
        Self {
            db,
            localizer,
            creator,
            salvage,
            config,
        }
    }

    pub fn db(&self) -> &'a dyn SqlExecutor {
        self.db
    }

    pub fn localizer(&self) -> &'a dyn Localizer {
        self.localizer
    }

    /// Salvage board id, created on first use and cached in the run.
    pub fn salvage_board(&mut self) -> Result<i64, StorageError> {
        self.salvage.board(self.localizer, self.creator)
    }

    /// Salvage category id, created on first use and cached in the run.
    pub fn salvage_category(&mut self) -> Result<i64, StorageError> {
        self.salvage.category(self.localizer, self.creator)
    }

    pub fn bulk_chunk_size(&self) -> usize {
        self.config.effective_bulk_chunk_size().max(1)
    }

    pub fn index_batch_size(&self) -> usize {
        self.config.effective_index_batch_size().max(1)
    }
}

/// Expand the `{ids}` placeholder of `template` into `?n` parameters numbered
/// after `first_param` existing ones.
pub fn expand_ids(template: &str, ids: &[i64], first_param: usize) -> (String, Vec<SqlValue>) {
    let placeholders = (1..=ids.len())
        .map(|i| format!("?{}", first_param + i))
        .collect::<Vec<_>>()
        .join(", ");
    let params = ids.iter().map(|&id| SqlValue::Integer(id)).collect();
    (template.replace("{ids}", &placeholders), params)
}

/// Remediate one unit of `rule` (a window, or the whole rule when it has no
/// range plan). Returns how many violations the unit contained.
///
/// Id-collecting rules only gather ids into `pending`; call
/// [`flush_collected`] to run their bulk action.
pub fn remediate(
    ctx: &mut RepairContext<'_>,
    rule: &Rule,
    window: Option<Window>,
    pending: &mut Vec<i64>,
) -> Result<usize, RepairError> {
    let detector = ViolationDetector::new(ctx.db());

    match rule.remediation {
        Remediation::BlanketStatement { sql } => {
            let found = detector.detect(rule, window)?.violations();
            if found > 0 {
                let affected = ctx.db().execute(sql, &[])?;
                tracing::debug!(rule = rule.id, found, affected, "blanket statement applied");
            }
            Ok(found)
        }
        Remediation::RowCallback { fix_query, repair } => {
            let detected = match fix_query {
                Some(query) => detector.detect_with(query, window)?,
                None => detector.detect(rule, window)?,
            };
            let mut changed = 0usize;
            for row in detected.rows() {
                if repair(ctx, row)? {
                    changed += 1;
                }
            }
            if !detected.is_clean() {
                tracing::debug!(rule = rule.id, rows = detected.violations(), changed, "rows repaired");
            }
            Ok(detected.violations())
        }
        Remediation::IdCollectThenBulk { id_column, .. } => {
            let detected = detector.detect(rule, window)?;
            for row in detected.rows() {
                pending.push(row.get_i64(id_column)?);
            }
            Ok(detected.violations())
        }
        Remediation::FullStreamCallback { fix_query, stream } => {
            let sql = fix_query.unwrap_or(rule.detect.query);
            let processed = stream(ctx, sql, &window_params(window))?;
            if processed > 0 {
                tracing::debug!(rule = rule.id, processed, "stream remediation applied");
            }
            Ok(processed)
        }
    }
}

/// Run the bulk action of an id-collecting rule over `pending`, then empty it.
/// Returns the affected row count.
pub fn flush_collected(
    ctx: &mut RepairContext<'_>,
    rule: &Rule,
    pending: &mut Vec<i64>,
) -> Result<usize, RepairError> {
    if pending.is_empty() {
        return Ok(0);
    }
    let Remediation::IdCollectThenBulk { action, .. } = rule.remediation else {
        return Err(RepairError::Remediation {
            rule: rule.id.to_string(),
            message: format!("{} ids collected for a {} rule", pending.len(), rule.remediation.name()),
        });
    };

    pending.sort_unstable();
    pending.dedup();
    let affected = match action {
        BulkAction::Sql(template) => {
            let mut affected = 0;
            for chunk in pending.chunks(ctx.bulk_chunk_size()) {
                let (sql, params) = expand_ids(template, chunk, 0);
                affected += ctx.db().execute(&sql, &params)?;
            }
            affected
        }
        BulkAction::Custom(apply) => apply(ctx, pending)?,
    };
    tracing::debug!(rule = rule.id, ids = pending.len(), affected, "bulk action applied");
    pending.clear();
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_ids_numbers_after_leading_params() {
        let (sql, params) = expand_ids("UPDATE t SET a = ?1 WHERE id IN ({ids})", &[7, 9], 1);
        assert_eq!(sql, "UPDATE t SET a = ?1 WHERE id IN (?2, ?3)");
        assert_eq!(params, vec![SqlValue::Integer(7), SqlValue::Integer(9)]);
    }
}
