//! The immutable rule catalog.
//!
//! Each rule pairs a detection query with exactly one remediation strategy.
//! Strategies are a sum type so a rule cannot name a callback its strategy
//! does not use, and every callback is a plain `fn` resolved when the catalog
//! is built.

/// Scalar subquery yielding a topic id above every id still referenced, so a
/// new or renumbered topic never adopts another topic's messages or logs.
macro_rules! unclaimed_topic_id {
    () => {
        "(SELECT COALESCE(MAX(id), 0) + 1 FROM (
            SELECT MAX(id_topic) AS id FROM topics
            UNION ALL SELECT MAX(id_topic) FROM messages
            UNION ALL SELECT MAX(id_topic) FROM log_topics
            UNION ALL SELECT MAX(id_topic) FROM log_notify
            UNION ALL SELECT MAX(id_topic) FROM log_search_subjects
            UNION ALL SELECT MAX(id_topic) FROM log_reported
            UNION ALL SELECT MAX(id_topic) FROM calendar))"
    };
}

/// Message counterpart of `unclaimed_topic_id!`.
macro_rules! unclaimed_message_id {
    () => {
        "(SELECT COALESCE(MAX(id), 0) + 1 FROM (
            SELECT MAX(id_msg) AS id FROM messages
            UNION ALL SELECT MAX(id_first_msg) FROM topics
            UNION ALL SELECT MAX(id_last_msg) FROM topics
            UNION ALL SELECT MAX(id_msg) FROM log_topics
            UNION ALL SELECT MAX(id_msg) FROM log_reported))"
    };
}

pub mod fixes;
pub mod forum_rules;

use boardmend_core::errors::{CatalogError, RepairError, StorageError};
use boardmend_core::traits::Localizer;
use boardmend_core::types::{Row, SqlValue};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::remediator::RepairContext;

/// How a detection query signals a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectMode {
    /// A single scalar; anything above 0 is a violation.
    Count,
    /// Every returned row is a violation.
    RowSet,
}

/// Detection query of a rule. Range rules bind `?1 = low`, `?2 = high`.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    pub query: &'static str,
    pub mode: DetectMode,
}

/// Batching plan over an ascending numeric id domain.
#[derive(Debug, Clone, Copy)]
pub struct RangePlan {
    pub step: i64,
    /// Returns the largest id in the domain; evaluated once per rule.
    pub max_query: &'static str,
}

/// Per-row repair. Returns whether the row actually needed a change.
pub type RowRepairFn = fn(&mut RepairContext<'_>, &Row) -> Result<bool, RepairError>;

/// Bulk repair over collected ids. Returns the affected row count.
pub type BulkFn = fn(&mut RepairContext<'_>, &[i64]) -> Result<usize, RepairError>;

/// Streaming repair: runs `sql` with `params` itself and iterates the cursor.
/// Returns the number of violating rows it processed.
pub type StreamFn = fn(&mut RepairContext<'_>, &str, &[SqlValue]) -> Result<usize, RepairError>;

/// Custom message predicate: appends messages for `row` and reports whether
/// the row is a real violation.
pub type MessageFn = fn(&Row, &dyn Localizer, &mut Vec<String>) -> Result<bool, StorageError>;

/// Bulk statement run once over collected ids.
#[derive(Clone, Copy)]
pub enum BulkAction {
    /// SQL with an `{ids}` placeholder expanded to a bound parameter list.
    Sql(&'static str),
    Custom(BulkFn),
}

/// Remediation strategy of a rule.
#[derive(Clone, Copy)]
pub enum Remediation {
    /// One fixed statement, no parameters derived from violating rows.
    BlanketStatement { sql: &'static str },
    /// Query `fix_query` (or the detection query) and repair row by row.
    RowCallback {
        fix_query: Option<&'static str>,
        repair: RowRepairFn,
    },
    /// Collect `id_column` from detection rows, then run one bulk action.
    IdCollectThenBulk {
        id_column: &'static str,
        action: BulkAction,
    },
    /// Hand the raw query to a callback that iterates and batches itself.
    FullStreamCallback {
        fix_query: Option<&'static str>,
        stream: StreamFn,
    },
}

impl Remediation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BlanketStatement { .. } => "blanket_statement",
            Self::RowCallback { .. } => "row_callback",
            Self::IdCollectThenBulk { .. } => "id_collect_then_bulk",
            Self::FullStreamCallback { .. } => "full_stream_callback",
        }
    }
}

/// How detection findings become human-readable messages.
#[derive(Clone, Copy)]
pub enum MessageSpec {
    /// One message per run, the first time the rule is found broken.
    Static(&'static str),
    /// One message per violating row, rendered from `columns` in order.
    PerRow {
        key: &'static str,
        columns: &'static [&'static str],
    },
    Predicate(MessageFn),
}

/// One catalog entry.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub detect: Detection,
    pub range: Option<RangePlan>,
    pub remediation: Remediation,
    pub forces: &'static [&'static str],
    pub message: MessageSpec,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("mode", &self.detect.mode)
            .field("range", &self.range)
            .field("remediation", &self.remediation.name())
            .field("forces", &self.forces)
            .finish()
    }
}

/// Ordered, validated set of rules.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    index: FxHashMap<&'static str, usize>,
}

impl RuleCatalog {
    /// Validate `rules` and build a catalog.
    pub fn new(rules: Vec<Rule>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();
        for (idx, rule) in rules.iter().enumerate() {
            if index.insert(rule.id, idx).is_some() {
                return Err(CatalogError::DuplicateRule {
                    id: rule.id.to_string(),
                });
            }
        }
        for rule in &rules {
            validate_rule(rule, &index)?;
        }

        let catalog = Self { rules, index };
        for (source, target) in catalog.backward_force_edges() {
            tracing::warn!(
                source,
                target,
                "forced rule precedes its source; it only runs on a later invocation"
            );
        }
        Ok(catalog)
    }

    /// The built-in forum rule set.
    pub fn forum() -> Result<Self, CatalogError> {
        Self::new(forum_rules::forum_rules())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&idx| &self.rules[idx])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.id)
    }

    /// Force edges whose target sits at or before the source in catalog
    /// order. Such targets are not revisited within the same walk.
    pub fn backward_force_edges(&self) -> Vec<(&'static str, &'static str)> {
        let mut edges = Vec::new();
        for (idx, rule) in self.rules.iter().enumerate() {
            for forced in rule.forces {
                if self.index.get(forced).is_some_and(|&t| t <= idx) {
                    edges.push((rule.id, *forced));
                }
            }
        }
        edges
    }
}

fn validate_rule(rule: &Rule, index: &FxHashMap<&'static str, usize>) -> Result<(), CatalogError> {
    let id = || rule.id.to_string();

    if rule.detect.query.trim().is_empty() {
        return Err(CatalogError::EmptyQuery {
            rule: id(),
            field: "detection query",
        });
    }
    if let Some(plan) = rule.range {
        if plan.step <= 0 {
            return Err(CatalogError::ZeroStep { rule: id() });
        }
        if plan.max_query.trim().is_empty() {
            return Err(CatalogError::EmptyQuery {
                rule: id(),
                field: "range max query",
            });
        }
    }

    let mut seen = FxHashSet::default();
    for forced in rule.forces {
        if !index.contains_key(forced) {
            return Err(CatalogError::UnknownForcedRule {
                rule: id(),
                forced: forced.to_string(),
            });
        }
        if !seen.insert(*forced) {
            return Err(CatalogError::Inconsistent {
                rule: id(),
                message: "forces the same rule twice",
            });
        }
    }

    match rule.remediation {
        Remediation::BlanketStatement { sql } if sql.trim().is_empty() => {
            return Err(CatalogError::EmptyQuery {
                rule: id(),
                field: "blanket statement",
            });
        }
        Remediation::IdCollectThenBulk { action, .. } => {
            if rule.detect.mode != DetectMode::RowSet {
                return Err(CatalogError::Inconsistent {
                    rule: id(),
                    message: "id collection needs a row-set detection query",
                });
            }
            if let BulkAction::Sql(sql) = action {
                if !sql.contains("{ids}") {
                    return Err(CatalogError::MissingIdsPlaceholder { rule: id() });
                }
            }
        }
        Remediation::RowCallback { fix_query, .. }
        | Remediation::FullStreamCallback { fix_query, .. } => {
            if fix_query.is_none() && rule.detect.mode != DetectMode::RowSet {
                return Err(CatalogError::Inconsistent {
                    rule: id(),
                    message: "row repair without a fix query needs a row-set detection query",
                });
            }
            if fix_query.is_some_and(|q| q.trim().is_empty()) {
                return Err(CatalogError::EmptyQuery {
                    rule: id(),
                    field: "fix query",
                });
            }
        }
        Remediation::BlanketStatement { .. } => {}
    }

    if rule.detect.mode == DetectMode::Count && !matches!(rule.message, MessageSpec::Static(_)) {
        return Err(CatalogError::Inconsistent {
            rule: id(),
            message: "count detection can only carry a static message",
        });
    }

    Ok(())
}
