//! Position of a repair walk inside the catalog.

use std::fmt;

use boardmend_core::types::SqlValue;
use serde::{Deserialize, Serialize};

/// Detect-only or fixing walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairMode {
    Detect,
    Fix,
}

impl RepairMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Fix => "fix",
        }
    }
}

impl fmt::Display for RepairMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive id window `low ..= high` bound as `?1`, `?2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub low: i64,
    pub high: i64,
}

impl Window {
    pub fn params(&self) -> [SqlValue; 2] {
        [SqlValue::Integer(self.low), SqlValue::Integer(self.high)]
    }

    pub fn contains(&self, id: i64) -> bool {
        self.low <= id && id <= self.high
    }
}

/// Every window a range rule visits over `[1, max]`.
///
/// Window k is `[k * step + 1, (k + 1) * step]`; the last one may extend past
/// `max`, where it simply matches nothing.
pub fn windows(step: i64, max: i64) -> impl Iterator<Item = Window> {
    let step = step.max(1);
    (0..)
        .map(move |k: i64| k * step)
        .take_while(move |&offset| offset < max)
        .map(move |offset| Window {
            low: offset + 1,
            high: offset + step,
        })
}

/// Rule index plus offset into the rule's id domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchCursor {
    pub rule_index: usize,
    pub sub_offset: i64,
    /// Largest id of the current rule's domain, discovered on its first window.
    #[serde(default)]
    pub step_max: Option<i64>,
}

impl BatchCursor {
    pub fn at(rule_index: usize, sub_offset: i64) -> Self {
        Self {
            rule_index,
            sub_offset,
            step_max: None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.rule_index == 0 && self.sub_offset == 0
    }

    /// The next window of a rule batched by `step`.
    pub fn window(&self, step: i64) -> Window {
        Window {
            low: self.sub_offset + 1,
            high: self.sub_offset + step,
        }
    }

    /// True once every window up to the discovered max has been visited.
    pub fn range_exhausted(&self) -> bool {
        self.step_max
            .is_some_and(|max| self.sub_offset >= max)
    }

    pub fn advance_window(&mut self, step: i64) {
        self.sub_offset += step;
    }

    pub fn advance_rule(&mut self) {
        self.rule_index += 1;
        self.sub_offset = 0;
        self.step_max = None;
    }

    /// `(rule_index + sub_offset / step_max) / total * 100`, clamped to 100.
    pub fn progress_percent(&self, total_rules: usize) -> u8 {
        if total_rules == 0 {
            return 100;
        }
        let within = match self.step_max {
            Some(max) if max > 0 => (self.sub_offset as f64 / max as f64).min(1.0),
            _ => 0.0,
        };
        let pct = (self.rule_index as f64 + within) * 100.0 / total_rules as f64;
        pct.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_cover_final_partial_batch() {
        let all: Vec<_> = windows(500, 1001).collect();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], Window { low: 1, high: 500 });
        assert_eq!(all[2], Window { low: 1001, high: 1500 });
    }

    #[test]
    fn empty_domain_has_no_windows() {
        assert_eq!(windows(100, 0).count(), 0);
    }

    #[test]
    fn progress_includes_partial_rule() {
        let cursor = BatchCursor {
            rule_index: 1,
            sub_offset: 50,
            step_max: Some(100),
        };
        assert_eq!(cursor.progress_percent(10), 15);
        assert_eq!(BatchCursor::at(12, 0).progress_percent(10), 100);
    }
}
