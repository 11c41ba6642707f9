// 🧺 Grouper - Per-month, per-measure totals for one category

use crate::calendar::MonthKey;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::records::{same_label, title_case, Record};
use std::collections::BTreeMap;

/// Totals for one category in one month, keyed by title-cased measure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBundle {
    /// Category as requested by the caller; records match it case-insensitively
    pub category: String,
    pub month: MonthKey,
    pub sums: BTreeMap<String, i64>,
}

impl MonthlyBundle {
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }
}

/// Sum `value` per measure over the records of `category` in (year, month).
/// An empty map means the category had no records that month.
pub fn sums_for_month(
    records: &[Record],
    category: &str,
    year: i32,
    month: u32,
) -> AnalyticsResult<BTreeMap<String, i64>> {
    let key = MonthKey::new(year, month)?;
    Ok(bundle_for_month(records, category, key)?.sums)
}

pub fn bundle_for_month(
    records: &[Record],
    category: &str,
    month: MonthKey,
) -> AnalyticsResult<MonthlyBundle> {
    let mut bundle = MonthlyBundle {
        category: category.to_string(),
        month,
        sums: BTreeMap::new(),
    };

    for record in records
        .iter()
        .filter(|r| r.month == month && same_label(&r.category, category))
    {
        let measure = title_case(&record.measure);
        let total = bundle.sums.entry(measure).or_insert(0);
        *total = total
            .checked_add(record.value)
            .ok_or_else(|| AnalyticsError::Overflow {
                measure: title_case(&record.measure),
                month: month.to_string(),
            })?;
    }

    Ok(bundle)
}

// ============================================================================
// TESTS
// ============================================================================
