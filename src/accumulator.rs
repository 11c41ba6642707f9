// 📈 Accumulator - Running monthly history and trailing averages
//
// One Accumulator per category. Each visited month appends that month's
// totals to the per-measure history, then emits a row for every measure
// seen this month: the month's total, plus the average of all EARLIER
// totals for that measure. Months where a measure is missing leave its
// history alone (no zero is recorded for the gap).

use crate::calendar::MonthKey;
use crate::grouper::MonthlyBundle;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// measure -> totals of every visited month in which the measure had data,
/// oldest first
pub type History = BTreeMap<String, Vec<i64>>;

// ============================================================================
// OUTPUT ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub category: String,
    pub month: MonthKey,
    pub measure: String,
    /// This month's total
    pub total: i64,
    /// Rounded mean of the measure's totals in earlier months (0 if none)
    pub average: i64,
}

// ============================================================================
// ACCUMULATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    history: History,
    months_observed: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one month into the history and return its rows.
    /// Months must be fed in ascending order.
    pub fn observe(&mut self, bundle: &MonthlyBundle) -> Vec<OutputRow> {
        self.months_observed += 1;

        for (measure, total) in &bundle.sums {
            self.history.entry(measure.clone()).or_default().push(*total);
        }

        // Only measures touched this month produce a row
        let mut rows = Vec::with_capacity(bundle.sums.len());
        for measure in bundle.sums.keys() {
            let Some((latest, prior)) = self.history.get(measure).and_then(|v| v.split_last()) else {
                continue;
            };

            rows.push(OutputRow {
                category: bundle.category.clone(),
                month: bundle.month,
                measure: measure.clone(),
                total: *latest,
                average: trailing_average(prior),
            });
        }

        rows
    }

    pub fn history(&self, measure: &str) -> Option<&[i64]> {
        self.history.get(measure).map(Vec::as_slice)
    }

    pub fn measure_count(&self) -> usize {
        self.history.len()
    }

    /// Number of months fed in, with or without data
    pub fn months_observed(&self) -> usize {
        self.months_observed
    }

    pub fn into_history(self) -> History {
        self.history
    }
}

// ============================================================================
// ROUNDING
// ============================================================================

/// Mean of `prior`, rounded half away from zero using exact decimal
/// division (1.5 -> 2, 2.5 -> 3, -1.5 -> -2).
/// Returns 0 when there is nothing to average or the mean is unrepresentable.
pub fn trailing_average(prior: &[i64]) -> i64 {
    if prior.is_empty() {
        return 0;
    }

    let sum: i128 = prior.iter().map(|&v| v as i128).sum();
    let Ok(sum) = Decimal::try_from_i128_with_scale(sum, 0) else {
        return 0;
    };
    let count = Decimal::from(prior.len() as u64);

    sum.checked_div(count)
        .map(|mean| mean.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|mean| mean.to_i64())
        .unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================
