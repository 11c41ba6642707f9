// 🧮 Aggregator - Monthly totals and trailing averages per category
//
// For every requested category, walk each month of the global date span
// (earliest to latest record, across ALL categories), group that month's
// records, and feed the totals to a fresh Accumulator. Categories never
// share state.

use crate::accumulator::{Accumulator, History, OutputRow};
use crate::calendar::{months, MonthKey};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::grouper::bundle_for_month;
use crate::records::Record;

/// Result of processing one category
#[derive(Debug, Clone)]
pub struct CategoryRun {
    pub rows: Vec<OutputRow>,
    pub history: History,
    pub months_visited: usize,
    /// Months dropped because their totals could not be computed
    pub months_skipped: usize,
}

/// Earliest and latest month present in `records`, inclusive
pub fn date_span(records: &[Record]) -> AnalyticsResult<(MonthKey, MonthKey)> {
    let start = records.iter().map(|r| r.month).min();
    let end = records.iter().map(|r| r.month).max();

    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(AnalyticsError::EmptyInput),
    }
}

/// Rows for every requested category, in no particular order.
///
/// Fails with `EmptyInput` when there are no records, since no date span
/// can be derived.
pub fn aggregate<S: AsRef<str>>(records: &[Record], categories: &[S]) -> AnalyticsResult<Vec<OutputRow>> {
    let span = date_span(records)?;

    let mut rows = Vec::new();
    for category in categories {
        let run = aggregate_category(records, category.as_ref(), span);
        rows.extend(run.rows);
    }

    Ok(rows)
}

/// Process a single category over `span` (inclusive on both ends)
pub fn aggregate_category(records: &[Record], category: &str, span: (MonthKey, MonthKey)) -> CategoryRun {
    let (start, last) = span;
    let mut accumulator = Accumulator::new();
    let mut rows = Vec::new();
    let mut months_skipped = 0;

    for month in months(start, last.next()) {
        log::debug!("Grouping {} for {}", category, month);

        let bundle = match bundle_for_month(records, category, month) {
            Ok(bundle) => bundle,
            Err(e) => {
                // One bad month must not sink the whole report
                log::warn!("Skipping {} for {}: {}", month, category, e);
                months_skipped += 1;
                continue;
            }
        };

        rows.extend(accumulator.observe(&bundle));
    }

    let months_visited = accumulator.months_observed();
    log::info!(
        "{}: {} months visited, {} skipped, {} measures, {} rows",
        category,
        months_visited,
        months_skipped,
        accumulator.measure_count(),
        rows.len()
    );

    CategoryRun {
        rows,
        history: accumulator.into_history(),
        months_visited,
        months_skipped,
    }
}

// ============================================================================
// TESTS
// ============================================================================
