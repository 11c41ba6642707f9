// Border Analytics - Core Library
// Monthly border crossing totals with trailing averages.
// Exposes the aggregation engine plus the CSV loader and report writers.

pub mod calendar;
pub mod records;
pub mod grouper;
pub mod accumulator;
pub mod aggregator;
pub mod report;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use calendar::{months, months_between, MonthKey, MonthRange};
pub use records::{load_csv, title_case, BorderCrossingRow, Record};
pub use grouper::{bundle_for_month, sums_for_month, MonthlyBundle};
pub use accumulator::{trailing_average, Accumulator, History, OutputRow};
pub use aggregator::{aggregate, aggregate_category, date_span, CategoryRun};
pub use report::{sort_rows, write_csv, write_json, write_report, ReportFormat, ReportLine, ReportSummary};
pub use config::RunConfig;
pub use error::{AnalyticsError, AnalyticsResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
