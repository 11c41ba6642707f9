// ❗ Error types for the aggregation engine
// File-level plumbing uses anyhow; these are the failures callers branch on.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// No records at all: there is no date span to iterate
    #[error("no records to aggregate (empty input)")]
    EmptyInput,

    #[error("invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("unrecognized date: {0}")]
    InvalidDate(String),

    /// A monthly total left the i64 range
    #[error("total for measure '{measure}' overflowed in {month}")]
    Overflow { measure: String, month: String },
}

pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AnalyticsError::EmptyInput.to_string(),
            "no records to aggregate (empty input)"
        );
        assert_eq!(
            AnalyticsError::InvalidMonth { year: 2019, month: 13 }.to_string(),
            "invalid month 13 for year 2019"
        );
        assert_eq!(
            AnalyticsError::InvalidDate("yesterday".to_string()).to_string(),
            "unrecognized date: yesterday"
        );
    }
}
