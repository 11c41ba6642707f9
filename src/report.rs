// 📤 Report - Final ordering and serialization of aggregated rows

use crate::accumulator::OutputRow;
use crate::calendar::MonthKey;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => bail!("Unknown report format '{}' (expected csv or json)", other),
        }
    }
}

// ============================================================================
// REPORT LINE
// ============================================================================

/// Serialized shape of one row, shared by the CSV and JSON writers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    #[serde(rename = "Border")]
    pub border: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Measure")]
    pub measure: String,

    #[serde(rename = "Value")]
    pub value: i64,

    #[serde(rename = "Average")]
    pub average: i64,
}

impl From<&OutputRow> for ReportLine {
    fn from(row: &OutputRow) -> Self {
        ReportLine {
            border: row.category.clone(),
            date: row.month.to_string(),
            measure: row.measure.clone(),
            value: row.total,
            average: row.average,
        }
    }
}

// ============================================================================
// ORDERING & WRITERS
// ============================================================================

/// Newest month first; within a month, category then measure, both
/// descending. Total and average break any remaining tie.
pub fn sort_rows(rows: &mut [OutputRow]) {
    rows.sort_by(|a, b| {
        (b.month, &b.category, &b.measure, b.total, b.average)
            .cmp(&(a.month, &a.category, &a.measure, a.total, a.average))
    });
}

/// Rows must already be sorted
pub fn write_csv<W: Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if rows.is_empty() {
        wtr.write_record(["Border", "Date", "Measure", "Value", "Average"])?;
    }
    for row in rows {
        wtr.serialize(ReportLine::from(row))
            .context("Failed to serialize report row")?;
    }

    wtr.flush()?;
    Ok(())
}

/// Rows must already be sorted
pub fn write_json<W: Write>(mut writer: W, rows: &[OutputRow]) -> Result<()> {
    let lines: Vec<ReportLine> = rows.iter().map(ReportLine::from).collect();
    serde_json::to_writer_pretty(&mut writer, &lines).context("Failed to serialize report")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Sort `rows` and write them to `path`. Returns the number of rows written.
pub fn write_report(path: &Path, rows: &mut [OutputRow], format: ReportFormat) -> Result<usize> {
    sort_rows(rows);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create report {}", path.display()))?;
    let writer = BufWriter::new(file);

    match format {
        ReportFormat::Csv => write_csv(writer, rows)?,
        ReportFormat::Json => write_json(writer, rows)?,
    }

    log::info!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(rows.len())
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub row_count: usize,
    pub category_count: usize,
    pub measure_count: usize,
    pub first_month: Option<MonthKey>,
    pub last_month: Option<MonthKey>,
}

impl ReportSummary {
    pub fn from_rows(rows: &[OutputRow]) -> Self {
        let categories: BTreeSet<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        let measures: BTreeSet<&str> = rows.iter().map(|r| r.measure.as_str()).collect();

        ReportSummary {
            row_count: rows.len(),
            category_count: categories.len(),
            measure_count: measures.len(),
            first_month: rows.iter().map(|r| r.month).min(),
            last_month: rows.iter().map(|r| r.month).max(),
        }
    }

    pub fn summary(&self) -> String {
        let span = match (self.first_month, self.last_month) {
            (Some(first), Some(last)) => format!(
                "{:04}-{:02} to {:04}-{:02}",
                first.year(), first.month(), last.year(), last.month()
            ),
            _ => "no months".to_string(),
        };

        format!(
            "{} rows, {} borders, {} measures, {}",
            self.row_count, self.category_count, self.measure_count, span
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_row(category: &str, year: i32, month: u32, measure: &str, total: i64, average: i64) -> OutputRow {
        OutputRow {
            category: category.to_string(),
            month: MonthKey::new(year, month).unwrap(),
            measure: measure.to_string(),
            total,
            average,
        }
    }

    fn sample_rows() -> Vec<OutputRow> {
        vec![
            create_test_row("US-Canada Border", 2019, 1, "Trucks", 10, 0),
            create_test_row("US-Mexico Border", 2019, 2, "Pedestrians", 40, 0),
            create_test_row("US-Canada Border", 2019, 2, "Trucks", 20, 10),
            create_test_row("US-Mexico Border", 2019, 2, "Trucks", 50, 0),
        ]
    }

    #[test]
    fn test_sort_newest_first_then_category_then_measure() {
        let mut rows = sample_rows();
        sort_rows(&mut rows);

        let order: Vec<(u32, &str, &str)> = rows
            .iter()
            .map(|r| (r.month.month(), r.category.as_str(), r.measure.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (2, "US-Mexico Border", "Trucks"),
                (2, "US-Mexico Border", "Pedestrians"),
                (2, "US-Canada Border", "Trucks"),
                (1, "US-Canada Border", "Trucks"),
            ]
        );
    }

    #[test]
    fn test_sort_is_chronological_not_lexical() {
        let mut rows = vec![
            create_test_row("A", 2019, 12, "X", 1, 0),
            create_test_row("A", 2020, 2, "X", 1, 0),
        ];
        sort_rows(&mut rows);
        assert_eq!(rows[0].month, MonthKey::new(2020, 2).unwrap());
    }

    #[test]
    fn test_write_csv() {
        let mut rows = vec![create_test_row("US-Canada Border", 2019, 3, "Truck Containers Full", 6483, 0)];
        sort_rows(&mut rows);

        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Border,Date,Measure,Value,Average\n\
             US-Canada Border,03/01/2019 12:00:00 AM,Truck Containers Full,6483,0\n"
        );
    }

    #[test]
    fn test_write_csv_empty_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Border,Date,Measure,Value,Average\n");
    }

    #[test]
    fn test_write_json() {
        let rows = vec![create_test_row("US-Mexico Border", 2019, 2, "Trucks", 50, 12)];

        let mut buf = Vec::new();
        write_json(&mut buf, &rows).unwrap();
        let parsed: Vec<ReportLine> = serde_json::from_slice(&buf).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].border, "US-Mexico Border");
        assert_eq!(parsed[0].date, "02/01/2019 12:00:00 AM");
        assert_eq!(parsed[0].average, 12);
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output").join("report.csv");
        let mut rows = sample_rows();

        let written = write_report(&path, &mut rows, ReportFormat::Csv).unwrap();

        assert_eq!(written, 4);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(1).unwrap().starts_with("US-Mexico Border,02/01/2019"));
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!(" json ".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_summary() {
        let summary = ReportSummary::from_rows(&sample_rows());

        assert_eq!(summary.row_count, 4);
        assert_eq!(summary.category_count, 2);
        assert_eq!(summary.measure_count, 2);
        assert_eq!(summary.summary(), "4 rows, 2 borders, 2 measures, 2019-01 to 2019-02");
    }
}
