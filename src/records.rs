// 📥 Records - Border crossing rows from CSV into month-level records
//
// The source file is one line per (port, month, measure). The aggregation
// engine only needs four of its columns, with the date already reduced to
// its month and the measure in canonical casing.

use crate::calendar::MonthKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// CSV ROW
// ============================================================================

/// One line of the border crossing entry file, as published.
/// Port columns are optional: nothing downstream reads them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BorderCrossingRow {
    #[serde(rename = "Port Name", default)]
    pub port_name: Option<String>,

    #[serde(rename = "State", default)]
    pub state: Option<String>,

    #[serde(rename = "Port Code", default)]
    pub port_code: Option<String>,

    #[serde(rename = "Border")]
    pub border: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Measure")]
    pub measure: String,

    #[serde(rename = "Value")]
    pub value: i64,
}

// ============================================================================
// RECORD
// ============================================================================

/// A single observation, normalized to month granularity.
/// Immutable once built; the engine only ever borrows these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub category: String,
    pub month: MonthKey,
    pub measure: String,
    pub value: i64,
}

impl Record {
    pub fn new(category: &str, month: MonthKey, measure: &str, value: i64) -> Self {
        Record {
            category: category.to_string(),
            month,
            measure: title_case(measure),
            value,
        }
    }

    pub fn from_row(row: &BorderCrossingRow) -> Result<Self> {
        let month = MonthKey::parse(&row.date)
            .with_context(|| format!("Bad date for border '{}'", row.border))?;
        Ok(Record::new(&row.border, month, &row.measure, row.value))
    }
}

/// Load the source file and return its records oldest-first.
/// Sorting is stable, so records within a month keep file order.
pub fn load_csv(csv_path: &Path) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut records = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row: BorderCrossingRow =
            result.with_context(|| format!("Failed to deserialize row at line {}", line))?;
        let record = Record::from_row(&row).with_context(|| format!("Invalid row at line {}", line))?;
        records.push(record);
    }

    records.sort_by_key(|r| r.month);

    log::debug!("Loaded {} records from {}", records.len(), csv_path.display());

    Ok(records)
}

// ============================================================================
// LABEL NORMALIZATION
// ============================================================================

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
/// "truck containers FULL" -> "Truck Containers Full", "o'neil" -> "O'Neil"
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Case-insensitive label comparison for categories and measures
pub fn same_label(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_test_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("truck containers FULL"), "Truck Containers Full");
        assert_eq!(title_case("PEDESTRIANS"), "Pedestrians");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("bus-passengers"), "Bus-Passengers");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_same_label_ignores_case() {
        assert!(same_label("US-Canada Border", "us-canada border"));
        assert!(same_label("Trucks", "TRUCKS"));
        assert!(!same_label("US-Canada Border", "US-Mexico Border"));
    }

    #[test]
    fn test_record_new_normalizes_measure() {
        let month = MonthKey::new(2019, 3).unwrap();
        let record = Record::new("US-Mexico Border", month, "personal VEHICLES", 42);
        assert_eq!(record.measure, "Personal Vehicles");
        assert_eq!(record.category, "US-Mexico Border");
    }

    #[test]
    fn test_load_csv_sorts_oldest_first() {
        let file = write_test_csv(
            "Port Name,State,Port Code,Border,Date,Measure,Value\n\
             Derby Line,VT,209,US-Canada Border,03/01/2019 12:00:00 AM,Truck Containers Full,6483\n\
             Norton,VT,211,US-Canada Border,01/01/2019 12:00:00 AM,Trains,2\n\
             Calexico,CA,2503,US-Mexico Border,02/01/2019 12:00:00 AM,Trucks,34447\n",
        );

        let records = load_csv(file.path()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].month, MonthKey::new(2019, 1).unwrap());
        assert_eq!(records[0].measure, "Trains");
        assert_eq!(records[1].category, "US-Mexico Border");
        assert_eq!(records[2].value, 6483);
    }

    #[test]
    fn test_load_csv_without_port_columns() {
        let file = write_test_csv(
            "Border,Date,Measure,Value\n\
             US-Canada Border,2019-02-01,Buses, 7\n",
        );

        let records = load_csv(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 7);
        assert_eq!(records[0].month, MonthKey::new(2019, 2).unwrap());
    }

    #[test]
    fn test_load_csv_accepts_impossible_day() {
        let file = write_test_csv(
            "Border,Date,Measure,Value\n\
             US-Mexico Border,02/30/2019 12:00:00 AM,Trucks,12\n\
             US-Mexico Border,4/31/2019,Trucks,8\n",
        );

        let records = load_csv(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, MonthKey::new(2019, 2).unwrap());
        assert_eq!(records[1].month, MonthKey::new(2019, 4).unwrap());
    }

    #[test]
    fn test_load_csv_reports_bad_date_line() {
        let file = write_test_csv(
            "Border,Date,Measure,Value\n\
             US-Canada Border,01/01/2019,Buses,1\n\
             US-Canada Border,someday,Buses,1\n",
        );

        let err = load_csv(file.path()).unwrap_err();

        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = load_csv(Path::new("/nonexistent/border_data.csv"));
        assert!(result.is_err());
    }
}
