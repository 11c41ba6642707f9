// ⚙️ Run configuration - environment defaults with CLI overrides
//
// Environment variables:
// - BORDER_INPUT_PATH   source CSV (default: ./input/Border_Crossing_Entry_Data.csv)
// - BORDER_OUTPUT_PATH  report path (default: ./output/report.csv)
// - BORDER_CATEGORIES   comma-separated borders (default: both US land borders)
// - REPORT_FORMAT       csv | json (default: csv)
//
// Flags: --input <path> --output <path> --border <name> (repeatable) --format <csv|json>

use crate::records::same_label;
use crate::report::ReportFormat;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "./input/Border_Crossing_Entry_Data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./output/report.csv";
pub const DEFAULT_CATEGORIES: &[&str] = &["US-Canada Border", "US-Mexico Border"];

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub categories: Vec<String>,
    pub format: ReportFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            format: ReportFormat::Csv,
        }
    }
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RunConfig::default();

        if let Some(path) = lookup("BORDER_INPUT_PATH") {
            config.input_path = path.into();
        }
        if let Some(path) = lookup("BORDER_OUTPUT_PATH") {
            config.output_path = path.into();
        }
        if let Some(list) = lookup("BORDER_CATEGORIES") {
            config.categories = list.split(',').map(|c| c.to_string()).collect();
        }
        if let Some(format) = lookup("REPORT_FORMAT") {
            config.format = format.parse::<ReportFormat>().context("Invalid REPORT_FORMAT")?;
        }

        config.validate()
    }

    /// Apply command-line flags (program name already stripped)
    pub fn with_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut borders: Vec<String> = Vec::new();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let flag = flag.as_ref().to_string();
            let Some(value) = args.next() else {
                bail!("Missing value for {}", flag);
            };
            let value = value.as_ref();

            match flag.as_str() {
                "--input" => self.input_path = PathBuf::from(value),
                "--output" => self.output_path = PathBuf::from(value),
                "--border" => borders.push(value.to_string()),
                "--format" => self.format = value.parse::<ReportFormat>()?,
                other => bail!("Unknown argument: {}", other),
            }
        }

        if !borders.is_empty() {
            self.categories = borders;
        }

        self.validate()
    }

    /// Trim categories, drop blanks and case-insensitive duplicates
    fn validate(mut self) -> Result<Self> {
        let mut categories: Vec<String> = Vec::new();
        for category in &self.categories {
            let category = category.trim();
            if category.is_empty() || categories.iter().any(|c| same_label(c, category)) {
                continue;
            }
            categories.push(category.to_string());
        }

        if categories.is_empty() {
            bail!("No border categories configured");
        }

        self.categories = categories;
        Ok(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
