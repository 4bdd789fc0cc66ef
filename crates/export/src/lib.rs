//! Export helpers for script, CSV, and JSON artifacts.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading simulator reports or exporting them.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report file not found: {path}")]
    MissingReport { path: PathBuf },
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub mod script {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write script text, replacing whatever was at `path`.
    pub fn write_script(path: &Path, text: &str) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }
}

pub mod report {
    use std::fs;
    use std::io::{ErrorKind, Write};
    use std::path::Path;

    use log::debug;

    use crate::ExportError;

    /// Column name prefix used when a report has no header row.
    pub const POSITIONAL_PREFIX: &str = "column_";

    /// Whitespace-delimited table written by the simulator's report file.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ReportTable {
        pub columns: Vec<String>,
        pub rows: Vec<Vec<f64>>,
    }

    impl ReportTable {
        /// Parse report text.
        ///
        /// The first non-numeric line names the columns; later non-numeric lines
        /// (repeated headers) and rows whose width disagrees are skipped.
        pub fn parse(text: &str) -> Self {
            let mut table = Self::default();
            for (number, line) in text.lines().enumerate() {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.is_empty() {
                    continue;
                }
                let values: Option<Vec<f64>> =
                    tokens.iter().map(|token| token.parse::<f64>().ok()).collect();
                match values {
                    Some(row) => {
                        if table.columns.is_empty() {
                            table.columns = (1..=row.len())
                                .map(|i| format!("{POSITIONAL_PREFIX}{i}"))
                                .collect();
                        }
                        if row.len() == table.columns.len() {
                            table.rows.push(row);
                        } else {
                            debug!("skipping report line {}: {} values", number + 1, row.len());
                        }
                    }
                    None if table.columns.is_empty() => {
                        table.columns = tokens.iter().map(|token| token.to_string()).collect();
                    }
                    None => debug!("skipping non-numeric report line {}", number + 1),
                }
            }
            table
        }

        /// Values of one column, in row order.
        pub fn column(&self, index: usize) -> Vec<f64> {
            self.rows.iter().filter_map(|row| row.get(index).copied()).collect()
        }

        pub fn last_row(&self) -> Option<&[f64]> {
            self.rows.last().map(Vec::as_slice)
        }

        pub fn is_empty(&self) -> bool {
            self.rows.is_empty()
        }

        /// Serialize the table to CSV with a header row.
        pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
            let mut csv = csv::Writer::from_writer(writer);
            csv.write_record(&self.columns)?;
            for row in &self.rows {
                csv.write_record(row.iter().map(|value| value.to_string()))?;
            }
            csv.flush()?;
            Ok(())
        }
    }

    /// Read a report file from disk.
    pub fn read_report(path: &Path) -> Result<ReportTable, ExportError> {
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ExportError::MissingReport {
                path: path.to_path_buf(),
            },
            _ => ExportError::Io(err),
        })?;
        Ok(ReportTable::parse(&text))
    }

    /// Write a CSV copy of `table` to `path` (`-` for stdout).
    pub fn export_csv(table: &ReportTable, path: &Path) -> Result<(), ExportError> {
        let writer = crate::script::writer_for_path(path)?;
        table.write_csv(writer)
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::path::Path;

    use crate::ExportError;
    use crate::report::ReportTable;

    /// Metadata describing a pipeline run.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub spacecraft: &'a str,
        pub central_body: &'a str,
        pub coordinate_system: &'a str,
        pub epoch: &'a str,
        pub duration_days: f64,
        pub script_path: &'a Path,
        pub report_path: &'a Path,
        pub generated_utc: &'a str,
    }

    #[derive(Serialize)]
    struct RunSidecar<'a> {
        spacecraft: &'a str,
        central_body: &'a str,
        coordinate_system: &'a str,
        epoch: &'a str,
        duration_days: f64,
        script_path: String,
        report_path: String,
        generated_utc: &'a str,
        sample_count: usize,
        columns: &'a [String],
        initial_row: Option<&'a [f64]>,
        final_row: Option<&'a [f64]>,
    }

    /// Write a JSON summary of a run next to its report.
    pub fn write_summary(
        output: &Path,
        meta: &Metadata<'_>,
        table: &ReportTable,
    ) -> Result<(), ExportError> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let sidecar = RunSidecar {
            spacecraft: meta.spacecraft,
            central_body: meta.central_body,
            coordinate_system: meta.coordinate_system,
            epoch: meta.epoch,
            duration_days: meta.duration_days,
            script_path: meta.script_path.display().to_string(),
            report_path: meta.report_path.display().to_string(),
            generated_utc: meta.generated_utc,
            sample_count: table.rows.len(),
            columns: &table.columns,
            initial_row: table.rows.first().map(Vec::as_slice),
            final_row: table.last_row(),
        };

        to_writer_pretty(File::create(output)?, &sidecar)?;
        Ok(())
    }
}
