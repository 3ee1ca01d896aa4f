//! Batch report output: `;`-separated CSV or JSON lines, one record per instance.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::RepresentationSet;
use crate::lp::LpStatistics;
use crate::pipeline::{GraphStatistics, InstanceOutcome};

const SEPARATOR: &str = ";";
pub const NO_RESULT: &str = "no result";
pub const FAILED: &str = "failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    JsonLines,
}

impl ReportFormat {
    /// `.json` and `.jsonl` select JSON lines, anything else CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl") => {
                Self::JsonLines
            }
            _ => Self::Csv,
        }
    }
}

/// Renders outcomes as report lines for a fixed set of enabled representations.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    format: ReportFormat,
    representations: RepresentationSet,
}

impl ReportFormatter {
    pub fn new(format: ReportFormat, representations: RepresentationSet) -> Self {
        Self {
            format,
            representations,
        }
    }

    pub fn header(&self) -> Option<String> {
        if self.format == ReportFormat::JsonLines {
            return None;
        }
        let mut columns = vec!["instance".to_string()];
        columns.extend(LpStatistics::FIELDS.iter().map(|f| f.to_string()));
        for representation in self.representations.enabled() {
            columns.extend(
                GraphStatistics::FIELDS
                    .iter()
                    .map(|f| format!("{}.{}", representation.label(), f)),
            );
        }
        columns.push("elapsedSecs".to_string());
        Some(columns.join(SEPARATOR))
    }

    pub fn line(&self, outcome: &InstanceOutcome) -> Result<String> {
        match self.format {
            ReportFormat::JsonLines => {
                serde_json::to_string(outcome).context("serialize instance outcome")
            }
            ReportFormat::Csv => Ok(self.csv_line(outcome)),
        }
    }

    fn csv_line(&self, outcome: &InstanceOutcome) -> String {
        match outcome {
            InstanceOutcome::Completed(report) => {
                let mut fields = vec![sanitize(&report.instance)];
                fields.extend(report.lp.csv_fields().iter().map(|f| sanitize(f)));
                for representation in self.representations.enabled() {
                    match report.graph(representation) {
                        Some(stats) => fields.extend(stats.csv_fields()),
                        None => fields.extend(GraphStatistics::FIELDS.iter().map(|_| String::new())),
                    }
                }
                fields.push(format!("{:.3}", report.elapsed_secs));
                fields.join(SEPARATOR)
            }
            InstanceOutcome::Cancelled { instance } => {
                format!("{}{SEPARATOR}{NO_RESULT}{SEPARATOR}", sanitize(instance))
            }
            InstanceOutcome::Failed { instance, reason } => {
                format!("{}{SEPARATOR}{FAILED}{SEPARATOR}{}", sanitize(instance), sanitize(reason))
            }
        }
    }
}

/// Keeps a value on one CSV cell.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ';' => ',',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

/// Append-only report file. Created (and truncated) once per batch; each outcome is flushed
/// as soon as it is written so finished instances survive a crash later in the batch.
pub struct ReportWriter {
    formatter: ReportFormatter,
    out: BufWriter<File>,
}

impl ReportWriter {
    pub fn create(path: &Path, representations: RepresentationSet) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create report directory {:?}", parent))?;
        }
        let file = File::create(path).with_context(|| format!("create report file {:?}", path))?;
        let formatter = ReportFormatter::new(ReportFormat::from_path(path), representations);
        let mut writer = Self {
            formatter,
            out: BufWriter::new(file),
        };
        if let Some(header) = formatter.header() {
            writer.write_line(&header)?;
        }
        Ok(writer)
    }

    pub fn append(&mut self, outcome: &InstanceOutcome) -> Result<()> {
        let line = self.formatter.line(outcome)?;
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").context("write report line")?;
        self.out.flush().context("flush report")
    }

    /// Writes a whole batch at once, overwriting `path`.
    pub fn write_to_path(
        path: &Path,
        representations: RepresentationSet,
        outcomes: &[InstanceOutcome],
    ) -> Result<()> {
        let mut writer = Self::create(path, representations)?;
        for outcome in outcomes {
            writer.append(outcome)?;
        }
        Ok(())
    }
}
