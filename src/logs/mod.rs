use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::ReadinessReport;

/// The one-shot log artifact. Created truncated at the start of a run, then
/// appended to line by line; every line carries an RFC 3339 UTC timestamp.
pub struct RunLog {
    file: File,
    path: PathBuf,
}

impl RunLog {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create log directory: {}", parent.display())
                })?;
            }
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create log file: {}", path.display()))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line(&mut self, message: &str) -> Result<()> {
        let ts = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());
        writeln!(self.file, "{ts} {message}")
            .with_context(|| format!("failed to write log file: {}", self.path.display()))
    }

    pub fn write_report(&mut self, report: &ReadinessReport) -> Result<()> {
        self.line(&format!(
            "vmready {} validation run on {}",
            report.tool_version, report.host.computer_name
        ))?;
        for note in &report.notes {
            self.line(&format!("note: {note}"))?;
        }
        for result in &report.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            self.line(&format!("check {}: {status} ({})", result.kind, result.detail))?;
        }
        self.line(&report.summary_line())
    }
}
