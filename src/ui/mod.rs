use anyhow::Error;
use std::io::{self, Write};

use crate::core::ReadinessReport;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(stderr, "  - rerun with `--verbose` to include inventory notes");
    let _ = writeln!(stderr, "  - see `vmready --help` for commands and options");
}

pub fn print_report(report: &ReadinessReport, cfg: &UiConfig) {
    let mut out = io::stdout().lock();

    if !cfg.quiet {
        for result in &report.results {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                format_status(result.passed, cfg.color),
                result.kind,
                result.detail
            );
        }
        if cfg.verbose {
            for note in &report.notes {
                let _ = writeln!(out, "note: {note}");
            }
        }
    }

    // The final summary line is printed even under --quiet: an orchestrator
    // monitoring stdout needs one unambiguous terminal status line.
    let _ = writeln!(out, "{}", report.summary_line());
}

fn format_status(passed: bool, color: bool) -> String {
    match (passed, color) {
        (true, true) => "\x1b[32mPASS\x1b[0m".to_string(),
        (false, true) => "\x1b[31mFAIL\x1b[0m".to_string(),
        (true, false) => "PASS".to_string(),
        (false, false) => "FAIL".to_string(),
    }
}
