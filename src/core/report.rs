use crate::core::CheckResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub computer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub schema_version: String,
    pub tool_version: String,
    pub host: HostInfo,
    pub generated_at: String,
    pub results: Vec<CheckResult>,
    pub overall_passed: bool,
    pub failure_count: usize,
    pub notes: Vec<String>,
}

impl ReadinessReport {
    /// Builds the report from the check results. `overall_passed` and
    /// `failure_count` are derived here and nowhere else.
    pub fn from_results(
        host: HostInfo,
        generated_at: String,
        results: Vec<CheckResult>,
        notes: Vec<String>,
    ) -> Self {
        let failure_count = results.iter().filter(|r| !r.passed).count();
        Self {
            schema_version: "1.0".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            host,
            generated_at,
            overall_passed: failure_count == 0,
            failure_count,
            results,
            notes,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// The single terminal status line an orchestrator watches for.
    pub fn summary_line(&self) -> String {
        if self.overall_passed {
            format!("readiness: PASS ({} checks passed)", self.results.len())
        } else {
            let details: Vec<String> = self
                .failures()
                .map(|r| format!("{}: {}", r.kind, r.detail))
                .collect();
            format!(
                "readiness: FAIL ({} of {} checks failed) [{}]",
                self.failure_count,
                self.results.len(),
                details.join("; ")
            )
        }
    }
}
