use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::checks::{self, Ruleset};
use crate::core::{HostInfo, OsFingerprint, ReadinessReport, ServiceRecord};
use crate::platform;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub timeout: Duration,
}

/// Collects the guest inventory and applies the ruleset. The sole entry
/// point the CLI shell invokes for a validation run.
pub struct Engine {
    opts: EngineOptions,
    ruleset: Ruleset,
}

impl Engine {
    pub fn new(opts: EngineOptions, ruleset: Ruleset) -> Self {
        Self { opts, ruleset }
    }

    pub fn check(&self) -> ReadinessReport {
        // Per-query cap; one slow collaborator must not consume the run.
        let query_timeout = std::cmp::min(self.opts.timeout, Duration::from_secs(8));
        let inventory = platform::windows::collect(query_timeout);
        evaluate(
            &inventory.fingerprint,
            &inventory.services,
            &self.ruleset,
            platform::host_info(),
            inventory.notes,
        )
    }
}

/// Runs every check unconditionally, in the fixed report order. A failing
/// architecture check must not suppress the service scan: the report always
/// reflects the complete checklist.
pub fn evaluate(
    fp: &OsFingerprint,
    services: &[ServiceRecord],
    ruleset: &Ruleset,
    host: HostInfo,
    mut notes: Vec<String>,
) -> ReadinessReport {
    let results = vec![
        checks::architecture::evaluate(&fp.architecture),
        checks::edition::evaluate(fp, &ruleset.supported_skus, &ruleset.supported_edition_ids),
        ruleset.conflicts.evaluate(services),
    ];

    notes.sort();
    notes.dedup();

    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    ReadinessReport::from_results(host, generated_at, results, notes)
}
