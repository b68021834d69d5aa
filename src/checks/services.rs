use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};

use crate::core::{CheckKind, CheckResult, ServiceRecord};

/// Publisher patterns for vendors whose agents conflict with the target
/// image. Used when the caller supplies none.
pub const DEFAULT_PUBLISHER_PATTERNS: &[&str] = &["Citrix*", "VMware*", "Parallels*"];

/// First-party client-app services that match a publisher pattern but are not
/// agents. Removed from the conflict set when `ignore_client_app` is enabled.
pub const CLIENT_APP_SERVICE_NAMES: &[&str] = &["CtxPkm", "CWAUpdaterService"];

/// Vendor-client product pattern used by the second exclusion axis.
pub const VENDOR_CLIENT_PATTERN: &str = "Citrix Workspace*";

/// Compiled conflict-scan rules. Glob compilation happens once here so that
/// invalid patterns are rejected up front and `evaluate` is total.
#[derive(Debug, Clone)]
pub struct ConflictRules {
    patterns: Vec<GlobMatcher>,
    exclude_names: Option<BTreeSet<String>>,
    exclude_pattern: Option<GlobMatcher>,
}

impl ConflictRules {
    pub fn new(
        publishers: &[String],
        ignore_client_app: bool,
        vendor_client_pattern: Option<&str>,
    ) -> Result<Self> {
        let mut patterns = Vec::with_capacity(publishers.len());
        for pat in publishers {
            patterns.push(compile_pattern(pat)?);
        }

        let exclude_names = ignore_client_app.then(|| {
            CLIENT_APP_SERVICE_NAMES
                .iter()
                .map(|name| name.to_ascii_lowercase())
                .collect()
        });

        let exclude_pattern = match vendor_client_pattern {
            Some(pat) => Some(compile_pattern(pat)?),
            None => None,
        };

        Ok(Self {
            patterns,
            exclude_names,
            exclude_pattern,
        })
    }

    /// Scans the installed services for conflicting agents.
    ///
    /// A service matches when its name or display name matches any publisher
    /// pattern; matches are deduplicated by service name, exclusions applied,
    /// and the remainder reported sorted by display name.
    pub fn evaluate(&self, services: &[ServiceRecord]) -> CheckResult {
        let mut matched: BTreeMap<String, &ServiceRecord> = BTreeMap::new();
        for service in services {
            for pattern in &self.patterns {
                if pattern.is_match(&service.name) || pattern.is_match(&service.display_name) {
                    matched.entry(service.name.to_ascii_lowercase()).or_insert(service);
                    break;
                }
            }
        }

        if let Some(exclude_names) = &self.exclude_names {
            matched.retain(|name, _| !exclude_names.contains(name));
        }

        if let Some(exclude) = &self.exclude_pattern {
            matched.retain(|_, service| {
                !exclude.is_match(&service.name) && !exclude.is_match(&service.display_name)
            });
        }

        if matched.is_empty() {
            return CheckResult::pass(CheckKind::Services, "no conflicting services found");
        }

        let display_names: BTreeSet<String> = matched
            .values()
            .map(|service| {
                if service.display_name.is_empty() {
                    service.name.clone()
                } else {
                    service.display_name.clone()
                }
            })
            .collect();
        let listed: Vec<&str> = display_names.iter().map(String::as_str).collect();
        CheckResult::fail(
            CheckKind::Services,
            format!("conflicting services found: {}", listed.join(", ")),
        )
    }
}

pub fn default_publishers() -> Vec<String> {
    DEFAULT_PUBLISHER_PATTERNS
        .iter()
        .map(|pat| pat.to_string())
        .collect()
}

fn compile_pattern(pat: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pat)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("invalid publisher glob: {pat}"))?;
    Ok(glob.compile_matcher())
}
