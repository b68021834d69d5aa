//! Inventory queries against the Windows guest, via the stock console tools
//! (`wmic`, `reg`, `sc`) so no service needs to be preinstalled on the image.
//!
//! Every query degrades on failure: the corresponding fingerprint field
//! becomes absent and an informational note is recorded. The run itself is
//! never aborted by a collaborator failure.

use std::time::Duration;

use crate::core::{OsFingerprint, ServiceRecord};
use crate::platform::run_command;

const CURRENT_VERSION_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// Everything one validation run collects from the guest, plus the notes
/// describing which signals could not be observed.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub fingerprint: OsFingerprint,
    pub services: Vec<ServiceRecord>,
    pub notes: Vec<String>,
}

pub fn collect(timeout: Duration) -> Inventory {
    let mut notes = Vec::new();

    let architecture = std::env::var("PROCESSOR_ARCHITECTURE").unwrap_or_default();
    if architecture.is_empty() {
        notes.push("PROCESSOR_ARCHITECTURE is not set; architecture treated as absent".to_string());
    }

    let (sku, caption) = match query_sku_and_caption(timeout) {
        Ok(pair) => pair,
        Err(err) => {
            notes.push(format!("OS SKU query failed ({err}); SKU and caption treated as absent"));
            (None, String::new())
        }
    };

    let edition_id = match query_edition_id(timeout) {
        Ok(edition_id) => edition_id,
        Err(err) => {
            notes.push(format!("EditionID query failed ({err}); edition treated as absent"));
            String::new()
        }
    };

    let services = match query_services(timeout) {
        Ok(services) => services,
        Err(err) => {
            notes.push(format!(
                "service list query failed ({err}); conflict scan reports a lower bound"
            ));
            Vec::new()
        }
    };

    Inventory {
        fingerprint: OsFingerprint {
            architecture,
            sku,
            edition_id,
            caption,
        },
        services,
        notes,
    }
}

fn query_sku_and_caption(timeout: Duration) -> anyhow::Result<(Option<u32>, String)> {
    let out = run_command(
        "wmic",
        &["os", "get", "OperatingSystemSKU,Caption", "/value"],
        timeout,
    )?;
    if out.exit_code != 0 {
        anyhow::bail!("wmic exited with code {}", out.exit_code);
    }
    Ok(parse_wmic_os_values(&out.stdout))
}

fn query_edition_id(timeout: Duration) -> anyhow::Result<String> {
    let out = run_command(
        "reg",
        &["query", CURRENT_VERSION_KEY, "/v", "EditionID"],
        timeout,
    )?;
    if out.exit_code != 0 {
        anyhow::bail!("reg exited with code {}", out.exit_code);
    }
    Ok(parse_reg_sz_value(&out.stdout, "EditionID").unwrap_or_default())
}

fn query_services(timeout: Duration) -> anyhow::Result<Vec<ServiceRecord>> {
    let out = run_command(
        "sc",
        &["query", "type=", "service", "state=", "all"],
        timeout,
    )?;
    if out.exit_code != 0 {
        anyhow::bail!("sc exited with code {}", out.exit_code);
    }
    Ok(parse_sc_query_output(&out.stdout))
}

/// Parses `wmic os get ... /value` output: `KEY=value` lines with blank
/// padding lines around them.
fn parse_wmic_os_values(stdout: &str) -> (Option<u32>, String) {
    let mut sku = None;
    let mut caption = String::new();
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("OperatingSystemSKU=") {
            sku = value.trim().parse::<u32>().ok();
        } else if let Some(value) = line.strip_prefix("Caption=") {
            caption = value.trim().to_string();
        }
    }
    (sku, caption)
}

/// Extracts a `REG_SZ` value from `reg query` output, e.g.
/// `    EditionID    REG_SZ    Enterprise`.
fn parse_reg_sz_value(stdout: &str, value_name: &str) -> Option<String> {
    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some(value_name) {
            continue;
        }
        if fields.next() != Some("REG_SZ") {
            continue;
        }
        let rest: Vec<&str> = fields.collect();
        if rest.is_empty() {
            return Some(String::new());
        }
        return Some(rest.join(" "));
    }
    None
}

/// Parses `sc query` output into service records. Records are delimited by
/// `SERVICE_NAME:` lines, each optionally followed by a `DISPLAY_NAME:` line.
fn parse_sc_query_output(stdout: &str) -> Vec<ServiceRecord> {
    let mut services = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(name) = line.strip_prefix("SERVICE_NAME:") {
            services.push(ServiceRecord::new(name.trim(), ""));
        } else if let Some(display_name) = line.strip_prefix("DISPLAY_NAME:") {
            if let Some(last) = services.last_mut() {
                if last.display_name.is_empty() {
                    last.display_name = display_name.trim().to_string();
                }
            }
        }
    }
    services
}
