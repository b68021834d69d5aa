use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

use vmready::core::{CheckKind, CheckResult, HostInfo, ReadinessReport};

fn vmready_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vmready"));
    cmd.env("HOME", home);
    cmd.env_remove("USERPROFILE");
    cmd.env_remove("PROCESSOR_ARCHITECTURE");
    cmd.env_remove("COMPUTERNAME");
    cmd.env_remove("VMREADY_CONFIG");
    cmd.env_remove("VMREADY_OS_SUPPORTED_SKUS");
    cmd.env_remove("VMREADY_OS_SUPPORTED_EDITION_IDS");
    cmd.env_remove("VMREADY_SERVICE_PUBLISHERS");
    cmd.env_remove("VMREADY_IGNORE_CLIENT_APP");
    cmd.env_remove("VMREADY_IGNORE_VENDOR_CLIENT");
    cmd.env_remove("VMREADY_VENDOR_CLIENT_PATTERN");
    cmd.env_remove("VMREADY_LOG_PATH");
    cmd.env_remove("VMREADY_UI_COLOR");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    vmready_cmd(home).args(args).output().expect("run vmready")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home = std::env::temp_dir().join(format!("vmready-json-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

#[test]
fn report_json_shape_is_stable() {
    let report = ReadinessReport::from_results(
        HostInfo {
            computer_name: "vm-01".to_string(),
        },
        "2026-01-01T00:00:00Z".to_string(),
        vec![
            CheckResult::pass(CheckKind::Architecture, "64-bit operating system (AMD64)"),
            CheckResult::fail(
                CheckKind::Edition,
                "unsupported OS edition: EditionID=absent SKU=absent",
            ),
            CheckResult::pass(CheckKind::Services, "no conflicting services found"),
        ],
        vec!["EditionID query failed".to_string()],
    );

    let actual = serde_json::to_value(&report).expect("serialize report");
    let expected = serde_json::json!({
        "schema_version": "1.0",
        "tool_version": env!("CARGO_PKG_VERSION"),
        "host": { "computer_name": "vm-01" },
        "generated_at": "2026-01-01T00:00:00Z",
        "results": [
            {
                "kind": "architecture",
                "passed": true,
                "detail": "64-bit operating system (AMD64)"
            },
            {
                "kind": "edition",
                "passed": false,
                "detail": "unsupported OS edition: EditionID=absent SKU=absent"
            },
            {
                "kind": "services",
                "passed": true,
                "detail": "no conflicting services found"
            }
        ],
        "overall_passed": false,
        "failure_count": 1,
        "notes": ["EditionID query failed"]
    });
    assert_eq!(actual, expected);
}

#[test]
fn check_json_emits_a_consistent_report() {
    let home = make_temp_home();
    let log = home.join("run.log");
    let out = run(
        &home,
        &[
            "--json",
            "check",
            "--log-path",
            log.to_str().expect("utf8 path"),
        ],
    );

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    let results = v
        .get("results")
        .and_then(|r| r.as_array())
        .expect("results array");
    assert_eq!(results.len(), 3);

    let kinds: Vec<&str> = results
        .iter()
        .map(|r| r.get("kind").and_then(|k| k.as_str()).expect("kind"))
        .collect();
    assert_eq!(kinds, vec!["architecture", "edition", "services"]);

    let all_passed = results
        .iter()
        .all(|r| r.get("passed").and_then(|p| p.as_bool()).expect("passed"));
    let overall = v
        .get("overall_passed")
        .and_then(|p| p.as_bool())
        .expect("overall_passed");
    assert_eq!(overall, all_passed);

    let failure_count = v
        .get("failure_count")
        .and_then(|c| c.as_u64())
        .expect("failure_count");
    let failing = results
        .iter()
        .filter(|r| r.get("passed").and_then(|p| p.as_bool()) == Some(false))
        .count() as u64;
    assert_eq!(failure_count, failing);

    // exit code mirrors overall_passed
    let expected_code = if overall { 0 } else { 1 };
    assert_eq!(out.status.code(), Some(expected_code));

    let _ = std::fs::remove_dir_all(&home);
}
