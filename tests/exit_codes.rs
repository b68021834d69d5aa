use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

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
    let home = std::env::temp_dir().join(format!("vmready-exit-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

#[test]
fn completion_unknown_shell_exits_2() {
    let home = make_temp_home();
    let out = run(&home, &["completion", "nope"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn completion_bash_succeeds() {
    let home = make_temp_home();
    let out = run(&home, &["completion", "bash"]);
    assert!(out.status.success());
    assert!(!out.stdout.is_empty());
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn check_invalid_publisher_glob_exits_2() {
    let home = make_temp_home();
    let log = home.join("run.log");
    let out = run(
        &home,
        &[
            "check",
            "--publishers",
            "[",
            "--log-path",
            log.to_str().expect("utf8 path"),
        ],
    );
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn check_on_unidentifiable_host_exits_1_with_terminal_status_line() {
    let home = make_temp_home();
    let log = home.join("run.log");
    // No architecture variable and no OS metadata tooling: every identity
    // signal degrades to absent, so the run must fail, not crash.
    let out = run(
        &home,
        &["check", "--log-path", log.to_str().expect("utf8 path")],
    );
    assert_eq!(out.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let summary = stdout
        .lines()
        .find(|l| l.starts_with("readiness:"))
        .unwrap_or_else(|| panic!("no summary line in stdout: {stdout}"));
    assert!(summary.contains("FAIL"), "{summary}");
    assert!(summary.contains("architecture"), "{summary}");
    assert!(summary.contains("edition"), "{summary}");

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn quiet_check_still_prints_the_summary_line() {
    let home = make_temp_home();
    let log = home.join("run.log");
    let out = run(
        &home,
        &[
            "--quiet",
            "check",
            "--log-path",
            log.to_str().expect("utf8 path"),
        ],
    );
    assert_eq!(out.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let summary_lines: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("readiness:"))
        .collect();
    assert_eq!(summary_lines.len(), 1, "stdout={stdout}");
    // quiet suppresses the per-check lines
    assert!(!stdout.contains("[FAIL]"), "stdout={stdout}");

    let _ = std::fs::remove_dir_all(&home);
}
