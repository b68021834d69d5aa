use crate::core::{CheckKind, CheckResult};

/// Processor architecture token reported by 64-bit Windows guests.
pub const ARCH_64BIT: &str = "AMD64";

/// Passes iff `architecture` is exactly the 64-bit token (case-sensitive).
/// Any other value, including an empty string, is a failing result, never an
/// error.
pub fn evaluate(architecture: &str) -> CheckResult {
    if architecture == ARCH_64BIT {
        return CheckResult::pass(
            CheckKind::Architecture,
            format!("64-bit operating system ({ARCH_64BIT})"),
        );
    }

    let observed = if architecture.is_empty() {
        "not reported".to_string()
    } else {
        format!("\"{architecture}\"")
    };
    CheckResult::fail(
        CheckKind::Architecture,
        format!("unsupported processor architecture: {observed} (requires {ARCH_64BIT})"),
    )
}
