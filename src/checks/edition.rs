use std::collections::BTreeSet;

use crate::core::{CheckKind, CheckResult, OsFingerprint};

/// Classifies the OS edition from two redundant identification signals.
///
/// Precedence, first match wins:
/// 1. non-empty `edition_id` contained in `supported_edition_ids` (exact);
/// 2. `sku` present and contained in `supported_skus`;
/// 3. otherwise fail, reporting both observed signals.
///
/// Edition identifiers are stable across localized builds; the numeric SKU is
/// the fallback for images where the registry lookup failed. An absent signal
/// never decides the outcome on its own.
pub fn evaluate(
    fp: &OsFingerprint,
    supported_skus: &BTreeSet<u32>,
    supported_edition_ids: &BTreeSet<String>,
) -> CheckResult {
    if !fp.edition_id.is_empty() && supported_edition_ids.contains(&fp.edition_id) {
        return CheckResult::pass(
            CheckKind::Edition,
            format!("supported edition: {}", fp.edition_id),
        );
    }

    if let Some(sku) = fp.sku {
        if supported_skus.contains(&sku) {
            return CheckResult::pass(CheckKind::Edition, format!("supported OS SKU: {sku}"));
        }
    }

    let edition = if fp.edition_id.is_empty() {
        "absent".to_string()
    } else {
        format!("\"{}\"", fp.edition_id)
    };
    let sku = match fp.sku {
        Some(sku) => sku.to_string(),
        None => "absent".to_string(),
    };
    let caption = if fp.caption.is_empty() {
        String::new()
    } else {
        format!(" caption=\"{}\"", fp.caption)
    };
    CheckResult::fail(
        CheckKind::Edition,
        format!("unsupported OS edition: EditionID={edition} SKU={sku}{caption}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skus() -> BTreeSet<u32> {
        [4, 48, 175].into_iter().collect()
    }

    fn editions() -> BTreeSet<String> {
        ["Enterprise", "ServerStandard"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn fp(edition_id: &str, sku: Option<u32>) -> OsFingerprint {
        OsFingerprint {
            architecture: "AMD64".to_string(),
            sku,
            edition_id: edition_id.to_string(),
            caption: "Microsoft Windows 10 Enterprise".to_string(),
        }
    }

    #[test]
    fn supported_edition_id_passes_regardless_of_sku() {
        for sku in [None, Some(0), Some(4), Some(999)] {
            let result = evaluate(&fp("Enterprise", sku), &skus(), &editions());
            assert!(result.passed, "expected pass for sku={sku:?}");
        }
    }

    #[test]
    fn supported_sku_passes_when_edition_id_unknown_or_absent() {
        for edition in ["", "Core", "CloudEdition"] {
            let result = evaluate(&fp(edition, Some(4)), &skus(), &editions());
            assert!(result.passed, "expected pass for edition={edition:?}");
        }
    }

    #[test]
    fn neither_signal_supported_fails_with_both_observed_values() {
        let result = evaluate(&fp("Core", Some(101)), &skus(), &editions());
        assert!(!result.passed);
        assert!(result.detail.contains("Core"), "{}", result.detail);
        assert!(result.detail.contains("101"), "{}", result.detail);
    }

    #[test]
    fn both_signals_absent_fails() {
        let result = evaluate(&fp("", None), &skus(), &editions());
        assert!(!result.passed);
        assert!(result.detail.contains("EditionID=absent"), "{}", result.detail);
        assert!(result.detail.contains("SKU=absent"), "{}", result.detail);
    }

    #[test]
    fn edition_id_match_is_exact_and_case_sensitive() {
        let result = evaluate(&fp("enterprise", None), &skus(), &editions());
        assert!(!result.passed);
    }

    #[test]
    fn fail_message_includes_caption_when_present() {
        let result = evaluate(&fp("Core", None), &skus(), &editions());
        assert!(
            result.detail.contains("Microsoft Windows 10 Enterprise"),
            "{}",
            result.detail
        );
    }
}
