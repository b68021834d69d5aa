use std::collections::BTreeSet;

use anyhow::Result;

use crate::config::EffectiveConfig;

pub mod architecture;
pub mod edition;
pub mod services;

pub use services::ConflictRules;

/// The compiled rule configuration one validation run evaluates against.
///
/// Supported SKU/edition sets are caller-supplied so that new OS releases are
/// a configuration update, not a code change.
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub supported_skus: BTreeSet<u32>,
    pub supported_edition_ids: BTreeSet<String>,
    pub conflicts: ConflictRules,
}

impl Ruleset {
    pub fn from_config(cfg: &EffectiveConfig) -> Result<Self> {
        let conflicts = ConflictRules::new(
            &cfg.services.publishers,
            cfg.services.ignore_client_app,
            cfg.services
                .ignore_vendor_client
                .then_some(cfg.services.vendor_client_pattern.as_str()),
        )?;
        Ok(Self {
            supported_skus: cfg.os.supported_skus.iter().copied().collect(),
            supported_edition_ids: cfg.os.supported_edition_ids.iter().cloned().collect(),
            conflicts,
        })
    }
}
