use serde::{Deserialize, Serialize};

/// Point-in-time OS identification snapshot, collected once per run.
///
/// A failed collaborator query degrades the corresponding field to its
/// absent form (`sku: None`, empty `edition_id`) rather than aborting the
/// run; the other signals may still carry the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsFingerprint {
    pub architecture: String,
    pub sku: Option<u32>,
    pub edition_id: String,
    pub caption: String,
}
