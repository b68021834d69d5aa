mod check;
mod fingerprint;
mod report;
mod service;

pub use check::{CheckKind, CheckResult};
pub use fingerprint::OsFingerprint;
pub use report::{HostInfo, ReadinessReport};
pub use service::ServiceRecord;
