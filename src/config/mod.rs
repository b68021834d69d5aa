use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::checks::services::{VENDOR_CLIENT_PATTERN, default_publishers};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub os: OsConfig,
    pub services: ServicesConfig,
    pub log: LogConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OsConfig {
    pub supported_skus: Vec<u32>,
    pub supported_edition_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicesConfig {
    pub publishers: Vec<String>,
    pub ignore_client_app: bool,
    pub ignore_vendor_client: bool,
    pub vendor_client_pattern: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            os: OsConfig {
                // OperatingSystemSKU values for the editions eligible for
                // virtual desktop image conversion.
                supported_skus: vec![4, 27, 48, 49, 125, 126, 161, 162, 175],
                supported_edition_ids: vec![
                    "Enterprise".to_string(),
                    "EnterpriseN".to_string(),
                    "Professional".to_string(),
                    "ProfessionalN".to_string(),
                    "ServerStandard".to_string(),
                    "ServerDatacenter".to_string(),
                ],
            },
            services: ServicesConfig {
                publishers: default_publishers(),
                ignore_client_app: false,
                ignore_vendor_client: false,
                vendor_client_pattern: VENDOR_CLIENT_PATTERN.to_string(),
            },
            log: LogConfig {
                path: default_log_path(),
            },
            ui: UiConfig { color: true },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    os: Option<RawOsConfig>,
    services: Option<RawServicesConfig>,
    log: Option<RawLogConfig>,
    ui: Option<RawUiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawOsConfig {
    supported_skus: Option<Vec<u32>>,
    supported_edition_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawServicesConfig {
    publishers: Option<Vec<String>>,
    ignore_client_app: Option<bool>,
    ignore_vendor_client: Option<bool>,
    vendor_client_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLogConfig {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/vmready/config.toml")
}

/// Well-known one-shot log location an orchestrator can collect without
/// further configuration.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("vmready-validation.log")
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(os) = raw.os {
        if let Some(supported_skus) = os.supported_skus {
            cfg.os.supported_skus = supported_skus;
        }
        if let Some(supported_edition_ids) = os.supported_edition_ids {
            cfg.os.supported_edition_ids = supported_edition_ids;
        }
    }

    if let Some(services) = raw.services {
        if let Some(publishers) = services.publishers {
            cfg.services.publishers = publishers;
        }
        if let Some(ignore_client_app) = services.ignore_client_app {
            cfg.services.ignore_client_app = ignore_client_app;
        }
        if let Some(ignore_vendor_client) = services.ignore_vendor_client {
            cfg.services.ignore_vendor_client = ignore_vendor_client;
        }
        if let Some(vendor_client_pattern) = services.vendor_client_pattern {
            cfg.services.vendor_client_pattern = vendor_client_pattern;
        }
    }

    if let Some(log) = raw.log {
        if let Some(path) = log.path {
            cfg.log.path = path;
        }
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("VMREADY_OS_SUPPORTED_SKUS") {
        let skus: Result<Vec<u32>> = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().with_context(|| "VMREADY_OS_SUPPORTED_SKUS"))
            .collect();
        let skus = skus?;
        if !skus.is_empty() {
            cfg.os.supported_skus = skus;
        }
    }
    if let Ok(v) = std::env::var("VMREADY_OS_SUPPORTED_EDITION_IDS") {
        let ids = parse_list(&v);
        if !ids.is_empty() {
            cfg.os.supported_edition_ids = ids;
        }
    }
    if let Ok(v) = std::env::var("VMREADY_SERVICE_PUBLISHERS") {
        let publishers = parse_list(&v);
        if !publishers.is_empty() {
            cfg.services.publishers = publishers;
        }
    }
    if let Ok(v) = std::env::var("VMREADY_IGNORE_CLIENT_APP") {
        cfg.services.ignore_client_app = parse_bool(&v).with_context(|| "VMREADY_IGNORE_CLIENT_APP")?;
    }
    if let Ok(v) = std::env::var("VMREADY_IGNORE_VENDOR_CLIENT") {
        cfg.services.ignore_vendor_client =
            parse_bool(&v).with_context(|| "VMREADY_IGNORE_VENDOR_CLIENT")?;
    }
    if let Ok(v) = std::env::var("VMREADY_VENDOR_CLIENT_PATTERN") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.services.vendor_client_pattern = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("VMREADY_LOG_PATH") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.log.path = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("VMREADY_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "VMREADY_UI_COLOR")?;
    }

    Ok(())
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
