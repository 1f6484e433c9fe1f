use crate::error::{CheckError, Result};
use crate::filter::FilterChain;
use crate::models::Status;
use crate::threshold::DirectionalThresholds;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    pub state: StateConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Counter snapshot read by the file-backed source.
    pub path: String,
    /// Device label; also names the sample file.
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Parallel collector connections; 0 and 1 both mean sequential.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
        }
    }
}

fn default_parallelism() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Filter chain selecting interfaces to examine. Absent = all.
    pub interfaces: Option<String>,
    /// Filter chain selecting interfaces whose checks count toward status. Absent = all.
    pub alerting: Option<String>,
    /// Utilization thresholds, percent of link speed (in/out grammar).
    #[serde(default)]
    pub bandwidth: String,
    /// Error rate thresholds, per second.
    #[serde(default)]
    pub errors: String,
    /// Discard rate thresholds, per second.
    #[serde(default)]
    pub discards: String,
    /// Unicast packet rate thresholds, packets per second.
    #[serde(default)]
    pub packets: String,
    #[serde(default = "default_status_severity")]
    pub status_severity: String,
    /// Link speed override, bits per second.
    pub speed: Option<u64>,
    #[serde(default = "default_true")]
    pub ignore_admin_down: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            interfaces: None,
            alerting: None,
            bandwidth: String::new(),
            errors: String::new(),
            discards: String::new(),
            packets: String::new(),
            status_severity: default_status_severity(),
            speed: None,
            ignore_admin_down: true,
        }
    }
}

fn default_status_severity() -> String {
    "critical".into()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Append per-counter diagnostics to the message.
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_true")]
    pub human_readable: bool,
    #[serde(default = "default_true")]
    pub metrics: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            human_readable: true,
            metrics: true,
        }
    }
}

/// Parsed, immutable check settings built once from `CheckConfig` + `ReportConfig`.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub host: String,
    pub state_file: PathBuf,
    pub parallelism: usize,
    pub interfaces: FilterChain,
    pub alerting: FilterChain,
    pub bandwidth: DirectionalThresholds,
    pub errors: DirectionalThresholds,
    pub discards: DirectionalThresholds,
    pub packets: DirectionalThresholds,
    pub status_severity: Status,
    pub speed_override: Option<u64>,
    pub ignore_admin_down: bool,
    pub verbose: bool,
    pub human_readable: bool,
    pub metrics: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "ifcheck.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| CheckError::config(format!("{}: {}", path, e)))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(s).map_err(|e| CheckError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure(!self.source.path.is_empty(), "source.path must be non-empty")?;
        ensure(!self.source.host.is_empty(), "source.host must be non-empty")?;
        ensure(!self.state.dir.is_empty(), "state.dir must be non-empty")?;
        ensure(
            self.collection.parallelism <= 256,
            format!(
                "collection.parallelism must be <= 256, got {}",
                self.collection.parallelism
            ),
        )?;
        ensure(
            self.check.speed != Some(0),
            "check.speed must be > 0 when set",
        )?;
        Ok(())
    }

    /// Parse every threshold and filter once; malformed text is a configuration error.
    pub fn check_settings(&self) -> Result<CheckSettings> {
        let field = |name: &str, e: CheckError| match e {
            CheckError::Configuration(msg) => CheckError::config(format!("check.{}: {}", name, msg)),
            other => other,
        };
        let check = &self.check;
        let status_severity = Status::from_name(&check.status_severity)
            .filter(|s| *s != Status::Ok)
            .ok_or_else(|| {
                CheckError::config(format!(
                    "check.status_severity must be warning, critical or unknown, got '{}'",
                    check.status_severity
                ))
            })?;
        Ok(CheckSettings {
            host: self.source.host.clone(),
            state_file: crate::sample_store::SampleStore::for_host(&self.state.dir, &self.source.host)
                .path()
                .to_path_buf(),
            parallelism: self.collection.parallelism.max(1),
            interfaces: FilterChain::from_config(check.interfaces.as_deref())
                .map_err(|e| field("interfaces", e))?,
            alerting: FilterChain::from_config(check.alerting.as_deref())
                .map_err(|e| field("alerting", e))?,
            bandwidth: DirectionalThresholds::parse(&check.bandwidth)
                .map_err(|e| field("bandwidth", e))?,
            errors: DirectionalThresholds::parse(&check.errors).map_err(|e| field("errors", e))?,
            discards: DirectionalThresholds::parse(&check.discards)
                .map_err(|e| field("discards", e))?,
            packets: DirectionalThresholds::parse(&check.packets)
                .map_err(|e| field("packets", e))?,
            status_severity,
            speed_override: check.speed,
            ignore_admin_down: check.ignore_admin_down,
            verbose: self.report.verbose,
            human_readable: self.report.human_readable,
            metrics: self.report.metrics,
        })
    }
}

fn ensure(cond: bool, msg: impl Into<String>) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(CheckError::config(msg))
    }
}
