// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::check::MAX_TIMEOUT_SECS;

/// Upper bound on concurrent probes per cycle.
pub const MAX_CONCURRENCY: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("scheduler.interval_secs must be at least 1")]
    ZeroInterval,

    #[error("scheduler.max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("scheduler.max_concurrency must be at most 4096, got {0}")]
    ConcurrencyTooHigh(usize),

    #[error("probe.max_timeout_secs must be between 1 and 60, got {0}")]
    ProbeTimeoutOutOfRange(u64),

    #[error("metrics.port must be non-zero when metrics are enabled")]
    MetricsPort,

    #[error("notifications.{channel}: {reason}")]
    Channel {
        channel: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.scheduler.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.scheduler.max_concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::ConcurrencyTooHigh(
                self.scheduler.max_concurrency,
            ));
        }
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.probe.max_timeout_secs) {
            return Err(ConfigError::ProbeTimeoutOutOfRange(
                self.probe.max_timeout_secs,
            ));
        }
        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::MetricsPort);
        }
        if let Some(sms) = &self.notifications.sms {
            if sms.account_sid.is_empty() || sms.auth_token.is_empty() {
                return Err(ConfigError::Channel {
                    channel: "sms",
                    reason: "account_sid and auth_token are required".to_string(),
                });
            }
            if sms.from_phone.is_empty() {
                return Err(ConfigError::Channel {
                    channel: "sms",
                    reason: "from_phone is required".to_string(),
                });
            }
        }
        if let Some(mail) = &self.notifications.mail {
            if mail.from.is_empty() {
                return Err(ConfigError::Channel {
                    channel: "mail",
                    reason: "from is required".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_concurrency: default_max_concurrency(),
            run_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_max_timeout_secs")]
    pub max_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn max_timeout(&self) -> Duration {
        Duration::from_secs(self.max_timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_timeout_secs: default_max_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub checks_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub log_alerts: bool,
    #[serde(default)]
    pub sms: Option<SmsConfig>,
    #[serde(default)]
    pub mail: Option<MailConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            log_alerts: true,
            sms: None,
            mail: None,
        }
    }
}

/// Twilio-compatible SMS gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_phone: String,
    /// Prepended to phone numbers that do not start with `+`.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    #[serde(default = "default_channel_timeout_secs")]
    pub timeout_secs: u64,
}

impl SmsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP mail relay accepting a JSON message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub endpoint: url::Url,
    #[serde(default)]
    pub api_key: Option<String>,
    pub from: String,
    #[serde(default)]
    pub subject_prefix: Option<String>,
    #[serde(default = "default_channel_timeout_secs")]
    pub timeout_secs: u64,
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    60
}

fn default_max_concurrency() -> usize {
    64
}

fn default_max_timeout_secs() -> u64 {
    MAX_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    concat!("endpoint-monitor/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_sms_api_base() -> String {
    "https://api.twilio.com".to_string()
}

fn default_country_code() -> String {
    "+91".to_string()
}

fn default_channel_timeout_secs() -> u64 {
    10
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}
