// src/config.rs
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::profile::{self, ProfileKind, ReportProfile, DEFAULT_TEST_CHANNEL};
use crate::routing::{ChannelMap, ChannelMapError};

pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is missing")]
    MissingEnvVar(&'static str),
    #[error("{var} is not a valid webhook URL: {reason}")]
    InvalidWebhookUrl { var: &'static str, reason: String },
    #[error("Invalid channel mapping ({origin}): {source}")]
    ChannelMap {
        origin: &'static str,
        #[source]
        source: ChannelMapError,
    },
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
}

// Raw environment, deserialized by envy (SLACK_WEBHOOK_URL -> slack_webhook_url)
#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    slack_webhook_url: Option<String>,
    slack_webhook_url_in: Option<String>,
    leavebot_department_channels: Option<String>,
    leavebot_office_channels: Option<String>,
    leavebot_test_channel: Option<String>,
    leavebot_fallback_channel: Option<String>,
    leavebot_webhook_timeout_secs: Option<u64>,
}

/// Settings for one run, resolved for the selected profile.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub profile: ReportProfile,
    webhook_var: &'static str,
    webhook_url: Option<String>,
    pub webhook_timeout: Duration,
}

impl AppConfig {
    pub fn from_env(kind: ProfileKind) -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();
        Self::from_env_config(kind, envy::from_env::<EnvConfig>()?)
    }

    pub fn from_vars<I>(kind: ProfileKind, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::from_env_config(kind, envy::from_iter::<_, EnvConfig>(vars)?)
    }

    fn from_env_config(kind: ProfileKind, env: EnvConfig) -> Result<Self, ConfigError> {
        let fallback_channel = non_empty(env.leavebot_fallback_channel);

        let (profile, webhook_var, webhook_url) = match kind {
            ProfileKind::Generic => {
                let map = channel_map(
                    env.leavebot_department_channels,
                    "LEAVEBOT_DEPARTMENT_CHANNELS",
                    profile::default_department_map,
                )?;
                (
                    ReportProfile::generic(map, fallback_channel),
                    "SLACK_WEBHOOK_URL",
                    env.slack_webhook_url,
                )
            }
            ProfileKind::Test => {
                let channel = non_empty(env.leavebot_test_channel)
                    .unwrap_or_else(|| DEFAULT_TEST_CHANNEL.to_string());
                (
                    ReportProfile::test(channel),
                    "SLACK_WEBHOOK_URL",
                    env.slack_webhook_url,
                )
            }
            ProfileKind::Pune => {
                let map = channel_map(
                    env.leavebot_office_channels,
                    "LEAVEBOT_OFFICE_CHANNELS",
                    profile::default_office_map,
                )?;
                (
                    ReportProfile::pune(map, fallback_channel),
                    "SLACK_WEBHOOK_URL_IN",
                    env.slack_webhook_url_in,
                )
            }
        };

        let webhook_timeout = Duration::from_secs(
            env.leavebot_webhook_timeout_secs
                .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT_SECS),
        );

        Ok(Self {
            profile,
            webhook_var,
            webhook_url: non_empty(webhook_url),
            webhook_timeout,
        })
    }

    /// The profile's webhook, validated as an absolute http(s) URL.
    pub fn webhook_url(&self) -> Result<&str, ConfigError> {
        let raw = self
            .webhook_url
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar(self.webhook_var))?;

        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidWebhookUrl {
            var: self.webhook_var,
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidWebhookUrl {
                var: self.webhook_var,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(raw)
    }

    pub fn webhook_var(&self) -> &'static str {
        self.webhook_var
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn channel_map(
    override_map: Option<String>,
    var: &'static str,
    default: fn() -> Result<ChannelMap, ChannelMapError>,
) -> Result<ChannelMap, ConfigError> {
    match non_empty(override_map) {
        Some(raw) => ChannelMap::parse(&raw).map_err(|source| ConfigError::ChannelMap {
            origin: var,
            source,
        }),
        None => default().map_err(|source| ConfigError::ChannelMap {
            origin: "built-in defaults",
            source,
        }),
    }
}
