// src/notifier.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

//=============================================================================
// Error types
//=============================================================================

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Slack webhook error: {status} - {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

//=============================================================================
// Notifier
//=============================================================================

/// Delivers one rendered report to a channel.
#[async_trait]
pub trait Notifier {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), NotificationError>;
}

// Incoming-webhook payload
#[derive(Debug, Serialize)]
pub struct SlackPayload<'a> {
    pub text: &'a str,
    pub channel: &'a str,
}

//=============================================================================
// Slack Notifier
//=============================================================================

pub struct SlackWebhookNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackWebhookNotifier {
    pub fn new(webhook_url: String, timeout: Option<Duration>) -> Result<Self, NotificationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for SlackWebhookNotifier {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        let payload = SlackPayload { text, channel };

        info!("Sending to Slack channel {}", channel);
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        // Check if the request was successful
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(NotificationError::Rejected { status, body });
        }

        Ok(())
    }
}

//=============================================================================
// Dry-run Notifier
//=============================================================================

/// Logs the report instead of sending it.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        info!(
            "[dry run] Report for {}:\n{}",
            channel,
            text
        );
        Ok(())
    }
}
