use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::TELEGRAM_API_BASE;

/// Telegram bot credentials, resolved once at startup.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramConfig {
    /// Read credentials from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`.
    ///
    /// Returns `None` when either is absent or empty, leaving the notifier in
    /// its disabled state.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        if bot_token.is_empty() || chat_id.is_empty() {
            return None;
        }
        Some(Self { bot_token, chat_id })
    }
}

/// Outcome of a delivery attempt that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Message acknowledged by the Telegram API (`ok: true`).
    Sent,
    /// Credentials missing; nothing was sent.
    NotConfigured,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Best-effort Telegram notifier. Construct with `None` to run without
/// credentials; every call then reports `Delivery::NotConfigured`.
pub struct TelegramNotifier {
    client: Client,
    config: Option<TelegramConfig>,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: Option<TelegramConfig>) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Deliver one message.
    ///
    /// Success is judged by the response body's `ok` acknowledgement, not the
    /// transport status alone; `ok: false` and transport failures are errors
    /// ("configured but delivery failed").
    pub async fn notify(&self, text: &str) -> Result<Delivery> {
        let Some(config) = &self.config else {
            warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set, dropping notification");
            return Ok(Delivery::NotConfigured);
        };

        let url = format!("{TELEGRAM_API_BASE}/bot{}/sendMessage", config.bot_token);
        let payload = SendMessageRequest {
            chat_id: &config.chat_id,
            text,
            parse_mode: "Markdown",
        };
        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("sendMessage request failed")?;

        let ack: SendMessageResponse = resp
            .json()
            .await
            .context("failed to decode sendMessage response")?;
        if !ack.ok {
            anyhow::bail!(
                "Telegram API rejected message: {}",
                ack.description.as_deref().unwrap_or("no description")
            );
        }
        Ok(Delivery::Sent)
    }
}

/// Markdown body for a newly discovered token.
pub fn format_new_token_message(address: &str) -> String {
    format!("🆕 *New Ethereum token*\n\n🔗 [Etherscan](https://etherscan.io/address/{address})")
}
