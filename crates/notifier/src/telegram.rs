use async_trait::async_trait;
use indexpush_transport::{HttpRequest, HttpTransport};
use std::sync::Arc;
use tracing::debug;

use crate::{NotifyError, ReportSink};

pub const TELEGRAM_API: &str = "https://api.telegram.org";

/// Delivers the report through a Telegram bot's `sendMessage`
pub struct TelegramSink {
    transport: Arc<dyn HttpTransport>,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramSink {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_base: TELEGRAM_API.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl ReportSink for TelegramSink {
    async fn deliver(&self, report: &str) -> Result<(), NotifyError> {
        let request = HttpRequest::post(self.send_message_url()).form(vec![
            ("chat_id".to_string(), self.chat_id.clone()),
            ("text".to_string(), report.to_string()),
        ]);

        let response = self.transport.send(request).await?;
        if !response.is_ok() {
            return Err(NotifyError::Rejected(response.status));
        }

        debug!(chat_id = %self.chat_id, "Report delivered");
        Ok(())
    }
}
