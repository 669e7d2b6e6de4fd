/// REST client for the chat backend
///
/// Two endpoints:
///   GET  /api/users   -> JSON array of {id, username}
///   POST /api/chat    body: {userId, recipientId, message}, response ignored
use crate::directory::Peer;
use crate::dispatch::OutboundMessage;
use crate::error::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire shape of POST /api/chat
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    user_id: &'a str,
    recipient_id: &'a str,
    message: &'a str,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the peer directory
    pub async fn list_users(&self) -> Result<Vec<Peer>> {
        let url = format!("{}/api/users", self.base_url);
        debug!("GET {}", url);

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let peers: Vec<Peer> = serde_json::from_str(&body)?;
        Ok(peers)
    }

    /// Deliver one message; the response body is ignored
    pub async fn send_message(&self, msg: &OutboundMessage) -> Result<()> {
        let url = format!("{}/api/chat", self.base_url);
        debug!("POST {} -> {}", url, msg.recipient_id);

        let request = ChatRequest {
            user_id: &msg.sender_id,
            recipient_id: &msg.recipient_id,
            message: &msg.body,
        };

        self.http
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
