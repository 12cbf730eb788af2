//! Remote key-value storage tier.

use crate::backend::MemoryBackend;
use crate::error::MemoryError;
use crate::model::ConversationMemory;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;

/// Logical key the aggregate is stored under.
const MEMORY_KEY: &str = "conversation-memory";

/// Remote tier speaking the Redis REST protocol.
///
/// The service exposes `GET {base}/get/{key}` and `POST {base}/set/{key}`
/// authenticated with a bearer token; values are opaque strings, so the
/// aggregate travels as its JSON serialization.
pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

/// Response envelope returned by the REST store.
#[derive(Debug, Deserialize)]
struct RestResult {
    result: Option<String>,
}

impl RemoteBackend {
    /// Create a remote tier for the given endpoint and bearer token.
    ///
    /// The timeout bounds every request to the store; an expired request
    /// surfaces as an error so the chain can fall to the next tier.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, MemoryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        info!("initialized remote backend (url={base_url})");
        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl MemoryBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self) -> Result<Option<ConversationMemory>, MemoryError> {
        let url = format!("{}/get/{MEMORY_KEY}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MemoryError::RemoteStatus(response.status().as_u16()));
        }
        let envelope: RestResult = response.json().await?;
        let Some(raw) = envelope.result else {
            return Ok(None);
        };
        let memory: ConversationMemory = serde_json::from_str(&raw)?;
        debug!("loaded memory from remote (turns={})", memory.turns.len());
        Ok(Some(memory))
    }

    async fn store(&self, memory: &ConversationMemory) -> Result<(), MemoryError> {
        let url = format!("{}/set/{MEMORY_KEY}", self.base_url);
        let raw = serde_json::to_string(memory)?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .body(raw)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MemoryError::RemoteStatus(response.status().as_u16()));
        }
        debug!(
            "stored memory to remote (turns={}, total={})",
            memory.turns.len(),
            memory.total_turns
        );
        Ok(())
    }
}
