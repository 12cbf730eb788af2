//! Conversation memory store enforcing the window invariants.

use crate::chain::BackendChain;
use crate::model::{ConversationMemory, DEFAULT_MAX_TURNS, Role, Turn};
use chrono::Utc;
use log::{debug, info};
use tokio::sync::Mutex;

/// Append/load facade over the backend chain.
///
/// Appends within one process are serialized behind a single token, so two
/// concurrent read-modify-write cycles cannot lose an update. Loads are not
/// serialized and may observe a pre- or post-append snapshot.
pub struct MemoryStore {
    chain: BackendChain,
    max_turns: usize,
    append_token: Mutex<()>,
}

impl MemoryStore {
    /// Create a store over the given chain with the default window cap.
    pub fn new(chain: BackendChain) -> Self {
        Self::with_max_turns(chain, DEFAULT_MAX_TURNS)
    }

    /// Create a store with an explicit window cap.
    pub fn with_max_turns(chain: BackendChain, max_turns: usize) -> Self {
        Self {
            chain,
            max_turns,
            append_token: Mutex::new(()),
        }
    }

    /// Append one turn and return the updated aggregate.
    ///
    /// Always succeeds from the caller's perspective: the in-process cache
    /// holds the update even when every durable tier fails. Role and text
    /// validation is the caller's responsibility.
    pub async fn append_turn(&self, role: Role, text: impl Into<String>) -> ConversationMemory {
        let _guard = self.append_token.lock().await;
        let mut memory = self.chain.read().await;
        memory.turns.push(Turn {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });
        memory.total_turns += 1;
        if memory.turns.len() > self.max_turns {
            let overflow = memory.turns.len() - self.max_turns;
            memory.turns.drain(..overflow);
            memory.trimmed_at = Some(Utc::now());
            debug!(
                "trimmed memory window (removed={overflow}, kept={})",
                memory.turns.len()
            );
        }
        self.chain.write(&memory).await;
        info!(
            "appended {role} turn (total={}, stored={})",
            memory.total_turns,
            memory.turns.len()
        );
        memory
    }

    /// Load the aggregate, optionally narrowed to the most recent `limit`
    /// turns. Never mutates.
    pub async fn load(&self, limit: Option<usize>) -> ConversationMemory {
        let memory = self.chain.read().await;
        if let Some(limit) = limit
            && limit < memory.turns.len()
        {
            let start = memory.turns.len() - limit;
            return ConversationMemory {
                turns: memory.turns[start..].to_vec(),
                ..memory
            };
        }
        memory
    }
}
