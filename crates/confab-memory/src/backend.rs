//! Storage backend abstraction used by the fallback chain.

use crate::error::MemoryError;
use crate::model::ConversationMemory;
use async_trait::async_trait;

#[async_trait]
/// A durable storage tier for the conversation aggregate.
///
/// Every tier stores the same serialized aggregate shape; the chain decides
/// which tier handles a given operation.
pub trait MemoryBackend: Send + Sync {
    /// Tier name used in logs.
    fn name(&self) -> &'static str;

    /// Load the current aggregate, or `None` when no record exists yet.
    async fn load(&self) -> Result<Option<ConversationMemory>, MemoryError>;

    /// Replace the stored aggregate wholesale.
    async fn store(&self, memory: &ConversationMemory) -> Result<(), MemoryError>;
}
