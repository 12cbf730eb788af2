//! Tiered storage fallback chain with an in-process cache floor.

use crate::backend::MemoryBackend;
use crate::model::ConversationMemory;
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Default bound on a single durable-tier operation.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one write, reported to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A durable tier accepted the write.
    Persisted {
        /// Name of the tier that accepted it.
        tier: &'static str,
    },
    /// Every durable tier failed; only the in-process cache holds the value.
    CacheOnly,
}

/// Observer notified after each write with its persistence outcome.
///
/// Persistence is best-effort and never blocks or fails the caller; the
/// observer is the one place a deployment can watch whether writes are
/// actually reaching durable storage.
pub trait WriteObserver: Send + Sync {
    /// Called once per write with the final outcome.
    fn on_write(&self, outcome: &WriteOutcome);
}

/// Ordered fallback chain over durable tiers, most durable first, with an
/// in-process cache as the guaranteed-available floor.
///
/// Writes replace the whole record and carry no version token, so two
/// process instances interleaving read-modify-write cycles can overwrite
/// each other; only appends within one process are serialized (by the
/// store above this chain).
pub struct BackendChain {
    tiers: Vec<Arc<dyn MemoryBackend>>,
    cache: RwLock<Option<ConversationMemory>>,
    op_timeout: Duration,
    observer: Option<Arc<dyn WriteObserver>>,
}

impl BackendChain {
    /// Create a chain over the given tiers.
    pub fn new(tiers: Vec<Arc<dyn MemoryBackend>>) -> Self {
        Self {
            tiers,
            cache: RwLock::new(None),
            op_timeout: DEFAULT_OP_TIMEOUT,
            observer: None,
        }
    }

    /// Replace the per-operation timeout for durable tiers.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Attach an observer for write outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn WriteObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Read the current aggregate, falling through tiers in order.
    ///
    /// The cache answers first when populated; a successful durable read
    /// seeds it so later reads in this process stay local. Tier errors and
    /// timeouts degrade to the next tier; a total miss yields the empty
    /// aggregate.
    pub async fn read(&self) -> ConversationMemory {
        if let Some(memory) = self.cache.read().clone() {
            debug!("memory read served from cache (turns={})", memory.turns.len());
            return memory;
        }
        for tier in &self.tiers {
            match timeout(self.op_timeout, tier.load()).await {
                Ok(Ok(Some(memory))) => {
                    debug!(
                        "memory read served from {} (turns={})",
                        tier.name(),
                        memory.turns.len()
                    );
                    *self.cache.write() = Some(memory.clone());
                    return memory;
                }
                Ok(Ok(None)) => {
                    debug!("no memory record in {}", tier.name());
                }
                Ok(Err(err)) => {
                    warn!("memory read failed in {} (error={err})", tier.name());
                }
                Err(_) => {
                    warn!(
                        "memory read timed out in {} (after={:?})",
                        tier.name(),
                        self.op_timeout
                    );
                }
            }
        }
        ConversationMemory::default()
    }

    /// Write the aggregate: cache first, then the first durable tier to
    /// accept it.
    ///
    /// The cache is updated before any durable attempt so reads in this
    /// process see the new value even while durable writes are in flight
    /// or failing. Tier failures degrade to the next tier and are reported
    /// through the observer, never to the caller.
    pub async fn write(&self, memory: &ConversationMemory) {
        *self.cache.write() = Some(memory.clone());
        let outcome = self.write_durable(memory).await;
        if let Some(observer) = &self.observer {
            observer.on_write(&outcome);
        }
    }

    async fn write_durable(&self, memory: &ConversationMemory) -> WriteOutcome {
        for tier in &self.tiers {
            match timeout(self.op_timeout, tier.store(memory)).await {
                Ok(Ok(())) => {
                    debug!(
                        "memory persisted to {} (total={})",
                        tier.name(),
                        memory.total_turns
                    );
                    return WriteOutcome::Persisted { tier: tier.name() };
                }
                Ok(Err(err)) => {
                    warn!("memory write failed in {} (error={err})", tier.name());
                }
                Err(_) => {
                    warn!(
                        "memory write timed out in {} (after={:?})",
                        tier.name(),
                        self.op_timeout
                    );
                }
            }
        }
        warn!("memory held in cache only; every durable tier failed");
        WriteOutcome::CacheOnly
    }
}
