//! Restart and fallback integration tests.

use async_trait::async_trait;
use confab_memory::{
    BackendChain, ConversationMemory, FileBackend, MemoryBackend, MemoryError, MemoryStore, Role,
    build_context_prompt,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::tempdir;

/// Remote tier that is permanently unreachable.
struct DownRemote;

#[async_trait]
impl MemoryBackend for DownRemote {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self) -> Result<Option<ConversationMemory>, MemoryError> {
        Err(MemoryError::Io(std::io::Error::other("connection refused")))
    }

    async fn store(&self, _memory: &ConversationMemory) -> Result<(), MemoryError> {
        Err(MemoryError::Io(std::io::Error::other("connection refused")))
    }
}

fn store_over(dir: &std::path::Path) -> MemoryStore {
    let file = FileBackend::new(dir).expect("file backend");
    let tiers: Vec<Arc<dyn MemoryBackend>> = vec![Arc::new(DownRemote), Arc::new(file)];
    MemoryStore::new(BackendChain::new(tiers))
}

/// Appends must survive a process restart through the file tier even with
/// the remote tier down the whole time.
#[tokio::test]
async fn file_tier_carries_memory_across_restarts() {
    let temp = tempdir().expect("tempdir");

    let store = store_over(temp.path());
    store.append_turn(Role::User, "hello").await;
    let memory = store.append_turn(Role::Agent, "hi there").await;
    assert_eq!(memory.total_turns, 2);
    drop(store);

    // Fresh chain over the same directory: a new process with a cold cache.
    let store = store_over(temp.path());
    let memory = store.load(None).await;
    assert_eq!(memory.turns.len(), 2);
    assert_eq!(memory.total_turns, 2);
    assert_eq!(memory.trimmed_at, None);

    let prompt = build_context_prompt(&memory);
    let user_at = prompt.find("User: hello").expect("user line");
    let agent_at = prompt.find("Agent: hi there").expect("agent line");
    assert!(user_at < agent_at);
}

/// The trim note must reflect evictions that happened in a prior process.
#[tokio::test]
async fn trim_bookkeeping_survives_restart() {
    let temp = tempdir().expect("tempdir");

    let store = store_over(temp.path());
    for i in 0..55 {
        store.append_turn(Role::User, format!("turn {i}")).await;
    }
    drop(store);

    let store = store_over(temp.path());
    let memory = store.load(None).await;
    assert_eq!(memory.turns.len(), 50);
    assert_eq!(memory.total_turns, 55);
    assert!(memory.trimmed_at.is_some());
    assert_eq!(memory.turns[0].text, "turn 5");

    let prompt = build_context_prompt(&memory);
    assert!(prompt.contains("[5 older turns trimmed]"));
}

/// With no durable tier at all, appends still succeed within the process.
#[tokio::test]
async fn cache_floor_keeps_appends_working() {
    let tiers: Vec<Arc<dyn MemoryBackend>> = vec![Arc::new(DownRemote)];
    let store = MemoryStore::new(BackendChain::new(tiers));

    let memory = store.append_turn(Role::User, "hello").await;
    assert_eq!(memory.total_turns, 1);
    assert_eq!(store.load(None).await.turns.len(), 1);
}
