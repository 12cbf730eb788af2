//! Durable, size-bounded conversation memory with tiered storage fallback.

pub mod backend;
pub mod chain;
pub mod error;
pub mod file;
pub mod model;
pub mod prompt;
pub mod remote;
pub mod store;

/// Storage tier capability trait.
pub use backend::MemoryBackend;
/// Fallback chain, write outcomes, and the observer hook.
pub use chain::{BackendChain, DEFAULT_OP_TIMEOUT, WriteObserver, WriteOutcome};
/// Memory error type.
pub use error::MemoryError;
/// Local-file tier.
pub use file::FileBackend;
/// Conversation data model.
pub use model::{ConversationMemory, DEFAULT_MAX_TURNS, Role, Turn};
/// Context prompt synthesis.
pub use prompt::build_context_prompt;
/// Remote key-value tier.
pub use remote::RemoteBackend;
/// Append/load store.
pub use store::MemoryStore;
