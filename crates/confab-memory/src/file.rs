//! Local-file storage tier.

use crate::backend::MemoryBackend;
use crate::error::MemoryError;
use crate::model::ConversationMemory;
use async_trait::async_trait;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const MEMORY_FILE: &str = "conversation.json";
const WRITE_PROBE: &str = ".write-test";

/// File tier storing the aggregate as one JSON document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a file tier under the given directory.
    ///
    /// Probes writability up front so a read-only filesystem disqualifies
    /// the tier at construction instead of on the first append.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let probe = dir.join(WRITE_PROBE);
        fs::write(&probe, b"ok")?;
        fs::remove_file(&probe)?;
        let path = dir.join(MEMORY_FILE);
        info!("initialized file backend (path={})", path.display());
        Ok(Self { path })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl MemoryBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> Result<Option<ConversationMemory>, MemoryError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let memory: ConversationMemory = serde_json::from_str(&raw)?;
        debug!("loaded memory from file (turns={})", memory.turns.len());
        Ok(Some(memory))
    }

    /// Replace the document atomically via a temp file and rename.
    async fn store(&self, memory: &ConversationMemory) -> Result<(), MemoryError> {
        let raw = serde_json::to_string_pretty(memory)?;
        let temp = self.temp_path();
        fs::write(&temp, raw)?;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        fs::rename(&temp, &self.path)?;
        debug!(
            "stored memory to file (turns={}, total={})",
            memory.turns.len(),
            memory.total_turns
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FileBackend;
    use crate::backend::MemoryBackend;
    use crate::model::{ConversationMemory, Role, Turn};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_memory() -> ConversationMemory {
        ConversationMemory {
            turns: vec![Turn {
                role: Role::Agent,
                text: "hi there".to_string(),
                timestamp: Utc::now(),
            }],
            total_turns: 1,
            trimmed_at: None,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let temp = tempdir().expect("tempdir");
        let backend = FileBackend::new(temp.path()).expect("backend");
        assert_eq!(backend.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn store_then_load_round_trips() {
        let temp = tempdir().expect("tempdir");
        let backend = FileBackend::new(temp.path()).expect("backend");
        let memory = sample_memory();
        backend.store(&memory).await.expect("store");
        assert_eq!(backend.load().await.expect("load"), Some(memory));
    }

    #[tokio::test]
    async fn store_replaces_previous_document() {
        let temp = tempdir().expect("tempdir");
        let backend = FileBackend::new(temp.path()).expect("backend");
        backend.store(&sample_memory()).await.expect("first store");

        let mut updated = sample_memory();
        updated.total_turns = 2;
        backend.store(&updated).await.expect("second store");

        let loaded = backend.load().await.expect("load").expect("record");
        assert_eq!(loaded.total_turns, 2);
    }

    #[tokio::test]
    async fn corrupt_document_surfaces_as_error() {
        let temp = tempdir().expect("tempdir");
        let backend = FileBackend::new(temp.path()).expect("backend");
        std::fs::write(backend.path(), "not json").expect("write");
        assert!(backend.load().await.is_err());
    }
}
