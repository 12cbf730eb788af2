//! Context prompt synthesis from a memory snapshot.

use crate::model::ConversationMemory;

const OPEN_MARKER: &str = "=== CONVERSATION MEMORY (previous session) ===";
const CLOSE_MARKER: &str = "=== END MEMORY ===";
const CONTINUE_INSTRUCTION: &str = "Continue the conversation naturally from where we left off. Do not repeat or summarize the above — just pick up where you were.";

/// Render a snapshot as the transcript block injected into a new session.
///
/// Deterministic for a given snapshot. An empty window yields an empty
/// string so callers can treat "no prior context" as falsy; otherwise the
/// block carries a note for turns evicted over the aggregate's lifetime,
/// one labeled line per retained turn oldest-first, and a closing
/// instruction for the downstream session.
pub fn build_context_prompt(memory: &ConversationMemory) -> String {
    if memory.turns.is_empty() {
        return String::new();
    }
    let mut prompt = String::new();
    prompt.push_str(OPEN_MARKER);
    prompt.push('\n');
    let dropped = memory.dropped_turns();
    if dropped > 0 {
        prompt.push_str(&format!("[{dropped} older turns trimmed]\n"));
    }
    for turn in &memory.turns {
        prompt.push_str(&format!("{}: {}\n", turn.role.label(), turn.text));
    }
    prompt.push_str(CLOSE_MARKER);
    prompt.push('\n');
    prompt.push_str(CONTINUE_INSTRUCTION);
    prompt
}
