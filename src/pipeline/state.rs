// Shared pipeline state
//
// One state object is created per pipeline run and threaded by `&mut`
// through every stage. Stages execute strictly in sequence, so there is
// exactly one writer at any instant.

use std::collections::HashMap;

/// Optional seed text describing the product.
pub const STATE_PRODUCT_GIVEN: &str = "product_given";
/// The authoritative draft; overwritten by every generation/refinement stage.
pub const STATE_PRODUCT_DESCRIPTION: &str = "current_product_description";
/// The most recent critique text, or the completion sentinel.
pub const STATE_CRITICISM: &str = "criticism";

/// Key-value state shared across all pipeline stages, plus the loop exit
/// flag. The flag is only ever set by refinement logic mid-loop and only
/// reset by the loop driver at loop entry.
#[derive(Debug, Default)]
pub struct PipelineState {
    values: HashMap<String, String>,
    escalate: bool,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    // Typed accessors so stage data dependencies read at the call site
    // instead of hiding behind string lookups.

    pub fn draft(&self) -> Option<&str> {
        self.get(STATE_PRODUCT_DESCRIPTION)
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.set(STATE_PRODUCT_DESCRIPTION, draft);
    }

    pub fn criticism(&self) -> Option<&str> {
        self.get(STATE_CRITICISM)
    }

    pub fn set_criticism(&mut self, criticism: impl Into<String>) {
        self.set(STATE_CRITICISM, criticism);
    }

    pub fn product_given(&self) -> Option<&str> {
        self.get(STATE_PRODUCT_GIVEN)
    }

    pub fn set_product_given(&mut self, seed: impl Into<String>) {
        self.set(STATE_PRODUCT_GIVEN, seed);
    }

    /// Request immediate termination of the enclosing refinement loop.
    pub fn request_exit(&mut self) {
        self.escalate = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.escalate
    }

    /// Reset the exit flag. Called by the loop driver at the start of each
    /// fresh loop invocation, never by refinement logic.
    pub fn clear_exit(&mut self) {
        self.escalate = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_share_the_key_space() {
        let mut state = PipelineState::new();
        state.set_draft("a fine cheese");
        assert_eq!(state.get(STATE_PRODUCT_DESCRIPTION), Some("a fine cheese"));

        state.set(STATE_CRITICISM, "too short");
        assert_eq!(state.criticism(), Some("too short"));
    }

    #[test]
    fn test_draft_overwrites() {
        let mut state = PipelineState::new();
        state.set_draft("v1");
        state.set_draft("v2");
        assert_eq!(state.draft(), Some("v2"));
    }

    #[test]
    fn test_exit_flag_lifecycle() {
        let mut state = PipelineState::new();
        assert!(!state.exit_requested());
        state.request_exit();
        assert!(state.exit_requested());
        state.clear_exit();
        assert!(!state.exit_requested());
    }

    #[test]
    fn test_missing_keys_are_none() {
        let state = PipelineState::new();
        assert!(state.draft().is_none());
        assert!(state.criticism().is_none());
        assert!(state.product_given().is_none());
    }
}
