//! Dialog frames and the per-session stack.
//!
//! The stack is explicit data, not native call-stack recursion, so it can
//! be serialized between turns and resumed across process restarts.

use serde::{Deserialize, Serialize};

use crate::dialog::prompt::PendingPrompt;
use crate::error::SessionError;

/// Local working values for one flow invocation.
pub type FrameValues = serde_json::Map<String, serde_json::Value>;

/// One active or suspended flow invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogFrame {
    pub dialog_id: String,
    pub step_index: usize,
    #[serde(default)]
    pub values: FrameValues,
    /// Set between the turn that issues a prompt and the turn that
    /// resolves it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingPrompt>,
}

impl DialogFrame {
    pub fn new(dialog_id: impl Into<String>, values: FrameValues) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            step_index: 0,
            values,
            pending: None,
        }
    }
}

/// Ordered frames, top = active. Empty means the conversation is idle.
/// Owned exclusively by one session; never shared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogStack {
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogFrame> {
        self.frames.last_mut()
    }

    pub fn push(&mut self, frame: DialogFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<DialogFrame> {
        self.frames.pop()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Serialize to the opaque blob the session store keeps.
    pub fn to_blob(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(SessionError::Serialize)
    }

    pub fn from_blob(blob: &str) -> Result<Self, SessionError> {
        serde_json::from_str(blob).map_err(SessionError::Deserialize)
    }
}
