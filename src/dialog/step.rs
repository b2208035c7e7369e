//! Waterfall steps — the unit of flow execution.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::dialog::prompt::PendingPrompt;
use crate::dialog::stack::FrameValues;
use crate::error::StepError;
use crate::messages::OutboundMessage;

/// Resolved input handed to a step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    /// No prompt or child preceded this step.
    None,
    /// A resolved choice-prompt selection.
    Choice { index: usize, label: String },
    /// A resolved number-prompt value.
    Number(i64),
    /// The result a completed child dialog ended with.
    ChildResult(Value),
}

/// What a step tells the engine to do next.
#[derive(Debug, Clone)]
pub enum StepResult {
    /// Increment the step cursor and run the next step in the same turn.
    Advance,
    /// Attach a pending prompt and suspend until the next user input turn.
    Prompt(PendingPrompt),
    /// Push a child dialog; its completion resumes this frame at its next
    /// step with the child's result as input.
    BeginChild {
        dialog_id: String,
        options: FrameValues,
    },
    /// Pop this frame and push a new one — "repeat the menu".
    Replace {
        dialog_id: String,
        options: FrameValues,
    },
    /// Pop this frame; the parent resumes with `result`, or the
    /// conversation goes idle if nothing remains.
    End(Value),
    /// Clear the entire stack unconditionally — terminal outcomes.
    CancelAll,
}

impl StepResult {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Prompt(_) => "prompt",
            Self::BeginChild { .. } => "begin_child",
            Self::Replace { .. } => "replace",
            Self::End(_) => "end",
            Self::CancelAll => "cancel_all",
        }
    }
}

/// What a step sees while running: the frame's working values plus the
/// turn's outbound message buffer.
pub struct StepContext<'a> {
    pub values: &'a mut FrameValues,
    out: &'a mut Vec<OutboundMessage>,
}

impl<'a> StepContext<'a> {
    pub fn new(values: &'a mut FrameValues, out: &'a mut Vec<OutboundMessage>) -> Self {
        Self { values, out }
    }

    /// Queue a text message for this turn.
    pub fn send(&mut self, text: impl Into<String>) {
        self.out.push(OutboundMessage::text(text));
    }

    /// Queue a typing indicator.
    pub fn typing(&mut self) {
        self.out.push(OutboundMessage::Typing);
    }

    /// Store a value in the frame.
    pub fn set(&mut self, key: &str, value: &impl Serialize) -> Result<(), StepError> {
        let value = serde_json::to_value(value).map_err(|e| StepError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Fetch a required value from the frame, deserialized as `T`.
    pub fn require<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T, StepError> {
        let value = self.values.get(key).ok_or_else(|| StepError::MissingValue {
            key: key.to_string(),
        })?;
        serde_json::from_value(value.clone()).map_err(|e| StepError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// One step of a waterfall dialog. Implementations own their collaborators
/// (directory, offer engine, config); the engine only supplies the context.
#[async_trait]
pub trait WaterfallStep: Send + Sync {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        input: StepInput,
    ) -> Result<StepResult, StepError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_require_roundtrip() {
        let mut values = FrameValues::new();
        let mut out = Vec::new();
        let mut ctx = StepContext::new(&mut values, &mut out);

        ctx.set("given_name", &"Stephen").unwrap();
        let name: String = ctx.require("given_name").unwrap();
        assert_eq!(name, "Stephen");
    }

    #[test]
    fn require_missing_key_errors() {
        let mut values = FrameValues::new();
        let mut out = Vec::new();
        let ctx = StepContext::new(&mut values, &mut out);
        match ctx.require::<String>("absent") {
            Err(StepError::MissingValue { key }) => assert_eq!(key, "absent"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn require_wrong_shape_errors() {
        let mut values = FrameValues::new();
        values.insert("n".into(), serde_json::json!("not a number"));
        let mut out = Vec::new();
        let ctx = StepContext::new(&mut values, &mut out);
        assert!(matches!(
            ctx.require::<i64>("n"),
            Err(StepError::InvalidValue { .. })
        ));
    }

    #[test]
    fn send_buffers_messages_in_order() {
        let mut values = FrameValues::new();
        let mut out = Vec::new();
        let mut ctx = StepContext::new(&mut values, &mut out);
        ctx.send("first");
        ctx.typing();
        ctx.send("second");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], OutboundMessage::text("first"));
        assert_eq!(out[1], OutboundMessage::Typing);
    }
}
