//! The stack machine: begins, continues, and unwinds dialogs.
//!
//! Single-threaded per conversation session; the engine never holds state
//! of its own beyond the registry, so one engine serves every session.

use serde_json::Value;

use crate::dialog::registry::DialogRegistry;
use crate::dialog::stack::{DialogFrame, DialogStack, FrameValues};
use crate::dialog::step::{StepContext, StepInput, StepResult};
use crate::error::DialogError;
use crate::messages::OutboundMessage;

/// How a turn left the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A prompt is pending; the next user message resolves it.
    AwaitingInput,
    /// The stack is empty — no active flow.
    Idle,
}

/// Outcome of feeding user input to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueOutcome {
    Handled(TurnOutcome),
    /// No frame was awaiting input; the caller decides what to start.
    NotConsumed,
}

pub struct DialogEngine {
    registry: DialogRegistry,
}

impl DialogEngine {
    pub fn new(registry: DialogRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    /// Push a new frame for `dialog_id` and run it from step 0.
    ///
    /// Fails with `UnknownDialog` (stack untouched) if the id was never
    /// registered — startup validation is meant to make that unreachable.
    pub async fn begin_dialog(
        &self,
        stack: &mut DialogStack,
        dialog_id: &str,
        options: FrameValues,
        out: &mut Vec<OutboundMessage>,
    ) -> Result<TurnOutcome, DialogError> {
        self.registry.get(dialog_id)?;
        tracing::debug!(dialog = dialog_id, depth = stack.depth(), "begin dialog");
        stack.push(DialogFrame::new(dialog_id, options));
        self.run(stack, StepInput::None, out).await
    }

    /// Resolve the pending prompt on the top frame against `user_input`
    /// and resume the flow.
    ///
    /// Invalid input re-issues the prompt with its retry text and leaves
    /// the stack exactly as it was; retries are unbounded. An empty stack
    /// (or a frame not awaiting input) reports `NotConsumed`.
    pub async fn continue_dialog(
        &self,
        stack: &mut DialogStack,
        user_input: &str,
        out: &mut Vec<OutboundMessage>,
    ) -> Result<ContinueOutcome, DialogError> {
        let resolved = {
            let Some(top) = stack.top_mut() else {
                return Ok(ContinueOutcome::NotConsumed);
            };
            let Some(pending) = top.pending.take() else {
                return Ok(ContinueOutcome::NotConsumed);
            };
            match pending.resolve(user_input) {
                Some(resolved) => {
                    // The resolved value goes to the *next* step.
                    top.step_index += 1;
                    resolved
                }
                None => {
                    tracing::debug!(dialog = %top.dialog_id, "invalid prompt input, re-issuing");
                    out.push(pending.retry_message());
                    top.pending = Some(pending);
                    return Ok(ContinueOutcome::Handled(TurnOutcome::AwaitingInput));
                }
            }
        };

        let outcome = self.run(stack, resolved, out).await?;
        Ok(ContinueOutcome::Handled(outcome))
    }

    /// Drive the top frame until something suspends or the stack empties.
    /// Steps run in strict sequence; prompts are the only suspension
    /// points.
    async fn run(
        &self,
        stack: &mut DialogStack,
        mut input: StepInput,
        out: &mut Vec<OutboundMessage>,
    ) -> Result<TurnOutcome, DialogError> {
        loop {
            let (dialog_id, step_index) = match stack.top() {
                Some(frame) => (frame.dialog_id.clone(), frame.step_index),
                None => return Ok(TurnOutcome::Idle),
            };

            let Some(step) = self.registry.get(&dialog_id)?.step(step_index) else {
                // Ran past the last step — implicit end with a null result.
                stack.pop();
                match stack.top_mut() {
                    Some(parent) => {
                        parent.step_index += 1;
                        input = StepInput::ChildResult(Value::Null);
                        continue;
                    }
                    None => return Ok(TurnOutcome::Idle),
                }
            };

            let result = {
                let Some(frame) = stack.top_mut() else {
                    return Ok(TurnOutcome::Idle);
                };
                let mut ctx = StepContext::new(&mut frame.values, out);
                let step_input = std::mem::replace(&mut input, StepInput::None);
                step.run(&mut ctx, step_input)
                    .await
                    .map_err(|source| DialogError::Step {
                        dialog_id: dialog_id.clone(),
                        step_index,
                        source,
                    })?
            };

            tracing::debug!(
                dialog = %dialog_id,
                step = step_index,
                result = result.label(),
                "step completed"
            );

            match result {
                StepResult::Advance => {
                    if let Some(frame) = stack.top_mut() {
                        frame.step_index += 1;
                    }
                }
                StepResult::Prompt(prompt) => {
                    out.push(prompt.issue_message());
                    if let Some(frame) = stack.top_mut() {
                        frame.pending = Some(prompt);
                    }
                    return Ok(TurnOutcome::AwaitingInput);
                }
                StepResult::BeginChild { dialog_id, options } => {
                    self.registry.get(&dialog_id)?;
                    stack.push(DialogFrame::new(dialog_id, options));
                }
                StepResult::Replace { dialog_id, options } => {
                    self.registry.get(&dialog_id)?;
                    stack.pop();
                    stack.push(DialogFrame::new(dialog_id, options));
                }
                StepResult::End(value) => {
                    stack.pop();
                    match stack.top_mut() {
                        Some(parent) => {
                            parent.step_index += 1;
                            input = StepInput::ChildResult(value);
                        }
                        None => return Ok(TurnOutcome::Idle),
                    }
                }
                StepResult::CancelAll => {
                    stack.clear();
                    return Ok(TurnOutcome::Idle);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::dialog::prompt::PendingPrompt;
    use crate::dialog::step::WaterfallStep;
    use crate::error::StepError;

    // ── Test steps ──────────────────────────────────────────────────

    struct Say(&'static str);

    #[async_trait]
    impl WaterfallStep for Say {
        async fn run(
            &self,
            ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            ctx.send(self.0);
            Ok(StepResult::Advance)
        }
    }

    struct AskColor;

    #[async_trait]
    impl WaterfallStep for AskColor {
        async fn run(
            &self,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            Ok(StepResult::Prompt(PendingPrompt::Choice {
                prompt: "Pick a colour".into(),
                retry: "Please choose an option".into(),
                options: vec!["Red".into(), "Blue".into()],
            }))
        }
    }

    struct ReportChoice;

    #[async_trait]
    impl WaterfallStep for ReportChoice {
        async fn run(
            &self,
            ctx: &mut StepContext<'_>,
            input: StepInput,
        ) -> Result<StepResult, StepError> {
            match input {
                StepInput::Choice { label, .. } => {
                    ctx.send(format!("you chose {label}"));
                    Ok(StepResult::Advance)
                }
                _ => Err(StepError::UnexpectedInput { expected: "choice" }),
            }
        }
    }

    struct Spawn(&'static str);

    #[async_trait]
    impl WaterfallStep for Spawn {
        async fn run(
            &self,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            Ok(StepResult::BeginChild {
                dialog_id: self.0.into(),
                options: FrameValues::new(),
            })
        }
    }

    struct AfterChild;

    #[async_trait]
    impl WaterfallStep for AfterChild {
        async fn run(
            &self,
            ctx: &mut StepContext<'_>,
            input: StepInput,
        ) -> Result<StepResult, StepError> {
            match input {
                StepInput::ChildResult(value) => {
                    ctx.send(format!("child said {value}"));
                    Ok(StepResult::Advance)
                }
                _ => Err(StepError::UnexpectedInput { expected: "child result" }),
            }
        }
    }

    struct EndWith(&'static str);

    #[async_trait]
    impl WaterfallStep for EndWith {
        async fn run(
            &self,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            Ok(StepResult::End(json!(self.0)))
        }
    }

    struct Cancel;

    #[async_trait]
    impl WaterfallStep for Cancel {
        async fn run(
            &self,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            Ok(StepResult::CancelAll)
        }
    }

    struct Restart(&'static str);

    #[async_trait]
    impl WaterfallStep for Restart {
        async fn run(
            &self,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            Ok(StepResult::Replace {
                dialog_id: self.0.into(),
                options: FrameValues::new(),
            })
        }
    }

    struct Explode;

    #[async_trait]
    impl WaterfallStep for Explode {
        async fn run(
            &self,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<StepResult, StepError> {
            Err(StepError::UnexpectedInput { expected: "nothing" })
        }
    }

    fn texts(out: &[OutboundMessage]) -> Vec<String> {
        out.iter()
            .filter_map(|m| match m {
                OutboundMessage::Text { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    // ── Tests ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn advance_chain_runs_to_implicit_end_in_one_turn() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog("greet", vec![Arc::new(Say("one")), Arc::new(Say("two"))])
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let outcome = engine
            .begin_dialog(&mut stack, "greet", FrameValues::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Idle);
        assert!(stack.is_empty());
        assert_eq!(texts(&out), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn prompt_suspends_and_valid_input_resumes_next_step() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog(
                    "colour",
                    vec![Arc::new(AskColor), Arc::new(ReportChoice)],
                )
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let outcome = engine
            .begin_dialog(&mut stack, "colour", FrameValues::new(), &mut out)
            .await
            .unwrap();
        assert_eq!(outcome, TurnOutcome::AwaitingInput);
        assert_eq!(stack.depth(), 1);
        assert!(stack.top().unwrap().pending.is_some());

        let mut out = Vec::new();
        let outcome = engine
            .continue_dialog(&mut stack, "blue", &mut out)
            .await
            .unwrap();
        assert_eq!(outcome, ContinueOutcome::Handled(TurnOutcome::Idle));
        assert_eq!(texts(&out), vec!["you chose Blue"]);
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn invalid_input_reissues_prompt_and_leaves_stack_unchanged() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog(
                    "colour",
                    vec![Arc::new(AskColor), Arc::new(ReportChoice)],
                )
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();
        engine
            .begin_dialog(&mut stack, "colour", FrameValues::new(), &mut out)
            .await
            .unwrap();

        let mut out = Vec::new();
        let outcome = engine
            .continue_dialog(&mut stack, "xyz", &mut out)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ContinueOutcome::Handled(TurnOutcome::AwaitingInput)
        );
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().step_index, 0);
        assert!(stack.top().unwrap().pending.is_some());
        match &out[0] {
            OutboundMessage::ChoicePrompt { prompt, .. } => {
                assert_eq!(prompt, "Please choose an option");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn child_end_resumes_parent_with_result() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog(
                    "parent",
                    vec![Arc::new(Spawn("child")), Arc::new(AfterChild)],
                )
                .dialog("child", vec![Arc::new(EndWith("done"))])
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let outcome = engine
            .begin_dialog(&mut stack, "parent", FrameValues::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Idle);
        assert_eq!(texts(&out), vec!["child said \"done\""]);
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn replace_swaps_the_top_frame() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog("first", vec![Arc::new(Restart("second"))])
                .dialog("second", vec![Arc::new(AskColor)])
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let outcome = engine
            .begin_dialog(&mut stack, "first", FrameValues::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::AwaitingInput);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().dialog_id, "second");
    }

    #[tokio::test]
    async fn cancel_all_clears_ancestors_too() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog(
                    "parent",
                    vec![Arc::new(Spawn("child")), Arc::new(AfterChild)],
                )
                .dialog("child", vec![Arc::new(Cancel)])
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let outcome = engine
            .begin_dialog(&mut stack, "parent", FrameValues::new(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Idle);
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn begin_unknown_dialog_fails_without_mutating_stack() {
        let engine = DialogEngine::new(DialogRegistry::builder().build());
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let err = engine
            .begin_dialog(&mut stack, "missing", FrameValues::new(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, DialogError::UnknownDialog { .. }));
        assert!(stack.is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn step_failure_surfaces_with_location() {
        let engine = DialogEngine::new(
            DialogRegistry::builder()
                .dialog("broken", vec![Arc::new(Say("ok")), Arc::new(Explode)])
                .build(),
        );
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let err = engine
            .begin_dialog(&mut stack, "broken", FrameValues::new(), &mut out)
            .await
            .unwrap_err();

        match err {
            DialogError::Step {
                dialog_id,
                step_index,
                ..
            } => {
                assert_eq!(dialog_id, "broken");
                assert_eq!(step_index, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn input_on_idle_stack_is_not_consumed() {
        let engine = DialogEngine::new(DialogRegistry::builder().build());
        let mut stack = DialogStack::new();
        let mut out = Vec::new();

        let outcome = engine
            .continue_dialog(&mut stack, "hello", &mut out)
            .await
            .unwrap();
        assert_eq!(outcome, ContinueOutcome::NotConsumed);
        assert!(out.is_empty());
    }
}
