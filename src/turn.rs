//! Turn handler — one inbound event in, outbound messages out.
//!
//! Loads the session's stack, resumes or starts the active flow, and
//! persists the result. Business failures are converted to user-visible
//! messages here; the previously persisted stack stays authoritative on
//! any failure, so a failed turn can be retried safely.

use std::sync::Arc;

use crate::dialog::{ContinueOutcome, DialogEngine, DialogStack, FrameValues};
use crate::error::{DialogError, DirectoryError, Error, Result, StepError};
use crate::flows::dialog_ids;
use crate::messages::{InboundEvent, OutboundMessage};
use crate::session::SessionStore;

pub const NOT_FOUND_MESSAGE: &str =
    "Sorry, we couldn't find your details. Please get in touch with us directly.";
pub const SOMETHING_WENT_WRONG_MESSAGE: &str =
    "Something went wrong on our side. Please try that again.";

pub struct TurnHandler {
    engine: DialogEngine,
    sessions: Arc<dyn SessionStore>,
}

impl TurnHandler {
    pub fn new(engine: DialogEngine, sessions: Arc<dyn SessionStore>) -> Self {
        Self { engine, sessions }
    }

    /// Process one inbound event for a session and return the outbound
    /// messages, in the order the steps produced them.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        event: InboundEvent,
    ) -> Result<Vec<OutboundMessage>> {
        let mut stack = self.load_stack(session_id).await?;
        let mut out = Vec::new();

        match self.process(&mut stack, event, &mut out).await {
            Ok(()) => {
                self.sessions.save(session_id, stack.to_blob()?).await?;
                Ok(out)
            }
            Err(Error::Dialog(DialogError::Step {
                source: StepError::Directory(DirectoryError::NotFound { customer_id }),
                ..
            })) => {
                tracing::warn!(session = session_id, customer = %customer_id, "customer not found");
                Ok(vec![OutboundMessage::text(NOT_FOUND_MESSAGE)])
            }
            Err(Error::Dialog(DialogError::Step {
                dialog_id,
                step_index,
                source,
            })) => {
                tracing::error!(
                    session = session_id,
                    dialog = %dialog_id,
                    step = step_index,
                    error = %source,
                    "step failed, turn retracted"
                );
                Ok(vec![OutboundMessage::text(SOMETHING_WENT_WRONG_MESSAGE)])
            }
            Err(other) => Err(other),
        }
    }

    async fn process(
        &self,
        stack: &mut DialogStack,
        event: InboundEvent,
        out: &mut Vec<OutboundMessage>,
    ) -> Result<()> {
        match event {
            InboundEvent::Message { text } => {
                match self.engine.continue_dialog(stack, &text, out).await? {
                    ContinueOutcome::Handled(_) => {}
                    ContinueOutcome::NotConsumed => {
                        // Nothing was waiting for this message — open the menu.
                        self.engine
                            .begin_dialog(stack, dialog_ids::MAIN_MENU, FrameValues::new(), out)
                            .await?;
                    }
                }
            }
            InboundEvent::MembersJoined {
                member_ids,
                recipient_id,
            } => {
                // Only real newcomers open the menu; the bot's own join doesn't.
                if member_ids.iter().any(|id| *id != recipient_id) {
                    self.engine
                        .begin_dialog(stack, dialog_ids::MAIN_MENU, FrameValues::new(), out)
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn load_stack(&self, session_id: &str) -> Result<DialogStack> {
        match self.sessions.load(session_id).await? {
            Some(blob) => Ok(DialogStack::from_blob(&blob)?),
            None => Ok(DialogStack::new()),
        }
    }
}
