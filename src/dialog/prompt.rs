//! Prompt specifications and input validation.
//!
//! A prompt doubles as the pending state attached to the suspended frame:
//! the same value is emitted to the user and serialized with the stack, so
//! a restored session can validate the next input identically.

use serde::{Deserialize, Serialize};

use crate::dialog::step::StepInput;
use crate::messages::OutboundMessage;

/// A prompt awaiting user input on the top frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingPrompt {
    /// Select among a fixed labeled list.
    Choice {
        prompt: String,
        retry: String,
        options: Vec<String>,
    },
    /// Supply an integer.
    Number { prompt: String, retry: String },
}

impl PendingPrompt {
    /// The message issued when the prompt is first presented.
    pub fn issue_message(&self) -> OutboundMessage {
        match self {
            Self::Choice {
                prompt,
                retry,
                options,
            } => OutboundMessage::ChoicePrompt {
                prompt: prompt.clone(),
                retry: retry.clone(),
                options: options.clone(),
            },
            Self::Number { prompt, .. } => OutboundMessage::text(prompt),
        }
    }

    /// The message re-issued after invalid input. Choices are presented
    /// again with the retry text; retries are unbounded.
    pub fn retry_message(&self) -> OutboundMessage {
        match self {
            Self::Choice {
                retry, options, ..
            } => OutboundMessage::ChoicePrompt {
                prompt: retry.clone(),
                retry: retry.clone(),
                options: options.clone(),
            },
            Self::Number { retry, .. } => OutboundMessage::text(retry),
        }
    }

    /// Validate raw user input against this prompt. `None` means invalid —
    /// the engine re-issues the prompt and the stack is untouched.
    ///
    /// Choices accept a label (case-insensitive, trimmed) or a 1-based
    /// ordinal position.
    pub fn resolve(&self, input: &str) -> Option<StepInput> {
        let input = input.trim();
        match self {
            Self::Choice { options, .. } => {
                if let Some(index) = options
                    .iter()
                    .position(|label| label.eq_ignore_ascii_case(input))
                {
                    return Some(StepInput::Choice {
                        index,
                        label: options[index].clone(),
                    });
                }
                let ordinal: usize = input.parse().ok()?;
                if (1..=options.len()).contains(&ordinal) {
                    let index = ordinal - 1;
                    Some(StepInput::Choice {
                        index,
                        label: options[index].clone(),
                    })
                } else {
                    None
                }
            }
            Self::Number { .. } => input.parse::<i64>().ok().map(StepInput::Number),
        }
    }
}
