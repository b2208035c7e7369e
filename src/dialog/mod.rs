//! Dialog engine — a generic, serializable stack machine for multi-step
//! conversational flows.
//!
//! A conversation session owns one [`DialogStack`]; the top frame is the
//! active flow. Steps return a [`StepResult`] telling the engine how to
//! proceed. Prompts are the only suspension points: issuing one suspends
//! the stack until the next matching user input turn arrives.

pub mod engine;
pub mod prompt;
pub mod registry;
pub mod stack;
pub mod step;

pub use engine::{ContinueOutcome, DialogEngine, TurnOutcome};
pub use prompt::PendingPrompt;
pub use registry::DialogRegistry;
pub use stack::{DialogFrame, DialogStack, FrameValues};
pub use step::{StepContext, StepInput, StepResult, WaterfallStep};
