//! Remind-later flow — a one-step farewell.

use async_trait::async_trait;

use crate::dialog::{StepContext, StepInput, StepResult, WaterfallStep};
use crate::error::StepError;
use crate::flows::keys;

pub struct Farewell;

#[async_trait]
impl WaterfallStep for Farewell {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        _input: StepInput,
    ) -> Result<StepResult, StepError> {
        let given_name: String = ctx.require(keys::GIVEN_NAME)?;
        ctx.send(format!("Come back any time, {given_name}!"));
        Ok(StepResult::CancelAll)
    }
}
