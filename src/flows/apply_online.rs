//! Apply-online flow — confirmation with the application link, then done.

use async_trait::async_trait;

use crate::dialog::{StepContext, StepInput, StepResult, WaterfallStep};
use crate::error::StepError;
use crate::flows::APPLY_CONFIRMATION;

pub struct Confirm;

#[async_trait]
impl WaterfallStep for Confirm {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        _input: StepInput,
    ) -> Result<StepResult, StepError> {
        ctx.send(APPLY_CONFIRMATION);
        Ok(StepResult::CancelAll)
    }
}
