//! Best-deal flow — side-by-side comparison of the current loan against
//! the lowest-total-repayment offer, then a terminal apply/call choice.

use async_trait::async_trait;

use crate::dialog::{PendingPrompt, StepContext, StepInput, StepResult, WaterfallStep};
use crate::error::StepError;
use crate::finance::Repayment;
use crate::flows::{fmt_pounds, fmt_pounds_k, keys, APPLY_CONFIRMATION, MENU_PROMPT, RETRY_PROMPT};
use crate::offers::{self, Loan, Offer};

const OPTIONS: [&str; 2] = ["Apply online", "Call me"];

pub const CALLBACK_CONFIRMATION: &str =
    "One of our advisers will be with you shortly, on your mobile banking registered phone number.";

/// Step 1: render the comparison and ask how to proceed.
pub struct ShowComparison;

#[async_trait]
impl WaterfallStep for ShowComparison {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        _input: StepInput,
    ) -> Result<StepResult, StepError> {
        let given_name: String = ctx.require(keys::GIVEN_NAME)?;
        ctx.send(format!("Let me bring up your details, {given_name}"));
        ctx.typing();

        let current: Loan = ctx.require(keys::CURRENT_LOAN)?;
        let offers: Vec<Offer> = ctx.require(keys::OFFERS)?;

        let ranked = offers::rank(&offers)?;
        let Some((best, best_repayment)) = ranked.first() else {
            ctx.send("We don't have a better deal for you right now — your current mortgage is the best fit.");
            return Ok(StepResult::CancelAll);
        };

        let current_repayment = current.repayment()?;
        ctx.send(comparison_table(
            &current,
            &current_repayment,
            best,
            best_repayment,
        ));

        Ok(StepResult::Prompt(PendingPrompt::Choice {
            prompt: MENU_PROMPT.into(),
            retry: RETRY_PROMPT.into(),
            options: OPTIONS.iter().map(|s| s.to_string()).collect(),
        }))
    }
}

/// Step 2: terminal confirmation for the chosen route, then unwind the
/// whole conversation.
pub struct ProcessChoice;

#[async_trait]
impl WaterfallStep for ProcessChoice {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        input: StepInput,
    ) -> Result<StepResult, StepError> {
        let StepInput::Choice { index, .. } = input else {
            return Err(StepError::UnexpectedInput { expected: "choice" });
        };
        match index {
            0 => ctx.send(APPLY_CONFIRMATION),
            1 => ctx.send(CALLBACK_CONFIRMATION),
            _ => return Err(StepError::UnexpectedInput { expected: "choice" }),
        }
        Ok(StepResult::CancelAll)
    }
}

fn comparison_table(
    current: &Loan,
    current_repayment: &Repayment,
    best: &Offer,
    best_repayment: &Repayment,
) -> String {
    format!(
        "|       | Current  &nbsp; &nbsp; | Our best offer |\n\
         | ----- | ----- | ----- |\n\
         | Deal | {} | {} |\n\
         | Monthly Rate | {} | {} |\n\
         | Term | {} | {} |\n\
         | Total Repayment  &nbsp; &nbsp; | {} | {} |",
        current.label,
        best.label,
        fmt_pounds(current_repayment.monthly),
        fmt_pounds(best_repayment.monthly),
        current.term_years,
        best.term_years,
        fmt_pounds_k(current_repayment.total),
        fmt_pounds_k(best_repayment.total),
    )
}
