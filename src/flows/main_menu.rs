//! Main menu flow — greet, summarise the best available saving, and
//! dispatch to a child flow.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BotConfig;
use crate::dialog::{PendingPrompt, StepContext, StepInput, StepResult, WaterfallStep};
use crate::directory::CustomerDirectory;
use crate::error::StepError;
use crate::flows::{dialog_ids, fmt_pounds, fmt_pounds_k, keys, MENU_PROMPT, RETRY_PROMPT};
use crate::offers::{self, Loan, Offer, OfferEngine};

/// Step 1: look the customer up, compute the savings summary, stash the
/// working values, and present the menu.
pub struct PresentMenu {
    pub directory: Arc<dyn CustomerDirectory>,
    pub offers: Arc<OfferEngine>,
    pub config: Arc<BotConfig>,
}

#[async_trait]
impl WaterfallStep for PresentMenu {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        _input: StepInput,
    ) -> Result<StepResult, StepError> {
        let record = self.directory.find(&self.config.default_customer_id).await?;

        ctx.send(format!("Hi {}!", record.given_name));
        ctx.typing();
        ctx.send("We are analysing your current mortgage deal and spending patterns.");
        ctx.typing();
        ctx.send("Great news! Your house value went **up by 17%**.");
        ctx.typing();

        let offers = self.offers.compute_offers(&record.current_loan);

        ctx.set(keys::GIVEN_NAME, &record.given_name)?;
        ctx.set(keys::CUSTOMER_ID, &record.customer_id)?;
        ctx.set(keys::CURRENT_LOAN, &record.current_loan)?;
        ctx.set(keys::OFFERS, &offers)?;

        match savings_summary(&record.current_loan, &offers)? {
            Some(summary) => ctx.send(summary),
            None => ctx.send(
                "Your current deal is not up for renewal just yet — we'll be in touch when it is.",
            ),
        }

        Ok(StepResult::Prompt(PendingPrompt::Choice {
            prompt: MENU_PROMPT.into(),
            retry: RETRY_PROMPT.into(),
            options: self.config.menu.iter().map(|m| m.label.clone()).collect(),
        }))
    }
}

/// Step 2: resolve the menu choice through the configured label → dialog
/// mapping, carrying the frame values forward as the child's options.
pub struct DispatchChoice {
    pub config: Arc<BotConfig>,
}

#[async_trait]
impl WaterfallStep for DispatchChoice {
    async fn run(
        &self,
        ctx: &mut StepContext<'_>,
        input: StepInput,
    ) -> Result<StepResult, StepError> {
        let StepInput::Choice { index, label } = input else {
            return Err(StepError::UnexpectedInput { expected: "choice" });
        };
        let option = self
            .config
            .menu
            .get(index)
            .ok_or(StepError::UnexpectedInput { expected: "choice" })?;
        tracing::info!(choice = %label, dialog = %option.dialog_id, "menu choice");

        Ok(StepResult::BeginChild {
            dialog_id: option.dialog_id.clone(),
            options: ctx.values.clone(),
        })
    }
}

/// Step 3: after a child completes, start the menu over. Unreached when
/// the child cancels the whole stack.
pub struct RepeatMenu;

#[async_trait]
impl WaterfallStep for RepeatMenu {
    async fn run(
        &self,
        _ctx: &mut StepContext<'_>,
        _input: StepInput,
    ) -> Result<StepResult, StepError> {
        Ok(StepResult::Replace {
            dialog_id: dialog_ids::MAIN_MENU.into(),
            options: Default::default(),
        })
    }
}

/// Single-line saving pitch against the lowest-total-repayment offer, or
/// `None` when there are no offers to pitch.
pub fn savings_summary(current: &Loan, offers: &[Offer]) -> Result<Option<String>, StepError> {
    let ranked = offers::rank(offers)?;
    let Some((best, best_repayment)) = ranked.first() else {
        return Ok(None);
    };
    let current_repayment = current.repayment()?;

    let monthly_extra = best_repayment.monthly - current_repayment.monthly;
    let total_saving = current_repayment.total - best_repayment.total;
    let term_reduction = current.term_years - best.term_years;

    Ok(Some(format!(
        "For **just {}** extra per month, you can **save up to {}** and reduce your term by up to {} years.",
        fmt_pounds(monthly_extra),
        fmt_pounds_k(total_saving),
        term_reduction,
    )))
}
