//! Concrete conversation flows wired atop the dialog engine.

pub mod apply_online;
pub mod best_deal;
pub mod main_menu;
pub mod remind_later;

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::BotConfig;
use crate::dialog::DialogRegistry;
use crate::directory::CustomerDirectory;
use crate::error::DialogError;
use crate::offers::OfferEngine;

/// Registered dialog ids.
pub mod dialog_ids {
    pub const MAIN_MENU: &str = "main_menu";
    pub const BEST_DEAL: &str = "best_deal";
    pub const REMIND_LATER: &str = "remind_later";
    pub const APPLY_ONLINE: &str = "apply_online";
}

/// Keys under which flows stash values in the dialog frame. Children
/// inherit a copy of the parent's values, so these are shared vocabulary.
pub mod keys {
    pub const GIVEN_NAME: &str = "given_name";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const CURRENT_LOAN: &str = "current_loan";
    pub const OFFERS: &str = "offers";
}

pub const MENU_PROMPT: &str = "How would you like to continue?";
pub const RETRY_PROMPT: &str = "Please choose an option";
pub const APPLY_CONFIRMATION: &str = "Thank you. [Click here](https://personal.rbs.co.uk/personal/mortgages/secure/mortgage-agreement-in-principle.html) to complete your paperless application today.";

/// Build the full dialog registry and fail fast if the menu references a
/// dialog that was never registered.
pub fn build_registry(
    directory: Arc<dyn CustomerDirectory>,
    offers: Arc<OfferEngine>,
    config: Arc<BotConfig>,
) -> Result<DialogRegistry, DialogError> {
    let registry = DialogRegistry::builder()
        .dialog(
            dialog_ids::MAIN_MENU,
            vec![
                Arc::new(main_menu::PresentMenu {
                    directory,
                    offers,
                    config: Arc::clone(&config),
                }),
                Arc::new(main_menu::DispatchChoice {
                    config: Arc::clone(&config),
                }),
                Arc::new(main_menu::RepeatMenu),
            ],
        )
        .dialog(
            dialog_ids::BEST_DEAL,
            vec![
                Arc::new(best_deal::ShowComparison),
                Arc::new(best_deal::ProcessChoice),
            ],
        )
        .dialog(dialog_ids::REMIND_LATER, vec![Arc::new(remind_later::Farewell)])
        .dialog(dialog_ids::APPLY_ONLINE, vec![Arc::new(apply_online::Confirm)])
        .build();

    registry.validate_references(config.menu.iter().map(|m| m.dialog_id.as_str()))?;
    Ok(registry)
}

/// "£684" — whole pounds, presentation rounding only.
pub(crate) fn fmt_pounds(amount: Decimal) -> String {
    format!("£{}", amount.round_dp(0))
}

/// "£188.91k" — thousands to at most two decimal places.
pub(crate) fn fmt_pounds_k(amount: Decimal) -> String {
    format!("£{}k", (amount / dec!(1000)).round_dp(2).normalize())
}
