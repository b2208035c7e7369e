//! Configuration types.

use rust_decimal_macros::dec;

use crate::flows::dialog_ids;
use crate::offers::OfferTier;

/// One main-menu option: the label shown to the user and the dialog it
/// dispatches to.
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub label: String,
    pub dialog_id: String,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, dialog_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            dialog_id: dialog_id.into(),
        }
    }
}

/// Bot configuration — menu table, offer tier table, seed customer.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Customer looked up when a conversation opens. A real deployment
    /// would resolve this from the authenticated channel identity.
    pub default_customer_id: String,
    /// Main-menu label → dialog mapping, in presentation order.
    pub menu: Vec<MenuOption>,
    /// Business-rule tiers the offer engine applies to renewal-eligible
    /// loans. New tiers go here, not in the engine.
    pub tiers: Vec<OfferTier>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            default_customer_id: "mike4mail@gmail.com".to_string(),
            menu: vec![
                MenuOption::new("Apply now", dialog_ids::APPLY_ONLINE),
                MenuOption::new("Show best deal", dialog_ids::BEST_DEAL),
                MenuOption::new("Remind me later", dialog_ids::REMIND_LATER),
            ],
            tiers: vec![
                OfferTier {
                    name: "Fixed 2 years".into(),
                    rate_delta_percent: dec!(-2.64),
                    term_delta_years: -7,
                },
                OfferTier {
                    name: "Fixed 5 years".into(),
                    rate_delta_percent: dec!(-2.00),
                    term_delta_years: -4,
                },
                OfferTier {
                    name: "Tracker".into(),
                    rate_delta_percent: dec!(-0.50),
                    term_delta_years: 0,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_menu_maps_to_registered_flow_ids() {
        let config = BotConfig::default();
        let ids: Vec<&str> = config.menu.iter().map(|m| m.dialog_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                dialog_ids::APPLY_ONLINE,
                dialog_ids::BEST_DEAL,
                dialog_ids::REMIND_LATER
            ]
        );
    }

    #[test]
    fn default_tiers_are_non_empty() {
        assert!(!BotConfig::default().tiers.is_empty());
    }
}
