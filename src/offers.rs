//! Offer engine — derives comparable renewal offers from a current loan.
//!
//! The tier table is configuration (`BotConfig`), not engine logic; adding a
//! tier never touches this module. Engine output is unordered — ranking is
//! the caller's concern, via [`rank`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;
use crate::finance::{self, Repayment};

/// A mortgage loan. Immutable once constructed; repayment figures are
/// derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub term_years: i64,
    pub renewal_eligible: bool,
    /// Product description, e.g. "SVR 3.99%".
    pub label: String,
}

impl Loan {
    pub fn repayment(&self) -> Result<Repayment, FinanceError> {
        finance::amortize(self.principal, self.annual_rate_percent, self.term_years)
    }
}

/// An alternative loan computed relative to a customer's current loan.
/// Same shape as [`Loan`]; never persisted outside the flow that asked.
pub type Offer = Loan;

/// One business-rule tier: a rate discount plus a term adjustment applied
/// to the current loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferTier {
    /// Product family name, e.g. "Fixed 2 years".
    pub name: String,
    pub rate_delta_percent: Decimal,
    pub term_delta_years: i64,
}

/// Computes alternative offers for a loan using a fixed tier table.
#[derive(Debug, Clone)]
pub struct OfferEngine {
    tiers: Vec<OfferTier>,
}

impl OfferEngine {
    pub fn new(tiers: Vec<OfferTier>) -> Self {
        Self { tiers }
    }

    /// One offer per tier, or an empty vec when the loan is not up for
    /// renewal. Never a null-ish sentinel — callers handle "no offers"
    /// either way.
    ///
    /// Resulting terms are clamped to `1..=current term`; resulting rates
    /// to `>= 0`.
    pub fn compute_offers(&self, loan: &Loan) -> Vec<Offer> {
        if !loan.renewal_eligible {
            return Vec::new();
        }

        self.tiers
            .iter()
            .map(|tier| {
                let rate = (loan.annual_rate_percent + tier.rate_delta_percent).max(Decimal::ZERO);
                let term = (loan.term_years + tier.term_delta_years)
                    .min(loan.term_years)
                    .max(1);
                Offer {
                    principal: loan.principal,
                    annual_rate_percent: rate,
                    term_years: term,
                    renewal_eligible: false,
                    label: format!("{} {}% over {} years", tier.name, rate.normalize(), term),
                }
            })
            .collect()
    }
}

/// Rank offers by total repayment ascending; ties broken by shorter term,
/// then lower rate. Stable with respect to the input order beyond that.
pub fn rank(offers: &[Offer]) -> Result<Vec<(Offer, Repayment)>, FinanceError> {
    let mut ranked = offers
        .iter()
        .map(|offer| Ok((offer.clone(), offer.repayment()?)))
        .collect::<Result<Vec<_>, FinanceError>>()?;

    ranked.sort_by(|(a, ar), (b, br)| {
        ar.total
            .cmp(&br.total)
            .then(a.term_years.cmp(&b.term_years))
            .then(a.annual_rate_percent.cmp(&b.annual_rate_percent))
    });

    Ok(ranked)
}
