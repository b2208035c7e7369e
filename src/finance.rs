//! Financial model — pure amortization math.
//!
//! Monetary values are `Decimal` at the boundaries; the power term is
//! computed with f64 intermediates and converted back unrounded. Rounding
//! to 2 decimal places happens only at presentation time.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::error::FinanceError;

/// Derived repayment figures for a loan. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repayment {
    pub monthly: Decimal,
    pub annual: Decimal,
    pub total: Decimal,
}

/// Compute monthly/annual/total repayment for a repayment mortgage.
///
/// Standard amortization formula:
/// `monthly = P * r/1200 * (1+r/1200)^(12T) / ((1+r/1200)^(12T) - 1)`.
///
/// A zero interest rate is legal and degrades to straight-line
/// `P / (12T)`; the formula itself would divide by zero there.
pub fn amortize(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: i64,
) -> Result<Repayment, FinanceError> {
    if term_years <= 0 {
        return Err(FinanceError::InvalidInput {
            reason: format!("term must be positive, got {term_years} years"),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            reason: format!("rate must be non-negative, got {annual_rate_percent}%"),
        });
    }

    let months = i32::try_from(term_years * 12).map_err(|_| FinanceError::InvalidInput {
        reason: format!("term of {term_years} years is out of range"),
    })?;

    let p = principal.to_f64().ok_or_else(|| invalid_number("principal"))?;
    let rate = annual_rate_percent
        .to_f64()
        .ok_or_else(|| invalid_number("rate"))?;

    let monthly = if rate == 0.0 {
        p / f64::from(months)
    } else {
        let r = rate / 1200.0;
        let pow = (1.0 + r).powi(months);
        p * r * pow / (pow - 1.0)
    };

    let monthly = Decimal::from_f64(monthly).ok_or_else(|| invalid_number("monthly payment"))?;
    let annual = monthly * Decimal::from(12);
    let total = annual * Decimal::from(term_years);

    Ok(Repayment {
        monthly,
        annual,
        total,
    })
}

fn invalid_number(what: &str) -> FinanceError {
    FinanceError::InvalidInput {
        reason: format!("{what} is not representable as a finite number"),
    }
}
