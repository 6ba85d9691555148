use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::error::{MortgageError, Result};

/// Largest share of the outstanding balance that may be overpaid in a year
/// without an early repayment charge.
pub const MAX_OVERPAYMENT_FRACTION: f64 = 0.1;

/// Decides the lump sum paid at the start of each policy year.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverpaymentPolicy {
    #[default]
    None,
    /// Always overpay the full allowance.
    Maximum,
    /// One requested amount per policy year, capped at the allowance.
    Scheduled(Vec<f64>),
}

impl OverpaymentPolicy {
    /// Overpayment due against `balance` in policy year `policy_year` (0 is
    /// the year of origination).
    pub fn apply(&self, balance: f64, policy_year: usize) -> Result<f64> {
        let allowance = MAX_OVERPAYMENT_FRACTION * balance;
        match self {
            OverpaymentPolicy::None => Ok(0.),
            OverpaymentPolicy::Maximum => Ok(allowance),
            OverpaymentPolicy::Scheduled(amounts) => amounts
                .get(policy_year)
                .map(|&requested| requested.min(allowance))
                .ok_or(MortgageError::PolicyIndexExhausted {
                    index: policy_year,
                    len: amounts.len(),
                }),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, OverpaymentPolicy::Scheduled(_))
    }
}

impl fmt::Display for OverpaymentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverpaymentPolicy::None => write!(f, "no overpayments"),
            OverpaymentPolicy::Maximum => write!(f, "maximum overpayments"),
            OverpaymentPolicy::Scheduled(amounts) => {
                write!(f, "scheduled overpayments over {} years", amounts.len())
            }
        }
    }
}

/// Number of policy years a projection reads an overpayment for.
///
/// Index 0 is taken at origination and every January crossed adds one more.
/// A first payday in January makes the first crossing coincide with index 0,
/// so the term alone covers it; any other month reaches index `term`.
pub fn effective_duration(term: u32, first_pay_date: NaiveDate) -> usize {
    if first_pay_date.month() == 1 {
        term as usize
    } else {
        term as usize + 1
    }
}
