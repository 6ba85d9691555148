//! Repayment mortgage projector.
//!
//! Interest accrues daily on the outstanding balance and is settled monthly.
//! Once a year, on the first of January, a lump-sum overpayment of up to a
//! tenth of the balance may be made.

pub mod calendar;
pub mod error;
pub mod mortgage;
pub mod overpayment;
pub mod profile;
pub mod report;

pub use error::{MortgageError, Result};
pub use mortgage::{project, AmortizationState, Comparison, MortgageTerms, Projection};
pub use overpayment::OverpaymentPolicy;
