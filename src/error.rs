use thiserror::Error;

pub type Result<T> = std::result::Result<T, MortgageError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MortgageError {
    /// Payments must land on a day that exists in every month.
    #[error("pay day {pay_day} is not allowed, choose a day from 1 to 28")]
    InvalidPayDay { pay_day: u32 },

    /// A scheduled overpayment list ran out before the projection did.
    #[error("no overpayment scheduled for policy year {index} ({len} years scheduled)")]
    PolicyIndexExhausted { index: usize, len: usize },

    #[error("invalid term or rate: {0}")]
    InvalidTermOrRate(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid input: {0}")]
    Input(String),
}

impl From<std::io::Error> for MortgageError {
    fn from(e: std::io::Error) -> Self {
        MortgageError::Input(e.to_string())
    }
}
