use chrono::{Datelike, Days, Months, NaiveDate};
use log::{debug, info, trace};
use std::fmt;

use crate::calendar::{
    daily_rate, first_pay_date, remaining_days_in_month, rotate_to_start, RemainingDays,
};
use crate::error::{MortgageError, Result};
use crate::overpayment::OverpaymentPolicy;

/// Everything needed to project one mortgage.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MortgageTerms {
    pub day_one: NaiveDate,
    pub annual_rate: f64,
    pub principal: f64,
    pub term: u32,
    pub monthly_payment: f64,
    pub first_pay_date: NaiveDate,
    pub policy: OverpaymentPolicy,
    pub remaining_days: RemainingDays,
}

impl MortgageTerms {
    pub fn new(
        day_one: NaiveDate,
        annual_rate: f64,
        principal: f64,
        term: u32,
        monthly_payment: f64,
        pay_day: u32,
        policy: OverpaymentPolicy,
    ) -> Result<Self> {
        check_term(day_one, term)?;
        if !annual_rate.is_finite() || annual_rate < 0. {
            return Err(MortgageError::InvalidTermOrRate(format!(
                "annual rate {} is not a usable percentage",
                annual_rate
            )));
        }
        if !principal.is_finite() || !monthly_payment.is_finite() {
            return Err(MortgageError::Input(
                "principal and monthly payment must be numbers".to_string(),
            ));
        }

        Ok(Self {
            day_one,
            annual_rate,
            principal,
            term,
            monthly_payment,
            first_pay_date: first_pay_date(day_one, pay_day)?,
            policy,
            remaining_days: RemainingDays::default(),
        })
    }

    /// The same mortgage under a different overpayment policy.
    pub fn with_policy(&self, policy: OverpaymentPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    pub fn with_remaining_days(self, remaining_days: RemainingDays) -> Self {
        Self {
            remaining_days,
            ..self
        }
    }

    /// No payment falls due in the stub period when the first payday is in a
    /// later month than origination.
    pub fn first_payment(&self) -> f64 {
        if self.first_pay_date.month() == self.day_one.month() {
            self.monthly_payment
        } else {
            0.
        }
    }

    pub fn month_count(&self) -> usize {
        self.term as usize * 12
    }

    /// Last day of the product: the day before the `term`-th anniversary.
    pub fn end_date(&self) -> Result<NaiveDate> {
        end_date(self.day_one, self.term).ok_or_else(|| {
            MortgageError::InvalidDate(format!(
                "{} years after {} is out of range",
                self.term, self.day_one
            ))
        })
    }

    /// Flat day-count table for every month of the term, each entry tagged
    /// with its running month index.
    ///
    /// The final period stops one day short of the origination anniversary.
    pub fn term_calendar(&self) -> Vec<MonthInput> {
        let start_month = self.first_pay_date.month();
        let start_year = self.first_pay_date.year();

        let mut days: Vec<u32> = (0..self.term as i32)
            .flat_map(|offset| rotate_to_start(start_month, start_year + offset))
            .collect();
        if let Some(last) = days.last_mut() {
            *last = self.day_one.day() - 1;
        }

        days.into_iter()
            .zip(start_month..)
            .map(|(days, month_index)| MonthInput { month_index, days })
            .collect()
    }
}

fn end_date(day_one: NaiveDate, term: u32) -> Option<NaiveDate> {
    let months = term.checked_mul(12)?;
    day_one
        .checked_add_months(Months::new(months))?
        .checked_sub_days(Days::new(1))
}

/// A term must be at least a year and end on a date chrono can represent.
pub fn check_term(day_one: NaiveDate, term: u32) -> Result<u32> {
    if term == 0 {
        return Err(MortgageError::InvalidTermOrRate(
            "term must be at least one year".to_string(),
        ));
    }
    match end_date(day_one, term) {
        Some(_) => Ok(term),
        None => Err(MortgageError::InvalidTermOrRate(format!(
            "a {} year term from {} ends beyond the last supported date",
            term, day_one
        ))),
    }
}

/// One step of the projection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthInput {
    /// Months counted from January of the first payday's year; crosses 12
    /// as the projection runs into later years.
    pub month_index: u32,
    pub days: u32,
}

impl MonthInput {
    /// Overpayments are made on the first of January.
    pub fn is_january(&self) -> bool {
        self.month_index % 12 == 1
    }

    pub fn policy_year(&self) -> usize {
        (self.month_index / 12) as usize
    }
}

/// Running balance plus the overpayment, interest and balance history.
///
/// `interest` and `balances` gain one entry per step; `overpayments` gains
/// one at origination and one per January.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationState {
    balance: f64,
    overpayments: Vec<f64>,
    interest: Vec<f64>,
    balances: Vec<f64>,
}

impl AmortizationState {
    /// State after the stub period between origination and the end of its
    /// month.
    pub fn initiate(terms: &MortgageTerms) -> Result<Self> {
        let first_payment = terms.first_payment();
        let first_overpayment = terms.policy.apply(terms.principal, 0)?;
        let balance = terms.principal - first_overpayment;

        // interest on the stub days, less what the first payment would have
        // accrued over its own stub
        let stub_days = remaining_days_in_month(terms.day_one, terms.remaining_days)? as f64;
        let payment_days =
            remaining_days_in_month(terms.first_pay_date, terms.remaining_days)? as f64;
        let first_interest = stub_days * daily_rate(terms.annual_rate, terms.day_one.year())
            * balance
            - payment_days * daily_rate(terms.annual_rate, terms.first_pay_date.year())
                * first_payment;

        let balance = balance - first_payment + first_interest;
        trace!(
            "stub of {} days, overpayment {}, interest {}, balance {}",
            stub_days,
            first_overpayment,
            first_interest,
            balance
        );

        Ok(Self {
            balance,
            overpayments: vec![first_overpayment],
            interest: vec![first_interest],
            balances: vec![balance],
        })
    }

    /// Roll the state forward by one month.
    pub fn advance(mut self, terms: &MortgageTerms, month: MonthInput) -> Result<Self> {
        let overpayment = if month.is_january() {
            let overpayment = terms.policy.apply(self.balance, month.policy_year())?;
            debug!(
                "policy year {} overpayment {:.2} against balance {:.2}",
                month.policy_year(),
                overpayment,
                self.balance
            );
            self.overpayments.push(overpayment);
            overpayment
        } else {
            0.
        };

        let days = month.days as f64;
        let days_after_payday = month.days.saturating_sub(terms.first_pay_date.day()) as f64;
        let year = terms.first_pay_date.year() + month.policy_year() as i32;

        let interest = daily_rate(terms.annual_rate, year)
            * (self.balance * days
                - overpayment * (days - 1.)
                - terms.monthly_payment * days_after_payday);

        self.balance = self.balance + interest - terms.monthly_payment - overpayment;
        trace!(
            "month {}, {} days, interest {}, balance {}",
            month.month_index,
            month.days,
            interest,
            self.balance
        );

        self.interest.push(interest);
        self.balances.push(self.balance);
        Ok(self)
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn overpayments(&self) -> &[f64] {
        &self.overpayments
    }

    pub fn interest(&self) -> &[f64] {
        &self.interest
    }

    pub fn balances(&self) -> &[f64] {
        &self.balances
    }

    pub fn get_step_count(&self) -> usize {
        self.balances.len()
    }
}

/// Run the full term for `terms`.
pub fn project(terms: &MortgageTerms) -> Result<Projection> {
    info!(
        "projecting {:.2} at {}% over {} years with {}",
        terms.principal, terms.annual_rate, terms.term, terms.policy
    );

    let calendar = terms.term_calendar();
    let state = calendar
        .iter()
        .try_fold(AmortizationState::initiate(terms)?, |state, &month| {
            state.advance(terms, month)
        })?;

    info!("final balance {:.2}", state.balance());
    Ok(Projection {
        terms: terms.clone(),
        calendar,
        state,
    })
}

/// A finished projection; read-only.
#[derive(Clone, PartialEq, Debug)]
pub struct Projection {
    terms: MortgageTerms,
    calendar: Vec<MonthInput>,
    state: AmortizationState,
}

impl Projection {
    pub fn terms(&self) -> &MortgageTerms {
        &self.terms
    }

    pub fn state(&self) -> &AmortizationState {
        &self.state
    }

    pub fn final_balance(&self) -> f64 {
        self.state.balance()
    }

    pub fn total_overpayments(&self) -> f64 {
        self.state.overpayments().iter().sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.state.interest().iter().sum()
    }

    pub fn total_monthly_payments(&self) -> f64 {
        self.terms.monthly_payment * self.terms.month_count() as f64
    }

    pub fn average_monthly_interest(&self) -> f64 {
        self.total_interest() / self.terms.month_count() as f64
    }

    pub fn end_date(&self) -> Result<NaiveDate> {
        self.terms.end_date()
    }

    /// One line per step: the stub period first, then each month closing on
    /// its payday.
    pub fn statements(&self) -> Result<Vec<MonthlyStatement>> {
        let state = &self.state;
        let mut overpayments = state.overpayments().iter().copied();
        let mut statements = Vec::with_capacity(state.get_step_count());

        let stub_days = remaining_days_in_month(self.terms.day_one, self.terms.remaining_days)?;
        statements.push(MonthlyStatement::new(
            0,
            self.terms.day_one,
            stub_days,
            overpayments.next().unwrap_or(0.),
            state.interest()[0],
            state.balances()[0],
        ));

        for (step, month) in (1..).zip(&self.calendar) {
            let date = self
                .terms
                .first_pay_date
                .checked_add_months(Months::new(step))
                .ok_or_else(|| {
                    MortgageError::InvalidDate(format!("payment {} is out of range", step))
                })?;
            let overpayment = if month.is_january() {
                overpayments.next().unwrap_or(0.)
            } else {
                0.
            };
            statements.push(MonthlyStatement::new(
                step,
                date,
                month.days,
                overpayment,
                state.interest()[step as usize],
                state.balances()[step as usize],
            ));
        }
        Ok(statements)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthlyStatement {
    pub step: u32,
    pub date: NaiveDate,
    pub days: u32,
    pub overpayment: f64,
    pub interest: f64,
    pub end_balance: f64,
}

impl MonthlyStatement {
    pub fn new(
        step: u32,
        date: NaiveDate,
        days: u32,
        overpayment: f64,
        interest: f64,
        end_balance: f64,
    ) -> Self {
        Self {
            step,
            date,
            days,
            overpayment,
            interest,
            end_balance,
        }
    }
}

impl fmt::Display for MonthlyStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}, date {}, {} days, overpayment £{:.2}, interest £{:.2}, \
             ending balance £{:.2}",
            self.step, self.date, self.days, self.overpayment, self.interest, self.end_balance
        )
    }
}

/// The selected policy projected alongside the maximum and nil policies.
#[derive(Clone, PartialEq, Debug)]
pub struct Comparison {
    pub selected: Projection,
    pub maximum: Projection,
    pub nil: Projection,
}

impl Comparison {
    pub fn project(terms: &MortgageTerms) -> Result<Self> {
        Ok(Self {
            selected: project(terms)?,
            maximum: project(&terms.with_policy(OverpaymentPolicy::Maximum))?,
            nil: project(&terms.with_policy(OverpaymentPolicy::None))?,
        })
    }
}
