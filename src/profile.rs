//! Where the mortgage terms come from: a preset profile or answers typed in
//! at the terminal.

use chrono::NaiveDate;
use clap::ValueEnum;
use log::warn;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::calendar::first_pay_date;
use crate::error::{MortgageError, Result};
use crate::mortgage::{check_term, MortgageTerms};
use crate::overpayment::{effective_duration, OverpaymentPolicy};

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum Profile {
    /// 2% over five years from July 2019
    Example,
    /// 1.56% over five years from March 2020
    Katandy,
    /// Answer prompts for every value
    #[value(name = "userinput")]
    UserInput,
}

impl Profile {
    /// Terms for a preset profile; `None` for `UserInput`.
    pub fn preset(self) -> Option<Result<MortgageTerms>> {
        match self {
            Profile::Example => Some(preset_terms(
                (2019, 7, 4),
                2.0,
                200000.,
                5,
                800.,
                17,
                vec![0., 5000., 6000., 10000., 11000., 8000.],
            )),
            Profile::Katandy => Some(preset_terms(
                (2020, 3, 26),
                1.56,
                200000.,
                5,
                756.2,
                1,
                vec![0., 5000., 5000., 5000., 5000., 5000.],
            )),
            Profile::UserInput => None,
        }
    }

    pub fn collect<R: BufRead, W: Write>(
        self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<MortgageTerms> {
        match self.preset() {
            Some(terms) => terms,
            None => prompter.terms(),
        }
    }
}

fn preset_terms(
    (y, m, d): (i32, u32, u32),
    annual_rate: f64,
    principal: f64,
    term: u32,
    monthly_payment: f64,
    pay_day: u32,
    scheduled: Vec<f64>,
) -> Result<MortgageTerms> {
    let day_one = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| MortgageError::InvalidDate(format!("{}-{}-{}", y, m, d)))?;
    MortgageTerms::new(
        day_one,
        annual_rate,
        principal,
        term,
        monthly_payment,
        pay_day,
        OverpaymentPolicy::Scheduled(scheduled),
    )
}

/// Map the two yes/no answers onto a policy.
pub fn select_policy(any: bool, maximum: bool, scheduled: Vec<f64>) -> OverpaymentPolicy {
    match (any, maximum) {
        (false, _) => OverpaymentPolicy::None,
        (true, true) => OverpaymentPolicy::Maximum,
        (true, false) => OverpaymentPolicy::Scheduled(scheduled),
    }
}

/// Asks questions on `output` and reads answers from `input`, asking again
/// until an answer parses.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MortgageError::Input(
                "input ended before all answers were given".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer.
    pub fn ask_with<T, F>(&mut self, question: &str, mut parse: F) -> Result<T>
    where
        F: FnMut(&str) -> Result<T>,
    {
        loop {
            writeln!(self.output, "{}", question)?;
            self.output.flush()?;
            let answer = self.read_line()?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("rejected answer {:?}: {}", answer, e);
                    writeln!(self.output, "{}", e)?;
                }
            }
        }
    }

    pub fn ask<T: FromStr>(&mut self, question: &str) -> Result<T> {
        self.ask_with(question, |answer| {
            answer
                .parse()
                .map_err(|_| MortgageError::Input(format!("could not read {:?}", answer)))
        })
    }

    /// Ask for a sum of money: a finite, non-negative number.
    pub fn ask_amount(&mut self, question: &str) -> Result<f64> {
        self.ask_with(question, |answer| match answer.parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0. => Ok(amount),
            _ => Err(MortgageError::Input(format!("{:?} is not an amount", answer))),
        })
    }

    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        self.ask_with(question, |answer| match answer {
            "y" => Ok(true),
            "n" => Ok(false),
            _ => Err(MortgageError::Input("answer y or n".to_string())),
        })
    }

    pub fn ask_date(&mut self, question: &str) -> Result<NaiveDate> {
        self.ask_with(question, |answer| {
            NaiveDate::parse_from_str(answer, "%d/%m/%Y")
                .map_err(|e| MortgageError::InvalidDate(format!("{:?}: {}", answer, e)))
        })
    }

    /// Collect a full set of terms interactively.
    pub fn terms(&mut self) -> Result<MortgageTerms> {
        let day_one = self.ask_date("Enter the date your mortgage begins [dd/mm/yyyy]:")?;

        let annual_rate = self.ask_with(
            "Enter your mortgage interest rate as a percentage:",
            |answer| match answer.parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate >= 0. => Ok(rate),
                _ => Err(MortgageError::InvalidTermOrRate(format!(
                    "{:?} is not an interest rate",
                    answer
                ))),
            },
        )?;

        let principal: u64 = self.ask("Enter the initial value of your mortgage:")?;

        let term = self.ask_with(
            "Enter the mortgage product term in whole years:",
            |answer| match answer.parse::<u32>() {
                Ok(term) => check_term(day_one, term),
                Err(_) => Err(MortgageError::InvalidTermOrRate(format!(
                    "{:?} is not a whole number of years",
                    answer
                ))),
            },
        )?;

        let monthly_payment = self.ask_amount("Enter your monthly payment amount:")?;

        let pay_day = self.ask_with(
            "Enter the calendar day on which you will make your monthly payments [dd]:",
            |answer| {
                let pay_day = answer
                    .parse::<u32>()
                    .map_err(|_| MortgageError::Input(format!("could not read {:?}", answer)))?;
                first_pay_date(day_one, pay_day).map(|_| pay_day)
            },
        )?;
        let first_payday = first_pay_date(day_one, pay_day)?;

        let any = self.ask_yes_no(
            "Would you like to make any overpayments during the mortgage term? [y/n]:",
        )?;
        let maximum = any
            && self.ask_yes_no(
                "Would you like to over pay maximally over the term; \
                 that is, 10% of the remaining balance per year? [y/n]:",
            )?;

        let mut scheduled = Vec::new();
        if any && !maximum {
            for yr in 0..effective_duration(term, first_payday) {
                scheduled.push(self.ask_amount(&format!(
                    "Enter the amount you wish to over pay in year {}:",
                    yr
                ))?);
            }
        }

        MortgageTerms::new(
            day_one,
            annual_rate,
            principal as f64,
            term,
            monthly_payment,
            pay_day,
            select_policy(any, maximum, scheduled),
        )
    }
}
