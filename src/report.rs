//! Text rendering of a projected mortgage.

use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::calendar::{daily_rate, remaining_days_in_month};
use crate::error::Result;
use crate::mortgage::{Comparison, Projection};

/// English ordinal suffix for a day or year number.
pub fn suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Render as `Thursday, 4th July '19`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}, {}{} {} '{}",
        date.format("%A"),
        date.day(),
        suffix(date.day()),
        date.format("%B"),
        date.format("%y")
    )
}

/// Pounds with thousands separators and two decimal places.
pub fn format_money(amount: f64) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().rev().collect();
    let grouped: String = digits
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(",")
        .chars()
        .rev()
        .collect();

    let sign = if amount < 0. && s.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{}£{}.{}", sign, grouped, decimal_part)
}

/// A fraction shown as a percentage.
pub fn format_percent(fraction: f64, places: usize) -> String {
    format!("{:.*}%", places, fraction * 100.)
}

/// The printed projection: the selected run in detail, then summaries of it
/// and, for a scheduled policy, of the maximum and nil alternatives.
pub struct Report<'a> {
    comparison: &'a Comparison,
    end_date: NaiveDate,
    stub_days: u32,
}

impl<'a> Report<'a> {
    pub fn new(comparison: &'a Comparison) -> Result<Self> {
        let terms = comparison.selected.terms();
        Ok(Self {
            comparison,
            end_date: comparison.selected.end_date()?,
            stub_days: remaining_days_in_month(terms.day_one, terms.remaining_days)?,
        })
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selected = &self.comparison.selected;
        let terms = selected.terms();
        let state = selected.state();

        writeln!(f, "\nMortgage projection\n")?;
        writeln!(f, "Amount borrowed: {}", format_money(terms.principal))?;
        // keep a decimal on whole rates: "2.0%", not "2%"
        writeln!(f, "Annual interest rate: {:?}%", terms.annual_rate)?;
        writeln!(
            f,
            "Daily interest rate: {} (leap year), {} (short year)",
            format_percent(daily_rate(terms.annual_rate, 0), 6),
            format_percent(daily_rate(terms.annual_rate, 1), 6)
        )?;
        writeln!(f)?;

        writeln!(
            f,
            " - The first over payment of {} is paid on {}",
            format_money(state.overpayments()[0]),
            format_date(terms.day_one)
        )?;
        if self.stub_days != 0 {
            writeln!(
                f,
                "   In the first {} days, {} of interest accrued.",
                self.stub_days,
                format_money(state.interest()[0])
            )?;
        }
        writeln!(f, "   The initial balance is {}", format_money(state.balances()[0]))?;
        writeln!(f)
    }

    fn write_years(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selected = &self.comparison.selected;
        let day_one = selected.terms().day_one;
        let state = selected.state();

        for (yr, overpayment) in (1..).zip(&state.overpayments()[1..]) {
            let january = NaiveDate::from_ymd_opt(day_one.year() + yr as i32, 1, 1);
            if let Some(january) = january {
                writeln!(
                    f,
                    " - An over payment of {} is paid on {}",
                    format_money(*overpayment),
                    format_date(january)
                )?;
            }
            // balance at the close of the yr-th twelve months
            if let Some(balance) = state.balances().get(12 * yr - 1) {
                writeln!(
                    f,
                    "   The balance after the {}{} twelve months is {}",
                    yr,
                    suffix(yr as u32),
                    format_money(*balance)
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "End date: {}\n", format_date(self.end_date))
    }
}

fn write_summary(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    projection: &Projection,
    with_payments: bool,
) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, " - Final balance is {}", format_money(projection.final_balance()))?;
    writeln!(
        f,
        " - The amount {} was paid in over payments",
        format_money(projection.total_overpayments())
    )?;
    if with_payments {
        writeln!(
            f,
            " - The amount {} was paid in monthly payments",
            format_money(projection.total_monthly_payments())
        )?;
    }
    writeln!(
        f,
        " - Total interest accrued was {}",
        format_money(projection.total_interest())
    )?;
    writeln!(
        f,
        " - This interest is on average {} per month\n",
        format_money(projection.average_monthly_interest())
    )
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_years(f)?;

        let comparison = self.comparison;
        write_summary(f, "Mortgage summary:", &comparison.selected, true)?;
        if comparison.selected.terms().policy.is_scheduled() {
            write_summary(f, "If maximum overpayments were made:", &comparison.maximum, false)?;
            write_summary(f, "If no overpayments were made:", &comparison.nil, false)?;
        }
        writeln!(f, "Time to remortgage")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_date, format_money, format_percent, suffix, Report};
    use crate::mortgage::{Comparison, MortgageTerms};
    use crate::overpayment::OverpaymentPolicy;
    use chrono::NaiveDate;
    use test_log::test;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_suffix() {
        let expected = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (30, "th"),
            (31, "st"),
        ];
        for (n, s) in expected {
            assert_eq!(suffix(n), s, "{}", n);
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2019, 7, 4)), "Thursday, 4th July '19");
        assert_eq!(format_date(date(2024, 7, 3)), "Wednesday, 3rd July '24");
        assert_eq!(format_date(date(2020, 1, 1)), "Wednesday, 1st January '20");
        assert_eq!(format_date(date(2020, 3, 22)), "Sunday, 22nd March '20");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.), "£0.00");
        assert_eq!(format_money(800.), "£800.00");
        assert_eq!(format_money(200000.), "£200,000.00");
        assert_eq!(format_money(1234567.891), "£1,234,567.89");
        assert_eq!(format_money(-1500.5), "-£1,500.50");
        assert_eq!(format_money(-0.001), "£0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.02 / 366., 6), "0.005464%");
        assert_eq!(format_percent(0.02 / 365., 6), "0.005479%");
    }

    #[test]
    fn test_report() {
        let terms = MortgageTerms::new(
            date(2019, 7, 4),
            2.0,
            200000.,
            5,
            800.,
            17,
            OverpaymentPolicy::Scheduled(vec![0., 5000., 6000., 10000., 11000., 8000.]),
        )
        .unwrap();
        let comparison = Comparison::project(&terms).unwrap();
        let report = Report::new(&comparison).unwrap().to_string();

        assert!(report.contains("Amount borrowed: £200,000.00\n"));
        assert!(report.contains("Annual interest rate: 2.0%\n"));
        assert!(report.contains(
            "Daily interest rate: 0.005464% (leap year), 0.005479% (short year)\n"
        ));
        assert!(report
            .contains(" - The first over payment of £0.00 is paid on Thursday, 4th July '19\n"));
        assert!(report.contains("   In the first 28 days, £306.19 of interest accrued.\n"));
        assert!(report.contains("   The initial balance is £199,506.19\n"));
        assert!(report
            .contains(" - An over payment of £5,000.00 is paid on Wednesday, 1st January '20\n"));
        assert!(report.contains("   The balance after the 1st twelve months is £189,272.44\n"));
        assert!(report.contains("End date: Wednesday, 3rd July '24\n"));
        assert!(report.contains(" - Final balance is £127,975.52\n"));
        assert!(report.contains(" - The amount £40,000.00 was paid in over payments\n"));
        assert!(report.contains(" - The amount £48,000.00 was paid in monthly payments\n"));
        assert!(report.contains(" - Total interest accrued was £16,775.52\n"));
        assert!(report
            .contains("If maximum overpayments were made:\n - Final balance is £77,901.80\n"));
        assert!(report
            .contains("If no overpayments were made:\n - Final balance is £169,739.39\n"));
        assert!(report.ends_with("Time to remortgage\n"));
        assert_eq!(report.matches(" - An over payment of").count(), 5);
    }

    #[test]
    fn test_report_without_comparisons() {
        let terms = MortgageTerms::new(
            date(2020, 3, 1),
            1.5,
            100000.,
            2,
            500.,
            1,
            OverpaymentPolicy::Maximum,
        )
        .unwrap();
        let comparison = Comparison::project(&terms).unwrap();
        let report = Report::new(&comparison).unwrap().to_string();

        assert!(report.contains("Annual interest rate: 1.5%\n"));
        // stub day count is zero on the 1st
        assert!(!report.contains("In the first"));
        assert!(!report.contains("If maximum overpayments were made:"));
        assert!(!report.contains("If no overpayments were made:"));
        assert!(report.contains("Mortgage summary:"));
    }
}
