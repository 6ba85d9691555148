use approx::assert_relative_eq;
use mortgage::calendar::RemainingDays;
use mortgage::profile::Profile;
use mortgage::report::Report;
use mortgage::{project, Comparison, MortgageError, OverpaymentPolicy};
use std::thread;
use test_log::test;

#[test]
fn katandy_profile() {
    let terms = Profile::Katandy.preset().unwrap().unwrap();
    let comparison = Comparison::project(&terms).unwrap();

    let selected = comparison.selected.state();
    assert_eq!(selected.overpayments(), &[0., 5000., 5000., 5000., 5000., 5000.]);
    assert_relative_eq!(selected.interest()[0], 51.14754098360656, max_relative = 1e-12);
    assert_relative_eq!(selected.balances()[0], 200051.1475409836, max_relative = 1e-12);
    assert_relative_eq!(
        comparison.selected.final_balance(),
        143123.07645314222,
        max_relative = 1e-10
    );
    assert_relative_eq!(
        comparison.selected.total_interest(),
        13495.076453142894,
        max_relative = 1e-10
    );

    assert_relative_eq!(
        comparison.maximum.final_balance(),
        79269.81892390946,
        max_relative = 1e-10
    );
    assert_relative_eq!(
        comparison.nil.final_balance(),
        169012.76074779528,
        max_relative = 1e-10
    );
}

#[test]
fn every_run_has_one_entry_per_month() {
    let terms = Profile::Example.preset().unwrap().unwrap();
    for policy in [
        OverpaymentPolicy::None,
        OverpaymentPolicy::Maximum,
        terms.policy.clone(),
    ] {
        let projection = project(&terms.with_policy(policy)).unwrap();
        let state = projection.state();
        assert_eq!(state.balances().len(), terms.term as usize * 12 + 1);
        assert_eq!(state.interest().len(), terms.term as usize * 12 + 1);
        assert_eq!(state.overpayments().len(), terms.term as usize + 1);
    }
}

#[test]
fn parallel_runs_match_sequential_runs() {
    let terms = Profile::Example.preset().unwrap().unwrap();
    let sequential = Comparison::project(&terms).unwrap();

    let policies = [
        terms.policy.clone(),
        OverpaymentPolicy::Maximum,
        OverpaymentPolicy::None,
    ];
    let parallel: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = policies
            .iter()
            .map(|policy| {
                let terms = terms.with_policy(policy.clone());
                s.spawn(move || project(&terms))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    assert_eq!(parallel[0], sequential.selected);
    assert_eq!(parallel[1], sequential.maximum);
    assert_eq!(parallel[2], sequential.nil);
}

#[test]
fn full_month_stub_only_changes_first_of_month_starts() {
    let terms = Profile::Example.preset().unwrap().unwrap();
    let zero = project(&terms).unwrap();
    let full = project(&terms.clone().with_remaining_days(RemainingDays::FullMonth)).unwrap();
    assert_eq!(zero.state(), full.state());

    let katandy = Profile::Katandy.preset().unwrap().unwrap();
    let zero = project(&katandy).unwrap();
    let full = project(&katandy.with_remaining_days(RemainingDays::FullMonth)).unwrap();
    // origination on the 26th, payday on the 1st of a later month: no payment credit
    assert_eq!(zero.state(), full.state());
}

#[test]
fn short_schedule_aborts_the_run() {
    let terms = Profile::Example.preset().unwrap().unwrap();
    let short = terms.with_policy(OverpaymentPolicy::Scheduled(vec![0., 5000.]));
    assert_eq!(
        Comparison::project(&short),
        Err(MortgageError::PolicyIndexExhausted { index: 2, len: 2 })
    );
}

#[test]
fn report_renders_for_presets() {
    for profile in [Profile::Example, Profile::Katandy] {
        let terms = profile.preset().unwrap().unwrap();
        let comparison = Comparison::project(&terms).unwrap();
        let report = Report::new(&comparison).unwrap().to_string();
        assert!(report.starts_with("\nMortgage projection\n"));
        assert!(report.contains("If no overpayments were made:"));
        let rate = format!("Annual interest rate: {:?}%\n", terms.annual_rate);
        assert!(report.contains(&rate));
    }
}
