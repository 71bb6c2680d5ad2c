use matchplan_calculator::{AllocationError, allocate, contribution};
use matchplan_types::{AllocationParameters, Strategy};

const PLAN_YEAR: [i64; 4] = [2_333_333, 833_333, 833_333, 833_333];

fn params(limit: i64, match_rate: i64, max_rate: i64, strategy: Strategy) -> AllocationParameters {
    AllocationParameters::new(limit, match_rate, max_rate, strategy)
}

fn total(paychecks: &[i64], percentages: &[i64]) -> i64 {
    paychecks.iter().zip(percentages).map(|(&a, &p)| contribution(a, p)).sum()
}

#[test]
fn frontload_fills_the_first_paycheck_to_the_max_rate() {
    let percentages = allocate(&params(2_450_000, 4, 75, Strategy::Frontload), &PLAN_YEAR).unwrap();

    assert_eq!(percentages, vec![75, 75, 5, 4]);
    assert_eq!(total(&PLAN_YEAR, &percentages), 2_449_997);
}

#[test]
fn dca_spreads_the_limit_across_remaining_paychecks() {
    let percentages = allocate(&params(2_450_000, 4, 75, Strategy::Dca), &PLAN_YEAR).unwrap();

    assert_eq!(percentages, vec![25, 72, 74, 75]);
    assert_eq!(total(&PLAN_YEAR, &percentages), 2_424_997);
}

#[test]
fn uniform_picks_a_single_rate_then_bumps_early_paychecks() {
    let percentages = allocate(&params(2_450_000, 4, 75, Strategy::Uniform), &PLAN_YEAR).unwrap();

    assert_eq!(percentages, vec![51, 51, 50, 50]);
    assert_eq!(total(&PLAN_YEAR, &percentages), 2_448_330);
}

#[test]
fn single_paycheck_gets_the_same_rate_under_every_strategy() {
    for strategy in Strategy::ALL {
        let percentages = allocate(&params(50_000, 4, 75, strategy), &[1_000_000]).unwrap();
        assert_eq!(percentages, vec![5], "strategy {strategy}");
    }
}

#[test]
fn uniform_stops_when_budget_is_exhausted() {
    let percentages =
        allocate(&params(10_000, 0, 10, Strategy::Uniform), &[100_000, 100_000]).unwrap();
    assert_eq!(percentages, vec![5, 5]);
}

#[test]
fn uniform_bump_charges_floor_of_one_hundredth() {
    // A point on 100.99 costs 101 cents, but the bump pass charges 100.
    let paychecks = [10_099, 10_099];
    let percentages = allocate(&params(1_208, 0, 10, Strategy::Uniform), &paychecks).unwrap();

    assert_eq!(percentages, vec![6, 6]);
    assert_eq!(total(&paychecks, &percentages), 1_210);
}

#[test]
fn biweekly_plan_year() {
    let paychecks = [100_000; 26];

    let uniform = allocate(&params(300_000, 4, 50, Strategy::Uniform), &paychecks).unwrap();
    assert_eq!(&uniform[..14], &[12; 14]);
    assert_eq!(&uniform[14..], &[11; 12]);

    let dca = allocate(&params(300_000, 4, 50, Strategy::Dca), &paychecks).unwrap();
    assert_eq!(
        dca,
        vec![7, 7, 8, 8, 8, 8, 8, 9, 9, 9, 9, 10, 10, 10, 11, 11, 12, 12, 13, 13, 14, 15, 16, 18, 20, 25]
    );
    assert!(total(&paychecks, &dca) <= 300_000);
}

#[test]
fn frontload_stops_once_the_limit_is_used() {
    let percentages =
        allocate(&params(50_000, 0, 100, Strategy::Frontload), &[100_000, 100_000, 100_000])
            .unwrap();
    assert_eq!(percentages, vec![50, 0, 0]);
}

#[test]
fn rejects_empty_series() {
    let err = allocate(&params(10_000, 4, 75, Strategy::Dca), &[]).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidParameter { parameter: "paychecks", .. }));
}

#[test]
fn rejects_max_rate_below_match_rate() {
    let err = allocate(&params(10_000, 6, 5, Strategy::Frontload), &[100_000]).unwrap_err();
    assert!(matches!(
        err,
        AllocationError::InvalidParameter { parameter: "max_rate_percent", .. }
    ));
}

#[test]
fn rejects_negative_parameters() {
    let err = allocate(&params(-1, 4, 75, Strategy::Uniform), &[100_000]).unwrap_err();
    assert!(matches!(
        err,
        AllocationError::InvalidParameter { parameter: "annual_limit_cents", .. }
    ));

    let err = allocate(&params(10_000, -1, 75, Strategy::Uniform), &[100_000]).unwrap_err();
    assert!(matches!(
        err,
        AllocationError::InvalidParameter { parameter: "match_rate_percent", .. }
    ));
}

#[test]
fn rejects_max_rate_above_one_hundred() {
    let err = allocate(&params(10_000, 4, 101, Strategy::Uniform), &[100_000]).unwrap_err();
    assert!(matches!(
        err,
        AllocationError::InvalidParameter { parameter: "max_rate_percent", .. }
    ));
}

#[test]
fn zero_paycheck_is_rejected_where_it_would_be_a_divisor() {
    for strategy in [Strategy::Frontload, Strategy::Dca] {
        let err = allocate(&params(10_000, 4, 75, strategy), &[100_000, 0, 100_000]).unwrap_err();
        assert_eq!(err, AllocationError::InvalidPaycheckAmount { index: 1, amount_cents: 0 });
    }
}

#[test]
fn negative_paycheck_is_rejected_for_every_strategy() {
    for strategy in Strategy::ALL {
        let err = allocate(&params(10_000, 4, 75, strategy), &[100_000, -5]).unwrap_err();
        assert_eq!(err, AllocationError::InvalidPaycheckAmount { index: 1, amount_cents: -5 });
    }
}

#[test]
fn unknown_strategy_identifier_is_an_invalid_parameter() {
    let err: AllocationError = "greedy".parse::<Strategy>().unwrap_err().into();
    assert_eq!(err.category(), "invalid_parameter");
}

#[test]
fn calls_are_independent() {
    let p = params(2_450_000, 4, 75, Strategy::Frontload);
    let first = allocate(&p, &PLAN_YEAR).unwrap();
    let second = allocate(&p, &PLAN_YEAR).unwrap();
    assert_eq!(first, second);
}

#[test]
fn concurrent_callers_see_identical_results() {
    let p = params(2_450_000, 4, 75, Strategy::Dca);
    let expected = allocate(&p, &PLAN_YEAR).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> =
            (0..8).map(|_| scope.spawn(|| allocate(&p, &PLAN_YEAR).unwrap())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
