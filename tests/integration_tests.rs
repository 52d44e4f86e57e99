//! Testing module for the whole pipeline: validation of the input, fitting
//! every family, the ranking and the run plans.
//!

use DiscreteFit::configuration::FitOptions;
use DiscreteFit::distribution_trait::DiscreteDistribution;
use DiscreteFit::distributions::{Family, Poisson::Poisson, ShiftedPowerLaw::ShiftedPowerLaw};
use DiscreteFit::errors::FitError;
use DiscreteFit::estimation::FitMethod;
use DiscreteFit::goodness_of_fit::{ComparisonTable, comparison_table};
use DiscreteFit::model_selection::{
    Criterion, FitFailure, ModelSelection, RankedModel, RunOutcome, RunPlan, run_plan, select,
};
use DiscreteFit::samples::Samples;
use assert_approx_eq::assert_approx_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn poisson_sample(seed: u64, lambda: f64, n: usize) -> Samples {
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    let real: Poisson = Poisson::new(lambda).unwrap();
    return Samples::from_unsigned(real.sample_multiple(&mut rng, n)).unwrap();
}

#[test]
fn input_validation() {
    assert_eq!(Samples::new(&[]), Err(FitError::EmptyDataset));
    assert_eq!(
        Samples::new(&[3, 1, -4, 1]),
        Err(FitError::NegativeValue { index: 2, value: -4 })
    );
    assert_eq!(Samples::from_unsigned(Vec::new()), Err(FitError::EmptyDataset));

    assert!(FitError::EmptyDataset.is_fatal());
    assert!(FitError::NegativeValue { index: 0, value: -1 }.is_fatal());
    assert!(
        !FitError::IncompatibleData {
            family: Family::LogNormal,
            reason: "the sample contains 0"
        }
        .is_fatal()
    );
}

#[test]
fn names() {
    assert_eq!("Poisson".parse::<Family>(), Ok(Family::Poisson));
    assert_eq!("truncated_power_law".parse::<Family>(), Ok(Family::TruncatedPowerLaw));
    assert_eq!(
        "gamma".parse::<Family>(),
        Err(FitError::UnknownFamily("gamma".to_string()))
    );

    for criterion in Criterion::ALL {
        assert_eq!(criterion.name().parse::<Criterion>(), Ok(criterion));
    }
    assert_eq!(
        "chi-squared".parse::<Criterion>(),
        Err(FitError::UnknownCriterion("chi-squared".to_string()))
    );
    assert_eq!(Criterion::default(), Criterion::Aic);
}

#[test]
fn poisson_data_selects_poisson() {
    let samples: Samples = poisson_sample(0, 3.0, 10_000);

    for criterion in [Criterion::Aic, Criterion::Bic] {
        let selection: ModelSelection = select(&samples, criterion, &FitOptions::default());
        println!("{selection}");

        let best: &RankedModel = selection.best().unwrap();
        assert_eq!(best.fit.family, Family::Poisson);
        assert_eq!(best.delta, 0.0);
        assert_eq!(selection.sample_size, 10_000);

        // deltas are non-negative and increasing
        for pair in selection.ranking.windows(2) {
            assert!(pair[0].score <= pair[1].score);
            assert!(0.0 <= pair[1].delta);
        }

        let total: f64 = selection
            .ranking
            .iter()
            .map(|r| r.weight.unwrap())
            .sum::<f64>();
        assert_approx_eq!(total, 1.0, 1.0e-12);

        // every family is either ranked or reported as a failure
        assert_eq!(selection.ranking.len() + selection.failures.len(), 7);
    }
}

#[test]
fn power_law_data_selects_a_power_law() {
    let mut rng: StdRng = StdRng::seed_from_u64(1618);
    let real: ShiftedPowerLaw = ShiftedPowerLaw::new(2.2, 1.0).unwrap();
    let samples: Samples = Samples::from_unsigned(real.sample_multiple(&mut rng, 3000)).unwrap();

    let selection: ModelSelection = select(&samples, Criterion::Bic, &FitOptions::default());
    println!("{selection}");

    let best: Family = selection.best().unwrap().fit.family;
    assert!(
        matches!(best, Family::ShiftedPowerLaw | Family::TruncatedPowerLaw),
        "{best}"
    );
    // the majority of the samples are 0
    let log_normal: &FitFailure = selection
        .failures
        .iter()
        .find(|f| f.family == Family::LogNormal)
        .unwrap();
    assert!(matches!(log_normal.reason, FitError::IncompatibleData { .. }));
    assert!(log_normal.partial.is_none());
}

#[test]
fn ks_criteria() {
    let samples: Samples = poisson_sample(99, 8.0, 400);
    let options: FitOptions = FitOptions::builder()
        .families(vec![Family::Poisson, Family::Normal, Family::Exponential])
        .build();

    let ks_fit: ModelSelection = select(&samples, Criterion::KsFit, &options);
    let ks_ms: ModelSelection = select(&samples, Criterion::KsModelSelection, &options);

    for ranked in &ks_fit.ranking {
        assert_eq!(ranked.fit.method, FitMethod::KolmogorovSmirnov);
        assert_eq!(ranked.score, ranked.fit.ks_statistic);
        assert!(ranked.weight.is_none());
    }
    for ranked in &ks_ms.ranking {
        assert_eq!(ranked.fit.method, FitMethod::MaximumLikelihood);
        assert!(ranked.weight.is_none());
    }

    // the KS fit of a family is at least as close as it's maximum likelihood fit
    for family in [Family::Poisson, Family::Normal, Family::Exponential] {
        let (_, by_ks) = ks_fit.position(family).unwrap();
        let (_, by_mle) = ks_ms.position(family).unwrap();
        assert!(by_ks.fit.ks_statistic <= by_mle.fit.ks_statistic + 1.0e-12);
    }
}

#[test]
fn families_are_deduplicated_and_ordered() {
    let samples: Samples = poisson_sample(4, 3.0, 100);
    let options: FitOptions = FitOptions::builder()
        .families(vec![Family::Normal, Family::Poisson, Family::Normal])
        .parallel(false)
        .build();

    let selection: ModelSelection = select(&samples, Criterion::MaximumLikelihood, &options);
    assert_eq!(selection.ranking.len(), 2);
    assert!(selection.failures.is_empty());
    assert!(selection.position(Family::Weibull).is_none());
}

#[test]
fn non_converged_fits_are_failures() {
    let samples: Samples = poisson_sample(17, 6.0, 200);
    let options: FitOptions = FitOptions::builder()
        .families(vec![Family::Poisson, Family::Weibull])
        .max_iterations(1)
        .build();

    let selection: ModelSelection = select(&samples, Criterion::Aic, &options);
    // closed forms do not iterate
    assert_eq!(selection.ranking.len(), 1);
    assert_eq!(selection.best().unwrap().fit.family, Family::Poisson);
    assert_approx_eq!(selection.best().unwrap().weight.unwrap(), 1.0);

    let failure: &FitFailure = &selection.failures[0];
    assert_eq!(failure.family, Family::Weibull);
    assert_eq!(failure.reason, FitError::NonConvergence { iterations: 1 });
    let partial = failure.partial.as_ref().unwrap();
    assert!(!partial.converged);
    assert_eq!(partial.family, Family::Weibull);
}

#[test]
fn single_value_truncated_power_law_is_a_failure() {
    let samples: Samples = Samples::new(&[5]).unwrap();
    let options: FitOptions = FitOptions::builder()
        .families(vec![Family::Poisson, Family::TruncatedPowerLaw])
        .build();

    let selection: ModelSelection = select(&samples, Criterion::Aic, &options);
    assert_eq!(selection.best().unwrap().fit.family, Family::Poisson);

    let failure: &FitFailure = &selection.failures[0];
    assert_eq!(failure.family, Family::TruncatedPowerLaw);
    assert!(matches!(failure.reason, FitError::NonConvergence { .. }));
    let partial = failure.partial.as_ref().unwrap();
    assert!(!partial.converged);
    assert!(partial.parameters()[0] < 1.001);
}

#[test]
fn nothing_can_be_fitted() {
    // only zeros: every family is incompatible or has an empty support
    let samples: Samples = Samples::new(&[0, 0, 0, 0, 0]).unwrap();
    let selection: ModelSelection = select(&samples, Criterion::Aic, &FitOptions::default());

    assert!(selection.best().is_none());
    assert_eq!(selection.failures.len(), 7);
    assert!(selection.failures.iter().all(|f| !f.reason.is_fatal()));
}

#[test]
fn run_plan_in_order() {
    let plan: RunPlan = RunPlan::new()
        .add("poisson", Criterion::Bic, poisson_sample(5, 2.0, 300))
        .add_raw("raw", "ks-ms", &[0, 1, 1, 2, 3, 5, 8, 13])
        .unwrap();
    assert_eq!(plan.len(), 2);
    assert!(!plan.is_empty());
    assert_eq!(plan.entries()[1].criterion, Criterion::KsModelSelection);

    let outcomes: Vec<RunOutcome> = run_plan(&plan, &FitOptions::default());
    assert_eq!(
        outcomes.iter().map(|o| o.name.as_str()).collect::<Vec<&str>>(),
        vec!["poisson", "raw"]
    );
    assert_eq!(outcomes[0].selection.criterion, Criterion::Bic);
    assert_eq!(outcomes[1].selection.sample_size, 8);
    assert!(outcomes.iter().all(|o| o.selection.best().is_some()));

    assert!(RunPlan::new().is_empty());
    assert_eq!(
        RunPlan::new().add_raw("bad", "aic-ms", &[1, -2]),
        Err(FitError::NegativeValue { index: 1, value: -2 })
    );
    assert_eq!(
        RunPlan::new().add_raw("bad", "r2", &[1, 2]),
        Err(FitError::UnknownCriterion("r2".to_string()))
    );
}

#[test]
fn comparison_of_the_ranking() {
    let samples: Samples = poisson_sample(6, 4.0, 250);
    let selection: ModelSelection = select(&samples, Criterion::Aic, &FitOptions::default());

    let table: ComparisonTable = comparison_table(&samples, &selection.fits());
    assert_eq!(table.families.len(), selection.ranking.len());
    assert_eq!(table.rows.len(), samples.support().len());

    let best_index: usize = 0;
    let best = &selection.ranking[best_index].fit;
    for row in &table.rows {
        assert_approx_eq!(row.models[best_index].0, best.distribution.pmf(row.value));
    }
}
