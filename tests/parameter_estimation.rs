//! Testing module for parameter estimation.
//!
//! The recovery tests draw a sample from a known distribution (with a fixed
//! seed) and check that the estimate is close to the real parameters.
//!

use DiscreteFit::configuration::FitOptions;
use DiscreteFit::distribution_trait::DiscreteDistribution;
use DiscreteFit::distributions::{
    Family, Poisson::Poisson, ShiftedPowerLaw::ShiftedPowerLaw, Weibull::Weibull,
};
use DiscreteFit::errors::FitError;
use DiscreteFit::estimation::{FitMethod, FitResult, fit_family, fit_ks, fit_mle};
use DiscreteFit::samples::Samples;
use assert_approx_eq::assert_approx_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn poisson_rate_is_the_mean() {
    let samples: Samples = Samples::new(&[0, 2, 2, 3, 4, 4, 4, 9]).unwrap();
    let fit: FitResult = fit_mle(Family::Poisson, &samples, &FitOptions::default()).unwrap();
    assert_approx_eq!(fit.parameters()[0], samples.mean());
    assert_approx_eq!(fit.parameters()[0], 3.5);
}

#[test]
fn exponential_rate_is_inverse_of_mean() {
    let samples: Samples = Samples::new(&[0, 1, 1, 2, 6]).unwrap();
    let fit: FitResult = fit_mle(Family::Exponential, &samples, &FitOptions::default()).unwrap();
    assert_approx_eq!(fit.parameters()[0], 1.0 / samples.mean());
    assert_approx_eq!(fit.parameters()[0], 0.5);
}

#[test]
fn log_normal_uses_the_log_moments() {
    let samples: Samples = Samples::new(&[1, 2, 4, 8]).unwrap();
    let fit: FitResult = fit_mle(Family::LogNormal, &samples, &FitOptions::default()).unwrap();
    let ln_2: f64 = 2.0_f64.ln();
    // ln(x) = {0, 1, 2, 3} * ln(2)
    assert_approx_eq!(fit.parameters()[0], 1.5 * ln_2, 1.0e-12);
    assert_approx_eq!(fit.parameters()[1], 1.25_f64.sqrt() * ln_2, 1.0e-12);
}

#[test]
fn poisson_recovery() {
    let mut rng: StdRng = StdRng::seed_from_u64(31415);
    let real: Poisson = Poisson::new(3.0).unwrap();
    let samples: Samples = Samples::from_unsigned(real.sample_multiple(&mut rng, 10_000)).unwrap();

    let fit: FitResult = fit_mle(Family::Poisson, &samples, &FitOptions::default()).unwrap();
    println!("{fit}");
    assert_approx_eq!(fit.parameters()[0], 3.0, 0.05);
    assert!(fit.ks_statistic < 0.02);
}

#[test]
fn weibull_recovery() {
    let mut rng: StdRng = StdRng::seed_from_u64(27);
    let real: Weibull = Weibull::new(1.5, 20.0).unwrap();
    let samples: Samples = Samples::from_unsigned(real.sample_multiple(&mut rng, 5000)).unwrap();

    let fit: FitResult = fit_mle(Family::Weibull, &samples, &FitOptions::default()).unwrap();
    println!("{fit}");
    assert!(fit.converged);
    assert_approx_eq!(fit.parameters()[0], 1.5, 0.1);
    assert_approx_eq!(fit.parameters()[1], 20.0, 1.0);
}

#[test]
fn shifted_power_law_recovery() {
    // the cutoff must be found in repeated trials
    for seed in [11, 22, 33] {
        let mut rng: StdRng = StdRng::seed_from_u64(seed);
        let real: ShiftedPowerLaw = ShiftedPowerLaw::new(2.5, 1.0).unwrap();
        let samples: Samples =
            Samples::from_unsigned(real.sample_multiple(&mut rng, 5000)).unwrap();

        let fit: FitResult =
            fit_mle(Family::ShiftedPowerLaw, &samples, &FitOptions::default()).unwrap();
        println!("{fit}");
        let parameters: Vec<f64> = fit.parameters();
        assert_approx_eq!(parameters[0], 2.5, 0.1);
        assert_eq!(parameters[1], 1.0);
    }
}

#[test]
fn sequential_and_parallel_cutoff_scan_agree() {
    let mut rng: StdRng = StdRng::seed_from_u64(5);
    let real: ShiftedPowerLaw = ShiftedPowerLaw::new(2.1, 3.0).unwrap();
    let samples: Samples = Samples::from_unsigned(real.sample_multiple(&mut rng, 500)).unwrap();

    let parallel: FitResult =
        fit_mle(Family::TruncatedPowerLaw, &samples, &FitOptions::default()).unwrap();
    let sequential: FitResult = fit_mle(
        Family::TruncatedPowerLaw,
        &samples,
        &FitOptions::builder().parallel(false).build(),
    )
    .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn normal_fit_with_an_outlier_has_a_finite_likelihood() {
    // the outlier is ~70 standard deviations above the mean
    let mut data: Vec<u64> = (0..5000).map(|i| i % 5).collect();
    data.push(1_000_000);
    let samples: Samples = Samples::from_unsigned(data).unwrap();

    let fit: FitResult = fit_mle(Family::Normal, &samples, &FitOptions::default()).unwrap();
    println!("{fit}");
    assert!(fit.log_likelihood.is_finite());
    assert!(fit.aic.is_finite());
    assert!(fit.bic.is_finite());
}

#[test]
fn non_convergence_is_reported() {
    let samples: Samples = Samples::new(&[0, 1, 1, 2, 3, 3, 4, 8, 15]).unwrap();
    let options: FitOptions = FitOptions::builder().max_iterations(2).build();
    let fit: FitResult = fit_mle(Family::Weibull, &samples, &options).unwrap();
    assert!(!fit.converged);
    assert_eq!(fit.iterations, 2);
    // the best point found is still a valid distribution
    assert!(fit.log_likelihood.is_finite());
}

#[test]
fn ks_fit() {
    let mut rng: StdRng = StdRng::seed_from_u64(8);
    let real: Poisson = Poisson::new(7.0).unwrap();
    let samples: Samples = Samples::from_unsigned(real.sample_multiple(&mut rng, 2000)).unwrap();
    let options: FitOptions = FitOptions::default();

    let mle: FitResult = fit_mle(Family::Poisson, &samples, &options).unwrap();
    let ks: FitResult = fit_ks(Family::Poisson, &samples, &options).unwrap();
    assert_eq!(ks.method, FitMethod::KolmogorovSmirnov);
    assert!(ks.ks_statistic <= mle.ks_statistic + 1.0e-12);
    assert_approx_eq!(ks.parameters()[0], 7.0, 0.3);

    let same: FitResult =
        fit_family(Family::Poisson, &samples, FitMethod::KolmogorovSmirnov, &options).unwrap();
    assert_eq!(same, ks);
}

#[test]
fn incompatible_families_are_errors() {
    let zeros: Samples = Samples::new(&[0, 0, 0, 0]).unwrap();
    let options: FitOptions = FitOptions::default();

    for family in [
        Family::Poisson,
        Family::Exponential,
        Family::LogNormal,
        Family::Normal,
        Family::Weibull,
    ] {
        let result: Result<FitResult, FitError> = fit_mle(family, &zeros, &options);
        assert!(
            matches!(result, Err(FitError::IncompatibleData { .. })),
            "{family}: {result:?}"
        );
    }
    assert_eq!(
        fit_mle(Family::TruncatedPowerLaw, &zeros, &options),
        Err(FitError::EmptySupport { family: Family::TruncatedPowerLaw })
    );
}
