//! # Goodness of fit
//!
//! Measures how well a fitted distribution describes the sample:
//!
//!  - [ks_statistic]: the [Kolmogorov-Smirnov](https://en.wikipedia.org/wiki/Kolmogorov%E2%80%93Smirnov_test)
//!     distance `D` between the empirical cdf and the cdf of the model.
//!  - [bootstrap_p_value]: the p value of the observed `D`, computed with a
//!     parametric bootstrap (the distribution of `D` is not known when the
//!     parameters were estimated from the same data).
//!  - [comparison_table]: the empirical pmf and cdf next to the ones of each
//!     fitted model.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use slog::{debug, o};

use crate::{
    configuration::{FitOptions, discard_logger, goodness_of_fit},
    distribution_trait::DiscreteDistribution,
    distributions::Family,
    errors::FitError,
    estimation::{FitResult, fit_family},
    samples::Samples,
};

/// Computes the Kolmogorov-Smirnov statistic
///
/// > D = max{x in support} |F_empirical(x) - F_model(x)|
///
/// where the maximum is taken over the distinct values of the sample. The
/// result is always in `[0.0, 1.0]`. If the model cdf is NaN at some point,
/// `D` is `1.0`.
#[must_use]
pub fn ks_statistic<D: DiscreteDistribution>(samples: &Samples, distribution: &D) -> f64 {
    let n: f64 = samples.count() as f64;

    let mut max_distance: f64 = 0.0;
    let mut accumulated: usize = 0;
    for (x, count) in samples.iter_support() {
        accumulated += count;
        let empirical: f64 = accumulated as f64 / n;
        let model: f64 = distribution.cdf(x);
        let distance: f64 = (empirical - model).abs();
        if distance.is_nan() {
            return 1.0;
        }
        if max_distance < distance {
            max_distance = distance;
        }
    }

    return max_distance.clamp(0.0, 1.0);
}

/// Computes the p value of the Kolmogorov-Smirnov statistic of `fit` with a
/// [parametric bootstrap](https://en.wikipedia.org/wiki/Bootstrapping_(statistics)#Parametric_bootstrap).
///
///  1. `repetitions` synthetic samples of the same size as `samples` are
///     drawn from the fitted distribution.
///  2. The same family is fitted to each of them with the same method.
///  3. The p value is the fraction of synthetic samples whose `D` exceeds
///     the observed one.
///
/// The synthetic samples are generated and fitted in parallel, but every
/// replicate has it's own generator seeded from `seed`, so the result only
/// depends on the `seed`.
///
/// Replicates where the fit fails are discarded. If every replicate
/// fails, [FitError::NoValidCandidate] is returned.
///
/// ```
/// use DiscreteFit::estimation::{FitMethod, fit_family};
/// use DiscreteFit::configuration::FitOptions;
/// use DiscreteFit::distributions::Family;
/// use DiscreteFit::goodness_of_fit::bootstrap_p_value;
/// use DiscreteFit::samples::Samples;
///
/// let samples: Samples = Samples::new(&[0, 1, 1, 2, 2, 2, 3, 3, 4, 6]).unwrap();
/// let options: FitOptions = FitOptions::default();
/// let fit = fit_family(Family::Poisson, &samples, FitMethod::MaximumLikelihood, &options).unwrap();
///
/// let p: f64 = bootstrap_p_value()
///     .samples(&samples)
///     .fit(&fit)
///     .repetitions(50)
///     .seed(42)
///     .call()
///     .unwrap();
/// assert!(0.0 <= p && p <= 1.0);
/// ```
#[bon::builder]
pub fn bootstrap_p_value(
    samples: &Samples,
    fit: &FitResult,
    #[builder(default = goodness_of_fit::DEFAULT_BOOTSTRAP_REPETITIONS)] repetitions: usize,
    #[builder(default = goodness_of_fit::DEFAULT_BOOTSTRAP_SEED)] seed: u64,
    options: Option<&FitOptions>,
) -> Result<f64, FitError> {
    let default_options: FitOptions = FitOptions::default();
    let options: &FitOptions = options.unwrap_or(&default_options);
    let logger: slog::Logger = options
        .logger
        .new(o!("family" => fit.family.name(), "bootstrap" => repetitions));

    // the replicates already run in parallel
    let replicate_options: FitOptions = FitOptions {
        families: vec![fit.family],
        parallel: false,
        logger: discard_logger(),
        ..options.clone()
    };

    // one seed per replicate, so the result does not depend on the scheduling
    let mut seeder: StdRng = StdRng::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..repetitions).map(|_| seeder.random::<u64>()).collect();

    let n: usize = samples.count();
    let replicate = |replicate_seed: u64| -> Option<f64> {
        let mut rng: StdRng = StdRng::seed_from_u64(replicate_seed);
        let synthetic: Vec<u64> = fit.distribution.sample_multiple(&mut rng, n);
        let synthetic: Samples = Samples::from_unsigned(synthetic).ok()?;
        let refit: FitResult =
            fit_family(fit.family, &synthetic, fit.method, &replicate_options).ok()?;
        return Some(refit.ks_statistic);
    };

    let statistics: Vec<Option<f64>> = if options.parallel {
        seeds.par_iter().map(|&s| replicate(s)).collect()
    } else {
        seeds.iter().map(|&s| replicate(s)).collect()
    };

    let mut valid: usize = 0;
    let mut exceeding: usize = 0;
    for d in statistics.into_iter().flatten() {
        valid += 1;
        if fit.ks_statistic < d {
            exceeding += 1;
        }
    }

    if valid == 0 {
        return Err(FitError::NoValidCandidate { family: fit.family });
    }

    let p: f64 = exceeding as f64 / valid as f64;
    debug!(logger, "bootstrap finished"; "valid" => valid, "p" => p);
    return Ok(p);
}

/// A row of a [ComparisonTable].
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    /// A value of the support of the sample.
    pub value: u64,
    pub empirical_pmf: f64,
    pub empirical_cdf: f64,
    /// `(pmf, cdf)` of each model at `value`, in the order of [ComparisonTable::families].
    pub models: Vec<(f64, f64)>,
}

/// The empirical pmf and cdf next to the pmf and cdf of each fitted model,
/// at every distinct value of the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub families: Vec<Family>,
    pub rows: Vec<ComparisonRow>,
}

/// Builds the [ComparisonTable] of `samples` and the given `fits`.
#[must_use]
pub fn comparison_table(samples: &Samples, fits: &[FitResult]) -> ComparisonTable {
    let empirical_pmf: Vec<f64> = samples.empirical_pmf();
    let empirical_cdf: Vec<f64> = samples.empirical_cdf();

    let rows: Vec<ComparisonRow> = samples
        .support()
        .iter()
        .enumerate()
        .map(|(i, &value)| ComparisonRow {
            value,
            empirical_pmf: empirical_pmf[i],
            empirical_cdf: empirical_cdf[i],
            models: fits
                .iter()
                .map(|f| (f.distribution.pmf(value), f.distribution.cdf(value)))
                .collect(),
        })
        .collect();

    return ComparisonTable {
        families: fits.iter().map(|f| f.family).collect(),
        rows,
    };
}

impl fmt::Display for ComparisonTable {
    /// Tab separated, one line per row. For each family there is a pmf and a cdf column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value\tp_measured\tF_measured")?;
        for family in &self.families {
            write!(f, "\tp_{family}\tF_{family}")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(
                f,
                "{}\t{:.6e}\t{:.6e}",
                row.value, row.empirical_pmf, row.empirical_cdf
            )?;
            for (pmf, cdf) in &row.models {
                write!(f, "\t{pmf:.6e}\t{cdf:.6e}")?;
            }
            writeln!(f)?;
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::Poisson::Poisson;
    use crate::estimation::FitMethod;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn ks_of_a_matching_model_is_zero() {
        // a sample that matches exactly the cdf of a 2 point distribution
        // (truncated power-law with support {0, 1}).
        let distribution = Family::TruncatedPowerLaw.build(&[2.0, 1.0, 2.0]).unwrap();
        // pmf(0) = 1 / (1 + 1/4) = 0.8
        let samples: Samples = Samples::new(&[0, 0, 0, 0, 1]).unwrap();
        assert_approx_eq!(ks_statistic(&samples, &distribution), 0.0, 1.0e-12);
    }

    #[test]
    fn ks_is_in_unit_interval() {
        let samples: Samples = Samples::new(&[100, 200, 300]).unwrap();
        let poisson: Poisson = Poisson::new(0.5).unwrap();
        let d: f64 = ks_statistic(&samples, &poisson);
        assert!(0.0 <= d && d <= 1.0);
        // the whole mass of the model is below the sample
        assert_approx_eq!(d, 2.0 / 3.0, 1.0e-9);
    }

    #[test]
    fn comparison_table_rows() {
        let samples: Samples = Samples::new(&[0, 1, 1, 3]).unwrap();
        let options: FitOptions = FitOptions::default();
        let fit: FitResult =
            fit_family(Family::Poisson, &samples, FitMethod::MaximumLikelihood, &options).unwrap();
        let table: ComparisonTable = comparison_table(&samples, &[fit.clone()]);

        assert_eq!(table.families, vec![Family::Poisson]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2].value, 3);
        assert_approx_eq!(table.rows[1].empirical_pmf, 0.5);
        assert_approx_eq!(table.rows[1].empirical_cdf, 0.75);
        assert_approx_eq!(table.rows[0].models[0].0, fit.distribution.pmf(0));

        let text: String = table.to_string();
        assert!(text.starts_with("value\tp_measured\tF_measured\tp_poisson\tF_poisson\n"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn bootstrap_is_deterministic() {
        let samples: Samples = Samples::new(&[0, 1, 1, 2, 2, 2, 3, 3, 4, 5, 7]).unwrap();
        let options: FitOptions = FitOptions::default();
        let fit: FitResult =
            fit_family(Family::Poisson, &samples, FitMethod::MaximumLikelihood, &options).unwrap();

        let p_1: f64 = bootstrap_p_value()
            .samples(&samples)
            .fit(&fit)
            .repetitions(40)
            .seed(3)
            .call()
            .unwrap();
        let sequential: FitOptions = FitOptions::builder().parallel(false).build();
        let p_2: f64 = bootstrap_p_value()
            .samples(&samples)
            .fit(&fit)
            .repetitions(40)
            .seed(3)
            .options(&sequential)
            .call()
            .unwrap();
        assert_eq!(p_1, p_2);
        assert!(0.0 <= p_1 && p_1 <= 1.0);
    }
}
