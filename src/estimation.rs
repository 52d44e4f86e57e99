//! # Estimation
//!
//! Fits the parameters of a [Family] to a sample.
//!
//! There are 2 methods ([FitMethod]):
//!
//!  - [Maximum likelihood](https://en.wikipedia.org/wiki/Maximum_likelihood_estimation)
//!     ([fit_mle]): finds the parameters that maximize the log-likelihood
//!     `sumatory{x_i} ln(pmf(x_i))`.
//!  - Minimum distance ([fit_ks]): finds the parameters that minimize the
//!     Kolmogorov-Smirnov statistic. The search starts at the maximum
//!     likelihood estimate.
//!
//! The Poisson, exponential, normal and log-normal families have closed form
//! estimators. The Weibull family and the exponent of the power-laws are
//! found numerically with [Nelder-Mead](crate::optimizer). The lower cutoff
//! of the power-laws is chosen with a scan over the distinct positive values
//! of the sample: the cutoff with the smallest KS statistic wins.

use std::fmt;

use rayon::prelude::*;
use slog::{debug, o, warn};
use statrs::function::gamma::gamma;

use crate::{
    configuration::{FitOptions, power_law},
    distribution_trait::DiscreteDistribution,
    distributions::{
        Exponential::Exponential, Family, FittedDistribution, LogNormal::LogNormal,
        Normal::Normal, Poisson::Poisson,
    },
    errors::FitError,
    goodness_of_fit::ks_statistic,
    model_selection::{aic, bic},
    optimizer::{Minimum, Settings, from_greater_than, minimize, to_greater_than},
    samples::{SampleProperties, Samples},
};

/// The method used to fit the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FitMethod {
    /// Maximize the log-likelihood
    #[default]
    MaximumLikelihood,
    /// Minimize the Kolmogorov-Smirnov statistic
    KolmogorovSmirnov,
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            FitMethod::MaximumLikelihood => "mle",
            FitMethod::KolmogorovSmirnov => "ks",
        };
        return write!(f, "{name}");
    }
}

/// The result of fitting a family to a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub family: Family,
    /// The fitted distribution. It's parameters can be obtained with
    /// [FitResult::parameters].
    pub distribution: FittedDistribution,
    /// Log-likelihood of the sample with the fitted parameters. May be `-inf`.
    pub log_likelihood: f64,
    /// Kolmogorov-Smirnov statistic `D`, in `[0.0, 1.0]`
    pub ks_statistic: f64,
    pub aic: f64,
    pub bic: f64,
    /// False if the optimizer reached the iteration cap.
    pub converged: bool,
    /// Number of iterations of the optimizer (`0` for closed forms).
    pub iterations: usize,
    pub method: FitMethod,
}

impl FitResult {
    /// Evaluates every statistic of `distribution` over `samples`.
    #[must_use]
    pub fn new(
        distribution: FittedDistribution,
        samples: &Samples,
        converged: bool,
        iterations: usize,
        method: FitMethod,
    ) -> FitResult {
        let log_likelihood: f64 = distribution.log_likelihood(samples);
        let k: u16 = distribution.number_of_parameters();
        let n: usize = samples.count();

        return FitResult {
            family: distribution.family(),
            log_likelihood,
            ks_statistic: ks_statistic(samples, &distribution),
            aic: aic(log_likelihood, k),
            bic: bic(log_likelihood, k, n),
            converged,
            iterations,
            method,
            distribution,
        };
    }

    #[must_use]
    pub fn parameters(&self) -> Vec<f64> {
        return self.distribution.parameters();
    }

    #[must_use]
    pub fn number_of_parameters(&self) -> u16 {
        return self.family.number_of_parameters();
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(
            f,
            "{} [{}] log-likelihood = {:.5}, D = {:.5}, AIC = {:.5}, BIC = {:.5}, converged = {}",
            self.distribution,
            self.method,
            self.log_likelihood,
            self.ks_statistic,
            self.aic,
            self.bic,
            self.converged
        );
    }
}

/// Fits `family` to `samples` with the given `method`.
pub fn fit_family(
    family: Family,
    samples: &Samples,
    method: FitMethod,
    options: &FitOptions,
) -> Result<FitResult, FitError> {
    return match method {
        FitMethod::MaximumLikelihood => fit_mle(family, samples, options),
        FitMethod::KolmogorovSmirnov => fit_ks(family, samples, options),
    };
}

/// Fits `family` to `samples` by maximum likelihood.
///
/// If the optimizer reaches the iteration cap the best point found is
/// returned with `converged = false`. The same happens when the exponent of
/// a power-law ends within [power_law::DEGENERATE_EXPONENT_MARGIN] of it's
/// lower bound, for example when every sample has the same value.
///
/// Errors:
///  - [FitError::IncompatibleData] if the sample can not be described by the
///     family (every sample is `0` for the Poisson, exponential or Weibull, the
///     variance is `0` for the normal, the sample contains a `0` for the log-normal...).
///  - [FitError::EmptySupport] for the truncated power-law if every sample is `0`.
///  - [FitError::NoValidCandidate] if the optimizer did not find any point
///     with a finite log-likelihood.
pub fn fit_mle(family: Family, samples: &Samples, options: &FitOptions) -> Result<FitResult, FitError> {
    let logger: slog::Logger = options.logger.new(o!("family" => family.name(), "method" => "mle"));
    let settings: Settings = settings(options);

    let result: FitResult = match family {
        Family::Poisson => fit_poisson(samples)?,
        Family::Exponential => fit_exponential(samples)?,
        Family::LogNormal => fit_log_normal(samples)?,
        Family::Normal => fit_normal(samples)?,
        Family::Weibull => {
            // no maximum, the likelihood tends to 1 as the scale goes to 0
            if samples.maximum() == 0 {
                return Err(incompatible(family, "every sample is 0"));
            }
            let seed: Vec<f64> = weibull_seed(samples);
            search(family, samples, &seed, Objective::NegativeLogLikelihood, &settings)?
        }
        Family::ShiftedPowerLaw | Family::TruncatedPowerLaw => {
            fit_power_law(family, samples, options, &settings)?
        }
    };

    log_result(&logger, &result);
    return Ok(result);
}

/// Fits `family` to `samples` minimizing the Kolmogorov-Smirnov statistic.
///
/// The search starts at the maximum likelihood estimate (see [fit_mle]). The
/// cutoffs of the power-laws are kept at their maximum likelihood values and
/// only the exponent is searched. The log-likelihood is evaluated at the
/// final parameters.
pub fn fit_ks(family: Family, samples: &Samples, options: &FitOptions) -> Result<FitResult, FitError> {
    let mle: FitResult = fit_mle(family, samples, options)?;

    let logger: slog::Logger = options.logger.new(o!("family" => family.name(), "method" => "ks"));
    let settings: Settings = settings(options);

    let result: FitResult = search(
        family,
        samples,
        &mle.parameters(),
        Objective::KsStatistic,
        &settings,
    )?;

    log_result(&logger, &result);
    return Ok(result);
}

fn settings(options: &FitOptions) -> Settings {
    return Settings::builder()
        .max_iterations(options.max_iterations)
        .relative_tolerance(options.relative_tolerance)
        .build();
}

fn log_result(logger: &slog::Logger, result: &FitResult) {
    if result.converged {
        debug!(logger, "fitted";
            "parameters" => ?result.parameters(),
            "log_likelihood" => result.log_likelihood,
            "ks" => result.ks_statistic,
            "iterations" => result.iterations);
    } else {
        warn!(logger, "the optimizer did not converge";
            "parameters" => ?result.parameters(),
            "iterations" => result.iterations);
    }
}

fn incompatible(family: Family, reason: &'static str) -> FitError {
    return FitError::IncompatibleData { family, reason };
}

fn closed_form(distribution: FittedDistribution, samples: &Samples) -> FitResult {
    return FitResult::new(distribution, samples, true, 0, FitMethod::MaximumLikelihood);
}

fn fit_poisson(samples: &Samples) -> Result<FitResult, FitError> {
    let mean: f64 = samples.mean();
    if mean <= 0.0 {
        return Err(incompatible(Family::Poisson, "every sample is 0"));
    }
    let poisson: Poisson = Poisson::new(mean)?;
    return Ok(closed_form(FittedDistribution::Poisson(poisson), samples));
}

fn fit_exponential(samples: &Samples) -> Result<FitResult, FitError> {
    let mean: f64 = samples.mean();
    if mean <= 0.0 {
        return Err(incompatible(Family::Exponential, "every sample is 0"));
    }
    let exponential: Exponential = Exponential::new(1.0 / mean)?;
    return Ok(closed_form(FittedDistribution::Exponential(exponential), samples));
}

fn fit_normal(samples: &Samples) -> Result<FitResult, FitError> {
    let variance: f64 = samples.variance();
    if variance <= 0.0 {
        return Err(incompatible(Family::Normal, "the variance of the sample is 0"));
    }
    let normal: Normal = Normal::new(samples.mean(), variance.sqrt())?;
    return Ok(closed_form(FittedDistribution::Normal(normal), samples));
}

fn fit_log_normal(samples: &Samples) -> Result<FitResult, FitError> {
    let properties: &SampleProperties = samples.peek_properties();
    let (log_mean, log_variance): (f64, f64) = match (properties.log_mean, properties.log_variance) {
        (Some(m), Some(v)) => (m, v),
        _ => return Err(incompatible(Family::LogNormal, "the sample contains 0")),
    };
    if log_variance <= 0.0 {
        return Err(incompatible(
            Family::LogNormal,
            "the variance of the logarithm of the sample is 0",
        ));
    }
    let log_normal: LogNormal = LogNormal::new(log_mean, log_variance.sqrt())?;
    return Ok(closed_form(FittedDistribution::LogNormal(log_normal), samples));
}

/// Initial `[shape, scale]` for the Weibull search (method of moments).
fn weibull_seed(samples: &Samples) -> Vec<f64> {
    /*
            Plan:

        The coefitient of variation of a Weibull only depends on the shape and
        is aproximately `cv = k^(-1/1.086)`. Then the mean gives the scale:

            mean = lambda * Gamma(1 + 1/k)

        We add `0.5` to the mean so it represents the continuous variable
        (the discretization floors the samples).
    */
    let mean: f64 = samples.mean() + 0.5;
    let cv: f64 = samples.variance().sqrt() / mean;

    let mut shape: f64 = cv.powf(-1.086);
    if !shape.is_finite() {
        shape = 50.0;
    }
    shape = shape.clamp(0.1, 50.0);

    let mut scale: f64 = mean / gamma(1.0 + 1.0 / shape);
    if !scale.is_finite() || scale <= 0.0 {
        scale = mean;
    }

    return vec![shape, scale];
}

/// The discrete Hill estimator of the exponent of a power-law of `x + x_min`:
///
/// > alpha = 1 + n / sumatory{x_i} ln((x_i + x_min) / (x_min - 0.5))
///
/// See [Clauset et al. (2009)](https://arxiv.org/abs/0706.1062), eq. 3.7.
fn hill_estimator(samples: &Samples, x_min: f64) -> f64 {
    let n: f64 = samples.count() as f64;
    let denominator: f64 = samples.sum_ln_shifted(x_min) - n * (x_min - 0.5).ln();
    let alpha: f64 = 1.0 + n / denominator;
    if !alpha.is_finite() || alpha <= power_law::MINIMUM_EXPONENT {
        return power_law::DEFAULT_EXPONENT_SEED;
    }
    // away from the border of the domain so the simplex can move in both directions
    return alpha.max(power_law::MINIMUM_EXPONENT + 0.05);
}

/// Fits a power-law: scans every cutoff candidate and keeps the one with
/// the smallest KS statistic. Ties go to the smaller cutoff. A candidate
/// with a degenerate exponent (see [has_degenerate_exponent]) only wins if
/// every other candidate is degenerate too.
fn fit_power_law(
    family: Family,
    samples: &Samples,
    options: &FitOptions,
    settings: &Settings,
) -> Result<FitResult, FitError> {
    let maximum: f64 = samples.maximum() as f64;
    if family == Family::TruncatedPowerLaw && maximum <= 0.0 {
        return Err(FitError::EmptySupport { family });
    }

    let candidates: Vec<u64> = samples
        .support()
        .iter()
        .copied()
        .filter(|&x| 0 < x)
        .collect();
    if candidates.is_empty() {
        return Err(incompatible(family, "there are no positive values to use as cutoff"));
    }

    let fit_candidate = |x_min: u64| -> Option<FitResult> {
        let x_min: f64 = x_min as f64;
        let alpha: f64 = hill_estimator(samples, x_min);
        let initial: Vec<f64> = match family {
            Family::TruncatedPowerLaw => vec![alpha, x_min, maximum + x_min],
            _ => vec![alpha, x_min],
        };
        return search(family, samples, &initial, Objective::NegativeLogLikelihood, settings).ok();
    };

    let results: Vec<Option<FitResult>> = if options.parallel {
        candidates.par_iter().map(|&c| fit_candidate(c)).collect()
    } else {
        candidates.iter().map(|&c| fit_candidate(c)).collect()
    };

    // in increasing order of cutoff, so the first minimum is the smallest cutoff
    let mut best: Option<FitResult> = None;
    for result in results.into_iter().flatten() {
        let better: bool = match &best {
            Some(b) => {
                let degenerate: bool = has_degenerate_exponent(family, &result.parameters());
                let best_degenerate: bool = has_degenerate_exponent(family, &b.parameters());
                match (degenerate, best_degenerate) {
                    (false, true) => true,
                    (true, false) => false,
                    _ => result.ks_statistic < b.ks_statistic,
                }
            }
            None => true,
        };
        if better {
            best = Some(result);
        }
    }

    return best.ok_or(FitError::NoValidCandidate { family });
}

/// True if `parameters` are of a power-law whose exponent ended against the
/// lower bound of it's domain.
fn has_degenerate_exponent(family: Family, parameters: &[f64]) -> bool {
    return matches!(family, Family::ShiftedPowerLaw | Family::TruncatedPowerLaw)
        && parameters[0] - power_law::MINIMUM_EXPONENT < power_law::DEGENERATE_EXPONENT_MARGIN;
}

/// What [search] minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Objective {
    NegativeLogLikelihood,
    KsStatistic,
}

/// Maps the parameters that are searched to the (unconstrained) search space.
///
/// The cutoffs of the power-laws are not searched.
fn to_search_space(family: Family, parameters: &[f64]) -> Vec<f64> {
    return match family {
        Family::Poisson | Family::Exponential => vec![parameters[0].ln()],
        Family::LogNormal | Family::Normal => vec![parameters[0], parameters[1].ln()],
        Family::Weibull => vec![parameters[0].ln(), parameters[1].ln()],
        Family::ShiftedPowerLaw | Family::TruncatedPowerLaw => {
            vec![from_greater_than(parameters[0], power_law::MINIMUM_EXPONENT)]
        }
    };
}

/// Inverse of [to_search_space]. The parameters that are not searched are
/// copied from `template`.
fn from_search_space(family: Family, point: &[f64], template: &[f64]) -> Vec<f64> {
    let mut parameters: Vec<f64> = template.to_vec();
    match family {
        Family::Poisson | Family::Exponential => parameters[0] = point[0].exp(),
        Family::LogNormal | Family::Normal => {
            parameters[0] = point[0];
            parameters[1] = point[1].exp();
        }
        Family::Weibull => {
            parameters[0] = point[0].exp();
            parameters[1] = point[1].exp();
        }
        Family::ShiftedPowerLaw | Family::TruncatedPowerLaw => {
            parameters[0] = to_greater_than(point[0], power_law::MINIMUM_EXPONENT);
        }
    }
    return parameters;
}

/// Minimizes the `objective` with Nelder-Mead starting at `initial` (a full
/// parameter vector of `family`).
fn search(
    family: Family,
    samples: &Samples,
    initial: &[f64],
    objective: Objective,
    settings: &Settings,
) -> Result<FitResult, FitError> {
    let method: FitMethod = match objective {
        Objective::NegativeLogLikelihood => FitMethod::MaximumLikelihood,
        Objective::KsStatistic => FitMethod::KolmogorovSmirnov,
    };

    let cost = |point: &[f64]| -> f64 {
        let parameters: Vec<f64> = from_search_space(family, point, initial);
        let distribution: FittedDistribution = match family.build(&parameters) {
            Ok(d) => d,
            Err(_) => return f64::INFINITY,
        };
        return match objective {
            Objective::NegativeLogLikelihood => -distribution.log_likelihood(samples),
            Objective::KsStatistic => ks_statistic(samples, &distribution),
        };
    };

    let minimum: Minimum = minimize(cost, &to_search_space(family, initial), settings);
    if !minimum.value.is_finite() {
        return Err(FitError::NoValidCandidate { family });
    }

    let parameters: Vec<f64> = from_search_space(family, &minimum.point, initial);
    let distribution: FittedDistribution = family.build(&parameters)?;
    // the simplex also stops once the exponent flattens against the bound
    let converged: bool = minimum.converged && !has_degenerate_exponent(family, &parameters);
    return Ok(FitResult::new(
        distribution,
        samples,
        converged,
        minimum.iterations,
        method,
    ));
}
