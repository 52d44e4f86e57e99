//! # Model selection
//!
//! Fits every family to a sample and ranks the results with a [Criterion]:
//!
//!  - `mle`: the largest log-likelihood.
//!  - `ks-fit`: the smallest KS statistic, with the parameters fitted by
//!     minimizing the KS statistic.
//!  - `aic-ms`: the smallest [AIC](https://en.wikipedia.org/wiki/Akaike_information_criterion).
//!  - `bic-ms`: the smallest [BIC](https://en.wikipedia.org/wiki/Bayesian_information_criterion).
//!  - `ks-ms`: the smallest KS statistic, with the parameters fitted by
//!     maximum likelihood.
//!
//! Ties are broken by the number of parameters (fewer first) and then by the
//! order of declaration of [Family].
//!
//! Families that could not be fitted (or whose optimizer did not converge)
//! are not ranked, they are listed as failures.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use slog::{info, o, warn};

use crate::{
    configuration::FitOptions,
    distributions::Family,
    errors::FitError,
    estimation::{FitMethod, FitResult, fit_family},
    samples::Samples,
};

/// [Akaike information criterion](https://en.wikipedia.org/wiki/Akaike_information_criterion)
///
/// > AIC = 2 * k - 2 * log_likelihood
#[must_use]
pub fn aic(log_likelihood: f64, number_of_parameters: u16) -> f64 {
    return 2.0 * number_of_parameters as f64 - 2.0 * log_likelihood;
}

/// [Bayesian information criterion](https://en.wikipedia.org/wiki/Bayesian_information_criterion)
///
/// > BIC = k * ln(n) - 2 * log_likelihood
#[must_use]
pub fn bic(log_likelihood: f64, number_of_parameters: u16, sample_size: usize) -> f64 {
    return number_of_parameters as f64 * (sample_size as f64).ln() - 2.0 * log_likelihood;
}

/// The criterion used to rank the families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Criterion {
    /// Largest log-likelihood
    MaximumLikelihood,
    /// Smallest KS statistic, parameters fitted minimizing the KS statistic
    KsFit,
    /// Smallest AIC
    #[default]
    Aic,
    /// Smallest BIC
    Bic,
    /// Smallest KS statistic, parameters fitted by maximum likelihood
    KsModelSelection,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::MaximumLikelihood,
        Criterion::KsFit,
        Criterion::Aic,
        Criterion::Bic,
        Criterion::KsModelSelection,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        return match self {
            Criterion::MaximumLikelihood => "mle",
            Criterion::KsFit => "ks-fit",
            Criterion::Aic => "aic-ms",
            Criterion::Bic => "bic-ms",
            Criterion::KsModelSelection => "ks-ms",
        };
    }

    /// The method used to fit the parameters before ranking.
    #[must_use]
    pub const fn fit_method(self) -> FitMethod {
        return match self {
            Criterion::KsFit => FitMethod::KolmogorovSmirnov,
            _ => FitMethod::MaximumLikelihood,
        };
    }

    /// If the criterion is an information criterion (and so it has
    /// [information weights](RankedModel::weight)).
    #[must_use]
    pub const fn is_information_criterion(self) -> bool {
        return matches!(self, Criterion::Aic | Criterion::Bic);
    }

    /// The value that is minimized.
    #[must_use]
    pub fn score(self, fit: &FitResult) -> f64 {
        return match self {
            Criterion::MaximumLikelihood => -fit.log_likelihood,
            Criterion::KsFit | Criterion::KsModelSelection => fit.ks_statistic,
            Criterion::Aic => fit.aic,
            Criterion::Bic => fit.bic,
        };
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.name());
    }
}

impl FromStr for Criterion {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ret: Criterion = match s.trim().to_lowercase().as_str() {
            "mle" | "mle-fit" => Criterion::MaximumLikelihood,
            "ks-fit" => Criterion::KsFit,
            "aic-ms" | "aic" => Criterion::Aic,
            "bic-ms" | "bic" => Criterion::Bic,
            "ks-ms" | "ks" => Criterion::KsModelSelection,
            _ => return Err(FitError::UnknownCriterion(s.to_string())),
        };
        return Ok(ret);
    }
}

/// A family in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedModel {
    pub fit: FitResult,
    /// The value of the criterion (lower is better).
    pub score: f64,
    /// `score - best score`. `0.0` for the best model.
    pub delta: f64,
    /// The [information weight](https://en.wikipedia.org/wiki/Akaike_information_criterion#How_to_use_AIC_in_practice)
    ///
    /// > w_i = exp(-delta_i / 2) / sumatory{j} exp(-delta_j / 2)
    ///
    /// Only for AIC and BIC, None otherwise.
    pub weight: Option<f64>,
}

/// A family that could not be ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct FitFailure {
    pub family: Family,
    pub reason: FitError,
    /// The best point found, if the optimizer did not converge.
    pub partial: Option<FitResult>,
}

/// The result of a model selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelection {
    pub criterion: Criterion,
    pub sample_size: usize,
    /// Ranked families, best first.
    pub ranking: Vec<RankedModel>,
    pub failures: Vec<FitFailure>,
}

impl ModelSelection {
    /// The best model (if any family could be fitted).
    #[must_use]
    pub fn best(&self) -> Option<&RankedModel> {
        return self.ranking.first();
    }

    /// The position and entry of `family` in the ranking.
    #[must_use]
    pub fn position(&self, family: Family) -> Option<(usize, &RankedModel)> {
        return self
            .ranking
            .iter()
            .enumerate()
            .find(|(_, r)| r.fit.family == family);
    }

    /// The ranked fits, best first. Useful for [crate::goodness_of_fit::comparison_table].
    #[must_use]
    pub fn fits(&self) -> Vec<FitResult> {
        return self.ranking.iter().map(|r| r.fit.clone()).collect();
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "criterion: {} (n = {})", self.criterion, self.sample_size)?;
        for (i, ranked) in self.ranking.iter().enumerate() {
            write!(f, "{:>2}. {} | delta = {:.5}", i + 1, ranked.fit, ranked.delta)?;
            if let Some(w) = ranked.weight {
                write!(f, ", weight = {w:.5}")?;
            }
            writeln!(f)?;
        }
        for failure in &self.failures {
            writeln!(f, " -  {}: {}", failure.family, failure.reason)?;
        }
        return Ok(());
    }
}

/// Fits the families of `options` to `samples` and ranks them with `criterion`.
///
/// The families are fitted in parallel (if `options.parallel`); the result
/// does not depend on it.
///
/// ```
/// use DiscreteFit::configuration::FitOptions;
/// use DiscreteFit::distributions::Family;
/// use DiscreteFit::model_selection::{Criterion, ModelSelection, select};
/// use DiscreteFit::samples::Samples;
///
/// let samples: Samples = Samples::new(&[0, 1, 1, 2, 2, 2, 3, 3, 4, 5]).unwrap();
/// let options: FitOptions = FitOptions::builder()
///     .families(vec![Family::Poisson, Family::Exponential, Family::LogNormal])
///     .build();
///
/// let selection: ModelSelection = select(&samples, Criterion::Aic, &options);
/// // the log-normal can not explain the zeros
/// assert_eq!(selection.ranking.len(), 2);
/// assert_eq!(selection.failures[0].family, Family::LogNormal);
/// ```
#[must_use]
pub fn select(samples: &Samples, criterion: Criterion, options: &FitOptions) -> ModelSelection {
    let logger: slog::Logger = options.logger.new(o!("criterion" => criterion.name()));
    let method: FitMethod = criterion.fit_method();

    let mut families: Vec<Family> = options.families.clone();
    families.sort();
    families.dedup();

    let fit = |family: &Family| -> Result<FitResult, FitError> {
        return fit_family(*family, samples, method, options);
    };
    let results: Vec<Result<FitResult, FitError>> = if options.parallel {
        families.par_iter().map(fit).collect()
    } else {
        families.iter().map(fit).collect()
    };

    let mut ranking: Vec<RankedModel> = Vec::with_capacity(results.len());
    let mut failures: Vec<FitFailure> = Vec::new();
    for (&family, result) in families.iter().zip(results) {
        match result {
            Ok(fit) if fit.converged => ranking.push(RankedModel {
                score: criterion.score(&fit),
                fit,
                delta: 0.0,
                weight: None,
            }),
            Ok(fit) => failures.push(FitFailure {
                family,
                reason: FitError::NonConvergence {
                    iterations: fit.iterations,
                },
                partial: Some(fit),
            }),
            Err(reason) => failures.push(FitFailure {
                family,
                reason,
                partial: None,
            }),
        }
    }

    // `families` is sorted, so a stable sort keeps the declaration order on ties
    ranking.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then(a.fit.number_of_parameters().cmp(&b.fit.number_of_parameters()))
    });

    let best_score: f64 = ranking.first().map_or(f64::NAN, |r| r.score);
    for ranked in &mut ranking {
        ranked.delta = ranked.score - best_score;
    }

    if criterion.is_information_criterion() && best_score.is_finite() {
        let total: f64 = ranking.iter().map(|r| (-0.5 * r.delta).exp()).sum::<f64>();
        for ranked in &mut ranking {
            ranked.weight = Some((-0.5 * ranked.delta).exp() / total);
        }
    }

    for failure in &failures {
        warn!(logger, "family excluded from the ranking";
            "family" => failure.family.name(),
            "reason" => %failure.reason);
    }
    if let Some(best) = ranking.first() {
        info!(logger, "model selection finished";
            "best" => best.fit.family.name(),
            "score" => best.score,
            "ranked" => ranking.len(),
            "failures" => failures.len());
    } else {
        warn!(logger, "no family could be fitted"; "failures" => failures.len());
    }

    return ModelSelection {
        criterion,
        sample_size: samples.count(),
        ranking,
        failures,
    };
}

/// A dataset of a [RunPlan].
#[derive(Debug, Clone, PartialEq)]
pub struct RunEntry {
    pub name: String,
    pub criterion: Criterion,
    pub samples: Samples,
}

/// An explicit list of model selections to run.
///
/// ```
/// use DiscreteFit::configuration::FitOptions;
/// use DiscreteFit::model_selection::{RunPlan, run_plan};
///
/// let plan: RunPlan = RunPlan::new()
///     .add_raw("small", "bic-ms", &[1, 2, 2, 3, 3, 3, 4])
///     .unwrap()
///     .add_raw("other", "ks-ms", &[0, 0, 1, 5, 9])
///     .unwrap();
/// assert_eq!(plan.len(), 2);
///
/// let outcomes = run_plan(&plan, &FitOptions::default());
/// assert_eq!(outcomes[0].name, "small");
/// assert!(outcomes[0].selection.best().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunPlan {
    entries: Vec<RunEntry>,
}

/// The result of a [RunEntry].
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub name: String,
    pub selection: ModelSelection,
}

impl RunPlan {
    #[must_use]
    pub fn new() -> RunPlan {
        return RunPlan::default();
    }

    /// Adds a dataset to the plan.
    #[must_use]
    pub fn add(mut self, name: impl Into<String>, criterion: Criterion, samples: Samples) -> RunPlan {
        self.entries.push(RunEntry {
            name: name.into(),
            criterion,
            samples,
        });
        return self;
    }

    /// Adds a dataset to the plan, validating the name of the criterion and the data.
    ///
    /// Returns [FitError::UnknownCriterion], [FitError::EmptyDataset] or
    /// [FitError::NegativeValue] if they are not valid.
    pub fn add_raw(
        self,
        name: impl Into<String>,
        criterion: &str,
        data: &[i64],
    ) -> Result<RunPlan, FitError> {
        let criterion: Criterion = criterion.parse::<Criterion>()?;
        let samples: Samples = Samples::new(data)?;
        return Ok(self.add(name, criterion, samples));
    }

    #[must_use]
    pub fn entries(&self) -> &[RunEntry] {
        return &self.entries;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

/// Runs every entry of the `plan` (in order).
#[must_use]
pub fn run_plan(plan: &RunPlan, options: &FitOptions) -> Vec<RunOutcome> {
    return plan
        .entries()
        .iter()
        .map(|entry| {
            let entry_options: FitOptions = FitOptions {
                logger: options.logger.new(o!("dataset" => entry.name.clone())),
                ..options.clone()
            };
            RunOutcome {
                name: entry.name.clone(),
                selection: select(&entry.samples, entry.criterion, &entry_options),
            }
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn information_criteria() {
        assert_approx_eq!(aic(-10.0, 2), 24.0);
        assert_approx_eq!(bic(-10.0, 2, 100), 2.0 * 100.0_f64.ln() + 20.0);
        // n > e^2 => BIC >= AIC
        for n in 8..50 {
            assert!(aic(-3.0, 3) <= bic(-3.0, 3, n));
        }
    }

    #[test]
    fn criterion_names() {
        for criterion in Criterion::ALL {
            assert_eq!(criterion.name().parse::<Criterion>(), Ok(criterion));
        }
        assert_eq!("AIC".parse::<Criterion>(), Ok(Criterion::Aic));
        assert_eq!(
            "chi2".parse::<Criterion>(),
            Err(FitError::UnknownCriterion("chi2".to_string()))
        );
        assert_eq!(Criterion::KsFit.fit_method(), FitMethod::KolmogorovSmirnov);
        assert_eq!(Criterion::KsModelSelection.fit_method(), FitMethod::MaximumLikelihood);
    }

    #[test]
    fn weights_sum_to_one() {
        let samples: Samples = Samples::new(&[0, 1, 1, 2, 2, 2, 3, 3, 4, 5, 6, 8]).unwrap();
        let selection: ModelSelection = select(&samples, Criterion::Bic, &FitOptions::default());
        let total: f64 = selection.ranking.iter().filter_map(|r| r.weight).sum::<f64>();
        assert_approx_eq!(total, 1.0, 1.0e-12);
        assert_eq!(selection.ranking[0].delta, 0.0);
        for pair in selection.ranking.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
        // the log-normal can not be fitted (there are zeros)
        assert!(selection.failures.iter().any(|f| f.family == Family::LogNormal));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let samples: Samples = Samples::new(&[1, 1, 2, 3, 3, 4, 7, 10, 15, 2, 1, 1]).unwrap();
        let parallel: ModelSelection = select(&samples, Criterion::Aic, &FitOptions::default());
        let sequential: ModelSelection = select(
            &samples,
            Criterion::Aic,
            &FitOptions::builder().parallel(false).build(),
        );
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn ks_criteria_have_no_weights() {
        let samples: Samples = Samples::new(&[2, 3, 3, 4, 4, 4, 5, 5, 6]).unwrap();
        let options: FitOptions = FitOptions::builder()
            .families(vec![Family::Poisson, Family::Normal])
            .build();
        let selection: ModelSelection = select(&samples, Criterion::KsModelSelection, &options);
        assert!(selection.ranking.iter().all(|r| r.weight.is_none()));
        let text: String = selection.to_string();
        assert!(text.starts_with("criterion: ks-ms (n = 9)\n"));
    }
}
