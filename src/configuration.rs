//! This file contains the deafult values and other value choices used trough the library.
//!
//! The numerical constants are grouped by the part of the library that uses them.
//! The per-call configuration of a fit is [FitOptions].

use slog::Drain;

use crate::distributions::Family;

/// The library fits Weibull and power-law distributions numerically with
/// the [Nelder-Mead](https://en.wikipedia.org/wiki/Nelder%E2%80%93Mead_method)
/// method (see [crate::optimizer]).
///
/// The search stops when the relative spread of the objective values in the
/// simplex is below [optimizer::RELATIVE_TOLERANCE] or when
/// [optimizer::MAX_ITERATIONS] iterations have been done. Reaching the maximum
/// number of iterations means that the fit did not converge.
pub mod optimizer {
    /// Maximum number of Nelder-Mead iterations for a single fit.
    pub const MAX_ITERATIONS: usize = 1000;

    /// Relative tolerance on the change of the objective (log-likelihood or
    /// KS statistic) across the simplex.
    pub const RELATIVE_TOLERANCE: f64 = 1.0e-8;

    /// Absolute floor added to the relative tolerance so an objective
    /// that converges to `0.0` can still be detected.
    pub const ABSOLUTE_TOLERANCE: f64 = 1.0e-12;

    /// Relative size of the initial simplex around the seed.
    pub const INITIAL_STEP: f64 = 0.05;

    /// Initial step used for coordinates that are exactly `0.0`.
    pub const INITIAL_STEP_AT_ZERO: f64 = 0.00025;

    // Standard Nelder-Mead coefitients
    pub const REFLECTION: f64 = 1.0;
    pub const EXPANSION: f64 = 2.0;
    pub const CONTRACTION: f64 = 0.5;
    pub const SHRINK: f64 = 0.5;
}

/// Constants for the [Hurwitz zeta function](crate::euclid::hurwitz_zeta),
/// the normalizing constant of the power-law families.
pub mod zeta {
    /// The series stops as soon as the last added term is smaller than
    /// `RELATIVE_TOLERANCE` times the accumulated sum.
    pub const RELATIVE_TOLERANCE: f64 = 1.0e-15;

    /// Minimum number of terms summed directly before switching to the
    /// Euler-Maclaurin tail.
    pub const MINIMUM_DIRECT_TERMS: usize = 9;

    /// The direct summation continues at least until the argument
    /// reaches this value.
    pub const MINIMUM_TAIL_START: f64 = 9.0;
}

/// Constants for the power-law families.
pub mod power_law {
    /// Lower bound of the exponent (excluded).
    pub const MINIMUM_EXPONENT: f64 = 1.0;

    /// Exponent used when the Hill estimator can not be computed
    /// (for example when every sample is at the same value).
    pub const DEFAULT_EXPONENT_SEED: f64 = 2.5;

    /// A fitted exponent closer than this to [MINIMUM_EXPONENT] ended on the
    /// border of the domain (the likelihood has no maximum inside it, as
    /// happens when every sample has the same value). Such fits are reported
    /// with `converged = false`.
    pub const DEGENERATE_EXPONENT_MARGIN: f64 = 1.0e-3;

    /// The normalizing constant (and the cdf) of the truncated power-law is
    /// summed term by term when it has at most this many terms. Longer sums
    /// are computed as a difference of 2 zeta functions.
    pub const DIRECT_SUM_LIMIT: u64 = 1000;
}

/// Constants for the goodness of fit evaluation.
pub mod goodness_of_fit {
    /// Number of synthetic samples used for the bootstrap p value.
    pub const DEFAULT_BOOTSTRAP_REPETITIONS: usize = 100;

    /// Seed of the bootstrap when none is provided.
    pub const DEFAULT_BOOTSTRAP_SEED: u64 = 0x5EED;
}

/// Determines the maximum number of steps done by the doubling search of the
/// (deafult) quantile function. `2^62` is already bigger than any sample we
/// can store.
pub static QUANTILE_MAX_DOUBLINGS: u32 = 62;

/// Per-call configuration of the fitting pipeline.
///
/// ```
/// use DiscreteFit::configuration::FitOptions;
/// use DiscreteFit::distributions::Family;
///
/// let options: FitOptions = FitOptions::builder()
///     .families(vec![Family::Poisson, Family::Exponential])
///     .max_iterations(200)
///     .build();
/// assert_eq!(options.families.len(), 2);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct FitOptions {
    /// The families to fit. By deafult all seven.
    #[builder(default = Family::ALL.to_vec())]
    pub families: Vec<Family>,
    /// Iteration cap for every numerical optimization.
    #[builder(default = optimizer::MAX_ITERATIONS)]
    pub max_iterations: usize,
    /// Relative tolerance for the convergence of every numerical optimization.
    #[builder(default = optimizer::RELATIVE_TOLERANCE)]
    pub relative_tolerance: f64,
    /// Fit the families (and the power-law cutoff candidates) in parallel.
    /// The results are identical either way.
    #[builder(default = true)]
    pub parallel: bool,
    /// Where the pipeline logs. By deafult everything is discarded.
    #[builder(default = discard_logger())]
    pub logger: slog::Logger,
}

impl Default for FitOptions {
    fn default() -> Self {
        return FitOptions::builder().build();
    }
}

/// A logger that ignores every record.
#[must_use]
pub fn discard_logger() -> slog::Logger {
    return slog::Logger::root(slog::Discard, slog::o!());
}

/// A logger that writes to the terminal (stderr) asynchronously.
///
/// Pass it to [FitOptions::builder] to follow the progress of a fit:
///
/// ```no_run
/// use DiscreteFit::configuration::{FitOptions, terminal_logger};
///
/// let options: FitOptions = FitOptions::builder().logger(terminal_logger()).build();
/// ```
#[must_use]
pub fn terminal_logger() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    return slog::Logger::root(drain, slog::o!("crate" => "DiscreteFit"));
}
