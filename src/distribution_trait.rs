//! This script contains the interfaces used to comunicate with the distributions.
//!
//!  - [DiscreteDistribution]: a probability distribution over (a subset of)
//!     the non-negative integers.
//!  - [Parametric]: a [DiscreteDistribution] that belongs to a family
//!     indexed by a parameter vector.

use rand::Rng;

use crate::configuration::QUANTILE_MAX_DOUBLINGS;
use crate::distributions::Family;
use crate::domain::{DiscreteDomain, ParameterDomain};
use crate::errors::DistributionError;
use crate::samples::Samples;

/// The trait for any discrete distribution over the non-negative integers.
///
/// None of the provided methods are guaranteed to work if the implemented
/// [DiscreteDistribution::ln_pmf] is NOT the logarithm of a
/// [valid pmf](https://en.wikipedia.org/wiki/Probability_mass_function) or
/// if [DiscreteDistribution::cdf] is not consistent with it.
pub trait DiscreteDistribution {
    //Requiered methods:

    /// Evaluates the logarithm of the [PMF](https://en.wikipedia.org/wiki/Probability_mass_function)
    /// (Probability Mass Function) of the distribution at point `x`.
    ///
    /// Returns `-inf` outside of the domain.
    fn ln_pmf(&self, x: u64) -> f64;

    /// Returns a reference to the pmf domain, wich indicates at wich points the pmf can
    /// be non-zero. The returned domain should be constant and not change.
    fn get_domain(&self) -> &DiscreteDomain;

    /// Evaluates the [CDF](https://en.wikipedia.org/wiki/Cumulative_distribution_function)
    /// (Cumulative distribution function) `P(X <= x)`.
    fn cdf(&self, x: u64) -> f64;

    // Provided methods:

    /// Evaluates the [PMF](https://en.wikipedia.org/wiki/Probability_mass_function)
    /// (Probability Mass Function) of the distribution at point `x`.
    fn pmf(&self, x: u64) -> f64 {
        return self.ln_pmf(x).exp();
    }

    /// Evaluates the log-likelihood of the distribution over the whole sample.
    ///
    /// Returns `-inf` as soon as a sample has probability `0.0`.
    fn log_likelihood(&self, samples: &Samples) -> f64 {
        let mut log_likelihood: f64 = 0.0;
        for (x, count) in samples.iter_support() {
            let ln_p: f64 = self.ln_pmf(x);
            if ln_p == f64::NEG_INFINITY {
                return f64::NEG_INFINITY;
            }
            log_likelihood += count as f64 * ln_p;
        }
        return log_likelihood;
    }

    /// Evaluates the [quantile function](https://en.wikipedia.org/wiki/Quantile_function):
    /// the smallest `x` of the domain such that `p <= cdf(x)`.
    ///  - if `p <= 0.0` the lower bound of the domain is returned.
    ///  - **Panicks** is `p` is a NaN.
    ///
    /// The deafult implementation brackets the answer by doubling a step and then
    /// bisects, so it only needs `O(log(x))` evaluations of the cdf.
    fn quantile(&self, p: f64) -> u64 {
        if p.is_nan() {
            panic!("Tried to evaluate the quantile function with a NaN value. \n");
        }

        let (min, max): (u64, Option<u64>) = self.get_domain().get_bounds();
        let max: u64 = max.unwrap_or(u64::MAX);

        if p <= self.cdf(min) {
            return min;
        }

        // invariant: cdf(low) < p
        let mut low: u64 = min;
        let mut step: u64 = 1;
        let mut high: u64;
        let mut doublings: u32 = 0;
        loop {
            let candidate: u64 = low.saturating_add(step).min(max);
            if p <= self.cdf(candidate) {
                high = candidate;
                break;
            }
            if candidate == max || QUANTILE_MAX_DOUBLINGS <= doublings {
                // the cdf did not reach `p` (rounding), return the last point
                return candidate;
            }
            low = candidate;
            step = step.saturating_mul(2);
            doublings += 1;
        }

        // invariant: cdf(low) < p <= cdf(high)
        while 1 < high - low {
            let middle: u64 = low + (high - low) / 2;
            if p <= self.cdf(middle) {
                high = middle;
            } else {
                low = middle;
            }
        }

        return high;
    }

    /// Samples the distribution at random.
    ///
    /// The deafult method is [Inverse transform sampling](https://en.wikipedia.org/wiki/Inverse_transform_sampling).
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let u: f64 = rng.random::<f64>();
        return self.quantile(u);
    }

    /// Generates `n` samples of the distribution.
    fn sample_multiple<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<u64> {
        return (0..n).map(|_| self.sample(rng)).collect::<Vec<u64>>();
    }
}

/// The trait for a distribution that belongs to a parametric family.
///
/// The parameters are given (and returned) as a slice in a fixed order.
/// The order and valid values of the parameters are described by
/// [Parametric::parameter_domain].
pub trait Parametric: DiscreteDistribution + Sized {
    /// The family this distribution belongs to.
    const FAMILY: Family;

    /// The valid values for each parameter (in order).
    fn parameter_domain() -> &'static [ParameterDomain];

    /// Returns the number of parameters of the distribution.
    fn number_of_parameters() -> u16 {
        return Self::parameter_domain().len() as u16;
    }

    /// Returns the parameters of the distribution (in the order of
    /// [Parametric::parameter_domain]).
    fn get_parameters(&self) -> Vec<f64>;

    /// Creates a new distribution from the parameter vector.
    ///
    /// Returns [DistributionError::InvalidParameter] if any of the parameters is
    /// not valid and [DistributionError::WrongNumberOfParameters] if the length
    /// is not [Parametric::number_of_parameters].
    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError>;
}

/// Checks the `parameters` against the `domains` of the `family`.
pub fn validate_parameters(
    family: Family,
    domains: &[ParameterDomain],
    parameters: &[f64],
) -> Result<(), DistributionError> {
    if parameters.len() != domains.len() {
        return Err(DistributionError::WrongNumberOfParameters {
            family,
            expected: domains.len(),
            found: parameters.len(),
        });
    }

    for (domain, &value) in domains.iter().zip(parameters) {
        if !domain.contains(value) {
            return Err(DistributionError::InvalidParameter {
                family,
                parameter: domain.name,
                value,
            });
        }
    }

    return Ok(());
}
