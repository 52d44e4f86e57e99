//! # Exponential distribution
//!
//! The (discretized) [Exponential distribution](https://en.wikipedia.org/wiki/Exponential_distribution).
//!
//! The mass of `x` is the probability that a continuous exponential with the
//! same `rate` falls in `[x, x + 1)`:
//!
//! > pmf(x) = (1 - exp(-rate)) * exp(-rate * x)
//!
//! (wich is a [Geometric distribution](https://en.wikipedia.org/wiki/Geometric_distribution)
//! starting at `0`). The exponential distribution has a parameter: the rate `lambda`.

use rand::Rng;

use crate::{
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
    euclid::ln_one_minus_exp,
};

pub const EXPONENTIAL_DOMAIN: DiscreteDomain = DiscreteDomain::From(0);

static EXPONENTIAL_PARAMETERS: [ParameterDomain; 1] =
    [ParameterDomain::greater_than("rate", 0.0)];

/// A discretized [Exponential distribution](https://en.wikipedia.org/wiki/Exponential_distribution).
#[derive(Debug, Clone, PartialEq)]
pub struct Exponential {
    lambda: f64,
    /// `ln(1 - exp(-lambda))`
    ln_normalization: f64,
}

impl Exponential {
    /// Creates a new [Exponential] distribution. It is requiered that `0.0 < lambda`
    /// (and finite) or an error will be returned.
    pub fn new(lambda: f64) -> Result<Exponential, DistributionError> {
        validate_parameters(Family::Exponential, &EXPONENTIAL_PARAMETERS, &[lambda])?;

        return Ok(Exponential {
            lambda,
            ln_normalization: ln_one_minus_exp(-lambda),
        });
    }

    #[must_use]
    pub const fn get_lambda(&self) -> f64 {
        return self.lambda;
    }
}

impl DiscreteDistribution for Exponential {
    fn ln_pmf(&self, x: u64) -> f64 {
        return self.ln_normalization - self.lambda * x as f64;
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &EXPONENTIAL_DOMAIN;
    }

    fn cdf(&self, x: u64) -> f64 {
        // 1 - exp(-lambda * (x + 1))
        return -(-self.lambda * (x as f64 + 1.0)).exp_m1();
    }

    fn quantile(&self, p: f64) -> u64 {
        if p.is_nan() {
            panic!("Tried to evaluate the quantile function with a NaN value. \n");
        }
        if p <= 0.0 {
            return 0;
        }
        if 1.0 <= p {
            return u64::MAX;
        }

        // smallest x such that p <= 1 - exp(-lambda * (x + 1))
        let continuous: f64 = -(-p).ln_1p() / self.lambda - 1.0;
        return continuous.ceil().max(0.0) as u64;
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        // floor of a continuous exponential. `1 - r` is in (0, 1]
        let r: f64 = rng.random::<f64>();
        let continuous: f64 = -(1.0 - r).ln() / self.lambda;
        return continuous.floor() as u64;
    }
}

impl Parametric for Exponential {
    const FAMILY: Family = Family::Exponential;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &EXPONENTIAL_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.lambda];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(Family::Exponential, &EXPONENTIAL_PARAMETERS, parameters)?;
        return Exponential::new(parameters[0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn pmf_is_a_geometric() {
        let lambda: f64 = 0.7;
        let exponential: Exponential = Exponential::new(lambda).unwrap();
        let q: f64 = (-lambda).exp();
        for x in 0..10_u64 {
            assert_approx_eq!(exponential.pmf(x), (1.0 - q) * q.powi(x as i32), 1.0e-14);
        }
        let total: f64 = (0..200).map(|x| exponential.pmf(x)).sum::<f64>();
        assert_approx_eq!(total, 1.0, 1.0e-12);
    }

    #[test]
    fn cdf_matches_partial_sums() {
        let exponential: Exponential = Exponential::new(0.2).unwrap();
        let mut accumulated: f64 = 0.0;
        for x in 0..30 {
            accumulated += exponential.pmf(x);
            assert_approx_eq!(exponential.cdf(x), accumulated, 1.0e-12);
        }
    }

    #[test]
    fn quantile_is_inverse_of_cdf() {
        let exponential: Exponential = Exponential::new(0.35).unwrap();
        for x in 0..20 {
            assert_eq!(exponential.quantile(exponential.cdf(x) - 1.0e-12), x);
        }
    }
}
