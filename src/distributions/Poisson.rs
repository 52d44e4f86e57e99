//! # Poisson distribution
//!
//! The [Poisson distribution](https://en.wikipedia.org/wiki/Poisson_distribution)
//! is a discrete distribution that counts the number of poisson events in a
//! given time with a given rate.
//!
//! The poisson distribution has a single parameter: the rate `lambda`. Lambda
//! represents the avarage number of events that happen in a given amount of time.
//!
//! The maximum likelihood estimator of `lambda` is the sample mean.

use rand::Rng;
use statrs::function::gamma::{gamma_ur, ln_gamma};

use crate::{
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
};

pub const POISSON_DOMAIN: DiscreteDomain = DiscreteDomain::From(0);

static POISSON_PARAMETERS: [ParameterDomain; 1] = [ParameterDomain::greater_than("rate", 0.0)];

#[derive(Debug, Clone, PartialEq)]
pub struct Poisson {
    lambda: f64,
    ln_lambda: f64,
}

impl Poisson {
    /// Creates a new [Poisson] distribution.
    ///
    ///  - `lambda` indicates rate. And must fullfill:
    ///      - Must be finite (no `+-inf` nor NaNs)
    ///      - `0.0 < lambda`
    ///
    /// Otherwise an error will be returned.
    pub fn new(lambda: f64) -> Result<Poisson, DistributionError> {
        validate_parameters(Family::Poisson, &POISSON_PARAMETERS, &[lambda])?;
        return Ok(Poisson {
            lambda,
            ln_lambda: lambda.ln(),
        });
    }

    /// Returns the value of `lambda`
    #[must_use]
    pub const fn get_lambda(&self) -> f64 {
        return self.lambda;
    }
}

impl DiscreteDistribution for Poisson {
    fn ln_pmf(&self, x: u64) -> f64 {
        /* Usual definition:
         > P(x | lambda) = exp(-lambda) * lambda^x / x!

        But for better precision, we will use the log:

         > ln(P(x | lambda)) = x * ln(lambda) - lambda - ln(Gamma(x + 1))
        */
        let x: f64 = x as f64;
        return x * self.ln_lambda - self.lambda - ln_gamma(x + 1.0);
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &POISSON_DOMAIN;
    }

    fn cdf(&self, x: u64) -> f64 {
        // P(X <= x) = Q(x + 1, lambda), the regularized upper incomplete gamma
        return gamma_ur(x as f64 + 1.0, self.lambda);
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        return match rand_distr::Poisson::new(self.lambda) {
            Ok(poisson) => {
                let v: f64 = rand_distr::Distribution::sample(&poisson, rng);
                v as u64
            }
            Err(_) => self.quantile(rng.random::<f64>()),
        };
    }

    fn sample_multiple<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<u64> {
        // build the sampler only once
        let poisson: rand_distr::Poisson<f64> = match rand_distr::Poisson::new(self.lambda) {
            Ok(p) => p,
            Err(_) => return (0..n).map(|_| self.quantile(rng.random::<f64>())).collect(),
        };

        return (0..n)
            .map(|_| {
                let v: f64 = rand_distr::Distribution::sample(&poisson, rng);
                v as u64
            })
            .collect::<Vec<u64>>();
    }
}

impl Parametric for Poisson {
    const FAMILY: Family = Family::Poisson;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &POISSON_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.lambda];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(Family::Poisson, &POISSON_PARAMETERS, parameters)?;
        return Poisson::new(parameters[0]);
    }
}
