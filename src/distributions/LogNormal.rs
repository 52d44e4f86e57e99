//! # Log-normal distribution
//!
//! The (discretized) [Log-normal distribution](https://en.wikipedia.org/wiki/Log-normal_distribution).
//!
//! `Y` is log-normal if `ln(Y)` follows a normal distribution with mean `mu`
//! and standard deviation `sigma`. As with the [discrete normal](crate::distributions::Normal::Normal),
//! each integer gets the mass of `[x, x + 1)`. The support is `1 <= x`, so
//! the mass is conditioned on `1 <= Y`:
//!
//! > pmf(x) = (F(x + 1) - F(x)) / (1 - F(1))
//!
//! Note that `F(1) = Phi(-mu / sigma)`, where `Phi` is the cdf of the standard normal.
//!
//! Samples containing a `0` can not be explained by this distribution.

use rand::Rng;

use crate::{
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
    euclid::{ln_std_normal_interval, ln_std_normal_sf, std_normal_interval, std_normal_sf},
};

pub const LOG_NORMAL_DOMAIN: DiscreteDomain = DiscreteDomain::From(1);

static LOG_NORMAL_PARAMETERS: [ParameterDomain; 2] = [
    ParameterDomain::reals("mu"),
    ParameterDomain::greater_than("sigma", 0.0),
];

/// Below this acceptance rate the sampling uses the quantile instead of rejection.
const MINIMUM_REJECTION_ACCEPTANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct LogNormal {
    mu: f64,
    sigma: f64,
    /// `P(1 <= Y)`
    normalization: f64,
    ln_normalization: f64,
}

impl LogNormal {
    /// Creates a new discretized [LogNormal] distribution.
    ///
    ///  - `mu` must be finite.
    ///  - `sigma` must be finite and `0.0 < sigma`.
    ///
    /// Returns [DistributionError::DomainErr] if `P(1 <= Y)` is `0.0` in floating point.
    pub fn new(mu: f64, sigma: f64) -> Result<LogNormal, DistributionError> {
        validate_parameters(Family::LogNormal, &LOG_NORMAL_PARAMETERS, &[mu, sigma])?;

        let normalization: f64 = std_normal_sf(-mu / sigma);
        if normalization <= 0.0 {
            return Err(DistributionError::DomainErr);
        }

        return Ok(LogNormal {
            mu,
            sigma,
            normalization,
            ln_normalization: ln_std_normal_sf(-mu / sigma),
        });
    }

    #[must_use]
    pub const fn get_mu(&self) -> f64 {
        return self.mu;
    }

    #[must_use]
    pub const fn get_sigma(&self) -> f64 {
        return self.sigma;
    }

    /// Standardizes `ln(y)`.
    fn z(&self, y: f64) -> f64 {
        return (y.ln() - self.mu) / self.sigma;
    }
}

impl DiscreteDistribution for LogNormal {
    fn ln_pmf(&self, x: u64) -> f64 {
        if x == 0 {
            return f64::NEG_INFINITY;
        }
        let x: f64 = x as f64;
        return ln_std_normal_interval(self.z(x), self.z(x + 1.0)) - self.ln_normalization;
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &LOG_NORMAL_DOMAIN;
    }

    fn cdf(&self, x: u64) -> f64 {
        if x == 0 {
            return 0.0;
        }
        // z(1) = -mu / sigma
        let mass: f64 = std_normal_interval(self.z(1.0), self.z(x as f64 + 1.0));
        return (mass / self.normalization).min(1.0);
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        return self.sample_multiple(rng, 1)[0];
    }

    fn sample_multiple<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<u64> {
        let log_normal: rand_distr::LogNormal<f64> =
            match rand_distr::LogNormal::new(self.mu, self.sigma) {
                Ok(d) if MINIMUM_REJECTION_ACCEPTANCE <= self.normalization => d,
                _ => return (0..n).map(|_| self.quantile(rng.random::<f64>())).collect(),
            };

        let mut ret: Vec<u64> = Vec::with_capacity(n);
        while ret.len() < n {
            let y: f64 = rand_distr::Distribution::sample(&log_normal, rng);
            // `y` may be inf for a huge `sigma`
            if 1.0 <= y && y.is_finite() {
                ret.push(y.floor() as u64);
            }
        }
        return ret;
    }
}

impl Parametric for LogNormal {
    const FAMILY: Family = Family::LogNormal;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &LOG_NORMAL_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.mu, self.sigma];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(Family::LogNormal, &LOG_NORMAL_PARAMETERS, parameters)?;
        return LogNormal::new(parameters[0], parameters[1]);
    }
}
