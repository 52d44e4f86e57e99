//! # Normal distribution
//!
//! The (discretized) [Normal distribution](https://en.wikipedia.org/wiki/Normal_distribution).
//!
//! A normal random variable `Y` can take any real value, but the samples we
//! work with are non-negative integers. The discrete [Normal] assigns to each
//! integer `x` the mass of the interval `[x, x + 1)`, conditioned on `0 <= Y`:
//!
//! > pmf(x) = (F(x + 1) - F(x)) / (1 - F(0))
//!
//! where `F` is the cdf of the continuous normal with the same `mu` and `sigma`.
//! Equivalently, a sample is `floor(Y)` for a `Y` that was not negative.
//!
//! The parameters are the mean `mu` of `Y` (any real) and it's standard
//! deviation `sigma` (`0.0 < sigma`).

use rand::Rng;

use crate::{
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
    euclid::{ln_std_normal_interval, ln_std_normal_sf, std_normal_interval, std_normal_sf},
};

pub const NORMAL_DOMAIN: DiscreteDomain = DiscreteDomain::From(0);

static NORMAL_PARAMETERS: [ParameterDomain; 2] = [
    ParameterDomain::reals("mu"),
    ParameterDomain::greater_than("sigma", 0.0),
];

/// If less than this fraction of the mass of `Y` is at `0 <= Y`, rejection
/// sampling is too slow and we use the quantile instead.
const MINIMUM_REJECTION_ACCEPTANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
    /// `P(0 <= Y)`
    normalization: f64,
    /// `ln(P(0 <= Y))`
    ln_normalization: f64,
}

impl Normal {
    /// Creates a new discretized [Normal] distribution.
    ///
    ///  - `mu` must be finite.
    ///  - `sigma` must be finite and `0.0 < sigma`.
    ///
    /// If almost all the mass of the continuous normal is negative (so
    /// `P(0 <= Y)` is `0.0` in floating point) the distribution can not be
    /// normalized and [DistributionError::DomainErr] is returned.
    pub fn new(mu: f64, sigma: f64) -> Result<Normal, DistributionError> {
        validate_parameters(Family::Normal, &NORMAL_PARAMETERS, &[mu, sigma])?;

        let normalization: f64 = std_normal_sf(-mu / sigma);
        if normalization <= 0.0 {
            return Err(DistributionError::DomainErr);
        }

        return Ok(Normal {
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

    /// Standardizes `x`
    fn z(&self, x: f64) -> f64 {
        return (x - self.mu) / self.sigma;
    }
}

impl DiscreteDistribution for Normal {
    fn ln_pmf(&self, x: u64) -> f64 {
        let x: f64 = x as f64;
        return ln_std_normal_interval(self.z(x), self.z(x + 1.0)) - self.ln_normalization;
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &NORMAL_DOMAIN;
    }

    fn cdf(&self, x: u64) -> f64 {
        let mass: f64 = std_normal_interval(self.z(0.0), self.z(x as f64 + 1.0));
        return (mass / self.normalization).min(1.0);
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        return self.sample_multiple(rng, 1)[0];
    }

    fn sample_multiple<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<u64> {
        let normal: rand_distr::Normal<f64> = match rand_distr::Normal::new(self.mu, self.sigma) {
            Ok(d) if MINIMUM_REJECTION_ACCEPTANCE <= self.normalization => d,
            _ => return (0..n).map(|_| self.quantile(rng.random::<f64>())).collect(),
        };

        // rejection: keep only the non-negative samples
        let mut ret: Vec<u64> = Vec::with_capacity(n);
        while ret.len() < n {
            let y: f64 = rand_distr::Distribution::sample(&normal, rng);
            if 0.0 <= y {
                ret.push(y.floor() as u64);
            }
        }
        return ret;
    }
}

impl Parametric for Normal {
    const FAMILY: Family = Family::Normal;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &NORMAL_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.mu, self.sigma];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(Family::Normal, &NORMAL_PARAMETERS, parameters)?;
        return Normal::new(parameters[0], parameters[1]);
    }
}
