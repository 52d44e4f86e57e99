//! # Shifted power-law distribution
//!
//! A discrete [power law](https://en.wikipedia.org/wiki/Power_law) (also
//! called [Zeta distribution](https://en.wikipedia.org/wiki/Zeta_distribution))
//! with a lower cutoff `x_min`, shifted so it starts at `0`:
//!
//! > pmf(x) = (x + x_min)^(-alpha) / zeta(alpha, x_min)      for 0 <= x
//!
//! Where `zeta` is the [Hurwitz zeta function](crate::euclid::hurwitz_zeta).
//! In other words, `x + x_min` follows a power law supported on the integers
//! `x_min, x_min + 1, ...`.
//!
//! Parameters: the exponent `1.0 < alpha` and the cutoff `1.0 <= x_min`.
//! `x_min` is usually an integer, but any real value in the domain is valid.

use crate::{
    configuration::power_law,
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
    euclid::hurwitz_zeta,
    samples::Samples,
};

pub const SHIFTED_POWER_LAW_DOMAIN: DiscreteDomain = DiscreteDomain::From(0);

static SHIFTED_POWER_LAW_PARAMETERS: [ParameterDomain; 2] = [
    ParameterDomain::greater_than("alpha", power_law::MINIMUM_EXPONENT),
    ParameterDomain::at_least("x_min", 1.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftedPowerLaw {
    alpha: f64,
    x_min: f64,
    /// `zeta(alpha, x_min)`
    normalization: f64,
    ln_normalization: f64,
}

impl ShiftedPowerLaw {
    /// Creates a new [ShiftedPowerLaw].
    ///
    ///  - `alpha` must be finite and `1.0 < alpha`.
    ///  - `x_min` must be finite and `1.0 <= x_min`.
    ///
    /// Otherwise an error is returned.
    pub fn new(alpha: f64, x_min: f64) -> Result<ShiftedPowerLaw, DistributionError> {
        validate_parameters(
            Family::ShiftedPowerLaw,
            &SHIFTED_POWER_LAW_PARAMETERS,
            &[alpha, x_min],
        )?;

        let normalization: f64 = hurwitz_zeta(alpha, x_min)?;

        return Ok(ShiftedPowerLaw {
            alpha,
            x_min,
            normalization,
            ln_normalization: normalization.ln(),
        });
    }

    #[must_use]
    pub const fn get_alpha(&self) -> f64 {
        return self.alpha;
    }

    #[must_use]
    pub const fn get_x_min(&self) -> f64 {
        return self.x_min;
    }
}

impl DiscreteDistribution for ShiftedPowerLaw {
    fn ln_pmf(&self, x: u64) -> f64 {
        return -self.alpha * (x as f64 + self.x_min).ln() - self.ln_normalization;
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &SHIFTED_POWER_LAW_DOMAIN;
    }

    fn cdf(&self, x: u64) -> f64 {
        // P(X > x) = zeta(alpha, x + 1 + x_min) / zeta(alpha, x_min)
        let tail: f64 = match hurwitz_zeta(self.alpha, x as f64 + 1.0 + self.x_min) {
            Ok(t) => t,
            Err(_) => return 1.0,
        };
        return (1.0 - tail / self.normalization).clamp(0.0, 1.0);
    }

    fn log_likelihood(&self, samples: &Samples) -> f64 {
        // sumatory{x_i} -alpha * ln(x_i + x_min) - ln(zeta(alpha, x_min))
        let n: f64 = samples.count() as f64;
        return -self.alpha * samples.sum_ln_shifted(self.x_min) - n * self.ln_normalization;
    }
}

impl Parametric for ShiftedPowerLaw {
    const FAMILY: Family = Family::ShiftedPowerLaw;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &SHIFTED_POWER_LAW_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.alpha, self.x_min];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(
            Family::ShiftedPowerLaw,
            &SHIFTED_POWER_LAW_PARAMETERS,
            parameters,
        )?;
        return ShiftedPowerLaw::new(parameters[0], parameters[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn zeta_distribution_values() {
        // x_min = 1, alpha = 2 => pmf(x) = 6 / (pi^2 (x + 1)^2)
        let power_law: ShiftedPowerLaw = ShiftedPowerLaw::new(2.0, 1.0).unwrap();
        let pi2: f64 = std::f64::consts::PI * std::f64::consts::PI;
        assert_approx_eq!(power_law.pmf(0), 6.0 / pi2, 1.0e-12);
        assert_approx_eq!(power_law.pmf(3), 6.0 / (pi2 * 16.0), 1.0e-12);
        assert_approx_eq!(power_law.cdf(1), 6.0 / pi2 * 1.25, 1.0e-12);
    }

    #[test]
    fn cdf_matches_partial_sums() {
        let power_law: ShiftedPowerLaw = ShiftedPowerLaw::new(2.7, 3.0).unwrap();
        let mut accumulated: f64 = 0.0;
        for x in 0..50 {
            accumulated += power_law.pmf(x);
            assert_approx_eq!(power_law.cdf(x), accumulated, 1.0e-12);
        }
    }

    #[test]
    fn log_likelihood_matches_pmf() {
        let power_law: ShiftedPowerLaw = ShiftedPowerLaw::new(2.2, 2.0).unwrap();
        let samples: Samples = Samples::new(&[0, 0, 1, 4, 9, 30]).unwrap();
        let direct: f64 = samples.peek_data().iter().map(|&x| power_law.ln_pmf(x)).sum::<f64>();
        assert_approx_eq!(power_law.log_likelihood(&samples), direct, 1.0e-10);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(ShiftedPowerLaw::new(1.0, 1.0).is_err());
        assert!(ShiftedPowerLaw::new(2.0, 0.5).is_err());
        assert!(ShiftedPowerLaw::from_parameters(&[2.0, 1.0, 3.0]).is_err());
    }
}
