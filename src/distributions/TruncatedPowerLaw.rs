//! # Truncated power-law distribution
//!
//! A [ShiftedPowerLaw](crate::distributions::ShiftedPowerLaw::ShiftedPowerLaw)
//! that also has an upper cutoff `x_max`:
//!
//! > pmf(x) = (x + x_min)^(-alpha) / Z      for 0 <= x <= x_max - x_min
//!
//! > Z = sumatory{y = x_min..=x_max} y^(-alpha) = zeta(alpha, x_min) - zeta(alpha, x_max + 1)
//!
//! The pmf is `0.0` outside the support. Since the support is finite, `Z` is a
//! finite sum. Short sums are added directly (see [power_law::DIRECT_SUM_LIMIT])
//! and longer ones are computed with the [Hurwitz zeta function](crate::euclid::hurwitz_zeta).
//!
//! Parameters: `1.0 < alpha`, `1.0 <= x_min` and `x_min < x_max`.

use crate::{
    configuration::power_law,
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
    euclid::hurwitz_zeta,
    samples::Samples,
};

static TRUNCATED_POWER_LAW_PARAMETERS: [ParameterDomain; 3] = [
    ParameterDomain::greater_than("alpha", power_law::MINIMUM_EXPONENT),
    ParameterDomain::at_least("x_min", 1.0),
    ParameterDomain::greater_than("x_max", 1.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct TruncatedPowerLaw {
    alpha: f64,
    x_min: f64,
    x_max: f64,
    /// `Range(0, floor(x_max - x_min))`
    domain: DiscreteDomain,
    normalization: f64,
    ln_normalization: f64,
}

impl TruncatedPowerLaw {
    /// Creates a new [TruncatedPowerLaw].
    ///
    ///  - `alpha` must be finite and `1.0 < alpha`.
    ///  - `x_min` must be finite and `1.0 <= x_min`.
    ///  - `x_max` must be finite and `x_min < x_max`.
    ///
    /// Otherwise an error is returned.
    pub fn new(alpha: f64, x_min: f64, x_max: f64) -> Result<TruncatedPowerLaw, DistributionError> {
        validate_parameters(
            Family::TruncatedPowerLaw,
            &TRUNCATED_POWER_LAW_PARAMETERS,
            &[alpha, x_min, x_max],
        )?;

        if x_max <= x_min {
            return Err(DistributionError::InvalidParameter {
                family: Family::TruncatedPowerLaw,
                parameter: "x_max",
                value: x_max,
            });
        }

        let last: u64 = (x_max - x_min).floor() as u64;
        let normalization: f64 = partial_sum(alpha, x_min, last)?;

        return Ok(TruncatedPowerLaw {
            alpha,
            x_min,
            x_max,
            domain: DiscreteDomain::Range(0, last),
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

    #[must_use]
    pub const fn get_x_max(&self) -> f64 {
        return self.x_max;
    }
}

/// Computes `sumatory{x = 0..=last} (x + x_min)^(-alpha)`.
fn partial_sum(alpha: f64, x_min: f64, last: u64) -> Result<f64, DistributionError> {
    if last < power_law::DIRECT_SUM_LIMIT {
        let mut sum: f64 = 0.0;
        // add the small terms first
        for x in (0..=last).rev() {
            sum += (x as f64 + x_min).powf(-alpha);
        }
        return Ok(sum);
    }

    let head: f64 = hurwitz_zeta(alpha, x_min)?;
    let tail: f64 = hurwitz_zeta(alpha, x_min + last as f64 + 1.0)?;
    return Ok(head - tail);
}

impl DiscreteDistribution for TruncatedPowerLaw {
    fn ln_pmf(&self, x: u64) -> f64 {
        if !self.domain.contains(x) {
            return f64::NEG_INFINITY;
        }
        return -self.alpha * (x as f64 + self.x_min).ln() - self.ln_normalization;
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &self.domain;
    }

    fn cdf(&self, x: u64) -> f64 {
        let (_, last): (u64, Option<u64>) = self.domain.get_bounds();
        if last.is_some_and(|l| l <= x) {
            return 1.0;
        }
        return match partial_sum(self.alpha, self.x_min, x) {
            Ok(s) => (s / self.normalization).clamp(0.0, 1.0),
            Err(_) => 1.0,
        };
    }

    fn log_likelihood(&self, samples: &Samples) -> f64 {
        if !self.domain.contains(samples.maximum()) {
            return f64::NEG_INFINITY;
        }
        let n: f64 = samples.count() as f64;
        return -self.alpha * samples.sum_ln_shifted(self.x_min) - n * self.ln_normalization;
    }
}

impl Parametric for TruncatedPowerLaw {
    const FAMILY: Family = Family::TruncatedPowerLaw;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &TRUNCATED_POWER_LAW_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.alpha, self.x_min, self.x_max];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(
            Family::TruncatedPowerLaw,
            &TRUNCATED_POWER_LAW_PARAMETERS,
            parameters,
        )?;
        return TruncatedPowerLaw::new(parameters[0], parameters[1], parameters[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn small_support() {
        // support {0, 1, 2} => y in {1, 2, 3}
        let power_law: TruncatedPowerLaw = TruncatedPowerLaw::new(2.0, 1.0, 3.0).unwrap();
        let z: f64 = 1.0 + 0.25 + 1.0 / 9.0;
        assert_approx_eq!(power_law.pmf(0), 1.0 / z, 1.0e-14);
        assert_approx_eq!(power_law.pmf(2), 1.0 / (9.0 * z), 1.0e-14);
        assert_eq!(power_law.pmf(3), 0.0);
        assert_approx_eq!(power_law.cdf(1), 1.25 / z, 1.0e-14);
        assert_eq!(power_law.cdf(2), 1.0);
        assert_eq!(power_law.cdf(100), 1.0);
    }

    #[test]
    fn long_sums_use_zeta() {
        // longer than the direct sum limit
        let power_law: TruncatedPowerLaw = TruncatedPowerLaw::new(1.8, 2.0, 5002.0).unwrap();
        let direct: f64 = (0..=5000_u64).rev().map(|x| (x as f64 + 2.0).powf(-1.8)).sum::<f64>();
        assert_approx_eq!(power_law.pmf(0), 2.0_f64.powf(-1.8) / direct, 1.0e-12);

        let total: f64 = (0..=5000).map(|x| power_law.pmf(x)).sum::<f64>();
        assert_approx_eq!(total, 1.0, 1.0e-11);
        assert_approx_eq!(power_law.cdf(2000), (0..=2000).map(|x| power_law.pmf(x)).sum::<f64>(), 1.0e-11);
    }

    #[test]
    fn rejects_empty_support() {
        assert!(TruncatedPowerLaw::new(2.0, 3.0, 3.0).is_err());
        assert!(TruncatedPowerLaw::new(2.0, 3.0, 2.0).is_err());
        assert!(TruncatedPowerLaw::new(0.5, 1.0, 10.0).is_err());
    }

    #[test]
    fn out_of_support_likelihood() {
        let power_law: TruncatedPowerLaw = TruncatedPowerLaw::new(2.0, 1.0, 5.0).unwrap();
        let inside: Samples = Samples::new(&[0, 1, 4]).unwrap();
        let outside: Samples = Samples::new(&[0, 1, 5]).unwrap();
        assert!(power_law.log_likelihood(&inside).is_finite());
        assert_eq!(power_law.log_likelihood(&outside), f64::NEG_INFINITY);
    }
}
