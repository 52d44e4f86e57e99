//! # Weibull distribution
//!
//! The (discretized) [Weibull distribution](https://en.wikipedia.org/wiki/Weibull_distribution).
//!
//! The continuous Weibull has survival function `S(y) = exp(-(y / lambda)^k)`
//! for `0 <= y`. The discrete version gives to each integer the mass of `[x, x + 1)`:
//!
//! > pmf(x) = S(x) - S(x + 1)
//!
//! (no normalization is needed because the continuous Weibull is already
//! supported on `0 <= y`). The parameters are the shape `k` and the scale `lambda`,
//! both stricly positive.
//!
//! There is no closed form for the maximum likelihood estimator, it is found
//! numerically in [crate::estimation].

use rand::Rng;

use crate::{
    distribution_trait::{DiscreteDistribution, Parametric, validate_parameters},
    distributions::Family,
    domain::{DiscreteDomain, ParameterDomain},
    errors::DistributionError,
    euclid::ln_one_minus_exp,
};

pub const WEIBULL_DOMAIN: DiscreteDomain = DiscreteDomain::From(0);

static WEIBULL_PARAMETERS: [ParameterDomain; 2] = [
    ParameterDomain::greater_than("shape", 0.0),
    ParameterDomain::greater_than("scale", 0.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Weibull {
    shape: f64,
    scale: f64,
}

impl Weibull {
    /// Creates a new discretized [Weibull] distribution with the given
    /// `shape` (`k`) and `scale` (`lambda`). Both must be finite and positive.
    pub fn new(shape: f64, scale: f64) -> Result<Weibull, DistributionError> {
        validate_parameters(Family::Weibull, &WEIBULL_PARAMETERS, &[shape, scale])?;
        return Ok(Weibull { shape, scale });
    }

    #[must_use]
    pub const fn get_shape(&self) -> f64 {
        return self.shape;
    }

    #[must_use]
    pub const fn get_scale(&self) -> f64 {
        return self.scale;
    }

    /// `-ln(S(y)) = (y / lambda)^k`
    fn cumulative_hazard(&self, y: f64) -> f64 {
        return (y / self.scale).powf(self.shape);
    }
}

impl DiscreteDistribution for Weibull {
    fn ln_pmf(&self, x: u64) -> f64 {
        /*
                Plan:

            pmf(x) = S(x) - S(x + 1)
                   = exp(-H(x)) * (1 - exp(H(x) - H(x + 1)))

            ln(pmf(x)) = -H(x) + ln(1 - exp(H(x) - H(x + 1)))

            Where H is the cumulative hazard. The last logarithm is computed
            with [ln_one_minus_exp] wich does not lose precision when the
            difference is tiny (large `x` with small `k`).
        */
        let x: f64 = x as f64;
        let h: f64 = self.cumulative_hazard(x);
        let h_next: f64 = self.cumulative_hazard(x + 1.0);
        return -h + ln_one_minus_exp(h - h_next);
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return &WEIBULL_DOMAIN;
    }

    fn cdf(&self, x: u64) -> f64 {
        // 1 - exp(-H(x + 1))
        return -(-self.cumulative_hazard(x as f64 + 1.0)).exp_m1();
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

        // smallest x such that p <= 1 - exp(-H(x + 1))
        //      => lambda * (-ln(1 - p))^(1/k) - 1 <= x
        let continuous: f64 = self.scale * (-(-p).ln_1p()).powf(1.0 / self.shape) - 1.0;
        let mut x: u64 = continuous.ceil().max(0.0) as u64;
        // fix the rounding of the closed form
        while 0 < x && p <= self.cdf(x - 1) {
            x -= 1;
        }
        while self.cdf(x) < p {
            x += 1;
        }
        return x;
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        // `1 - r` is in (0, 1], so the log is finite
        let r: f64 = rng.random::<f64>();
        let continuous: f64 = self.scale * (-(1.0 - r).ln()).powf(1.0 / self.shape);
        return continuous.floor() as u64;
    }
}

impl Parametric for Weibull {
    const FAMILY: Family = Family::Weibull;

    fn parameter_domain() -> &'static [ParameterDomain] {
        return &WEIBULL_PARAMETERS;
    }

    fn get_parameters(&self) -> Vec<f64> {
        return vec![self.shape, self.scale];
    }

    fn from_parameters(parameters: &[f64]) -> Result<Self, DistributionError> {
        validate_parameters(Family::Weibull, &WEIBULL_PARAMETERS, parameters)?;
        return Weibull::new(parameters[0], parameters[1]);
    }
}
