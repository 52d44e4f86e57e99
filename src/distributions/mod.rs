//! # Distributions
//!
//! The seven families that can be fitted to a sample:
//!
//!  - [Poisson](Poisson::Poisson)
//!  - [Exponential](Exponential::Exponential) (discretized)
//!  - [Log-normal](LogNormal::LogNormal) (discretized)
//!  - [Normal](Normal::Normal) (discretized)
//!  - [Weibull](Weibull::Weibull) (discretized)
//!  - [Shifted power-law](ShiftedPowerLaw::ShiftedPowerLaw)
//!  - [Truncated power-law](TruncatedPowerLaw::TruncatedPowerLaw)
//!
//! [Family] names a family and [FittedDistribution] holds a distribution
//! of any of them.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::{
    distribution_trait::{DiscreteDistribution, Parametric},
    domain::{DiscreteDomain, ParameterDomain},
    errors::{DistributionError, FitError},
    samples::Samples,
};

pub mod Exponential;
pub mod LogNormal;
pub mod Normal;
pub mod Poisson;
pub mod ShiftedPowerLaw;
pub mod TruncatedPowerLaw;
pub mod Weibull;

/// The families of distributions.
///
/// The order of declaration is the order used to break ties when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Poisson,
    Exponential,
    LogNormal,
    Normal,
    Weibull,
    ShiftedPowerLaw,
    TruncatedPowerLaw,
}

impl Family {
    /// Every family, in declaration order.
    pub const ALL: [Family; 7] = [
        Family::Poisson,
        Family::Exponential,
        Family::LogNormal,
        Family::Normal,
        Family::Weibull,
        Family::ShiftedPowerLaw,
        Family::TruncatedPowerLaw,
    ];

    /// The name of the family (as accepted by [Family::from_str]).
    #[must_use]
    pub const fn name(self) -> &'static str {
        return match self {
            Family::Poisson => "poisson",
            Family::Exponential => "exponential",
            Family::LogNormal => "lognormal",
            Family::Normal => "normal",
            Family::Weibull => "weibull",
            Family::ShiftedPowerLaw => "shifted-power-law",
            Family::TruncatedPowerLaw => "truncated-power-law",
        };
    }

    /// The valid values of each parameter, in order.
    #[must_use]
    pub fn parameter_domain(self) -> &'static [ParameterDomain] {
        return match self {
            Family::Poisson => Poisson::Poisson::parameter_domain(),
            Family::Exponential => Exponential::Exponential::parameter_domain(),
            Family::LogNormal => LogNormal::LogNormal::parameter_domain(),
            Family::Normal => Normal::Normal::parameter_domain(),
            Family::Weibull => Weibull::Weibull::parameter_domain(),
            Family::ShiftedPowerLaw => ShiftedPowerLaw::ShiftedPowerLaw::parameter_domain(),
            Family::TruncatedPowerLaw => TruncatedPowerLaw::TruncatedPowerLaw::parameter_domain(),
        };
    }

    /// The number of free parameters (`k` in the information criteria).
    #[must_use]
    pub fn number_of_parameters(self) -> u16 {
        return self.parameter_domain().len() as u16;
    }

    /// The names of the parameters, in order.
    #[must_use]
    pub fn parameter_names(self) -> Vec<&'static str> {
        return self.parameter_domain().iter().map(|d| d.name).collect();
    }

    /// Builds the distribution of this family with the given `parameters`.
    pub fn build(self, parameters: &[f64]) -> Result<FittedDistribution, DistributionError> {
        let ret: FittedDistribution = match self {
            Family::Poisson => {
                FittedDistribution::Poisson(Poisson::Poisson::from_parameters(parameters)?)
            }
            Family::Exponential => FittedDistribution::Exponential(
                Exponential::Exponential::from_parameters(parameters)?,
            ),
            Family::LogNormal => {
                FittedDistribution::LogNormal(LogNormal::LogNormal::from_parameters(parameters)?)
            }
            Family::Normal => {
                FittedDistribution::Normal(Normal::Normal::from_parameters(parameters)?)
            }
            Family::Weibull => {
                FittedDistribution::Weibull(Weibull::Weibull::from_parameters(parameters)?)
            }
            Family::ShiftedPowerLaw => FittedDistribution::ShiftedPowerLaw(
                ShiftedPowerLaw::ShiftedPowerLaw::from_parameters(parameters)?,
            ),
            Family::TruncatedPowerLaw => FittedDistribution::TruncatedPowerLaw(
                TruncatedPowerLaw::TruncatedPowerLaw::from_parameters(parameters)?,
            ),
        };
        return Ok(ret);
    }

    /// Evaluates the pmf of the family at `x` with the given `parameters`.
    ///
    /// Invalid parameters return an error instead of a NaN.
    pub fn pmf(self, x: u64, parameters: &[f64]) -> Result<f64, DistributionError> {
        return Ok(self.build(parameters)?.pmf(x));
    }

    /// Evaluates the log-likelihood of the family over `samples` with the
    /// given `parameters`.
    ///
    /// Invalid parameters return an error instead of a NaN. The result may be
    /// `-inf` if a sample is outside the support.
    pub fn log_likelihood(
        self,
        samples: &Samples,
        parameters: &[f64],
    ) -> Result<f64, DistributionError> {
        return Ok(self.build(parameters)?.log_likelihood(samples));
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.name());
    }
}

impl FromStr for Family {
    type Err = FitError;

    /// Parses the name of a family. Case and the separators `-`, `_` and
    /// spaces are ignored, so `"Shifted_Power_Law"` is also accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let ret: Family = match normalized.as_str() {
            "poisson" => Family::Poisson,
            "exponential" | "exp" => Family::Exponential,
            "lognormal" => Family::LogNormal,
            "normal" | "gaussian" => Family::Normal,
            "weibull" => Family::Weibull,
            "shiftedpowerlaw" | "powerlaw" => Family::ShiftedPowerLaw,
            "truncatedpowerlaw" => Family::TruncatedPowerLaw,
            _ => return Err(FitError::UnknownFamily(s.to_string())),
        };
        return Ok(ret);
    }
}

/// A distribution of any [Family].
#[derive(Debug, Clone, PartialEq)]
pub enum FittedDistribution {
    Poisson(Poisson::Poisson),
    Exponential(Exponential::Exponential),
    LogNormal(LogNormal::LogNormal),
    Normal(Normal::Normal),
    Weibull(Weibull::Weibull),
    ShiftedPowerLaw(ShiftedPowerLaw::ShiftedPowerLaw),
    TruncatedPowerLaw(TruncatedPowerLaw::TruncatedPowerLaw),
}

/// Evaluates `$e` with `$d` bound to the distribution inside of `$self`.
macro_rules! delegate {
    ($self:ident, $d:ident => $e:expr) => {
        match $self {
            FittedDistribution::Poisson($d) => $e,
            FittedDistribution::Exponential($d) => $e,
            FittedDistribution::LogNormal($d) => $e,
            FittedDistribution::Normal($d) => $e,
            FittedDistribution::Weibull($d) => $e,
            FittedDistribution::ShiftedPowerLaw($d) => $e,
            FittedDistribution::TruncatedPowerLaw($d) => $e,
        }
    };
}

impl FittedDistribution {
    #[must_use]
    pub const fn family(&self) -> Family {
        return match self {
            FittedDistribution::Poisson(_) => Family::Poisson,
            FittedDistribution::Exponential(_) => Family::Exponential,
            FittedDistribution::LogNormal(_) => Family::LogNormal,
            FittedDistribution::Normal(_) => Family::Normal,
            FittedDistribution::Weibull(_) => Family::Weibull,
            FittedDistribution::ShiftedPowerLaw(_) => Family::ShiftedPowerLaw,
            FittedDistribution::TruncatedPowerLaw(_) => Family::TruncatedPowerLaw,
        };
    }

    /// The parameters of the distribution, in the order of
    /// [Family::parameter_domain].
    #[must_use]
    pub fn parameters(&self) -> Vec<f64> {
        return delegate!(self, d => d.get_parameters());
    }

    #[must_use]
    pub fn number_of_parameters(&self) -> u16 {
        return self.family().number_of_parameters();
    }
}

impl DiscreteDistribution for FittedDistribution {
    fn ln_pmf(&self, x: u64) -> f64 {
        return delegate!(self, d => d.ln_pmf(x));
    }

    fn get_domain(&self) -> &DiscreteDomain {
        return delegate!(self, d => d.get_domain());
    }

    fn cdf(&self, x: u64) -> f64 {
        return delegate!(self, d => d.cdf(x));
    }

    fn log_likelihood(&self, samples: &Samples) -> f64 {
        return delegate!(self, d => d.log_likelihood(samples));
    }

    fn quantile(&self, p: f64) -> u64 {
        return delegate!(self, d => d.quantile(p));
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        return delegate!(self, d => d.sample(rng));
    }

    fn sample_multiple<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<u64> {
        return delegate!(self, d => d.sample_multiple(rng, n));
    }
}

impl fmt::Display for FittedDistribution {
    /// Writes `family (name_1, name_2) = (value_1, value_2)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family: Family = self.family();
        let names: Vec<&'static str> = family.parameter_names();
        let values: Vec<String> = self
            .parameters()
            .iter()
            .map(|v| format!("{v:.6}"))
            .collect();
        return write!(
            f,
            "{} ({}) = ({})",
            family,
            names.join(", "),
            values.join(", ")
        );
    }
}
