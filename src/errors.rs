use thiserror::Error;

use crate::distributions::Family;

/// An enum that indicates what went wrong while building or evaluating
/// a distribution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A parameter was outside the domain of the family. (`rate <= 0.0`, NaNs,
    /// `alpha <= 1.0`...)
    #[error("The parameter `{parameter}` = {value} is outside the domain of the {family} distribution. ")]
    InvalidParameter {
        family: Family,
        parameter: &'static str,
        value: f64,
    },
    /// The parameter vector had the wrong length.
    #[error("The {family} distribution takes {expected} parameters but {found} were given. ")]
    WrongNumberOfParameters {
        family: Family,
        expected: usize,
        found: usize,
    },
    /// A special function was evaluated outside it's domain.
    #[error("A special function was evaluated outside it's domain. ")]
    DomainErr,
}

/// An enum that indicates why a family could not be fitted (or why the whole
/// run was rejected).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// There were no samples at all. The whole run is rejected.
    #[error("The dataset is empty. ")]
    EmptyDataset,
    /// A sample was negative. The whole run is rejected.
    #[error("The dataset contains the negative value {value} (position {index}). ")]
    NegativeValue { index: usize, value: i64 },
    /// The data is valid, but not for this family (zeros for the log-normal,
    /// all zeros for the poisson...). Only this family is excluded.
    #[error("The {family} distribution can not be fitted to this data: {reason}")]
    IncompatibleData {
        family: Family,
        reason: &'static str,
    },
    /// The support of the family is empty for the given data.
    #[error("The support of the {family} distribution is empty for this data. ")]
    EmptySupport { family: Family },
    /// The optimizer reached the iteration cap.
    #[error("The optimizer did not converge after {iterations} iterations. ")]
    NonConvergence { iterations: usize },
    /// Every point visited by the optimizer (or every cutoff candidate) was
    /// numerically invalid.
    #[error("No valid candidate was found while fitting the {family} distribution. ")]
    NoValidCandidate { family: Family },
    /// The fitted parameters are not valid for the family.
    #[error(transparent)]
    InvalidParameters(#[from] DistributionError),
    /// There is no family with this name.
    #[error("Unknown distribution family `{0}`. ")]
    UnknownFamily(String),
    /// There is no ranking criterion with this name.
    #[error("Unknown ranking criterion `{0}`. ")]
    UnknownCriterion(String),
}

impl FitError {
    /// Returns true if the error means that the whole run must be rejected
    /// (and not only a single family).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        return matches!(
            self,
            FitError::EmptyDataset
                | FitError::NegativeValue { .. }
                | FitError::UnknownFamily(_)
                | FitError::UnknownCriterion(_)
        );
    }
}
