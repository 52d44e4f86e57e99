#![allow(
    non_snake_case,
    clippy::needless_return,
    clippy::assign_op_pattern,
    clippy::excessive_precision
)]

#![warn(
    clippy::all,
    clippy::restriction,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
)]
// ^Disable warning "crate `DiscreteFit` should have a snake case name convert the identifier to snake case: `discrete_fit`"
// The distribution modules are named after the distribution. The rest of the names
// will follow the snake_case convention.

//! # Discrete Fit
//!
//! This library fits parametric distributions to a sample of non-negative
//! integers (for example the degree sequence of a network) and selects the
//! model that explains it best.
//!
//!  - [x] Maximum likelihood estimation (closed form or numerical)
//!  - [x] Minimum Kolmogorov-Smirnov distance estimation
//!  - [x] Kolmogorov-Smirnov statistic and bootstrap p values
//!  - [x] Model selection with AIC / BIC (and information weights)
//!  - [x] Parallel fits (with [rayon])
//!
//! ## Distributions
//!
//! The trait [DiscreteDistribution](distribution_trait::DiscreteDistribution)
//! defines the interface of a distribution over the non-negative integers.
//! The only requiered methods are the log-pmf, the cdf and the domain. The rest
//! (quantile, sampling, log-likelihood...) have deafult implementations.
//! The trait [Parametric](distribution_trait::Parametric) adds the parameters.
//!
//! The families that can be fitted are:
//!
//!  - [x] [Poisson](distributions::Poisson) ([Wiki](https://en.wikipedia.org/wiki/Poisson_distribution))
//!  - [x] [Exponential](distributions::Exponential) (discretized) ([Wiki](https://en.wikipedia.org/wiki/Exponential_distribution))
//!  - [x] [Log-normal](distributions::LogNormal) (discretized) ([Wiki](https://en.wikipedia.org/wiki/Log-normal_distribution))
//!  - [x] [Normal](distributions::Normal) (discretized) ([Wiki](https://en.wikipedia.org/wiki/Normal_distribution))
//!  - [x] [Weibull](distributions::Weibull) (discretized) ([Wiki](https://en.wikipedia.org/wiki/Weibull_distribution))
//!  - [x] [Shifted power-law](distributions::ShiftedPowerLaw) ([Wiki](https://en.wikipedia.org/wiki/Zeta_distribution))
//!  - [x] [Truncated power-law](distributions::TruncatedPowerLaw) ([Wiki](https://en.wikipedia.org/wiki/Power_law))
//!
//! The continuous families give to each integer `x` the mass of `[x, x + 1)`
//! (conditioned on the support of the family).
//!
//! ## Model selection
//!
//! Store the data in [Samples](samples::Samples), wich validates it and
//! computes the needed statistics once. Then:
//!
//! ```
//! use DiscreteFit::configuration::FitOptions;
//! use DiscreteFit::model_selection::{Criterion, ModelSelection, select};
//! use DiscreteFit::samples::Samples;
//!
//! let samples: Samples = Samples::new(&[0, 1, 1, 2, 2, 2, 3, 3, 4, 6, 9]).unwrap();
//! let selection: ModelSelection = select(&samples, Criterion::Bic, &FitOptions::default());
//!
//! let best = selection.best().unwrap();
//! println!("{}", best.fit);
//! ```
//!
//! The [criteria](model_selection::Criterion) are `mle`, `ks-fit`, `aic-ms`,
//! `bic-ms` and `ks-ms`. To run several datasets use a [RunPlan](model_selection::RunPlan).
//!
//! ***
//!

pub mod configuration;
pub mod distribution_trait;
pub mod distributions;
pub mod domain;
pub mod errors;
pub mod estimation;
pub mod euclid;
pub mod goodness_of_fit;
pub mod model_selection;
pub mod optimizer;
pub mod samples;
