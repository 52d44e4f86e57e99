//! # Samples
//!
//! [Samples] stores the empirical data (a sample of non-negative integers,
//! for example the degree sequence of a network) and all the statistics
//! that the estimators need.
//!
//! All the statistics are computed once, when the [Samples] is created.
//! After that the structure is read-only, so it can be shared by the
//! estimators of every family (also between threads).

use crate::errors::FitError;

/// A validated, non-empty sample of non-negative integers.
///
/// The order of the original data is not kept: every computation of this
/// library is invariant to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    /// sorted, non-empty
    data: Vec<u64>,
    /// The distinct values of `data`, sorted.
    support: Vec<u64>,
    /// `counts[i]` is the number of times `support[i]` appears.
    counts: Vec<usize>,
    properties: SampleProperties,
}

/// Stores the sample properties of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleProperties {
    /// the average of the sample
    pub mean: f64,
    /// The [maximum likelihood](https://en.wikipedia.org/wiki/Variance#Population_variance)
    /// variance of the sample (divided by `n`, not `n - 1`).
    pub variance: f64,
    /// The average of `ln(x)`.
    ///
    /// Or None if the sample contains a `0`.
    pub log_mean: Option<f64>,
    /// The (maximum likelihood) variance of `ln(x)`.
    ///
    /// Or None if the sample contains a `0`.
    pub log_variance: Option<f64>,
    /// The maximum value of the sample
    pub maximum: u64,
    /// The minimum value of the sample
    pub minimum: u64,
    /// Number of samples equal to `0`
    pub zeros: usize,
}

impl Samples {
    /// Creates a new instance of [Samples] with the given `data`.
    ///
    /// Returns [FitError::EmptyDataset] if `data` is empty and
    /// [FitError::NegativeValue] if it contains a negative value.
    pub fn new(data: &[i64]) -> Result<Samples, FitError> {
        if data.is_empty() {
            return Err(FitError::EmptyDataset);
        }

        let mut unsigned: Vec<u64> = Vec::with_capacity(data.len());
        for (index, &value) in data.iter().enumerate() {
            match u64::try_from(value) {
                Ok(v) => unsigned.push(v),
                Err(_) => return Err(FitError::NegativeValue { index, value }),
            }
        }

        return Samples::from_unsigned(unsigned);
    }

    /// Creates a new instance of [Samples] moving the given `data`.
    ///
    /// Returns [FitError::EmptyDataset] if `data` is empty.
    pub fn from_unsigned(mut data: Vec<u64>) -> Result<Samples, FitError> {
        if data.is_empty() {
            return Err(FitError::EmptyDataset);
        }

        data.sort_unstable();

        let mut support: Vec<u64> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        for &x in &data {
            if support.last() == Some(&x) {
                if let Some(c) = counts.last_mut() {
                    *c += 1;
                }
            } else {
                support.push(x);
                counts.push(1);
            }
        }

        let properties: SampleProperties = SampleProperties::compute(&support, &counts, data.len());

        return Ok(Samples {
            data,
            support,
            counts,
            properties,
        });
    }

    /// Gives a reference to the contained data (sorted).
    #[must_use]
    pub fn peek_data(&self) -> &[u64] {
        return &self.data;
    }

    /// Returns a reference to the internal field that contains
    /// all computed statistics ([SampleProperties]).
    #[must_use]
    pub const fn peek_properties(&self) -> &SampleProperties {
        return &self.properties;
    }

    /// The number of samples. Never `0`.
    #[must_use]
    pub fn count(&self) -> usize {
        return self.data.len();
    }

    /// The sample [mean](https://en.wikipedia.org/wiki/Mean).
    #[must_use]
    pub const fn mean(&self) -> f64 {
        return self.properties.mean;
    }

    /// The maximum likelihood [variance](https://en.wikipedia.org/wiki/Variance)
    /// (divided by `n`).
    #[must_use]
    pub const fn variance(&self) -> f64 {
        return self.properties.variance;
    }

    #[must_use]
    pub const fn maximum(&self) -> u64 {
        return self.properties.maximum;
    }

    #[must_use]
    pub const fn minimum(&self) -> u64 {
        return self.properties.minimum;
    }

    /// The distinct values of the sample, in increasing order.
    #[must_use]
    pub fn support(&self) -> &[u64] {
        return &self.support;
    }

    /// The number of repetitions of each value of [Samples::support].
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        return &self.counts;
    }

    /// Iterates over `(value, count)` pairs in increasing order of value.
    pub fn iter_support(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        return self.support.iter().copied().zip(self.counts.iter().copied());
    }

    /// The empirical pmf (relative frequency) at every point of [Samples::support].
    #[must_use]
    pub fn empirical_pmf(&self) -> Vec<f64> {
        let n: f64 = self.count() as f64;
        return self.counts.iter().map(|&c| c as f64 / n).collect::<Vec<f64>>();
    }

    /// The empirical cdf (the step function of the sorted sample) at every
    /// point of [Samples::support].
    ///
    /// The last value is always exactly `1.0`.
    #[must_use]
    pub fn empirical_cdf(&self) -> Vec<f64> {
        let n: usize = self.count();
        let mut accumulated: usize = 0;
        return self
            .counts
            .iter()
            .map(|&c| {
                accumulated += c;
                accumulated as f64 / n as f64
            })
            .collect::<Vec<f64>>();
    }

    /// Computes `sumatory{x_i} ln(x_i + shift)`.
    ///
    /// `shift` must be positive if the sample contains `0`.
    #[must_use]
    pub fn sum_ln_shifted(&self, shift: f64) -> f64 {
        let mut sum: f64 = 0.0;
        for (x, c) in self.iter_support() {
            sum += c as f64 * (x as f64 + shift).ln();
        }
        return sum;
    }
}

impl SampleProperties {
    fn compute(support: &[u64], counts: &[usize], n: usize) -> SampleProperties {
        let n_f: f64 = n as f64;

        // actual computation of the mean.
        let mut mean: f64 = 0.0;
        for (&x, &c) in support.iter().zip(counts) {
            mean += x as f64 * c as f64;
        }
        mean = mean / n_f;

        // 2 pass variance, more stable than `E[x^2] - E[x]^2`
        let mut variance: f64 = 0.0;
        for (&x, &c) in support.iter().zip(counts) {
            let centered: f64 = x as f64 - mean;
            variance += centered * centered * c as f64;
        }
        variance = variance / n_f;

        let zeros: usize = if support.first() == Some(&0) {
            counts[0]
        } else {
            0
        };

        let (log_mean, log_variance): (Option<f64>, Option<f64>) = if zeros == 0 {
            let mut log_mean: f64 = 0.0;
            for (&x, &c) in support.iter().zip(counts) {
                log_mean += (x as f64).ln() * c as f64;
            }
            log_mean = log_mean / n_f;

            let mut log_variance: f64 = 0.0;
            for (&x, &c) in support.iter().zip(counts) {
                let centered: f64 = (x as f64).ln() - log_mean;
                log_variance += centered * centered * c as f64;
            }
            log_variance = log_variance / n_f;

            (Some(log_mean), Some(log_variance))
        } else {
            (None, None)
        };

        return SampleProperties {
            mean,
            variance,
            log_mean,
            log_variance,
            maximum: support.last().copied().unwrap_or(0),
            minimum: support.first().copied().unwrap_or(0),
            zeros,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn rejects_empty_and_negative() {
        assert_eq!(Samples::new(&[]), Err(FitError::EmptyDataset));
        assert_eq!(
            Samples::new(&[3, 1, -2, 4]),
            Err(FitError::NegativeValue { index: 2, value: -2 })
        );
        assert_eq!(Samples::from_unsigned(Vec::new()), Err(FitError::EmptyDataset));
    }

    #[test]
    fn support_and_counts() {
        let samples: Samples = Samples::new(&[3, 1, 1, 0, 3, 3]).unwrap();
        assert_eq!(samples.support(), &[0, 1, 3]);
        assert_eq!(samples.counts(), &[1, 2, 3]);
        assert_eq!(samples.peek_data(), &[0, 1, 1, 3, 3, 3]);
        assert_eq!(samples.peek_properties().zeros, 1);
        assert_eq!(samples.maximum(), 3);
        assert_eq!(samples.minimum(), 0);

        let cdf: Vec<f64> = samples.empirical_cdf();
        assert_approx_eq!(cdf[0], 1.0 / 6.0);
        assert_approx_eq!(cdf[1], 0.5);
        assert_eq!(cdf[2], 1.0);
    }

    #[test]
    fn moments() {
        let samples: Samples = Samples::new(&[1, 2, 3, 4]).unwrap();
        assert_approx_eq!(samples.mean(), 2.5);
        assert_approx_eq!(samples.variance(), 1.25);

        let log_mean: f64 = (2.0_f64.ln() + 3.0_f64.ln() + 4.0_f64.ln()) / 4.0;
        assert_approx_eq!(samples.peek_properties().log_mean.unwrap(), log_mean);

        let with_zero: Samples = Samples::new(&[0, 2]).unwrap();
        assert_eq!(with_zero.peek_properties().log_mean, None);
        assert_eq!(with_zero.peek_properties().log_variance, None);
    }
}
