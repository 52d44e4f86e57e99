//! Euclid contains uscefull math functions
//!
//! Most special functions ([erf](statrs::function::erf::erf),
//! [ln_gamma](statrs::function::gamma::ln_gamma)...) are taken from
//! [statrs]. Here we implement the ones that it lacks (the
//! [Hurwitz zeta function](hurwitz_zeta)) and some helpers to evaluate
//! probabilities of tiny intervals without losing precision.

use statrs::function::erf::erfc;

use crate::{configuration::zeta, errors::DistributionError};

/// `1 / sqrt(2)`
pub const INV_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// From this point onwards [ln_std_normal_sf] uses the asymptotic expansion,
/// since `erfc` underflows to `0.0` a bit before `z = 38`.
const NORMAL_TAIL_ASYMPTOTIC_START: f64 = 30.0;

/// `ln(sqrt(2 * pi))`
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// The values `(2k)! / B_2k`, where `B_2k` are the Bernoulli numbers.
/// Used for the Euler-Maclaurin tail of [hurwitz_zeta].
const ZETA_EULER_MACLAURIN_COEFITIENTS: [f64; 12] = [
    12.0,
    -720.0,
    30240.0,
    -1209600.0,
    47900160.0,
    -1.8924375803183791606e9,
    7.47242496e10,
    -2.950130727918164224e12,
    1.1646782814350067249e14,
    -4.5979787224074726105e15,
    1.8152105401943546773e17,
    -7.1661652561756670113e18,
];

/// The [Hurwitz zeta function](https://en.wikipedia.org/wiki/Hurwitz_zeta_function)
///
/// > zeta(s, q) = sumatory{k = 0..inf} (k + q)^(-s)
///
/// Requieres `1.0 < s` and `0.0 < q` (both finite). Otherwise
/// [DistributionError::DomainErr] is returned.
///
/// The infinite series is evaluated with a bounded number of terms: a few
/// terms are summed directly and the rest of the series is approximated with
/// the [Euler-Maclaurin formula](https://en.wikipedia.org/wiki/Euler%E2%80%93Maclaurin_formula)
/// (at most 12 correction terms). The computation stops as soon as the
/// last term is smaller than [zeta::RELATIVE_TOLERANCE] relative to the sum.
pub fn hurwitz_zeta(s: f64, q: f64) -> Result<f64, DistributionError> {
    if !s.is_finite() || !q.is_finite() || s <= 1.0 || q <= 0.0 {
        return Err(DistributionError::DomainErr);
    }

    /*
            Plan:

        zeta(s, q) = sumatory{k = 0..N-1} (k + q)^(-s)
                     + (q + N)^(1 - s) / (s - 1)
                     - (q + N)^(-s) / 2
                     + sumatory{j = 1..} B_2j / (2j)! * s (s + 1) ... (s + 2j - 2) * (q + N)^(-s - 2j + 1)

        We add terms to the direct sum until both `N` and `q + N` are large
        enough for the tail to converge fast. If the direct sum already
        converged we return early.
    */

    let mut sum: f64 = q.powf(-s);
    let mut a: f64 = q;
    let mut term: f64 = 0.0;
    let mut i: usize = 0;

    while i < zeta::MINIMUM_DIRECT_TERMS || a <= zeta::MINIMUM_TAIL_START {
        i += 1;
        a += 1.0;
        term = a.powf(-s);
        sum += term;
        if (term / sum).abs() < zeta::RELATIVE_TOLERANCE {
            return Ok(sum);
        }
    }

    // Euler-Maclaurin tail, `a = q + N` and `term = a^(-s)`
    let w: f64 = a;
    sum += term * w / (s - 1.0);
    sum -= 0.5 * term;

    let mut rising_factorial: f64 = 1.0;
    let mut k: f64 = 0.0;
    for coefitient in ZETA_EULER_MACLAURIN_COEFITIENTS {
        rising_factorial *= s + k;
        term /= w;
        let correction: f64 = rising_factorial * term / coefitient;
        sum += correction;
        if (correction / sum).abs() < zeta::RELATIVE_TOLERANCE {
            break;
        }
        k += 1.0;
        rising_factorial *= s + k;
        term /= w;
        k += 1.0;
    }

    if !sum.is_finite() {
        return Err(DistributionError::DomainErr);
    }

    return Ok(sum);
}

/// The cdf of the standard normal distribution.
#[must_use]
pub fn std_normal_cdf(z: f64) -> f64 {
    return 0.5 * erfc(-z * INV_SQRT_2);
}

/// The survival function (`1 - cdf`) of the standard normal distribution.
///
/// Keeps full relative precision in the upper tail, where `1.0 - cdf(z)`
/// would be `0.0`.
#[must_use]
pub fn std_normal_sf(z: f64) -> f64 {
    return 0.5 * erfc(z * INV_SQRT_2);
}

/// Returns `P(a <= Z < b)` for a standard normal `Z`.
///
/// The probability is computed from the side of the distribution where it
/// is the difference of 2 small numbers, so intervals far in the tails do
/// not become `0.0` by cancellation.
#[must_use]
pub fn std_normal_interval(a: f64, b: f64) -> f64 {
    if b <= a {
        return 0.0;
    }

    let p: f64 = if 0.0 <= a {
        std_normal_sf(a) - std_normal_sf(b)
    } else if b <= 0.0 {
        std_normal_cdf(b) - std_normal_cdf(a)
    } else {
        1.0 - std_normal_cdf(a) - std_normal_sf(b)
    };

    return p.max(0.0);
}

/// The logarithm of the survival function of the standard normal distribution.
///
/// Stays finite where [std_normal_sf] is `0.0`. For large `z` we use the
/// asymptotic series of the Mills ratio:
///
/// > sf(z) = phi(z) / z * (1 - 1/z^2 + 3/z^4 - 15/z^6 + 105/z^8 - ...)
///
/// wich has a relative error of aproximately `945 / z^10` at
/// [NORMAL_TAIL_ASYMPTOTIC_START].
#[must_use]
pub fn ln_std_normal_sf(z: f64) -> f64 {
    if z < NORMAL_TAIL_ASYMPTOTIC_START {
        return std_normal_sf(z).ln();
    }

    let inv_z2: f64 = 1.0 / (z * z);
    let series: f64 = inv_z2 * (-1.0 + inv_z2 * (3.0 + inv_z2 * (-15.0 + inv_z2 * 105.0)));
    return -0.5 * z * z - z.ln() - LN_SQRT_2PI + series.ln_1p();
}

/// Returns `ln(P(a <= Z < b))` for a standard normal `Z`.
///
/// When the interval is on one side of `0.0` the computation is done in log
/// space, so intervals far in the tails have a finite log-probability even
/// when [std_normal_interval] underflows to `0.0`.
#[must_use]
pub fn ln_std_normal_interval(a: f64, b: f64) -> f64 {
    if b <= a {
        return f64::NEG_INFINITY;
    }

    /*
        Plan:

        For 0 <= a:
            P(a <= Z < b) = sf(a) - sf(b) = sf(a) * (1 - sf(b) / sf(a))
            ln(P) = ln(sf(a)) + ln(1 - exp(ln(sf(b)) - ln(sf(a))))

        For b <= 0 the normal is symetric, so P(a <= Z < b) = P(-b < Z <= -a).
        If the interval contains 0 it's probability can not underflow.
    */

    let (low, high): (f64, f64) = if 0.0 <= a {
        (a, b)
    } else if b <= 0.0 {
        (-b, -a)
    } else {
        return std_normal_interval(a, b).ln();
    };

    let ln_low: f64 = ln_std_normal_sf(low);
    let ln_high: f64 = ln_std_normal_sf(high);
    return ln_low + ln_one_minus_exp(ln_high - ln_low);
}

/// Computes `ln(1 - exp(x))` for `x <= 0.0` without cancellation.
///
/// See [Maechler (2012)](https://cran.r-project.org/web/packages/Rmpfr/vignettes/log1mexp-note.pdf).
#[must_use]
pub fn ln_one_minus_exp(x: f64) -> f64 {
    if 0.0 <= x {
        return f64::NEG_INFINITY;
    }

    if -std::f64::consts::LN_2 < x {
        return (-x.exp_m1()).ln();
    }
    return (-x.exp()).ln_1p();
}
