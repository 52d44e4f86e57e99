//! A Domain represents the set of points where a function is defined.
//!
//! In this library we use it for 2 things:
//!  - [DiscreteDomain]: the (non-negative, integer) support of the pmf of a
//!     distribution.
//!  - [ParameterDomain]: the valid values of each parameter of a family.
//!

/// A [domain](https://en.wikipedia.org/wiki/Domain_of_a_function) composed of
/// non-negative integers.
///
/// Every family of this library is defined over (a subset of) the
/// non-negative integers, so no other variants are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscreteDomain {
    /// All the integers from the given value onwards. The value **is** included.
    From(u64),
    /// All the integers in the range [.0, .1] (**both** inclusive).
    /// The first number is the minimum, and the last is the maximum.
    ///
    /// Has the **invariant** that `min <= max`.
    Range(u64, u64),
}

impl Default for DiscreteDomain {
    fn default() -> Self {
        return DiscreteDomain::From(0);
    }
}

impl DiscreteDomain {
    #[must_use]
    pub const fn contains(&self, x: u64) -> bool {
        return match *self {
            DiscreteDomain::From(min) => min <= x,
            DiscreteDomain::Range(min, max) => min <= x && x <= max,
        };
    }

    /// Returns the upper and lower bounds of the domain. The upper bound is
    /// [None] if the domain is infinite. The bounds themselves are included.
    #[must_use]
    pub const fn get_bounds(&self) -> (u64, Option<u64>) {
        return match *self {
            DiscreteDomain::From(min) => (min, None),
            DiscreteDomain::Range(min, max) => (min, Some(max)),
        };
    }
}

/// The set of valid values of a single parameter of a family: an interval
/// of the real line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDomain {
    /// Name of the parameter (`"rate"`, `"alpha"`...)
    pub name: &'static str,
    /// Lower bound (may be `-inf`)
    pub lower: f64,
    /// If the lower bound itself is a valid value
    pub lower_inclusive: bool,
    /// Upper bound (may be `inf`). It is always excluded.
    pub upper: f64,
}

impl ParameterDomain {
    /// A parameter that can take any finite real value.
    #[must_use]
    pub const fn reals(name: &'static str) -> Self {
        return ParameterDomain {
            name,
            lower: f64::NEG_INFINITY,
            lower_inclusive: false,
            upper: f64::INFINITY,
        };
    }

    /// A parameter that must be stricly bigger than `lower`.
    #[must_use]
    pub const fn greater_than(name: &'static str, lower: f64) -> Self {
        return ParameterDomain {
            name,
            lower,
            lower_inclusive: false,
            upper: f64::INFINITY,
        };
    }

    /// A parameter that must be bigger or equal than `lower`.
    #[must_use]
    pub const fn at_least(name: &'static str, lower: f64) -> Self {
        return ParameterDomain {
            name,
            lower,
            lower_inclusive: true,
            upper: f64::INFINITY,
        };
    }

    /// Returns true if `value` is finite and inside the interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above_lower: bool = if self.lower_inclusive {
            self.lower <= value
        } else {
            self.lower < value
        };
        return above_lower && value < self.upper;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let domain: DiscreteDomain = DiscreteDomain::Range(3, 6);
        assert!(domain.contains(3));
        assert!(domain.contains(6));
        assert!(!domain.contains(2));
        assert!(!domain.contains(7));
        assert_eq!(domain.get_bounds(), (3, Some(6)));
    }

    #[test]
    fn from_starts_at_min() {
        let domain: DiscreteDomain = DiscreteDomain::From(1);
        assert!(domain.contains(1));
        assert!(domain.contains(u64::MAX));
        assert!(!domain.contains(0));
        assert_eq!(domain.get_bounds(), (1, None));
    }

    #[test]
    fn parameter_bounds() {
        let rate: ParameterDomain = ParameterDomain::greater_than("rate", 0.0);
        assert!(!rate.contains(0.0));
        assert!(rate.contains(1.0e-300));
        assert!(!rate.contains(f64::INFINITY));

        let cutoff: ParameterDomain = ParameterDomain::at_least("x_min", 1.0);
        assert!(cutoff.contains(1.0));
        assert!(!cutoff.contains(0.5));

        assert!(!ParameterDomain::reals("mu").contains(f64::NAN));
    }
}
