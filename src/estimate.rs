//! A mean with its error bar, and first-order error propagation between them.
//!
//! Operands are treated as uncorrelated. The combined estimate keeps the
//! smaller sample count, the larger autocorrelation time, and is converged only
//! if both inputs were.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub mean: f64,
    pub error: f64,
    pub tau: f64,
    pub sample_count: usize,
    pub converged: bool,
}

impl Estimate {
    fn combine(self, rhs: Self, mean: f64, error: f64) -> Self {
        Self {
            mean,
            error,
            tau: self.tau.max(rhs.tau),
            sample_count: self.sample_count.min(rhs.sample_count),
            converged: self.converged && rhs.converged,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} +- {}, tau: {} ......{} for {} entries",
            self.mean,
            self.error,
            self.tau,
            if self.converged {
                "converged"
            } else {
                "NOT CONVERGED!!!"
            },
            self.sample_count
        )
    }
}

impl Add for Estimate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let error = self.error.hypot(rhs.error);
        self.combine(rhs, self.mean + rhs.mean, error)
    }
}

impl Sub for Estimate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let error = self.error.hypot(rhs.error);
        self.combine(rhs, self.mean - rhs.mean, error)
    }
}

impl Mul for Estimate {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let error = (rhs.mean * self.error).hypot(self.mean * rhs.error);
        self.combine(rhs, self.mean * rhs.mean, error)
    }
}

impl Div for Estimate {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let error =
            (self.error / rhs.mean).hypot(self.mean * rhs.error / (rhs.mean * rhs.mean));
        self.combine(rhs, self.mean / rhs.mean, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair() -> (Estimate, Estimate) {
        let a = Estimate {
            mean: 1.0,
            error: 0.1,
            tau: 1.0,
            sample_count: 1000,
            converged: true,
        };
        let b = Estimate {
            mean: 2.0,
            error: 0.2,
            tau: 2.0,
            sample_count: 1200,
            converged: true,
        };
        (a, b)
    }

    #[test]
    fn sum_and_difference_add_errors_in_quadrature() {
        let (a, b) = pair();
        let sum = a + b;
        let diff = a - b;
        assert_relative_eq!(sum.mean, 3.0, max_relative = 1e-12);
        assert_relative_eq!(diff.mean, -1.0, max_relative = 1e-12);
        assert_relative_eq!(
            sum.error,
            (0.1_f64 * 0.1 + 0.2 * 0.2).sqrt(),
            max_relative = 1e-12
        );
        assert_relative_eq!(diff.error, sum.error, max_relative = 1e-12);
        assert_eq!(sum.sample_count, 1000);
        assert_eq!(sum.tau, 2.0);
        assert!(sum.converged);
    }

    #[test]
    fn product_and_quotient_propagate_relative_errors() {
        let (a, b) = pair();
        let product = a * b;
        assert_relative_eq!(product.mean, 2.0, max_relative = 1e-12);
        assert_relative_eq!(
            product.error,
            (0.2_f64 * 0.2 + 0.2 * 0.2).sqrt(),
            max_relative = 1e-12
        );

        let quotient = a / b;
        assert_relative_eq!(quotient.mean, 0.5, max_relative = 1e-12);
        assert_relative_eq!(
            quotient.error,
            (0.05_f64 * 0.05 + 0.05 * 0.05).sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn convergence_requires_both_operands() {
        let (a, mut b) = pair();
        b.converged = false;
        assert!(!(a + b).converged);
        assert!(!(a / b).converged);
    }

    #[test]
    fn display_reports_convergence() {
        let estimate = Estimate {
            mean: 12.1,
            error: 0.3,
            tau: 1.1,
            sample_count: 1024,
            converged: true,
        };
        assert_eq!(
            estimate.to_string(),
            "12.1 +- 0.3, tau: 1.1 ......converged for 1024 entries"
        );
        let unconverged = Estimate {
            converged: false,
            ..estimate
        };
        assert!(unconverged.to_string().contains("NOT CONVERGED!!!"));
    }
}
