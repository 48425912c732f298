//! Tridiagonal linear systems solved by the Thomas algorithm.
//!
//! Row `i` reads `lower[i]*x[i-1] + diag[i]*x[i] + upper[i]*x[i+1] = rhs[i]`;
//! `lower[0]` and `upper[n-1]` are not used.
use super::transport_solver::TransportError;

/// pivots smaller than this are treated as zero
pub const PIVOT_EPSILON: f64 = 1e-300;

#[derive(Debug, Clone, PartialEq)]
pub struct Tridiagonal {
    pub lower: Vec<f64>,
    pub diag: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Tridiagonal {
    pub fn new(lower: Vec<f64>, diag: Vec<f64>, upper: Vec<f64>) -> Result<Self, TransportError> {
        if lower.len() != diag.len() || upper.len() != diag.len() {
            return Err(TransportError::DimensionMismatch {
                expected: diag.len(),
                found: lower.len().max(upper.len()),
            });
        }
        Ok(Self { lower, diag, upper })
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    /// `A * x`
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let n = self.dim();
        (0..n)
            .map(|i| {
                let mut value = self.diag[i] * x[i];
                if i > 0 {
                    value += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    value += self.upper[i] * x[i + 1];
                }
                value
            })
            .collect()
    }

    pub fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, TransportError> {
        let n = self.dim();
        if rhs.len() != n {
            return Err(TransportError::DimensionMismatch {
                expected: n,
                found: rhs.len(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        let mut pivot = self.diag[0];
        if !(pivot.abs() > PIVOT_EPSILON) {
            return Err(TransportError::Singular { row: 0 });
        }
        c_prime[0] = self.upper[0] / pivot;
        d_prime[0] = rhs[0] / pivot;
        for i in 1..n {
            pivot = self.diag[i] - self.lower[i] * c_prime[i - 1];
            if !(pivot.abs() > PIVOT_EPSILON) {
                return Err(TransportError::Singular { row: i });
            }
            c_prime[i] = if i + 1 < n { self.upper[i] / pivot } else { 0.0 };
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / pivot;
        }

        let mut x = vec![0.0; n];
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - c_prime[i] * x[i + 1];
        }
        Ok(x)
    }
}
