// Piecewise-linear interpolation over monotone tables

use crate::error::{BlError, BlResult};

/// Relative slack allowed outside the table range before a lookup is refused.
const RANGE_TOLERANCE: f64 = 1e-9;

/// Linear interpolant of `y(x)` where `x` is monotone.
///
/// Decreasing tables are stored reversed. Repeated abscissas are allowed,
/// a lookup exactly on a repeated abscissa returns the first ordinate of the run.
#[derive(Clone, Debug)]
pub struct LinearTable {
    what: &'static str,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearTable {
    pub fn new(what: &'static str, x: Vec<f64>, y: Vec<f64>) -> BlResult<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return Err(BlError::NotMonotone { what });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(BlError::NotMonotone { what });
        }
        let increasing = x.windows(2).all(|w| w[1] >= w[0]);
        let decreasing = x.windows(2).all(|w| w[1] <= w[0]);
        let (x, y) = if increasing {
            (x, y)
        } else if decreasing {
            (x.into_iter().rev().collect(), y.into_iter().rev().collect())
        } else {
            return Err(BlError::NotMonotone { what });
        };
        Ok(LinearTable { what, x, y })
    }

    /// Interpolant of the inverse relation `x(y)`.
    pub fn inverse(what: &'static str, x: &[f64], y: &[f64]) -> BlResult<Self> {
        LinearTable::new(what, y.to_vec(), x.to_vec())
    }

    pub fn min(&self) -> f64 {
        self.x[0]
    }

    pub fn max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn eval(&self, v: f64) -> BlResult<f64> {
        let (min, max) = (self.min(), self.max());
        let slack = RANGE_TOLERANCE * min.abs().max(max.abs());
        if !(v >= min - slack && v <= max + slack) {
            return Err(BlError::Interpolation {
                what: self.what,
                value: v,
                min,
                max,
            });
        }
        let v = v.max(min).min(max);
        let k = self.x.partition_point(|&xi| xi < v);
        if k == 0 {
            return Ok(self.y[0]);
        }
        let (x0, x1) = (self.x[k - 1], self.x[k]);
        let (y0, y1) = (self.y[k - 1], self.y[k]);
        if x1 == x0 {
            return Ok(y1);
        }
        Ok(y0 + (y1 - y0) * (v - x0) / (x1 - x0))
    }
}
