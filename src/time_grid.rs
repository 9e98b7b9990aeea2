// Output times of a displacement scenario

use serde::{Deserialize, Serialize};

use crate::error::{BlError, BlResult};

/// Fraction of a step under which two times are considered the same.
const STEP_TOLERANCE: f64 = 1e-9;

/// Times in seconds at which profiles are reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeGrid {
    /// `start, start + step, ...` up to and including `horizon`.
    Uniform { start: f64, step: f64, horizon: f64 },
    /// Strictly increasing list of times.
    Explicit { times: Vec<f64> },
}

impl TimeGrid {
    pub fn validate(&self) -> BlResult<()> {
        match self {
            TimeGrid::Uniform {
                start,
                step,
                horizon,
            } => {
                if !(*start > 0.0 && start.is_finite()) {
                    return Err(invalid("time grid start", *start));
                }
                if !(*step > 0.0 && step.is_finite()) {
                    return Err(invalid("time grid step", *step));
                }
                if !(*horizon >= *start && horizon.is_finite()) {
                    return Err(invalid("time grid horizon", *horizon));
                }
            }
            TimeGrid::Explicit { times } => {
                let first = times
                    .first()
                    .ok_or_else(|| invalid("time grid length", 0.0))?;
                if !(*first > 0.0) {
                    return Err(invalid("time grid start", *first));
                }
                if let Some(w) = times.windows(2).find(|w| !(w[1] > w[0])) {
                    return Err(invalid("time grid ordering", w[1]));
                }
                if let Some(t) = times.iter().find(|t| !t.is_finite()) {
                    return Err(invalid("time grid value", *t));
                }
            }
        }
        Ok(())
    }

    /// Last requested time.
    pub fn horizon(&self) -> f64 {
        match self {
            TimeGrid::Uniform { horizon, .. } => *horizon,
            TimeGrid::Explicit { times } => times.last().cloned().unwrap_or(0.0),
        }
    }

    pub fn times(&self) -> Vec<f64> {
        match self {
            TimeGrid::Uniform {
                start,
                step,
                horizon,
            } => {
                let count = ((horizon - start) / step + STEP_TOLERANCE).floor() as usize + 1;
                (0..count).map(|k| start + k as f64 * step).collect()
            }
            TimeGrid::Explicit { times } => times.clone(),
        }
    }

    /// Times before the front reaches the segment interface.
    pub fn single_domain_times(&self, interface_time: f64) -> Vec<f64> {
        self.times()
            .into_iter()
            .filter(|&t| t < interface_time)
            .collect()
    }

    /// Times from the interface arrival up to the horizon, empty when the
    /// front does not reach the interface in time.
    ///
    /// A uniform grid is counted backwards from the horizon and the arrival
    /// time itself leads the list.
    pub fn cross_domain_times(&self, interface_time: f64) -> Vec<f64> {
        if interface_time > self.horizon() {
            return Vec::new();
        }
        match self {
            TimeGrid::Uniform { step, horizon, .. } => {
                let mut times = vec![interface_time];
                let mut later: Vec<f64> = (0..)
                    .map(|k| horizon - k as f64 * step)
                    .take_while(|&t| t > interface_time + STEP_TOLERANCE * step)
                    .collect();
                later.reverse();
                times.extend(later);
                times
            }
            TimeGrid::Explicit { times } => times
                .iter()
                .cloned()
                .filter(|&t| t >= interface_time)
                .collect(),
        }
    }
}

fn invalid(what: &'static str, value: f64) -> BlError {
    BlError::InvalidParameter { what, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DAY: f64 = 86400.0;

    fn tenth_days() -> TimeGrid {
        TimeGrid::Uniform {
            start: 0.1 * DAY,
            step: 0.1 * DAY,
            horizon: DAY,
        }
    }

    #[test]
    fn uniform_grid_includes_horizon() {
        let times = tenth_days().times();
        assert_eq!(times.len(), 10);
        assert_relative_eq!(times[9], DAY, max_relative = 1e-12);
    }

    #[test]
    fn split_at_interface_arrival() {
        let grid = tenth_days();
        let arrival = 0.55 * DAY;
        let before = grid.single_domain_times(arrival);
        let after = grid.cross_domain_times(arrival);
        assert_eq!(before.len(), 5);
        assert_eq!(after[0], arrival);
        assert_eq!(after.len(), 6);
        assert_relative_eq!(after[1], 0.6 * DAY, max_relative = 1e-12);
        assert_eq!(*after.last().unwrap(), DAY);
    }

    #[test]
    fn late_arrival_skips_cross_domain() {
        let grid = tenth_days();
        assert!(grid.cross_domain_times(2.0 * DAY).is_empty());
        assert_eq!(grid.single_domain_times(2.0 * DAY).len(), 10);
    }

    #[test]
    fn explicit_grid_must_increase() {
        let grid = TimeGrid::Explicit {
            times: vec![1.0, 3.0, 2.0],
        };
        assert!(grid.validate().is_err());
        let grid = TimeGrid::Explicit {
            times: vec![1.0, 2.0, 3.0],
        };
        assert!(grid.validate().is_ok());
        assert_eq!(grid.cross_domain_times(2.0), vec![2.0, 3.0]);
    }

    #[test]
    fn deserializes_from_yaml() {
        let grid: TimeGrid =
            serde_yaml::from_str("kind: uniform\nstart: 8640\nstep: 8640\nhorizon: 86400\n")
                .unwrap();
        assert_eq!(grid, tenth_days());
    }
}
