// Position/value sequences produced for each output time

use serde::Serialize;

use crate::error::BlResult;
use crate::interpolation::LinearTable;

/// Ordered `(x, value)` pairs along the composite rock, positions non-decreasing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Profile {
    pub x: Vec<f64>,
    pub value: Vec<f64>,
}

impl Profile {
    pub fn with_capacity(capacity: usize) -> Self {
        Profile {
            x: Vec::with_capacity(capacity),
            value: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, x: f64, value: f64) {
        self.x.push(x);
        self.value.push(value);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn first(&self) -> Option<(f64, f64)> {
        Some((*self.x.first()?, *self.value.first()?))
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.x.last()?, *self.value.last()?))
    }

    /// Largest position covered by the profile.
    pub fn extent(&self) -> f64 {
        self.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().cloned().zip(self.value.iter().cloned())
    }

    pub fn interpolator(&self, what: &'static str) -> BlResult<LinearTable> {
        LinearTable::new(what, self.x.clone(), self.value.clone())
    }
}

/// A profile labelled with its time in seconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimedProfile {
    pub time: f64,
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_first_last_and_extent() {
        let mut profile = Profile::with_capacity(3);
        assert!(profile.first().is_none());
        profile.push(0.0, 0.8);
        profile.push(2.0, 0.4);
        profile.push(6.0, 0.2);
        assert_eq!(profile.first(), Some((0.0, 0.8)));
        assert_eq!(profile.last(), Some((6.0, 0.2)));
        assert_eq!(profile.extent(), 6.0);
        assert_eq!(profile.iter().count(), 3);
    }
}
