//! Errors raised by the Buckley-Leverett solution.

use thiserror::Error;

/// Result type used across the crate.
pub type BlResult<T> = Result<T, BlError>;

#[derive(Error, Debug)]
pub enum BlError {
    /// The Welge tangent condition has no solution on the sampled table.
    /// The saturation step of the segment is too coarse.
    #[error("no Welge front found in segment {segment}: saturation step too coarse")]
    FrontNotFound { segment: u32 },

    /// Saturation outside the interval where the Brooks-Corey curves are defined.
    #[error("saturation {value} outside of valid interval [{min}, {max}]")]
    SaturationOutOfRange { value: f64, min: f64, max: f64 },

    /// A value to interpolate or invert lies outside the table range.
    #[error("cannot interpolate {what} at {value}: table spans [{min}, {max}]")]
    Interpolation {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("table for {what} is not monotone and cannot be interpolated")]
    NotMonotone { what: &'static str },

    #[error("invalid parameter {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    /// The segment-2 candidate profile cannot store the injected volume.
    #[error("material balance not reached at t = {time} s: need {required} m3, profile holds {available} m3")]
    VolumeBalance {
        time: f64,
        required: f64,
        available: f64,
    },

    #[error("tangent point refinement failed: {0}")]
    Refinement(String),

    #[error("invalid scenario file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BlError {
    /// Errors caused by a bad scenario rather than a bad evaluation request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BlError::FrontNotFound { .. } | BlError::InvalidParameter { .. } | BlError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_not_found_names_segment() {
        let err = BlError::FrontNotFound { segment: 2 };
        assert!(err.to_string().contains("segment 2"));
        assert!(err.is_configuration());
    }

    #[test]
    fn domain_errors_are_not_configuration() {
        let err = BlError::SaturationOutOfRange {
            value: 0.95,
            min: 0.2,
            max: 0.8,
        };
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("0.95"));
    }
}
