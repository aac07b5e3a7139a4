//! Error types for the analysis pipelines.
//!
//! Once points are in hand, a caller can hand in thresholds that make no
//! sense, a depth range can be too wide for the bin width, or every input
//! was skipped and there is nothing left to report on.

use thiserror::Error;

/// Errors raised by depth reporting and pair classification.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration for '{field}': {detail}")]
    InvalidConfig {
        /// Name of the offending setting.
        field: &'static str,
        /// Description of the problem.
        detail: String,
    },

    /// The depth range divided by the bin width needs more bins than allowed.
    #[error("{required} bins of width {width} needed, at most {limit} allowed")]
    TooManyBins {
        /// Bins the largest value would need.
        required: f64,
        /// Requested bin width.
        width: f64,
        /// Upper bound on the bin count.
        limit: usize,
    },

    /// No input contributed a single in-range depth.
    #[error("no depth data: every input was skipped")]
    NoData,
}

impl Error {
    /// Creates an [`InvalidConfig`](Error::InvalidConfig) error.
    ///
    /// # Arguments
    ///
    /// * `field`: Name of the offending setting
    /// * `detail`: Description of the problem
    pub fn invalid_config(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            detail: detail.into(),
        }
    }
}

/// Rejects values that are not finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_config(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}
