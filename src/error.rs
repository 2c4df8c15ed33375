//! Error taxonomy shared by every computation in the crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors raised by the indicator, risk and mining models.
///
/// Zero-denominator points are not errors: they are reported through the
/// sentinel values documented on each operation (`f64::INFINITY`, RSI 100/50,
/// Sharpe 0, or an undefined entry in a derived series).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A whole-series statistic was asked for with too few samples.
    #[error("insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A caller-supplied parameter is outside its valid domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A series violates its ordering or value invariants.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// A price payload could not be decoded.
    #[error("malformed price payload: {0}")]
    Payload(String),

    /// A configuration document could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalyticsError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Rejects a window/period/span of zero.
pub(crate) fn ensure_window(name: &'static str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(AnalyticsError::invalid(name, "must be greater than zero"));
    }
    Ok(())
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AnalyticsError::invalid(name, format!("must be finite, got {value}")));
    }
    Ok(())
}

/// Rejects negative or non-finite values.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(AnalyticsError::invalid(name, format!("must be >= 0, got {value}")));
    }
    Ok(())
}
