//! Error types for HASS MQTT discovery components.

use thiserror::Error;

/// Errors raised while turning a discovery message into a component.
///
/// All of these are fatal for the single device being discovered and never
/// affect other components.
#[derive(Debug, Error)]
pub enum HassError {
    #[error("Invalid discovery message: {0}")]
    InvalidMessage(String),

    #[error("Unsupported component: {0}")]
    UnsupportedComponent(String),

    #[error("Invalid {component} configuration: {reason}")]
    InvalidConfig {
        component: &'static str,
        reason: String,
    },
}

impl HassError {
    pub(crate) fn invalid_config(component: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            component,
            reason: reason.into(),
        }
    }
}

/// Result type for discovery operations.
pub type HassResult<T> = Result<T, HassError>;

/// Errors produced by value codecs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("Payload '{0}' is not an accepted literal")]
    UnknownLiteral(String),

    #[error("Payload '{0}' is not a number")]
    InvalidNumber(String),

    #[error("Value {value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("Cannot encode {actual} with a {codec} codec")]
    TypeMismatch {
        codec: &'static str,
        actual: &'static str,
    },

    #[error("Enumeration requires at least one literal")]
    EmptyLiteralSet,

    #[error("Lower bound {min} is greater than upper bound {max}")]
    InvalidBounds { min: f64, max: f64 },
}
