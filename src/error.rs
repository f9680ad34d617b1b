use thiserror::Error;

/// Everything that can go wrong while building or mutating a [`FlexTime`](crate::FlexTime).
///
/// Errors are raised at the construction (or mask mutation) boundary; a value is
/// either fully valid or not created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlexError {
    /// The string matches no canonical pattern and the free-form parser rejected it too.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// Unrecognized input shape, unknown component key or out-of-range component value.
    #[error("invalid component: {0}")]
    InvalidComponent(String),
    /// Mask string/mapping with the wrong length, bad characters or unknown keys.
    #[error("invalid mask: {0}")]
    InvalidMask(String),
}

pub type Result<T> = std::result::Result<T, FlexError>;

impl From<serde_json::Error> for FlexError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidComponent(e.to_string())
    }
}
