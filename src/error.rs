use thiserror::Error;

/// Error type for the modelexpr crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid variable name or a bound that is not a number
    #[error("TypeError: {0}")]
    TypeError(String),
    /// Inverted bounds, out of bounds value or negative exponent
    #[error("RangeError: {0}")]
    RangeError(String),
    /// Unknown variable or function during evaluation or lookup
    #[error("NameError: {0}")]
    NameError(String),
}

impl Error {
    pub(crate) fn undefined(name: &str) -> Self {
        Self::NameError(format!("name '{}' is not defined", name))
    }
}
