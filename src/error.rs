use std::fmt;

use thiserror::Error;

/// A failure code reported by an ephemeris backend, together with the
/// backend's own message.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationError {
    pub code: i32,
    pub message: String,
}

impl CalculationError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        CalculationError {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)
    }
}

/// Errors raised while resolving the inputs of a chart.
///
/// Geometric lookups (sign, house) never produce these; they degrade to
/// `None` so one bad longitude cannot abort a whole chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Calculation Error {0}")]
    Calculation(CalculationError),

    #[error("Ephemeris Error: {0}")]
    Ephemeris(String),

    #[error("Timezone Error: {0}")]
    Timezone(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CalculationError> for ChartError {
    fn from(err: CalculationError) -> Self {
        ChartError::Calculation(err)
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
