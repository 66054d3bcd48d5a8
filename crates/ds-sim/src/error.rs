use ds_core::DsError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("controller configuration error: {0}")]
    Config(String),

    #[error("{what} {got} outside allowed range {min}..={max}")]
    OutOfRange {
        what: &'static str,
        got:  i64,
        min:  i64,
        max:  i64,
    },

    #[error(transparent)]
    Core(#[from] DsError),
}

pub type SimResult<T> = Result<T, SimError>;
