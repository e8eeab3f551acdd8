use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThrotError {
    #[error("invalid rate expression: {0:?}")]
    InvalidRate(String),

    #[error("rate must be positive, use \"inf\" for no limit: {0:?}")]
    NonPositiveRate(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("error reading input")]
    Read(#[source] std::io::Error),

    #[error("error writing output")]
    Write(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ThrotError>;
