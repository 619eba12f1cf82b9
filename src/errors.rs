use thiserror::Error;

/// Crate-wide error type. Every remote failure maps to `Api`, whatever the
/// underlying cause; the chat panel only ever shows one fixed message for it.
#[derive(Error, Debug)]
pub enum DocketError {
    #[error("api error: {0}")]
    Api(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type DocketResult<T> = Result<T, DocketError>;

impl DocketError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        DocketError::Api(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        DocketError::Config(msg.into())
    }
}
