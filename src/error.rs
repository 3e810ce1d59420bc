
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StocksieveError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Data error: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, StocksieveError>;

// Helper conversions
impl From<config::ConfigError> for StocksieveError {
    fn from(e: config::ConfigError) -> Self { Self::Configuration(e.to_string()) }
}
impl From<std::io::Error> for StocksieveError {
    fn from(e: std::io::Error) -> Self { Self::Data(e.to_string()) }
}
