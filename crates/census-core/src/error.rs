//! Error types for `census-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown value {value:?} for {field}")]
  UnknownValue { field: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
