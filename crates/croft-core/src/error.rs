//! Error types for `croft-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown animal type: {0:?}")]
  UnknownSpecies(String),

  #[error("invalid quantity: {0:?}")]
  InvalidQuantity(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
