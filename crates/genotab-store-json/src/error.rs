//! Error type for `genotab-store-json`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] genotab_core::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The serialization layer refuses to write a present-but-empty table.
  #[error("cannot write {0} with zero rows")]
  EmptyTable(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
