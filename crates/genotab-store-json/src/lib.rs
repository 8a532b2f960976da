//! JSON serialization backend for `genotab-core`.
//!
//! Persists a whole [`genotab_core::file::GenotypeFile`] as a single JSON
//! document and rebuilds its in-tree back-references on read, so resource
//! and ontology operations work on the loaded tree.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{from_json_string, load, save, to_json_string};
