//! Core data model for structured genotype and allele metadata.
//!
//! The model is a small tree of in-memory, append-only tables: a
//! [`file::GenotypeFile`] owns a [`subject::GenotypeSubject`] and the shared
//! annotation stores; the subject owns a [`genotype::GenotypesTable`], which
//! in turn owns an [`allele::AllelesTable`]. Genotype rows reference allele
//! rows by index, resolved from symbols at insert time. Everything is
//! single-threaded and synchronous; there is no locking and no rollback.
//!
//! This crate is deliberately free of I/O. Serialization backends (e.g.
//! `genotab-store-json`) live in their own crates and depend on this one.

pub mod allele;
pub mod crid;
pub mod error;
pub mod file;
pub mod genotype;
pub(crate) mod link;
pub mod ontology;
pub mod resource;
pub mod subject;

pub use error::{Error, Result};
