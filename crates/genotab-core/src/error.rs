//! Error types for `genotab-core`.

use thiserror::Error;

use crate::genotype::AlleleSlot;

#[derive(Debug, Error)]
pub enum Error {
  /// A registry name could not be parsed into a known [`crate::crid::Registry`].
  #[error("unknown registry: '{0}'")]
  UnknownRegistry(String),

  /// A CRID's registry is not in the registry set configured on the table.
  #[error(
    "{field} contains registry '{registry}', which is not in the configured \
     registry set"
  )]
  RegistryNotAllowed {
    field:    &'static str,
    registry: String,
  },

  /// A CRID-annotated genotype row must carry at least one locus CRID.
  #[error("locus_crid must contain at least one CRID")]
  MissingLocusCrid,

  /// allele3_type or allele3_crids were given for an unpopulated allele3 slot.
  #[error("allele3 must be provided if allele3_type or allele3_crids are provided")]
  UnannotatedAllele3,

  #[error("duplicate allele symbol: '{0}'")]
  DuplicateSymbol(String),

  #[error("duplicate id {id} in {table}")]
  DuplicateId { table: &'static str, id: u64 },

  /// Symbol-based allele resolution failed while adding a genotype.
  #[error("{slot} symbol '{symbol}' not found in the alleles table; call add_allele first")]
  AlleleNotFound { slot: AlleleSlot, symbol: String },

  /// Index-based allele resolution failed while adding a genotype.
  #[error("{slot} index {index} is out of range for an alleles table with {len} rows")]
  AlleleIndexOutOfRange {
    slot:  AlleleSlot,
    index: usize,
    len:   usize,
  },

  #[error("unknown column '{field}' in {table}")]
  UnknownField {
    table: &'static str,
    field: String,
  },

  /// A resource or ontology operation was invoked before the table was
  /// attached under a file that owns the relevant store.
  #[error("not attached under a file that owns {0}")]
  MissingAncestor(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
