//! Subject — the envelope that carries a genotypes table.
//!
//! Descriptive fields mirror a standard experimental-subject record; all
//! structured genotype information lives in the owned table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  genotype::{GenotypesTable, NewGenotype},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenotypeSubject {
  pub subject_id:  String,
  pub description: Option<String>,
  /// Free-text genotype summary, e.g. `Vip-IRES-Cre/wt`. The structured
  /// form lives in `genotypes_table`.
  pub genotype: Option<String>,
  pub species:  Option<String>,
  pub sex:      Option<String>,
  pub age:      Option<String>,
  pub weight:   Option<String>,
  pub date_of_birth:   Option<DateTime<Utc>>,
  pub genotypes_table: Option<GenotypesTable>,
}

impl GenotypeSubject {
  /// Convenience constructor with all optional fields unset.
  pub fn new(subject_id: impl Into<String>) -> Self {
    Self {
      subject_id: subject_id.into(),
      description: None,
      genotype: None,
      species: None,
      sex: None,
      age: None,
      weight: None,
      date_of_birth: None,
      genotypes_table: None,
    }
  }

  /// Add a genotype row, creating an empty genotypes table on first use.
  ///
  /// A table created here has no resource-store link until the subject is
  /// (re)attached to a [`crate::file::GenotypeFile`], so resource-annotating
  /// calls fail with MissingAncestor until then.
  pub fn add_genotype(&mut self, input: NewGenotype) -> Result<usize> {
    self
      .genotypes_table
      .get_or_insert_with(GenotypesTable::new)
      .add_genotype(input)
  }
}
