//! The genotypes table: append-only genotype rows referencing alleles.
//!
//! Each row describes one locus with one to three alleles. Allele fields are
//! accepted as symbols or raw indices and are always stored as resolved
//! indices into the owned [`AllelesTable`]; both input forms are validated at
//! insert time. CRID annotation is optional per row, but when present it is
//! validated in full before anything is appended.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::{
  Error, Result,
  allele::{AllelesTable, NewAllele},
  crid::{Crid, RegistrySet, check_crid_array},
  link::Backlink,
  resource::ExternalResources,
};

/// Which of the three allele fields an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AlleleSlot {
  #[strum(serialize = "allele1")]
  Allele1,
  #[strum(serialize = "allele2")]
  Allele2,
  #[strum(serialize = "allele3")]
  Allele3,
}

/// An allele reference as supplied by the caller: either a symbol to resolve
/// against the alleles table, or a raw row index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlleleRef {
  Symbol(String),
  Index(usize),
}

impl From<&str> for AlleleRef {
  fn from(symbol: &str) -> Self { Self::Symbol(symbol.to_string()) }
}

impl From<String> for AlleleRef {
  fn from(symbol: String) -> Self { Self::Symbol(symbol) }
}

impl From<usize> for AlleleRef {
  fn from(index: usize) -> Self { Self::Index(index) }
}

/// One committed genotype row. Allele fields are resolved indices into the
/// owning table's [`AllelesTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeRecord {
  pub id:           u64,
  pub locus:        String,
  pub locus_type:   Option<String>,
  pub locus_crids:  Vec<Crid>,
  pub allele1:      usize,
  pub allele2:      usize,
  pub allele3:      Option<usize>,
  pub allele1_type: Option<String>,
  pub allele2_type: Option<String>,
  pub allele3_type: Option<String>,
  pub allele1_crids: Vec<Crid>,
  pub allele2_crids: Vec<Crid>,
  pub allele3_crids: Vec<Crid>,
}

/// Input to [`GenotypesTable::add_genotype`].
///
/// The four `locus_*` resource parameters are all-or-nothing: when all four
/// are present a reference is registered with the ancestor file's resource
/// store; a partial (or absent) set means the row is committed without
/// annotation and a warning is logged.
#[derive(Debug, Clone)]
pub struct NewGenotype {
  pub locus:        String,
  pub locus_type:   Option<String>,
  pub locus_crids:  Vec<Crid>,
  pub allele1:      AlleleRef,
  pub allele2:      AlleleRef,
  pub allele3:      Option<AlleleRef>,
  pub allele1_type: Option<String>,
  pub allele2_type: Option<String>,
  pub allele3_type: Option<String>,
  pub allele1_crids: Vec<Crid>,
  pub allele2_crids: Vec<Crid>,
  pub allele3_crids: Vec<Crid>,
  /// Explicit row id; collisions are rejected. Auto-assigned when `None`.
  pub id: Option<u64>,
  pub locus_resource_name: Option<String>,
  pub locus_resource_uri:  Option<String>,
  pub locus_entity_id:     Option<String>,
  pub locus_entity_uri:    Option<String>,
}

impl NewGenotype {
  /// Convenience constructor with all optional fields unset.
  pub fn new(
    locus: impl Into<String>,
    allele1: impl Into<AlleleRef>,
    allele2: impl Into<AlleleRef>,
  ) -> Self {
    Self {
      locus: locus.into(),
      locus_type: None,
      locus_crids: Vec::new(),
      allele1: allele1.into(),
      allele2: allele2.into(),
      allele3: None,
      allele1_type: None,
      allele2_type: None,
      allele3_type: None,
      allele1_crids: Vec::new(),
      allele2_crids: Vec::new(),
      allele3_crids: Vec::new(),
      id: None,
      locus_resource_name: None,
      locus_resource_uri: None,
      locus_entity_id: None,
      locus_entity_uri: None,
    }
  }

  fn carries_crids(&self) -> bool {
    !self.locus_crids.is_empty()
      || !self.allele1_crids.is_empty()
      || !self.allele2_crids.is_empty()
      || !self.allele3_crids.is_empty()
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenotypesTable {
  object_id: Uuid,
  /// Process or assay used to determine the genotype, e.g. PCR.
  pub process:     Option<String>,
  /// URL of a document detailing the protocol used.
  pub process_url: Option<String>,
  /// Reference genome assembly, e.g. GRCm38.p6.
  pub assembly:    Option<String>,
  /// Reference genome annotation, e.g. NCBI Mus musculus Annotation Release 108.
  pub annotation:  Option<String>,
  registries:    RegistrySet,
  alleles_table: AllelesTable,
  rows:          Vec<GenotypeRecord>,
  #[serde(skip)]
  resources: Backlink<ExternalResources>,
}

impl GenotypesTable {
  pub fn new() -> Self {
    Self::with_alleles_table(AllelesTable::new())
  }

  /// Build a table around a pre-existing alleles table. The table takes
  /// ownership; indices in subsequently added rows resolve against it.
  pub fn with_alleles_table(alleles_table: AllelesTable) -> Self {
    Self {
      object_id: Uuid::new_v4(),
      process: None,
      process_url: None,
      assembly: None,
      annotation: None,
      registries: RegistrySet::default(),
      alleles_table,
      rows: Vec::new(),
      resources: Backlink::unbound(),
    }
  }

  /// The identity of this container, as referenced by annotation stores.
  pub fn object_id(&self) -> Uuid { self.object_id }

  /// Replace the registry set used for CRID validation.
  pub fn set_registries(&mut self, registries: RegistrySet) {
    self.registries = registries;
  }

  pub fn registries(&self) -> &RegistrySet { &self.registries }

  /// Delegates to the owned alleles table.
  pub fn add_allele(&mut self, input: NewAllele) -> Result<usize> {
    self.alleles_table.add_allele(input)
  }

  /// Delegates to the owned alleles table.
  pub fn get_allele_index(&self, symbol: &str) -> Option<usize> {
    self.alleles_table.get_allele_index(symbol)
  }

  /// Validate, resolve, and append a genotype row; returns its index.
  ///
  /// All validation happens before the append, so a failed call leaves the
  /// table untouched. The locus resource registration in the final step is
  /// not transactional with the append: once the row is in, a failure to
  /// reach the ancestor store does not roll it back.
  pub fn add_genotype(&mut self, input: NewGenotype) -> Result<usize> {
    if input.carries_crids() {
      if input.locus_crids.is_empty() {
        return Err(Error::MissingLocusCrid);
      }
      check_crid_array("locus_crid", &input.locus_crids, &self.registries)?;
      check_crid_array("allele1_crid", &input.allele1_crids, &self.registries)?;
      check_crid_array("allele2_crid", &input.allele2_crids, &self.registries)?;
      check_crid_array("allele3_crid", &input.allele3_crids, &self.registries)?;
    }
    if (input.allele3_type.is_some() || !input.allele3_crids.is_empty())
      && input.allele3.is_none()
    {
      return Err(Error::UnannotatedAllele3);
    }

    let allele1 = self.resolve(AlleleSlot::Allele1, input.allele1)?;
    let allele2 = self.resolve(AlleleSlot::Allele2, input.allele2)?;
    let allele3 = input
      .allele3
      .map(|r| self.resolve(AlleleSlot::Allele3, r))
      .transpose()?;

    let id = match input.id {
      Some(id) => {
        if self.rows.iter().any(|r| r.id == id) {
          return Err(Error::DuplicateId {
            table: "genotypes_table",
            id,
          });
        }
        id
      }
      None => self.rows.iter().map(|r| r.id + 1).max().unwrap_or(0),
    };

    let locus = input.locus;
    self.rows.push(GenotypeRecord {
      id,
      locus: locus.clone(),
      locus_type: input.locus_type,
      locus_crids: input.locus_crids,
      allele1,
      allele2,
      allele3,
      allele1_type: input.allele1_type,
      allele2_type: input.allele2_type,
      allele3_type: input.allele3_type,
      allele1_crids: input.allele1_crids,
      allele2_crids: input.allele2_crids,
      allele3_crids: input.allele3_crids,
    });
    let index = self.rows.len() - 1;

    match (
      input.locus_resource_name,
      input.locus_resource_uri,
      input.locus_entity_id,
      input.locus_entity_uri,
    ) {
      (Some(name), Some(uri), Some(entity_id), Some(entity_uri)) => {
        let store = self.resources.upgrade("ExternalResources")?;
        store.borrow_mut().add_ref(
          self.object_id,
          "locus",
          &locus,
          &name,
          &uri,
          &entity_id,
          &entity_uri,
        );
      }
      (None, None, None, None) => {
        tracing::warn!(locus = %locus, "no external resource was created for this locus");
      }
      _ => {
        tracing::warn!(
          locus = %locus,
          "incomplete external resource parameters; no external resource was created"
        );
      }
    }
    Ok(index)
  }

  fn resolve(&self, slot: AlleleSlot, reference: AlleleRef) -> Result<usize> {
    match reference {
      AlleleRef::Symbol(symbol) => self
        .alleles_table
        .get_allele_index(&symbol)
        .ok_or(Error::AlleleNotFound { slot, symbol }),
      AlleleRef::Index(index) => {
        let len = self.alleles_table.len();
        if index < len {
          Ok(index)
        } else {
          Err(Error::AlleleIndexOutOfRange { slot, index, len })
        }
      }
    }
  }

  pub fn alleles_table(&self) -> &AllelesTable { &self.alleles_table }

  pub fn get(&self, index: usize) -> Option<&GenotypeRecord> {
    self.rows.get(index)
  }

  pub fn rows(&self) -> &[GenotypeRecord] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub(crate) fn bind_resources(&mut self, store: &Rc<RefCell<ExternalResources>>) {
    self.resources.bind(store);
    self.alleles_table.bind_resources(store);
  }
}

impl Default for GenotypesTable {
  fn default() -> Self { Self::new() }
}
