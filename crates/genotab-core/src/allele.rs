//! The alleles table: an append-only row store of allele records.
//!
//! Owns symbol uniqueness (enforced at insert) and symbol → index lookup.
//! Rows are never mutated or removed once added.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  link::Backlink,
  resource::{ExternalResources, ResourceRef},
};

/// One allele row. `id` is assigned by the table and equals the row index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleRecord {
  pub id:                u64,
  pub symbol:            String,
  pub generation_method: Option<String>,
  pub recombinase:       Option<String>,
  pub reporter:          Option<String>,
  pub promoter:          Option<String>,
  pub flanked_sequence:  Option<String>,
}

/// Input to [`AllelesTable::add_allele`].
#[derive(Debug, Clone)]
pub struct NewAllele {
  pub symbol:            String,
  pub generation_method: Option<String>,
  pub recombinase:       Option<String>,
  pub reporter:          Option<String>,
  pub promoter:          Option<String>,
  pub flanked_sequence:  Option<String>,
}

impl NewAllele {
  /// Convenience constructor with all descriptive fields unset.
  pub fn new(symbol: impl Into<String>) -> Self {
    Self {
      symbol: symbol.into(),
      generation_method: None,
      recombinase: None,
      reporter: None,
      promoter: None,
      flanked_sequence: None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllelesTable {
  object_id: Uuid,
  rows:      Vec<AlleleRecord>,
  #[serde(skip)]
  resources: Backlink<ExternalResources>,
}

impl AllelesTable {
  /// The declared columns of this table. Field-targeted operations reject
  /// names outside this set.
  pub const COLUMNS: &'static [&'static str] = &[
    "symbol",
    "generation_method",
    "recombinase",
    "reporter",
    "promoter",
    "flanked_sequence",
  ];

  pub fn new() -> Self {
    Self {
      object_id: Uuid::new_v4(),
      rows:      Vec::new(),
      resources: Backlink::unbound(),
    }
  }

  /// The identity of this container, as referenced by annotation stores.
  pub fn object_id(&self) -> Uuid { self.object_id }

  /// Append an allele row and return its index. The symbol column is scanned
  /// in full; a symbol already present is a [`Error::DuplicateSymbol`].
  pub fn add_allele(&mut self, input: NewAllele) -> Result<usize> {
    if self.rows.iter().any(|r| r.symbol == input.symbol) {
      return Err(Error::DuplicateSymbol(input.symbol));
    }
    let id = self.rows.len() as u64;
    self.rows.push(AlleleRecord {
      id,
      symbol: input.symbol,
      generation_method: input.generation_method,
      recombinase: input.recombinase,
      reporter: input.reporter,
      promoter: input.promoter,
      flanked_sequence: input.flanked_sequence,
    });
    Ok(self.rows.len() - 1)
  }

  /// Index of the first row whose symbol matches, or `None`.
  ///
  /// Uniqueness is enforced at insert, so a multi-match is only possible on
  /// a table loaded from a foreign file; in that case the first match wins
  /// and a warning is logged.
  pub fn get_allele_index(&self, symbol: &str) -> Option<usize> {
    let mut matches = self
      .rows
      .iter()
      .enumerate()
      .filter(|(_, r)| r.symbol == symbol);
    let (index, _) = matches.next()?;
    if matches.next().is_some() {
      tracing::warn!(symbol, "multiple alleles share this symbol; returning the first match");
    }
    Some(index)
  }

  /// Register an external-resource reference for one of this table's
  /// columns. Requires the table to be attached under a file that owns the
  /// resource store.
  pub fn add_external_resource(
    &self,
    field: &str,
    key: &str,
    resource_name: &str,
    resource_uri: &str,
    entity_id: &str,
    entity_uri: &str,
  ) -> Result<ResourceRef> {
    if !Self::COLUMNS.contains(&field) {
      return Err(Error::UnknownField {
        table: "alleles_table",
        field: field.to_string(),
      });
    }
    let store = self.resources.upgrade("ExternalResources")?;
    let handle = store.borrow_mut().add_ref(
      self.object_id,
      field,
      key,
      resource_name,
      resource_uri,
      entity_id,
      entity_uri,
    );
    Ok(handle)
  }

  pub fn get(&self, index: usize) -> Option<&AlleleRecord> {
    self.rows.get(index)
  }

  pub fn rows(&self) -> &[AlleleRecord] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub(crate) fn bind_resources(&mut self, store: &Rc<RefCell<ExternalResources>>) {
    self.resources.bind(store);
  }
}

impl Default for AllelesTable {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_allele_returns_successive_indices() {
    let mut table = AllelesTable::new();
    assert_eq!(table.add_allele(NewAllele::new("Cre")).unwrap(), 0);
    assert_eq!(table.add_allele(NewAllele::new("wt")).unwrap(), 1);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0).unwrap().symbol, "Cre");
  }

  #[test]
  fn add_then_lookup_finds_the_just_added_row() {
    let mut table = AllelesTable::new();
    let index = table.add_allele(NewAllele::new("Vipr2-IRES2-Cre")).unwrap();
    assert_eq!(table.get_allele_index("Vipr2-IRES2-Cre"), Some(index));
  }

  #[test]
  fn duplicate_symbol_is_rejected() {
    let mut table = AllelesTable::new();
    table.add_allele(NewAllele::new("wt")).unwrap();
    let err = table.add_allele(NewAllele::new("wt")).unwrap_err();
    assert!(matches!(err, Error::DuplicateSymbol(s) if s == "wt"));
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn lookup_of_absent_symbol_is_none() {
    let table = AllelesTable::new();
    assert_eq!(table.get_allele_index("Cre"), None);
  }

  #[test]
  fn descriptive_fields_are_stored() {
    let mut table = AllelesTable::new();
    let input = NewAllele {
      recombinase: Some("Cre".to_string()),
      promoter: Some("Vip".to_string()),
      ..NewAllele::new("Vip-IRES-Cre")
    };
    let index = table.add_allele(input).unwrap();
    let row = table.get(index).unwrap();
    assert_eq!(row.recombinase.as_deref(), Some("Cre"));
    assert_eq!(row.promoter.as_deref(), Some("Vip"));
    assert_eq!(row.generation_method, None);
  }

  #[test]
  fn external_resource_requires_an_ancestor() {
    let mut table = AllelesTable::new();
    table.add_allele(NewAllele::new("Cre")).unwrap();
    let err = table
      .add_external_resource("symbol", "Cre", "MGI", "uri", "id", "euri")
      .unwrap_err();
    assert!(matches!(err, Error::MissingAncestor(_)));
  }

  #[test]
  fn external_resource_rejects_unknown_fields() {
    let table = AllelesTable::new();
    let err = table
      .add_external_resource("colour", "Cre", "MGI", "uri", "id", "euri")
      .unwrap_err();
    assert!(matches!(err, Error::UnknownField { field, .. } if field == "colour"));
  }

  #[test]
  fn external_resource_forwards_to_a_bound_store() {
    let store = Rc::new(RefCell::new(ExternalResources::new()));
    let mut table = AllelesTable::new();
    table.bind_resources(&store);
    table.add_allele(NewAllele::new("Cre")).unwrap();

    let handle = table
      .add_external_resource(
        "symbol", "Cre", "MGI", "https://www.informatics.jax.org",
        "MGI:2176738", "https://www.informatics.jax.org/allele/MGI:2176738",
      )
      .unwrap();
    assert_eq!(handle.key_index, 0);

    let store = store.borrow();
    assert_eq!(store.keys().len(), 1);
    assert_eq!(store.objects()[0].object_id, table.object_id());
    assert_eq!(store.objects()[0].field, "symbol");
  }
}
