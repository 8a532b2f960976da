//! File-wide ontology tables: a term dictionary and an object-to-term index.
//!
//! [`OntologyMap`] holds the terms; [`OntologyTable`] links a (container,
//! field) pair to a term by id. Term ids are caller-assigned and unique per
//! table; `item` references are not checked at insert time, so a dangling
//! item only surfaces (and is skipped) on lookup.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, link::Backlink};

/// A controlled-vocabulary term: a free-text key mapped to an ontology entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
  pub id:       u64,
  pub key:      String,
  pub ontology: String,
  pub uri:      String,
}

/// A link from a container's field to a term in the [`OntologyMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyObject {
  pub id:        u64,
  pub object_id: Uuid,
  pub field:     String,
  /// Term id in the map. Not validated at insert time.
  pub item: u64,
}

/// The term dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyMap {
  rows: Vec<OntologyTerm>,
}

impl OntologyMap {
  pub fn new() -> Self { Self::default() }

  /// Append a term. Ids are scanned for uniqueness; a collision is a
  /// [`Error::DuplicateId`].
  pub fn add_term(&mut self, term: OntologyTerm) -> Result<()> {
    if self.rows.iter().any(|r| r.id == term.id) {
      return Err(Error::DuplicateId {
        table: "ontology_terms",
        id:    term.id,
      });
    }
    self.rows.push(term);
    Ok(())
  }

  pub fn get(&self, id: u64) -> Option<&OntologyTerm> {
    self.rows.iter().find(|r| r.id == id)
  }

  pub fn rows(&self) -> &[OntologyTerm] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// The object-to-term index, bound to the map it references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyTable {
  rows: Vec<OntologyObject>,
  #[serde(skip)]
  terms: Backlink<OntologyMap>,
}

impl OntologyTable {
  pub fn new() -> Self { Self::default() }

  /// Append an object record. Same id-uniqueness rule as the map; the `item`
  /// reference is deliberately not checked against the map here.
  pub fn add_object(&mut self, object: OntologyObject) -> Result<()> {
    if self.rows.iter().any(|r| r.id == object.id) {
      return Err(Error::DuplicateId {
        table: "ontology_objects",
        id:    object.id,
      });
    }
    self.rows.push(object);
    Ok(())
  }

  /// Resolve every term annotating (`object_id`, `field`) under `key` into
  /// its (ontology, uri) pair, preserving the order found. Fails with
  /// [`Error::MissingAncestor`] if no term map is bound; an empty result is
  /// `Ok`.
  pub fn get_crid(
    &self,
    object_id: Uuid,
    field: &str,
    key: &str,
  ) -> Result<Vec<(String, String)>> {
    let map = self.terms.upgrade("OntologyMap")?;
    let map = map.borrow();
    let mut out = Vec::new();
    for object in self
      .rows
      .iter()
      .filter(|o| o.object_id == object_id && o.field == field)
    {
      // Dangling items are skipped rather than treated as errors.
      if let Some(term) = map.get(object.item) {
        if term.key == key {
          out.push((term.ontology.clone(), term.uri.clone()));
        }
      }
    }
    Ok(out)
  }

  pub fn rows(&self) -> &[OntologyObject] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub(crate) fn bind_terms(&mut self, map: &Rc<RefCell<OntologyMap>>) {
    self.terms.bind(map);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn term(id: u64, key: &str, ontology: &str, uri: &str) -> OntologyTerm {
    OntologyTerm {
      id,
      key: key.to_string(),
      ontology: ontology.to_string(),
      uri: uri.to_string(),
    }
  }

  fn object(id: u64, object_id: Uuid, field: &str, item: u64) -> OntologyObject {
    OntologyObject {
      id,
      object_id,
      field: field.to_string(),
      item,
    }
  }

  fn bound_table() -> (OntologyTable, Rc<RefCell<OntologyMap>>) {
    let map = Rc::new(RefCell::new(OntologyMap::new()));
    let mut table = OntologyTable::new();
    table.bind_terms(&map);
    (table, map)
  }

  #[test]
  fn duplicate_term_ids_are_rejected() {
    let mut map = OntologyMap::new();
    map.add_term(term(1, "meter", "si_ontology", "si_ontology:m")).unwrap();
    let err = map
      .add_term(term(1, "second", "si_ontology", "si_ontology:s"))
      .unwrap_err();
    assert!(matches!(err, Error::DuplicateId { id: 1, .. }));
    assert_eq!(map.len(), 1);
  }

  #[test]
  fn duplicate_object_ids_are_rejected() {
    let (mut table, _map) = bound_table();
    let container = Uuid::new_v4();
    table.add_object(object(5, container, "unit", 1)).unwrap();
    let err = table.add_object(object(5, container, "unit", 2)).unwrap_err();
    assert!(matches!(err, Error::DuplicateId { id: 5, .. }));
  }

  #[test]
  fn get_crid_requires_a_bound_map() {
    let table = OntologyTable::new();
    let err = table.get_crid(Uuid::new_v4(), "unit", "meter").unwrap_err();
    assert!(matches!(err, Error::MissingAncestor("OntologyMap")));
  }

  #[test]
  fn get_crid_returns_empty_for_no_match() {
    let (mut table, map) = bound_table();
    let container = Uuid::new_v4();
    map
      .borrow_mut()
      .add_term(term(1, "meter", "si_ontology", "si_ontology:m"))
      .unwrap();
    table.add_object(object(0, container, "unit", 1)).unwrap();

    assert!(table.get_crid(container, "unit", "second").unwrap().is_empty());
    assert!(table.get_crid(container, "data", "meter").unwrap().is_empty());
    assert!(table.get_crid(Uuid::new_v4(), "unit", "meter").unwrap().is_empty());
  }

  #[test]
  fn get_crid_returns_all_matches_in_insertion_order() {
    let (mut table, map) = bound_table();
    let container = Uuid::new_v4();
    {
      let mut map = map.borrow_mut();
      map.add_term(term(1, "Vip", "MGI", "MGI:5435")).unwrap();
      map.add_term(term(2, "Vip", "NCBI Gene", "ncbi:22353")).unwrap();
      map.add_term(term(3, "Rorb", "MGI", "MGI:1343464")).unwrap();
    }
    table.add_object(object(0, container, "locus", 1)).unwrap();
    table.add_object(object(1, container, "locus", 2)).unwrap();
    table.add_object(object(2, container, "locus", 3)).unwrap();

    let pairs = table.get_crid(container, "locus", "Vip").unwrap();
    assert_eq!(pairs, vec![
      ("MGI".to_string(), "MGI:5435".to_string()),
      ("NCBI Gene".to_string(), "ncbi:22353".to_string()),
    ]);
  }

  #[test]
  fn dangling_items_are_skipped_on_lookup() {
    let (mut table, map) = bound_table();
    let container = Uuid::new_v4();
    map
      .borrow_mut()
      .add_term(term(1, "Vip", "MGI", "MGI:5435"))
      .unwrap();
    // Item 99 does not exist in the map; insertion succeeds regardless.
    table.add_object(object(0, container, "locus", 99)).unwrap();
    table.add_object(object(1, container, "locus", 1)).unwrap();

    let pairs = table.get_crid(container, "locus", "Vip").unwrap();
    assert_eq!(pairs.len(), 1);
  }

  #[test]
  fn shared_terms_can_annotate_multiple_objects() {
    let (mut table, map) = bound_table();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    map
      .borrow_mut()
      .add_term(term(1, "Mouse", "species_ontology", "species_ontology:Mus musculus"))
      .unwrap();
    table.add_object(object(0, a, "species", 1)).unwrap();
    table.add_object(object(1, b, "species", 1)).unwrap();

    assert_eq!(table.get_crid(a, "species", "Mouse").unwrap().len(), 1);
    assert_eq!(table.get_crid(b, "species", "Mouse").unwrap().len(), 1);
  }
}
