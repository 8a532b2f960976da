//! The file container: root of the ownership tree.
//!
//! Owns the subject and the file-wide annotation stores (external resources
//! plus the ontology term map and object index). Attaching a subject binds
//! the back-links that let its tables reach the resource store — attach
//! first, annotate after.

use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  ontology::{OntologyMap, OntologyObject, OntologyTable, OntologyTerm},
  resource::ExternalResources,
  subject::GenotypeSubject,
};

/// A single experiment file. Deserializing one leaves its back-links
/// unbound; call [`GenotypeFile::relink`] afterwards (the store crates do
/// this on load).
#[derive(Debug, Serialize, Deserialize)]
pub struct GenotypeFile {
  object_id: Uuid,
  pub identifier:          String,
  pub session_description: String,
  pub session_start_time:  DateTime<Utc>,
  subject:            Option<GenotypeSubject>,
  external_resources: Rc<RefCell<ExternalResources>>,
  ontology_terms:     Rc<RefCell<OntologyMap>>,
  ontology_objects:   OntologyTable,
}

impl GenotypeFile {
  pub fn new(
    identifier: impl Into<String>,
    session_description: impl Into<String>,
    session_start_time: DateTime<Utc>,
  ) -> Self {
    let ontology_terms = Rc::new(RefCell::new(OntologyMap::new()));
    let mut ontology_objects = OntologyTable::new();
    ontology_objects.bind_terms(&ontology_terms);
    Self {
      object_id: Uuid::new_v4(),
      identifier: identifier.into(),
      session_description: session_description.into(),
      session_start_time,
      subject: None,
      external_resources: Rc::new(RefCell::new(ExternalResources::new())),
      ontology_terms,
      ontology_objects,
    }
  }

  pub fn object_id(&self) -> Uuid { self.object_id }

  /// Attach a subject, binding the resource-store link on its genotypes
  /// table (and that table's alleles table). A genotypes table assigned to
  /// the subject after this call is not linked until `relink` is invoked.
  pub fn set_subject(&mut self, mut subject: GenotypeSubject) {
    if let Some(table) = subject.genotypes_table.as_mut() {
      table.bind_resources(&self.external_resources);
    }
    self.subject = Some(subject);
  }

  pub fn subject(&self) -> Option<&GenotypeSubject> { self.subject.as_ref() }

  pub fn subject_mut(&mut self) -> Option<&mut GenotypeSubject> {
    self.subject.as_mut()
  }

  /// Shared handle to the file-wide resource store.
  pub fn external_resources(&self) -> Rc<RefCell<ExternalResources>> {
    Rc::clone(&self.external_resources)
  }

  /// Shared handle to the file-wide term dictionary.
  pub fn ontology_terms(&self) -> Rc<RefCell<OntologyMap>> {
    Rc::clone(&self.ontology_terms)
  }

  pub fn ontology_objects(&self) -> &OntologyTable { &self.ontology_objects }

  pub fn add_ontology_term(&self, term: OntologyTerm) -> Result<()> {
    self.ontology_terms.borrow_mut().add_term(term)
  }

  pub fn add_ontology_object(&mut self, object: OntologyObject) -> Result<()> {
    self.ontology_objects.add_object(object)
  }

  /// Resolve (`object_id`, `field`, `key`) through the ontology tables.
  pub fn get_crid(
    &self,
    object_id: Uuid,
    field: &str,
    key: &str,
  ) -> Result<Vec<(String, String)>> {
    self.ontology_objects.get_crid(object_id, field, key)
  }

  /// Re-establish every back-link in the tree. Required after
  /// deserialization, or after replacing an attached subject's genotypes
  /// table.
  pub fn relink(&mut self) {
    self.ontology_objects.bind_terms(&self.ontology_terms);
    if let Some(subject) = self.subject.as_mut() {
      if let Some(table) = subject.genotypes_table.as_mut() {
        table.bind_resources(&self.external_resources);
      }
    }
  }
}
