//! The file-level external-resource store.
//!
//! Maps a (container, field, key) triple to a registry entry: a resource
//! (name, uri) plus an entity (id, uri) within it. The store is owned by the
//! [`crate::file::GenotypeFile`] and shared with its descendant tables
//! through weak back-links; tables only ever call [`ExternalResources::add_ref`].
//!
//! Layout follows the upstream store it stands in for: four parallel row
//! lists (keys, resources, entities, objects) cross-referenced by index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-text key that one or more entities are registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
  pub key: String,
}

/// An external resource (registry, ontology, database).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
  pub name: String,
  pub uri:  String,
}

/// An entity within a resource, reached from a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
  pub key_index:      usize,
  pub resource_index: usize,
  pub entity_id:      String,
  pub entity_uri:     String,
}

/// A (container, field) pair annotated with a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
  pub object_id: Uuid,
  pub field:     String,
  pub key_index: usize,
}

/// Handle returned by [`ExternalResources::add_ref`]: the row indices the
/// reference landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
  pub key_index:      usize,
  pub resource_index: usize,
  pub entity_index:   usize,
  pub object_index:   usize,
}

/// A fully joined reference, as returned by [`ExternalResources::get_refs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
  pub resource_name: String,
  pub resource_uri:  String,
  pub entity_id:     String,
  pub entity_uri:    String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalResources {
  keys:      Vec<KeyEntry>,
  resources: Vec<ResourceEntry>,
  entities:  Vec<EntityEntry>,
  objects:   Vec<ObjectEntry>,
}

impl ExternalResources {
  pub fn new() -> Self { Self::default() }

  /// Register a reference from (`object_id`, `field`, `key`) to an entity in
  /// an external resource. Key rows, resource rows, and object rows are
  /// reused when an identical one already exists; entity rows are always
  /// appended.
  #[allow(clippy::too_many_arguments)]
  pub fn add_ref(
    &mut self,
    object_id: Uuid,
    field: &str,
    key: &str,
    resource_name: &str,
    resource_uri: &str,
    entity_id: &str,
    entity_uri: &str,
  ) -> ResourceRef {
    let key_index = match self.keys.iter().position(|k| k.key == key) {
      Some(index) => index,
      None => {
        self.keys.push(KeyEntry {
          key: key.to_string(),
        });
        self.keys.len() - 1
      }
    };
    let resource_index = match self
      .resources
      .iter()
      .position(|r| r.name == resource_name && r.uri == resource_uri)
    {
      Some(index) => index,
      None => {
        self.resources.push(ResourceEntry {
          name: resource_name.to_string(),
          uri:  resource_uri.to_string(),
        });
        self.resources.len() - 1
      }
    };
    self.entities.push(EntityEntry {
      key_index,
      resource_index,
      entity_id: entity_id.to_string(),
      entity_uri: entity_uri.to_string(),
    });
    let object_index = match self.objects.iter().position(|o| {
      o.object_id == object_id && o.field == field && o.key_index == key_index
    }) {
      Some(index) => index,
      None => {
        self.objects.push(ObjectEntry {
          object_id,
          field: field.to_string(),
          key_index,
        });
        self.objects.len() - 1
      }
    };
    ResourceRef {
      key_index,
      resource_index,
      entity_index: self.entities.len() - 1,
      object_index,
    }
  }

  /// Join objects → keys → entities → resources for round-trip verification.
  /// Results preserve entity insertion order; an empty result is not an
  /// error.
  pub fn get_refs(
    &self,
    object_id: Uuid,
    field: &str,
    key: &str,
  ) -> Vec<ResolvedRef> {
    let mut out = Vec::new();
    for object in self
      .objects
      .iter()
      .filter(|o| o.object_id == object_id && o.field == field)
    {
      if self.keys[object.key_index].key != key {
        continue;
      }
      for entity in self
        .entities
        .iter()
        .filter(|e| e.key_index == object.key_index)
      {
        let resource = &self.resources[entity.resource_index];
        out.push(ResolvedRef {
          resource_name: resource.name.clone(),
          resource_uri:  resource.uri.clone(),
          entity_id:     entity.entity_id.clone(),
          entity_uri:    entity.entity_uri.clone(),
        });
      }
    }
    out
  }

  pub fn keys(&self) -> &[KeyEntry] { &self.keys }

  pub fn resources(&self) -> &[ResourceEntry] { &self.resources }

  pub fn entities(&self) -> &[EntityEntry] { &self.entities }

  pub fn objects(&self) -> &[ObjectEntry] { &self.objects }

  pub fn is_empty(&self) -> bool { self.entities.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_ref_appends_all_four_tables() {
    let mut store = ExternalResources::new();
    let object_id = Uuid::new_v4();
    let handle = store.add_ref(
      object_id, "locus", "Vip", "MGI", "https://www.informatics.jax.org",
      "MGI:5435", "https://www.informatics.jax.org/marker/MGI:5435",
    );
    assert_eq!(handle.key_index, 0);
    assert_eq!(store.keys().len(), 1);
    assert_eq!(store.resources().len(), 1);
    assert_eq!(store.entities().len(), 1);
    assert_eq!(store.objects().len(), 1);
  }

  #[test]
  fn identical_keys_and_resources_are_reused() {
    let mut store = ExternalResources::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    store.add_ref(a, "symbol", "Cre", "MGI", "uri", "id1", "euri1");
    let second = store.add_ref(b, "symbol", "Cre", "MGI", "uri", "id2", "euri2");
    assert_eq!(second.key_index, 0);
    assert_eq!(second.resource_index, 0);
    assert_eq!(store.keys().len(), 1);
    assert_eq!(store.resources().len(), 1);
    assert_eq!(store.entities().len(), 2);
  }

  #[test]
  fn get_refs_joins_in_insertion_order() {
    let mut store = ExternalResources::new();
    let object_id = Uuid::new_v4();
    store.add_ref(object_id, "locus", "Vip", "MGI", "mgi_uri", "MGI:1", "u1");
    store.add_ref(object_id, "locus", "Vip", "NCBI Gene", "ncbi_uri", "22353", "u2");

    let refs = store.get_refs(object_id, "locus", "Vip");
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].resource_name, "MGI");
    assert_eq!(refs[0].entity_id, "MGI:1");
    assert_eq!(refs[1].resource_name, "NCBI Gene");
    assert_eq!(refs[1].entity_uri, "u2");
  }

  #[test]
  fn repeated_refs_for_one_triple_reuse_the_object_row() {
    let mut store = ExternalResources::new();
    let object_id = Uuid::new_v4();
    let first = store.add_ref(object_id, "locus", "Vip", "MGI", "u1", "MGI:1", "e1");
    let second =
      store.add_ref(object_id, "locus", "Vip", "NCBI Gene", "u2", "22353", "e2");

    // One object row, two entities; the join yields one ref per entity.
    assert_eq!(second.object_index, first.object_index);
    assert_eq!(store.objects().len(), 1);
    assert_eq!(store.entities().len(), 2);
    let refs = store.get_refs(object_id, "locus", "Vip");
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].entity_id, "MGI:1");
    assert_eq!(refs[1].entity_id, "22353");
  }

  #[test]
  fn get_refs_is_empty_for_unknown_triples() {
    let mut store = ExternalResources::new();
    let object_id = Uuid::new_v4();
    store.add_ref(object_id, "locus", "Vip", "MGI", "uri", "id", "euri");
    assert!(store.get_refs(object_id, "locus", "Rorb").is_empty());
    assert!(store.get_refs(object_id, "symbol", "Vip").is_empty());
    assert!(store.get_refs(Uuid::new_v4(), "locus", "Vip").is_empty());
  }
}
