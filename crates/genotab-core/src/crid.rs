//! Central Registry IDs (CRIDs) and their validation.
//!
//! A CRID is a (registry, symbol) pair identifying a locus or allele in an
//! external registry such as MGI. The set of registries a table accepts is
//! configuration ([`RegistrySet`]), not a hard-coded list inside the
//! validator; [`DEFAULT_REGISTRIES`] is the single declared default.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// A known external registry. `Display`/`FromStr` use the canonical registry
/// names as they appear in published genotype records.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum Registry {
  #[serde(rename = "MGI")]
  #[strum(serialize = "MGI")]
  Mgi,
  #[serde(rename = "NCBI Gene")]
  #[strum(serialize = "NCBI Gene")]
  NcbiGene,
  #[serde(rename = "Ensembl")]
  #[strum(serialize = "Ensembl")]
  Ensembl,
}

/// The registries accepted when no explicit set is configured.
pub const DEFAULT_REGISTRIES: [Registry; 3] =
  [Registry::Mgi, Registry::NcbiGene, Registry::Ensembl];

/// A Central Registry ID: a registry plus the symbol of the entry within it,
/// e.g. `MGI 1343464`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crid {
  pub registry: Registry,
  pub symbol:   String,
}

impl Crid {
  pub fn new(registry: Registry, symbol: impl Into<String>) -> Self {
    Self {
      registry,
      symbol: symbol.into(),
    }
  }

  /// Build a CRID from a raw registry name, failing with
  /// [`Error::UnknownRegistry`] if the name is not a known registry.
  pub fn parse(registry: &str, symbol: impl Into<String>) -> Result<Self> {
    let registry = Registry::from_str(registry)
      .map_err(|_| Error::UnknownRegistry(registry.to_string()))?;
    Ok(Self::new(registry, symbol))
  }
}

/// The closed set of registries a table permits in CRID arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySet(Vec<Registry>);

impl RegistrySet {
  pub fn new(registries: impl Into<Vec<Registry>>) -> Self {
    Self(registries.into())
  }

  pub fn contains(&self, registry: Registry) -> bool {
    self.0.contains(&registry)
  }

  pub fn registries(&self) -> &[Registry] { &self.0 }
}

impl Default for RegistrySet {
  fn default() -> Self { Self(DEFAULT_REGISTRIES.to_vec()) }
}

/// Validate a CRID array against a registry set. Returns the first violated
/// constraint only; `field` names the offending column in the error. An empty
/// array is valid here — the locus-specific "at least one CRID" rule belongs
/// to the caller.
///
/// The tuple-shape and symbol-type constraints of the on-disk form are
/// enforced by construction ([`Crid`] is a typed pair), so registry
/// membership is the only check left to make at runtime.
pub fn check_crid_array(
  field: &'static str,
  crids: &[Crid],
  allowed: &RegistrySet,
) -> Result<()> {
  for crid in crids {
    if !allowed.contains(crid.registry) {
      return Err(Error::RegistryNotAllowed {
        field,
        registry: crid.registry.to_string(),
      });
    }
  }
  Ok(())
}
