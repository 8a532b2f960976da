//! Whole-file JSON write and read.

use std::{fs, path::Path};

use genotab_core::file::GenotypeFile;

use crate::{Error, Result};

/// Serialize a file to a JSON document.
///
/// Mirrors the host-framework rule that a present table with zero rows
/// cannot be written: a subject carrying an empty genotypes table is an
/// [`Error::EmptyTable`].
pub fn to_json_string(file: &GenotypeFile) -> Result<String> {
  check_writable(file)?;
  Ok(serde_json::to_string_pretty(file)?)
}

/// Deserialize a file from a JSON document and rebind its back-references.
pub fn from_json_string(json: &str) -> Result<GenotypeFile> {
  let mut file: GenotypeFile = serde_json::from_str(json)?;
  file.relink();
  Ok(file)
}

/// Write a file to `path` as JSON.
pub fn save(path: impl AsRef<Path>, file: &GenotypeFile) -> Result<()> {
  fs::write(path, to_json_string(file)?)?;
  Ok(())
}

/// Read a file back from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<GenotypeFile> {
  from_json_string(&fs::read_to_string(path)?)
}

fn check_writable(file: &GenotypeFile) -> Result<()> {
  if let Some(subject) = file.subject() {
    if let Some(table) = subject.genotypes_table.as_ref() {
      if table.is_empty() {
        return Err(Error::EmptyTable("genotypes_table"));
      }
      if table.alleles_table().is_empty() {
        return Err(Error::EmptyTable("alleles_table"));
      }
    }
  }
  Ok(())
}
