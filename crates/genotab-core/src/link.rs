//! Typed back-references from tables to stores owned further up the tree.
//!
//! A table never owns the file-level stores it annotates into; it holds a
//! weak link established when the table is attached under a
//! [`crate::file::GenotypeFile`]. Operations that need the store fail fast
//! with [`Error::MissingAncestor`] until that attachment has happened, so
//! callers must attach before annotating.

use std::{
  cell::RefCell,
  fmt,
  rc::{Rc, Weak},
};

use crate::{Error, Result};

/// A weak, non-owning link to a shared store. Unbound by default; bound at
/// attach time; never serialized (rebound after deserialization via
/// [`crate::file::GenotypeFile::relink`]).
pub(crate) struct Backlink<T> {
  target: Option<Weak<RefCell<T>>>,
}

impl<T> Backlink<T> {
  pub(crate) fn unbound() -> Self { Self { target: None } }

  pub(crate) fn bind(&mut self, store: &Rc<RefCell<T>>) {
    self.target = Some(Rc::downgrade(store));
  }

  /// Resolve the link, failing fast if it was never bound or the store has
  /// been dropped. `what` names the missing store in the error.
  pub(crate) fn upgrade(&self, what: &'static str) -> Result<Rc<RefCell<T>>> {
    self
      .target
      .as_ref()
      .and_then(Weak::upgrade)
      .ok_or(Error::MissingAncestor(what))
  }
}

impl<T> Default for Backlink<T> {
  fn default() -> Self { Self::unbound() }
}

impl<T> Clone for Backlink<T> {
  fn clone(&self) -> Self {
    Self {
      target: self.target.clone(),
    }
  }
}

impl<T> fmt::Debug for Backlink<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = match &self.target {
      Some(weak) if weak.upgrade().is_some() => "bound",
      Some(_) => "dangling",
      None => "unbound",
    };
    write!(f, "Backlink({state})")
  }
}
