
use super::Operator;

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A table of operators of a single fixity, indexed by their glyph.
pub struct OperatorTable<T> {
  by_symbol: HashMap<char, Arc<Operator<T>>>,
}

impl<T> OperatorTable<T> {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      by_symbol: HashMap::with_capacity(capacity),
    }
  }

  pub fn get(&self, symbol: char) -> Option<&Arc<Operator<T>>> {
    self.by_symbol.get(&symbol)
  }

  pub fn contains(&self, symbol: char) -> bool {
    self.by_symbol.contains_key(&symbol)
  }

  /// Inserts an operator, replacing (and returning) any operator
  /// previously registered under the same glyph.
  pub fn insert(&mut self, op: Operator<T>) -> Option<Arc<Operator<T>>> {
    self.by_symbol.insert(op.symbol(), Arc::new(op))
  }

  pub fn len(&self) -> usize {
    self.by_symbol.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_symbol.is_empty()
  }
}

impl<T> Default for OperatorTable<T> {
  fn default() -> Self {
    Self { by_symbol: HashMap::new() }
  }
}

impl<T> Debug for OperatorTable<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.by_symbol.keys()).finish()
  }
}

impl<T> FromIterator<Operator<T>> for OperatorTable<T> {
  fn from_iter<I>(iter: I) -> Self
  where I : IntoIterator<Item = Operator<T>> {
    let iter = iter.into_iter();
    let (len_bound, _) = iter.size_hint();
    let mut table = OperatorTable::with_capacity(len_bound);
    for op in iter {
      table.insert(op);
    }
    table
  }
}
