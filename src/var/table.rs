
use std::collections::{hash_map, HashMap};
use std::iter::FromIterator;

/// A table of variable bindings, keyed by variable name.
///
/// A grammar carries one of these as its always-bound defaults, and
/// callers supply another at evaluation time. Lookups consult the
/// caller's table first.
#[derive(Debug, Clone)]
pub struct VarTable<T> {
  data: HashMap<String, T>,
}

impl<T> VarTable<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self { data: HashMap::with_capacity(capacity) }
  }

  pub fn get(&self, name: &str) -> Option<&T> {
    self.data.get(name)
  }

  pub fn contains_key(&self, name: &str) -> bool {
    self.data.contains_key(name)
  }

  pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
    self.data.insert(name.into(), value)
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn iter(&self) -> hash_map::Iter<'_, String, T> {
    self.data.iter()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.data.keys().map(String::as_str)
  }
}

impl<T> Default for VarTable<T> {
  fn default() -> Self {
    Self { data: HashMap::new() }
  }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for VarTable<T> {
  fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
    Self { data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
  }
}

impl<T> From<HashMap<String, T>> for VarTable<T> {
  fn from(data: HashMap<String, T>) -> Self {
    Self { data }
  }
}
