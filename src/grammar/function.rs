
use crate::eval::operation::Operation;

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A named function of fixed arity, called with the usual
/// `name(arg, arg, ...)` syntax.
pub struct Function<T> {
  name: String,
  operation: Operation<T>,
}

/// A table of known functions, keyed by name.
pub struct FunctionTable<T> {
  known_functions: HashMap<String, Arc<Function<T>>>,
}

impl<T> Function<T> {
  pub fn new(name: impl Into<String>, operation: Operation<T>) -> Self {
    Function { name: name.into(), operation }
  }

  /// The function's name.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn arity(&self) -> usize {
    self.operation.arity()
  }

  pub fn operation(&self) -> &Operation<T> {
    &self.operation
  }
}

impl<T> FunctionTable<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      known_functions: HashMap::with_capacity(capacity),
    }
  }

  pub fn insert(&mut self, func: Function<T>) -> Option<Arc<Function<T>>> {
    self.known_functions.insert(func.name().to_owned(), Arc::new(func))
  }

  pub fn get(&self, name: &str) -> Option<&Arc<Function<T>>> {
    self.known_functions.get(name)
  }

  pub fn len(&self) -> usize {
    self.known_functions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.known_functions.is_empty()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.known_functions.keys().map(String::as_str)
  }
}

impl<T> Default for FunctionTable<T> {
  fn default() -> Self {
    Self { known_functions: HashMap::new() }
  }
}

impl<T> FromIterator<Function<T>> for FunctionTable<T> {
  fn from_iter<I: IntoIterator<Item = Function<T>>>(iter: I) -> Self {
    let iter = iter.into_iter();
    let (len_bound, _) = iter.size_hint();
    let mut table = Self::with_capacity(len_bound);
    for func in iter {
      table.insert(func);
    }
    table
  }
}

impl<T> Debug for Function<T> {
  fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
    write!(f, "Function {{ name: {:?}, arity: {}, body: ... }}", self.name, self.arity())
  }
}

impl<T> Debug for FunctionTable<T> {
  fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
    f.debug_set().entries(self.known_functions.keys()).finish()
  }
}
