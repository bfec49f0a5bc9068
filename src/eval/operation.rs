
//! Native operations backing operators and functions.

use super::limiter::Limiter;
use crate::error::DomainError;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

type NativeFn<T> = dyn Fn(&[T]) -> Result<T, DomainError> + Send + Sync;

/// A native function of fixed arity. The body is only ever called
/// with exactly `arity` arguments, in left-to-right order.
pub struct Native<T> {
  arity: usize,
  body: Arc<NativeFn<T>>,
}

/// A [`Native`] function together with the [`Limiter`] guarding it.
/// Every operation carries a limiter; an operation declared without
/// one receives its grammar's default limiter at build time.
pub struct Operation<T> {
  native: Native<T>,
  limiter: Limiter<T>,
}

impl<T: 'static> Native<T> {
  pub fn nullary<F>(body: F) -> Self
  where F: Fn() -> Result<T, DomainError> + Send + Sync + 'static {
    Self::nary(0, move |_| body())
  }

  pub fn unary<F>(body: F) -> Self
  where F: Fn(&T) -> Result<T, DomainError> + Send + Sync + 'static {
    Self::nary(1, move |args| body(&args[0]))
  }

  pub fn binary<F>(body: F) -> Self
  where F: Fn(&T, &T) -> Result<T, DomainError> + Send + Sync + 'static {
    Self::nary(2, move |args| body(&args[0], &args[1]))
  }

  pub fn nary<F>(arity: usize, body: F) -> Self
  where F: Fn(&[T]) -> Result<T, DomainError> + Send + Sync + 'static {
    Native { arity, body: Arc::new(body) }
  }
}

impl<T> Native<T> {
  pub fn arity(&self) -> usize {
    self.arity
  }
}

impl<T> Operation<T> {
  pub fn new(native: Native<T>, limiter: Limiter<T>) -> Self {
    Operation { native, limiter }
  }

  pub fn arity(&self) -> usize {
    self.native.arity
  }

  pub fn limiter(&self) -> &Limiter<T> {
    &self.limiter
  }

  /// Whether the limiter accepts the given operands.
  pub fn permits(&self, args: &[T]) -> bool {
    self.limiter.permits(args)
  }

  /// Invokes the underlying native function. The limiter is not
  /// consulted here; see [`Operation::permits`].
  ///
  /// Panics if `args` does not have exactly `arity` elements.
  pub fn call(&self, args: &[T]) -> Result<T, DomainError> {
    assert_eq!(args.len(), self.native.arity, "operation called with the wrong number of arguments");
    (self.native.body)(args)
  }
}

impl<T> Clone for Native<T> {
  fn clone(&self) -> Self {
    Native { arity: self.arity, body: Arc::clone(&self.body) }
  }
}

impl<T> Clone for Operation<T> {
  fn clone(&self) -> Self {
    Operation { native: self.native.clone(), limiter: self.limiter.clone() }
  }
}

impl<T> Debug for Native<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "Native {{ arity: {}, body: ... }}", self.arity)
  }
}

impl<T> Debug for Operation<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "Operation {{ arity: {}, limiter: {:?}, body: ... }}", self.native.arity, self.limiter)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_arity() {
    assert_eq!(Native::nullary(|| Ok(0)).arity(), 0);
    assert_eq!(Native::unary(|x: &i32| Ok(*x)).arity(), 1);
    assert_eq!(Native::binary(|x: &i32, y: &i32| Ok(x + y)).arity(), 2);
    assert_eq!(Native::nary(3, |xs: &[i32]| Ok(xs.iter().sum())).arity(), 3);
  }

  #[test]
  fn test_call_preserves_argument_order() {
    let op = Operation::new(Native::binary(|x: &i32, y: &i32| Ok(x - y)), Limiter::unbounded());
    assert_eq!(op.call(&[10, 3]), Ok(7));
  }

  #[test]
  fn test_call_propagates_domain_error() {
    let op = Operation::new(
      Native::binary(|x: &i32, y: &i32| {
        if *y == 0 { Err(DomainError::DivisionByZero) } else { Ok(x / y) }
      }),
      Limiter::unbounded(),
    );
    assert_eq!(op.call(&[1, 0]), Err(DomainError::DivisionByZero));
  }

  #[test]
  fn test_permits_consults_limiter() {
    let op = Operation::new(Native::unary(|x: &i32| Ok(*x)), Limiter::bounds(None, Some(10)));
    assert!(op.permits(&[10]));
    assert!(!op.permits(&[11]));
  }

  #[test]
  #[should_panic]
  fn test_call_with_wrong_arity() {
    let op = Operation::new(Native::unary(|x: &i32| Ok(*x)), Limiter::unbounded());
    let _ = op.call(&[1, 2]);
  }
}
