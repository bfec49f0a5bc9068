
//! Safety limiters, which bound the cost of an operation by
//! rejecting operands that are too large.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

type Predicate<T> = dyn Fn(&[T]) -> bool + Send + Sync;

/// A predicate over the full operand list of an operation. If the
/// predicate returns false, the operation is not invoked and the
/// evaluation fails with a calculation limit error.
pub struct Limiter<T> {
  predicate: Arc<Predicate<T>>,
}

impl<T> Limiter<T> {
  pub fn new<F>(predicate: F) -> Self
  where F: Fn(&[T]) -> bool + Send + Sync + 'static {
    Limiter { predicate: Arc::new(predicate) }
  }

  pub fn permits(&self, args: &[T]) -> bool {
    (self.predicate)(args)
  }
}

impl<T: 'static> Limiter<T> {
  /// A limiter which accepts everything.
  pub fn unbounded() -> Self {
    Limiter::new(|_| true)
  }

  /// The standard two-tier policy, applied to a key derived from
  /// each operand.
  ///
  /// The operands are rejected if *every* key exceeds `union_limit`,
  /// or if *any* key exceeds `each_limit`. Either limit can be
  /// disabled by passing `None`. An empty operand list is always
  /// accepted.
  ///
  /// The union limit lets cheap operations tolerate one huge operand
  /// as long as another one is small, while the per-operand limit
  /// bounds operations whose cost grows with any single operand.
  pub fn bounds_by<K, F>(union_limit: Option<K>, each_limit: Option<K>, key: F) -> Self
  where K: PartialOrd + Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static {
    Limiter::new(move |args: &[T]| {
      if args.is_empty() {
        return true;
      }
      let keys: Vec<K> = args.iter().map(&key).collect();
      let union_ok = union_limit.as_ref().map_or(true, |limit| {
        !keys.iter().all(|k| k > limit)
      });
      let each_ok = each_limit.as_ref().map_or(true, |limit| {
        !keys.iter().any(|k| k > limit)
      });
      union_ok && each_ok
    })
  }
}

impl<T: PartialOrd + Clone + Send + Sync + 'static> Limiter<T> {
  /// [`Limiter::bounds_by`], comparing the operands themselves.
  pub fn bounds(union_limit: Option<T>, each_limit: Option<T>) -> Self {
    Limiter::bounds_by(union_limit, each_limit, T::clone)
  }
}

impl<T> Clone for Limiter<T> {
  fn clone(&self) -> Self {
    Limiter { predicate: Arc::clone(&self.predicate) }
  }
}

impl<T> Debug for Limiter<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "Limiter {{ ... }}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unbounded() {
    let limiter = Limiter::<i64>::unbounded();
    assert!(limiter.permits(&[]));
    assert!(limiter.permits(&[i64::MAX, i64::MAX]));
  }

  #[test]
  fn test_union_limit() {
    let limiter = Limiter::bounds(Some(100), None);
    assert!(limiter.permits(&[1, 1000]));
    assert!(limiter.permits(&[1000, 100]));
    assert!(!limiter.permits(&[101, 1000]));
    assert!(!limiter.permits(&[101]));
  }

  #[test]
  fn test_each_limit() {
    let limiter = Limiter::bounds(None, Some(100));
    assert!(limiter.permits(&[100, 100]));
    assert!(!limiter.permits(&[1, 101]));
    assert!(!limiter.permits(&[101]));
  }

  #[test]
  fn test_both_limits() {
    let limiter = Limiter::bounds(Some(10), Some(1000));
    assert!(limiter.permits(&[2, 500]));
    assert!(!limiter.permits(&[20, 500]));
    assert!(!limiter.permits(&[2, 5000]));
  }

  #[test]
  fn test_empty_operands_are_accepted() {
    let limiter = Limiter::<i64>::bounds(Some(0), Some(0));
    assert!(limiter.permits(&[]));
  }

  #[test]
  fn test_bounds_by_key() {
    let limiter = Limiter::bounds_by(None, Some(10), |x: &i64| x.abs());
    assert!(limiter.permits(&[-10, 10]));
    assert!(!limiter.permits(&[-11]));
  }

  #[test]
  fn test_custom_predicate() {
    let limiter = Limiter::new(|args: &[i64]| args.iter().sum::<i64>() < 10);
    assert!(limiter.permits(&[4, 5]));
    assert!(!limiter.permits(&[5, 5]));
  }
}
