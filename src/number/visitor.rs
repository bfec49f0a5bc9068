
//! Promotion of number pairs to a common representation. Not exposed
//! outside of `crate::number`.

use super::{Number, NumberImpl};

use num::{BigInt, ToPrimitive};

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum NumberPair {
  Integers(BigInt, BigInt),
  Floats(f64, f64),
}

impl NumberPair {
  /// Promote two numbers to a common representation, so we can do
  /// arithmetic on them. Integers stay exact only if both sides are
  /// integers.
  pub fn promote(left: Number, right: Number) -> NumberPair {
    use NumberImpl::*;
    use NumberPair::*;
    match (left.inner, right.inner) {
      (Integer(left), Integer(right)) => Integers(left, right),
      (Integer(left), Float(right)) => Floats(int_to_float(&left), right),
      (Float(left), Integer(right)) => Floats(left, int_to_float(&right)),
      (Float(left), Float(right)) => Floats(left, right),
    }
  }
}

/// Converts to the nearest float. Integers too large for `f64`
/// become infinite.
pub fn int_to_float(i: &BigInt) -> f64 {
  i.to_f64().unwrap_or(f64::NAN)
}
