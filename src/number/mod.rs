
//! Real numbers for the arithmetic calculator.

mod visitor;

use visitor::{NumberPair, int_to_float};
use crate::error::DomainError;

use num::{BigInt, BigRational, Integer, Signed, Zero, One, FromPrimitive, ToPrimitive};
use thiserror::Error;
use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::ops;
use std::cmp::Ordering;

/// A real number, represented either as an exact (arbitrary-precision)
/// integer or as an IEEE 754 floating point value.
///
/// Binary operations on two integers stay exact where the result is
/// an integer; anything involving a float produces a float. True
/// division always produces a float.
///
/// Values produced by the checked operations on this type are always
/// finite. The unchecked `ops` impls may produce infinite floats; use
/// [`Number::finite`] to reject those.
#[derive(Debug, Clone)]
pub struct Number {
  inner: NumberImpl,
}

#[derive(Debug, Clone)]
enum NumberImpl {
  Integer(BigInt),
  Float(f64),
}

/// The different ways a number can be represented. Integer sorts
/// before Float, which is the direction of promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberRepr {
  /// An integer, exact.
  Integer,
  /// An inexact IEEE 754 floating-point value.
  Float,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse number '{input}'")]
pub struct ParseNumberError {
  input: String,
}

/// Trait for defining a stricter notion of equality than the usual
/// [`PartialEq`]. `a.strict_eq(b)` should imply `a == b`.
pub trait StrictEq: PartialEq {
  fn strict_eq(&self, other: &Self) -> bool;
}

impl Number {
  /// Gets the current representation of the number.
  pub fn repr(&self) -> NumberRepr {
    match &self.inner {
      NumberImpl::Integer(_) => NumberRepr::Integer,
      NumberImpl::Float(_) => NumberRepr::Float,
    }
  }

  /// Constructs a float, failing if it is not finite. `function`
  /// names the operation which produced it.
  pub fn try_float(f: f64, function: &'static str) -> Result<Number, DomainError> {
    if f.is_finite() {
      Ok(Number::from(f))
    } else {
      Err(DomainError::Overflow { function })
    }
  }

  /// Rejects infinite or NaN floats. Integers always pass.
  pub fn finite(self, function: &'static str) -> Result<Number, DomainError> {
    match self.inner {
      NumberImpl::Float(f) => Number::try_float(f, function),
      NumberImpl::Integer(_) => Ok(self),
    }
  }

  /// The exact integer value, if this number is represented as an
  /// integer. Floats with integral values are *not* integers here.
  pub fn as_integer(&self) -> Option<&BigInt> {
    match &self.inner {
      NumberImpl::Integer(i) => Some(i),
      NumberImpl::Float(_) => None,
    }
  }

  /// Nearest `f64`. Integers too large for `f64` become infinite.
  pub fn to_f64(&self) -> f64 {
    match &self.inner {
      NumberImpl::Integer(i) => int_to_float(i),
      NumberImpl::Float(f) => *f,
    }
  }

  pub fn is_zero(&self) -> bool {
    match &self.inner {
      NumberImpl::Integer(i) => i.is_zero(),
      NumberImpl::Float(f) => *f == 0.0,
    }
  }

  pub fn is_negative(&self) -> bool {
    match &self.inner {
      NumberImpl::Integer(i) => i.is_negative(),
      NumberImpl::Float(f) => *f < 0.0,
    }
  }

  pub fn abs(&self) -> Number {
    match &self.inner {
      NumberImpl::Integer(i) => Number::from(i.abs()),
      NumberImpl::Float(f) => Number::from(f.abs()),
    }
  }

  /// True division. The result is always a float, even if both
  /// operands are integers.
  pub fn checked_div(&self, other: &Number) -> Result<Number, DomainError> {
    if other.is_zero() {
      return Err(DomainError::DivisionByZero);
    }
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => {
        // Go through the exact ratio, so that huge operands with a
        // small quotient still divide correctly.
        let ratio = BigRational::new(left, right);
        Number::try_float(ratio.to_f64().unwrap_or(f64::NAN), "/")
      }
      NumberPair::Floats(left, right) => Number::try_float(left / right, "/"),
    }
  }

  /// Floor division, rounding towards negative infinity. Exact for
  /// integers.
  pub fn div_floor(&self, other: &Number) -> Result<Number, DomainError> {
    if other.is_zero() {
      return Err(DomainError::DivisionByZero);
    }
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => Ok(Number::from(left.div_floor(&right))),
      NumberPair::Floats(left, right) => Number::try_float((left / right).floor(), ":"),
    }
  }

  /// Remainder of floor division. The result has the sign of the
  /// divisor.
  pub fn mod_floor(&self, other: &Number) -> Result<Number, DomainError> {
    if other.is_zero() {
      return Err(DomainError::DivisionByZero);
    }
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => Ok(Number::from(left.mod_floor(&right))),
      NumberPair::Floats(left, right) => {
        let mut r = left % right;
        if r != 0.0 && (r < 0.0) != (right < 0.0) {
          r += right;
        }
        Number::try_float(r, "%")
      }
    }
  }

  /// Exponentiation. An integer raised to a non-negative integer
  /// power is computed exactly; every other combination is computed
  /// in floating point.
  pub fn checked_pow(&self, exp: &Number) -> Result<Number, DomainError> {
    match NumberPair::promote(self.clone(), exp.clone()) {
      NumberPair::Integers(base, exp) if !exp.is_negative() => {
        let exp = exp.to_u32().ok_or(DomainError::Overflow { function: "^" })?;
        Ok(Number::from(base.pow(exp)))
      }
      NumberPair::Integers(base, exp) => {
        if base.is_zero() {
          return Err(DomainError::DivisionByZero);
        }
        Number::try_float(int_to_float(&base).powf(int_to_float(&exp)), "^")
      }
      NumberPair::Floats(base, exp) => {
        if base == 0.0 && exp < 0.0 {
          return Err(DomainError::DivisionByZero);
        }
        if base < 0.0 && exp.fract() != 0.0 {
          return Err(DomainError::OutOfDomain {
            function: "^",
            argument: format!("{} ^ {}", Number::from(base), Number::from(exp)),
          });
        }
        Number::try_float(base.powf(exp), "^")
      }
    }
  }

  /// Rounds to the nearest integer, with ties going to the even
  /// neighbor. The result is always an integer.
  pub fn round(&self) -> Result<Number, DomainError> {
    match &self.inner {
      NumberImpl::Integer(_) => Ok(self.clone()),
      NumberImpl::Float(f) => {
        BigInt::from_f64(f.round_ties_even())
          .map(Number::from)
          .ok_or(DomainError::Overflow { function: "round" })
      }
    }
  }

  /// `n!` for a non-negative integer `n`.
  pub fn factorial(&self) -> Result<Number, DomainError> {
    let n = self.as_integer().ok_or_else(|| DomainError::NonIntegral {
      function: "factorial",
      argument: self.to_string(),
    })?;
    if n.is_negative() {
      return Err(DomainError::OutOfDomain { function: "factorial", argument: n.to_string() });
    }
    let mut acc = BigInt::one();
    let mut i = BigInt::one();
    while &i <= n {
      acc *= &i;
      i += 1;
    }
    Ok(Number::from(acc))
  }
}

impl From<i32> for Number {
  fn from(i: i32) -> Number {
    Number::from(BigInt::from(i))
  }
}

impl From<i64> for Number {
  fn from(i: i64) -> Number {
    Number::from(BigInt::from(i))
  }
}

impl From<BigInt> for Number {
  fn from(i: BigInt) -> Number {
    Number { inner: NumberImpl::Integer(i) }
  }
}

impl From<f64> for Number {
  fn from(f: f64) -> Number {
    Number { inner: NumberImpl::Float(f) }
  }
}

impl Default for Number {
  fn default() -> Number {
    Number::from(0)
  }
}

/// A lexeme containing a decimal point is read as a float, anything
/// else as an integer.
impl FromStr for Number {
  type Err = ParseNumberError;

  fn from_str(s: &str) -> Result<Number, ParseNumberError> {
    let err = || ParseNumberError { input: s.to_owned() };
    if s.contains('.') {
      let f = s.parse::<f64>().map_err(|_| err())?;
      if f.is_finite() { Ok(Number::from(f)) } else { Err(err()) }
    } else {
      s.parse::<BigInt>().map(Number::from).map_err(|_| err())
    }
  }
}

impl Display for Number {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.inner {
      NumberImpl::Integer(i) => {
        i.fmt(f)
      }
      NumberImpl::Float(d) => {
        // If the float is actually a (small) integer, force one decimal
        // point. Otherwise, use default printer.
        if d.fract() == 0.0 && d.abs() < u64::MAX as f64 {
          write!(f, "{:.1}", d)
        } else {
          write!(f, "{}", d)
        }
      }
    }
  }
}

/// `PartialEq` impl for `Number` compares the numerical value and
/// ignores the representation. To include the representation, use
/// [`StrictEq::strict_eq`].
impl PartialEq for Number {
  fn eq(&self, other: &Number) -> bool {
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => left == right,
      NumberPair::Floats(left, right) => left == right,
    }
  }
}

impl StrictEq for Number {
  fn strict_eq(&self, other: &Number) -> bool {
    self.repr() == other.repr() && self == other
  }
}

impl PartialOrd for Number {
  fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => left.partial_cmp(&right),
      NumberPair::Floats(left, right) => left.partial_cmp(&right),
    }
  }
}

impl AbsDiffEq for Number {
  type Epsilon = f64;

  fn default_epsilon() -> f64 {
    <f64 as AbsDiffEq>::default_epsilon()
  }

  fn abs_diff_eq(&self, other: &Number, epsilon: f64) -> bool {
    self.to_f64().abs_diff_eq(&other.to_f64(), epsilon)
  }
}

impl RelativeEq for Number {
  fn default_max_relative() -> f64 {
    <f64 as RelativeEq>::default_max_relative()
  }

  fn relative_eq(&self, other: &Number, epsilon: f64, max_relative: f64) -> bool {
    self.to_f64().relative_eq(&other.to_f64(), epsilon, max_relative)
  }
}

impl UlpsEq for Number {
  fn default_max_ulps() -> u32 {
    <f64 as UlpsEq>::default_max_ulps()
  }

  fn ulps_eq(&self, other: &Number, epsilon: f64, max_ulps: u32) -> bool {
    self.to_f64().ulps_eq(&other.to_f64(), epsilon, max_ulps)
  }
}

impl ops::Add for Number {
  type Output = Number;

  fn add(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) => Number::from(left + right),
      NumberPair::Floats(left, right) => Number::from(left + right),
    }
  }
}

impl ops::Add for &Number {
  type Output = Number;

  fn add(self, other: &Number) -> Number {
    self.clone() + other.clone()
  }
}

impl ops::Sub for Number {
  type Output = Number;

  fn sub(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) => Number::from(left - right),
      NumberPair::Floats(left, right) => Number::from(left - right),
    }
  }
}

impl ops::Sub for &Number {
  type Output = Number;

  fn sub(self, other: &Number) -> Number {
    self.clone() - other.clone()
  }
}

impl ops::Mul for Number {
  type Output = Number;

  fn mul(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) => Number::from(left * right),
      NumberPair::Floats(left, right) => Number::from(left * right),
    }
  }
}

impl ops::Mul for &Number {
  type Output = Number;

  fn mul(self, other: &Number) -> Number {
    self.clone() * other.clone()
  }
}

impl ops::Neg for Number {
  type Output = Number;

  fn neg(self) -> Number {
    match self.inner {
      NumberImpl::Integer(i) => Number::from(-i),
      NumberImpl::Float(f) => Number::from(-f),
    }
  }
}

impl ops::Neg for &Number {
  type Output = Number;

  fn neg(self) -> Number {
    -self.clone()
  }
}
