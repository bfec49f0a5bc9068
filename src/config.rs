
//! Calculation limits for the bundled calculators.

use num::BigInt;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use log::debug;

use std::env;
use std::str::FromStr;

pub const LINE_LIMIT_VAR: &str = "CALC_LINE_LIMIT";
pub const OPERAND_LIMIT_VAR: &str = "CALC_OPERAND_LIMIT";
pub const POW_UNION_LIMIT_VAR: &str = "CALC_POW_UNION_LIMIT";
pub const POW_EACH_LIMIT_VAR: &str = "CALC_POW_EACH_LIMIT";
pub const FACTORIAL_LIMIT_VAR: &str = "CALC_FACTORIAL_LIMIT";
pub const MAX_VARS_VAR: &str = "MAX_VARS";

/// Ceilings which keep a single calculation cheap.
///
/// The numeric limits are compared against operand magnitudes. `None`
/// disables a limit. In serialized form, numeric limits are decimal
/// strings, since they do not generally fit in a machine integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
  /// Input lines of this many characters or more are rejected.
  pub line_limit: usize,
  /// No operand of any operation may exceed this.
  #[serde(with = "decimal")]
  pub operand_limit: Option<BigInt>,
  /// `^`, `pow`, and `exp` fail if all of their operands exceed
  /// this.
  #[serde(with = "decimal")]
  pub pow_union_limit: Option<BigInt>,
  /// `^`, `pow`, and `exp` fail if any of their operands exceeds
  /// this.
  #[serde(with = "decimal")]
  pub pow_each_limit: Option<BigInt>,
  #[serde(with = "decimal")]
  pub factorial_limit: Option<BigInt>,
  /// The most distinct variables a truth table may have.
  pub max_vars: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("Invalid value '{value}' for {key}")]
  InvalidValue {
    key: &'static str,
    value: String,
  },
}

impl Limits {
  /// The default limits, overridden by any of the `CALC_*` and
  /// `MAX_VARS` environment variables that are set.
  pub fn from_env() -> Result<Self, ConfigError> {
    Limits::default().with_overrides(|key| env::var(key).ok())
  }

  /// Overrides each limit for which `lookup` returns a value, keyed
  /// by environment variable name. For the numeric limits, the value
  /// `none` disables the limit.
  pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
  where F: Fn(&str) -> Option<String> {
    if let Some(value) = lookup(LINE_LIMIT_VAR) {
      self.line_limit = parse_value(LINE_LIMIT_VAR, &value)?;
    }
    if let Some(value) = lookup(OPERAND_LIMIT_VAR) {
      self.operand_limit = parse_limit(OPERAND_LIMIT_VAR, &value)?;
    }
    if let Some(value) = lookup(POW_UNION_LIMIT_VAR) {
      self.pow_union_limit = parse_limit(POW_UNION_LIMIT_VAR, &value)?;
    }
    if let Some(value) = lookup(POW_EACH_LIMIT_VAR) {
      self.pow_each_limit = parse_limit(POW_EACH_LIMIT_VAR, &value)?;
    }
    if let Some(value) = lookup(FACTORIAL_LIMIT_VAR) {
      self.factorial_limit = parse_limit(FACTORIAL_LIMIT_VAR, &value)?;
    }
    if let Some(value) = lookup(MAX_VARS_VAR) {
      self.max_vars = parse_value(MAX_VARS_VAR, &value)?;
    }
    debug!("Using calculation limits {:?}", self);
    Ok(self)
  }
}

impl Default for Limits {
  fn default() -> Self {
    Limits {
      line_limit: 1000,
      operand_limit: Some(BigInt::from(50).pow(50)),
      pow_union_limit: Some(BigInt::from(1000)),
      pow_each_limit: Some(BigInt::from(100000)),
      factorial_limit: Some(BigInt::from(1000)),
      max_vars: 7,
    }
  }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
  value.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: value.to_owned() })
}

fn parse_limit(key: &'static str, value: &str) -> Result<Option<BigInt>, ConfigError> {
  if value.trim().eq_ignore_ascii_case("none") {
    Ok(None)
  } else {
    parse_value(key, value).map(Some)
  }
}

/// Serde adapter for optional big integers, as decimal strings.
mod decimal {
  use num::BigInt;
  use serde::{Serialize, Deserialize, Serializer, Deserializer};
  use serde::de::Error;

  pub fn serialize<S>(value: &Option<BigInt>, serializer: S) -> Result<S::Ok, S::Error>
  where S: Serializer {
    value.as_ref().map(BigInt::to_string).serialize(serializer)
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigInt>, D::Error>
  where D: Deserializer<'de> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    value.map(|s| s.parse().map_err(D::Error::custom)).transpose()
  }
}
