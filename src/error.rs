
use crate::expression::Phase;
use crate::parsing::source::SourceOffset;

use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// Every way that parsing or evaluating an expression can fail.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
  /// The token stream is malformed: empty input, an unexpected
  /// character, unbalanced braces, or a result stack that did not
  /// collapse to a single value.
  #[error("Invalid syntax: {message}{}", at_position(.position))]
  InvalidSyntax {
    message: String,
    position: Option<SourceOffset>,
  },
  /// A name is neither a known function nor a permitted variable, or
  /// a variable has no value at evaluation time.
  #[error("Invalid name '{name}'{}", at_position(.position))]
  InvalidName {
    name: String,
    position: Option<SourceOffset>,
  },
  /// An operator or function found fewer operands than its arity.
  #[error("Not enough arguments for '{name}', expected {expected} but found {actual}")]
  InvalidArguments {
    name: String,
    expected: usize,
    actual: usize,
  },
  /// A limiter rejected the operands of an operation, or a caller
  /// ceiling (line length, variable count) was exceeded.
  #[error("Calculation limit exceeded: {message}")]
  CalculationLimit {
    message: String,
  },
  /// The native operation itself failed for mathematical reasons.
  #[error("{0}")]
  Domain(#[from] DomainError),
  /// The grammar's converter rejected a numeric lexeme.
  #[error("Could not convert '{lexeme}' at pos {position}: {source}")]
  Conversion {
    lexeme: String,
    position: SourceOffset,
    #[source]
    source: ConversionError,
  },
  /// The expression is in the wrong phase for the requested step.
  #[error("Expected expression in {expected} form, got {actual}")]
  Phase {
    expected: Phase,
    actual: Phase,
  },
}

/// The kind of an [`Error`], for callers who only care about the
/// taxonomy and not the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  InvalidSyntax,
  InvalidName,
  InvalidArguments,
  CalculationLimit,
  Domain,
  Conversion,
  Phase,
}

/// Mathematical failure raised by a native operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DomainError {
  #[error("Division by zero")]
  DivisionByZero,
  #[error("{function} is undefined for {argument}")]
  OutOfDomain {
    function: &'static str,
    argument: String,
  },
  #[error("{function} expects an integer, got {argument}")]
  NonIntegral {
    function: &'static str,
    argument: String,
  },
  #[error("Result of {function} is too large to represent")]
  Overflow {
    function: &'static str,
  },
}

/// A grammar's lexeme converter rejected its input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ConversionError {
  reason: String,
}

struct AtPosition(Option<SourceOffset>);

fn at_position(position: &Option<SourceOffset>) -> AtPosition {
  AtPosition(*position)
}

impl Display for AtPosition {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.0 {
      Some(pos) => write!(f, " at pos {}", pos),
      None => Ok(()),
    }
  }
}

impl Error {
  pub fn invalid_syntax(message: impl Into<String>, position: Option<SourceOffset>) -> Self {
    Error::InvalidSyntax { message: message.into(), position }
  }

  pub fn invalid_name(name: impl Into<String>, position: Option<SourceOffset>) -> Self {
    Error::InvalidName { name: name.into(), position }
  }

  pub fn calculation_limit(message: impl Into<String>) -> Self {
    Error::CalculationLimit { message: message.into() }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::InvalidSyntax { .. } => ErrorKind::InvalidSyntax,
      Error::InvalidName { .. } => ErrorKind::InvalidName,
      Error::InvalidArguments { .. } => ErrorKind::InvalidArguments,
      Error::CalculationLimit { .. } => ErrorKind::CalculationLimit,
      Error::Domain(_) => ErrorKind::Domain,
      Error::Conversion { .. } => ErrorKind::Conversion,
      Error::Phase { .. } => ErrorKind::Phase,
    }
  }

  /// The source position of the failure, if one is known.
  pub fn position(&self) -> Option<SourceOffset> {
    match self {
      Error::InvalidSyntax { position, .. } => *position,
      Error::InvalidName { position, .. } => *position,
      Error::Conversion { position, .. } => Some(*position),
      _ => None,
    }
  }

  /// A short sentence suitable for showing to an end user, in place
  /// of the more technical [`Display`] output.
  pub fn user_message(&self) -> &'static str {
    match self {
      Error::InvalidSyntax { .. } => "Syntax error in expression",
      Error::InvalidName { .. } => "Encountered an unknown variable",
      Error::InvalidArguments { .. } => "Incorrect use of a function",
      Error::CalculationLimit { .. } => "The complexity limit for calculations was reached",
      Error::Domain(DomainError::DivisionByZero) => "Division by zero encountered during evaluation",
      Error::Domain(_) => "Arithmetic error",
      Error::Conversion { .. } => "Could not recognize a value",
      Error::Phase { .. } => "Internal error while evaluating expression",
    }
  }
}

impl ConversionError {
  pub fn new(reason: impl Into<String>) -> Self {
    ConversionError { reason: reason.into() }
  }

  pub fn reason(&self) -> &str {
    &self.reason
  }
}
