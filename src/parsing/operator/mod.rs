
//! Operators, as registered in a [`Grammar`](crate::grammar::Grammar).

mod associativity;
mod fixity;
mod precedence;
mod table;

pub use associativity::Associativity;
pub use fixity::Fixity;
pub use precedence::Precedence;
pub use table::OperatorTable;

use crate::eval::operation::Operation;

use std::fmt::{self, Debug, Display, Formatter};

/// An operator is a single-character glyph with a fixity, a priority,
/// an associativity, and the operation it performs on its operands.
pub struct Operator<T> {
  symbol: char,
  fixity: Fixity,
  assoc: Associativity,
  prec: Precedence,
  operation: Operation<T>,
}

impl<T> Operator<T> {
  /// Constructs a prefix (unary) operator. Prefix operators are
  /// always left-associative; the flag is never consulted, since no
  /// operator may directly follow a prefix operator.
  pub fn prefix(symbol: char, prec: Precedence, operation: Operation<T>) -> Self {
    assert_eq!(operation.arity(), 1, "prefix operator {:?} requires a unary operation", symbol);
    Operator {
      symbol,
      fixity: Fixity::Prefix,
      assoc: Associativity::LEFT,
      prec,
      operation,
    }
  }

  /// Constructs an infix (binary) operator.
  pub fn infix(symbol: char, assoc: Associativity, prec: Precedence, operation: Operation<T>) -> Self {
    assert_eq!(operation.arity(), 2, "infix operator {:?} requires a binary operation", symbol);
    Operator {
      symbol,
      fixity: Fixity::Infix,
      assoc,
      prec,
      operation,
    }
  }

  pub fn symbol(&self) -> char {
    self.symbol
  }

  pub fn fixity(&self) -> Fixity {
    self.fixity
  }

  pub fn is_unary(&self) -> bool {
    self.fixity == Fixity::Prefix
  }

  pub fn arity(&self) -> usize {
    self.fixity.arity()
  }

  pub fn associativity(&self) -> Associativity {
    self.assoc
  }

  pub fn precedence(&self) -> Precedence {
    self.prec
  }

  pub fn operation(&self) -> &Operation<T> {
    &self.operation
  }
}

impl<T> Debug for Operator<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Operator")
      .field("symbol", &self.symbol)
      .field("fixity", &self.fixity)
      .field("assoc", &self.assoc)
      .field("prec", &self.prec)
      .finish_non_exhaustive()
  }
}

impl<T> Display for Operator<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.symbol)
  }
}
