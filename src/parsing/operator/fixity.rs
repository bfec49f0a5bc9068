
use std::fmt::{self, Display, Formatter};

/// Whether an operator is written before its single operand or
/// between two operands. The same glyph may be registered once with
/// each fixity; the tokenizer decides which one applies from context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
  Prefix,
  Infix,
}

impl Fixity {
  /// The number of operands an operator of this fixity consumes.
  pub const fn arity(self) -> usize {
    match self {
      Fixity::Prefix => 1,
      Fixity::Infix => 2,
    }
  }
}

impl Display for Fixity {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Fixity::Prefix => write!(f, "prefix"),
      Fixity::Infix => write!(f, "infix"),
    }
  }
}
