
use std::fmt::{self, Display, Formatter};

/// The priority of an operator. Higher values bind more tightly, so
/// `*` at priority 2 binds before `+` at priority 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Precedence(u32);

impl Precedence {
  pub const fn new(n: u32) -> Precedence {
    Precedence(n)
  }

  pub const fn value(self) -> u32 {
    self.0
  }
}

impl From<u32> for Precedence {
  fn from(n: u32) -> Precedence {
    Precedence::new(n)
  }
}

impl Display for Precedence {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ordering() {
    assert!(Precedence::new(10) > Precedence::from(2));
    assert_eq!(Precedence::default(), Precedence::new(0));
    assert_eq!(Precedence::from(7).value(), 7);
    assert_eq!(Precedence::new(5).to_string(), "5");
  }
}
