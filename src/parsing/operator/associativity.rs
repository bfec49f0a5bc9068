
/// The associativity of a binary operator. Determines which way a
/// chain of operators of equal priority groups, so that `9-3-2` reads
/// as `(9-3)-2` while `2^3^2` reads as `2^(3^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Associativity {
  left_assoc: bool,
  right_assoc: bool,
}

impl Associativity {
  /// Indicates an operator which associates to the left.
  pub const LEFT: Associativity = Associativity {
    left_assoc: true,
    right_assoc: false,
  };
  /// Indicates an operator which associate to the right.
  pub const RIGHT: Associativity = Associativity {
    left_assoc: false,
    right_assoc: true,
  };
  /// Indicates an associative operator for which the order of
  /// evaluation doesn't affect the result. The shunting yard groups
  /// these to the left.
  pub const FULL: Associativity = Associativity {
    left_assoc: true,
    right_assoc: true,
  };
  pub const fn is_left_assoc(self) -> bool {
    self.left_assoc
  }
  pub const fn is_right_assoc(self) -> bool {
    self.right_assoc
  }
  pub const fn is_fully_assoc(self) -> bool {
    self.left_assoc && self.right_assoc
  }
}

impl Default for Associativity {
  fn default() -> Self {
    Associativity::LEFT
  }
}
