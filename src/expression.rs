
use crate::error::Error;
use crate::eval;
use crate::grammar::Grammar;
use crate::parsing::shunting_yard;
use crate::parsing::token::{Token, TokenData};
use crate::var::VarTable;

use itertools::Itertools;

use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display, Formatter};

/// The phase an [`Expression`] is in. Expressions are created
/// `Parsed` by the tokenizer and move to `Postfix` exactly once, when
/// the shunting yard reorders them. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
  /// Tokens are in the infix order they were written in.
  Parsed,
  /// Tokens are in postfix (Reverse Polish) order.
  Postfix,
}

/// A sequence of tokens read from one input string, together with the
/// set of variable names it references.
///
/// An expression borrows the grammar it was parsed with, since
/// variable lookups fall back to that grammar's default bindings.
pub struct Expression<'g, T> {
  grammar: &'g Grammar<T>,
  tokens: Vec<Token<T>>,
  phase: Phase,
  variables: BTreeSet<String>,
}

impl<'g, T> Expression<'g, T> {
  pub(crate) fn new(grammar: &'g Grammar<T>) -> Self {
    Expression {
      grammar,
      tokens: Vec::new(),
      phase: Phase::Parsed,
      variables: BTreeSet::new(),
    }
  }

  /// Appends a token. Variable tokens are recorded in the variable
  /// set as well.
  pub(crate) fn push(&mut self, token: Token<T>) {
    if let TokenData::Variable(name) = token.data() {
      if !self.variables.contains(name) {
        self.variables.insert(name.clone());
      }
    }
    self.tokens.push(token);
  }

  /// Rearranges the tokens into the given order and marks the
  /// expression as postfix. Tokens whose index does not appear in
  /// `order` are dropped.
  pub(crate) fn reorder_postfix(&mut self, order: &[usize]) {
    let mut slots: Vec<Option<Token<T>>> = self.tokens.drain(..).map(Some).collect();
    self.tokens = order.iter().filter_map(|&i| slots.get_mut(i).and_then(Option::take)).collect();
    self.phase = Phase::Postfix;
  }

  pub fn grammar(&self) -> &'g Grammar<T> {
    self.grammar
  }

  pub fn tokens(&self) -> &[Token<T>] {
    &self.tokens
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// The distinct variable names referenced by this expression, in
  /// lexicographic order.
  pub fn variables(&self) -> &BTreeSet<String> {
    &self.variables
  }

  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  /// Converts this expression to postfix form. Fails if it is
  /// already in postfix form. See [`shunting_yard::shunt`].
  pub fn shunt(&mut self) -> Result<(), Error> {
    shunting_yard::shunt(self)
  }
}

impl<'g, T: Clone> Expression<'g, T> {
  /// Evaluates this (postfix) expression. See [`eval::evaluate`].
  pub fn evaluate(&self, bindings: &VarTable<T>) -> Result<T, Error> {
    eval::evaluate(self, bindings)
  }
}

impl Display for Phase {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Phase::Parsed => write!(f, "parsed"),
      Phase::Postfix => write!(f, "postfix"),
    }
  }
}

/// Prints the tokens separated by spaces, in their current order.
impl<'g, T: Display> Display for Expression<'g, T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.tokens.iter().join(" "))
  }
}

impl<'g, T: Debug> Debug for Expression<'g, T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Expression")
      .field("tokens", &self.tokens)
      .field("phase", &self.phase)
      .field("variables", &self.variables)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ConversionError;
  use crate::parsing::source::{SourceOffset, Span};

  fn grammar() -> Grammar<i64> {
    Grammar::builder(|s: &str| s.parse().map_err(|_| ConversionError::new("bad integer")))
      .free_variables(true)
      .build()
  }

  fn span(i: usize) -> Span {
    Span::single(SourceOffset(i))
  }

  #[test]
  fn test_new_expression_is_parsed() {
    let grammar = grammar();
    let expr = Expression::new(&grammar);
    assert_eq!(expr.phase(), Phase::Parsed);
    assert!(expr.is_empty());
    assert!(expr.variables().is_empty());
  }

  #[test]
  fn test_variables_are_deduplicated() {
    let grammar = grammar();
    let mut expr = Expression::new(&grammar);
    expr.push(Token::variable("b", span(0)));
    expr.push(Token::variable("a", span(1)));
    expr.push(Token::variable("b", span(2)));
    expr.push(Token::number(3, span(3)));
    assert_eq!(expr.len(), 4);
    assert_eq!(expr.variables().iter().collect::<Vec<_>>(), vec!["a", "b"]);
  }

  #[test]
  fn test_display() {
    let grammar = grammar();
    let mut expr = Expression::new(&grammar);
    expr.push(Token::number(1, span(0)));
    expr.push(Token::variable("x", span(1)));
    assert_eq!(expr.to_string(), "1 x");
  }

  #[test]
  fn test_phase_display() {
    assert_eq!(Phase::Parsed.to_string(), "parsed");
    assert_eq!(Phase::Postfix.to_string(), "postfix");
  }
}
