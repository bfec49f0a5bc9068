
use super::operator::Operator;
use super::source::Span;
use crate::grammar::function::Function;

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// A lexical unit of an expression, together with the span of input
/// it was read from.
#[derive(Debug)]
pub struct Token<T> {
  data: TokenData<T>,
  span: Span,
}

/// The contents of a token. Operators and functions are shared with
/// the grammar that produced them.
#[derive(Debug)]
pub enum TokenData<T> {
  /// A literal value, already converted by the grammar.
  Number(T),
  /// A reference to a named variable.
  Variable(String),
  Operator(Arc<Operator<T>>),
  Function(Arc<Function<T>>),
  OpenBrace(char),
  CloseBrace(char),
  ArgSeparator(char),
}

impl<T> Token<T> {
  pub fn new(data: TokenData<T>, span: Span) -> Self {
    Self { data, span }
  }

  pub fn number(value: T, span: Span) -> Self {
    Self::new(TokenData::Number(value), span)
  }

  pub fn variable(name: impl Into<String>, span: Span) -> Self {
    Self::new(TokenData::Variable(name.into()), span)
  }

  pub fn operator(op: Arc<Operator<T>>, span: Span) -> Self {
    Self::new(TokenData::Operator(op), span)
  }

  pub fn function(func: Arc<Function<T>>, span: Span) -> Self {
    Self::new(TokenData::Function(func), span)
  }

  pub fn data(&self) -> &TokenData<T> {
    &self.data
  }

  pub fn span(&self) -> Span {
    self.span
  }
}

impl<T: Clone> Clone for TokenData<T> {
  fn clone(&self) -> Self {
    match self {
      TokenData::Number(value) => TokenData::Number(value.clone()),
      TokenData::Variable(name) => TokenData::Variable(name.clone()),
      TokenData::Operator(op) => TokenData::Operator(Arc::clone(op)),
      TokenData::Function(func) => TokenData::Function(Arc::clone(func)),
      TokenData::OpenBrace(c) => TokenData::OpenBrace(*c),
      TokenData::CloseBrace(c) => TokenData::CloseBrace(*c),
      TokenData::ArgSeparator(c) => TokenData::ArgSeparator(*c),
    }
  }
}

impl<T: Clone> Clone for Token<T> {
  fn clone(&self) -> Self {
    Self { data: self.data.clone(), span: self.span }
  }
}

impl<T: Display> Display for TokenData<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TokenData::Number(value) => value.fmt(f),
      TokenData::Variable(name) => name.fmt(f),
      TokenData::Operator(op) => op.fmt(f),
      TokenData::Function(func) => func.name().fmt(f),
      TokenData::OpenBrace(c) | TokenData::CloseBrace(c) | TokenData::ArgSeparator(c) => c.fmt(f),
    }
  }
}

impl<T: Display> Display for Token<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.data)
  }
}
