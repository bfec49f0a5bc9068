
//! The grammar registry: the immutable description of one concrete
//! expression language.
//!
//! A [`Grammar`] is built once through a [`GrammarBuilder`] and is
//! read-only afterward. It is `Send + Sync` whenever `T` is, so a
//! single grammar can be shared across threads while each caller
//! parses and evaluates its own [`Expression`].

pub mod function;

use function::{Function, FunctionTable};
use crate::error::{ConversionError, DomainError, Error};
use crate::eval::limiter::Limiter;
use crate::eval::operation::{Native, Operation};
use crate::expression::Expression;
use crate::parsing::operator::{Associativity, Operator, OperatorTable, Precedence};
use crate::parsing::{shunting_yard, tokenizer};
use crate::var::VarTable;

use log::debug;

use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

type Converter<T> = dyn Fn(&str) -> Result<T, ConversionError> + Send + Sync;

pub const DEFAULT_ARG_SEPARATOR: char = ',';
pub const DEFAULT_OPEN_BRACE: char = '(';
pub const DEFAULT_CLOSE_BRACE: char = ')';
pub const DEFAULT_WHITESPACE: [char; 3] = [' ', '\t', '\n'];

pub struct Grammar<T> {
  unary_operators: OperatorTable<T>,
  binary_operators: OperatorTable<T>,
  functions: FunctionTable<T>,
  allow_free_variables: bool,
  default_variables: VarTable<T>,
  whitespace: HashSet<char>,
  arg_separator: char,
  open_brace: char,
  close_brace: char,
  converter: Arc<Converter<T>>,
}

/// Fluent builder for a [`Grammar`]. Operations declared without a
/// limiter receive the builder's default limiter when the grammar is
/// built.
pub struct GrammarBuilder<T> {
  unary_operators: Vec<OperatorDecl<T>>,
  binary_operators: Vec<OperatorDecl<T>>,
  functions: Vec<FunctionDecl<T>>,
  allow_free_variables: bool,
  default_variables: VarTable<T>,
  whitespace: HashSet<char>,
  arg_separator: char,
  open_brace: char,
  close_brace: char,
  converter: Arc<Converter<T>>,
  default_limiter: Option<Limiter<T>>,
}

struct OperatorDecl<T> {
  symbol: char,
  assoc: Associativity,
  prec: Precedence,
  native: Native<T>,
  limiter: Option<Limiter<T>>,
}

struct FunctionDecl<T> {
  name: String,
  native: Native<T>,
  limiter: Option<Limiter<T>>,
}

impl<T: 'static> Grammar<T> {
  /// Starts building a grammar whose numeric lexemes are converted
  /// by `converter`.
  pub fn builder<F>(converter: F) -> GrammarBuilder<T>
  where F: Fn(&str) -> Result<T, ConversionError> + Send + Sync + 'static {
    GrammarBuilder::new(converter)
  }
}

impl<T> Grammar<T> {
  pub fn unary_operators(&self) -> &OperatorTable<T> {
    &self.unary_operators
  }

  pub fn binary_operators(&self) -> &OperatorTable<T> {
    &self.binary_operators
  }

  pub fn functions(&self) -> &FunctionTable<T> {
    &self.functions
  }

  /// Whether names other than the default variables may appear in
  /// expressions.
  pub fn allows_free_variables(&self) -> bool {
    self.allow_free_variables
  }

  pub fn default_variables(&self) -> &VarTable<T> {
    &self.default_variables
  }

  pub fn is_whitespace(&self, c: char) -> bool {
    self.whitespace.contains(&c)
  }

  pub fn arg_separator(&self) -> char {
    self.arg_separator
  }

  pub fn open_brace(&self) -> char {
    self.open_brace
  }

  pub fn close_brace(&self) -> char {
    self.close_brace
  }

  pub fn convert(&self, lexeme: &str) -> Result<T, ConversionError> {
    (self.converter)(lexeme)
  }

  /// Tokenizes `text` against this grammar. See
  /// [`tokenizer::tokenize`].
  pub fn tokenize(&self, text: &str) -> Result<Expression<'_, T>, Error> {
    tokenizer::tokenize(text, self)
  }

  /// Tokenizes `text` and converts it to postfix form, ready for
  /// evaluation.
  pub fn parse(&self, text: &str) -> Result<Expression<'_, T>, Error> {
    let mut expr = self.tokenize(text)?;
    shunting_yard::shunt(&mut expr)?;
    Ok(expr)
  }
}

impl<T: Clone> Grammar<T> {
  /// Parses `text` and evaluates it once with the given bindings.
  pub fn parse_and_run(&self, text: &str, bindings: &VarTable<T>) -> Result<T, Error> {
    self.parse(text)?.evaluate(bindings)
  }
}

impl<T: 'static> GrammarBuilder<T> {
  pub fn new<F>(converter: F) -> Self
  where F: Fn(&str) -> Result<T, ConversionError> + Send + Sync + 'static {
    GrammarBuilder {
      unary_operators: Vec::new(),
      binary_operators: Vec::new(),
      functions: Vec::new(),
      allow_free_variables: false,
      default_variables: VarTable::new(),
      whitespace: DEFAULT_WHITESPACE.into_iter().collect(),
      arg_separator: DEFAULT_ARG_SEPARATOR,
      open_brace: DEFAULT_OPEN_BRACE,
      close_brace: DEFAULT_CLOSE_BRACE,
      converter: Arc::new(converter),
      default_limiter: None,
    }
  }

  pub fn unary_operator<F>(
    mut self,
    symbol: char,
    func: F,
    prec: Precedence,
    limiter: Option<Limiter<T>>,
  ) -> Self
  where F: Fn(&T) -> Result<T, DomainError> + Send + Sync + 'static {
    self.unary_operators.push(OperatorDecl {
      symbol,
      assoc: Associativity::LEFT,
      prec,
      native: Native::unary(func),
      limiter,
    });
    self
  }

  pub fn binary_operator<F>(
    mut self,
    symbol: char,
    func: F,
    prec: Precedence,
    assoc: Associativity,
    limiter: Option<Limiter<T>>,
  ) -> Self
  where F: Fn(&T, &T) -> Result<T, DomainError> + Send + Sync + 'static {
    self.binary_operators.push(OperatorDecl {
      symbol,
      assoc,
      prec,
      native: Native::binary(func),
      limiter,
    });
    self
  }

  pub fn function(mut self, name: impl Into<String>, native: Native<T>, limiter: Option<Limiter<T>>) -> Self {
    self.functions.push(FunctionDecl { name: name.into(), native, limiter });
    self
  }

  /// Permits (or forbids) caller-supplied variables. When forbidden,
  /// only the default variables may be named. Forbidden by default.
  pub fn free_variables(mut self, allow: bool) -> Self {
    self.allow_free_variables = allow;
    self
  }

  pub fn default_variable(mut self, name: impl Into<String>, value: T) -> Self {
    self.default_variables.insert(name, value);
    self
  }

  pub fn default_limiter(mut self, limiter: Limiter<T>) -> Self {
    self.default_limiter = Some(limiter);
    self
  }

  pub fn arg_separator(mut self, separator: char) -> Self {
    self.arg_separator = separator;
    self
  }

  pub fn braces(mut self, open: char, close: char) -> Self {
    self.open_brace = open;
    self.close_brace = close;
    self
  }

  pub fn whitespace(mut self, chars: impl IntoIterator<Item = char>) -> Self {
    self.whitespace = chars.into_iter().collect();
    self
  }

  pub fn build(self) -> Grammar<T> {
    let default_limiter = self.default_limiter.unwrap_or_else(Limiter::unbounded);
    let resolve = |limiter: Option<Limiter<T>>| limiter.unwrap_or_else(|| default_limiter.clone());

    let unary_operators: OperatorTable<T> = self.unary_operators.into_iter().map(|decl| {
      Operator::prefix(decl.symbol, decl.prec, Operation::new(decl.native, resolve(decl.limiter)))
    }).collect();
    let binary_operators: OperatorTable<T> = self.binary_operators.into_iter().map(|decl| {
      Operator::infix(decl.symbol, decl.assoc, decl.prec, Operation::new(decl.native, resolve(decl.limiter)))
    }).collect();
    let functions: FunctionTable<T> = self.functions.into_iter().map(|decl| {
      Function::new(decl.name, Operation::new(decl.native, resolve(decl.limiter)))
    }).collect();

    debug!(
      "Built grammar with {} unary operators, {} binary operators, {} functions",
      unary_operators.len(),
      binary_operators.len(),
      functions.len(),
    );

    Grammar {
      unary_operators,
      binary_operators,
      functions,
      allow_free_variables: self.allow_free_variables,
      default_variables: self.default_variables,
      whitespace: self.whitespace,
      arg_separator: self.arg_separator,
      open_brace: self.open_brace,
      close_brace: self.close_brace,
      converter: self.converter,
    }
  }
}

impl<T> Debug for Grammar<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Grammar")
      .field("unary_operators", &self.unary_operators)
      .field("binary_operators", &self.binary_operators)
      .field("functions", &self.functions)
      .field("allow_free_variables", &self.allow_free_variables)
      .field("default_variables", &self.default_variables.names().collect::<Vec<_>>())
      .field("arg_separator", &self.arg_separator)
      .field("braces", &(self.open_brace, self.close_brace))
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  fn int_converter(lexeme: &str) -> Result<i64, ConversionError> {
    lexeme.parse().map_err(|_| ConversionError::new("expected an integer"))
  }

  fn sample_grammar() -> Grammar<i64> {
    Grammar::builder(int_converter)
      .unary_operator('-', |a| Ok(-a), Precedence::new(5), None)
      .binary_operator('+', |a, b| Ok(a + b), Precedence::new(1), Associativity::LEFT, None)
      .binary_operator('-', |a, b| Ok(a - b), Precedence::new(1), Associativity::LEFT, None)
      .binary_operator('*', |a, b| Ok(a * b), Precedence::new(2), Associativity::LEFT, Some(Limiter::unbounded()))
      .function("max", Native::binary(|a: &i64, b: &i64| Ok(*a.max(b))), None)
      .default_variable("ten", 10)
      .default_limiter(Limiter::bounds(None, Some(1000)))
      .build()
  }

  #[test]
  fn test_tables() {
    let grammar = sample_grammar();
    assert_eq!(grammar.unary_operators().len(), 1);
    assert_eq!(grammar.binary_operators().len(), 3);
    assert!(grammar.unary_operators().contains('-'));
    assert!(grammar.binary_operators().contains('-'));
    assert_eq!(grammar.functions().get("max").map(|f| f.arity()), Some(2));
    assert!(!grammar.allows_free_variables());
    assert_eq!(grammar.default_variables().get("ten"), Some(&10));
  }

  #[test]
  fn test_default_characters() {
    let grammar = sample_grammar();
    assert_eq!(grammar.arg_separator(), ',');
    assert_eq!(grammar.open_brace(), '(');
    assert_eq!(grammar.close_brace(), ')');
    assert!(grammar.is_whitespace(' '));
    assert!(grammar.is_whitespace('\t'));
    assert!(!grammar.is_whitespace('x'));
  }

  #[test]
  fn test_default_limiter_is_attached() {
    let grammar = sample_grammar();
    let plus = grammar.binary_operators().get('+').unwrap();
    assert!(plus.operation().permits(&[1000, 1]));
    assert!(!plus.operation().permits(&[1001, 1]));
    // Explicit limiters are left alone.
    let times = grammar.binary_operators().get('*').unwrap();
    assert!(times.operation().permits(&[1001, 1]));
  }

  #[test]
  fn test_parse_and_run() {
    let grammar = sample_grammar();
    assert_eq!(grammar.parse_and_run("max(3, ten) * -2", &VarTable::new()), Ok(-20));
    let err = grammar.parse_and_run("2000 + 1", &VarTable::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CalculationLimit);
  }

  #[test]
  fn test_custom_characters() {
    let grammar = Grammar::builder(int_converter)
      .binary_operator('+', |a: &i64, b: &i64| Ok(a + b), Precedence::new(1), Associativity::LEFT, None)
      .function("max", Native::binary(|a: &i64, b: &i64| Ok(*a.max(b))), None)
      .braces('[', ']')
      .arg_separator(';')
      .whitespace(['_'])
      .build();
    assert_eq!(grammar.parse_and_run("max[1;_2]+1", &VarTable::new()), Ok(3));
    let err = grammar.parse_and_run("max(1, 2)", &VarTable::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
  }

  #[test]
  fn test_grammar_is_shareable() {
    fn assert_send_sync<S: Send + Sync>() {}
    assert_send_sync::<Grammar<i64>>();
  }
}
