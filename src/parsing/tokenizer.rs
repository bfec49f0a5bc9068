
//! Grammar-driven tokenizer.

use super::source::{SourceOffset, Span};
use super::token::{Token, TokenData};
use crate::error::Error;
use crate::expression::Expression;
use crate::grammar::Grammar;

use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

/// A name starts with a letter and continues with letters and digits.
static NAME_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^\p{Alphabetic}[\p{Alphabetic}\p{N}]*").unwrap());

/// A numeric lexeme is a digit followed by digits and decimal points.
/// Whether the lexeme is well-formed is up to the grammar's converter.
static NUMBER_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[0-9][0-9.]*").unwrap());

/// Cursor over the input string. Positions are counted in
/// characters.
#[derive(Debug, Clone)]
pub struct TokenizerState<'a> {
  input: &'a str,
  position: SourceOffset,
}

#[derive(Debug, Clone)]
pub struct TokenizerMatch<'a> {
  matched_str: &'a str,
  start: SourceOffset,
  end: SourceOffset,
}

/// What the tokenizer will accept at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArityState {
  /// The start of an operand: a prefix operator, a number, a name,
  /// or an open brace.
  ExpectUnary,
  /// An operand just ended, so an infix operator may follow.
  ExpectBinary,
  /// A prefix operator was just read. Its operand must follow
  /// directly, with no other operator in between.
  ExpectOperand,
}

impl<'a> TokenizerState<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      position: SourceOffset(0),
    }
  }

  pub fn is_eof(&self) -> bool {
    self.input.is_empty()
  }

  pub fn peek(&self) -> Option<char> {
    self.input.chars().next()
  }

  pub fn current_pos(&self) -> SourceOffset {
    self.position
  }

  /// Advances past `byte_len` bytes of input, which must lie on a
  /// character boundary.
  fn advance(&mut self, byte_len: usize) -> TokenizerMatch<'a> {
    let byte_len = byte_len.min(self.input.len());
    let (prefix, suffix) = self.input.split_at(byte_len);
    let start = self.position;
    self.position += prefix.chars().count();
    self.input = suffix;
    TokenizerMatch {
      matched_str: prefix,
      start,
      end: self.position,
    }
  }

  /// Consumes a single character.
  pub fn read_char(&mut self) -> Option<(char, Span)> {
    let c = self.peek()?;
    let m = self.advance(c.len_utf8());
    Some((c, m.span()))
  }

  /// If the current position of the string matches the given regex,
  /// returns the matched string and advances the tokenizer state. If
  /// not, returns `None`.
  ///
  /// The regex MUST be anchored at the start of the input. This
  /// function may panic if that precondition is not satisfied.
  pub fn read_regex(&mut self, regex: &Regex) -> Option<TokenizerMatch<'a>> {
    let m = regex.find(self.input)?;
    assert_eq!(m.start(), 0, "Regex must be anchored at the start of the input");
    Some(self.advance(m.len()))
  }
}

impl<'a> TokenizerMatch<'a> {
  pub fn as_str(&self) -> &'a str {
    self.matched_str
  }
  pub fn start(&self) -> SourceOffset {
    self.start
  }
  pub fn end(&self) -> SourceOffset {
    self.end
  }
  pub fn span(&self) -> Span {
    Span::new(self.start, self.end)
  }
}

/// Splits `text` into tokens according to `grammar`.
///
/// A glyph registered as both a prefix and an infix operator (such as
/// `-`) is resolved by position: it is a prefix operator wherever an
/// operand may start and an infix operator directly after an operand.
/// A prefix operator must be followed by its operand, so `--1` is
/// rejected.
///
/// Names which are not functions become variable references, provided
/// the grammar allows free variables or the name is one of its
/// default variables. Undefined variables are only detected at
/// evaluation time.
pub fn tokenize<'g, T>(text: &str, grammar: &'g Grammar<T>) -> Result<Expression<'g, T>, Error> {
  if text.is_empty() {
    return Err(Error::invalid_syntax("String is empty, nothing to parse", None));
  }

  let mut state = TokenizerState::new(text);
  let mut arity = ArityState::ExpectUnary;
  let mut expr = Expression::new(grammar);

  while let Some(c) = state.peek() {
    let start = state.current_pos();
    if grammar.is_whitespace(c) {
      state.read_char();
    } else if let Some(op) = grammar.unary_operators().get(c).filter(|_| arity == ArityState::ExpectUnary) {
      let op = op.clone();
      let span = Span::single(start);
      state.read_char();
      expr.push(Token::operator(op, span));
      arity = ArityState::ExpectOperand;
    } else if let Some(op) = grammar.binary_operators().get(c).filter(|_| arity == ArityState::ExpectBinary) {
      let op = op.clone();
      let span = Span::single(start);
      state.read_char();
      expr.push(Token::operator(op, span));
      arity = ArityState::ExpectUnary;
    } else if let Some(m) = state.read_regex(&NAME_RE) {
      let name = m.as_str();
      if let Some(func) = grammar.functions().get(name) {
        expr.push(Token::function(func.clone(), m.span()));
        arity = ArityState::ExpectUnary;
      } else if grammar.allows_free_variables() || grammar.default_variables().contains_key(name) {
        expr.push(Token::variable(name, m.span()));
        arity = ArityState::ExpectBinary;
      } else {
        return Err(Error::invalid_name(name, Some(m.start())));
      }
    } else if let Some(m) = state.read_regex(&NUMBER_RE) {
      let value = grammar.convert(m.as_str()).map_err(|source| {
        Error::Conversion { lexeme: m.as_str().to_owned(), position: m.start(), source }
      })?;
      expr.push(Token::number(value, m.span()));
      arity = ArityState::ExpectBinary;
    } else if c == grammar.arg_separator() {
      state.read_char();
      expr.push(Token::new(TokenData::ArgSeparator(c), Span::single(start)));
      arity = ArityState::ExpectUnary;
    } else if c == grammar.open_brace() {
      state.read_char();
      expr.push(Token::new(TokenData::OpenBrace(c), Span::single(start)));
      arity = ArityState::ExpectUnary;
    } else if c == grammar.close_brace() {
      state.read_char();
      expr.push(Token::new(TokenData::CloseBrace(c), Span::single(start)));
      arity = ArityState::ExpectBinary;
    } else {
      return Err(Error::invalid_syntax(format!("Invalid character '{}'", c), Some(start)));
    }
  }

  debug!("Tokenized {} tokens with {} variables", expr.len(), expr.variables().len());
  Ok(expr)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::{ConversionError, ErrorKind};
  use crate::eval::operation::Native;
  use crate::parsing::operator::{Associativity, Fixity, Precedence};

  fn grammar(free_variables: bool) -> Grammar<i64> {
    Grammar::builder(|s: &str| s.parse::<i64>().map_err(|e| ConversionError::new(e.to_string())))
      .unary_operator('-', |a| Ok(-a), Precedence::new(5), None)
      .binary_operator('-', |a, b| Ok(a - b), Precedence::new(1), Associativity::LEFT, None)
      .binary_operator('+', |a, b| Ok(a + b), Precedence::new(1), Associativity::LEFT, None)
      .function("neg", Native::unary(|a: &i64| Ok(-a)), None)
      .default_variable("k", 7)
      .free_variables(free_variables)
      .build()
  }

  /// Summarizes a token stream as one string per token, marking
  /// prefix operators with a `u` and infix ones with a `b`.
  fn describe(expr: &Expression<'_, i64>) -> Vec<String> {
    expr.tokens().iter().map(|t| match t.data() {
      TokenData::Number(n) => format!("num {}", n),
      TokenData::Variable(v) => format!("var {}", v),
      TokenData::Operator(op) if op.fixity() == Fixity::Prefix => format!("u{}", op.symbol()),
      TokenData::Operator(op) => format!("b{}", op.symbol()),
      TokenData::Function(f) => format!("fn {}", f.name()),
      TokenData::OpenBrace(_) => String::from("("),
      TokenData::CloseBrace(_) => String::from(")"),
      TokenData::ArgSeparator(_) => String::from(","),
    }).collect()
  }

  #[test]
  fn test_state_positions() {
    let mut state = TokenizerState::new("ab 12");
    assert_eq!(state.read_char(), Some(('a', Span::new(SourceOffset(0), SourceOffset(1)))));
    let m = state.read_regex(&NAME_RE).unwrap();
    assert_eq!(m.as_str(), "b");
    assert_eq!(m.start(), SourceOffset(1));
    assert_eq!(m.end(), SourceOffset(2));
    assert!(state.read_regex(&NUMBER_RE).is_none());
    assert_eq!(state.current_pos(), SourceOffset(2));
    state.read_char();
    let m = state.read_regex(&NUMBER_RE).unwrap();
    assert_eq!(m.as_str(), "12");
    assert!(state.is_eof());
    assert_eq!(state.peek(), None);
    assert_eq!(state.read_char(), None);
  }

  #[test]
  fn test_state_counts_characters() {
    let mut state = TokenizerState::new("λx");
    let m = state.read_regex(&NAME_RE).unwrap();
    assert_eq!(m.as_str(), "λx");
    assert_eq!(m.span(), Span::new(SourceOffset(0), SourceOffset(2)));
  }

  #[test]
  fn test_empty_input() {
    let grammar = grammar(false);
    let err = tokenize("", &grammar).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
  }

  #[test]
  fn test_unary_binary_disambiguation() {
    let grammar = grammar(false);
    let expr = tokenize("-3 - -5", &grammar).unwrap();
    assert_eq!(describe(&expr), vec!["u-", "num 3", "b-", "u-", "num 5"]);
  }

  #[test]
  fn test_minus_after_brace() {
    let grammar = grammar(false);
    let expr = tokenize("(1)-(-2)", &grammar).unwrap();
    assert_eq!(describe(&expr), vec!["(", "num 1", ")", "b-", "(", "u-", "num 2", ")"]);
  }

  #[test]
  fn test_double_prefix_rejected() {
    let grammar = grammar(false);
    let err = tokenize("--5", &grammar).unwrap_err();
    assert_eq!(err, Error::invalid_syntax("Invalid character '-'", Some(SourceOffset(1))));
  }

  #[test]
  fn test_binary_only_operator_in_prefix_position() {
    let grammar = grammar(false);
    let err = tokenize("+5", &grammar).unwrap_err();
    assert_eq!(err, Error::invalid_syntax("Invalid character '+'", Some(SourceOffset(0))));
  }

  #[test]
  fn test_functions_and_separators() {
    let grammar = grammar(false);
    let expr = tokenize("neg(k, 2)", &grammar).unwrap();
    assert_eq!(describe(&expr), vec!["fn neg", "(", "var k", ",", "num 2", ")"]);
    assert_eq!(expr.variables().iter().collect::<Vec<_>>(), vec!["k"]);
  }

  #[test]
  fn test_unknown_name_when_variables_forbidden() {
    let grammar = grammar(false);
    let err = tokenize("k + xy1", &grammar).unwrap_err();
    assert_eq!(err, Error::invalid_name("xy1", Some(SourceOffset(4))));
  }

  #[test]
  fn test_free_variables() {
    let grammar = grammar(true);
    let expr = tokenize("b + a1 - b", &grammar).unwrap();
    assert_eq!(describe(&expr), vec!["var b", "b+", "var a1", "b-", "var b"]);
    assert_eq!(expr.variables().iter().collect::<Vec<_>>(), vec!["a1", "b"]);
  }

  #[test]
  fn test_invalid_character_position() {
    let grammar = grammar(false);
    let err = tokenize("12 + $", &grammar).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
    assert_eq!(err.position(), Some(SourceOffset(5)));
  }

  #[test]
  fn test_conversion_failure() {
    let grammar = grammar(false);
    let err = tokenize("1 + 2.5", &grammar).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(err.position(), Some(SourceOffset(4)));
  }

  #[test]
  fn test_whitespace_only() {
    let grammar = grammar(false);
    let expr = tokenize(" \t\n", &grammar).unwrap();
    assert!(expr.is_empty());
  }
}
