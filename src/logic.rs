
//! Propositional logic: a [`Grammar`] over `bool` with free
//! variables, and truth tables built from it.

use crate::config::Limits;
use crate::error::{ConversionError, Error};
use crate::grammar::Grammar;
use crate::parsing::operator::{Associativity, Precedence};
use crate::var::VarTable;

use itertools::Itertools;
use log::debug;

use std::fmt::{self, Display, Formatter};

/// The table's name for the result column.
pub const RESULT_COLUMN: &str = "F";

/// The hard ceiling on truth table width, independent of any
/// configured limit, since rows are enumerated with a `u64` counter.
const MAX_TABLE_VARS: usize = 63;

/// A complete truth table. Each row holds the values of the
/// variables, in the order of [`TruthTable::variables`], followed by
/// the value of the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
  variables: Vec<String>,
  rows: Vec<Vec<bool>>,
}

/// Constants are integers equal to 0 or 1, so leading zeros are
/// allowed.
fn parse_truth_value(lexeme: &str) -> Result<bool, ConversionError> {
  match lexeme.parse::<u32>() {
    Ok(0) => Ok(false),
    Ok(1) => Ok(true),
    _ => Err(ConversionError::new("Constant must be a logic value: 1 (true) or 0 (false)")),
  }
}

/// Builds the logic grammar.
///
/// `~` is negation. The binary connectives, by decreasing priority,
/// are `&` (and), `|` (or) and `^` (xor) at the same level, `>`
/// (implication), and `=` (equivalence). All of them associate to the
/// left. Any name is a variable.
pub fn logic_grammar() -> Grammar<bool> {
  Grammar::builder(parse_truth_value)
    .unary_operator('~', |a| Ok(!a), Precedence::new(20), None)
    .binary_operator('&', |a, b| Ok(*a && *b), Precedence::new(10), Associativity::LEFT, None)
    .binary_operator('|', |a, b| Ok(*a || *b), Precedence::new(5), Associativity::LEFT, None)
    .binary_operator('^', |a, b| Ok(a != b), Precedence::new(5), Associativity::LEFT, None)
    .binary_operator('>', |a, b| Ok(!*a || *b), Precedence::new(2), Associativity::LEFT, None)
    .binary_operator('=', |a, b| Ok(a == b), Precedence::new(1), Associativity::LEFT, None)
    .free_variables(true)
    .build()
}

/// Evaluates `text` under every assignment of its variables.
///
/// Variables are sorted by name. Rows enumerate assignments in
/// binary counting order, with the first variable as the most
/// significant bit. Fails with a calculation limit error if the
/// expression has more than `max_vars` distinct variables.
pub fn build_table(text: &str, grammar: &Grammar<bool>, max_vars: usize) -> Result<TruthTable, Error> {
  let expr = grammar.parse(text)?;
  let variables: Vec<String> = expr.variables().iter().cloned().collect();
  let n = variables.len();
  if n > max_vars || n > MAX_TABLE_VARS {
    return Err(Error::calculation_limit(format!("{} variables exceeds the limit of {}", n, max_vars)));
  }

  let mut rows = Vec::with_capacity(1 << n);
  for i in 0..(1u64 << n) {
    let assignment: Vec<bool> = (0..n).rev().map(|bit| (i & (1u64 << bit)) != 0).collect();
    let bindings: VarTable<bool> = variables.iter().cloned().zip(assignment.iter().copied()).collect();
    let mut row = assignment;
    row.push(expr.evaluate(&bindings)?);
    rows.push(row);
  }
  debug!("Built truth table with {} variables and {} rows", n, rows.len());
  Ok(TruthTable { variables, rows })
}

impl TruthTable {
  pub fn variables(&self) -> &[String] {
    &self.variables
  }

  pub fn rows(&self) -> &[Vec<bool>] {
    &self.rows
  }

  /// The value of the expression in each row.
  pub fn results(&self) -> impl Iterator<Item = bool> + '_ {
    self.rows.iter().filter_map(|row| row.last().copied())
  }
}

/// Renders the header line followed by one line per row, with
/// columns separated by two spaces and values written as `0` or `1`.
impl Display for TruthTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let header = self.variables.iter().map(String::as_str).chain([RESULT_COLUMN]);
    writeln!(f, "{}", header.format("  "))?;
    for row in &self.rows {
      writeln!(f, "{}", row.iter().map(|&b| u8::from(b)).format("  "))?;
    }
    Ok(())
  }
}

/// A logic calculator, bundling the grammar with the limits it
/// checks input against.
#[derive(Debug)]
pub struct LogicCalculator {
  grammar: Grammar<bool>,
  limits: Limits,
}

impl LogicCalculator {
  pub fn new(limits: Limits) -> Self {
    LogicCalculator { grammar: logic_grammar(), limits }
  }

  pub fn grammar(&self) -> &Grammar<bool> {
    &self.grammar
  }

  /// Builds the truth table of a line of input. Lines of
  /// `line_limit` characters or more are rejected before parsing.
  pub fn build_table(&self, text: &str) -> Result<TruthTable, Error> {
    let len = text.chars().count();
    if len >= self.limits.line_limit {
      return Err(Error::calculation_limit(format!("expression length {} exceeds the limit of {}", len, self.limits.line_limit)));
    }
    build_table(text, &self.grammar, self.limits.max_vars)
  }
}

impl Default for LogicCalculator {
  fn default() -> Self {
    LogicCalculator::new(Limits::default())
  }
}
