
//! Conversion of tokenized expressions from infix to postfix order.

use super::operator::Operator;
use super::source::SourceOffset;
use super::token::{Token, TokenData};
use crate::error::Error;
use crate::expression::{Expression, Phase};

use log::debug;

/// An entry on the operator stack. Each refers to a token by its
/// index in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
  Operator(usize),
  Function(usize),
  OpenBrace(usize),
}

/// Reorders the tokens of `expr` into postfix order, discarding
/// braces and argument separators.
///
/// Operators are popped to the output while the operator on top of
/// the stack binds at least as tightly as the incoming one (see
/// [`should_pop`]). A function stays on the stack until an operator,
/// a separator, a close brace, or the end of input pops it.
///
/// Fails with [`Error::Phase`] if `expr` is already in postfix form.
/// On failure, the expression is left exactly as it was.
pub fn shunt<T>(expr: &mut Expression<'_, T>) -> Result<(), Error> {
  if expr.phase() != Phase::Parsed {
    return Err(Error::Phase { expected: Phase::Parsed, actual: expr.phase() });
  }
  let order = postfix_order(expr.tokens())?;
  expr.reorder_postfix(&order);
  debug!("Shunted expression to {} postfix tokens", order.len());
  Ok(())
}

/// Computes the postfix order of `tokens` as a sequence of indices
/// into the slice.
fn postfix_order<T>(tokens: &[Token<T>]) -> Result<Vec<usize>, Error> {
  let mut output: Vec<usize> = Vec::with_capacity(tokens.len());
  let mut stack: Vec<StackEntry> = Vec::new();

  for (index, token) in tokens.iter().enumerate() {
    match token.data() {
      TokenData::Number(_) | TokenData::Variable(_) => {
        output.push(index);
      }
      TokenData::Function(_) => {
        stack.push(StackEntry::Function(index));
      }
      TokenData::ArgSeparator(_) => {
        pop_until_brace(&mut stack, &mut output)
          .ok_or_else(|| syntax_error("missing argument separator or left brace", token.span().start))?;
      }
      TokenData::Operator(current) => {
        while let Some(&top) = stack.last() {
          let pop = match top {
            StackEntry::Function(_) => true,
            StackEntry::Operator(i) => should_pop(operator_at(tokens, i), current),
            StackEntry::OpenBrace(_) => false,
          };
          if !pop {
            break;
          }
          stack.pop();
          output.push(entry_index(top));
        }
        stack.push(StackEntry::Operator(index));
      }
      TokenData::OpenBrace(_) => {
        stack.push(StackEntry::OpenBrace(index));
      }
      TokenData::CloseBrace(_) => {
        pop_until_brace(&mut stack, &mut output)
          .ok_or_else(|| syntax_error("missing left brace", token.span().start))?;
        stack.pop();
      }
    }
  }

  while let Some(top) = stack.pop() {
    if let StackEntry::OpenBrace(i) = top {
      return Err(syntax_error("missing right brace", tokens[i].span().start));
    }
    output.push(entry_index(top));
  }
  Ok(output)
}

/// Whether the operator on top of the stack should be emitted before
/// `current` is pushed.
///
/// A higher-priority operator is popped, unless `current` is a prefix
/// operator, which cannot take an already-complete operand on its
/// left. At equal priority, left-associative operators pop and
/// right-associative ones stack up.
fn should_pop<T>(stack_op: &Operator<T>, current_op: &Operator<T>) -> bool {
  (stack_op.precedence() > current_op.precedence() && !current_op.is_unary()) ||
    (stack_op.precedence() == current_op.precedence() && current_op.associativity().is_left_assoc())
}

/// Pops operators and functions to the output until an open brace is
/// on top of the stack. The brace itself stays on the stack. Returns
/// `None` if the stack runs out first.
fn pop_until_brace(stack: &mut Vec<StackEntry>, output: &mut Vec<usize>) -> Option<()> {
  loop {
    match stack.last()? {
      StackEntry::OpenBrace(_) => return Some(()),
      &top => {
        stack.pop();
        output.push(entry_index(top));
      }
    }
  }
}

fn operator_at<T>(tokens: &[Token<T>], index: usize) -> &Operator<T> {
  match tokens[index].data() {
    TokenData::Operator(op) => op,
    _ => unreachable!("operator stack entry {} is not an operator", index),
  }
}

fn entry_index(entry: StackEntry) -> usize {
  match entry {
    StackEntry::Operator(i) | StackEntry::Function(i) | StackEntry::OpenBrace(i) => i,
  }
}

fn syntax_error(message: &str, position: SourceOffset) -> Error {
  Error::invalid_syntax(message, Some(position))
}
