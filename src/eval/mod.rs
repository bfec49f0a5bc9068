
//! Evaluation of postfix expressions.

pub mod limiter;
pub mod operation;

use operation::Operation;
use crate::error::Error;
use crate::expression::{Expression, Phase};
use crate::parsing::token::TokenData;
use crate::var::VarTable;

use log::{trace, warn};

/// Evaluates a postfix expression against a stack of values.
///
/// Variables are looked up in `bindings` first and then in the
/// grammar's default variables. Every operator and function pops its
/// arity worth of operands, checks them against its limiter, and
/// pushes its result. The expression must leave exactly one value on
/// the stack.
///
/// Evaluation does not modify the expression, so the same postfix
/// expression can be evaluated any number of times with different
/// bindings.
pub fn evaluate<T: Clone>(expr: &Expression<'_, T>, bindings: &VarTable<T>) -> Result<T, Error> {
  if expr.phase() != Phase::Postfix {
    return Err(Error::Phase { expected: Phase::Postfix, actual: expr.phase() });
  }
  let defaults = expr.grammar().default_variables();

  let mut stack: Vec<T> = Vec::with_capacity(expr.len());
  for token in expr.tokens() {
    match token.data() {
      TokenData::Number(value) => {
        stack.push(value.clone());
      }
      TokenData::Variable(name) => {
        let value = bindings.get(name)
          .or_else(|| defaults.get(name))
          .ok_or_else(|| Error::invalid_name(name.as_str(), Some(token.span().start)))?;
        stack.push(value.clone());
      }
      TokenData::Operator(op) => {
        let symbol = op.symbol().to_string();
        let value = apply(&symbol, op.operation(), &mut stack)?;
        stack.push(value);
      }
      TokenData::Function(func) => {
        let value = apply(func.name(), func.operation(), &mut stack)?;
        stack.push(value);
      }
      TokenData::OpenBrace(c) | TokenData::CloseBrace(c) | TokenData::ArgSeparator(c) => {
        return Err(Error::invalid_syntax(format!("unexpected '{}' in postfix expression", c), Some(token.span().start)));
      }
    }
  }

  if stack.len() != 1 {
    return Err(Error::invalid_syntax("stack size != 1 after evaluation", None));
  }
  Ok(stack.remove(0))
}

/// Pops the operands of `operation` off the stack and applies it.
fn apply<T>(name: &str, operation: &Operation<T>, stack: &mut Vec<T>) -> Result<T, Error> {
  let arity = operation.arity();
  if stack.len() < arity {
    return Err(Error::InvalidArguments {
      name: name.to_owned(),
      expected: arity,
      actual: stack.len(),
    });
  }
  let args = stack.split_off(stack.len() - arity);
  if !operation.permits(&args) {
    warn!("Limiter rejected the arguments of '{}'", name);
    return Err(Error::calculation_limit(format!("arguments failed limitations check in {}", name)));
  }
  trace!("Applying '{}' to {} arguments", name, arity);
  Ok(operation.call(&args)?)
}
