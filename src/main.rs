
//! Interactive calculator. Reads one expression per line from
//! standard input. Lines of the form `logic <expr>` produce a truth table;
//! anything else is evaluated as arithmetic.

use calcyard::calculator::Calculator;
use calcyard::config::Limits;
use calcyard::error::Error;
use calcyard::logic::LogicCalculator;

use anyhow::Context;

use std::io::{self, BufRead, Write};

const LOGIC_PREFIX: &str = "logic";

fn report(err: &Error) {
  println!("{} ({})", err.user_message(), err);
}

fn main() -> anyhow::Result<()> {
  let limits = Limits::from_env().context("invalid calculation limits in environment")?;
  let calculator = Calculator::new(limits.clone());
  let logic = LogicCalculator::new(limits);

  let stdin = io::stdin();
  let mut stdout = io::stdout();
  for line in stdin.lock().lines() {
    let line = line.context("failed to read from stdin")?;
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    if let Some((LOGIC_PREFIX, expr)) = line.split_once(char::is_whitespace) {
      match logic.build_table(expr.trim()) {
        Ok(table) => print!("{}", table),
        Err(err) => report(&err),
      }
    } else {
      match calculator.calculate(line) {
        Ok(value) => println!("{}", value),
        Err(err) => report(&err),
      }
    }
    stdout.flush().context("failed to write to stdout")?;
  }
  Ok(())
}
