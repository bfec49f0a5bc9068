
//! The arithmetic calculator: a [`Grammar`] over [`Number`] with the
//! usual operators and a library of elementary functions.

use crate::config::Limits;
use crate::error::{ConversionError, DomainError, Error};
use crate::eval::limiter::Limiter;
use crate::eval::operation::Native;
use crate::grammar::Grammar;
use crate::number::Number;
use crate::parsing::operator::{Associativity, Precedence};
use crate::var::VarTable;

use num::BigInt;
use log::debug;

use std::f64::consts;

/// A limiter comparing operand magnitudes against the given bounds.
fn magnitude_limiter(union_limit: &Option<BigInt>, each_limit: &Option<BigInt>) -> Limiter<Number> {
  Limiter::bounds_by(
    union_limit.clone().map(Number::from),
    each_limit.clone().map(Number::from),
    Number::abs,
  )
}

/// Lifts a float function into a [`Native`], rejecting non-finite
/// results.
fn float_fn<F>(name: &'static str, f: F) -> Native<Number>
where F: Fn(f64) -> f64 + Send + Sync + 'static {
  Native::unary(move |x: &Number| Number::try_float(f(x.to_f64()), name))
}

/// Like [`float_fn`], but only defined where `domain` holds.
fn partial_float_fn<D, F>(name: &'static str, domain: D, f: F) -> Native<Number>
where D: Fn(f64) -> bool + Send + Sync + 'static,
      F: Fn(f64) -> f64 + Send + Sync + 'static {
  Native::unary(move |x: &Number| {
    let x = x.to_f64();
    if !domain(x) {
      return Err(DomainError::OutOfDomain { function: name, argument: Number::from(x).to_string() });
    }
    Number::try_float(f(x), name)
  })
}

fn positive(x: f64) -> bool {
  x > 0.0
}

fn unit_interval(x: f64) -> bool {
  (-1.0..=1.0).contains(&x)
}

fn cot(x: &Number) -> Result<Number, DomainError> {
  let tan = x.to_f64().tan();
  if tan == 0.0 {
    return Err(DomainError::DivisionByZero);
  }
  Number::try_float(1.0 / tan, "cot")
}

/// `log(x, base)`.
fn log(x: &Number, base: &Number) -> Result<Number, DomainError> {
  let (x, base) = (x.to_f64(), base.to_f64());
  if !positive(x) || !positive(base) {
    return Err(DomainError::OutOfDomain { function: "log", argument: Number::from(x).to_string() });
  }
  if base == 1.0 {
    return Err(DomainError::DivisionByZero);
  }
  Number::try_float(x.ln() / base.ln(), "log")
}

fn parse_number(lexeme: &str) -> Result<Number, ConversionError> {
  lexeme.parse().map_err(|err| ConversionError::new(format!("{}", err)))
}

/// Builds the arithmetic grammar.
///
/// Operators, by decreasing priority: `^` (right-associative), prefix
/// `-` and `+`, then `* / : %`, then infix `+ -`. Free variables are
/// not allowed; `pi` and `e` are predefined.
pub fn arithmetic_grammar(limits: &Limits) -> Grammar<Number> {
  let pow_limiter = magnitude_limiter(&limits.pow_union_limit, &limits.pow_each_limit);
  let factorial_limiter = magnitude_limiter(&limits.factorial_limit, &None);
  let default_limiter = magnitude_limiter(&None, &limits.operand_limit);

  Grammar::builder(parse_number)
    .binary_operator('+', |a, b| (a + b).finite("+"), Precedence::new(1), Associativity::LEFT, None)
    .binary_operator('-', |a, b| (a - b).finite("-"), Precedence::new(1), Associativity::LEFT, None)
    .binary_operator('*', |a, b| (a * b).finite("*"), Precedence::new(2), Associativity::LEFT, None)
    .binary_operator('/', Number::checked_div, Precedence::new(2), Associativity::LEFT, None)
    .binary_operator(':', Number::div_floor, Precedence::new(2), Associativity::LEFT, None)
    .binary_operator('%', Number::mod_floor, Precedence::new(2), Associativity::LEFT, None)
    .unary_operator('-', |a| Ok(-a), Precedence::new(5), None)
    .unary_operator('+', |a| Ok(a.clone()), Precedence::new(5), None)
    .binary_operator('^', Number::checked_pow, Precedence::new(10), Associativity::RIGHT, Some(pow_limiter.clone()))
    // General
    .function("abs", Native::unary(|x: &Number| Ok(x.abs())), None)
    .function("round", Native::unary(Number::round), None)
    .function("pow", Native::binary(Number::checked_pow), Some(pow_limiter.clone()))
    .function("sqrt", partial_float_fn("sqrt", |x| x >= 0.0, f64::sqrt), None)
    .function("factorial", Native::unary(Number::factorial), Some(factorial_limiter))
    // Angles
    .function("deg", float_fn("deg", f64::to_degrees), None)
    .function("rad", float_fn("rad", f64::to_radians), None)
    // Trigonometry
    .function("sin", float_fn("sin", f64::sin), None)
    .function("cos", float_fn("cos", f64::cos), None)
    .function("tan", float_fn("tan", f64::tan), None)
    .function("tg", float_fn("tg", f64::tan), None)
    .function("cot", Native::unary(cot), None)
    .function("ctg", Native::unary(cot), None)
    .function("acos", partial_float_fn("acos", unit_interval, f64::acos), None)
    .function("arccos", partial_float_fn("arccos", unit_interval, f64::acos), None)
    .function("asin", partial_float_fn("asin", unit_interval, f64::asin), None)
    .function("arcsin", partial_float_fn("arcsin", unit_interval, f64::asin), None)
    .function("atan", float_fn("atan", f64::atan), None)
    .function("arctg", float_fn("arctg", f64::atan), None)
    // Exponents and logarithms
    .function("log", Native::binary(log), None)
    .function("lg", partial_float_fn("lg", positive, f64::log10), None)
    .function("ln", partial_float_fn("ln", positive, f64::ln), None)
    .function("log2", partial_float_fn("log2", positive, f64::log2), None)
    .function("exp", float_fn("exp", f64::exp), Some(pow_limiter))
    .default_variable("pi", Number::from(consts::PI))
    .default_variable("e", Number::from(consts::E))
    .default_limiter(default_limiter)
    .build()
}

/// An arithmetic calculator, bundling the grammar with the limits it
/// was built from.
#[derive(Debug)]
pub struct Calculator {
  grammar: Grammar<Number>,
  limits: Limits,
}

impl Calculator {
  pub fn new(limits: Limits) -> Self {
    Calculator {
      grammar: arithmetic_grammar(&limits),
      limits,
    }
  }

  pub fn grammar(&self) -> &Grammar<Number> {
    &self.grammar
  }

  pub fn limits(&self) -> &Limits {
    &self.limits
  }

  /// Evaluates a line of arithmetic. Lines of `line_limit`
  /// characters or more are rejected before parsing.
  pub fn calculate(&self, text: &str) -> Result<Number, Error> {
    let len = text.chars().count();
    if len >= self.limits.line_limit {
      return Err(Error::calculation_limit(format!("expression length {} exceeds the limit of {}", len, self.limits.line_limit)));
    }
    let result = self.grammar.parse_and_run(text, &VarTable::new())?;
    debug!("Calculated '{}' = {}", text, result);
    Ok(result)
  }
}

impl Default for Calculator {
  fn default() -> Self {
    Calculator::new(Limits::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  use approx::assert_abs_diff_eq;
  use proptest::prelude::*;

  fn calc(text: &str) -> Result<Number, Error> {
    Calculator::default().calculate(text)
  }

  fn int(i: i64) -> Number {
    Number::from(i)
  }

  #[test]
  fn test_operator_priorities() {
    assert_eq!(calc("1 + 2 * 3"), Ok(int(7)));
    assert_eq!(calc("(1 + 2) * 3"), Ok(int(9)));
    assert_eq!(calc("2^3^2"), Ok(int(512)));
    assert_eq!(calc("9-3-2"), Ok(int(4)));
    assert_eq!(calc("-2^2"), Ok(int(-4)));
    assert_eq!(calc("2^-1"), Ok(Number::from(0.5)));
  }

  #[test]
  fn test_prefix_operators() {
    assert_eq!(calc("-3+5"), Ok(int(2)));
    assert_eq!(calc("3- -5"), Ok(int(8)));
    assert_eq!(calc("3-(-5)"), Ok(int(8)));
    assert_eq!(calc("+4 * -1"), Ok(int(-4)));
    assert_eq!(calc("--5").unwrap_err().kind(), ErrorKind::InvalidSyntax);
  }

  #[test]
  fn test_division_family() {
    assert_eq!(calc("7 / 2"), Ok(Number::from(3.5)));
    assert_eq!(calc("7 : 2"), Ok(int(3)));
    assert_eq!(calc("-7 % 3"), Ok(int(2)));
    assert_eq!(calc("1 / 0"), Err(Error::Domain(DomainError::DivisionByZero)));
    assert_eq!(calc("1 : 0"), Err(Error::Domain(DomainError::DivisionByZero)));
  }

  #[test]
  fn test_functions() {
    assert_eq!(calc("abs(-3)"), Ok(int(3)));
    assert_eq!(calc("round(2.5) + round(3.5)"), Ok(int(6)));
    assert_eq!(calc("pow(2, 10)"), Ok(int(1024)));
    assert_eq!(calc("sqrt(16)"), Ok(Number::from(4.0)));
    assert_eq!(calc("factorial(5)"), Ok(int(120)));
    assert_abs_diff_eq!(calc("sin(pi / 2)").unwrap(), Number::from(1.0), epsilon = 1e-12);
    assert_abs_diff_eq!(calc("deg(pi)").unwrap(), Number::from(180.0), epsilon = 1e-9);
    assert_abs_diff_eq!(calc("ctg(rad(45))").unwrap(), Number::from(1.0), epsilon = 1e-9);
    assert_abs_diff_eq!(calc("log(8, 2)").unwrap(), Number::from(3.0), epsilon = 1e-12);
    assert_abs_diff_eq!(calc("lg(1000)").unwrap(), Number::from(3.0), epsilon = 1e-12);
    assert_abs_diff_eq!(calc("ln(e)").unwrap(), Number::from(1.0), epsilon = 1e-12);
    assert_abs_diff_eq!(calc("log2(8)").unwrap(), Number::from(3.0), epsilon = 1e-12);
    assert_abs_diff_eq!(calc("exp(1)").unwrap(), Number::from(consts::E), epsilon = 1e-12);
    assert_abs_diff_eq!(calc("arctg(1) * 4").unwrap(), Number::from(consts::PI), epsilon = 1e-12);
  }

  #[test]
  fn test_function_followed_by_brace_group() {
    let calculator = Calculator::default();
    assert_eq!(calculator.grammar().parse("pow(2)(3)").unwrap().to_string(), "2 3 pow");
    assert_eq!(calc("pow(2)(3)"), Ok(int(8)));
    assert_eq!(calc("pow(2) 3"), Ok(int(8)));
  }

  #[test]
  fn test_domain_errors() {
    assert!(matches!(calc("sqrt(-1)"), Err(Error::Domain(DomainError::OutOfDomain { function: "sqrt", .. }))));
    assert!(matches!(calc("acos(2)"), Err(Error::Domain(DomainError::OutOfDomain { .. }))));
    assert!(matches!(calc("ln(0)"), Err(Error::Domain(DomainError::OutOfDomain { .. }))));
    assert!(matches!(calc("factorial(2.5)"), Err(Error::Domain(DomainError::NonIntegral { .. }))));
    assert_eq!(calc("cot(0)"), Err(Error::Domain(DomainError::DivisionByZero)));
    assert_eq!(calc("log(8, 1)"), Err(Error::Domain(DomainError::DivisionByZero)));
  }

  #[test]
  fn test_limits() {
    assert_eq!(calc("factorial(10000)").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("2 ^ 100001").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("2000 ^ 2000").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("exp(-200000)").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert!(calc("2000 ^ 2").is_ok());
    assert_eq!(calc("10^90 + 1").unwrap_err().kind(), ErrorKind::CalculationLimit);
  }

  #[test]
  fn test_limits_compare_magnitudes() {
    // Negative operands are limited by their absolute value.
    assert_eq!(calc("exp(-1001)").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("2^-100001").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("factorial(-5000)").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("(0-10^80)^100000").unwrap_err().kind(), ErrorKind::CalculationLimit);
    assert_eq!(calc("exp(-1000)"), Ok(Number::from(0.0)));
    assert!(matches!(calc("factorial(-5)"), Err(Error::Domain(DomainError::OutOfDomain { function: "factorial", .. }))));
  }

  #[test]
  fn test_shared_across_threads() {
    fn assert_send_sync<S: Send + Sync>() {}
    assert_send_sync::<Grammar<Number>>();
    assert_send_sync::<Calculator>();

    let calculator = Calculator::default();
    std::thread::scope(|s| {
      for i in 0..8 {
        let calculator = &calculator;
        s.spawn(move || {
          assert_eq!(calculator.calculate(&format!("{} * 2 + pow(2)(3)", i)), Ok(int(i * 2 + 8)));
          assert_eq!(calculator.calculate("1 / 0").unwrap_err().kind(), ErrorKind::Domain);
        });
      }
    });
  }

  #[test]
  fn test_line_limit() {
    let limits = Limits { line_limit: 5, ..Limits::default() };
    let calculator = Calculator::new(limits);
    assert_eq!(calculator.calculate("1+2+3"), Err(Error::calculation_limit("expression length 5 exceeds the limit of 5")));
    assert_eq!(calculator.calculate("1+2+"), Err(Error::InvalidArguments { name: String::from("+"), expected: 2, actual: 1 }));
  }

  #[test]
  fn test_no_free_variables() {
    assert_eq!(calc("x+1").unwrap_err().kind(), ErrorKind::InvalidName);
    assert_abs_diff_eq!(calc("2 * pi").unwrap(), Number::from(consts::TAU));
  }

  #[test]
  fn test_syntax_errors() {
    assert_eq!(calc("(1+2").unwrap_err().kind(), ErrorKind::InvalidSyntax);
    assert_eq!(calc("1+2)").unwrap_err().kind(), ErrorKind::InvalidSyntax);
    assert_eq!(calc("").unwrap_err().kind(), ErrorKind::InvalidSyntax);
    assert_eq!(calc("1.2.3").unwrap_err().kind(), ErrorKind::Conversion);
  }

  /// A fully parenthesized expression tree, together with its value.
  #[derive(Debug, Clone)]
  enum Tree {
    Leaf(i64),
    Add(Box<Tree>, Box<Tree>),
    Sub(Box<Tree>, Box<Tree>),
    Mul(Box<Tree>, Box<Tree>),
    Neg(Box<Tree>),
  }

  impl Tree {
    fn render(&self) -> String {
      match self {
        Tree::Leaf(n) => n.to_string(),
        Tree::Add(a, b) => format!("({} + {})", a.render(), b.render()),
        Tree::Sub(a, b) => format!("({} - {})", a.render(), b.render()),
        Tree::Mul(a, b) => format!("({} * {})", a.render(), b.render()),
        Tree::Neg(a) => format!("(-{})", a.render()),
      }
    }

    fn value(&self) -> BigInt {
      match self {
        Tree::Leaf(n) => BigInt::from(*n),
        Tree::Add(a, b) => a.value() + b.value(),
        Tree::Sub(a, b) => a.value() - b.value(),
        Tree::Mul(a, b) => a.value() * b.value(),
        Tree::Neg(a) => -a.value(),
      }
    }
  }

  fn tree() -> impl Strategy<Value = Tree> {
    (0i64..1000).prop_map(Tree::Leaf).prop_recursive(4, 32, 2, |inner| {
      prop_oneof![
        (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Add(Box::new(a), Box::new(b))),
        (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Sub(Box::new(a), Box::new(b))),
        (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Mul(Box::new(a), Box::new(b))),
        inner.prop_map(|a| Tree::Neg(Box::new(a))),
      ]
    })
  }

  proptest! {
    #[test]
    fn test_matches_reference_evaluator(tree in tree()) {
      let calculator = Calculator::default();
      let result = calculator.calculate(&tree.render()).unwrap();
      prop_assert_eq!(result, Number::from(tree.value()));
    }
  }
}
