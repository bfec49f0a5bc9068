
//! A configurable operator-precedence expression engine.
//!
//! A [`Grammar`] describes the operators, functions, variables, and
//! lexical conventions of a small expression language. Input text is
//! tokenized against a grammar, reordered into postfix form by the
//! shunting yard algorithm, and evaluated against a stack, with every
//! operation guarded by a limiter.
//!
//! Two grammars ship with the crate: an arithmetic calculator
//! ([`calculator`]) and a propositional logic truth table builder
//! ([`logic`]).

pub mod calculator;
pub mod config;
pub mod error;
pub mod eval;
pub mod expression;
pub mod grammar;
pub mod logic;
pub mod number;
pub mod parsing;
pub mod var;

pub use error::{Error, ErrorKind};
pub use expression::{Expression, Phase};
pub use grammar::{Grammar, GrammarBuilder};
pub use var::VarTable;
