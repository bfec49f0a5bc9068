
//! Tokenizing and reordering of expressions.

pub mod operator;
pub mod shunting_yard;
pub mod source;
pub mod token;
pub mod tokenizer;
