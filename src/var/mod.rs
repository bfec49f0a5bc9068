
//! Variable bindings.

pub mod table;

pub use table::VarTable;
