//! Input parsing and validation

pub mod parser;

pub use parser::RequestParser;
