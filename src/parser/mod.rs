//! VEX Parser Module
//!
//! Tokenization and parsing of VEX files.

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use parser::parse_str;
