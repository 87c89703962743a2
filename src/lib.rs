//! Syntax analyzer for the Jack teaching language.
//!
//! Source text goes through the [`lexer`] and the recursive-descent [`parser`],
//! which serializes the parse tree as nested tags. The [`analyzer`] module is
//! the thin file-handling layer used by the command line tool.

pub mod analyzer;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod xml;

pub use error::{AnalyzeError, CompileError, Expected, LexError, SyntaxError};
pub use lexer::{tokenize, Lexer};
pub use parser::Parser;
pub use token::{Keyword, Token};

/// Parses one compilation unit into its serialized tree.
pub fn parse(source: &str) -> Result<String, CompileError> {
    Parser::new(source)?.parse_class()
}
