use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::token::Keyword;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("[line {line}] Unexpected end of input")]
    UnexpectedEof { line: u32 },
    #[error("[line {line}] Unexpected token: {fragment}")]
    UnexpectedToken { fragment: String, line: u32 },
    #[error("[line {line}] Integer constant out of range: {digits}")]
    IntegerOutOfRange { digits: String, line: u32 },
}

/// The construct a production required but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Keyword(Keyword),
    Symbol(char),
    Identifier,
    /// `int`, `char`, `boolean` or a class name.
    Type,
    /// `void` or a type.
    ReturnType,
    Term,
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "keyword '{}'", keyword),
            Self::Symbol(symbol) => write!(f, "symbol '{}'", symbol),
            Self::Identifier => f.write_str("identifier"),
            Self::Type => f.write_str("type"),
            Self::ReturnType => f.write_str("'void' or type"),
            Self::Term => f.write_str("term"),
            Self::EndOfInput => f.write_str("end of input"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("[line {line}] expected {expected}, found {}", .found.as_deref().unwrap_or("end of input"))]
pub struct SyntaxError {
    pub expected: Expected,
    pub found: Option<String>,
    pub line: u32,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("[line {line}] nesting too deep (limit {})", crate::parser::MAX_NESTING)]
    NestingTooDeep { line: u32 },
}

#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("{}: not a .jack file or directory", .0.display())]
    InvalidPath(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },
}
