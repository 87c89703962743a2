use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Program structure.
    Class,
    Method,
    Function,
    Constructor,
    // Types.
    Int,
    Boolean,
    Char,
    Void,
    // Declarations.
    Var,
    Static,
    Field,
    // Statements.
    Let,
    Do,
    If,
    Else,
    While,
    Return,
    // Constants.
    True,
    False,
    Null,
    This,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = Keyword::ALL
        .iter()
        .map(|keyword| (keyword.as_str(), *keyword))
        .collect();
}

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Keyword::Class,
        Keyword::Method,
        Keyword::Function,
        Keyword::Constructor,
        Keyword::Int,
        Keyword::Boolean,
        Keyword::Char,
        Keyword::Void,
        Keyword::Var,
        Keyword::Static,
        Keyword::Field,
        Keyword::Let,
        Keyword::Do,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Return,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
            Self::Function => "function",
            Self::Constructor => "constructor",
            Self::Int => "int",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Void => "void",
            Self::Var => "var",
            Self::Static => "static",
            Self::Field => "field",
            Self::Let => "let",
            Self::Do => "do",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Return => "return",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::This => "this",
        }
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEYWORDS.get(s).copied().ok_or(())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

/// Binary operators. Expressions chain these left to right with no precedence.
pub const OPS: &str = "+-*/&|<>=";

pub const UNARY_OPS: &str = "-~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(Keyword),
    Symbol(char),
    IntegerConstant(u16),
    /// Contents between the quotes.
    StringConstant(String),
    Identifier(String),
}

impl Token {
    /// Element name used when the token is serialized.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Symbol(_) => "symbol",
            Self::IntegerConstant(_) => "integerConstant",
            Self::StringConstant(_) => "stringConstant",
            Self::Identifier(_) => "identifier",
        }
    }

    /// Source text of the token, without the quotes of a string constant.
    pub fn lexeme(&self) -> String {
        match self {
            Self::Keyword(keyword) => keyword.as_str().to_owned(),
            Self::Symbol(symbol) => symbol.to_string(),
            Self::IntegerConstant(value) => value.to_string(),
            Self::StringConstant(text) | Self::Identifier(text) => text.clone(),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(k) if *k == keyword)
    }

    pub fn is_symbol(&self, symbol: char) -> bool {
        matches!(self, Self::Symbol(s) if *s == symbol)
    }

    pub fn is_op(&self) -> bool {
        matches!(self, Self::Symbol(s) if OPS.contains(*s))
    }

    pub fn is_unary_op(&self) -> bool {
        matches!(self, Self::Symbol(s) if UNARY_OPS.contains(*s))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringConstant(text) => write!(f, "{} \"{}\"", self.tag(), text),
            _ => write!(f, "{} '{}'", self.tag(), self.lexeme()),
        }
    }
}
