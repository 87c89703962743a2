use lazy_static::lazy_static;
use regex::Regex;

use crate::error::LexError;
use crate::token::{Keyword, Token, SYMBOLS};

// Every pattern is anchored: it must match at the cursor or not at all.
lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"^\s+").unwrap();
    static ref COMMENT: Regex = Regex::new(r"^(?://[^\n]*|/\*(?s:.*?)\*/)").unwrap();
    static ref KEYWORD: Regex = Regex::new(&format!(
        r"^(?:{})\b",
        Keyword::ALL
            .iter()
            .map(Keyword::as_str)
            .collect::<Vec<_>>()
            .join("|")
    ))
    .unwrap();
    static ref SYMBOL: Regex = Regex::new(&format!("^[{}]", regex::escape(SYMBOLS))).unwrap();
    static ref INTEGER: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref STRING: Regex = Regex::new(r#"^"[^"\n]*""#).unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// Splits Jack source into tokens, one at a time.
///
/// Whitespace and comments are skipped eagerly, both on construction and after
/// each token, so the cursor always rests on the start of the next token or at
/// the end of the source.
pub struct Lexer<'src> {
    source: &'src str,
    current: usize,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Self {
            source,
            current: 0,
            line: 1,
        };
        lexer.skip_trivia();
        lexer
    }

    pub fn has_more_tokens(&self) -> bool {
        self.current < self.source.len()
    }

    /// Line of the next unconsumed token.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Classifies and consumes the next token.
    ///
    /// Keywords are tried first since an identifier pattern would also accept
    /// them. After an error the lexer is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        if !self.has_more_tokens() {
            return Err(LexError::UnexpectedEof { line });
        }

        let rest = self.rest();

        if let Some(m) = KEYWORD.find(rest) {
            if let Ok(keyword) = m.as_str().parse::<Keyword>() {
                return Ok(self.emit(m.end(), Token::Keyword(keyword)));
            }
        }

        if let Some(m) = SYMBOL.find(rest) {
            if let Some(symbol) = m.as_str().chars().next() {
                return Ok(self.emit(m.end(), Token::Symbol(symbol)));
            }
        }

        if let Some(m) = INTEGER.find(rest) {
            return match m.as_str().parse::<u16>() {
                Ok(value) => Ok(self.emit(m.end(), Token::IntegerConstant(value))),
                Err(_) => Err(self.fail(LexError::IntegerOutOfRange {
                    digits: m.as_str().to_owned(),
                    line,
                })),
            };
        }

        if let Some(m) = STRING.find(rest) {
            let text = &m.as_str()[1..m.len() - 1];
            return Ok(self.emit(m.end(), Token::StringConstant(text.to_owned())));
        }

        if let Some(m) = IDENTIFIER.find(rest) {
            return Ok(self.emit(m.end(), Token::Identifier(m.as_str().to_owned())));
        }

        let fragment = rest.split_whitespace().next().unwrap_or(rest);
        Err(self.fail(LexError::UnexpectedToken {
            fragment: fragment.to_owned(),
            line,
        }))
    }

    fn rest(&self) -> &'src str {
        &self.source[self.current..]
    }

    fn consume(&mut self, len: usize) {
        let end = self.current + len;
        self.line += self.source[self.current..end].matches('\n').count() as u32;
        self.current = end;
    }

    fn emit(&mut self, len: usize, token: Token) -> Token {
        self.consume(len);
        self.skip_trivia();
        token
    }

    fn fail(&mut self, err: LexError) -> LexError {
        self.current = self.source.len();
        err
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            match WHITESPACE.find(rest).or_else(|| COMMENT.find(rest)) {
                Some(m) => self.consume(m.end()),
                None => break,
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_more_tokens() {
            Some(self.next_token())
        } else {
            None
        }
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_owned())
    }

    #[test]
    fn let_statement() {
        assert_eq!(
            tokenize("let x = 5;").unwrap(),
            vec![
                Token::Keyword(Keyword::Let),
                ident("x"),
                Token::Symbol('='),
                Token::IntegerConstant(5),
                Token::Symbol(';'),
            ]
        );
    }

    #[test]
    fn line_comment_is_elided() {
        assert_eq!(
            tokenize("// comment\nlet").unwrap(),
            vec![Token::Keyword(Keyword::Let)]
        );
    }

    #[test]
    fn doc_comment_is_elided() {
        assert_eq!(tokenize("/** a\nb */x").unwrap(), vec![ident("x")]);
    }

    #[test]
    fn block_comment_ends_at_first_terminator() {
        assert_eq!(
            tokenize("/* a */ x /* b */").unwrap(),
            vec![ident("x")]
        );
    }

    #[test]
    fn interleaved_trivia_is_fully_consumed() {
        let source = "  // one\n\t/* two */\n  /** three\n */ // four\n\n   do";
        let mut lexer = Lexer::new(source);
        assert!(lexer.has_more_tokens());
        assert_eq!(lexer.next_token().unwrap(), Token::Keyword(Keyword::Do));
        assert!(!lexer.has_more_tokens());
    }

    #[test]
    fn only_trivia_has_no_tokens() {
        let lexer = Lexer::new("  \n// nothing here\n/* or here */\n");
        assert!(!lexer.has_more_tokens());
        assert!(tokenize("").unwrap().is_empty());
    }

    #[rstest]
    #[case("intX", ident("intX"))]
    #[case("int", Token::Keyword(Keyword::Int))]
    #[case("do_it", ident("do_it"))]
    #[case("classy", ident("classy"))]
    #[case("_this", ident("_this"))]
    #[case("this", Token::Keyword(Keyword::This))]
    #[case("x1", ident("x1"))]
    #[case("\"hello world\"", Token::StringConstant("hello world".into()))]
    #[case("\"\"", Token::StringConstant(String::new()))]
    #[case("32767", Token::IntegerConstant(32767))]
    #[case("~", Token::Symbol('~'))]
    fn classifies_single_token(#[case] source: &str, #[case] expected: Token) {
        assert_eq!(tokenize(source).unwrap(), vec![expected]);
    }

    #[test]
    fn keyword_directly_followed_by_symbol() {
        assert_eq!(
            tokenize("return;").unwrap(),
            vec![Token::Keyword(Keyword::Return), Token::Symbol(';')]
        );
    }

    #[test]
    fn every_symbol() {
        let tokens = tokenize("{ } ( ) [ ] . , ; + - * / & | < > = ~").unwrap();
        let symbols: String = tokens
            .iter()
            .map(|token| match token {
                Token::Symbol(symbol) => *symbol,
                other => panic!("not a symbol: {other:?}"),
            })
            .collect();
        assert_eq!(symbols, SYMBOLS);
    }

    #[test]
    fn digits_then_letters_split() {
        assert_eq!(
            tokenize("12ab").unwrap(),
            vec![Token::IntegerConstant(12), ident("ab")]
        );
    }

    #[test]
    fn unterminated_block_comment_is_a_slash() {
        assert_eq!(
            tokenize("/* x").unwrap(),
            vec![Token::Symbol('/'), Token::Symbol('*'), ident("x")]
        );
    }

    #[test]
    fn unknown_character_reports_fragment() {
        let err = tokenize("let x = #abc def").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedToken {
                fragment: "#abc".into(),
                line: 1
            }
        );
    }

    #[test]
    fn string_may_not_span_lines() {
        let err = tokenize("\"abc\ndef\"").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedToken { .. }));
    }

    #[test]
    fn integer_overflow() {
        let err = tokenize("let x = 70000;").unwrap_err();
        assert_eq!(
            err,
            LexError::IntegerOutOfRange {
                digits: "70000".into(),
                line: 1
            }
        );
    }

    #[test]
    fn scanning_stops_after_error() {
        let mut lexer = Lexer::new("x $ y");
        assert_eq!(lexer.next().unwrap().unwrap(), ident("x"));
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn next_token_at_end() {
        let mut lexer = Lexer::new("  ");
        assert_eq!(
            lexer.next_token(),
            Err(LexError::UnexpectedEof { line: 1 })
        );
    }

    #[test]
    fn tracks_lines_through_comments() {
        let mut lexer = Lexer::new("a\n/* one\ntwo */\nb // x\n\nc");
        assert_eq!(lexer.line(), 1);
        lexer.next_token().unwrap();
        assert_eq!(lexer.line(), 4);
        lexer.next_token().unwrap();
        assert_eq!(lexer.line(), 6);
    }
}
