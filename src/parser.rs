use crate::error::{CompileError, Expected, SyntaxError};
use crate::lexer::Lexer;
use crate::token::{Keyword, Token};
use crate::xml::XmlWriter;

const CLASS_VAR_KEYWORDS: [Keyword; 2] = [Keyword::Static, Keyword::Field];
const SUBROUTINE_KEYWORDS: [Keyword; 3] =
    [Keyword::Constructor, Keyword::Function, Keyword::Method];
const TYPE_KEYWORDS: [Keyword; 3] = [Keyword::Int, Keyword::Char, Keyword::Boolean];
const KEYWORD_CONSTANTS: [Keyword; 4] =
    [Keyword::True, Keyword::False, Keyword::Null, Keyword::This];

/// Deepest nesting of terms or statement blocks accepted before giving up.
pub const MAX_NESTING: usize = 128;

type ParseResult = Result<(), CompileError>;

/// Recursive-descent parser over a single class.
///
/// Each production checks the lookahead before committing. Once committed, a
/// missing piece is a hard error that aborts the whole file. Output is
/// buffered, so nothing is produced for a file that fails.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Option<Token>,
    line: u32,
    depth: usize,
    writer: XmlWriter,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Result<Self, CompileError> {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: None,
            line: 1,
            depth: 0,
            writer: XmlWriter::new(),
        };
        parser.load_next()?;
        Ok(parser)
    }

    /// Parses the class the source consists of and returns its serialized tree.
    pub fn parse_class(mut self) -> Result<String, CompileError> {
        self.class()?;
        if self.current.is_some() {
            return Err(self.error(Expected::EndOfInput));
        }
        Ok(self.writer.finish())
    }

    // Token plumbing.

    fn load_next(&mut self) -> ParseResult {
        self.line = self.lexer.line();
        self.current = if self.lexer.has_more_tokens() {
            Some(self.lexer.next_token()?)
        } else {
            None
        };
        Ok(())
    }

    /// Writes the current token and moves past it.
    fn advance(&mut self) -> ParseResult {
        if let Some(token) = self.current.take() {
            self.writer.token(&token);
        }
        self.load_next()
    }

    fn check_keyword(&self, keywords: &[Keyword]) -> bool {
        matches!(&self.current, Some(Token::Keyword(k)) if keywords.contains(k))
    }

    fn check_symbol(&self, symbol: char) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_symbol(symbol))
    }

    fn check_identifier(&self) -> bool {
        matches!(self.current, Some(Token::Identifier(_)))
    }

    fn check_type(&self) -> bool {
        self.check_identifier() || self.check_keyword(&TYPE_KEYWORDS)
    }

    fn r#match(&mut self, symbol: char) -> Result<bool, CompileError> {
        if self.check_symbol(symbol) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> ParseResult {
        if self.check_keyword(&[keyword]) {
            self.advance()
        } else {
            Err(self.error(Expected::Keyword(keyword)))
        }
    }

    fn consume_symbol(&mut self, symbol: char) -> ParseResult {
        if self.check_symbol(symbol) {
            self.advance()
        } else {
            Err(self.error(Expected::Symbol(symbol)))
        }
    }

    fn consume_identifier(&mut self) -> ParseResult {
        if self.check_identifier() {
            self.advance()
        } else {
            Err(self.error(Expected::Identifier))
        }
    }

    fn consume_type(&mut self) -> ParseResult {
        if self.check_type() {
            self.advance()
        } else {
            Err(self.error(Expected::Type))
        }
    }

    /// Enters a recursive production. Left unbalanced on error, since the
    /// whole parse is abandoned then.
    fn enter(&mut self) -> ParseResult {
        if self.depth == MAX_NESTING {
            return Err(CompileError::NestingTooDeep { line: self.line });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn error(&self, expected: Expected) -> CompileError {
        SyntaxError {
            expected,
            found: self.current.as_ref().map(Token::to_string),
            line: self.line,
        }
        .into()
    }

    // Program structure.

    fn class(&mut self) -> ParseResult {
        self.writer.open("class");
        self.consume_keyword(Keyword::Class)?;
        self.consume_identifier()?;
        self.consume_symbol('{')?;
        while self.check_keyword(&CLASS_VAR_KEYWORDS) {
            self.class_var_dec()?;
        }
        while self.check_keyword(&SUBROUTINE_KEYWORDS) {
            self.subroutine_dec()?;
        }
        self.consume_symbol('}')?;
        self.writer.close("class");
        Ok(())
    }

    fn class_var_dec(&mut self) -> ParseResult {
        self.writer.open("classVarDec");
        self.advance()?;
        self.consume_type()?;
        self.identifier_list()?;
        self.consume_symbol(';')?;
        self.writer.close("classVarDec");
        Ok(())
    }

    /// `identifier (',' identifier)*`
    fn identifier_list(&mut self) -> ParseResult {
        self.consume_identifier()?;
        while self.r#match(',')? {
            self.consume_identifier()?;
        }
        Ok(())
    }

    fn subroutine_dec(&mut self) -> ParseResult {
        self.writer.open("subroutineDec");
        self.advance()?;
        if self.check_keyword(&[Keyword::Void]) || self.check_type() {
            self.advance()?;
        } else {
            return Err(self.error(Expected::ReturnType));
        }
        self.consume_identifier()?;
        self.consume_symbol('(')?;
        self.parameter_list()?;
        self.consume_symbol(')')?;
        self.subroutine_body()?;
        self.writer.close("subroutineDec");
        Ok(())
    }

    fn parameter_list(&mut self) -> ParseResult {
        self.writer.open("parameterList");
        if !self.check_symbol(')') {
            self.consume_type()?;
            self.consume_identifier()?;
            while self.r#match(',')? {
                self.consume_type()?;
                self.consume_identifier()?;
            }
        }
        self.writer.close("parameterList");
        Ok(())
    }

    fn subroutine_body(&mut self) -> ParseResult {
        self.writer.open("subroutineBody");
        self.consume_symbol('{')?;
        while self.check_keyword(&[Keyword::Var]) {
            self.var_dec()?;
        }
        self.statements()?;
        self.consume_symbol('}')?;
        self.writer.close("subroutineBody");
        Ok(())
    }

    fn var_dec(&mut self) -> ParseResult {
        self.writer.open("varDec");
        self.advance()?;
        self.consume_type()?;
        self.identifier_list()?;
        self.consume_symbol(';')?;
        self.writer.close("varDec");
        Ok(())
    }

    // Statements.

    /// Runs until the lookahead no longer starts a statement.
    fn statements(&mut self) -> ParseResult {
        self.enter()?;
        self.writer.open("statements");
        while let Some(Token::Keyword(keyword)) = self.current {
            match keyword {
                Keyword::Let => self.let_statement()?,
                Keyword::If => self.if_statement()?,
                Keyword::While => self.while_statement()?,
                Keyword::Do => self.do_statement()?,
                Keyword::Return => self.return_statement()?,
                _ => break,
            }
        }
        self.writer.close("statements");
        self.leave();
        Ok(())
    }

    fn let_statement(&mut self) -> ParseResult {
        self.writer.open("letStatement");
        self.advance()?;
        self.consume_identifier()?;
        if self.r#match('[')? {
            self.expression()?;
            self.consume_symbol(']')?;
        }
        self.consume_symbol('=')?;
        self.expression()?;
        self.consume_symbol(';')?;
        self.writer.close("letStatement");
        Ok(())
    }

    fn if_statement(&mut self) -> ParseResult {
        self.writer.open("ifStatement");
        self.advance()?;
        self.condition()?;
        self.block()?;
        if self.check_keyword(&[Keyword::Else]) {
            self.advance()?;
            self.block()?;
        }
        self.writer.close("ifStatement");
        Ok(())
    }

    fn while_statement(&mut self) -> ParseResult {
        self.writer.open("whileStatement");
        self.advance()?;
        self.condition()?;
        self.block()?;
        self.writer.close("whileStatement");
        Ok(())
    }

    /// `'(' expression ')'`
    fn condition(&mut self) -> ParseResult {
        self.consume_symbol('(')?;
        self.expression()?;
        self.consume_symbol(')')
    }

    /// `'{' statements '}'`
    fn block(&mut self) -> ParseResult {
        self.consume_symbol('{')?;
        self.statements()?;
        self.consume_symbol('}')
    }

    fn do_statement(&mut self) -> ParseResult {
        self.writer.open("doStatement");
        self.advance()?;
        self.consume_identifier()?;
        if self.r#match('.')? {
            self.consume_identifier()?;
        }
        self.call_arguments()?;
        self.consume_symbol(';')?;
        self.writer.close("doStatement");
        Ok(())
    }

    fn return_statement(&mut self) -> ParseResult {
        self.writer.open("returnStatement");
        self.advance()?;
        if !self.check_symbol(';') {
            self.expression()?;
        }
        self.consume_symbol(';')?;
        self.writer.close("returnStatement");
        Ok(())
    }

    // Expressions.

    /// Terms joined by operators, strictly left to right.
    fn expression(&mut self) -> ParseResult {
        self.writer.open("expression");
        self.term()?;
        while self.current.as_ref().is_some_and(Token::is_op) {
            self.advance()?;
            self.term()?;
        }
        self.writer.close("expression");
        Ok(())
    }

    fn term(&mut self) -> ParseResult {
        let Some(token) = &self.current else {
            return Err(self.error(Expected::Term));
        };
        let starts_term = match token {
            Token::IntegerConstant(_) | Token::StringConstant(_) | Token::Identifier(_) => true,
            Token::Keyword(keyword) => KEYWORD_CONSTANTS.contains(keyword),
            Token::Symbol(_) => token.is_unary_op() || token.is_symbol('('),
        };
        if !starts_term {
            return Err(self.error(Expected::Term));
        }

        self.enter()?;
        self.writer.open("term");
        if self.check_identifier() {
            self.advance()?;
            self.identifier_tail()?;
        } else if self.r#match('(')? {
            self.expression()?;
            self.consume_symbol(')')?;
        } else if self.current.as_ref().is_some_and(Token::is_unary_op) {
            self.advance()?;
            self.term()?;
        } else {
            self.advance()?;
        }
        self.writer.close("term");
        self.leave();
        Ok(())
    }

    /// What follows a name inside a term: a qualified call, an array index,
    /// a direct call, or nothing for a plain variable.
    fn identifier_tail(&mut self) -> ParseResult {
        if self.r#match('.')? {
            self.consume_identifier()?;
            self.call_arguments()
        } else if self.r#match('[')? {
            self.expression()?;
            self.consume_symbol(']')
        } else if self.check_symbol('(') {
            self.call_arguments()
        } else {
            Ok(())
        }
    }

    /// `'(' expressionList ')'`
    fn call_arguments(&mut self) -> ParseResult {
        self.consume_symbol('(')?;
        self.expression_list()?;
        self.consume_symbol(')')
    }

    fn expression_list(&mut self) -> ParseResult {
        self.writer.open("expressionList");
        if !self.check_symbol(')') {
            self.expression()?;
            while self.r#match(',')? {
                self.expression()?;
            }
        }
        self.writer.close("expressionList");
        Ok(())
    }
}
