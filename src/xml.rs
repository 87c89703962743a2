use crate::error::LexError;
use crate::lexer::Lexer;
use crate::token::Token;

/// Replaces the characters that would break the tagged output.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Accumulates nested-tag output, one element per line, indented with one tab
/// per level.
#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, tag: &str) {
        self.line(&format!("<{}>", tag));
        self.depth += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{}>", tag));
    }

    pub fn leaf(&mut self, tag: &str, value: &str) {
        self.line(&format!("<{tag}> {value} </{tag}>"));
    }

    pub fn token(&mut self, token: &Token) {
        let value = match token {
            Token::Symbol(_) | Token::StringConstant(_) => escape(&token.lexeme()),
            _ => token.lexeme(),
        };
        self.leaf(token.tag(), &value);
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Flat token listing wrapped in a `tokens` element.
pub fn tokens_xml(source: &str) -> Result<String, LexError> {
    let mut writer = XmlWriter::new();
    writer.open("tokens");
    for token in Lexer::new(source) {
        writer.token(&token?);
    }
    writer.close("tokens");
    Ok(writer.finish())
}
