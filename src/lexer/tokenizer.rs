//! Source text to token stream.
//!
//! The tokenizer never fails: malformed input (a literal or block comment
//! left open) is reported as a [`LexIssue`] and the remaining text is
//! flushed into a best-effort token.

use super::token::{is_keyword, Token, TokenKind, PUNCTUATORS};

/// What went wrong while tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexIssueKind {
    UnterminatedLiteral,
    UnterminatedComment,
}

/// A recoverable lexical problem, positioned at the start of the offending
/// token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexIssue {
    pub kind: LexIssueKind,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Tokens in source order, always terminated by an `EndOfInput` token.
    pub tokens: Vec<Token>,
    pub issues: Vec<LexIssue>,
}

/// Tokenize one complete C source or header file.
pub fn tokenize(source: &str) -> Lexed {
    let mut lexer = Lexer::new(source);
    lexer.run();
    Lexed {
        tokens: lexer.tokens,
        issues: lexer.issues,
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// Only whitespace seen since the last newline.
    at_line_start: bool,
    tokens: Vec<Token>,
    issues: Vec<LexIssue>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            tokens: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) {
        let text = self.text_from(start);
        self.tokens.push(Token::new(kind, text, line, column));
    }

    fn issue(&mut self, kind: LexIssueKind, line: usize, column: usize, message: impl Into<String>) {
        self.issues.push(LexIssue {
            kind,
            line,
            column,
            message: message.into(),
        });
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let (start, line, column) = (self.pos, self.line, self.column);

            match c {
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, start, line, column);
                    self.at_line_start = true;
                    continue;
                }
                '\r' | ' ' | '\t' | '\x0b' | '\x0c' => {
                    self.bump();
                    continue;
                }
                // Line splice outside a directive
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                    continue;
                }
                _ => {}
            }

            if c == '#' && self.at_line_start {
                self.lex_directive();
            } else if self.starts_with("//") {
                self.skip_line_comment();
                self.push(TokenKind::LineComment, start, line, column);
                // Comments count as whitespace for directive detection
                continue;
            } else if self.starts_with("/*") {
                self.skip_block_comment(line, column);
                self.push(TokenKind::BlockComment, start, line, column);
                continue;
            } else if c == '"' || c == '\'' {
                self.lex_quoted(c);
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.lex_number();
            } else if c == '_' || c.is_alphabetic() {
                self.lex_word();
            } else {
                self.lex_punctuator();
            }
            self.at_line_start = false;
        }

        self.tokens
            .push(Token::new(TokenKind::EndOfInput, "", self.line, self.column));
    }

    /// A trailing backslash splices the next line into the comment.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                '\n' => break,
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                '\\' if self.peek_at(1) == Some('\r') && self.peek_at(2) == Some('\n') => {
                    self.bump();
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Consume `/* ... */`; the first `*/` closes it.
    fn skip_block_comment(&mut self, line: usize, column: usize) {
        self.bump();
        self.bump();
        loop {
            if self.starts_with("*/") {
                self.bump();
                self.bump();
                return;
            }
            if self.bump().is_none() {
                self.issue(
                    LexIssueKind::UnterminatedComment,
                    line,
                    column,
                    "block comment is never closed",
                );
                return;
            }
        }
    }

    /// Consume a string or char literal body up to its closing quote.
    ///
    /// Returns false when input ends or an unescaped newline is reached first.
    fn skip_quoted(&mut self, quote: char) -> bool {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    // An escaped newline is a splice and stays inside the literal
                    self.bump();
                }
                '\n' => return false,
                _ if c == quote => {
                    self.bump();
                    return true;
                }
                _ => {
                    self.bump();
                }
            }
        }
        false
    }

    fn lex_quoted(&mut self, quote: char) {
        let (start, line, column) = (self.pos, self.line, self.column);
        let closed = self.skip_quoted(quote);
        let kind = if quote == '"' {
            TokenKind::StringLiteral
        } else {
            TokenKind::CharLiteral
        };
        if !closed {
            let what = if quote == '"' { "string" } else { "character" };
            self.issue(
                LexIssueKind::UnterminatedLiteral,
                line,
                column,
                format!("{} literal is never closed", what),
            );
        }
        self.push(kind, start, line, column);
    }

    /// A directive runs to the end of its logical line. Comments and
    /// literals inside it are skipped as units, so a block comment opened
    /// on the directive line may carry it past the newline.
    fn lex_directive(&mut self) {
        let (start, line, column) = (self.pos, self.line, self.column);
        while let Some(c) = self.peek() {
            match c {
                '\n' => break,
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                '\\' if self.peek_at(1) == Some('\r') && self.peek_at(2) == Some('\n') => {
                    self.bump();
                    self.bump();
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('*') => {
                    let (l, col) = (self.line, self.column);
                    self.skip_block_comment(l, col);
                }
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '"' | '\'' => {
                    // `#error don't` is legal, so a stray quote ends at the line
                    self.skip_quoted(c);
                }
                _ => {
                    self.bump();
                }
            }
        }
        let text = self.text_from(start);
        let trimmed = text.trim_end();
        self.tokens
            .push(Token::new(TokenKind::Preprocessor, trimmed, line, column));
    }

    /// Preprocessing numbers: digits, letters, `.`, `_` and signed exponents.
    fn lex_number(&mut self) {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();
        while let Some(c) = self.peek() {
            if matches!(c, 'e' | 'E' | 'p' | 'P')
                && matches!(self.peek_at(1), Some('+') | Some('-'))
            {
                self.bump();
                self.bump();
            } else if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        self.push(TokenKind::Number, start, line, column);
    }

    fn lex_word(&mut self) {
        let (start, line, column) = (self.pos, self.line, self.column);
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() {
                self.bump();
            } else {
                break;
            }
        }

        // Prefixed literals: L"..", u8"..", U'x'
        let word = self.text_from(start);
        if matches!(word.as_str(), "L" | "u" | "U" | "u8") {
            if let Some(q @ ('"' | '\'')) = self.peek() {
                let closed = self.skip_quoted(q);
                if !closed {
                    self.issue(
                        LexIssueKind::UnterminatedLiteral,
                        line,
                        column,
                        "literal is never closed",
                    );
                }
                let kind = if q == '"' {
                    TokenKind::StringLiteral
                } else {
                    TokenKind::CharLiteral
                };
                self.push(kind, start, line, column);
                return;
            }
        }

        let kind = if is_keyword(&word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.tokens.push(Token::new(kind, word, line, column));
    }

    fn lex_punctuator(&mut self) {
        let (start, line, column) = (self.pos, self.line, self.column);
        let len = PUNCTUATORS
            .iter()
            .find(|p| self.starts_with(p))
            .map(|p| p.chars().count())
            .unwrap_or(1);
        for _ in 0..len {
            self.bump();
        }
        self.push(TokenKind::Punctuator, start, line, column);
    }
}
