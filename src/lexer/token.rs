//! Lexical token types for C sources.

use phf::phf_set;
use std::fmt;

/// Reserved words of C99/C11 plus the common GNU spellings.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "auto", "break", "case", "char", "const", "continue", "default", "do",
    "double", "else", "enum", "extern", "float", "for", "goto", "if",
    "inline", "int", "long", "register", "restrict", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while", "_Bool", "_Complex",
    "_Imaginary", "_Alignas", "_Alignof", "_Atomic", "_Generic",
    "_Noreturn", "_Static_assert", "_Thread_local", "__inline",
    "__inline__", "__restrict", "__volatile__", "__const",
};

/// Simple and compound assignment operators.
pub const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

/// Punctuators ordered longest-first so the tokenizer can match greedily.
pub(crate) const PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=",
    "&&", "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", "(",
    ")", "[", "]", "{", "}", ".", "&", "*", "+", "-", "~", "!", "/", "%",
    "<", ">", "^", "|", "?", ":", ";", "=", ",", "#",
];

/// Check whether an identifier-shaped word is a C keyword.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word)
}

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    StringLiteral,
    CharLiteral,
    Punctuator,
    LineComment,
    BlockComment,
    /// One whole logical preprocessor line, continuations included.
    Preprocessor,
    Newline,
    EndOfInput,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "string-literal",
            TokenKind::CharLiteral => "char-literal",
            TokenKind::Punctuator => "punctuator",
            TokenKind::LineComment => "line-comment",
            TokenKind::BlockComment => "block-comment",
            TokenKind::Preprocessor => "preprocessor-directive",
            TokenKind::Newline => "newline",
            TokenKind::EndOfInput => "end-of-input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lexical token with its 1-indexed start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// True for tokens that carry program structure: not comments, newlines,
    /// preprocessor lines or the end marker.
    pub fn is_significant(&self) -> bool {
        !matches!(
            self.kind,
            TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Newline
                | TokenKind::Preprocessor
                | TokenKind::EndOfInput
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Check for a punctuator with the given spelling.
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == text
    }

    /// Check for a keyword with the given spelling.
    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// True for `=` and every compound assignment operator.
    pub fn is_assignment_operator(&self) -> bool {
        self.kind == TokenKind::Punctuator && ASSIGNMENT_OPERATORS.contains(&self.text.as_str())
    }

    /// Last line this token occupies (block comments and continued
    /// directives span several).
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}:{}", self.kind, self.text, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert!(is_keyword("struct"));
        assert!(is_keyword("typedef"));
        assert!(is_keyword("void"));
        assert!(!is_keyword("main"));
        assert!(!is_keyword("size_t"));
    }

    #[test]
    fn test_punctuators_longest_first() {
        for (i, long) in PUNCTUATORS.iter().enumerate() {
            for short in &PUNCTUATORS[..i] {
                assert!(
                    !long.starts_with(short) || long == short,
                    "{:?} is shadowed by earlier {:?}",
                    long,
                    short
                );
            }
        }
    }

    #[test]
    fn test_assignment_classification() {
        let eq = Token::new(TokenKind::Punctuator, "<<=", 1, 1);
        let shl = Token::new(TokenKind::Punctuator, "<<", 1, 1);
        let cmp = Token::new(TokenKind::Punctuator, "==", 1, 1);
        assert!(eq.is_assignment_operator());
        assert!(!shl.is_assignment_operator());
        assert!(!cmp.is_assignment_operator());
    }

    #[test]
    fn test_end_line() {
        let comment = Token::new(TokenKind::BlockComment, "/*\n * a\n */", 3, 1);
        assert_eq!(comment.end_line(), 5);
    }
}
