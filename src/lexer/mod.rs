//! C-aware tokenizer.
//!
//! Produces a flat token stream that keeps comments (needed for doc
//! comment extraction) and newlines, and collapses each preprocessor line
//! into one opaque token.

mod token;
mod tokenizer;

pub use token::{is_keyword, Token, TokenKind, ASSIGNMENT_OPERATORS};
pub use tokenizer::{tokenize, LexIssue, LexIssueKind, Lexed};
