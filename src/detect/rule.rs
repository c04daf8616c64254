//! The seam every style rule plugs into.

use crate::lexer::Token;

use super::Diagnostic;

/// Everything a rule may look at for one file.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Identifier the caller gave the file, usually its path.
    pub file: &'a str,
    /// Complete token stream, ending with `EndOfInput`.
    pub tokens: &'a [Token],
}

impl<'a> FileContext<'a> {
    pub fn new(file: &'a str, tokens: &'a [Token]) -> Self {
        Self { file, tokens }
    }

    /// Whether the file is a C source file rather than a header.
    pub fn is_source_file(&self) -> bool {
        self.file.ends_with(".c")
    }
}

/// A pure check over one file's token stream.
///
/// Rules never share state and never see each other's output; adding a rule
/// means adding one implementation to the [`Analyzer`](super::Analyzer).
pub trait Rule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the rule and return its findings in any order.
    fn run(&self, ctx: &FileContext<'_>) -> Vec<Diagnostic>;
}
