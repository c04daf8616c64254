//! cdoclint - documentation and condition style checker for C.
//!
//! The checker reads C sources and headers without a compiler front end
//! and reports two families of problems:
//!
//! - documentation comments that disagree with the function, struct,
//!   union, enum or typedef they precede
//! - assignments inside the condition of `if`, `else if`, `while`, `for`
//!   and `switch`
//!
//! # Architecture
//!
//! - `lexer`: C tokenizer producing an immutable token stream
//! - `analysis`: doc comment extraction, declaration shapes and condition
//!   spans recovered from the token stream
//! - `detect`: rules, the per-file [`analyze`] entry point and the
//!   multi-file [`Runner`]
//! - `config`: YAML configuration
//! - `report`: pretty, JSON and SARIF output
//! - `cli`: the `cdoclint` command
//!
//! ```
//! let diagnostics = cdoclint::analyze("main.c", "void f(int a)\n{\n\twhile (a = 0)\n\t\t;\n}\n");
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].rule.as_str(), "assignment-in-condition");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod lexer;
pub mod report;

pub use config::{Config, ConfigError};
pub use detect::{
    analyze, Analyzer, AnalyzerOptions, DetectionResult, Diagnostic, Rule, RuleId, Runner,
    Severity, SourceFile, Violation,
};
pub use lexer::{tokenize, Token, TokenKind};
