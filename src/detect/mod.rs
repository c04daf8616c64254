//! Style rules and the machinery that runs them.
//!
//! Each rule is an independent [`Rule`] over one file's tokens. The
//! [`Analyzer`] combines them with the tokenizer's own diagnostics; the
//! [`Runner`] adds parallelism and the caller-side filters.

mod assign_cond;
mod doc_xref;
mod metrics;
mod rule;
mod runner;
mod suppress;
mod types;

pub use assign_cond::AssignmentInCondition;
pub use doc_xref::DocCrossReference;
pub use metrics::{FunctionMetrics, Limits};
pub use rule::{FileContext, Rule};
pub use runner::{analyze, Analyzer, AnalyzerOptions, Runner, SourceFile};
pub use suppress::{
    filter_suppressed, matches_suppression, parse_suppressions, SuppressedViolation, Suppression,
    SuppressionType,
};
pub use types::{DetectionResult, Diagnostic, RuleId, Severity, Violation};
