//! Core types for detection results.

use serde::{Deserialize, Serialize};

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Stable identifiers of every diagnostic the checker can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "unterminated-literal")]
    UnterminatedLiteral,
    #[serde(rename = "unterminated-comment")]
    UnterminatedComment,
    #[serde(rename = "orphan-doc-comment")]
    OrphanDocComment,
    #[serde(rename = "missing-param-doc")]
    MissingParamDoc,
    #[serde(rename = "undocumented-extra-param")]
    UndocumentedExtraParam,
    #[serde(rename = "param-doc-order-mismatch")]
    ParamDocOrderMismatch,
    #[serde(rename = "missing-return-doc")]
    MissingReturnDoc,
    #[serde(rename = "assignment-in-condition")]
    AssignmentInCondition,
    #[serde(rename = "unbalanced-condition")]
    UnbalancedCondition,
    // Function metrics, off unless limits are configured
    #[serde(rename = "too-many-functions")]
    TooManyFunctions,
    #[serde(rename = "function-too-long")]
    FunctionTooLong,
}

impl RuleId {
    pub const ALL: &'static [RuleId] = &[
        RuleId::UnterminatedLiteral,
        RuleId::UnterminatedComment,
        RuleId::OrphanDocComment,
        RuleId::MissingParamDoc,
        RuleId::UndocumentedExtraParam,
        RuleId::ParamDocOrderMismatch,
        RuleId::MissingReturnDoc,
        RuleId::AssignmentInCondition,
        RuleId::UnbalancedCondition,
        RuleId::TooManyFunctions,
        RuleId::FunctionTooLong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::UnterminatedLiteral => "unterminated-literal",
            RuleId::UnterminatedComment => "unterminated-comment",
            RuleId::OrphanDocComment => "orphan-doc-comment",
            RuleId::MissingParamDoc => "missing-param-doc",
            RuleId::UndocumentedExtraParam => "undocumented-extra-param",
            RuleId::ParamDocOrderMismatch => "param-doc-order-mismatch",
            RuleId::MissingReturnDoc => "missing-return-doc",
            RuleId::AssignmentInCondition => "assignment-in-condition",
            RuleId::UnbalancedCondition => "unbalanced-condition",
            RuleId::TooManyFunctions => "too-many-functions",
            RuleId::FunctionTooLong => "function-too-long",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RuleId::ALL.iter().copied().find(|r| r.as_str() == s)
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            RuleId::OrphanDocComment | RuleId::TooManyFunctions | RuleId::FunctionTooLong => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding within one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub severity: Severity,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with the rule's default severity.
    pub fn new(rule: RuleId, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.default_severity(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// A diagnostic attributed to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub file: String,
    pub rule: RuleId,
    pub severity: Severity,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Violation {
    pub fn from_diagnostic(file: &str, d: Diagnostic) -> Self {
        Self {
            file: file.to_string(),
            rule: d.rule,
            severity: d.severity,
            line: d.line,
            column: d.column,
            message: d.message,
        }
    }
}

/// Results of running detection over a set of files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub violations: Vec<Violation>,
    /// Violations that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<super::SuppressedViolation>,
    /// Number of files scanned
    pub scanned: usize,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: DetectionResult) {
        self.violations.extend(other.violations);
        self.suppressed.extend(other.suppressed);
        self.scanned += other.scanned;
    }

    /// Number of suppressed violations.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    /// Check if there are any error-severity violations.
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Count violations per rule, in rule order.
    pub fn counts_by_rule(&self) -> Vec<(RuleId, usize)> {
        let mut counts = std::collections::BTreeMap::new();
        for v in &self.violations {
            *counts.entry(v.rule).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}
