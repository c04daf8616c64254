//! Analysis entry points.
//!
//! [`Analyzer`] runs the rules over one file and is pure: same input, same
//! diagnostics. [`Runner`] drives an analyzer over many files in parallel
//! and applies the caller-side filters (disabled rules, severity overrides,
//! inline suppressions).

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::Config;
use crate::lexer::{tokenize, LexIssue, LexIssueKind};

use super::{
    filter_suppressed, parse_suppressions, AssignmentInCondition, DetectionResult, Diagnostic,
    DocCrossReference, FileContext, FunctionMetrics, Limits, Rule, RuleId, Violation,
};

/// Options that shape which rules an [`Analyzer`] runs.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    /// Enables the function metrics rule.
    pub limits: Option<Limits>,
}

/// Runs a fixed set of rules over single files.
pub struct Analyzer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AnalyzerOptions::default())
    }
}

impl Analyzer {
    pub fn new(options: &AnalyzerOptions) -> Self {
        let mut rules: Vec<Box<dyn Rule>> =
            vec![Box::new(DocCrossReference), Box::new(AssignmentInCondition)];
        if let Some(limits) = options.limits {
            rules.push(Box::new(FunctionMetrics::new(limits)));
        }
        Self { rules }
    }

    /// An analyzer with a custom rule set. Lexical diagnostics are always
    /// produced.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Analyze one complete file. Diagnostics come back ordered by
    /// `(line, column)`; ties keep rule order.
    pub fn analyze(&self, file: &str, source: &str) -> Vec<Diagnostic> {
        let lexed = tokenize(source);
        let ctx = FileContext::new(file, &lexed.tokens);

        let mut diagnostics: Vec<Diagnostic> =
            lexed.issues.into_iter().map(lex_diagnostic).collect();
        for rule in &self.rules {
            let found = rule.run(&ctx);
            trace!(file, rule = rule.name(), count = found.len(), "rule finished");
            diagnostics.extend(found);
        }

        diagnostics.sort_by_key(|d| (d.line, d.column));
        diagnostics
    }
}

fn lex_diagnostic(issue: LexIssue) -> Diagnostic {
    let rule = match issue.kind {
        LexIssueKind::UnterminatedLiteral => RuleId::UnterminatedLiteral,
        LexIssueKind::UnterminatedComment => RuleId::UnterminatedComment,
    };
    Diagnostic::new(rule, issue.line, issue.column, issue.message)
}

/// Analyze one file with the default rule set.
pub fn analyze(file: &str, source: &str) -> Vec<Diagnostic> {
    Analyzer::default().analyze(file, source)
}

/// A file handed to the [`Runner`], already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Executes the analyzer against a set of files.
pub struct Runner<'c> {
    analyzer: Analyzer,
    config: &'c Config,
}

impl<'c> Runner<'c> {
    /// Create a runner whose rule set and filters follow `config`.
    pub fn new(config: &'c Config) -> Self {
        Self {
            analyzer: Analyzer::new(&config.analyzer_options()),
            config,
        }
    }

    /// Analyze every file and apply disabled rules, severity overrides and
    /// inline suppressions. Violations are ordered by file, then position.
    pub fn run(&self, files: &[SourceFile]) -> DetectionResult {
        debug!(files = files.len(), rules = ?self.analyzer.rule_names(), "starting analysis");

        let mut per_file: Vec<(&str, DetectionResult)> = files
            .par_iter()
            .map(|file| (file.id.as_str(), self.run_file(file)))
            .collect();
        per_file.sort_by(|a, b| a.0.cmp(b.0));

        let mut result = DetectionResult::new();
        for (_, file_result) in per_file {
            result.merge(file_result);
        }

        debug!(
            violations = result.violations.len(),
            suppressed = result.suppressed_count(),
            "analysis finished"
        );
        result
    }

    fn run_file(&self, file: &SourceFile) -> DetectionResult {
        let violations: Vec<Violation> = self
            .analyzer
            .analyze(&file.id, &file.text)
            .into_iter()
            .filter(|d| !self.config.is_rule_disabled(d.rule))
            .map(|mut d| {
                d.severity = self.config.severity_for(d.rule);
                Violation::from_diagnostic(&file.id, d)
            })
            .collect();

        let suppressions = parse_suppressions(&file.id, &file.text);
        let (violations, suppressed) = if suppressions.is_empty() {
            (violations, Vec::new())
        } else {
            filter_suppressed(violations, &suppressions)
        };

        DetectionResult {
            violations,
            suppressed,
            scanned: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Severity;

    const UNDOCUMENTED: &str =
        "/**\n * op_add - Sum\n * @arg1: A\n */\nint op_add(int arg1, int arg2)\n{\n\tif ((arg1 = 0) == 1)\n\t\treturn (0);\n\treturn (arg1 + arg2);\n}\n";

    #[test]
    fn test_analyze_orders_by_position() {
        let diags = analyze("a.c", UNDOCUMENTED);
        let rules: Vec<_> = diags.iter().map(|d| d.rule).collect();
        assert_eq!(
            rules,
            vec![
                RuleId::MissingParamDoc,
                RuleId::MissingReturnDoc,
                RuleId::AssignmentInCondition
            ]
        );
        assert_eq!(diags[2].line, 7);
    }

    #[test]
    fn test_analyze_reports_lexical_issues() {
        let diags = analyze("a.c", "int x;\n/* open");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, RuleId::UnterminatedComment);
        assert_eq!((diags[0].line, diags[0].column), (2, 1));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        assert_eq!(analyze("a.c", UNDOCUMENTED), analyze("a.c", UNDOCUMENTED));
    }

    #[test]
    fn test_default_analyzer_has_no_metrics() {
        let analyzer = Analyzer::default();
        assert_eq!(
            analyzer.rule_names(),
            vec!["doc-cross-reference", "assignment-in-condition"]
        );
        let with_limits = Analyzer::new(&AnalyzerOptions {
            limits: Some(Limits::default()),
        });
        assert_eq!(with_limits.rule_names().len(), 3);
    }

    #[test]
    fn test_runner_filters_and_overrides() {
        let config: Config = Config::from_yaml(
            "disabled_rules: [missing-return-doc]\nseverity:\n  missing-param-doc: warning\n",
        )
        .unwrap();
        let runner = Runner::new(&config);
        let result = runner.run(&[
            SourceFile::new("b.c", UNDOCUMENTED),
            SourceFile::new("a.c", "int f(void)\n{\n\twhile ((c = 1))\n\t\t;\n}\n"),
        ]);

        assert_eq!(result.scanned, 2);
        let summary: Vec<_> = result
            .violations
            .iter()
            .map(|v| (v.file.as_str(), v.rule, v.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.c", RuleId::AssignmentInCondition, Severity::Error),
                ("b.c", RuleId::MissingParamDoc, Severity::Warning),
                ("b.c", RuleId::AssignmentInCondition, Severity::Error),
            ]
        );
    }

    #[test]
    fn test_runner_with_suppression() {
        let source = "int f(void)\n{\n\t/* cdoclint:ignore-next-line assignment-in-condition - loop idiom */\n\twhile ((c = next()))\n\t\t;\n}\n";
        let config = Config::default();
        let result = Runner::new(&config).run(&[SourceFile::new("s.c", source)]);
        assert!(result.violations.is_empty());
        assert_eq!(result.suppressed.len(), 1);
        assert_eq!(result.suppressed[0].suppression.reason, "loop idiom");
    }
}
