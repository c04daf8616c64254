//! Output formatting for cdoclint results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output grouped by file
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::detect::{DetectionResult, RuleId, Severity, SuppressedViolation, SuppressionType, Violation};

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_scanned: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedDiagnostic>,
    pub suppressed_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub file: String,
    pub rule: String,
    pub severity: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppressedDiagnostic {
    pub diagnostic: JsonDiagnostic,
    pub suppression: JsonSuppression,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: SuppressionType,
}

/// Build the JSON report for a run over `path`.
pub fn json_report(path: &str, result: &DetectionResult) -> JsonReport {
    let suppressed = result
        .suppressed
        .iter()
        .map(|sv| JsonSuppressedDiagnostic {
            diagnostic: violation_to_json(&sv.violation),
            suppression: JsonSuppression {
                rule: sv.suppression.rule.clone(),
                reason: sv.suppression.reason.clone(),
                line: sv.suppression.line,
                suppression_type: sv.suppression.suppression_type,
            },
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_scanned: result.scanned,
        diagnostics: result.violations.iter().map(violation_to_json).collect(),
        suppressed,
        suppressed_count: result.suppressed_count(),
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, result: &DetectionResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(path, result))?;
    println!("{}", json);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonDiagnostic {
    JsonDiagnostic {
        file: v.file.clone(),
        rule: v.rule.as_str().to_string(),
        severity: v.severity.to_string(),
        line: v.line,
        column: v.column,
        message: v.message.clone(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "cdoclint";

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn")]
    pub start_column: usize,
}

/// Rule metadata for SARIF output.
struct RuleInfo {
    name: &'static str,
    short_description: &'static str,
}

fn get_rule_info(rule: RuleId) -> RuleInfo {
    let (name, short_description) = match rule {
        RuleId::UnterminatedLiteral => (
            "UnterminatedLiteral",
            "String or character literal not closed before end of line or file",
        ),
        RuleId::UnterminatedComment => (
            "UnterminatedComment",
            "Block comment not closed before end of file",
        ),
        RuleId::OrphanDocComment => (
            "OrphanDocComment",
            "Documentation comment not followed by a declaration",
        ),
        RuleId::MissingParamDoc => (
            "MissingParamDoc",
            "Parameter, member or enumerator missing from its documentation",
        ),
        RuleId::UndocumentedExtraParam => (
            "UndocumentedExtraParam",
            "Documentation lists a name the declaration does not have",
        ),
        RuleId::ParamDocOrderMismatch => (
            "ParamDocOrderMismatch",
            "Documented names are not in declaration order",
        ),
        RuleId::MissingReturnDoc => (
            "MissingReturnDoc",
            "Value-returning function documented without a Return: section",
        ),
        RuleId::AssignmentInCondition => (
            "AssignmentInCondition",
            "Assignment inside the condition of a control statement",
        ),
        RuleId::UnbalancedCondition => (
            "UnbalancedCondition",
            "Condition parentheses never closed",
        ),
        RuleId::TooManyFunctions => (
            "TooManyFunctions",
            "Source file defines more functions than allowed",
        ),
        RuleId::FunctionTooLong => (
            "FunctionTooLong",
            "Function body longer than allowed",
        ),
    };
    RuleInfo {
        name,
        short_description,
    }
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // Single file scan
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Build the SARIF log. Rules are listed once each, in rule order.
pub fn sarif_report(base_path: &Path, result: &DetectionResult) -> SarifReport {
    let fired: BTreeSet<RuleId> = result.violations.iter().map(|v| v.rule).collect();

    let rules = fired
        .into_iter()
        .map(|rule| {
            let info = get_rule_info(rule);
            SarifRule {
                id: rule.as_str().to_string(),
                name: info.name.to_string(),
                short_description: SarifMessage {
                    text: info.short_description.to_string(),
                },
                default_config: SarifRuleConfig {
                    level: map_severity_to_level(rule.default_severity()).to_string(),
                },
            }
        })
        .collect();

    let results = result
        .violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.rule.as_str().to_string(),
            level: map_severity_to_level(v.severity).to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&v.file, base_path),
                    },
                    region: SarifRegion {
                        start_line: v.line.max(1),
                        start_column: v.column.max(1),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &DetectionResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&sarif_report(base_path, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: Option<&str>, result: &DetectionResult, show_suppressed: bool) {
    println!();
    print!("  ");
    print!("{}", TOOL_NAME.cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", config_path.unwrap_or("(defaults)"));
    println!();

    if !result.violations.is_empty() {
        write_violations(&result.violations);
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(&result.suppressed, show_suppressed);
        println!();
    }

    write_summary(result);
    println!();
}

fn write_violations(violations: &[Violation]) {
    let mut current: Option<&str> = None;
    for v in violations {
        if current != Some(v.file.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("  {}", v.file.blue().bold());
            current = Some(v.file.as_str());
        }

        print!("    {}", format!("{:>4}:{:<3}", v.line, v.column).dimmed());
        write_severity_tag(v.severity);
        print!("{:<26}", v.rule.as_str().dimmed());
        println!("{}", v.message);
    }
    println!();
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!(" {}  ", "ERROR".red()),
        Severity::Warning => print!(" {}  ", "WARN ".yellow()),
        Severity::Info => print!(" {}  ", "INFO ".blue()),
    }
}

fn write_summary(result: &DetectionResult) {
    if result.violations.is_empty() {
        println!(
            "  {}  {} file{} checked",
            "✓ CLEAN".green(),
            result.scanned,
            plural(result.scanned)
        );
        return;
    }

    let errors = result
        .violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    let warnings = result.violations.len() - errors;

    print!("  {}", "✗ ISSUES".red());
    print!(
        "  {} error{}, {} warning{} in {} file{}",
        errors,
        plural(errors),
        warnings,
        plural(warnings),
        result.scanned,
        plural(result.scanned)
    );
    if result.suppressed_count() > 0 {
        print!(
            "  {}",
            format!("({} suppressed)", result.suppressed_count()).dimmed()
        );
    }
    println!();
    println!();

    for (rule, count) in result.counts_by_rule() {
        println!("    {:<26} {:>4}", rule.as_str(), count);
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn write_suppressed_summary(suppressed: &[SuppressedViolation], show_details: bool) {
    println!("  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        println!("    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    println!();
    for sv in suppressed {
        let v = &sv.violation;
        let s = &sv.suppression;

        print!("    {:<26}", v.rule.as_str().dimmed());
        print!("{}", v.file.blue());
        if s.suppression_type == SuppressionType::File {
            print!("{}", ":* (file)".dimmed());
        } else {
            print!("{}", format!(":{}:{}", v.line, v.column).dimmed());
        }
        println!();

        if !s.reason.is_empty() {
            println!("            {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Diagnostic, Suppression};

    fn sample() -> DetectionResult {
        let mut result = DetectionResult::new();
        result.scanned = 2;
        result.violations.push(Violation::from_diagnostic(
            "src/a.c",
            Diagnostic::new(RuleId::AssignmentInCondition, 4, 2, "assignment '=' in if condition (if)"),
        ));
        result.violations.push(Violation::from_diagnostic(
            "src/b.h",
            Diagnostic::new(RuleId::OrphanDocComment, 1, 1, "orphan"),
        ));
        result.suppressed.push(SuppressedViolation {
            violation: Violation::from_diagnostic(
                "src/a.c",
                Diagnostic::new(RuleId::MissingReturnDoc, 1, 1, "no return"),
            ),
            suppression: Suppression {
                rule: "missing-return-doc".to_string(),
                reason: "legacy".to_string(),
                file: "src/a.c".to_string(),
                line: 0,
                suppression_type: SuppressionType::File,
            },
        });
        result
    }

    #[test]
    fn test_json_report_shape() {
        let report = json_report("src", &sample());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["files_scanned"], 2);
        assert_eq!(value["suppressed_count"], 1);
        assert_eq!(value["diagnostics"][0]["rule"], "assignment-in-condition");
        assert_eq!(value["diagnostics"][0]["column"], 2);
        assert_eq!(value["diagnostics"][1]["severity"], "warning");
        assert_eq!(value["suppressed"][0]["suppression"]["type"], "file");
    }

    #[test]
    fn test_sarif_report_shape() {
        let report = sarif_report(Path::new("src"), &sample());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["version"], "2.1.0");
        let run = &value["runs"][0];
        assert_eq!(run["tool"]["driver"]["name"], "cdoclint");

        let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
        let ids: Vec<_> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["orphan-doc-comment", "assignment-in-condition"]);

        let first = &run["results"][0];
        assert_eq!(first["ruleId"], "assignment-in-condition");
        let location = &first["locations"][0]["physicalLocation"];
        assert_eq!(location["artifactLocation"]["uri"], "a.c");
        assert_eq!(location["region"]["startLine"], 4);
        assert_eq!(location["region"]["startColumn"], 2);
        assert_eq!(run["results"][1]["level"], "warning");
    }

    #[test]
    fn test_make_relative_path() {
        assert_eq!(make_relative_path("src/a.c", Path::new("src")), "a.c");
        assert_eq!(make_relative_path("src/a.c", Path::new("src/a.c")), "a.c");
        assert_eq!(make_relative_path("other/a.c", Path::new("src")), "other/a.c");
        assert_eq!(make_relative_path("a.c", Path::new("")), "a.c");
    }
}
