//! Function count and function length limits.
//!
//! Only `.c` files are measured; headers hold prototypes, not bodies.

use serde::{Deserialize, Serialize};

use crate::analysis::function_definitions;

use super::{Diagnostic, FileContext, Rule, RuleId};

/// Thresholds for the metrics rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum function definitions per source file (default: 5)
    pub max_functions_per_file: usize,
    /// Maximum lines strictly between a body's braces (default: 25)
    pub max_function_lines: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_functions_per_file: 5,
            max_function_lines: 25,
        }
    }
}

/// Flags files with too many functions and functions with too many lines.
#[derive(Debug, Clone, Copy)]
pub struct FunctionMetrics {
    limits: Limits,
}

impl FunctionMetrics {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }
}

impl Rule for FunctionMetrics {
    fn name(&self) -> &'static str {
        "function-metrics"
    }

    fn run(&self, ctx: &FileContext<'_>) -> Vec<Diagnostic> {
        if !ctx.is_source_file() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let defs = function_definitions(ctx.tokens);

        for (i, def) in defs.iter().enumerate() {
            if i >= self.limits.max_functions_per_file {
                out.push(Diagnostic::new(
                    RuleId::TooManyFunctions,
                    def.open_line,
                    def.open_column,
                    format!(
                        "more than {} functions in the file ('{}' is number {})",
                        self.limits.max_functions_per_file,
                        def.name,
                        i + 1
                    ),
                ));
            }

            let body_lines = def.close_line.saturating_sub(def.open_line + 1);
            if body_lines > self.limits.max_function_lines {
                out.push(Diagnostic::new(
                    RuleId::FunctionTooLong,
                    def.open_line + self.limits.max_function_lines + 1,
                    1,
                    format!(
                        "function '{}' has {} lines (max {})",
                        def.name, body_lines, self.limits.max_function_lines
                    ),
                ));
            }
        }

        out
    }
}
