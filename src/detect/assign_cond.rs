//! Assignment inside a tested condition.
//!
//! Every operator token between the parentheses of a control construct is
//! checked against the assignment lexemes. Nesting depth does not matter:
//! `((i *= 2) == 1)` is flagged, `((i == 2) == 1)` is not. The tokenizer's
//! longest-match rule already keeps `==`, `<=` and `<<` apart from `=` and
//! `<<=`, so the check is plain lexeme membership.

use crate::analysis::{conditional_spans, ConditionalSpan};
use crate::lexer::Token;

use super::{Diagnostic, FileContext, Rule, RuleId};

/// Flags control constructs whose condition assigns.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentInCondition;

impl Rule for AssignmentInCondition {
    fn name(&self) -> &'static str {
        "assignment-in-condition"
    }

    fn run(&self, ctx: &FileContext<'_>) -> Vec<Diagnostic> {
        let found = conditional_spans(ctx.tokens);
        let mut out = Vec::new();

        for span in &found.spans {
            if let Some(op) = first_assignment(ctx.tokens, span) {
                out.push(Diagnostic::new(
                    RuleId::AssignmentInCondition,
                    span.line,
                    span.column,
                    format!(
                        "assignment '{}' in {} condition ({})",
                        op.text,
                        span.kind.keyword(),
                        span.kind
                    ),
                ));
            }
        }

        for construct in &found.unbalanced {
            out.push(Diagnostic::new(
                RuleId::UnbalancedCondition,
                construct.line,
                construct.column,
                format!(
                    "{} condition is never closed",
                    construct.kind.keyword()
                ),
            ));
        }

        out
    }
}

fn first_assignment<'t>(tokens: &'t [Token], span: &ConditionalSpan) -> Option<&'t Token> {
    tokens[span.range.clone()]
        .iter()
        .find(|t| t.is_assignment_operator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn run(body: &str) -> Vec<Diagnostic> {
        let source = format!("void f(void)\n{{\n{}\n}}\n", body);
        let lexed = tokenize(&source);
        AssignmentInCondition.run(&FileContext::new("t.c", &lexed.tokens))
    }

    #[test]
    fn test_comparison_wrapped_in_parens_passes() {
        assert!(run("\tif ((i == 2) == 1)\n\t\treturn;").is_empty());
    }

    #[test]
    fn test_compound_assignment_wrapped_in_parens_flags() {
        let diags = run("\twhile ((i *= 2) == 1)\n\t\t;");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, RuleId::AssignmentInCondition);
        assert_eq!((diags[0].line, diags[0].column), (3, 2));
        assert!(diags[0].message.contains("while"));
    }

    #[test]
    fn test_one_diagnostic_per_construct() {
        let diags = run("\tif ((a = 1) && (b = 2))\n\t\treturn;");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_for_init_and_step_exempt() {
        let diags = run("\tfor (i = 10; (i = 0) == 1; i = i + 1)\n\t\t;");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("for-condition"));
        assert!(run("\tfor (i = 0; i < 10; i += 1)\n\t\t;").is_empty());
    }

    #[test]
    fn test_else_if_and_switch() {
        let diags = run("\tif (a)\n\t\t;\n\telse if ((b <<= 1) == 2)\n\t\t;\n\tswitch (c = d)\n\t{\n\t}");
        assert_eq!(diags.len(), 2);
        assert!(diags[0].message.contains("else if"));
        assert_eq!((diags[0].line, diags[0].column), (5, 2));
        assert!(diags[1].message.contains("switch"));
    }

    #[test]
    fn test_relational_and_shift_operators_pass() {
        assert!(run("\tif (a <= b || a >= c || a != d || (a << 1) < e)\n\t\t;").is_empty());
    }

    #[test]
    fn test_unbalanced_condition() {
        let diags = run("\tif ((i = 1)\n\t\treturn;");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, RuleId::UnbalancedCondition);
    }
}
