//! Cross-referencing documentation comments against declarations.
//!
//! For each documentation comment the rule compares the `@name:` entries
//! with the names the declaration actually has:
//!
//! - a name the declaration has more often than the comment lists is a
//!   `missing-param-doc`
//! - a documented name the declaration lacks is an `undocumented-extra-param`
//! - identical names in a different order are one `param-doc-order-mismatch`
//!
//! Value-returning functions and callable typedefs also need a `Return:`
//! section. All findings are positioned at the comment.

use std::collections::HashMap;

use crate::analysis::{bind_doc_comments, Declaration, DocComment};

use super::{Diagnostic, FileContext, Rule, RuleId};

/// Checks documentation comments against the declarations they precede.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocCrossReference;

impl Rule for DocCrossReference {
    fn name(&self) -> &'static str {
        "doc-cross-reference"
    }

    fn run(&self, ctx: &FileContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for binding in bind_doc_comments(ctx.tokens) {
            match &binding.declaration {
                Some(decl) => check_binding(&binding.comment, decl, &mut out),
                None => out.push(Diagnostic::new(
                    RuleId::OrphanDocComment,
                    binding.comment.start_line,
                    binding.comment.column,
                    format!(
                        "documentation for '{}' is not followed by a declaration",
                        binding.comment.subject_name
                    ),
                )),
            }
        }
        out
    }
}

fn check_binding(comment: &DocComment, decl: &Declaration, out: &mut Vec<Diagnostic>) {
    let at = |rule: RuleId, message: String| {
        Diagnostic::new(rule, comment.start_line, comment.column, message)
    };

    if let Some(actual) = decl.documented_names() {
        let documented = &comment.documented_params;
        let label = decl.entry_label();
        let actual_counts = counts(actual);
        let documented_counts = counts(documented);

        let mut multiset_equal = true;

        for name in first_occurrences(actual) {
            let have = documented_counts.get(name).copied().unwrap_or(0);
            if actual_counts[name] > have {
                multiset_equal = false;
                out.push(at(
                    RuleId::MissingParamDoc,
                    format!("{} '{}' of {} is not documented", label, name, decl),
                ));
            }
        }

        for name in first_occurrences(documented) {
            let have = actual_counts.get(name).copied().unwrap_or(0);
            if documented_counts[name] > have {
                multiset_equal = false;
                out.push(at(
                    RuleId::UndocumentedExtraParam,
                    format!("documented {} '{}' does not exist in {}", label, name, decl),
                ));
            }
        }

        if multiset_equal && actual != documented.as_slice() {
            out.push(at(
                RuleId::ParamDocOrderMismatch,
                format!(
                    "documented {}s of {} are out of order: expected {}",
                    label,
                    decl,
                    actual.join(", ")
                ),
            ));
        }
    }

    if decl.needs_return_doc() && !comment.has_return_section {
        out.push(at(
            RuleId::MissingReturnDoc,
            format!("{} returns a value but has no 'Return:' section", decl),
        ));
    }
}

fn counts(names: &[String]) -> HashMap<&str, usize> {
    let mut map = HashMap::new();
    for name in names {
        *map.entry(name.as_str()).or_insert(0) += 1;
    }
    map
}

/// Names in source order, each listed once.
fn first_occurrences(names: &[String]) -> Vec<&str> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name.as_str()) {
            seen.push(name.as_str());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn run(source: &str) -> Vec<Diagnostic> {
        let lexed = tokenize(source);
        DocCrossReference.run(&FileContext::new("test.c", &lexed.tokens))
    }

    fn rules(diags: &[Diagnostic]) -> Vec<RuleId> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn test_complete_documentation() {
        let diags = run(
            "/**\n * op_add - Sum\n * @arg1: A\n * @arg2: B\n *\n * Return: sum\n */\nint op_add(int arg1, int arg2)\n{\n\treturn (arg1 + arg2);\n}\n",
        );
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_missing_parameter() {
        let diags = run(
            "/**\n * op_add - Sum\n * @arg1: A\n *\n * Return: sum\n */\nint op_add(int arg1, int arg2);\n",
        );
        assert_eq!(rules(&diags), vec![RuleId::MissingParamDoc]);
        assert!(diags[0].message.contains("'arg2'"));
        assert_eq!((diags[0].line, diags[0].column), (1, 1));
    }

    #[test]
    fn test_extra_parameter() {
        let diags = run("/**\n * f - F\n * @a: A\n * @ghost: G\n */\nvoid f(int a);\n");
        assert_eq!(rules(&diags), vec![RuleId::UndocumentedExtraParam]);
        assert!(diags[0].message.contains("'ghost'"));
    }

    #[test]
    fn test_order_mismatch_reported_once() {
        let diags = run("/**\n * f - F\n * @c: C\n * @b: B\n * @a: A\n */\nvoid f(int a, int b, int c);\n");
        assert_eq!(rules(&diags), vec![RuleId::ParamDocOrderMismatch]);
    }

    #[test]
    fn test_missing_and_extra_do_not_add_order_mismatch() {
        let diags = run("/**\n * f - F\n * @b: B\n * @x: X\n */\nvoid f(int a, int b);\n");
        assert_eq!(
            rules(&diags),
            vec![RuleId::MissingParamDoc, RuleId::UndocumentedExtraParam]
        );
    }

    #[test]
    fn test_missing_return() {
        let diags = run("/**\n * get - Get\n * @s: S\n */\nchar *get(char *s);\n");
        assert_eq!(rules(&diags), vec![RuleId::MissingReturnDoc]);
    }

    #[test]
    fn test_void_return_section_optional() {
        let without = run("/**\n * put - Put\n * @c: C\n */\nvoid put(char c);\n");
        let with = run("/**\n * put - Put\n * @c: C\n *\n * Return: nothing\n */\nvoid put(char c);\n");
        assert!(without.is_empty());
        assert!(with.is_empty());
    }

    #[test]
    fn test_enum_members() {
        let diags = run(
            "/**\n * enum test - Test\n * @FIRST: 1\n * @SECOND: 2\n * @THIRD: 3\n */\nenum test\n{\n\tFIRST,\n\tSECOND,\n\tTHIRD\n};\n",
        );
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_struct_missing_member() {
        let diags = run("/**\n * struct dog - Dog\n * @name: Name\n */\nstruct dog\n{\n\tchar *name;\n\tfloat age;\n};\n");
        assert_eq!(rules(&diags), vec![RuleId::MissingParamDoc]);
        assert!(diags[0].message.starts_with("member 'age'"));
    }

    #[test]
    fn test_callable_typedef_needs_return() {
        let diags = run("/**\n * cmp_t - Compare\n * @a: A\n * @b: B\n *\n * Reurn: order\n */\ntypedef int (*cmp_t)(int a, int b);\n");
        assert_eq!(rules(&diags), vec![RuleId::MissingReturnDoc]);
    }

    #[test]
    fn test_orphan() {
        let diags = run("int x;\n/**\n * gone - Nothing follows\n */\n");
        assert_eq!(rules(&diags), vec![RuleId::OrphanDocComment]);
        assert_eq!(diags[0].line, 2);
    }

    #[test]
    fn test_duplicate_names_tolerated() {
        let diags = run("/**\n * f - F\n * @a: A\n * @a: A again\n */\nvoid f(int a, int a);\n");
        assert!(diags.is_empty());
        let diags = run("/**\n * f - F\n * @a: A\n */\nvoid f(int a, int a);\n");
        assert_eq!(rules(&diags), vec![RuleId::MissingParamDoc]);
    }
}
