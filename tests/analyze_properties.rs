//! Behavioral properties of `analyze` on small inline sources.

use cdoclint::{analyze, Analyzer, AnalyzerOptions, RuleId};
use cdoclint::detect::Limits;

fn rules(source: &str) -> Vec<RuleId> {
    analyze("inline.c", source).iter().map(|d| d.rule).collect()
}

fn in_function(body: &str) -> String {
    format!("int main(void)\n{{\n\tint i = 0;\n\n{}\n\treturn (0);\n}}\n", body)
}

#[test]
fn test_parenthesized_comparison_in_if_passes() {
    assert!(rules(&in_function("\tif ((i == 2) == 1)\n\t\treturn (1);")).is_empty());
}

#[test]
fn test_compound_assignment_in_while_reported_at_keyword() {
    let diags = analyze("inline.c", &in_function("\twhile ((i *= 2) == 1)\n\t\treturn (1);"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::AssignmentInCondition);
    assert_eq!((diags[0].line, diags[0].column), (5, 2));
}

#[test]
fn test_single_documented_parameter() {
    let source = "/**\n * op_add - Sum\n * @arg1: First\n *\n * Return: Sum\n */\nint op_add(int arg1, int arg2)\n{\n\treturn (arg1 + arg2);\n}\n";
    let diags = analyze("inline.c", source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::MissingParamDoc);
    assert!(diags[0].message.contains("arg2"));
}

#[test]
fn test_documented_enum_passes() {
    let source = "/**\n * enum test - Ordinals\n * @FIRST: One\n * @SECOND: Two\n * @THIRD: Three\n */\nenum test\n{\n\tFIRST,\n\tSECOND,\n\tTHIRD\n};\n";
    assert!(rules(source).is_empty());
}

#[test]
fn test_for_loop_only_condition_clause_counts() {
    let diags = analyze(
        "inline.c",
        &in_function("\tfor (i = 10; (i = 0) == 1; i = i + 1)\n\t\treturn (1);"),
    );
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::AssignmentInCondition);
    assert!(diags[0].message.contains("for-condition"));
}

#[test]
fn test_extra_parentheses_never_change_the_count() {
    for wrapped in [
        "(i = 1)",
        "((i = 1))",
        "(((i = 1)) == 2)",
        "((i <<= 1) == ((2)))",
        "(1 == ((i ^= 1)))",
    ] {
        let body = format!("\tif ({})\n\t\treturn (1);", wrapped);
        assert_eq!(
            rules(&in_function(&body)),
            vec![RuleId::AssignmentInCondition],
            "{}",
            wrapped
        );
    }
    for clean in ["(i == 1)", "((i == 1))", "((i << 1) >= ((2)))", "(!(i != 1))"] {
        let body = format!("\tif ({})\n\t\treturn (1);", clean);
        assert!(rules(&in_function(&body)).is_empty(), "{}", clean);
    }
}

#[test]
fn test_swapping_param_entries_adds_one_order_mismatch() {
    let ordered = "/**\n * mix - Mix\n * @a: A\n * @b: B\n * @c: C\n *\n * Return: Mix\n */\nint mix(int a, int b, int c);\n";
    let swapped = "/**\n * mix - Mix\n * @b: B\n * @a: A\n * @c: C\n *\n * Return: Mix\n */\nint mix(int a, int b, int c);\n";
    assert!(rules(ordered).is_empty());
    assert_eq!(rules(swapped), vec![RuleId::ParamDocOrderMismatch]);
}

#[test]
fn test_analysis_is_repeatable() {
    let source = "/**\n * f - F\n * @x: X\n */\nint f(int y)\n{\n\twhile ((y = y - 1))\n\t\t;\n\treturn (y);\n}\n/* open";
    let first = analyze("r.c", source);
    assert!(!first.is_empty());
    for _ in 0..3 {
        assert_eq!(analyze("r.c", source), first);
    }
}

#[test]
fn test_output_is_position_ordered() {
    let source = "int g(void)\n{\n\tif ((a = 1))\n\t\t;\n}\n/**\n * lost - Nothing\n */\n/**\n * h - H\n */\nint h(int z);\n";
    let diags = analyze("o.c", source);
    let positions: Vec<_> = diags.iter().map(|d| (d.line, d.column)).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
    assert_eq!(
        diags.iter().map(|d| d.rule).collect::<Vec<_>>(),
        vec![
            RuleId::AssignmentInCondition,
            RuleId::OrphanDocComment,
            RuleId::MissingParamDoc,
            RuleId::MissingReturnDoc
        ]
    );
}

#[test]
fn test_literals_and_comments_hide_structure() {
    let source = in_function(
        "\tputs(\"if ((i = 1)) { /* */\");\n\t/* while ((i = 2)) */\n\t// for (;(i = 3);)\n\tc = '(';",
    );
    assert!(rules(&source).is_empty());
}

#[test]
fn test_malformed_input_never_panics() {
    for source in [
        "",
        "/**",
        "\"",
        "'",
        "if (",
        "/**\n * f - F\n */\nint f(",
        "typedef struct {",
        "}}}}",
        "#define X \\\n",
        "int (*(*f)(int))(",
        "else if ((((",
    ] {
        let _ = analyze("m.c", source);
    }
}

#[test]
fn test_metrics_only_with_limits() {
    let body: String = (0..40).map(|n| format!("\tn += {};\n", n)).collect();
    let source = format!("void big(void)\n{{\n\tint n = 0;\n{}}}\n", body);

    assert!(analyze("big.c", &source).is_empty());

    let analyzer = Analyzer::new(&AnalyzerOptions {
        limits: Some(Limits::default()),
    });
    let diags = analyzer.analyze("big.c", &source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::FunctionTooLong);
}

#[test]
fn test_doc_comment_inside_body_is_orphan_not_call_signature() {
    let source = "int f(int x)\n{\n\t/**\n\t * helper - call\n\t */\n\thelper(x);\n\treturn (x);\n}\n";
    let diags = analyze("body.c", source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::OrphanDocComment);
    assert_eq!((diags[0].line, diags[0].column), (3, 2));
}

#[test]
fn test_attributed_struct_is_documented() {
    let source = "/**\n * struct s - S\n * @a: A\n */\nstruct __attribute__((packed)) s {\n\tint a;\n};\n";
    assert!(rules(source).is_empty());
}

#[test]
fn test_anonymous_union_members_can_be_documented() {
    let source = "/**\n * struct value - V\n * @a: A\n * @b: B\n * @c: C\n */\nstruct value\n{\n\tint a;\n\tunion\n\t{\n\t\tint b;\n\t\tfloat c;\n\t};\n};\n";
    assert!(rules(source).is_empty());
}

#[test]
fn test_variable_documentation_stays_with_variable() {
    let source = "/**\n * counter - Calls so far\n */\nint counter;\n\nint f(int a);\n";
    assert_eq!(rules(source), vec![RuleId::OrphanDocComment]);
}

#[test]
fn test_directive_after_comment_is_not_code() {
    assert!(rules("/* x */ #define Y if (a = 1)\n").is_empty());
}
