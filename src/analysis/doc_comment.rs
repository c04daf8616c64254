//! Documentation comment extraction.
//!
//! A documentation comment opens with `/**`, its first non-blank line is a
//! header `name - description`, and it may list `@name: text` entries and a
//! `Return:` section:
//!
//! ```text
//! /**
//!  * op_add - Do a sum
//!  * @arg1: First operand
//!  * @arg2: Second operand
//!  *
//!  * Return: Sum of two operands
//!  */
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::DocComment;
use crate::lexer::{Token, TokenKind};

lazy_static! {
    /// `name - description`, optionally `struct name - ...` or `name() - ...`.
    static ref HEADER: Regex = Regex::new(
        r"^(?:(struct|union|enum|typedef)\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*(?:\(\s*\))?\s+-(?:\s+.*)?$"
    ).unwrap();

    /// `@name: text`; `@...:` documents variadic arguments.
    static ref PARAM: Regex = Regex::new(
        r"^@([A-Za-z_][A-Za-z0-9_]*|\.\.\.)\s*:"
    ).unwrap();
}

/// Strip comment decoration from each line: the opening `/**`, the closing
/// `*/` and leading `*` gutters.
fn content_lines(text: &str) -> Vec<&str> {
    let body = text.strip_prefix("/*").unwrap_or(text);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .collect()
}

/// Parse one token as a documentation comment.
///
/// Returns `None` for anything that is not a `/**` block comment with a
/// header line.
pub fn parse_doc_comment(token: &Token, token_index: usize) -> Option<DocComment> {
    if token.kind != TokenKind::BlockComment || !token.text.starts_with("/**") {
        return None;
    }
    // `/**/` is an empty plain comment
    if token.text == "/**/" {
        return None;
    }

    let lines = content_lines(&token.text);
    let mut rest = lines.iter().skip_while(|l| l.is_empty());
    let header = rest.next()?;
    let caps = HEADER.captures(header)?;

    let mut documented_params = Vec::new();
    let mut has_return_section = false;
    for line in rest {
        if let Some(param) = PARAM.captures(line) {
            documented_params.push(param[1].to_string());
        } else if line.starts_with("Return:") {
            has_return_section = true;
        }
    }

    Some(DocComment {
        subject_name: caps[2].to_string(),
        subject_keyword: caps.get(1).map(|m| m.as_str().to_string()),
        documented_params,
        has_return_section,
        start_line: token.line,
        end_line: token.end_line(),
        column: token.column,
        token_index,
    })
}

/// Find every documentation comment in a token stream.
pub fn extract_doc_comments(tokens: &[Token]) -> Vec<DocComment> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| parse_doc_comment(t, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(text: &str) -> Option<DocComment> {
        let token = Token::new(TokenKind::BlockComment, text, 1, 1);
        parse_doc_comment(&token, 0)
    }

    #[test]
    fn test_function_doc() {
        let doc = parse(
            "/**\n * op_add - Do a sum\n * @arg1: First operand\n * @arg2: Second operand\n *\n * Return: Sum of two operands\n */",
        )
        .unwrap();
        assert_eq!(doc.subject_name, "op_add");
        assert_eq!(doc.subject_keyword, None);
        assert_eq!(doc.documented_params, vec!["arg1", "arg2"]);
        assert!(doc.has_return_section);
        assert_eq!(doc.end_line, 7);
    }

    #[test]
    fn test_keyword_header() {
        let doc = parse("/**\n * struct dog - A Dog structure\n *\n * @name: Name\n */").unwrap();
        assert_eq!(doc.subject_name, "dog");
        assert_eq!(doc.subject_keyword.as_deref(), Some("struct"));
        assert!(!doc.has_return_section);
    }

    #[test]
    fn test_parenthesized_name_and_blank_lines() {
        let doc = parse("/**\n *\n * get_op_func() - Get operator\n *\n * @s: The operator\n */").unwrap();
        assert_eq!(doc.subject_name, "get_op_func");
        assert_eq!(doc.documented_params, vec!["s"]);
    }

    #[test]
    fn test_misspelled_return_is_not_a_section() {
        let doc = parse("/**\n * cmp_t - Compare\n * @a: A\n *\n * Reurn: order\n */").unwrap();
        assert!(!doc.has_return_section);
    }

    #[test]
    fn test_variadic_entry() {
        let doc = parse("/**\n * log_msg - Log\n * @fmt: Format\n * @...: Arguments\n */").unwrap();
        assert_eq!(doc.documented_params, vec!["fmt", "..."]);
    }

    #[test]
    fn test_not_documentation() {
        assert!(parse("/* op_add - plain comment */").is_none());
        assert!(parse("/**\n * Just some prose about things\n */").is_none());
        assert!(parse("/**/").is_none());
        assert!(parse("/** ----- */").is_none());
    }

    #[test]
    fn test_single_line_doc() {
        let doc = parse("/** helper - Does a thing */").unwrap();
        assert_eq!(doc.subject_name, "helper");
        assert!(doc.documented_params.is_empty());
    }

    #[test]
    fn test_extract_from_tokens() {
        let lexed = tokenize(
            "/* plain */\n/**\n * f - F\n * @x: X\n */\nint f(int x);\n",
        );
        let docs = extract_doc_comments(&lexed.tokens);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].start_line, 2);
        assert_eq!(lexed.tokens[docs[0].token_index].kind, TokenKind::BlockComment);
    }
}
