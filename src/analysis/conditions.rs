//! Locating the expressions tested by control constructs.

use super::{ConditionalSpan, ConstructKind, UnbalancedConstruct};
use crate::lexer::{Token, TokenKind};

/// Conditional spans found in a file.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    pub spans: Vec<ConditionalSpan>,
    pub unbalanced: Vec<UnbalancedConstruct>,
}

/// Collect the tested span of every `if`, `else if`, `while`, `for` and
/// `switch` in the token stream.
///
/// For `for` only the middle clause is returned; a `for` header without two
/// top-level semicolons yields no span.
pub fn conditional_spans(tokens: &[Token]) -> Conditions {
    let significant: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_significant())
        .map(|(i, _)| i)
        .collect();

    let mut out = Conditions::default();

    for (pos, &index) in significant.iter().enumerate() {
        let tok = &tokens[index];
        if tok.kind != TokenKind::Keyword {
            continue;
        }

        let (kind, anchor) = match tok.text.as_str() {
            "if" => {
                let after_else = pos
                    .checked_sub(1)
                    .map(|p| &tokens[significant[p]])
                    .filter(|prev| prev.is_keyword("else"));
                match after_else {
                    Some(else_tok) => (ConstructKind::ElseIf, else_tok),
                    None => (ConstructKind::If, tok),
                }
            }
            "while" => (ConstructKind::While, tok),
            "for" => (ConstructKind::ForCondition, tok),
            "switch" => (ConstructKind::Switch, tok),
            _ => continue,
        };

        let Some(&open) = significant.get(pos + 1) else {
            continue;
        };
        if !tokens[open].is_punct("(") {
            continue;
        }

        let Some(close) = matching_paren(tokens, &significant[pos + 1..]) else {
            out.unbalanced.push(UnbalancedConstruct {
                kind,
                line: anchor.line,
                column: anchor.column,
            });
            continue;
        };

        let range = if kind == ConstructKind::ForCondition {
            match for_condition_clause(tokens, open + 1, close) {
                Some(range) => range,
                None => continue,
            }
        } else {
            open + 1..close
        };

        out.spans.push(ConditionalSpan {
            kind,
            line: anchor.line,
            column: anchor.column,
            range,
        });
    }

    out
}

/// Token index of the `)` matching the `(` at `significant[0]`.
fn matching_paren(tokens: &[Token], significant: &[usize]) -> Option<usize> {
    let mut depth = 0usize;
    for &i in significant {
        let tok = &tokens[i];
        if tok.is_punct("(") {
            depth += 1;
        } else if tok.is_punct(")") {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// The tokens between the first and second top-level `;` of a `for` header.
fn for_condition_clause(
    tokens: &[Token],
    start: usize,
    end: usize,
) -> Option<std::ops::Range<usize>> {
    let mut depth = 0usize;
    let mut semicolons = Vec::with_capacity(2);
    for (i, tok) in tokens.iter().enumerate().take(end).skip(start) {
        if tok.is_punct("(") {
            depth += 1;
        } else if tok.is_punct(")") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && tok.is_punct(";") {
            semicolons.push(i);
            if semicolons.len() == 2 {
                break;
            }
        }
    }
    match semicolons.as_slice() {
        [first, second] => Some(first + 1..*second),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn span_text(tokens: &[Token], span: &ConditionalSpan) -> String {
        tokens[span.range.clone()]
            .iter()
            .filter(|t| t.is_significant())
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_if_span() {
        let lexed = tokenize("int f(void)\n{\n\tif ((i = 0) == 1)\n\t\treturn (1);\n}\n");
        let found = conditional_spans(&lexed.tokens);
        assert_eq!(found.spans.len(), 1);
        let span = &found.spans[0];
        assert_eq!(span.kind, ConstructKind::If);
        assert_eq!((span.line, span.column), (3, 2));
        assert_eq!(span_text(&lexed.tokens, span), "( i = 0 ) == 1");
    }

    #[test]
    fn test_else_if_anchor() {
        let lexed = tokenize("if (a)\n\tx();\nelse if (b)\n\ty();\n");
        let found = conditional_spans(&lexed.tokens);
        assert_eq!(found.spans.len(), 2);
        assert_eq!(found.spans[1].kind, ConstructKind::ElseIf);
        assert_eq!((found.spans[1].line, found.spans[1].column), (3, 1));
    }

    #[test]
    fn test_else_if_across_comment() {
        let lexed = tokenize("if (a)\n\tx();\n/* note */\nelse /* why */ if (b)\n\ty();\n");
        let found = conditional_spans(&lexed.tokens);
        assert_eq!(found.spans[1].kind, ConstructKind::ElseIf);
    }

    #[test]
    fn test_for_middle_clause() {
        let lexed = tokenize("for (i = 10; (i = 0) == 1; i = i + 1)\n\t;\n");
        let found = conditional_spans(&lexed.tokens);
        assert_eq!(found.spans.len(), 1);
        assert_eq!(found.spans[0].kind, ConstructKind::ForCondition);
        assert_eq!(span_text(&lexed.tokens, &found.spans[0]), "( i = 0 ) == 1");
    }

    #[test]
    fn test_for_empty_condition() {
        let lexed = tokenize("for (;;)\n\tbreak;\n");
        let found = conditional_spans(&lexed.tokens);
        assert_eq!(found.spans.len(), 1);
        assert!(span_text(&lexed.tokens, &found.spans[0]).is_empty());
    }

    #[test]
    fn test_for_without_clauses() {
        let lexed = tokenize("for (each_item(list))\n\tgo();\n");
        assert!(conditional_spans(&lexed.tokens).spans.is_empty());
    }

    #[test]
    fn test_switch_and_do_while() {
        let lexed = tokenize("switch (c)\n{\n}\ndo {\n} while (n--);\n");
        let found = conditional_spans(&lexed.tokens);
        let kinds: Vec<_> = found.spans.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ConstructKind::Switch, ConstructKind::While]);
    }

    #[test]
    fn test_unbalanced() {
        let lexed = tokenize("while ((i = 0) == 1\n");
        let found = conditional_spans(&lexed.tokens);
        assert!(found.spans.is_empty());
        assert_eq!(found.unbalanced.len(), 1);
        assert_eq!(found.unbalanced[0].kind, ConstructKind::While);
    }

    #[test]
    fn test_keywords_in_literals_and_directives_ignored() {
        let lexed = tokenize("#define LOOP while (x = 1)\ns = \"if (a = b)\";\n");
        let found = conditional_spans(&lexed.tokens);
        assert!(found.spans.is_empty());
        assert!(found.unbalanced.is_empty());
    }
}
