//! Declaration signature building.
//!
//! Works on top-level statements rather than a full grammar: a statement
//! runs to a `;` outside any brackets, or, for a function definition, to the
//! `{` that opens the body (the body is skipped as a unit). Each statement
//! is then classified into the minimal [`Declaration`] shape needed for doc
//! comment matching.

use std::collections::BTreeSet;

use super::{
    AggregateDecl, AggregateKind, Declaration, EnumDecl, FunctionDecl, TypedefDecl,
    TypedefTarget,
};
use crate::lexer::{Token, TokenKind};

/// Specifiers that may precede a declaration without changing its shape.
const LEADING_SPECIFIERS: &[&str] = &[
    "static", "extern", "inline", "__inline", "__inline__", "const", "volatile",
    "register", "_Thread_local", "_Noreturn",
];

/// One top-level statement.
#[derive(Debug, Clone)]
pub struct Statement<'a> {
    /// Significant tokens; for a function definition only the head.
    pub tokens: Vec<&'a Token>,
    /// Token indices of the `{` and `}` of a function body.
    pub body: Option<(usize, usize)>,
    /// Token index right after the statement.
    pub next: usize,
}

/// Result of advancing a [`StatementCursor`].
#[derive(Debug)]
pub enum Step<'a> {
    Statement(Statement<'a>),
    /// A barrier token (a documentation comment) was reached before any
    /// statement started.
    Barrier(usize),
    /// A `}` closing the scope the cursor started in.
    ScopeEnd(usize),
    End,
}

/// Forward-only cursor over the top-level statements of a token stream.
pub struct StatementCursor<'a, 'b> {
    tokens: &'a [Token],
    pos: usize,
    barriers: &'b BTreeSet<usize>,
}

impl<'a, 'b> StatementCursor<'a, 'b> {
    pub fn new(tokens: &'a [Token], start: usize, barriers: &'b BTreeSet<usize>) -> Self {
        Self {
            tokens,
            pos: start,
            barriers,
        }
    }

    pub fn step(&mut self) -> Step<'a> {
        let tokens = self.tokens;
        let mut collected: Vec<&'a Token> = Vec::new();
        let mut paren = 0usize;
        let mut brace = 0usize;
        let mut i = self.pos;

        while i < tokens.len() {
            let tok = &tokens[i];

            if !tok.is_significant() {
                if collected.is_empty() && self.barriers.contains(&i) {
                    self.pos = i + 1;
                    return Step::Barrier(i);
                }
                i += 1;
                continue;
            }

            if tok.kind == TokenKind::Punctuator {
                match tok.text.as_str() {
                    "(" => paren += 1,
                    ")" => paren = paren.saturating_sub(1),
                    "{" if paren == 0 && brace == 0 && is_function_head(&collected) => {
                        let close = matching_brace(tokens, i);
                        self.pos = (close + 1).min(tokens.len());
                        return Step::Statement(Statement {
                            tokens: collected,
                            body: Some((i, close)),
                            next: self.pos,
                        });
                    }
                    "{" => brace += 1,
                    "}" if brace == 0 => {
                        if collected.is_empty() {
                            self.pos = i + 1;
                            return Step::ScopeEnd(i);
                        }
                        // The brace itself is reported by the next step
                        self.pos = i;
                        return Step::Statement(Statement {
                            tokens: collected,
                            body: None,
                            next: i,
                        });
                    }
                    "}" => brace -= 1,
                    ";" if paren == 0 && brace == 0 => {
                        collected.push(tok);
                        self.pos = i + 1;
                        return Step::Statement(Statement {
                            tokens: collected,
                            body: None,
                            next: self.pos,
                        });
                    }
                    _ => {}
                }
            }
            collected.push(tok);
            i += 1;
        }

        self.pos = tokens.len();
        if collected.is_empty() {
            Step::End
        } else {
            Step::Statement(Statement {
                tokens: collected,
                body: None,
                next: self.pos,
            })
        }
    }
}

/// Index of the `}` matching the `{` at `open`, or the last token index
/// when the input ends first.
fn matching_brace(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        if tok.is_punct("{") {
            depth += 1;
        } else if tok.is_punct("}") {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    tokens.len().saturating_sub(1)
}

/// Words introducing a parenthesized attribute group that says nothing
/// about the declaration's shape.
const ATTRIBUTE_WORDS: &[&str] = &["__attribute__", "__attribute", "__declspec"];

/// Keywords that open a statement rather than a declaration.
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "if", "else", "while", "for", "do", "switch", "case", "default", "goto",
    "break", "continue", "sizeof", "_Alignof", "_Generic", "_Static_assert",
];

/// Drop `__attribute__((...))` and `__declspec(...)` groups.
fn strip_attributes<'a>(tokens: &[&'a Token]) -> Vec<&'a Token> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];
        if tok.is_identifier() && ATTRIBUTE_WORDS.contains(&tok.text.as_str()) {
            i = if tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) {
                matching_close(tokens, i + 1).map_or(tokens.len(), |close| close + 1)
            } else {
                i + 1
            };
            continue;
        }
        kept.push(tok);
        i += 1;
    }
    kept
}

/// Whether the tokens before a declarator name can only be a type:
/// specifiers, type names, `*` and the `(` of a nested declarator, with at
/// least one of them naming a type. `helper` in `helper(x);` has no type.
fn is_type_prefix(prefix: &[&Token]) -> bool {
    let shaped = prefix.iter().all(|t| match t.kind {
        TokenKind::Identifier => true,
        TokenKind::Keyword => !STATEMENT_KEYWORDS.contains(&t.text.as_str()),
        TokenKind::Punctuator => t.is_punct("*") || t.is_punct("("),
        _ => false,
    });
    shaped
        && prefix.iter().any(|t| {
            t.is_identifier()
                || (t.kind == TokenKind::Keyword && !LEADING_SPECIFIERS.contains(&t.text.as_str()))
        })
}

/// A head like `int f(int a)` or `int (*get(char *s))(int, int)`.
fn is_function_head(head: &[&Token]) -> bool {
    let head = strip_attributes(head);
    let head = head.as_slice();
    let Some(last) = head.last() else {
        return false;
    };
    if !last.is_punct(")") && !is_attribute_tail(head) {
        return false;
    }
    if head.first().is_some_and(|t| t.is_keyword("typedef")) {
        return false;
    }
    if depth_zero_position(head, |t| t.is_punct("=")).is_some() {
        return false;
    }
    function_name_index(head).is_some()
}

/// Annotation macros after the parameter list, e.g. `int f(void) __THROW`.
fn is_attribute_tail(head: &[&Token]) -> bool {
    head.last()
        .is_some_and(|t| t.is_identifier() && t.text.starts_with("__"))
        && head.iter().any(|t| t.is_punct(")"))
}

/// First identifier immediately followed by `(`, scanning only the part of
/// the statement before any initializer.
fn function_name_index(tokens: &[&Token]) -> Option<usize> {
    let limit = depth_zero_position(tokens, |t| t.is_punct("=")).unwrap_or(tokens.len());
    (0..limit.saturating_sub(1))
        .find(|&i| tokens[i].is_identifier() && tokens[i + 1].is_punct("("))
}

/// Position of the first token at bracket depth zero satisfying `pred`.
fn depth_zero_position(tokens: &[&Token], pred: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::Punctuator {
            match tok.text.as_str() {
                "(" | "[" | "{" => {
                    depth += 1;
                    continue;
                }
                ")" | "]" | "}" => {
                    depth -= 1;
                    continue;
                }
                _ => {}
            }
        }
        if depth == 0 && pred(tok) {
            return Some(i);
        }
    }
    None
}

/// First `(` that is not inside braces or square brackets.
fn first_paren_outside_braces(tokens: &[&Token]) -> Option<usize> {
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != TokenKind::Punctuator {
            continue;
        }
        match tok.text.as_str() {
            "(" if depth == 0 => return Some(i),
            "[" | "{" => depth += 1,
            "]" | "}" => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Index of the closer matching the opener at `open` within a token slice.
fn matching_close(tokens: &[&Token], open: usize) -> Option<usize> {
    let (opener, closer) = match tokens.get(open)?.text.as_str() {
        "(" => ("(", ")"),
        "[" => ("[", "]"),
        "{" => ("{", "}"),
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        if tok.is_punct(opener) {
            depth += 1;
        } else if tok.is_punct(closer) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split a token slice on a separator that sits at bracket depth zero.
fn split_top_level<'t, 'a>(tokens: &'t [&'a Token], separator: &str) -> Vec<&'t [&'a Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != TokenKind::Punctuator {
            continue;
        }
        match tok.text.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth -= 1,
            s if s == separator && depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Name introduced by one declarator, with its type prefix still attached.
///
/// `char *name` gives `name`, `char rgba[4]` gives `rgba`, `int (*cb)(int)`
/// gives `cb`, `unsigned flag : 1` gives `flag`. Abstract declarators such
/// as `char *` have no name.
pub fn declarator_name(tokens: &[&Token]) -> Option<String> {
    let end = depth_zero_position(tokens, |t| t.is_punct("=") || t.is_punct(":"))
        .unwrap_or(tokens.len());
    let tokens = &tokens[..end];

    // `( * name )` form: function pointers and pointers to arrays
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.is_punct("(") {
            if depth == 0
                && tokens
                    .get(i + 1)
                    .is_some_and(|n| n.is_punct("*") || n.is_punct("^"))
            {
                let close = matching_close(tokens, i).unwrap_or(tokens.len());
                if let Some(name) = tokens[i + 1..close].iter().find(|t| t.is_identifier()) {
                    return Some(name.text.clone());
                }
            }
            depth += 1;
        } else if tok.is_punct(")") {
            depth -= 1;
        }
    }

    let mut depth = 0i32;
    let mut name = None;
    for tok in tokens {
        if tok.kind == TokenKind::Punctuator {
            match tok.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth -= 1,
                _ => {}
            }
        } else if depth == 0 && tok.is_identifier() {
            name = Some(tok.text.clone());
        }
    }
    name
}

/// Parameter names from the tokens between a parameter list's parentheses.
pub fn parameter_names(inner: &[&Token]) -> Vec<String> {
    if inner.is_empty() || (inner.len() == 1 && inner[0].is_keyword("void")) {
        return Vec::new();
    }
    split_top_level(inner, ",")
        .into_iter()
        .filter_map(|param| {
            if param.len() == 1 && param[0].is_punct("...") {
                Some("...".to_string())
            } else {
                declarator_name(param)
            }
        })
        .collect()
}

/// Member names from the tokens between a struct/union's braces. Members
/// of an anonymous struct or union are members of the enclosing one.
fn member_names(inner: &[&Token]) -> Vec<String> {
    let stripped = strip_attributes(inner);
    let mut names = Vec::new();
    for decl in split_top_level(&stripped, ";") {
        if decl.is_empty() {
            continue;
        }
        match anonymous_member_body(decl) {
            Some(body) => names.extend(member_names(body)),
            None => names.extend(split_top_level(decl, ",").into_iter().filter_map(declarator_name)),
        }
    }
    names
}

/// Body of `struct { ... }` or `union { ... }` used as a member with no
/// tag and no declarator.
fn anonymous_member_body<'t, 'a>(decl: &'t [&'a Token]) -> Option<&'t [&'a Token]> {
    let at = skip_specifiers(decl);
    match aggregate_at(decl, at)? {
        (AggregateKind::Struct | AggregateKind::Union, None, Some(body))
            if at + body.len() + 2 == decl.len() - 1 =>
        {
            Some(body)
        }
        _ => None,
    }
}

/// Enumerator names from the tokens between an enum's braces.
fn enumerator_names(inner: &[&Token]) -> Vec<String> {
    split_top_level(inner, ",")
        .into_iter()
        .filter_map(|item| item.first().filter(|t| t.is_identifier()))
        .map(|t| t.text.clone())
        .collect()
}

fn skip_specifiers(tokens: &[&Token]) -> usize {
    tokens
        .iter()
        .take_while(|t| t.kind == TokenKind::Keyword && LEADING_SPECIFIERS.contains(&t.text.as_str()))
        .count()
}

/// A return type is "void" when nothing but specifiers and `void` precede
/// the declarator.
fn returns_value(prefix: &[&Token]) -> bool {
    if prefix.iter().any(|t| t.is_punct("(")) {
        // Returns a function pointer
        return true;
    }
    let rest: Vec<_> = prefix
        .iter()
        .filter(|t| !(t.kind == TokenKind::Keyword && LEADING_SPECIFIERS.contains(&t.text.as_str())))
        .collect();
    !(rest.len() == 1 && rest[0].is_keyword("void"))
}

/// `struct tag { ... }` starting at `at`; returns kind, tag and, when a body
/// follows, the body's inner tokens.
fn aggregate_at<'t, 'a>(
    tokens: &'t [&'a Token],
    at: usize,
) -> Option<(AggregateKind, Option<String>, Option<&'t [&'a Token]>)> {
    let head = tokens.get(at)?;
    if head.kind != TokenKind::Keyword {
        return None;
    }
    let kind = AggregateKind::from_keyword(&head.text)?;
    let mut i = at + 1;
    let tag = match tokens.get(i) {
        Some(t) if t.is_identifier() => {
            i += 1;
            Some(t.text.clone())
        }
        _ => None,
    };
    let body = match tokens.get(i) {
        Some(t) if t.is_punct("{") => {
            let close = matching_close(tokens, i).unwrap_or(tokens.len());
            Some(&tokens[i + 1..close])
        }
        _ => None,
    };
    Some((kind, tag, body))
}

/// Classify one top-level statement.
pub fn classify(statement: &Statement<'_>) -> Option<Declaration> {
    let stripped = strip_attributes(&statement.tokens);
    let tokens = stripped.as_slice();
    let first = tokens.first()?;
    let start_line = first.line;

    if first.is_keyword("typedef") {
        return classify_typedef(&tokens[1..], start_line);
    }

    let at = skip_specifiers(tokens);
    if let Some((kind, tag, Some(body))) = aggregate_at(tokens, at) {
        return Some(match kind {
            AggregateKind::Enum => Declaration::Enum(EnumDecl {
                name: tag,
                start_line,
                enumerator_names: enumerator_names(body),
            }),
            AggregateKind::Struct => Declaration::Struct(AggregateDecl {
                name: tag,
                start_line,
                member_names: member_names(body),
            }),
            AggregateKind::Union => Declaration::Union(AggregateDecl {
                name: tag,
                start_line,
                member_names: member_names(body),
            }),
        });
    }

    let name_at = function_name_index(tokens)?;
    if !is_type_prefix(&tokens[..name_at]) {
        return None;
    }
    let close = matching_close(tokens, name_at + 1)?;
    Some(Declaration::Function(FunctionDecl {
        name: tokens[name_at].text.clone(),
        start_line,
        parameter_names: parameter_names(&tokens[name_at + 2..close]),
        returns_value: returns_value(&tokens[..name_at]),
    }))
}

fn classify_typedef(tokens: &[&Token], start_line: usize) -> Option<Declaration> {
    let at = skip_specifiers(tokens);

    // Callable alias: `ret (*alias)(params)` or `ret alias(params)`
    if let Some(open) = first_paren_outside_braces(tokens) {
        let pointer_form = tokens
            .get(open + 1)
            .is_some_and(|t| t.is_punct("*") || t.is_punct("^"));
        let declarator_close = matching_close(tokens, open);
        let (alias, params_open) = if pointer_form {
            let close = declarator_close?;
            let alias = tokens[open + 1..close].iter().find(|t| t.is_identifier())?;
            (alias.text.clone(), close + 1)
        } else if open > 0 && tokens[open - 1].is_identifier() {
            (tokens[open - 1].text.clone(), open)
        } else {
            return None;
        };
        if tokens.get(params_open).is_some_and(|t| t.is_punct("(")) {
            let params_close = matching_close(tokens, params_open)?;
            let prefix_end = if pointer_form { open } else { open - 1 };
            let aliased_tag_name = aggregate_at(tokens, at).and_then(|(_, tag, _)| tag);
            return Some(Declaration::TypedefAlias(TypedefDecl {
                alias,
                start_line,
                aliased_tag_name,
                target: TypedefTarget::Callable {
                    parameter_names: parameter_names(&tokens[params_open + 1..params_close]),
                    returns_value: returns_value(&tokens[..prefix_end]),
                },
            }));
        }
    }

    let alias = alias_name(tokens)?;
    if let Some((kind, tag, body)) = aggregate_at(tokens, at) {
        let names = body.map(|inner| match kind {
            AggregateKind::Enum => enumerator_names(inner),
            _ => member_names(inner),
        });
        return Some(Declaration::TypedefAlias(TypedefDecl {
            alias,
            start_line,
            aliased_tag_name: tag,
            target: TypedefTarget::Aggregate { kind, names },
        }));
    }

    Some(Declaration::TypedefAlias(TypedefDecl {
        alias,
        start_line,
        aliased_tag_name: None,
        target: TypedefTarget::Plain,
    }))
}

/// The alias of a non-callable typedef: the last identifier outside any
/// brackets before the terminating `;`.
fn alias_name(tokens: &[&Token]) -> Option<String> {
    let mut depth = 0i32;
    let mut alias = None;
    for tok in tokens {
        if tok.kind == TokenKind::Punctuator {
            match tok.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth -= 1,
                ";" if depth == 0 => break,
                _ => {}
            }
        } else if depth == 0 && tok.is_identifier() {
            alias = Some(tok.text.clone());
        }
    }
    alias
}

/// Whether an unclassified statement declares an object called `name`,
/// as in `int counter;` or `static char *names[] = { ... };`.
fn declares_variable(statement: &Statement<'_>, name: &str) -> bool {
    let stripped = strip_attributes(&statement.tokens);
    let Some((last, tokens)) = stripped.split_last() else {
        return false;
    };
    if statement.body.is_some() || !last.is_punct(";") {
        return false;
    }
    let items = split_top_level(tokens, ",");
    let Some(first) = items.first() else {
        return false;
    };
    let end = depth_zero_position(first, |t| t.is_punct("=")).unwrap_or(first.len());
    let typed = declarator_name(first).is_some_and(|declared| {
        first[..end]
            .iter()
            .rposition(|t| t.is_identifier() && t.text == declared)
            .is_some_and(|at| is_type_prefix(&first[..at]))
    });
    typed
        && items
            .iter()
            .any(|item| declarator_name(item).as_deref() == Some(name))
}

/// Find the declaration a documentation comment describes.
///
/// Scans forward from `after`, skipping statements that are not
/// declarations, until a declaration is found, a barrier (the next
/// documentation comment) is reached, the enclosing scope closes, or the
/// input ends. When `variable` is given, a variable declaration of that
/// name also ends the search without a result.
pub fn find_declaration(
    tokens: &[Token],
    after: usize,
    barriers: &BTreeSet<usize>,
    variable: Option<&str>,
) -> Option<Declaration> {
    let mut cursor = StatementCursor::new(tokens, after, barriers);
    loop {
        match cursor.step() {
            Step::Statement(stmt) => {
                if let Some(decl) = classify(&stmt) {
                    return Some(decl);
                }
                if variable.is_some_and(|name| declares_variable(&stmt, name)) {
                    return None;
                }
            }
            Step::Barrier(_) | Step::ScopeEnd(_) | Step::End => return None,
        }
    }
}

/// A function definition with its body extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: String,
    pub open_line: usize,
    pub open_column: usize,
    pub close_line: usize,
}

/// Every top-level function definition in the file, in source order.
pub fn function_definitions(tokens: &[Token]) -> Vec<FunctionDefinition> {
    let no_barriers = BTreeSet::new();
    let mut cursor = StatementCursor::new(tokens, 0, &no_barriers);
    let mut defs = Vec::new();
    loop {
        let stmt = match cursor.step() {
            Step::Statement(stmt) => stmt,
            Step::ScopeEnd(_) => continue,
            Step::Barrier(_) | Step::End => break,
        };
        let Some((open, close)) = stmt.body else {
            continue;
        };
        if let Some(Declaration::Function(f)) = classify(&stmt) {
            defs.push(FunctionDefinition {
                name: f.name,
                open_line: tokens[open].line,
                open_column: tokens[open].column,
                close_line: tokens[close].line,
            });
        }
    }
    defs
}
