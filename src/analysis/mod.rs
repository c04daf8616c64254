//! Structural recognition over the token stream.
//!
//! This module extracts only the facts the style rules need:
//!
//! - `doc_comment`: documentation block comments
//! - `declaration`: the declaration following a doc comment, reduced to its
//!   ordered name list
//! - `conditions`: the expressions tested by control constructs
//!
//! There is no AST; every pass is a forward scan over the same immutable
//! token slice.

mod conditions;
mod declaration;
mod doc_comment;
mod facts;

use std::collections::BTreeSet;

pub use conditions::{conditional_spans, Conditions};
pub use declaration::{
    classify, declarator_name, find_declaration, function_definitions, parameter_names,
    FunctionDefinition, Statement, StatementCursor, Step,
};
pub use doc_comment::{extract_doc_comments, parse_doc_comment};
pub use facts::{
    AggregateDecl, AggregateKind, ConditionalSpan, ConstructKind, Declaration, DocComment,
    EnumDecl, FunctionDecl, TypedefDecl, TypedefTarget, UnbalancedConstruct,
};

use crate::lexer::Token;

/// A documentation comment and the declaration it describes, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBinding {
    pub comment: DocComment,
    pub declaration: Option<Declaration>,
}

/// Pair every documentation comment with the nearest following declaration.
///
/// The lookahead for each comment ends at the next documentation comment,
/// so a declaration is claimed by at most one comment.
pub fn bind_doc_comments(tokens: &[Token]) -> Vec<DocBinding> {
    let comments = extract_doc_comments(tokens);
    let barriers: BTreeSet<usize> = comments.iter().map(|c| c.token_index).collect();

    comments
        .into_iter()
        .map(|comment| {
            // A `struct`/`union`/`enum`/`typedef` header never names a variable
            let variable = comment
                .subject_keyword
                .is_none()
                .then_some(comment.subject_name.as_str());
            let declaration =
                find_declaration(tokens, comment.token_index + 1, &barriers, variable);
            DocBinding {
                comment,
                declaration,
            }
        })
        .collect()
}
