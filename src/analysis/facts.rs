//! Fact structures extracted from the token stream.

use std::fmt;
use std::ops::Range;

/// A structured documentation block comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Name from the header line (`op_add` in `op_add - Do a sum`).
    pub subject_name: String,
    /// `struct`, `union`, `enum` or `typedef` when the header carries one.
    pub subject_keyword: Option<String>,
    /// `@name:` entries in source order.
    pub documented_params: Vec<String>,
    pub has_return_section: bool,
    pub start_line: usize,
    pub end_line: usize,
    pub column: usize,
    /// Index of the comment token in the file's token stream.
    pub token_index: usize,
}

/// Aggregate keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Struct,
    Union,
    Enum,
}

impl AggregateKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "struct" => Some(AggregateKind::Struct),
            "union" => Some(AggregateKind::Union),
            "enum" => Some(AggregateKind::Enum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Struct => "struct",
            AggregateKind::Union => "union",
            AggregateKind::Enum => "enum",
        }
    }
}

/// A function prototype or definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub start_line: usize,
    pub parameter_names: Vec<String>,
    /// False only when the declared return type is plain `void`.
    pub returns_value: bool,
}

/// A `struct` or `union` with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateDecl {
    /// Tag name; `None` for anonymous aggregates.
    pub name: Option<String>,
    pub start_line: usize,
    pub member_names: Vec<String>,
}

/// An `enum` with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: Option<String>,
    pub start_line: usize,
    pub enumerator_names: Vec<String>,
}

/// What a `typedef` aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedefTarget {
    /// `typedef struct tag { ... } alias;` or `typedef struct tag alias;`.
    /// `names` is `None` when no body is present.
    Aggregate {
        kind: AggregateKind,
        names: Option<Vec<String>>,
    },
    /// `typedef int (*alias)(int a, int b);`
    Callable {
        parameter_names: Vec<String>,
        returns_value: bool,
    },
    /// Anything else, e.g. `typedef unsigned int alias;`.
    Plain,
}

/// A `typedef` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefDecl {
    pub alias: String,
    pub start_line: usize,
    pub aliased_tag_name: Option<String>,
    pub target: TypedefTarget,
}

/// A declaration that a doc comment can describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Function(FunctionDecl),
    Struct(AggregateDecl),
    Union(AggregateDecl),
    Enum(EnumDecl),
    TypedefAlias(TypedefDecl),
}

impl Declaration {
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Function(f) => Some(&f.name),
            Declaration::Struct(a) | Declaration::Union(a) => a.name.as_deref(),
            Declaration::Enum(e) => e.name.as_deref(),
            Declaration::TypedefAlias(t) => Some(&t.alias),
        }
    }

    pub fn start_line(&self) -> usize {
        match self {
            Declaration::Function(f) => f.start_line,
            Declaration::Struct(a) | Declaration::Union(a) => a.start_line,
            Declaration::Enum(e) => e.start_line,
            Declaration::TypedefAlias(t) => t.start_line,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Declaration::Function(_) => "function",
            Declaration::Struct(_) => "struct",
            Declaration::Union(_) => "union",
            Declaration::Enum(_) => "enum",
            Declaration::TypedefAlias(_) => "typedef",
        }
    }

    /// Ordered names a doc comment must list, or `None` when the
    /// declaration exposes no checkable list.
    pub fn documented_names(&self) -> Option<&[String]> {
        match self {
            Declaration::Function(f) => Some(&f.parameter_names),
            Declaration::Struct(a) | Declaration::Union(a) => Some(&a.member_names),
            Declaration::Enum(e) => Some(&e.enumerator_names),
            Declaration::TypedefAlias(t) => match &t.target {
                TypedefTarget::Aggregate { names, .. } => names.as_deref(),
                TypedefTarget::Callable {
                    parameter_names, ..
                } => Some(parameter_names),
                TypedefTarget::Plain => None,
            },
        }
    }

    /// Label for the listed names in messages.
    pub fn entry_label(&self) -> &'static str {
        match self {
            Declaration::Function(_) => "parameter",
            Declaration::Struct(_) | Declaration::Union(_) => "member",
            Declaration::Enum(_) => "enumerator",
            Declaration::TypedefAlias(t) => match &t.target {
                TypedefTarget::Aggregate {
                    kind: AggregateKind::Enum,
                    ..
                } => "enumerator",
                TypedefTarget::Aggregate { .. } => "member",
                _ => "parameter",
            },
        }
    }

    /// Whether a `Return:` section is mandatory.
    pub fn needs_return_doc(&self) -> bool {
        match self {
            Declaration::Function(f) => f.returns_value,
            Declaration::TypedefAlias(TypedefDecl {
                target: TypedefTarget::Callable { returns_value, .. },
                ..
            }) => *returns_value,
            _ => false,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} '{}'", self.kind_str(), name),
            None => write!(f, "anonymous {}", self.kind_str()),
        }
    }
}

/// The control-flow construct owning a conditional expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    If,
    ElseIf,
    While,
    ForCondition,
    Switch,
}

impl ConstructKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructKind::If => "if",
            ConstructKind::ElseIf => "else-if",
            ConstructKind::While => "while",
            ConstructKind::ForCondition => "for-condition",
            ConstructKind::Switch => "switch",
        }
    }

    /// Source spelling of the construct.
    pub fn keyword(&self) -> &'static str {
        match self {
            ConstructKind::If => "if",
            ConstructKind::ElseIf => "else if",
            ConstructKind::While => "while",
            ConstructKind::ForCondition => "for",
            ConstructKind::Switch => "switch",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The tokens tested by one control construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalSpan {
    pub kind: ConstructKind,
    /// Position of the construct keyword (`else` for `else if`).
    pub line: usize,
    pub column: usize,
    /// Token index range, exclusive of the enclosing parentheses.
    pub range: Range<usize>,
}

/// A control construct whose opening parenthesis is never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbalancedConstruct {
    pub kind: ConstructKind,
    pub line: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_return_doc() {
        let f = Declaration::Function(FunctionDecl {
            name: "f".to_string(),
            start_line: 1,
            parameter_names: vec![],
            returns_value: true,
        });
        assert!(f.needs_return_doc());

        let s = Declaration::Struct(AggregateDecl {
            name: Some("s".to_string()),
            start_line: 1,
            member_names: vec!["a".to_string()],
        });
        assert!(!s.needs_return_doc());
        assert_eq!(s.entry_label(), "member");
        assert_eq!(s.to_string(), "struct 's'");
    }

    #[test]
    fn test_typedef_without_body_has_no_names() {
        let t = Declaration::TypedefAlias(TypedefDecl {
            alias: "sample_s".to_string(),
            start_line: 1,
            aliased_tag_name: Some("sample_s".to_string()),
            target: TypedefTarget::Aggregate {
                kind: AggregateKind::Struct,
                names: None,
            },
        });
        assert!(t.documented_names().is_none());
    }
}
