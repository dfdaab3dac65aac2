pub mod tokenizer;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TerminalKind {
    Keyword,
    Punctuation,
    Whitespace,
    Other,
}

/// A leaf node holding the exact source slice it was lexed from.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub text: String,
    pub kind: TerminalKind,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CompositeKind {
    Identifier,
    IdentifierList,
    ParenthesisGroup,
    FunctionCall,
    Other,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Leaf(Token),
    Group(TokenTree),
}

#[derive(Debug, PartialEq, Clone)]
pub struct TokenTree {
    pub kind: CompositeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(&self) -> String {
        match self {
            Self::Leaf(token) => token.text.clone(),
            Self::Group(tree) => tree.text(),
        }
    }
}

impl TokenTree {
    /// The exact source substring this tree covers.
    pub fn text(&self) -> String {
        self.children.iter().map(Node::text).collect()
    }
}

/// One semicolon-terminated unit of the input, with its parsed tree.
#[derive(Debug, PartialEq, Clone)]
pub struct Statement {
    pub raw: String,
    pub tree: TokenTree,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StatementKind {
    Insert,
    Other(String),
    Unparseable,
}

const VERBS: &[&str] = &[
    "alter", "create", "delete", "drop", "insert", "select", "update",
];

impl Statement {
    /// Classify by the statement's leading keyword. Anything that does not
    /// open with a recognized DML/DDL verb is unparseable.
    pub fn kind(&self) -> StatementKind {
        for child in &self.tree.children {
            match child {
                Node::Leaf(token) if token.kind == TerminalKind::Whitespace => continue,
                Node::Leaf(token) if token.kind == TerminalKind::Keyword => {
                    let verb = token.text.to_lowercase();
                    if !VERBS.contains(&verb.as_str()) {
                        return StatementKind::Unparseable;
                    }
                    if verb == "insert" {
                        return StatementKind::Insert;
                    }
                    return StatementKind::Other(verb.to_uppercase());
                }
                _ => return StatementKind::Unparseable,
            }
        }
        StatementKind::Unparseable
    }
}
