use log::debug;

use super::{CompositeKind, Node, Statement, TerminalKind, Token, TokenTree};

const KEYWORDS: &[&str] = &[
    "all", "alter", "and", "as", "by", "create", "delete", "distinct", "drop", "from", "group",
    "insert", "into", "not", "null", "or", "order", "select", "set", "table", "update", "values",
    "where",
];

fn is_keyword(word: &str) -> bool {
    let lower = word.to_lowercase();
    KEYWORDS.contains(&lower.as_str())
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Byte length of the longest prefix of `input` matching `accept`.
fn take_while(input: &str, accept: impl Fn(char) -> bool) -> usize {
    input
        .char_indices()
        .find(|&(_, c)| !accept(c))
        .map_or(input.len(), |(i, _)| i)
}

/// `input` starts with `quote`. The quotes stay part of the lexeme; an
/// unterminated literal runs to the end of the input.
fn quoted_len(input: &str, quote: char) -> usize {
    match input[1..].find(quote) {
        Some(i) => 2 + i,
        None => input.len(),
    }
}

fn number_len(input: &str) -> usize {
    let mut len = take_while(input, |c| c.is_ascii_digit());
    let rest = &input[len..];
    if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
        len += 1 + take_while(&rest[1..], |c| c.is_ascii_digit());
    }
    len
}

/// Total lexer: every input produces a lexeme sequence whose concatenated
/// texts equal the input. Unrecognized characters become punctuation.
pub fn lex(input: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(first) = rest.chars().next() else {
            break;
        };

        let (len, kind) = if first.is_whitespace() {
            (take_while(rest, char::is_whitespace), TerminalKind::Whitespace)
        } else if first == '\'' || first == '"' {
            (quoted_len(rest, first), TerminalKind::Other)
        } else if first.is_ascii_digit() {
            (number_len(rest), TerminalKind::Other)
        } else if is_name_start(first) {
            let len = take_while(rest, is_name_char);
            if is_keyword(&rest[..len]) {
                (len, TerminalKind::Keyword)
            } else {
                (len, TerminalKind::Other)
            }
        } else {
            (first.len_utf8(), TerminalKind::Punctuation)
        };

        tokens.push(Token {
            text: rest[..len].to_string(),
            kind,
        });
        pos += len;
    }

    tokens
}

fn is_punct(token: &Token, text: &str) -> bool {
    token.kind == TerminalKind::Punctuation && token.text == text
}

/// A lexeme that can open an identifier: a plain word, not a keyword,
/// a quoted string or a number.
fn is_name(token: &Token) -> bool {
    token.kind == TerminalKind::Other && token.text.chars().next().is_some_and(is_name_start)
}

struct TreeBuilder<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TreeBuilder<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Node {
        let node = Node::Leaf(self.tokens[self.pos].clone());
        self.pos += 1;
        node
    }

    fn parse_nodes(&mut self, in_parens: bool) -> Vec<Node> {
        let mut nodes = vec![];
        while let Some(token) = self.peek() {
            if in_parens && is_punct(token, ")") {
                break;
            }
            if is_punct(token, "(") {
                nodes.push(Node::Group(self.parse_parens()));
            } else if is_name(token) {
                nodes.push(Node::Group(self.parse_name()));
            } else {
                nodes.push(self.bump());
            }
        }
        nodes
    }

    fn parse_parens(&mut self) -> TokenTree {
        let mut children = vec![self.bump()];
        children.extend(self.parse_nodes(true));
        if self.peek().is_some() {
            children.push(self.bump());
        }
        wrap_element_run(&mut children);
        TokenTree {
            kind: CompositeKind::ParenthesisGroup,
            children,
        }
    }

    /// A name directly followed by `(` is a function call; otherwise the
    /// name and any `.name` continuations form one identifier.
    fn parse_name(&mut self) -> TokenTree {
        let name = self.bump();
        if self.peek().is_some_and(|t| is_punct(t, "(")) {
            let ident = TokenTree {
                kind: CompositeKind::Identifier,
                children: vec![name],
            };
            let parens = self.parse_parens();
            return TokenTree {
                kind: CompositeKind::FunctionCall,
                children: vec![Node::Group(ident), Node::Group(parens)],
            };
        }

        let mut children = vec![name];
        while self.peek().is_some_and(|t| is_punct(t, "."))
            && self.tokens.get(self.pos + 1).is_some_and(is_name)
        {
            children.push(self.bump());
            children.push(self.bump());
        }
        TokenTree {
            kind: CompositeKind::Identifier,
            children,
        }
    }
}

fn is_whitespace_leaf(node: &Node) -> bool {
    matches!(node, Node::Leaf(token) if token.kind == TerminalKind::Whitespace)
}

fn is_comma(node: &Node) -> bool {
    matches!(node, Node::Leaf(token) if is_punct(token, ","))
}

/// A node that can sit at the edge of a comma-separated run.
fn is_element(node: &Node) -> bool {
    !matches!(node, Node::Leaf(token) if token.kind == TerminalKind::Punctuation)
}

/// A node that forms a one-element list on its own, with no comma in sight.
/// Keywords are excluded so `(select 42 from dual)` picks `42`.
fn is_lone_element(node: &Node) -> bool {
    match node {
        Node::Group(_) => true,
        Node::Leaf(token) => token.kind == TerminalKind::Other,
    }
}

/// Wrap the comma-separated element run of a parenthesis group into a single
/// `IdentifierList` child. With commas present the run spans from the element
/// before the first comma to the element after the last one, which leaves a
/// subquery's `select` prefix and `from ...` tail outside the list.
fn wrap_element_run(children: &mut Vec<Node>) {
    let commas: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, node)| is_comma(node))
        .map(|(i, _)| i)
        .collect();

    let (start, end) = match (commas.first(), commas.last()) {
        (Some(&first), Some(&last)) => {
            let start = (0..first).rev().find(|&i| !is_whitespace_leaf(&children[i]));
            let end = (last + 1..children.len()).find(|&i| !is_whitespace_leaf(&children[i]));
            match (start, end) {
                (Some(s), Some(e)) if is_element(&children[s]) && is_element(&children[e]) => {
                    (s, e)
                }
                _ => return,
            }
        }
        _ => match children.iter().position(is_lone_element) {
            Some(i) => (i, i),
            None => return,
        },
    };

    let run: Vec<Node> = children.splice(start..=end, std::iter::empty()).collect();
    children.insert(
        start,
        Node::Group(TokenTree {
            kind: CompositeKind::IdentifierList,
            children: run,
        }),
    );
}

fn build_tree(tokens: &[Token]) -> TokenTree {
    let mut builder = TreeBuilder { tokens, pos: 0 };
    TokenTree {
        kind: CompositeKind::Other,
        children: builder.parse_nodes(false),
    }
}

/// Split raw text into statements at top-level semicolons, dropping
/// whitespace-only fragments. Splitting itself cannot fail; an
/// unclassifiable statement surfaces later as `StatementKind::Unparseable`.
pub fn split_statements(input: &str) -> Vec<Statement> {
    let tokens = lex(input);
    let mut statements = vec![];
    let mut start = 0;

    let mut push = |segment: &[Token]| {
        let raw: String = segment.iter().map(|t| t.text.as_str()).collect();
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        debug!("statement: {:?}", raw);
        statements.push(Statement {
            raw: raw.to_string(),
            tree: build_tree(segment),
        });
    };

    for (i, token) in tokens.iter().enumerate() {
        if is_punct(token, ";") {
            push(&tokens[start..=i]);
            start = i + 1;
        }
    }
    push(&tokens[start..]);

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_preserves_source_text() {
        let tokens = lex("values('foo', 123.456)");
        let rendered: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rendered, "values('foo', 123.456)");
        assert!(tokens.iter().any(|t| t.text == "'foo'"));
        assert!(tokens.iter().any(|t| t.text == "123.456"));
    }

    #[test]
    fn lex_marks_keywords_and_names() {
        let tokens = lex("insert into t1");
        assert_eq!(tokens[0].kind, TerminalKind::Keyword);
        assert_eq!(tokens[2].kind, TerminalKind::Keyword);
        assert_eq!(tokens[4].kind, TerminalKind::Other);
        assert_eq!(tokens[4].text, "t1");
    }

    #[test]
    fn split_drops_whitespace_only_fragments() {
        let statements =
            split_statements("select 1 from dual;   \n insert into t1(a) values(1);  ");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].raw, "select 1 from dual;");
        assert_eq!(statements[1].raw, "insert into t1(a) values(1);");
    }

    #[test]
    fn split_keeps_trailing_statement_without_semicolon() {
        let statements = split_statements("reiteb5yiure");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].raw, "reiteb5yiure");
    }

    #[test]
    fn semicolon_inside_string_does_not_split() {
        let statements = split_statements("insert into t1(a) values('x;y');");
        assert_eq!(statements.len(), 1);
    }

    fn top_level_group(statement: &Statement, kind: CompositeKind) -> &TokenTree {
        statement
            .tree
            .children
            .iter()
            .find_map(|node| match node {
                Node::Group(group) if group.kind == kind => Some(group),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn insert_target_becomes_a_function_call() {
        let statements = split_statements("insert into dual(col_a, col_b) values('x', 2);");
        let call = top_level_group(&statements[0], CompositeKind::FunctionCall);
        assert_eq!(call.text(), "dual(col_a, col_b)");
        let tuple = top_level_group(&statements[0], CompositeKind::ParenthesisGroup);
        assert_eq!(tuple.text(), "('x', 2)");
    }

    #[test]
    fn parenthesis_content_is_wrapped_in_an_identifier_list() {
        let statements = split_statements("insert into t1(col_a, col_b) values(1, 2);");
        let tuple = top_level_group(&statements[0], CompositeKind::ParenthesisGroup);
        let list = tuple
            .children
            .iter()
            .find_map(|node| match node {
                Node::Group(group) if group.kind == CompositeKind::IdentifierList => Some(group),
                _ => None,
            })
            .unwrap();
        assert_eq!(list.text(), "1, 2");
    }

    #[test]
    fn subquery_list_excludes_select_and_from() {
        let statements = split_statements("insert into t1(q,r) (select count(1), 42 from dual);");
        let tuple = top_level_group(&statements[0], CompositeKind::ParenthesisGroup);
        let list = tuple
            .children
            .iter()
            .find_map(|node| match node {
                Node::Group(group) if group.kind == CompositeKind::IdentifierList => Some(group),
                _ => None,
            })
            .unwrap();
        assert_eq!(list.text(), "count(1), 42");
    }

    #[test]
    fn qualified_name_is_a_single_identifier() {
        let statements = split_statements("myseq.nextval");
        match &statements[0].tree.children[0] {
            Node::Group(group) => {
                assert_eq!(group.kind, CompositeKind::Identifier);
                assert_eq!(group.text(), "myseq.nextval");
            }
            other => panic!("expected an identifier group, got {:?}", other),
        }
    }

    #[test]
    fn function_call_renders_verbatim() {
        let statements = split_statements("to_date('2018-04-30','YYYY-MM-DD')");
        match &statements[0].tree.children[0] {
            Node::Group(group) => {
                assert_eq!(group.kind, CompositeKind::FunctionCall);
                assert_eq!(group.text(), "to_date('2018-04-30','YYYY-MM-DD')");
            }
            other => panic!("expected a function call, got {:?}", other),
        }
    }
}
