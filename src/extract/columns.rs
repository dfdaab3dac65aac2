use log::{debug, info};

use super::error::Error;
use super::ColumnValuePair;
use crate::sql::{CompositeKind, Node, TerminalKind, TokenTree};

/// Walk the top-level children of an insert statement's token tree and emit
/// one `(table.column, value)` pair per declared column, in source order.
///
/// The tokenizer turns each `into <table>(<columns>)` target into a function
/// call and each `values (...)` tuple (or subquery) into a parenthesis group,
/// in matching left-to-right order. Pairing them positionally is what makes
/// the multi-target `insert all` form fall out for free.
pub fn extract_pairs(tree: &TokenTree) -> Result<Vec<ColumnValuePair>, Error> {
    // an "insert all" statement repeats the target/tuple pair per table
    let mut targets = vec![];
    let mut tuples = vec![];
    for child in &tree.children {
        let Node::Group(group) = child else { continue };
        match group.kind {
            CompositeKind::FunctionCall => targets.push(group),
            CompositeKind::ParenthesisGroup => tuples.push(group),
            _ => {}
        }
    }
    debug!(
        "{} target group(s), {} value group(s)",
        targets.len(),
        tuples.len()
    );

    let mut pairs = vec![];
    for (target, tuple) in targets.iter().zip(tuples.iter()) {
        pairs.extend(extract_group(target, tuple)?);
    }
    Ok(pairs)
}

fn find_identifier_list(group: &TokenTree) -> Option<&TokenTree> {
    group.children.iter().find_map(|node| match node {
        Node::Group(child) if child.kind == CompositeKind::IdentifierList => Some(child),
        _ => None,
    })
}

fn extract_group(target: &TokenTree, tuple: &TokenTree) -> Result<Vec<ColumnValuePair>, Error> {
    debug!("target = {:?}", target.text());
    debug!("tuple = {:?}", tuple.text());

    // table name and column list are located by kind, not by position
    let table = target
        .children
        .iter()
        .find_map(|node| match node {
            Node::Group(group) if group.kind == CompositeKind::Identifier => Some(group.text()),
            _ => None,
        })
        .ok_or(Error::MissingTableName)?;

    let column_list = target
        .children
        .iter()
        .find_map(|node| match node {
            Node::Group(group) if group.kind != CompositeKind::Identifier => {
                find_identifier_list(group)
            }
            _ => None,
        })
        .ok_or(Error::MissingColumnList)?;

    // a column is an identifier or a bare keyword used as an unquoted name
    let mut columns = vec![];
    for child in &column_list.children {
        match child {
            Node::Group(group) if group.kind == CompositeKind::Identifier => {
                columns.push(group.text());
            }
            Node::Leaf(token) if token.kind == TerminalKind::Keyword => {
                columns.push(token.text.clone());
            }
            other => debug!("discard column token {:?}", other.text()),
        }
    }

    let value_list = find_identifier_list(tuple).ok_or(Error::MissingValueList)?;
    let mut values = vec![];
    for child in &value_list.children {
        if let Node::Leaf(token) = child {
            if matches!(
                token.kind,
                TerminalKind::Punctuation | TerminalKind::Whitespace
            ) {
                debug!("discard value token {:?}", token.text);
                continue;
            }
        }
        values.push(child.text());
    }

    if columns.len() != values.len() {
        return Err(Error::StructuralMismatch {
            columns: columns.len(),
            values: values.len(),
        });
    }

    let pairs: Vec<ColumnValuePair> = columns
        .into_iter()
        .zip(values)
        .map(|(column, value)| ColumnValuePair(format!("{table}.{column}"), value))
        .collect();
    info!("{:?}", pairs);
    Ok(pairs)
}
