pub mod columns;
pub mod error;

use log::{error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::sql::tokenizer::split_statements;
use crate::sql::{Statement, StatementKind};

/// One extracted fact: `("table.column", verbatim value text)`. Serializes
/// as a two-element JSON array.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ColumnValuePair(pub String, pub String);

/// The output record for one statement: the trimmed statement text plus
/// either the extracted pairs or an error message, never both.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ExtractionResult {
    Columns {
        query: String,
        columns: Vec<ColumnValuePair>,
    },
    Failed {
        query: String,
        error: String,
    },
}

pub fn assemble(statement: &Statement) -> ExtractionResult {
    let query = statement.raw.clone();
    match statement.kind() {
        StatementKind::Unparseable => {
            error!("ERROR during parsing of {:?}", query);
            ExtractionResult::Failed {
                query,
                error: "Parsing failed".to_string(),
            }
        }
        StatementKind::Other(verb) => {
            info!("not an insert query {:?} {}", query, verb);
            ExtractionResult::Failed {
                query,
                error: format!("Unsupported query type {verb}"),
            }
        }
        StatementKind::Insert => match columns::extract_pairs(&statement.tree) {
            Ok(columns) => ExtractionResult::Columns { query, columns },
            Err(err) => {
                error!("extraction failed for {:?}: {}", query, err);
                ExtractionResult::Failed {
                    query,
                    error: err.to_string(),
                }
            }
        },
    }
}

/// Process a whole input blob: one record per statement, in input order.
pub fn run(input: &str) -> Vec<ExtractionResult> {
    split_statements(input).iter().map(assemble).collect()
}

/// Render the output array pretty-printed with 4-space indentation.
pub fn to_json(results: &[ExtractionResult]) -> Result<String, serde_json::Error> {
    let mut buf = vec![];
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    results.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json emits valid utf-8"))
}
