use thiserror::Error;

/// Failures of the column/value extraction for a single insert statement.
/// All of these mean the token tree did not have the expected shape; they
/// are reported in that statement's output record and never abort the run.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Column/value count mismatch: {columns} columns, {values} values")]
    StructuralMismatch { columns: usize, values: usize },
    #[error("Malformed insert: no table name found")]
    MissingTableName,
    #[error("Malformed insert: no column list found")]
    MissingColumnList,
    #[error("Malformed insert: no value list found")]
    MissingValueList,
}
