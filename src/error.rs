//! Error type shared by every z-matrix operation.
//!
//! All failures are detected before a value is built, so an `Err` never
//! comes with a partially constructed z-matrix.

use thiserror::Error;

/// Which of the two z-matrix tables a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Keys,
    Names,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Keys => f.write_str("key matrix"),
            Table::Names => f.write_str("name matrix"),
        }
    }
}

/// Errors produced while building or transforming z-matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A matrix does not have the expected number of rows or columns.
    #[error("{table} has shape {rows}x{columns}, expected {expected_rows}x3")]
    Shape {
        table: Table,
        expected_rows: usize,
        rows: usize,
        columns: usize,
    },

    /// A slot is filled where the triangular pattern requires it to be
    /// empty, or empty where it must be filled.
    #[error("{table} violates the triangular fill pattern at row {row}, column {column}")]
    FillPattern {
        table: Table,
        row: usize,
        column: usize,
    },

    /// A key matrix entry does not name an earlier row.
    #[error("key {key} at row {row}, column {column} must reference an atom before row {row}")]
    InvalidReference { row: usize, column: usize, key: i64 },

    /// An atom key passed to an operation does not exist in its z-matrix.
    #[error("atom key {key} is out of range for a z-matrix of {count} atoms")]
    ReferenceOutOfRange { key: usize, count: usize },

    /// A name matrix entry has the wrong kind: a name where no coordinate
    /// exists, or a string that is not usable as a coordinate name.
    #[error("invalid name at row {row}, column {column}: {detail}")]
    Type {
        row: usize,
        column: usize,
        detail: String,
    },

    /// Two merged value maps define the same coordinate.
    #[error("coordinate name '{0}' is defined more than once")]
    DuplicateCoordinateName(String),

    /// An atom symbol is neither an element nor the placeholder `X`.
    #[error("unknown atom symbol '{0}'")]
    UnknownSymbol(String),

    /// A coordinate used by the name matrix has no value.
    #[error("no value for coordinate '{0}'")]
    MissingValue(String),

    /// A value was supplied for a coordinate that no slot uses.
    #[error("no coordinate is named '{0}'")]
    UnknownCoordinate(String),

    /// A geometry was given a different number of symbols and coordinates.
    #[error("geometry has {atoms} symbols but {coordinates} coordinates")]
    CoordinateCount { atoms: usize, coordinates: usize },

    /// An atom order is not a permutation of the atom keys.
    #[error("atom order {order:?} is not a permutation of {count} atoms")]
    InvalidPermutation { order: Vec<usize>, count: usize },
}

impl Error {
    pub(crate) fn shape(table: Table, expected_rows: usize, rows: usize, columns: usize) -> Self {
        Self::Shape {
            table,
            expected_rows,
            rows,
            columns,
        }
    }

    pub(crate) fn fill_pattern(table: Table, row: usize, column: usize) -> Self {
        Self::FillPattern { table, row, column }
    }

    pub(crate) fn name_type(row: usize, column: usize, detail: impl Into<String>) -> Self {
        Self::Type {
            row,
            column,
            detail: detail.into(),
        }
    }

    pub(crate) fn out_of_range(key: usize, count: usize) -> Self {
        Self::ReferenceOutOfRange { key, count }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
