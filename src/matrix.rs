//! Validation of z-matrix key and name tables.
//!
//! Both tables share the same triangular fill pattern: row `i` uses its
//! first `min(i, 3)` slots (distance, angle, dihedral) and leaves the rest
//! empty. Slots are `Option`s, so the pattern is checked structurally.

use crate::error::{Error, Result, Table};

/// Reference atom keys of one row: `[distance, angle, dihedral]`.
pub type KeyRow = [Option<usize>; 3];

/// Coordinate names of one row: `[distance, angle, dihedral]`.
pub type NameRow = [Option<String>; 3];

const NAME_PREFIXES: [char; 3] = ['R', 'A', 'D'];

/// Number of filled slots in row `row`.
pub fn reference_count(row: usize) -> usize {
    row.min(3)
}

/// Whether slot `column` of row `row` must be filled.
pub fn is_present_slot(row: usize, column: usize) -> bool {
    column < reference_count(row)
}

/// Name given to slot `column` of row `row` when no names are supplied.
///
/// Rows are numbered from one in names, offset by `shift`: the distance of
/// row 1 is `R2`, the dihedral of row 4 is `D5`.
pub fn default_name(row: usize, column: usize, shift: usize) -> String {
    format!("{}{}", NAME_PREFIXES[column], row + shift + 1)
}

/// Validates a key matrix for `natoms` atoms and returns it zero-indexed.
///
/// With `one_indexed`, every present entry is decremented first; absent
/// entries are left alone.
pub fn key_matrix<R>(rows: &[R], natoms: usize, one_indexed: bool) -> Result<Vec<KeyRow>>
where
    R: AsRef<[Option<usize>]>,
{
    check_shape(Table::Keys, rows.iter().map(|r| r.as_ref().len()), rows.len(), natoms)?;

    let offset = i64::from(one_indexed);
    rows.iter()
        .enumerate()
        .map(|(row, entries)| {
            let entries = entries.as_ref();
            let mut keys: KeyRow = [None; 3];
            for (column, entry) in entries.iter().enumerate() {
                match (*entry, is_present_slot(row, column)) {
                    (Some(_), false) | (None, true) => {
                        return Err(Error::fill_pattern(Table::Keys, row, column));
                    }
                    (None, false) => {}
                    (Some(raw), true) => {
                        let key = raw as i64 - offset;
                        if key < 0 || key >= row as i64 {
                            return Err(Error::InvalidReference { row, column, key });
                        }
                        keys[column] = Some(key as usize);
                    }
                }
            }
            Ok(keys)
        })
        .collect()
}

/// Validates a name matrix for `natoms` atoms.
pub fn name_matrix<R, S>(rows: &[R], natoms: usize) -> Result<Vec<NameRow>>
where
    R: AsRef<[Option<S>]>,
    S: AsRef<str>,
{
    check_shape(Table::Names, rows.iter().map(|r| r.as_ref().len()), rows.len(), natoms)?;

    rows.iter()
        .enumerate()
        .map(|(row, entries)| {
            let mut names: NameRow = Default::default();
            for (column, entry) in entries.as_ref().iter().enumerate() {
                let entry: Option<&str> = entry.as_ref().map(|s| s.as_ref());
                match (entry, is_present_slot(row, column)) {
                    (None, true) => return Err(Error::fill_pattern(Table::Names, row, column)),
                    (None, false) => {}
                    (Some(name), false) => {
                        return Err(Error::name_type(
                            row,
                            column,
                            format!("'{name}' given for a slot without a coordinate"),
                        ));
                    }
                    (Some(name), true) => {
                        if !is_coordinate_name(name) {
                            return Err(Error::name_type(
                                row,
                                column,
                                format!("'{name}' is not a valid coordinate name"),
                            ));
                        }
                        names[column] = Some(name.to_string());
                    }
                }
            }
            Ok(names)
        })
        .collect()
}

/// Name matrix using [`default_name`] for every present slot.
pub fn default_name_matrix(natoms: usize, shift: usize) -> Vec<NameRow> {
    (0..natoms)
        .map(|row| {
            std::array::from_fn(|column| {
                is_present_slot(row, column).then(|| default_name(row, column, shift))
            })
        })
        .collect()
}

fn is_coordinate_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn check_shape(
    table: Table,
    mut widths: impl Iterator<Item = usize>,
    rows: usize,
    natoms: usize,
) -> Result<()> {
    if rows != natoms {
        return Err(Error::shape(table, natoms, rows, 3));
    }
    match widths.find(|&w| w != 3) {
        Some(columns) => Err(Error::shape(table, natoms, rows, columns)),
        None => Ok(()),
    }
}
