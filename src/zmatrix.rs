//! The validated z-matrix type and its unit conventions.
//!
//! A [`ZMatrix`] is built once, through [`ZMatrix::construct`],
//! [`ZMatrix::from_data`] or deserialization, and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::atom::Symbol;
use crate::error::{Error, Result, Table};
use crate::matrix::{self, KeyRow, NameRow};
use crate::units;

/// Unit and indexing conventions of z-matrix data at an I/O boundary.
///
/// Internally keys are zero-indexed, distances are in bohr and angles in
/// radians ([`Convention::INTERNAL`]). Text formats usually number atoms
/// from one and use angstrom and degrees ([`Convention::TEXT`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Convention {
    pub one_indexed: bool,
    pub angstrom: bool,
    pub degree: bool,
}

impl Convention {
    pub const INTERNAL: Convention = Convention {
        one_indexed: false,
        angstrom: false,
        degree: false,
    };

    pub const TEXT: Convention = Convention {
        one_indexed: true,
        angstrom: true,
        degree: true,
    };

    fn to_internal(self, column: usize, value: f64) -> f64 {
        match column {
            0 if self.angstrom => units::angstrom_to_bohr(value),
            1 | 2 if self.degree => units::degree_to_radian(value),
            _ => value,
        }
    }

    fn from_internal(self, column: usize, value: f64) -> f64 {
        match column {
            0 if self.angstrom => units::bohr_to_angstrom(value),
            1 | 2 if self.degree => units::radian_to_degree(value),
            _ => value,
        }
    }
}

/// One atom of a z-matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZRow {
    symbol: Symbol,
    keys: KeyRow,
    names: NameRow,
}

impl ZRow {
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Reference atoms `[distance, angle, dihedral]`.
    pub fn keys(&self) -> &KeyRow {
        &self.keys
    }

    /// Coordinate names `[distance, angle, dihedral]`.
    pub fn names(&self) -> &NameRow {
        &self.names
    }
}

/// An immutable, validated z-matrix.
///
/// Every row satisfies the triangular fill pattern: row `i` has exactly
/// `min(i, 3)` references, each to an earlier row, with a coordinate name
/// in every referenced slot and nowhere else. Values are stored in bohr
/// and radians. Operations that change the structure return a new
/// `ZMatrix`.
///
/// # Examples
///
/// ```
/// use zmatcrab::ZMatrix;
///
/// let zma = ZMatrix::construct(
///     &["O", "H", "H"],
///     &[
///         [None, None, None],
///         [Some(0), None, None],
///         [Some(0), Some(1), None],
///     ],
///     None,
///     false,
/// )?;
/// assert_eq!(zma.count(), 3);
/// assert_eq!(zma.rows()[2].names()[1].as_deref(), Some("A3"));
/// # Ok::<(), zmatcrab::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZMatrix")]
pub struct ZMatrix {
    rows: Vec<ZRow>,
    values: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct RawZMatrix {
    rows: Vec<ZRow>,
    values: BTreeMap<String, f64>,
}

impl TryFrom<RawZMatrix> for ZMatrix {
    type Error = Error;

    fn try_from(raw: RawZMatrix) -> Result<Self> {
        let (symbols, (keys, names)): (Vec<_>, (Vec<_>, Vec<_>)) = raw
            .rows
            .into_iter()
            .map(|r| (r.symbol, (r.keys, r.names)))
            .unzip();
        let zma = ZMatrix::assemble(symbols, &keys, &names, raw.values)?;
        let unknown = {
            let columns = zma.coordinate_columns();
            zma.values
                .keys()
                .find(|name| !columns.contains_key(name.as_str()))
                .cloned()
        };
        match unknown {
            Some(name) => Err(Error::UnknownCoordinate(name)),
            None => Ok(zma),
        }
    }
}

impl ZMatrix {
    /// Builds a z-matrix without coordinate values.
    ///
    /// Without a name matrix, every present slot gets the default name
    /// (`R2`, `A3`, `D4`, ...). With `one_indexed`, key entries are
    /// numbered from one and are converted to zero-based keys.
    pub fn construct<S, R>(
        symbols: &[S],
        key_matrix: &[R],
        name_matrix: Option<&[Vec<Option<&str>>]>,
        one_indexed: bool,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        R: AsRef<[Option<usize>]>,
    {
        let symbols = symbols
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<Symbol>>>()?;
        let natoms = symbols.len();
        let keys = matrix::key_matrix(key_matrix, natoms, one_indexed)?;
        let names = match name_matrix {
            Some(rows) => matrix::name_matrix(rows, natoms)?,
            None => matrix::default_name_matrix(natoms, 0),
        };
        Ok(Self::zip(symbols, keys, names, BTreeMap::new()))
    }

    /// Builds a z-matrix with coordinate values, as read from a file.
    ///
    /// `convention` describes the input: key numbering and the units of
    /// `values`, which are converted to bohr and radians. Every coordinate
    /// name must have a value; values for unused names are dropped.
    pub fn from_data<S, R>(
        symbols: &[S],
        key_matrix: &[R],
        name_matrix: Option<&[Vec<Option<&str>>]>,
        values: &BTreeMap<String, f64>,
        convention: Convention,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        R: AsRef<[Option<usize>]>,
    {
        let bare = Self::construct(symbols, key_matrix, name_matrix, convention.one_indexed)?;
        let columns = bare.coordinate_columns();
        let values = columns
            .iter()
            .map(|(name, &column)| {
                let value = values
                    .get(*name)
                    .ok_or_else(|| Error::MissingValue(name.to_string()))?;
                Ok((name.to_string(), convention.to_internal(column, *value)))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { values, ..bare })
    }

    /// Validates already zero-indexed tables and wraps them.
    pub(crate) fn assemble(
        symbols: Vec<Symbol>,
        keys: &[KeyRow],
        names: &[NameRow],
        values: BTreeMap<String, f64>,
    ) -> Result<Self> {
        let natoms = symbols.len();
        let keys = matrix::key_matrix(keys, natoms, false)?;
        let names = matrix::name_matrix(names, natoms)?;
        Ok(Self::zip(symbols, keys, names, values))
    }

    fn zip(
        symbols: Vec<Symbol>,
        keys: Vec<KeyRow>,
        names: Vec<NameRow>,
        values: BTreeMap<String, f64>,
    ) -> Self {
        let rows = symbols
            .into_iter()
            .zip(keys)
            .zip(names)
            .map(|((symbol, keys), names)| ZRow {
                symbol,
                keys,
                names,
            })
            .collect();
        Self { rows, values }
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ZRow] {
        &self.rows
    }

    pub fn symbol(&self, key: usize) -> Option<Symbol> {
        self.rows.get(key).map(ZRow::symbol)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.rows.iter().map(ZRow::symbol).collect()
    }

    /// The key matrix, optionally numbered from one.
    pub fn key_matrix(&self, one_indexed: bool) -> Vec<KeyRow> {
        let offset = usize::from(one_indexed);
        self.rows
            .iter()
            .map(|r| r.keys.map(|k| k.map(|k| k + offset)))
            .collect()
    }

    pub fn name_matrix(&self) -> Vec<NameRow> {
        self.rows.iter().map(|r| r.names.clone()).collect()
    }

    /// Coordinate values in bohr and radians.
    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Coordinate values converted to the units of `convention`.
    pub fn values_in(&self, convention: Convention) -> BTreeMap<String, f64> {
        let columns = self.coordinate_columns();
        self.values
            .iter()
            .map(|(name, &value)| {
                let column = columns.get(name.as_str()).copied().unwrap_or(0);
                (name.clone(), convention.from_internal(column, value))
            })
            .collect()
    }

    /// Every coordinate name used by the name matrix.
    pub fn coordinate_names(&self) -> BTreeSet<&str> {
        self.coordinate_columns().into_keys().collect()
    }

    /// Coordinate names without a value.
    pub fn missing_values(&self) -> Vec<&str> {
        self.coordinate_columns()
            .into_keys()
            .filter(|name| !self.values.contains_key(*name))
            .collect()
    }

    /// Value of slot `column` of row `key`.
    pub fn coordinate(&self, key: usize, column: usize) -> Result<f64> {
        let row = self
            .rows
            .get(key)
            .ok_or_else(|| Error::out_of_range(key, self.count()))?;
        let name = row
            .names
            .get(column)
            .and_then(Option::as_deref)
            .ok_or(Error::fill_pattern(Table::Names, key, column))?;
        self.value(name)
            .ok_or_else(|| Error::MissingValue(name.to_string()))
    }

    pub fn atom_keys_with(&self, symbol: Symbol) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.symbol == symbol)
            .map(|(key, _)| key)
            .collect()
    }

    pub fn placeholder_keys(&self) -> Vec<usize> {
        self.atom_keys_with(Symbol::Placeholder)
    }

    /// Renames every coordinate to the default scheme with row numbers
    /// offset by `shift`, carrying values across.
    ///
    /// Two fragments built independently both use `R2`, `A3`, ...; putting
    /// the second one in standard form with `shift` equal to the size of
    /// the first keeps their names apart when they are joined.
    pub fn standard_form(&self, shift: usize) -> ZMatrix {
        let names = matrix::default_name_matrix(self.count(), shift);
        let values = self
            .rows
            .iter()
            .zip(&names)
            .flat_map(|(row, new)| row.names.iter().zip(new))
            .filter_map(|(old, new)| {
                let value = self.value(old.as_deref()?)?;
                Some((new.clone()?, value))
            })
            .collect();
        let rows = self
            .rows
            .iter()
            .zip(names)
            .map(|(row, names)| ZRow {
                names,
                ..row.clone()
            })
            .collect();
        ZMatrix { rows, values }
    }

    /// Copy with the value of one coordinate replaced, in internal units.
    pub fn with_value(&self, name: &str, value: f64) -> Result<ZMatrix> {
        if !self.coordinate_columns().contains_key(name) {
            return Err(Error::UnknownCoordinate(name.to_string()));
        }
        let mut values = self.values.clone();
        values.insert(name.to_string(), value);
        Ok(ZMatrix {
            rows: self.rows.clone(),
            values,
        })
    }

    // name -> column of its first use
    fn coordinate_columns(&self) -> BTreeMap<&str, usize> {
        let mut columns = BTreeMap::new();
        for row in &self.rows {
            for (column, name) in row.names.iter().enumerate() {
                if let Some(name) = name {
                    columns.entry(name.as_str()).or_insert(column);
                }
            }
        }
        columns
    }
}
