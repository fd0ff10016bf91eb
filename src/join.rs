//! Joining z-matrices of two fragments into one.
//!
//! A bimolecular z-matrix is built in two steps. [`attach_placeholder`]
//! appends a placeholder atom to the first fragment to give it a clean
//! reference frame, then [`attach_fragment`] appends the second fragment,
//! positioning its first three atoms against the first fragment with a
//! block of fixed join coordinates. Both go through [`join`].
//!
//! Coordinate names of the two fragments must not overlap. Put the second
//! fragment in [`standard form`](ZMatrix::standard_form) with a shift equal
//! to the size of the first before joining.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::atom::Symbol;
use crate::config::Babs3Rule;
use crate::error::{Error, Result, Table};
use crate::graph::MolGraph;
use crate::matrix::{KeyRow, NameRow};
use crate::units::{angstrom_to_bohr, degree_to_radian};
use crate::zmatrix::ZMatrix;

/// Coordinate names of the placeholder row.
pub const PLACEHOLDER_NAMES: [&str; 3] = ["rx", "ax", "dx"];

/// Placeholder distance (angstrom), angle and dihedral (degrees).
const PLACEHOLDER_VALUES: [f64; 3] = [1.0, 90.0, 180.0];

/// Angle and dihedral names of the join block, row by row.
const JOIN_NAMES: [[Option<&str>; 3]; 3] = [
    [None, Some("aabs1"), Some("babs1")],
    [None, Some("aabs2"), Some("babs2")],
    [None, None, Some("babs3")],
];

/// Values of the join angles and dihedrals, in degrees.
const JOIN_ANGLES: [(&str, f64); 5] = [
    ("aabs1", 85.0),
    ("aabs2", 85.0),
    ("babs1", 170.0),
    ("babs2", 85.0),
    ("babs3", 170.0),
];

/// The join dihedral whose value is left out unless requested.
pub const BABS3: &str = "babs3";

/// Appends `zma2` to `zma1`.
///
/// `join_keys` and `join_names` hold one row for each of the first
/// `min(len(zma2), 3)` atoms of `zma2`. Their entries reference atoms of
/// `zma1` and fill exactly the slots the corresponding `zma2` rows leave
/// empty. Keys inside `zma2` are offset by `len(zma1)`.
///
/// The value map of the result is the union of the values of `zma1`,
/// `join_values` and `zma2`. Values for join coordinates may be left out
/// and supplied later with [`ZMatrix::with_value`].
///
/// # Errors
///
/// - [`Error::Shape`] if `zma2` is empty or the join block has the wrong
///   number of rows;
/// - [`Error::ReferenceOutOfRange`] if a join key is not an atom of `zma1`;
/// - [`Error::Type`] if a join key and its name are not both present or
///   both absent;
/// - [`Error::FillPattern`] if a join entry lands on a slot `zma2` already
///   fills, or the merged rows break the triangular pattern;
/// - [`Error::DuplicateCoordinateName`] if a name appears twice in the
///   join block, or is used by more than one of `zma1`, the join block and
///   `zma2`.
pub fn join(
    zma1: &ZMatrix,
    zma2: &ZMatrix,
    join_keys: &[KeyRow],
    join_names: &[NameRow],
    join_values: &BTreeMap<String, f64>,
) -> Result<ZMatrix> {
    let offset = zma1.count();
    if zma2.is_empty() {
        return Err(Error::shape(Table::Keys, 1, 0, 3));
    }
    let block_rows = zma2.count().min(3);
    if join_keys.len() != block_rows {
        return Err(Error::shape(Table::Keys, block_rows, join_keys.len(), 3));
    }
    if join_names.len() != block_rows {
        return Err(Error::shape(Table::Names, block_rows, join_names.len(), 3));
    }

    let mut block_names = BTreeSet::new();
    for (r, (keys, names)) in join_keys.iter().zip(join_names).enumerate() {
        for (column, (key, name)) in keys.iter().zip(names).enumerate() {
            if let Some(key) = *key {
                if key >= offset {
                    return Err(Error::out_of_range(key, offset));
                }
            }
            match (key, name) {
                (Some(_), Some(name)) => {
                    if !block_names.insert(name.as_str()) {
                        return Err(Error::DuplicateCoordinateName(name.clone()));
                    }
                }
                (None, None) => {}
                _ => {
                    return Err(Error::name_type(
                        offset + r,
                        column,
                        "join key and join name must be present together",
                    ))
                }
            }
        }
    }
    check_disjoint(&zma1.coordinate_names(), &block_names)?;
    check_disjoint(&zma1.coordinate_names(), &zma2.coordinate_names())?;
    check_disjoint(&block_names, &zma2.coordinate_names())?;
    if let Some(name) = join_values.keys().find(|n| !block_names.contains(n.as_str())) {
        return Err(Error::UnknownCoordinate(name.clone()));
    }

    let mut symbols: Vec<Symbol> = zma1.symbols();
    let mut keys = zma1.key_matrix(false);
    let mut names = zma1.name_matrix();
    for (r, row) in zma2.rows().iter().enumerate() {
        let mut row_keys = row.keys().map(|k| k.map(|k| k + offset));
        let mut row_names = row.names().clone();
        if r < block_rows {
            for column in 0..3 {
                if let Some(key) = join_keys[r][column] {
                    if row_keys[column].is_some() {
                        return Err(Error::fill_pattern(Table::Keys, offset + r, column));
                    }
                    if row_names[column].is_some() {
                        return Err(Error::fill_pattern(Table::Names, offset + r, column));
                    }
                    row_keys[column] = Some(key);
                    row_names[column] = join_names[r][column].clone();
                }
            }
        }
        symbols.push(row.symbol());
        keys.push(row_keys);
        names.push(row_names);
    }

    let mut values = zma1.values().clone();
    values.extend(join_values.iter().map(|(k, &v)| (k.clone(), v)));
    values.extend(zma2.values().iter().map(|(k, &v)| (k.clone(), v)));

    let joined = ZMatrix::assemble(symbols, &keys, &names, values)?;
    debug!(
        "joined {} + {} atoms with {} join rows",
        zma1.count(),
        zma2.count(),
        block_rows
    );
    Ok(joined)
}

fn check_disjoint(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> Result<()> {
    match a.intersection(b).next() {
        Some(name) => Err(Error::DuplicateCoordinateName(name.to_string())),
        None => Ok(()),
    }
}

/// Appends a placeholder atom `X` to `zma`.
///
/// `keys` are the distance, angle and dihedral references of the new row.
/// Exactly the first `min(len(zma), 3)` must be present. The row's
/// coordinates are named `rx`, `ax` and `dx` and are fixed at 1 Å, 90° and
/// 180°. Absent references carry neither a name nor a value.
pub fn attach_placeholder(zma: &ZMatrix, keys: [Option<usize>; 3]) -> Result<ZMatrix> {
    let count = zma.count();
    let required = count.min(3);
    for (column, key) in keys.iter().enumerate() {
        if let Some(key) = *key {
            if key >= count {
                return Err(Error::out_of_range(key, count));
            }
        }
        if key.is_some() != (column < required) {
            return Err(Error::fill_pattern(Table::Keys, count, column));
        }
    }

    let mut names: NameRow = Default::default();
    let mut values = BTreeMap::new();
    for column in (0..3).filter(|&c| keys[c].is_some()) {
        let name = PLACEHOLDER_NAMES[column];
        let value = match column {
            0 => angstrom_to_bohr(PLACEHOLDER_VALUES[column]),
            _ => degree_to_radian(PLACEHOLDER_VALUES[column]),
        };
        names[column] = Some(name.to_string());
        values.insert(name.to_string(), value);
    }

    let placeholder = ZMatrix::assemble(
        vec![Symbol::Placeholder],
        &[[None; 3]],
        &[Default::default()],
        BTreeMap::new(),
    )?;
    debug!("attaching placeholder to {count} atoms at {keys:?}");
    join(zma, &placeholder, &[keys], &[names], &values)
}

/// Appends `fragment` to `base`, typically the output of
/// [`attach_placeholder`].
///
/// The first atom of `fragment` sits at distance `dist_value` (bohr) from
/// `keys[0]`, with its angle and dihedral measured against `keys[1]` and
/// `keys[2]`. The next two atoms of `fragment` get their missing angle and
/// dihedral references from the same keys, shifted one slot per row:
///
/// | row | keys               | names                       |
/// |-----|--------------------|-----------------------------|
/// | 0   | `(j1, j2, j3)`     | `(dist_name, aabs1, babs1)` |
/// | 1   | `(-, j1, j2)`      | `(-, aabs2, babs2)`         |
/// | 2   | `(-, -, j1)`       | `(-, -, babs3)`             |
///
/// Angles are 85° except the `babs1` and `babs3` dihedrals, which are
/// 170°. With `include_babs3` unset, `babs3` keeps its slot but gets no
/// value. `dist_name` must differ from the fixed join names.
pub fn attach_fragment(
    base: &ZMatrix,
    fragment: &ZMatrix,
    dist_name: &str,
    dist_value: f64,
    keys: [Option<usize>; 3],
    include_babs3: bool,
) -> Result<ZMatrix> {
    if JOIN_ANGLES.iter().any(|(n, _)| *n == dist_name) {
        return Err(Error::DuplicateCoordinateName(dist_name.to_string()));
    }
    let [j1, j2, j3] = keys;
    let block_rows = fragment.count().min(3);
    let template_keys: [KeyRow; 3] = [[j1, j2, j3], [None, j1, j2], [None, None, j1]];

    let mut join_keys = Vec::with_capacity(block_rows);
    let mut join_names = Vec::with_capacity(block_rows);
    let mut values = BTreeMap::new();
    for (row, row_keys) in template_keys.iter().take(block_rows).enumerate() {
        let mut names: NameRow = Default::default();
        for column in (0..3).filter(|&c| row_keys[c].is_some()) {
            let name = match (row, column) {
                (0, 0) => Some(dist_name),
                _ => JOIN_NAMES[row][column],
            };
            names[column] = name.map(str::to_string);
        }
        for name in names.iter().flatten() {
            if name == dist_name {
                values.insert(name.clone(), dist_value);
            } else if let Some(&(_, degrees)) =
                JOIN_ANGLES.iter().find(|(n, _)| *n == name.as_str())
            {
                if name != BABS3 || include_babs3 {
                    values.insert(name.clone(), degree_to_radian(degrees));
                }
            }
        }
        join_keys.push(*row_keys);
        join_names.push(names);
    }

    debug!(
        "attaching {} atoms to {} atoms at {keys:?} (babs3: {include_babs3})",
        fragment.count(),
        base.count()
    );
    join(base, fragment, &join_keys, &join_names, &values)
}

/// Whether the `babs3` dihedral of a join should get its default value.
///
/// `fragment_graph` is the connectivity of the attached fragment and
/// `forming_bond_keys` the atoms of the bond being formed, numbered as in
/// that graph. Keys not in the graph are ignored.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use zmatcrab::{include_babs3, Babs3Rule, Element, MolGraph};
///
/// let mut methyl = MolGraph::new();
/// methyl.add_atom(0, Element::C.into());
/// for h in 1..4 {
///     methyl.add_atom(h, Element::H.into());
///     methyl.add_bond(0, h);
/// }
/// let rule = Babs3Rule::default();
/// assert!(include_babs3(&BTreeSet::from([1]), &methyl, &rule));
/// assert!(!include_babs3(&BTreeSet::from([0]), &methyl, &rule));
/// ```
pub fn include_babs3(
    forming_bond_keys: &BTreeSet<usize>,
    fragment_graph: &MolGraph,
    rule: &Babs3Rule,
) -> bool {
    let neighbors = fragment_graph.atom_neighbor_keys();
    let terminal = forming_bond_keys
        .iter()
        .filter_map(|key| neighbors.get(key))
        .any(|ngbs| ngbs.len() == 1);
    neighbors.len() >= rule.min_atoms && (terminal || !rule.require_terminal)
}
