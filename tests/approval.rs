use std::collections::BTreeMap;

use serde::Deserialize;
use zmatcrab::{
    attach_fragment, attach_placeholder, shift_for_placeholders, Cartesian, Convention,
    GeometryBackend, KeyRow, ZMatrix,
};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Key matrix of a linear chain: every row references the rows just before it.
fn chain_keys(n: usize) -> Vec<KeyRow> {
    (0..n)
        .map(|row| {
            let mut keys: KeyRow = [None; 3];
            for (column, key) in keys.iter_mut().enumerate().take(row.min(3)) {
                *key = Some(row - 1 - column);
            }
            keys
        })
        .collect()
}

/// Chain z-matrix with a value for every coordinate.
fn chain_zma(symbols: &[String]) -> ZMatrix {
    let bare = ZMatrix::construct(symbols, &chain_keys(symbols.len()), None, false).unwrap();
    let names: Vec<String> = bare.coordinate_names().into_iter().map(String::from).collect();
    names
        .iter()
        .fold(bare, |zma, name| zma.with_value(name, 1.0).unwrap())
}

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

// ---------------------------------------------------------------------------
// 1. Placeholder index shifts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ShiftEntry {
    symbols: Vec<String>,
    indices: Vec<usize>,
    expected: Vec<usize>,
}

#[test]
fn approval_shift() {
    let data: Vec<ShiftEntry> =
        serde_json::from_str(include_str!("approval_data/shift.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let zma = ZMatrix::construct(&entry.symbols, &chain_keys(entry.symbols.len()), None, false)
            .unwrap();
        let shifted = shift_for_placeholders(entry.indices.iter().copied(), &zma);
        if shifted != entry.expected {
            failures.push(format!(
                "[shift] {:?} {:?}: expected {:?}, got {:?}",
                entry.symbols, entry.indices, entry.expected, shifted
            ));
        }
    }

    if !failures.is_empty() {
        panic!("{} shift failures:\n{}", failures.len(), failures.join("\n"));
    }
}

// ---------------------------------------------------------------------------
// 2. Fragment joins
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct JoinEntry {
    name: String,
    base: Vec<String>,
    placeholder_keys: [Option<usize>; 3],
    fragment: Vec<String>,
    join_keys: [Option<usize>; 3],
    include_babs3: bool,
    key_matrix: Vec<KeyRow>,
    name_matrix: Vec<[Option<String>; 3]>,
    missing_values: Vec<String>,
}

#[test]
fn approval_joins() {
    let data: Vec<JoinEntry> =
        serde_json::from_str(include_str!("approval_data/joins.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let base = attach_placeholder(&chain_zma(&entry.base), entry.placeholder_keys).unwrap();
        let fragment = chain_zma(&entry.fragment).standard_form(base.count());
        let joined = match attach_fragment(
            &base,
            &fragment,
            "rts",
            4.0,
            entry.join_keys,
            entry.include_babs3,
        ) {
            Ok(zma) => zma,
            Err(e) => {
                failures.push(format!("[join] {}: {e}", entry.name));
                continue;
            }
        };

        if joined.key_matrix(false) != entry.key_matrix {
            failures.push(format!(
                "[keys] {}: expected {:?}, got {:?}",
                entry.name,
                entry.key_matrix,
                joined.key_matrix(false)
            ));
        }
        if joined.name_matrix() != entry.name_matrix {
            failures.push(format!(
                "[names] {}: expected {:?}, got {:?}",
                entry.name,
                entry.name_matrix,
                joined.name_matrix()
            ));
        }
        let missing = joined.missing_values();
        if missing != entry.missing_values {
            failures.push(format!(
                "[missing] {}: expected {:?}, got {:?}",
                entry.name, entry.missing_values, missing
            ));
        }
    }

    if !failures.is_empty() {
        panic!("{} join failures:\n{}", failures.len(), failures.join("\n"));
    }
}

// ---------------------------------------------------------------------------
// 3. Cartesian geometries
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GeometryEntry {
    name: String,
    symbols: Vec<String>,
    key_matrix: Vec<Vec<Option<usize>>>,
    values: BTreeMap<String, f64>,
    /// `(i, j, distance in angstrom)`
    distances: Vec<(usize, usize, f64)>,
}

#[test]
fn approval_geometries() {
    let data: Vec<GeometryEntry> =
        serde_json::from_str(include_str!("approval_data/geometries.json")).unwrap();
    let backend = Cartesian::default();

    let mut failures = Vec::new();
    for entry in &data {
        let zma = ZMatrix::from_data(
            &entry.symbols,
            &entry.key_matrix,
            None,
            &entry.values,
            Convention::TEXT,
        )
        .unwrap();
        let geo = backend.to_geometry(&zma).unwrap();
        let xyz = geo.coords_in_angstrom();
        for &(i, j, expected) in &entry.distances {
            let got = zmatcrab::geom::distance(xyz[i], xyz[j]);
            if !approx_eq(got, expected, 1e-6) {
                failures.push(format!(
                    "[distance] {} {i}-{j}: expected {expected}, got {got}",
                    entry.name
                ));
            }
        }

        // re-deriving must describe the same structure
        let rederived = backend.from_geometry(&geo).unwrap();
        let map = backend.atom_reordering(&geo);
        let rebuilt = backend.to_geometry(&rederived).unwrap().coords_in_angstrom();
        for &(i, j, expected) in &entry.distances {
            let got = zmatcrab::geom::distance(rebuilt[map[i]], rebuilt[map[j]]);
            if !approx_eq(got, expected, 1e-6) {
                failures.push(format!(
                    "[rederived] {} {i}-{j}: expected {expected}, got {got}",
                    entry.name
                ));
            }
        }
    }

    if !failures.is_empty() {
        panic!("{} geometry failures:\n{}", failures.len(), failures.join("\n"));
    }
}
