use std::collections::BTreeMap;

use zmatcrab::geom::distance;
use zmatcrab::{Cartesian, Convention, GeometryBackend, KeyRow, ZMatrix};

struct Molecule {
    name: &'static str,
    symbols: &'static [&'static str],
    keys: &'static [KeyRow],
    // angstrom and degrees, default names
    values: &'static [(&'static str, f64)],
}

// No three atoms of any entry are collinear.
const MOLECULES: &[Molecule] = &[
    Molecule {
        name: "water",
        symbols: &["O", "H", "H"],
        keys: &[[None, None, None], [Some(0), None, None], [Some(0), Some(1), None]],
        values: &[("R2", 0.96), ("R3", 0.96), ("A3", 104.5)],
    },
    Molecule {
        name: "hydrogen peroxide",
        symbols: &["O", "O", "H", "H"],
        keys: &[
            [None, None, None],
            [Some(0), None, None],
            [Some(0), Some(1), None],
            [Some(1), Some(0), Some(2)],
        ],
        values: &[
            ("R2", 1.47),
            ("R3", 0.95),
            ("A3", 100.0),
            ("R4", 0.95),
            ("A4", 100.0),
            ("D4", 120.0),
        ],
    },
    Molecule {
        name: "formaldehyde",
        symbols: &["C", "O", "H", "H"],
        keys: &[
            [None, None, None],
            [Some(0), None, None],
            [Some(0), Some(1), None],
            [Some(0), Some(1), Some(2)],
        ],
        values: &[
            ("R2", 1.21),
            ("R3", 1.11),
            ("A3", 121.8),
            ("R4", 1.11),
            ("A4", 121.8),
            ("D4", 180.0),
        ],
    },
    Molecule {
        name: "methanol",
        symbols: &["C", "O", "H", "H", "H", "H"],
        keys: &[
            [None, None, None],
            [Some(0), None, None],
            [Some(1), Some(0), None],
            [Some(0), Some(1), Some(2)],
            [Some(0), Some(1), Some(3)],
            [Some(0), Some(1), Some(3)],
        ],
        values: &[
            ("R2", 1.43),
            ("R3", 0.96),
            ("A3", 108.9),
            ("R4", 1.09),
            ("A4", 109.5),
            ("D4", 180.0),
            ("R5", 1.09),
            ("A5", 109.5),
            ("D5", 120.0),
            ("R6", 1.09),
            ("A6", 109.5),
            ("D6", -120.0),
        ],
    },
    Molecule {
        name: "hydroxyl + placeholder",
        symbols: &["O", "H", "X"],
        keys: &[[None, None, None], [Some(0), None, None], [Some(0), Some(1), None]],
        values: &[("R2", 0.97), ("R3", 1.0), ("A3", 90.0)],
    },
];

fn build(mol: &Molecule) -> ZMatrix {
    let values: BTreeMap<String, f64> =
        mol.values.iter().map(|&(k, v)| (k.to_string(), v)).collect();
    let convention = Convention {
        one_indexed: false,
        ..Convention::TEXT
    };
    ZMatrix::from_data(mol.symbols, mol.keys, None, &values, convention)
        .unwrap_or_else(|e| panic!("invalid z-matrix for {}: {e}", mol.name))
}

fn all_permutations(n: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut state: Vec<usize> = (0..n).collect();
    result.push(state.clone());
    if n <= 1 {
        return result;
    }
    let mut c = vec![0usize; n];
    let mut i = 1;
    while i < n {
        if c[i] < i {
            if i % 2 == 0 {
                state.swap(0, i);
            } else {
                state.swap(c[i], i);
            }
            result.push(state.clone());
            c[i] += 1;
            i = 1;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
    result
}

#[test]
fn rederivation_is_order_independent() {
    let backend = Cartesian::default();
    let mut failures = Vec::new();

    for mol in MOLECULES {
        let geo = backend.to_geometry(&build(mol)).unwrap();
        let n = geo.count();

        for perm in all_permutations(n) {
            let permuted = geo.permute(&perm).unwrap();
            let zma = match backend.from_geometry(&permuted) {
                Ok(zma) => zma,
                Err(e) => {
                    failures.push(format!("{} {perm:?}: {e}", mol.name));
                    continue;
                }
            };

            for (i, row) in zma.rows().iter().enumerate() {
                let present = row.keys().iter().filter(|k| k.is_some()).count();
                if present != i.min(3) {
                    failures.push(format!("{} {perm:?}: row {i} has {present} keys", mol.name));
                }
            }

            let map = backend.atom_reordering(&permuted);
            let mut sorted = map.clone();
            sorted.sort_unstable();
            if sorted != (0..n).collect::<Vec<_>>() {
                failures.push(format!("{} {perm:?}: reordering {map:?}", mol.name));
                continue;
            }

            let rebuilt = backend.to_geometry(&zma).unwrap();
            for a in 0..n {
                if rebuilt.symbols()[map[a]] != permuted.symbols()[a] {
                    failures.push(format!("{} {perm:?}: symbol of atom {a} moved", mol.name));
                }
                for b in a + 1..n {
                    let expected = distance(permuted.coords()[a], permuted.coords()[b]);
                    let got = distance(rebuilt.coords()[map[a]], rebuilt.coords()[map[b]]);
                    if (expected - got).abs() > 1e-8 {
                        failures.push(format!(
                            "{} {perm:?}: distance {a}-{b} {expected} became {got}",
                            mol.name
                        ));
                    }
                }
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} re-derivation failures:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

#[test]
fn rederived_bond_graph_matches() {
    let backend = Cartesian::default();
    for mol in MOLECULES {
        let geo = backend.to_geometry(&build(mol)).unwrap();
        let map = backend.atom_reordering(&geo);
        let rebuilt = backend.to_geometry(&backend.from_geometry(&geo).unwrap()).unwrap();

        let before = backend.graph(&geo);
        let after = backend.graph(&rebuilt);
        assert_eq!(before.bond_count(), after.bond_count(), "{}", mol.name);
        for a in before.atom_keys() {
            for b in before.neighbors(a) {
                assert!(after.bond_between(map[a], map[b]), "{}: bond {a}-{b}", mol.name);
            }
        }
    }
}
