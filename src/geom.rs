//! Cartesian geometries and conversion to and from z-matrices.
//!
//! [`GeometryBackend`] is the seam the reorder and join operations use to
//! leave internal coordinates: build Cartesian coordinates, re-derive a
//! z-matrix, and perceive connectivity. [`Cartesian`] is the built-in
//! implementation.
//!
//! # Re-derivation
//!
//! [`Cartesian::from_geometry`] does not keep the input atom order. Atoms
//! are taken in input order, except that an atom is deferred until one of
//! its bonded partners has been placed (placeholders are never deferred),
//! so every row after the first of a fragment can reference a bonded atom.
//! [`GeometryBackend::atom_reordering`] reports the resulting old → new key
//! map.

use glam::f64::DVec3;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::atom::Symbol;
use crate::config::ConnectivityConfig;
use crate::error::{Error, Result};
use crate::graph::MolGraph;
use crate::matrix::{default_name, KeyRow, NameRow};
use crate::units;
use crate::zmatrix::ZMatrix;

/// Atom symbols with Cartesian coordinates in bohr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    symbols: Vec<Symbol>,
    coords: Vec<[f64; 3]>,
}

impl Geometry {
    pub fn new(symbols: Vec<Symbol>, coords: Vec<[f64; 3]>) -> Result<Self> {
        if symbols.len() != coords.len() {
            return Err(Error::CoordinateCount {
                atoms: symbols.len(),
                coordinates: coords.len(),
            });
        }
        Ok(Self { symbols, coords })
    }

    /// Builds a geometry from coordinates in angstrom.
    pub fn from_angstrom(symbols: Vec<Symbol>, coords: &[[f64; 3]]) -> Result<Self> {
        let coords = coords
            .iter()
            .map(|xyz| xyz.map(units::angstrom_to_bohr))
            .collect();
        Self::new(symbols, coords)
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn coords(&self) -> &[[f64; 3]] {
        &self.coords
    }

    pub fn coords_in_angstrom(&self) -> Vec<[f64; 3]> {
        self.coords
            .iter()
            .map(|xyz| xyz.map(units::bohr_to_angstrom))
            .collect()
    }

    pub fn atoms(&self) -> impl Iterator<Item = (Symbol, [f64; 3])> + '_ {
        self.symbols.iter().copied().zip(self.coords.iter().copied())
    }

    pub fn xyz(&self, key: usize) -> Option<[f64; 3]> {
        self.coords.get(key).copied()
    }

    /// Reorders atoms so that new atom `i` is old atom `order[i]`.
    pub fn permute(&self, order: &[usize]) -> Result<Geometry> {
        validate_permutation(order, self.count())?;
        Ok(Geometry {
            symbols: order.iter().map(|&old| self.symbols[old]).collect(),
            coords: order.iter().map(|&old| self.coords[old]).collect(),
        })
    }

    /// Exchanges the positions of atoms `a` and `b` in the atom order.
    pub fn swap(&self, a: usize, b: usize) -> Result<Geometry> {
        let mut order: Vec<usize> = (0..self.count()).collect();
        for key in [a, b] {
            if key >= order.len() {
                return Err(Error::out_of_range(key, order.len()));
            }
        }
        order.swap(a, b);
        self.permute(&order)
    }

    pub fn distance(&self, a: usize, b: usize) -> Option<f64> {
        Some(distance(self.xyz(a)?, self.xyz(b)?))
    }

    /// Angle `a-b-c` at `b`, in radians.
    pub fn central_angle(&self, a: usize, b: usize, c: usize) -> Option<f64> {
        Some(central_angle(self.xyz(a)?, self.xyz(b)?, self.xyz(c)?))
    }

    /// Dihedral angle `a-b-c-d`, in radians.
    pub fn dihedral_angle(&self, a: usize, b: usize, c: usize, d: usize) -> Option<f64> {
        Some(dihedral_angle(
            self.xyz(a)?,
            self.xyz(b)?,
            self.xyz(c)?,
            self.xyz(d)?,
        ))
    }
}

pub(crate) fn validate_permutation(order: &[usize], n: usize) -> Result<()> {
    let invalid = || Error::InvalidPermutation {
        order: order.to_vec(),
        count: n,
    };
    if order.len() != n {
        return Err(invalid());
    }
    let mut seen = vec![false; n];
    for &idx in order {
        if idx >= n || seen[idx] {
            return Err(invalid());
        }
        seen[idx] = true;
    }
    Ok(())
}

/// Geometry operations needed to reorder z-matrices.
///
/// Implementations must not cache connectivity between calls: every call
/// works from the geometry it is given.
pub trait GeometryBackend {
    /// Cartesian coordinates of a z-matrix. Fails if a coordinate has no
    /// value.
    fn to_geometry(&self, zma: &ZMatrix) -> Result<Geometry>;

    /// A freshly derived z-matrix for `geo`, possibly in a different atom
    /// order.
    fn from_geometry(&self, geo: &Geometry) -> Result<ZMatrix>;

    /// Key map of [`from_geometry`](Self::from_geometry): entry `old` holds
    /// the row of geometry atom `old` in the derived z-matrix.
    fn atom_reordering(&self, geo: &Geometry) -> Vec<usize>;

    /// Bond connectivity of `geo`, without placeholder atoms.
    fn graph(&self, geo: &Geometry) -> MolGraph;
}

/// Built-in [`GeometryBackend`]: NeRF placement of internal coordinates and
/// distance-based connectivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cartesian {
    pub config: ConnectivityConfig,
}

impl Cartesian {
    pub fn new(config: ConnectivityConfig) -> Self {
        Self { config }
    }

    // order[new] = old
    fn canonical_order(&self, geo: &Geometry) -> Vec<usize> {
        let graph = self.graph(geo);
        let n = geo.count();
        let mut placed = vec![false; n];
        let mut order = Vec::with_capacity(n);
        while order.len() < n {
            let eligible = |k: usize| {
                geo.symbols[k].is_placeholder() || graph.neighbors(k).iter().any(|&j| placed[j])
            };
            let next = (0..n)
                .find(|&k| !placed[k] && !order.is_empty() && eligible(k))
                .or_else(|| (0..n).find(|&k| !placed[k]));
            let Some(next) = next else { break };
            placed[next] = true;
            order.push(next);
        }
        order
    }

    fn row_references(&self, xyz: &[DVec3], graph: &MolGraph, row: usize) -> KeyRow {
        let prior = |k: &usize| *k < row;
        let by_distance_to = |origin: usize| {
            let mut keys: Vec<usize> = (0..row).collect();
            keys.sort_by(|&p, &q| {
                xyz[p]
                    .distance(xyz[origin])
                    .total_cmp(&xyz[q].distance(xyz[origin]))
            });
            keys
        };

        let mut keys: KeyRow = [None; 3];
        if row == 0 {
            return keys;
        }

        let a = graph
            .neighbors(row)
            .into_iter()
            .find(prior)
            .unwrap_or_else(|| by_distance_to(row)[0]);
        keys[0] = Some(a);
        if row == 1 {
            return keys;
        }

        let tol = self.config.collinear_tolerance;
        let candidates_b = dedup(
            graph
                .neighbors(a)
                .into_iter()
                .filter(prior)
                .chain(by_distance_to(a))
                .filter(|&k| k != a),
        );
        let b = pick_non_collinear(&candidates_b, tol, |k| central_angle(xyz[row], xyz[a], xyz[k]));
        keys[1] = Some(b);
        if row == 2 {
            return keys;
        }

        let candidates_c = dedup(
            graph
                .neighbors(b)
                .into_iter()
                .chain(graph.neighbors(a))
                .filter(prior)
                .chain(by_distance_to(b))
                .filter(|&k| k != a && k != b),
        );
        let c = pick_non_collinear(&candidates_c, tol, |k| central_angle(xyz[a], xyz[b], xyz[k]));
        keys[2] = Some(c);
        keys
    }
}

impl GeometryBackend for Cartesian {
    fn to_geometry(&self, zma: &ZMatrix) -> Result<Geometry> {
        let mut coords: Vec<DVec3> = Vec::with_capacity(zma.count());
        for (row, zrow) in zma.rows().iter().enumerate() {
            let keys = zrow.keys();
            let xyz = match (keys[0], keys[1], keys[2]) {
                (None, _, _) => DVec3::ZERO,
                (Some(a), None, _) => coords[a] + zma.coordinate(row, 0)? * DVec3::Z,
                (Some(a), Some(b), dihedral) => {
                    let r = zma.coordinate(row, 0)?;
                    let theta = zma.coordinate(row, 1)?;
                    let (pc, phi) = match dihedral {
                        Some(c) => (coords[c], zma.coordinate(row, 2)?),
                        // keeps the third atom in the xz-plane
                        None => (coords[b] + DVec3::X, 0.0),
                    };
                    place(coords[a], coords[b], pc, r, theta, phi)
                }
            };
            coords.push(xyz);
        }
        Geometry::new(zma.symbols(), coords.iter().map(DVec3::to_array).collect())
    }

    fn from_geometry(&self, geo: &Geometry) -> Result<ZMatrix> {
        let order = self.canonical_order(geo);
        let canon = geo.permute(&order)?;
        let graph = self.graph(&canon);
        let xyz: Vec<DVec3> = canon.coords.iter().copied().map(DVec3::from).collect();

        let mut keys = Vec::with_capacity(canon.count());
        let mut names = Vec::with_capacity(canon.count());
        let mut values = std::collections::BTreeMap::new();
        for row in 0..canon.count() {
            let refs = self.row_references(&xyz, &graph, row);
            trace!("row {row} ({}) references {refs:?}", canon.symbols[row]);
            let mut row_names: NameRow = Default::default();
            let measured = match refs {
                [Some(a), None, None] => vec![distance(xyz[row], xyz[a])],
                [Some(a), Some(b), None] => vec![
                    distance(xyz[row], xyz[a]),
                    central_angle(xyz[row], xyz[a], xyz[b]),
                ],
                [Some(a), Some(b), Some(c)] => vec![
                    distance(xyz[row], xyz[a]),
                    central_angle(xyz[row], xyz[a], xyz[b]),
                    dihedral_angle(xyz[row], xyz[a], xyz[b], xyz[c]),
                ],
                _ => Vec::new(),
            };
            for (column, value) in measured.into_iter().enumerate() {
                let name = default_name(row, column, 0);
                values.insert(name.clone(), value);
                row_names[column] = Some(name);
            }
            keys.push(refs);
            names.push(row_names);
        }
        ZMatrix::assemble(canon.symbols.clone(), &keys, &names, values)
    }

    fn atom_reordering(&self, geo: &Geometry) -> Vec<usize> {
        let order = self.canonical_order(geo);
        let mut old_to_new = vec![0; order.len()];
        for (new, &old) in order.iter().enumerate() {
            old_to_new[old] = new;
        }
        old_to_new
    }

    fn graph(&self, geo: &Geometry) -> MolGraph {
        MolGraph::from_geometry(geo, &self.config)
    }
}

fn dedup(keys: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::new();
    for k in keys {
        if !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

// first candidate whose angle is clear of 0 and π, else the first candidate
fn pick_non_collinear(candidates: &[usize], tol: f64, angle: impl Fn(usize) -> f64) -> usize {
    candidates
        .iter()
        .copied()
        .find(|&k| {
            let theta = angle(k);
            theta > tol && std::f64::consts::PI - theta > tol
        })
        .unwrap_or(candidates[0])
}

/// NeRF placement: the point at distance `r` from `pa`, with angle `theta`
/// to `pb` and dihedral `phi` to `pc`.
fn place(pa: DVec3, pb: DVec3, pc: DVec3, r: f64, theta: f64, phi: f64) -> DVec3 {
    let bc = (pa - pb).normalize();
    let n = (pb - pc).cross(bc);
    let n = if n.length_squared() < 1e-16 {
        perpendicular(bc)
    } else {
        n.normalize()
    };
    let m = n.cross(bc);
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    pa + r * (-cos_t * bc + sin_t * cos_p * m - sin_t * sin_p * n)
}

// any unit vector perpendicular to the unit vector `v`
fn perpendicular(v: DVec3) -> DVec3 {
    let arb = if v.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    arb.cross(v).normalize()
}

pub fn distance(a: impl Into<DVec3>, b: impl Into<DVec3>) -> f64 {
    a.into().distance(b.into())
}

/// Angle `a-b-c` at `b`, in radians.
pub fn central_angle(a: impl Into<DVec3>, b: impl Into<DVec3>, c: impl Into<DVec3>) -> f64 {
    let b = b.into();
    let u = (a.into() - b).normalize();
    let v = (c.into() - b).normalize();
    u.dot(v).clamp(-1.0, 1.0).acos()
}

/// Dihedral angle `a-b-c-d` in radians, in `(-π, π]`.
pub fn dihedral_angle(
    a: impl Into<DVec3>,
    b: impl Into<DVec3>,
    c: impl Into<DVec3>,
    d: impl Into<DVec3>,
) -> f64 {
    let (a, b, c, d) = (a.into(), b.into(), c.into(), d.into());
    let b1 = c - b;
    let n1 = (b - a).cross(b1);
    let n2 = b1.cross(d - c);
    let m1 = n1.cross(b1.normalize());
    m1.dot(n2).atan2(n1.dot(n2))
}
