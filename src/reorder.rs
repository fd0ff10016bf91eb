//! Atom reordering driven by heavy-atom chains.
//!
//! Each operation materializes a geometry, perceives connectivity from it,
//! and re-derives a fresh z-matrix. Nothing about the connectivity is kept
//! between calls.

use std::collections::BTreeSet;

use log::debug;

use crate::error::{Error, Result, Table};
use crate::geom::{validate_permutation, GeometryBackend};
use crate::zmatrix::ZMatrix;

/// Result of [`reorder_for_migration`].
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationZMatrix {
    /// The re-derived z-matrix.
    pub zmatrix: ZMatrix,
    /// Atom order applied to the input geometry: position `i` holds the
    /// input key placed `i`-th.
    pub order: Vec<usize>,
    /// Input key → key in `zmatrix`.
    pub key_map: Vec<usize>,
    pub forming_bond_keys: BTreeSet<usize>,
    pub breaking_bond_keys: BTreeSet<BTreeSet<usize>>,
}

/// Reorders a z-matrix for a migration transition-state search.
///
/// The atom order becomes: the heavy atoms of the longest chain starting
/// at `forming_atom_key`, the other non-hydrogen atoms, the other
/// hydrogens, and finally `migrating_key`. The reordered geometry is turned
/// back into a z-matrix by `backend`, and the bond keys are translated into
/// its numbering.
///
/// A forming atom without a chain leaves the first group empty, and a
/// heavy migrating atom is simply moved to the end; neither is an error.
///
/// The backend's re-derived z-matrix must keep every atom and its
/// reordering must be a permutation; otherwise [`Error::Shape`] or
/// [`Error::InvalidPermutation`] is returned.
pub fn reorder_for_migration<G: GeometryBackend>(
    zma: &ZMatrix,
    forming_atom_key: usize,
    migrating_key: usize,
    forming_bond_keys: &BTreeSet<usize>,
    breaking_bond_keys: &BTreeSet<BTreeSet<usize>>,
    backend: &G,
) -> Result<MigrationZMatrix> {
    let count = zma.count();
    let keys = [forming_atom_key, migrating_key]
        .into_iter()
        .chain(forming_bond_keys.iter().copied())
        .chain(breaking_bond_keys.iter().flatten().copied());
    for key in keys {
        if key >= count {
            return Err(Error::out_of_range(key, count));
        }
    }

    let geo = backend.to_geometry(zma)?;
    let graph = backend.graph(&geo);
    let chain = graph
        .component_of(forming_atom_key)
        .and_then(|component| component.longest_chain(forming_atom_key))
        .unwrap_or_default();

    let symbols = zma.symbols();
    let chain_atoms: Vec<usize> = chain
        .into_iter()
        .filter(|&k| !symbols[k].is_hydrogen() && k != migrating_key)
        .collect();
    let other_heavy = (0..count)
        .filter(|&k| !symbols[k].is_hydrogen() && k != migrating_key && !chain_atoms.contains(&k));
    let hydrogens = (0..count).filter(|&k| symbols[k].is_hydrogen() && k != migrating_key);
    let order: Vec<usize> = chain_atoms
        .iter()
        .copied()
        .chain(other_heavy)
        .chain(hydrogens)
        .chain([migrating_key])
        .collect();
    debug!("migration order {order:?} from chain {chain_atoms:?}");

    let reordered = geo.permute(&order)?;
    let zmatrix = backend.from_geometry(&reordered)?;
    if zmatrix.count() != count {
        return Err(Error::shape(Table::Keys, count, zmatrix.count(), 3));
    }
    let reordering = backend.atom_reordering(&reordered);
    validate_permutation(&reordering, count)?;

    let mut key_map = vec![0; count];
    for (position, &old) in order.iter().enumerate() {
        key_map[old] = reordering[position];
    }
    let forming_bond_keys = forming_bond_keys.iter().map(|&k| key_map[k]).collect();
    let breaking_bond_keys = breaking_bond_keys
        .iter()
        .map(|bond| bond.iter().map(|&k| key_map[k]).collect())
        .collect();
    debug!("migration key map {key_map:?}");

    Ok(MigrationZMatrix {
        zmatrix,
        order,
        key_map,
        forming_bond_keys,
        breaking_bond_keys,
    })
}

/// Re-derives `zma` with `radical_key` as its first atom.
pub fn reorder_for_radical<G: GeometryBackend>(
    zma: &ZMatrix,
    radical_key: usize,
    backend: &G,
) -> Result<ZMatrix> {
    let geo = backend.to_geometry(zma)?.swap(0, radical_key)?;
    debug!("radical site {radical_key} moved to the first row");
    backend.from_geometry(&geo)
}

/// Reference atoms available for joining another fragment at one atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinAtomKeys {
    pub second: Option<usize>,
    pub third: Option<usize>,
    /// Whether `second` and `third` continue a heavy-atom chain from the
    /// join atom.
    pub chain: bool,
}

/// Picks the angle and dihedral reference atoms for a join at `atom_key`.
///
/// The longest chain from `atom_key` supplies them when it has three or
/// more atoms. A two-atom chain gives its second atom, plus the lowest
/// other neighbor of `atom_key` if there is one.
pub fn join_atom_keys<G: GeometryBackend>(
    zma: &ZMatrix,
    atom_key: usize,
    backend: &G,
) -> Result<JoinAtomKeys> {
    if atom_key >= zma.count() {
        return Err(Error::out_of_range(atom_key, zma.count()));
    }
    let graph = backend.graph(&backend.to_geometry(zma)?);
    let chain = graph
        .longest_chain(atom_key)
        .unwrap_or_else(|| vec![atom_key]);
    let neighbors = graph.neighbors(atom_key);

    let keys = match chain[..] {
        [_] => JoinAtomKeys::default(),
        [_, second] => JoinAtomKeys {
            second: Some(second),
            third: neighbors.iter().copied().find(|&k| k != second),
            chain: false,
        },
        [_, second, third, ..] => JoinAtomKeys {
            second: Some(second),
            third: Some(third),
            chain: true,
        },
        [] => JoinAtomKeys::default(),
    };
    Ok(keys)
}
