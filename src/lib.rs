pub mod atom;
pub mod bond_length;
pub mod config;
pub mod element;
pub mod error;
pub mod geom;
pub mod graph;
pub mod join;
pub mod matrix;
pub mod reorder;
pub mod shift;
pub mod units;
pub mod zmatrix;

pub use atom::{Symbol, PLACEHOLDER_SYMBOL};
pub use config::{Babs3Rule, ConnectivityConfig};
pub use element::Element;
pub use error::{Error, Result, Table};
pub use geom::{Cartesian, Geometry, GeometryBackend};
pub use graph::{GraphAtom, MolGraph};
pub use join::{attach_fragment, attach_placeholder, include_babs3, join};
pub use matrix::{KeyRow, NameRow};
pub use reorder::{
    join_atom_keys, reorder_for_migration, reorder_for_radical, JoinAtomKeys, MigrationZMatrix,
};
pub use shift::shift_for_placeholders;
pub use zmatrix::{Convention, ZMatrix, ZRow};
