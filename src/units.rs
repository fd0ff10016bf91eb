//! Boundary conversions between user-facing and internal units.
//!
//! Inside the crate every distance is in bohr and every angle in radians.
//! Angstrom and degree values only appear at construction and query
//! boundaries, and pass through the functions below.

/// Bohr radius in angstrom (CODATA 2014).
pub const BOHR_IN_ANGSTROM: f64 = 0.529_177_210_67;

pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_IN_ANGSTROM;

pub const DEGREE_TO_RADIAN: f64 = std::f64::consts::PI / 180.0;

pub fn angstrom_to_bohr(value: f64) -> f64 {
    value * ANGSTROM_TO_BOHR
}

pub fn bohr_to_angstrom(value: f64) -> f64 {
    value * BOHR_IN_ANGSTROM
}

pub fn degree_to_radian(value: f64) -> f64 {
    value * DEGREE_TO_RADIAN
}

pub fn radian_to_degree(value: f64) -> f64 {
    value / DEGREE_TO_RADIAN
}
