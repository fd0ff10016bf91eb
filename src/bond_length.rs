//! Reference single-bond lengths.

use crate::element::Element;
use crate::units::angstrom_to_bohr;

// A-B single bond lengths in angstrom
const SINGLE_BONDS: [(Element, Element, f64); 13] = [
    (Element::H, Element::H, 0.74),
    (Element::H, Element::C, 1.09),
    (Element::H, Element::N, 1.01),
    (Element::H, Element::O, 0.95),
    (Element::H, Element::Cl, 1.275),
    (Element::C, Element::C, 1.54),
    (Element::C, Element::N, 1.47),
    (Element::C, Element::O, 1.43),
    (Element::N, Element::N, 1.45),
    (Element::N, Element::O, 1.45),
    (Element::O, Element::O, 1.40),
    (Element::C, Element::Cl, 1.74),
    (Element::Cl, Element::Cl, 2.0),
];

/// Standard single-bond length between two elements, in bohr.
///
/// Symmetric in its arguments. Returns `None` for pairs outside the table.
///
/// ```
/// use zmatcrab::{bond_length, Element};
///
/// let ch = bond_length::lookup(Element::C, Element::H).unwrap();
/// assert_eq!(Some(ch), bond_length::lookup(Element::H, Element::C));
/// assert!(bond_length::lookup(Element::Fe, Element::H).is_none());
/// ```
pub fn lookup(a: Element, b: Element) -> Option<f64> {
    SINGLE_BONDS
        .iter()
        .find(|&&(x, y, _)| (x, y) == (a, b) || (x, y) == (b, a))
        .map(|&(_, _, len)| angstrom_to_bohr(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carbon_carbon() {
        let cc = lookup(Element::C, Element::C).unwrap();
        assert!((cc - angstrom_to_bohr(1.54)).abs() < 1e-12);
    }

    #[test]
    fn symmetric_for_every_entry() {
        for &(a, b, _) in &SINGLE_BONDS {
            assert_eq!(lookup(a, b), lookup(b, a));
        }
    }

    #[test]
    fn missing_pair() {
        assert_eq!(lookup(Element::S, Element::S), None);
    }
}
