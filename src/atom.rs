use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::Error;

/// Symbol written for a placeholder atom.
pub const PLACEHOLDER_SYMBOL: &str = "X";

/// Atom label of a z-matrix row.
///
/// A row is either a real atom of some [`Element`] or a placeholder (`X`):
/// a massless, non-physical atom that only exists to give neighboring rows
/// a well-defined reference frame. Placeholders take part in key and name
/// matrices like any other row but are never bonded in a
/// [`MolGraph`](crate::graph::MolGraph).
///
/// # Examples
///
/// ```
/// use zmatcrab::{Element, Symbol};
///
/// let cl: Symbol = "CL".parse().unwrap();
/// assert_eq!(cl, Symbol::Element(Element::Cl));
/// assert!(cl.is_heavy());
///
/// let x: Symbol = "x".parse().unwrap();
/// assert!(x.is_placeholder());
/// assert_eq!(x.mass(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbol {
    Element(Element),
    Placeholder,
}

impl Symbol {
    pub fn element(self) -> Option<Element> {
        match self {
            Symbol::Element(e) => Some(e),
            Symbol::Placeholder => None,
        }
    }

    pub fn is_placeholder(self) -> bool {
        matches!(self, Symbol::Placeholder)
    }

    pub fn is_hydrogen(self) -> bool {
        matches!(self, Symbol::Element(Element::H))
    }

    /// Neither hydrogen nor a placeholder.
    pub fn is_heavy(self) -> bool {
        !self.is_placeholder() && !self.is_hydrogen()
    }

    /// Standard atomic weight in daltons; zero for a placeholder.
    pub fn mass(self) -> f64 {
        self.element().map_or(0.0, Element::atomic_weight)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Element(e) => e.symbol(),
            Symbol::Placeholder => PLACEHOLDER_SYMBOL,
        }
    }
}

impl From<Element> for Symbol {
    fn from(e: Element) -> Self {
        Symbol::Element(e)
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(PLACEHOLDER_SYMBOL) {
            return Ok(Symbol::Placeholder);
        }
        Element::parse(s)
            .map(Symbol::Element)
            .ok_or_else(|| Error::UnknownSymbol(s.to_string()))
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
