//! Tunable thresholds for connectivity perception and join policies.

use serde::{Deserialize, Serialize};

/// Distance cutoffs used to perceive bonds from Cartesian coordinates.
///
/// All distances are in bohr. Placeholder atoms are never bonded.
///
/// # Examples
///
/// ```
/// use zmatcrab::ConnectivityConfig;
///
/// let loose = ConnectivityConfig {
///     heavy_heavy: 3.8,
///     ..Default::default()
/// };
/// assert_eq!(loose.heavy_hydrogen, 2.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Longest bond between two non-hydrogen atoms.
    pub heavy_heavy: f64,
    /// Longest bond between a hydrogen and a non-hydrogen atom.
    pub heavy_hydrogen: f64,
    /// Longest bond between two hydrogens.
    pub hydrogen_hydrogen: f64,
    /// Angles (radians) closer than this to 0 or π count as collinear
    /// when picking angle and dihedral references.
    pub collinear_tolerance: f64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            heavy_heavy: 3.45,
            heavy_hydrogen: 2.6,
            hydrogen_hydrogen: 1.9,
            collinear_tolerance: 1e-2,
        }
    }
}

/// When the third join dihedral (`babs3`) gets a default value.
///
/// The rule inspects the connectivity graph of the fragment being attached:
/// it holds when the graph has at least `min_atoms` atoms and, if
/// `require_terminal` is set, one of the forming-bond atoms is terminal
/// (exactly one neighbor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Babs3Rule {
    pub min_atoms: usize,
    pub require_terminal: bool,
}

impl Default for Babs3Rule {
    fn default() -> Self {
        Self {
            min_atoms: 3,
            require_terminal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ConnectivityConfig::default();
        assert_eq!(config.heavy_heavy, 3.45);
        assert_eq!(config.heavy_hydrogen, 2.6);
        assert_eq!(config.hydrogen_hydrogen, 1.9);

        let rule = Babs3Rule::default();
        assert_eq!(rule.min_atoms, 3);
        assert!(rule.require_terminal);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ConnectivityConfig = serde_json::from_str(r#"{"heavy_heavy": 4.0}"#).unwrap();
        assert_eq!(config.heavy_heavy, 4.0);
        assert_eq!(config.hydrogen_hydrogen, 1.9);
    }
}
