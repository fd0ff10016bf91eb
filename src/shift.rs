use crate::zmatrix::ZMatrix;

/// Translates atom keys numbered without placeholders into the numbering
/// of `zma`, which contains placeholder rows.
///
/// Each key `v` becomes `v + |{d : d <= v}|` over the placeholder keys `d`
/// of `zma`. Order and duplicates are kept.
///
/// # Examples
///
/// ```
/// use zmatcrab::{shift_for_placeholders, ZMatrix};
///
/// let zma = ZMatrix::construct(
///     &["C", "X", "H", "H"],
///     &[
///         [None, None, None],
///         [Some(0), None, None],
///         [Some(0), Some(1), None],
///         [Some(0), Some(1), Some(2)],
///     ],
///     None,
///     false,
/// )?;
/// assert_eq!(shift_for_placeholders([0, 1, 2, 1], &zma), vec![0, 2, 3, 2]);
/// # Ok::<(), zmatcrab::Error>(())
/// ```
pub fn shift_for_placeholders<I>(indices: I, zma: &ZMatrix) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let placeholders = zma.placeholder_keys();
    indices
        .into_iter()
        .map(|v| v + placeholders.iter().filter(|&&d| d <= v).count())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zma(symbols: &[&str]) -> ZMatrix {
        let keys: Vec<_> = (0..symbols.len())
            .map(|row| match row {
                0 => [None, None, None],
                1 => [Some(0), None, None],
                2 => [Some(1), Some(0), None],
                _ => [Some(row - 1), Some(row - 2), Some(row - 3)],
            })
            .collect();
        ZMatrix::construct(symbols, &keys, None, false).unwrap()
    }

    #[test]
    fn no_placeholders_is_identity() {
        let z = zma(&["C", "C", "H"]);
        assert_eq!(shift_for_placeholders(vec![2, 0, 1], &z), vec![2, 0, 1]);
    }

    #[test]
    fn leading_placeholder_shifts_everything() {
        let z = zma(&["X", "C", "H"]);
        assert_eq!(shift_for_placeholders(0..2, &z), vec![1, 2]);
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let z = zma(&["C", "C", "X", "H", "X", "H"]);
        assert_eq!(shift_for_placeholders([3, 1, 3, 2], &z), vec![4, 1, 4, 3]);
    }

    #[test]
    fn empty_input() {
        let z = zma(&["X"]);
        assert!(shift_for_placeholders(Vec::new(), &z).is_empty());
    }
}
