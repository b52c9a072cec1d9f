//! Identifier pattern resolution
//!
//! Maps identifier match patterns to positions on an axis. Positions for
//! each pattern are appended in pattern order, ascending within a pattern;
//! overlapping patterns are not deduplicated.

use gct_core::trim_padding;

/// How a pattern matches an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Identifier contains the pattern
    #[default]
    Substring,
    /// Identifier equals the pattern once trailing padding is trimmed
    Exact,
}

impl MatchMode {
    fn matches(self, identifier: &str, pattern: &str) -> bool {
        match self {
            MatchMode::Substring => identifier.contains(pattern),
            MatchMode::Exact => trim_str_padding(identifier) == pattern,
        }
    }
}

/// Caller's selection along one axis
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AxisSelection {
    /// Every position, in order
    #[default]
    All,
    /// Explicit positions, used as given
    Positions(Vec<usize>),
    /// Identifier match patterns
    Patterns(Vec<String>),
}

impl AxisSelection {
    /// Select by identifier patterns
    pub fn patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AxisSelection::Patterns(patterns.into_iter().map(Into::into).collect())
    }

    /// Select explicit positions
    pub fn positions(positions: impl Into<Vec<usize>>) -> Self {
        AxisSelection::Positions(positions.into())
    }

    /// Whether the selection is every position on the axis
    pub fn is_all(&self) -> bool {
        matches!(self, AxisSelection::All)
    }

    /// Resolve against an axis's identifiers
    pub fn resolve<I: AsRef<str>>(&self, identifiers: &[I], mode: MatchMode) -> Vec<usize> {
        match self {
            AxisSelection::All => resolve_indices::<_, &str>(identifiers, None, mode),
            AxisSelection::Positions(positions) => positions.clone(),
            AxisSelection::Patterns(patterns) => {
                resolve_indices(identifiers, Some(patterns.as_slice()), mode)
            }
        }
    }
}

/// Trim trailing NUL and whitespace padding from an identifier
pub fn trim_str_padding(identifier: &str) -> &str {
    // trim_padding only cuts at ASCII bytes, so the prefix stays valid UTF-8
    let len = trim_padding(identifier.as_bytes()).len();
    &identifier[..len]
}

/// Resolve patterns against identifiers into positions
///
/// `None` selects every position in order.
pub fn resolve_indices<I, P>(
    identifiers: &[I],
    patterns: Option<&[P]>,
    mode: MatchMode,
) -> Vec<usize>
where
    I: AsRef<str>,
    P: AsRef<str>,
{
    let Some(patterns) = patterns else {
        return (0..identifiers.len()).collect();
    };

    let mut positions = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        positions.extend(
            identifiers
                .iter()
                .enumerate()
                .filter(|(_, identifier)| mode.matches(identifier.as_ref(), pattern))
                .map(|(pos, _)| pos),
        );
    }
    positions
}

/// Resolve patterns and return the matching identifiers, trimmed of padding
pub fn matching_identifiers<I, P>(
    identifiers: &[I],
    patterns: Option<&[P]>,
    mode: MatchMode,
) -> Vec<String>
where
    I: AsRef<str>,
    P: AsRef<str>,
{
    resolve_indices(identifiers, patterns, mode)
        .into_iter()
        .map(|pos| trim_str_padding(identifiers[pos].as_ref()).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 4] = ["A1", "X", "B1", "A2"];

    #[test]
    fn test_none_selects_all() {
        assert_eq!(resolve_indices::<_, &str>(&IDS, None, MatchMode::Substring), vec![0, 1, 2, 3]);
        assert!(resolve_indices::<&str, &str>(&[], None, MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_pattern_order_then_position_order() {
        assert_eq!(
            resolve_indices(&IDS, Some(&["A", "B"][..]), MatchMode::Substring),
            vec![0, 3, 2]
        );
        assert_eq!(
            resolve_indices(&IDS, Some(&["B", "A"][..]), MatchMode::Substring),
            vec![2, 0, 3]
        );
    }

    #[test]
    fn test_overlapping_patterns_keep_duplicates() {
        assert_eq!(
            resolve_indices(&IDS, Some(&["A", "1"][..]), MatchMode::Substring),
            vec![0, 3, 0, 2]
        );
    }

    #[test]
    fn test_no_match_contributes_nothing() {
        assert_eq!(
            resolve_indices(&IDS, Some(&["Z", "X"][..]), MatchMode::Substring),
            vec![1]
        );
        assert!(resolve_indices(&IDS, Some(&["Z"][..]), MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_exact_mode_trims_padding() {
        let padded = ["200814_at   ", "200814_at_2\0\0", "1007_s_at"];
        assert_eq!(
            resolve_indices(&padded, Some(&["200814_at"][..]), MatchMode::Exact),
            vec![0]
        );
        assert_eq!(
            resolve_indices(&padded, Some(&["200814_at"][..]), MatchMode::Substring),
            vec![0, 1]
        );
    }

    #[test]
    fn test_axis_selection() {
        assert_eq!(AxisSelection::All.resolve(&IDS, MatchMode::Substring), vec![0, 1, 2, 3]);
        assert_eq!(
            AxisSelection::positions([3, 3, 0]).resolve(&IDS, MatchMode::Substring),
            vec![3, 3, 0]
        );
        assert_eq!(
            AxisSelection::patterns(["B", "A2"]).resolve(&IDS, MatchMode::Exact),
            vec![3]
        );
        assert!(AxisSelection::default().is_all());
    }

    #[test]
    fn test_matching_identifiers() {
        let padded = ["S1  ", "S2\0", "T1"];
        assert_eq!(
            matching_identifiers(&padded, Some(&["S"][..]), MatchMode::Substring),
            vec!["S1", "S2"]
        );
        assert_eq!(
            matching_identifiers::<_, &str>(&padded, None, MatchMode::Substring),
            vec!["S1", "S2", "T1"]
        );
    }
}
