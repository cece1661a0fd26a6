// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tiered case-insensitive name lookup.
//!
//! Works over any sequence of `(name, item)` pairs so the same rules apply to
//! scene objects, groups and bindings alike. Within a tier the first item in
//! iteration order wins.

/// How closely a name matched a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Equal, ignoring case
    Exact,
    /// Name starts with the query, ignoring case
    Prefix,
    /// Name contains the query, ignoring case
    Substring,
}

impl MatchTier {
    fn classify(name: &str, query: &str) -> Option<Self> {
        if name == query {
            Some(Self::Exact)
        } else if name.starts_with(query) {
            Some(Self::Prefix)
        } else if name.contains(query) {
            Some(Self::Substring)
        } else {
            None
        }
    }
}

/// Find an item by name using every tier.
pub fn find<'n, T, I>(items: I, query: &str) -> Option<T>
where
    I: IntoIterator<Item = (&'n str, T)>,
{
    find_within(items, query, MatchTier::Substring).map(|(item, _)| item)
}

/// Find an item by name, accepting matches no looser than `loosest`.
///
/// Returns the item together with the tier it matched at. An empty query
/// never matches.
pub fn find_within<'n, T, I>(items: I, query: &str, loosest: MatchTier) -> Option<(T, MatchTier)>
where
    I: IntoIterator<Item = (&'n str, T)>,
{
    if query.is_empty() {
        return None;
    }
    let query = query.to_lowercase();
    let mut best: Option<(T, MatchTier)> = None;

    for (name, item) in items {
        let Some(tier) = MatchTier::classify(&name.to_lowercase(), &query) else {
            continue;
        };
        if tier > loosest {
            continue;
        }
        if tier == MatchTier::Exact {
            return Some((item, tier));
        }
        if best.as_ref().map_or(true, |(_, held)| tier < *held) {
            best = Some((item, tier));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs<'a>(names: &'a [&'a str]) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        names.iter().enumerate().map(|(i, n)| (*n, i))
    }

    #[test]
    fn test_exact_beats_prefix_regardless_of_order() {
        let names = ["Panel_Copy", "Other", "Panel"];
        assert_eq!(find(pairs(&names), "Panel"), Some(2));
        let names = ["Panel", "Panel_Copy"];
        assert_eq!(find(pairs(&names), "panel"), Some(0));
    }

    #[test]
    fn test_prefix_beats_substring() {
        let names = ["MyCube", "Cube.001", "Cube.002"];
        assert_eq!(find(pairs(&names), "CUBE"), Some(1));
    }

    #[test]
    fn test_substring_fallback() {
        let names = ["Left Wall", "Right Wall"];
        assert_eq!(find(pairs(&names), "wall"), Some(0));
        assert_eq!(find(pairs(&names), "floor"), None);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let names = ["Anything"];
        assert_eq!(find(pairs(&names), ""), None);
    }

    #[test]
    fn test_tier_limit() {
        let names = ["GeometryNodes.001"];
        assert_eq!(find_within(pairs(&names), "GeometryNodes", MatchTier::Exact), None);
        assert_eq!(
            find_within(pairs(&names), "GeometryNodes", MatchTier::Prefix),
            Some((0, MatchTier::Prefix))
        );
    }
}
