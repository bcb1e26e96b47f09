//! Ordered, fallback multi-key substring matching.
//!
//! Key groups are tried in order; within a group rows are scanned in
//! database order. A row matches a group when, for every field of the
//! group, the row's value is non-empty and occurs as a substring of the
//! target's value for that field. The first hit is returned as is, there
//! is no scoring.

use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use tracing::debug;

use super::Row;
use crate::schematic::Property;

/// Anything that can answer "what is the value of field X".
pub trait FieldSource {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl FieldSource for Row {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

/// A symbol's property mapping, as built by `Symbol::properties_dict`.
impl<K, S> FieldSource for IndexMap<K, &Property, S>
where
    K: Hash + Eq + Borrow<str>,
    S: BuildHasher,
{
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|property| property.value())
    }
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

/// A successful match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match<'a> {
    pub row: &'a Row,
    /// Position of the row in the database.
    pub row_index: usize,
    /// Position of the key group that matched.
    pub group_index: usize,
}

/// Find the first row matching `target`, trying `key_groups` in order.
///
/// Returns `None` when no group yields a hit.
pub fn match_symbol<'a, G, K>(
    rows: &'a [Row],
    key_groups: &[G],
    target: &impl FieldSource,
) -> Option<Match<'a>>
where
    G: AsRef<[K]>,
    K: AsRef<str>,
{
    key_groups
        .iter()
        .enumerate()
        .find_map(|(group_index, group)| {
            let group = group.as_ref();
            let row_index = rows.iter().position(|row| row_matches(row, group, target))?;
            debug!("row {row_index} matched by key group {group_index}");
            Some(Match {
                row: &rows[row_index],
                row_index,
                group_index,
            })
        })
}

/// Whether `row` satisfies every field of `group` against `target`.
///
/// An empty group never matches.
pub fn row_matches<K: AsRef<str>>(row: &Row, group: &[K], target: &impl FieldSource) -> bool {
    !group.is_empty()
        && group.iter().all(|field| {
            let field = field.as_ref();
            let wanted = row.value(field);
            !wanted.is_empty()
                && target
                    .field_value(field)
                    .is_some_and(|actual| actual.contains(wanted))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(fields: &[(&str, &str)]) -> Row {
        fields.iter().copied().collect()
    }

    fn target(fields: &[(&str, &str)]) -> HashMap<String, String> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    #[case("ACME", "ACME-2024", true)]
    #[case("ACME-2024", "ACME", false)]
    #[case("10k", "10k", true)]
    #[case("", "anything", false)]
    fn test_substring_semantics(#[case] row_value: &str, #[case] target_value: &str, #[case] hit: bool) {
        let rows = [row(&[("Manufacturer", row_value)])];
        let target = target(&[("Manufacturer", target_value)]);
        assert_eq!(
            match_symbol(&rows, &[["Manufacturer"]], &target).is_some(),
            hit
        );
    }

    #[test]
    fn test_first_group_wins() {
        let rows = [
            row(&[("A", "a1"), ("B", "b1"), ("C", "c9")]),
            row(&[("A", "zz"), ("B", "zz"), ("C", "c1")]),
        ];
        let groups = [vec!["A", "B"], vec!["C"]];

        // Only the second group matches.
        let only_c = target(&[("A", "nope"), ("B", "nope"), ("C", "c1")]);
        let hit = match_symbol(&rows, &groups, &only_c).unwrap();
        assert_eq!((hit.group_index, hit.row_index), (1, 1));

        // Both groups could match; group one is preferred.
        let both = target(&[("A", "a1"), ("B", "b1"), ("C", "c1")]);
        let hit = match_symbol(&rows, &groups, &both).unwrap();
        assert_eq!((hit.group_index, hit.row_index), (0, 0));
    }

    #[test]
    fn test_first_row_wins_within_group() {
        let rows = [row(&[("Value", "10")]), row(&[("Value", "10k")])];
        let hit = match_symbol(&rows, &[["Value"]], &target(&[("Value", "10k")])).unwrap();
        assert_eq!(hit.row_index, 0);
    }

    #[test]
    fn test_every_field_of_group_must_match() {
        let rows = [row(&[("A", "x"), ("B", "y")])];
        assert!(match_symbol(&rows, &[["A", "B"]], &target(&[("A", "x"), ("B", "q")])).is_none());
        assert!(match_symbol(&rows, &[["A", "B"]], &target(&[("A", "x")])).is_none());
        assert!(match_symbol(&rows, &[["A", "B"]], &target(&[("A", "x"), ("B", "y")])).is_some());
    }

    #[test]
    fn test_missing_row_field_never_matches() {
        let rows = [row(&[("A", "x")])];
        assert!(match_symbol(&rows, &[["B"]], &target(&[("B", "x")])).is_none());
    }

    #[test]
    fn test_empty_group_never_matches() {
        let rows = [row(&[("A", "x")])];
        let groups: [&[&str]; 1] = [&[]];
        assert!(match_symbol(&rows, &groups, &target(&[("A", "x")])).is_none());
    }

    #[test]
    fn test_no_groups_no_rows() {
        let empty: [Vec<String>; 0] = [];
        assert!(match_symbol(&[row(&[("A", "x")])], &empty, &target(&[])).is_none());
        assert!(match_symbol(&[], &[["A"]], &target(&[("A", "x")])).is_none());
    }
}
