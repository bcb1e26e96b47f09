//! Component database: ordered rows of named string fields.
//!
//! The database is produced by an external tabular source (see the `csv`
//! feature) and consumed by the [`matcher`].

#[cfg(feature = "csv")]
mod csv;
pub mod matcher;

pub use matcher::{FieldSource, Match};

use smol_str::SmolStr;

use crate::base::FxIndexMap;

/// One database record: field name → value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    fields: FxIndexMap<SmolStr, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<SmolStr>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value of `field`; absent fields read as empty.
    pub fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<SmolStr>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (field, value) in iter {
            row.insert(field, value);
        }
        row
    }
}

/// Ordered rows plus the ordered list of recognised field names.
///
/// Row order is significant: the first matching row wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentDb {
    prop_names: Vec<SmolStr>,
    rows: Vec<Row>,
}

impl ComponentDb {
    /// An empty database with the given schema.
    pub fn new<I, S>(prop_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            prop_names: prop_names.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builder form of [`ComponentDb::push_row`].
    pub fn with_row(mut self, row: Row) -> Self {
        self.push_row(row);
        self
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Field names propagated into a symbol on a match, in schema order.
    pub fn prop_names(&self) -> &[SmolStr] {
        &self.prop_names
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the row matching `target`, trying `key_groups` in priority order.
    ///
    /// See [`matcher::match_symbol`].
    pub fn match_symbol<G, K>(&self, key_groups: &[G], target: &impl FieldSource) -> Option<Match<'_>>
    where
        G: AsRef<[K]>,
        K: AsRef<str>,
    {
        matcher::match_symbol(&self.rows, key_groups, target)
    }
}
