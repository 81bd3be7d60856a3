//! Grouping of point indices by a label taken from item metadata.

use std::collections::{BTreeSet, HashMap};

use crate::EvalError;

/// The value of the index field that marks a header row.
pub const HEADER_SENTINEL: &str = "index";

/// An ordered, duplicate-free set of point indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet(BTreeSet<usize>);

impl IndexSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds an index, returning whether it was new.
    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    /// Whether the set contains `index`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// The number of indices in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The largest index in the set.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Iterates over the indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// The number of indices in `[0, n)` that are not in the set.
    ///
    /// Assumes that every member is smaller than `n`.
    #[must_use]
    pub fn complement_len(&self, n: usize) -> usize {
        n.saturating_sub(self.len())
    }

    /// The indices in `[0, n)` that are not in the set, in ascending order.
    pub fn complement(&self, n: usize) -> impl Iterator<Item = usize> + '_ {
        (0..n).filter(|i| !self.0.contains(i))
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<It: IntoIterator<Item = usize>>(iter: It) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One raw row of item metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// The 1-based line number of the row in its source.
    pub line: usize,
    /// The fields of the row. The first field is the item index.
    pub fields: Vec<String>,
}

impl MetadataRecord {
    /// Creates a record from its line number and fields.
    pub fn new<S: Into<String>, F: IntoIterator<Item = S>>(line: usize, fields: F) -> Self {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this is a header row, i.e. the index field is the sentinel.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.fields.first().is_some_and(|f| f.trim() == HEADER_SENTINEL)
    }

    /// Parses the item index of the record.
    ///
    /// # Errors
    ///
    /// * If the record has no fields.
    /// * If the first field is not a non-negative integer.
    pub fn index(&self) -> Result<usize, EvalError> {
        let field = self.fields.first().ok_or_else(|| EvalError::MalformedRecord {
            line: self.line,
            reason: "record has no fields".to_string(),
        })?;
        field.trim().parse::<usize>().map_err(|_| EvalError::MalformedRecord {
            line: self.line,
            reason: format!("index field {field:?} is not a non-negative integer"),
        })
    }

    /// The value of the field in `column`.
    ///
    /// # Errors
    ///
    /// * If the record is too short to have `column`.
    pub fn label(&self, column: usize) -> Result<&str, EvalError> {
        self.fields
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| EvalError::MalformedRecord {
                line: self.line,
                reason: format!("label column {column} missing from a record with {} fields", self.fields.len()),
            })
    }
}

/// A mapping from label to the indices of the items with that label.
///
/// Labels are kept in the order in which they were first seen. The empty label
/// is kept here; excluding it is the scorer's business.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    /// The labels and their members, in first-encounter order.
    groups: Vec<(String, IndexSet)>,
    /// The position of each label in `groups`.
    positions: HashMap<String, usize>,
}

impl GroupIndex {
    /// Builds the index by grouping records on the value in `label_column`.
    ///
    /// Header rows, recognized by the `"index"` sentinel in the index field, are
    /// skipped.
    ///
    /// # Errors
    ///
    /// * `MalformedRecord` if a record lacks the index or label field, or if
    ///   its index is not an integer.
    pub fn build<'a, R>(records: R, label_column: usize) -> Result<Self, EvalError>
    where
        R: IntoIterator<Item = &'a MetadataRecord>,
    {
        let mut index = Self::default();
        for record in records {
            if record.is_header() {
                ftlog::debug!("Skipping header on line {}", record.line);
                continue;
            }
            let i = record.index()?;
            let label = record.label(label_column)?;
            index.insert(label, i);
        }
        ftlog::debug!("Built a group index with {} labels", index.len());
        Ok(index)
    }

    /// Adds the item `i` to the group with `label`.
    pub fn insert(&mut self, label: &str, i: usize) {
        if let Some(&p) = self.positions.get(label) {
            self.groups[p].1.insert(i);
        } else {
            self.positions.insert(label.to_string(), self.groups.len());
            self.groups.push((label.to_string(), core::iter::once(i).collect()));
        }
    }

    /// The number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The members of the group with `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&IndexSet> {
        self.positions.get(label).map(|&p| &self.groups[p].1)
    }

    /// Iterates over the labels and their members in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet)> {
        self.groups.iter().map(|(l, s)| (l.as_str(), s))
    }

    /// Checks that every member of every group is a row of a matrix with `n`
    /// points.
    ///
    /// # Errors
    ///
    /// * `IndexOutOfBounds` for the first offending group.
    pub fn validate(&self, n: usize) -> Result<(), EvalError> {
        for (label, members) in self.iter() {
            check_members(label, members, n)?;
        }
        Ok(())
    }
}

/// Checks that all `members` are smaller than `n`.
pub(crate) fn check_members(label: &str, members: &IndexSet, n: usize) -> Result<(), EvalError> {
    match members.max() {
        Some(index) if index >= n => Err(EvalError::IndexOutOfBounds {
            label: label.to_string(),
            index,
            cardinality: n,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupIndex, IndexSet, MetadataRecord};
    use crate::EvalError;

    fn records() -> Vec<MetadataRecord> {
        vec![
            MetadataRecord::new(1, ["index", "category", "name"]),
            MetadataRecord::new(2, ["0", "faces", "grin"]),
            MetadataRecord::new(3, ["1", "animals", "cat"]),
            MetadataRecord::new(4, ["2", "faces", "wink"]),
            MetadataRecord::new(5, ["3", "", "blank"]),
        ]
    }

    #[test]
    fn build_groups() -> Result<(), EvalError> {
        let records = records();
        let index = GroupIndex::build(&records, 1)?;

        assert_eq!(index.len(), 3);
        let labels = index.iter().map(|(l, _)| l).collect::<Vec<_>>();
        assert_eq!(labels, vec!["faces", "animals", ""]);
        assert_eq!(index.get("faces"), Some(&[0, 2].into_iter().collect::<IndexSet>()));
        assert_eq!(index.get("").map(IndexSet::len), Some(1));
        assert!(index.get("plants").is_none());

        Ok(())
    }

    #[test]
    fn malformed() {
        let bad_index = vec![MetadataRecord::new(7, ["seven", "faces"])];
        assert!(matches!(
            GroupIndex::build(&bad_index, 1),
            Err(EvalError::MalformedRecord { line: 7, .. })
        ));

        let short = vec![MetadataRecord::new(3, ["0"])];
        assert!(matches!(
            GroupIndex::build(&short, 1),
            Err(EvalError::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn complement() {
        let set = [1, 3].into_iter().collect::<IndexSet>();
        assert_eq!(set.complement(5).collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(set.complement_len(5), 3);
    }

    #[test]
    fn validate() -> Result<(), EvalError> {
        let records = records();
        let index = GroupIndex::build(&records, 1)?;
        index.validate(4)?;
        assert!(matches!(
            index.validate(3),
            Err(EvalError::IndexOutOfBounds { index: 3, .. })
        ));
        Ok(())
    }
}
