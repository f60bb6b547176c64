//! Text ranges and change batches
//!
//! Every planner produces one [`ChangeSet`]: a batch of `{from, to, insert}`
//! replacements addressed in byte offsets of the *unmodified* document.
//! [`ChangeSet::apply`] is the reference buffer: it validates the batch and
//! applies it as one indivisible edit, or rejects it whole.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::{TableError, TableResult};

/// A half-open byte range `from..to` in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

impl Range {
    pub fn new(from: usize, to: usize) -> Self {
        Range { from, to }
    }

    /// Zero-width range at `pos`
    pub fn cursor(pos: usize) -> Self {
        Range { from: pos, to: pos }
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }

    /// Whether `inner` lies completely inside this range (bounds inclusive)
    pub fn contains(&self, inner: &Range) -> bool {
        self.from <= inner.from && self.to >= inner.to
    }

    /// Text covered by this range, or `""` if it does not address `doc`
    pub fn slice<'a>(&self, doc: &'a str) -> &'a str {
        doc.get(self.from..self.to).unwrap_or("")
    }
}

/// A single replacement
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChangeSpec {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl ChangeSpec {
    pub fn replace(range: Range, insert: impl Into<String>) -> Self {
        ChangeSpec {
            from: range.from,
            to: range.to,
            insert: insert.into(),
        }
    }

    pub fn insert(pos: usize, insert: impl Into<String>) -> Self {
        ChangeSpec::replace(Range::cursor(pos), insert)
    }

    pub fn delete(range: Range) -> Self {
        ChangeSpec::replace(range, "")
    }

    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// A batch of non-overlapping changes applied atomically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChangeSet {
    changes: Vec<ChangeSpec>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: ChangeSpec) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeSpec> {
        self.changes.iter()
    }

    pub fn changes(&self) -> &[ChangeSpec] {
        &self.changes
    }

    /// Changes ordered by position; submission order is kept for inserts at one offset
    pub fn sorted(&self) -> Vec<&ChangeSpec> {
        let mut sorted: Vec<&ChangeSpec> = self.changes.iter().collect();
        sorted.sort_by_key(|c| (c.from, c.to));
        sorted
    }

    /// Check the batch against a document without applying it
    pub fn validate(&self, doc: &str) -> TableResult<()> {
        let sorted = self.sorted();
        for change in &sorted {
            if change.from > change.to
                || change.to > doc.len()
                || !doc.is_char_boundary(change.from)
                || !doc.is_char_boundary(change.to)
            {
                return Err(TableError::InvalidRange {
                    from: change.from,
                    to: change.to,
                    length: doc.len(),
                });
            }
        }
        for pair in sorted.windows(2) {
            if pair[1].from < pair[0].to {
                return Err(TableError::OverlappingChanges {
                    first: (pair[0].from, pair[0].to),
                    second: (pair[1].from, pair[1].to),
                });
            }
        }
        Ok(())
    }

    /// Apply every change to `doc`, producing the new document text
    pub fn apply(&self, doc: &str) -> TableResult<String> {
        self.validate(doc)?;

        let inserted: usize = self.changes.iter().map(|c| c.insert.len()).sum();
        let mut output = String::with_capacity(doc.len() + inserted);
        let mut cursor = 0;
        for change in self.sorted() {
            output.push_str(&doc[cursor..change.from]);
            output.push_str(&change.insert);
            cursor = change.to;
        }
        output.push_str(&doc[cursor..]);
        Ok(output)
    }
}

impl FromIterator<ChangeSpec> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ChangeSpec>>(iter: I) -> Self {
        ChangeSet {
            changes: iter.into_iter().collect(),
        }
    }
}

impl Extend<ChangeSpec> for ChangeSet {
    fn extend<I: IntoIterator<Item = ChangeSpec>>(&mut self, iter: I) {
        self.changes.extend(iter);
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeSpec;
    type IntoIter = std::vec::IntoIter<ChangeSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
