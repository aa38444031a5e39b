//! Filterable/sortable record views
//!
//! Every management screen is an instance of the same pattern:
//! - An in-memory, ordered sequence of records loaded once at mount
//! - A chain of ANDed filter predicates driven by the screen's filter state
//! - An optional comparator sort chosen from a fixed set
//! - Aggregates computed over the full record set (never the filtered view)
//! - Delete-by-id and merge-by-id edits applied directly to the sequence

pub mod aggregate;
pub mod filter;
pub mod sort;

pub use aggregate::{day_label, max_by, mean_by, sum_by, Tally};
pub use filter::{Choice, Filter, OptionSet, PriceRange, Recency, Search};
pub use sort::Comparator;

use crate::error::{DeskError, Result};

/// A row of domain data shown in a management screen
pub trait Record {
    /// Human-readable record kind, used in error messages
    const KIND: &'static str;

    /// Unique identifier
    fn id(&self) -> &str;
}

/// A partial update merged into an existing record
pub trait Patch<R> {
    fn apply(self, record: &mut R);
}

/// In-memory record set backing one screen
#[derive(Debug, Clone)]
pub struct RecordView<R> {
    records: Vec<R>,
}

impl<R> Default for RecordView<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> RecordView<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    /// The full record set in source order
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Records passing every predicate of `filter`, in source order
    pub fn filtered<F: Filter<R>>(&self, filter: &F) -> Vec<&R> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Filter, then order with `sort` when one is selected
    ///
    /// The source sequence is never reordered. Sorting is stable, so records
    /// with equal keys keep their source order.
    pub fn query<F, C>(&self, filter: &F, sort: Option<&C>) -> Vec<&R>
    where
        F: Filter<R>,
        C: Comparator<R>,
    {
        let mut rows = self.filtered(filter);
        if let Some(cmp) = sort {
            rows.sort_by(|a, b| cmp.compare(a, b));
        }
        rows
    }

    /// Remove the record with `id`, returning it
    pub fn remove(&mut self, id: &str) -> Result<R> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| DeskError::RecordNotFound {
                kind: R::KIND,
                id: id.to_string(),
            })?;
        Ok(self.records.remove(index))
    }

    /// Merge a partial update into the record with `id`
    pub fn update<P: Patch<R>>(&mut self, id: &str, patch: P) -> Result<&R> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| DeskError::RecordNotFound {
                kind: R::KIND,
                id: id.to_string(),
            })?;
        patch.apply(record);
        Ok(record)
    }

    /// Append a newly created record
    pub fn insert(&mut self, record: R) {
        self.records.push(record);
    }
}
