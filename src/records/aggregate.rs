//! Single-pass aggregates over a full record set
//!
//! Stat cards and charts are always derived from the complete set, so they
//! take a plain slice rather than a filtered view.

use chrono::{DateTime, Utc};

/// Sum of a numeric field
pub fn sum_by<R>(records: &[R], field: impl Fn(&R) -> f64) -> f64 {
    records.iter().map(field).sum()
}

/// Arithmetic mean of a numeric field; 0 for an empty set
pub fn mean_by<R>(records: &[R], field: impl Fn(&R) -> f64) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    sum_by(records, field) / records.len() as f64
}

/// Largest value of a count field; 0 for an empty set
pub fn max_by<R>(records: &[R], field: impl Fn(&R) -> usize) -> usize {
    records.iter().map(field).max().unwrap_or(0)
}

/// Chart bucket label for a timestamp, e.g. `Oct 23`
pub fn day_label(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d").to_string()
}

/// Group-by-key tally with parallel label and count sequences
///
/// Labels keep first-seen order from the source traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    labels: Vec<String>,
    counts: Vec<usize>,
}

impl Tally {
    /// Tally keys in traversal order
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut tally = Tally::default();
        for key in keys {
            tally.add(key.into(), 1);
        }
        tally
    }

    /// One bucket per label with an explicit value, zero counts kept
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, usize)>,
        K: Into<String>,
    {
        let mut tally = Tally::default();
        for (label, count) in pairs {
            tally.add(label.into(), count);
        }
        tally
    }

    /// One bar per entry in input order; repeated labels stay separate
    pub fn per_entry<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, usize)>,
        K: Into<String>,
    {
        let (labels, counts): (Vec<String>, Vec<usize>) = entries
            .into_iter()
            .map(|(label, count)| (label.into(), count))
            .unzip();
        Tally { labels, counts }
    }

    fn add(&mut self, label: String, count: usize) {
        match self.labels.iter().position(|l| *l == label) {
            Some(index) => self.counts[index] += count,
            None => {
                self.labels.push(label);
                self.counts.push(count);
            }
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.counts[i])
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mean_of_empty_set_is_zero() {
        let empty: Vec<f64> = Vec::new();
        let mean = mean_by(&empty, |p| *p);
        assert_eq!(mean, 0.0);
        assert!(!mean.is_nan());
        assert_eq!(max_by(&empty, |_| 3), 0);
        assert_eq!(sum_by(&empty, |p| *p), 0.0);
    }

    #[test]
    fn test_mean_and_sum() {
        let prices = [50.0, 150.0, 600.0];
        assert_eq!(sum_by(&prices, |p| *p), 800.0);
        assert!((mean_by(&prices, |p| *p) - 266.666).abs() < 0.01);
    }

    #[test]
    fn test_tally_keeps_first_seen_order() {
        let tally = Tally::from_keys(["Phones", "Audio", "Phones", "Cameras", "Audio"]);
        assert_eq!(tally.labels(), ["Phones", "Audio", "Cameras"]);
        assert_eq!(tally.counts(), [2, 2, 1]);
        assert_eq!(tally.get("Audio"), Some(2));
        assert_eq!(tally.get("Toys"), None);
    }

    #[test]
    fn test_tally_by_day_two_buckets() {
        let stamps = [
            Utc.with_ymd_and_hms(2024, 10, 23, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 18, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 23, 22, 30, 0).unwrap(),
        ];
        let tally = Tally::from_keys(stamps.iter().map(|ts| day_label(*ts)));
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.labels(), ["Oct 23", "Oct 18"]);
        assert_eq!(tally.total(), stamps.len());
    }

    #[test]
    fn test_tally_per_entry_keeps_repeated_labels() {
        let tally = Tally::per_entry([("Audio", 2), ("Audio", 3), ("Books", 0)]);
        assert_eq!(tally.labels(), ["Audio", "Audio", "Books"]);
        assert_eq!(tally.counts(), [2, 3, 0]);
        assert_eq!(tally.total(), 5);
    }

    #[test]
    fn test_tally_from_pairs_keeps_zero_buckets() {
        let tally = Tally::from_pairs([("Admins", 0), ("Users", 4)]);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.iter().collect::<Vec<_>>(), vec![("Admins", 0), ("Users", 4)]);
    }
}
