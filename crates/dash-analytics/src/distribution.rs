//! Bucketed counts and ratio helpers

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered mapping from bucket label to count
///
/// Buckets are seeded up front so a record built from an empty listing still
/// carries every key. Insertion order is preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Distribution {
    buckets: IndexMap<String, u64>,
}

impl Distribution {
    /// Create a distribution with every label present at zero
    #[must_use]
    pub fn with_buckets<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            buckets: labels.into_iter().map(|l| (l.to_string(), 0)).collect(),
        }
    }

    /// Count one record in `label`, creating the bucket if needed
    #[inline]
    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    /// Count `n` records in `label`
    pub fn add(&mut self, label: &str, n: u64) {
        if let Some(count) = self.buckets.get_mut(label) {
            *count += n;
        } else {
            self.buckets.insert(label.to_string(), n);
        }
    }

    /// Count in `label`, zero when absent
    #[inline]
    #[must_use]
    pub fn get(&self, label: &str) -> u64 {
        self.buckets.get(label).copied().unwrap_or(0)
    }

    /// Sum over all buckets
    #[inline]
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    /// Bucket labels in display order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// `(label, count)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of buckets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// No buckets at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// `numerator / denominator` as a percentage in `[0, 100]`
///
/// Zero when the denominator is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 100.0).clamp(0.0, 100.0)
}
