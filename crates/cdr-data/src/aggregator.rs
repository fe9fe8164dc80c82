//! Frequency counts, duration filters and endpoint-pair activity over a
//! [`RecordStore`].
//!
//! Every function rescans the store; nothing is cached between calls.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use cdr_core::error::{CdrError, Result};
use cdr_core::models::{CallType, Record};
use serde::Serialize;
use tracing::debug;

use crate::store::RecordStore;

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Label → count tally that remembers the order labels were first seen.
///
/// Iterates as `(label, count)` pairs, which is what chart renderers consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for label in labels {
            match index.get(label) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    index.insert(label, entries.len());
                    entries.push((label.to_string(), 1));
                }
            }
        }

        Self { entries }
    }

    /// Count for `label`, or `None` if it never occurred.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl IntoIterator for FrequencyTable {
    type Item = (String, usize);
    type IntoIter = std::vec::IntoIter<(String, usize)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ── EndpointPair ──────────────────────────────────────────────────────────────

/// Unordered pair of call endpoints, stored with `first <= second`.
///
/// `EndpointPair::new("2002", "1001") == EndpointPair::new("1001", "2002")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EndpointPair {
    pub first: String,
    pub second: String,
}

impl EndpointPair {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl fmt::Display for EndpointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// An endpoint pair and how many calls it exchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairActivity {
    pub pair: EndpointPair,
    pub count: usize,
}

// ── DurationStats ─────────────────────────────────────────────────────────────

/// Duration totals across a set of records.
///
/// `total_seconds` saturates at `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub total_seconds: u64,
    pub min_seconds: u64,
    pub max_seconds: u64,
    pub mean_seconds: f64,
}

impl DurationStats {
    fn add_record(&mut self, record: &dyn Record) {
        let d = record.duration();
        if self.count == 0 {
            self.min_seconds = d;
            self.max_seconds = d;
        } else {
            self.min_seconds = self.min_seconds.min(d);
            self.max_seconds = self.max_seconds.max(d);
        }
        self.count += 1;
        self.total_seconds = self.total_seconds.saturating_add(d);
    }
}

// ── CallAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that computes statistics over a [`RecordStore`].
pub struct CallAggregator;

impl CallAggregator {
    /// Number of calls per source, in first-seen order.
    pub fn counts_by_source(store: &RecordStore) -> FrequencyTable {
        FrequencyTable::tally(store.iter().map(|r| r.source()))
    }

    /// Number of calls per destination, in first-seen order.
    pub fn counts_by_destination(store: &RecordStore) -> FrequencyTable {
        FrequencyTable::tally(store.iter().map(|r| r.destination()))
    }

    /// Number of calls per call type. Every type is listed, zero counts included.
    pub fn counts_by_call_type(store: &RecordStore) -> Vec<(CallType, usize)> {
        let mut counts: BTreeMap<CallType, usize> =
            CallType::ALL.iter().map(|t| (*t, 0)).collect();
        for record in store.iter() {
            *counts.entry(record.call_type()).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Records with `min <= duration <= max`, in insertion order.
    ///
    /// `min > max` matches nothing.
    pub fn filter_by_duration(store: &RecordStore, min: u64, max: u64) -> Vec<&dyn Record> {
        store
            .iter()
            .filter(|r| min <= r.duration() && r.duration() <= max)
            .collect()
    }

    /// Call count for every unordered endpoint pair.
    ///
    /// Sorted by count descending; equal counts are ordered by ascending pair
    /// key, so the first element is always [`most_active_pair`](Self::most_active_pair).
    pub fn pair_counts(store: &RecordStore) -> Vec<PairActivity> {
        let mut groups: BTreeMap<EndpointPair, usize> = BTreeMap::new();
        for record in store.iter() {
            *groups
                .entry(EndpointPair::new(record.source(), record.destination()))
                .or_default() += 1;
        }

        let mut ranked: Vec<PairActivity> = groups
            .into_iter()
            .map(|(pair, count)| PairActivity { pair, count })
            .collect();
        // Stable sort keeps the BTreeMap's ascending key order within a count.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// The endpoint pair that exchanged the most calls, direction ignored.
    ///
    /// Among pairs sharing the highest count the lexicographically smallest
    /// pair wins. An empty store is [`CdrError::EmptyCollection`].
    pub fn most_active_pair(store: &RecordStore) -> Result<PairActivity> {
        let top = Self::pair_counts(store).into_iter().next().ok_or_else(|| {
            CdrError::EmptyCollection("no records to group into endpoint pairs".to_string())
        })?;
        debug!(
            "CallAggregator: most active pair {} with {} call(s)",
            top.pair, top.count
        );
        Ok(top)
    }

    /// Count, total, min, max and mean duration. All zero for an empty store.
    pub fn duration_stats(store: &RecordStore) -> DurationStats {
        let mut stats = DurationStats::default();
        for record in store.iter() {
            stats.add_record(record);
        }
        if stats.count > 0 {
            stats.mean_seconds = stats.total_seconds as f64 / stats.count as f64;
        }
        stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
