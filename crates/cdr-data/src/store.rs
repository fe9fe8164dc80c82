//! Ordered, append-only storage for call records.

use cdr_core::error::Result;
use cdr_core::models::{Record, RecordKey};
use cdr_core::time_utils::parse_time_range;
use tracing::debug;

// ── RecordStore ───────────────────────────────────────────────────────────────

/// Every call record loaded for one analysis run, in insertion order.
///
/// Duplicates are kept. Records are owned by the store once added and are
/// never removed.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Box<dyn Record>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the end of the store.
    pub fn add<R: Record + 'static>(&mut self, record: R) {
        self.add_boxed(Box::new(record));
    }

    /// Append an already boxed record.
    pub fn add_boxed(&mut self, record: Box<dyn Record>) {
        debug!(
            "RecordStore: adding {} -> {} ({})",
            record.source(),
            record.destination(),
            record.call_type()
        );
        self.records.push(record);
    }

    /// All records whose source and destination match exactly, in insertion
    /// order. Matching is case-sensitive.
    pub fn find_by_endpoints(&self, source: &str, destination: &str) -> Vec<&dyn Record> {
        let found: Vec<&dyn Record> = self
            .iter()
            .filter(|r| r.source() == source && r.destination() == destination)
            .collect();
        debug!(
            "RecordStore: {} record(s) from {} to {}",
            found.len(),
            source,
            destination
        );
        found
    }

    /// All records with `start <= timestamp <= end`, in insertion order.
    ///
    /// Both bounds use the `YYYY-MM-DD HH:MM:SS` format; a malformed bound is
    /// [`CdrError::InvalidFormat`](cdr_core::CdrError::InvalidFormat). An
    /// inverted window returns nothing.
    pub fn find_by_time_range(&self, start: &str, end: &str) -> Result<Vec<&dyn Record>> {
        let (start_ts, end_ts) = parse_time_range(start, end)?;
        let found: Vec<&dyn Record> = self
            .iter()
            .filter(|r| {
                let ts = r.timestamp();
                start_ts <= ts && ts <= end_ts
            })
            .collect();
        debug!(
            "RecordStore: {} record(s) between {} and {}",
            found.len(),
            start,
            end
        );
        Ok(found)
    }

    /// Read-only view of every stored record.
    pub fn list_all(&self) -> &[Box<dyn Record>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Record> + '_ {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record describing the same call (ignoring call type) is stored.
    pub fn contains(&self, key: &RecordKey) -> bool {
        self.iter().any(|r| r.key() == *key)
    }

    /// Human-readable summaries, one per line, in insertion order.
    pub fn render(&self) -> String {
        self.iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `RecordStore([...])` built from each record's `repr()`.
    pub fn repr(&self) -> String {
        let inner: Vec<String> = self.iter().map(|r| r.repr()).collect();
        format!("RecordStore([{}])", inner.join(", "))
    }

    /// JSON array of every record snapshot.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let items = self
            .iter()
            .map(|r| r.to_json())
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::Value::Array(items))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cdr_core::error::CdrError;
    use cdr_core::models::{CallRecord, CallType, InternationalRecord};
    use cdr_core::time_utils::format_timestamp;

    fn make_record(src: &str, dst: &str, dur: i64, ts: &str) -> CallRecord {
        CallRecord::new(src, dst, dur, ts).unwrap()
    }

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add(make_record("1001", "2002", 60, "2024-10-10 13:00:00"));
        store.add(make_record("1001", "2002", 120, "2024-10-10 13:30:00"));
        store.add(make_record("1041", "2002", 30, "2024-10-10 14:15:00"));
        store.add(make_record("1001", "2002", 90, "2024-10-10 15:00:00"));
        store.add(make_record("2002", "1001", 45, "2024-10-10 16:00:00"));
        store
    }

    fn durations(records: &[&dyn Record]) -> Vec<u64> {
        records.iter().map(|r| r.duration()).collect()
    }

    // ── add / list_all ────────────────────────────────────────────────────────

    #[test]
    fn test_new_store_is_empty() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = sample_store();
        let listed: Vec<u64> = store.list_all().iter().map(|r| r.duration()).collect();
        assert_eq!(listed, vec![60, 120, 30, 90, 45]);
    }

    #[test]
    fn test_add_keeps_duplicates() {
        let mut store = RecordStore::new();
        let call = make_record("1001", "2002", 60, "2024-10-10 13:00:00");
        store.add(call.clone());
        store.add(call);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_international_record() {
        let mut store = RecordStore::new();
        store.add(make_record("1001", "2002", 60, "2024-10-10 13:00:00"));
        store.add(
            InternationalRecord::new("1001", "0033140", 600, "2024-10-10 13:05:00", "France")
                .unwrap(),
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.list_all()[1].call_type(), CallType::International);
    }

    #[test]
    fn test_contains_ignores_call_type() {
        let store = sample_store();
        let mut probe = make_record("1041", "2002", 30, "2024-10-10 14:15:00");
        probe.set_call_type("inbound").unwrap();
        assert!(store.contains(&probe.key()));
        assert!(!store.contains(&make_record("1041", "2002", 31, "2024-10-10 14:15:00").key()));
    }

    // ── find_by_endpoints ─────────────────────────────────────────────────────

    #[test]
    fn test_find_by_endpoints_exact_and_ordered() {
        let store = sample_store();
        let found = store.find_by_endpoints("1001", "2002");
        assert_eq!(durations(&found), vec![60, 120, 90]);
    }

    #[test]
    fn test_find_by_endpoints_is_directional() {
        let store = sample_store();
        let found = store.find_by_endpoints("2002", "1001");
        assert_eq!(durations(&found), vec![45]);
    }

    #[test]
    fn test_find_by_endpoints_no_match_is_empty() {
        let store = sample_store();
        assert!(store.find_by_endpoints("9999", "2002").is_empty());
    }

    #[test]
    fn test_find_by_endpoints_case_sensitive() {
        let mut store = RecordStore::new();
        store.add(make_record("alice", "Bob", 10, "2024-10-10 13:00:00"));
        assert!(store.find_by_endpoints("alice", "bob").is_empty());
        assert_eq!(store.find_by_endpoints("alice", "Bob").len(), 1);
    }

    // ── find_by_time_range ────────────────────────────────────────────────────

    #[test]
    fn test_find_by_time_range_inclusive_bounds() {
        let store = sample_store();
        let found = store
            .find_by_time_range("2024-10-10 13:30:00", "2024-10-10 15:00:00")
            .unwrap();
        let times: Vec<String> = found
            .iter()
            .map(|r| format_timestamp(&r.timestamp()))
            .collect();
        assert_eq!(
            times,
            vec![
                "2024-10-10 13:30:00",
                "2024-10-10 14:15:00",
                "2024-10-10 15:00:00"
            ]
        );
    }

    #[test]
    fn test_find_by_time_range_single_instant() {
        let store = sample_store();
        let found = store
            .find_by_time_range("2024-10-10 14:15:00", "2024-10-10 14:15:00")
            .unwrap();
        assert_eq!(durations(&found), vec![30]);
    }

    #[test]
    fn test_find_by_time_range_inverted_is_empty() {
        let store = sample_store();
        let found = store
            .find_by_time_range("2024-10-10 15:00:00", "2024-10-10 13:30:00")
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_by_time_range_bad_start() {
        let store = sample_store();
        let err = store
            .find_by_time_range("10/10/2024", "2024-10-10 15:00:00")
            .unwrap_err();
        assert!(matches!(err, CdrError::InvalidFormat(_)));
    }

    #[test]
    fn test_find_by_time_range_bad_end() {
        let store = sample_store();
        assert!(matches!(
            store.find_by_time_range("2024-10-10 13:30:00", "later"),
            Err(CdrError::InvalidFormat(_))
        ));
    }

    // ── render / repr / to_json ───────────────────────────────────────────────

    #[test]
    fn test_render_empty_store() {
        assert_eq!(RecordStore::new().render(), "");
    }

    #[test]
    fn test_render_joins_with_newlines() {
        let mut store = RecordStore::new();
        store.add(make_record("1001", "2002", 60, "2024-10-10 13:00:00"));
        store.add(make_record("1041", "2002", 30, "2024-10-10 14:15:00"));
        assert_eq!(
            store.render(),
            "Call from 1001 to 2002 | Duration: 60 seconds | Type: unknown | Time: 2024-10-10 13:00:00\n\
             Call from 1041 to 2002 | Duration: 30 seconds | Type: unknown | Time: 2024-10-10 14:15:00"
        );
    }

    #[test]
    fn test_repr_lists_records() {
        let mut store = RecordStore::new();
        assert_eq!(store.repr(), "RecordStore([])");
        store.add(make_record("1001", "2002", 60, "2024-10-10 13:00:00"));
        assert_eq!(
            store.repr(),
            "RecordStore([CallRecord(source='1001', destination='2002', duration=60, timestamp='2024-10-10 13:00:00', call_type='unknown')])"
        );
    }

    #[test]
    fn test_to_json_array_in_order() {
        let store = sample_store();
        let value = store.to_json().unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0]["duration"], 60);
        assert_eq!(items[4]["source"], "2002");
    }
}
