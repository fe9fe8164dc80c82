//! Fixed contracts shared by every record and query.
//!
//! Nothing here is read from disk or the environment; these values are part
//! of the compatibility surface with fixture data and downstream consumers.

/// `chrono` format string for every timestamp accepted or produced.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exact textual shape a timestamp must have before it is handed to `chrono`.
///
/// `chrono` alone tolerates unpadded fields, so the shape is checked first.
pub const TIMESTAMP_PATTERN: &str = r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$";

/// Destination used when a record is built without a usable destination.
pub const UNKNOWN_DESTINATION: &str = "Unknown";

/// Canonical lowercase names of every allowed call type, in declaration order.
pub const CALL_TYPE_NAMES: &[&str] = &["inbound", "outbound", "xfer", "international", "unknown"];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_timestamp_pattern_matches_format_output() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 10, 10)
            .and_then(|d| d.and_hms_opt(9, 3, 5))
            .unwrap();
        let rendered = ts.format(TIMESTAMP_FORMAT).to_string();
        assert_eq!(rendered, "2024-10-10 09:03:05");
        assert!(Regex::new(TIMESTAMP_PATTERN).unwrap().is_match(&rendered));
    }

    #[test]
    fn test_call_type_names_are_lowercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in CALL_TYPE_NAMES {
            assert_eq!(*name, name.to_lowercase());
            assert!(seen.insert(*name), "duplicate call type name {name}");
        }
        assert_eq!(CALL_TYPE_NAMES.len(), 5);
    }
}
