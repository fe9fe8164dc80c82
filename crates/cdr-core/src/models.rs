use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::error::{CdrError, Result};
use crate::settings::{CALL_TYPE_NAMES, UNKNOWN_DESTINATION};
use crate::time_utils::{format_timestamp, parse_timestamp};

// ── CallType ──────────────────────────────────────────────────────────────────

/// Direction / routing classification of a call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// Call received by the extension.
    Inbound,
    /// Call placed by the extension.
    Outbound,
    /// Transferred call.
    Xfer,
    /// Call to a destination abroad.
    International,
    /// Not yet classified.
    #[default]
    Unknown,
}

impl CallType {
    /// Every allowed call type, in declaration order.
    pub const ALL: [CallType; 5] = [
        CallType::Inbound,
        CallType::Outbound,
        CallType::Xfer,
        CallType::International,
        CallType::Unknown,
    ];

    /// The canonical lowercase string identifier for this call type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Inbound => "inbound",
            CallType::Outbound => "outbound",
            CallType::Xfer => "xfer",
            CallType::International => "international",
            CallType::Unknown => "unknown",
        }
    }
}

impl FromStr for CallType {
    type Err = CdrError;

    /// Case-insensitive construction from a string slice.
    ///
    /// Surrounding whitespace is ignored. Returns [`CdrError::InvalidValue`]
    /// for anything outside the allowed set.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "inbound" => Ok(CallType::Inbound),
            "outbound" => Ok(CallType::Outbound),
            "xfer" => Ok(CallType::Xfer),
            "international" => Ok(CallType::International),
            "unknown" => Ok(CallType::Unknown),
            _ => Err(CdrError::InvalidValue(format!(
                "call type \"{}\" is not one of: {}",
                value,
                CALL_TYPE_NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RecordKey ─────────────────────────────────────────────────────────────────

/// The identity of a call: everything except its call type.
///
/// Two records with the same key describe the same call, whatever their
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub source: String,
    pub destination: String,
    pub duration: u64,
    pub timestamp: NaiveDateTime,
}

// ── CallRecord ────────────────────────────────────────────────────────────────

/// One call detail record.
///
/// `source`, `destination` and `timestamp` are fixed at construction.
/// `duration` and `call_type` can change afterwards, but only through the
/// validating setters.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    source: String,
    destination: String,
    duration: u64,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: NaiveDateTime,
    call_type: CallType,
}

fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

impl CallRecord {
    /// Build a record with call type [`CallType::Unknown`].
    ///
    /// * `source` must contain a non-whitespace character, otherwise
    ///   [`CdrError::InvalidArgument`].
    /// * A blank `destination` becomes [`UNKNOWN_DESTINATION`].
    /// * A negative `duration` is clamped to `0`.
    /// * `timestamp` must be `YYYY-MM-DD HH:MM:SS`, otherwise
    ///   [`CdrError::InvalidFormat`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cdr_core::models::{CallRecord, CallType};
    ///
    /// let call = CallRecord::new("1001", "2002", 999, "2024-10-10 09:03:05").unwrap();
    /// assert_eq!(call.duration(), 999);
    /// assert_eq!(call.call_type(), CallType::Unknown);
    ///
    /// let clamped = CallRecord::new("1001", "", -30, "2024-10-10 09:03:05").unwrap();
    /// assert_eq!(clamped.duration(), 0);
    /// assert_eq!(clamped.destination(), "Unknown");
    /// ```
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        duration: i64,
        timestamp: &str,
    ) -> Result<Self> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(CdrError::InvalidArgument(
                "source must be a non-empty identifier".to_string(),
            ));
        }

        let timestamp = parse_timestamp(timestamp)?;

        let mut destination = destination.into();
        if destination.trim().is_empty() {
            warn!(
                "CallRecord: blank destination for source \"{}\", using \"{}\"",
                source, UNKNOWN_DESTINATION
            );
            destination = UNKNOWN_DESTINATION.to_string();
        }

        let duration = if duration < 0 {
            warn!(
                "CallRecord: negative duration {} for source \"{}\" clamped to 0",
                duration, source
            );
            0
        } else {
            duration as u64
        };

        Ok(Self {
            source,
            destination,
            duration,
            timestamp,
            call_type: CallType::Unknown,
        })
    }

    /// Build a record with an explicit textual call type.
    ///
    /// The call type is validated with the same rule as
    /// [`set_call_type`](Self::set_call_type): an unrecognised value fails
    /// with [`CdrError::InvalidValue`] and no record is produced.
    pub fn with_call_type(
        source: impl Into<String>,
        destination: impl Into<String>,
        duration: i64,
        timestamp: &str,
        call_type: &str,
    ) -> Result<Self> {
        let call_type = call_type.parse::<CallType>()?;
        let mut record = Self::new(source, destination, duration, timestamp)?;
        record.call_type = call_type;
        Ok(record)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Call length in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn call_type(&self) -> CallType {
        self.call_type
    }

    /// Replace the duration. Only strictly positive values are accepted; on
    /// failure the current duration is kept.
    pub fn set_duration(&mut self, seconds: i64) -> Result<()> {
        if seconds <= 0 {
            return Err(CdrError::InvalidValue(format!(
                "duration must be a positive integer, got {}",
                seconds
            )));
        }
        self.duration = seconds as u64;
        Ok(())
    }

    /// Reset the duration to `0`.
    pub fn reset_duration(&mut self) {
        self.duration = 0;
    }

    /// Replace the call type from its textual name.
    pub fn set_call_type(&mut self, value: &str) -> Result<()> {
        self.call_type = value.parse()?;
        Ok(())
    }

    /// Reset the call type to [`CallType::Unknown`].
    pub fn reset_call_type(&mut self) {
        self.call_type = CallType::Unknown;
    }

    /// The identity tuple used for equality and hashing.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            source: self.source.clone(),
            destination: self.destination.clone(),
            duration: self.duration,
            timestamp: self.timestamp,
        }
    }

    /// Reconstructable one-line representation, e.g.
    /// `CallRecord(source='1001', destination='2002', duration=999, timestamp='2024-10-10 09:03:05', call_type='unknown')`.
    pub fn repr(&self) -> String {
        format!("CallRecord({})", self.repr_fields())
    }

    fn repr_fields(&self) -> String {
        format!(
            "source='{}', destination='{}', duration={}, timestamp='{}', call_type='{}'",
            self.source,
            self.destination,
            self.duration,
            format_timestamp(&self.timestamp),
            self.call_type
        )
    }

    fn same_call(&self, other: &CallRecord) -> bool {
        self.source == other.source
            && self.destination == other.destination
            && self.duration == other.duration
            && self.timestamp == other.timestamp
    }
}

impl PartialEq for CallRecord {
    fn eq(&self, other: &Self) -> bool {
        self.same_call(other)
    }
}

impl Eq for CallRecord {}

impl Hash for CallRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.destination.hash(state);
        self.duration.hash(state);
        self.timestamp.hash(state);
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Call from {} to {} | Duration: {} seconds | Type: {} | Time: {}",
            self.source,
            self.destination,
            self.duration,
            self.call_type,
            format_timestamp(&self.timestamp)
        )
    }
}

// ── InternationalRecord ───────────────────────────────────────────────────────

/// A call to a destination abroad.
///
/// Wraps a [`CallRecord`] whose call type is always
/// [`CallType::International`] and adds the destination country.
#[derive(Debug, Clone, Serialize)]
pub struct InternationalRecord {
    #[serde(flatten)]
    call: CallRecord,
    destination_country: String,
}

impl InternationalRecord {
    /// Build an international record. Field rules match [`CallRecord::new`].
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        duration: i64,
        timestamp: &str,
        destination_country: impl Into<String>,
    ) -> Result<Self> {
        let mut call = CallRecord::new(source, destination, duration, timestamp)?;
        call.call_type = CallType::International;
        Ok(Self {
            call,
            destination_country: destination_country.into(),
        })
    }

    pub fn destination_country(&self) -> &str {
        &self.destination_country
    }

    /// See [`CallRecord::set_duration`].
    pub fn set_duration(&mut self, seconds: i64) -> Result<()> {
        self.call.set_duration(seconds)
    }

    /// See [`CallRecord::reset_duration`].
    pub fn reset_duration(&mut self) {
        self.call.reset_duration();
    }

    pub fn repr(&self) -> String {
        format!(
            "InternationalRecord({}, destination_country='{}')",
            self.call.repr_fields(),
            self.destination_country
        )
    }
}

impl PartialEq for InternationalRecord {
    fn eq(&self, other: &Self) -> bool {
        self.call.same_call(&other.call)
    }
}

impl Eq for InternationalRecord {}

impl Hash for InternationalRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.call.hash(state);
    }
}

impl fmt::Display for InternationalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | Country: {}", self.call, self.destination_country)
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// Capability shared by every kind of call record a store can hold.
///
/// Implementors expose their underlying [`CallRecord`]; the accessors are
/// derived from it so that queries treat all kinds uniformly.
pub trait Record: fmt::Debug + fmt::Display + Send + Sync {
    /// The base call data.
    fn call(&self) -> &CallRecord;

    /// Reconstructable one-line representation.
    fn repr(&self) -> String;

    /// Flat JSON object snapshot of the record.
    fn to_json(&self) -> Result<serde_json::Value>;

    fn source(&self) -> &str {
        self.call().source()
    }

    fn destination(&self) -> &str {
        self.call().destination()
    }

    fn duration(&self) -> u64 {
        self.call().duration()
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.call().timestamp()
    }

    fn call_type(&self) -> CallType {
        self.call().call_type()
    }

    fn key(&self) -> RecordKey {
        self.call().key()
    }
}

impl Record for CallRecord {
    fn call(&self) -> &CallRecord {
        self
    }

    fn repr(&self) -> String {
        CallRecord::repr(self)
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Record for InternationalRecord {
    fn call(&self) -> &CallRecord {
        &self.call
    }

    fn repr(&self) -> String {
        InternationalRecord::repr(self)
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl PartialEq for dyn Record {
    fn eq(&self, other: &Self) -> bool {
        self.call().same_call(other.call())
    }
}

impl Eq for dyn Record {}

// ── Tests ─────────────────────────────────────────────────────────────────────
