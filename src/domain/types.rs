//! Domain newtypes providing compile-time safety and self-documentation.
//!
//! These wrappers prevent common bugs like passing a [`FileId`] where a
//! [`FunctionId`] is expected, and make the binary sink's signatures
//! self-describing.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Id assigned to an interned function name by the binary sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FunctionId(pub u32);

/// Id assigned to an interned file path by the binary sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FileId(pub u32);

/// Id assigned to an interned counter name by the binary sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CounterId(pub u32);

/// Id assigned to a thread's binary-sink "process" record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in time, microseconds since the Unix epoch.
///
/// Stands in for the original's `g_get_real_time()` reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Capture the current time.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        Timestamp(micros)
    }

    /// Whole seconds component, for the `[sec.usec]` echo header.
    pub fn secs(self) -> u64 {
        self.0 / 1_000_000
    }

    /// Microseconds-within-the-second component.
    pub fn usecs(self) -> u64 {
        self.0 % 1_000_000
    }

    /// Duration since an earlier timestamp, in fractional seconds.
    ///
    /// Saturates to zero if `earlier` is actually later (clock oddities).
    pub fn since_as_secs(self, earlier: Timestamp) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / 1_000_000.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs(), self.usecs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_display_pads_microseconds() {
        let ts = Timestamp(7);
        assert_eq!(ts.to_string(), "0.000007");
    }

    #[test]
    fn timestamp_since_as_secs() {
        let a = Timestamp(1_000_000);
        let b = Timestamp(1_500_000);
        assert_eq!(b.since_as_secs(a), 0.5);
    }

    #[test]
    fn timestamp_since_as_secs_saturates() {
        let a = Timestamp(10);
        let b = Timestamp(5);
        assert_eq!(b.since_as_secs(a), 0.0);
    }
}
