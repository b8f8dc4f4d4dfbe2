// src/models/schedule.rs
// DOCUMENTATION: Wall-clock times and half-open time ranges
// PURPOSE: Shared by bookings and availability slots for overlap detection

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A time of day in 24h "HH:MM" form.
/// Ordering matches lexical ordering of the zero-padded string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: hour * 60 + minute,
            })
        } else {
            None
        }
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes[..2].iter().all(u8::is_ascii_digit)
            && bytes[3..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(format!("'{}' is not a HH:MM time", s));
        }

        let hour: u16 = s[..2].parse().map_err(|_| format!("invalid hour in '{}'", s))?;
        let minute: u16 = s[3..].parse().map_err(|_| format!("invalid minute in '{}'", s))?;

        TimeOfDay::new(hour, minute).ok_or_else(|| format!("'{}' is out of range", s))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Half-open range [start, end) within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    /// Build a range; start must be strictly before end
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, String> {
        if start >= end {
            return Err(format!("start time {} must be before end time {}", start, end));
        }
        Ok(Self { start, end })
    }

    /// Parse a pair of stored "HH:MM" strings
    pub fn parse(start: &str, end: &str) -> Result<Self, String> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// Two half-open ranges overlap iff each starts before the other ends.
    /// Adjacent ranges (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.end.minutes_since_midnight() - self.start.minutes_since_midnight())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_parse_valid_times() {
        assert_eq!("00:00".parse::<TimeOfDay>().unwrap().minutes_since_midnight(), 0);
        assert_eq!("09:30".parse::<TimeOfDay>().unwrap().minutes_since_midnight(), 570);
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().to_string(), "23:59");
    }

    #[test]
    fn test_parse_rejects_malformed_times() {
        for bad in ["9:30", "24:00", "12:60", "12-30", "ab:cd", "", "12:300", "+1:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_ordering_matches_lexical_order() {
        let samples = ["00:05", "07:45", "10:00", "10:30", "12:00", "23:10"];
        for a in samples {
            for b in samples {
                let ta: TimeOfDay = a.parse().unwrap();
                let tb: TimeOfDay = b.parse().unwrap();
                assert_eq!(ta.cmp(&tb), a.cmp(b));
            }
        }
    }

    #[test]
    fn test_range_requires_start_before_end() {
        assert!(TimeRange::parse("12:00", "12:00").is_err());
        assert!(TimeRange::parse("13:00", "12:00").is_err());
        assert_eq!(range("10:00", "11:30").duration_minutes(), 90);
    }

    #[test]
    fn test_partial_overlap() {
        assert!(range("10:00", "12:00").overlaps(&range("11:00", "13:00")));
        assert!(range("11:00", "13:00").overlaps(&range("10:00", "12:00")));
    }

    #[test]
    fn test_containment_overlaps_both_ways() {
        let outer = range("09:00", "17:00");
        let inner = range("12:00", "13:00");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&outer));
    }

    #[test]
    fn test_adjacent_and_disjoint_do_not_overlap() {
        assert!(!range("10:00", "12:00").overlaps(&range("12:00", "14:00")));
        assert!(!range("12:00", "14:00").overlaps(&range("10:00", "12:00")));
        assert!(!range("08:00", "09:00").overlaps(&range("15:00", "16:00")));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let t: TimeOfDay = serde_json::from_str("\"08:05\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"08:05\"");
        assert!(serde_json::from_str::<TimeOfDay>("\"8:05\"").is_err());
    }
}
