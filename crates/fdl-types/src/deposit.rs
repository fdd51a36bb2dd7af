use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Minimum number of digits in the daily sequence suffix of a deposit id.
pub const SEQUENCE_WIDTH: usize = 3;

/// Calendar day that scopes a deposit sequence counter.
///
/// Displays and parses as the compact `YYYYMMDD` form used in deposit ids and
/// counter file names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepositDate(NaiveDate);

impl DepositDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, TypeError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| TypeError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DepositDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for DepositDate {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Self)
            .map_err(|_| TypeError::InvalidDate(s.to_string()))
    }
}

impl fmt::Debug for DepositDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepositDate({self})")
    }
}

impl fmt::Display for DepositDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// Human-readable deposit identifier: `YYYYMMDD` followed by the daily
/// sequence number zero-padded to three digits (`20251127001`).
///
/// Stored as text so a tampered snapshot still deserializes; use
/// [`DepositId::parse`] when the structure matters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositId(String);

impl DepositId {
    /// Format an id from its day and sequence number.
    pub fn compose(date: DepositDate, sequence: u64) -> Self {
        Self(format!("{date}{sequence:0width$}", width = SEQUENCE_WIDTH))
    }

    /// Parse and validate the `YYYYMMDDnnn` form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        if s.len() < 8 + SEQUENCE_WIDTH || !s.is_char_boundary(8) {
            return Err(TypeError::InvalidDepositId(s.to_string()));
        }
        let (date, seq) = s.split_at(8);
        date.parse::<DepositDate>()
            .map_err(|_| TypeError::InvalidDepositId(s.to_string()))?;
        if !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidDepositId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Day and sequence number, if the id is well formed.
    pub fn parts(&self) -> Option<(DepositDate, u64)> {
        if self.0.len() < 8 + SEQUENCE_WIDTH || !self.0.is_char_boundary(8) {
            return None;
        }
        let (date, seq) = self.0.split_at(8);
        Some((date.parse().ok()?, seq.parse().ok()?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DepositId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepositId({})", self.0)
    }
}

impl fmt::Display for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user who made a deposit, issued by the external user
/// store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TypeError::EmptyOwner);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OwnerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
