//! Distance type for hub-to-hub legs.
//!
//! Distances are kilometers with meter precision, stored as an unsigned
//! count of meters. Integer storage keeps path totals exact and gives a
//! total order for the shortest-path queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use crate::error::DomainError;

const METERS_PER_KM: u64 = 1_000;

/// A non-negative road distance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Distance(u64);

impl Distance {
    /// Zero distance.
    pub const ZERO: Distance = Distance(0);

    /// Create a distance from whole meters.
    pub fn from_meters(meters: u64) -> Self {
        Self(meters)
    }

    /// Create a distance from whole kilometers.
    pub fn from_whole_km(km: u64) -> Self {
        Self(km.saturating_mul(METERS_PER_KM))
    }

    /// Create a distance from fractional kilometers, rounded to the meter.
    ///
    /// ```
    /// use hub_core::Distance;
    /// let d = Distance::from_km(12.5).unwrap();
    /// assert_eq!(d.meters(), 12_500);
    /// ```
    pub fn from_km(km: f64) -> Result<Self, DomainError> {
        if !km.is_finite() || km < 0.0 {
            return Err(DomainError::InvalidDistance(km.to_string()));
        }
        let meters = (km * METERS_PER_KM as f64).round();
        if meters > u64::MAX as f64 {
            return Err(DomainError::InvalidDistance(km.to_string()));
        }
        Ok(Self(meters as u64))
    }

    /// Parse a decimal kilometer string such as `"325.5"` without going
    /// through floating point. At most three fractional digits are accepted.
    pub fn parse_km(input: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidDistance(input.to_string());
        let trimmed = input.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let mut meters_part = 0u64;
        for (i, digit) in fraction.bytes().enumerate() {
            let scale = 10u64.pow(2 - i as u32);
            meters_part += u64::from(digit - b'0') * scale;
        }

        whole
            .checked_mul(METERS_PER_KM)
            .and_then(|m| m.checked_add(meters_part))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Distance in meters.
    pub fn meters(&self) -> u64 {
        self.0
    }

    /// Distance in kilometers.
    pub fn as_km(&self) -> f64 {
        self.0 as f64 / METERS_PER_KM as f64
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add two distances, clamping at the maximum representable value.
    pub fn saturating_add(self, other: Distance) -> Distance {
        Distance(self.0.saturating_add(other.0))
    }

    /// Sum an iterator of distances.
    pub fn sum<'a>(iter: impl Iterator<Item = &'a Distance>) -> Distance {
        iter.fold(Distance::ZERO, |acc, d| acc.saturating_add(*d))
    }

    /// Format as kilometers with three decimals (e.g., "12.500").
    pub fn display_km(&self) -> String {
        format!("{}.{:03}", self.0 / METERS_PER_KM, self.0 % METERS_PER_KM)
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, other: Distance) -> Distance {
        self.saturating_add(other)
    }
}

impl FromStr for Distance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Distance::parse_km(s)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.display_km())
    }
}
