use chrono::{DateTime, Utc};
use serde::Serialize;

/// A range or stay whose start is not strictly before its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{from} is not before {to}")]
pub struct InvalidRangeError {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Half-open interval `[from, to)` during which a listing cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, InvalidRangeError> {
        if from >= to {
            return Err(InvalidRangeError { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Touching ranges (`self.to == other.from`) do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.from < other.to && self.to > other.from
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRequest {
    range: DateRange,
    guest_count: i32,
}

impl StayRequest {
    pub fn new(
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        guest_count: i32,
    ) -> Result<Self, InvalidRangeError> {
        let range = DateRange::new(check_in, check_out)?;
        Ok(Self { range, guest_count })
    }

    pub fn check_in(&self) -> DateTime<Utc> {
        self.range.from
    }

    pub fn check_out(&self) -> DateTime<Utc> {
        self.range.to
    }

    pub fn guest_count(&self) -> i32 {
        self.guest_count
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }
}

/// Whether `request` avoids every blocked range. Ranges may be unsorted and
/// may overlap each other.
pub fn is_available(blocked: &[DateRange], request: &StayRequest) -> bool {
    !blocked.iter().any(|range| range.overlaps(request.range()))
}
