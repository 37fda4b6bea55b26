//! Read-only queries over a loaded ephemeris set

use chrono::{DateTime, Utc};
use std::num::IntErrorKind;

use crate::error::{EphemerisError, Result};
use crate::parser::parse_epoch;
use crate::types::{EphemerisSet, StateVector};

/// Pagination window for epoch listings.
///
/// `None` means "not supplied": no limit, offset 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Page {
    /// Parse textual query parameters. Either one failing to parse as a
    /// non-negative integer rejects the whole request.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self> {
        Ok(Self {
            limit: limit.map(parse_count).transpose()?,
            offset: offset.map(parse_count).transpose()?,
        })
    }
}

/// Values too large for `usize` saturate; they select "everything" as a
/// limit and "nothing" as an offset.
fn parse_count(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) => Ok(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
        Err(_) => Err(EphemerisError::InvalidParameter),
    }
}

/// Result of a nearest-epoch search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub vector: &'a StateVector,
    /// `timestamp - epoch` in seconds; negative when the epoch lies after
    /// the requested instant.
    pub seconds_offset: f64,
}

impl EphemerisSet {
    /// Epoch strings starting at `offset`, at most `limit` of them.
    /// An offset past the end yields an empty list.
    pub fn list_epochs(&self, page: Page) -> Vec<&str> {
        let offset = page.offset.unwrap_or(0);
        let limit = page.limit.unwrap_or(usize::MAX);

        self.state_vectors()
            .iter()
            .skip(offset)
            .take(limit)
            .map(|sv| sv.epoch.as_str())
            .collect()
    }

    /// Exact, case-sensitive match on the epoch string.
    pub fn find_by_epoch(&self, epoch: &str) -> Option<&StateVector> {
        self.position_of(epoch)
            .and_then(|i| self.state_vectors().get(i))
    }

    /// Same as [`find_by_epoch`](Self::find_by_epoch), reporting a miss as an error.
    pub fn require_epoch(&self, epoch: &str) -> Result<&StateVector> {
        self.find_by_epoch(epoch)
            .ok_or_else(|| EphemerisError::EpochNotFound(epoch.to_string()))
    }

    /// State vector whose epoch is closest to `timestamp`.
    ///
    /// Ties go to the earliest vector in the set. Vectors whose epoch
    /// cannot be parsed are skipped. Returns `None` when nothing qualifies.
    pub fn find_nearest_to(&self, timestamp: DateTime<Utc>) -> Option<Nearest<'_>> {
        let mut best: Option<Nearest<'_>> = None;

        for vector in self.state_vectors() {
            let epoch_time = match parse_epoch(&vector.epoch) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("Skipping state vector: {}", e);
                    continue;
                }
            };

            let seconds_offset =
                (timestamp - epoch_time).num_milliseconds() as f64 / 1000.0;

            let closer = match &best {
                Some(current) => seconds_offset.abs() < current.seconds_offset.abs(),
                None => true,
            };
            if closer {
                best = Some(Nearest {
                    vector,
                    seconds_offset,
                });
            }
        }

        best
    }
}
