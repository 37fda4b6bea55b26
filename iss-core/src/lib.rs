//! In-memory ISS ephemeris engine
//!
//! Loads a CCSDS Orbit Ephemeris Message, keeps it in a swappable store
//! and answers listing, lookup, nearest-epoch and derived-quantity queries.

pub mod error;
pub mod metrics;
pub mod parser;
pub mod query;
pub mod refresh;
pub mod store;
pub mod types;

pub use error::{EphemerisError, Result};
pub use metrics::{Altitude, MEAN_EARTH_RADIUS, Speed, SubPoint, speed, sub_point};
pub use parser::{parse_epoch, parse_oem};
pub use query::{Nearest, Page};
pub use refresh::{EphemerisSource, RefreshController};
pub use store::EphemerisStore;
pub use types::{
    Body, EphemerisSet, Header, Measurement, Metadata, Oem, OemDocument, Segment, SegmentData,
    StateVector,
};
