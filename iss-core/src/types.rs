//! Orbit Ephemeris Message data types
//!
//! The structs mirror the CCSDS OEM XML layout
//! (`ndm → oem → header / body → segment → metadata / data`).
//! Deserialization reads quick-xml's `@attr` / `$text` conventions,
//! serialization writes the `@attr` / `#text` JSON layout clients expect.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scalar with its unit attribute, e.g. `<X units="km">-4500.1</X>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "@units", default)]
    pub units: String,

    #[serde(rename(serialize = "#text", deserialize = "$text"))]
    pub value: f64,
}

impl Measurement {
    pub fn new(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }
}

/// One row of the ephemeris: position and velocity at one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StateVector {
    /// Day-of-year timestamp, e.g. "2024-047T12:00:00.000Z"
    pub epoch: String,
    pub x: Measurement,
    pub y: Measurement,
    pub z: Measurement,
    pub x_dot: Measurement,
    pub y_dot: Measurement,
    pub z_dot: Measurement,
}

/// OEM header block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Header {
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub originator: String,
}

/// Segment metadata: what is orbiting, around what, in which frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Metadata {
    #[serde(default)]
    pub object_name: String,
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub center_name: String,
    #[serde(default)]
    pub ref_frame: String,
    #[serde(default)]
    pub time_system: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub stop_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentData {
    #[serde(rename = "COMMENT", default)]
    pub comments: Vec<String>,

    #[serde(rename = "stateVector", default)]
    pub state_vectors: Vec<StateVector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub metadata: Metadata,
    pub data: SegmentData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub segment: Segment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Oem {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub header: Header,
    pub body: Body,
}

/// Root `<ndm>` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OemDocument {
    pub oem: Oem,
}

/// A complete, immutable ephemeris set from one fetch.
///
/// Holds the typed document plus an epoch index built once at
/// construction; the first occurrence of a duplicated epoch wins.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSet {
    document: OemDocument,
    index: HashMap<String, usize>,
}

impl EphemerisSet {
    pub fn from_document(document: OemDocument) -> Self {
        let mut index = HashMap::with_capacity(document.oem.body.segment.data.state_vectors.len());
        for (i, sv) in document.oem.body.segment.data.state_vectors.iter().enumerate() {
            index.entry(sv.epoch.clone()).or_insert(i);
        }
        Self { document, index }
    }

    pub fn new(
        header: Header,
        metadata: Metadata,
        comments: Vec<String>,
        state_vectors: Vec<StateVector>,
    ) -> Self {
        Self::from_document(OemDocument {
            oem: Oem {
                id: None,
                version: None,
                header,
                body: Body {
                    segment: Segment {
                        metadata,
                        data: SegmentData {
                            comments,
                            state_vectors,
                        },
                    },
                },
            },
        })
    }

    pub fn document(&self) -> &OemDocument {
        &self.document
    }

    pub fn header(&self) -> &Header {
        &self.document.oem.header
    }

    pub fn metadata(&self) -> &Metadata {
        &self.document.oem.body.segment.metadata
    }

    pub fn comments(&self) -> &[String] {
        &self.document.oem.body.segment.data.comments
    }

    /// State vectors in upstream (chronological) order
    pub fn state_vectors(&self) -> &[StateVector] {
        &self.document.oem.body.segment.data.state_vectors
    }

    pub fn len(&self) -> usize {
        self.state_vectors().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state_vectors().is_empty()
    }

    pub(crate) fn position_of(&self, epoch: &str) -> Option<usize> {
        self.index.get(epoch).copied()
    }
}
