//! OEM XML parser and epoch timestamp parsing

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{EphemerisError, Result};
use crate::types::{EphemerisSet, OemDocument};

/// Layout of an epoch once the fractional seconds and zone are removed.
const EPOCH_FORMAT: &str = "%Y-%jT%H:%M:%S";

/// Parse an OEM XML document into an [`EphemerisSet`].
pub fn parse_oem(xml: &str) -> Result<EphemerisSet> {
    let document: OemDocument =
        quick_xml::de::from_str(xml).map_err(|e| EphemerisError::Parse(e.to_string()))?;

    tracing::debug!(
        "Parsed OEM: {} state vectors, {} comments",
        document.oem.body.segment.data.state_vectors.len(),
        document.oem.body.segment.data.comments.len()
    );

    Ok(EphemerisSet::from_document(document))
}

/// Parse a day-of-year epoch such as `2024-047T12:04:00.000Z` as UTC.
///
/// Everything from the first `.` (or a bare trailing `Z`) on is dropped,
/// so sub-second precision is ignored.
pub fn parse_epoch(epoch: &str) -> Result<DateTime<Utc>> {
    let trimmed = epoch.trim();
    let whole_seconds = match trimmed.find('.') {
        Some(dot) => &trimmed[..dot],
        None => trimmed.strip_suffix('Z').unwrap_or(trimmed),
    };

    NaiveDateTime::parse_from_str(whole_seconds, EPOCH_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| EphemerisError::MalformedEpoch(epoch.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ndm xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <oem id="CCSDS_OEM_VERS" version="2.0">
    <header>
      <CREATION_DATE>2024-047T19:48:52.315Z</CREATION_DATE>
      <ORIGINATOR>JSC</ORIGINATOR>
    </header>
    <body>
      <segment>
        <metadata>
          <OBJECT_NAME>ISS</OBJECT_NAME>
          <OBJECT_ID>1998-067-A</OBJECT_ID>
          <CENTER_NAME>EARTH</CENTER_NAME>
          <REF_FRAME>EME2000</REF_FRAME>
          <TIME_SYSTEM>UTC</TIME_SYSTEM>
          <START_TIME>2024-047T12:00:00.000Z</START_TIME>
          <STOP_TIME>2024-062T12:00:00.000Z</STOP_TIME>
        </metadata>
        <data>
          <COMMENT>Source: This file was produced by the TOPO office</COMMENT>
          <COMMENT>MASS=459325.00</COMMENT>
          <stateVector>
            <EPOCH>2024-047T12:00:00.000Z</EPOCH>
            <X units="km">-5097.51711371908</X>
            <Y units="km">1610.3935186824</Y>
            <Z units="km">-4080.03601091775</Z>
            <X_DOT units="km/s">-4.42196651667822</X_DOT>
            <Y_DOT units="km/s">-5.43881276635592</Y_DOT>
            <Z_DOT units="km/s">3.37614769184783</Z_DOT>
          </stateVector>
          <stateVector>
            <EPOCH>2024-047T12:04:00.000Z</EPOCH>
            <X units="km">-5998.42</X>
            <Y units="km">270.63</Y>
            <Z units="km">-3041.93</Z>
            <X_DOT units="km/s">-2.5</X_DOT>
            <Y_DOT units="km/s">-5.6</Y_DOT>
            <Z_DOT units="km/s">5.1</Z_DOT>
          </stateVector>
        </data>
      </segment>
    </body>
  </oem>
</ndm>"#;

    #[test]
    fn test_parse_oem_sample() {
        let set = parse_oem(SAMPLE).unwrap();

        assert_eq!(set.header().originator, "JSC");
        assert_eq!(set.header().creation_date, "2024-047T19:48:52.315Z");
        assert_eq!(set.metadata().object_name, "ISS");
        assert_eq!(set.metadata().ref_frame, "EME2000");
        assert_eq!(set.comments().len(), 2);
        assert_eq!(set.comments()[1], "MASS=459325.00");
        assert_eq!(set.document().oem.version.as_deref(), Some("2.0"));

        assert_eq!(set.len(), 2);
        let first = &set.state_vectors()[0];
        assert_eq!(first.epoch, "2024-047T12:00:00.000Z");
        assert_eq!(first.x.units, "km");
        assert!((first.x.value - -5097.51711371908).abs() < 1e-9);
        assert_eq!(first.z_dot.units, "km/s");
        assert_eq!(set.state_vectors()[1].epoch, "2024-047T12:04:00.000Z");
    }

    #[test]
    fn test_parse_oem_rejects_garbage() {
        let err = parse_oem("<ndm><oem><header>").unwrap_err();
        assert!(matches!(err, EphemerisError::Parse(_)));
    }

    #[test]
    fn test_parse_epoch_day_of_year() {
        let t = parse_epoch("2024-047T12:04:30.000Z").unwrap();
        assert_eq!(t.year(), 2024);
        assert_eq!(t.ordinal(), 47);
        assert_eq!(t.month(), 2);
        assert_eq!(t.day(), 16);
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 4, 30));
    }

    #[test]
    fn test_parse_epoch_without_fraction() {
        let t = parse_epoch("2024-001T00:00:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_malformed() {
        assert_eq!(
            parse_epoch("yesterday"),
            Err(EphemerisError::MalformedEpoch("yesterday".to_string()))
        );
        assert!(parse_epoch("2024-400T00:00:00.000Z").is_err());
    }
}
