//! Station and train identifier types.

use std::fmt;

/// Error returned when constructing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An opaque station identifier, unique per physical station.
///
/// Station ids are non-zero unsigned integers assigned by the timetable
/// backend. This type guarantees the non-zero invariant by construction.
///
/// # Examples
///
/// ```
/// use transit_server::domain::StationId;
///
/// let tokyo = StationId::new(1).unwrap();
/// assert_eq!(tokyo.get(), 1);
///
/// // Zero is reserved and rejected
/// assert!(StationId::new(0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(u32);

impl StationId {
    /// Construct a station id, rejecting the reserved zero value.
    pub fn new(id: u32) -> Result<Self, InvalidStationId> {
        if id == 0 {
            return Err(InvalidStationId {
                reason: "must be non-zero",
            });
        }
        Ok(StationId(id))
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A train identifier from the timetable backend.
///
/// A train runs a fixed stop sequence; together with a stop-sequence
/// position it identifies a single leg.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(pub u32);

impl TrainId {
    /// Returns the raw numeric id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A station record from the timetable backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Backend station id.
    pub id: StationId,

    /// Native-language station name.
    pub name: String,

    /// English station name.
    pub name_en: String,
}
