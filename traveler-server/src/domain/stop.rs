//! Stop area identifier type.

use std::fmt;

/// Error returned when parsing an invalid stop area identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop area id: {reason}")]
pub struct InvalidStopArea {
    reason: &'static str,
}

/// A validated Navitia stop area identifier.
///
/// Stop area ids have the form `stop_area:<source>:<code>`, for example
/// `stop_area:SNCF:87686006`. This type guarantees that any `StopArea`
/// value carries the `stop_area:` prefix and a non-empty remainder of
/// printable ASCII.
///
/// # Examples
///
/// ```
/// use traveler_server::domain::StopArea;
///
/// let gare = StopArea::parse("stop_area:SNCF:87686006").unwrap();
/// assert_eq!(gare.as_str(), "stop_area:SNCF:87686006");
///
/// // Missing prefix is rejected
/// assert!(StopArea::parse("SNCF:87686006").is_err());
///
/// // Empty remainder is rejected
/// assert!(StopArea::parse("stop_area:").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StopArea(String);

const PREFIX: &str = "stop_area:";

impl StopArea {
    /// Parse a stop area id from a string.
    ///
    /// The input must start with `stop_area:` followed by at least one
    /// printable ASCII character (no whitespace).
    pub fn parse(s: &str) -> Result<Self, InvalidStopArea> {
        let Some(rest) = s.strip_prefix(PREFIX) else {
            return Err(InvalidStopArea {
                reason: "must start with 'stop_area:'",
            });
        };

        if rest.is_empty() {
            return Err(InvalidStopArea {
                reason: "must have a non-empty code after the prefix",
            });
        }

        for b in rest.bytes() {
            if !b.is_ascii_graphic() {
                return Err(InvalidStopArea {
                    reason: "code must be printable ASCII without whitespace",
                });
            }
        }

        Ok(StopArea(s.to_string()))
    }

    /// Returns the full stop area id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part after the `stop_area:` prefix.
    pub fn code(&self) -> &str {
        &self.0[PREFIX.len()..]
    }
}

impl fmt::Debug for StopArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopArea({})", self.0)
    }
}

impl fmt::Display for StopArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for StopArea {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for StopArea {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StopArea::parse(&s).map_err(serde::de::Error::custom)
    }
}
