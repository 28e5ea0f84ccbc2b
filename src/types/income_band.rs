use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monthly income ranges offered during profile setup, in rupees.
///
/// On the wire a band is its range string, e.g. `"18000-25000"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IncomeBand {
    /// ₹8,000 to ₹12,000.
    From8000To12000,

    /// ₹12,000 to ₹18,000.
    From12000To18000,

    /// ₹18,000 to ₹25,000.
    #[default]
    From18000To25000,

    /// ₹25,000 to ₹35,000.
    From25000To35000,

    /// ₹35,000 to ₹50,000.
    From35000To50000,

    /// Above ₹50,000.
    Above50000,
}

impl IncomeBand {
    /// All bands in menu order.
    pub const ALL: [IncomeBand; 6] = [
        IncomeBand::From8000To12000,
        IncomeBand::From12000To18000,
        IncomeBand::From18000To25000,
        IncomeBand::From25000To35000,
        IncomeBand::From35000To50000,
        IncomeBand::Above50000,
    ];

    /// The range string sent to the backend.
    pub fn value(&self) -> &'static str {
        match self {
            IncomeBand::From8000To12000 => "8000-12000",
            IncomeBand::From12000To18000 => "12000-18000",
            IncomeBand::From18000To25000 => "18000-25000",
            IncomeBand::From25000To35000 => "25000-35000",
            IncomeBand::From35000To50000 => "35000-50000",
            IncomeBand::Above50000 => "50000+",
        }
    }

    /// The human-readable label shown in the setup menu.
    pub fn label(&self) -> &'static str {
        match self {
            IncomeBand::From8000To12000 => "₹8,000 - ₹12,000",
            IncomeBand::From12000To18000 => "₹12,000 - ₹18,000",
            IncomeBand::From18000To25000 => "₹18,000 - ₹25,000",
            IncomeBand::From25000To35000 => "₹25,000 - ₹35,000",
            IncomeBand::From35000To50000 => "₹35,000 - ₹50,000",
            IncomeBand::Above50000 => "₹50,000+",
        }
    }

    /// Lower bound of the band in rupees.
    pub fn lower_bound(&self) -> u32 {
        match self {
            IncomeBand::From8000To12000 => 8_000,
            IncomeBand::From12000To18000 => 12_000,
            IncomeBand::From18000To25000 => 18_000,
            IncomeBand::From25000To35000 => 25_000,
            IncomeBand::From35000To50000 => 35_000,
            IncomeBand::Above50000 => 50_000,
        }
    }

    /// Upper bound of the band in rupees; `None` for the open-ended band.
    pub fn upper_bound(&self) -> Option<u32> {
        match self {
            IncomeBand::From8000To12000 => Some(12_000),
            IncomeBand::From12000To18000 => Some(18_000),
            IncomeBand::From18000To25000 => Some(25_000),
            IncomeBand::From25000To35000 => Some(35_000),
            IncomeBand::From35000To50000 => Some(50_000),
            IncomeBand::Above50000 => None,
        }
    }
}

impl fmt::Display for IncomeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Error returned when a string names no known income band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeBandParseError {
    /// The string that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for IncomeBandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown income range: {}", self.invalid_value)
    }
}

impl std::error::Error for IncomeBandParseError {}

impl FromStr for IncomeBand {
    type Err = IncomeBandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        IncomeBand::ALL
            .iter()
            .copied()
            .find(|band| band.value() == needle)
            .ok_or_else(|| IncomeBandParseError {
                invalid_value: s.to_string(),
            })
    }
}

impl TryFrom<String> for IncomeBand {
    type Error = IncomeBandParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IncomeBand> for String {
    fn from(value: IncomeBand) -> Self {
        value.value().to_string()
    }
}
