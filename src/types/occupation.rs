use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Occupations offered during profile setup.
///
/// The backend receives the display label verbatim, so serialization uses the
/// label rather than a variant name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Occupation {
    /// Food delivery on Zomato, Swiggy and similar platforms.
    #[default]
    DeliveryDriver,

    /// Auto rickshaw driver.
    AutoRickshawDriver,

    /// Ride-hailing driver on Uber, Ola and similar platforms.
    RideHailingDriver,

    /// Freelancer or consultant.
    Freelancer,

    /// Small business owner.
    SmallBusinessOwner,

    /// Construction worker.
    ConstructionWorker,

    /// Any other platform-mediated work.
    OtherGigWorker,
}

impl Occupation {
    /// All occupations in menu order.
    pub const ALL: [Occupation; 7] = [
        Occupation::DeliveryDriver,
        Occupation::AutoRickshawDriver,
        Occupation::RideHailingDriver,
        Occupation::Freelancer,
        Occupation::SmallBusinessOwner,
        Occupation::ConstructionWorker,
        Occupation::OtherGigWorker,
    ];

    /// The label shown to the user and sent to the backend.
    pub fn label(&self) -> &'static str {
        match self {
            Occupation::DeliveryDriver => "Delivery driver (Zomato/Swiggy)",
            Occupation::AutoRickshawDriver => "Auto rickshaw driver",
            Occupation::RideHailingDriver => "Uber/Ola driver",
            Occupation::Freelancer => "Freelancer/Consultant",
            Occupation::SmallBusinessOwner => "Small business owner",
            Occupation::ConstructionWorker => "Construction worker",
            Occupation::OtherGigWorker => "Gig worker (other)",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned when a string names no known occupation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationParseError {
    /// The string that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for OccupationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown occupation: {}", self.invalid_value)
    }
}

impl std::error::Error for OccupationParseError {}

impl FromStr for Occupation {
    type Err = OccupationParseError;

    /// Parses a display label, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Occupation::ALL
            .iter()
            .copied()
            .find(|o| o.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| OccupationParseError {
                invalid_value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Occupation {
    type Error = OccupationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Occupation> for String {
    fn from(value: Occupation) -> Self {
        value.label().to_string()
    }
}
