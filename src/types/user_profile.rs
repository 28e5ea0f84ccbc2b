use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{IncomeBand, Occupation};

/// Default monthly expenses in rupees.
pub const DEFAULT_EXPENSES: &str = "18000";

/// Default location.
pub const DEFAULT_LOCATION: &str = "Mumbai";

/// The profile captured at setup and sent as context with every question.
///
/// Serializes to the `context` object the backend expects:
/// `{"occupation", "income", "expenses", "location"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// What the user does for a living.
    pub occupation: Occupation,

    /// Monthly income band.
    pub income: IncomeBand,

    /// Monthly expenses in rupees, kept as the numeric string the user typed.
    pub expenses: String,

    /// City or region, free text.
    pub location: String,
}

impl UserProfile {
    /// Create a profile, validating expenses and location.
    pub fn new(
        occupation: Occupation,
        income: IncomeBand,
        expenses: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self> {
        let mut profile = Self {
            occupation,
            income,
            expenses: String::new(),
            location: String::new(),
        };
        profile.set_expenses(&expenses.into())?;
        profile.set_location(&location.into())?;
        Ok(profile)
    }

    /// Set the occupation.
    pub fn with_occupation(mut self, occupation: Occupation) -> Self {
        self.occupation = occupation;
        self
    }

    /// Set the income band.
    pub fn with_income(mut self, income: IncomeBand) -> Self {
        self.income = income;
        self
    }

    /// Replace monthly expenses.
    ///
    /// The value must parse as a finite, non-negative number; it is stored
    /// trimmed but otherwise as typed.
    pub fn set_expenses(&mut self, expenses: &str) -> Result<()> {
        self.expenses = validate_expenses(expenses)?;
        Ok(())
    }

    /// Replace the location. Blank locations are rejected.
    pub fn set_location(&mut self, location: &str) -> Result<()> {
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::validation(
                "location is required",
                Some("location".to_string()),
            ));
        }
        self.location = location.to_string();
        Ok(())
    }

    /// Monthly expenses as a number.
    pub fn expenses_amount(&self) -> f64 {
        self.expenses.parse().unwrap_or(0.0)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            occupation: Occupation::default(),
            income: IncomeBand::default(),
            expenses: DEFAULT_EXPENSES.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

/// Check that `value` is a usable monthly expense figure and return it trimmed.
pub fn validate_expenses(value: &str) -> Result<String> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(trimmed.to_string()),
        _ => Err(Error::validation(
            format!("expenses must be a non-negative number, got {trimmed:?}"),
            Some("expenses".to_string()),
        )),
    }
}
