use serde::{Deserialize, Serialize};

use crate::types::quick_chat::default_success;
use crate::types::{Transaction, UserProfile};

/// Body of `POST financial-advice/`.
///
/// Every field is optional; the backend substitutes its own defaults for
/// anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialAdviceRequest {
    /// How regular the income is, e.g. `irregular`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_pattern: Option<String>,

    /// Monthly income band, e.g. `18000-25000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_range: Option<String>,

    /// Occupation label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,

    /// Monthly expenses in rupees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_expenses: Option<String>,

    /// Current savings in rupees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_savings: Option<String>,

    /// What the user wants to achieve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,

    /// Household size, free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_size: Option<String>,

    /// City or region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Recent expenses to ground the advice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_transactions: Vec<Transaction>,
}

impl FinancialAdviceRequest {
    /// Build a request from the session profile.
    ///
    /// Gig work is assumed to pay irregularly.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            income_pattern: Some("irregular".to_string()),
            income_range: Some(profile.income.value().to_string()),
            occupation: Some(profile.occupation.label().to_string()),
            monthly_expenses: Some(profile.expenses.clone()),
            location: Some(profile.location.clone()),
            ..Self::default()
        }
    }

    /// Set the goals.
    pub fn with_goals(mut self, goals: impl Into<String>) -> Self {
        self.goals = Some(goals.into());
        self
    }

    /// Set current savings.
    pub fn with_current_savings(mut self, savings: impl Into<String>) -> Self {
        self.current_savings = Some(savings.into());
        self
    }

    /// Set household size.
    pub fn with_family_size(mut self, family_size: impl Into<String>) -> Self {
        self.family_size = Some(family_size.into());
        self
    }

    /// Attach recent transactions.
    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.recent_transactions = transactions;
        self
    }
}

/// Reply from `POST financial-advice/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAdviceResponse {
    /// False when the backend could not produce advice.
    #[serde(default = "default_success")]
    pub success: bool,

    /// The advice text.
    pub advice: String,

    /// The profile as the backend understood it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<serde_json::Value>,

    /// Server-side timestamp, passed through as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Display name of the model that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Server-measured handling time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,

    /// Kind of analysis performed, e.g. `comprehensive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,

    /// Why the backend fell back to a canned answer, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}
