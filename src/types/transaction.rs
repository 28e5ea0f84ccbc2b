use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::{Error, Result};

/// A single expense the user logged during the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount spent in rupees.
    pub amount: f64,

    /// Spending category, lower-cased (e.g. `food`, `fuel`).
    pub category: String,

    /// Day of the expense as `YYYY-MM-DD`.
    pub date: String,
}

impl Transaction {
    /// Create a validated transaction.
    ///
    /// The amount must be positive and finite and the category non-blank.
    pub fn new(amount: f64, category: &str, date: Date) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::validation(
                "amount must be a positive number",
                Some("amount".to_string()),
            ));
        }
        let category = category.trim().to_lowercase();
        if category.is_empty() {
            return Err(Error::validation(
                "category is required",
                Some("category".to_string()),
            ));
        }
        Ok(Self {
            amount,
            category,
            date: crate::utils::time::iso_date(date),
        })
    }
}
