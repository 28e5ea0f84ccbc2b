use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::quick_chat::default_success;
use crate::types::{Transaction, UserProfile};

/// Body of `POST analyze-spending/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeSpendingRequest {
    /// Expenses to analyse; the backend rejects an empty list.
    pub transactions: Vec<Transaction>,

    /// Who spent the money.
    pub user_context: UserProfile,
}

impl AnalyzeSpendingRequest {
    /// Create a request.
    pub fn new(transactions: Vec<Transaction>, user_context: UserProfile) -> Self {
        Self {
            transactions,
            user_context,
        }
    }
}

/// Totals the backend computes without the AI model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicAnalysis {
    /// Sum of all amounts.
    pub total_spent: f64,

    /// Sum per category.
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, f64>,

    /// Number of transactions submitted.
    pub transaction_count: u64,

    /// Mean amount, rounded to paise.
    pub average_transaction: f64,

    /// Up to three largest categories, biggest first.
    #[serde(default)]
    pub top_categories: Vec<(String, f64)>,
}

/// Reply from `POST analyze-spending/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeSpendingResponse {
    /// False when the request could not be analysed.
    #[serde(default = "default_success")]
    pub success: bool,

    /// Arithmetic breakdown.
    pub basic_analysis: BasicAnalysis,

    /// Model commentary, or a note explaining why there is none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<String>,

    /// Server-side timestamp, passed through as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Server-measured handling time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,

    /// `ai_powered`, `basic`, `basic_fallback` or `basic_only`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
}

impl AnalyzeSpendingResponse {
    /// Render the analysis as a chat reply.
    pub fn summary(&self) -> String {
        let basic = &self.basic_analysis;
        let mut out = format!(
            "Spent ₹{:.2} across {} transactions (average ₹{:.2}).",
            basic.total_spent, basic.transaction_count, basic.average_transaction
        );
        if !basic.top_categories.is_empty() {
            let top = basic
                .top_categories
                .iter()
                .map(|(category, amount)| format!("{category} ₹{amount:.2}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("\nTop categories: {top}."));
        }
        if let Some(insights) = self.ai_insights.as_deref().filter(|s| !s.trim().is_empty()) {
            out.push_str("\n\n");
            out.push_str(insights.trim());
        }
        out
    }
}
