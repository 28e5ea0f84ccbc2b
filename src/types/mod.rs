// Public modules
pub mod chat_message;
pub mod financial_advice;
pub mod income_band;
pub mod occupation;
pub mod quick_chat;
pub mod self_test;
pub mod spending_analysis;
pub mod system_health;
pub mod transaction;
pub mod user_profile;

// Re-exports
pub use chat_message::{ChatMessage, Sender};
pub use financial_advice::{FinancialAdviceRequest, FinancialAdviceResponse};
pub use income_band::{IncomeBand, IncomeBandParseError};
pub use occupation::{Occupation, OccupationParseError};
pub use quick_chat::{QuickChatRequest, QuickChatResponse};
pub use self_test::SelfTestReport;
pub use spending_analysis::{AnalyzeSpendingRequest, AnalyzeSpendingResponse, BasicAnalysis};
pub use system_health::SystemHealth;
pub use transaction::Transaction;
pub use user_profile::{UserProfile, validate_expenses};
