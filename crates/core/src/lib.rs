pub mod chat;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use chat::{
    ChatIntent, ChatLogStore, ChatReply, ChatResponder, ChatRule, ChatRules, TenderLookup,
    FALLBACK_SESSION_ID,
};
pub use domain::chat::{ChatExchange, ChatExchangeId, NewChatExchange};
pub use domain::quote_request::{NewQuoteRequest, QuoteRequest, QuoteRequestId, QuoteSubmission};
pub use domain::tender::{Tender, TenderId, TenderSummary};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::{estimate, estimate_with_trace, EstimateBreakdown, PricingTable, QuoteEstimator};
