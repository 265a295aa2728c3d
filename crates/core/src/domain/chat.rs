use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatExchangeId(pub i64);

/// One logged chat turn. `user_message` is the raw inbound text, absent when
/// the request carried none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: ChatExchangeId,
    pub session_id: String,
    pub user_message: Option<String>,
    pub bot_response: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewChatExchange {
    pub session_id: String,
    pub user_message: Option<String>,
    pub bot_response: String,
}
