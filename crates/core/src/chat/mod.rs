pub mod rules;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::chat::{ChatExchangeId, NewChatExchange};
use crate::domain::tender::TenderSummary;
use crate::errors::ApplicationError;

pub use self::rules::{ChatIntent, ChatRule, ChatRules};
use self::rules::{NO_TENDERS_REPLY, TENDERS_HEADER};

pub const FALLBACK_SESSION_ID: &str = "web-session";
pub const TENDER_REPLY_LIMIT: u32 = 5;

/// Tenders ordered by closing date, latest first.
#[async_trait]
pub trait TenderLookup: Send + Sync {
    async fn latest_tenders(&self, limit: u32) -> Result<Vec<TenderSummary>, ApplicationError>;
}

#[async_trait]
pub trait ChatLogStore: Send + Sync {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, ApplicationError>;
}

#[async_trait]
impl<T: TenderLookup + ?Sized> TenderLookup for Arc<T> {
    async fn latest_tenders(&self, limit: u32) -> Result<Vec<TenderSummary>, ApplicationError> {
        (**self).latest_tenders(limit).await
    }
}

#[async_trait]
impl<L: ChatLogStore + ?Sized> ChatLogStore for Arc<L> {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, ApplicationError> {
        (**self).append(exchange).await
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub intent: ChatIntent,
    pub reply: String,
    pub session_id: String,
    pub exchange_id: ChatExchangeId,
}

pub struct ChatResponder<T, L> {
    tenders: T,
    log: L,
    rules: ChatRules,
}

impl<T, L> ChatResponder<T, L> {
    pub fn new(tenders: T, log: L) -> Self {
        Self::with_rules(tenders, log, ChatRules::default())
    }

    pub fn with_rules(tenders: T, log: L, rules: ChatRules) -> Self {
        Self { tenders, log, rules }
    }
}

impl<T, L> ChatResponder<T, L>
where
    T: TenderLookup,
    L: ChatLogStore,
{
    /// Runs one chat turn: classify, resolve the reply, log the exchange.
    ///
    /// A failed tender lookup or log append fails the whole turn. An absent
    /// message classifies as empty text and is logged as absent.
    pub async fn respond(
        &self,
        session_id: Option<&str>,
        message: Option<&str>,
    ) -> Result<ChatReply, ApplicationError> {
        let intent = self.rules.classify(message.unwrap_or_default());
        let reply = match intent.static_reply() {
            Some(text) => text.to_string(),
            None => {
                let tenders = self.tenders.latest_tenders(TENDER_REPLY_LIMIT).await?;
                render_tender_reply(&tenders)
            }
        };

        let session_id = session_id
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(FALLBACK_SESSION_ID)
            .to_string();

        let exchange_id = self
            .log
            .append(NewChatExchange {
                session_id: session_id.clone(),
                user_message: message.map(str::to_string),
                bot_response: reply.clone(),
            })
            .await?;

        Ok(ChatReply { intent, reply, session_id, exchange_id })
    }
}

pub fn render_tender_reply(tenders: &[TenderSummary]) -> String {
    if tenders.is_empty() {
        return NO_TENDERS_REPLY.to_string();
    }

    let mut lines = Vec::with_capacity(tenders.len() + 1);
    lines.push(TENDERS_HEADER.to_string());
    lines.extend(tenders.iter().map(|tender| {
        let closes = tender
            .closing_date
            .map_or_else(|| "N/A".to_string(), |date| date.format("%Y-%m-%d").to_string());
        format!("{} (closes: {closes})", tender.title)
    }));
    lines.join("\n")
}
