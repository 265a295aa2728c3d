use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use ndawonga_core::chat::{ChatLogStore, TenderLookup};
use ndawonga_core::domain::chat::{ChatExchange, ChatExchangeId, NewChatExchange};
use ndawonga_core::domain::quote_request::{NewQuoteRequest, QuoteRequest, QuoteRequestId};
use ndawonga_core::domain::tender::{NewTender, Tender, TenderId, TenderSummary};
use ndawonga_core::errors::ApplicationError;

use super::{ChatLogRepository, QuoteRequestRepository, RepositoryError, TenderRepository};

/// Next row id for an append-only vector, mirroring SQLite AUTOINCREMENT.
fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |len| len + 1)
}

#[derive(Default)]
pub struct InMemoryQuoteRequestRepository {
    requests: RwLock<Vec<QuoteRequest>>,
}

#[async_trait]
impl QuoteRequestRepository for InMemoryQuoteRequestRepository {
    async fn submit(&self, request: NewQuoteRequest) -> Result<QuoteRequestId, RepositoryError> {
        let mut requests = self.requests.write().await;
        let id = QuoteRequestId(next_id(requests.len()));
        requests.push(QuoteRequest {
            id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            project_type: request.project_type,
            area_sq_m: request.area_sq_m,
            complexity: request.complexity,
            estimated_cost: request.estimated_cost,
            message: request.message,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_by_id(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        Ok(requests.iter().find(|request| request.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryChatLogRepository {
    exchanges: RwLock<Vec<ChatExchange>>,
}

impl InMemoryChatLogRepository {
    pub async fn len(&self) -> usize {
        self.exchanges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.exchanges.read().await.is_empty()
    }
}

#[async_trait]
impl ChatLogRepository for InMemoryChatLogRepository {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, RepositoryError> {
        let mut exchanges = self.exchanges.write().await;
        let id = ChatExchangeId(next_id(exchanges.len()));
        exchanges.push(ChatExchange {
            id,
            session_id: exchange.session_id,
            user_message: exchange.user_message,
            bot_response: exchange.bot_response,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<ChatExchange>, RepositoryError> {
        let exchanges = self.exchanges.read().await;
        Ok(exchanges.iter().filter(|exchange| exchange.session_id == session_id).cloned().collect())
    }
}

#[async_trait]
impl ChatLogStore for InMemoryChatLogRepository {
    async fn append(&self, exchange: NewChatExchange) -> Result<ChatExchangeId, ApplicationError> {
        Ok(ChatLogRepository::append(self, exchange).await?)
    }
}

#[derive(Default)]
pub struct InMemoryTenderRepository {
    tenders: RwLock<Vec<Tender>>,
}

#[async_trait]
impl TenderRepository for InMemoryTenderRepository {
    async fn list(&self) -> Result<Vec<Tender>, RepositoryError> {
        let mut tenders = self.tenders.read().await.clone();
        tenders.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then_with(|| b.closing_date.cmp(&a.closing_date))
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(tenders)
    }

    async fn latest_by_closing_date(
        &self,
        limit: u32,
    ) -> Result<Vec<TenderSummary>, RepositoryError> {
        let tenders = self.tenders.read().await;
        let mut ordered: Vec<&Tender> = tenders.iter().collect();
        // `None < Some(_)`, so undated tenders land last.
        ordered.sort_by(|a, b| {
            b.closing_date.cmp(&a.closing_date).then_with(|| b.id.0.cmp(&a.id.0))
        });
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(ordered.into_iter().take(limit).map(TenderSummary::from).collect())
    }

    async fn create(&self, tender: NewTender) -> Result<TenderId, RepositoryError> {
        let mut tenders = self.tenders.write().await;
        let id = TenderId(next_id(tenders.len()));
        tenders.push(Tender {
            id,
            title: tender.title,
            description: tender.description,
            closing_date: tender.closing_date,
            file: tender.file,
            featured: tender.featured,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl TenderLookup for InMemoryTenderRepository {
    async fn latest_tenders(&self, limit: u32) -> Result<Vec<TenderSummary>, ApplicationError> {
        Ok(self.latest_by_closing_date(limit).await?)
    }
}
