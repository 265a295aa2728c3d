use std::path::PathBuf;
use std::sync::Arc;

use ndawonga_core::chat::{ChatLogStore, ChatResponder, TenderLookup};
use ndawonga_core::pricing::PricingTable;
use ndawonga_db::repositories::{
    ContactRepository, DocumentRepository, ProjectRepository, QuoteRequestRepository,
    SqlChatLogRepository, SqlContactRepository, SqlDocumentRepository, SqlProjectRepository,
    SqlQuoteRequestRepository, SqlTeamRepository, SqlTenderRepository, TeamRepository,
    TenderRepository,
};
use ndawonga_db::DbPool;

use crate::uploads::UploadStore;

pub type SharedChatResponder = ChatResponder<Arc<dyn TenderLookup>, Arc<dyn ChatLogStore>>;

/// Shared handler state. Every field is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingTable>,
    pub quotes: Arc<dyn QuoteRequestRepository>,
    pub chat: Arc<SharedChatResponder>,
    pub tenders: Arc<dyn TenderRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub team: Arc<dyn TeamRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub contact: Arc<dyn ContactRepository>,
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn from_pool(db_pool: DbPool, pricing: PricingTable) -> Self {
        let tenders = Arc::new(SqlTenderRepository::new(db_pool.clone()));
        let chat_log: Arc<dyn ChatLogStore> = Arc::new(SqlChatLogRepository::new(db_pool.clone()));
        let tender_lookup: Arc<dyn TenderLookup> = tenders.clone();

        Self {
            pricing: Arc::new(pricing),
            quotes: Arc::new(SqlQuoteRequestRepository::new(db_pool.clone())),
            chat: Arc::new(ChatResponder::new(tender_lookup, chat_log)),
            tenders,
            projects: Arc::new(SqlProjectRepository::new(db_pool.clone())),
            team: Arc::new(SqlTeamRepository::new(db_pool.clone())),
            documents: Arc::new(SqlDocumentRepository::new(db_pool.clone())),
            contact: Arc::new(SqlContactRepository::new(db_pool)),
            uploads: Arc::new(UploadStore::default()),
        }
    }

    pub fn with_uploads_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.uploads = Arc::new(UploadStore::new(dir));
        self
    }
}
