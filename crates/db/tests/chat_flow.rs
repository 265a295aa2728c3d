use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ndawonga_core::chat::{ChatIntent, ChatResponder};
use ndawonga_core::domain::quote_request::QuoteSubmission;
use ndawonga_core::domain::tender::NewTender;
use ndawonga_core::pricing::{estimate, PricingTable};
use ndawonga_db::repositories::{
    ChatLogRepository, InMemoryChatLogRepository, InMemoryTenderRepository,
    QuoteRequestRepository, SqlChatLogRepository, SqlQuoteRequestRepository,
    SqlTenderRepository, TenderRepository,
};
use ndawonga_db::{connect_with_settings, migrations, DbPool};

async fn migrated_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    pool
}

fn tender(title: &str, closing_date: Option<NaiveDate>) -> NewTender {
    NewTender {
        title: title.to_string(),
        description: None,
        closing_date,
        file: None,
        featured: false,
    }
}

#[tokio::test]
async fn tender_question_is_answered_from_sqlite_and_logged() {
    let pool = migrated_pool().await;
    let tenders = Arc::new(SqlTenderRepository::new(pool.clone()));
    let log = Arc::new(SqlChatLogRepository::new(pool.clone()));

    tenders
        .create(tender("Road Resealing", NaiveDate::from_ymd_opt(2026, 12, 1)))
        .await
        .expect("create");
    tenders.create(tender("Fencing", None)).await.expect("create");

    let responder = ChatResponder::new(tenders.clone(), log.clone());
    let reply = responder
        .respond(Some("visitor-7"), Some("Any open TENDERS this month?"))
        .await
        .expect("reply");

    assert_eq!(reply.intent, ChatIntent::Tenders);
    assert_eq!(
        reply.reply,
        "Current tenders:\nRoad Resealing (closes: 2026-12-01)\nFencing (closes: N/A)"
    );

    let history = log.list_for_session("visitor-7").await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, reply.exchange_id);
    assert_eq!(history[0].user_message.as_deref(), Some("Any open TENDERS this month?"));
    assert_eq!(history[0].bot_response, reply.reply);
}

#[tokio::test]
async fn only_five_latest_tenders_are_listed() {
    let pool = migrated_pool().await;
    let tenders = Arc::new(SqlTenderRepository::new(pool.clone()));
    for day in 1..=7 {
        tenders
            .create(tender(&format!("Tender {day}"), NaiveDate::from_ymd_opt(2026, 5, day)))
            .await
            .expect("create");
    }

    let responder = ChatResponder::new(tenders, Arc::new(SqlChatLogRepository::new(pool)));
    let reply = responder.respond(None, Some("tender")).await.expect("reply");

    let lines: Vec<&str> = reply.reply.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "Tender 7 (closes: 2026-05-07)");
    assert_eq!(lines[5], "Tender 3 (closes: 2026-05-03)");
    assert_eq!(reply.session_id, "web-session");
}

#[tokio::test]
async fn in_memory_adapters_drive_the_same_responder() {
    let tenders = Arc::new(InMemoryTenderRepository::default());
    let log = Arc::new(InMemoryChatLogRepository::default());
    let responder = ChatResponder::new(tenders, log.clone());

    let empty = responder.respond(Some("s1"), Some("tender list please")).await.expect("reply");
    let greeting = responder.respond(Some("s1"), Some("hello")).await.expect("reply");

    assert_eq!(empty.reply, "No active tenders currently.");
    assert_eq!(greeting.intent, ChatIntent::Greeting);
    assert_eq!(log.len().await, 2);
}

#[tokio::test]
async fn submitted_quote_keeps_client_estimate() {
    let pool = migrated_pool().await;
    let repo = SqlQuoteRequestRepository::new(pool);
    let submission: QuoteSubmission = serde_json::from_str(
        r#"{"name":"Ayanda","email":"ayanda@example.co.za","project_type":"Road Construction",
            "area_sq_m":100,"complexity":"medium","estimated_cost":1}"#,
    )
    .expect("deserialize");

    let id = repo.submit(submission.into_new_request().expect("valid")).await.expect("submit");
    let stored = repo.find_by_id(id).await.expect("find").expect("stored");

    let server_side = estimate(
        &PricingTable::default(),
        stored.project_type.as_deref().unwrap_or_default(),
        stored.area_sq_m,
        &stored.complexity,
    );
    assert_eq!(stored.estimated_cost, Decimal::ONE);
    assert_eq!(server_side, Decimal::from(106_400));
}
