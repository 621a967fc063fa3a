use super::{create_router, AppState};
use crate::models::fixtures::create_record;
use crate::storage::{DatasetStore, SqliteStore};
use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

fn seeded_router() -> Result<Router> {
    let mut store = SqliteStore::open_in_memory()?;
    store.upsert_batch(&[
        create_record("ORD001", "2025-06-27", "Blue Widget", 2, "100.00")?,
        create_record("ORD002", "2025-06-28", "Gadget", 1, "50.00")?,
        create_record("ORD003", "2025-06-29", "Widget Stand", 5, "12.50")?,
    ])?;

    Ok(create_router(AppState::new(store)))
}

async fn get(router: Router, uri: &str) -> Result<(StatusCode, Vec<u8>)> {
    let response = router.oneshot(Request::builder().uri(uri).body(Body::empty())?).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;

    Ok((status, body.to_vec()))
}

async fn get_json(router: Router, uri: &str) -> Result<(StatusCode, Value)> {
    let (status, body) = get(router, uri).await?;

    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_health_and_root() -> Result<()> {
    let (status, body) = get_json(seeded_router()?, "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(seeded_router()?, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Purchase Tracker API");

    Ok(())
}

#[tokio::test]
async fn test_list_purchases_newest_first_with_pagination() -> Result<()> {
    let (status, body) = get_json(seeded_router()?, "/api/purchases?limit=2&offset=1").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["purchases"][0]["order_id"], "ORD002");
    assert_eq!(body["purchases"][1]["order_id"], "ORD001");
    assert_eq!(body["purchases"][1]["item_price_cny"], "100.00");
    assert_eq!(body["purchases"][1]["item_price_sgd"], "19.62");

    Ok(())
}

#[tokio::test]
async fn test_list_purchases_with_trailing_slash() -> Result<()> {
    let (status, body) = get_json(seeded_router()?, "/api/purchases/?limit=1").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["purchases"][0]["order_id"], "ORD003");

    Ok(())
}

#[tokio::test]
async fn test_list_purchases_search_and_filters() -> Result<()> {
    let (_, body) = get_json(seeded_router()?, "/api/purchases?search=WIDGET").await?;
    assert_eq!(body["total"], 2);

    let (_, body) = get_json(seeded_router()?, "/api/purchases?currency=sgd&price_min=9.81&price_max=9.81").await?;
    assert_eq!(body["total"], 1);
    assert_eq!(body["purchases"][0]["order_id"], "ORD002");

    let (_, body) = get_json(seeded_router()?, "/api/purchases?date_from=2025-06-28&min_quantity=2").await?;
    assert_eq!(body["total"], 1);
    assert_eq!(body["purchases"][0]["order_id"], "ORD003");

    Ok(())
}

#[tokio::test]
async fn test_list_purchases_rejects_bad_limit() -> Result<()> {
    let (status, body) = get_json(seeded_router()?, "/api/purchases?limit=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().is_some_and(|detail| detail.contains("limit")));

    let (status, _) = get(seeded_router()?, "/api/purchases?limit=1001").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(seeded_router()?, "/api/purchases?date_from=yesterday").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_get_purchase_by_order_id() -> Result<()> {
    let (status, body) = get_json(seeded_router()?, "/api/purchases/ORD003").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_name"], "Widget Stand");
    assert_eq!(body["item_price_sgd"], "2.45");

    let (status, body) = get_json(seeded_router()?, "/api/purchases/ORD999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().is_some_and(|detail| detail.contains("ORD999")));

    Ok(())
}

#[tokio::test]
async fn test_summary_stats() -> Result<()> {
    let (status, body) = get_json(seeded_router()?, "/api/purchases/stats/summary").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_purchases"], 3);
    assert_eq!(body["total_items"], 8);
    assert_eq!(body["total_amount"], "312.50");
    assert_eq!(body["earliest_date"], "2025-06-27");
    assert_eq!(body["latest_date"], "2025-06-29");
    assert_eq!(body["most_expensive_item"], "Blue Widget");

    Ok(())
}

#[tokio::test]
async fn test_export_returns_csv() -> Result<()> {
    let response = seeded_router()?
        .oneshot(Request::builder().uri("/api/purchases/export?search=gadget").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let text = String::from_utf8(body.to_vec())?;

    assert_eq!(text.lines().count(), 2);
    assert!(text.ends_with("|50.00|Delivered|ORD002\n"));

    Ok(())
}
