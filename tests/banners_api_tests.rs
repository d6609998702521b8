//! Integration tests for the banner endpoints over a migrated SQLite database.

#[path = "test_utils/mod.rs"]
mod test_utils;

use axum::http::StatusCode;
use test_utils::{at, get, insert_event, insert_info, insert_tenant, setup_test_db, test_app};

#[tokio::test]
async fn featured_items_merge_newest_first() {
    let db = setup_test_db().await.unwrap();
    let featured_event = insert_event(&db, 1, "Madpakkeklub", at(2025, 2, 17, 12), true)
        .await
        .unwrap();
    insert_event(&db, 1, "Seniorcafé", at(2025, 2, 15, 14), false)
        .await
        .unwrap();
    let featured_info = insert_info(
        &db,
        1,
        "Støt kirkens sociale arbejde",
        "general",
        at(2025, 1, 25, 9),
        true,
    )
    .await
    .unwrap();
    insert_info(&db, 1, "Kirken søger frivillige", "general", at(2025, 1, 18, 10), false)
        .await
        .unwrap();

    let response = get(&test_app(&db), "/api/banners").await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["banners"].as_array().unwrap().len(), 2);
    assert_eq!(data["meta"]["events_count"], 1);
    assert_eq!(data["meta"]["info_count"], 1);
    assert_eq!(data["meta"]["total"], 2);
    assert_eq!(data["banners"][0]["type"], "event");
    assert_eq!(data["banners"][0]["id"], featured_event.id);
    assert_eq!(data["banners"][0]["location"], "Menighedshuset");
    assert_eq!(data["banners"][1]["type"], "info");
    assert_eq!(data["banners"][1]["id"], featured_info.id);
    assert_eq!(
        data["banners"][1]["content"],
        "Støt kirkens sociale arbejde content"
    );
}

#[tokio::test]
async fn events_and_info_interleave_by_date() {
    let db = setup_test_db().await.unwrap();
    insert_event(&db, 1, "Juleklip", at(2024, 12, 20, 15), true)
        .await
        .unwrap();
    insert_info(&db, 1, "Julegudstjenester", "news", at(2024, 12, 22, 9), true)
        .await
        .unwrap();
    insert_event(&db, 1, "Juledag", at(2024, 12, 25, 10), true)
        .await
        .unwrap();

    let response = get(&test_app(&db), "/api/banners").await;

    let titles: Vec<&str> = response.body["data"]["banners"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Juledag", "Julegudstjenester", "Juleklip"]);
}

#[tokio::test]
async fn limit_truncates_after_merge() {
    let db = setup_test_db().await.unwrap();
    for day in 1..=12 {
        insert_event(&db, 1, &format!("Koncert {day}"), at(2025, 3, day, 19), true)
            .await
            .unwrap();
    }
    insert_info(&db, 1, "Program for foråret", "news", at(2025, 3, 31, 8), true)
        .await
        .unwrap();

    let app = test_app(&db);

    let default_page = get(&app, "/api/banners").await;
    assert_eq!(default_page.status, StatusCode::OK);
    assert_eq!(default_page.body["data"]["meta"]["limit"], 10);
    assert_eq!(default_page.body["data"]["meta"]["total"], 10);
    assert_eq!(default_page.body["data"]["meta"]["events_count"], 12);
    assert_eq!(default_page.body["data"]["banners"][0]["type"], "info");

    let small_page = get(&app, "/api/banners?limit=3").await;
    let titles: Vec<&str> = small_page.body["data"]["banners"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Program for foråret", "Koncert 12", "Koncert 11"]);
}

#[tokio::test]
async fn repeated_listing_is_identical() {
    let db = setup_test_db().await.unwrap();
    insert_event(&db, 1, "Sogneindsamling", at(2025, 3, 9, 10), true)
        .await
        .unwrap();
    insert_info(&db, 1, "Indsamling", "announcement", at(2025, 3, 9, 10), true)
        .await
        .unwrap();

    let app = test_app(&db);
    let first = get(&app, "/api/banners").await;
    let second = get(&app, "/api/banners").await;

    assert_eq!(first.body, second.body);
    assert_eq!(first.body["data"]["banners"][0]["type"], "event");
}

#[tokio::test]
async fn limit_out_of_range_is_rejected() {
    let db = setup_test_db().await.unwrap();

    let response = get(&test_app(&db), "/api/banners?limit=51").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(
        response.body["error"]
            .as_str()
            .unwrap()
            .contains("Limit must be between 1 and 50")
    );
}

#[tokio::test]
async fn missing_and_unfeatured_banners_look_the_same() {
    let db = setup_test_db().await.unwrap();
    let hidden = insert_event(&db, 1, "Menighedsrådsmøde", at(2025, 2, 20, 19), false)
        .await
        .unwrap();
    let app = test_app(&db);

    let missing = get(&app, "/api/banners/event/999999").await;
    let unfeatured = get(&app, &format!("/api/banners/event/{}", hidden.id)).await;

    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], "Banner not found or not featured");
    assert_eq!(unfeatured.status, StatusCode::NOT_FOUND);
    assert_eq!(unfeatured.body["error"], missing.body["error"]);
    assert_eq!(unfeatured.body["code"], missing.body["code"]);
}

#[tokio::test]
async fn featured_banner_fetched_by_key() {
    let db = setup_test_db().await.unwrap();
    let post = insert_info(&db, 1, "Ny præst", "news", at(2025, 1, 5, 12), true)
        .await
        .unwrap();

    let response = get(&test_app(&db), &format!("/api/banners/info/{}", post.id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["x-tenant-id"], "1");
    let banner = &response.body["data"]["banner"];
    assert_eq!(banner["type"], "info");
    assert_eq!(banner["title"], "Ny præst");
    assert_eq!(banner["date"], "2025-01-05T12:00:00Z");
}

#[tokio::test]
async fn unknown_banner_type_is_rejected() {
    let db = setup_test_db().await.unwrap();

    let response = get(&test_app(&db), "/api/banners/invalid/1").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        r#"Type must be either "event" or "info""#
    );
}

#[tokio::test]
async fn other_tenants_content_is_invisible() {
    let db = setup_test_db().await.unwrap();
    insert_tenant(&db, 2, "nabosogn.dk").await.unwrap();
    let foreign = insert_event(&db, 2, "Nabosognets koncert", at(2025, 4, 1, 19), true)
        .await
        .unwrap();
    insert_info(&db, 2, "Nabosognets nyhed", "news", at(2025, 4, 2, 9), true)
        .await
        .unwrap();
    insert_event(&db, 1, "Egen koncert", at(2025, 3, 1, 19), true)
        .await
        .unwrap();
    let app = test_app(&db);

    let listing = get(&app, "/api/banners").await;
    assert_eq!(listing.body["data"]["meta"]["total"], 1);
    assert_eq!(listing.body["data"]["banners"][0]["title"], "Egen koncert");

    let direct = get(&app, &format!("/api/banners/event/{}", foreign.id)).await;
    assert_eq!(direct.status, StatusCode::NOT_FOUND);
}
