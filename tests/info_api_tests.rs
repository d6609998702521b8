//! Integration tests for the info posts CRUD endpoints.

#[path = "test_utils/mod.rs"]
mod test_utils;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use test_utils::{at, get, insert_info, insert_tenant, send, setup_test_db, test_app};

#[tokio::test]
async fn create_defaults_type_and_publish_time() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(&db);
    let before = Utc::now();

    let created = send(
        &app,
        Method::POST,
        "/api/info",
        Some(json!({ "title": "Kirkekaffe", "content": "Efter gudstjenesten" })),
    )
    .await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["message"], "Info created successfully");
    let post = &created.body["data"]["info"];
    assert_eq!(post["type"], "general");
    assert_eq!(post["is_featured_banner"], false);
    let published = DateTime::parse_from_rfc3339(post["published_at"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(published >= before - chrono::Duration::seconds(1));

    let id = post["id"].as_i64().unwrap();
    let fetched = get(&app, &format!("/api/info/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["info"]["content"], "Efter gudstjenesten");
}

#[tokio::test]
async fn create_validates_body() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(&db);

    let cases = [
        (json!({ "content": "Uden titel" }), "Missing required field: title"),
        (json!({ "title": "Uden indhold" }), "Missing required field: content"),
        (
            json!({ "title": "Nyhed", "content": "Tekst", "type": "blog" }),
            "Type must be one of: news, announcement, general",
        ),
        (
            json!({ "title": "Nyhed", "content": "Tekst", "published_at": "snart" }),
            "Invalid published_at format",
        ),
    ];

    for (payload, message) in cases {
        let response = send(&app, Method::POST, "/api/info", Some(payload)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(response.body["error"], message);
    }
}

#[tokio::test]
async fn listing_is_newest_first_and_filters() {
    let db = setup_test_db().await.unwrap();
    insert_info(&db, 1, "Gammel nyhed", "news", at(2025, 1, 2, 9), false)
        .await
        .unwrap();
    insert_info(&db, 1, "Meddelelse", "announcement", at(2025, 1, 10, 9), true)
        .await
        .unwrap();
    insert_info(&db, 1, "Ny nyhed", "news", at(2025, 1, 20, 9), false)
        .await
        .unwrap();
    let app = test_app(&db);

    let all = get(&app, "/api/info").await;
    assert_eq!(all.status, StatusCode::OK);
    let titles: Vec<&str> = all.body["data"]["info"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Ny nyhed", "Meddelelse", "Gammel nyhed"]);
    assert_eq!(
        all.body["data"]["pagination"],
        json!({ "total": 3, "limit": 3, "offset": 0, "hasMore": false })
    );

    let news = get(&app, "/api/info?type=news").await;
    assert_eq!(news.body["data"]["pagination"]["total"], 2);
    assert_eq!(news.body["data"]["info"][0]["title"], "Ny nyhed");

    let featured = get(&app, "/api/info?featured=true").await;
    assert_eq!(featured.body["data"]["pagination"]["total"], 1);
    assert_eq!(featured.body["data"]["info"][0]["type"], "announcement");

    let paged = get(&app, "/api/info?limit=1&offset=1").await;
    assert_eq!(paged.body["data"]["info"][0]["title"], "Meddelelse");
    assert_eq!(paged.body["data"]["pagination"]["hasMore"], true);

    let skipped = get(&app, "/api/info?offset=2").await;
    assert_eq!(skipped.status, StatusCode::OK);
    assert_eq!(skipped.body["data"]["info"].as_array().unwrap().len(), 1);
    assert_eq!(skipped.body["data"]["info"][0]["title"], "Gammel nyhed");
    assert_eq!(skipped.body["data"]["pagination"]["offset"], 2);

    let bad_type = get(&app, "/api/info?type=blog").await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_info() {
    let db = setup_test_db().await.unwrap();
    let post = insert_info(&db, 1, "Vinterlukket", "general", at(2025, 1, 12, 8), false)
        .await
        .unwrap();
    let app = test_app(&db);
    let uri = format!("/api/info/{}", post.id);

    let updated = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "type": "announcement", "image_url": "https://gislevkirke.dk/taarn.jpg" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["message"], "Info updated successfully");
    assert_eq!(updated.body["data"]["info"]["type"], "announcement");
    assert_eq!(updated.body["data"]["info"]["title"], "Vinterlukket");

    let cleared = send(&app, Method::PUT, &uri, Some(json!({ "image_url": null }))).await;
    assert!(cleared.body["data"]["info"]["image_url"].is_null());

    let rejected = send(&app, Method::PUT, &uri, Some(json!({ "type": "blog" }))).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let deleted = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Info deleted successfully");

    let gone = get(&app, &uri).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["error"], "Info not found");
}

#[tokio::test]
async fn invalid_id_and_foreign_tenant() {
    let db = setup_test_db().await.unwrap();
    insert_tenant(&db, 2, "nabosogn.dk").await.unwrap();
    let foreign = insert_info(&db, 2, "Nabosognets nyhed", "news", at(2025, 2, 1, 9), true)
        .await
        .unwrap();
    let app = test_app(&db);

    let invalid = get(&app, "/api/info/xyz").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["error"], "Invalid info ID");

    let uri = format!("/api/info/{}", foreign.id);
    assert_eq!(get(&app, &uri).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        send(&app, Method::DELETE, &uri, None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&app, "/api/info").await.body["data"]["pagination"]["total"],
        0
    );
}
