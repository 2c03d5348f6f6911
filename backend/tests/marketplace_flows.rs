//! End-to-end marketplace behaviour over the in-memory store.

mod common;

use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use common::{ADMIN, Caller, ad_id, result_count, start};

#[actix_web::test]
async fn anonymous_visitors_browse_but_cannot_publish() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    let ad = ada.publish(&app, "Lamp", 20).await;
    let visitor = Caller::anonymous();

    let (status, _) = visitor.get(&app, "/api/v1/ads").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = visitor
        .get(&app, &format!("/api/v1/ads/{}", ad_id(&ad)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = visitor
        .post(
            &app,
            "/api/v1/ads",
            json!({"title": "Sneaky", "price": 1, "category": "misc"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("forbidden"));
}

#[rstest]
#[case("ada", StatusCode::OK)]
#[case("bob", StatusCode::FORBIDDEN)]
#[case(ADMIN, StatusCode::OK)]
#[actix_web::test]
async fn ad_edits_are_limited_to_owner_and_admin(
    #[case] editor: &str,
    #[case] expected: StatusCode,
) {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    let ad = ada.publish(&app, "Guitar", 150).await;
    let editor = if editor == "ada" {
        ada.clone()
    } else {
        Caller::signed_up(&app, editor).await
    };

    let uri = format!("/api/v1/ads/{}", ad_id(&ad));
    let (status, _) = editor.patch(&app, &uri, json!({"price": 99})).await;
    assert_eq!(status, expected);

    let (_, current) = Caller::anonymous().get(&app, &uri).await;
    let price = if expected == StatusCode::OK { 99 } else { 150 };
    assert_eq!(current.get("price").and_then(Value::as_i64), Some(price));
}

#[actix_web::test]
async fn me_returns_exactly_the_callers_ads_four_per_page() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    let bob = Caller::signed_up(&app, "bob").await;
    for n in 0..6 {
        ada.publish(&app, &format!("Ada item {n}"), n).await;
    }
    bob.publish(&app, "Bob item", 5).await;
    let ada_id = ada.id(&app).await;

    let (status, first) = ada.get(&app, "/api/v1/ads/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.get("count").and_then(Value::as_u64), Some(6));
    assert_eq!(result_count(&first), 4);

    let (_, second) = ada.get(&app, "/api/v1/ads/me?page=2").await;
    assert_eq!(result_count(&second), 2);

    for page in [&first, &second] {
        let authors_ok = page
            .get("results")
            .and_then(Value::as_array)
            .expect("results")
            .iter()
            .all(|ad| ad.get("author") == Some(&ada_id));
        assert!(authors_ok, "foreign ad leaked into /ads/me");
    }
}

#[actix_web::test]
async fn list_pages_hold_at_most_four_ads() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    for n in 0..5 {
        ada.publish(&app, &format!("Item {n}"), n).await;
    }
    let visitor = Caller::anonymous();

    let (_, first) = visitor.get(&app, "/api/v1/ads").await;
    assert_eq!(result_count(&first), 4);
    let next = first
        .get("next")
        .and_then(Value::as_str)
        .expect("next link");
    assert!(next.ends_with("/api/v1/ads?page=2"), "next was {next}");

    let (_, second) = visitor.get(&app, "/api/v1/ads?page=2").await;
    assert_eq!(result_count(&second), 1);
    assert_eq!(second.get("next"), Some(&Value::Null));

    let (status, body) = visitor.get(&app, "/api/v1/ads?page=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Invalid page.")
    );
}

#[actix_web::test]
async fn created_ads_read_back_unchanged() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    let created = ada.publish(&app, "Camera", 240).await;

    let (status, fetched) = Caller::anonymous()
        .get(&app, &format!("/api/v1/ads/{}", ad_id(&created)))
        .await;
    assert_eq!(status, StatusCode::OK);
    for field in ["title", "description", "price", "category"] {
        assert_eq!(fetched.get(field), created.get(field), "{field}");
    }
    assert_eq!(fetched.get("author"), Some(&ada.id(&app).await));
}

#[actix_web::test]
async fn comments_need_an_existing_ad() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;

    let (status, body) = ada
        .post(&app, "/api/v1/ads/12345/comments", json!({"text": "hello?"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
}

#[actix_web::test]
async fn deleting_an_ad_takes_its_comments_with_it() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    let bob = Caller::signed_up(&app, "bob").await;
    let ad = ada.publish(&app, "Sofa", 300).await;
    let keep = ada.publish(&app, "Table", 80).await;

    let comments_uri = format!("/api/v1/ads/{}/comments", ad_id(&ad));
    let (status, _) = bob
        .post(&app, &comments_uri, json!({"text": "Delivery?"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = bob
        .post(
            &app,
            &format!("/api/v1/ads/{}/comments", ad_id(&keep)),
            json!({"text": "Still here"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ada
        .delete(&app, &format!("/api/v1/ads/{}", ad_id(&ad)))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, remaining) = bob.get(&app, &comments_uri).await;
    let texts: Vec<&str> = remaining
        .as_array()
        .expect("comment list")
        .iter()
        .filter_map(|comment| comment.get("text").and_then(Value::as_str))
        .collect();
    assert_eq!(texts, vec!["Still here"]);
}

#[actix_web::test]
async fn filters_survive_in_page_links() {
    let app = start().await;
    let ada = Caller::signed_up(&app, "ada").await;
    for n in 0..6 {
        ada.publish(&app, &format!("Chair {n}"), 10 + n).await;
    }
    ada.publish(&app, "Desk", 12).await;

    let (status, page) = Caller::anonymous()
        .get(&app, "/api/v1/ads?title=chair&price_max=14")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("count").and_then(Value::as_u64), Some(5));
    let next = page
        .get("next")
        .and_then(Value::as_str)
        .expect("next link");
    assert!(
        next.ends_with("/api/v1/ads?title=chair&price_max=14&page=2"),
        "next was {next}"
    );
}
