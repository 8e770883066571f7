//! Knowledge base, answer and category operations against a mock server.

mod common;

use common::{api, token_client};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zammad_client::models::{KnowledgeBaseAnswerPublicity, KnowledgeBaseSettings};
use zammad_client::ZammadError;

async fn mount(server: &MockServer, verb: &str, p: &str, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(api(p)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_init_returns_structure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "knowledge_bases/init",
        json!({
            "KnowledgeBase": {"1": {"id": 1, "category_ids": []}},
            "KnowledgeBaseLocale": {"1": {"id": 1}},
        }),
    )
    .await;

    let structure = token_client(&server).knowledge_bases().init().await.unwrap();
    assert!(structure.get("KnowledgeBase").is_some());
    assert!(structure.get("KnowledgeBaseLocale").is_some());
}

#[tokio::test]
async fn test_manage_sends_only_set_settings() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(api("knowledge_bases/manage/1")))
        .and(body_json(json!({
            "active": true,
            "homepage_layout": "grid",
            "color_highlight": "#38ae6a",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "active": true, "homepage_layout": "grid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = KnowledgeBaseSettings::new()
        .with_active(true)
        .with_homepage_layout("grid")
        .with_color_highlight("#38ae6a");
    let response = token_client(&server)
        .knowledge_bases()
        .manage(1, &settings)
        .await
        .unwrap();

    assert_eq!(response["active"], true);
    assert_eq!(response["homepage_layout"], "grid");
}

#[tokio::test]
async fn test_knowledge_base_permissions_and_reordering() {
    let server = MockServer::start().await;
    let permissions = json!({"roles_reader": [], "roles_editor": [1]});

    mount(&server, "GET", "knowledge_bases/1/permissions", permissions.clone()).await;
    mount(&server, "PUT", "knowledge_bases/1/permissions", permissions.clone()).await;
    mount(
        &server,
        "PATCH",
        "knowledge_bases/1/categories/1/reorder_categories",
        json!({"KnowledgeBase": {}, "KnowledgeBaseCategory": {}}),
    )
    .await;
    mount(
        &server,
        "PATCH",
        "knowledge_bases/1/categories/reorder_root_categories",
        json!({"KnowledgeBase": {}, "KnowledgeBaseCategory": {}}),
    )
    .await;

    let kb = token_client(&server).knowledge_bases();

    let shown = kb.show_permissions(1).await.unwrap();
    assert!(shown.get("roles_editor").is_some());

    let changed = kb
        .change_permissions(
            1,
            &json!({"permissions_dialog": {"permissions": {"1": "editor", "2": "reader"}}}),
        )
        .await
        .unwrap();
    assert!(changed.get("roles_reader").is_some());

    let sub = kb
        .reorder_sub_categories(1, 1, &json!({"ordered_ids": [3, 2]}))
        .await
        .unwrap();
    assert!(sub.get("KnowledgeBaseCategory").is_some());

    let root = kb
        .reorder_root_categories(1, &json!({"ordered_ids": [5, 4, 1]}))
        .await
        .unwrap();
    assert!(root.get("KnowledgeBase").is_some());
}

#[tokio::test]
async fn test_answer_lifecycle() {
    let server = MockServer::start().await;
    let create = json!({
        "knowledge_base_id": 1,
        "category_id": 1,
        "title": "Initial Answer Title",
        "content": "This is the initial content.",
    });

    Mock::given(method("POST"))
        .and(path(api("knowledge_bases/1/answers")))
        .and(body_json(&create))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "assets": {}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("knowledge_bases/1/answers/9")))
        .and(query_param("full", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "assets": {}})))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "PATCH", "knowledge_bases/1/answers/9", json!({"id": 9, "assets": {}})).await;
    mount(&server, "POST", "knowledge_bases/1/answers/9/publish", json!({"id": 9})).await;
    mount(&server, "DELETE", "knowledge_bases/1/answers/9/attachments/4", json!({})).await;
    mount(&server, "DELETE", "knowledge_bases/1/answers/9", json!({})).await;

    let answers = token_client(&server).knowledge_base_answers();

    let created = answers.create(&create).await.unwrap();
    assert_eq!(created["id"], 9);

    let found = answers.find_answer(1, 9).await.unwrap();
    assert_eq!(found["id"], 9);

    let updated = answers
        .update(1, &json!({"answer_id": 9, "category_id": 1, "title": "Updated Answer Title"}))
        .await
        .unwrap();
    assert_eq!(updated["id"], 9);

    let published = answers
        .change_answer_visibility(1, 9, KnowledgeBaseAnswerPublicity::Publicly)
        .await
        .unwrap();
    assert_eq!(published["id"], 9);

    answers.delete_attachment(1, 9, 4).await.unwrap();
    answers.destroy_answer(1, 9).await.unwrap();
}

#[tokio::test]
async fn test_answer_attachment_is_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api("knowledge_bases/1/answers/9/attachments")))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("Hello Zammad"))
        .and(body_string_contains("filename=\"hello.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "attachment_ids": [4]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = token_client(&server)
        .knowledge_base_answers()
        .add_attachment(1, 9, "hello.txt", b"Hello Zammad".to_vec())
        .await
        .unwrap();

    assert_eq!(response["attachment_ids"][0], 4);
}

#[tokio::test]
async fn test_answer_create_validates_before_sending() {
    let server = MockServer::start().await;
    let answers = token_client(&server).knowledge_base_answers();

    let err = answers.create(&json!(["not", "a", "dict"])).await.unwrap_err();
    assert!(matches!(err, ZammadError::InvalidType { found: "array", .. }));

    let err = answers.create(&json!({"title": "No KB ID"})).await.unwrap_err();
    match err {
        ZammadError::MissingParameter { resource, parameter } => {
            assert_eq!(resource, "KnowledgeBaseAnswers");
            assert_eq!(parameter, "knowledge_base_id");
        }
        other => panic!("expected missing parameter, got {:?}", other),
    }

    let err = answers.update(1, &json!({"title": "x"})).await.unwrap_err();
    assert!(matches!(err, ZammadError::MissingParameter { .. }));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_category_lifecycle() {
    let server = MockServer::start().await;
    let create = json!({
        "knowledge_base_id": 1,
        "name": "Documentation Category",
        "parent_id": null,
        "category_icon": "f115",
    });
    let permissions = json!({"roles_reader": [], "roles_editor": [1]});

    Mock::given(method("POST"))
        .and(path(api("knowledge_bases/1/categories")))
        .and(body_json(&create))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "category_icon": "f115"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "GET", "knowledge_bases/1/categories/3", json!({"id": 3})).await;
    mount(&server, "PATCH", "knowledge_bases/1/categories/3", json!({"id": 3})).await;
    mount(&server, "GET", "knowledge_bases/1/categories/3/permissions", permissions.clone()).await;
    mount(&server, "PUT", "knowledge_bases/1/categories/3/permissions", permissions.clone()).await;
    mount(&server, "PATCH", "knowledge_bases/1/categories/3/reorder_answers", json!({})).await;
    mount(&server, "DELETE", "knowledge_bases/1/categories/3", json!({})).await;

    let categories = token_client(&server).knowledge_base_categories();

    let created = categories.create(&create).await.unwrap();
    assert_eq!(created["category_icon"], "f115");

    assert_eq!(categories.find_category(1, 3).await.unwrap()["id"], 3);
    assert_eq!(
        categories
            .update(1, &json!({"category_id": 3, "name": "Updated Category Name"}))
            .await
            .unwrap()["id"],
        3
    );

    let shown = categories.show_permissions(1, 3).await.unwrap();
    assert!(shown.get("roles_reader").is_some());
    let changed = categories
        .change_permissions(1, 3, &json!({"permissions_dialog": {"permissions": {"1": "editor"}}}))
        .await
        .unwrap();
    assert!(changed.get("roles_editor").is_some());

    categories
        .reorder_answers(1, 3, &json!({"ordered_ids": [10, 1]}))
        .await
        .unwrap();
    categories.destroy_category(1, 3).await.unwrap();
}

#[tokio::test]
async fn test_category_create_validates_before_sending() {
    let server = MockServer::start().await;
    let categories = token_client(&server).knowledge_base_categories();

    let err = categories.create(&json!("not a dict")).await.unwrap_err();
    assert!(matches!(err, ZammadError::InvalidType { found: "string", .. }));

    let err = categories.create(&json!({"name": "No KB ID"})).await.unwrap_err();
    assert!(matches!(err, ZammadError::MissingParameter { .. }));

    assert!(server.received_requests().await.unwrap().is_empty());
}
