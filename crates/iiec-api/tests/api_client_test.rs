#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use iiec_api::models::{
    EventPayload, EventRecord, OrderPayload, ProductPayload, ProductRecord, ProjectRecord,
    SectionPayload, SectionRecord,
};
use iiec_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn token() -> SecretString {
    SecretString::from("tok-123".to_string())
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "email": "admin@iiec.org", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "user": { "id": 1, "email": "admin@iiec.org", "name": "Admin" }
        })))
        .mount(&server)
        .await;

    let secret = SecretString::from("hunter2".to_string());
    let login = client.login("admin@iiec.org", &secret).await.unwrap();

    assert_eq!(login.access_token, "tok-123");
    let user = login.user.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.name.as_deref(), Some("Admin"));
}

#[tokio::test]
async fn test_login_failure_surfaces_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Incorrect email or password" })),
        )
        .mount(&server)
        .await;

    let secret = SecretString::from("wrong".to_string());
    let result = client.login("admin@iiec.org", &secret).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_failure_without_detail_is_generic() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let secret = SecretString::from("x".to_string());
    let result = client.login("a@b.c", &secret).await;

    assert!(
        matches!(&result, Err(Error::Authentication { message }) if message == "Login failed"),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_verify_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/verify"))
        .and(bearer_token("tok-123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "user": { "id": 7, "email": "ops@iiec.org", "name": "Ops" }
        })))
        .mount(&server)
        .await;

    let user = client.verify(&token()).await.unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.email, "ops@iiec.org");
}

#[tokio::test]
async fn test_verify_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/verify"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid token" })),
        )
        .mount(&server)
        .await;

    let result = client.verify(&token()).await;
    assert!(matches!(result, Err(Error::Unauthorized)), "got: {result:?}");
}

// ── Resource tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_projects_with_sections() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(bearer_token("tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "name": "Solar Kiosk",
            "description": "Off-grid charging",
            "overview": null,
            "main_image_url": "https://img/solar.png",
            "status": "active",
            "created_at": "2025-01-10T08:00:00+00:00",
            "updated_at": null,
            "sections": [{
                "id": 11,
                "project_id": 3,
                "title": "Prototype",
                "main_image_url": "https://img/proto.png"
            }]
        }])))
        .mount(&server)
        .await;

    let projects: Vec<ProjectRecord> = client.list("projects", Some(&token())).await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].main_image_url.as_deref(), Some("https://img/solar.png"));
    assert!(projects[0].overview.is_none());
    assert_eq!(projects[0].sections.len(), 1);
    assert_eq!(projects[0].sections[0].project_id, 3);
}

#[tokio::test]
async fn test_create_product_posts_to_trailing_slash() {
    let (server, client) = setup().await;

    let payload = ProductPayload {
        name: "Filament Pack".into(),
        description: "Assorted PLA".into(),
        price: 24.5,
        image: "https://img/pla.png".into(),
        in_stock: false,
    };

    Mock::given(method("POST"))
        .and(path("/products/"))
        .and(body_json(json!({
            "name": "Filament Pack",
            "description": "Assorted PLA",
            "price": 24.5,
            "image": "https://img/pla.png",
            "in_stock": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Filament Pack",
            "description": "Assorted PLA",
            "price": 24.5,
            "image": "https://img/pla.png",
            "in_stock": false
        })))
        .mount(&server)
        .await;

    let created: ProductRecord = client
        .create("products", &payload, Some(&token()))
        .await
        .unwrap();

    assert_eq!(created.id, 42);
    assert!(!created.in_stock);
}

#[tokio::test]
async fn test_update_event_keeps_image_url_column() {
    let (server, client) = setup().await;

    let payload = EventPayload {
        title: "Demo Day".into(),
        description: String::new(),
        date: "2026-11-20".into(),
        time: "14:00".into(),
        location: "Hall B".into(),
        url: String::new(),
        image_url: "https://img/demo.png".into(),
    };

    Mock::given(method("PUT"))
        .and(path("/events/5"))
        .and(body_json(json!({
            "title": "Demo Day",
            "description": "",
            "date": "2026-11-20",
            "time": "14:00",
            "location": "Hall B",
            "url": "",
            "imageUrl": "https://img/demo.png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "title": "Demo Day",
            "date": "2026-11-20",
            "time": "14:00",
            "location": "Hall B",
            "imageUrl": "https://img/demo.png"
        })))
        .mount(&server)
        .await;

    let updated: EventRecord = client
        .update("events", 5, &payload, Some(&token()))
        .await
        .unwrap();

    assert_eq!(updated.image_url.as_deref(), Some("https://img/demo.png"));
}

#[tokio::test]
async fn test_delete_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/projects/9"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.remove("projects", 9, Some(&token())).await;
    assert!(matches!(result, Err(Error::Unauthorized)), "got: {result:?}");
}

#[tokio::test]
async fn test_not_found_carries_detail() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/products/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Product not found" })),
        )
        .mount(&server)
        .await;

    let payload = ProductPayload {
        name: "x".into(),
        description: String::new(),
        price: 1.0,
        image: String::new(),
        in_stock: true,
    };
    let err = client
        .update::<_, ProductRecord>("products", 404, &payload, Some(&token()))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("Product not found"));
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result: Result<Vec<EventRecord>, _> = client.list("events", None).await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("oops")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Section tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_section_routes() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/projects/3/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "project_id": 3, "title": "Pilot"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/projects/sections/12"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Project section deleted successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let payload = SectionPayload {
        project_id: 3,
        title: "Pilot".into(),
        description: String::new(),
        details: String::new(),
        main_image_url: String::new(),
    };
    let created: SectionRecord = client
        .create_section(3, &payload, Some(&token()))
        .await
        .unwrap();
    assert_eq!(created.id, 12);

    client.remove_section(12, Some(&token())).await.unwrap();
}

// ── Order tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_place_order_is_anonymous() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "full_name": "Ada Lovelace",
            "email": "ada@example.org",
            "contact": "555-0100",
            "product_title": "Owl Set",
            "quantity": 2,
            "total_amount": 159.98,
            "order_date": "2026-10-16T09:00:00"
        })))
        .mount(&server)
        .await;

    let order = OrderPayload {
        full_name: "Ada Lovelace".into(),
        email: "ada@example.org".into(),
        contact: "555-0100".into(),
        product_title: "Owl Set".into(),
        quantity: 2,
        total_amount: 159.98,
    };
    let recorded = client.place_order(&order).await.unwrap();

    assert_eq!(recorded.quantity, 2);
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}
