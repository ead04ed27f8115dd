#![allow(clippy::unwrap_used)]
// Create/update/delete against a wiremock backend, under both write
// failure policies.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use iiec_core::{
    AdminClient, ClientConfig, CoreError, Draft, EntityId, EntityKind, EventDraft,
    MemoryTokenStore, OrderRequest, ProductDraft, ProjectDraft, RemoveOutcome, SaveOutcome,
    SectionDraft, SyncState, TokenStore, WriteFailurePolicy,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(policy: WriteFailurePolicy) -> (MockServer, AdminClient, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("tok-123"));
    let config = ClientConfig::parse(&server.uri())
        .unwrap()
        .with_write_policy(policy);
    let client = AdminClient::new(config, tokens.clone()).unwrap();
    (server, client, tokens)
}

const KINDS: [EntityKind; 3] = [EntityKind::Projects, EntityKind::Events, EntityKind::Products];

/// A backend record of `kind`.
fn record(kind: EntityKind, id: i64, title: &str) -> Value {
    match kind {
        EntityKind::Projects => json!({ "id": id, "name": title, "status": "active" }),
        EntityKind::Events => json!({ "id": id, "title": title, "date": "2999-05-01" }),
        EntityKind::Products => json!({ "id": id, "name": title, "price": 10.0 }),
    }
}

/// A filled-in draft of `kind`.
fn draft(kind: EntityKind, title: &str) -> Draft {
    match kind {
        EntityKind::Projects => Draft::Project(ProjectDraft {
            name: title.into(),
            ..ProjectDraft::default()
        }),
        EntityKind::Events => Draft::Event(EventDraft {
            title: title.into(),
            date: "2999-05-01".into(),
            ..EventDraft::default()
        }),
        EntityKind::Products => Draft::Product(ProductDraft {
            name: title.into(),
            price: 10.0,
            ..ProductDraft::default()
        }),
    }
}

/// Seed the store with records 1 and 2 of `kind`.
async fn seed(server: &MockServer, client: &AdminClient, kind: EntityKind) {
    let _guard = Mock::given(method("GET"))
        .and(path(format!("/{kind}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([record(kind, 1, "first"), record(kind, 2, "second")])),
        )
        .mount_as_scoped(server)
        .await;
    client.fetch_collection(kind).await;
    assert_eq!(client.store().count(kind), 2);
}

fn entries_with_id(client: &AdminClient, kind: EntityKind, id: EntityId) -> usize {
    client
        .store()
        .entities(kind)
        .iter()
        .filter(|e| e.id() == id)
        .count()
}

/// Matches a JSON body that lacks `field`.
struct WithoutField(&'static str);

impl Match for WithoutField {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .map(|body| body.get(self.0).is_none())
            .unwrap_or(false)
    }
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_appends_one_confirmed_entry() {
    for kind in KINDS {
        let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
        seed(&server, &client, kind).await;

        Mock::given(method("POST"))
            .and(path(format!("/{kind}/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(record(kind, 77, "new")))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client.save(&draft(kind, "new"), None).await.unwrap();

        assert!(outcome.is_confirmed(), "{kind}: {outcome:?}");
        assert_eq!(client.store().count(kind), 3, "{kind}");
        let last = client.store().entities(kind).pop().unwrap();
        assert_eq!(last.id(), EntityId::new(77));
        assert_eq!(last.sync(), SyncState::Confirmed);
    }
}

#[tokio::test]
async fn test_create_failure_appends_one_local_entry() {
    for kind in KINDS {
        let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
        seed(&server, &client, kind).await;

        Mock::given(method("POST"))
            .and(path(format!("/{kind}/")))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "detail": "database locked" })),
            )
            .mount(&server)
            .await;

        let outcome = client.save(&draft(kind, "new"), None).await.unwrap();

        match &outcome {
            SaveOutcome::LocalOnly { item, error } => {
                assert_eq!(item.sync(), SyncState::LocalOnly);
                assert!(error.contains("database locked"), "{error}");
            }
            other => panic!("{kind}: expected LocalOnly, got {other:?}"),
        }
        assert_eq!(client.store().count(kind), 3, "{kind}");
        assert_eq!(entries_with_id(&client, kind, outcome.item().id()), 1);
    }
}

#[tokio::test]
async fn test_offline_project_save_gets_generated_id_and_timestamps() {
    let tokens = Arc::new(MemoryTokenStore::with_token("tok-123"));
    // Nothing listens on the discard port.
    let config = ClientConfig::parse("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let client = AdminClient::new(config, tokens).unwrap();

    let before = Utc::now();
    let outcome = client
        .save(&draft(EntityKind::Projects, "Offline project"), None)
        .await
        .unwrap();
    let after = Utc::now();

    let project = outcome.item().as_project().unwrap().clone();
    assert!(!outcome.is_confirmed());
    assert!(project.id.get() >= before.timestamp_millis());
    let created = project.created_at.unwrap();
    assert!(created >= before && created <= after);
    assert_eq!(project.updated_at, Some(created));

    let listed = client.store().entities(EntityKind::Projects);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title(), "Offline project");
}

#[tokio::test]
async fn test_event_status_is_not_sent() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;

    Mock::given(method("POST"))
        .and(path("/events/"))
        .and(WithoutField("status"))
        .and(body_partial_json(json!({ "imageUrl": "https://img/demo.png" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "title": "Demo Day", "date": "2000-01-01", "imageUrl": "https://img/demo.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = Draft::Event(EventDraft {
        title: "Demo Day".into(),
        date: "2000-01-01".into(),
        image_url: "https://img/demo.png".into(),
        ..EventDraft::default()
    });
    let outcome = client.save(&draft, None).await.unwrap();

    let event = outcome.item().as_event().unwrap();
    assert!(outcome.is_confirmed());
    assert_eq!(event.status, iiec_core::EventStatus::Past);
}

#[tokio::test]
async fn test_product_payload_uses_backend_names() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;

    Mock::given(method("POST"))
        .and(path("/products/"))
        .and(body_partial_json(json!({ "image": "https://img/owl.png", "in_stock": false })))
        .and(WithoutField("inStock"))
        .and(WithoutField("imageUrl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "name": "Owl", "price": 5.0, "image": "https://img/owl.png", "in_stock": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = Draft::Product(ProductDraft {
        name: "Owl".into(),
        price: 5.0,
        in_stock: false,
        image_url: "https://img/owl.png".into(),
        ..ProductDraft::default()
    });
    let outcome = client.save(&draft, None).await.unwrap();
    let product = outcome.item().as_product().unwrap();
    assert_eq!(product.image_url, "https://img/owl.png");
    assert!(!product.in_stock);
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_keeps_exactly_one_entry() {
    for kind in KINDS {
        for fail in [false, true] {
            let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
            seed(&server, &client, kind).await;

            let response = if fail {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(record(kind, 2, "renamed"))
            };
            Mock::given(method("PUT"))
                .and(path(format!("/{kind}/2")))
                .respond_with(response)
                .expect(1)
                .mount(&server)
                .await;

            let outcome = client
                .save(&draft(kind, "renamed"), Some(EntityId::new(2)))
                .await
                .unwrap();

            assert_eq!(outcome.is_confirmed(), !fail, "{kind}");
            assert_eq!(client.store().count(kind), 2, "{kind}");
            assert_eq!(entries_with_id(&client, kind, EntityId::new(2)), 1, "{kind}");

            // Replaced in place, not moved to the end.
            let entities = client.store().entities(kind);
            assert_eq!(entities[1].title(), "renamed", "{kind}");
        }
    }
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_remove_drops_entry_whatever_the_backend_says() {
    for kind in KINDS {
        for status in [200, 404, 500] {
            let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
            seed(&server, &client, kind).await;

            Mock::given(method("DELETE"))
                .and(path(format!("/{kind}/1")))
                .respond_with(ResponseTemplate::new(status))
                .expect(1)
                .mount(&server)
                .await;

            let outcome = client
                .remove(kind, EntityId::new(1), &|_: &str| true)
                .await
                .unwrap();

            if status == 200 {
                assert_eq!(outcome, RemoveOutcome::Removed);
            } else {
                assert!(outcome.error().is_some(), "{kind} {status}");
            }
            assert_eq!(entries_with_id(&client, kind, EntityId::new(1)), 0);
            assert_eq!(client.store().count(kind), 1);
        }
    }
}

#[tokio::test]
async fn test_declined_remove_sends_nothing() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed(&server, &client, EntityKind::Products).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let asked = std::cell::RefCell::new(String::new());
    let outcome = client
        .remove(EntityKind::Products, EntityId::new(1), &|p: &str| {
            asked.borrow_mut().push_str(p);
            false
        })
        .await
        .unwrap();

    assert_eq!(outcome, RemoveOutcome::Cancelled);
    assert_eq!(client.store().count(EntityKind::Products), 2);
    assert_eq!(
        *asked.borrow(),
        "Are you sure you want to delete this product?"
    );
}

// ── Failure policies ────────────────────────────────────────────────

#[tokio::test]
async fn test_surface_policy_returns_error_and_keeps_state() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::Surface).await;
    seed(&server, &client, EntityKind::Projects).await;

    Mock::given(method("POST"))
        .and(path("/projects/"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "name required" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/projects/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client
        .save(&draft(EntityKind::Projects, ""), None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));

    let err = client
        .remove(EntityKind::Projects, EntityId::new(1), &|_: &str| true)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    assert_eq!(client.store().count(EntityKind::Projects), 2);
}

#[tokio::test]
async fn test_401_on_write_logs_out_without_fallback() {
    let (server, client, tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed(&server, &client, EntityKind::Events).await;

    Mock::given(method("POST"))
        .and(path("/events/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .save(&draft(EntityKind::Events, "Hackathon"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::SessionExpired));
    assert!(tokens.get().unwrap().is_none());
    assert!(!client.is_authenticated());
    assert_eq!(client.store().count(EntityKind::Events), 2);
}

#[tokio::test]
async fn test_401_on_delete_keeps_entry() {
    let (server, client, tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed(&server, &client, EntityKind::Products).await;

    Mock::given(method("DELETE"))
        .and(path("/products/2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .remove(EntityKind::Products, EntityId::new(2), &|_: &str| true)
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert!(tokens.get().unwrap().is_none());
    assert_eq!(client.store().count(EntityKind::Products), 2);
}

#[tokio::test]
async fn test_401_on_update_keeps_entry_untouched() {
    for kind in KINDS {
        let (server, client, tokens) = setup(WriteFailurePolicy::LocalFallback).await;
        seed(&server, &client, kind).await;

        Mock::given(method("PUT"))
            .and(path(format!("/{kind}/1")))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = client
            .save(&draft(kind, "renamed"), Some(EntityId::new(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::SessionExpired), "{kind}: {err:?}");
        assert!(tokens.get().unwrap().is_none());
        assert!(!client.is_authenticated());

        let kept = client.store().get(kind, EntityId::new(1)).unwrap();
        assert_eq!(kept.title(), "first");
        assert_eq!(kept.sync(), SyncState::Confirmed);
        assert_eq!(client.store().count(kind), 2);
        assert!(
            client
                .store()
                .entities(kind)
                .iter()
                .all(|e| !e.sync().is_local_only())
        );
    }
}

// ── Sections ────────────────────────────────────────────────────────

async fn seed_project_with_sections(server: &MockServer, client: &AdminClient) {
    let _guard = Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "name": "Solar Kiosk",
            "created_at": "2025-01-01T00:00:00",
            "sections": [
                { "id": 11, "project_id": 3, "title": "Prototype", "created_at": "2025-02-01T00:00:00" },
                { "id": 12, "project_id": 3, "title": "Pilot" }
            ]
        }])))
        .mount_as_scoped(server)
        .await;
    client.fetch_collection(EntityKind::Projects).await;
}

fn section_titles(client: &AdminClient) -> Vec<String> {
    client
        .store()
        .project(EntityId::new(3))
        .unwrap()
        .sections
        .iter()
        .map(|s| s.title.clone())
        .collect()
}

#[tokio::test]
async fn test_section_create_update_delete() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed_project_with_sections(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/projects/3/sections"))
        .and(body_partial_json(json!({ "project_id": 3, "main_image_url": "https://img/r.png" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 13, "project_id": 3, "title": "Results", "main_image_url": "https://img/r.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/projects/sections/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11, "project_id": 3, "title": "Prototype v2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/projects/sections/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Project section deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project_id = EntityId::new(3);
    let created = client
        .save_section(
            project_id,
            &SectionDraft {
                title: "Results".into(),
                image_url: "https://img/r.png".into(),
                ..SectionDraft::default()
            },
            None,
        )
        .await
        .unwrap();
    assert!(created.is_confirmed());
    assert_eq!(created.item().image_url, "https://img/r.png");

    client
        .save_section(
            project_id,
            &SectionDraft {
                title: "Prototype v2".into(),
                ..SectionDraft::default()
            },
            Some(EntityId::new(11)),
        )
        .await
        .unwrap();

    let removed = client
        .remove_section(project_id, EntityId::new(12), &|_: &str| true)
        .await
        .unwrap();
    assert_eq!(removed, RemoveOutcome::Removed);

    assert_eq!(section_titles(&client), ["Prototype v2", "Results"]);
}

#[tokio::test]
async fn test_section_failure_falls_back_locally() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed_project_with_sections(&server, &client).await;

    Mock::given(method("PUT"))
        .and(path("/projects/sections/11"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = client
        .save_section(
            EntityId::new(3),
            &SectionDraft {
                title: "Prototype (edited)".into(),
                ..SectionDraft::default()
            },
            Some(EntityId::new(11)),
        )
        .await
        .unwrap();

    let section = outcome.item();
    assert_eq!(section.sync, SyncState::LocalOnly);
    assert_eq!(
        section.created_at.unwrap().to_rfc3339(),
        "2025-02-01T00:00:00+00:00"
    );
    assert_eq!(section_titles(&client), ["Prototype (edited)", "Pilot"]);
}

#[tokio::test]
async fn test_401_on_section_writes_ends_session() {
    let (server, client, tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed_project_with_sections(&server, &client).await;

    Mock::given(method("PUT"))
        .and(path("/projects/sections/11"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .save_section(
            EntityId::new(3),
            &SectionDraft {
                title: "Prototype (edited)".into(),
                ..SectionDraft::default()
            },
            Some(EntityId::new(11)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::SessionExpired));
    assert!(tokens.get().unwrap().is_none());
    assert!(!client.is_authenticated());
    assert_eq!(section_titles(&client), ["Prototype", "Pilot"]);
    let project = client.store().project(EntityId::new(3)).unwrap();
    assert!(project.sections.iter().all(|s| !s.sync.is_local_only()));
}

#[tokio::test]
async fn test_401_on_section_delete_keeps_section() {
    let (server, client, tokens) = setup(WriteFailurePolicy::LocalFallback).await;
    seed_project_with_sections(&server, &client).await;

    Mock::given(method("DELETE"))
        .and(path("/projects/sections/12"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .remove_section(EntityId::new(3), EntityId::new(12), &|_: &str| true)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::SessionExpired));
    assert!(tokens.get().unwrap().is_none());
    assert_eq!(section_titles(&client), ["Prototype", "Pilot"]);
}

// ── Orders ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_place_order_sends_rounded_total() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({
            "full_name": "Ada Lovelace",
            "product_title": "Owl Set",
            "quantity": 3,
            "total_amount": 0.3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "full_name": "Ada Lovelace",
            "email": "ada@example.org",
            "contact": "555-0100",
            "product_title": "Owl Set",
            "quantity": 3,
            "total_amount": 0.3,
            "order_date": "2026-10-16T09:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = client
        .place_order(&OrderRequest {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.org".into(),
            contact: "555-0100".into(),
            product_title: "Owl Set".into(),
            unit_price: 0.1,
            quantity: 3,
        })
        .await
        .unwrap();

    assert_eq!(order.quantity, 3);
    assert!(order.order_date.is_some());
}

#[tokio::test]
async fn test_place_order_rejects_zero_quantity() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .place_order(&OrderRequest {
            full_name: "Ada".into(),
            email: "ada@example.org".into(),
            contact: String::new(),
            product_title: "Owl Set".into(),
            unit_price: 10.0,
            quantity: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_list_orders_requires_token() {
    let (server, client, tokens) = setup(WriteFailurePolicy::LocalFallback).await;

    Mock::given(method("GET"))
        .and(path("/orders/"))
        .and(wiremock::matchers::bearer_token("tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_orders().await.unwrap().is_empty());

    tokens.remove().unwrap();
    assert!(matches!(
        client.list_orders().await,
        Err(CoreError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_get_project_not_found() {
    let (server, client, _tokens) = setup(WriteFailurePolicy::LocalFallback).await;

    Mock::given(method("GET"))
        .and(path("/projects/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Project not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_project(EntityId::new(404)).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}
