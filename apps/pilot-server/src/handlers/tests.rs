use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use pilot_core::error::DomainError;
use pilot_core::generation::GenerationRequest;
use pilot_core::ports::{GeneratedPost, GenerationError, KeyValueStore, PostGenerator, StoreError};
use pilot_core::workspace::POSTS_KEY;
use pilot_core::Workspace;
use pilot_core::scheduler::WallClock;
use pilot_infra::{InMemoryStore, SilentNotifier};
use pilot_shared::dto::{GenerateResponse, PostResponse};

use super::configure_routes;
use crate::state::AppState;

/// Returns one post per slot, echoing the slot's persona.
#[derive(Default)]
struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl PostGenerator for EchoGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedPost>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(request
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| GeneratedPost {
                content: format!("{} #{i}", slot.instruction),
                topic: format!("Topic {i}"),
                persona_id: slot.persona_id.clone(),
            })
            .collect())
    }
}

struct FailingGenerator;

#[async_trait]
impl PostGenerator for FailingGenerator {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<GeneratedPost>, GenerationError> {
        Err(GenerationError::ResponseShape("not an array".to_string()))
    }
}

async fn state_with(generator: Arc<dyn PostGenerator>) -> AppState {
    let workspace = Workspace::load_with(
        Arc::new(InMemoryStore::new()),
        Arc::new(SilentNotifier),
        Arc::new(chrono::Utc::now),
        WallClock::utc(),
    )
    .await
    .unwrap();
    AppState::new(workspace, generator)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn drafts(n: usize) -> Value {
    let drafts: Vec<Value> = (0..n)
        .map(|i| json!({ "content": format!("Post {i}"), "topic": format!("T{i}"), "personaId": "p1" }))
        .collect();
    json!({ "drafts": drafts })
}

#[actix_rt::test]
async fn test_health() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["generating"], false);
}

#[actix_rt::test]
async fn test_approve_then_publish_flow() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts/batch")
        .set_json(drafts(3))
        .to_request();
    let created: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|p| p.status == "DRAFT"));
    let day = 24 * 60 * 60 * 1000;
    assert_eq!(created[1].scheduled_for - created[0].scheduled_for, day);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}/status", created[0].id))
        .set_json(json!({ "status": "posted" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/posts/history").to_request();
    let history: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, created[0].id);

    let req = test::TestRequest::get().uri("/api/posts/stats").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["drafts"], 2);
    assert_eq!(stats["posted"], 1);
    assert_eq!(stats["postsPerDay"], 1.0);
}

#[actix_rt::test]
async fn test_unknown_ids_and_bad_input() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let req = test::TestRequest::put()
        .uri("/api/posts/missing/status")
        .set_json(json!({ "status": "APPROVED" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete().uri("/api/posts/missing").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::put()
        .uri("/api/posts/missing/status")
        .set_json(json!({ "status": "ARCHIVED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
}

#[actix_rt::test]
async fn test_queue_reorder() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts/batch")
        .set_json(drafts(3))
        .to_request();
    let created: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    let reversed: Vec<String> = created.iter().rev().map(|p| p.id.clone()).collect();

    let req = test::TestRequest::put()
        .uri("/api/posts/queue/order")
        .set_json(json!({ "ids": reversed }))
        .to_request();
    let queue: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<String> = queue.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, reversed);

    let req = test::TestRequest::put()
        .uri("/api/posts/queue/order")
        .set_json(json!({ "ids": [reversed[0]] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_generate_returns_drafts_without_storing() {
    let generator = Arc::new(EchoGenerator::default());
    let state = state_with(generator.clone()).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({
            "campaigns": [
                { "instruction": "Launch", "personaId": "p1" },
                { "instruction": "Tips", "personaId": "p1" }
            ],
            "simulateMedia": true
        }))
        .to_request();
    let resp: GenerateResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.drafts.len(), 5);
    assert!(resp.drafts[0].content.starts_with("Launch"));
    assert!(resp.drafts[1].content.starts_with("Tips"));
    assert_eq!(resp.drafts[0].media_type.as_deref(), Some("image"));
    assert_eq!(resp.drafts[1].media_type.as_deref(), Some("video"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(state.workspace.lock().await.posts().is_empty());
}

#[actix_rt::test]
async fn test_overlapping_generation_is_rejected() {
    let generator = Arc::new(EchoGenerator::default());
    let state = state_with(generator.clone()).await;
    let app = app!(state);

    let guard = state.begin_generation().unwrap();
    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

    drop(guard);
    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_generation_failure_is_bad_gateway() {
    let state = state_with(Arc::new(FailingGenerator)).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_GATEWAY);
    assert!(!state.is_generating());
}

#[actix_rt::test]
async fn test_persona_and_pillar_management() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let req = test::TestRequest::delete().uri("/api/personas/p1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post().uri("/api/personas").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/personas/{id}"))
        .set_json(json!({ "displayName": "Sam Rivera", "tone": "Witty" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete().uri("/api/personas/p1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri("/api/settings/pillars")
        .set_json(json!({ "name": "Education", "description": "again" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/api/settings").to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    let personas = settings["personas"].as_array().unwrap();
    assert_eq!(personas.len(), 1);
    assert_eq!(personas[0]["displayName"], "Sam Rivera");
}

#[actix_rt::test]
async fn test_settings_never_echo_the_byok_key() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/settings").to_request();
    let mut settings: Value = test::call_and_read_body_json(&app, req).await;
    settings["aiEngine"] = json!("byok");
    settings["openRouterKey"] = json!("sk-or-v1-secret-9876");

    let req = test::TestRequest::put()
        .uri("/api/settings")
        .set_json(&settings)
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["openRouterKey"], "****9876");

    // A client re-submitting what it was shown keeps the real key.
    let req = test::TestRequest::put()
        .uri("/api/settings")
        .set_json(&saved)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/settings").to_request();
    let shown: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shown["openRouterKey"], "****9876");
    assert_eq!(
        state.workspace.lock().await.settings().byok_key(),
        Some("sk-or-v1-secret-9876")
    );
}

#[actix_rt::test]
async fn test_settings_without_personas_are_rejected() {
    let state = state_with(Arc::new(EchoGenerator::default())).await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/settings").to_request();
    let mut settings: Value = test::call_and_read_body_json(&app, req).await;
    settings["personas"] = json!([]);

    let req = test::TestRequest::put()
        .uri("/api/settings")
        .set_json(&settings)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
    assert_eq!(state.workspace.lock().await.settings().personas.len(), 1);
}

#[actix_rt::test]
async fn test_corrupt_saved_posts_fail_startup() {
    let store = Arc::new(InMemoryStore::new());
    store.set(POSTS_KEY, r#"{"not":"a list"}"#).await.unwrap();

    let result = Workspace::load_with(
        store,
        Arc::new(SilentNotifier),
        Arc::new(chrono::Utc::now),
        WallClock::utc(),
    )
    .await;
    assert!(matches!(
        result,
        Err(DomainError::Store(StoreError::Serialization(_)))
    ));
}
