//! HTTP API for the family roster
//!
//! This module maps HTTP routes onto [`MemberStore`] operations, validates
//! request bodies and turns failures into JSON error responses.

pub mod error;
pub mod members;
pub mod payload;
pub mod sitemap;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    Router,
    routing::{get, post},
};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::store::MemberStore;
use error::{ApiError, Result};

/// Shared handle to the member store.
///
/// Every handler takes the lock for its whole read-check-write sequence, so
/// requests touching the store are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<MemberStore>>,
    family_name: Arc<str>,
}

impl AppState {
    pub fn new(store: MemberStore) -> Self {
        Self {
            family_name: Arc::from(store.last_name()),
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, MemberStore>> {
        self.store
            .read()
            .map_err(|_| ApiError::Internal("Lock poisoned".to_string()))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, MemberStore>> {
        self.store
            .write()
            .map_err(|_| ApiError::Internal("Lock poisoned".to_string()))
    }
}

/// Build the router with all API routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(sitemap::sitemap))
        .route("/members", get(members::list_members))
        .route("/member", post(members::create_member))
        .route(
            "/member/{id}",
            get(members::get_member).delete(members::delete_member),
        )
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router wrapped so that `/members/` and `/members` are the same route
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(routes(state))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::store::Member;

    fn test_app() -> (AppState, NormalizePath<Router>) {
        let state = AppState::new(MemberStore::seeded());
        (state.clone(), app(state))
    }

    async fn send(app: &NormalizePath<Router>, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &NormalizePath<Router>, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_member(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/member")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn ids(state: &AppState) -> Vec<i64> {
        state.read().unwrap().list().iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_list_seeded_members() {
        let (_, app) = test_app();
        let (status, body) = send_json(&app, get("/members")).await;

        assert_eq!(status, StatusCode::OK);
        let members: Vec<Member> = serde_json::from_value(body).unwrap();
        assert_eq!(members, MemberStore::seeded().list());
    }

    #[tokio::test]
    async fn test_get_member() {
        let (_, app) = test_app();
        let (status, body) = send_json(&app, get("/member/1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"id": 1, "first_name": "John", "age": 33, "lucky_numbers": [7, 13, 22]})
        );
    }

    #[tokio::test]
    async fn test_get_member_not_found() {
        let (_, app) = test_app();

        let (status, body) = send_json(&app, get("/member/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Member not found"}));

        let (status, _) = send_json(&app, get("/member/abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_member() {
        let (state, app) = test_app();
        let new_member = json!({"id": 4, "first_name": "Jill", "age": 9, "lucky_numbers": []});

        let (status, body) = send_json(&app, post_member(new_member.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, new_member);
        assert_eq!(ids(&state), vec![1, 2, 3, 4]);

        let (status, body) = send_json(&app, get("/member/4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, new_member);
    }

    #[tokio::test]
    async fn test_create_member_without_content_type() {
        let (state, app) = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/member")
            .body(Body::from(
                r#"{"id": 8, "first_name": "Joe", "age": 2, "lucky_numbers": [8]}"#,
            ))
            .unwrap();

        let (status, _) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.read().unwrap().contains(8));
    }

    #[tokio::test]
    async fn test_create_member_missing_age() {
        let (state, app) = test_app();
        let body = json!({"id": 4, "first_name": "Jill", "lucky_numbers": [1]});

        let (status, body) = send_json(&app, post_member(body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing required fields"}));
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_create_member_wrong_type() {
        let (state, app) = test_app();
        let body = json!({"id": 4, "first_name": "Jill", "age": "nine", "lucky_numbers": [1]});

        let (status, body) = send_json(&app, post_member(body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "age must be an integer"}));
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_create_member_duplicate_id() {
        let (state, app) = test_app();
        let body = json!({"id": 2, "first_name": "Janet", "age": 40, "lucky_numbers": [5]});

        let (status, body) = send_json(&app, post_member(body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Member with the same ID already exists"}));
        assert_eq!(ids(&state), vec![1, 2, 3]);
        assert_eq!(state.read().unwrap().find(2).unwrap().first_name, "Jane");
    }

    #[tokio::test]
    async fn test_create_member_malformed_json() {
        let (state, app) = test_app();

        let (status, body) = send_json(&app, post_member("{\"id\": 4,")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_member() {
        let (state, app) = test_app();

        let (status, body) = send_json(&app, delete("/member/3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"done": true}));
        assert_eq!(ids(&state), vec![1, 2]);

        let (status, _) = send_json(&app, get("/member/3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_member_not_found() {
        let (state, app) = test_app();

        let (status, body) = send_json(&app, delete("/member/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Member not found"}));
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_sitemap() {
        let (_, app) = test_app();
        let request = Request::builder()
            .uri("/")
            .header(header::HOST, "roster.local")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;
        let page = String::from_utf8(body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("Jackson family API"));
        assert!(page.contains("http://roster.local/members"));
    }

    #[tokio::test]
    async fn test_trailing_slash() {
        let (_, app) = test_app();
        let (status, _) = send_json(&app, get("/members/")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_, app) = test_app();
        let (status, body) = send_json(&app, get("/family")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (_, app) = test_app();
        let request = Request::builder()
            .uri("/members")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_poisoned_store_is_internal_error() {
        let (state, app) = test_app();
        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.store.write().unwrap();
            panic!("poisoning the store lock");
        })
        .join();

        let (status, body) = send_json(&app, get("/members")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Lock poisoned"}));
    }
}
