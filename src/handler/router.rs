//! Request routing dispatch module
//!
//! Entry point for every HTTP request: health probes, pages, then the
//! contacts API. Writes one access log line per request.

use crate::api;
use crate::config::AppState;
use crate::handler::pages::{self, Page};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state.access_log_enabled().then(|| {
        AccessLogEntry::start(
            peer_addr,
            req.method(),
            req.uri().path(),
            req.uri().query(),
            req.version(),
            req.headers()
                .get(hyper::header::USER_AGENT)
                .and_then(|v| v.to_str().ok()),
        )
    });

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.complete(response.status().as_u16(), body_bytes, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();
    let is_read = matches!(*req.method(), Method::GET | Method::HEAD);

    // 1. Health check endpoints
    let health = &state.config.routes.health;
    if health.enabled && is_read {
        if path == health.liveness_path {
            return http::build_health_response(StatusCode::OK, "ok");
        }
        if path == health.readiness_path {
            return readiness(state).await;
        }
    }

    // 2. Contacts API
    if api::owns_path(path) {
        return api::handle_contacts(req, state).await;
    }

    // 3. Pages
    if let Some(page) = Page::from_path(path) {
        if !is_read {
            logger::log_warning(&format!("Method not allowed: {} {path}", req.method()));
            return http::build_405_response("GET, HEAD");
        }
        let if_none_match = req
            .headers()
            .get(hyper::header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        return pages::serve(page, state, if_none_match, *req.method() == Method::HEAD);
    }

    http::build_404_response()
}

async fn readiness(state: &AppState) -> Response<Full<Bytes>> {
    match api::run_store(&state.store, |s| s.ping()).await {
        Ok(()) => http::build_health_response(StatusCode::OK, "ok"),
        Err(e) => {
            logger::log_error(&format!("Readiness check failed: {e}"));
            http::build_health_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::{
        Contact, ContactFields, ContactStore, CreateContact, MemoryContactStore, SharedStore,
        SqliteContactStore, StoreError, StoreResult,
    };
    use http_body_util::BodyExt;

    /// Store whose database is gone: every call fails.
    struct BrokenStore;

    impl ContactStore for BrokenStore {
        fn backend(&self) -> &'static str {
            "sqlite"
        }

        fn list(&self) -> StoreResult<Vec<Contact>> {
            Err(StoreError::Database(rusqlite::Error::InvalidQuery))
        }

        fn create(&self, _payload: CreateContact) -> StoreResult<Contact> {
            Err(StoreError::Database(rusqlite::Error::InvalidQuery))
        }

        fn get(&self, _id: i64) -> StoreResult<Contact> {
            Err(StoreError::Database(rusqlite::Error::InvalidQuery))
        }

        fn update(&self, _id: i64, _fields: ContactFields) -> StoreResult<Contact> {
            Err(StoreError::Database(rusqlite::Error::InvalidQuery))
        }

        fn delete(&self, _id: i64) -> StoreResult<()> {
            Err(StoreError::Database(rusqlite::Error::InvalidQuery))
        }

        fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Database(rusqlite::Error::InvalidQuery))
        }
    }

    fn state_with(store: SharedStore) -> Arc<AppState> {
        let mut config = Config::default();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, store))
    }

    fn memory_state() -> Arc<AppState> {
        state_with(Arc::new(MemoryContactStore::with_sample_contacts()))
    }

    async fn send(state: &Arc<AppState>, method: Method, path: &str, body: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap();
        handle_request(req, Arc::clone(state), None).await.unwrap()
    }

    async fn text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_probes() {
        let state = memory_state();
        let resp = send(&state, Method::GET, "/healthz", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "ok");

        let resp = send(&state, Method::GET, "/readyz", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_fails_when_store_is_down() {
        let state = state_with(Arc::new(BrokenStore));
        let resp = send(&state, Method::GET, "/readyz", "").await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(text(resp).await, "unavailable");

        // Liveness does not touch the store
        let resp = send(&state, Method::GET, "/healthz", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disabled_health_falls_through_to_404() {
        let mut config = Config::default();
        config.routes.health.enabled = false;
        let state = Arc::new(AppState::new(
            config,
            Arc::new(MemoryContactStore::new()),
        ));
        let resp = send(&state, Method::GET, "/healthz", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pages_are_html() {
        let state = memory_state();
        for path in ["/", "/contact-list"] {
            let resp = send(&state, Method::GET, path, "").await;
            assert_eq!(resp.status(), StatusCode::OK, "{path}");
            assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
            assert!(text(resp).await.contains("<html"));
        }
    }

    #[tokio::test]
    async fn test_page_rejects_post() {
        let state = memory_state();
        let resp = send(&state, Method::POST, "/", "").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_contacts_are_json() {
        let state = memory_state();
        let resp = send(&state, Method::GET, "/contacts", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let list: serde_json::Value = serde_json::from_str(&text(resp).await).unwrap();
        assert_eq!(list[0]["name"], "John Doe");
    }

    #[tokio::test]
    async fn test_post_scenario_assigns_first_id() {
        let state = state_with(Arc::new(SqliteContactStore::open_in_memory().unwrap()));
        let resp = send(
            &state,
            Method::POST,
            "/contacts",
            r#"{"name":"Ann","email":"a@x.com","phone":"111"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send(&state, Method::GET, "/contacts", "").await;
        let list: serde_json::Value = serde_json::from_str(&text(resp).await).unwrap();
        assert_eq!(list[0]["id"], 1);
        assert_eq!(list[0]["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = memory_state();
        let resp = send(&state, Method::GET, "/nope", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
