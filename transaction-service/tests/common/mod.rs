#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use transaction_service::{
    build_router,
    services::{IntrospectedToken, IntrospectionError, TokenIntrospector, TransactionStore},
    AppState,
};

/// In-memory introspection server: known tokens map to fixed responses,
/// unknown tokens introspect as inactive.
#[derive(Default)]
pub struct StubIntrospector {
    tokens: HashMap<String, IntrospectedToken>,
    unavailable: bool,
    seen_request_ids: Mutex<Vec<Option<String>>>,
}

impl StubIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, token: &str, scope: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            IntrospectedToken {
                active: true,
                scope: Some(scope.to_string()),
                client_id: Some("test_gateway_client".to_string()),
                sub: Some("alice".to_string()),
                exp: None,
            },
        );
        self
    }

    pub fn with_inactive(mut self, token: &str) -> Self {
        self.tokens
            .insert(token.to_string(), IntrospectedToken::default());
        self
    }

    pub fn seen_request_ids(&self) -> Vec<Option<String>> {
        self.seen_request_ids.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TokenIntrospector for StubIntrospector {
    async fn introspect(
        &self,
        token: &str,
        request_id: Option<&str>,
    ) -> Result<IntrospectedToken, IntrospectionError> {
        self.seen_request_ids
            .lock()
            .unwrap()
            .push(request_id.map(str::to_string));

        if self.unavailable {
            return Err(IntrospectionError::Status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ));
        }

        Ok(self.tokens.get(token).cloned().unwrap_or_default())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: TransactionStore,
    pub introspector: Arc<StubIntrospector>,
}

impl TestApp {
    pub fn new(introspector: StubIntrospector) -> Self {
        let store = TransactionStore::new();
        let introspector = Arc::new(introspector);
        let router = build_router(AppState::new(store.clone(), introspector.clone()));

        Self {
            router,
            store,
            introspector,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn create(&self, body: serde_json::Value) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}
