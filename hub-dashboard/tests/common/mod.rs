//! Shared fixtures for hub-dashboard integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use hub_core::observability::REQUEST_ID_HEADER;
use hub_dashboard::config::{BackendSettings, DashboardSettings};
use hub_dashboard::error::FetchError;
use hub_dashboard::models::{Author, Document, PagedResult};
use hub_dashboard::services::{Credential, DataSource, DocumentClient};
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_TOKEN: &str = "test-token";

/// Twelve documents; four carry the `api` tag and one of those mentions
/// "auth" in its title or content.
pub fn corpus() -> Vec<Document> {
    let rows: [(&str, &str, &[&str]); 12] = [
        ("Project Requirements", "Scope and deliverables", &["project", "planning"]),
        ("API Authentication Guide", "Bearer tokens and session refresh", &["api", "security"]),
        ("Rate Limiting", "Throttling rules for public endpoints", &["api"]),
        ("Design Guidelines", "Spacing, typography and components", &["design", "ui"]),
        ("Deployment Process", "Step-by-step release instructions", &["devops", "deployment"]),
        ("Pagination Conventions", "Cursor and offset paging", &["api"]),
        ("Sprint Planning", "Cadence and ceremonies", &["planning"]),
        ("Error Codes", "Standard error payloads", &["api", "reference"]),
        ("Onboarding Checklist", "First week tasks", &["team"]),
        ("Incident Runbook", "Paging and escalation", &["devops"]),
        ("Brand Colors", "Palette and contrast", &["design"]),
        ("Retro Notes", "What went well", &["team", "planning"]),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (title, content, tags))| document(&format!("doc-{i:02}"), title, content, tags))
        .collect()
}

pub fn document(id: &str, title: &str, content: &str, tags: &[&str]) -> Document {
    let at: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-05-01T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    Document {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        summary: format!("Summary of {title}"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_by: Author {
            id: "user-1".to_string(),
            email: "casey@example.com".to_string(),
        },
        created_at: at,
        updated_at: at,
        versions: vec![],
    }
}

/// Controller settings for tests: small pages and the real debounce window.
pub fn settings() -> DashboardSettings {
    DashboardSettings {
        default_limit: 5,
        search_debounce_ms: 500,
        tag_sample_limit: 100,
        page_window: 5,
        request_timeout_ms: 15_000,
    }
}

pub fn settings_without_debounce() -> DashboardSettings {
    DashboardSettings {
        search_debounce_ms: 0,
        ..settings()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Page { page: u32, limit: u32 },
    Tags { tags: String, page: u32, limit: u32 },
}

/// In-memory data source with scripted latency and failures.
pub struct ScriptedSource {
    documents: Vec<Document>,
    calls: Mutex<Vec<Call>>,
    delays: Mutex<VecDeque<Duration>>,
    failure: Mutex<Option<FetchError>>,
    total_pages_override: Mutex<Option<u32>>,
}

impl ScriptedSource {
    pub fn new(documents: Vec<Document>) -> Arc<Self> {
        Arc::new(Self {
            documents,
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            failure: Mutex::new(None),
            total_pages_override: Mutex::new(None),
        })
    }

    /// Latency for the next calls, consumed in call order.
    pub fn push_delays(&self, delays: &[Duration]) {
        self.delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn fail_with(&self, error: Option<FetchError>) {
        *self.failure.lock().unwrap() = error;
    }

    pub fn report_total_pages(&self, total_pages: Option<u32>) {
        *self.total_pages_override.lock().unwrap() = total_pages;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    async fn respond(
        &self,
        credential: &Credential,
        call: Call,
        matching: Vec<Document>,
        page: u32,
        limit: u32,
        echo_page: bool,
    ) -> Result<PagedResult, FetchError> {
        self.calls.lock().unwrap().push(call);

        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if credential.expose() != TEST_TOKEN {
            return Err(FetchError::AuthenticationRequired);
        }
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let total = matching.len() as u64;
        let start = ((page.max(1) - 1) * limit) as usize;
        let data = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        let total_pages = self
            .total_pages_override
            .lock()
            .unwrap()
            .unwrap_or_else(|| total.div_ceil(u64::from(limit)) as u32);

        Ok(PagedResult {
            data,
            total: Some(total),
            page: echo_page.then_some(page),
            limit: echo_page.then_some(limit),
            total_pages: Some(total_pages),
        })
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn fetch_page(
        &self,
        credential: &Credential,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        self.respond(
            credential,
            Call::Page { page, limit },
            self.documents.clone(),
            page,
            limit,
            true,
        )
        .await
    }

    async fn fetch_by_tags(
        &self,
        credential: &Credential,
        tags: &str,
        page: u32,
        limit: u32,
    ) -> Result<PagedResult, FetchError> {
        let wanted: Vec<&str> = tags.split(',').collect();
        let matching = self
            .documents
            .iter()
            .filter(|doc| doc.tags.iter().any(|t| wanted.contains(&t.as_str())))
            .cloned()
            .collect();
        self.respond(
            credential,
            Call::Tags {
                tags: tags.to_string(),
                page,
                limit,
            },
            matching,
            page,
            limit,
            false,
        )
        .await
    }
}

/// Mock REST backend serving the document endpoints on an ephemeral port.
pub struct TestBackend {
    pub address: String,
    pub state: Arc<BackendState>,
}

pub struct BackendState {
    pub documents: Mutex<Vec<Document>>,
    pub last_request_id: Mutex<Option<String>>,
    pub last_update_body: Mutex<Option<serde_json::Value>>,
    /// When set, list endpoints answer 500 with this message.
    pub failure_message: Mutex<Option<String>>,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState {
            documents: Mutex::new(corpus()),
            last_request_id: Mutex::new(None),
            last_update_body: Mutex::new(None),
            failure_message: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/v1/docs", get(list_docs).post(create_doc))
            .route("/api/v1/docs/tag/:tags", get(docs_by_tag))
            .route("/api/v1/docs/:id", get(get_doc).put(update_doc))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test backend");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        TestBackend {
            address: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn client(&self) -> DocumentClient {
        DocumentClient::new(&BackendSettings {
            url: self.address.clone(),
            request_timeout_ms: 5_000,
        })
        .expect("Failed to build document client")
    }
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<u32>,
    limit: Option<u32>,
}

fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    if let Some(id) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        *state.last_request_id.lock().unwrap() = Some(id.to_string());
    }
    let expected = format!("Bearer {TEST_TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid or expired token" })),
        )
            .into_response()),
    }
}

fn failure(state: &BackendState) -> Option<Response> {
    state.failure_message.lock().unwrap().clone().map(|message| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": message })),
        )
            .into_response()
    })
}

fn page_of(docs: Vec<Document>, params: &PageParams) -> (Vec<Document>, u64, u32, u32, u32) {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);
    let total = docs.len() as u64;
    let data = docs
        .into_iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .collect();
    (data, total, page, limit, total.div_ceil(u64::from(limit)) as u32)
}

async fn list_docs(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    if let Some(response) = failure(&state) {
        return response;
    }
    let docs = state.documents.lock().unwrap().clone();
    let (data, total, page, limit, total_pages) = page_of(docs, &params);
    Json(json!({
        "data": data,
        "total": total,
        "page": page,
        "limit": limit,
        "totalPages": total_pages,
    }))
    .into_response()
}

async fn docs_by_tag(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(tags): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let wanted: Vec<&str> = tags.split(',').collect();
    let docs: Vec<Document> = state
        .documents
        .lock()
        .unwrap()
        .iter()
        .filter(|doc| doc.tags.iter().any(|t| wanted.contains(&t.as_str())))
        .cloned()
        .collect();
    let (data, total, _, _, total_pages) = page_of(docs, &params);
    Json(json!({ "data": data, "total": total, "totalPages": total_pages })).into_response()
}

async fn get_doc(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let found = state
        .documents
        .lock()
        .unwrap()
        .iter()
        .find(|doc| doc.id == id)
        .cloned();
    match found {
        Some(doc) => Json(json!({ "data": doc })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Document not found" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct CreateBody {
    title: String,
    content: String,
}

async fn create_doc(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let mut documents = state.documents.lock().unwrap();
    let doc = document(&format!("doc-{:02}", documents.len()), &body.title, &body.content, &[]);
    documents.push(doc.clone());
    (StatusCode::CREATED, Json(json!({ "data": doc }))).into_response()
}

async fn update_doc(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    *state.last_update_body.lock().unwrap() = Some(body.clone());

    let mut documents = state.documents.lock().unwrap();
    let Some(doc) = documents.iter_mut().find(|doc| doc.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Document not found" })),
        )
            .into_response();
    };
    if let Some(title) = body.get("title").and_then(|v| v.as_str()) {
        doc.title = title.to_string();
    }
    if let Some(content) = body.get("context").and_then(|v| v.as_str()) {
        doc.content = content.to_string();
    }
    Json(json!({ "data": doc.clone() })).into_response()
}
