//! Local stand-in for the users service: 12 users, page size 6 unless
//! `per_page` is sent, out-of-range pages come back empty.

use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

pub const STUB_TOTAL: u64 = 12;
const STUB_DEFAULT_PER_PAGE: u64 = 6;

/// How the stub departs from the contract, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Conforming,
    /// Echoes `per_page` clamped to the total instead of verbatim.
    ClampedEcho,
    /// User 3 carries a malformed email.
    BrokenRecord,
    /// Requests with no query string get a 503.
    BaselineUnavailable,
    /// Answers with a non-JSON body.
    PlainText,
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub query: String,
    pub api_key: Option<String>,
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    per_page: Option<u64>,
}

pub struct UsersStubHandle {
    base_url: String,
    join: JoinHandle<()>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl UsersStubHandle {
    /// API root to use as `BASE_URL`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for UsersStubHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Returns a loopback address nothing is listening on.
pub fn unused_addr() -> Result<SocketAddr, String> {
    let listener =
        TcpListener::bind("127.0.0.1:0").map_err(|err| format!("failed to bind loopback: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("failed to read address: {err}"))?;
    drop(listener);
    Ok(addr)
}

pub async fn spawn_users_stub(mode: StubMode) -> Result<UsersStubHandle, String> {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        mode,
        requests: Arc::clone(&requests),
    };
    let app = Router::new().route("/api/users", get(list_users)).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("users stub bind failed: {err}"))?;
    let base_url = format!(
        "http://{}/api",
        listener.local_addr().map_err(|err| err.to_string())?
    );
    let join = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(UsersStubHandle {
        base_url,
        join,
        requests,
    })
}

async fn list_users(
    State(state): State<StubState>,
    Query(params): Query<ListParams>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = raw.unwrap_or_default();
    record_request(&state, &query, &headers);

    match state.mode {
        StubMode::BaselineUnavailable if query.is_empty() => {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        StubMode::PlainText => return "users go here".into_response(),
        _ => {}
    }

    let page = params.page.filter(|p| *p > 0).unwrap_or(1);
    let per_page = params.per_page.filter(|p| *p > 0).unwrap_or(STUB_DEFAULT_PER_PAGE);
    let start = (page - 1).saturating_mul(per_page);
    let data: Vec<Value> = (1..=STUB_TOTAL)
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(per_page).unwrap_or(usize::MAX))
        .map(|id| user(id, state.mode))
        .collect();

    let echoed = match state.mode {
        StubMode::ClampedEcho => per_page.min(STUB_TOTAL),
        _ => per_page,
    };

    Json(json!({
        "page": page,
        "per_page": echoed,
        "total": STUB_TOTAL,
        "total_pages": STUB_TOTAL.div_ceil(per_page),
        "data": data,
        "support": { "url": "https://example.test/support", "text": "stub" }
    }))
    .into_response()
}

fn user(id: u64, mode: StubMode) -> Value {
    let email = if mode == StubMode::BrokenRecord && id == 3 {
        "emma.wong at example.test".to_string()
    } else {
        format!("user{id}@example.test")
    };
    json!({
        "id": id,
        "email": email,
        "first_name": format!("First{id}"),
        "last_name": format!("Last{id}"),
        "avatar": format!("https://example.test/img/faces/{id}-image.jpg"),
    })
}

fn record_request(state: &StubState, query: &str, headers: &HeaderMap) {
    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let Ok(mut guard) = state.requests.lock() else {
        return;
    };
    guard.push(CapturedRequest {
        query: query.to_string(),
        api_key,
    });
}
