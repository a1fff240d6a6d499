use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Windows tracked before stale clients are swept.
const SWEEP_THRESHOLD: usize = 4_096;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// API key auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from the configured `x-api-key` values.
    ///
    /// In development, an empty key list disables auth for local iteration.
    /// Elsewhere it fails startup.
    pub fn from_keys(keys: &[String], is_development: bool) -> anyhow::Result<Self> {
        let keys: Vec<String> = keys
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if is_development {
                tracing::warn!("PLACEFINDER_API_KEYS not set; API key auth disabled in development");
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "PLACEFINDER_API_KEYS is required outside development; provide comma-separated keys"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            api_keys: Arc::new(Vec::new()),
            enabled: false,
        }
    }

    /// Compares against every key without short-circuiting.
    fn allows(&self, candidate: &str) -> bool {
        self.api_keys
            .iter()
            .fold(subtle::Choice::from(0), |acc, key| {
                acc | key.as_bytes().ct_eq(candidate.as_bytes())
            })
            .into()
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter keyed by client IP.
///
/// Requests without connection info (in-process callers) share one window.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<Option<IpAddr>, RateLimitWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records one request from `client`; `false` once its window is full.
    async fn admit(&self, client: Option<IpAddr>) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.lock().await;

        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let entry = clients.entry(client).or_insert(RateLimitWindow {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

fn reject(status: StatusCode, code: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(MiddlewareErrorBody {
            error: MiddlewareError { code, message },
        }),
    )
        .into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}

/// Middleware enforcing `x-api-key` auth when enabled.
pub async fn require_api_key(State(auth): State<AuthState>, req: Request, next: Next) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty());

    match key {
        Some(key) if auth.allows(key) => next.run(req).await,
        _ => reject(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid API key",
        ),
    }
}

/// Middleware enforcing a fixed request-per-window limit per client IP.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if !rate_limit.admit(client).await {
        tracing::debug!(client = ?client, "rate limit exceeded");
        return reject(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "Too many requests, please try again later.",
        );
    }

    next.run(req).await
}
