use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inbound ids longer than this are replaced with a fresh one.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Who a request is counted against for rate limiting: a short fingerprint
/// of the accepted bearer token, or `anonymous` when auth is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(pub String);

impl ClientId {
    fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    fn from_digest(digest: &[u8; 32]) -> Self {
        Self(digest[..8].iter().map(|b| format!("{b:02x}")).collect())
    }
}

/// API key auth settings used by middleware.
///
/// Only salted SHA-256 digests of the configured keys are kept in memory.
#[derive(Clone)]
pub struct AuthState {
    key_digests: Arc<[[u8; 32]]>,
    salt: Arc<str>,
    pub enabled: bool,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("keys", &self.key_digests.len())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl AuthState {
    /// Reads `BUDMAP_API_KEYS` (comma-separated bearer tokens).
    ///
    /// No keys disables auth in development and fails startup anywhere else.
    pub fn from_env(is_development: bool, salt: Option<&str>) -> anyhow::Result<Self> {
        let raw = std::env::var("BUDMAP_API_KEYS").unwrap_or_default();
        Self::from_keys(&raw, salt, is_development)
    }

    pub fn from_keys(raw: &str, salt: Option<&str>, is_development: bool) -> anyhow::Result<Self> {
        let salt: Arc<str> = Arc::from(salt.unwrap_or_default());
        let key_digests: Vec<[u8; 32]> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|key| digest(&salt, key))
            .collect();

        match (key_digests.is_empty(), is_development) {
            (false, _) => {
                tracing::info!(keys = key_digests.len(), "bearer auth enabled");
                Ok(Self {
                    key_digests: key_digests.into(),
                    salt,
                    enabled: true,
                })
            }
            (true, true) => {
                tracing::warn!("BUDMAP_API_KEYS not set; bearer auth disabled in development");
                Ok(Self {
                    key_digests: Arc::from(Vec::new()),
                    salt,
                    enabled: false,
                })
            }
            (true, false) => anyhow::bail!(
                "BUDMAP_API_KEYS must list at least one bearer token when BUDMAP_ENV is not development"
            ),
        }
    }

    /// Returns the caller's digest when `token` is a configured key. Every key
    /// is compared so timing does not reveal which one matched.
    fn verify(&self, token: &str) -> Option<[u8; 32]> {
        let candidate = digest(&self.salt, token);
        let matched = self
            .key_digests
            .iter()
            .fold(Choice::from(0), |acc, key| {
                acc | key.as_slice().ct_eq(candidate.as_slice())
            });
        bool::from(matched).then_some(candidate)
    }
}

fn digest(salt: &str, key: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter with one window per [`ClientId`].
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<ClientId, Window>>>,
}

/// Outcome of counting one request.
#[derive(Debug, PartialEq, Eq)]
enum Admission {
    Allowed,
    Limited { retry_after: Duration },
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

    async fn admit(&self, client: &ClientId, now: Instant) -> Admission {
        let mut clients = self.clients.lock().await;
        // Expired windows are dropped so idle clients do not accumulate.
        clients.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = clients.entry(client.clone()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if window.count >= self.max_requests {
            let elapsed = now.duration_since(window.started_at);
            return Admission::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        window.count += 1;
        Admission::Allowed
    }
}

fn current_request_id(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Use a caller-supplied id only when it is short printable ASCII.
fn accept_request_id(value: Option<&HeaderValue>) -> Option<String> {
    let id = value?.to_str().ok()?.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    valid.then(|| id.to_string())
}

/// Tags each request with a [`RequestId`] extension and echoes it in the
/// `x-request-id` response header. A valid inbound header is reused;
/// otherwise a UUIDv4 is generated.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = accept_request_id(req.headers().get(REQUEST_ID_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Rejects requests without a configured bearer token when auth is enabled,
/// and records the caller as a [`ClientId`] for the rate limiter.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        req.extensions_mut().insert(ClientId::anonymous());
        return next.run(req).await;
    }

    let verified = extract_bearer_token(req.headers().get(AUTHORIZATION))
        .and_then(|token| auth.verify(token));

    if let Some(digest) = verified {
        req.extensions_mut().insert(ClientId::from_digest(&digest));
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected request without valid bearer token");
    ApiError::new(
        current_request_id(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

/// Counts the request against its client's window; over the limit answers
/// 429 with `Retry-After` in whole seconds.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ClientId>()
        .cloned()
        .unwrap_or_else(ClientId::anonymous);

    match rate_limit.admit(&client, Instant::now()).await {
        Admission::Allowed => next.run(req).await,
        Admission::Limited { retry_after } => {
            tracing::warn!(client = %client.0, "rate limit exceeded");
            let mut res =
                ApiError::new(current_request_id(&req), "rate_limited", "rate limit exceeded")
                    .into_response();
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            res.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
            res
        }
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
