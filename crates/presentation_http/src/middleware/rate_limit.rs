//! Per-client rate limiting
//!
//! Each client IP owns a token bucket refilled at `requests_per_minute / 60`
//! tokens per second. Audio uploads and model calls are expensive, so the
//! limiter sits in front of every `/api` route; service info and health
//! endpoints are exempt.

use std::{
    collections::HashMap,
    future::Future,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request},
    response::{IntoResponse, Response},
};
use infrastructure::SecurityConfig;
use tokio::{sync::Mutex, task::JoinHandle};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Rate limiter settings
#[derive(Clone, Debug)]
pub struct RateLimiterConfig {
    pub enabled: bool,
    pub requests_per_minute: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 30,
        }
    }
}

impl From<&SecurityConfig> for RateLimiterConfig {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            enabled: config.rate_limit_enabled,
            requests_per_minute: config.rate_limit_rpm,
        }
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    refreshed_at: Instant,
}

impl Bucket {
    const fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            refreshed_at: now,
        }
    }

    fn take(&mut self, now: Instant, refill_per_sec: f64, capacity: f64) -> bool {
        let elapsed = now.saturating_duration_since(self.refreshed_at).as_secs_f64();
        self.tokens = elapsed.mul_add(refill_per_sec, self.tokens).min(capacity);
        self.refreshed_at = now;

        if self.tokens < 1.0 {
            return false;
        }
        self.tokens -= 1.0;
        true
    }
}

/// Buckets for every client seen recently
#[derive(Debug)]
pub struct RateLimiterState {
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiterState {
    #[must_use]
    pub fn new(requests_per_minute: u32) -> Self {
        let capacity = f64::from(requests_per_minute);
        Self {
            buckets: Mutex::new(HashMap::new()),
            capacity,
            refill_per_sec: capacity / 60.0,
        }
    }

    /// Consume one request for `ip`; `false` when the bucket is empty
    pub async fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let capacity = self.capacity;
        let refill = self.refill_per_sec;

        self.buckets
            .lock()
            .await
            .entry(ip)
            .or_insert_with(|| Bucket::full(capacity, now))
            .take(now, refill, capacity)
    }

    /// Forget clients idle for longer than `idle`
    pub async fn cleanup(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.refreshed_at) < idle);
        before - buckets.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }
}

/// Periodically drop idle buckets so the map does not grow without bound
pub fn spawn_cleanup_task(state: Arc<RateLimiterState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = state.cleanup(interval).await;
            if removed > 0 {
                debug!(removed, "Pruned idle rate limit buckets");
            }
        }
    })
}

/// Layer applying [`RateLimiter`] to a router
#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    state: Arc<RateLimiterState>,
    enabled: bool,
    exempt_paths: Arc<[&'static str]>,
}

impl RateLimiterLayer {
    #[must_use]
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            state: Arc::new(RateLimiterState::new(config.requests_per_minute)),
            enabled: config.enabled,
            exempt_paths: Arc::from(["/", "/health", "/ready"]),
        }
    }

    /// Shared bucket state, for the cleanup task
    #[must_use]
    pub fn state(&self) -> Arc<RateLimiterState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: Arc::clone(&self.state),
            enabled: self.enabled,
            exempt_paths: Arc::clone(&self.exempt_paths),
        }
    }
}

/// Middleware answering `429` once a client's bucket is empty
#[derive(Clone, Debug)]
pub struct RateLimiter<S> {
    inner: S,
    state: Arc<RateLimiterState>,
    enabled: bool,
    exempt_paths: Arc<[&'static str]>,
}

impl<S> Service<Request> for RateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let path = req.uri().path();
        let exempt = !self.enabled || self.exempt_paths.iter().any(|exempt| *exempt == path);
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if exempt {
                return inner.call(req).await;
            }

            let client = client_ip(&req);
            if state.check(client).await {
                inner.call(req).await
            } else {
                warn!(client = %client, path = req.uri().path(), "Rate limit exceeded");
                Ok(ApiError::RateLimited.into_response())
            }
        })
    }
}

/// First `X-Forwarded-For` hop, then the socket peer, then loopback
fn client_ip(req: &Request) -> IpAddr {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .and_then(|hop| hop.trim().parse::<IpAddr>().ok());

    forwarded
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
