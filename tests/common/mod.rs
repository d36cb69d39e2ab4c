#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use shrty::application::rate_limiter::{RateLimitPolicy, RateLimiter};
use shrty::application::services::LinkService;
use shrty::domain::entities::UrlRecord;
use shrty::domain::repositories::UrlRepository;
use shrty::domain::verification::{BotVerifier, VerificationError};
use shrty::error::AppError;
use shrty::routes::router;
use shrty::state::AppState;

pub const BASE_DOMAIN: &str = "https://s.test/";
pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Insert-only store mirroring the `urls` table: ids start at 1.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    urls: Mutex<Vec<String>>,
    fail: bool,
}

impl InMemoryUrlRepository {
    pub fn failing() -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, original_url: &str) -> Result<UrlRecord, AppError> {
        if self.fail {
            return Err(AppError::internal(
                "Internal server error",
                json!({ "db_error": "connection reset" }),
            ));
        }
        let mut urls = self.urls.lock();
        urls.push(original_url.to_string());
        Ok(UrlRecord::new(urls.len() as i64, original_url.to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        if self.fail {
            return Err(AppError::internal(
                "Internal server error",
                json!({ "db_error": "connection reset" }),
            ));
        }
        let urls = self.urls.lock();
        let record = usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| urls.get(i))
            .map(|url| UrlRecord::new(id, url.clone()));
        Ok(record)
    }
}

#[derive(Clone, Copy)]
pub enum Verdict {
    Pass,
    Reject,
    Unavailable,
}

/// Verifier with a fixed verdict that counts how often it is consulted.
pub struct StubVerifier {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl StubVerifier {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BotVerifier for StubVerifier {
    async fn verify(&self, _token: &str) -> Result<bool, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Verdict::Pass => Ok(true),
            Verdict::Reject => Ok(false),
            Verdict::Unavailable => Err(VerificationError::Transport(
                "connection refused".to_string(),
            )),
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryUrlRepository>,
    pub verifier: Arc<StubVerifier>,
}

pub fn create_test_state(
    repository: Arc<InMemoryUrlRepository>,
    verifier: Arc<StubVerifier>,
) -> AppState {
    let link_service = LinkService::new(
        repository,
        verifier,
        Arc::new(RateLimiter::new(RateLimitPolicy::default())),
        BASE_DOMAIN.to_string(),
    );
    AppState::new(Arc::new(link_service))
}

pub fn spawn_app_with(repository: InMemoryUrlRepository, verdict: Verdict) -> TestApp {
    let repository = Arc::new(repository);
    let verifier = Arc::new(StubVerifier::new(verdict));
    let state = create_test_state(repository.clone(), verifier.clone());

    let origins: Vec<String> = ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
    let app = router(state, &origins).unwrap();

    TestApp {
        server: TestServer::new(app).unwrap(),
        repository,
        verifier,
    }
}

pub fn spawn_app(verdict: Verdict) -> TestApp {
    spawn_app_with(InMemoryUrlRepository::default(), verdict)
}

/// Extracts the short code from a `shortened_url`.
pub fn code_of(shortened_url: &str) -> &str {
    shortened_url
        .strip_prefix(BASE_DOMAIN)
        .expect("short url starts with the base domain")
}
