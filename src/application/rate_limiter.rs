//! Fixed-window rate limiter keyed by client identity.
//!
//! Each client key gets a window that opens on its first request and lasts
//! [`RateLimitPolicy::window`]. Up to [`RateLimitPolicy::max_requests`] requests
//! are admitted per window; the first request after the window has expired
//! opens a new one.
//!
//! Expired entries are removed by [`RateLimiter::sweep`], which a background
//! task started with [`spawn_sweeper`] runs on a fixed interval, so abandoned
//! client keys do not accumulate.
//!
//! A single mutex guards the whole table. It is held for the full
//! check-and-increment in [`RateLimiter::allow`] and for the sweep, and never
//! across an `.await`.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by tokio's time source, so paused test runtimes apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Admission limits applied per client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    count: u32,
    opened_at: Instant,
}

impl ClientWindow {
    /// Expired once strictly more than `window` has elapsed since it opened.
    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.opened_at) > window
    }
}

pub struct RateLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    clients: Mutex<HashMap<String, ClientWindow>>,
}

impl RateLimiter {
    /// Creates a limiter using the system clock.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Records a request for `client_key` and reports whether it is admitted.
    pub fn allow(&self, client_key: &str) -> bool {
        let now = self.clock.now();
        let mut clients = self.clients.lock();

        match clients.get_mut(client_key) {
            Some(window) if !window.is_expired(now, self.policy.window) => {
                if window.count >= self.policy.max_requests {
                    warn!(client = %client_key, count = window.count, "Rate limit exceeded");
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                clients.insert(
                    client_key.to_string(),
                    ClientWindow {
                        count: 1,
                        opened_at: now,
                    },
                );
                true
            }
        }
    }

    /// Removes every client whose window has expired. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut clients = self.clients.lock();

        let before = clients.len();
        let window = self.policy.window;
        clients.retain(|_, client| !client.is_expired(now, window));
        let removed = before - clients.len();

        if removed > 0 {
            debug!(removed, remaining = clients.len(), "Swept expired rate limit windows");
        }
        removed
    }

    /// Number of client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Spawns a task that calls [`RateLimiter::sweep`] every `interval`.
///
/// The task holds only a weak reference and exits once the limiter is dropped.
/// Abort the returned handle to stop it earlier.
pub fn spawn_sweeper(limiter: &Arc<RateLimiter>, interval: Duration) -> JoinHandle<()> {
    let limiter: Weak<RateLimiter> = Arc::downgrade(limiter);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(limiter) = limiter.upgrade() else {
                debug!("Rate limiter dropped, stopping sweeper");
                break;
            };
            limiter.sweep();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Instant::now()),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock()
        }
    }

    fn limiter_with_clock() -> (RateLimiter, Arc<ManualClock>) {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(RateLimitPolicy::default(), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_default_policy() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.max_requests, 5);
        assert_eq!(policy.window, Duration::from_secs(60));
    }

    #[test]
    fn test_sixth_request_in_window_is_denied() {
        let (limiter, clock) = limiter_with_clock();

        for i in 0..5 {
            assert!(limiter.allow("10.0.0.1"), "request {} should pass", i + 1);
            clock.advance(Duration::from_secs(5));
        }

        assert!(!limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _clock) = limiter_with_clock();

        for _ in 0..5 {
            assert!(limiter.allow("a"));
        }
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let (limiter, clock) = limiter_with_clock();

        for _ in 0..5 {
            assert!(limiter.allow("client"));
        }
        assert!(!limiter.allow("client"));

        // Still inside the window at exactly the expiry instant.
        clock.advance(Duration::from_secs(60));
        assert!(!limiter.allow("client"));

        clock.advance(Duration::from_millis(1));
        assert!(limiter.allow("client"));

        // The count restarted at 1, so four more fit.
        for _ in 0..4 {
            assert!(limiter.allow("client"));
        }
        assert!(!limiter.allow("client"));
    }

    #[test]
    fn test_denied_requests_do_not_extend_window() {
        let (limiter, clock) = limiter_with_clock();

        for _ in 0..5 {
            assert!(limiter.allow("client"));
        }
        clock.advance(Duration::from_secs(59));
        assert!(!limiter.allow("client"));

        clock.advance(Duration::from_secs(2));
        assert!(limiter.allow("client"));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (limiter, clock) = limiter_with_clock();

        limiter.allow("old");
        clock.advance(Duration::from_secs(30));
        limiter.allow("fresh");
        clock.advance(Duration::from_secs(31));

        assert_eq!(limiter.tracked_clients(), 2);
        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked_clients(), 1);

        clock.advance(Duration::from_secs(30));
        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_custom_policy() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(
            RateLimitPolicy {
                max_requests: 2,
                window: Duration::from_secs(10),
            },
            clock.clone(),
        );

        assert!(limiter.allow("k"));
        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));

        clock.advance(Duration::from_secs(11));
        assert!(limiter.allow("k"));
    }

    #[test]
    fn test_huge_window_never_expires() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(
            RateLimitPolicy {
                max_requests: 1,
                window: Duration::from_secs(u64::MAX),
            },
            clock.clone(),
        );

        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));

        clock.advance(Duration::from_secs(365 * 24 * 60 * 60));
        assert!(!limiter.allow("k"));
        assert_eq!(limiter.sweep(), 0);
    }

    #[test]
    fn test_concurrent_allow_admits_exactly_max() {
        for threads in [5usize, 8, 32, 64] {
            let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::default()));
            let barrier = Arc::new(Barrier::new(threads));
            let admitted = Arc::new(AtomicUsize::new(0));

            std::thread::scope(|scope| {
                for _ in 0..threads {
                    let limiter = limiter.clone();
                    let barrier = barrier.clone();
                    let admitted = admitted.clone();
                    scope.spawn(move || {
                        barrier.wait();
                        if limiter.allow("shared-key") {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });

            assert_eq!(admitted.load(Ordering::SeqCst), 5, "threads = {threads}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_idle_clients() {
        let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::default()));
        limiter.allow("idle");
        assert_eq!(limiter.tracked_clients(), 1);

        let sweeper = spawn_sweeper(&limiter, Duration::from_secs(60));

        // First sweep at t=60s: the window expires strictly after that.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(limiter.tracked_clients(), 1);

        // Second sweep at t=120s removes it.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(limiter.tracked_clients(), 0);

        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_when_limiter_dropped() {
        let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::default()));
        let sweeper = spawn_sweeper(&limiter, Duration::from_secs(1));

        drop(limiter);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(sweeper.is_finished());
    }
}
