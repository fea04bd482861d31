//! Fixed-window rate limiting per client key and route category.
//!
//! Each `(client_key, category)` pair owns one bucket. A bucket counts hits
//! until `window` has elapsed since `window_start`, then restarts from zero
//! on the next hit. Fixed windows can admit up to twice the limit across a
//! window boundary; this is accepted in exchange for one counter per bucket.
//!
//! Buckets live only in process memory and are lost on restart.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Route category a request is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RateCategory {
    General,
    Auth,
    Contact,
    Quotes,
}

impl RateCategory {
    pub const ALL: [RateCategory; 4] = [
        RateCategory::General,
        RateCategory::Auth,
        RateCategory::Contact,
        RateCategory::Quotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RateCategory::General => "general",
            RateCategory::Auth => "auth",
            RateCategory::Contact => "contact",
            RateCategory::Quotes => "quotes",
        }
    }

    /// Category for a request path.
    ///
    /// - `/api/auth`, `/api/auth/*` → [`RateCategory::Auth`]
    /// - `/api/contact`, `/api/contact/*` → [`RateCategory::Contact`]
    /// - `/api/quotes`, `/api/quotes/*` → [`RateCategory::Quotes`]
    /// - anything else → [`RateCategory::General`]
    pub fn for_path(path: &str) -> Self {
        if under_segment(path, "/api/auth") {
            RateCategory::Auth
        } else if under_segment(path, "/api/contact") {
            RateCategory::Contact
        } else if under_segment(path, "/api/quotes") {
            RateCategory::Quotes
        } else {
            RateCategory::General
        }
    }
}

/// `/api/contact` matches `/api/contact` and `/api/contact/x`, not `/api/contactos`.
fn under_segment(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl fmt::Display for RateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limit and window length of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitRule {
    pub const fn new(limit: u32, window_seconds: u64) -> Self {
        Self {
            limit,
            window: Duration::from_secs(window_seconds),
        }
    }
}

/// Per-category rules.
///
/// | Category  | Limit | Window |
/// |-----------|-------|--------|
/// | `general` | 100   | 900 s  |
/// | `auth`    | 5     | 900 s  |
/// | `contact` | 3     | 3600 s |
/// | `quotes`  | 10    | 3600 s |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRules {
    pub general: RateLimitRule,
    pub auth: RateLimitRule,
    pub contact: RateLimitRule,
    pub quotes: RateLimitRule,
}

impl Default for RateLimitRules {
    fn default() -> Self {
        Self {
            general: RateLimitRule::new(100, 900),
            auth: RateLimitRule::new(5, 900),
            contact: RateLimitRule::new(3, 3600),
            quotes: RateLimitRule::new(10, 3600),
        }
    }
}

impl RateLimitRules {
    pub fn for_category(&self, category: RateCategory) -> RateLimitRule {
        match category {
            RateCategory::General => self.general,
            RateCategory::Auth => self.auth,
            RateCategory::Contact => self.contact,
            RateCategory::Quotes => self.quotes,
        }
    }

    pub fn set(&mut self, category: RateCategory, rule: RateLimitRule) {
        match category {
            RateCategory::General => self.general = rule,
            RateCategory::Auth => self.auth = rule,
            RateCategory::Contact => self.contact = rule,
            RateCategory::Quotes => self.quotes = rule,
        }
    }
}

/// Returned when a bucket has no slot left in the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limit exceeded, retry after {retry_after_seconds}s")]
pub struct RateLimitExceeded {
    pub retry_after_seconds: u64,
}

#[derive(Debug)]
struct Bucket {
    window_start: Instant,
    count: u32,
}

/// In-memory bucket table shared by all request handlers.
///
/// Constructed once at start-up and passed around behind an `Arc`.
pub struct RateLimiter {
    rules: RateLimitRules,
    buckets: Mutex<HashMap<(String, RateCategory), Bucket>>,
}

impl RateLimiter {
    pub fn new(rules: RateLimitRules) -> Self {
        Self {
            rules,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn rules(&self) -> &RateLimitRules {
        &self.rules
    }

    /// Charges one hit to the `(client_key, category)` bucket.
    ///
    /// Check and increment happen under one lock, so concurrent callers never
    /// admit more than `limit` hits per window. A lock poisoned by a panicking
    /// holder is recovered and enforcement continues; every bucket is valid
    /// after any partial update.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitExceeded`] when the bucket is full. The rejected hit
    /// is not counted.
    pub fn consume(&self, client_key: &str, category: RateCategory) -> Result<(), RateLimitExceeded> {
        self.consume_at(client_key, category, Instant::now())
    }

    /// Same as [`RateLimiter::consume`] with an explicit clock value.
    pub fn consume_at(
        &self,
        client_key: &str,
        category: RateCategory,
        now: Instant,
    ) -> Result<(), RateLimitExceeded> {
        let rule = self.rules.for_category(category);

        let mut buckets = self.table();

        let bucket = buckets
            .entry((client_key.to_string(), category))
            .or_insert(Bucket {
                window_start: now,
                count: 0,
            });

        if now.saturating_duration_since(bucket.window_start) >= rule.window {
            bucket.window_start = now;
            bucket.count = 0;
        }

        if bucket.count >= rule.limit {
            let elapsed = now.saturating_duration_since(bucket.window_start);
            let reset_in = rule.window.saturating_sub(elapsed);
            return Err(RateLimitExceeded {
                retry_after_seconds: ceil_secs(reset_in).max(1),
            });
        }

        bucket.count += 1;
        Ok(())
    }

    /// Drops buckets whose window has fully elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut buckets = self.table();

        let before = buckets.len();
        buckets.retain(|(_, category), bucket| {
            now.saturating_duration_since(bucket.window_start) < self.rules.for_category(*category).window
        });
        before - buckets.len()
    }

    /// Number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<(String, RateCategory), Bucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Rate limiter lock poisoned, recovering bucket table");
            metrics::counter!("rate_limiter_lock_recovered_total").increment(1);
            self.buckets.clear_poison();
            poisoned.into_inner()
        })
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitRules::default())
    }

    #[test]
    fn test_category_for_path() {
        assert_eq!(RateCategory::for_path("/api/auth/login"), RateCategory::Auth);
        assert_eq!(RateCategory::for_path("/api/contact"), RateCategory::Contact);
        assert_eq!(RateCategory::for_path("/api/quotes/12"), RateCategory::Quotes);
        assert_eq!(RateCategory::for_path("/api/authors"), RateCategory::General);
        assert_eq!(RateCategory::for_path("/api/contactos"), RateCategory::General);
        assert_eq!(RateCategory::for_path("/api/quotesheet"), RateCategory::General);
        assert_eq!(RateCategory::for_path("/api/contact/callback"), RateCategory::Contact);
        assert_eq!(RateCategory::for_path("/api/quotes"), RateCategory::Quotes);
        assert_eq!(RateCategory::for_path("/admin/messages"), RateCategory::General);
        assert_eq!(RateCategory::for_path("/"), RateCategory::General);
    }

    #[test]
    fn test_limit_then_reject() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..3 {
            assert!(limiter.consume_at("1.2.3.4:ua", RateCategory::Contact, start).is_ok());
        }

        let err = limiter
            .consume_at("1.2.3.4:ua", RateCategory::Contact, start)
            .unwrap_err();
        assert_eq!(err.retry_after_seconds, 3600);
    }

    #[test]
    fn test_retry_after_counts_down() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.consume_at("k", RateCategory::Auth, start).unwrap();
        }

        let err = limiter
            .consume_at("k", RateCategory::Auth, start + Duration::from_millis(100_500))
            .unwrap_err();
        assert_eq!(err.retry_after_seconds, 800);
    }

    #[test]
    fn test_window_reset() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.consume_at("k", RateCategory::Auth, start).unwrap();
        }
        assert!(limiter.consume_at("k", RateCategory::Auth, start).is_err());

        let later = start + Duration::from_secs(900);
        assert!(limiter.consume_at("k", RateCategory::Auth, later).is_ok());
    }

    #[test]
    fn test_rejected_hits_are_not_counted() {
        let limiter = RateLimiter::new(RateLimitRules {
            auth: RateLimitRule::new(1, 10),
            ..RateLimitRules::default()
        });
        let start = Instant::now();

        limiter.consume_at("k", RateCategory::Auth, start).unwrap();
        for s in 1..10 {
            assert!(
                limiter
                    .consume_at("k", RateCategory::Auth, start + Duration::from_secs(s))
                    .is_err()
            );
        }

        assert!(
            limiter
                .consume_at("k", RateCategory::Auth, start + Duration::from_secs(10))
                .is_ok()
        );
    }

    #[test]
    fn test_buckets_are_isolated() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.consume_at("a", RateCategory::Contact, start).unwrap();
        }

        assert!(limiter.consume_at("a", RateCategory::Contact, start).is_err());
        assert!(limiter.consume_at("b", RateCategory::Contact, start).is_ok());
        assert!(limiter.consume_at("a", RateCategory::General, start).is_ok());
    }

    #[test]
    fn test_concurrent_consumption_admits_exactly_limit() {
        let limiter = Arc::new(RateLimiter::new(RateLimitRules {
            quotes: RateLimitRule::new(10, 3600),
            ..RateLimitRules::default()
        }));
        let threads = 32;
        let barrier = Arc::new(Barrier::new(threads));

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let limiter = Arc::clone(&limiter);
                    let barrier = Arc::clone(&barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        limiter.consume("shared", RateCategory::Quotes).is_ok()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 10);
    }

    #[test]
    fn test_purge_expired() {
        let limiter = limiter();
        let start = Instant::now();

        limiter.consume_at("a", RateCategory::Auth, start).unwrap();
        limiter.consume_at("b", RateCategory::Contact, start).unwrap();
        assert_eq!(limiter.bucket_count(), 2);

        let removed = limiter.purge_expired_at(start + Duration::from_secs(901));

        assert_eq!(removed, 1);
        assert_eq!(limiter.bucket_count(), 1);
    }

    #[test]
    fn test_huge_window_keeps_enforcing() {
        let limiter = RateLimiter::new(RateLimitRules {
            auth: RateLimitRule::new(1, u64::MAX),
            ..RateLimitRules::default()
        });
        let start = Instant::now();

        limiter.consume_at("k", RateCategory::Auth, start).unwrap();
        let err = limiter.consume_at("k", RateCategory::Auth, start).unwrap_err();
        assert_eq!(err.retry_after_seconds, u64::MAX);

        let successes = (0..10)
            .filter(|_| limiter.consume_at("other", RateCategory::Contact, start).is_ok())
            .count();
        assert_eq!(successes, 3);
        assert_eq!(limiter.bucket_count(), 2);
    }

    #[test]
    fn test_poisoned_lock_keeps_enforcing() {
        let limiter = Arc::new(RateLimiter::new(RateLimitRules {
            contact: RateLimitRule::new(1, 3600),
            ..RateLimitRules::default()
        }));

        limiter.consume("k", RateCategory::Contact).unwrap();
        assert!(limiter.consume("k", RateCategory::Contact).is_err());

        let poisoner = Arc::clone(&limiter);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.buckets.lock().unwrap();
            panic!("poison the bucket table");
        })
        .join();
        assert!(limiter.buckets.is_poisoned());

        assert!(limiter.consume("k", RateCategory::Contact).is_err());
        assert!(limiter.consume("fresh", RateCategory::Contact).is_ok());
        assert!(limiter.consume("fresh", RateCategory::Contact).is_err());
        assert_eq!(limiter.bucket_count(), 2);
        assert!(!limiter.buckets.is_poisoned());
        assert_eq!(limiter.purge_expired(), 0);
    }
}
