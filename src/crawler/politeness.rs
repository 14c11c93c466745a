//! Robots exclusion and per-host rate limiting
//!
//! The controller answers two questions for the pipeline: may this URL be
//! fetched at all, and how long must the caller wait before fetching it.

use crate::config::Config;
use crate::crawler::Fetcher;
use crate::robots::{fetch_robots, CachedRobots, RobotsCache};
use crate::state::HostState;
use crate::url::host_key;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use url::Url;

/// Upper bound applied to a robots.txt `Crawl-delay`
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Per-run politeness state: robots policies and host request timing
#[derive(Debug)]
pub struct PolitenessController {
    robots: RobotsCache,
    hosts: Mutex<HashMap<String, HostState>>,
    agent_token: String,
    min_interval: Duration,
    respect_crawl_delay: bool,
}

impl PolitenessController {
    pub fn new(agent_token: &str, min_interval: Duration, respect_crawl_delay: bool) -> Self {
        Self {
            robots: RobotsCache::new(),
            hosts: Mutex::new(HashMap::new()),
            agent_token: agent_token.to_string(),
            min_interval,
            respect_crawl_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.user_agent.agent_token(),
            seconds(config.crawler.min_host_delay_seconds),
            config.crawler.respect_crawl_delay,
        )
    }

    /// Checks the host's robots policy for `url`
    ///
    /// The policy is fetched on first use of a host and cached for the rest of
    /// the run. Concurrent first requests to one host share a single fetch.
    pub async fn authorize<F: Fetcher + ?Sized>(&self, fetcher: &F, url: &Url) -> bool {
        let Some(host) = host_key(url) else {
            tracing::debug!("No host in {}; refusing", url);
            return false;
        };

        let cell = self.robots.slot(&host);
        let cached = cell
            .get_or_init(|| async { CachedRobots::new(fetch_robots(fetcher, url).await) })
            .await;

        cached.is_allowed(url.as_str(), &self.agent_token)
    }

    /// Minimum spacing between requests to `host`
    ///
    /// The configured delay, raised to the robots Crawl-delay when that is
    /// honored and larger. Crawl-delay values are capped at [`MAX_CRAWL_DELAY`].
    pub fn interval_for(&self, host: &str) -> Duration {
        if !self.respect_crawl_delay {
            return self.min_interval;
        }

        self.robots
            .get(host)
            .and_then(|cached| cached.crawl_delay(&self.agent_token))
            .map(|delay| seconds(delay.min(MAX_CRAWL_DELAY.as_secs_f64())))
            .map_or(self.min_interval, |delay| delay.max(self.min_interval))
    }

    /// Reserves the next request slot for the URL's host
    ///
    /// Returns the wait until that slot. The reservation is recorded before
    /// returning, so the caller may sleep without holding any lock.
    pub fn reserve_slot(&self, url: &Url) -> Duration {
        let Some(host) = host_key(url) else {
            return Duration::ZERO;
        };

        let interval = self.interval_for(&host);
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts
            .entry(host)
            .or_insert_with(HostState::new)
            .reserve(interval, Instant::now())
    }

    /// Waits until the URL's host may receive another request
    ///
    /// Returns the delay that was applied.
    pub async fn await_slot(&self, url: &Url) -> Duration {
        let wait = self.reserve_slot(url);
        if !wait.is_zero() {
            tracing::debug!("Rate limiting {} for {:?}", url, wait);
            tokio::time::sleep(wait).await;
        }
        wait
    }

    /// Number of hosts that have received at least one page request
    pub fn host_count(&self) -> usize {
        self.hosts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }
}

/// Converts a validated delay in seconds; non-finite or negative input yields zero
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::StaticFetcher;
    use crate::crawler::FetchError;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn controller(delay_ms: u64) -> PolitenessController {
        PolitenessController::new("TestBot", Duration::from_millis(delay_ms), true)
    }

    #[tokio::test]
    async fn test_authorize_respects_disallow() {
        let fetcher = StaticFetcher::new().page(
            "https://example.com/robots.txt",
            "text/plain",
            "User-agent: *\nDisallow: /private/",
        );
        let politeness = controller(0);

        assert!(politeness.authorize(&fetcher, &url("https://example.com/public")).await);
        assert!(!politeness.authorize(&fetcher, &url("https://example.com/private/x")).await);
        assert_eq!(fetcher.count("https://example.com/robots.txt"), 1);
    }

    #[tokio::test]
    async fn test_missing_robots_allows_all() {
        let fetcher = StaticFetcher::new();
        let politeness = controller(0);

        assert!(politeness.authorize(&fetcher, &url("https://example.com/anything")).await);
        assert!(politeness
            .robots()
            .get("example.com")
            .is_some_and(|c| c.policy.is_allow_all()));
    }

    #[tokio::test]
    async fn test_robots_failure_is_not_retried() {
        let fetcher = StaticFetcher::new().fail(
            "https://example.com/robots.txt",
            FetchError::Timeout("slow".to_string()),
        );
        let politeness = controller(0);

        assert!(politeness.authorize(&fetcher, &url("https://example.com/a")).await);
        assert!(politeness.authorize(&fetcher, &url("https://example.com/b")).await);
        assert_eq!(fetcher.count("https://example.com/robots.txt"), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_share_fetch() {
        let fetcher = StaticFetcher::new();
        let politeness = controller(0);

        let a = url("https://example.com/a");
        let b = url("https://example.com/b");
        let (first, second) = tokio::join!(
            politeness.authorize(&fetcher, &a),
            politeness.authorize(&fetcher, &b)
        );

        assert!(first && second);
        assert_eq!(fetcher.count("https://example.com/robots.txt"), 1);
    }

    #[tokio::test]
    async fn test_robots_cached_per_port() {
        let fetcher = StaticFetcher::new();
        let politeness = controller(0);

        politeness.authorize(&fetcher, &url("http://127.0.0.1:8001/")).await;
        politeness.authorize(&fetcher, &url("http://127.0.0.1:8002/")).await;

        assert_eq!(fetcher.count("http://127.0.0.1:8001/robots.txt"), 1);
        assert_eq!(fetcher.count("http://127.0.0.1:8002/robots.txt"), 1);
        assert_eq!(politeness.robots().len(), 2);
    }

    #[tokio::test]
    async fn test_crawl_delay_raises_interval() {
        let fetcher = StaticFetcher::new().page(
            "https://slow.example/robots.txt",
            "text/plain",
            "User-agent: *\nCrawl-delay: 3",
        );
        let politeness = controller(1000);
        politeness.authorize(&fetcher, &url("https://slow.example/")).await;

        assert_eq!(politeness.interval_for("slow.example"), Duration::from_secs(3));
        assert_eq!(politeness.interval_for("other.example"), Duration::from_secs(1));

        let ignoring = PolitenessController::new("TestBot", Duration::from_secs(1), false);
        ignoring.authorize(&fetcher, &url("https://slow.example/")).await;
        assert_eq!(ignoring.interval_for("slow.example"), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_huge_crawl_delay_is_capped() {
        let fetcher = StaticFetcher::new().page(
            "https://slow.example/robots.txt",
            "text/plain",
            "User-agent: *\nCrawl-delay: 1e19",
        );
        let politeness = controller(0);
        politeness.authorize(&fetcher, &url("https://slow.example/")).await;

        assert_eq!(politeness.interval_for("slow.example"), MAX_CRAWL_DELAY);

        let first = politeness.reserve_slot(&url("https://slow.example/a"));
        let second = politeness.reserve_slot(&url("https://slow.example/b"));
        assert_eq!(first, Duration::ZERO);
        assert!(second > MAX_CRAWL_DELAY - Duration::from_secs(1));
        assert!(second <= MAX_CRAWL_DELAY);
    }

    #[test]
    fn test_reservations_space_same_host() {
        let politeness = controller(1000);
        let first = politeness.reserve_slot(&url("https://example.com/a"));
        let second = politeness.reserve_slot(&url("https://example.com/b"));
        let other_host = politeness.reserve_slot(&url("https://other.com/a"));

        assert_eq!(first, Duration::ZERO);
        assert!(second > Duration::from_millis(900));
        assert_eq!(other_host, Duration::ZERO);
        assert_eq!(politeness.host_count(), 2);
    }

    #[tokio::test]
    async fn test_await_slot_sleeps() {
        let politeness = controller(50);
        let start = Instant::now();

        assert_eq!(politeness.await_slot(&url("https://example.com/a")).await, Duration::ZERO);
        let waited = politeness.await_slot(&url("https://example.com/b")).await;

        assert!(waited > Duration::ZERO);
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_seconds_conversion() {
        assert_eq!(seconds(2.5), Duration::from_millis(2500));
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f64::NAN), Duration::ZERO);
    }
}
