//! In-memory site used by the crawler unit tests

use crate::config::{
    Config, CrawlerConfig, ExtractConfig, OutputConfig, UserAgentConfig,
    DEFAULT_IGNORED_EXTENSIONS,
};
use crate::crawler::{FetchError, FetchResponse, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;
use url::Url;

#[derive(Debug, Clone)]
enum Route {
    Page {
        final_url: Option<String>,
        content_type: String,
        body: String,
    },
    Fail(FetchError),
}

/// Serves canned responses keyed by exact URL; unknown URLs answer 404
#[derive(Debug, Default)]
pub(crate) struct StaticFetcher {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.page(url, "text/html; charset=utf-8", body)
    }

    pub fn page(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Page {
                final_url: None,
                content_type: content_type.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Page {
                final_url: Some(final_url.to_string()),
                content_type: "text/html".to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn fail(mut self, url: &str, error: FetchError) -> Self {
        self.routes.insert(url.to_string(), Route::Fail(error));
        self
    }

    /// Requested URLs in issue order
    pub fn requests(&self) -> Vec<String> {
        self.log().into_iter().map(|(url, _)| url).collect()
    }

    /// Issue times of requests whose URL starts with `prefix`, skipping robots.txt
    pub fn page_request_times(&self, prefix: &str) -> Vec<Instant> {
        self.log()
            .into_iter()
            .filter(|(url, _)| url.starts_with(prefix) && !url.ends_with("/robots.txt"))
            .map(|(_, at)| at)
            .collect()
    }

    pub fn count(&self, url: &str) -> usize {
        self.log().iter().filter(|(u, _)| u == url).count()
    }

    fn log(&self) -> Vec<(String, Instant)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.as_str().to_string(), Instant::now()));

        // Give concurrent callers a chance to interleave
        tokio::task::yield_now().await;

        match self.routes.get(url.as_str()) {
            Some(Route::Page {
                final_url,
                content_type,
                body,
            }) => Ok(FetchResponse {
                final_url: match final_url {
                    Some(target) => Url::parse(target).unwrap(),
                    None => url.clone(),
                },
                status: 200,
                content_type: content_type.clone(),
                body: body.clone(),
            }),
            Some(Route::Fail(error)) => Err(error.clone()),
            None => Err(FetchError::Status(404)),
        }
    }
}

/// Small, fast configuration scoped to `example.com`
pub(crate) fn test_config(seeds: &[&str]) -> Config {
    Config {
        crawler: CrawlerConfig {
            seeds: seeds.iter().map(|s| s.to_string()).collect(),
            max_pages: 100,
            max_depth: 5,
            min_host_delay_seconds: 0.0,
            concurrency: 5,
            request_timeout_seconds: 5,
            respect_crawl_delay: true,
            scope_domain: Some("example.com".to_string()),
            ignored_extensions: DEFAULT_IGNORED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0".to_string(),
            agent_token: None,
            contact_url: None,
            contact_email: None,
        },
        extract: ExtractConfig::default(),
        output: OutputConfig::default(),
    }
}
