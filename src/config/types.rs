use serde::Deserialize;

/// Extensions skipped by default: binary, media, stylesheet, script and feed formats
pub const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".zip", ".rar", ".mp4", ".mp3", ".txt", ".xml",
    ".atom", ".rss", ".css", ".js", ".ico",
];

/// Main configuration structure for Sitesift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URLs the crawl starts from (depth 0)
    pub seeds: Vec<String>,

    /// Maximum number of URLs entering the visited set
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the seeds
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Minimum time between two requests to the same host (seconds)
    #[serde(default = "default_min_host_delay")]
    pub min_host_delay_seconds: f64,

    /// Number of URLs processed concurrently per wave
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Raise the per-host interval to the robots.txt Crawl-delay when larger
    #[serde(default = "default_true")]
    pub respect_crawl_delay: bool,

    /// Restrict the crawl to this exact host
    #[serde(default)]
    pub scope_domain: Option<String>,

    /// Path suffixes that are never queued
    #[serde(default = "default_ignored_extensions")]
    pub ignored_extensions: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// Token matched against robots.txt `User-agent` groups; defaults to the crawler name
    #[serde(default)]
    pub agent_token: Option<String>,

    /// URL with information about the crawler
    #[serde(default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// The token used for robots.txt evaluation
    pub fn agent_token(&self) -> &str {
        self.agent_token.as_deref().unwrap_or(&self.crawler_name)
    }

    /// Full `User-Agent` header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = self
            .contact_url
            .iter()
            .map(|u| format!("+{}", u))
            .chain(self.contact_email.iter().cloned())
            .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// Content extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractConfig {
    /// Characters of page content used for a fallback snippet
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            snippet_length: default_snippet_length(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON index file
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Optional path of the markdown run summary
    #[serde(default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            summary_path: None,
        }
    }
}

fn default_max_pages() -> usize {
    1000
}

fn default_max_depth() -> u32 {
    50
}

fn default_min_host_delay() -> f64 {
    2.0
}

fn default_concurrency() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_ignored_extensions() -> Vec<String> {
    DEFAULT_IGNORED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_snippet_length() -> usize {
    200
}

fn default_index_path() -> String {
    "index.json".to_string()
}
