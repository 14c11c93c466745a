use crate::config::CrawlerConfig;
use url::Url;

/// Eligibility rules deciding whether a discovered URL may ever be queued
///
/// Rules are applied in order:
/// 1. Scheme must be http or https
/// 2. The lowercased path must not end with an ignored extension
/// 3. If a scope domain is configured, the host must equal it exactly
///    (no subdomain matching, port ignored)
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    ignored_extensions: Vec<String>,
    scope_domain: Option<String>,
}

impl ScopeFilter {
    /// Creates a filter from explicit rules
    pub fn new(ignored_extensions: &[String], scope_domain: Option<&str>) -> Self {
        Self {
            ignored_extensions: ignored_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            scope_domain: scope_domain.map(str::to_lowercase),
        }
    }

    /// Creates a filter from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(&config.ignored_extensions, config.scope_domain.as_deref())
    }

    /// Returns the configured scope domain, if any
    pub fn scope_domain(&self) -> Option<&str> {
        self.scope_domain.as_deref()
    }

    /// Checks whether the URL is eligible to be queued
    pub fn allows(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let path = url.path().to_lowercase();
        if self
            .ignored_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
        {
            return false;
        }

        match &self.scope_domain {
            Some(domain) => url
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(domain)),
            None => true,
        }
    }
}
