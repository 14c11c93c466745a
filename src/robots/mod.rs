//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::ParsedRobots;

use crate::crawler::Fetcher;
use url::Url;

/// Builds the robots.txt URL for the origin of `url`
///
/// ```
/// use url::Url;
/// use sitesift::robots::robots_url;
///
/// let page = Url::parse("http://127.0.0.1:8080/docs/page?x=1#top").unwrap();
/// assert_eq!(robots_url(&page).unwrap().as_str(), "http://127.0.0.1:8080/robots.txt");
/// ```
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    Some(robots)
}

/// Fetches robots.txt for the origin of `url`
///
/// Any failure (transport error, non-success status, unusable URL) yields the
/// permissive policy; the failure is logged and never retried.
pub async fn fetch_robots<F: Fetcher + ?Sized>(fetcher: &F, url: &Url) -> ParsedRobots {
    let Some(robots) = robots_url(url) else {
        return ParsedRobots::allow_all();
    };

    tracing::debug!("Fetching robots.txt: {}", robots);
    match fetcher.get(&robots).await {
        Ok(response) => ParsedRobots::from_content(&response.body),
        Err(e) => {
            tracing::warn!("robots.txt unavailable at {} ({}); allowing all", robots, e);
            ParsedRobots::allow_all()
        }
    }
}
