//! Per-URL crawl pipeline
//!
//! Each dequeued [`FrontierEntry`] runs through one pipeline:
//!
//! ```text
//! Queued -> DepthExceeded | PageLimitHit | AlreadyVisited
//!        -> RobotsDenied | RobotsAllowed
//!        -> RateLimited -> Fetching -> FetchFailed | ContentTypeRejected | Fetched
//!        -> Parsing -> CanonicalDuplicate | Indexed
//! ```
//!
//! Failures are terminal for the URL only; nothing here aborts the run.

use crate::crawler::context::CrawlContext;
use crate::crawler::extractor::{extract, ExtractedContent};
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::parser::{canonical_url, extract_links, parse_document};
use crate::crawler::Fetcher;
use crate::output::PageRecord;
use crate::state::{Admission, Outcome, PageState};
use url::Url;

/// What one pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub url: Url,
    pub depth: u32,
    /// Terminal state reached
    pub state: PageState,
    /// Present only when `state` is `Indexed`
    pub record: Option<PageRecord>,
    /// New frontier entries found on the page
    pub discovered: Vec<FrontierEntry>,
    /// Failure description for `FetchFailed`
    pub error: Option<String>,
}

impl PipelineResult {
    fn terminal(entry: &FrontierEntry, state: PageState) -> Self {
        Self {
            url: entry.url.clone(),
            depth: entry.depth,
            state,
            record: None,
            discovered: Vec::new(),
            error: None,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome().unwrap_or(Outcome::Skipped)
    }
}

/// Owned results of parsing one document
///
/// The parsed tree is dropped before the pipeline touches shared state again.
struct PageAnalysis {
    content: ExtractedContent,
    canonical: Option<Url>,
    links: Vec<Url>,
}

fn analyze(body: &str, base_url: &Url, snippet_length: usize) -> PageAnalysis {
    let document = parse_document(body);
    PageAnalysis {
        content: extract(&document, snippet_length),
        canonical: canonical_url(&document, base_url),
        links: extract_links(&document, base_url),
    }
}

fn advance(url: &Url, state: &mut PageState, next: PageState) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid transition {} -> {}",
        state,
        next
    );
    tracing::trace!("{}: {} -> {}", url, state, next);
    *state = next;
}

/// Runs one entry through the pipeline
pub async fn process<F: Fetcher>(ctx: &CrawlContext<F>, entry: FrontierEntry) -> PipelineResult {
    let url = &entry.url;
    let mut state = PageState::Queued;

    if entry.depth > ctx.limits.max_depth {
        tracing::debug!("Depth {} exceeds limit for {}", entry.depth, url);
        return PipelineResult::terminal(&entry, PageState::DepthExceeded);
    }

    // Limit check and visited mark happen under one lock, before any await
    let admission = ctx.state().visited.admit(url.as_str(), ctx.limits.max_pages);
    match admission {
        Admission::Admitted => {}
        Admission::LimitReached => {
            tracing::debug!("Page limit reached; skipping {}", url);
            return PipelineResult::terminal(&entry, PageState::PageLimitHit);
        }
        Admission::AlreadyVisited => {
            tracing::debug!("Already visited {}", url);
            return PipelineResult::terminal(&entry, PageState::AlreadyVisited);
        }
    }

    if !ctx.politeness.authorize(&ctx.fetcher, url).await {
        tracing::info!("Disallowed by robots.txt: {}", url);
        return PipelineResult::terminal(&entry, PageState::RobotsDenied);
    }
    advance(url, &mut state, PageState::RobotsAllowed);

    advance(url, &mut state, PageState::RateLimited);
    ctx.politeness.await_slot(url).await;

    advance(url, &mut state, PageState::Fetching);
    let response = match ctx.fetcher.get(url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            let mut result = PipelineResult::terminal(&entry, PageState::FetchFailed);
            result.error = Some(e.to_string());
            return result;
        }
    };

    if !response.is_html() {
        tracing::debug!(
            "Skipping {} with content type '{}'",
            url,
            response.content_type
        );
        return PipelineResult::terminal(&entry, PageState::ContentTypeRejected);
    }
    advance(url, &mut state, PageState::Fetched);

    advance(url, &mut state, PageState::Parsing);
    let analysis = analyze(
        &response.body,
        &response.final_url,
        ctx.limits.snippet_length,
    );

    let next_depth = entry.depth + 1;
    let (duplicate, discovered) = {
        let shared = ctx.state();

        let duplicate = analysis.canonical.as_ref().is_some_and(|canonical| {
            shared
                .visited
                .is_canonical_duplicate(canonical.as_str(), url.as_str())
        });

        let discovered: Vec<FrontierEntry> = if next_depth <= ctx.limits.max_depth {
            analysis
                .links
                .into_iter()
                .filter(|link| ctx.scope.allows(link))
                .filter(|link| !shared.visited.contains(link.as_str()))
                .map(|link| FrontierEntry::new(link, next_depth))
                .collect()
        } else {
            Vec::new()
        };

        (duplicate, discovered)
    };

    let record = if duplicate {
        tracing::debug!(
            "{} declares already visited canonical {}",
            url,
            analysis.canonical.as_ref().map_or("", Url::as_str)
        );
        advance(url, &mut state, PageState::CanonicalDuplicate);
        None
    } else {
        advance(url, &mut state, PageState::Indexed);
        Some(PageRecord::new(url.as_str(), analysis.content))
    };

    tracing::debug!(
        "{} {} with {} new links at depth {}",
        state,
        url,
        discovered.len(),
        next_depth
    );

    PipelineResult {
        url: entry.url.clone(),
        depth: entry.depth,
        state,
        record,
        discovered,
        error: None,
    }
}
