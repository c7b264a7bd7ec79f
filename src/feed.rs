//! Catalog feeds: the home page's infinite scroll, the search context that
//! suspends it, and the "all manga" drain.
//!
//! Each context owns its own cursor. Loads are split into `begin_*` (which
//! enforces the in-flight guard and hands out a ticket) and `complete`
//! (which drops responses whose ticket predates the last reset).

use futures::join;
use tracing::{debug, warn};

use crate::api::{ApiError, ComicApi};
use crate::pagination::{LoadState, OffsetTracker};
use crate::types::{ComicPage, ComicSummary, SearchResponse, SearchResult};

pub const HOME_REALTIME_COUNT: u32 = 20;
pub const SCROLL_BATCH_SIZE: u32 = 20;
pub const HOME_POPULAR_LIMIT: usize = 10;
/// Start the next batch once the viewport bottom is this close to the document end.
pub const LOAD_MORE_THRESHOLD_PX: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_top + self.viewport_height >= self.document_height - threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub offset: u32,
    pub batch_size: u32,
}

/// Offset-driven feed that appends scroll batches.
#[derive(Debug, Clone)]
pub struct InfiniteFeed {
    comics: Vec<ComicSummary>,
    tracker: OffsetTracker,
    in_flight: bool,
    generation: u64,
}

impl InfiniteFeed {
    pub fn new(batch_size: u32) -> Self {
        Self { comics: Vec::new(), tracker: OffsetTracker::new(batch_size), in_flight: false, generation: 0 }
    }

    /// Replace the contents with an initial page; scrolling resumes after it.
    pub fn seed(&mut self, page: ComicPage) {
        self.generation += 1;
        self.in_flight = false;
        self.tracker = OffsetTracker::starting_at(page.comics.len() as u32, self.tracker.batch_size());
        self.comics = page.comics;
    }

    pub fn comics(&self) -> &[ComicSummary] { &self.comics }
    pub fn has_more(&self) -> bool { self.tracker.has_more() }
    pub fn is_loading(&self) -> bool { self.in_flight }
    pub fn offset(&self) -> u32 { self.tracker.offset() }
    pub fn state(&self) -> LoadState { self.tracker.state() }

    /// `None` while a batch is in flight or once the feed is exhausted.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.in_flight || !self.tracker.has_more() {
            return None;
        }
        self.in_flight = true;
        let (offset, batch_size) = self.tracker.begin();
        Some(LoadTicket { generation: self.generation, offset, batch_size })
    }

    /// Apply a batch. Returns `false` when the ticket is stale and nothing changed.
    pub fn complete(&mut self, ticket: LoadTicket, outcome: Result<ComicPage, ApiError>) -> bool {
        if ticket.generation != self.generation {
            debug!(offset = ticket.offset, "dropping stale scroll batch");
            return false;
        }
        self.in_flight = false;
        match outcome {
            Ok(page) => {
                let returned = page.comics.len() as u32;
                self.tracker.complete(returned, returned > 0 && page.pagination.has_more);
                self.comics.extend(page.comics);
            }
            Err(e) => {
                warn!(error = %e, offset = ticket.offset, "loading more comics failed");
                self.tracker.fail();
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.in_flight = false;
        self.comics.clear();
        self.tracker.reset();
    }

    /// Fetch and apply the next batch. `None` when no load was started.
    pub async fn load_more(&mut self, api: &ComicApi) -> Option<Result<usize, ApiError>> {
        let ticket = self.begin_load()?;
        let outcome = api.scroll_comics(ticket.offset, ticket.batch_size).await;
        let result = outcome.as_ref().map(|p| p.comics.len()).map_err(|e| *e);
        self.complete(ticket, outcome);
        Some(result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

/// Search results mode. While active, the home feed stops loading on scroll.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    query: Option<String>,
    results: Vec<SearchResult>,
    in_flight: bool,
    generation: u64,
}

impl SearchContext {
    pub fn is_active(&self) -> bool { self.query.is_some() }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn results(&self) -> &[SearchResult] { &self.results }
    pub fn is_loading(&self) -> bool { self.in_flight }

    /// Enter search mode for `query`; a newer search supersedes an older one in flight.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.generation += 1;
        self.in_flight = true;
        self.query = Some(query.to_string());
        Some(SearchTicket { generation: self.generation, query: query.to_string() })
    }

    pub fn complete(&mut self, ticket: SearchTicket, outcome: Result<SearchResponse, ApiError>) -> bool {
        if ticket.generation != self.generation || self.query.is_none() {
            debug!(query = %ticket.query, "dropping stale search results");
            return false;
        }
        self.in_flight = false;
        self.results = match outcome {
            Ok(r) => r.results,
            Err(e) => {
                warn!(error = %e, query = %ticket.query, "search failed");
                Vec::new()
            }
        };
        true
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.in_flight = false;
        self.query = None;
        self.results.clear();
    }
}

/// State behind the home page: the latest feed, the popular strip, and search.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub latest: InfiniteFeed,
    pub popular: Vec<ComicSummary>,
    pub search: SearchContext,
}

impl Default for HomeView {
    fn default() -> Self {
        Self { latest: InfiniteFeed::new(SCROLL_BATCH_SIZE), popular: Vec::new(), search: SearchContext::default() }
    }
}

impl HomeView {
    /// Fetch both sections concurrently. A failing section stays empty.
    pub async fn load(api: &ComicApi) -> Self {
        let mut view = Self::default();
        let (latest, popular) = join!(api.realtime_comics(HOME_REALTIME_COUNT, true), api.popular_comics(1));
        match latest {
            Ok(page) => view.latest.seed(page),
            Err(e) => warn!(error = %e, "home: latest section unavailable"),
        }
        match popular {
            Ok(page) => view.popular = page.comics.into_iter().take(HOME_POPULAR_LIMIT).collect(),
            Err(e) => warn!(error = %e, "home: popular section unavailable"),
        }
        view
    }

    pub fn should_load_more(&self, metrics: ScrollMetrics) -> bool {
        !self.search.is_active()
            && metrics.near_bottom(LOAD_MORE_THRESHOLD_PX)
            && !self.latest.is_loading()
            && self.latest.has_more()
    }

    pub async fn on_scroll(&mut self, api: &ComicApi, metrics: ScrollMetrics) -> Option<Result<usize, ApiError>> {
        if !self.should_load_more(metrics) {
            return None;
        }
        self.latest.load_more(api).await
    }

    pub async fn search(&mut self, api: &ComicApi, query: &str) -> Option<&[SearchResult]> {
        let ticket = self.search.begin(query)?;
        let outcome = api.search(&ticket.query).await;
        self.search.complete(ticket, outcome);
        Some(self.search.results())
    }
}

/// Drain the scroll endpoint until upstream reports no more items or
/// `max_batches` is reached. A failure after the first batch keeps what was loaded.
pub async fn collect_all(api: &ComicApi, batch_size: u32, max_batches: usize) -> Result<Vec<ComicSummary>, ApiError> {
    let mut feed = InfiniteFeed::new(batch_size);
    for _ in 0..max_batches {
        match feed.load_more(api).await {
            None => break,
            Some(Ok(_)) => {}
            Some(Err(e)) if feed.comics().is_empty() => return Err(e),
            Some(Err(_)) => break,
        }
    }
    Ok(feed.comics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Operation;
    use crate::types::PaginationState;

    fn page(n: usize, has_more: bool) -> ComicPage {
        ComicPage {
            creator: None,
            comics: (0..n).map(|i| ComicSummary { title: format!("c{i}"), ..Default::default() }).collect(),
            pagination: PaginationState { current_page: 1, per_page: 20, total: n as u32, has_more },
        }
    }

    #[test]
    fn near_bottom_threshold() {
        let m = ScrollMetrics { scroll_top: 3000.0, viewport_height: 800.0, document_height: 4800.0 };
        assert!(m.near_bottom(LOAD_MORE_THRESHOLD_PX));
        let far = ScrollMetrics { scroll_top: 2999.0, ..m };
        assert!(!far.near_bottom(LOAD_MORE_THRESHOLD_PX));
    }

    #[test]
    fn in_flight_guard_blocks_reentry() {
        let mut feed = InfiniteFeed::new(20);
        let t = feed.begin_load().unwrap();
        assert!(feed.begin_load().is_none());
        assert!(feed.complete(t, Ok(page(20, true))));
        assert_eq!(feed.offset(), 20);
        assert!(feed.begin_load().is_some());
    }

    #[test]
    fn seeded_feed_continues_after_seed() {
        let mut feed = InfiniteFeed::new(20);
        feed.seed(page(20, false));
        assert!(feed.has_more());
        let t = feed.begin_load().unwrap();
        assert_eq!((t.offset, t.batch_size), (20, 20));
        feed.complete(t, Ok(page(5, true)));
        assert_eq!(feed.comics().len(), 25);
        assert_eq!(feed.offset(), 25);
        assert!(!feed.has_more());
        assert!(feed.begin_load().is_none());
    }

    #[test]
    fn empty_batch_ends_feed() {
        let mut feed = InfiniteFeed::new(20);
        let t = feed.begin_load().unwrap();
        feed.complete(t, Ok(page(0, true)));
        assert!(!feed.has_more());
    }

    #[test]
    fn failure_keeps_content_and_allows_retry() {
        let mut feed = InfiniteFeed::new(20);
        feed.seed(page(3, false));
        let t = feed.begin_load().unwrap();
        feed.complete(t, Err(ApiError { operation: Operation::ScrollComics }));
        assert_eq!(feed.comics().len(), 3);
        assert_eq!(feed.state(), LoadState::Failed);
        assert!(feed.begin_load().is_some());
    }

    #[test]
    fn stale_batch_after_reset_is_ignored() {
        let mut feed = InfiniteFeed::new(20);
        let t = feed.begin_load().unwrap();
        feed.reset();
        assert!(!feed.complete(t, Ok(page(20, true))));
        assert!(feed.comics().is_empty());
        assert_eq!(feed.offset(), 0);
    }

    #[test]
    fn cleared_search_ignores_late_results() {
        let mut s = SearchContext::default();
        let t = s.begin("solo").unwrap();
        s.clear();
        let late = SearchResponse { results: vec![SearchResult { title: "Solo".into(), ..Default::default() }] };
        assert!(!s.complete(t, Ok(late)));
        assert!(s.results().is_empty());
        assert!(!s.is_active());
    }

    #[test]
    fn newer_search_supersedes_older() {
        let mut s = SearchContext::default();
        let old = s.begin("one").unwrap();
        let new = s.begin("one piece").unwrap();
        assert!(!s.complete(old, Ok(SearchResponse::default())));
        assert!(s.complete(new, Err(ApiError { operation: Operation::Search })));
        assert_eq!(s.query(), Some("one piece"));
        assert!(s.begin("   ").is_none());
    }

    #[test]
    fn search_mode_suppresses_scroll_loading() {
        let mut home = HomeView::default();
        let bottom = ScrollMetrics { scroll_top: 1000.0, viewport_height: 800.0, document_height: 1800.0 };
        assert!(home.should_load_more(bottom));
        home.search.begin("x");
        assert!(!home.should_load_more(bottom));
        home.search.clear();
        assert!(home.should_load_more(bottom));
    }
}
