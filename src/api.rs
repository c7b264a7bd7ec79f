use anyhow::Result;
use reqwest::Method;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::mapping::{map_chapter_images, map_detail, map_listing, map_search};
use crate::retry::{RetryPolicy, Retrying};
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::types::{ChapterImages, ComicDetail, ComicPage, SearchResponse};
use crate::upstream::{decode, ListingEnvelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LatestComics,
    PopularComics,
    Search,
    ComicDetail,
    ChapterImages,
    RealtimeComics,
    ScrollComics,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::LatestComics => "fetch latest comics",
            Operation::PopularComics => "fetch popular comics",
            Operation::Search => "search comics",
            Operation::ComicDetail => "fetch comic detail",
            Operation::ChapterImages => "fetch chapter images",
            Operation::RealtimeComics => "fetch real-time comics",
            Operation::ScrollComics => "fetch scroll comics",
        })
    }
}

/// The only error callers see: which operation failed, not why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to {operation}")]
pub struct ApiError {
    pub operation: Operation,
}

/// Client for the comic API. Construct one per application and share it by reference.
#[derive(Clone)]
pub struct ComicApi {
    transport: Arc<dyn Transport>,
}

impl ComicApi {
    /// reqwest transport wrapped in the configured retry policy.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = HttpTransport::new(config)?;
        Ok(Self::with_transport(Retrying::new(http, RetryPolicy::from(&config.retry))))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self { transport: Arc::new(transport) }
    }

    async fn get(&self, op: Operation, path: &str, params: &[(&str, String)]) -> Result<RawResponse, ApiError> {
        debug!(%op, path, "request");
        self.transport.request(Method::GET, path, params).await.map_err(|e| {
            error!(%op, path, error = %e, "request failed");
            ApiError { operation: op }
        })
    }

    pub async fn latest_comics(&self, page: u32) -> Result<ComicPage, ApiError> {
        let body = self.get(Operation::LatestComics, "/comic/terbaru", &[("page", page.to_string())]).await?;
        Ok(map_listing(ListingEnvelope::Paged { body: decode(body, "terbaru"), page }))
    }

    pub async fn popular_comics(&self, page: u32) -> Result<ComicPage, ApiError> {
        let body = self.get(Operation::PopularComics, "/comic/populer", &[("page", page.to_string())]).await?;
        Ok(map_listing(ListingEnvelope::Paged { body: decode(body, "populer"), page }))
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let body = self.get(Operation::Search, "/comic/search", &[("q", query.to_string())]).await?;
        Ok(map_search(decode(body, "search")))
    }

    pub async fn comic_detail(&self, slug: &str) -> Result<ComicDetail, ApiError> {
        let path = format!("/comic/comic/{}", slug.trim_matches('/'));
        let body = self.get(Operation::ComicDetail, &path, &[]).await?;
        Ok(map_detail(decode(body, "detail")))
    }

    /// `chapter_path` is one or more `/`-joined segments, e.g. `one-piece-chapter-1100`.
    pub async fn chapter_images(&self, chapter_path: &str) -> Result<ChapterImages, ApiError> {
        let path = format!("/comic/chapter/{}", chapter_path.trim_matches('/'));
        let body = self.get(Operation::ChapterImages, &path, &[]).await?;
        Ok(map_chapter_images(decode(body, "chapter")))
    }

    pub async fn realtime_comics(&self, count: u32, fresh: bool) -> Result<ComicPage, ApiError> {
        let params = [("count", count.to_string()), ("fresh", fresh.to_string())];
        let body = self.get(Operation::RealtimeComics, "/comic/realtime", &params).await?;
        Ok(map_listing(ListingEnvelope::Realtime { body: decode(body, "realtime"), count }))
    }

    pub async fn scroll_comics(&self, offset: u32, batch_size: u32) -> Result<ComicPage, ApiError> {
        let params = [("offset", offset.to_string()), ("batch_size", batch_size.to_string())];
        let body = self.get(Operation::ScrollComics, "/comic/scroll", &params).await?;
        Ok(map_listing(ListingEnvelope::Scroll { body: decode(body, "scroll"), offset, batch_size }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::ScriptedTransport;
    use crate::transport::TransportError;
    use serde_json::json;

    fn api(t: ScriptedTransport) -> (ComicApi, Arc<ScriptedTransport>) {
        let t = Arc::new(t);
        (ComicApi::with_transport(t.clone()), t)
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn latest_hits_terbaru_with_page() {
        let (api, t) = api(ScriptedTransport::new().reply(Ok(json!({
            "comics": [{ "title": "A", "link": "l", "image": "i", "chapter": "1" }],
            "pagination": { "current_page": 2, "per_page": 1, "total": 9, "has_more": true }
        }))));
        let page = api.latest_comics(2).await.unwrap();
        assert_eq!(t.last_call(), ("/comic/terbaru".to_string(), params(&[("page", "2")])));
        assert_eq!(page.comics[0].title, "A");
        assert!(page.pagination.has_more);
    }

    #[tokio::test]
    async fn realtime_and_scroll_send_their_parameters() {
        let (api, t) = api(ScriptedTransport::new()
            .reply(Ok(json!({ "comics": [], "metadata": { "total_fetched": 0 } })))
            .reply(Ok(json!({ "comics": [], "scroll_info": { "returned_count": 0, "has_more": false } }))));
        api.realtime_comics(48, false).await.unwrap();
        assert_eq!(t.last_call(), ("/comic/realtime".to_string(), params(&[("count", "48"), ("fresh", "false")])));
        api.scroll_comics(20, 20).await.unwrap();
        assert_eq!(t.last_call(), ("/comic/scroll".to_string(), params(&[("offset", "20"), ("batch_size", "20")])));
    }

    #[tokio::test]
    async fn detail_and_chapter_paths() {
        let (api, t) = api(ScriptedTransport::new()
            .reply(Ok(json!({ "title": "X", "synopsis": "s", "chapters": [] })))
            .reply(Ok(json!({ "images": ["https://a/1.jpg"] }))));
        api.comic_detail("solo-leveling").await.unwrap();
        assert_eq!(t.last_call().0, "/comic/comic/solo-leveling");
        let imgs = api.chapter_images("/solo-leveling-chapter-1/").await.unwrap();
        assert_eq!(t.last_call().0, "/comic/chapter/solo-leveling-chapter-1");
        assert_eq!(imgs.images.len(), 1);
    }

    #[tokio::test]
    async fn failures_collapse_to_operation_label() {
        let (api, _t) = api(ScriptedTransport::new()
            .reply(Err(TransportError::Http { status: 502, path: "/comic/search".into() }))
            .reply(Err(TransportError::timeout("timeout"))));
        let err = api.search("one piece").await.unwrap_err();
        assert_eq!(err, ApiError { operation: Operation::Search });
        assert_eq!(err.to_string(), "Failed to search comics");
        let err = api.popular_comics(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch popular comics");
    }

    #[tokio::test]
    async fn malformed_body_is_not_an_error() {
        let (api, _t) = api(ScriptedTransport::new().reply(Ok(json!(null))));
        let page = api.scroll_comics(0, 20).await.unwrap();
        assert!(page.comics.is_empty());
        assert!(!page.pagination.has_more);
    }
}
