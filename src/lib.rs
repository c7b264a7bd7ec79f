pub mod api;
pub mod card;
pub mod config;
pub mod feed;
pub mod genre;
pub mod mapping;
pub mod pagination;
pub mod reader;
pub mod retry;
pub mod routes;
pub mod transport;
pub mod types;
pub mod upstream;
pub mod urls;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::api::{ApiError, ComicApi, Operation};
    pub use crate::card::ComicCard;
    pub use crate::config::ClientConfig;
    pub use crate::feed::{collect_all, HomeView, InfiniteFeed, ScrollMetrics, SearchContext};
    pub use crate::pagination::{LoadState, OffsetTracker, PageTracker};
    pub use crate::reader::{ChapterNav, LazyPages, PageSlot};
    pub use crate::routes::Route;
    pub use crate::transport::{RawResponse, Transport, TransportError};
    pub use crate::types::{Chapter, ChapterImages, ComicDetail, ComicPage, ComicSummary, PaginationState, SearchResponse, SearchResult};
    pub use crate::urls::ImageUrlRepair;
}
