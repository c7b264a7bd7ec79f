use serde::{Deserialize, Serialize};

/// One catalog entry from a listing endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComicSummary {
    pub title: String,
    pub link: String,
    pub image: String,
    pub chapter: String,
    pub rating: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub popularity: Option<u32>,
    pub selector_used: Option<String>,
    pub fetched_at: Option<String>,
}

/// One hit from the search endpoint. `href` always holds a bare slug.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub href: String,
    pub thumbnail: String,
    pub description: String,
    pub r#type: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter label as shown upstream, e.g. "12" or "12.5".
    pub chapter: String,
    pub link: String,
    pub title: Option<String>,
    pub date: Option<String>,
}

/// Detail page of one title. `chapters` is newest-first, as returned upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComicDetail {
    pub title: String,
    pub synopsis: String,
    pub chapters: Vec<Chapter>,
}

/// Page image URLs of one chapter, in reading order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChapterImages {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u32,
    pub has_more: bool,
}

/// A listing response: the comics plus the pagination state of their own context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComicPage {
    pub creator: Option<String>,
    pub comics: Vec<ComicSummary>,
    pub pagination: PaginationState,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}
