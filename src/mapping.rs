use crate::types::{Chapter, ChapterImages, ComicDetail, ComicPage, ComicSummary, PaginationState, SearchResponse, SearchResult};
use crate::upstream::{ChapterBody, DetailBody, ListingEnvelope, RawChapter, RawComic, RawSearchItem, SearchBody};
use crate::urls::slug_from_search_item;

pub const SYNOPSIS_PLACEHOLDER: &str = "Sinopsis tidak tersedia untuk manga ini.";

fn non_empty(primary: String, fallback: String) -> String {
    if primary.trim().is_empty() { fallback } else { primary }
}

pub fn comic_from_raw(raw: RawComic) -> ComicSummary {
    ComicSummary {
        title: raw.title,
        link: non_empty(raw.link, raw.href),
        image: non_empty(raw.image, raw.thumbnail),
        chapter: raw.chapter,
        rating: raw.rating,
        genre: raw.genre,
        status: raw.status,
        source: raw.source,
        popularity: raw.popularity,
        selector_used: raw.selector_used,
        fetched_at: raw.fetched_at,
    }
}

/// Reshape any of the three listing envelopes into a page with its own pagination state.
pub fn map_listing(envelope: ListingEnvelope) -> ComicPage {
    match envelope {
        ListingEnvelope::Paged { body, page } => {
            let comics: Vec<ComicSummary> = body.comics.into_iter().map(comic_from_raw).collect();
            let pagination = match body.pagination {
                Some(p) => PaginationState { current_page: p.current_page, per_page: p.per_page, total: p.total, has_more: p.has_more },
                None => {
                    let n = comics.len() as u32;
                    PaginationState { current_page: page, per_page: n, total: n, has_more: false }
                }
            };
            ComicPage { creator: body.creator, comics, pagination }
        }
        ListingEnvelope::Realtime { body, count } => {
            let total = body.metadata.map(|m| m.total_fetched).unwrap_or(0);
            ComicPage {
                creator: body.creator,
                comics: body.comics.into_iter().map(comic_from_raw).collect(),
                pagination: PaginationState { current_page: 1, per_page: count, total, has_more: false },
            }
        }
        ListingEnvelope::Scroll { body, offset, batch_size } => {
            let comics: Vec<ComicSummary> = body.comics.into_iter().map(comic_from_raw).collect();
            let (total, has_more) = match body.scroll_info {
                Some(info) => (info.returned_count, info.has_more),
                None => (comics.len() as u32, false),
            };
            let current_page = if batch_size == 0 { 1 } else { (offset / batch_size).saturating_add(1) };
            ComicPage {
                creator: body.creator,
                comics,
                pagination: PaginationState { current_page, per_page: batch_size, total, has_more },
            }
        }
    }
}

pub fn search_result_from_raw(raw: RawSearchItem) -> SearchResult {
    SearchResult {
        href: slug_from_search_item(raw.slug.as_deref(), &raw.href),
        title: raw.title,
        thumbnail: non_empty(raw.thumbnail, raw.image),
        description: raw.description,
        r#type: raw.kind,
        genre: raw.genre,
    }
}

pub fn map_search(body: SearchBody) -> SearchResponse {
    let items = if body.data.is_empty() { body.results } else { body.data };
    SearchResponse { results: items.into_iter().map(search_result_from_raw).collect() }
}

fn chapter_from_raw(raw: RawChapter) -> Chapter {
    Chapter { chapter: raw.chapter, link: raw.link, title: raw.title, date: raw.date }
}

/// Title, synopsis and chapters pass through; an empty title or synopsis is
/// left empty for [`display_title`] / [`display_synopsis`] to fill.
pub fn map_detail(body: DetailBody) -> ComicDetail {
    ComicDetail {
        title: body.title,
        synopsis: body.synopsis,
        chapters: body.chapters.into_iter().map(chapter_from_raw).collect(),
    }
}

pub fn map_chapter_images(body: ChapterBody) -> ChapterImages {
    let images = body
        .images
        .into_iter()
        .map(|i| i.into_url().trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();
    ChapterImages { images }
}

/// `solo-leveling` -> `Solo Leveling`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_title(detail: &ComicDetail, slug: &str) -> String {
    if detail.title.trim().is_empty() { title_from_slug(slug) } else { detail.title.clone() }
}

pub fn display_synopsis(detail: &ComicDetail) -> &str {
    if detail.synopsis.trim().is_empty() { SYNOPSIS_PLACEHOLDER } else { &detail.synopsis }
}

/// Search hits shown in a comic grid: the slug stands in for the link and the
/// description for the chapter badge.
pub fn summary_from_search(result: &SearchResult) -> ComicSummary {
    ComicSummary {
        title: result.title.clone(),
        link: result.href.clone(),
        image: result.thumbnail.clone(),
        chapter: result.description.clone(),
        genre: result.genre.clone(),
        ..ComicSummary::default()
    }
}

/// Case-insensitive title filter; a blank term keeps everything.
pub fn filter_by_title<'a>(comics: &'a [ComicSummary], term: &str) -> Vec<&'a ComicSummary> {
    let term = term.trim().to_lowercase();
    comics.iter().filter(|c| term.is_empty() || c.title.to_lowercase().contains(&term)).collect()
}
