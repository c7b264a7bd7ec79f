use crate::mapping::summary_from_search;
use crate::routes::Route;
use crate::types::{ComicSummary, SearchResult};
use crate::urls::{slug_from_link, ImageUrlRepair};

/// What a comic grid cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicCard {
    pub title: String,
    pub route: Route,
    pub image: String,
    pub chapter: String,
    pub popularity: Option<u32>,
}

impl ComicCard {
    /// Links that yield no slug point back home.
    pub fn from_summary(comic: &ComicSummary, images: &ImageUrlRepair) -> Self {
        let route = slug_from_link(&comic.link).map(Route::Manga).unwrap_or(Route::Home);
        Self {
            title: comic.title.clone(),
            route,
            image: images.repair(&comic.image),
            chapter: comic.chapter.clone(),
            popularity: comic.popularity,
        }
    }

    pub fn from_search(result: &SearchResult, images: &ImageUrlRepair) -> Self {
        let summary = summary_from_search(result);
        let route = if summary.link.is_empty() { Route::Home } else { Route::Manga(summary.link) };
        Self { title: summary.title, route, image: images.repair(&summary.image), chapter: summary.chapter, popularity: None }
    }

    /// Popularity badge text when ranking is shown.
    pub fn popularity_badge(&self) -> Option<String> {
        self.popularity.map(|p| format!("#{p}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_card_links_internally() {
        let comic = ComicSummary {
            title: "Solo".into(),
            link: "https://komiku.org/manga/solo-leveling/".into(),
            image: "https://cdn1.komiku.org/uploads/x.jpg".into(),
            chapter: "Chapter 200".into(),
            popularity: Some(3),
            ..Default::default()
        };
        let card = ComicCard::from_summary(&comic, &ImageUrlRepair::default());
        assert_eq!(card.route, Route::Manga("solo-leveling".into()));
        assert_eq!(card.image, "https://cdn1.komiku.org/uploads/x.jpg");
        assert_eq!(card.popularity_badge().as_deref(), Some("#3"));
    }

    #[test]
    fn unusable_link_and_image_fall_back() {
        let card = ComicCard::from_summary(&ComicSummary { title: "X".into(), ..Default::default() }, &ImageUrlRepair::default());
        assert_eq!(card.route, Route::Home);
        assert_eq!(card.image, "/placeholder-manga.jpg");
        assert!(card.popularity_badge().is_none());
    }

    #[test]
    fn search_card_uses_slug_and_description() {
        let hit = SearchResult { title: "Foo".into(), href: "foo-bar".into(), description: "Ch. 9".into(), ..Default::default() };
        let card = ComicCard::from_search(&hit, &ImageUrlRepair::default());
        assert_eq!(card.route.to_string(), "/manga/foo-bar");
        assert_eq!(card.chapter, "Ch. 9");
    }
}
