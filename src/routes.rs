use std::fmt;

use url::form_urlencoded;

use crate::urls::{chapter_link_path, chapter_path};

/// Internal page routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Latest,
    Popular,
    Genres,
    Genre(String),
    AllManga,
    Search(String),
    Manga(String),
    /// Chapter segments, e.g. `["one-piece-chapter-1100"]`.
    Read(Vec<String>),
}

impl Route {
    /// Reader route for a chapter link, slashes at either end dropped.
    pub fn read_link(link: &str) -> Self {
        Route::Read(chapter_link_path(link).split('/').filter(|s| !s.is_empty()).map(str::to_string).collect())
    }

    /// Path the chapter-images endpoint expects for a `Read` route.
    pub fn chapter_path(&self) -> Option<String> {
        match self {
            Route::Read(segments) => Some(chapter_path(segments)),
            _ => None,
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Home,
            ["terbaru"] => Route::Latest,
            ["populer"] => Route::Popular,
            ["genre"] => Route::Genres,
            ["genre", g] => Route::Genre(g.to_string()),
            ["all-manga"] => Route::AllManga,
            ["search"] => {
                let q = form_urlencoded::parse(query.as_bytes()).find(|(k, _)| k == "q").map(|(_, v)| v.into_owned());
                Route::Search(q.unwrap_or_default())
            }
            ["manga", slug] => Route::Manga(slug.to_string()),
            ["read", rest @ ..] if !rest.is_empty() => Route::Read(rest.iter().map(|s| s.to_string()).collect()),
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Latest => f.write_str("/terbaru"),
            Route::Popular => f.write_str("/populer"),
            Route::Genres => f.write_str("/genre"),
            Route::Genre(g) => write!(f, "/genre/{}", g.to_lowercase()),
            Route::AllManga => f.write_str("/all-manga"),
            Route::Search(q) => {
                let q: String = form_urlencoded::byte_serialize(q.as_bytes()).collect();
                write!(f, "/search?q={q}")
            }
            Route::Manga(slug) => write!(f, "/manga/{slug}"),
            Route::Read(segments) => write!(f, "/read/{}", chapter_path(segments)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paths() {
        assert_eq!(Route::Home.to_string(), "/");
        assert_eq!(Route::Genre("Slice of Life".into()).to_string(), "/genre/slice of life");
        assert_eq!(Route::Search("one piece".into()).to_string(), "/search?q=one+piece");
        assert_eq!(Route::read_link("/solo-leveling-chapter-1/").to_string(), "/read/solo-leveling-chapter-1");
    }

    #[test]
    fn parses_back() {
        assert_eq!(Route::parse("/terbaru"), Some(Route::Latest));
        assert_eq!(Route::parse("/manga/solo-leveling/"), Some(Route::Manga("solo-leveling".into())));
        assert_eq!(Route::parse("/search?q=one+piece"), Some(Route::Search("one piece".into())));
        assert_eq!(
            Route::parse("/read/a/b-chapter-2"),
            Some(Route::Read(vec!["a".into(), "b-chapter-2".into()]))
        );
        assert_eq!(Route::parse("/read"), None);
        assert_eq!(Route::parse("/nope/x/y"), None);
    }

    #[test]
    fn read_route_chapter_path() {
        let r = Route::parse("/read/a/b-chapter-2").unwrap();
        assert_eq!(r.chapter_path().as_deref(), Some("a/b-chapter-2"));
        assert_eq!(Route::Home.chapter_path(), None);
    }
}
