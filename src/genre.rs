use tracing::info;

use crate::api::{ApiError, ComicApi};
use crate::types::ComicPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    pub name: &'static str,
    pub description: &'static str,
}

pub const GENRES: [Genre; 12] = [
    Genre { name: "Action", description: "Pertarungan seru dan aksi mendebarkan" },
    Genre { name: "Romance", description: "Kisah cinta yang menyentuh hati" },
    Genre { name: "Comedy", description: "Cerita lucu yang menghibur" },
    Genre { name: "Fantasy", description: "Dunia magis dan petualangan fantasi" },
    Genre { name: "Drama", description: "Cerita mendalam tentang kehidupan" },
    Genre { name: "Slice of Life", description: "Kehidupan sehari-hari yang realistis" },
    Genre { name: "Supernatural", description: "Kekuatan supernatural dan misteri" },
    Genre { name: "Thriller", description: "Ketegangan dan suspense" },
    Genre { name: "Horror", description: "Cerita menakutkan dan menegangkan" },
    Genre { name: "Mystery", description: "Teka-teki dan investigasi" },
    Genre { name: "Sci-Fi", description: "Teknologi masa depan dan luar angkasa" },
    Genre { name: "Historical", description: "Cerita berlatar masa lampau" },
];

pub fn filter_genres(term: &str) -> Vec<&'static Genre> {
    let term = term.trim().to_lowercase();
    GENRES.iter().filter(|g| g.name.to_lowercase().contains(&term)).collect()
}

/// Route parameter as a heading: `action` -> `Action`.
pub fn genre_display_name(param: &str) -> String {
    let mut chars = param.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upstream has no per-genre listing; popular page 1 stands in.
pub async fn comics_for_genre(api: &ComicApi, genre: &str) -> Result<ComicPage, ApiError> {
    info!(genre, "genre listing served from popular");
    api.popular_comics(1).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_case_insensitive() {
        let hits: Vec<_> = filter_genres("FI").into_iter().map(|g| g.name).collect();
        assert_eq!(hits, vec!["Sci-Fi"]);
        assert_eq!(filter_genres("").len(), 12);
        assert!(filter_genres("zzz").is_empty());
    }

    #[test]
    fn display_name_capitalizes_first_char() {
        assert_eq!(genre_display_name("action"), "Action");
        assert_eq!(genre_display_name("slice of life"), "Slice of life");
        assert_eq!(genre_display_name(""), "");
    }
}
