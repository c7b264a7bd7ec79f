use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::config::ImageConfig;

const SEARCH_HREF_PREFIX: &str = "/detail-komik/";
const CHAPTER_MARKER: &str = "-chapter-";

/// Repairs cover URLs whose host is glued to the path (`https://cdn1.komiku.orgupload/..`).
#[derive(Debug, Clone)]
pub struct ImageUrlRepair {
    glued: Option<Regex>,
    placeholder: String,
}

impl ImageUrlRepair {
    pub fn new(config: &ImageConfig) -> Self {
        let mut hosts: Vec<&str> = config.hosts.iter().map(|h| h.trim()).filter(|h| !h.is_empty()).collect();
        // Longest first so `cdn1.komiku.org` wins over `komiku.org`.
        hosts.sort_by_key(|h| std::cmp::Reverse(h.len()));
        let glued = if hosts.is_empty() {
            None
        } else {
            let alternation = hosts.iter().map(|h| regex::escape(h)).collect::<Vec<_>>().join("|");
            // Host (or a subdomain of one), then a dot-free label glued on, then the rest of the path.
            Regex::new(&format!(r"(?i)^(https?://(?:[a-z0-9-]+\.)*(?:{alternation}))([a-z0-9_][^/:?#.]*)((?:[/?#].*)?)$")).ok()
        };
        Self { glued, placeholder: config.placeholder.clone() }
    }

    pub fn placeholder(&self) -> &str { &self.placeholder }

    /// Empty input yields the placeholder; a glued host gets its slash back;
    /// anything else is returned unchanged.
    pub fn repair(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return self.placeholder.clone();
        }
        if let Some(caps) = self.glued.as_ref().and_then(|re| re.captures(url)) {
            return format!("{}/{}{}", &caps[1], &caps[2], &caps[3]);
        }
        url.to_string()
    }
}

impl Default for ImageUrlRepair {
    fn default() -> Self { Self::new(&ImageConfig::default()) }
}

fn manga_slug_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/manga/([^/?#]+)/?(?:[?#].*)?$").expect("static regex"))
}

/// Path part of an absolute or relative link, without query or fragment.
fn link_path(link: &str) -> String {
    match Url::parse(link) {
        Ok(u) => u.path().to_string(),
        Err(_) => link.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}

fn last_segment(path: &str) -> Option<String> {
    path.split('/').filter(|s| !s.is_empty()).last().map(str::to_string)
}

/// Slug of an external detail-page link: `/manga/<slug>/` when present,
/// otherwise the last non-empty path segment.
pub fn slug_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    let path = link_path(link);
    if let Some(caps) = manga_slug_pattern().captures(&path) {
        return Some(caps[1].to_string());
    }
    last_segment(&path)
}

/// Bare slug of a search hit: the explicit `slug` wins, else the `href` with
/// the `/detail-komik/` prefix and trailing slash stripped.
pub fn slug_from_search_item(slug: Option<&str>, href: &str) -> String {
    if let Some(s) = slug.map(str::trim).filter(|s| !s.is_empty()) {
        return s.to_string();
    }
    let href = href.trim();
    match href.find(SEARCH_HREF_PREFIX) {
        Some(at) => href[at + SEARCH_HREF_PREFIX.len()..].trim_end_matches('/').to_string(),
        None if href.contains("://") => slug_from_link(href).unwrap_or_default(),
        None => href.trim_matches('/').to_string(),
    }
}

/// `{slug}-chapter-{number}`.
pub fn chapter_segment(slug: &str, number: &str) -> String {
    format!("{slug}{CHAPTER_MARKER}{number}")
}

/// Split a chapter segment back into `(slug, number)` at the last `-chapter-`.
pub fn parse_chapter_segment(segment: &str) -> Option<(&str, &str)> {
    let segment = segment.trim_matches('/');
    let at = segment.rfind(CHAPTER_MARKER)?;
    let (slug, rest) = segment.split_at(at);
    let number = &rest[CHAPTER_MARKER.len()..];
    if slug.is_empty() || number.is_empty() { return None; }
    Some((slug, number))
}

/// Join reader route segments into the path the chapter endpoint expects.
pub fn chapter_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref().trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Chapter link with leading and trailing slashes removed, as used in `/read/...`.
pub fn chapter_link_path(link: &str) -> String {
    let link = link.trim();
    let path = if link.contains("://") { link_path(link) } else { link.to_string() };
    path.trim_start_matches('/').trim_end_matches('/').to_string()
}

/// Number shown in a chapter badge: the digits of the label, else the 1-based position.
pub fn chapter_badge(label: &str, position: usize) -> String {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { (position + 1).to_string() } else { digits }
}
