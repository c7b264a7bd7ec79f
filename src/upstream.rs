//! Wire shapes of the upstream API, one envelope per endpoint family.
//!
//! Every field is defaulted and deserialized leniently: a missing or
//! mistyped field becomes an empty value, a list item that is not an object
//! is skipped, and a body that is not an object decodes as an empty envelope.
//! Nothing here returns an error to the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Decode a response body into an envelope, falling back to the empty envelope.
pub fn decode<T: DeserializeOwned + Default>(body: Value, what: &str) -> T {
    match serde_json::from_value(body) {
        Ok(v) => v,
        Err(e) => {
            debug!(envelope = what, error = %e, "unexpected payload shape, using empty envelope");
            T::default()
        }
    }
}

/// Listing envelopes carry the request parameters their mapper needs.
#[derive(Debug, Clone)]
pub enum ListingEnvelope {
    /// `terbaru` / `populer`: `{comics, pagination}`.
    Paged { body: PagedBody, page: u32 },
    /// `realtime`: `{comics, metadata: {total_fetched}}`.
    Realtime { body: RealtimeBody, count: u32 },
    /// `scroll`: `{comics, scroll_info: {returned_count, has_more}}`.
    Scroll { body: ScrollBody, offset: u32, batch_size: u32 },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawComic {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(deserialize_with = "lenient_string")]
    pub href: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(deserialize_with = "lenient_string")]
    pub thumbnail: String,
    #[serde(deserialize_with = "lenient_string")]
    pub chapter: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub rating: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub genre: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub popularity: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub selector_used: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub fetched_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPagination {
    #[serde(deserialize_with = "lenient_u32")]
    pub current_page: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub per_page: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub total: u32,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PagedBody {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub comics: Vec<RawComic>,
    #[serde(deserialize_with = "lenient_opt")]
    pub pagination: Option<RawPagination>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RealtimeMetadata {
    #[serde(deserialize_with = "lenient_u32")]
    pub total_fetched: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RealtimeBody {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub comics: Vec<RawComic>,
    #[serde(deserialize_with = "lenient_opt")]
    pub metadata: Option<RealtimeMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrollInfo {
    #[serde(deserialize_with = "lenient_u32")]
    pub returned_count: u32,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrollBody {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub comics: Vec<RawComic>,
    #[serde(deserialize_with = "lenient_opt")]
    pub scroll_info: Option<ScrollInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchItem {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub href: String,
    #[serde(deserialize_with = "lenient_string")]
    pub thumbnail: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "lenient_opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchBody {
    #[serde(deserialize_with = "lenient_list")]
    pub data: Vec<RawSearchItem>,
    #[serde(deserialize_with = "lenient_list")]
    pub results: Vec<RawSearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChapter {
    #[serde(deserialize_with = "lenient_string")]
    pub chapter: String,
    #[serde(deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetailBody {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub synopsis: String,
    #[serde(deserialize_with = "lenient_list")]
    pub chapters: Vec<RawChapter>,
}

/// Chapter pages arrive either as bare URLs or as `{ "image": url }` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    Object {
        #[serde(default, deserialize_with = "lenient_string")]
        image: String,
    },
}

impl RawImage {
    pub fn into_url(self) -> String {
        match self {
            RawImage::Url(u) => u,
            RawImage::Object { image } => image,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChapterBody {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub images: Vec<RawImage>,
}

fn scalar_to_string(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_to_string(Value::deserialize(d)?))
}

fn value_to_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n.min(u32::MAX as u64) as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(value_to_u32(&Value::deserialize(d)?).unwrap_or(0))
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(value_to_u32(&Value::deserialize(d)?))
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}

fn lenient_opt<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        v => Ok(serde_json::from_value(v).ok()),
    }
}

fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(d)? else { return Ok(Vec::new()) };
    let total = items.len();
    let kept: Vec<T> = items.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect();
    if kept.len() != total {
        debug!(skipped = total - kept.len(), "dropped malformed list items");
    }
    Ok(kept)
}
