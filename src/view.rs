//! Per-request view models handed to the renderer, and the SEO metadata built
//! alongside them.

use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::i18n::StaticPage;
use crate::locale::Locale;
use crate::models::{MediaDetail, MediaItem, MediaType, Section};
use crate::tmdb::image_url;
use crate::utils::paged_path;

#[derive(Debug, Clone)]
pub struct PageViewModel {
    pub locale: Locale,
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub robots: &'static str,
    pub image: Option<String>,
    pub structured_data: Option<Value>,
    pub body: PageBody,
}

#[derive(Debug, Clone)]
pub enum PageBody {
    Home { sections: Vec<SectionBlock> },
    Detail(Box<MediaDetail>),
    Listing(Listing),
    Static(StaticPage),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct SectionBlock {
    pub section: Section,
    pub items: Vec<MediaItem>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub heading: String,
    pub items: Vec<MediaItem>,
    pub pagination: Pagination,
    /// Set on search result pages so the form can be pre-filled.
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Pagination {
    pub fn new(base: &str, page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let page = page.max(1);
        Self {
            page,
            total_pages,
            prev: (page > 1).then(|| paged_path(base, page - 1)),
            next: (page < total_pages).then(|| paged_path(base, page + 1)),
        }
    }
}

pub fn website_schema(config: &Config, locale: Locale) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.site_name,
        "url": config.canonical("/"),
        "inLanguage": locale.code(),
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{}?q={{search_term_string}}", config.canonical("/search")),
            "query-input": "required name=search_term_string"
        }
    })
}

pub fn detail_schema(config: &Config, detail: &MediaDetail, locale: Locale) -> Value {
    let item = &detail.item;
    let kind = match item.media_type {
        MediaType::Movie => "Movie",
        MediaType::Tv => "TVSeries",
    };
    let mut obj = Map::new();
    obj.insert("@context".into(), json!("https://schema.org"));
    obj.insert("@type".into(), json!(kind));
    obj.insert("name".into(), json!(item.title));
    obj.insert("url".into(), json!(config.canonical(&item.path())));
    obj.insert("inLanguage".into(), json!(locale.code()));
    if let Some(overview) = &item.overview {
        obj.insert("description".into(), json!(overview));
    }
    if let Some(poster) = &item.poster_path {
        obj.insert("image".into(), json!(image_url(poster, "w500")));
    }
    if let Some(date) = &item.date {
        let key = match item.media_type {
            MediaType::Movie => "datePublished",
            MediaType::Tv => "startDate",
        };
        obj.insert(key.into(), json!(date));
    }
    if !detail.genres.is_empty() {
        let names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        obj.insert("genre".into(), json!(names));
    }
    if !detail.directors.is_empty() {
        let people: Vec<Value> = detail
            .directors
            .iter()
            .map(|name| json!({ "@type": "Person", "name": name }))
            .collect();
        let key = match item.media_type {
            MediaType::Movie => "director",
            MediaType::Tv => "creator",
        };
        obj.insert(key.into(), json!(people));
    }
    if !detail.cast.is_empty() {
        let actors: Vec<Value> = detail
            .cast
            .iter()
            .take(5)
            .map(|c| json!({ "@type": "Person", "name": c.name }))
            .collect();
        obj.insert("actor".into(), json!(actors));
    }
    if let (Some(score), true) = (item.vote_average, detail.vote_count > 0) {
        obj.insert(
            "aggregateRating".into(),
            json!({
                "@type": "AggregateRating",
                "ratingValue": (score * 10.0).round() / 10.0,
                "bestRating": 10,
                "ratingCount": detail.vote_count,
            }),
        );
    }
    if let Some(minutes) = detail.runtime_minutes.filter(|_| item.media_type == MediaType::Movie) {
        obj.insert("duration".into(), json!(format!("PT{minutes}M")));
    }
    if let Some(seasons) = detail.seasons {
        obj.insert("numberOfSeasons".into(), json!(seasons));
    }
    Value::Object(obj)
}

pub fn item_list_schema(config: &Config, name: &str, items: &[MediaItem]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            json!({
                "@type": "ListItem",
                "position": idx + 1,
                "url": config.canonical(&item.path()),
                "name": item.title,
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "name": name,
        "itemListElement": elements,
    })
}

pub fn web_page_schema(config: &Config, title: &str, path: &str, locale: Locale) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebPage",
        "name": title,
        "url": config.canonical(path),
        "inLanguage": locale.code(),
        "isPartOf": { "@type": "WebSite", "name": config.site_name, "url": config.canonical("/") },
    })
}
