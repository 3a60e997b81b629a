use std::collections::HashSet;
use std::io::Cursor;

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::app::AppState;
use crate::config::Config;
use crate::error::AppResult;
use crate::i18n::StaticPage;
use crate::locale::Locale;
use crate::models::{genre_path, MediaItem, MediaType, Paged};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const DETAIL_SAMPLE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

impl SitemapEntry {
    fn new(loc: String, changefreq: &'static str, priority: &'static str) -> Self {
        Self {
            loc,
            changefreq,
            priority,
        }
    }
}

pub async fn robots(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config),
    )
        .into_response()
}

pub fn robots_txt(config: &Config) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /search\n\nSitemap: {}\n",
        config.canonical("/sitemap.xml")
    )
}

pub async fn sitemap(State(state): State<AppState>) -> AppResult<Response> {
    let api = state.media.as_ref();
    let locale = Locale::default();
    let (trending_movie, trending_tv, popular_movie, movie_genres, tv_genres) = tokio::join!(
        api.trending(MediaType::Movie, 1, locale),
        api.trending(MediaType::Tv, 1, locale),
        api.popular(MediaType::Movie, 1, locale),
        state.genres.genres_for(api, MediaType::Movie, locale),
        state.genres.genres_for(api, MediaType::Tv, locale),
    );

    let config = &state.config;
    let mut entries = vec![SitemapEntry::new(config.canonical("/"), "daily", "1.0")];
    entries.extend(
        StaticPage::ALL
            .iter()
            .map(|p| SitemapEntry::new(config.canonical(p.path()), "monthly", "0.3")),
    );
    for (media, genres) in [(MediaType::Movie, movie_genres), (MediaType::Tv, tv_genres)] {
        entries.extend(genres.iter().map(|g| {
            SitemapEntry::new(config.canonical(&genre_path(media, g)), "weekly", "0.6")
        }));
    }
    for fetched in [trending_movie, trending_tv, popular_movie] {
        entries.extend(detail_entries(config, fetched));
    }

    let entries = dedupe(entries);
    debug!(count = entries.len(), "Rendering sitemap");
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let xml = write_sitemap(&entries, &today)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response())
}

fn detail_entries(config: &Config, fetched: Option<Paged<MediaItem>>) -> Vec<SitemapEntry> {
    fetched
        .map(|p| p.results)
        .unwrap_or_default()
        .iter()
        .take(DETAIL_SAMPLE)
        .map(|item| SitemapEntry::new(config.canonical(&item.path()), "weekly", "0.8"))
        .collect()
}

/// Drops repeated locations, keeping the first occurrence.
fn dedupe(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.loc.clone()))
        .collect()
}

pub fn write_sitemap(entries: &[SitemapEntry], lastmod: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;
    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text(&mut writer, "loc", &entry.loc)?;
        write_text(&mut writer, "lastmod", lastmod)?;
        write_text(&mut writer, "changefreq", entry.changefreq)?;
        write_text(&mut writer, "priority", entry.priority)?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

fn write_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(3000, "https://cinedex.example/", "Cinedex", "key", "http://tmdb")
    }

    #[test]
    fn robots_points_at_sitemap() {
        let body = robots_txt(&config());
        assert!(body.contains("Disallow: /api/"));
        assert!(body.contains("Disallow: /search"));
        assert!(body.ends_with("Sitemap: https://cinedex.example/sitemap.xml\n"));
    }

    #[test]
    fn writes_escaped_urlset() {
        let entries = vec![
            SitemapEntry::new("https://cinedex.example/".into(), "daily", "1.0"),
            SitemapEntry::new("https://cinedex.example/a?x=1&y=2".into(), "weekly", "0.6"),
        ];
        let xml = write_sitemap(&entries, "2024-05-01").unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://cinedex.example/a?x=1&amp;y=2</loc>"));
        assert!(xml.contains("<lastmod>2024-05-01</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn dedupe_keeps_first() {
        let entries = vec![
            SitemapEntry::new("a".into(), "daily", "1.0"),
            SitemapEntry::new("b".into(), "weekly", "0.8"),
            SitemapEntry::new("a".into(), "weekly", "0.8"),
        ];
        let kept = dedupe(entries);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].priority, "1.0");
    }
}
