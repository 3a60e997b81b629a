//! HTML page handlers.
//!
//! Every handler resolves the locale, fetches what it needs, redirects to the
//! canonical URL when the request is not already on it, then renders.

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tower::util::ServiceExt;
use tracing::debug;

use crate::app::{build_router, AppState};
use crate::error::AppResult;
use crate::i18n::{self, t, Label, StaticPage};
use crate::locale::{Locale, LocaleResolution};
use crate::models::{genre_path, year_path, MediaType, Paged, Section};
use crate::tmdb::image_url;
use crate::utils::{paged_path, parse_page, slugify, truncate_words, QueryParams};
use crate::view::{
    detail_schema, item_list_schema, web_page_schema, website_schema, Listing, PageBody,
    PageViewModel, Pagination, SectionBlock,
};

pub const INDEX: &str = "index,follow";
pub const NOINDEX: &str = "noindex,follow";
const DESCRIPTION_LEN: usize = 160;
const MIN_YEAR: i32 = 1900;

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    id: String,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    media: String,
    genre_id: String,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    media: String,
    year: String,
}

pub async fn home(State(state): State<AppState>, lang: LocaleResolution) -> AppResult<Response> {
    let locale = lang.locale;
    let api = state.media.as_ref();
    let (trending_movie, trending_tv, popular_movie, popular_tv) = tokio::join!(
        api.section(Section::TrendingMovie, 1, locale),
        api.section(Section::TrendingTv, 1, locale),
        api.section(Section::PopularMovie, 1, locale),
        api.section(Section::PopularTv, 1, locale),
    );

    let sections: Vec<SectionBlock> = Section::ALL
        .into_iter()
        .zip([trending_movie, trending_tv, popular_movie, popular_tv])
        .map(|(section, fetched)| {
            let fetched = fetched.unwrap_or_else(|| Paged::empty(1));
            SectionBlock {
                section,
                items: fetched.results,
                page: 1,
                total_pages: fetched.total_pages.max(1),
            }
        })
        .collect();
    let image = sections
        .iter()
        .flat_map(|s| s.items.iter())
        .find_map(|i| i.backdrop_path.as_deref())
        .map(|p| image_url(p, "w1280"));

    let view = PageViewModel {
        locale,
        title: format!(
            "{} | {}",
            state.config.site_name,
            t(locale, Label::HomeTitle)
        ),
        description: t(locale, Label::HomeDescription).to_string(),
        canonical: state.config.canonical("/"),
        robots: INDEX,
        image,
        structured_data: Some(website_schema(&state.config, locale)),
        body: PageBody::Home { sections },
    };
    render(&state, StatusCode::OK, &view, &lang)
}

pub async fn movie(
    State(state): State<AppState>,
    lang: LocaleResolution,
    Path(params): Path<DetailParams>,
) -> AppResult<Response> {
    detail(state, lang, MediaType::Movie, params).await
}

pub async fn tv(
    State(state): State<AppState>,
    lang: LocaleResolution,
    Path(params): Path<DetailParams>,
) -> AppResult<Response> {
    detail(state, lang, MediaType::Tv, params).await
}

async fn detail(
    state: AppState,
    lang: LocaleResolution,
    media: MediaType,
    params: DetailParams,
) -> AppResult<Response> {
    let locale = lang.locale;
    let Ok(id) = params.id.parse::<u64>() else {
        return not_found(&state, &lang);
    };
    let Some(detail) = state.media.detail(media, id, locale).await else {
        return not_found(&state, &lang);
    };

    let canonical_path = detail.item.path();
    let requested_slug = params.slug.as_deref().unwrap_or("");
    if params.id != id.to_string() || requested_slug != detail.item.slug() {
        debug!(media = %media, id, requested = requested_slug, "Redirecting to canonical slug");
        return Ok(permanent_redirect(&canonical_path, &lang));
    }

    let item = &detail.item;
    let title = match item.year() {
        Some(year) => format!("{} ({}) | {}", item.title, year, state.config.site_name),
        None => format!("{} | {}", item.title, state.config.site_name),
    };
    let description = item
        .overview
        .as_deref()
        .map(|o| truncate_words(o, DESCRIPTION_LEN))
        .unwrap_or_else(|| format!("{} - {}", item.title, i18n::media_label(locale, media)));
    let image = item
        .backdrop_path
        .as_deref()
        .map(|p| image_url(p, "w1280"))
        .or_else(|| item.poster_path.as_deref().map(|p| image_url(p, "w500")));

    let view = PageViewModel {
        locale,
        title,
        description,
        canonical: state.config.canonical(&canonical_path),
        robots: INDEX,
        image,
        structured_data: Some(detail_schema(&state.config, &detail, locale)),
        body: PageBody::Detail(Box::new(detail)),
    };
    render(&state, StatusCode::OK, &view, &lang)
}

pub async fn search(
    State(state): State<AppState>,
    lang: LocaleResolution,
    Query(params): Query<QueryParams>,
) -> AppResult<Response> {
    let locale = lang.locale;
    let query = params.get("q").map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Ok(lang.apply(Redirect::to("/").into_response()));
    }
    let page = parse_page(params.get("page"));
    let results = state
        .media
        .search(query, page, locale)
        .await
        .unwrap_or_else(|| Paged::empty(page));

    let base = format!("/search?q={}", urlencoding::encode(query));
    let heading = i18n::search_heading(locale, query);
    let view = PageViewModel {
        locale,
        title: format!("{} | {}", heading, state.config.site_name),
        description: i18n::listing_description(locale, &heading),
        canonical: state.config.canonical(&paged_path(&base, page)),
        robots: NOINDEX,
        image: None,
        structured_data: None,
        body: PageBody::Listing(Listing {
            heading,
            pagination: Pagination::new(&base, page, results.total_pages),
            items: results.results,
            query: Some(query.to_string()),
        }),
    };
    render(&state, StatusCode::OK, &view, &lang)
}

pub async fn genre(
    State(state): State<AppState>,
    lang: LocaleResolution,
    Path(params): Path<GenreParams>,
    Query(query): Query<QueryParams>,
) -> AppResult<Response> {
    let locale = lang.locale;
    let Some(media) = MediaType::parse(&params.media) else {
        return not_found(&state, &lang);
    };
    let Ok(genre_id) = params.genre_id.parse::<u32>() else {
        return not_found(&state, &lang);
    };
    let api = state.media.as_ref();
    // Slugs come from the default-locale name so URLs are the same for
    // every visitor; the heading uses the visitor's locale.
    let Some(canonical_genre) = state
        .genres
        .find(api, media, Locale::default(), genre_id)
        .await
    else {
        return not_found(&state, &lang);
    };
    let display = state
        .genres
        .find(api, media, locale, genre_id)
        .await
        .unwrap_or_else(|| canonical_genre.clone());

    let page = parse_page(query.get("page"));
    let base = genre_path(media, &canonical_genre);
    let requested_slug = params.slug.as_deref().unwrap_or("");
    if params.genre_id != genre_id.to_string() || requested_slug != slugify(&canonical_genre.name)
    {
        return Ok(permanent_redirect(&paged_path(&base, page), &lang));
    }

    let results = api
        .discover_by_genre(media, genre_id, page, locale)
        .await
        .unwrap_or_else(|| Paged::empty(page));
    let heading = i18n::genre_heading(locale, media, &display.name);
    listing_page(&state, &lang, heading, &base, page, results)
}

pub async fn year(
    State(state): State<AppState>,
    lang: LocaleResolution,
    Path(params): Path<YearParams>,
    Query(query): Query<QueryParams>,
) -> AppResult<Response> {
    let locale = lang.locale;
    let Some(media) = MediaType::parse(&params.media) else {
        return not_found(&state, &lang);
    };
    let Some(year) = parse_year(&params.year) else {
        return not_found(&state, &lang);
    };

    let page = parse_page(query.get("page"));
    let results = state
        .media
        .discover_by_year(media, year, page, locale)
        .await
        .unwrap_or_else(|| Paged::empty(page));
    let heading = i18n::year_heading(locale, media, year);
    listing_page(&state, &lang, heading, &year_path(media, year), page, results)
}

pub async fn about(State(state): State<AppState>, lang: LocaleResolution) -> AppResult<Response> {
    static_page(&state, &lang, StaticPage::About)
}

pub async fn privacy_policy(
    State(state): State<AppState>,
    lang: LocaleResolution,
) -> AppResult<Response> {
    static_page(&state, &lang, StaticPage::PrivacyPolicy)
}

pub async fn terms(State(state): State<AppState>, lang: LocaleResolution) -> AppResult<Response> {
    static_page(&state, &lang, StaticPage::Terms)
}

pub async fn dmca(State(state): State<AppState>, lang: LocaleResolution) -> AppResult<Response> {
    static_page(&state, &lang, StaticPage::Dmca)
}

pub async fn contact(State(state): State<AppState>, lang: LocaleResolution) -> AppResult<Response> {
    static_page(&state, &lang, StaticPage::Contact)
}

/// Unmatched paths. A trailing slash is stripped and the stripped path is
/// routed again: if it renders, the answer is a 301 to it; if it redirects
/// (slug canonicalization) or fails, that response is passed through.
pub async fn fallback(
    State(state): State<AppState>,
    lang: LocaleResolution,
    mut req: Request,
) -> AppResult<Response> {
    let Some(target) = strip_trailing_slash(req.uri()) else {
        return not_found(&state, &lang);
    };
    *req.uri_mut() = target.parse::<Uri>()?;
    let inner = build_router(state)
        .oneshot(req)
        .await
        .unwrap_or_else(|never| match never {});
    if inner.status() == StatusCode::OK {
        debug!(target = %target, "Redirecting away from trailing slash");
        return Ok(permanent_redirect(&target, &lang));
    }
    Ok(inner)
}

/// `path?query` without the trailing slash, or `None` when there is none to
/// strip. The root is left alone.
fn strip_trailing_slash(uri: &Uri) -> Option<String> {
    let path = uri.path();
    if path == "/" || !path.ends_with('/') {
        return None;
    }
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        rest => rest,
    };
    Some(match uri.query() {
        Some(query) => format!("{trimmed}?{query}"),
        None => trimmed.to_string(),
    })
}

fn static_page(state: &AppState, lang: &LocaleResolution, page: StaticPage) -> AppResult<Response> {
    let locale = lang.locale;
    let title = page.title(locale);
    let description = page
        .paragraphs(locale)
        .first()
        .map(|p| truncate_words(&p.replace("{site}", &state.config.site_name), DESCRIPTION_LEN))
        .unwrap_or_default();
    let view = PageViewModel {
        locale,
        title: format!("{} | {}", title, state.config.site_name),
        description,
        canonical: state.config.canonical(page.path()),
        robots: INDEX,
        image: None,
        structured_data: Some(web_page_schema(&state.config, title, page.path(), locale)),
        body: PageBody::Static(page),
    };
    render(state, StatusCode::OK, &view, lang)
}

fn listing_page(
    state: &AppState,
    lang: &LocaleResolution,
    heading: String,
    base: &str,
    page: u32,
    results: Paged<crate::models::MediaItem>,
) -> AppResult<Response> {
    let locale = lang.locale;
    let title = if page > 1 {
        format!(
            "{} - {} | {}",
            heading,
            i18n::page_of(locale, page, results.total_pages),
            state.config.site_name
        )
    } else {
        format!("{} | {}", heading, state.config.site_name)
    };
    let view = PageViewModel {
        locale,
        title,
        description: i18n::listing_description(locale, &heading),
        canonical: state.config.canonical(&paged_path(base, page)),
        robots: if results.results.is_empty() { NOINDEX } else { INDEX },
        image: None,
        structured_data: Some(item_list_schema(&state.config, &heading, &results.results)),
        body: PageBody::Listing(Listing {
            heading,
            pagination: Pagination::new(base, page, results.total_pages),
            items: results.results,
            query: None,
        }),
    };
    render(state, StatusCode::OK, &view, lang)
}

pub(crate) fn not_found(state: &AppState, lang: &LocaleResolution) -> AppResult<Response> {
    let locale = lang.locale;
    let view = PageViewModel {
        locale,
        title: format!(
            "{} | {}",
            t(locale, Label::NotFoundTitle),
            state.config.site_name
        ),
        description: t(locale, Label::NotFoundBody).to_string(),
        canonical: state.config.canonical("/"),
        robots: "noindex,nofollow",
        image: None,
        structured_data: None,
        body: PageBody::NotFound,
    };
    render(state, StatusCode::NOT_FOUND, &view, lang)
}

fn render(
    state: &AppState,
    status: StatusCode,
    view: &PageViewModel,
    lang: &LocaleResolution,
) -> AppResult<Response> {
    let body = state.renderer.render(view)?;
    let response = (
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response();
    Ok(lang.apply(response))
}

/// 301, which `Redirect::permanent` (308) does not give us.
fn permanent_redirect(location: &str, lang: &LocaleResolution) -> Response {
    let response = (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response();
    lang.apply(response)
}

fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = raw.parse::<i32>().ok()?;
    let latest = Utc::now().year() + 2;
    (MIN_YEAR..=latest).contains(&year).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_trailing_slash_keeps_query() {
        let uri = |s: &str| s.parse::<Uri>().unwrap();
        assert_eq!(strip_trailing_slash(&uri("/")), None);
        assert_eq!(strip_trailing_slash(&uri("/about")), None);
        assert_eq!(strip_trailing_slash(&uri("/about/")).as_deref(), Some("/about"));
        assert_eq!(
            strip_trailing_slash(&uri("/genre/movie/28/action//?page=2")).as_deref(),
            Some("/genre/movie/28/action?page=2")
        );
    }

    #[test]
    fn parse_year_bounds() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("1900"), Some(1900));
        assert_eq!(parse_year("1899"), None);
        assert_eq!(parse_year("99"), None);
        assert_eq!(parse_year("+999"), None);
        assert_eq!(parse_year("3000"), None);
        assert_eq!(parse_year(&Utc::now().year().to_string()), Some(Utc::now().year()));
    }
}
