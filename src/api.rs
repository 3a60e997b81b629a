//! JSON endpoint behind the home page "load more" controls.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::app::AppState;
use crate::locale::LocaleResolution;
use crate::models::{MediaItem, MediaType, Paged, Section};
use crate::utils::{parse_page, QueryParams};

#[derive(Debug, Serialize, PartialEq)]
pub struct SectionItem {
    pub id: u64,
    pub title: String,
    pub media_type: MediaType,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub date: Option<String>,
    pub slug: String,
}

impl From<MediaItem> for SectionItem {
    fn from(item: MediaItem) -> Self {
        let slug = item.slug();
        Self {
            id: item.id,
            title: item.title,
            media_type: item.media_type,
            poster_path: item.poster_path,
            vote_average: item.vote_average,
            date: item.date,
            slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectionPage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<SectionItem>,
}

impl SectionPage {
    fn from_paged(page: u32, fetched: Paged<MediaItem>) -> Self {
        Self {
            page,
            total_pages: fetched.total_pages.max(1),
            results: fetched.results.into_iter().map(SectionItem::from).collect(),
        }
    }
}

pub async fn section(
    State(state): State<AppState>,
    lang: LocaleResolution,
    Query(query): Query<QueryParams>,
) -> Response {
    let Some(section) = query.get("section").and_then(Section::parse) else {
        debug!(section = ?query.get("section"), "Rejecting unknown section");
        let body = Json(json!({ "error": "unknown section" }));
        return lang.apply((StatusCode::BAD_REQUEST, body).into_response());
    };
    let page = parse_page(query.get("page"));

    let fetched = state
        .media
        .section(section, page, lang.locale)
        .await
        .unwrap_or_else(|| Paged::empty(page));
    lang.apply(Json(SectionPage::from_paged(page, fetched)).into_response())
}
