use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::locale::Locale;
use crate::models::{CastMember, Genre, MediaDetail, MediaItem, MediaType, Paged, Section};
use crate::utils::MAX_PAGE;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DETAIL_APPENDS: &str = "credits,videos,recommendations";
const TOP_CAST: usize = 12;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn image_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE}/{size}{path}")
}

/// Everything the site reads from the metadata API. Every method yields
/// `None` when the upstream call failed; callers treat that as "no data".
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn trending(&self, media: MediaType, page: u32, locale: Locale)
        -> Option<Paged<MediaItem>>;
    async fn popular(&self, media: MediaType, page: u32, locale: Locale)
        -> Option<Paged<MediaItem>>;
    async fn movie(&self, id: u64, locale: Locale) -> Option<MediaDetail>;
    async fn tv(&self, id: u64, locale: Locale) -> Option<MediaDetail>;
    async fn search(&self, query: &str, page: u32, locale: Locale) -> Option<Paged<MediaItem>>;
    async fn discover_by_genre(
        &self,
        media: MediaType,
        genre_id: u32,
        page: u32,
        locale: Locale,
    ) -> Option<Paged<MediaItem>>;
    async fn discover_by_year(
        &self,
        media: MediaType,
        year: i32,
        page: u32,
        locale: Locale,
    ) -> Option<Paged<MediaItem>>;
    async fn genres(&self, media: MediaType, locale: Locale) -> Option<Vec<Genre>>;

    async fn detail(&self, media: MediaType, id: u64, locale: Locale) -> Option<MediaDetail> {
        match media {
            MediaType::Movie => self.movie(id, locale).await,
            MediaType::Tv => self.tv(id, locale).await,
        }
    }

    async fn section(&self, section: Section, page: u32, locale: Locale) -> Option<Paged<MediaItem>> {
        match section {
            Section::TrendingMovie | Section::TrendingTv => {
                self.trending(section.media_type(), page, locale).await
            }
            Section::PopularMovie | Section::PopularTv => {
                self.popular(section.media_type(), page, locale).await
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = format!("cinedex/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: config.tmdb_api_key.clone(),
            base_url: config.tmdb_base_url.clone(),
        })
    }

    /// GET `endpoint` with the credential and language injected. Failures are
    /// logged and collapse to `None`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        locale: Locale,
    ) -> Option<T> {
        match self.get_json(endpoint, params, locale).await {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(endpoint = %endpoint, "TMDB request failed: {:#}", e);
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        locale: Locale,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut query: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", locale.api_language().to_string()),
        ];
        query.extend(params.iter().cloned());

        debug!(endpoint = %endpoint, language = locale.api_language(), "TMDB request");
        let res = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", endpoint, status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }

    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        media: Option<MediaType>,
        locale: Locale,
    ) -> Option<Paged<MediaItem>> {
        let raw: RawPage = self.fetch(endpoint, params, locale).await?;
        Some(raw.normalize(media))
    }

    async fn fetch_detail(&self, media: MediaType, id: u64, locale: Locale) -> Option<MediaDetail> {
        let endpoint = format!("/{}/{}", media, id);
        let params = [("append_to_response", DETAIL_APPENDS.to_string())];
        let raw: RawDetail = self.fetch(&endpoint, &params, locale).await?;
        raw.normalize(media)
    }
}

#[async_trait]
impl MediaApi for TmdbClient {
    async fn trending(
        &self,
        media: MediaType,
        page: u32,
        locale: Locale,
    ) -> Option<Paged<MediaItem>> {
        let endpoint = format!("/trending/{}/week", media);
        self.fetch_page(&endpoint, &[("page", clamp(page))], Some(media), locale)
            .await
    }

    async fn popular(
        &self,
        media: MediaType,
        page: u32,
        locale: Locale,
    ) -> Option<Paged<MediaItem>> {
        let endpoint = format!("/{}/popular", media);
        self.fetch_page(&endpoint, &[("page", clamp(page))], Some(media), locale)
            .await
    }

    async fn movie(&self, id: u64, locale: Locale) -> Option<MediaDetail> {
        self.fetch_detail(MediaType::Movie, id, locale).await
    }

    async fn tv(&self, id: u64, locale: Locale) -> Option<MediaDetail> {
        self.fetch_detail(MediaType::Tv, id, locale).await
    }

    async fn search(&self, query: &str, page: u32, locale: Locale) -> Option<Paged<MediaItem>> {
        let params = [
            ("query", query.to_string()),
            ("page", clamp(page)),
            ("include_adult", "false".to_string()),
        ];
        self.fetch_page("/search/multi", &params, None, locale).await
    }

    async fn discover_by_genre(
        &self,
        media: MediaType,
        genre_id: u32,
        page: u32,
        locale: Locale,
    ) -> Option<Paged<MediaItem>> {
        let endpoint = format!("/discover/{}", media);
        let params = [
            ("with_genres", genre_id.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
            ("page", clamp(page)),
        ];
        self.fetch_page(&endpoint, &params, Some(media), locale).await
    }

    async fn discover_by_year(
        &self,
        media: MediaType,
        year: i32,
        page: u32,
        locale: Locale,
    ) -> Option<Paged<MediaItem>> {
        let endpoint = format!("/discover/{}", media);
        let year_param = match media {
            MediaType::Movie => "primary_release_year",
            MediaType::Tv => "first_air_date_year",
        };
        let params = [
            (year_param, year.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
            ("page", clamp(page)),
        ];
        self.fetch_page(&endpoint, &params, Some(media), locale).await
    }

    async fn genres(&self, media: MediaType, locale: Locale) -> Option<Vec<Genre>> {
        #[derive(Deserialize)]
        struct GenreList {
            #[serde(default)]
            genres: Vec<Genre>,
        }

        let endpoint = format!("/genre/{}/list", media);
        let list: GenreList = self.fetch(&endpoint, &[], locale).await?;
        Some(list.genres)
    }
}

fn clamp(page: u32) -> String {
    page.clamp(1, MAX_PAGE).to_string()
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
    #[serde(default)]
    results: Vec<RawItem>,
}

impl RawPage {
    /// `media` is the list's media type; `None` for mixed lists where each
    /// result carries its own.
    fn normalize(self, media: Option<MediaType>) -> Paged<MediaItem> {
        Paged {
            page: self.page.max(1),
            total_pages: self.total_pages.clamp(1, MAX_PAGE),
            total_results: self.total_results,
            results: self
                .results
                .into_iter()
                .filter_map(|r| r.normalize(media))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

impl RawItem {
    fn normalize(self, media: Option<MediaType>) -> Option<MediaItem> {
        let media_type = match self.media_type.as_deref() {
            Some(kind) => MediaType::parse(kind)?,
            None => media?,
        };
        let title = non_empty(self.title)
            .or(non_empty(self.name))
            .or(non_empty(self.original_title))
            .or(non_empty(self.original_name))?;
        Some(MediaItem {
            id: self.id,
            media_type,
            title,
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average,
            date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
            genre_ids: self.genre_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: u32,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    status: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    created_by: Vec<Person>,
    credits: Option<Credits>,
    videos: Option<Videos>,
    recommendations: Option<RawPage>,
}

impl RawDetail {
    fn normalize(self, media: MediaType) -> Option<MediaDetail> {
        let title = non_empty(self.title)
            .or(non_empty(self.name))
            .or(non_empty(self.original_title))
            .or(non_empty(self.original_name))?;
        let credits = self.credits.unwrap_or_default();
        let directors = match media {
            MediaType::Movie => credits
                .crew
                .iter()
                .filter(|c| c.job.as_deref() == Some("Director"))
                .map(|c| c.name.clone())
                .collect(),
            MediaType::Tv => self.created_by.into_iter().map(|p| p.name).collect(),
        };
        let cast = credits
            .cast
            .into_iter()
            .take(TOP_CAST)
            .map(|c| CastMember {
                name: c.name,
                character: non_empty(c.character),
                profile_path: non_empty(c.profile_path),
            })
            .collect();
        let runtime_minutes = self
            .runtime
            .filter(|r| *r > 0)
            .or_else(|| self.episode_run_time.first().copied());
        let recommendations = self
            .recommendations
            .map(|r| r.normalize(Some(media)).results)
            .unwrap_or_default();
        let genre_ids = self.genres.iter().map(|g| g.id).collect();

        Some(MediaDetail {
            item: MediaItem {
                id: self.id,
                media_type: media,
                title,
                overview: non_empty(self.overview),
                poster_path: non_empty(self.poster_path),
                backdrop_path: non_empty(self.backdrop_path),
                vote_average: self.vote_average,
                date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
                genre_ids,
            },
            tagline: non_empty(self.tagline),
            runtime_minutes,
            seasons: self.number_of_seasons,
            episodes: self.number_of_episodes,
            status: non_empty(self.status),
            vote_count: self.vote_count,
            genres: self.genres,
            cast,
            directors,
            trailer: self.videos.as_ref().and_then(select_trailer),
            recommendations,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastCredit>,
    #[serde(default)]
    crew: Vec<CrewCredit>,
}

#[derive(Debug, Deserialize)]
struct CastCredit {
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrewCredit {
    job: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    site: String,
    #[serde(rename = "type")]
    video_type: String,
    key: String,
}

fn select_trailer(videos: &Videos) -> Option<String> {
    let youtube = |kind: &str| {
        videos
            .results
            .iter()
            .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == kind)
    };
    youtube("Trailer")
        .or_else(|| youtube("Teaser"))
        .map(|v| v.key.clone())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
