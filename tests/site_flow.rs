use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use cinedex::app::{build_router, AppState};
use cinedex::config::Config;
use cinedex::locale::Locale;
use cinedex::models::{Genre, MediaDetail, MediaItem, MediaType, Paged};
use cinedex::tmdb::MediaApi;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

const ORIGIN: &str = "https://cinedex.example";

struct FakeMedia {
    /// Simulates the metadata API being down for list endpoints.
    lists_down: bool,
}

fn item(id: u64, media_type: MediaType, title: &str, date: &str) -> MediaItem {
    MediaItem {
        id,
        media_type,
        title: title.to_string(),
        overview: Some(format!("{title} overview")),
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: Some(format!("/{id}-b.jpg")),
        vote_average: Some(8.1),
        date: Some(date.to_string()),
        genre_ids: vec![28],
    }
}

fn matrix() -> MediaItem {
    item(603, MediaType::Movie, "The Matrix", "1999-03-31")
}

fn breaking_bad() -> MediaItem {
    item(1396, MediaType::Tv, "Breaking Bad", "2008-01-20")
}

fn detail(item: MediaItem) -> MediaDetail {
    MediaDetail {
        item,
        tagline: Some("Welcome to the real world.".into()),
        runtime_minutes: Some(136),
        seasons: None,
        episodes: None,
        status: Some("Released".into()),
        vote_count: 25000,
        genres: vec![Genre {
            id: 28,
            name: "Action".into(),
        }],
        cast: vec![],
        directors: vec!["Lana Wachowski".into()],
        trailer: Some("vKQi3bBA1y8".into()),
        recommendations: vec![],
    }
}

fn page_of(items: Vec<MediaItem>, page: u32) -> Paged<MediaItem> {
    Paged {
        page,
        total_pages: 5,
        total_results: 100,
        results: items,
    }
}

impl FakeMedia {
    fn list(&self, media: MediaType, page: u32) -> Option<Paged<MediaItem>> {
        if self.lists_down {
            return None;
        }
        let items = match media {
            MediaType::Movie => vec![
                matrix(),
                item(680, MediaType::Movie, "Pulp Fiction", "1994-09-10"),
            ],
            MediaType::Tv => vec![breaking_bad()],
        };
        Some(page_of(items, page))
    }
}

#[async_trait::async_trait]
impl MediaApi for FakeMedia {
    async fn trending(&self, media: MediaType, page: u32, _: Locale) -> Option<Paged<MediaItem>> {
        self.list(media, page)
    }
    async fn popular(&self, media: MediaType, page: u32, _: Locale) -> Option<Paged<MediaItem>> {
        self.list(media, page)
    }
    async fn movie(&self, id: u64, _: Locale) -> Option<MediaDetail> {
        (id == 603).then(|| detail(matrix()))
    }
    async fn tv(&self, id: u64, _: Locale) -> Option<MediaDetail> {
        (id == 1396).then(|| detail(breaking_bad()))
    }
    async fn search(&self, query: &str, page: u32, _: Locale) -> Option<Paged<MediaItem>> {
        let hits = if query.eq_ignore_ascii_case("matrix") {
            vec![matrix()]
        } else {
            vec![]
        };
        Some(page_of(hits, page))
    }
    async fn discover_by_genre(
        &self,
        media: MediaType,
        _: u32,
        page: u32,
        _: Locale,
    ) -> Option<Paged<MediaItem>> {
        self.list(media, page)
    }
    async fn discover_by_year(
        &self,
        media: MediaType,
        _: i32,
        page: u32,
        _: Locale,
    ) -> Option<Paged<MediaItem>> {
        self.list(media, page)
    }
    async fn genres(&self, media: MediaType, locale: Locale) -> Option<Vec<Genre>> {
        let name = match (media, locale) {
            (MediaType::Movie, Locale::En) => "Action",
            (MediaType::Movie, Locale::Id) => "Aksi",
            (MediaType::Tv, _) => "Drama",
        };
        let id = match media {
            MediaType::Movie => 28,
            MediaType::Tv => 18,
        };
        Some(vec![Genre {
            id,
            name: name.to_string(),
        }])
    }
}

fn app_with(media: FakeMedia) -> Router {
    let config = Config::new(3000, ORIGIN, "Cinedex", "test-key", "http://127.0.0.1:9");
    build_router(AppState::new(config, Arc::new(media)))
}

fn app() -> Router {
    app_with(FakeMedia { lists_down: false })
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(res: Response<Body>) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(res: &Response<Body>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn home_renders_every_section() {
    let res = get(app(), "/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let html = body_text(res).await;
    for section in ["trending-movie", "trending-tv", "popular-movie", "popular-tv"] {
        assert!(html.contains(&format!("data-section=\"{section}\"")), "{section}");
    }
    assert!(html.contains(&format!("<link rel=\"canonical\" href=\"{ORIGIN}/\">")));
    assert!(html.contains("\"@type\":\"WebSite\""));
}

#[tokio::test]
async fn home_survives_upstream_outage() {
    let res = get(app_with(FakeMedia { lists_down: true }), "/").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn movie_on_canonical_slug_renders() {
    let res = get(app(), "/movie/603/the-matrix").await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains(&format!(
        "<link rel=\"canonical\" href=\"{ORIGIN}/movie/603/the-matrix\">"
    )));
    assert!(html.contains("The Matrix (1999) | Cinedex"));
    assert!(html.contains("\"@type\":\"Movie\""));
}

#[tokio::test]
async fn movie_without_or_with_wrong_slug_redirects_permanently() {
    for uri in ["/movie/603", "/movie/603/matrix", "/movie/0603/the-matrix"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY, "{uri}");
        assert_eq!(location(&res), "/movie/603/the-matrix", "{uri}");
    }
}

#[tokio::test]
async fn unknown_or_malformed_movie_is_not_found() {
    for uri in ["/movie/999/nothing", "/movie/abc", "/movie/-1/x"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn tv_detail_canonicalizes() {
    let res = get(app(), "/tv/1396").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), "/tv/1396/breaking-bad");

    let res = get(app(), "/tv/1396/breaking-bad").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("\"@type\":\"TVSeries\""));

    let res = get(app(), "/tv/603/the-matrix").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_search_goes_home() {
    for uri in ["/search", "/search?q=", "/search?q=%20%20"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&res), "/", "{uri}");
    }
}

#[tokio::test]
async fn search_results_are_not_indexed() {
    let res = get(app(), "/search?q=matrix").await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains("noindex"));
    assert!(html.contains("/movie/603/the-matrix"));
}

#[tokio::test]
async fn genre_listing_canonicalizes_slug() {
    let res = get(app(), "/genre/movie/28/action").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Pulp Fiction"));

    let res = get(app(), "/genre/movie/28").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), "/genre/movie/28/action");

    let res = get(app(), "/genre/movie/28/wrong?page=2").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&res), "/genre/movie/28/action?page=2");
}

#[tokio::test]
async fn genre_heading_follows_locale_but_slug_does_not() {
    let res = get(app(), "/genre/movie/28/action?lang=id").await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains("Aksi"));
    assert!(html.contains(&format!(
        "<link rel=\"canonical\" href=\"{ORIGIN}/genre/movie/28/action\">"
    )));
}

#[tokio::test]
async fn unknown_genre_or_media_is_not_found() {
    for uri in ["/genre/movie/99/x", "/genre/anime/28/action", "/genre/movie/abc"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn year_listing_validates_year() {
    let res = get(app(), "/year/movie/1999").await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains(&format!(
        "<link rel=\"canonical\" href=\"{ORIGIN}/year/movie/1999\">"
    )));

    let res = get(app(), "/year/tv/2008?page=2").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res)
        .await
        .contains(&format!("{ORIGIN}/year/tv/2008?page=2")));

    for uri in ["/year/movie/1800", "/year/movie/abcd", "/year/movie/99", "/year/books/1999"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn section_api_returns_minimal_items() {
    let res = get(app(), "/api/section?section=trending-movie&page=2").await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["page"], 2);
    assert_eq!(json["total_pages"], 5);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["slug"], "the-matrix");
    assert_eq!(results[0]["media_type"], "movie");
    assert!(results[0].get("overview").is_none());
}

#[tokio::test]
async fn section_api_rejects_unknown_section() {
    for uri in ["/api/section?section=bogus", "/api/section"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json: Value = serde_json::from_str(&body_text(res).await).unwrap();
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn section_api_empty_when_upstream_fails() {
    let app = app_with(FakeMedia { lists_down: true });
    let res = get(app, "/api/section?section=popular-tv&page=abc").await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["page"], 1);
    assert_eq!(json["total_pages"], 1);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn explicit_lang_overrides_cookie_and_persists() {
    let req = Request::get("/?lang=id")
        .header(header::COOKIE, "lang_preference=en")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("lang_preference=id;"), "{cookie}");
    assert!(body_text(res).await.contains("<html lang=\"id\">"));
}

#[tokio::test]
async fn invalid_lang_falls_back_without_cookie() {
    let req = Request::get("/?lang=xx")
        .header(header::COOKIE, "lang_preference=id")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(res).await.contains("<html lang=\"id\">"));

    let req = Request::get("/about")
        .header(header::ACCEPT_LANGUAGE, "fr-FR,id;q=0.8,en;q=0.5")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert!(body_text(res).await.contains("<html lang=\"id\">"));
}

#[tokio::test]
async fn redirect_carries_locale_cookie() {
    let res = get(app(), "/movie/603?lang=id").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert!(res.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn robots_points_to_sitemap() {
    let res = get(app(), "/robots.txt").await;
    assert_eq!(res.status(), StatusCode::OK);
    let text = body_text(res).await;
    assert!(text.contains("Disallow: /api/"));
    assert!(text.contains(&format!("Sitemap: {ORIGIN}/sitemap.xml")));
}

#[tokio::test]
async fn sitemap_lists_each_url_once() {
    let res = get(app(), "/sitemap.xml").await;
    assert_eq!(res.status(), StatusCode::OK);
    let xml = body_text(res).await;
    assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
    assert_eq!(xml.matches(&format!("<loc>{ORIGIN}/</loc>")).count(), 1);
    for path in ["/about", "/privacy-policy", "/terms", "/dmca", "/contact"] {
        assert_eq!(
            xml.matches(&format!("<loc>{ORIGIN}{path}</loc>")).count(),
            1,
            "{path}"
        );
    }
    // Trending and popular both return it; it must still appear once.
    assert_eq!(
        xml.matches(&format!("<loc>{ORIGIN}/movie/603/the-matrix</loc>")).count(),
        1
    );
    assert!(xml.contains(&format!("<loc>{ORIGIN}/genre/movie/28/action</loc>")));
    assert!(xml.contains(&format!("<loc>{ORIGIN}/genre/tv/18/drama</loc>")));
    assert!(xml.contains(&format!("<loc>{ORIGIN}/tv/1396/breaking-bad</loc>")));
}

#[tokio::test]
async fn sitemap_degrades_when_upstream_fails() {
    let res = get(app_with(FakeMedia { lists_down: true }), "/sitemap.xml").await;
    assert_eq!(res.status(), StatusCode::OK);
    let xml = body_text(res).await;
    assert_eq!(xml.matches("<url>").count(), 1 + 5 + 2);
}

#[tokio::test]
async fn trust_pages_render() {
    for path in ["/about", "/privacy-policy", "/terms", "/dmca", "/contact"] {
        let res = get(app(), path).await;
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        let html = body_text(res).await;
        assert!(html.contains(&format!("<link rel=\"canonical\" href=\"{ORIGIN}{path}\">")));
        assert!(!html.contains("{site}"));
    }
}

#[tokio::test]
async fn trailing_slash_redirects_to_canonical() {
    let cases = [
        ("/movie/603/", "/movie/603/the-matrix"),
        ("/movie/603/the-matrix/", "/movie/603/the-matrix"),
        ("/tv/1396/", "/tv/1396/breaking-bad"),
        ("/genre/movie/28/action/", "/genre/movie/28/action"),
        ("/genre/movie/28/action/?page=2", "/genre/movie/28/action?page=2"),
        ("/year/movie/1999/", "/year/movie/1999"),
        ("/about/", "/about"),
        ("/search/?q=matrix", "/search?q=matrix"),
    ];
    for (uri, expected) in cases {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY, "{uri}");
        assert_eq!(location(&res), expected, "{uri}");
    }
}

#[tokio::test]
async fn trailing_slash_on_missing_page_is_not_found() {
    for uri in ["/movie/999/", "/no/such/page/"] {
        let res = get(app(), uri).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(res.headers().get(header::LOCATION).is_none(), "{uri}");
    }
}

#[tokio::test]
async fn repeated_query_params_use_first_value() {
    let res = get(app(), "/search?q=matrix&q=other").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("/movie/603/the-matrix"));

    let res = get(app(), "/year/movie/1999?page=2&page=3").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res)
        .await
        .contains(&format!("{ORIGIN}/year/movie/1999?page=2")));

    let res = get(app(), "/api/section?section=trending-tv&section=bogus&page=1&page=x").await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["results"][0]["slug"], "breaking-bad");

    let res = get(app(), "/?lang=id&lang=en").await;
    assert!(body_text(res).await.contains("<html lang=\"id\">"));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let res = get(app(), "/no/such/page").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(res).await.contains("noindex"));
}

#[tokio::test]
async fn serves_health_and_script() {
    let res = get(app(), "/health").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await, "OK");

    let res = get(app(), "/assets/app.js").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("application/javascript"));
    assert!(body_text(res).await.contains("/api/section"));
}
