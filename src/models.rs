use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{extract_year, slugify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Only the two exact path tokens are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A movie or TV show, normalized from whatever shape the metadata API sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    /// Release date for movies, first air date for TV.
    pub date: Option<String>,
    pub genre_ids: Vec<u32>,
}

impl MediaItem {
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    pub fn year(&self) -> Option<String> {
        self.date.as_deref().and_then(extract_year)
    }

    /// Canonical site path; the slug segment is omitted when the title has no
    /// sluggable characters.
    pub fn path(&self) -> String {
        detail_path(self.media_type, self.id, &self.slug())
    }
}

pub fn detail_path(media_type: MediaType, id: u64, slug: &str) -> String {
    if slug.is_empty() {
        format!("/{}/{}", media_type, id)
    } else {
        format!("/{}/{}/{}", media_type, id, slug)
    }
}

pub fn genre_path(media_type: MediaType, genre: &Genre) -> String {
    let slug = slugify(&genre.name);
    if slug.is_empty() {
        format!("/genre/{}/{}", media_type, genre.id)
    } else {
        format!("/genre/{}/{}/{}", media_type, genre.id, slug)
    }
}

pub fn year_path(media_type: MediaType, year: i32) -> String {
    format!("/year/{}/{}", media_type, year)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<T>,
}

impl<T> Paged<T> {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            total_pages: 1,
            total_results: 0,
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaDetail {
    pub item: MediaItem,
    pub tagline: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub seasons: Option<u32>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub vote_count: u32,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
    /// Directors for movies, creators for TV.
    pub directors: Vec<String>,
    /// YouTube video key.
    pub trailer: Option<String>,
    pub recommendations: Vec<MediaItem>,
}

/// Curated lists exposed to the load-more endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    TrendingMovie,
    TrendingTv,
    PopularMovie,
    PopularTv,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::TrendingMovie,
        Section::TrendingTv,
        Section::PopularMovie,
        Section::PopularTv,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::TrendingMovie => "trending-movie",
            Section::TrendingTv => "trending-tv",
            Section::PopularMovie => "popular-movie",
            Section::PopularTv => "popular-tv",
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Section::TrendingMovie | Section::PopularMovie => MediaType::Movie,
            Section::TrendingTv | Section::PopularTv => MediaType::Tv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> MediaItem {
        MediaItem {
            id: 603,
            media_type: MediaType::Movie,
            title: title.to_string(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
            date: Some("1999-03-31".to_string()),
            genre_ids: vec![],
        }
    }

    #[test]
    fn item_path_uses_slug() {
        assert_eq!(item("The Matrix").path(), "/movie/603/the-matrix");
        assert_eq!(item("マトリックス").path(), "/movie/603");
        assert_eq!(item("The Matrix").year().as_deref(), Some("1999"));
    }

    #[test]
    fn section_round_trips_known_names() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.as_str()), Some(section));
        }
        assert_eq!(Section::parse("bogus"), None);
        assert_eq!(Section::parse(""), None);
    }

    #[test]
    fn media_type_parse_is_exact() {
        assert_eq!(MediaType::parse("movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::parse("tv"), Some(MediaType::Tv));
        assert_eq!(MediaType::parse("Movie"), None);
        assert_eq!(MediaType::parse("person"), None);
    }

    #[test]
    fn genre_path_includes_slug() {
        let genre = Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        };
        assert_eq!(
            genre_path(MediaType::Movie, &genre),
            "/genre/movie/878/science-fiction"
        );
    }
}
