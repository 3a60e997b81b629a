//! Per-request language selection.
//!
//! Precedence: a valid `lang` query parameter (which also yields a cookie
//! directive), then the `lang_preference` cookie, then `Accept-Language`,
//! then English.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderValue},
    response::Response,
};
use axum_extra::TypedHeader;
use headers::Cookie;
use crate::utils::QueryParams;
use std::convert::Infallible;

pub const LOCALE_COOKIE: &str = "lang_preference";
pub const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Id];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Id => "id",
        }
    }

    /// Language tag sent to the metadata API.
    pub fn api_language(&self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Id => "id-ID",
        }
    }

    pub fn og_locale(&self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Id => "id_ID",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Id => "Bahasa Indonesia",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "id" => Some(Locale::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleResolution {
    pub locale: Locale,
    /// `Set-Cookie` value to send back, present only when the request chose a
    /// locale explicitly.
    pub set_cookie: Option<String>,
}

impl LocaleResolution {
    pub fn apply(&self, mut response: Response) -> Response {
        if let Some(cookie) = &self.set_cookie {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

pub fn cookie_directive(locale: Locale) -> String {
    format!(
        "{LOCALE_COOKIE}={}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; SameSite=Lax",
        locale.code()
    )
}

pub fn resolve(
    query_lang: Option<&str>,
    cookie: Option<&str>,
    accept_language: Option<&str>,
) -> LocaleResolution {
    if let Some(locale) = query_lang.and_then(Locale::parse) {
        return LocaleResolution {
            locale,
            set_cookie: Some(cookie_directive(locale)),
        };
    }
    let locale = cookie
        .and_then(Locale::parse)
        .or_else(|| accept_language.and_then(from_accept_language))
        .unwrap_or_default();
    LocaleResolution {
        locale,
        set_cookie: None,
    }
}

/// First supported primary subtag, taking `q` weights into account.
fn from_accept_language(header: &str) -> Option<Locale> {
    let mut ranges: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let q = pieces
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((tag, q))
        })
        .filter(|(_, q)| *q > 0.0)
        .collect();
    ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranges.into_iter().find_map(|(tag, _)| {
        let primary = tag.split('-').next().unwrap_or(tag);
        Locale::parse(primary)
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for LocaleResolution
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query_lang = Query::<QueryParams>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.get("lang").map(str::to_string));
        let cookie = TypedHeader::<Cookie>::from_request_parts(parts, state)
            .await
            .ok();
        let preferred = cookie
            .as_ref()
            .and_then(|TypedHeader(c)| c.get(LOCALE_COOKIE));
        let accept = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        Ok(resolve(query_lang.as_deref(), preferred, accept))
    }
}
