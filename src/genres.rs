use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::locale::Locale;
use crate::models::{Genre, MediaType};
use crate::tmdb::MediaApi;

/// Lazily filled genre lists, one per media type and locale, kept for the
/// life of the process.
///
/// The lock is not held across the upstream call, so two first requests for
/// the same key may both fetch. The first insert wins; an entry never changes
/// once stored.
#[derive(Debug, Default)]
pub struct GenreCache {
    entries: Mutex<HashMap<(MediaType, Locale), Arc<Vec<Genre>>>>,
}

impl GenreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn genres_for(
        &self,
        api: &dyn MediaApi,
        media: MediaType,
        locale: Locale,
    ) -> Arc<Vec<Genre>> {
        let key = (media, locale);
        if let Some(hit) = self.entries.lock().await.get(&key) {
            return hit.clone();
        }

        match api.genres(media, locale).await {
            Some(list) => {
                debug!(media = %media, locale = locale.code(), count = list.len(), "Caching genre list");
                let mut guard = self.entries.lock().await;
                guard.entry(key).or_insert_with(|| Arc::new(list)).clone()
            }
            None => {
                // Not cached, so the next request retries the fill.
                warn!(media = %media, locale = locale.code(), "Genre list unavailable");
                Arc::new(Vec::new())
            }
        }
    }

    pub async fn find(
        &self,
        api: &dyn MediaApi,
        media: MediaType,
        locale: Locale,
        genre_id: u32,
    ) -> Option<Genre> {
        self.genres_for(api, media, locale)
            .await
            .iter()
            .find(|g| g.id == genre_id)
            .cloned()
    }
}
