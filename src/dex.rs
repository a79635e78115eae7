//! The load/search orchestrator.
//!
//! `Dex` owns the single authoritative [`DexState`] snapshot. Operations
//! run as independently scheduled tasks that read the current snapshot,
//! derive the next one through the pure transitions in [`crate::state`],
//! and replace it wholesale. Beyond the in-flight guard on page loads
//! there is no serialization: overlapping operations resolve last-write-
//! wins, which is acceptable for read-mostly, user-driven traffic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::model::DexState;
use crate::source::{self, CatalogSource, FavoritePolicy, NeverFavorite};
use crate::{state, MAX_PAGE_SIZE, NUMBER_MARKER, PAGE_SIZE, SPRITE_URL_TEMPLATE};

#[derive(Debug, Error)]
pub enum DexConfigError {
    #[error("page size must be between 1 and {max}, got {got}")]
    PageSizeOutOfRange { got: u32, max: u32 },

    #[error("sprite URL template is missing the '{NUMBER_MARKER}' marker: {0}")]
    TemplateMissingMarker(String),

    #[error("sprite URL template is not a valid http(s) URL: {0}")]
    TemplateInvalidUrl(String),
}

#[derive(Clone, Debug)]
pub struct DexConfig {
    pub page_size: u32,
    pub sprite_url_template: String,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            sprite_url_template: SPRITE_URL_TEMPLATE.to_string(),
        }
    }
}

impl DexConfig {
    pub fn validate(&self) -> Result<(), DexConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(DexConfigError::PageSizeOutOfRange {
                got: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        if !self.sprite_url_template.contains(NUMBER_MARKER) {
            return Err(DexConfigError::TemplateMissingMarker(
                self.sprite_url_template.clone(),
            ));
        }
        let probe = self.sprite_url_template.replace(NUMBER_MARKER, "1");
        let parsed = Url::parse(&probe)
            .map_err(|_| DexConfigError::TemplateInvalidUrl(self.sprite_url_template.clone()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(DexConfigError::TemplateInvalidUrl(
                self.sprite_url_template.clone(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DexMetrics {
    pub pages_loaded: AtomicU64,
    pub load_failures: AtomicU64,
    pub duplicate_load_skips: AtomicU64,
    pub searches_run: AtomicU64,
    pub favorites_toggled: AtomicU64,
    pub details_loaded: AtomicU64,
}

impl DexMetrics {
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_loaded: self.pages_loaded.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            duplicate_load_skips: self.duplicate_load_skips.load(Ordering::Relaxed),
            searches_run: self.searches_run.load(Ordering::Relaxed),
            favorites_toggled: self.favorites_toggled.load(Ordering::Relaxed),
            details_loaded: self.details_loaded.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pages_loaded: u64,
    pub load_failures: u64,
    pub duplicate_load_skips: u64,
    pub searches_run: u64,
    pub favorites_toggled: u64,
    pub details_loaded: u64,
}

pub struct Dex<S> {
    source: Arc<S>,
    config: DexConfig,
    favorite_policy: Box<dyn FavoritePolicy>,
    state: RwLock<Arc<DexState>>,
    watch_tx: watch::Sender<Arc<DexState>>,
    metrics: Arc<DexMetrics>,
}

impl<S: CatalogSource> Dex<S> {
    pub fn new(source: Arc<S>, config: DexConfig) -> Result<Self, DexConfigError> {
        config.validate()?;
        let initial = Arc::new(DexState::new());
        let (watch_tx, _) = watch::channel(Arc::clone(&initial));
        Ok(Self {
            source,
            config,
            favorite_policy: Box::new(NeverFavorite),
            state: RwLock::new(initial),
            watch_tx,
            metrics: Arc::new(DexMetrics::default()),
        })
    }

    #[must_use]
    pub fn with_favorite_policy(mut self, policy: Box<dyn FavoritePolicy>) -> Self {
        self.favorite_policy = policy;
        self
    }

    /// The most recently published snapshot.
    pub async fn state(&self) -> Arc<DexState> {
        Arc::clone(&*self.state.read().await)
    }

    /// A receiver observing every snapshot replacement, including the
    /// loading-started snapshot published before a source call returns.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<DexState>> {
        self.watch_tx.subscribe()
    }

    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Loads the next page from the source.
    ///
    /// A no-op returning the current snapshot while a load is already in
    /// flight; the guard is what prevents duplicate requests for the same
    /// offset, not an optimization.
    #[instrument(skip(self))]
    pub async fn load_next_page(&self) -> Arc<DexState> {
        let offset;
        {
            let mut guard = self.state.write().await;
            if guard.is_loading {
                debug!("page load already in flight, skipping");
                self.metrics.duplicate_load_skips.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(&guard);
            }
            offset = guard.current_page * self.config.page_size;
            let next = Arc::new(state::loading_started(&guard));
            *guard = Arc::clone(&next);
            let _ = self.watch_tx.send_replace(next);
        }

        let result = self.source.fetch_page(self.config.page_size, offset).await;

        let mut guard = self.state.write().await;
        let next = match result.and_then(|page| {
            source::derive_entries(
                &page.entries,
                &self.config.sprite_url_template,
                self.favorite_policy.as_ref(),
            )
            .map(|entries| (entries, page.total_count))
        }) {
            Ok((entries, total_count)) => {
                self.metrics.pages_loaded.fetch_add(1, Ordering::Relaxed);
                info!(offset, count = entries.len(), total_count, "page loaded");
                state::page_applied(&guard, entries, total_count, self.config.page_size)
            }
            Err(err) => {
                self.metrics.load_failures.fetch_add(1, Ordering::Relaxed);
                warn!(offset, error = %err, "page load failed");
                state::load_failed(&guard, err.user_message())
            }
        };
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        let _ = self.watch_tx.send_replace(Arc::clone(&next));
        next
    }

    /// Fetches full detail for a named creature into `current_detail`.
    /// The name is case-normalized before hitting the source.
    #[instrument(skip(self))]
    pub async fn load_detail(&self, name: &str) -> Arc<DexState> {
        let normalized = name.to_lowercase();
        self.replace_state(state::loading_started).await;

        let result = self.source.fetch_detail(&normalized).await;

        match result {
            Ok(detail) => {
                self.metrics.details_loaded.fetch_add(1, Ordering::Relaxed);
                info!(name = %normalized, id = detail.id, "detail loaded");
                self.replace_state(|s| state::detail_applied(s, detail)).await
            }
            Err(err) => {
                self.metrics.load_failures.fetch_add(1, Ordering::Relaxed);
                warn!(name = %normalized, error = %err, "detail load failed");
                self.replace_state(|s| state::load_failed(s, err.user_message()))
                    .await
            }
        }
    }

    /// Filters the visible list; see [`state::searched`] for the rules.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Arc<DexState> {
        self.metrics.searches_run.fetch_add(1, Ordering::Relaxed);
        self.replace_state(|s| state::searched(s, term)).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, number: u32) -> Arc<DexState> {
        self.metrics.favorites_toggled.fetch_add(1, Ordering::Relaxed);
        self.replace_state(|s| state::favorite_toggled(s, number)).await
    }

    #[instrument(skip(self))]
    pub async fn toggle_favorites_only(&self) -> Arc<DexState> {
        self.replace_state(state::favorites_only_toggled).await
    }

    async fn replace_state(&self, f: impl FnOnce(&DexState) -> DexState) -> Arc<DexState> {
        let mut guard = self.state.write().await;
        let next = Arc::new(f(&guard));
        *guard = Arc::clone(&next);
        let _ = self.watch_tx.send_replace(Arc::clone(&next));
        next
    }
}
