//! The Catalog Source collaborator seam.
//!
//! Transport (HTTP client, connection pooling, response decoding) lives
//! behind [`CatalogSource`] in the platform shell; the core only sees pages
//! of named references and creature details, and collapses every failure
//! into a user-facing message at the state boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{CatalogEntry, CreatureDetail};
use crate::parse;

/// One raw list record: a name plus the reference URL carrying the number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    #[serde(rename = "url")]
    pub reference_url: String,
}

/// A page of the catalog as reported by the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(rename = "count")]
    pub total_count: u32,
    #[serde(rename = "results")]
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("no catalog entry named '{0}'")]
    NotFound(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// The message stored in `DexState::load_error`. No structured error
    /// crosses the core boundary.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Unable to reach the catalog. Check your connection and try again.".into()
            }
            Self::NotFound(name) => format!("'{name}' was not found in the catalog."),
            Self::Decode(_) => "The catalog returned something unexpected. Try again.".into(),
        }
    }
}

/// Supplies catalog pages and creature details. Implemented by the
/// platform shell over its HTTP stack; implemented by fixtures in tests.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<CatalogPage, CatalogError>;

    /// `name` is already lowercased by the orchestrator.
    async fn fetch_detail(&self, name: &str) -> Result<CreatureDetail, CatalogError>;
}

/// Decides the favorite flag for a freshly loaded entry.
///
/// The upstream app flipped a coin per entry, which reads as demo behavior;
/// the default here is to never pre-favorite, with the coin flip available
/// as an explicit opt-in.
pub trait FavoritePolicy: Send + Sync {
    fn initial_favorite(&self, number: u32) -> bool;
}

/// Default policy: entries start unfavorited.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverFavorite;

impl FavoritePolicy for NeverFavorite {
    fn initial_favorite(&self, _number: u32) -> bool {
        false
    }
}

/// Coin-flip policy matching the original demo behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomizedFavorites;

impl FavoritePolicy for RandomizedFavorites {
    fn initial_favorite(&self, _number: u32) -> bool {
        rand::random()
    }
}

/// Derives display-ready catalog entries from a page of raw records.
///
/// A record whose reference URL carries no trailing number is a malformed
/// response; the whole page is rejected rather than silently renumbered.
pub fn derive_entries(
    raw: &[RawEntry],
    sprite_template: &str,
    policy: &dyn FavoritePolicy,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut entries = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(number) = parse::entry_number(&record.reference_url) else {
            warn!(url = %record.reference_url, "reference URL has no trailing number");
            return Err(CatalogError::Decode(format!(
                "no numeric identifier in reference URL '{}'",
                record.reference_url
            )));
        };
        entries.push(CatalogEntry {
            name: parse::title_case(&record.name),
            image_url: parse::sprite_url(sprite_template, number),
            number,
            favorite: policy.initial_favorite(number),
        });
    }
    Ok(entries)
}
