//! Shared core for a creature-catalog mobile client.
//!
//! The crate owns the client-side state machine: incremental pagination
//! over a remote catalog, an in-memory favorites/search cache, and detail
//! loading, all published as immutable [`model::DexState`] snapshots. The
//! rendering shell and the HTTP transport live on the other side of the
//! [`source::CatalogSource`] seam.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod dex;
pub mod display;
pub mod model;
pub mod parse;
pub mod source;
pub mod state;

pub use dex::{Dex, DexConfig, DexConfigError, DexMetrics, MetricsSnapshot};
pub use model::{CatalogEntry, CreatureDetail, DexState, LoadPhase, SpriteSet, StatValue};
pub use source::{
    CatalogError, CatalogPage, CatalogSource, FavoritePolicy, NeverFavorite, RandomizedFavorites,
    RawEntry,
};

/// Entries requested per page.
pub const PAGE_SIZE: u32 = 20;

/// Upper bound a config may raise the page size to.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Substitution marker in [`SPRITE_URL_TEMPLATE`].
pub const NUMBER_MARKER: &str = "{number}";

/// Template the per-entry image URL is synthesized from.
pub const SPRITE_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{number}.png";
