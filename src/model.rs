use serde::{Deserialize, Serialize};

/// One listed creature record. Identity is the `number`; the display name
/// may be reformatted without changing identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub image_url: String,
    pub number: u32,
    pub favorite: bool,
}

/// A named base-stat value from the detail payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub value: u32,
}

impl StatValue {
    #[must_use]
    pub fn abbreviation(&self) -> &'static str {
        crate::display::stat_abbr(&self.name)
    }
}

/// Sprite URLs for a creature, any of which may be absent upstream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    pub front_female: Option<String>,
    pub front_shiny: Option<String>,
    pub front_shiny_female: Option<String>,
    pub back_default: Option<String>,
    pub back_female: Option<String>,
    pub back_shiny: Option<String>,
    pub back_shiny_female: Option<String>,
}

impl SpriteSet {
    /// Preferred front sprite: default, then female, then shiny variants.
    #[must_use]
    pub fn front(&self) -> Option<&str> {
        self.front_default
            .as_deref()
            .or(self.front_female.as_deref())
            .or(self.front_shiny.as_deref())
            .or(self.front_shiny_female.as_deref())
    }

    /// Preferred back sprite, same ordering as [`SpriteSet::front`].
    #[must_use]
    pub fn back(&self) -> Option<&str> {
        self.back_default
            .as_deref()
            .or(self.back_female.as_deref())
            .or(self.back_shiny.as_deref())
            .or(self.back_shiny_female.as_deref())
    }
}

/// Full detail for a single creature. Height and weight arrive in the
/// source's native small-integer units (decimeters and hectograms) and are
/// scaled by 10 for metric display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureDetail {
    pub id: u32,
    pub name: String,
    pub base_experience: u32,
    pub height: u32,
    pub weight: u32,
    pub ability_count: usize,
    pub stats: Vec<StatValue>,
    pub sprites: SpriteSet,
}

impl CreatureDetail {
    #[must_use]
    pub fn height_meters(&self) -> f32 {
        self.height as f32 / 10.0
    }

    #[must_use]
    pub fn weight_kg(&self) -> f32 {
        self.weight as f32 / 10.0
    }

    /// Metric height for display, without a trailing `.0`.
    #[must_use]
    pub fn height_display(&self) -> String {
        crate::display::format_decimal(self.height_meters())
    }

    /// Metric weight for display, without a trailing `.0`.
    #[must_use]
    pub fn weight_display(&self) -> String {
        crate::display::format_decimal(self.weight_kg())
    }

    #[must_use]
    pub fn weight_imperial_display(&self) -> String {
        crate::display::kg_to_lb(self.weight_kg())
    }

    #[must_use]
    pub fn height_imperial_display(&self) -> String {
        crate::display::meters_to_feet_inches(self.height_meters())
    }
}

/// Load-state machine the orchestrator moves through. `search` and the
/// favorite toggles never transition it; only page/detail loads do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPhase {
    Idle,
    Loading,
    Error,
}

/// Immutable client-state snapshot. Operations replace it wholesale; a
/// reader never observes a partially updated snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DexState {
    /// Currently displayed (post-filter) entries.
    pub items: Vec<CatalogEntry>,
    /// Full unfiltered paginated list; superset of `items` by number.
    pub cached_items: Vec<CatalogEntry>,
    pub current_detail: Option<CreatureDetail>,
    pub last_search_term: String,
    pub favorites_only: bool,
    pub is_loading: bool,
    /// Empty string means no error.
    pub load_error: String,
    /// True once the source has no further pages; never reverts.
    pub end_reached: bool,
    /// Next page index to request.
    pub current_page: u32,
}

impl DexState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cached_items: Vec::new(),
            current_detail: None,
            last_search_term: String::new(),
            favorites_only: false,
            is_loading: false,
            load_error: String::new(),
            end_reached: false,
            current_page: 0,
        }
    }

    #[must_use]
    pub fn load_phase(&self) -> LoadPhase {
        if self.is_loading {
            LoadPhase::Loading
        } else if self.load_error.is_empty() {
            LoadPhase::Idle
        } else {
            LoadPhase::Error
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.load_error.is_empty()
    }
}

impl Default for DexState {
    fn default() -> Self {
        Self::new()
    }
}
