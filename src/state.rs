//! Pure state transitions over [`DexState`].
//!
//! Every operation the orchestrator exposes is expressed here as a function
//! from one snapshot to the next, so each rule (the cache-promotion rule,
//! the shrink heuristic, the toggle-then-refilter composition) is auditable
//! and testable without any async machinery. The orchestrator in
//! [`crate::dex`] only decides *when* these run and publishes the results.

use crate::model::{CatalogEntry, CreatureDetail, DexState};

/// Marks a load as in flight. Published before the source call so observers
/// can show a spinner between the two phases.
#[must_use]
pub fn loading_started(state: &DexState) -> DexState {
    let mut next = state.clone();
    next.is_loading = true;
    next
}

/// Applies a successfully fetched page.
///
/// Entries are appended to both the unfiltered cache and the visible list;
/// an entry whose number is already cached is dropped, keeping numbers
/// unique under repeated loads. `end_reached` is recomputed against the
/// incremented page cursor and is sticky once true.
#[must_use]
pub fn page_applied(
    state: &DexState,
    new_entries: Vec<CatalogEntry>,
    total_count: u32,
    page_size: u32,
) -> DexState {
    let mut next = state.clone();
    for entry in new_entries {
        if next.cached_items.iter().any(|e| e.number == entry.number) {
            continue;
        }
        next.cached_items.push(entry.clone());
        next.items.push(entry);
    }
    next.current_page += 1;
    next.end_reached = next.end_reached
        || u64::from(next.current_page) * u64::from(page_size) >= u64::from(total_count);
    next.load_error.clear();
    next.is_loading = false;
    next
}

/// Records a failed load. The cache and page cursor are untouched so a
/// retry re-requests the same page.
#[must_use]
pub fn load_failed(state: &DexState, message: impl Into<String>) -> DexState {
    let mut next = state.clone();
    next.load_error = message.into();
    next.is_loading = false;
    next
}

/// Stores a fetched creature detail.
#[must_use]
pub fn detail_applied(state: &DexState, detail: CreatureDetail) -> DexState {
    let mut next = state.clone();
    next.current_detail = Some(detail);
    next.load_error.clear();
    next.is_loading = false;
    next
}

/// Applies a search term over the current snapshot.
///
/// Order matters:
/// 1. Cache promotion: if the visible list has outgrown the cache (pages
///    landed while a narrowed filter was active), refresh the cache from it
///    so new entries participate in this and later searches.
/// 2. Shrink heuristic: a term no longer than the previous one means the
///    user is erasing; reset the visible list to the full cache before
///    filtering, since filtering otherwise narrows the previous result.
/// 3. An empty term with the favorites filter off restores the full list.
/// 4. Otherwise filter the visible list by case-insensitive substring,
///    and by favorite flag when favorites-only is on.
#[must_use]
pub fn searched(state: &DexState, term: &str) -> DexState {
    let mut next = state.clone();

    if next.items.len() > next.cached_items.len() {
        next.cached_items = next.items.clone();
    }

    if term.len() <= next.last_search_term.len() {
        next.items = next.cached_items.clone();
    }

    next.last_search_term = term.to_string();

    if term.is_empty() && !next.favorites_only {
        next.items = next.cached_items.clone();
        return next;
    }

    let needle = term.to_lowercase();
    let favorites_only = next.favorites_only;
    next.items.retain(|entry| {
        entry.name.to_lowercase().contains(&needle) && (!favorites_only || entry.favorite)
    });
    next
}

/// Flips the favorite flag on the entry with the given number in both the
/// visible list and the cache. Unknown numbers are a no-op. When the
/// favorites filter is active the search is re-applied so the change is
/// visible immediately.
#[must_use]
pub fn favorite_toggled(state: &DexState, number: u32) -> DexState {
    let mut next = state.clone();
    flip(&mut next.items, number);
    flip(&mut next.cached_items, number);
    if next.favorites_only {
        let term = next.last_search_term.clone();
        next = searched(&next, &term);
    }
    next
}

/// Flips the favorites-only filter and re-applies the unchanged term.
#[must_use]
pub fn favorites_only_toggled(state: &DexState) -> DexState {
    let mut next = state.clone();
    next.favorites_only = !next.favorites_only;
    let term = next.last_search_term.clone();
    searched(&next, &term)
}

fn flip(entries: &mut [CatalogEntry], number: u32) {
    if let Some(entry) = entries.iter_mut().find(|e| e.number == number) {
        entry.favorite = !entry.favorite;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(number: u32, name: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.into(),
            image_url: format!("https://sprites.test/{number}.png"),
            number,
            favorite: false,
        }
    }

    fn starters() -> Vec<CatalogEntry> {
        vec![
            entry(1, "Bulbasaur"),
            entry(4, "Charmander"),
            entry(5, "Charmeleon"),
            entry(6, "Charizard"),
            entry(7, "Squirtle"),
        ]
    }

    fn loaded_state() -> DexState {
        page_applied(&DexState::new(), starters(), 5, 20)
    }

    fn numbers(entries: &[CatalogEntry]) -> Vec<u32> {
        entries.iter().map(|e| e.number).collect()
    }

    #[test]
    fn page_applied_fills_both_lists() {
        let state = loaded_state();
        assert_eq!(state.items.len(), 5);
        assert_eq!(state.cached_items.len(), 5);
        assert_eq!(state.current_page, 1);
        assert!(state.end_reached);
        assert!(!state.is_loading);
        assert!(state.load_error.is_empty());
    }

    #[test]
    fn page_applied_end_reached_per_page_math() {
        let first = page_applied(&DexState::new(), starters(), 40, 20);
        assert!(!first.end_reached);
        assert_eq!(first.current_page, 1);

        let second = page_applied(&first, vec![entry(25, "Pikachu")], 40, 20);
        assert!(second.end_reached);
        assert_eq!(second.current_page, 2);
    }

    #[test]
    fn end_reached_never_reverts() {
        let state = loaded_state();
        assert!(state.end_reached);
        // A later page report with a larger count must not clear the flag.
        let again = page_applied(&state, vec![entry(99, "Later")], 1000, 20);
        assert!(again.end_reached);
    }

    #[test]
    fn page_applied_skips_duplicate_numbers() {
        let state = loaded_state();
        let again = page_applied(&state, starters(), 5, 20);
        assert_eq!(again.cached_items.len(), 5);
        assert_eq!(again.items.len(), 5);
    }

    #[test]
    fn load_failed_preserves_cache_and_cursor() {
        let state = loaded_state();
        let failed = load_failed(&state, "connection reset");
        assert_eq!(failed.load_error, "connection reset");
        assert_eq!(failed.cached_items, state.cached_items);
        assert_eq!(failed.current_page, state.current_page);
        assert!(!failed.is_loading);
    }

    #[test]
    fn empty_search_restores_full_list() {
        let state = searched(&loaded_state(), "char");
        assert_eq!(state.items.len(), 3);

        let restored = searched(&state, "");
        assert_eq!(numbers(&restored.items), numbers(&restored.cached_items));
    }

    #[test]
    fn search_is_case_insensitive() {
        let state = searched(&loaded_state(), "CHAR");
        assert_eq!(numbers(&state.items), vec![4, 5, 6]);
        assert_eq!(state.last_search_term, "CHAR");
    }

    #[test]
    fn shrinking_term_refilters_from_cache() {
        let state = loaded_state();
        let narrow = searched(&state, "charir");
        assert!(narrow.items.is_empty());

        // Erasing back to a broader term must not filter the empty result.
        let broad = searched(&narrow, "char");
        let fresh = searched(&state, "char");
        assert_eq!(numbers(&broad.items), numbers(&fresh.items));
    }

    #[test]
    fn growing_term_narrows_previous_result() {
        let state = searched(&loaded_state(), "char");
        let narrower = searched(&state, "chari");
        assert_eq!(numbers(&narrower.items), vec![6]);
    }

    #[test]
    fn cache_promotion_picks_up_new_pages() {
        // Narrow the view, then land a new page, then search again: the new
        // entry must be searchable.
        let state = searched(&loaded_state(), "char");
        let with_new_page = page_applied(&state, vec![entry(152, "Chikorita")], 6, 20);
        let results = searched(&with_new_page, "chik");
        assert_eq!(numbers(&results.items), vec![152]);
        assert!(with_new_page.cached_items.iter().any(|e| e.number == 152));
    }

    #[test]
    fn toggle_favorite_flips_in_both_lists() {
        let state = favorite_toggled(&loaded_state(), 6);
        assert!(state.items.iter().find(|e| e.number == 6).unwrap().favorite);
        assert!(state.cached_items.iter().find(|e| e.number == 6).unwrap().favorite);
    }

    #[test]
    fn toggle_favorite_twice_is_identity() {
        let state = loaded_state();
        let twice = favorite_toggled(&favorite_toggled(&state, 6), 6);
        assert_eq!(twice.items, state.items);
        assert_eq!(twice.cached_items, state.cached_items);
    }

    #[test]
    fn toggle_favorite_unknown_number_is_noop() {
        let state = loaded_state();
        let next = favorite_toggled(&state, 9999);
        assert_eq!(next.items, state.items);
    }

    #[test]
    fn unfavoriting_disappears_under_favorites_filter() {
        let state = favorite_toggled(&loaded_state(), 6);
        let filtered = favorites_only_toggled(&state);
        assert_eq!(numbers(&filtered.items), vec![6]);

        let cleared = favorite_toggled(&filtered, 6);
        assert!(cleared.items.is_empty());
        // The cache still holds everything.
        assert_eq!(cleared.cached_items.len(), 5);
    }

    #[test]
    fn favorites_filter_respects_search_term() {
        let state = favorite_toggled(&favorite_toggled(&loaded_state(), 1), 6);
        let searched_state = searched(&state, "char");
        let filtered = favorites_only_toggled(&searched_state);
        assert_eq!(numbers(&filtered.items), vec![6]);
    }

    #[test]
    fn favorites_only_toggle_off_restores_list() {
        let on = favorites_only_toggled(&loaded_state());
        assert!(on.favorites_only);
        assert!(on.items.is_empty());

        let off = favorites_only_toggled(&on);
        assert!(!off.favorites_only);
        assert_eq!(off.items.len(), 5);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Load(Vec<u32>),
        Search(String),
        ToggleFavorite(u32),
        ToggleFavoritesOnly,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop::collection::vec(1u32..300, 0..10).prop_map(Op::Load),
            "[a-e]{0,4}".prop_map(Op::Search),
            (1u32..300).prop_map(Op::ToggleFavorite),
            Just(Op::ToggleFavoritesOnly),
        ]
    }

    fn apply(state: &DexState, op: &Op) -> DexState {
        match op {
            Op::Load(nums) => {
                let entries = nums
                    .iter()
                    .map(|n| entry(*n, &format!("Creature-{n}")))
                    .collect();
                page_applied(state, entries, 300, 20)
            }
            Op::Search(term) => searched(state, term),
            Op::ToggleFavorite(n) => favorite_toggled(state, *n),
            Op::ToggleFavoritesOnly => favorites_only_toggled(state),
        }
    }

    proptest! {
        #[test]
        fn invariants_hold_over_any_op_sequence(
            ops in prop::collection::vec(op_strategy(), 1..25)
        ) {
            let mut state = DexState::new();
            for op in &ops {
                let prev_cached = state.cached_items.len();
                state = apply(&state, op);

                // Cache is append-only.
                prop_assert!(state.cached_items.len() >= prev_cached);
                // The visible list never outgrows the cache.
                prop_assert!(state.items.len() <= state.cached_items.len());
                // Numbers stay unique in the cache.
                let mut nums = numbers(&state.cached_items);
                nums.sort_unstable();
                let len_before = nums.len();
                nums.dedup();
                prop_assert_eq!(nums.len(), len_before);
            }
        }

        #[test]
        fn double_toggle_is_identity_anywhere(
            ops in prop::collection::vec(op_strategy(), 0..10),
            number in 1u32..300,
        ) {
            let mut state = DexState::new();
            for op in &ops {
                state = apply(&state, op);
            }
            // Skip states where the favorites filter would re-run the
            // search and legitimately change the visible list.
            prop_assume!(!state.favorites_only);
            let twice = favorite_toggled(&favorite_toggled(&state, number), number);
            prop_assert_eq!(&twice.items, &state.items);
            prop_assert_eq!(&twice.cached_items, &state.cached_items);
        }
    }
}
