use crate::{Catalog, RngState, SymbolSide};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// The symbol filter is fixed-arity: exactly this many symbols make a
/// valid query.
pub const REQUIRED_SYMBOL_COUNT: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no cards selected")]
    EmptySelection,
    #[error("expected {expected} symbols, got {got}")]
    SymbolCount { expected: usize, got: usize },
    #[error("no symbol side chosen")]
    NoSideChosen,
    #[error("no initials chosen")]
    NoInitials,
    #[error("no cards match the filter")]
    NoMatches,
    #[error("no cards left to add")]
    NoCandidates,
}

/// Result of a random augmentation. `added < requested` means the
/// candidate pools ran out; the caller surfaces that as a non-blocking
/// notice while keeping the partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Augmented {
    pub requested: usize,
    pub added: usize,
}

impl Augmented {
    pub fn is_partial(&self) -> bool {
        self.added < self.requested
    }
}

/// Which card numbers are in play, plus the subset that got there via
/// random augmentation (kept only for visual marking). Invariant:
/// `manual` is always a subset of `selected`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<i32>,
    manual: BTreeSet<i32>,
}

impl SelectionState {
    pub fn full(catalog: &Catalog) -> Self {
        Self {
            selected: catalog.numbers().into_iter().collect(),
            manual: BTreeSet::new(),
        }
    }

    pub fn from_parts<I, J>(selected: I, manual: J) -> Self
    where
        I: IntoIterator<Item = i32>,
        J: IntoIterator<Item = i32>,
    {
        let selected: BTreeSet<i32> = selected.into_iter().collect();
        let manual = manual
            .into_iter()
            .filter(|no| selected.contains(no))
            .collect();
        Self { selected, manual }
    }

    pub fn selected(&self) -> &BTreeSet<i32> {
        &self.selected
    }

    pub fn manual(&self) -> &BTreeSet<i32> {
        &self.manual
    }

    pub fn contains(&self, no: i32) -> bool {
        self.selected.contains(&no)
    }

    pub fn is_manual(&self, no: i32) -> bool {
        self.manual.contains(&no)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn select_all(&mut self, catalog: &Catalog) {
        self.selected = catalog.numbers().into_iter().collect();
        self.manual.clear();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
        self.manual.clear();
    }

    pub fn toggle(&mut self, no: i32) {
        if self.selected.remove(&no) {
            self.manual.remove(&no);
        } else {
            self.selected.insert(no);
        }
    }

    /// Replaces the selection with every base card whose symbol on
    /// `side` is one of `symbols`. Exactly [`REQUIRED_SYMBOL_COUNT`]
    /// symbols are required.
    pub fn filter_by_symbols(
        &mut self,
        catalog: &Catalog,
        side: SymbolSide,
        symbols: &[char],
    ) -> Result<(), SelectionError> {
        if symbols.len() != REQUIRED_SYMBOL_COUNT {
            return Err(SelectionError::SymbolCount {
                expected: REQUIRED_SYMBOL_COUNT,
                got: symbols.len(),
            });
        }
        let matches: BTreeSet<i32> = catalog
            .base()
            .iter()
            .filter(|card| {
                card.symbol(side)
                    .map_or(false, |symbol| symbols.contains(&symbol))
            })
            .map(|card| card.no)
            .collect();
        if matches.is_empty() {
            return Err(SelectionError::NoMatches);
        }
        self.selected = matches;
        self.manual.clear();
        Ok(())
    }

    /// Replaces the selection with every base card whose initial is in
    /// `initials`.
    pub fn filter_by_initials(
        &mut self,
        catalog: &Catalog,
        initials: &[char],
    ) -> Result<(), SelectionError> {
        if initials.is_empty() {
            return Err(SelectionError::NoInitials);
        }
        let matches: BTreeSet<i32> = catalog
            .base()
            .iter()
            .filter(|card| card.initial.map_or(false, |ch| initials.contains(&ch)))
            .map(|card| card.no)
            .collect();
        if matches.is_empty() {
            return Err(SelectionError::NoMatches);
        }
        self.selected = matches;
        self.manual.clear();
        Ok(())
    }

    /// Adds up to `count` randomly chosen cards and marks them manual.
    /// Previous random additions are removed first, so repeated calls
    /// replace rather than stack. Candidates sharing an initial with an
    /// already-selected card are drawn before any others; both pools
    /// are shuffled so the slice carries no positional bias.
    pub fn augment_randomly(
        &mut self,
        catalog: &Catalog,
        count: usize,
        rng: &mut RngState,
    ) -> Result<Augmented, SelectionError> {
        if count == 0 {
            return Ok(Augmented {
                requested: 0,
                added: 0,
            });
        }
        for no in std::mem::take(&mut self.manual) {
            self.selected.remove(&no);
        }

        let initials: BTreeSet<char> = self
            .selected
            .iter()
            .filter_map(|no| catalog.get(*no))
            .filter_map(|card| card.initial)
            .collect();

        let mut preferred = Vec::new();
        let mut fallback = Vec::new();
        for card in catalog.base() {
            if self.selected.contains(&card.no) {
                continue;
            }
            if card.initial.map_or(false, |ch| initials.contains(&ch)) {
                preferred.push(card.no);
            } else {
                fallback.push(card.no);
            }
        }

        let total = preferred.len() + fallback.len();
        if total == 0 {
            return Err(SelectionError::NoCandidates);
        }
        rng.shuffle(&mut preferred);
        rng.shuffle(&mut fallback);

        let added = count.min(total);
        for no in preferred.into_iter().chain(fallback).take(added) {
            self.selected.insert(no);
            self.manual.insert(no);
        }
        Ok(Augmented {
            requested: count,
            added,
        })
    }

    /// Drops manual marks for cards no longer selected. Run after any
    /// wholesale replacement of the selection.
    pub fn retain_manual(&mut self) {
        let selected = &self.selected;
        self.manual.retain(|no| selected.contains(no));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Card;

    fn card(no: i32, initial: char, left: char) -> Card {
        Card {
            no,
            kaminoku: format!("kami {no}"),
            shimonoku: format!("shimo {no}"),
            kimariji: String::new(),
            initial: Some(initial),
            left: Some(left),
            center: None,
            right: None,
        }
    }

    fn sentinel(no: i32) -> Card {
        Card {
            no,
            kaminoku: "序".into(),
            shimonoku: "序".into(),
            kimariji: String::new(),
            initial: None,
            left: None,
            center: None,
            right: None,
        }
    }

    fn catalog() -> Catalog {
        let mut cards = vec![sentinel(0), sentinel(-1)];
        // 1-4 share the あ initial, 5-8 are き, 9-12 are む.
        for no in 1..=12 {
            let initial = match (no - 1) / 4 {
                0 => 'あ',
                1 => 'き',
                _ => 'む',
            };
            let left = if no % 2 == 0 { 'ア' } else { 'イ' };
            cards.push(card(no, initial, left));
        }
        cards.push(sentinel(101));
        Catalog::from_cards(cards).expect("catalog")
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut state = SelectionState::default();
        state.toggle(3);
        assert!(state.contains(3));
        state.toggle(3);
        assert!(!state.contains(3));
    }

    #[test]
    fn toggle_off_drops_manual_mark() {
        let mut state = SelectionState::from_parts([1, 2], [2]);
        assert!(state.is_manual(2));
        state.toggle(2);
        assert!(!state.contains(2));
        assert!(!state.is_manual(2));
    }

    #[test]
    fn symbol_filter_requires_exactly_five() {
        let catalog = catalog();
        let mut state = SelectionState::full(&catalog);
        let err = state
            .filter_by_symbols(&catalog, SymbolSide::Left, &['ア', 'イ'])
            .unwrap_err();
        assert_eq!(
            err,
            SelectionError::SymbolCount {
                expected: 5,
                got: 2
            }
        );
        // A failed filter leaves the selection untouched.
        assert_eq!(state.len(), 12);
    }

    #[test]
    fn symbol_filter_replaces_selection() {
        let catalog = catalog();
        let mut state = SelectionState::from_parts([1], [1]);
        state
            .filter_by_symbols(&catalog, SymbolSide::Left, &['ア', 'ウ', 'エ', 'オ', 'カ'])
            .expect("filter");
        let even: Vec<i32> = state.selected().iter().copied().collect();
        assert_eq!(even, vec![2, 4, 6, 8, 10, 12]);
        assert!(state.manual().is_empty());
    }

    #[test]
    fn symbol_filter_with_no_matches_errors() {
        let catalog = catalog();
        let mut state = SelectionState::full(&catalog);
        let err = state
            .filter_by_symbols(&catalog, SymbolSide::Center, &['ア', 'イ', 'ウ', 'エ', 'オ'])
            .unwrap_err();
        assert_eq!(err, SelectionError::NoMatches);
    }

    #[test]
    fn initial_filter_requires_a_choice() {
        let catalog = catalog();
        let mut state = SelectionState::full(&catalog);
        assert_eq!(
            state.filter_by_initials(&catalog, &[]).unwrap_err(),
            SelectionError::NoInitials
        );
        assert_eq!(
            state.filter_by_initials(&catalog, &['ん']).unwrap_err(),
            SelectionError::NoMatches
        );
    }

    #[test]
    fn initial_filter_replaces_selection() {
        let catalog = catalog();
        let mut state = SelectionState::from_parts([9, 10], [10]);
        state
            .filter_by_initials(&catalog, &['あ', 'き'])
            .expect("filter");
        let selected: Vec<i32> = state.selected().iter().copied().collect();
        assert_eq!(selected, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(state.manual().is_empty());
    }

    #[test]
    fn augment_marks_additions_manual() {
        let catalog = catalog();
        let mut rng = RngState::from_seed(7);
        let mut state = SelectionState::from_parts([1, 2], []);
        let outcome = state.augment_randomly(&catalog, 3, &mut rng).expect("augment");
        assert_eq!(outcome, Augmented { requested: 3, added: 3 });
        assert_eq!(state.len(), 5);
        assert_eq!(state.manual().len(), 3);
        for no in state.manual() {
            assert!(state.contains(*no));
            assert!(![1, 2].contains(no));
        }
    }

    #[test]
    fn augment_prefers_shared_initials() {
        let catalog = catalog();
        let mut rng = RngState::from_seed(11);
        // あ cards 1 and 2 selected; 3 and 4 are the preferred pool.
        let mut state = SelectionState::from_parts([1, 2], []);
        state.augment_randomly(&catalog, 2, &mut rng).expect("augment");
        let manual: Vec<i32> = state.manual().iter().copied().collect();
        assert_eq!(manual, vec![3, 4]);
    }

    #[test]
    fn augment_replaces_previous_additions() {
        let catalog = catalog();
        let mut rng = RngState::from_seed(3);
        let mut state = SelectionState::from_parts([1, 2], []);
        state.augment_randomly(&catalog, 2, &mut rng).expect("first");
        let first: Vec<i32> = state.manual().iter().copied().collect();
        assert_eq!(first.len(), 2);
        state.augment_randomly(&catalog, 3, &mut rng).expect("second");
        assert_eq!(state.manual().len(), 3);
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn augment_partial_when_pool_runs_dry() {
        let catalog = catalog();
        let mut rng = RngState::from_seed(5);
        let mut state = SelectionState::from_parts(1..=10, []);
        let outcome = state.augment_randomly(&catalog, 6, &mut rng).expect("augment");
        assert!(outcome.is_partial());
        assert_eq!(outcome.added, 2);
        assert_eq!(state.len(), 12);
    }

    #[test]
    fn augment_with_no_candidates_errors() {
        let catalog = catalog();
        let mut rng = RngState::from_seed(5);
        let mut state = SelectionState::full(&catalog);
        assert_eq!(
            state.augment_randomly(&catalog, 1, &mut rng).unwrap_err(),
            SelectionError::NoCandidates
        );
        assert_eq!(state.len(), 12);
    }

    #[test]
    fn augment_zero_is_a_noop() {
        let catalog = catalog();
        let mut rng = RngState::from_seed(5);
        let mut state = SelectionState::from_parts([1], [1]);
        let outcome = state.augment_randomly(&catalog, 0, &mut rng).expect("noop");
        assert_eq!(outcome.added, 0);
        assert!(state.is_manual(1));
    }

    #[test]
    fn from_parts_enforces_manual_subset() {
        let state = SelectionState::from_parts([1, 2], [2, 99]);
        assert!(state.is_manual(2));
        assert!(!state.is_manual(99));
    }
}
