use crate::{
    Augmented, Catalog, Cursor, ReadingCard, ReadingSequence, RngState, SelectionError,
    SelectionState, Snapshot, SymbolSide, SNAPSHOT_VERSION,
};
use serde::Serialize;

/// Every user-facing entry point, as data. The shell parses input into
/// one of these and hands it to [`Session::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenDraft,
    CancelDraft,
    SelectAll,
    SelectNone,
    Toggle(i32),
    FilterBySymbols { side: SymbolSide, symbols: Vec<char> },
    FilterByInitials(Vec<char>),
    AugmentRandomly(usize),
    CommitSettings,
    Shuffle,
    Advance,
    Retreat,
}

/// What a successfully applied command reports back. `Noop` covers
/// draft-less edits and cursor moves already at a bound; `Augmented`
/// may carry a partial fulfillment the shell should mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Noop,
    Augmented(Augmented),
}

/// Card pair and counts the render shell needs after any mutation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub current: Option<ReadingCard>,
    pub lookahead: Option<ReadingCard>,
    pub playable_count: usize,
    pub selected_count: usize,
    pub draft_open: bool,
    pub cards: Vec<CardRow>,
}

/// Per-card flags for list rendering.
#[derive(Debug, Clone, Serialize)]
pub struct CardRow {
    pub no: i32,
    pub kimariji: String,
    pub selected: bool,
    pub manual: bool,
}

/// The whole session: committed selection, playable order, built
/// sequence, cursor and the optional draft a settings flow edits.
/// All mutation goes through the methods below; nothing here does IO.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    committed: SelectionState,
    draft: Option<SelectionState>,
    order: Vec<i32>,
    sequence: ReadingSequence,
    cursor: Cursor,
    rng: RngState,
}

impl Session {
    /// Starts from the default state: everything selected, freshly
    /// shuffled.
    pub fn new(catalog: Catalog, rng: RngState) -> Self {
        let committed = SelectionState::full(&catalog);
        let mut session = Self {
            catalog,
            committed,
            draft: None,
            order: Vec::new(),
            sequence: ReadingSequence::default(),
            cursor: Cursor::default(),
            rng,
        };
        session.shuffle_current_selection();
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn order(&self) -> &[i32] {
        &self.order
    }

    pub fn committed(&self) -> &SelectionState {
        &self.committed
    }

    pub fn draft(&self) -> Option<&SelectionState> {
        self.draft.as_ref()
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome, SelectionError> {
        match command {
            Command::OpenDraft => Ok(self.open_draft()),
            Command::CancelDraft => Ok(self.cancel_draft()),
            Command::SelectAll => Ok(self.select_all()),
            Command::SelectNone => Ok(self.select_none()),
            Command::Toggle(no) => Ok(self.toggle(no)),
            Command::FilterBySymbols { side, symbols } => self.filter_by_symbols(side, &symbols),
            Command::FilterByInitials(initials) => self.filter_by_initials(&initials),
            Command::AugmentRandomly(count) => self.augment_randomly(count),
            Command::CommitSettings => self.commit_settings(),
            Command::Shuffle => self.shuffle(),
            Command::Advance => Ok(self.advance()),
            Command::Retreat => Ok(self.retreat()),
        }
    }

    /// Opens an editing draft seeded from the committed state. Reopening
    /// restarts the draft from the committed state again.
    pub fn open_draft(&mut self) -> Outcome {
        self.draft = Some(self.committed.clone());
        Outcome::Applied
    }

    /// Discards the draft; committed state was never touched.
    pub fn cancel_draft(&mut self) -> Outcome {
        match self.draft.take() {
            Some(_) => Outcome::Applied,
            None => Outcome::Noop,
        }
    }

    pub fn select_all(&mut self) -> Outcome {
        let Some(draft) = self.draft.as_mut() else {
            return Outcome::Noop;
        };
        draft.select_all(&self.catalog);
        Outcome::Applied
    }

    pub fn select_none(&mut self) -> Outcome {
        let Some(draft) = self.draft.as_mut() else {
            return Outcome::Noop;
        };
        draft.select_none();
        Outcome::Applied
    }

    pub fn toggle(&mut self, no: i32) -> Outcome {
        let Some(draft) = self.draft.as_mut() else {
            return Outcome::Noop;
        };
        draft.toggle(no);
        Outcome::Applied
    }

    pub fn filter_by_symbols(
        &mut self,
        side: SymbolSide,
        symbols: &[char],
    ) -> Result<Outcome, SelectionError> {
        let Some(draft) = self.draft.as_mut() else {
            return Ok(Outcome::Noop);
        };
        draft.filter_by_symbols(&self.catalog, side, symbols)?;
        Ok(Outcome::Applied)
    }

    pub fn filter_by_initials(&mut self, initials: &[char]) -> Result<Outcome, SelectionError> {
        let Some(draft) = self.draft.as_mut() else {
            return Ok(Outcome::Noop);
        };
        draft.filter_by_initials(&self.catalog, initials)?;
        Ok(Outcome::Applied)
    }

    pub fn augment_randomly(&mut self, count: usize) -> Result<Outcome, SelectionError> {
        let Some(draft) = self.draft.as_mut() else {
            return Ok(Outcome::Noop);
        };
        let augmented = draft.augment_randomly(&self.catalog, count, &mut self.rng)?;
        Ok(Outcome::Augmented(augmented))
    }

    /// Promotes the draft to the committed selection and reshuffles.
    /// An empty draft is a blocking error and keeps the draft open.
    pub fn commit_settings(&mut self) -> Result<Outcome, SelectionError> {
        match self.draft.as_ref() {
            None => Ok(Outcome::Noop),
            Some(draft) if draft.is_empty() => Err(SelectionError::EmptySelection),
            Some(_) => {
                let mut committed = self.draft.take().unwrap_or_default();
                committed.retain_manual();
                self.committed = committed;
                self.shuffle_current_selection();
                Ok(Outcome::Applied)
            }
        }
    }

    /// Reshuffles the committed selection into a new playable order and
    /// rewinds to the start.
    pub fn shuffle(&mut self) -> Result<Outcome, SelectionError> {
        if self.committed.is_empty() {
            return Err(SelectionError::EmptySelection);
        }
        self.shuffle_current_selection();
        Ok(Outcome::Applied)
    }

    pub fn advance(&mut self) -> Outcome {
        if self.cursor.advance() {
            Outcome::Applied
        } else {
            Outcome::Noop
        }
    }

    pub fn retreat(&mut self) -> Outcome {
        if self.cursor.retreat() {
            Outcome::Applied
        } else {
            Outcome::Noop
        }
    }

    /// Snapshot of everything worth persisting.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            current_index: self.cursor.index(),
            order: self.order.clone(),
            selected_card_numbers: self.committed.selected().iter().copied().collect(),
            manual_addition_numbers: self.committed.manual().iter().copied().collect(),
        }
    }

    /// Restores a validated snapshot, re-deriving every invariant:
    /// selection filtered to catalog members, manual marks to the
    /// selection, order to the selection (an emptied order falls back
    /// to the sorted selection), cursor clamped to the rebuilt bound.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let catalog = &self.catalog;
        self.committed = SelectionState::from_parts(
            snapshot
                .selected_card_numbers
                .into_iter()
                .filter(|no| catalog.contains(*no)),
            snapshot.manual_addition_numbers,
        );
        let order: Vec<i32> = snapshot
            .order
            .into_iter()
            .filter(|no| self.committed.contains(*no))
            .collect();
        self.order = if order.is_empty() {
            self.committed.selected().iter().copied().collect()
        } else {
            order
        };
        self.draft = None;
        self.rebuild_sequence();
        self.cursor.set(snapshot.current_index);
    }

    /// Back to first-run state: full selection, fresh shuffle.
    pub fn reset_to_default(&mut self) {
        self.committed = SelectionState::full(&self.catalog);
        self.draft = None;
        self.shuffle_current_selection();
    }

    pub fn playable_count(&self) -> usize {
        self.order.len()
    }

    /// Count shown while editing: the draft when one is open, the
    /// committed selection otherwise.
    pub fn selected_count(&self) -> usize {
        self.draft
            .as_ref()
            .unwrap_or(&self.committed)
            .len()
    }

    pub fn current_pair(&self) -> Option<(&ReadingCard, &ReadingCard)> {
        self.cursor.current_pair(&self.sequence)
    }

    pub fn view(&self) -> SessionView {
        let pair = self.current_pair();
        let listed = self.draft.as_ref().unwrap_or(&self.committed);
        let cards = self
            .catalog
            .base()
            .iter()
            .map(|card| CardRow {
                no: card.no,
                kimariji: card.kimariji.clone(),
                selected: listed.contains(card.no),
                manual: listed.is_manual(card.no),
            })
            .collect();
        SessionView {
            current: pair.map(|(current, _)| current.clone()),
            lookahead: pair.map(|(_, lookahead)| lookahead.clone()),
            playable_count: self.playable_count(),
            selected_count: self.selected_count(),
            draft_open: self.draft.is_some(),
            cards,
        }
    }

    fn shuffle_current_selection(&mut self) {
        if self.committed.is_empty() {
            return;
        }
        let mut order: Vec<i32> = self.committed.selected().iter().copied().collect();
        self.rng.shuffle(&mut order);
        self.order = order;
        self.rebuild_sequence();
        self.cursor.reset_to_start();
    }

    fn rebuild_sequence(&mut self) {
        self.sequence = ReadingSequence::build(&self.catalog, &self.order, self.committed.manual());
        self.cursor.rebind(self.sequence.last_playable_index());
    }
}
