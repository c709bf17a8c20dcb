use crate::{ReadingCard, ReadingSequence};

/// Position in the built sequence. Always clamped to
/// `[0, last_playable]`; the trailing sentinel is never a stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    last_playable: usize,
}

impl Cursor {
    pub fn new(last_playable: usize) -> Self {
        Self {
            index: 0,
            last_playable,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_playable(&self) -> usize {
        self.last_playable
    }

    /// Returns false when already at the end (the no-op signal).
    pub fn advance(&mut self) -> bool {
        if self.index < self.last_playable {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Returns false when already at the start.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset_to_start(&mut self) {
        self.index = 0;
    }

    /// Clamps a restored position into range.
    pub fn set(&mut self, index: usize) {
        self.index = index.min(self.last_playable);
    }

    /// Adopts the bound of a freshly rebuilt sequence, clamping the
    /// current position if the sequence shrank.
    pub fn rebind(&mut self, last_playable: usize) {
        self.last_playable = last_playable;
        self.index = self.index.min(last_playable);
    }

    /// The card under the cursor plus the lookahead card. At the end of
    /// the sequence the lookahead is the final element itself.
    pub fn current_pair<'a>(
        &self,
        sequence: &'a ReadingSequence,
    ) -> Option<(&'a ReadingCard, &'a ReadingCard)> {
        let current = sequence.get(self.index)?;
        let lookahead_index = (self.index + 1).min(sequence.len().saturating_sub(1));
        let lookahead = sequence.get(lookahead_index)?;
        Some((current, lookahead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Card, Catalog};
    use std::collections::BTreeSet;

    fn sequence(cards: usize) -> ReadingSequence {
        let mut list = vec![fixture(0), fixture(-1)];
        list.extend((1..=cards as i32).map(fixture));
        list.push(fixture(101));
        let catalog = Catalog::from_cards(list).expect("catalog");
        let order: Vec<i32> = (1..=cards as i32).collect();
        ReadingSequence::build(&catalog, &order, &BTreeSet::new())
    }

    fn fixture(no: i32) -> Card {
        Card {
            no,
            kaminoku: format!("k{no}"),
            shimonoku: format!("s{no}"),
            kimariji: String::new(),
            initial: None,
            left: None,
            center: None,
            right: None,
        }
    }

    #[test]
    fn advance_stops_at_last_playable() {
        let seq = sequence(2);
        let mut cursor = Cursor::new(seq.last_playable_index());
        assert!(cursor.advance());
        assert!(cursor.advance());
        assert_eq!(cursor.index(), 2);
        assert!(!cursor.advance());
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn retreat_stops_at_zero() {
        let seq = sequence(2);
        let mut cursor = Cursor::new(seq.last_playable_index());
        assert!(!cursor.retreat());
        cursor.advance();
        assert!(cursor.retreat());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn set_clamps_out_of_range_positions() {
        let mut cursor = Cursor::new(3);
        cursor.set(10);
        assert_eq!(cursor.index(), 3);
    }

    #[test]
    fn rebind_clamps_when_sequence_shrinks() {
        let mut cursor = Cursor::new(10);
        cursor.set(8);
        cursor.rebind(4);
        assert_eq!(cursor.index(), 4);
        assert_eq!(cursor.last_playable(), 4);
    }

    #[test]
    fn lookahead_saturates_at_sequence_end() {
        let seq = sequence(2);
        let mut cursor = Cursor::new(seq.last_playable_index());
        cursor.set(seq.last_playable_index());
        let (current, lookahead) = cursor.current_pair(&seq).expect("pair");
        assert_eq!(current.no, 2);
        assert_eq!(lookahead.no, 101);
        // One past the stop bound the pair degenerates to the suffix.
        cursor.rebind(seq.len() - 1);
        cursor.set(seq.len() - 1);
        let (current, lookahead) = cursor.current_pair(&seq).expect("pair");
        assert_eq!(current.no, lookahead.no);
    }
}
