use crate::Catalog;
use serde::Serialize;
use std::collections::BTreeSet;

/// One entry of the built reading sequence, faces already annotated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReadingCard {
    pub no: i32,
    pub kaminoku: String,
    pub shimonoku: String,
    pub manual: bool,
}

/// The playable order wrapped for display: prefix sentinels, the
/// ordered cards, suffix sentinel. Rebuilt whenever the order changes,
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct ReadingSequence {
    cards: Vec<ReadingCard>,
}

impl ReadingSequence {
    /// Looks `order` up in the catalog (unknown numbers are dropped),
    /// pads with the sentinels and prefixes both faces of each interior
    /// card with a `<span class='num'>` counter starting at 1. The two
    /// leading sentinels and the trailing one stay unannotated.
    pub fn build(catalog: &Catalog, order: &[i32], manual: &BTreeSet<i32>) -> Self {
        let mut cards = Vec::with_capacity(order.len() + 3);
        for sentinel in catalog.prefix() {
            cards.push(ReadingCard {
                no: sentinel.no,
                kaminoku: sentinel.kaminoku.clone(),
                shimonoku: sentinel.shimonoku.clone(),
                manual: false,
            });
        }
        for no in order {
            if let Some(card) = catalog.get(*no) {
                cards.push(ReadingCard {
                    no: card.no,
                    kaminoku: card.kaminoku.clone(),
                    shimonoku: card.shimonoku.clone(),
                    manual: manual.contains(no),
                });
            }
        }
        let suffix = catalog.suffix();
        cards.push(ReadingCard {
            no: suffix.no,
            kaminoku: suffix.kaminoku.clone(),
            shimonoku: suffix.shimonoku.clone(),
            manual: false,
        });

        let last = cards.len() - 1;
        for (index, card) in cards.iter_mut().enumerate() {
            if index < 2 || index >= last {
                continue;
            }
            let tag = format!("<span class='num'>{}</span>", index - 1);
            card.kaminoku = format!("{tag}{}", card.kaminoku);
            card.shimonoku = format!("{tag}{}", card.shimonoku);
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ReadingCard> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[ReadingCard] {
        &self.cards
    }

    /// The last index the cursor may stop on; the trailing sentinel is
    /// lookahead-only.
    pub fn last_playable_index(&self) -> usize {
        self.cards.len().saturating_sub(2)
    }
}
