use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Position of the symbol attribute used by the symbol filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SymbolSide {
    Left,
    Center,
    Right,
}

impl SymbolSide {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// One reading card. `kaminoku`/`shimonoku` are the two display faces;
/// the sentinel entries at the edges of the catalog carry no initial
/// and no symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub no: i32,
    pub kaminoku: String,
    pub shimonoku: String,
    #[serde(default)]
    pub kimariji: String,
    #[serde(default)]
    pub initial: Option<char>,
    #[serde(default)]
    pub left: Option<char>,
    #[serde(default)]
    pub center: Option<char>,
    #[serde(default)]
    pub right: Option<char>,
}

impl Card {
    pub fn symbol(&self, side: SymbolSide) -> Option<char> {
        match side {
            SymbolSide::Left => self.left,
            SymbolSide::Center => self.center,
            SymbolSide::Right => self.right,
        }
    }

    /// Playable cards carry numbers 1..=100; anything else is a sentinel.
    pub fn is_base(&self) -> bool {
        self.no > 0 && self.no < 101
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog needs at least 2 prefix entries, 1 card and 1 suffix entry, got {0}")]
    TooFewEntries(usize),
    #[error("duplicate card number {0}")]
    DuplicateNumber(i32),
}

/// The fixed card set: two prefix sentinels, the playable base cards
/// and one suffix sentinel, in catalog order. Read-only after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    prefix: [Card; 2],
    suffix: Card,
    base: Vec<Card>,
    by_number: HashMap<i32, usize>,
}

impl Catalog {
    /// Splits an ordered card list the way the source data is laid out:
    /// entries 0 and 1 are the prefix sentinels, the last entry is the
    /// suffix sentinel, and the base set is every card numbered 1..=100.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, CatalogError> {
        if cards.len() < 4 {
            return Err(CatalogError::TooFewEntries(cards.len()));
        }
        let prefix = [cards[0].clone(), cards[1].clone()];
        let suffix = cards[cards.len() - 1].clone();
        let base: Vec<Card> = cards.into_iter().filter(Card::is_base).collect();
        let mut by_number = HashMap::with_capacity(base.len());
        for (index, card) in base.iter().enumerate() {
            if by_number.insert(card.no, index).is_some() {
                return Err(CatalogError::DuplicateNumber(card.no));
            }
        }
        Ok(Self {
            prefix,
            suffix,
            base,
            by_number,
        })
    }

    pub fn base(&self) -> &[Card] {
        &self.base
    }

    pub fn prefix(&self) -> &[Card; 2] {
        &self.prefix
    }

    pub fn suffix(&self) -> &Card {
        &self.suffix
    }

    pub fn get(&self, no: i32) -> Option<&Card> {
        self.by_number.get(&no).map(|index| &self.base[*index])
    }

    pub fn contains(&self, no: i32) -> bool {
        self.by_number.contains_key(&no)
    }

    /// Base card numbers in catalog order.
    pub fn numbers(&self) -> Vec<i32> {
        self.base.iter().map(|card| card.no).collect()
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}
