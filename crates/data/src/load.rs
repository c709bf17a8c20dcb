use crate::schema::CardDef;
use anyhow::Context;
use std::fs;
use std::path::Path;
use yomiage_core::{Catalog, SymbolSide};

/// Candidate symbols offered per side, ten per row. The card data
/// assigns symbols out of the same rows.
pub const LEFT_SYMBOLS: [char; 10] = ['ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ'];
pub const CENTER_SYMBOLS: [char; 10] = ['サ', 'シ', 'ス', 'セ', 'ソ', 'タ', 'チ', 'ツ', 'テ', 'ト'];
pub const RIGHT_SYMBOLS: [char; 10] = ['ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ'];

pub fn symbol_row(side: SymbolSide) -> &'static [char; 10] {
    match side {
        SymbolSide::Left => &LEFT_SYMBOLS,
        SymbolSide::Center => &CENTER_SYMBOLS,
        SymbolSide::Right => &RIGHT_SYMBOLS,
    }
}

/// Distinct initials present in the catalog, sorted. Feeds the
/// initial-filter picker.
pub fn initial_characters(catalog: &Catalog) -> Vec<char> {
    let mut initials: Vec<char> = catalog
        .base()
        .iter()
        .filter_map(|card| card.initial)
        .collect();
    initials.sort_unstable();
    initials.dedup();
    initials
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Catalog> {
    let defs: Vec<CardDef> = serde_json::from_str(raw).context("parse card list")?;
    let cards = defs.into_iter().map(CardDef::into_card).collect();
    let catalog = Catalog::from_cards(cards)?;
    Ok(catalog)
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_catalog(&raw).with_context(|| format!("parse {}", path.display()))
}

/// The deck shipped with the binary.
pub fn builtin_catalog() -> anyhow::Result<Catalog> {
    parse_catalog(include_str!("../../../assets/cards.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_the_full_deck() {
        let catalog = builtin_catalog().expect("builtin catalog");
        assert_eq!(catalog.len(), 100);
        assert_eq!(catalog.prefix()[0].no, 0);
        assert_eq!(catalog.suffix().no, 101);
        assert!(catalog.prefix()[0].initial.is_none());
        for no in 1..=100 {
            let card = catalog.get(no).expect("card");
            assert!(card.initial.is_some(), "card {no} lacks an initial");
            assert!(!card.kaminoku.is_empty());
            assert!(!card.shimonoku.is_empty());
            assert!(!card.kimariji.is_empty());
        }
    }

    #[test]
    fn builtin_symbols_come_from_the_published_rows() {
        let catalog = builtin_catalog().expect("builtin catalog");
        for card in catalog.base() {
            assert!(LEFT_SYMBOLS.contains(&card.left.expect("left")));
            assert!(CENTER_SYMBOLS.contains(&card.center.expect("center")));
            assert!(RIGHT_SYMBOLS.contains(&card.right.expect("right")));
        }
    }

    #[test]
    fn initial_characters_are_sorted_and_distinct() {
        let catalog = builtin_catalog().expect("builtin catalog");
        let initials = initial_characters(&catalog);
        assert!(initials.contains(&'あ'));
        assert!(initials.contains(&'む'));
        let mut sorted = initials.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(initials, sorted);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(parse_catalog("not json").is_err());
        assert!(parse_catalog("[]").is_err());
    }

    #[test]
    fn initials_match_the_kimariji_head() {
        let catalog = builtin_catalog().expect("builtin catalog");
        for card in catalog.base() {
            assert_eq!(card.initial, card.kimariji.chars().next());
        }
    }
}
