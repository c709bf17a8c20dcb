use serde::{Deserialize, Serialize};
use yomiage_core::Card;

/// One record of `assets/cards.json`. Symbol and initial fields are
/// strings in the data (and may be missing or empty on the sentinel
/// entries); only their first character is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDef {
    pub no: i32,
    pub kaminoku: String,
    pub shimonoku: String,
    #[serde(default)]
    pub kimariji: String,
    #[serde(default)]
    pub initial: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub center: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
}

fn first_char(value: Option<String>) -> Option<char> {
    value.as_deref().and_then(|s| s.chars().next())
}

impl CardDef {
    pub fn into_card(self) -> Card {
        Card {
            no: self.no,
            kaminoku: self.kaminoku,
            shimonoku: self.shimonoku,
            kimariji: self.kimariji,
            initial: first_char(self.initial),
            left: first_char(self.left),
            center: first_char(self.center),
            right: first_char(self.right),
        }
    }
}
