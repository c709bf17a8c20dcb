use crate::Catalog;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 2;

/// Current persisted schema. Field names match the durable-store
/// contract (`currentIndex`, `selectedCardNumbers`, ...), so a blob
/// written by any schema-2 client restores unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub current_index: usize,
    pub order: Vec<i32>,
    pub selected_card_numbers: Vec<i32>,
    pub manual_addition_numbers: Vec<i32>,
}

impl Snapshot {
    /// A snapshot restores only if every card in its order is known to
    /// the catalog. Anything else is treated as first-run.
    pub fn is_valid(&self, catalog: &Catalog) -> bool {
        self.order.iter().all(|no| catalog.contains(*no))
    }
}

/// Version-1 schema: the fully built sequence (sentinels included) and
/// a cursor, nothing about selections. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySnapshot {
    pub yomifudalist: Vec<LegacyEntry>,
    pub current_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntry {
    #[serde(default)]
    pub no: Option<i32>,
}

impl LegacySnapshot {
    /// v1 -> v2: strip the two prefix entries and the suffix entry,
    /// keep the interior numbers as the order, treat the whole order as
    /// selected, and forget manual additions (v1 never recorded them).
    pub fn upgrade(self) -> Snapshot {
        let end = self.yomifudalist.len().saturating_sub(1);
        let order: Vec<i32> = self
            .yomifudalist
            .get(2..end)
            .unwrap_or(&[])
            .iter()
            .filter_map(|entry| entry.no)
            .collect();
        let current_index = self.current_index.clamp(0, order.len() as i64 + 1) as usize;
        Snapshot {
            version: SNAPSHOT_VERSION,
            current_index,
            selected_card_numbers: order.clone(),
            manual_addition_numbers: Vec::new(),
            order,
        }
    }
}

/// Union of every schema the store may hold, oldest last. `upgrade`
/// walks the chain to the current version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VersionedSnapshot {
    Current(Snapshot),
    Legacy(LegacySnapshot),
}

impl VersionedSnapshot {
    pub fn upgrade(self) -> Snapshot {
        match self {
            Self::Current(snapshot) => snapshot,
            Self::Legacy(legacy) => legacy.upgrade(),
        }
    }
}
