use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::table::Cell;

/// Administrative-hierarchy columns that `/process_json` keeps.
pub const REGION_COLUMNS: [&str; 6] = [
    "state_name",
    "district_name",
    "sub_district_name",
    "block_name",
    "gp_name",
    "village_name",
];

pub const STATE_NAME_COLUMN: &str = "state_name";
pub const STATE_CODE_COLUMN: &str = "state_code";

/// Code written for names the mapping does not know.
pub const UNMAPPED_CODE: i64 = -2;

/// Lowercase name or alias -> LGD code
pub type CodeMapping = BTreeMap<String, Cell>;

/// Lookup key form of a name: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One row of the `states` lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub entity_name: String,
    #[serde(rename = "entityLGDCode")]
    pub entity_lgd_code: Cell,
    pub entity_name_variants: Option<String>,
}

impl StateRecord {
    pub fn new(
        entity_name: impl Into<String>,
        entity_lgd_code: impl Into<Cell>,
        entity_name_variants: Option<&str>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            entity_lgd_code: entity_lgd_code.into(),
            entity_name_variants: entity_name_variants.map(str::to_string),
        }
    }

    /// Normalized primary name followed by every non-empty alias.
    pub fn lookup_keys(&self) -> Vec<String> {
        let mut keys = vec![normalize_name(&self.entity_name)];
        if let Some(variants) = self.entity_name_variants.as_deref() {
            keys.extend(
                variants
                    .split(',')
                    .map(normalize_name)
                    .filter(|variant| !variant.is_empty()),
            );
        }
        keys
    }
}
