use serde::{Deserialize, Serialize};

/// Complete rule set consumed by the normalizer.
///
/// Every table here is data: the engine compiles it once per run and never
/// mutates it while lines are being rewritten. Rule categories are ordered and
/// evaluated first-match-wins, so the order of entries in each `Vec<RuleDef>`
/// is significant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuleSetDef {
    /// Raid target icons that may decorate a unit name, e.g. `Skull` in `Ragnaros(Skull)`.
    #[serde(default)]
    pub raid_marks: Vec<String>,
    #[serde(default)]
    pub greylist: Vec<GreylistDef>,
    /// Event markers (`MARK:`, `CHAT_MSG:`, ...) whose lines are always removed.
    #[serde(default)]
    pub unwanted_line_markers: Vec<String>,
    /// Drop every `fails casting` line, not only the ones carrying a spell id.
    #[serde(default = "default_true")]
    pub drop_all_failed_casts: bool,
    #[serde(default)]
    pub ignored_pet_names: Vec<String>,
    #[serde(default)]
    pub summoned_pet_names: Vec<String>,
    #[serde(default)]
    pub protected_names: Vec<ProtectedNameDef>,
    #[serde(default)]
    pub pet_association: Vec<RuleDef>,
    #[serde(default)]
    pub pronoun: Vec<RuleDef>,
    #[serde(default)]
    pub disambiguation: Vec<RuleDef>,
    #[serde(default)]
    pub rename: Vec<RuleDef>,
    #[serde(default)]
    pub friendly_fire: Vec<RuleDef>,
    /// Self-damage patterns must capture the victim in group 1 and the source in group 4.
    #[serde(default)]
    pub self_damage: Vec<RuleDef>,
    #[serde(default)]
    pub loot: Vec<RuleDef>,
}

fn default_true() -> bool {
    true
}

/// One (pattern, replacement) pair of a rule category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    pub pattern: String,
    pub replace: String,
}

impl RuleDef {
    pub fn new(pattern: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replace: replace.into(),
        }
    }
}

/// Restricts an ambiguous spell name to a single accepted spell id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreylistDef {
    pub spell: String,
    pub id: u32,
}

/// What sort of proper noun a protected name is. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProtectedKind {
    #[default]
    Mob,
    Item,
    Spell,
}

/// A proper name containing an apostrophe and the apostrophe-free form it
/// travels as while the apostrophe-sensitive rules run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedNameDef {
    #[serde(default)]
    pub kind: ProtectedKind,
    pub decorated: String,
    pub placeholder: String,
}
