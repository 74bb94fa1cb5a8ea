//! Whole-file pass that runs before any line is rewritten.
//!
//! The pre-scan discovers which players own pets (from `COMBATANT_INFO`
//! records and from well-known summoned units), flags pets that share their
//! owner's name, and fixes up a few line shapes the rewrite rules depend on:
//!
//! - logs exported by some meters already contain `" 's"`, which is folded
//!   back to `"'s"` so the possessive rules see one consistent form
//! - combatant-info records get their pet field renamed or nulled
//! - loot messages without a quantity get one
//!
//! The returned [`PetRoster`] is read-only for the rest of the run.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;

use crate::error::Diagnostic;
use crate::rules::{NAME_LETTERS, PET_RENAME_SUFFIX, RuleCategory};

pub const COMBATANT_INFO: &str = "COMBATANT_INFO";
pub const LOOT_MARKER: &str = "LOOT:";
pub const ZONE_INFO: &str = "ZONE_INFO";
/// Sentinel used by the addon for "no pet".
pub const NO_PET: &str = "nil";

/// Index of the owner name and pet name in an `&`-separated combatant record.
const OWNER_FIELD: usize = 1;
const PET_FIELD: usize = 5;

lazy_static! {
    /// `Greater Feral Spirit (Thrall)` style unit with an owner tag.
    static ref SUMMONED_OWNER: Regex = Regex::new(&format!(
        r"([{L}][{L} ]+[{L}]) \(([{L}]+)\)",
        L = NAME_LETTERS
    ))
    .expect("summoned pet owner pattern");
}

/// A pet attributed to an owning player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PetAssociation {
    /// Owner tag as it appears in log lines, e.g. `(Bob)`.
    pub owner_key: String,
    pub pet: String,
    pub renamed: Option<String>,
}

impl PetAssociation {
    /// Name the pet is known by after the pre-scan.
    pub fn display_name(&self) -> &str {
        self.renamed.as_deref().unwrap_or(&self.pet)
    }

    pub fn owner_name(&self) -> &str {
        self.owner_key
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(&self.owner_key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PetRoster {
    associations: BTreeSet<PetAssociation>,
    owner_keys: BTreeSet<String>,
}

impl PetRoster {
    pub fn register(&mut self, owner: &str, pet: &str, renamed: Option<String>) {
        let owner_key = format!("({owner})");
        self.owner_keys.insert(owner_key.clone());
        self.associations.insert(PetAssociation {
            owner_key,
            pet: pet.to_string(),
            renamed,
        });
    }

    pub fn associations(&self) -> impl Iterator<Item = &PetAssociation> {
        self.associations.iter()
    }

    pub fn owner_keys(&self) -> impl Iterator<Item = &str> {
        self.owner_keys.iter().map(String::as_str)
    }

    /// Pets that were renamed because they share their owner's name.
    pub fn renames(&self) -> impl Iterator<Item = &PetAssociation> {
        self.associations.iter().filter(|a| a.renamed.is_some())
    }

    /// True if the line mentions any known owner tag.
    pub fn has_owner_in(&self, line: &str) -> bool {
        self.owner_keys.iter().any(|key| line.contains(key.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrescanOutput {
    pub lines: Vec<String>,
    pub roster: PetRoster,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Prescanner<'a> {
    pub ignored_pet_names: &'a [String],
    pub summoned_pet_names: &'a [String],
    pub loot: &'a RuleCategory,
}

impl Prescanner<'_> {
    pub fn scan(&self, mut lines: Vec<String>) -> PrescanOutput {
        let mut roster = PetRoster::default();
        let mut diagnostics = Vec::new();

        for (index, line) in lines.iter_mut().enumerate() {
            let is_record = line.contains(COMBATANT_INFO) || line.contains(LOOT_MARKER) || line.contains(ZONE_INFO);
            if !is_record && line.contains(" 's") {
                *line = line.replace(" 's", "'s");
            }

            if line.contains(COMBATANT_INFO) {
                match self.scan_combatant_info(line, &mut roster) {
                    Some(rewritten) => *line = rewritten,
                    None => {
                        let diagnostic = Diagnostic::MalformedRecord {
                            line_number: index + 1,
                            fields: line.split('&').count(),
                        };
                        warn!("{diagnostic}");
                        diagnostics.push(diagnostic);
                    },
                }
            } else if line.contains(LOOT_MARKER) {
                let (rewritten, _) = self.loot.apply(line);
                *line = rewritten;
            } else {
                self.scan_summoned(line, &mut roster);
            }
        }

        if !roster.is_empty() {
            info!(
                "pet hits and spells will be credited to these owners: {}",
                roster.owner_keys().collect::<Vec<_>>().join(", ")
            );
        }
        let renamed: Vec<String> = roster
            .renames()
            .map(|a| format!("{} -> {}", a.pet, a.display_name()))
            .collect();
        if !renamed.is_empty() {
            info!("pets renamed to avoid clashing with their owner: {}", renamed.join(", "));
        }

        PrescanOutput {
            lines,
            roster,
            diagnostics,
        }
    }

    /// Register the record's pet and return the rewritten record, or `None`
    /// if the record is too short to carry a pet field.
    fn scan_combatant_info(&self, line: &str, roster: &mut PetRoster) -> Option<String> {
        let mut fields: Vec<String> = line.split('&').map(str::to_string).collect();
        if fields.len() <= PET_FIELD {
            return None;
        }

        let pet = fields[PET_FIELD].clone();
        if pet == NO_PET || self.ignored_pet_names.contains(&pet) {
            // the legacy parser can lose the player entirely when the pet
            // name collides with a player or ability name
            fields[PET_FIELD] = NO_PET.to_string();
        } else {
            let owner = fields[OWNER_FIELD].clone();
            if pet == owner {
                let renamed = format!("{pet}{PET_RENAME_SUFFIX}");
                fields[PET_FIELD].clone_from(&renamed);
                roster.register(&owner, &pet, Some(renamed));
            } else {
                roster.register(&owner, &pet, None);
            }
        }
        Some(fields.join("&"))
    }

    fn scan_summoned(&self, line: &str, roster: &mut PetRoster) {
        for summoned in self.summoned_pet_names {
            if !line.contains(summoned.as_str()) {
                continue;
            }
            if let Some(caps) = SUMMONED_OWNER.captures(line) {
                roster.register(&caps[2], summoned, None);
            }
        }
    }
}
