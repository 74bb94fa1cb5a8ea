//! Compiled rule categories.
//!
//! A category is an ordered list of (pattern, replacement) rules. Applying a
//! category finds the first rule whose pattern matches the line and rewrites
//! every occurrence of that pattern; later rules of the same category are not
//! consulted, even if the rewritten line would now match them.

use log::debug;
use regex::{Regex, RegexBuilder};
use relog_data::{RuleDef, RuleSetDef};

use crate::error::RelogError;
use crate::player::PlayerName;
use crate::prescan::PetRoster;

/// Letter class used for unit names in rule patterns (`{L}`).
pub const NAME_LETTERS: &str = r"a-zA-Z\x{00C0}-\x{017F}";

/// Appended to a pet's name when it is the same as its owner's.
pub const PET_RENAME_SUFFIX: &str = "Pet";

#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    replace: String,
}

impl Rule {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn template(&self) -> &str {
        &self.replace
    }
}

#[derive(Debug, Clone)]
pub struct RuleCategory {
    name: String,
    rules: Vec<Rule>,
}

impl RuleCategory {
    /// Compile a category, expanding `{L}` in patterns and `{player}` in
    /// replacement templates. Matching is case-insensitive.
    ///
    /// # Errors
    /// Returns `PatternEngineFailure` naming the first pattern that does not compile.
    pub fn compile(name: &str, defs: &[RuleDef], player: Option<&PlayerName>) -> Result<Self, RelogError> {
        let player = player.map(|p| escape_template(p.as_str()));
        let mut rules = Vec::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            let pattern = def.pattern.replace("{L}", NAME_LETTERS);
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RelogError::PatternEngineFailure {
                    category: name.to_string(),
                    index,
                    pattern: def.pattern.clone(),
                    source,
                })?;
            let replace = match &player {
                Some(player) => def.replace.replace("{player}", player),
                None => def.replace.clone(),
            };
            rules.push(Rule { regex, replace });
        }
        Ok(Self {
            name: name.to_string(),
            rules,
        })
    }

    /// Build the category that renames pets sharing their owner's name, so
    /// that `Bob (Bob)` becomes `BobPet (Bob)`.
    ///
    /// # Errors
    /// Only fails if an escaped literal somehow does not compile.
    pub fn pet_renames(roster: &PetRoster) -> Result<Self, RelogError> {
        let defs: Vec<RuleDef> = roster
            .associations()
            .filter_map(|assoc| {
                let renamed = assoc.renamed.as_ref()?;
                let owner = assoc.owner_name();
                Some(RuleDef::new(
                    format!(r"{} \({}\)", regex::escape(&assoc.pet), regex::escape(owner)),
                    format!("{} ({})", escape_template(renamed), escape_template(owner)),
                ))
            })
            .collect();
        Self::compile("pet_rename", &defs, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the first matching rule. Returns the rewritten line and whether
    /// any rule matched; a matching rule whose template reproduces the match
    /// still counts, which lets a category guard lines from its later rules.
    pub fn apply(&self, line: &str) -> (String, bool) {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.regex.is_match(line) {
                debug!("{} rule #{index} matched", self.name);
                let rewritten = rule.regex.replace_all(line, rule.replace.as_str());
                return (rewritten.into_owned(), true);
            }
        }
        (line.to_string(), false)
    }
}

/// Escape `$` so literal text survives as a regex replacement template.
fn escape_template(text: &str) -> String {
    text.replace('$', "$$")
}

/// All categories compiled from a rule set for one player.
#[derive(Debug, Clone)]
pub struct RuleBank {
    pub pet_association: RuleCategory,
    pub pronoun: RuleCategory,
    pub disambiguation: RuleCategory,
    pub rename: RuleCategory,
    pub friendly_fire: RuleCategory,
    pub self_damage: RuleCategory,
    pub loot: RuleCategory,
}

impl RuleBank {
    /// # Errors
    /// Returns `PatternEngineFailure` for the first invalid pattern found.
    pub fn compile(rules: &RuleSetDef, player: &PlayerName) -> Result<Self, RelogError> {
        Ok(Self {
            pet_association: RuleCategory::compile("pet_association", &rules.pet_association, Some(player))?,
            pronoun: RuleCategory::compile("pronoun", &rules.pronoun, Some(player))?,
            disambiguation: RuleCategory::compile("disambiguation", &rules.disambiguation, Some(player))?,
            rename: RuleCategory::compile("rename", &rules.rename, Some(player))?,
            friendly_fire: RuleCategory::compile("friendly_fire", &rules.friendly_fire, Some(player))?,
            self_damage: RuleCategory::compile("self_damage", &rules.self_damage, Some(player))?,
            loot: RuleCategory::compile("loot", &rules.loot, None)?,
        })
    }

    /// Every category, in the order a line passes through them.
    pub fn categories(&self) -> [&RuleCategory; 7] {
        [
            &self.loot,
            &self.pet_association,
            &self.pronoun,
            &self.disambiguation,
            &self.rename,
            &self.friendly_fire,
            &self.self_damage,
        ]
    }
}
