//! The line normalization driver.
//!
//! Every line goes through the same fixed sequence of stages:
//!
//! 1. drop filter (unwanted event markers, failed casts)
//! 2. cast classification (drop noise, strip spell id / rank / raid marks)
//! 3. protected names swapped for placeholders
//! 4. pet renames
//! 5. pet association, when the line mentions a known owner
//! 6. second-person rewrite, at most two passes
//! 7. possessive disambiguation
//! 8. cosmetic renames
//! 9. friendly-fire / self-damage tagging
//! 10. placeholders swapped back
//!
//! A line dropped at any stage leaves nothing behind in the output.

use log::{debug, info};
use relog_data::RuleSetDef;

use crate::cast::{CastClassifier, CastOutcome};
use crate::damage::tag_damage;
use crate::error::{Diagnostic, RelogError};
use crate::filter::{DropReason, LineFilter};
use crate::player::PlayerName;
use crate::prescan::{PetRoster, Prescanner};
use crate::protected::ProtectedNames;
use crate::rules::{RuleBank, RuleCategory};

/// Upper bound on second-person passes over one line. A possessive can hide a
/// reflexive `you` that only the second pass sees.
pub const PRONOUN_PASSES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Keep(String),
    Drop(DropReason),
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub lines: Vec<String>,
    pub dropped: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub roster: PetRoster,
}

impl NormalizeReport {
    pub fn input_len(&self) -> usize {
        self.lines.len() + self.dropped
    }
}

/// Everything compiled from a rule set for one player. Built once per run and
/// never mutated while lines are rewritten.
#[derive(Debug, Clone)]
pub struct Normalizer {
    player: PlayerName,
    protected: ProtectedNames,
    filter: LineFilter,
    cast: CastClassifier,
    bank: RuleBank,
    ignored_pet_tags: Vec<String>,
    summoned_pet_names: Vec<String>,
    ignored_pet_names: Vec<String>,
}

impl Normalizer {
    /// # Errors
    /// Returns `PatternEngineFailure` if any rule pattern fails to compile.
    pub fn new(rules: &RuleSetDef, player: PlayerName) -> Result<Self, RelogError> {
        let bank = RuleBank::compile(rules, &player)?;
        for category in bank.categories() {
            debug!("{}: {} rules compiled", category.name(), category.len());
        }
        Ok(Self {
            protected: ProtectedNames::new(&rules.protected_names),
            filter: LineFilter::new(&rules.unwanted_line_markers, rules.drop_all_failed_casts),
            cast: CastClassifier::new(&rules.greylist, &rules.raid_marks),
            bank,
            ignored_pet_tags: rules.ignored_pet_names.iter().map(|n| format!("{n} (")).collect(),
            summoned_pet_names: rules.summoned_pet_names.clone(),
            ignored_pet_names: rules.ignored_pet_names.clone(),
            player,
        })
    }

    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    /// Pre-scan the whole file, then rewrite it line by line.
    ///
    /// # Errors
    /// Returns `PatternEngineFailure` if the pet-rename rules built from the
    /// pre-scan cannot be compiled.
    pub fn run(&self, lines: Vec<String>) -> Result<NormalizeReport, RelogError> {
        let prescan = Prescanner {
            ignored_pet_names: &self.ignored_pet_names,
            summoned_pet_names: &self.summoned_pet_names,
            loot: &self.bank.loot,
        }
        .scan(lines);
        let pet_renames = RuleCategory::pet_renames(&prescan.roster)?;

        let mut report = NormalizeReport {
            lines: Vec::with_capacity(prescan.lines.len()),
            diagnostics: prescan.diagnostics,
            ..NormalizeReport::default()
        };
        for (index, line) in prescan.lines.iter().enumerate() {
            match self.normalize_line(line, &pet_renames, &prescan.roster) {
                LineOutcome::Keep(line) => report.lines.push(line),
                LineOutcome::Drop(reason) => {
                    debug!("line {} dropped: {reason}", index + 1);
                    report.dropped += 1;
                },
            }
        }
        report.roster = prescan.roster;

        info!(
            "{} lines kept, {} dropped, {} diagnostics",
            report.lines.len(),
            report.dropped,
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Rewrite a single pre-scanned line.
    pub fn normalize_line(&self, line: &str, pet_renames: &RuleCategory, roster: &PetRoster) -> LineOutcome {
        if let Some(reason) = self.filter.check(line) {
            return LineOutcome::Drop(reason);
        }

        let line = match self.cast.classify(line) {
            CastOutcome::Drop => return LineOutcome::Drop(DropReason::CastNoise),
            CastOutcome::Keep(rewritten) => rewritten,
            CastOutcome::PassThrough => line.to_string(),
        };

        let line = self.protected.decorate(&line);
        let (mut line, _) = pet_renames.apply(&line);

        if roster.has_owner_in(&line) && !is_pet_death(&line) && !self.mentions_ignored_pet(&line) {
            line = self.bank.pet_association.apply(&line).0;
        }

        if mentions_second_person(&line) {
            for _ in 0..PRONOUN_PASSES {
                let (rewritten, matched) = self.bank.pronoun.apply(&line);
                line = rewritten;
                if !matched || line.is_empty() {
                    break;
                }
            }
            if line.is_empty() {
                return LineOutcome::Drop(DropReason::Erased);
            }
        }

        let (line, _) = self.bank.disambiguation.apply(&line);
        let (line, _) = self.bank.rename.apply(&line);
        let line = tag_damage(&self.bank.friendly_fire, &self.bank.self_damage, &line);

        LineOutcome::Keep(self.protected.restore(&line))
    }

    fn mentions_ignored_pet(&self, line: &str) -> bool {
        self.ignored_pet_tags.iter().any(|tag| line.contains(tag.as_str()))
    }
}

fn is_pet_death(line: &str) -> bool {
    line.contains("dies.") || line.contains("is killed by")
}

fn mentions_second_person(line: &str) -> bool {
    line.contains("you") || line.contains("You") || line.contains("dodged.")
}
