//! Classifier for cast lines that carry a spell id.
//!
//! The addon writes casts as `Bob casts Fireball(133)(Rank 1) on Ragnaros(Skull).`.
//! The legacy backend wants `Bob casts Fireball on Ragnaros.`, and only the
//! resolved cast: channel starts, cast starts and failed casts are noise.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use relog_data::GreylistDef;

lazy_static! {
    static ref CAST_WITH_ID: Regex = Regex::new(
        r"(.* (?:casts?|channels|begins to cast|fails casting) )(.+?)\((\d+)\)(?:\(Rank (\d+)\))?( .*)?"
    )
    .expect("cast line pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastVerb {
    /// `casts`, or `cast` in second-person lines.
    Casts,
    Channels,
    BeginsToCast,
    FailsCasting,
}

impl CastVerb {
    /// The verb is the last word group of the captured prefix.
    /// Cast starts are checked before plain `cast`, which ends both
    /// `You cast ` and `You begin to cast `.
    fn from_prefix(prefix: &str) -> Option<Self> {
        if prefix.ends_with(" begins to cast ") || prefix.ends_with(" begin to cast ") {
            Some(Self::BeginsToCast)
        } else if prefix.ends_with(" fails casting ") {
            Some(Self::FailsCasting)
        } else if prefix.ends_with(" channels ") {
            Some(Self::Channels)
        } else if prefix.ends_with(" casts ") || prefix.ends_with(" cast ") {
            Some(Self::Casts)
        } else {
            None
        }
    }
}

/// A cast line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastLineMatch {
    /// Everything up to and including the verb and its trailing space.
    pub prefix: String,
    pub verb: CastVerb,
    pub spell_name: String,
    /// `None` when the id is too large to be a real spell id.
    pub spell_id: Option<u32>,
    /// Target clause such as ` on Ragnaros.`, with its leading space.
    pub suffix: Option<String>,
}

impl CastLineMatch {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = CAST_WITH_ID.captures(line)?;
        let prefix = caps.get(1)?.as_str().to_string();
        let verb = CastVerb::from_prefix(&prefix)?;
        Some(Self {
            verb,
            spell_name: caps[2].trim().to_string(),
            spell_id: caps[3].parse().ok(),
            suffix: caps.get(5).map(|m| m.as_str().to_string()),
            prefix,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastOutcome {
    Keep(String),
    Drop,
    PassThrough,
}

#[derive(Debug, Clone, Default)]
pub struct CastClassifier {
    greylist: HashMap<String, u32>,
    raid_marks: Vec<String>,
}

impl CastClassifier {
    pub fn new(greylist: &[GreylistDef], raid_marks: &[String]) -> Self {
        Self {
            greylist: greylist.iter().map(|g| (g.spell.clone(), g.id)).collect(),
            raid_marks: raid_marks.to_vec(),
        }
    }

    pub fn classify(&self, line: &str) -> CastOutcome {
        let Some(cast) = CastLineMatch::parse(line) else {
            return CastOutcome::PassThrough;
        };

        match cast.verb {
            CastVerb::Channels | CastVerb::BeginsToCast | CastVerb::FailsCasting => CastOutcome::Drop,
            CastVerb::Casts => match self.greylist.get(&cast.spell_name) {
                Some(&accepted) if cast.spell_id != Some(accepted) => CastOutcome::Drop,
                _ => CastOutcome::Keep(self.rewrite(&cast)),
            },
        }
    }

    /// Drop the id, rank and raid marks and make sure the line ends in a period.
    fn rewrite(&self, cast: &CastLineMatch) -> String {
        let prefix = self.strip_marks(&cast.prefix);
        let mut suffix = cast.suffix.clone().unwrap_or_default();
        if let Some((head, target)) = suffix.split_once(" on ") {
            let target = self.strip_target_marks(target);
            suffix = if target.is_empty() {
                head.to_string()
            } else {
                format!("{head} on {target}")
            };
        }

        let period = if suffix.ends_with('.') { "" } else { "." };
        format!("{prefix}{}{suffix}{period}", cast.spell_name)
    }

    /// Remove `(Mark)` decorations anywhere in the caster part.
    fn strip_marks(&self, text: &str) -> String {
        let mut out = text.to_string();
        for mark in &self.raid_marks {
            let token = format!("({mark})");
            if out.contains(&token) {
                out = out.replace(&token, "");
            }
        }
        out
    }

    /// Remove the trailing period and any trailing `(Mark)` from a target name.
    /// Clean names come back unchanged.
    pub fn strip_target_marks(&self, target: &str) -> String {
        let mut name = target.trim_end_matches('.');
        loop {
            let before = name;
            for mark in &self.raid_marks {
                if let Some(rest) = name.strip_suffix(&format!("({mark})")) {
                    name = rest.trim_end();
                }
            }
            if name == before {
                break;
            }
        }
        name.trim().to_string()
    }
}
