//! Rule set loading.
//!
//! The rule set is TOML. An explicitly requested file must load; otherwise a
//! `rules.toml` in the data directory is used if present, and the copy built
//! into the binary if not.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use relog_data::RuleSetDef;

use crate::data_paths::rules_file;

/// Rule set shipped with the engine.
pub const DEFAULT_RULES: &str = include_str!("../data/rules.toml");

/// Load and validate the rule set.
///
/// # Errors
/// Errors bubble up from file IO, TOML parsing, or rule set validation.
pub fn load_rule_set(path: Option<&Path>) -> Result<RuleSetDef> {
    let rules = match path {
        Some(path) => load_rules_file(path)?,
        None => {
            let candidate = rules_file();
            if candidate.is_file() {
                load_rules_file(&candidate)?
            } else {
                info!("no rules.toml found in data directory, using built-in rule set");
                parse_rules(DEFAULT_RULES).context("while parsing built-in rule set")?
            }
        },
    };
    validate_rules(&rules)?;
    log_rule_counts(&rules);
    Ok(rules)
}

/// Parse a rule set from TOML text without validating it.
///
/// # Errors
/// Returns an error if the text is not a valid rule set document.
pub fn parse_rules(src: &str) -> Result<RuleSetDef> {
    toml::from_str(src).context("parsing rule set TOML")
}

fn load_rules_file(path: &Path) -> Result<RuleSetDef> {
    let src = fs::read_to_string(path).with_context(|| format!("reading rule set from '{}'", path.display()))?;
    let rules = parse_rules(&src).with_context(|| format!("while loading '{}'", path.display()))?;
    info!("rule set loaded from '{}'", path.display());
    Ok(rules)
}

/// Validate the rule set and return a single aggregated error.
fn validate_rules(rules: &RuleSetDef) -> Result<()> {
    let errors = relog_data::validate_rule_set(rules);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("rule set validation failed:\n{details}");
}

fn log_rule_counts(rules: &RuleSetDef) {
    info!(
        "{} protected names, {} greylisted spells, {} raid marks",
        rules.protected_names.len(),
        rules.greylist.len(),
        rules.raid_marks.len()
    );
    info!(
        "{} pet, {} pronoun, {} disambiguation, {} rename rules",
        rules.pet_association.len(),
        rules.pronoun.len(),
        rules.disambiguation.len(),
        rules.rename.len()
    );
}
