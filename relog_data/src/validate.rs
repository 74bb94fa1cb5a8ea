use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed entries in a `RuleSetDef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Duplicate { kind: &'static str, value: String },
    Overlap { kind: &'static str, inner: String, outer: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Duplicate { kind, value } => {
                write!(f, "duplicate {kind} '{value}'")
            },
            ValidationError::Overlap { kind, inner, outer } => {
                write!(f, "{kind} '{inner}' occurs inside '{outer}'")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the structural invariants of a rule set.
///
/// Regex syntax is not checked here; the engine reports bad patterns when it
/// compiles the rule bank.
///
/// ```
/// use relog_data::{ProtectedKind, ProtectedNameDef, RuleSetDef, validate_rule_set};
///
/// let rules = RuleSetDef {
///     raid_marks: vec!["Skull".into()],
///     protected_names: vec![ProtectedNameDef {
///         kind: ProtectedKind::Mob,
///         decorated: "Onyxia's Elite Guard".into(),
///         placeholder: "Onyxias Elite Guard".into(),
///     }],
///     ..RuleSetDef::default()
/// };
/// assert!(validate_rule_set(&rules).is_empty());
/// ```
pub fn validate_rule_set(rules: &RuleSetDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_non_empty("raid mark", rules.raid_marks.iter().map(String::as_str), &mut errors);
    check_non_empty(
        "unwanted line marker",
        rules.unwanted_line_markers.iter().map(String::as_str),
        &mut errors,
    );
    check_non_empty(
        "ignored pet name",
        rules.ignored_pet_names.iter().map(String::as_str),
        &mut errors,
    );
    check_non_empty(
        "summoned pet name",
        rules.summoned_pet_names.iter().map(String::as_str),
        &mut errors,
    );

    let mut spells = HashSet::new();
    track_unique(
        "greylist spell",
        rules.greylist.iter().map(|g| g.spell.as_str()),
        &mut spells,
        &mut errors,
    );
    check_non_empty("greylist spell", rules.greylist.iter().map(|g| g.spell.as_str()), &mut errors);

    validate_protected_names(&rules.protected_names, &mut errors);

    for (category, defs) in [
        ("pet_association", &rules.pet_association),
        ("pronoun", &rules.pronoun),
        ("disambiguation", &rules.disambiguation),
        ("rename", &rules.rename),
        ("friendly_fire", &rules.friendly_fire),
        ("self_damage", &rules.self_damage),
        ("loot", &rules.loot),
    ] {
        for (index, def) in defs.iter().enumerate() {
            if def.pattern.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{category} rule #{index} has an empty pattern"),
                });
            }
        }
    }

    errors
}

/// Decorated names and placeholders must form a bijection, and within each
/// side no entry may occur inside another, otherwise restoring placeholders
/// would be ambiguous.
fn validate_protected_names(names: &[ProtectedNameDef], errors: &mut Vec<ValidationError>) {
    for name in names {
        if !name.decorated.contains('\'') {
            errors.push(ValidationError::InvalidValue {
                context: format!("protected name '{}' has no apostrophe", name.decorated),
            });
        }
        if name.placeholder.contains('\'') || name.placeholder.is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!(
                    "placeholder '{}' for '{}' must be non-empty and apostrophe-free",
                    name.placeholder, name.decorated
                ),
            });
        }
    }

    let mut decorated = HashSet::new();
    track_unique(
        "protected name",
        names.iter().map(|n| n.decorated.as_str()),
        &mut decorated,
        errors,
    );
    let mut placeholders = HashSet::new();
    track_unique(
        "placeholder",
        names.iter().map(|n| n.placeholder.as_str()),
        &mut placeholders,
        errors,
    );

    check_overlaps("protected name", names.iter().map(|n| n.decorated.as_str()), errors);
    check_overlaps("placeholder", names.iter().map(|n| n.placeholder.as_str()), errors);
}

fn track_unique<'a>(
    kind: &'static str,
    values: impl Iterator<Item = &'a str>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for value in values {
        if !set.insert(value.to_string()) {
            errors.push(ValidationError::Duplicate {
                kind,
                value: value.to_string(),
            });
        }
    }
}

fn check_non_empty<'a>(kind: &'static str, values: impl Iterator<Item = &'a str>, errors: &mut Vec<ValidationError>) {
    for (index, value) in values.enumerate() {
        if value.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("{kind} #{index} is blank"),
            });
        }
    }
}

fn check_overlaps<'a>(kind: &'static str, values: impl Iterator<Item = &'a str>, errors: &mut Vec<ValidationError>) {
    let values: Vec<&str> = values.filter(|v| !v.is_empty()).collect();
    for (i, inner) in values.iter().enumerate() {
        for (j, outer) in values.iter().enumerate() {
            // exact duplicates are reported by track_unique
            if i != j && inner != outer && outer.contains(inner) {
                errors.push(ValidationError::Overlap {
                    kind,
                    inner: (*inner).to_string(),
                    outer: (*outer).to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected(decorated: &str, placeholder: &str) -> ProtectedNameDef {
        ProtectedNameDef {
            kind: ProtectedKind::Mob,
            decorated: decorated.into(),
            placeholder: placeholder.into(),
        }
    }

    #[test]
    fn default_rule_set_is_valid() {
        assert!(validate_rule_set(&RuleSetDef::default()).is_empty());
    }

    #[test]
    fn overlapping_protected_names_are_reported() {
        let rules = RuleSetDef {
            protected_names: vec![
                protected("Medivh's Merlot", "Medivhs Merlot"),
                protected("Medivh's Merlot Blue Label", "Medivhs Merlot Blue Label"),
            ],
            ..RuleSetDef::default()
        };
        let errors = validate_rule_set(&rules);
        assert!(errors.contains(&ValidationError::Overlap {
            kind: "protected name",
            inner: "Medivh's Merlot".into(),
            outer: "Medivh's Merlot Blue Label".into(),
        }));
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::Overlap { kind: "placeholder", .. }))
        );
    }

    #[test]
    fn placeholder_with_apostrophe_is_rejected() {
        let rules = RuleSetDef {
            protected_names: vec![protected("Sartura's Royal Guard", "Sartura's Guard")],
            ..RuleSetDef::default()
        };
        let errors = validate_rule_set(&rules);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("apostrophe-free"));
    }

    #[test]
    fn duplicate_placeholders_break_the_bijection() {
        let rules = RuleSetDef {
            protected_names: vec![
                protected("Onyxia's Elite Guard", "Onyxias Elite Guard"),
                protected("Onyxia's Elite  Guard", "Onyxias Elite Guard"),
            ],
            ..RuleSetDef::default()
        };
        let errors = validate_rule_set(&rules);
        assert!(errors.contains(&ValidationError::Duplicate {
            kind: "placeholder",
            value: "Onyxias Elite Guard".into(),
        }));
    }

    #[test]
    fn blank_entries_and_duplicate_greylist_spells_are_reported() {
        let rules = RuleSetDef {
            raid_marks: vec![" ".into()],
            greylist: vec![
                GreylistDef {
                    spell: "Blood Fury".into(),
                    id: 20572,
                },
                GreylistDef {
                    spell: "Blood Fury".into(),
                    id: 23234,
                },
            ],
            pronoun: vec![RuleDef::new("", "x")],
            ..RuleSetDef::default()
        };
        let errors = validate_rule_set(&rules);
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn rule_set_deserializes_from_toml() {
        let src = r#"
            raid_marks = ["Skull", "Cross"]
            drop_all_failed_casts = false

            [[greylist]]
            spell = "Blood Fury"
            id = 20572

            [[protected_names]]
            kind = "item"
            decorated = "Medivh's Merlot Blue Label"
            placeholder = "Medivhs Merlot Blue Label"

            [[pronoun]]
            pattern = " You cast"
            replace = " {player} casts"
        "#;
        let rules: RuleSetDef = toml::from_str(src).expect("parse rule set");
        assert_eq!(rules.raid_marks.len(), 2);
        assert!(!rules.drop_all_failed_casts);
        assert_eq!(rules.greylist[0].id, 20572);
        assert_eq!(rules.protected_names[0].kind, ProtectedKind::Item);
        assert_eq!(rules.pronoun[0], RuleDef::new(" You cast", " {player} casts"));
        assert!(validate_rule_set(&rules).is_empty());
    }
}
