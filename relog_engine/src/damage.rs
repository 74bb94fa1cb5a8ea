//! Tagging of damage a unit does to itself.

use crate::rules::RuleCategory;

/// Capture groups holding the damaged unit and the damage source.
const VICTIM_GROUP: usize = 1;
const SOURCE_GROUP: usize = 4;

/// Names compare equal ignoring case and runs of whitespace. Empty names never match.
pub fn same_unit(a: &str, b: &str) -> bool {
    let a = a.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let b = b.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    !a.is_empty() && a == b
}

/// Rewrite the first self-damage rule whose victim and source are the same
/// unit. Rules whose names differ are skipped and the next rule is tried.
pub fn tag_self_damage(category: &RuleCategory, line: &str) -> (String, bool) {
    for rule in category.rules() {
        let Some(caps) = rule.regex().captures(line) else {
            continue;
        };
        let victim = caps.get(VICTIM_GROUP).map_or("", |m| m.as_str());
        let source = caps.get(SOURCE_GROUP).map_or("", |m| m.as_str());
        if same_unit(victim, source) {
            return (rule.regex().replace(line, rule.template()).into_owned(), true);
        }
    }
    (line.to_string(), false)
}

/// Friendly-fire exceptions take precedence; a line they rewrite is not
/// examined for self damage.
pub fn tag_damage(friendly_fire: &RuleCategory, self_damage: &RuleCategory, line: &str) -> String {
    let (line, matched) = friendly_fire.apply(line);
    if matched {
        return line;
    }
    tag_self_damage(self_damage, &line).0
}
