use relog_engine as re;

use re::loader::{DEFAULT_RULES, parse_rules};
use re::{NormalizeReport, Normalizer, PlayerName};

fn normalize(player: &str, lines: &[&str]) -> NormalizeReport {
    let rules = parse_rules(DEFAULT_RULES).expect("built-in rules");
    let normalizer = Normalizer::new(&rules, PlayerName::parse(player).unwrap()).expect("rules compile");
    normalizer
        .run(lines.iter().map(|l| (*l).to_string()).collect())
        .expect("normalize")
}

fn normalize_one(line: &str) -> String {
    let report = normalize("Thrall", &[line]);
    assert_eq!(report.lines.len(), 1, "line was dropped: {line}");
    report.lines[0].clone()
}

#[test]
fn second_person_cast_with_protected_target() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030 You cast Fireball(133)(Rank 1) on Onyxia's Elite Guard."),
        "8/22 20:01:54.030 Thrall casts Fireball on Onyxia's Elite Guard."
    );
}

#[test]
fn player_name_is_capitalized_before_substitution() {
    let report = normalize("tHRALL", &["8/22 20:01:54.030  You hit Kobold for 12."]);
    assert_eq!(report.lines, vec!["8/22 20:01:54.030  Thrall hits Kobold for 12."]);
}

#[test]
fn possessive_then_reflexive_takes_two_passes() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Your Renew heals you for 120."),
        "8/22 20:01:54.030  Thrall 's Renew heals Thrall for 120."
    );
}

#[test]
fn slain_and_dodged_lines() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  You have slain Kobold!"),
        "8/22 20:01:54.030  Kobold is slain by Thrall."
    );
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Ragnaros's Wrath of Ragnaros was dodged."),
        "8/22 20:01:54.030  Ragnaros 's Wrath of Ragnaros was dodged by Thrall."
    );
}

#[test]
fn self_inflicted_suffering_is_marked() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  You suffer 50 Fire damage from your Hellfire Effect."),
        "8/22 20:01:54.030  Thrall suffers 50 Fire damage from Thrall (self damage) 's Hellfire Effect."
    );
}

#[test]
fn self_damage_needs_matching_names() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Bob's Hellfire Effect hits Bob for 50 Fire damage."),
        "8/22 20:01:54.030  Bob (self damage) 's Hellfire Effect hits Bob for 50 Fire damage."
    );
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Bob's Fireball hits Alice for 50 Fire damage."),
        "8/22 20:01:54.030  Bob 's Fireball hits Alice for 50 Fire damage."
    );
}

#[test]
fn power_overwhelming_is_never_player_damage() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Imp suffers 80 Fire damage from Bob's Power Overwhelming."),
        "8/22 20:01:54.030  Imp suffers 80 Fire damage from Bob (self damage) 's Power Overwhelming."
    );
}

#[test]
fn totem_damage_is_credited_to_its_shaman() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Searing Totem III (Thrall)'s Attack hits Kobold for 40 Fire damage."),
        "8/22 20:01:54.030  Thrall 's Attack hits Kobold for 40 Fire damage."
    );
}

#[test]
fn lightning_strike_nature_portion_is_split_out() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Bob's Lightning Strike hits Kobold for 100 Nature damage."),
        "8/22 20:01:54.030  Bob 's Lightning Strike (nature) hits Kobold for 100 Nature damage."
    );
}

#[test]
fn pet_hits_are_folded_into_owner() {
    let report = normalize(
        "Thrall",
        &[
            "4/14 20:51:43.354  COMBATANT_INFO: 14.04.24 20:51:43&Hunter&HUNTER&Dwarf&2&Wolf&nil",
            "4/14 20:52:00.000  Wolf (Hunter) hits Kobold for 30.",
            "4/14 20:53:00.000  Wolf (Hunter) dies.",
        ],
    );
    assert_eq!(
        report.lines,
        vec![
            "4/14 20:51:43.354  COMBATANT_INFO: 14.04.24 20:51:43&Hunter&HUNTER&Dwarf&2&Wolf&nil",
            "4/14 20:52:00.000  Hunter 's Auto Attack (pet) hits Kobold for 30.",
            "4/14 20:53:00.000  Wolf (Hunter) dies.",
        ]
    );
}

#[test]
fn pet_sharing_owner_name_is_renamed_first() {
    let report = normalize(
        "Thrall",
        &[
            "4/14 20:51:43.354  COMBATANT_INFO: 14.04.24 20:51:43&Bob&HUNTER&Dwarf&2&Bob&nil",
            "4/14 20:52:00.000  Bob (Bob) hits Kobold for 30.",
        ],
    );
    assert_eq!(
        report.lines[0],
        "4/14 20:51:43.354  COMBATANT_INFO: 14.04.24 20:51:43&Bob&HUNTER&Dwarf&2&BobPet&nil"
    );
    assert_eq!(report.lines[1], "4/14 20:52:00.000  Bob 's Auto Attack (pet) hits Kobold for 30.");
    assert_eq!(report.roster.renames().count(), 1);
}

#[test]
fn malformed_record_is_reported_and_kept() {
    let report = normalize("Thrall", &["4/14 20:51:43.354  COMBATANT_INFO: 14.04.24&Bob"]);
    assert_eq!(report.lines.len(), 1);
    assert_eq!(
        report.diagnostics,
        vec![re::Diagnostic::MalformedRecord {
            line_number: 1,
            fields: 2,
        }]
    );
}

#[test]
fn greylist_and_noise_lines_are_dropped_without_trace() {
    let input = [
        "4/14 20:51:43.354  Grom casts Blood Fury(20572).",
        "4/14 20:51:43.354  Grom casts Blood Fury(23234).",
        "4/14 20:51:44.000  Bob begins to cast Frostbolt(116)(Rank 4).",
        "4/14 20:51:44.100  Bob channels Arcane Missiles(5143)(Rank 1).",
        "4/14 20:51:44.200  Bob fails casting Polymorph.",
        "4/14 20:51:44.300  MARK: Ragnaros&Skull",
        "4/14 20:51:44.400  You fail to cast Fireball: Not enough mana.",
        "4/14 20:51:45.000  Bob casts Frostbolt(116)(Rank 4) on Ragnaros(Skull).",
    ];
    let report = normalize("Thrall", &input);
    assert_eq!(
        report.lines,
        vec![
            "4/14 20:51:43.354  Grom casts Blood Fury.",
            "4/14 20:51:45.000  Bob casts Frostbolt on Ragnaros.",
        ]
    );
    assert_eq!(report.dropped, 6);
    assert_eq!(report.input_len(), input.len());
    assert!(report.lines.iter().all(|l| !l.contains("23234") && !l.contains("MARK:")));
}

#[test]
fn loot_without_quantity_gets_one() {
    assert_eq!(
        normalize_one("4/14 20:51:43.354  LOOT: 14.04.24 20:51:43&Bob receives loot: |cff1eff00|Hitem:1:0:0:0|h[Hide]|h|r."),
        "4/14 20:51:43.354  LOOT: 14.04.24 20:51:43&Bob receives loot: |cff1eff00|Hitem:1:0:0:0|h[Hide]|h|rx1."
    );
}

#[test]
fn rewriting_never_adds_lines() {
    let input = [
        "8/22 20:01:54.030  Your Fireball hits you for 10 Fire damage.",
        "8/22 20:01:54.030  Ragnaros hits you for 500.",
        "8/22 20:01:54.030  You gain Blessing of Might from Uther's Blessing.",
    ];
    let report = normalize("Thrall", &input);
    assert_eq!(report.lines.len() + report.dropped, input.len());
    assert_eq!(report.lines[0], "8/22 20:01:54.030  Thrall (self damage) 's Fireball hits Thrall for 10 Fire damage.");
    assert_eq!(report.lines[1], "8/22 20:01:54.030  Ragnaros hits Thrall for 500.");
}

#[test]
fn second_person_cast_start_is_dropped() {
    let report = normalize(
        "Thrall",
        &[
            "8/22 20:01:54.030 You begin to cast Frostbolt(116)(Rank 4).",
            "8/22 20:01:54.030 You begin to cast Blood Fury(20572).",
        ],
    );
    assert!(report.lines.is_empty());
    assert_eq!(report.dropped, 2);
}

#[test]
fn summoned_ignored_and_dying_pets() {
    let report = normalize(
        "Thrall",
        &[
            "  Battle Chicken (Kel) hits X for 1.",
            "  Deathknight Understudy (Kel) hits X for 5.",
            "  Wolf (Kel) is killed by Ragnaros.",
        ],
    );
    assert_eq!(
        report.lines,
        vec![
            "  Kel 's Auto Attack (pet) hits X for 1.",
            "  Deathknight Understudy (Kel) hits X for 5.",
            "  Wolf (Kel) is killed by Ragnaros.",
        ]
    );
}

#[test]
fn dismissed_pet_is_credited_to_its_owner() {
    let report = normalize(
        "Thrall",
        &[
            "8/22 20:00:00.000  COMBATANT_INFO: 22.08.24 20:00:00&Thrall&HUNTER&Orc&2&Wolf&nil",
            "8/22 20:01:54.030  Your Wolf (Thrall) is dismissed.",
        ],
    );
    assert_eq!(report.lines[1], "8/22 20:01:54.030  Thrall 's Wolf (Thrall) is dismissed.");
}

#[test]
fn remains_pet_missiles_stay_apart_from_owner() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Minor Arcane Elemental (Kel)'s Arcane Missiles hits Kobold for 40 Arcane damage."),
        "8/22 20:01:54.030  Kel 's Arcane Missiles (pet) hits Kobold for 40 Arcane damage."
    );
}

#[test]
fn immune_to_possessive_is_split() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030 Ragnaros is immune to Bob's Fireball."),
        "8/22 20:01:54.030 Ragnaros is immune to Bob 's Fireball."
    );
}

#[test]
fn possessive_after_owner_tag_is_split() {
    assert_eq!(
        normalize_one("8/22 20:01:54.030  Imp (Bob)'s Firebolt hits Kobold for 20 Fire damage."),
        "8/22 20:01:54.030  Imp (Bob) 's Firebolt hits Kobold for 20 Fire damage."
    );
}
