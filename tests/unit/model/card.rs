use super::*;

#[test]
fn numeric_fields_are_coerced_to_non_negative_integers() {
    let m = CardVisualModel::from_json_str(
        r#"{ "name": "Imp", "cost": -2, "attack": 3.9, "health": "5" }"#,
    )
    .unwrap();
    assert_eq!(m.cost(), 0);
    assert_eq!(m.attack(), 3);
    assert_eq!(m.health(), 5);

    let m = CardVisualModel::from_json_str(
        r#"{ "name": "Imp", "cost": "lots", "attack": null, "health": true }"#,
    )
    .unwrap();
    assert_eq!((m.cost(), m.attack(), m.health()), (0, 0, 0));
}

#[test]
fn missing_id_is_generated_and_unique() {
    let a = CardVisualModel::builder("A").build();
    let b = CardVisualModel::builder("B").build();
    assert!(a.id().starts_with("card-"));
    assert_ne!(a.id(), b.id());

    let c = CardVisualModel::builder("C").id("  ").build();
    assert!(c.id().starts_with("card-"));

    let d = CardVisualModel::builder("D").id("phoenix-1").build();
    assert_eq!(d.id(), "phoenix-1");
}

#[test]
fn aliases_and_category_parse() {
    let m = CardVisualModel::from_json_str(
        r#"{ "id": "x", "name": "Bolt", "art": "/cards/bolt.png", "category": "spell",
             "abilities": ["ranged"], "mana": 1 }"#,
    )
    .unwrap();
    assert_eq!(m.art_url(), Some("/cards/bolt.png"));
    assert_eq!(m.category(), CardCategory::Spell);
    assert_eq!(m.cost(), 1);
    assert!(m.has_tag("RANGED"));
    assert!(!m.shows_stat_badges());
}

#[test]
fn empty_art_url_is_treated_as_absent() {
    let m = CardVisualModel::builder("Blank").art_url("   ").build();
    assert_eq!(m.art_url(), None);
}

#[test]
fn type_line_and_abilities() {
    let m = CardVisualModel::builder("Phoenix")
        .tag("flying")
        .tag("first-strike")
        .tag("ranged")
        .tag("rebirth")
        .tag("haste")
        .stats(5, 4, 3)
        .build();
    assert_eq!(m.type_line(), "Creature - Flying");
    let lines: Vec<String> = m.ability_lines().collect();
    assert_eq!(lines, vec!["Flying", "First Strike", "Ranged", "Rebirth"]);
    assert!(m.shows_stat_badges());
}

#[test]
fn list_parses_arrays() {
    let list = CardVisualModel::list_from_json_str(
        r#"[{ "name": "A" }, { "name": "B", "category": "trap" }]"#,
    )
    .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].category(), CardCategory::Trap);
}
