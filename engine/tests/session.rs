mod common;

use fabula_engine::conditions::Status;
use fabula_engine::resources::Potion;
use fabula_engine::rules::{heroic, items};
use fabula_engine::session::Manifestation;
use fabula_engine::{
    AttributeName, Catalog, ProgressState, Resource, RuleError, Session, Slot, StoreConfig,
    YamlDirStore,
};

fn rogue_session(catalog: &Catalog) -> Session<'_> {
    let mut c = common::character(5, [10, 8, 8, 6]);
    c.inventory.zenit = 500;
    let mut session = Session::new(catalog, c, ProgressState::default());
    session.add_class("Rogue").unwrap();
    for _ in 0..2 {
        session.allocate_skill_point("rogue", "dodge").unwrap();
    }
    for _ in 0..3 {
        session.allocate_skill_point("rogue", "high_speed").unwrap();
    }
    session
}

fn mutant_session(catalog: &Catalog) -> Session<'_> {
    let c = common::character(5, [8, 10, 8, 6]);
    let mut session = Session::new(catalog, c, ProgressState::default());
    session.add_class("mutant").unwrap();
    for (skill, points) in [("theriomorphosis", 2), ("genoclepsis", 1), ("vigilant", 2)] {
        for _ in 0..points {
            session.allocate_skill_point("mutant", skill).unwrap();
        }
    }
    session.unlock_therioform("arpeform").unwrap();
    session.unlock_therioform("ferroform").unwrap();
    session
}

#[test]
fn sheet_summarizes_a_geared_rogue() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.purchase("bronze_sword").unwrap();
    session.purchase("buckler").unwrap();
    session.equip("bronze_sword").unwrap();
    session.equip("buckler").unwrap();
    assert_eq!(session.character().inventory.zenit, 200);

    let sheet = session.sheet();
    assert_eq!(sheet.defense, 13);
    assert!(sheet.progression.complete);
    insta::assert_snapshot!(sheet.to_string(), @r"
    Ayla (level 5)
    classes: rogue 5
    dexterity d10, might d8, insight d8, willpower d6
    hp: 45/45
    mp: 35/35
    ip: 8/8
    defense 13, magic defense 8
    initiative d8 + d10
    attack bronze_sword: d10 + d8 +1, HR +6 physical
    main_hand: bronze_sword
    off_hand: buckler
    ");
}

#[test]
fn sheet_serializes_with_snake_case_keys() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.add_status(Status::Slow);

    let json = serde_json::to_value(session.sheet()).unwrap();
    assert_eq!(json["pools"]["hp"]["max"], 45);
    assert_eq!(json["attributes"]["dexterity"]["current"], 8);
    assert_eq!(json["statuses"][0], "slow");
    assert_eq!(json["progression"]["skill_points_available"], 0);
}

#[test]
fn statuses_refresh_current_dice() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);

    let deltas = session.add_status(Status::Enraged);
    assert_eq!(deltas[&AttributeName::Dexterity], -2);
    assert_eq!(deltas[&AttributeName::Insight], -2);
    assert_eq!(session.character().attributes.dexterity.current, 8);
    assert_eq!(session.sheet().initiative, "d6 + d8");

    let deltas = session.remove_status(Status::Enraged);
    assert!(deltas.values().all(|d| *d == 0));
    assert_eq!(session.character().attributes.dexterity.current, 10);
}

#[test]
fn improved_attribute_toggles() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    assert_eq!(session.toggle_improved(AttributeName::Willpower)[&AttributeName::Willpower], 2);
    assert_eq!(session.toggle_improved(AttributeName::Willpower)[&AttributeName::Willpower], 0);
}

#[test]
fn new_session_refreshes_stale_state() {
    let catalog = Catalog::builtin().unwrap();
    let mut c = common::character(5, [8, 8, 8, 8]);
    c.attributes.might.current = 12;
    let mut p = ProgressState {
        hp_deficit: 1_000,
        ..ProgressState::default()
    };
    p.add_status(Status::Weak);

    let session = Session::new(&catalog, c, p);
    assert_eq!(session.character().attributes.might.current, 6);
    assert_eq!(session.progress().hp_deficit, 45);
}

#[test]
fn purchase_and_equip_need_the_item() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);

    assert_eq!(
        session.purchase("excalibur"),
        Err(RuleError::NotInCatalog {
            kind: "item",
            name: "excalibur".into()
        })
    );
    assert_eq!(
        session.equip("greatsword"),
        Err(RuleError::ItemNotFound("greatsword".into()))
    );

    session.purchase("greatsword").unwrap();
    assert_eq!(
        session.purchase("greatsword"),
        Err(RuleError::InsufficientZenit {
            cost: 300,
            available: 200
        })
    );
    session.equip("greatsword").unwrap();
    assert!(session.unequip(Slot::MainHand).is_some());
    assert!(session.unequip(Slot::MainHand).is_none());
}

#[test]
fn each_slot_needs_its_own_owned_copy() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.purchase("iron_dagger").unwrap();
    session.equip("iron_dagger").unwrap();
    assert_eq!(
        session.equip("iron_dagger"),
        Err(RuleError::ItemNotFound("iron_dagger".into()))
    );
    assert!(session.character().inventory.equipped.get(Slot::OffHand).is_none());

    session.purchase("iron_dagger").unwrap();
    session.equip("iron_dagger").unwrap();
    let equipped = &session.character().inventory.equipped;
    assert_eq!(equipped.copies_in_use("iron_dagger"), 2);
}

#[test]
fn one_shield_cannot_fuse_with_itself() {
    let catalog = Catalog::builtin().unwrap();
    let mut c = common::character(5, [8, 8, 8, 8]);
    c.inventory.zenit = 500;
    common::heroic(&mut c, heroic::DUAL_SHIELDBEARER);
    let mut session = Session::new(&catalog, c, ProgressState::default());
    session.purchase("buckler").unwrap();
    session.equip("buckler").unwrap();
    assert_eq!(
        session.equip("buckler"),
        Err(RuleError::ItemNotFound("buckler".into()))
    );

    session.purchase("buckler").unwrap();
    session.equip("buckler").unwrap();
    let equipped = &session.character().inventory.equipped;
    assert_eq!(
        equipped.get(Slot::MainHand).map(|item| item.name.as_str()),
        Some(items::TWIN_SHIELDS)
    );
    assert_eq!(equipped.copies_in_use("buckler"), 2);
}

#[test]
fn other_items_stay_in_the_backpack() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.purchase("rope").unwrap();
    assert_eq!(
        session.equip("rope"),
        Err(RuleError::Unequippable("rope".into()))
    );
    assert!(session.character().inventory.equipped.is_empty());
}

#[test]
fn theriomorphosis_manifests_unlocked_forms_for_a_third_of_hp() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = mutant_session(&catalog);
    assert_eq!(session.sheet().pools[&Resource::Hp].max, 60);

    session
        .manifest(&["arpeform", "ferroform"], Manifestation::Theriomorphosis)
        .unwrap();
    assert_eq!(session.progress().hp_deficit, 20);
    assert_eq!(session.character().attributes.dexterity.current, 10);

    let sheet = session.sheet();
    assert_eq!(sheet.defense, 14);
    assert_eq!(sheet.active_therioforms, vec!["arpeform", "ferroform"]);

    session.end_transformations();
    assert!(!session.progress().is_transformed());
    assert_eq!(session.character().attributes.dexterity.current, 8);
    assert_eq!(session.sheet().defense, 8);
}

#[test]
fn theriomorphosis_rejections_cost_nothing() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = mutant_session(&catalog);

    assert_eq!(
        session.manifest(
            &["arpeform", "ferroform", "gorgoform"],
            Manifestation::Theriomorphosis
        ),
        Err(RuleError::SpecialLimit {
            feature: "manifested therioform",
            limit: 2
        })
    );
    assert_eq!(
        session.manifest(&["gorgoform"], Manifestation::Theriomorphosis),
        Err(RuleError::TherioformLocked("gorgoform".into()))
    );
    assert_eq!(session.progress().hp_deficit, 0);
    assert!(!session.progress().is_transformed());
}

#[test]
fn genoclepsis_borrows_catalog_forms() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = mutant_session(&catalog);

    session
        .manifest(&["Gorgoform"], Manifestation::Genoclepsis)
        .unwrap();
    assert_eq!(session.character().attributes.willpower.current, 8);

    assert!(matches!(
        session.manifest(&["gorgoform", "dynamoform"], Manifestation::Genoclepsis),
        Err(RuleError::SpecialLimit { limit: 1, .. })
    ));
    assert_eq!(
        session.manifest(&["hydroform"], Manifestation::Genoclepsis),
        Err(RuleError::TherioformLocked("hydroform".into()))
    );
}

#[test]
fn manifesting_nothing_ends_the_transformation() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = mutant_session(&catalog);
    session
        .manifest(&["arpeform"], Manifestation::Theriomorphosis)
        .unwrap();
    let deficit = session.progress().hp_deficit;

    session.manifest(&[], Manifestation::Theriomorphosis).unwrap();
    assert!(!session.progress().is_transformed());
    assert_eq!(session.progress().hp_deficit, deficit);
}

#[test]
fn potions_and_pools() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.spend(Resource::Mp, 30);
    session.drink_potion(Potion::Mana).unwrap();
    assert_eq!(session.progress().mp_deficit, 0);
    assert_eq!(session.progress().ip_deficit, 3);

    session.recover(Resource::Ip, 10);
    assert_eq!(session.progress().ip_deficit, 0);
}

#[test]
fn catalog_backed_progression() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);

    assert!(matches!(
        session.add_class("bard"),
        Err(RuleError::NotInCatalog { kind: "class", .. })
    ));
    assert!(session.heroic_skill_options(catalog.heroic_skills()).is_empty());

    session.add_class("spiritist").unwrap();
    session.level_up("spiritist", "spiritual_magic").unwrap();
    session.learn_spell("spiritist", "Heal").unwrap();
    assert_eq!(session.character().spells_for("spiritist")[0].name, "heal");
    assert!(matches!(
        session.learn_spell("spiritist", "meteor"),
        Err(RuleError::NotInCatalog { kind: "spell", .. })
    ));
    assert!(matches!(
        session.unlock_dance("bird_dance"),
        Err(RuleError::SpecialLimit { feature: "dance", limit: 0 })
    ));
}

#[test]
fn mastered_classes_open_heroic_skills() {
    let catalog = Catalog::builtin().unwrap();
    let c = common::character(10, [8, 8, 8, 8]);
    let mut session = Session::new(&catalog, c, ProgressState::default());
    session.add_class("rogue").unwrap();
    for (skill, points) in [("dodge", 3), ("high_speed", 3), ("soul_steal", 4)] {
        for _ in 0..points {
            session.allocate_skill_point("rogue", skill).unwrap();
        }
    }

    let options = session.heroic_skill_options(catalog.heroic_skills());
    assert_eq!(options, vec!["deep_pockets"]);

    session.add_heroic_skill("deep_pockets").unwrap();
    assert_eq!(session.sheet().pools[&Resource::Ip].max, 12);
    assert_eq!(
        session.add_heroic_skill("iron_body"),
        Err(RuleError::HeroicSkillLocked)
    );
}

#[test]
fn removing_points_keeps_deficits_in_range() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.spend(Resource::Ip, 8);
    session.remove_skill_point("rogue", "dodge").unwrap();
    assert_eq!(session.progress().ip_deficit, 8);
    assert!(!session.sheet().progression.complete);
}

#[test]
fn saving_goes_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlDirStore::new(StoreConfig::from_root(dir.path()));
    let catalog = Catalog::builtin().unwrap();
    let mut session = rogue_session(&catalog);
    session.add_status(Status::Dazed);
    session.save(&store).unwrap();

    let loaded = fabula_engine::store::load(&store, session.id()).unwrap();
    assert!(loaded.warning.is_none());
    let reopened = Session::from_loaded(&catalog, loaded);
    assert_eq!(reopened.character(), session.character());
    assert_eq!(reopened.progress(), session.progress());

    session.remove_skill_point("rogue", "dodge").unwrap();
    assert!(session.save(&store).is_err());
}
