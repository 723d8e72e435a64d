mod common;

use fabula_engine::equipment::WieldingRules;
use fabula_engine::items::Item;
use fabula_engine::rules::{heroic, items};
use fabula_engine::{AttributeName, Equipped, RuleError, Slot};

fn held(equipped: &Equipped, slot: Slot) -> Option<&str> {
    equipped.get(slot).map(|item| item.name.as_str())
}

#[test]
fn one_handed_weapons_fill_main_then_off_then_replace_main() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();

    eq.equip(common::one_handed("dagger"), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("dagger"));
    assert_eq!(held(&eq, Slot::OffHand), None);

    eq.equip(common::one_handed("sword"), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("dagger"));
    assert_eq!(held(&eq, Slot::OffHand), Some("sword"));

    eq.equip(common::one_handed("axe"), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("axe"));
    assert_eq!(held(&eq, Slot::OffHand), Some("sword"));
}

#[test]
fn two_handed_weapon_clears_off_hand() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::one_handed("dagger"), rules).unwrap();
    eq.equip(common::shield("buckler", 1), rules).unwrap();

    eq.equip(common::two_handed("greatsword"), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("greatsword"));
    assert_eq!(held(&eq, Slot::OffHand), None);
}

#[test]
fn one_handed_weapon_does_not_pair_with_two_handed_main() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::two_handed("greatsword"), rules).unwrap();

    eq.equip(common::one_handed("dagger"), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("dagger"));
    assert_eq!(held(&eq, Slot::OffHand), None);
}

#[test]
fn shield_displaces_two_handed_main() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::two_handed("greatsword"), rules).unwrap();

    eq.equip(common::shield("buckler", 1), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), None);
    assert_eq!(held(&eq, Slot::OffHand), Some("buckler"));
}

#[test]
fn dual_shieldbearer_keeps_two_handed_main_beside_a_shield() {
    let rules = WieldingRules {
        dual_shieldbearer: true,
        ..WieldingRules::default()
    };
    let mut eq = Equipped::default();
    eq.equip(common::two_handed("greatsword"), rules).unwrap();

    eq.equip(common::shield("buckler", 1), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("greatsword"));
    assert_eq!(held(&eq, Slot::OffHand), Some("buckler"));
}

#[test]
fn shield_keeps_one_handed_main() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::one_handed("sword"), rules).unwrap();

    eq.equip(common::shield("buckler", 1), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), Some("sword"));
    assert_eq!(held(&eq, Slot::OffHand), Some("buckler"));
}

#[test]
fn second_shield_replaces_first_without_dual_shieldbearer() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::shield("buckler", 1), rules).unwrap();

    eq.equip(common::shield("bronze_shield", 2), rules).unwrap();
    assert_eq!(held(&eq, Slot::MainHand), None);
    assert_eq!(held(&eq, Slot::OffHand), Some("bronze_shield"));
}

#[test]
fn monkey_grip_pairs_two_handed_weapons() {
    let rules = WieldingRules {
        dual_two_handed: true,
        ..WieldingRules::default()
    };
    let mut eq = Equipped::default();
    eq.equip(common::two_handed("greatsword"), rules).unwrap();
    eq.equip(common::two_handed("staff"), rules).unwrap();

    assert_eq!(held(&eq, Slot::MainHand), Some("greatsword"));
    assert_eq!(held(&eq, Slot::OffHand), Some("staff"));
    assert_eq!(eq.weapons().len(), 2);
}

#[test]
fn dual_shieldbearer_fuses_twin_shields() {
    let rules = WieldingRules {
        dual_shieldbearer: true,
        ..WieldingRules::default()
    };
    let mut eq = Equipped::default();
    eq.equip(common::one_handed("sword"), rules).unwrap();
    eq.equip(common::shield("buckler", 2), rules).unwrap();

    eq.equip(common::shield("bronze_shield", 3), rules).unwrap();
    assert_eq!(held(&eq, Slot::OffHand), None);

    let twin = eq.get(Slot::MainHand).unwrap();
    assert_eq!(twin.name, items::TWIN_SHIELDS);
    assert_eq!(twin.bonus_defense, 5);
    assert!(twin.is_two_handed());

    let stats = twin.weapon_stats().unwrap();
    assert_eq!(stats.accuracy, [AttributeName::Might, AttributeName::Might]);
    assert_eq!(stats.bonus_damage, 5);
    assert_eq!(eq.bonus_defense(), 5);
}

#[test]
fn wielding_rules_follow_heroic_skills() {
    let mut c = common::character(30, [8, 8, 8, 8]);
    assert_eq!(WieldingRules::for_character(&c), WieldingRules::default());

    common::heroic(&mut c, heroic::MONKEY_GRIP);
    common::heroic(&mut c, heroic::DUAL_SHIELDBEARER);
    let rules = WieldingRules::for_character(&c);
    assert!(rules.dual_two_handed);
    assert!(rules.dual_shieldbearer);
}

#[test]
fn other_items_are_rejected_without_change() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::one_handed("dagger"), rules).unwrap();
    let before = eq.clone();

    let rope = Item::new("rope", fabula_engine::items::ItemKind::Other);
    let err = eq.equip(rope, rules).unwrap_err();
    assert_eq!(err, RuleError::Unequippable("rope".into()));
    assert_eq!(eq, before);
}

#[test]
fn armor_and_accessory_take_their_own_slots() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::flat_armor("bronze_plate", 11), rules).unwrap();
    eq.equip(Item::accessory("lucky_charm").with_initiative(1), rules)
        .unwrap();
    eq.equip(common::flat_armor("travel_garb", 0), rules).unwrap();

    assert_eq!(held(&eq, Slot::Armor), Some("travel_garb"));
    assert_eq!(held(&eq, Slot::Accessory), Some("lucky_charm"));
    assert_eq!(eq.bonus_initiative(), 1);
}

#[test]
fn unequipping_an_empty_slot_is_a_no_op() {
    let mut eq = Equipped::default();
    assert!(eq.unequip(Slot::Accessory).is_none());
    assert!(eq.is_empty());

    eq.equip(common::shield("buckler", 1), WieldingRules::default())
        .unwrap();
    assert_eq!(eq.unequip(Slot::OffHand).unwrap().name, "buckler");
    assert!(eq.unequip(Slot::OffHand).is_none());
    assert!(eq.is_empty());
}

#[test]
fn bonuses_sum_across_slots() {
    let rules = WieldingRules::default();
    let mut eq = Equipped::default();
    eq.equip(common::shield("bronze_shield", 2), rules).unwrap();
    eq.equip(
        common::flat_armor("silk_shirt", 10)
            .with_defense(0, 2)
            .with_initiative(-1),
        rules,
    )
    .unwrap();
    eq.equip(Item::accessory("lucky_charm").with_initiative(1), rules)
        .unwrap();

    assert_eq!(eq.bonus_defense(), 2);
    assert_eq!(eq.bonus_magic_defense(), 2);
    assert_eq!(eq.bonus_initiative(), 0);
    assert_eq!(eq.items().len(), 3);
}

#[test]
fn slot_names_parse_with_dashes_or_underscores() {
    assert_eq!("main-hand".parse::<Slot>(), Ok(Slot::MainHand));
    assert_eq!("OFF_HAND".parse::<Slot>(), Ok(Slot::OffHand));
    assert!("belt".parse::<Slot>().is_err());
    assert_eq!(Slot::Accessory.to_string(), "accessory");
}

#[test]
fn removing_from_backpack_unequips() {
    let mut c = common::character(5, [8, 8, 8, 8]);
    let sword = common::one_handed("sword");
    c.inventory.add(sword.clone());
    c.inventory
        .equipped
        .equip(sword, WieldingRules::default())
        .unwrap();

    let removed = c.inventory.remove("sword").unwrap();
    assert_eq!(removed.name, "sword");
    assert!(c.inventory.equipped.is_empty());
    assert_eq!(
        c.inventory.remove("sword"),
        Err(RuleError::ItemNotFound("sword".into()))
    );
}

#[test]
fn removing_a_spare_copy_keeps_the_equipped_one() {
    let mut c = common::character(5, [8, 8, 8, 8]);
    let dagger = common::one_handed("dagger");
    c.inventory.add(dagger.clone());
    c.inventory.add(dagger.clone());
    c.inventory
        .equipped
        .equip(dagger, WieldingRules::default())
        .unwrap();

    c.inventory.remove("dagger").unwrap();
    assert_eq!(held(&c.inventory.equipped, Slot::MainHand), Some("dagger"));

    c.inventory.remove("dagger").unwrap();
    assert!(c.inventory.equipped.is_empty());
}

#[test]
fn removing_a_fused_shield_drops_the_twin_shields() {
    let rules = WieldingRules {
        dual_shieldbearer: true,
        ..WieldingRules::default()
    };
    let mut c = common::character(5, [8, 8, 8, 8]);
    for (name, bonus) in [("buckler", 2), ("bronze_shield", 3)] {
        let shield = common::shield(name, bonus);
        c.inventory.add(shield.clone());
        c.inventory.equipped.equip(shield, rules).unwrap();
    }
    assert_eq!(c.inventory.equipped.copies_in_use("buckler"), 1);
    assert_eq!(c.inventory.equipped.slot_holding("bronze_shield"), Some(Slot::MainHand));

    c.inventory.remove("bronze_shield").unwrap();
    assert!(c.inventory.equipped.is_empty());
    assert_eq!(c.inventory.shields().count(), 1);
}

#[test]
fn purchase_needs_enough_zenit() {
    let mut c = common::character(5, [8, 8, 8, 8]);
    c.inventory.zenit = 100;

    c.inventory
        .purchase(common::one_handed("sword").with_cost(150))
        .unwrap_err();
    assert_eq!(c.inventory.zenit, 100);
    assert!(c.inventory.backpack.is_empty());

    c.inventory
        .purchase(common::one_handed("dagger").with_cost(50))
        .unwrap();
    assert_eq!(c.inventory.zenit, 50);
    assert_eq!(c.inventory.weapons().count(), 1);
}
