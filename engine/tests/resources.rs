mod common;

use fabula_engine::classes::ClassBonus;
use fabula_engine::resources::{self, Potion, Pools};
use fabula_engine::rules::heroic;
use fabula_engine::{ProgressState, Resource, RuleError};
use proptest::prelude::*;

#[test]
fn max_hp_scenario_level_five_might_ten() {
    let mut c = common::character(5, [8, 10, 8, 6]);
    c.classes
        .push(common::class("guardian", Some((ClassBonus::Hp, 5)), &[]));
    assert_eq!(resources::max_hp(&c), 60);
}

#[test]
fn iron_body_bonus_is_tiered_by_level() {
    let mut c = common::character(39, [8, 8, 8, 8]);
    common::heroic(&mut c, heroic::IRON_BODY);
    assert_eq!(resources::max_hp(&c), 39 + 40 + 10);

    c.set_level(40).unwrap();
    assert_eq!(resources::max_hp(&c), 40 + 40 + 20);
}

#[test]
fn iron_will_only_raises_mp() {
    let mut c = common::character(10, [8, 8, 8, 10]);
    let hp_before = resources::max_hp(&c);
    common::heroic(&mut c, heroic::IRON_WILL);
    assert_eq!(resources::max_mp(&c), 10 + 50 + 10);
    assert_eq!(resources::max_hp(&c), hp_before);
}

#[test]
fn max_ip_has_flat_base_and_deep_pockets() {
    let mut c = common::character(5, [8, 8, 8, 8]);
    c.classes
        .push(common::class("rogue", Some((ClassBonus::Ip, 2)), &[]));
    assert_eq!(resources::max_ip(&c), 8);

    common::heroic(&mut c, heroic::DEEP_POCKETS);
    assert_eq!(resources::max_ip(&c), 12);
}

#[test]
fn class_bonuses_only_count_matching_kind() {
    let mut c = common::character(5, [8, 8, 8, 8]);
    c.classes
        .push(common::class("elementalist", Some((ClassBonus::Mp, 5)), &[]));
    c.classes
        .push(common::class("fury", Some((ClassBonus::Hp, 5)), &[]));
    assert_eq!(resources::max_hp(&c), 5 + 40 + 5);
    assert_eq!(resources::max_mp(&c), 5 + 40 + 5);
    assert_eq!(resources::max_ip(&c), 6);
}

#[test]
fn crisis_is_at_or_below_half() {
    // max hp 5 + 40 = 45, threshold 22
    let c = common::character(5, [8, 8, 8, 8]);
    let mut p = ProgressState::default();
    assert_eq!(resources::crisis_threshold(&c), 22);
    assert!(!resources::in_crisis(&c, &p));

    resources::spend(&c, &mut p, Resource::Hp, 22);
    assert_eq!(resources::current(&c, &p, Resource::Hp), 23);
    assert!(!resources::in_crisis(&c, &p));

    resources::spend(&c, &mut p, Resource::Hp, 1);
    assert!(resources::in_crisis(&c, &p));
}

#[test]
fn deficits_clamp_to_pool() {
    let c = common::character(5, [8, 8, 8, 8]);
    let mut p = ProgressState::default();

    resources::spend(&c, &mut p, Resource::Mp, 1_000);
    assert_eq!(p.mp_deficit, resources::max_mp(&c));
    assert_eq!(resources::current(&c, &p, Resource::Mp), 0);

    resources::recover(&c, &mut p, Resource::Mp, 1_000);
    assert_eq!(p.mp_deficit, 0);
}

#[test]
fn normalize_shrinks_deficits_after_pool_drops() {
    let mut c = common::character(10, [8, 8, 8, 8]);
    let mut p = ProgressState::default();
    resources::spend(&c, &mut p, Resource::Hp, 50);
    assert_eq!(p.hp_deficit, 50);

    c.set_level(1).unwrap();
    p.normalize(&Pools::of(&c));
    assert_eq!(p.hp_deficit, 41);
}

#[test]
fn potion_restores_fifty_for_three_ip() {
    let c = common::character(20, [8, 8, 8, 8]);
    let mut p = ProgressState::default();
    resources::spend(&c, &mut p, Resource::Hp, 55);

    resources::drink_potion(&c, &mut p, Potion::Health).unwrap();
    assert_eq!(p.hp_deficit, 5);
    assert_eq!(p.ip_deficit, 3);
}

#[test]
fn deep_pockets_makes_potions_cheaper() {
    let mut c = common::character(5, [8, 8, 8, 8]);
    common::heroic(&mut c, heroic::DEEP_POCKETS);
    let mut p = ProgressState::default();
    resources::spend(&c, &mut p, Resource::Mp, 10);

    resources::drink_potion(&c, &mut p, Potion::Mana).unwrap();
    assert_eq!(p.mp_deficit, 0);
    assert_eq!(p.ip_deficit, 2);
}

#[test]
fn potion_without_ip_is_rejected_untouched() {
    let c = common::character(5, [8, 8, 8, 8]);
    let mut p = ProgressState::default();
    resources::spend(&c, &mut p, Resource::Ip, 4);
    resources::spend(&c, &mut p, Resource::Hp, 30);
    let before = p.clone();

    let err = resources::drink_potion(&c, &mut p, Potion::Health).unwrap_err();
    assert_eq!(
        err,
        RuleError::InsufficientResource {
            resource: Resource::Ip,
            needed: 3,
            available: 2,
        }
    );
    assert_eq!(p, before);
}

fn die() -> impl Strategy<Value = u8> {
    prop::sample::select(vec![6u8, 8, 10, 12])
}

proptest! {
    #[test]
    fn max_pools_grow_with_level(level in 1u32..60, might in die(), willpower in die()) {
        let low = common::character(level, [8, might, 8, willpower]);
        let high = common::character(level + 1, [8, might, 8, willpower]);
        prop_assert!(resources::max_hp(&high) >= resources::max_hp(&low));
        prop_assert!(resources::max_mp(&high) >= resources::max_mp(&low));
        prop_assert!(resources::max_ip(&high) >= resources::max_ip(&low));
    }

    #[test]
    fn max_pools_grow_with_attribute(level in 1u32..=60, step in 0usize..3) {
        let dice = [6u8, 8, 10, 12];
        let low = common::character(level, [8, dice[step], 8, dice[step]]);
        let high = common::character(level, [8, dice[step + 1], 8, dice[step + 1]]);
        prop_assert!(resources::max_hp(&high) >= resources::max_hp(&low));
        prop_assert!(resources::max_mp(&high) >= resources::max_mp(&low));
    }

    #[test]
    fn deficits_stay_within_pool(spends in prop::collection::vec((0u32..200, any::<bool>()), 0..20)) {
        let c = common::character(12, [8, 8, 8, 8]);
        let mut p = ProgressState::default();
        for (amount, lose) in spends {
            if lose {
                resources::spend(&c, &mut p, Resource::Hp, amount);
            } else {
                resources::recover(&c, &mut p, Resource::Hp, amount);
            }
            prop_assert!(p.hp_deficit <= resources::max_hp(&c));
        }
    }
}
