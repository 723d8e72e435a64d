//! Canonical identifiers and constants the engine compares against.
//!
//! Identifiers are lower-case; display text for them lives with the caller.

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 60;

/// A class is mastered once its skill levels sum to this.
pub const MASTERY_LEVEL: u32 = 10;
/// Unmastered classes a character may carry at once.
pub const MAX_UNMASTERED_CLASSES: usize = 3;

pub const HEROIC_TIER_LEVEL: u8 = 40;
pub const HEROIC_POOL_BONUS_LOW: u32 = 10;
pub const HEROIC_POOL_BONUS_HIGH: u32 = 20;

pub const BASE_IP: u32 = 6;
pub const DEEP_POCKETS_IP_BONUS: u32 = 4;

pub const POTION_RESTORE: u32 = 50;
pub const POTION_IP_COST: u32 = 3;
pub const DEEP_POCKETS_POTION_IP_COST: u32 = 2;

pub const TWIN_SHIELDS_DAMAGE: i32 = 5;
pub const TRANSFORMATION_DEFENSE_BASE: i32 = 13;
/// Forms manifested at once through theriomorphosis.
pub const MAX_MANIFESTED_FORMS: usize = 2;

pub const ATTRIBUTE_INCREASE_STEP: u8 = 2;
pub const IMPROVED_ATTRIBUTE_BONUS: i32 = 2;
pub const TRANSFORMATION_ATTRIBUTE_BONUS: i32 = 2;
pub const STATUS_MALUS: i32 = -2;

/// Character levels at which base attributes may grow, with the sum cap.
pub const ATTRIBUTE_MILESTONES: [(u8, u8); 2] = [(20, 34), (40, 36)];

pub mod heroic {
    pub const IRON_BODY: &str = "iron_body";
    pub const IRON_WILL: &str = "iron_will";
    pub const DEEP_POCKETS: &str = "deep_pockets";
    pub const MONKEY_GRIP: &str = "monkey_grip";
    pub const DUAL_SHIELDBEARER: &str = "dual_shieldbearer";
}

pub mod skills {
    pub const ROGUE: &str = "rogue";
    pub const DODGE: &str = "dodge";
    pub const THERIOMORPHOSIS: &str = "theriomorphosis";
    pub const GENOCLEPSIS: &str = "genoclepsis";
    pub const MUTANT: &str = "mutant";
    pub const DANCE: &str = "dance";
}

pub mod items {
    pub const UNARMED_STRIKE: &str = "unarmed_strike";
    pub const TWIN_SHIELDS: &str = "twin_shields";
    pub const NO_QUALITY: &str = "no_quality";
}
