//! Progression gates and the mutations they guard.
//!
//! Every mutation checks all of its gates before touching the character, so
//! a rejected call leaves it as it was.

use crate::character::{Character, Dance, Therioform};
use crate::classes::{CharClass, HeroicSkill, Spell};
use crate::error::RuleError;
use crate::rules::{
    ATTRIBUTE_INCREASE_STEP, ATTRIBUTE_MILESTONES, MAX_LEVEL, MAX_UNMASTERED_CLASSES, skills,
};
use crate::{AttributeName, MAX_DIE};

pub fn skill_points_available(character: &Character) -> u32 {
    u32::from(character.level()).saturating_sub(character.skill_total())
}

pub fn can_allocate_more(character: &Character) -> bool {
    skill_points_available(character) > 0
}

/// Skill levels across all classes equal the character level.
pub fn is_complete(character: &Character) -> bool {
    character.skill_total() == u32::from(character.level())
}

pub fn ensure_complete(character: &Character) -> Result<(), RuleError> {
    if is_complete(character) {
        Ok(())
    } else {
        Err(RuleError::Incomplete {
            level: character.level(),
            allocated: character.skill_total(),
        })
    }
}

pub fn can_add_class(character: &Character) -> bool {
    let unmastered = character.classes.iter().filter(|c| !c.is_mastered()).count();
    unmastered < MAX_UNMASTERED_CLASSES
}

/// Add a class taken from the catalog. Its skills start at level 0.
pub fn add_class(character: &mut Character, class: CharClass) -> Result<(), RuleError> {
    if character.has_class(&class.name) {
        return Err(RuleError::ClassAlreadyAdded(class.name));
    }
    if !can_add_class(character) {
        return Err(RuleError::TooManyClasses);
    }
    let mut class = class;
    class.clear_skills();
    tracing::debug!(character = %character.id, class = %class.name, "class added");
    character.classes.push(class);
    Ok(())
}

/// Drop a class along with the spells learned through it.
pub fn remove_class(character: &mut Character, name: &str) -> Result<CharClass, RuleError> {
    let key = name.to_lowercase();
    let idx = character
        .classes
        .iter()
        .position(|c| c.name == key)
        .ok_or_else(|| RuleError::ClassNotFound(name.to_owned()))?;
    character.spells.shift_remove(&key);
    tracing::debug!(character = %character.id, class = %key, "class removed");
    Ok(character.classes.remove(idx))
}

fn skill_gate(character: &Character, class: &str, skill: &str) -> Result<(u32, u32), RuleError> {
    let found = character
        .class(class)
        .ok_or_else(|| RuleError::ClassNotFound(class.to_owned()))?;
    let skill_ref = found.skill(skill).ok_or_else(|| RuleError::SkillNotFound {
        class: class.to_owned(),
        skill: skill.to_owned(),
    })?;
    Ok((skill_ref.current_level, skill_ref.max_level))
}

fn bump_skill(character: &mut Character, class: &str, skill: &str, delta: i32) {
    if let Some(skill_ref) = character
        .class_mut(class)
        .and_then(|c| c.skill_mut(skill))
    {
        skill_ref.current_level = skill_ref.current_level.saturating_add_signed(delta);
    }
}

pub fn allocate_skill_point(
    character: &mut Character,
    class: &str,
    skill: &str,
) -> Result<(), RuleError> {
    let (level, max) = skill_gate(character, class, skill)?;
    if !can_allocate_more(character) {
        return Err(RuleError::NoSkillPoints);
    }
    if level >= max {
        return Err(RuleError::SkillMaxed {
            skill: skill.to_owned(),
            max,
        });
    }
    bump_skill(character, class, skill, 1);
    tracing::debug!(character = %character.id, class, skill, level = level + 1, "skill point allocated");
    Ok(())
}

pub fn remove_skill_point(
    character: &mut Character,
    class: &str,
    skill: &str,
) -> Result<(), RuleError> {
    let (level, _) = skill_gate(character, class, skill)?;
    if level == 0 {
        return Err(RuleError::SkillEmpty(skill.to_owned()));
    }
    bump_skill(character, class, skill, -1);
    tracing::debug!(character = %character.id, class, skill, level = level - 1, "skill point removed");
    Ok(())
}

/// Raise the character one level and spend the new point on `skill`.
pub fn level_up(character: &mut Character, class: &str, skill: &str) -> Result<(), RuleError> {
    let current = character.level();
    if current >= MAX_LEVEL {
        return Err(RuleError::MaxLevelReached);
    }
    let (level, max) = skill_gate(character, class, skill)?;
    if level >= max {
        return Err(RuleError::SkillMaxed {
            skill: skill.to_owned(),
            max,
        });
    }
    if character.skill_total() > u32::from(current) {
        return Err(RuleError::NoSkillPoints);
    }
    character.set_level(u32::from(current) + 1)?;
    bump_skill(character, class, skill, 1);
    tracing::info!(character = %character.id, level = current + 1, class, skill, "level up");
    Ok(())
}

pub fn can_add_heroic_skill(character: &Character) -> bool {
    character.mastered_classes() > character.heroic_skills.len()
}

/// Whether `skill` may be picked, ignoring the mastered-class count.
pub fn heroic_skill_available(character: &Character, skill: &HeroicSkill) -> bool {
    if character.has_heroic_skill(&skill.name) {
        return skill.can_add_several_times;
    }
    if skill.required_class.is_empty() {
        return true;
    }
    let mastered_required = character
        .classes
        .iter()
        .filter(|c| c.is_mastered())
        .any(|c| skill.required_class.contains(&c.name));
    if !mastered_required {
        return false;
    }
    match &skill.required_skill {
        Some(required) => character.has_skill(required),
        None => true,
    }
}

pub fn add_heroic_skill(character: &mut Character, skill: HeroicSkill) -> Result<(), RuleError> {
    if !can_add_heroic_skill(character) {
        return Err(RuleError::HeroicSkillLocked);
    }
    if character.has_heroic_skill(&skill.name) && !skill.can_add_several_times {
        return Err(RuleError::HeroicSkillOwned(skill.name));
    }
    if !heroic_skill_available(character, &skill) {
        return Err(RuleError::HeroicRequirementsUnmet(skill.name));
    }
    tracing::info!(character = %character.id, skill = %skill.name, "heroic skill gained");
    character.heroic_skills.push(skill);
    Ok(())
}

/// Open at exactly level 20 (until the base dice sum to 34) and exactly
/// level 40 (until they sum to 36).
pub fn can_increase_attribute(character: &Character) -> bool {
    let level = character.level();
    let total = character.attributes.base_total();
    ATTRIBUTE_MILESTONES
        .iter()
        .any(|(at, cap)| level == *at && total < *cap)
}

pub fn increase_attribute(character: &mut Character, name: AttributeName) -> Result<(), RuleError> {
    if !can_increase_attribute(character) {
        return Err(RuleError::AttributeIncreaseLocked {
            level: character.level(),
            total: character.attributes.base_total(),
        });
    }
    let attr = character.attributes.get(name);
    if attr.base >= MAX_DIE {
        return Err(RuleError::AttributeMaxed(name));
    }
    let attr = character.attributes.get_mut(name);
    attr.base += ATTRIBUTE_INCREASE_STEP;
    attr.current = (attr.current + ATTRIBUTE_INCREASE_STEP).min(MAX_DIE);
    tracing::info!(character = %character.id, attribute = %name, base = attr.base, "attribute increased");
    Ok(())
}

/// Spells a class can still learn: its casting skill level minus known spells.
pub fn spell_slots_left(character: &Character, class: &str) -> u32 {
    let Some(found) = character.class(class) else {
        return 0;
    };
    let known = character.spells_for(class).len() as u32;
    found
        .casting_skill()
        .map_or(0, |s| s.current_level.saturating_sub(known))
}

pub fn learn_spell(character: &mut Character, class: &str, spell: Spell) -> Result<(), RuleError> {
    if !character.has_class(class) {
        return Err(RuleError::ClassNotFound(class.to_owned()));
    }
    if character.spells_for(class).iter().any(|s| s.name == spell.name) {
        return Err(RuleError::SpellKnown {
            class: class.to_owned(),
            spell: spell.name,
        });
    }
    if spell_slots_left(character, class) == 0 {
        return Err(RuleError::SpellSlotsFull(class.to_owned()));
    }
    tracing::debug!(character = %character.id, class, spell = %spell.name, "spell learned");
    character
        .spells
        .entry(class.to_lowercase())
        .or_default()
        .push(spell);
    Ok(())
}

pub fn forget_spell(character: &mut Character, class: &str, spell: &str) -> Option<Spell> {
    let known = character.spells.get_mut(&class.to_lowercase())?;
    let idx = known.iter().position(|s| s.name == spell)?;
    let removed = known.remove(idx);
    tracing::debug!(character = %character.id, class, spell, "spell forgotten");
    Some(removed)
}

/// Unlock a therioform while fewer are unlocked than the theriomorphosis
/// level. Unlocking a form twice changes nothing.
pub fn unlock_therioform(character: &mut Character, form: Therioform) -> Result<(), RuleError> {
    if character.special.therioforms.iter().any(|f| f.name == form.name) {
        return Ok(());
    }
    let limit = character.best_skill_level(skills::THERIOMORPHOSIS);
    if character.special.therioforms.len() as u32 >= limit {
        return Err(RuleError::SpecialLimit {
            feature: "therioform",
            limit,
        });
    }
    tracing::debug!(character = %character.id, form = %form.name, "therioform unlocked");
    character.special.therioforms.push(form);
    Ok(())
}

/// Unlock a dance while fewer are unlocked than the dance skill level.
/// Unlocking a dance twice changes nothing.
pub fn unlock_dance(character: &mut Character, dance: Dance) -> Result<(), RuleError> {
    if character.special.dances.iter().any(|d| d.name == dance.name) {
        return Ok(());
    }
    let limit = character.best_skill_level(skills::DANCE);
    if character.special.dances.len() as u32 >= limit {
        return Err(RuleError::SpecialLimit {
            feature: "dance",
            limit,
        });
    }
    tracing::debug!(character = %character.id, dance = %dance.name, "dance unlocked");
    character.special.dances.push(dance);
    Ok(())
}
