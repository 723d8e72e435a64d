use serde::{Deserialize, Serialize};

use crate::items::DamageType;
use crate::rules::MASTERY_LEVEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassBonus {
    Hp,
    Mp,
    Ip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ritual {
    Chimerism,
    Elementalism,
    Entropism,
    Ritualism,
    Spiritism,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub current_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default)]
    pub can_add_spell: bool,
}

fn default_max_level() -> u32 {
    10
}

impl Skill {
    pub fn new(name: impl Into<String>, max_level: u32) -> Self {
        Self {
            name: name.into().to_lowercase(),
            current_level: 0,
            max_level,
            can_add_spell: false,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.current_level = level.min(self.max_level);
        self
    }

    pub fn casting(mut self) -> Self {
        self.can_add_spell = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClass {
    pub name: String,
    #[serde(default)]
    pub class_bonus: Option<ClassBonus>,
    #[serde(default)]
    pub bonus_value: u32,
    #[serde(default)]
    pub martial_melee: bool,
    #[serde(default)]
    pub martial_ranged: bool,
    #[serde(default)]
    pub martial_armor: bool,
    #[serde(default)]
    pub martial_shields: bool,
    #[serde(default)]
    pub rituals: Vec<Ritual>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl CharClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            class_bonus: None,
            bonus_value: 0,
            martial_melee: false,
            martial_ranged: false,
            martial_armor: false,
            martial_shields: false,
            rituals: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, kind: ClassBonus, value: u32) -> Self {
        self.class_bonus = Some(kind);
        self.bonus_value = value;
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Sum of the levels invested in this class's skills.
    pub fn class_level(&self) -> u32 {
        self.skills.iter().map(|s| s.current_level).sum()
    }

    pub fn is_mastered(&self) -> bool {
        self.class_level() == MASTERY_LEVEL
    }

    pub fn bonus_for(&self, kind: ClassBonus) -> u32 {
        if self.class_bonus == Some(kind) {
            self.bonus_value
        } else {
            0
        }
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        let name = name.to_lowercase();
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn skill_mut(&mut self, name: &str) -> Option<&mut Skill> {
        let name = name.to_lowercase();
        self.skills.iter_mut().find(|s| s.name == name)
    }

    pub fn skill_level(&self, name: &str) -> Option<u32> {
        self.skill(name).map(|s| s.current_level)
    }

    /// First skill that grants spellcasting, if any.
    pub fn casting_skill(&self) -> Option<&Skill> {
        self.skills.iter().find(|s| s.can_add_spell)
    }

    pub fn clear_skills(&mut self) {
        for skill in &mut self.skills {
            skill.current_level = 0;
        }
    }
}

/// Martial proficiencies, OR-ed across every class a character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Martial {
    pub melee: bool,
    pub ranged: bool,
    pub armor: bool,
    pub shields: bool,
}

impl Martial {
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a CharClass>) -> Self {
        classes.into_iter().fold(Self::default(), |acc, c| Self {
            melee: acc.melee || c.martial_melee,
            ranged: acc.ranged || c.martial_ranged,
            armor: acc.armor || c.martial_armor,
            shields: acc.shields || c.martial_shields,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroicSkill {
    pub name: String,
    #[serde(default)]
    pub required_class: Vec<String>,
    #[serde(default)]
    pub required_skill: Option<String>,
    #[serde(default)]
    pub can_add_several_times: bool,
}

impl HeroicSkill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            required_class: Vec::new(),
            required_skill: None,
            can_add_several_times: false,
        }
    }

    pub fn requiring_class(mut self, class: impl Into<String>) -> Self {
        self.required_class.push(class.into().to_lowercase());
        self
    }

    pub fn requiring_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skill = Some(skill.into().to_lowercase());
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.can_add_several_times = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellTarget {
    #[default]
    OneCreature,
    UpToThree,
    Weapon,
    #[serde(rename = "self")]
    Caster,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellDuration {
    #[default]
    Instantaneous,
    Scene,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub mp_cost: u32,
    #[serde(default)]
    pub is_offensive: bool,
    #[serde(default)]
    pub target: SpellTarget,
    #[serde(default)]
    pub duration: SpellDuration,
    #[serde(default)]
    pub damage_type: Option<DamageType>,
}

impl Spell {
    pub fn new(name: impl Into<String>, mp_cost: u32) -> Self {
        Self {
            name: name.into().to_lowercase(),
            mp_cost,
            is_offensive: false,
            target: SpellTarget::OneCreature,
            duration: SpellDuration::Instantaneous,
            damage_type: None,
        }
    }
}
