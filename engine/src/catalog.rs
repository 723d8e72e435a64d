//! Read-only reference tables: classes, spells, heroic skills, special
//! features, and items.
//!
//! Built once at startup and shared by reference. Lookups are keyed by
//! lower-cased identifiers and hand back owned copies, so nothing a caller
//! does to a character can reach back into the catalog.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::character::{Dance, Therioform};
use crate::classes::{CharClass, HeroicSkill, Spell};
use crate::content;
use crate::items::Item;

pub trait CatalogProvider {
    fn class(&self, name: &str) -> Option<CharClass>;
    fn spells(&self, class: &str) -> Vec<Spell>;
    fn heroic_skill(&self, name: &str) -> Option<HeroicSkill>;
    fn therioform(&self, name: &str) -> Option<Therioform>;
    fn dance(&self, name: &str) -> Option<Dance>;
    fn item(&self, name: &str) -> Option<Item>;

    fn spell(&self, class: &str, name: &str) -> Option<Spell> {
        let name = name.to_lowercase();
        self.spells(class).into_iter().find(|s| s.name == name)
    }
}

/// One catalog document. Every section is optional so content can be split
/// across files.
#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    classes: Vec<CharClass>,
    #[serde(default)]
    spells: IndexMap<String, Vec<Spell>>,
    #[serde(default)]
    heroic_skills: Vec<HeroicSkill>,
    #[serde(default)]
    therioforms: Vec<Therioform>,
    #[serde(default)]
    dances: Vec<Dance>,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: IndexMap<String, CharClass>,
    spells: IndexMap<String, Vec<Spell>>,
    heroic_skills: IndexMap<String, HeroicSkill>,
    therioforms: IndexMap<String, Therioform>,
    dances: IndexMap<String, Dance>,
    items: IndexMap<String, Item>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Catalog {
    /// The content shipped with the engine.
    pub fn builtin() -> Result<Self> {
        let documents = content::builtin_documents();
        let mut names: Vec<_> = documents.keys().copied().collect();
        names.sort_unstable();
        let mut catalog = Catalog::default();
        for name in names {
            let text = documents[name];
            catalog
                .merge_yaml(text)
                .with_context(|| format!("failed to parse built-in catalog document: {}", name))?;
        }
        Ok(catalog)
    }

    /// Every `.yaml`, `.yml`, and `.json` file in `dir`, merged in file-name order.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read catalog directory: {}", dir.display()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to list catalog directory: {}", dir.display()))?
                .path();
            let known = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "yaml" | "yml" | "json"));
            if known {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Catalog::default();
        for path in paths {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
            let parsed = if path.extension().is_some_and(|ext| ext == "json") {
                catalog.merge_json(&text)
            } else {
                catalog.merge_yaml(&text)
            };
            parsed.with_context(|| format!("failed to parse catalog file: {}", path.display()))?;
        }
        tracing::info!(dir = %dir.display(), classes = catalog.classes.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let mut catalog = Catalog::default();
        catalog.merge_yaml(text)?;
        Ok(catalog)
    }

    fn merge_yaml(&mut self, text: &str) -> Result<()> {
        let document: CatalogDocument = serde_yaml::from_str(text)?;
        self.merge(document);
        Ok(())
    }

    fn merge_json(&mut self, text: &str) -> Result<()> {
        let document: CatalogDocument = serde_json::from_str(text)?;
        self.merge(document);
        Ok(())
    }

    /// Later documents replace earlier entries with the same identifier.
    fn merge(&mut self, document: CatalogDocument) {
        for class in document.classes {
            self.classes.insert(key(&class.name), class);
        }
        for (class, spells) in document.spells {
            self.spells.insert(key(&class), spells);
        }
        for skill in document.heroic_skills {
            self.heroic_skills.insert(key(&skill.name), skill);
        }
        for form in document.therioforms {
            self.therioforms.insert(key(&form.name), form);
        }
        for dance in document.dances {
            self.dances.insert(key(&dance.name), dance);
        }
        for item in document.items {
            self.items.insert(key(&item.name), item);
        }
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn heroic_skill_names(&self) -> impl Iterator<Item = &str> {
        self.heroic_skills.keys().map(String::as_str)
    }

    pub fn therioform_names(&self) -> impl Iterator<Item = &str> {
        self.therioforms.keys().map(String::as_str)
    }

    pub fn heroic_skills(&self) -> impl Iterator<Item = &HeroicSkill> {
        self.heroic_skills.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }
}

impl CatalogProvider for Catalog {
    fn class(&self, name: &str) -> Option<CharClass> {
        self.classes.get(&key(name)).cloned()
    }

    fn spells(&self, class: &str) -> Vec<Spell> {
        self.spells.get(&key(class)).cloned().unwrap_or_default()
    }

    fn heroic_skill(&self, name: &str) -> Option<HeroicSkill> {
        self.heroic_skills.get(&key(name)).cloned()
    }

    fn therioform(&self, name: &str) -> Option<Therioform> {
        self.therioforms.get(&key(name)).cloned()
    }

    fn dance(&self, name: &str) -> Option<Dance> {
        self.dances.get(&key(name)).cloned()
    }

    fn item(&self, name: &str) -> Option<Item> {
        self.items.get(&key(name)).cloned()
    }
}
