//! Persistence of characters and their progress as two independent records.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::character::Character;
use crate::progress::ProgressState;
use crate::progression;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_characters_dir")]
    pub characters_dir: PathBuf,
    #[serde(default = "default_states_dir")]
    pub states_dir: PathBuf,
}

fn default_characters_dir() -> PathBuf {
    PathBuf::from("characters")
}

fn default_states_dir() -> PathBuf {
    PathBuf::from("states")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            characters_dir: default_characters_dir(),
            states_dir: default_states_dir(),
        }
    }
}

impl StoreConfig {
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            characters_dir: root.join(default_characters_dir()),
            states_dir: root.join(default_states_dir()),
        }
    }
}

pub trait CharacterStore {
    fn load_character(&self, id: Uuid) -> Result<Character>;
    /// Rejects characters whose skill levels do not add up to their level.
    fn save_character(&self, character: &Character) -> Result<()>;
    fn load_progress(&self, id: Uuid) -> Result<ProgressState>;
    fn save_progress(&self, id: Uuid, progress: &ProgressState) -> Result<()>;
}

/// A character with its progress. `warning` is set when the progress record
/// could not be read and a fresh one was substituted.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub character: Character,
    pub progress: ProgressState,
    pub warning: Option<String>,
}

/// Load both records. A missing or unreadable progress record never fails
/// the load.
pub fn load(store: &dyn CharacterStore, id: Uuid) -> Result<Loaded> {
    let character = store.load_character(id)?;
    let (progress, warning) = match store.load_progress(id) {
        Ok(progress) => (progress, None),
        Err(err) => {
            tracing::warn!(character = %id, error = %format!("{:#}", err), "progress unavailable, using defaults");
            (
                ProgressState::default(),
                Some(format!("unable to load progress, switching to defaults: {:#}", err)),
            )
        }
    };
    Ok(Loaded {
        character,
        progress,
        warning,
    })
}

/// One YAML file per record, named by character id.
#[derive(Debug, Clone)]
pub struct YamlDirStore {
    config: StoreConfig,
}

impl YamlDirStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn character_path(&self, id: Uuid) -> PathBuf {
        self.config.characters_dir.join(format!("{}.yaml", id))
    }

    pub fn progress_path(&self, id: Uuid) -> PathBuf {
        self.config.states_dir.join(format!("{}.yaml", id))
    }

    /// Ids of every stored character, sorted.
    pub fn list_characters(&self) -> Result<Vec<Uuid>> {
        let dir = &self.config.characters_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("failed to read characters directory: {}", dir.display()))?
        {
            let path = entry?.path();
            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| Uuid::parse_str(stem).ok());
            if let Some(id) = id {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

fn write_yaml<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let text = serde_yaml::to_string(value)
        .with_context(|| format!("failed to serialize: {}", path.display()))?;
    fs::write(path, text).with_context(|| format!("failed to write: {}", path.display()))?;
    Ok(())
}

impl CharacterStore for YamlDirStore {
    fn load_character(&self, id: Uuid) -> Result<Character> {
        let path = self.character_path(id);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read character YAML: {}", path.display()))?;
        let character: Character = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse character YAML: {}", path.display()))?;
        tracing::info!(character = %id, name = character.name(), "character loaded");
        Ok(character)
    }

    fn save_character(&self, character: &Character) -> Result<()> {
        progression::ensure_complete(character)?;
        let path = self.character_path(character.id);
        write_yaml(&path, character)?;
        tracing::info!(character = %character.id, path = %path.display(), "character saved");
        Ok(())
    }

    fn load_progress(&self, id: Uuid) -> Result<ProgressState> {
        let path = self.progress_path(id);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read progress YAML: {}", path.display()))?;
        let progress = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse progress YAML: {}", path.display()))?;
        tracing::info!(character = %id, "progress loaded");
        Ok(progress)
    }

    fn save_progress(&self, id: Uuid, progress: &ProgressState) -> Result<()> {
        let path = self.progress_path(id);
        write_yaml(&path, progress)?;
        tracing::info!(character = %id, path = %path.display(), "progress saved");
        Ok(())
    }
}
