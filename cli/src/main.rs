use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use fabula_engine::store::{self, CharacterStore};
use fabula_engine::{
    progression, Catalog, Character, Session, Slot, Status, StoreConfig, YamlDirStore,
};
use tracing::Level;
use uuid::Uuid;

#[derive(Copy, Clone, ValueEnum)]
enum StatusAction {
    Add,
    Remove,
}

#[derive(Copy, Clone, ValueEnum)]
enum Listing {
    Classes,
    HeroicSkills,
    Therioforms,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the sheet of a stored character
    Sheet {
        id: Uuid,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check a character YAML file for creation and completeness problems
    Validate { file: PathBuf },
    /// Validate a character YAML file and add it to the store
    Import { file: PathBuf },
    /// List stored character ids
    List,
    /// Equip an item from the character's backpack
    Equip { id: Uuid, item: String },
    /// Clear an equipment slot (main_hand, off_hand, armor, accessory)
    Unequip { id: Uuid, slot: Slot },
    /// Add or remove a status condition
    Status {
        id: Uuid,
        #[arg(value_enum)]
        action: StatusAction,
        status: Status,
    },
    /// List catalog identifiers
    Catalog {
        #[arg(value_enum, default_value_t = Listing::Classes)]
        what: Listing,
    },
}

#[derive(Parser)]
#[command(name = "fabula-cli")]
#[command(about = "Character sheet rules harness")]
struct Cli {
    /// Root directory holding characters/ and states/
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,
    /// Catalog directory used instead of the built-in content
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?)
    }
}

fn read_character(path: &Path) -> anyhow::Result<Character> {
    let text = read_text_auto(path)?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse character YAML: {}", path.display()))
}

/// Every problem that would block creation or saving.
fn problems(character: &Character) -> Vec<String> {
    let mut found = Vec::new();
    for (field, value) in [
        ("name", character.name()),
        ("identity", character.identity()),
        ("theme", character.theme()),
        ("origin", character.origin()),
    ] {
        if value.trim().is_empty() {
            found.push(format!("{} should not be empty", field));
        }
    }
    if let Err(err) = character.attributes.validate_creation() {
        found.push(err.to_string());
    }
    if let Err(err) = progression::ensure_complete(character) {
        found.push(err.to_string());
    }
    found
}

fn load_catalog(dir: Option<&Path>) -> anyhow::Result<Catalog> {
    match dir {
        Some(dir) => Catalog::from_dir(dir),
        None => Catalog::builtin(),
    }
}

/// Load a character with its progress; a lost progress record is reported, not fatal.
fn open<'a>(store: &YamlDirStore, catalog: &'a Catalog, id: Uuid) -> anyhow::Result<Session<'a>> {
    let loaded = store::load(store, id)?;
    if let Some(warning) = &loaded.warning {
        eprintln!("warning: {}", warning);
    }
    Ok(Session::from_loaded(catalog, loaded))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = YamlDirStore::new(StoreConfig::from_root(&cli.data_dir));
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.cmd {
        Cmd::Sheet { id, json } => {
            let session = open(&store, &catalog, id)?;
            let sheet = session.sheet();
            if json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                print!("{}", sheet);
            }
        }
        Cmd::Validate { file } => {
            let character = read_character(&file)?;
            let found = problems(&character);
            if found.is_empty() {
                println!("{}: ok", character.name());
            } else {
                for problem in &found {
                    println!("{}", problem);
                }
                anyhow::bail!("{} problem(s) found in {}", found.len(), file.display());
            }
        }
        Cmd::Import { file } => {
            let character = read_character(&file)?;
            store.save_character(&character)?;
            println!("{}", character.id);
        }
        Cmd::List => {
            for id in store.list_characters()? {
                println!("{}", id);
            }
        }
        Cmd::Equip { id, item } => {
            let mut session = open(&store, &catalog, id)?;
            session.equip(&item)?;
            session.save(&store)?;
            println!("equipped {}", item);
        }
        Cmd::Unequip { id, slot } => {
            let mut session = open(&store, &catalog, id)?;
            match session.unequip(slot) {
                Some(item) => println!("unequipped {} from {}", item.name, slot),
                None => println!("{} was already empty", slot),
            }
            session.save(&store)?;
        }
        Cmd::Status { id, action, status } => {
            let mut session = open(&store, &catalog, id)?;
            let deltas = match action {
                StatusAction::Add => session.add_status(status),
                StatusAction::Remove => session.remove_status(status),
            };
            session.save_progress(&store)?;
            for (attribute, delta) in deltas.iter().filter(|(_, d)| **d != 0) {
                println!("{} {:+}", attribute, delta);
            }
        }
        Cmd::Catalog { what } => {
            let names: Vec<&str> = match what {
                Listing::Classes => catalog.class_names().collect(),
                Listing::HeroicSkills => catalog.heroic_skill_names().collect(),
                Listing::Therioforms => catalog.therioform_names().collect(),
            };
            for name in names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
