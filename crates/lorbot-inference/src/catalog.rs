//! Card catalog: card code to static attributes.
//!
//! [`LocalCardCatalog`] reads the set files kept in a local directory, one
//! JSON array of cards per set (`set1.json`, `set6cde.json`, ...). Purging it
//! deletes those set files so an external downloader fetches fresh ones.

use lazy_static::lazy_static;
use lorbot_core::{Error, Result, StaticCardAttrs};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

lazy_static! {
    static ref SET_FILE: Regex = Regex::new(r"^set\d+[a-z]*$").expect("valid regex");
}

/// Sets that are never loaded.
const FORBIDDEN_SETS: &[&str] = &["set6ab"];

/// Lookup of static card attributes.
pub trait CardCatalog: Send + Sync {
    /// Attributes for `code`, `None` on a miss.
    fn lookup(&self, code: &str) -> Option<Arc<StaticCardAttrs>>;

    /// Drop every cached set.
    fn purge(&self) -> Result<()>;
}

/// Catalog backed by set files in a directory.
#[derive(Debug)]
pub struct LocalCardCatalog {
    dir: PathBuf,
    cards: RwLock<HashMap<String, Arc<StaticCardAttrs>>>,
}

impl LocalCardCatalog {
    /// Load every set file in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(Error::Catalog(format!(
                "card set directory {} does not exist",
                dir.display()
            )));
        }

        let mut cards = HashMap::new();
        let mut sets = 0usize;
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(set) = set_name(&path) else {
                continue;
            };
            if FORBIDDEN_SETS.contains(&set.as_str()) {
                debug!(set = %set, "Skipping forbidden card set");
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            let set_cards: Vec<StaticCardAttrs> = serde_json::from_str(&content)
                .map_err(|e| Error::Catalog(format!("{}: {e}", path.display())))?;
            debug!(set = %set, cards = set_cards.len(), "Loaded card set");

            for card in set_cards {
                cards.insert(card.card_code.clone(), Arc::new(card));
            }
            sets += 1;
        }

        info!(dir = %dir.display(), sets, cards = cards.len(), "Card catalog loaded");
        Ok(Self {
            dir,
            cards: RwLock::new(cards),
        })
    }

    /// Directory the sets were loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of known cards.
    pub fn len(&self) -> usize {
        self.cards.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Whether no card is known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn set_name(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
    SET_FILE.is_match(&stem).then_some(stem)
}

impl CardCatalog for LocalCardCatalog {
    fn lookup(&self, code: &str) -> Option<Arc<StaticCardAttrs>> {
        self.cards.read().ok()?.get(code).cloned()
    }

    fn purge(&self) -> Result<()> {
        warn!(dir = %self.dir.display(), "Purging card catalog");
        if let Ok(mut cards) = self.cards.write() {
            cards.clear();
        }
        if !self.dir.is_dir() {
            return Ok(());
        }
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && set_name(&path).is_some() {
                debug!(path = %path.display(), "Removing card set");
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

/// In-memory catalog, for tests and embedders with their own card source.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    cards: HashMap<String, Arc<StaticCardAttrs>>,
    purges: Mutex<usize>,
}

impl MemoryCatalog {
    /// Build a catalog from a list of cards.
    pub fn from_cards(cards: impl IntoIterator<Item = StaticCardAttrs>) -> Self {
        Self {
            cards: cards
                .into_iter()
                .map(|c| (c.card_code.clone(), Arc::new(c)))
                .collect(),
            purges: Mutex::new(0),
        }
    }

    /// How many times [`CardCatalog::purge`] was called.
    pub fn purge_count(&self) -> usize {
        self.purges.lock().map(|p| *p).unwrap_or(0)
    }
}

impl CardCatalog for MemoryCatalog {
    fn lookup(&self, code: &str) -> Option<Arc<StaticCardAttrs>> {
        self.cards.get(code).cloned()
    }

    fn purge(&self) -> Result<()> {
        if let Ok(mut purges) = self.purges.lock() {
            *purges += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorbot_core::{CardType, Keyword};

    const SET1: &str = r#"[
        {
            "associatedCards": [],
            "cardCode": "01IO012",
            "name": "Twin Disciplines",
            "cost": 2,
            "attack": 0,
            "health": 0,
            "type": "Spell",
            "keywordRefs": ["Burst"],
            "descriptionRaw": "Give an ally +2|+0 or +0|+3 this round.",
            "rarity": "COMMON"
        },
        {
            "cardCode": "01NX020",
            "name": "Legion Rearguard",
            "cost": 1,
            "attack": 3,
            "health": 2,
            "type": "Unit",
            "keywordRefs": ["CantBlock"]
        }
    ]"#;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_set_name_filter() {
        assert_eq!(set_name(Path::new("a/set1.json")).as_deref(), Some("set1"));
        assert_eq!(set_name(Path::new("a/set6cde.json")).as_deref(), Some("set6cde"));
        assert_eq!(set_name(Path::new("a/set1.txt")), None);
        assert_eq!(set_name(Path::new("a/globals.json")), None);
    }

    #[test]
    fn test_load_and_lookup() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "set1.json", SET1);
        write(temp.path(), "notes.json", "not a set");

        let catalog = LocalCardCatalog::open(temp.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let spell = catalog.lookup("01IO012").unwrap();
        assert_eq!(spell.card_type, CardType::Spell);
        assert!(spell.has_keyword(Keyword::Burst));

        let unit = catalog.lookup("01NX020").unwrap();
        assert_eq!(unit.attack, 3);
        assert!(unit.has_keyword(Keyword::CantBlock));

        assert!(catalog.lookup("99XX999").is_none());
    }

    #[test]
    fn test_forbidden_set_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "set6ab.json", SET1);

        let catalog = LocalCardCatalog::open(temp.path()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_set_file() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "set2.json", "{}");

        let err = LocalCardCatalog::open(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let err = LocalCardCatalog::open(temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_purge_deletes_only_set_files() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("card_sets");
        std::fs::create_dir(&dir).unwrap();
        write(&dir, "set1.json", SET1);
        write(&dir, "set6ab.json", SET1);
        write(&dir, "notes.json", "keep me");
        std::fs::create_dir(dir.join("cache")).unwrap();
        write(&dir.join("cache"), "set2.json", SET1);

        let catalog = LocalCardCatalog::open(&dir).unwrap();
        catalog.purge().unwrap();

        assert!(catalog.lookup("01NX020").is_none());
        assert!(!dir.join("set1.json").exists());
        assert!(!dir.join("set6ab.json").exists());
        assert!(dir.join("notes.json").exists());
        assert!(dir.join("cache").join("set2.json").exists());
    }

    #[test]
    fn test_memory_catalog_counts_purges() {
        let catalog = MemoryCatalog::default();
        catalog.purge().unwrap();
        catalog.purge().unwrap();
        assert_eq!(catalog.purge_count(), 2);
    }
}
