// Manages local file storage for the conference dataset and bookmarks.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the entity structs in model/item.rs require incrementing
// DATASET_VERSION below so stale files are rejected instead of misread.
use crate::context::AppContext;
use crate::model::{Article, Conference, Event, EventType, Location, Speaker};
use crate::schedule::BookmarkSet;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: conferences, types, locations, speakers, events, articles
const DATASET_VERSION: u32 = 1;
const BOOKMARKS_VERSION: u32 = 1;

/// Everything the store knows about, for every conference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub conferences: Vec<Conference>,
    #[serde(default)]
    pub types: Vec<EventType>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Serialize, Deserialize)]
struct BookmarkData {
    #[serde(default)]
    version: u32,
    events: Vec<i64>,
}

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on a sidecar `.lock` file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Loads the dataset. A missing file is an empty dataset.
    pub fn load_dataset(ctx: &dyn AppContext) -> Result<Dataset> {
        let path = ctx.get_dataset_path()?;
        Self::load_dataset_from(&path)
    }

    pub fn load_dataset_from(path: &Path) -> Result<Dataset> {
        if !path.exists() {
            log::info!("No dataset at {}, starting empty", path.display());
            return Ok(Dataset::default());
        }
        Self::with_lock(path, || {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read dataset '{}'", path.display()))?;
            let data: Dataset = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse dataset '{}'", path.display()))?;
            if data.version != DATASET_VERSION {
                anyhow::bail!(
                    "Dataset '{}' has version {}, expected {}",
                    path.display(),
                    data.version,
                    DATASET_VERSION
                );
            }
            log::info!(
                "Loaded dataset: {} conferences, {} events",
                data.conferences.len(),
                data.events.len()
            );
            Ok(data)
        })
    }

    pub fn save_dataset(ctx: &dyn AppContext, dataset: &Dataset) -> Result<()> {
        let path = ctx.get_dataset_path()?;
        Self::with_lock(&path, || {
            let data = Dataset {
                version: DATASET_VERSION,
                ..dataset.clone()
            };
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(&path, json)
        })
    }

    /// Loads bookmarked event ids. Missing or unreadable files yield an empty set.
    pub fn load_bookmarks(ctx: &dyn AppContext) -> BookmarkSet {
        let Some(path) = ctx.get_bookmarks_path() else {
            return BookmarkSet::new();
        };
        if !path.exists() {
            return BookmarkSet::new();
        }

        let loaded = Self::with_lock(&path, || {
            let json = fs::read_to_string(&path)?;
            let data: BookmarkData = serde_json::from_str(&json)?;
            Ok(data)
        });

        match loaded {
            Ok(data) if data.version == BOOKMARKS_VERSION => data.events.into_iter().collect(),
            Ok(data) => {
                log::warn!("Ignoring bookmarks file with version {}", data.version);
                BookmarkSet::new()
            }
            Err(e) => {
                log::warn!("Failed to load bookmarks: {}", e);
                BookmarkSet::new()
            }
        }
    }

    pub fn save_bookmarks(ctx: &dyn AppContext, bookmarks: &BookmarkSet) -> Result<()> {
        let Some(path) = ctx.get_bookmarks_path() else {
            anyhow::bail!("Could not determine bookmarks path");
        };
        let mut events: Vec<i64> = bookmarks.iter().copied().collect();
        events.sort_unstable();

        Self::with_lock(&path, || {
            let data = BookmarkData {
                version: BOOKMARKS_VERSION,
                events,
            };
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(&path, json)
        })
    }
}
