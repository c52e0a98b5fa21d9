//! Player progress collaborators.
//!
//! A session reports two things to the outside world when a level is cleared: the experience
//! earned and the level the player should resume from next time. Both go through the traits in
//! this module so the session can be driven by in-memory fakes in tests and by a save file in the
//! binary.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use thiserror::Error;

/// Receiver of experience points awarded on victory.
pub trait XpSink {
    /// Records an award of `amount` experience points.
    fn award_xp(&mut self, amount: u32);
}

/// Persistent storage for the level the player reached.
pub trait LevelStore {
    /// Returns the stored level, or [`None`] if nothing usable has been stored yet.
    fn load_level(&self) -> Option<u32>;

    /// Stores the level the next session should start from.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the level could not be written.
    fn persist_level(&mut self, level: u32) -> Result<(), StoreError>;
}

impl<T: LevelStore + ?Sized> LevelStore for Box<T> {
    fn load_level(&self) -> Option<u32> {
        (**self).load_level()
    }

    fn persist_level(&mut self, level: u32) -> Result<(), StoreError> {
        (**self).persist_level(level)
    }
}

/// Failure to write the level store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The save file could not be written.
    #[error("failed to write level to {path}")]
    Write {
        /// Path of the save file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Running total of awarded experience.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XpTally {
    /// Sum of every award.
    total: u64,
    /// Number of awards received.
    awards: usize,
}

impl XpTally {
    /// Returns the total experience awarded so far.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns how many awards were received.
    #[must_use]
    pub const fn awards(&self) -> usize {
        self.awards
    }
}

impl XpSink for XpTally {
    fn award_xp(&mut self, amount: u32) {
        self.total = self.total.saturating_add(u64::from(amount));
        self.awards += 1;
    }
}

/// Level store kept in memory only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryLevelStore {
    /// Last persisted level.
    level: Option<u32>,
    /// Every level persisted, oldest first.
    history: Vec<u32>,
}

impl MemoryLevelStore {
    /// Builds a store that already holds a level.
    #[must_use]
    pub const fn with_level(level: u32) -> Self {
        Self {
            level: Some(level),
            history: Vec::new(),
        }
    }

    /// Returns every level persisted through this store, oldest first.
    #[must_use]
    pub fn history(&self) -> &[u32] {
        &self.history
    }
}

impl LevelStore for MemoryLevelStore {
    fn load_level(&self) -> Option<u32> {
        self.level
    }

    fn persist_level(&mut self, level: u32) -> Result<(), StoreError> {
        self.level = Some(level);
        self.history.push(level);
        Ok(())
    }
}

/// Level store backed by a small text file holding the level as a decimal number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLevelStore {
    /// Location of the save file.
    path: PathBuf,
}

impl FileLevelStore {
    /// Builds a store for the given save file. The file does not need to exist yet.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns the location of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LevelStore for FileLevelStore {
    fn load_level(&self) -> Option<u32> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no save file at {}", self.path.display());
                return None;
            }
            Err(err) => {
                warn!("failed to read {}: {err}", self.path.display());
                return None;
            }
        };

        match contents.trim().parse::<u32>() {
            Ok(level) if level > 0 => Some(level),
            _ => {
                warn!(
                    "ignoring save file {} with invalid level {:?}",
                    self.path.display(),
                    contents.trim()
                );
                None
            }
        }
    }

    fn persist_level(&mut self, level: u32) -> Result<(), StoreError> {
        fs::write(&self.path, format!("{level}\n")).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::process;

    use super::*;

    /// Returns a save file path unique to this test process and test name.
    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fogmaze-{}-{name}.level", process::id()))
    }

    #[test]
    fn test_xp_tally_sums_awards() {
        let mut tally = XpTally::default();

        tally.award_xp(65);
        tally.award_xp(80);

        assert_eq!(tally.total(), 145);
        assert_eq!(tally.awards(), 2);
    }

    #[test]
    fn test_memory_store_records_history() {
        let mut store = MemoryLevelStore::with_level(2);
        assert_eq!(store.load_level(), Some(2));

        store.persist_level(3).expect("memory store never fails");
        store.persist_level(4).expect("memory store never fails");

        assert_eq!(store.load_level(), Some(4));
        assert_eq!(store.history(), &[3, 4]);
    }

    #[test]
    fn test_boxed_store_forwards_calls() {
        let mut store: Box<dyn LevelStore> = Box::new(MemoryLevelStore::default());

        assert_eq!(store.load_level(), None);
        store.persist_level(7).expect("memory store never fails");
        assert_eq!(store.load_level(), Some(7));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = scratch("round-trip");
        let mut store = FileLevelStore::new(&path);

        store.persist_level(12).expect("temp dir should be writable");

        assert_eq!(store.load_level(), Some(12));
        assert_eq!(
            fs::read_to_string(&path).expect("save file should exist"),
            "12\n"
        );
        fs::remove_file(&path).expect("failed to clean up save file");
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileLevelStore::new(scratch("missing"));

        assert_eq!(store.load_level(), None);
    }

    #[test]
    fn test_file_store_rejects_invalid_contents() {
        for (name, contents) in [("garbage", "level five"), ("zero", "0"), ("negative", "-3")] {
            let path = scratch(name);
            fs::write(&path, contents).expect("temp dir should be writable");

            assert_eq!(
                FileLevelStore::new(&path).load_level(),
                None,
                "{contents:?} should not be accepted as a level"
            );
            fs::remove_file(&path).expect("failed to clean up save file");
        }
    }

    #[test]
    fn test_file_store_trims_whitespace() {
        let path = scratch("whitespace");
        fs::write(&path, "  9 \n\n").expect("temp dir should be writable");

        assert_eq!(FileLevelStore::new(&path).load_level(), Some(9));
        fs::remove_file(&path).expect("failed to clean up save file");
    }

    #[test]
    fn test_file_store_reports_write_failures() {
        let mut store = FileLevelStore::new(std::env::temp_dir().join("fogmaze-no-such-dir/save"));

        let err = store.persist_level(2).expect_err("missing directory should fail");

        assert!(matches!(err, StoreError::Write { .. }));
        assert!(err.to_string().contains("fogmaze-no-such-dir"));
    }
}
