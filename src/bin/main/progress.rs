//! Reading progress persisted next to the source file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use speedread_core::ReaderSettings;
use thiserror::Error;

use super::PROGRESS_SAVE_DEBOUNCE_MS;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub(super) struct ReadingProgress {
    pub index: usize,
    /// Reader settings in effect when the position was recorded.
    pub settings: ReaderSettings,
    /// Token count of the text the index refers to; a mismatch means the file
    /// changed and the saved position is meaningless.
    pub token_count: usize,
}

#[derive(Debug, Error)]
pub(super) enum ProgressError {
    #[error("progress file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("progress file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Abstract progress persistence backend.
pub(super) trait ProgressStore {
    fn load(&mut self) -> Result<Option<ReadingProgress>, ProgressError>;
    fn save(&mut self, progress: &ReadingProgress) -> Result<(), ProgressError>;
}

pub(super) struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    /// Store for `source`, kept at `<source>.progress.json`.
    pub(super) fn beside(source: &Path) -> Self {
        let mut name = source.as_os_str().to_owned();
        name.push(".progress.json");
        Self {
            path: PathBuf::from(name),
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&mut self) -> Result<Option<ReadingProgress>, ProgressError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, progress: &ReadingProgress) -> Result<(), ProgressError> {
        let encoded = serde_json::to_string_pretty(progress)?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }
}

/// Debounces progress writes so a playing reader does not hit the disk on
/// every word.
pub(super) struct ProgressSyncState {
    last_saved: Option<ReadingProgress>,
    pending: Option<(ReadingProgress, u64)>,
}

impl ProgressSyncState {
    pub(super) fn new(initial: Option<ReadingProgress>) -> Self {
        Self {
            last_saved: initial,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: ReadingProgress, now_ms: u64) {
        if Some(current) == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    /// Write the pending progress once it has been stable for the debounce
    /// window. Returns the saved value.
    pub(super) fn flush_if_due(
        &mut self,
        store: &mut impl ProgressStore,
        now_ms: u64,
    ) -> Result<Option<ReadingProgress>, ProgressError> {
        let Some((candidate, changed_at_ms)) = self.pending else {
            return Ok(None);
        };

        if now_ms.saturating_sub(changed_at_ms) < PROGRESS_SAVE_DEBOUNCE_MS {
            return Ok(None);
        }

        self.write(store, candidate, now_ms)
    }

    /// Write any pending progress immediately.
    pub(super) fn flush_now(
        &mut self,
        store: &mut impl ProgressStore,
        now_ms: u64,
    ) -> Result<Option<ReadingProgress>, ProgressError> {
        match self.pending {
            Some((candidate, _)) => self.write(store, candidate, now_ms),
            None => Ok(None),
        }
    }

    fn write(
        &mut self,
        store: &mut impl ProgressStore,
        candidate: ReadingProgress,
        now_ms: u64,
    ) -> Result<Option<ReadingProgress>, ProgressError> {
        match store.save(&candidate) {
            Ok(()) => {
                self.last_saved = Some(candidate);
                self.pending = None;
                Ok(Some(candidate))
            }
            Err(err) => {
                // Retry after another debounce window.
                self.pending = Some((candidate, now_ms));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use speedread_core::ReadingMode;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        saved: Vec<ReadingProgress>,
        fail: bool,
    }

    impl ProgressStore for MemoryStore {
        fn load(&mut self) -> Result<Option<ReadingProgress>, ProgressError> {
            Ok(self.saved.last().copied())
        }

        fn save(&mut self, progress: &ReadingProgress) -> Result<(), ProgressError> {
            if self.fail {
                return Err(io::Error::other("disk full").into());
            }
            self.saved.push(*progress);
            Ok(())
        }
    }

    fn progress(index: usize) -> ReadingProgress {
        ReadingProgress {
            index,
            settings: ReaderSettings::default(),
            token_count: 100,
        }
    }

    #[test]
    fn waits_for_debounce_window() {
        let mut store = MemoryStore::default();
        let mut sync = ProgressSyncState::new(None);

        sync.track_current(progress(4), 0);
        assert_eq!(sync.flush_if_due(&mut store, 100).unwrap(), None);
        assert_eq!(
            sync.flush_if_due(&mut store, PROGRESS_SAVE_DEBOUNCE_MS).unwrap(),
            Some(progress(4))
        );
        assert_eq!(store.saved, [progress(4)]);
    }

    #[test]
    fn each_change_restarts_the_window() {
        let mut store = MemoryStore::default();
        let mut sync = ProgressSyncState::new(None);

        sync.track_current(progress(1), 0);
        sync.track_current(progress(2), 1_000);
        assert_eq!(
            sync.flush_if_due(&mut store, PROGRESS_SAVE_DEBOUNCE_MS).unwrap(),
            None
        );
        assert_eq!(
            sync.flush_if_due(&mut store, 1_000 + PROGRESS_SAVE_DEBOUNCE_MS)
                .unwrap(),
            Some(progress(2))
        );
    }

    #[test]
    fn unchanged_progress_is_not_rewritten() {
        let mut store = MemoryStore::default();
        let mut sync = ProgressSyncState::new(Some(progress(7)));

        sync.track_current(progress(7), 0);
        assert_eq!(sync.flush_now(&mut store, 10_000).unwrap(), None);
        assert!(store.saved.is_empty());
    }

    #[test]
    fn failed_write_stays_pending() {
        let mut store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let mut sync = ProgressSyncState::new(None);
        sync.track_current(progress(3), 0);
        assert!(sync.flush_now(&mut store, 50).is_err());

        store.fail = false;
        assert_eq!(sync.flush_now(&mut store, 60).unwrap(), Some(progress(3)));
        assert_eq!(store.load().unwrap(), Some(progress(3)));
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("book.txt");
        let mut store = JsonProgressStore::beside(&source);
        assert!(store.path().ends_with("book.txt.progress.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save(&progress(42)).unwrap();
        assert_eq!(store.load().unwrap(), Some(progress(42)));
    }

    #[test]
    fn json_store_keeps_reader_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonProgressStore::beside(&dir.path().join("book.txt"));
        let saved = ReadingProgress {
            index: 9,
            settings: ReaderSettings {
                wpm: 425,
                mode: ReadingMode::HoldSpace,
                punctuation_pause: false,
                soft_rewind: true,
                soft_rewind_words: 6,
            },
            token_count: 40,
        };
        store.save(&saved).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"hold-space\""));
        assert_eq!(store.load().unwrap(), Some(saved));
    }

    #[test]
    fn json_store_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("book.txt");
        let mut store = JsonProgressStore::beside(&source);
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(ProgressError::Json(_))));
    }
}
