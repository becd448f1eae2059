//! Yearly document storage.
//!
//! One compact JSON file per year, `{data_dir}/{year}.json`. Saves go through a
//! temporary sibling file and a rename so a crash mid-write never leaves a
//! truncated document behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::YearDocument;
use crate::error::AppError;

/// Where a loaded document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// Decoded from an existing persisted document.
    Existing,
    /// Nothing was persisted yet; the document is empty.
    Fresh,
    /// The persisted document could not be decoded and was replaced by an empty
    /// one. `backup` is where the undecodable bytes were copied, if that worked.
    RecoveredFromCorrupt {
        reason: String,
        backup: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
pub struct LoadedYear {
    pub document: YearDocument,
    pub origin: DocumentOrigin,
}

impl LoadedYear {
    pub fn fresh(year: i32) -> Self {
        Self {
            document: YearDocument::empty(year),
            origin: DocumentOrigin::Fresh,
        }
    }
}

pub trait YearStore {
    /// Load the document for `year`, or an empty one if none is usable.
    fn load(&self, year: i32) -> Result<LoadedYear, AppError>;
    /// Overwrite the persisted document for `doc.year`.
    fn save(&self, doc: &YearDocument) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct FileYearStore {
    dir: PathBuf,
}

impl FileYearStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{year}.json"))
    }

    /// Decode the document for `year` without touching the data directory.
    ///
    /// An undecodable file (bad UTF-8 or bad JSON) yields an empty document with
    /// `RecoveredFromCorrupt { backup: None, .. }`; only real I/O failures error.
    pub fn read(&self, year: i32) -> Result<LoadedYear, AppError> {
        let path = self.path_for(year);
        if !path.exists() {
            return Ok(LoadedYear::fresh(year));
        }

        let raw = fs::read(&path)
            .map_err(|e| AppError::local(format!("Failed to read '{}': {e}", path.display())))?;

        match serde_json::from_slice::<YearDocument>(&raw) {
            Ok(mut document) => {
                if document.year != year {
                    warn!(
                        "{} declares year {}; treating it as {year}",
                        path.display(),
                        document.year
                    );
                    document.year = year;
                }
                Ok(LoadedYear {
                    document,
                    origin: DocumentOrigin::Existing,
                })
            }
            Err(e) => Ok(LoadedYear {
                document: YearDocument::empty(year),
                origin: DocumentOrigin::RecoveredFromCorrupt {
                    reason: e.to_string(),
                    backup: None,
                },
            }),
        }
    }

    /// Copy an undecodable document next to itself before it gets overwritten.
    fn keep_corrupt(&self, path: &Path, year: i32) -> Option<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let backup = self.dir.join(format!("{year}.json.corrupt-{stamp}"));
        match fs::copy(path, &backup) {
            Ok(_) => Some(backup),
            Err(e) => {
                warn!("Could not back up corrupt {}: {e}", path.display());
                None
            }
        }
    }
}

impl YearStore for FileYearStore {
    fn load(&self, year: i32) -> Result<LoadedYear, AppError> {
        let mut loaded = self.read(year)?;
        if let DocumentOrigin::RecoveredFromCorrupt { reason, backup } = &mut loaded.origin {
            let path = self.path_for(year);
            *backup = self.keep_corrupt(&path, year);
            warn!(
                "Corrupt document {} ({reason}); starting {year} from an empty document{}",
                path.display(),
                backup
                    .as_ref()
                    .map(|b| format!(", original kept at {}", b.display()))
                    .unwrap_or_default()
            );
        }
        Ok(loaded)
    }

    fn save(&self, doc: &YearDocument) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::local(format!("Failed to create data dir '{}': {e}", self.dir.display()))
        })?;

        let path = self.path_for(doc.year);
        let tmp = self.dir.join(format!(".{}.json.tmp", doc.year));

        let file = File::create(&tmp)
            .map_err(|e| AppError::local(format!("Failed to create '{}': {e}", tmp.display())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, doc)
            .map_err(|e| AppError::local(format!("Failed to encode {} document: {e}", doc.year)))?;
        writer
            .flush()
            .map_err(|e| AppError::local(format!("Failed to write '{}': {e}", tmp.display())))?;
        drop(writer);

        fs::rename(&tmp, &path).map_err(|e| {
            AppError::local(format!("Failed to replace '{}': {e}", path.display()))
        })?;

        info!("Saved {}", path.display());
        Ok(())
    }
}
