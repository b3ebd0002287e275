//! Two-phase bulk import: validate, then commit.

use crate::dialog::FilePicker;
use crate::error::{Result, SyncError};
use crate::notice::NoticeBoard;
use crate::permission::EditGate;
use crate::port::{Command, CommitSummary, RemoteCommandPort};
use crate::statics;
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

/// The bytes of one selected spreadsheet. Opaque here; the store owns the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub source_path: Option<PathBuf>,
    bytes: Rc<[u8]>,
}

impl ImportBatch {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            source_path: None,
            bytes: Rc::from(bytes),
        }
    }

    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        anyhow::ensure!(!bytes.is_empty(), "{path:?} is empty");
        Ok(Self {
            source_path: Some(path.to_path_buf()),
            bytes: Rc::from(bytes),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportState {
    #[default]
    Idle,
    FileSelected,
    Validating,
    Valid {
        summary: String,
    },
    Invalid {
        reason: String,
    },
    Importing,
    Committed(CommitSummary),
    Failed {
        error: String,
    },
}

impl ImportState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ImportState::Validating | ImportState::Importing)
    }
}

/// One import dialog's worth of state. Owned by the surface that opened it.
pub struct ImportPipeline {
    port: Rc<dyn RemoteCommandPort>,
    picker: Rc<dyn FilePicker>,
    notices: NoticeBoard,
    gate: EditGate,
    state: ImportState,
    batch: Option<ImportBatch>,
}

impl ImportPipeline {
    pub fn new(
        port: Rc<dyn RemoteCommandPort>,
        picker: Rc<dyn FilePicker>,
        notices: NoticeBoard,
        gate: EditGate,
    ) -> Self {
        Self {
            port,
            picker,
            notices,
            gate,
            state: ImportState::Idle,
            batch: None,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn batch(&self) -> Option<&ImportBatch> {
        self.batch.as_ref()
    }

    /// Commit button enabled.
    pub fn can_commit(&self) -> bool {
        matches!(self.state, ImportState::Valid { .. }) && self.gate.can_edit()
    }

    pub fn reset(&mut self) {
        self.state = ImportState::Idle;
        self.batch = None;
    }

    /// Ask the picker for a file and load it. `Ok(false)` when the user cancelled.
    pub async fn select_file(&mut self) -> Result<bool> {
        let Some(path) = self.picker.pick_spreadsheet().await else {
            return Ok(false);
        };
        match ImportBatch::load_path(&path) {
            Ok(batch) => {
                self.load(batch);
                Ok(true)
            }
            Err(e) => {
                let err = SyncError::from(e);
                self.batch = None;
                self.state = ImportState::Invalid {
                    reason: err.to_string(),
                };
                self.notices.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Use an already-read payload. Any previous verdict is discarded.
    pub fn load(&mut self, batch: ImportBatch) {
        tracing::debug!(bytes = batch.len(), path = ?batch.source_path, "import file selected");
        self.batch = Some(batch);
        self.state = ImportState::FileSelected;
    }

    /// Check the payload against the store's schema without mutating anything.
    pub async fn validate(&mut self) -> Result<&ImportState> {
        let Some(batch) = self.batch.clone() else {
            return Err(SyncError::Validation(statics::EN_IMPORT_NO_FILE.to_string()));
        };

        self.state = ImportState::Validating;
        self.state = match self.port.bulk_validate(batch.bytes()).await {
            Ok(summary) => {
                tracing::info!(%summary, "import file valid");
                ImportState::Valid { summary }
            }
            Err(e) => {
                tracing::info!(
                    command = Command::BulkValidate.name(),
                    error = %e,
                    "import file rejected"
                );
                self.notices
                    .error(format!("{}: {e}", statics::EN_IMPORT_INVALID));
                ImportState::Invalid { reason: e.0 }
            }
        };
        Ok(&self.state)
    }

    /// Send the validated payload for an upsert-by-identifier pass.
    /// Only reachable from `Valid`; the caller refreshes its view on success.
    pub async fn commit(&mut self) -> Result<CommitSummary> {
        if !matches!(self.state, ImportState::Valid { .. }) {
            return Err(SyncError::Validation(
                statics::EN_IMPORT_NOT_VALIDATED.to_string(),
            ));
        }
        if !self.gate.can_edit() {
            return Err(SyncError::PermissionDenied);
        }
        let Some(batch) = self.batch.clone() else {
            return Err(SyncError::Validation(statics::EN_IMPORT_NO_FILE.to_string()));
        };

        self.state = ImportState::Importing;
        match self.port.bulk_commit(batch.bytes()).await {
            Ok(summary) => {
                tracing::info!(
                    updated = summary.updated,
                    inserted = summary.inserted,
                    errors = summary.errors,
                    "import committed"
                );
                self.notices
                    .success(format!("{}. {}", statics::EN_IMPORT_DONE, summary.describe()));
                if summary.has_errors() {
                    self.notices.warning(format!(
                        "{} {}",
                        summary.errors,
                        statics::EN_IMPORT_ROW_ERRORS
                    ));
                }
                self.state = ImportState::Committed(summary.clone());
                Ok(summary)
            }
            Err(e) => {
                let err = SyncError::transport(Command::BulkCommit.name(), e);
                self.state = ImportState::Failed {
                    error: err.to_string(),
                };
                self.notices
                    .error(format!("{}: {err}", statics::EN_IMPORT_FAILED));
                Err(err)
            }
        }
    }
}
