//! File picker / file saver collaborators.

use crate::statics;
use async_trait::async_trait;
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    sync::OnceLock,
};

/// Single-file selection restricted to the import extension.
#[async_trait(?Send)]
pub trait FilePicker {
    async fn pick_spreadsheet(&self) -> Option<PathBuf>;
}

/// Save-location prompt, pre-filled with a default file name.
#[async_trait(?Send)]
pub trait FileSaver {
    async fn save_location(&self, default_name: &str) -> Option<PathBuf>;
}

/// Native dialogs via `rfd`. Remembers the last directory used.
#[derive(Debug, Default)]
pub struct NativeDialogs {
    dialog_dir: RefCell<Option<PathBuf>>,
}

impl NativeDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    fn default_dir() -> Option<PathBuf> {
        let home = std::env::var_os("USERPROFILE")
            .or_else(|| std::env::var_os("HOME"))
            .map(PathBuf::from)?;
        Some(home.join("Documents"))
    }

    fn initial_dialog_dir() -> Option<PathBuf> {
        static CACHED: OnceLock<Option<PathBuf>> = OnceLock::new();
        CACHED.get_or_init(Self::default_dir).clone()
    }

    fn file_dialog(&self) -> rfd::AsyncFileDialog {
        let mut dlg = rfd::AsyncFileDialog::new()
            .add_filter(statics::IMPORT_FILTER_NAME, &[statics::IMPORT_EXTENSION]);

        if let Some(dir) = self
            .dialog_dir
            .borrow()
            .clone()
            .or_else(Self::initial_dialog_dir)
        {
            dlg = dlg.set_directory(dir);
        }

        dlg
    }

    fn remember(&self, path: &Path) {
        self.dialog_dir.replace(path.parent().map(PathBuf::from));
    }
}

#[async_trait(?Send)]
impl FilePicker for NativeDialogs {
    async fn pick_spreadsheet(&self) -> Option<PathBuf> {
        let handle = self.file_dialog().pick_file().await?;
        let path = handle.path().to_path_buf();
        self.remember(&path);
        Some(path)
    }
}

#[async_trait(?Send)]
impl FileSaver for NativeDialogs {
    async fn save_location(&self, default_name: &str) -> Option<PathBuf> {
        let handle = self
            .file_dialog()
            .set_file_name(default_name)
            .save_file()
            .await?;
        let path = handle.path().to_path_buf();
        self.remember(&path);
        Some(path)
    }
}
