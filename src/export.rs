use crate::dialog::FileSaver;
use crate::error::{Result, SyncError};
use crate::notice::NoticeBoard;
use crate::port::{Command, RemoteCommandPort};
use crate::statics;
use anyhow::Context;
use chrono::NaiveDate;
use std::{fs, path::PathBuf, rc::Rc};

/// `<prefix><YYYY-MM-DD>.xlsx`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{prefix}{}.{}",
        date.format(statics::EXPORT_DATE_FORMAT),
        statics::IMPORT_EXTENSION
    )
}

pub struct Exporter {
    port: Rc<dyn RemoteCommandPort>,
    saver: Rc<dyn FileSaver>,
    notices: NoticeBoard,
    prefix: String,
}

impl Exporter {
    pub fn new(
        port: Rc<dyn RemoteCommandPort>,
        saver: Rc<dyn FileSaver>,
        notices: NoticeBoard,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            port,
            saver,
            notices,
            prefix: prefix.into(),
        }
    }

    /// Fetch the full spreadsheet and write it where the user chooses.
    /// `Ok(None)` when the save dialog was cancelled.
    pub async fn export_all(&self, today: NaiveDate) -> Result<Option<PathBuf>> {
        let result = self.export_inner(today).await;
        match &result {
            Ok(Some(path)) => self
                .notices
                .success(format!("{} {}", statics::EN_EXPORT_DONE, path.display())),
            Ok(None) => {}
            Err(err) => self
                .notices
                .error(format!("{}: {err}", statics::EN_EXPORT_FAILED)),
        }
        result
    }

    async fn export_inner(&self, today: NaiveDate) -> Result<Option<PathBuf>> {
        let bytes = self
            .port
            .export_all()
            .await
            .map_err(|e| SyncError::transport(Command::ExportAll.name(), e))?;

        let default_name = export_file_name(&self.prefix, today);
        let Some(path) = self.saver.save_location(&default_name).await else {
            return Ok(None);
        };

        fs::write(&path, &bytes).with_context(|| format!("writing {path:?}"))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "suppliers exported");
        Ok(Some(path))
    }
}
