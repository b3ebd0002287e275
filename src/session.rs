use crate::cache::{EntityCache, SharedCache};
use crate::config::SyncConfig;
use crate::dialog::{FilePicker, FileSaver};
use crate::editor::{RecordEditor, SupplierDraft};
use crate::error::Result;
use crate::export::Exporter;
use crate::field_sync::FieldSync;
use crate::import::ImportPipeline;
use crate::notice::{Notice, NoticeBoard};
use crate::permission::EditGate;
use crate::port::{CommitSummary, RemoteCommandPort};
use crate::record::{Supplier, SupplierField};
use crate::reference::ReferenceLists;
use crate::search::SearchDebouncer;
use chrono::NaiveDate;
use std::{path::PathBuf, rc::Rc};

/// Everything one supplier-management surface needs, wired to a shared cache.
///
/// Must be driven from inside a `tokio::task::LocalSet`: settle-window timers
/// are local tasks.
pub struct SupplierSession {
    port: Rc<dyn RemoteCommandPort>,
    cache: SharedCache,
    notices: NoticeBoard,
    gate: EditGate,
    search: SearchDebouncer,
    field_sync: FieldSync,
    editor: RecordEditor,
    exporter: Exporter,
    references: ReferenceLists,
}

impl SupplierSession {
    pub fn new(
        port: Rc<dyn RemoteCommandPort>,
        saver: Rc<dyn FileSaver>,
        gate: EditGate,
        config: &SyncConfig,
    ) -> Self {
        let cache = EntityCache::shared();
        let notices = NoticeBoard::new();

        let search = SearchDebouncer::new(
            Rc::clone(&port),
            Rc::clone(&cache),
            notices.clone(),
            config.search_settle(),
        );
        let field_sync = FieldSync::new(
            Rc::clone(&port),
            Rc::clone(&cache),
            notices.clone(),
            gate.clone(),
            config.save_settle(),
        );
        let replaced_sync = field_sync.clone();
        search.set_replace_hook(Box::new(move |evicted: &[String]| {
            replaced_sync.reconcile_after_replace(evicted);
        }));

        let editor = RecordEditor::new(
            Rc::clone(&port),
            Rc::clone(&cache),
            notices.clone(),
            gate.clone(),
            config.id_prefix.clone(),
        );
        let exporter = Exporter::new(
            Rc::clone(&port),
            saver,
            notices.clone(),
            config.export_prefix.clone(),
        );

        Self {
            port,
            cache,
            notices,
            gate,
            search,
            field_sync,
            editor,
            exporter,
            references: ReferenceLists::default(),
        }
    }

    /// Surface opened: (re)load the lookup lists.
    pub async fn activate(&mut self) -> &ReferenceLists {
        self.references = ReferenceLists::fetch(self.port.as_ref()).await;
        &self.references
    }

    /// Surface closed: stop every pending timer. Calls already sent still finish.
    pub fn close(&self) {
        self.search.cancel();
        self.field_sync.cancel_all();
    }

    pub fn on_query_change(&self, text: &str) {
        self.search.on_query_change(text);
    }

    pub async fn refresh(&self) -> bool {
        self.search.refresh().await
    }

    pub fn on_field_edit(
        &self,
        entity_id: &str,
        field: SupplierField,
        value: impl Into<String>,
    ) -> Result<()> {
        self.field_sync.on_field_edit(entity_id, field, value)
    }

    pub async fn save_draft(&self, draft: SupplierDraft) -> Result<Supplier> {
        self.editor.save(draft).await
    }

    pub fn import_pipeline(&self, picker: Rc<dyn FilePicker>) -> ImportPipeline {
        ImportPipeline::new(
            Rc::clone(&self.port),
            picker,
            self.notices.clone(),
            self.gate.clone(),
        )
    }

    /// Commit an import and re-run the current search, since imported rows
    /// may or may not match what is on screen.
    pub async fn commit_import(&self, pipeline: &mut ImportPipeline) -> Result<CommitSummary> {
        let summary = pipeline.commit().await?;
        self.search.refresh().await;
        Ok(summary)
    }

    pub async fn export_all(&self, today: NaiveDate) -> Result<Option<PathBuf>> {
        self.exporter.export_all(today).await
    }

    pub fn suppliers(&self) -> Vec<Supplier> {
        self.cache.borrow().iter().cloned().collect()
    }

    pub fn supplier(&self, entity_id: &str) -> Option<Supplier> {
        self.cache.borrow().get(entity_id).cloned()
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn search(&self) -> &SearchDebouncer {
        &self.search
    }

    pub fn field_sync(&self) -> &FieldSync {
        &self.field_sync
    }

    pub fn references(&self) -> &ReferenceLists {
        &self.references
    }

    pub fn can_edit(&self) -> bool {
        self.gate.can_edit()
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }
}
