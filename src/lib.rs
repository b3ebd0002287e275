//! Client-side state synchronization for supplier records.
//! Debounced per-record autosave, search-as-you-type with stale-response discarding,
//! and a validate-then-commit spreadsheet import, all against an asynchronous
//! remote command boundary.

mod cache;
mod config;
mod conflict;
mod debounce;
mod dialog;
mod editor;
mod error;
mod export;
mod field_sync;
mod import;
mod logging;
mod notice;
mod permission;
mod port;
mod record;
mod reference;
mod search;
mod session;
pub mod statics;

pub use cache::{EntityCache, SharedCache};
pub use config::SyncConfig;
pub use conflict::ConflictGuard;
pub use debounce::Debouncer;
pub use dialog::{FilePicker, FileSaver, NativeDialogs};
pub use editor::{RecordEditor, SupplierDraft, new_supplier_id};
pub use error::{RemoteError, RemoteResult, Result, SyncError};
pub use export::{Exporter, export_file_name};
pub use field_sync::{FieldSync, PendingEdit};
pub use import::{ImportBatch, ImportPipeline, ImportState};
pub use logging::init_tracing;
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use permission::{EditGate, EditPermission};
pub use port::{Command, CommitSummary, RemoteCommandPort};
pub use record::{ScoreKind, Supplier, SupplierField, SupplierUpdate};
pub use reference::{ReferenceEntry, ReferenceKind, ReferenceLists};
pub use search::{ReplaceHook, SearchDebouncer};
pub use session::SupplierSession;

// Re-exported so hosts can implement the port traits without a direct dependency.
pub use async_trait::async_trait;
