//! The remote command boundary.
//! The store is only reachable through named asynchronous commands; this trait is
//! the single seam the sync layer depends on.

use crate::error::RemoteResult;
use crate::record::{Supplier, SupplierUpdate};
use crate::reference::{ReferenceEntry, ReferenceKind};
use crate::statics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Named remote commands, used for logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Search,
    Upsert,
    Create,
    CheckUniqueness,
    FetchReferenceList(ReferenceKind),
    BulkValidate,
    BulkCommit,
    ExportAll,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Search => statics::CMD_SEARCH,
            Command::Upsert => statics::CMD_UPSERT,
            Command::Create => statics::CMD_CREATE,
            Command::CheckUniqueness => statics::CMD_CHECK_PO,
            Command::FetchReferenceList(kind) => kind.command(),
            Command::BulkValidate => statics::CMD_VALIDATE_IMPORT,
            Command::BulkCommit => statics::CMD_IMPORT,
            Command::ExportAll => statics::CMD_EXPORT,
        }
    }
}

/// Outcome of a bulk import commit.
/// `errors` may be nonzero even though the commit as a whole succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSummary {
    pub updated: u32,
    pub inserted: u32,
    pub errors: u32,
    /// Per-row messages for the failed rows, when the store provides them.
    pub row_errors: Vec<String>,
}

impl CommitSummary {
    pub fn new(updated: u32, inserted: u32, errors: u32) -> Self {
        Self {
            updated,
            inserted,
            errors,
            row_errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            statics::EN_LABEL_UPDATED,
            self.updated,
            statics::EN_LABEL_INSERTED,
            self.inserted,
            statics::EN_LABEL_ERRORS,
            self.errors
        )
    }
}

/// Asynchronous remote operations on supplier data.
///
/// Futures are not required to be `Send`: the sync layer runs on a single
/// cooperative event loop.
#[async_trait(?Send)]
pub trait RemoteCommandPort {
    /// Ordered search results. Never called with blank text.
    async fn search(&self, query: &str) -> RemoteResult<Vec<Supplier>>;

    /// Whole-record replace of an existing supplier.
    async fn upsert(&self, supplier: &SupplierUpdate) -> RemoteResult<()>;

    /// Insert a supplier whose id was generated client-side.
    async fn create(&self, supplier: &SupplierUpdate) -> RemoteResult<()>;

    /// Supplier (other than `excluding_id`) already holding `po`, if any.
    async fn check_uniqueness(&self, po: &str, excluding_id: &str)
    -> RemoteResult<Option<Supplier>>;

    async fn fetch_reference_list(&self, kind: ReferenceKind) -> RemoteResult<Vec<ReferenceEntry>>;

    /// Schema check of a spreadsheet payload. Never mutates the store.
    async fn bulk_validate(&self, payload: &[u8]) -> RemoteResult<String>;

    /// Upsert-by-identifier pass over every row of the payload.
    async fn bulk_commit(&self, payload: &[u8]) -> RemoteResult<CommitSummary>;

    /// Spreadsheet with every supplier.
    async fn export_all(&self) -> RemoteResult<Vec<u8>>;
}
