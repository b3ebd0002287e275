#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    path::PathBuf,
    rc::Rc,
    time::Duration,
};

use supplier_sync::{
    CommitSummary, EditPermission, EntityCache, FieldSync, FilePicker, FileSaver, NoticeBoard,
    ReferenceEntry, ReferenceKind, RemoteCommandPort, RemoteError, RemoteResult, SharedCache,
    Supplier, SupplierField, SupplierUpdate, async_trait, statics,
};

pub const CONTROL_SHEET: &[u8] = b"_control";

pub fn supplier(id: &str, name: &str) -> Supplier {
    let mut s = Supplier::new(id, name);
    s.set_field(SupplierField::Origin, "BR");
    s
}

pub fn with_po(mut s: Supplier, po: &str) -> Supplier {
    s.set_field(SupplierField::Po, po);
    s
}

pub fn save_window() -> Duration {
    Duration::from_millis(statics::SAVE_SETTLE_MS)
}

pub fn search_window() -> Duration {
    Duration::from_millis(statics::SEARCH_SETTLE_MS)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    Upsert(SupplierUpdate),
    Create(SupplierUpdate),
    CheckUniqueness { po: String, excluding: String },
    FetchReferenceList(ReferenceKind),
    BulkValidate(usize),
    BulkCommit(usize),
    ExportAll,
}

/// In-memory stand-in for the store. Records every call in order.
#[derive(Default)]
pub struct MockPort {
    pub store: RefCell<Vec<Supplier>>,
    pub calls: RefCell<Vec<Call>>,
    pub search_delays: RefCell<HashMap<String, Duration>>,
    pub upsert_delay: Cell<Duration>,
    pub fail_upserts: Cell<bool>,
    pub fail_creates: Cell<bool>,
    pub fail_search: Cell<bool>,
    pub fail_uniqueness: Cell<bool>,
    pub failing_lists: RefCell<Vec<ReferenceKind>>,
    pub commit_result: RefCell<Option<RemoteResult<CommitSummary>>>,
    pub export_bytes: RefCell<Vec<u8>>,
}

impl MockPort {
    pub fn with_suppliers(suppliers: Vec<Supplier>) -> Rc<Self> {
        let port = Self::default();
        port.store.replace(suppliers);
        Rc::new(port)
    }

    pub fn upserts(&self) -> Vec<SupplierUpdate> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Upsert(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn searches(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Search(q) => Some(q.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn stored(&self, id: &str) -> Option<Supplier> {
        self.store
            .borrow()
            .iter()
            .find(|s| s.supplier_id == id)
            .cloned()
    }
}

#[async_trait(?Send)]
impl RemoteCommandPort for MockPort {
    async fn search(&self, query: &str) -> RemoteResult<Vec<Supplier>> {
        self.calls.borrow_mut().push(Call::Search(query.to_string()));
        let delay = self.search_delays.borrow().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_search.get() {
            return Err(RemoteError::new("connection reset"));
        }
        let needle = query.trim().to_lowercase();
        Ok(self
            .store
            .borrow()
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle) || s.supplier_id == query.trim())
            .cloned()
            .collect())
    }

    async fn upsert(&self, supplier: &SupplierUpdate) -> RemoteResult<()> {
        self.calls.borrow_mut().push(Call::Upsert(supplier.clone()));
        let delay = self.upsert_delay.get();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_upserts.get() {
            return Err(RemoteError::new("database is locked"));
        }
        let mut store = self.store.borrow_mut();
        if let Some(row) = store.iter_mut().find(|s| s.supplier_id == supplier.supplier_id) {
            *row = supplier.to_supplier();
        }
        Ok(())
    }

    async fn create(&self, supplier: &SupplierUpdate) -> RemoteResult<()> {
        self.calls.borrow_mut().push(Call::Create(supplier.clone()));
        if self.fail_creates.get() {
            return Err(RemoteError::new("constraint failed"));
        }
        self.store.borrow_mut().push(supplier.to_supplier());
        Ok(())
    }

    async fn check_uniqueness(
        &self,
        po: &str,
        excluding_id: &str,
    ) -> RemoteResult<Option<Supplier>> {
        self.calls.borrow_mut().push(Call::CheckUniqueness {
            po: po.to_string(),
            excluding: excluding_id.to_string(),
        });
        if self.fail_uniqueness.get() {
            return Err(RemoteError::new("timeout"));
        }
        Ok(self
            .store
            .borrow()
            .iter()
            .find(|s| s.supplier_po == po && s.supplier_id != excluding_id)
            .cloned())
    }

    async fn fetch_reference_list(&self, kind: ReferenceKind) -> RemoteResult<Vec<ReferenceEntry>> {
        self.calls.borrow_mut().push(Call::FetchReferenceList(kind));
        if self.failing_lists.borrow().contains(&kind) {
            return Err(RemoteError::new("table missing"));
        }
        Ok(match kind {
            ReferenceKind::Planner => vec![
                ReferenceEntry {
                    name: "Ana".to_string(),
                    email: "ana@corp.com".to_string(),
                    alias: "ana".to_string(),
                },
                ReferenceEntry::named("Bruno"),
            ],
            other => vec![ReferenceEntry::named(format!("{other:?} 1"))],
        })
    }

    async fn bulk_validate(&self, payload: &[u8]) -> RemoteResult<String> {
        self.calls.borrow_mut().push(Call::BulkValidate(payload.len()));
        if payload.windows(CONTROL_SHEET.len()).any(|w| w == CONTROL_SHEET) {
            Ok("File is valid! 3 records found.".to_string())
        } else {
            Err(RemoteError::new("control sheet '_control' not found"))
        }
    }

    async fn bulk_commit(&self, payload: &[u8]) -> RemoteResult<CommitSummary> {
        self.calls.borrow_mut().push(Call::BulkCommit(payload.len()));
        self.commit_result
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(CommitSummary::new(0, 0, 0)))
    }

    async fn export_all(&self) -> RemoteResult<Vec<u8>> {
        self.calls.borrow_mut().push(Call::ExportAll);
        Ok(self.export_bytes.borrow().clone())
    }
}

/// Picker that returns a fixed answer.
pub struct FixedPicker(pub Option<PathBuf>);

#[async_trait(?Send)]
impl FilePicker for FixedPicker {
    async fn pick_spreadsheet(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Saver that answers with a fixed path and remembers the suggested names.
#[derive(Default)]
pub struct FixedSaver {
    pub path: Option<PathBuf>,
    pub suggested: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl FileSaver for FixedSaver {
    async fn save_location(&self, default_name: &str) -> Option<PathBuf> {
        self.suggested.borrow_mut().push(default_name.to_string());
        self.path.clone()
    }
}

/// FieldSync wired to a mock store whose rows are already in the cache.
pub struct SyncHarness {
    pub port: Rc<MockPort>,
    pub cache: SharedCache,
    pub notices: NoticeBoard,
    pub permission: EditPermission,
    pub sync: FieldSync,
}

impl SyncHarness {
    pub fn new(suppliers: Vec<Supplier>) -> Self {
        let port = MockPort::with_suppliers(suppliers.clone());
        let cache = EntityCache::shared();
        cache.borrow_mut().replace_all(suppliers);
        let notices = NoticeBoard::new();
        let permission = EditPermission::new(true);
        let dyn_port: Rc<dyn RemoteCommandPort> = port.clone();
        let sync = FieldSync::new(
            dyn_port,
            Rc::clone(&cache),
            notices.clone(),
            permission.gate(),
            save_window(),
        );
        Self {
            port,
            cache,
            notices,
            permission,
            sync,
        }
    }

    pub fn cached(&self, id: &str) -> Supplier {
        self.cache.borrow().get(id).cloned().expect("cached supplier")
    }
}
