//! Per-entity debounced autosave.
//!
//! Edits patch the shared cache immediately and schedule one whole-record upsert per
//! entity per settle window. At most one upsert per entity is in flight: a timer
//! that fires while the previous commit is still running is folded into a follow-up
//! commit that starts once the running one finishes.

use crate::cache::SharedCache;
use crate::conflict::ConflictGuard;
use crate::debounce::Debouncer;
use crate::error::{Result, SyncError};
use crate::notice::NoticeBoard;
use crate::permission::EditGate;
use crate::port::{Command, RemoteCommandPort};
use crate::record::{SupplierField, SupplierUpdate};
use crate::statics;
use indexmap::IndexMap;
use std::{
    cell::RefCell,
    collections::HashSet,
    rc::Rc,
    time::Duration,
};
use tokio::time::Instant;

/// Last value written to one field since the entity's previous commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub value: String,
    /// Value before the first edit of this window; restored if the write is refused.
    pub original: String,
    pub due: Instant,
}

#[derive(Debug, Default)]
struct SaveState {
    pending: IndexMap<(String, SupplierField), PendingEdit>,
    dirty: HashSet<String>,
    saving: HashSet<String>,
    requeued: HashSet<String>,
    unsaved: HashSet<String>,
}

impl SaveState {
    fn take_pending(&mut self, id: &str) -> Vec<(SupplierField, PendingEdit)> {
        let keys: Vec<(String, SupplierField)> = self
            .pending
            .keys()
            .filter(|(entity, _)| entity == id)
            .cloned()
            .collect();
        keys.into_iter()
            .filter_map(|key| {
                let edit = self.pending.shift_remove(&key)?;
                Some((key.1, edit))
            })
            .collect()
    }

    fn forget(&mut self, id: &str) {
        self.pending.retain(|(entity, _), _| entity != id);
        self.dirty.remove(id);
        self.requeued.remove(id);
        self.unsaved.remove(id);
    }
}

enum Outcome {
    /// The snapshot went out; `refused` holds a PO change that was reverted first.
    Written {
        sent: SupplierUpdate,
        result: Result<()>,
        refused: Option<SyncError>,
    },
    /// Only the PO changed and it was refused; nothing was sent.
    Refused(SyncError),
    Vanished,
}

struct Inner {
    port: Rc<dyn RemoteCommandPort>,
    cache: SharedCache,
    notices: NoticeBoard,
    gate: EditGate,
    guard: ConflictGuard,
    debouncer: Debouncer<String>,
    save_settle: Duration,
    state: RefCell<SaveState>,
}

impl Inner {
    async fn commit(&self, entity_id: String) {
        loop {
            let Some(edits) = self.begin(&entity_id) else {
                return;
            };
            let outcome = self.write(&entity_id, &edits).await;
            if !self.finish(&entity_id, outcome) {
                return;
            }
            tracing::debug!(entity_id = %entity_id, "follow-up commit for edits made in flight");
        }
    }

    fn begin(&self, id: &str) -> Option<Vec<(SupplierField, PendingEdit)>> {
        let mut state = self.state.borrow_mut();
        if state.saving.contains(id) {
            state.requeued.insert(id.to_string());
            tracing::debug!(entity_id = id, "commit already in flight; queued");
            return None;
        }
        if !self.cache.borrow().contains(id) {
            state.forget(id);
            return None;
        }
        let edits = state.take_pending(id);
        state.dirty.remove(id);
        state.saving.insert(id.to_string());
        Some(edits)
    }

    async fn write(&self, id: &str, edits: &[(SupplierField, PendingEdit)]) -> Outcome {
        let mut refused = None;
        if let Some((_, po_edit)) = edits.iter().find(|(field, _)| *field == SupplierField::Po) {
            let checked_po = self.normalize_po(id);
            if let Err(err) = self.guard.ensure_unique(&checked_po, id).await {
                self.revert_po(id, &checked_po, &po_edit.original);
                if edits.iter().all(|(field, _)| *field == SupplierField::Po) {
                    return Outcome::Refused(err);
                }
                refused = Some(err);
            }
        }

        // Snapshot at send time, not at schedule time.
        let Some(sent) = self.cache.borrow().get(id).map(SupplierUpdate::from) else {
            return Outcome::Vanished;
        };
        tracing::debug!(entity_id = id, fields = edits.len(), "upserting");
        let result = self
            .port
            .upsert(&sent)
            .await
            .map_err(|e| SyncError::transport(Command::Upsert.name(), e));
        Outcome::Written {
            sent,
            result,
            refused,
        }
    }

    /// Trim the cached PO so it is checked and stored under the same spelling.
    fn normalize_po(&self, id: &str) -> String {
        let mut cache = self.cache.borrow_mut();
        let raw = cache
            .get(id)
            .map(|s| s.supplier_po.clone())
            .unwrap_or_default();
        let trimmed = raw.trim();
        if trimmed != raw {
            cache.set_field(id, SupplierField::Po, trimmed);
        }
        trimmed.to_string()
    }

    /// Put the pre-edit PO back unless the user typed a newer one during the check.
    fn revert_po(&self, id: &str, checked_po: &str, original_po: &str) {
        let state = self.state.borrow();
        let mut cache = self.cache.borrow_mut();
        let untouched = cache.get(id).is_some_and(|s| s.supplier_po == checked_po);
        if untouched && !state.pending.contains_key(&(id.to_string(), SupplierField::Po)) {
            cache.set_field(id, SupplierField::Po, original_po);
        }
    }

    /// Reconcile a finished commit. Returns whether a follow-up commit is due.
    fn finish(&self, id: &str, outcome: Outcome) -> bool {
        let mut state = self.state.borrow_mut();
        let cache = self.cache.borrow();
        state.saving.remove(id);
        let requeued = state.requeued.remove(id);

        if !cache.contains(id) {
            state.forget(id);
            tracing::debug!(entity_id = id, "entity left the view; commit result discarded");
            return false;
        }

        match outcome {
            Outcome::Written {
                sent,
                result,
                refused,
            } => {
                match result {
                    Ok(()) => {
                        // Local values that are neither in the store nor queued to be sent.
                        let orphaned = cache.get(id).is_some_and(|s| SupplierUpdate::from(s) != sent)
                            && !state.pending.keys().any(|(entity, _)| entity == id);
                        if orphaned {
                            state.unsaved.insert(id.to_string());
                        } else if state.unsaved.remove(id) {
                            tracing::debug!(entity_id = id, "unsaved mark cleared");
                        }
                        tracing::info!(entity_id = id, "supplier saved");
                    }
                    Err(err) => {
                        state.unsaved.insert(id.to_string());
                        self.notices
                            .error(format!("{}: {err}", statics::EN_SAVE_FAILED));
                    }
                }
                if let Some(err) = refused {
                    state.unsaved.insert(id.to_string());
                    self.notices.error(err.to_string());
                }
            }
            Outcome::Refused(err) => {
                state.unsaved.insert(id.to_string());
                self.notices.error(err.to_string());
            }
            Outcome::Vanished => {}
        }
        requeued
    }
}

/// Debounced autosave for the suppliers in a session's cache.
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct FieldSync {
    inner: Rc<Inner>,
}

impl FieldSync {
    pub fn new(
        port: Rc<dyn RemoteCommandPort>,
        cache: SharedCache,
        notices: NoticeBoard,
        gate: EditGate,
        save_settle: Duration,
    ) -> Self {
        let guard = ConflictGuard::new(Rc::clone(&port));
        Self {
            inner: Rc::new(Inner {
                port,
                cache,
                notices,
                gate,
                guard,
                debouncer: Debouncer::new(),
                save_settle,
                state: RefCell::new(SaveState::default()),
            }),
        }
    }

    /// Apply an edit locally and (re)start the entity's settle window.
    pub fn on_field_edit(
        &self,
        entity_id: &str,
        field: SupplierField,
        value: impl Into<String>,
    ) -> Result<()> {
        if !self.inner.gate.can_edit() {
            return Err(SyncError::PermissionDenied);
        }

        let value = value.into();
        let previous = self
            .inner
            .cache
            .borrow_mut()
            .set_field(entity_id, field, &value)
            .ok_or_else(|| SyncError::UnknownEntity(entity_id.to_string()))?;

        let due = Instant::now() + self.inner.save_settle;
        {
            let mut state = self.inner.state.borrow_mut();
            state
                .pending
                .entry((entity_id.to_string(), field))
                .and_modify(|edit| edit.value.clone_from(&value))
                .or_insert_with(|| PendingEdit {
                    value: value.clone(),
                    original: previous,
                    due,
                });
            for ((entity, _), edit) in state.pending.iter_mut() {
                if entity == entity_id {
                    edit.due = due;
                }
            }
            state.dirty.insert(entity_id.to_string());
        }

        tracing::debug!(entity_id, field = field.as_str(), "edit scheduled");
        self.schedule(entity_id);
        Ok(())
    }

    fn schedule(&self, entity_id: &str) {
        let weak = Rc::downgrade(&self.inner);
        let id = entity_id.to_string();
        self.inner
            .debouncer
            .schedule(id.clone(), self.inner.save_settle, move || async move {
                if let Some(inner) = weak.upgrade() {
                    inner.commit(id).await;
                }
            });
    }

    /// Skip the rest of the settle window and commit now.
    /// Returns whether there was anything to commit.
    pub async fn flush(&self, entity_id: &str) -> bool {
        self.inner.debouncer.cancel(&entity_id.to_string());
        let has_edits = self
            .inner
            .state
            .borrow()
            .pending
            .keys()
            .any(|(entity, _)| entity == entity_id);
        if has_edits {
            self.inner.commit(entity_id.to_string()).await;
        }
        has_edits
    }

    /// Drop all scheduling state for an entity that left the view.
    /// A commit already in flight completes, but its result is discarded.
    pub fn forget(&self, entity_id: &str) {
        self.inner.debouncer.cancel(&entity_id.to_string());
        self.inner.state.borrow_mut().forget(entity_id);
    }

    pub fn forget_many<'a>(&self, entity_ids: impl IntoIterator<Item = &'a str>) {
        for id in entity_ids {
            self.forget(id);
        }
    }

    /// Bring the sync state in line with a freshly replaced cache: evicted entities
    /// are forgotten, and edits still waiting for their settle window are re-applied
    /// on top of the rows the store just returned.
    pub fn reconcile_after_replace(&self, evicted: &[String]) {
        self.forget_many(evicted.iter().map(String::as_str));

        let state = self.inner.state.borrow();
        let mut cache = self.inner.cache.borrow_mut();
        for ((entity, field), edit) in state.pending.iter() {
            cache.set_field(entity, *field, &edit.value);
        }
    }

    /// Cancel every pending timer (surface closing). Edits that were never sent are
    /// dropped from scheduling and their entities are reported by `unsaved_ids`.
    /// Upserts already in flight still complete, without a follow-up.
    pub fn cancel_all(&self) {
        self.inner.debouncer.cancel_all();

        let mut state = self.inner.state.borrow_mut();
        let abandoned: HashSet<String> = state
            .pending
            .drain(..)
            .map(|((entity, _), _)| entity)
            .collect();
        for id in abandoned {
            tracing::info!(entity_id = %id, "unsent edits abandoned");
            state.dirty.remove(&id);
            state.requeued.remove(&id);
            state.unsaved.insert(id);
        }
    }

    pub fn is_saving(&self, entity_id: &str) -> bool {
        self.inner.state.borrow().saving.contains(entity_id)
    }

    /// Edits made but not yet sent.
    pub fn is_dirty(&self, entity_id: &str) -> bool {
        self.inner.state.borrow().dirty.contains(entity_id)
    }

    /// Spinner state: from the first edit until the resulting upsert resolves.
    pub fn is_busy(&self, entity_id: &str) -> bool {
        let state = self.inner.state.borrow();
        state.dirty.contains(entity_id) || state.saving.contains(entity_id)
    }

    pub fn saving_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.state.borrow().saving.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Entities whose latest commit failed or was refused; local values differ from the store.
    pub fn unsaved_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.state.borrow().unsaved.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn pending_edits(&self, entity_id: &str) -> Vec<(SupplierField, PendingEdit)> {
        self.inner
            .state
            .borrow()
            .pending
            .iter()
            .filter(|((entity, _), _)| entity == entity_id)
            .map(|((_, field), edit)| (*field, edit.clone()))
            .collect()
    }

    pub fn has_pending_timer(&self, entity_id: &str) -> bool {
        self.inner.debouncer.is_pending(&entity_id.to_string())
    }
}
