//! Explicit save of the create/edit form.

use crate::cache::SharedCache;
use crate::conflict::ConflictGuard;
use crate::error::{Result, SyncError};
use crate::notice::NoticeBoard;
use crate::permission::EditGate;
use crate::port::{Command, RemoteCommandPort};
use crate::record::{Supplier, SupplierField, SupplierUpdate};
use crate::statics;
use std::rc::Rc;

/// Form contents. `supplier_id` is `None` while creating a new supplier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupplierDraft {
    pub supplier_id: Option<String>,
    pub fields: SupplierUpdate,
}

impl SupplierDraft {
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            supplier_id: None,
            fields: SupplierUpdate {
                supplier_name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn from_supplier(supplier: &Supplier) -> Self {
        Self {
            supplier_id: Some(supplier.supplier_id.clone()),
            fields: SupplierUpdate::from(supplier),
        }
    }

    pub fn set(&mut self, field: SupplierField, value: impl Into<String>) -> &mut Self {
        let mut supplier = self.fields.to_supplier();
        supplier.set_field(field, value);
        self.fields = SupplierUpdate::from(&supplier);
        self
    }

    fn check_required(&self) -> Result<()> {
        if self.fields.supplier_name.trim().is_empty() {
            return Err(SyncError::Validation(statics::EN_NAME_REQUIRED.to_string()));
        }
        if self.fields.country.trim().is_empty() {
            return Err(SyncError::Validation(statics::EN_ORIGIN_REQUIRED.to_string()));
        }
        Ok(())
    }
}

/// Client-generated id used for optimistic creation: prefix + unix millis.
pub fn new_supplier_id(prefix: &str) -> String {
    format!("{prefix}{}", chrono::Utc::now().timestamp_millis())
}

pub struct RecordEditor {
    port: Rc<dyn RemoteCommandPort>,
    cache: SharedCache,
    notices: NoticeBoard,
    gate: EditGate,
    guard: ConflictGuard,
    id_prefix: String,
}

impl RecordEditor {
    pub fn new(
        port: Rc<dyn RemoteCommandPort>,
        cache: SharedCache,
        notices: NoticeBoard,
        gate: EditGate,
        id_prefix: impl Into<String>,
    ) -> Self {
        let guard = ConflictGuard::new(Rc::clone(&port));
        Self {
            port,
            cache,
            notices,
            gate,
            guard,
            id_prefix: id_prefix.into(),
        }
    }

    /// Validate, check PO uniqueness, then update or create.
    /// Every failure is also posted as a notice; nothing is written on rejection.
    pub async fn save(&self, draft: SupplierDraft) -> Result<Supplier> {
        let failed_text = if draft.supplier_id.is_some() {
            statics::EN_SAVE_FAILED
        } else {
            statics::EN_CREATE_FAILED
        };
        let result = self.save_inner(draft).await;
        match &result {
            Ok(_) => {}
            Err(err @ (SyncError::Validation(_) | SyncError::Conflict { .. })) => {
                self.notices.error(err.to_string());
            }
            Err(SyncError::PermissionDenied) => self.notices.error(statics::EN_EDIT_DISABLED),
            Err(err) => self.notices.error(format!("{failed_text}: {err}")),
        }
        result
    }

    async fn save_inner(&self, mut draft: SupplierDraft) -> Result<Supplier> {
        if !self.gate.can_edit() {
            return Err(SyncError::PermissionDenied);
        }
        draft.check_required()?;
        // Checked and stored under the same spelling.
        draft.fields.supplier_po = draft.fields.supplier_po.trim().to_string();

        let excluding = draft.supplier_id.as_deref().unwrap_or(statics::NO_SUPPLIER_ID);
        self.guard
            .ensure_unique(&draft.fields.supplier_po, excluding)
            .await?;

        match draft.supplier_id {
            Some(id) => self.update(id, draft.fields).await,
            None => self.create(draft.fields).await,
        }
    }

    async fn update(&self, id: String, mut fields: SupplierUpdate) -> Result<Supplier> {
        // Display name is fixed once the supplier exists.
        if let Some(cached) = self.cache.borrow().get(&id) {
            fields.supplier_name.clone_from(&cached.name);
        }
        fields.supplier_id = id;
        self.port
            .upsert(&fields)
            .await
            .map_err(|e| SyncError::transport(Command::Upsert.name(), e))?;

        // Keep scores from the cached row; only editable fields changed.
        let mut supplier = self
            .cache
            .borrow()
            .get(&fields.supplier_id)
            .cloned()
            .unwrap_or_else(|| Supplier::new(fields.supplier_id.clone(), fields.supplier_name.clone()));
        for field in SupplierField::ALL {
            supplier.set_field(field, fields.field(field));
        }
        self.cache.borrow_mut().update(supplier.clone());

        tracing::info!(entity_id = %supplier.supplier_id, "supplier updated");
        self.notices.success(statics::EN_SUPPLIER_UPDATED);
        Ok(supplier)
    }

    async fn create(&self, mut fields: SupplierUpdate) -> Result<Supplier> {
        fields.supplier_id = new_supplier_id(&self.id_prefix);
        let supplier = fields.to_supplier();

        // Optimistic: visible before the store confirms.
        self.cache.borrow_mut().insert(supplier.clone());

        if let Err(e) = self.port.create(&fields).await {
            self.cache.borrow_mut().remove(&fields.supplier_id);
            tracing::warn!(entity_id = %fields.supplier_id, error = %e, "create failed; optimistic row removed");
            return Err(SyncError::transport(Command::Create.name(), e));
        }

        tracing::info!(entity_id = %supplier.supplier_id, "supplier created");
        self.notices.success(statics::EN_SUPPLIER_CREATED);
        Ok(supplier)
    }
}
