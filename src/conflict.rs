use crate::error::{Result, SyncError};
use crate::port::{Command, RemoteCommandPort};
use std::rc::Rc;

/// Pre-write PO uniqueness check.
///
/// Best-effort only: a write racing the check is not detected, and a failing
/// check does not block the save.
#[derive(Clone)]
pub struct ConflictGuard {
    port: Rc<dyn RemoteCommandPort>,
}

impl ConflictGuard {
    pub fn new(port: Rc<dyn RemoteCommandPort>) -> Self {
        Self { port }
    }

    /// `Err(Conflict)` naming the holder when another supplier already uses `po`.
    pub async fn ensure_unique(&self, po: &str, excluding_id: &str) -> Result<()> {
        let po = po.trim();
        if po.is_empty() {
            return Ok(());
        }

        match self.port.check_uniqueness(po, excluding_id).await {
            Ok(Some(holder)) if holder.supplier_id != excluding_id => {
                tracing::info!(po, holder = %holder.supplier_id, "PO already in use");
                Err(SyncError::Conflict {
                    po: po.to_string(),
                    holder: holder.name,
                })
            }
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    command = Command::CheckUniqueness.name(),
                    po,
                    error = %e,
                    "uniqueness check failed; continuing"
                );
                Ok(())
            }
        }
    }
}
