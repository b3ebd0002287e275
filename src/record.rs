use crate::statics;
use serde::{Deserialize, Deserializer, Serialize};

/// Reads a possibly-null string as `""`.
/// Field values are always strings; absence never becomes a distinct state.
pub fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The editable named fields of a supplier record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SupplierField {
    Po,
    BusinessUnit,
    Email,
    Status,
    Planner,
    Origin,
    Category,
    Continuity,
    Sourcing,
    Sqie,
    Ssid,
    OtifTarget,
    NilTarget,
    PickupTarget,
    PackageTarget,
}

impl SupplierField {
    pub const ALL: [SupplierField; 15] = [
        SupplierField::Po,
        SupplierField::BusinessUnit,
        SupplierField::Email,
        SupplierField::Status,
        SupplierField::Planner,
        SupplierField::Origin,
        SupplierField::Category,
        SupplierField::Continuity,
        SupplierField::Sourcing,
        SupplierField::Sqie,
        SupplierField::Ssid,
        SupplierField::OtifTarget,
        SupplierField::NilTarget,
        SupplierField::PickupTarget,
        SupplierField::PackageTarget,
    ];

    /// Wire name used by the store.
    pub fn as_str(self) -> &'static str {
        match self {
            SupplierField::Po => statics::FIELD_PO,
            SupplierField::BusinessUnit => statics::FIELD_BU,
            SupplierField::Email => statics::FIELD_EMAIL,
            SupplierField::Status => statics::FIELD_STATUS,
            SupplierField::Planner => statics::FIELD_PLANNER,
            SupplierField::Origin => statics::FIELD_COUNTRY,
            SupplierField::Category => statics::FIELD_CATEGORY,
            SupplierField::Continuity => statics::FIELD_CONTINUITY,
            SupplierField::Sourcing => statics::FIELD_SOURCING,
            SupplierField::Sqie => statics::FIELD_SQIE,
            SupplierField::Ssid => statics::FIELD_SSID,
            SupplierField::OtifTarget => statics::FIELD_OTIF_TARGET,
            SupplierField::NilTarget => statics::FIELD_NIL_TARGET,
            SupplierField::PickupTarget => statics::FIELD_PICKUP_TARGET,
            SupplierField::PackageTarget => statics::FIELD_PACKAGE_TARGET,
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    pub fn is_target(self) -> bool {
        matches!(
            self,
            SupplierField::OtifTarget
                | SupplierField::NilTarget
                | SupplierField::PickupTarget
                | SupplierField::PackageTarget
        )
    }
}

impl std::fmt::Display for SupplierField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score categories carried (read-only) on search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Otif,
    Nil,
    Pickup,
    Package,
    Total,
}

/// One supplier record as returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Supplier {
    #[serde(deserialize_with = "null_as_empty")]
    pub supplier_id: String,
    #[serde(rename = "vendor_name", deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub supplier_po: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub bu: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub supplier_email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub supplier_status: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub planner: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub supplier_category: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub continuity: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sourcing: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sqie: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ssid: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub otif_target: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub nil_target: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pickup_target: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub package_target: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub otif_score: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub nil_score: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pickup_score: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub package_score: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub total_score: String,
}

impl Supplier {
    pub fn new(supplier_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn field(&self, field: SupplierField) -> &str {
        match field {
            SupplierField::Po => &self.supplier_po,
            SupplierField::BusinessUnit => &self.bu,
            SupplierField::Email => &self.supplier_email,
            SupplierField::Status => &self.supplier_status,
            SupplierField::Planner => &self.planner,
            SupplierField::Origin => &self.country,
            SupplierField::Category => &self.supplier_category,
            SupplierField::Continuity => &self.continuity,
            SupplierField::Sourcing => &self.sourcing,
            SupplierField::Sqie => &self.sqie,
            SupplierField::Ssid => &self.ssid,
            SupplierField::OtifTarget => &self.otif_target,
            SupplierField::NilTarget => &self.nil_target,
            SupplierField::PickupTarget => &self.pickup_target,
            SupplierField::PackageTarget => &self.package_target,
        }
    }

    fn field_mut(&mut self, field: SupplierField) -> &mut String {
        match field {
            SupplierField::Po => &mut self.supplier_po,
            SupplierField::BusinessUnit => &mut self.bu,
            SupplierField::Email => &mut self.supplier_email,
            SupplierField::Status => &mut self.supplier_status,
            SupplierField::Planner => &mut self.planner,
            SupplierField::Origin => &mut self.country,
            SupplierField::Category => &mut self.supplier_category,
            SupplierField::Continuity => &mut self.continuity,
            SupplierField::Sourcing => &mut self.sourcing,
            SupplierField::Sqie => &mut self.sqie,
            SupplierField::Ssid => &mut self.ssid,
            SupplierField::OtifTarget => &mut self.otif_target,
            SupplierField::NilTarget => &mut self.nil_target,
            SupplierField::PickupTarget => &mut self.pickup_target,
            SupplierField::PackageTarget => &mut self.package_target,
        }
    }

    /// Overwrite one field, returning the previous value.
    pub fn set_field(&mut self, field: SupplierField, value: impl Into<String>) -> String {
        std::mem::replace(self.field_mut(field), value.into())
    }

    /// Individual addresses from the free-text email list.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.supplier_email
            .split(statics::EMAIL_SEPARATORS)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn score(&self, kind: ScoreKind) -> Option<f64> {
        let raw = match kind {
            ScoreKind::Otif => &self.otif_score,
            ScoreKind::Nil => &self.nil_score,
            ScoreKind::Pickup => &self.pickup_score,
            ScoreKind::Package => &self.package_score,
            ScoreKind::Total => &self.total_score,
        };
        parse_number(raw)
    }

    /// Numeric value of a target field; `None` for other fields or blanks.
    pub fn target(&self, field: SupplierField) -> Option<f64> {
        if !field.is_target() {
            return None;
        }
        parse_number(self.field(field))
    }
}

// Scores arrive both as "8.5" and "8,5".
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse().ok()
}

/// Whole-record snapshot sent to `upsert` / `create`.
/// The store replaces the record; it never patches individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub supplier_id: String,
    pub supplier_name: String,
    pub supplier_po: String,
    pub bu: String,
    pub supplier_email: String,
    pub supplier_status: String,
    pub planner: String,
    pub country: String,
    pub supplier_category: String,
    pub continuity: String,
    pub sourcing: String,
    pub sqie: String,
    pub ssid: String,
    pub otif_target: String,
    pub nil_target: String,
    pub pickup_target: String,
    pub package_target: String,
}

impl From<&Supplier> for SupplierUpdate {
    fn from(s: &Supplier) -> Self {
        Self {
            supplier_id: s.supplier_id.clone(),
            supplier_name: s.name.clone(),
            supplier_po: s.supplier_po.clone(),
            bu: s.bu.clone(),
            supplier_email: s.supplier_email.clone(),
            supplier_status: s.supplier_status.clone(),
            planner: s.planner.clone(),
            country: s.country.clone(),
            supplier_category: s.supplier_category.clone(),
            continuity: s.continuity.clone(),
            sourcing: s.sourcing.clone(),
            sqie: s.sqie.clone(),
            ssid: s.ssid.clone(),
            otif_target: s.otif_target.clone(),
            nil_target: s.nil_target.clone(),
            pickup_target: s.pickup_target.clone(),
            package_target: s.package_target.clone(),
        }
    }
}

impl SupplierUpdate {
    /// Rebuild a displayable record from a snapshot (scores stay empty until the next search).
    pub fn to_supplier(&self) -> Supplier {
        let mut supplier = Supplier::new(self.supplier_id.clone(), self.supplier_name.clone());
        for field in SupplierField::ALL {
            supplier.set_field(field, self.field(field));
        }
        supplier
    }

    pub fn field(&self, field: SupplierField) -> &str {
        match field {
            SupplierField::Po => &self.supplier_po,
            SupplierField::BusinessUnit => &self.bu,
            SupplierField::Email => &self.supplier_email,
            SupplierField::Status => &self.supplier_status,
            SupplierField::Planner => &self.planner,
            SupplierField::Origin => &self.country,
            SupplierField::Category => &self.supplier_category,
            SupplierField::Continuity => &self.continuity,
            SupplierField::Sourcing => &self.sourcing,
            SupplierField::Sqie => &self.sqie,
            SupplierField::Ssid => &self.ssid,
            SupplierField::OtifTarget => &self.otif_target,
            SupplierField::NilTarget => &self.nil_target,
            SupplierField::PickupTarget => &self.pickup_target,
            SupplierField::PackageTarget => &self.package_target,
        }
    }
}
