use crate::port::{Command, RemoteCommandPort};
use crate::statics;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Planner,
    Continuity,
    Sourcing,
    Sqie,
    BusinessUnit,
    Category,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 6] = [
        ReferenceKind::Planner,
        ReferenceKind::Continuity,
        ReferenceKind::Sourcing,
        ReferenceKind::Sqie,
        ReferenceKind::BusinessUnit,
        ReferenceKind::Category,
    ];

    pub fn command(self) -> &'static str {
        match self {
            ReferenceKind::Planner => statics::CMD_GET_PLANNERS,
            ReferenceKind::Continuity => statics::CMD_GET_CONTINUITY,
            ReferenceKind::Sourcing => statics::CMD_GET_SOURCING,
            ReferenceKind::Sqie => statics::CMD_GET_SQIE,
            ReferenceKind::BusinessUnit => statics::CMD_GET_BUSINESS_UNITS,
            ReferenceKind::Category => statics::CMD_GET_CATEGORIES,
        }
    }
}

/// One row of a lookup table. `name` is the join key into supplier fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceEntry {
    #[serde(deserialize_with = "crate::record::null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "crate::record::null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "crate::record::null_as_empty")]
    pub alias: String,
}

impl ReferenceEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Read-only lookup lists, fetched once per surface activation.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLists {
    lists: IndexMap<ReferenceKind, Vec<ReferenceEntry>>,
}

impl ReferenceLists {
    /// Fetch all six lists concurrently. A list that fails to load stays empty.
    pub async fn fetch(port: &dyn RemoteCommandPort) -> Self {
        let (planner, continuity, sourcing, sqie, business_unit, category) = tokio::join!(
            Self::fetch_one(port, ReferenceKind::Planner),
            Self::fetch_one(port, ReferenceKind::Continuity),
            Self::fetch_one(port, ReferenceKind::Sourcing),
            Self::fetch_one(port, ReferenceKind::Sqie),
            Self::fetch_one(port, ReferenceKind::BusinessUnit),
            Self::fetch_one(port, ReferenceKind::Category),
        );

        let mut lists = IndexMap::new();
        lists.insert(ReferenceKind::Planner, planner);
        lists.insert(ReferenceKind::Continuity, continuity);
        lists.insert(ReferenceKind::Sourcing, sourcing);
        lists.insert(ReferenceKind::Sqie, sqie);
        lists.insert(ReferenceKind::BusinessUnit, business_unit);
        lists.insert(ReferenceKind::Category, category);
        Self { lists }
    }

    async fn fetch_one(port: &dyn RemoteCommandPort, kind: ReferenceKind) -> Vec<ReferenceEntry> {
        match port.fetch_reference_list(kind).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    command = Command::FetchReferenceList(kind).name(),
                    error = %e,
                    "reference list unavailable"
                );
                Vec::new()
            }
        }
    }

    pub fn from_lists(lists: impl IntoIterator<Item = (ReferenceKind, Vec<ReferenceEntry>)>) -> Self {
        Self {
            lists: lists.into_iter().collect(),
        }
    }

    pub fn entries(&self, kind: ReferenceKind) -> &[ReferenceEntry] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names(&self, kind: ReferenceKind) -> impl Iterator<Item = &str> {
        self.entries(kind).iter().map(|e| e.name.as_str())
    }

    /// Resolve a supplier field value against a list (exact name match).
    pub fn lookup(&self, kind: ReferenceKind, name: &str) -> Option<&ReferenceEntry> {
        self.entries(kind).iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }
}
