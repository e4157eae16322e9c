use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::{ClassroomId, Day, DepartmentId, SessionType, TimeRange};

/// Weekly availability, day to open time ranges.
/// An empty map (or all-empty lists) means no restriction.
pub type WeeklyHours = BTreeMap<Day, Vec<TimeRange>>;

/// True when the map places no restriction at all
pub fn is_unrestricted(hours: &WeeklyHours) -> bool {
    hours.values().all(|ranges| ranges.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassroomType {
    Theoretical,
    Lab,
    Hybrid,
}

impl ClassroomType {
    /// Hybrid rooms take both session types; others only their own
    pub fn accepts(self, session: SessionType) -> bool {
        match self {
            ClassroomType::Hybrid => true,
            ClassroomType::Theoretical => session == SessionType::Theoretical,
            ClassroomType::Lab => session == SessionType::Lab,
        }
    }
}

/// A physical classroom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub capacity: u32,
    #[serde(rename = "type")]
    pub kind: ClassroomType,
    #[serde(default)]
    pub priority_department: Option<DepartmentId>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub available_hours: WeeklyHours,
}

fn default_active() -> bool {
    true
}

impl Classroom {
    pub fn admits(&self, session: SessionType) -> bool {
        self.kind.accepts(session)
    }
}
