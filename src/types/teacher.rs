use serde::{Deserialize, Serialize};
use super::{is_unrestricted, TeacherId, WeeklyHours};

/// A teacher with their weekly availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    /// Empty map or all-empty lists mean universally available
    #[serde(default)]
    pub availability: WeeklyHours,
}

impl Teacher {
    pub fn is_universally_available(&self) -> bool {
        is_unrestricted(&self.availability)
    }
}
