use serde::{Deserialize, Serialize};
use super::{ClassroomId, CourseId, Day, SessionType, TimeRange};

/// One placed meeting of a course, the solver's output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub day: Day,
    pub time_range: TimeRange,
    pub course_id: CourseId,
    pub classroom_id: ClassroomId,
    pub session_type: SessionType,
    /// Width of this contiguous run in hours
    pub session_hours: u8,
    pub is_hardcoded: bool,
}

impl ScheduleItem {
    pub fn occupies(&self, day: Day, range: TimeRange) -> bool {
        self.day == day && self.time_range.overlaps(range)
    }
}

/// Metadata stamped onto a persisted schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetadata {
    pub generated_at: String,
    pub algorithm_version: String,
    pub processing_time_ms: u64,
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self {
            generated_at: String::new(),
            algorithm_version: String::new(),
            processing_time_ms: 0,
        }
    }
}

impl ScheduleMetadata {
    pub fn stamped(processing_time_ms: u64) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            processing_time_ms,
        }
    }
}

/// The persisted schedule document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    pub items: Vec<ScheduleItem>,
    #[serde(default)]
    pub metadata: ScheduleMetadata,
}

impl ScheduleDocument {
    pub fn items_for_course(&self, course_id: CourseId) -> Vec<&ScheduleItem> {
        self.items.iter().filter(|i| i.course_id == course_id).collect()
    }

    pub fn hardcoded_items(&self) -> impl Iterator<Item = &ScheduleItem> {
        self.items.iter().filter(|i| i.is_hardcoded)
    }
}
