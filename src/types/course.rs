use serde::{Deserialize, Serialize};
use super::{ClassroomId, CourseId, Day, DepartmentId, TeacherId, TimeRange};

/// The kind of room a session needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Theoretical,
    Lab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Compulsory,
    Elective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    Fall,
    Spring,
    Summer,
}

/// One weekly meeting unit of a course; placed as contiguous same-day blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub kind: SessionType,
    pub hours: u8,
}

/// How many students of a department take this course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentOffering {
    pub department_id: DepartmentId,
    pub student_count: u32,
}

/// A pre-committed, immovable assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardcodedPlacement {
    #[serde(rename = "type")]
    pub kind: SessionType,
    pub day: Day,
    pub range: TimeRange,
    #[serde(default)]
    pub classroom_id: Option<ClassroomId>,
}

/// A course offering with its weekly sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub faculty: String,
    /// Year level, 1-4
    pub level: u8,
    pub category: Category,
    pub semester: Semester,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    pub sessions: Vec<Session>,
    pub offerings: Vec<DepartmentOffering>,
    /// Per-course capacity slack, percent in [0, 30]
    #[serde(default)]
    pub capacity_margin_percent: u8,
    #[serde(default)]
    pub hardcoded: Vec<HardcodedPlacement>,
    /// Declared total; must equal the sum of session hours
    pub weekly_hours: u8,
}

fn default_active() -> bool {
    true
}

impl Course {
    /// Total student demand across all department offerings
    pub fn demand(&self) -> u32 {
        self.offerings.iter().map(|o| o.student_count).sum()
    }

    pub fn is_compulsory(&self) -> bool {
        self.category == Category::Compulsory
    }

    /// Sum of session hours
    pub fn session_hours_total(&self) -> u32 {
        self.sessions.iter().map(|s| s.hours as u32).sum()
    }

    pub fn offers_to(&self, department: DepartmentId) -> bool {
        self.offerings.iter().any(|o| o.department_id == department)
    }
}
