use crate::types::{CourseId, Day, TimeOfDay, TimeRange};
use std::fmt;
use thiserror::Error;

/// Identifies one half of a hardcoded-placement collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRef {
    pub course_id: CourseId,
    pub day: Day,
    pub range: TimeRange,
}

impl fmt::Display for PlacementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "course {} at {} {}", self.course_id, self.day, self.range)
    }
}

/// Domain-specific errors for the timetable solver
#[derive(Error, Debug)]
pub enum SolverError {
    // Input/Parse errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{file}': {message}")]
    Parse { file: String, message: String },

    // Settings refuse to produce a grid
    #[error("Day end {end} is not after day start {start}")]
    InvalidTimeWindow { start: TimeOfDay, end: TimeOfDay },

    #[error("Slot duration of {minutes} minutes does not divide the {span}-minute day window")]
    InvalidSlotDuration { minutes: u16, span: u16 },

    #[error("Lunch window {start}-{end} does not fit inside the day window")]
    InvalidLunchWindow { start: TimeOfDay, end: TimeOfDay },

    // Generation errors
    #[error("Invalid generation options: {0}")]
    InvalidOptions(String),

    #[error("Input snapshot is inconsistent ({} issue(s)):\n{}", .issues.len(), .issues.join("\n"))]
    InputInconsistent { issues: Vec<String> },

    #[error("Hardcoded placements collide: {first} vs {second}")]
    HardcodedConflict {
        first: PlacementRef,
        second: PlacementRef,
    },

    #[error("Hardcoded placement cannot be satisfied: {placement}: {reason}")]
    HardcodedUnplaceable {
        placement: PlacementRef,
        reason: String,
    },
}

/// Use anyhow::Result at application boundaries
pub type Result<T> = anyhow::Result<T>;
