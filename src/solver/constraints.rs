use crate::grid::WeekGrid;
use crate::types::{
    is_unrestricted, Classroom, Course, Day, SessionType, Teacher, TeacherId, TimeRange,
    TimeSettings, WeeklyHours,
};
use super::conflict_index::{ConflictIndex, ConflictKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a candidate placement was refused; the first failing predicate wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection {
    OutsideGrid,
    TeacherUnavailable,
    ClassroomUnavailable,
    TypeIncompatible,
    CapacityShortage,
    TeacherConflict,
    ClassroomConflict,
    CohortConflict,
}

impl Rejection {
    pub fn label(self) -> &'static str {
        match self {
            Rejection::OutsideGrid => "outside-grid",
            Rejection::TeacherUnavailable => "teacher-unavailable",
            Rejection::ClassroomUnavailable => "classroom-unavailable",
            Rejection::TypeIncompatible => "type-incompatible",
            Rejection::CapacityShortage => "capacity-shortage",
            Rejection::TeacherConflict => "teacher-conflict",
            Rejection::ClassroomConflict => "classroom-conflict",
            Rejection::CohortConflict => "cohort-conflict",
        }
    }
}

/// Soft attributes of an accepted candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    /// Classroom belongs to another department; penalized, not rejected
    pub priority_penalty: bool,
    /// Spare effective capacity beyond the course demand
    pub excess_capacity: u64,
}

/// Evaluates the ordered feasibility predicates for candidate placements
pub struct ConstraintEvaluator<'a> {
    grid: &'a WeekGrid,
    settings: &'a TimeSettings,
    teachers: &'a BTreeMap<TeacherId, Teacher>,
}

impl<'a> ConstraintEvaluator<'a> {
    pub fn new(
        grid: &'a WeekGrid,
        settings: &'a TimeSettings,
        teachers: &'a BTreeMap<TeacherId, Teacher>,
    ) -> Self {
        Self {
            grid,
            settings,
            teachers,
        }
    }

    /// The capacity margin to apply: the larger of the global margin (when
    /// enabled) and the per-course margin. Margins never stack.
    pub fn margin_percent(&self, course: &Course) -> u8 {
        let global = if self.settings.capacity_margin_enabled {
            self.settings.capacity_margin_percent
        } else {
            0
        };
        global.max(course.capacity_margin_percent)
    }

    /// Margin-inflated seat count comparison, exact integer arithmetic
    pub fn capacity_suffices(&self, course: &Course, classroom: &Classroom) -> bool {
        let margin = self.margin_percent(course) as u64;
        (classroom.capacity as u64) * (100 + margin) >= (course.demand() as u64) * 100
    }

    /// Effective seats beyond demand; only meaningful when capacity suffices
    fn excess_capacity(&self, course: &Course, classroom: &Classroom) -> u64 {
        let margin = self.margin_percent(course) as u64;
        let effective = (classroom.capacity as u64) * (100 + margin) / 100;
        effective.saturating_sub(course.demand() as u64)
    }

    /// Soft attributes of a course/classroom pairing, independent of time
    pub fn soft_attributes(&self, course: &Course, classroom: &Classroom) -> Acceptance {
        Acceptance {
            priority_penalty: classroom
                .priority_department
                .map(|department| !course.offers_to(department))
                .unwrap_or(false),
            excess_capacity: self.excess_capacity(course, classroom),
        }
    }

    fn availability_covers(&self, hours: &WeeklyHours, day: Day, range: TimeRange) -> bool {
        if is_unrestricted(hours) {
            return true;
        }
        let Some(open) = hours.get(&day) else {
            return false;
        };
        // Each slot-wide sub-block must sit inside one open range
        let slot = self.grid.slot_minutes();
        let mut start = range.start().minutes();
        while start < range.end().minutes() {
            let sub = TimeRange::new(
                crate::types::TimeOfDay::from_minutes(start).unwrap(),
                crate::types::TimeOfDay::from_minutes(start + slot).unwrap(),
            )
            .unwrap();
            if !open.iter().any(|window| window.contains(sub)) {
                return false;
            }
            start += slot;
        }
        true
    }

    /// Run the ordered predicates for one candidate.
    ///
    /// Returns the soft attributes on acceptance, or the first failing
    /// predicate's rejection.
    pub fn evaluate(
        &self,
        course: &Course,
        session_kind: SessionType,
        classroom: &Classroom,
        day: Day,
        range: TimeRange,
        index: &mut ConflictIndex,
    ) -> Result<Acceptance, Rejection> {
        // 1. Time-grid membership
        if !self.grid.is_placement_window(day, range) {
            return Err(Rejection::OutsideGrid);
        }

        // 2. Teacher availability
        if let Some(teacher_id) = course.teacher_id {
            if let Some(teacher) = self.teachers.get(&teacher_id) {
                if !self.availability_covers(&teacher.availability, day, range) {
                    return Err(Rejection::TeacherUnavailable);
                }
            }
        }

        // 3. Classroom availability
        if !self.availability_covers(&classroom.available_hours, day, range) {
            return Err(Rejection::ClassroomUnavailable);
        }

        // 4. Classroom type compatibility
        if !classroom.admits(session_kind) {
            return Err(Rejection::TypeIncompatible);
        }

        // 5. Capacity with margin
        if !self.capacity_suffices(course, classroom) {
            return Err(Rejection::CapacityShortage);
        }

        // 6. Teacher / classroom / cohort non-conflict
        if let Some(conflict) = index.check_placement(course, classroom, day, range) {
            return Err(match conflict.kind {
                ConflictKind::Teacher => Rejection::TeacherConflict,
                ConflictKind::Classroom => Rejection::ClassroomConflict,
                ConflictKind::Cohort => Rejection::CohortConflict,
            });
        }

        // 7. Priority respect is soft
        Ok(self.soft_attributes(course, classroom))
    }
}
