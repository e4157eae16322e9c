use crate::error::SolverError;
use crate::grid::WeekGrid;
use crate::types::{Classroom, Course, Department, SessionType, Teacher};
use super::SolverInput;
use std::collections::HashSet;

/// Validation result with collected errors
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Check entity lists for duplicate ids before they are frozen into maps
pub fn check_duplicate_ids(
    courses: &[Course],
    classrooms: &[Classroom],
    teachers: &[Teacher],
    departments: &[Department],
) -> Vec<String> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for course in courses {
        if !seen.insert(course.id) {
            issues.push(format!("Duplicate course id {}", course.id));
        }
    }

    let mut seen = HashSet::new();
    for classroom in classrooms {
        if !seen.insert(classroom.id) {
            issues.push(format!("Duplicate classroom id {}", classroom.id));
        }
    }

    let mut seen = HashSet::new();
    for teacher in teachers {
        if !seen.insert(teacher.id) {
            issues.push(format!("Duplicate teacher id {}", teacher.id));
        }
    }

    let mut seen = HashSet::new();
    for department in departments {
        if !seen.insert(department.id) {
            issues.push(format!("Duplicate department id {}", department.id));
        }
    }

    issues
}

/// Validate the frozen snapshot against the entity-level invariants.
pub fn validate_snapshot(input: &SolverInput, grid: &WeekGrid) -> ValidationResult {
    let mut result = ValidationResult::default();

    let mut demanded_types: HashSet<SessionType> = HashSet::new();

    for course in input.courses.values() {
        check_course_shape(course, &mut result);

        for (index, session) in course.sessions.iter().enumerate() {
            demanded_types.insert(session.kind);
            if (session.hours as u32 * 60) % grid.slot_minutes() as u32 != 0 {
                result.add_error(format!(
                    "Course {} session {} spans {} hours, which the {}-minute slot grid cannot hold",
                    course.id,
                    index,
                    session.hours,
                    grid.slot_minutes()
                ));
            }
        }

        // Referential integrity
        if let Some(teacher_id) = course.teacher_id {
            if !input.teachers.contains_key(&teacher_id) {
                result.add_error(format!(
                    "Course {} references unknown teacher {}",
                    course.id, teacher_id
                ));
            }
        }
        for offering in &course.offerings {
            if !input.departments.contains_key(&offering.department_id) {
                result.add_error(format!(
                    "Course {} references unknown department {}",
                    course.id, offering.department_id
                ));
            }
        }

        for placement in &course.hardcoded {
            if let Some(classroom_id) = placement.classroom_id {
                if !input.classrooms.contains_key(&classroom_id) {
                    result.add_error(format!(
                        "Course {} hardcodes unknown classroom {}",
                        course.id, classroom_id
                    ));
                }
            }
            if !grid.is_placement_window(placement.day, placement.range) {
                result.add_error(format!(
                    "Course {} hardcoded placement {} {} is off the block grid",
                    course.id, placement.day, placement.range
                ));
            }
            if !course.sessions.iter().any(|s| s.kind == placement.kind) {
                result.add_warning(format!(
                    "Course {} hardcodes a {:?} placement but declares no such session",
                    course.id, placement.kind
                ));
            }
        }
    }

    for classroom in input.classrooms.values() {
        if classroom.capacity < 1 {
            result.add_error(format!("Classroom {} has zero capacity", classroom.id));
        }
        if let Some(department_id) = classroom.priority_department {
            if !input.departments.contains_key(&department_id) {
                result.add_error(format!(
                    "Classroom {} references unknown priority department {}",
                    classroom.id, department_id
                ));
            }
        }
    }

    // Every demanded session type needs at least one admitting classroom
    for kind in [SessionType::Theoretical, SessionType::Lab] {
        if demanded_types.contains(&kind)
            && !input.classrooms.values().any(|r| r.admits(kind))
        {
            result.add_error(format!(
                "No active classroom admits {:?} sessions",
                kind
            ));
        }
    }

    // Demand that no classroom can hold is worth flagging early
    let max_capacity = input.classrooms.values().map(|r| r.capacity).max().unwrap_or(0);
    for course in input.courses.values() {
        if course.demand() > max_capacity {
            result.add_warning(format!(
                "Course {} demand ({}) exceeds the largest classroom capacity ({})",
                course.id,
                course.demand(),
                max_capacity
            ));
        }
    }

    result
}

fn check_course_shape(course: &Course, result: &mut ValidationResult) {
    if course.sessions.is_empty() {
        result.add_error(format!("Course {} has no sessions", course.id));
    }
    for (index, session) in course.sessions.iter().enumerate() {
        if session.hours < 1 {
            result.add_error(format!(
                "Course {} session {} has zero hours",
                course.id, index
            ));
        }
    }
    if course.session_hours_total() != course.weekly_hours as u32 {
        result.add_error(format!(
            "Course {} declares {} weekly hours but sessions sum to {}",
            course.id,
            course.weekly_hours,
            course.session_hours_total()
        ));
    }
    if course.offerings.is_empty() {
        result.add_error(format!("Course {} has no department offerings", course.id));
    }
    if !(1..=4).contains(&course.level) {
        result.add_error(format!(
            "Course {} level {} is outside 1-4",
            course.id, course.level
        ));
    }
    if course.capacity_margin_percent > 30 {
        result.add_error(format!(
            "Course {} capacity margin {}% is outside 0-30",
            course.id, course.capacity_margin_percent
        ));
    }
}

/// Run the snapshot checks and refuse to solve an inconsistent input
pub fn ensure_consistent(
    input: &SolverInput,
    grid: &WeekGrid,
) -> Result<ValidationResult, SolverError> {
    let result = validate_snapshot(input, grid);
    if result.is_valid() {
        Ok(result)
    } else {
        Err(SolverError::InputInconsistent {
            issues: result.errors,
        })
    }
}
