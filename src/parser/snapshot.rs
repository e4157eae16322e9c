use crate::types::{
    Classroom, ClassroomId, Course, CourseId, Department, DepartmentId, Teacher, TeacherId,
    TimeSettings,
};
use std::collections::BTreeMap;

/// The frozen view of the world the solver consumes.
///
/// Inactive courses and classrooms are dropped at freeze time; the maps are
/// BTreeMaps so every iteration over the snapshot is in id order.
#[derive(Debug, Clone)]
pub struct SolverInput {
    pub courses: BTreeMap<CourseId, Course>,
    pub classrooms: BTreeMap<ClassroomId, Classroom>,
    pub teachers: BTreeMap<TeacherId, Teacher>,
    pub departments: BTreeMap<DepartmentId, Department>,
    pub settings: TimeSettings,
}

impl SolverInput {
    /// Freeze raw entity lists into the snapshot, keeping only active rows.
    pub fn freeze(
        courses: Vec<Course>,
        classrooms: Vec<Classroom>,
        teachers: Vec<Teacher>,
        departments: Vec<Department>,
        settings: TimeSettings,
    ) -> Self {
        Self {
            courses: courses
                .into_iter()
                .filter(|c| c.active)
                .map(|c| (c.id, c))
                .collect(),
            classrooms: classrooms
                .into_iter()
                .filter(|r| r.active)
                .map(|r| (r.id, r))
                .collect(),
            teachers: teachers.into_iter().map(|t| (t.id, t)).collect(),
            departments: departments.into_iter().map(|d| (d.id, d)).collect(),
            settings,
        }
    }

    /// Total student demand of a course, zero for unknown ids
    pub fn demand_of(&self, course_id: CourseId) -> u32 {
        self.courses.get(&course_id).map(|c| c.demand()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, ClassroomType, Semester, Session, SessionType, WeeklyHours};

    fn course(id: u32, active: bool) -> Course {
        Course {
            id: CourseId(id),
            code: format!("C{id}"),
            name: format!("Course {id}"),
            faculty: "Engineering".to_string(),
            level: 1,
            category: Category::Compulsory,
            semester: Semester::Fall,
            active,
            teacher_id: None,
            sessions: vec![Session { kind: SessionType::Theoretical, hours: 2 }],
            offerings: vec![],
            capacity_margin_percent: 0,
            hardcoded: vec![],
            weekly_hours: 2,
        }
    }

    #[test]
    fn test_freeze_drops_inactive_entities() {
        let classrooms = vec![
            Classroom {
                id: ClassroomId(1),
                name: "R1".to_string(),
                capacity: 30,
                kind: ClassroomType::Theoretical,
                priority_department: None,
                active: true,
                available_hours: WeeklyHours::new(),
            },
            Classroom {
                id: ClassroomId(2),
                name: "R2".to_string(),
                capacity: 30,
                kind: ClassroomType::Theoretical,
                priority_department: None,
                active: false,
                available_hours: WeeklyHours::new(),
            },
        ];
        let input = SolverInput::freeze(
            vec![course(1, true), course(2, false)],
            classrooms,
            vec![],
            vec![],
            TimeSettings::default(),
        );
        assert_eq!(input.courses.len(), 1);
        assert!(input.courses.contains_key(&CourseId(1)));
        assert_eq!(input.classrooms.len(), 1);
        assert!(input.classrooms.contains_key(&ClassroomId(1)));
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let input = SolverInput::freeze(
            vec![course(3, true), course(1, true), course(2, true)],
            vec![],
            vec![],
            vec![],
            TimeSettings::default(),
        );
        let ids: Vec<u32> = input.courses.keys().map(|c| c.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
