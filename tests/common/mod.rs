#![allow(dead_code)]

use course_timetabler::parser::SolverInput;
use course_timetabler::types::*;

pub fn course(id: u32) -> Course {
    Course {
        id: CourseId(id),
        code: format!("C{id}"),
        name: format!("Course {id}"),
        faculty: "Engineering".to_string(),
        level: 1,
        category: Category::Compulsory,
        semester: Semester::Fall,
        active: true,
        teacher_id: None,
        sessions: vec![Session {
            kind: SessionType::Theoretical,
            hours: 1,
        }],
        offerings: vec![DepartmentOffering {
            department_id: DepartmentId(1),
            student_count: 30,
        }],
        capacity_margin_percent: 0,
        hardcoded: vec![],
        weekly_hours: 1,
    }
}

pub fn with_session(mut course: Course, kind: SessionType, hours: u8) -> Course {
    course.sessions = vec![Session { kind, hours }];
    course.weekly_hours = hours;
    course
}

pub fn classroom(id: u32, kind: ClassroomType, capacity: u32) -> Classroom {
    Classroom {
        id: ClassroomId(id),
        name: format!("R{id}"),
        capacity,
        kind,
        priority_department: None,
        active: true,
        available_hours: WeeklyHours::new(),
    }
}

pub fn teacher(id: u32) -> Teacher {
    Teacher {
        id: TeacherId(id),
        name: format!("T{id}"),
        availability: WeeklyHours::new(),
    }
}

pub fn department(id: u32) -> Department {
    Department {
        id: DepartmentId(id),
        name: format!("Department {id}"),
    }
}

pub fn snapshot(
    courses: Vec<Course>,
    classrooms: Vec<Classroom>,
    teachers: Vec<Teacher>,
    departments: Vec<Department>,
    settings: TimeSettings,
) -> SolverInput {
    SolverInput::freeze(courses, classrooms, teachers, departments, settings)
}

pub fn range(s: &str) -> TimeRange {
    s.parse().unwrap()
}
