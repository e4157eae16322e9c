use crate::parser::SolverInput;
use crate::types::{CourseId, SessionType};
use super::constraints::ConstraintEvaluator;

/// A session queued for placement, ranked hardest-first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSession {
    pub course_id: CourseId,
    pub session_index: usize,
    pub kind: SessionType,
    pub hours: u8,
    pub difficulty: f64,
}

const COMPULSORY_BONUS: f64 = 0.5;
const HOURS_BONUS: f64 = 0.25;
const NO_COMPATIBLE_ROOM: f64 = 10.0;

/// Score every session of every course and sort hardest-first.
///
/// Difficulty combines demand pressure against the average classroom,
/// scarcity of type-compatible rooms that are large enough, a bonus for
/// compulsory courses, and a bonus per session hour. Ties break on
/// (course id, session index) so the ordering is total.
pub fn rank_sessions(input: &SolverInput, evaluator: &ConstraintEvaluator) -> Vec<RankedSession> {
    let classroom_count = input.classrooms.len();
    let average_capacity = if classroom_count == 0 {
        1.0
    } else {
        input
            .classrooms
            .values()
            .map(|r| r.capacity as f64)
            .sum::<f64>()
            / classroom_count as f64
    };

    let mut ranked = Vec::new();

    for course in input.courses.values() {
        let demand_pressure = course.demand() as f64 / average_capacity.max(1.0);

        // A hardcoded placement stands in for one matching session, which
        // therefore never enters the queue
        let mut pinned: Vec<(SessionType, u8)> = course
            .hardcoded
            .iter()
            .map(|p| (p.kind, ((p.range.duration_minutes() / 60) as u8).max(1)))
            .collect();

        for (session_index, session) in course.sessions.iter().enumerate() {
            if let Some(slot) = pinned
                .iter()
                .position(|&(kind, hours)| kind == session.kind && hours == session.hours)
            {
                pinned.swap_remove(slot);
                continue;
            }
            let compatible = input
                .classrooms
                .values()
                .filter(|r| r.admits(session.kind) && evaluator.capacity_suffices(course, r))
                .count();
            let scarcity = if compatible == 0 {
                NO_COMPATIBLE_ROOM
            } else {
                1.0 / compatible as f64
            };

            let mut difficulty = demand_pressure + scarcity + HOURS_BONUS * session.hours as f64;
            if course.is_compulsory() {
                difficulty += COMPULSORY_BONUS;
            }

            ranked.push(RankedSession {
                course_id: course.id,
                session_index,
                kind: session.kind,
                hours: session.hours,
                difficulty,
            });
        }
    }

    sort_hardest_first(&mut ranked);
    ranked
}

/// Descending difficulty, then (course id, session index) for determinism
pub fn sort_hardest_first(sessions: &mut [RankedSession]) {
    sessions.sort_by(|a, b| {
        b.difficulty
            .total_cmp(&a.difficulty)
            .then_with(|| a.course_id.cmp(&b.course_id))
            .then_with(|| a.session_index.cmp(&b.session_index))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WeekGrid;
    use crate::types::*;

    fn course(id: u32, category: Category, students: u32, hours: u8) -> Course {
        Course {
            id: CourseId(id),
            code: format!("C{id}"),
            name: format!("Course {id}"),
            faculty: "Engineering".to_string(),
            level: 1,
            category,
            semester: Semester::Fall,
            active: true,
            teacher_id: None,
            sessions: vec![Session { kind: SessionType::Theoretical, hours }],
            offerings: vec![DepartmentOffering {
                department_id: DepartmentId(1),
                student_count: students,
            }],
            capacity_margin_percent: 0,
            hardcoded: vec![],
            weekly_hours: hours,
        }
    }

    fn classroom(id: u32, capacity: u32) -> Classroom {
        Classroom {
            id: ClassroomId(id),
            name: format!("R{id}"),
            capacity,
            kind: ClassroomType::Theoretical,
            priority_department: None,
            active: true,
            available_hours: WeeklyHours::new(),
        }
    }

    fn department() -> Department {
        Department {
            id: DepartmentId(1),
            name: "Computer Engineering".to_string(),
        }
    }

    #[test]
    fn test_high_demand_ranks_harder() {
        let input = SolverInput::freeze(
            vec![
                course(1, Category::Elective, 10, 1),
                course(2, Category::Elective, 90, 1),
            ],
            vec![classroom(1, 100), classroom(2, 100)],
            vec![],
            vec![department()],
            TimeSettings::default(),
        );
        let grid = WeekGrid::build(&input.settings).unwrap();
        let evaluator = ConstraintEvaluator::new(&grid, &input.settings, &input.teachers);

        let ranked = rank_sessions(&input, &evaluator);
        assert_eq!(ranked[0].course_id, CourseId(2));
    }

    #[test]
    fn test_compulsory_outranks_equal_elective() {
        let input = SolverInput::freeze(
            vec![
                course(1, Category::Elective, 30, 1),
                course(2, Category::Compulsory, 30, 1),
            ],
            vec![classroom(1, 100)],
            vec![],
            vec![department()],
            TimeSettings::default(),
        );
        let grid = WeekGrid::build(&input.settings).unwrap();
        let evaluator = ConstraintEvaluator::new(&grid, &input.settings, &input.teachers);

        let ranked = rank_sessions(&input, &evaluator);
        assert_eq!(ranked[0].course_id, CourseId(2));
    }

    #[test]
    fn test_longer_sessions_rank_harder() {
        let input = SolverInput::freeze(
            vec![
                course(1, Category::Elective, 30, 1),
                course(2, Category::Elective, 30, 3),
            ],
            vec![classroom(1, 100)],
            vec![],
            vec![department()],
            TimeSettings::default(),
        );
        let grid = WeekGrid::build(&input.settings).unwrap();
        let evaluator = ConstraintEvaluator::new(&grid, &input.settings, &input.teachers);

        let ranked = rank_sessions(&input, &evaluator);
        assert_eq!(ranked[0].course_id, CourseId(2));
    }

    #[test]
    fn test_hardcoded_placement_consumes_matching_session() {
        let mut c = course(1, Category::Compulsory, 30, 2);
        c.hardcoded = vec![HardcodedPlacement {
            kind: SessionType::Theoretical,
            day: Day::Friday,
            range: "15:00-17:00".parse().unwrap(),
            classroom_id: None,
        }];
        let input = SolverInput::freeze(
            vec![c],
            vec![classroom(1, 100)],
            vec![],
            vec![department()],
            TimeSettings::default(),
        );
        let grid = WeekGrid::build(&input.settings).unwrap();
        let evaluator = ConstraintEvaluator::new(&grid, &input.settings, &input.teachers);

        assert!(rank_sessions(&input, &evaluator).is_empty());
    }

    #[test]
    fn test_tie_break_is_total_and_deterministic() {
        let mut sessions = vec![
            RankedSession {
                course_id: CourseId(2),
                session_index: 0,
                kind: SessionType::Theoretical,
                hours: 1,
                difficulty: 1.0,
            },
            RankedSession {
                course_id: CourseId(1),
                session_index: 1,
                kind: SessionType::Theoretical,
                hours: 1,
                difficulty: 1.0,
            },
            RankedSession {
                course_id: CourseId(1),
                session_index: 0,
                kind: SessionType::Theoretical,
                hours: 1,
                difficulty: 1.0,
            },
        ];
        sort_hardest_first(&mut sessions);
        assert_eq!(
            sessions
                .iter()
                .map(|s| (s.course_id.0, s.session_index))
                .collect::<Vec<_>>(),
            vec![(1, 0), (1, 1), (2, 0)]
        );
    }
}
