use crate::grid::WeekGrid;
use crate::parser::SolverInput;
use crate::solver::{ConflictIndex, ConstraintEvaluator};
use crate::types::ScheduleItem;

/// A broken invariant found in an existing schedule
#[derive(Debug, Clone)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
}

/// Re-check a persisted schedule against the snapshot and grid.
///
/// Replays every item through the conflict index and the feasibility
/// predicates; hardcoded items only need to be collision-free.
pub fn verify_schedule(
    items: &[ScheduleItem],
    input: &SolverInput,
    grid: &WeekGrid,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let evaluator = ConstraintEvaluator::new(grid, &input.settings, &input.teachers);
    let mut index = ConflictIndex::new(grid.slot_minutes());

    for item in items {
        let Some(course) = input.courses.get(&item.course_id) else {
            violations.push(Violation {
                constraint: "KnownCourse".to_string(),
                message: format!("item references unknown course {}", item.course_id),
            });
            continue;
        };
        let Some(classroom) = input.classrooms.get(&item.classroom_id) else {
            violations.push(Violation {
                constraint: "KnownClassroom".to_string(),
                message: format!("item references unknown classroom {}", item.classroom_id),
            });
            continue;
        };

        if item.is_hardcoded {
            // Immovable items only need to be collision-free
            if let Some(conflict) =
                index.check_placement(course, classroom, item.day, item.time_range)
            {
                violations.push(Violation {
                    constraint: format!("NoConflict/{:?}", conflict.kind),
                    message: conflict.explanation,
                });
            }
        } else {
            if let Err(rejection) = evaluator.evaluate(
                course,
                item.session_type,
                classroom,
                item.day,
                item.time_range,
                &mut index,
            ) {
                violations.push(Violation {
                    constraint: "Feasibility".to_string(),
                    message: format!(
                        "course {} at {} {} in classroom {} fails: {}",
                        course.code,
                        item.day,
                        item.time_range,
                        classroom.name,
                        rejection.label()
                    ),
                });
            }
        }

        index.add(item, course);
    }

    violations
}
