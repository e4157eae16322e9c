use crate::parser::SolverInput;
use crate::solver::GenerateOutcome;
use crate::types::{ClassroomId, Day};
use itertools::Itertools;

/// Generate a markdown report with one weekly table per classroom
pub fn generate_markdown_report(outcome: &GenerateOutcome, input: &SolverInput) -> String {
    let mut lines = Vec::new();

    lines.push("# Weekly Timetable".to_string());
    lines.push(String::new());
    lines.push(format!(
        "{} items placed, {} sessions unplaced, solved in {}ms.",
        outcome.schedules.len(),
        outcome.metrics.unplaced_sessions,
        outcome.processing_time_ms
    ));
    lines.push(String::new());

    let used_classrooms: Vec<ClassroomId> = outcome
        .schedules
        .iter()
        .map(|item| item.classroom_id)
        .sorted()
        .dedup()
        .collect();

    for classroom_id in used_classrooms {
        let name = input
            .classrooms
            .get(&classroom_id)
            .map(|r| r.name.as_str())
            .unwrap_or("Unknown classroom");
        lines.push(format!("## {}", name));
        lines.push(String::new());
        lines.push("| Day | Time | Course | Kind |".to_string());
        lines.push("|-----|------|--------|------|".to_string());

        let rows = outcome
            .schedules
            .iter()
            .filter(|item| item.classroom_id == classroom_id)
            .sorted_by_key(|item| (item.day, item.time_range));

        for item in rows {
            let code = input
                .courses
                .get(&item.course_id)
                .map(|c| c.code.as_str())
                .unwrap_or("?");
            let kind = if item.is_hardcoded {
                "fixed"
            } else {
                match item.session_type {
                    crate::types::SessionType::Theoretical => "theoretical",
                    crate::types::SessionType::Lab => "lab",
                }
            };
            lines.push(format!(
                "| {} | {} | {} | {} |",
                item.day, item.time_range, code, kind
            ));
        }
        lines.push(String::new());
    }

    if !outcome.diagnostics.is_empty() {
        lines.push("## Unplaced sessions".to_string());
        lines.push(String::new());
        for diagnostic in &outcome.diagnostics {
            lines.push(format!("- {}", diagnostic.message));
        }
        lines.push(String::new());
    }

    // The rendered grid keeps lunch rows visible even though nothing can be
    // placed there
    lines.push("## Grid".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Week of {} to {}, {}-minute slots, lunch excluded from placement.",
        Day::ALL.first().unwrap(),
        Day::ALL.last().unwrap(),
        input.settings.slot_duration
    ));
    lines.push(String::new());

    lines.join("\n")
}
