use crate::parser::SolverInput;
use crate::solver::{GenerateOutcome, Warning};
use crate::types::Day;
use colored::Colorize;
use itertools::Itertools;

/// Generate a plain text report
pub fn generate_text_report(outcome: &GenerateOutcome, input: &SolverInput) -> String {
    let mut lines = Vec::new();

    lines.push("═".repeat(60));
    lines.push("               TIMETABLE REPORT".to_string());
    lines.push("═".repeat(60));
    lines.push(String::new());

    lines.push("─".repeat(40));
    lines.push("STATISTICS".to_string());
    lines.push("─".repeat(40));
    lines.push(format!("  Sessions:      {}", outcome.metrics.total_sessions));
    lines.push(format!("  Placed:        {}", outcome.metrics.placed_sessions));
    lines.push(format!("  Unplaced:      {}", outcome.metrics.unplaced_sessions));
    lines.push(format!("  Hardcoded:     {}", outcome.metrics.hardcoded_items));
    lines.push(format!("  Split runs:    {}", outcome.metrics.split_sessions));
    lines.push(format!(
        "  Optimizer:     {} moves, {} swaps over {} iterations",
        outcome.metrics.optimizer_moves,
        outcome.metrics.optimizer_swaps,
        outcome.metrics.optimizer_iterations
    ));
    lines.push(format!("  Solve Time:    {}ms", outcome.processing_time_ms));
    lines.push(String::new());

    for day in Day::ALL {
        let todays: Vec<_> = outcome
            .schedules
            .iter()
            .filter(|item| item.day == day)
            .sorted_by_key(|item| (item.time_range, item.classroom_id))
            .collect();
        if todays.is_empty() {
            continue;
        }

        lines.push(format!("{}", day));
        for item in todays {
            let course = input
                .courses
                .get(&item.course_id)
                .map(|c| c.code.as_str())
                .unwrap_or("?");
            let classroom = input
                .classrooms
                .get(&item.classroom_id)
                .map(|r| r.name.as_str())
                .unwrap_or("?");
            let marker = if item.is_hardcoded { " [fixed]" } else { "" };
            lines.push(format!(
                "  {}  {:<10} {}{}",
                item.time_range, course, classroom, marker
            ));
        }
        lines.push(String::new());
    }

    if !outcome.diagnostics.is_empty() {
        lines.push("─".repeat(40));
        lines.push("UNPLACED SESSIONS".to_string());
        lines.push("─".repeat(40));
        for diagnostic in &outcome.diagnostics {
            lines.push(format!("  - {}", diagnostic.message));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Print the colored terminal summary after a run
pub fn print_summary(outcome: &GenerateOutcome) {
    println!();
    if outcome.success {
        println!("{}", "✓ Full schedule generated".green().bold());
    } else {
        println!("{}", "✗ Schedule generated with findings".yellow().bold());
    }

    println!(
        "  {} items placed ({} hardcoded), {} sessions unplaced",
        outcome.schedules.len(),
        outcome.metrics.hardcoded_items,
        outcome.metrics.unplaced_sessions
    );
    println!("  {}ms solve time", outcome.processing_time_ms);

    for warning in &outcome.warnings {
        let text = match warning {
            Warning::Timeout { elapsed_ms } => {
                format!("Timed out after {}ms; results are partial", elapsed_ms)
            }
            Warning::Cancelled { elapsed_ms } => {
                format!("Cancelled after {}ms; results are partial", elapsed_ms)
            }
        };
        println!("  {} {}", "Warning:".yellow(), text);
    }

    for diagnostic in &outcome.diagnostics {
        println!("  {} {}", "Unplaced:".red(), diagnostic.message);
    }
}
