use crate::grid::WeekGrid;
use crate::parser::SolverInput;
use crate::types::ScheduleItem;
use super::conflict_index::ConflictIndex;
use super::constraints::ConstraintEvaluator;
use super::placement::{candidate_cost, find_best_candidate, EngineStats, RejectionTally};
use super::{Halt, SolveControl};

/// Counters for the improvement phase
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimizerStats {
    pub iterations: u32,
    pub moves: u32,
    pub swaps: u32,
}

/// Cost of an item at its current placement
fn current_cost(
    item: &ScheduleItem,
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
) -> u64 {
    let course = &input.courses[&item.course_id];
    let classroom = &input.classrooms[&item.classroom_id];
    let acceptance = evaluator.soft_attributes(course, classroom);
    let slot_index = grid.slot_index(item.time_range.start()).unwrap_or(0);
    candidate_cost(&acceptance, classroom, item.day, slot_index)
}

/// Post-placement local improvement over the non-hardcoded items.
///
/// Each iteration runs a move sweep then a swap sweep; the loop stops after
/// a full iteration without improvement, on the iteration budget, or when
/// the deadline/cancellation fires. Every change keeps the index consistent
/// via paired remove/add operations.
pub(crate) fn optimize(
    items: &mut [ScheduleItem],
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    max_iterations: u32,
    control: &SolveControl,
    stats: &mut EngineStats,
) -> (OptimizerStats, Option<Halt>) {
    let mut optimizer_stats = OptimizerStats::default();

    for _ in 0..max_iterations {
        if let Some(halt) = control.halted() {
            return (optimizer_stats, Some(halt));
        }
        optimizer_stats.iterations += 1;

        let moved = move_sweep(items, input, grid, evaluator, index, stats, &mut optimizer_stats);
        let swapped = swap_sweep(items, input, grid, evaluator, index, &mut optimizer_stats);

        if !moved && !swapped {
            break;
        }
    }

    (optimizer_stats, None)
}

/// Try to relocate each item to a cheaper free window
fn move_sweep(
    items: &mut [ScheduleItem],
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    stats: &mut EngineStats,
    optimizer_stats: &mut OptimizerStats,
) -> bool {
    let mut improved = false;

    for position in 0..items.len() {
        if items[position].is_hardcoded {
            continue;
        }

        let item = items[position].clone();
        let course = &input.courses[&item.course_id];
        let cost_before = current_cost(&item, input, grid, evaluator);
        let width = grid.slot_width(item.time_range);

        // The item must vacate the index before its alternatives are scored,
        // or every overlapping window would read as a self-conflict.
        index.remove(&item, course);

        let mut tally = RejectionTally::default();
        let best = find_best_candidate(
            course,
            item.session_type,
            width,
            input,
            grid,
            evaluator,
            index,
            &mut tally,
            stats,
        );

        match best {
            Some(candidate) if candidate.cost < cost_before => {
                let updated = ScheduleItem {
                    day: candidate.day,
                    time_range: candidate.range,
                    classroom_id: candidate.classroom_id,
                    ..item
                };
                index.add(&updated, course);
                items[position] = updated;
                optimizer_stats.moves += 1;
                improved = true;
            }
            _ => {
                // Nothing better; restore the prior state
                index.add(&item, course);
            }
        }
    }

    improved
}

/// Try to exchange the (day, range, classroom) tuples of item pairs
fn swap_sweep(
    items: &mut [ScheduleItem],
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    optimizer_stats: &mut OptimizerStats,
) -> bool {
    let mut improved = false;

    for i in 0..items.len() {
        if items[i].is_hardcoded {
            continue;
        }
        for j in (i + 1)..items.len() {
            if items[j].is_hardcoded {
                continue;
            }
            if items[i].time_range.duration_minutes() != items[j].time_range.duration_minutes() {
                continue;
            }
            if try_swap(items, i, j, input, grid, evaluator, index) {
                optimizer_stats.swaps += 1;
                improved = true;
            }
        }
    }

    improved
}

fn try_swap(
    items: &mut [ScheduleItem],
    i: usize,
    j: usize,
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
) -> bool {
    let a = items[i].clone();
    let b = items[j].clone();
    let course_a = &input.courses[&a.course_id];
    let course_b = &input.courses[&b.course_id];
    let classroom_a = &input.classrooms[&a.classroom_id];
    let classroom_b = &input.classrooms[&b.classroom_id];

    let cost_before = current_cost(&a, input, grid, evaluator)
        + current_cost(&b, input, grid, evaluator);

    index.remove(&a, course_a);
    index.remove(&b, course_b);

    let eval_a = evaluator.evaluate(course_a, a.session_type, classroom_b, b.day, b.time_range, index);
    let eval_b = evaluator.evaluate(course_b, b.session_type, classroom_a, a.day, a.time_range, index);

    let (acc_a, acc_b) = match (eval_a, eval_b) {
        (Ok(acc_a), Ok(acc_b)) => (acc_a, acc_b),
        _ => {
            index.add(&a, course_a);
            index.add(&b, course_b);
            return false;
        }
    };

    let slot_a = grid.slot_index(b.time_range.start()).unwrap_or(0);
    let slot_b = grid.slot_index(a.time_range.start()).unwrap_or(0);
    let cost_after = candidate_cost(&acc_a, classroom_b, b.day, slot_a)
        + candidate_cost(&acc_b, classroom_a, a.day, slot_b);

    if cost_after >= cost_before {
        index.add(&a, course_a);
        index.add(&b, course_b);
        return false;
    }

    let new_a = ScheduleItem {
        day: b.day,
        time_range: b.time_range,
        classroom_id: b.classroom_id,
        ..a.clone()
    };
    let new_b = ScheduleItem {
        day: a.day,
        time_range: a.time_range,
        classroom_id: a.classroom_id,
        ..b.clone()
    };

    index.add(&new_a, course_a);

    // The pair must land atomically: if the second add would collide after
    // the first one is in, undo everything via the opposite operations.
    if index
        .check_placement(course_b, classroom_a, new_b.day, new_b.time_range)
        .is_some()
    {
        index.remove(&new_a, course_a);
        index.add(&a, course_a);
        index.add(&b, course_b);
        return false;
    }

    index.add(&new_b, course_b);
    items[i] = new_a;
    items[j] = new_b;
    true
}
