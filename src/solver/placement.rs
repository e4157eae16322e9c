use crate::error::{PlacementRef, SolverError};
use crate::grid::WeekGrid;
use crate::parser::SolverInput;
use crate::types::{
    Classroom, ClassroomId, ClassroomType, Course, CourseId, Day, ScheduleItem, SessionType,
    TimeRange,
};
use super::conflict_index::ConflictIndex;
use super::constraints::{Acceptance, ConstraintEvaluator, Rejection};
use super::difficulty::{sort_hardest_first, RankedSession};
use super::{Halt, ProgressSink, SolveControl, Stage};
use serde::Serialize;
use std::collections::HashMap;

/// Difficulty penalty applied to a session once it has to be split
const SPLIT_PENALTY: f64 = 0.5;

/// Why a session ended up without a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnplacedCause {
    TeacherUnavailable,
    ClassroomUnavailable,
    CapacityShortage,
    TeacherConflict,
    ClassroomConflict,
    CohortConflict,
    OutsideGrid,
    TypeIncompatible,
    NoCandidateWindow,
    Halted,
}

impl From<Rejection> for UnplacedCause {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::TeacherUnavailable => UnplacedCause::TeacherUnavailable,
            Rejection::ClassroomUnavailable => UnplacedCause::ClassroomUnavailable,
            Rejection::CapacityShortage => UnplacedCause::CapacityShortage,
            Rejection::TeacherConflict => UnplacedCause::TeacherConflict,
            Rejection::ClassroomConflict => UnplacedCause::ClassroomConflict,
            Rejection::CohortConflict => UnplacedCause::CohortConflict,
            Rejection::OutsideGrid => UnplacedCause::OutsideGrid,
            Rejection::TypeIncompatible => UnplacedCause::TypeIncompatible,
        }
    }
}

impl UnplacedCause {
    pub fn is_conflict(self) -> bool {
        matches!(
            self,
            UnplacedCause::TeacherConflict
                | UnplacedCause::ClassroomConflict
                | UnplacedCause::CohortConflict
        )
    }
}

/// Per-session report for a session the engine could not place
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDiagnostic {
    pub course_id: CourseId,
    pub course_code: String,
    pub session_index: usize,
    pub session_type: SessionType,
    pub hours: u8,
    pub cause: UnplacedCause,
    pub attempts: u64,
    pub message: String,
}

/// Rejection counts across all attempts for one session
#[derive(Debug, Default)]
pub struct RejectionTally {
    counts: HashMap<Rejection, u64>,
    total: u64,
}

impl RejectionTally {
    pub fn record(&mut self, rejection: Rejection) {
        *self.counts.entry(rejection).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Most frequent rejection; ties break on predicate order
    pub fn most_common(&self) -> Option<Rejection> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(rejection, _)| *rejection)
    }
}

/// Counters the engine feeds into the outcome metrics
#[derive(Debug, Default)]
pub struct EngineStats {
    pub candidate_evaluations: u64,
    pub placed_sessions: usize,
    pub split_sessions: usize,
}

/// The winning candidate for one contiguous run
#[derive(Debug, Clone, Copy)]
pub(crate) struct BestCandidate {
    pub day: Day,
    pub range: TimeRange,
    pub classroom_id: ClassroomId,
    pub cost: u64,
}

/// Candidate ordering folded into one integer, smaller is better.
///
/// Band layout, most significant first: priority mismatch, spare capacity
/// (tightness), hybrid fallback for a type-exact session, then day and slot
/// for earliness. Bands are wide enough that no component can spill into the
/// one above it.
pub(crate) fn candidate_cost(
    acceptance: &Acceptance,
    classroom: &Classroom,
    day: Day,
    slot_index: usize,
) -> u64 {
    let priority = acceptance.priority_penalty as u64;
    let hybrid_fallback = (classroom.kind == ClassroomType::Hybrid) as u64;
    let excess = acceptance.excess_capacity.min(999_999_999);
    priority * 10_000_000_000_000_000
        + excess * 1_000_000
        + hybrid_fallback * 10_000
        + (day.index() as u64) * 1_000
        + slot_index as u64
}

/// Slot width of a run of `hours` on this grid
pub(crate) fn run_width_slots(grid: &WeekGrid, hours: u8) -> usize {
    (hours as usize * 60) / grid.slot_minutes() as usize
}

pub(crate) fn make_item(
    course: &Course,
    kind: SessionType,
    day: Day,
    range: TimeRange,
    classroom_id: ClassroomId,
    is_hardcoded: bool,
) -> ScheduleItem {
    ScheduleItem {
        day,
        time_range: range,
        course_id: course.id,
        classroom_id,
        session_type: kind,
        session_hours: ((range.duration_minutes() / 60) as u8).max(1),
        is_hardcoded,
    }
}

/// Enumerate every candidate window and classroom for one contiguous run and
/// keep the cheapest accepted candidate. Rejections land in the tally.
pub(crate) fn find_best_candidate(
    course: &Course,
    kind: SessionType,
    width_slots: usize,
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    tally: &mut RejectionTally,
    stats: &mut EngineStats,
) -> Option<BestCandidate> {
    if width_slots == 0 || width_slots > grid.slots_per_day() {
        return None;
    }

    let mut best: Option<BestCandidate> = None;

    for day in Day::ALL {
        let day_blocks = grid.blocks_for_day(day);
        for start_index in 0..=day_blocks.len() - width_slots {
            let window = &day_blocks[start_index..start_index + width_slots];
            if window.iter().any(|b| b.lunch) {
                continue;
            }
            let range = TimeRange::new(window[0].start, window[width_slots - 1].end).unwrap();

            for classroom in input.classrooms.values() {
                stats.candidate_evaluations += 1;
                match evaluator.evaluate(course, kind, classroom, day, range, index) {
                    Err(rejection) => tally.record(rejection),
                    Ok(acceptance) => {
                        let cost = candidate_cost(&acceptance, classroom, day, start_index);
                        let replace = match &best {
                            None => true,
                            Some(current) => cost < current.cost,
                        };
                        if replace {
                            best = Some(BestCandidate {
                                day,
                                range,
                                classroom_id: classroom.id,
                                cost,
                            });
                        }
                    }
                }
            }
        }
    }

    best
}

fn cohorts_intersect(a: &Course, b: &Course) -> bool {
    if !a.is_compulsory() || !b.is_compulsory() {
        return false;
    }
    if a.semester != b.semester || a.level != b.level {
        return false;
    }
    a.offerings.iter().any(|oa| {
        b.offerings
            .iter()
            .any(|ob| oa.department_id == ob.department_id)
    })
}

fn hardcoded_collision<'a>(
    items: &'a [ScheduleItem],
    input: &SolverInput,
    candidate: &ScheduleItem,
    course: &Course,
) -> Option<&'a ScheduleItem> {
    items.iter().find(|prior| {
        if !prior.occupies(candidate.day, candidate.time_range) {
            return false;
        }
        if prior.classroom_id == candidate.classroom_id {
            return true;
        }
        let Some(prior_course) = input.courses.get(&prior.course_id) else {
            return false;
        };
        let same_teacher = match (prior_course.teacher_id, course.teacher_id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        same_teacher || cohorts_intersect(prior_course, course)
    })
}

/// Stage 1: materialize hardcoded placements and index them.
///
/// A placement without a stated classroom gets the best acceptable one at
/// seed time. Any collision among the seeded items aborts generation.
pub(crate) fn seed_hardcoded(
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    stats: &mut EngineStats,
) -> Result<Vec<ScheduleItem>, SolverError> {
    let mut items: Vec<ScheduleItem> = Vec::new();

    for course in input.courses.values() {
        for placement in &course.hardcoded {
            let reference = PlacementRef {
                course_id: course.id,
                day: placement.day,
                range: placement.range,
            };

            let classroom_id = match placement.classroom_id {
                Some(id) => id,
                None => pick_hardcoded_classroom(
                    course,
                    placement.kind,
                    placement.day,
                    placement.range,
                    input,
                    grid,
                    evaluator,
                    index,
                    stats,
                )
                .ok_or_else(|| SolverError::HardcodedUnplaceable {
                    placement: reference.clone(),
                    reason: "no acceptable classroom for the fixed window".to_string(),
                })?,
            };

            let item = make_item(
                course,
                placement.kind,
                placement.day,
                placement.range,
                classroom_id,
                true,
            );

            if let Some(prior) = hardcoded_collision(&items, input, &item, course) {
                return Err(SolverError::HardcodedConflict {
                    first: PlacementRef {
                        course_id: prior.course_id,
                        day: prior.day,
                        range: prior.time_range,
                    },
                    second: reference,
                });
            }

            index.add(&item, course);
            items.push(item);
        }
    }

    Ok(items)
}

#[allow(clippy::too_many_arguments)]
fn pick_hardcoded_classroom(
    course: &Course,
    kind: SessionType,
    day: Day,
    range: TimeRange,
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    stats: &mut EngineStats,
) -> Option<ClassroomId> {
    let mut best: Option<(u64, ClassroomId)> = None;
    let slot_index = grid.slot_index(range.start()).unwrap_or(0);

    for classroom in input.classrooms.values() {
        stats.candidate_evaluations += 1;
        if let Ok(acceptance) = evaluator.evaluate(course, kind, classroom, day, range, index) {
            let cost = candidate_cost(&acceptance, classroom, day, slot_index);
            if best.map_or(true, |(current, _)| cost < current) {
                best = Some((cost, classroom.id));
            }
        }
    }

    best.map(|(_, id)| id)
}

/// Stages 2-6: greedy placement in descending difficulty order, with a split
/// fallback pass and deadline/cancellation checks between sessions.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_placement(
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    items: &mut Vec<ScheduleItem>,
    ranked: Vec<RankedSession>,
    control: &SolveControl,
    sink: &dyn ProgressSink,
    diagnostics: &mut Vec<SessionDiagnostic>,
    stats: &mut EngineStats,
) -> Option<Halt> {
    let total = ranked.len().max(1);
    let mut retries: Vec<(RankedSession, RejectionTally)> = Vec::new();

    // First pass: whole contiguous runs only
    for (processed, session) in ranked.iter().enumerate() {
        if let Some(halt) = control.halted() {
            for pending in &ranked[processed..] {
                record_halted(pending, input, diagnostics);
            }
            for (session, tally) in retries {
                emit_unplaced(&session, input, tally, diagnostics);
            }
            return Some(halt);
        }

        let course = &input.courses[&session.course_id];
        let mut tally = RejectionTally::default();
        let width = run_width_slots(grid, session.hours);

        match find_best_candidate(
            course, session.kind, width, input, grid, evaluator, index, &mut tally, stats,
        ) {
            Some(best) => {
                let item = make_item(course, session.kind, best.day, best.range, best.classroom_id, false);
                index.add(&item, course);
                items.push(item);
                stats.placed_sessions += 1;
            }
            None => retries.push((*session, tally)),
        }

        sink.report_stage(
            Stage::Placing,
            (20 + (processed + 1) * 60 / total) as u8,
            "Placing sessions",
            Some(items.len()),
        );
    }

    // Split fallback pass: the whole run failed, so allow two contiguous
    // runs. The attempted split lowers the session's rank.
    let mut split_queue: Vec<RankedSession> = retries
        .iter()
        .map(|(session, _)| RankedSession {
            difficulty: session.difficulty - SPLIT_PENALTY,
            ..*session
        })
        .collect();
    sort_hardest_first(&mut split_queue);
    let mut tallies: HashMap<(CourseId, usize), RejectionTally> = retries
        .into_iter()
        .map(|(session, tally)| ((session.course_id, session.session_index), tally))
        .collect();

    let mut halted = None;
    for session in split_queue {
        let tally = tallies
            .remove(&(session.course_id, session.session_index))
            .unwrap_or_default();

        if halted.is_none() {
            halted = control.halted();
        }
        if halted.is_some() {
            emit_unplaced(&session, input, tally, diagnostics);
            continue;
        }

        let course = &input.courses[&session.course_id];
        if let Some(tally) =
            place_with_split(input, grid, evaluator, index, items, &session, course, tally, stats)
        {
            emit_unplaced(&session, input, tally, diagnostics);
        }
    }

    halted
}

/// Record the diagnostic for a session that stayed unplaced
fn emit_unplaced(
    session: &RankedSession,
    input: &SolverInput,
    tally: RejectionTally,
    diagnostics: &mut Vec<SessionDiagnostic>,
) {
    let code = input
        .courses
        .get(&session.course_id)
        .map(|c| c.code.clone())
        .unwrap_or_default();
    let cause = tally
        .most_common()
        .map(UnplacedCause::from)
        .unwrap_or(UnplacedCause::NoCandidateWindow);
    diagnostics.push(SessionDiagnostic {
        course_id: session.course_id,
        course_code: code.clone(),
        session_index: session.session_index,
        session_type: session.kind,
        hours: session.hours,
        cause,
        attempts: tally.total(),
        message: format!(
            "session {} ({}h) of course {} could not be placed: {}",
            session.session_index,
            session.hours,
            code,
            cause_label(cause)
        ),
    });
}

/// Retry the whole run, then every two-run split. Returns the accumulated
/// tally when the session stays unplaced.
#[allow(clippy::too_many_arguments)]
fn place_with_split(
    input: &SolverInput,
    grid: &WeekGrid,
    evaluator: &ConstraintEvaluator,
    index: &mut ConflictIndex,
    items: &mut Vec<ScheduleItem>,
    session: &RankedSession,
    course: &Course,
    mut tally: RejectionTally,
    stats: &mut EngineStats,
) -> Option<RejectionTally> {
    // Earlier placements may have freed a whole-run window in the meantime
    let width = run_width_slots(grid, session.hours);
    if let Some(best) = find_best_candidate(
        course, session.kind, width, input, grid, evaluator, index, &mut tally, stats,
    ) {
        let item = make_item(course, session.kind, best.day, best.range, best.classroom_id, false);
        index.add(&item, course);
        items.push(item);
        stats.placed_sessions += 1;
        return None;
    }

    for first_hours in (1..session.hours).rev() {
        let second_hours = session.hours - first_hours;
        let first_width = run_width_slots(grid, first_hours);
        let second_width = run_width_slots(grid, second_hours);

        let Some(first) = find_best_candidate(
            course, session.kind, first_width, input, grid, evaluator, index, &mut tally, stats,
        ) else {
            continue;
        };

        let first_item = make_item(course, session.kind, first.day, first.range, first.classroom_id, false);
        index.add(&first_item, course);
        items.push(first_item);

        if let Some(second) = find_best_candidate(
            course, session.kind, second_width, input, grid, evaluator, index, &mut tally, stats,
        ) {
            let second_item =
                make_item(course, session.kind, second.day, second.range, second.classroom_id, false);
            index.add(&second_item, course);
            items.push(second_item);
            stats.placed_sessions += 1;
            stats.split_sessions += 1;
            return None;
        }

        // Second run found nowhere to go; undo the first run
        let first_item = items.pop().unwrap();
        index.remove(&first_item, course);
    }

    Some(tally)
}

fn record_halted(session: &RankedSession, input: &SolverInput, diagnostics: &mut Vec<SessionDiagnostic>) {
    let code = input
        .courses
        .get(&session.course_id)
        .map(|c| c.code.clone())
        .unwrap_or_default();
    diagnostics.push(SessionDiagnostic {
        course_id: session.course_id,
        course_code: code.clone(),
        session_index: session.session_index,
        session_type: session.kind,
        hours: session.hours,
        cause: UnplacedCause::Halted,
        attempts: 0,
        message: format!(
            "session {} of course {} was not attempted before the run stopped",
            session.session_index, code
        ),
    });
}

fn cause_label(cause: UnplacedCause) -> &'static str {
    match cause {
        UnplacedCause::TeacherUnavailable => "teacher unavailable",
        UnplacedCause::ClassroomUnavailable => "classroom unavailable",
        UnplacedCause::CapacityShortage => "capacity shortage",
        UnplacedCause::TeacherConflict => "teacher conflict",
        UnplacedCause::ClassroomConflict => "classroom conflict",
        UnplacedCause::CohortConflict => "cohort conflict",
        UnplacedCause::OutsideGrid => "no window on the time grid",
        UnplacedCause::TypeIncompatible => "no type-compatible classroom",
        UnplacedCause::NoCandidateWindow => "no candidate window",
        UnplacedCause::Halted => "generation halted",
    }
}
