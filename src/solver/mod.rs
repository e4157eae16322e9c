mod conflict_index;
mod constraints;
mod difficulty;
mod optimizer;
mod placement;

pub use conflict_index::*;
pub use constraints::*;
pub use difficulty::*;
pub use optimizer::*;
pub use placement::*;

use crate::error::SolverError;
use crate::grid::WeekGrid;
use crate::parser::{ensure_consistent, SolverInput};
use crate::types::{CourseId, ScheduleItem};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tuning preset for a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Fast,
    Default,
    Quality,
}

/// Options for the generate operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    pub preset: Preset,
    pub max_iterations: u32,
    pub timeout_ms: u64,
    pub optimization_enabled: bool,
}

impl GenerateOptions {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                preset,
                max_iterations: 50,
                timeout_ms: 10_000,
                optimization_enabled: false,
            },
            Preset::Default => Self {
                preset,
                max_iterations: 250,
                timeout_ms: 60_000,
                optimization_enabled: true,
            },
            Preset::Quality => Self {
                preset,
                max_iterations: 1_000,
                timeout_ms: 300_000,
                optimization_enabled: true,
            },
        }
    }

    /// Reject out-of-range options before any work happens
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(10..=1_000).contains(&self.max_iterations) {
            return Err(SolverError::InvalidOptions(format!(
                "maxIterations {} is outside 10-1000",
                self.max_iterations
            )));
        }
        if !(5_000..=300_000).contains(&self.timeout_ms) {
            return Err(SolverError::InvalidOptions(format!(
                "timeoutMs {} is outside 5000-300000",
                self.timeout_ms
            )));
        }
        Ok(())
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::preset(Preset::Default)
    }
}

/// What stopped the run early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Timeout,
    Cancelled,
}

/// Deadline and cancellation checks, consulted between units of work
#[derive(Debug, Clone)]
pub struct SolveControl {
    started: Instant,
    deadline: Option<Instant>,
    cancel: Arc<AtomicBool>,
}

impl SolveControl {
    pub fn with_timeout(timeout: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: Some(started + timeout),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            started: Instant::now(),
            deadline: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag another owner can set to stop the run
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn halted(&self) -> Option<Halt> {
        if self.cancel.load(Ordering::Relaxed) {
            return Some(Halt::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(Halt::Timeout);
            }
        }
        None
    }
}

/// Generation stage for progress streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Loading,
    Seeding,
    Placing,
    Optimizing,
    Complete,
    Error,
}

/// One progress frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub stage: Stage,
    /// Percentage in [0, 100]
    pub progress: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_count: Option<usize>,
}

/// Receives progress frames during a long-running generation
pub trait ProgressSink {
    fn report(&self, event: ProgressEvent);

    fn report_stage(
        &self,
        stage: Stage,
        progress: u8,
        message: &str,
        scheduled_count: Option<usize>,
    ) {
        self.report(ProgressEvent {
            stage,
            progress: progress.min(100),
            message: message.to_string(),
            scheduled_count,
        });
    }
}

/// Drops every frame; the library default
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _event: ProgressEvent) {}
}

/// Non-fatal run outcomes carried next to the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    Timeout { elapsed_ms: u64 },
    Cancelled { elapsed_ms: u64 },
}

impl Warning {
    fn from_halt(halt: Halt, elapsed_ms: u64) -> Self {
        match halt {
            Halt::Timeout => Warning::Timeout { elapsed_ms },
            Halt::Cancelled => Warning::Cancelled { elapsed_ms },
        }
    }
}

/// Counters describing the finished run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveMetrics {
    pub total_sessions: usize,
    pub placed_sessions: usize,
    pub unplaced_sessions: usize,
    pub hardcoded_items: usize,
    pub split_sessions: usize,
    pub candidate_evaluations: u64,
    pub index_entries: usize,
    pub optimizer_iterations: u32,
    pub optimizer_moves: u32,
    pub optimizer_swaps: u32,
}

/// A conflict-kind placement failure, surfaced separately from the full
/// diagnostics list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub course_id: CourseId,
    pub session_index: usize,
    pub cause: UnplacedCause,
}

/// Everything the generate operation returns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    pub success: bool,
    pub schedules: Vec<ScheduleItem>,
    pub metrics: SolveMetrics,
    pub conflicts: Vec<ConflictReport>,
    pub unscheduled_courses: Vec<CourseId>,
    pub warnings: Vec<Warning>,
    pub processing_time_ms: u64,
    pub diagnostics: Vec<SessionDiagnostic>,
}

/// Run one full generation over a frozen input snapshot.
///
/// The run owns its conflict index and in-progress schedule exclusively;
/// the caller persists the outcome, the core never does.
pub fn generate(
    input: &SolverInput,
    options: &GenerateOptions,
    control: &SolveControl,
    sink: &dyn ProgressSink,
) -> Result<GenerateOutcome, SolverError> {
    options.validate()?;

    let result = generate_inner(input, options, control, sink);
    if let Err(error) = &result {
        sink.report_stage(Stage::Error, 100, &error.to_string(), None);
    }
    result
}

fn generate_inner(
    input: &SolverInput,
    options: &GenerateOptions,
    control: &SolveControl,
    sink: &dyn ProgressSink,
) -> Result<GenerateOutcome, SolverError> {
    let started = Instant::now();

    sink.report_stage(Stage::Loading, 5, "Deriving time grid", None);
    let grid = WeekGrid::build(&input.settings)?;
    ensure_consistent(input, &grid)?;

    let evaluator = ConstraintEvaluator::new(&grid, &input.settings, &input.teachers);
    let mut index = ConflictIndex::new(grid.slot_minutes());
    let mut stats = EngineStats::default();
    let mut diagnostics = Vec::new();
    let mut warnings = Vec::new();

    sink.report_stage(Stage::Seeding, 10, "Seeding hardcoded placements", None);
    let mut items = seed_hardcoded(input, &grid, &evaluator, &mut index, &mut stats)?;
    let hardcoded_items = items.len();
    sink.report_stage(
        Stage::Seeding,
        15,
        "Hardcoded placements seeded",
        Some(items.len()),
    );

    let ranked = rank_sessions(input, &evaluator);
    let total_sessions = ranked.len() + hardcoded_items;

    let halt = run_placement(
        input,
        &grid,
        &evaluator,
        &mut index,
        &mut items,
        ranked,
        control,
        sink,
        &mut diagnostics,
        &mut stats,
    );
    if let Some(halt) = halt {
        warnings.push(Warning::from_halt(halt, control.elapsed().as_millis() as u64));
    }

    let mut optimizer_stats = OptimizerStats::default();
    if options.optimization_enabled && halt.is_none() {
        sink.report_stage(Stage::Optimizing, 85, "Improving placements", Some(items.len()));
        let (opt_stats, opt_halt) = optimize(
            &mut items,
            input,
            &grid,
            &evaluator,
            &mut index,
            options.max_iterations,
            control,
            &mut stats,
        );
        optimizer_stats = opt_stats;
        if let Some(halt) = opt_halt {
            warnings.push(Warning::from_halt(halt, control.elapsed().as_millis() as u64));
        }
    }

    let conflicts: Vec<ConflictReport> = diagnostics
        .iter()
        .filter(|d| d.cause.is_conflict())
        .map(|d| ConflictReport {
            course_id: d.course_id,
            session_index: d.session_index,
            cause: d.cause,
        })
        .collect();

    let mut unscheduled_courses: Vec<CourseId> =
        diagnostics.iter().map(|d| d.course_id).collect();
    unscheduled_courses.sort();
    unscheduled_courses.dedup();

    let metrics = SolveMetrics {
        total_sessions,
        placed_sessions: stats.placed_sessions + hardcoded_items,
        unplaced_sessions: diagnostics.len(),
        hardcoded_items,
        split_sessions: stats.split_sessions,
        candidate_evaluations: stats.candidate_evaluations,
        index_entries: index.occupancy_size(),
        optimizer_iterations: optimizer_stats.iterations,
        optimizer_moves: optimizer_stats.moves,
        optimizer_swaps: optimizer_stats.swaps,
    };

    let success = diagnostics.is_empty() && warnings.is_empty();
    sink.report_stage(
        Stage::Complete,
        100,
        if success {
            "Schedule generated"
        } else {
            "Schedule generated with findings"
        },
        Some(items.len()),
    );

    Ok(GenerateOutcome {
        success,
        schedules: items,
        metrics,
        conflicts,
        unscheduled_courses,
        warnings,
        processing_time_ms: started.elapsed().as_millis() as u64,
        diagnostics,
    })
}
