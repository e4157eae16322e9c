//! Course Timetabler - Constraint-based university course timetable solver
//!
//! This library assigns the weekly sessions of active courses to
//! (day, time-range, classroom) triples over a settings-derived time grid,
//! subject to teacher, classroom, and cohort constraints.
//!
//! # Algorithm Overview
//!
//! A generation run works in 4 phases:
//! 1. **Seeding**: Materialize hardcoded placements into the conflict index
//! 2. **Ranking**: Score every session by placement difficulty
//! 3. **Greedy Placement**: Hardest-first placement with indexed O(1)
//!    collision checks, falling back to split runs
//! 4. **Local Optimization**: Move/swap improvement over the same index
//!
//! # Example
//!
//! ```no_run
//! use course_timetabler::parser::load_snapshot_from_dir;
//! use course_timetabler::solver::{generate, GenerateOptions, NullSink, SolveControl};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let input = load_snapshot_from_dir(Path::new("./data/demo")).unwrap();
//! let options = GenerateOptions::default();
//! let control = SolveControl::with_timeout(Duration::from_millis(options.timeout_ms));
//! let outcome = generate(&input, &options, &control, &NullSink).unwrap();
//! println!("Placed {} items", outcome.schedules.len());
//! ```

pub mod error;
pub mod grid;
pub mod parser;
pub mod reporter;
pub mod solver;
pub mod store;
pub mod types;
pub mod verify;

pub use error::{Result, SolverError};
