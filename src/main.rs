use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use course_timetabler::grid::WeekGrid;
use course_timetabler::parser::{load_snapshot_from_dir, validate_snapshot};
use course_timetabler::reporter::{
    generate_json_summary, generate_reports, print_summary, OutputFormat,
};
use course_timetabler::solver::{
    generate, GenerateOptions, Preset, ProgressEvent, ProgressSink, SolveControl, Stage,
};
use course_timetabler::store::{JsonScheduleStore, ScheduleStore};
use course_timetabler::verify::verify_schedule;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "course-timetabler")]
#[command(about = "Constraint-based university course timetable generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run demo with sample data
    Demo,

    /// Generate a timetable from input data
    Generate {
        /// Directory containing input JSON files and settings.toml
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for the schedule and reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Output format(s): json, markdown, text, or all
        #[arg(short, long, default_value = "all")]
        format: String,

        /// Tuning preset: fast, default, or quality
        #[arg(short, long, default_value = "default")]
        preset: String,

        /// Optimizer iteration budget (10-1000)
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Wall-clock budget in milliseconds (5000-300000)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Skip the post-placement optimizer
        #[arg(long)]
        no_optimize: bool,

        /// Suppress progress output, print JSON summary only
        #[arg(short, long)]
        quiet: bool,
    },

    /// Re-check a committed schedule against the input data
    Validate {
        /// Path to the committed schedule.json
        #[arg(short, long)]
        schedule: PathBuf,

        /// Directory containing input data
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Print the derived weekly block grid
    Grid {
        /// Directory containing settings.toml
        #[arg(short, long)]
        data: PathBuf,
    },
}

/// Progress sink backed by an indicatif bar
struct IndicatifSink {
    bar: ProgressBar,
}

impl IndicatifSink {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        };
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for IndicatifSink {
    fn report(&self, event: ProgressEvent) {
        self.bar.set_position(event.progress as u64);
        let message = match event.scheduled_count {
            Some(count) if event.stage == Stage::Placing => {
                format!("{} ({} placed)", event.message, count)
            }
            _ => event.message,
        };
        self.bar.set_message(message);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::Generate {
            data,
            output,
            format,
            preset,
            max_iterations,
            timeout_ms,
            no_optimize,
            quiet,
        } => run_generate(
            &data,
            &output,
            &format,
            &preset,
            max_iterations,
            timeout_ms,
            no_optimize,
            quiet,
        ),
        Commands::Validate { schedule, data } => run_validate(&schedule, &data),
        Commands::Grid { data } => run_grid(&data),
    }
}

fn run_demo() -> Result<()> {
    println!("{}", "Course Timetabler Demo".bold().cyan());
    println!("{}", "─".repeat(40));

    let demo_path = PathBuf::from("data/demo");
    let output_path = PathBuf::from("output");

    if !demo_path.join("courses.json").exists() {
        println!("{}", "Demo data not found. Creating sample data...".yellow());
        create_demo_data(&demo_path)?;
    }

    run_generate(
        &demo_path,
        &output_path,
        "all",
        "default",
        None,
        None,
        false,
        false,
    )
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    data: &PathBuf,
    output: &PathBuf,
    format: &str,
    preset: &str,
    max_iterations: Option<u32>,
    timeout_ms: Option<u64>,
    no_optimize: bool,
    quiet: bool,
) -> Result<()> {
    let input = load_snapshot_from_dir(data).context("Failed to load input data")?;

    if !quiet {
        println!(
            "Loaded {} courses, {} classrooms, {} teachers, {} departments",
            input.courses.len(),
            input.classrooms.len(),
            input.teachers.len(),
            input.departments.len()
        );

        let grid = WeekGrid::build(&input.settings)?;
        for warning in validate_snapshot(&input, &grid).warnings {
            println!("{} {}", "Warning:".yellow(), warning);
        }
    }

    let mut options = GenerateOptions::preset(parse_preset(preset)?);
    if let Some(max_iterations) = max_iterations {
        options.max_iterations = max_iterations;
    }
    if let Some(timeout_ms) = timeout_ms {
        options.timeout_ms = timeout_ms;
    }
    if no_optimize {
        options.optimization_enabled = false;
    }

    let control = SolveControl::with_timeout(Duration::from_millis(options.timeout_ms));
    let sink = IndicatifSink::new(quiet);

    let outcome = generate(&input, &options, &control, &sink)?;
    sink.finish();

    let formats = parse_formats(format);
    generate_reports(&outcome, &input, output, &formats)?;

    let store = JsonScheduleStore::new(output.join("schedule.json"));
    store.commit(&outcome.schedules, outcome.processing_time_ms)?;

    if quiet {
        println!("{}", generate_json_summary(&outcome)?);
    } else {
        print_summary(&outcome);
        println!(
            "\nSchedule committed to: {}",
            store.path().display().to_string().green()
        );
    }

    Ok(())
}

fn run_validate(schedule_path: &PathBuf, data: &PathBuf) -> Result<()> {
    let input = load_snapshot_from_dir(data)?;
    let grid = WeekGrid::build(&input.settings)?;

    let store = JsonScheduleStore::new(schedule_path.clone());
    let items = store.load()?;

    let violations = verify_schedule(&items, &input, &grid);

    if violations.is_empty() {
        println!(
            "{} ({} items)",
            "✓ Schedule is valid".green().bold(),
            items.len()
        );
    } else {
        println!("{}", "✗ Schedule has violations".red().bold());
        for violation in &violations {
            println!("  - {}: {}", violation.constraint.red(), violation.message);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_grid(data: &PathBuf) -> Result<()> {
    let input = load_snapshot_from_dir(data)?;
    let grid = WeekGrid::build(&input.settings)?;

    println!(
        "{} ({}-minute slots, {} per day)",
        "Weekly block grid".bold(),
        grid.slot_minutes(),
        grid.slots_per_day()
    );

    for day in course_timetabler::types::Day::ALL {
        println!("\n{}", day.to_string().bold());
        for block in grid.blocks_for_day(day) {
            let marker = if block.lunch {
                " (lunch)".yellow().to_string()
            } else {
                String::new()
            };
            println!("  {}-{}{}", block.start, block.end, marker);
        }
    }

    Ok(())
}

fn parse_preset(name: &str) -> Result<Preset> {
    match name.to_lowercase().as_str() {
        "fast" => Ok(Preset::Fast),
        "default" => Ok(Preset::Default),
        "quality" => Ok(Preset::Quality),
        other => anyhow::bail!("unknown preset '{other}' (expected fast, default, or quality)"),
    }
}

fn parse_formats(format: &str) -> Vec<OutputFormat> {
    if format == "all" {
        return vec![OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Text];
    }

    format
        .split(',')
        .filter_map(|f| match f.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "text" | "txt" => Some(OutputFormat::Text),
            _ => None,
        })
        .collect()
}

fn create_demo_data(path: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(path)?;

    let departments = serde_json::json!([
        {"id": 1, "name": "Computer Engineering"},
        {"id": 2, "name": "Electrical Engineering"}
    ]);
    std::fs::write(
        path.join("departments.json"),
        serde_json::to_string_pretty(&departments)?,
    )?;

    let teachers = serde_json::json!([
        {"id": 1, "name": "Dr. Aksoy", "availability": {}},
        {"id": 2, "name": "Dr. Demir", "availability": {}},
        {"id": 3, "name": "Dr. Kaya", "availability": {"Pazartesi": ["08:00-12:00"], "Çarşamba": ["08:00-18:00"]}},
        {"id": 4, "name": "Dr. Yildiz", "availability": {}}
    ]);
    std::fs::write(
        path.join("teachers.json"),
        serde_json::to_string_pretty(&teachers)?,
    )?;

    let classrooms = serde_json::json!([
        {"id": 1, "name": "Hall A", "capacity": 80, "type": "theoretical", "priority_department": 1},
        {"id": 2, "name": "Hall B", "capacity": 60, "type": "theoretical"},
        {"id": 3, "name": "Lab 1", "capacity": 30, "type": "lab"},
        {"id": 4, "name": "Studio", "capacity": 40, "type": "hybrid"}
    ]);
    std::fs::write(
        path.join("classrooms.json"),
        serde_json::to_string_pretty(&classrooms)?,
    )?;

    let courses = serde_json::json!([
        {
            "id": 1, "code": "CS101", "name": "Introduction to Programming",
            "faculty": "Engineering", "level": 1, "category": "compulsory",
            "semester": "fall", "teacher_id": 1, "weekly_hours": 4,
            "sessions": [{"type": "theoretical", "hours": 2}, {"type": "lab", "hours": 2}],
            "offerings": [{"department_id": 1, "student_count": 40}]
        },
        {
            "id": 2, "code": "CS201", "name": "Data Structures",
            "faculty": "Engineering", "level": 2, "category": "compulsory",
            "semester": "fall", "teacher_id": 2, "weekly_hours": 3,
            "sessions": [{"type": "theoretical", "hours": 3}],
            "offerings": [{"department_id": 1, "student_count": 48}]
        },
        {
            "id": 3, "code": "EE110", "name": "Circuit Theory",
            "faculty": "Engineering", "level": 1, "category": "compulsory",
            "semester": "fall", "teacher_id": 3, "weekly_hours": 3,
            "sessions": [{"type": "theoretical", "hours": 2}, {"type": "lab", "hours": 1}],
            "offerings": [{"department_id": 2, "student_count": 42}]
        },
        {
            "id": 4, "code": "HUM105", "name": "History of Science",
            "faculty": "Humanities", "level": 1, "category": "elective",
            "semester": "fall", "teacher_id": 4, "weekly_hours": 2,
            "sessions": [{"type": "theoretical", "hours": 2}],
            "offerings": [
                {"department_id": 1, "student_count": 20},
                {"department_id": 2, "student_count": 15}
            ],
            "hardcoded": [
                {"type": "theoretical", "day": "Cuma", "range": "15:00-17:00", "classroom_id": 2}
            ]
        }
    ]);
    std::fs::write(
        path.join("courses.json"),
        serde_json::to_string_pretty(&courses)?,
    )?;

    let settings = r#"slot_duration = 60
day_start = "08:00"
day_end = "18:00"
lunch_start = "12:00"
lunch_end = "13:00"
capacity_margin_enabled = true
capacity_margin_percent = 10
"#;
    std::fs::write(path.join("settings.toml"), settings)?;

    println!("{}", "Demo data created successfully!".green());
    Ok(())
}
