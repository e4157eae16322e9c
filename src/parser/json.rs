use crate::error::{Result, SolverError};
use crate::types::{Classroom, Course, Department, Teacher, TimeSettings};
use super::SolverInput;
use std::fs;
use std::path::Path;

/// Load and freeze all solver input from a directory
pub fn load_snapshot_from_dir(dir: &Path) -> Result<SolverInput> {
    let courses = load_courses(&dir.join("courses.json"))?;
    let classrooms = load_classrooms(&dir.join("classrooms.json"))?;
    let teachers = load_teachers(&dir.join("teachers.json"))?;
    let departments = load_departments(&dir.join("departments.json"))?;
    let settings = load_settings_or_default(&dir.join("settings.toml"));

    let issues = super::check_duplicate_ids(&courses, &classrooms, &teachers, &departments);
    if !issues.is_empty() {
        return Err(SolverError::InputInconsistent { issues }.into());
    }

    Ok(SolverInput::freeze(
        courses,
        classrooms,
        teachers,
        departments,
        settings,
    ))
}

/// Load courses from JSON file
pub fn load_courses(path: &Path) -> Result<Vec<Course>> {
    load_json_file(path)
}

/// Load classrooms from JSON file
pub fn load_classrooms(path: &Path) -> Result<Vec<Classroom>> {
    load_json_file(path)
}

/// Load teachers (with resolved availability) from JSON file
pub fn load_teachers(path: &Path) -> Result<Vec<Teacher>> {
    load_json_file(path)
}

/// Load the department registry from JSON file
pub fn load_departments(path: &Path) -> Result<Vec<Department>> {
    load_json_file(path)
}

/// Load time settings from TOML file, or use defaults
pub fn load_settings_or_default(path: &Path) -> TimeSettings {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => TimeSettings::default(),
        }
    } else {
        TimeSettings::default()
    }
}

/// Generic JSON file loader
fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| SolverError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| {
        SolverError::Parse {
            file: path_str,
            message: e.to_string(),
        }
        .into()
    })
}
