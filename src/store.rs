use crate::error::{Result, SolverError};
use crate::types::{ScheduleDocument, ScheduleItem, ScheduleMetadata};
use std::fs;
use std::path::{Path, PathBuf};

/// The transactional persistence boundary between generating a schedule and
/// committing it.
pub trait ScheduleStore {
    /// The currently persisted items, empty when nothing was committed yet
    fn load(&self) -> Result<Vec<ScheduleItem>>;

    /// Atomically replace the persisted schedule with the produced items.
    /// The produced set carries the hardcoded items alongside the solved
    /// ones, so a full replace implements "delete every non-hardcoded item
    /// and insert the produced items". A failed commit must leave the
    /// previously persisted schedule intact.
    fn commit(&self, items: &[ScheduleItem], processing_time_ms: u64) -> Result<()>;
}

/// File-backed store writing the schedule document as pretty JSON.
///
/// Commit goes through a sibling temp file followed by a rename, so readers
/// either see the old document or the new one, never a torn write.
pub struct JsonScheduleStore {
    path: PathBuf,
}

impl JsonScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn load(&self) -> Result<Vec<ScheduleItem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| SolverError::FileRead {
            path: self.path.display().to_string(),
            source: e,
        })?;
        let document: ScheduleDocument =
            serde_json::from_str(&content).map_err(|e| SolverError::Parse {
                file: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(document.items)
    }

    fn commit(&self, items: &[ScheduleItem], processing_time_ms: u64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document = ScheduleDocument {
            items: items.to_vec(),
            metadata: ScheduleMetadata::stamped(processing_time_ms),
        };
        let json = serde_json::to_string_pretty(&document)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassroomId, CourseId, Day, SessionType};

    fn temp_store(name: &str) -> JsonScheduleStore {
        let path = std::env::temp_dir().join(format!(
            "course-timetabler-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        JsonScheduleStore::new(path)
    }

    fn item() -> ScheduleItem {
        ScheduleItem {
            day: Day::Monday,
            time_range: "08:00-10:00".parse().unwrap(),
            course_id: CourseId(1),
            classroom_id: ClassroomId(1),
            session_type: SessionType::Theoretical,
            session_hours: 2,
            is_hardcoded: false,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_commit_then_load_round_trips() {
        let store = temp_store("roundtrip");
        store.commit(&[item()], 12).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![item()]);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_commit_replaces_previous_schedule() {
        let store = temp_store("replace");
        store.commit(&[item()], 1).unwrap();

        let mut replacement = item();
        replacement.day = Day::Tuesday;
        store.commit(&[replacement.clone()], 2).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![replacement]);
        let _ = fs::remove_file(store.path());
    }
}
