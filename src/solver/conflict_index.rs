use crate::types::{
    Classroom, ClassroomId, Course, CourseId, Day, DepartmentId, ScheduleItem, Semester,
    TeacherId, TimeRange,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// The student group that must not sit in two compulsory classes at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CohortKey {
    pub semester: Semester,
    pub level: u8,
    pub department: DepartmentId,
}

/// Which resource a placement would collide on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    Teacher,
    Classroom,
    Cohort,
}

/// A detected collision with a human-readable explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub explanation: String,
}

/// Indexed occupancy over (resource, day, slot-block) triples.
///
/// Occupancy is recorded per slot-wide block, so range overlap checks reduce
/// to per-block set membership. `check_placement` results are memoized per
/// (course, classroom, day, range); any `add` or `remove` flushes the whole
/// memo rather than tracking affected partitions.
#[derive(Debug)]
pub struct ConflictIndex {
    slot_minutes: u16,
    teacher_busy: HashSet<(TeacherId, Day, u16)>,
    classroom_busy: HashSet<(ClassroomId, Day, u16)>,
    cohort_busy: HashSet<(CohortKey, Day, u16)>,
    memo: HashMap<(CourseId, ClassroomId, Day, TimeRange), Option<Conflict>>,
}

impl ConflictIndex {
    pub fn new(slot_minutes: u16) -> Self {
        Self {
            slot_minutes,
            teacher_busy: HashSet::new(),
            classroom_busy: HashSet::new(),
            cohort_busy: HashSet::new(),
            memo: HashMap::new(),
        }
    }

    fn block_starts(&self, range: TimeRange) -> impl Iterator<Item = u16> {
        let slot = self.slot_minutes;
        (range.start().minutes()..range.end().minutes()).step_by(slot as usize)
    }

    fn cohorts_of(course: &Course) -> Vec<CohortKey> {
        if !course.is_compulsory() {
            return Vec::new();
        }
        course
            .offerings
            .iter()
            .map(|o| CohortKey {
                semester: course.semester,
                level: course.level,
                department: o.department_id,
            })
            .collect()
    }

    /// Mark the item's teacher, classroom, and compulsory-cohort occupancy
    pub fn add(&mut self, item: &ScheduleItem, course: &Course) {
        let cohorts = Self::cohorts_of(course);
        for start in self.block_starts(item.time_range).collect::<Vec<_>>() {
            if let Some(teacher_id) = course.teacher_id {
                self.teacher_busy.insert((teacher_id, item.day, start));
            }
            self.classroom_busy.insert((item.classroom_id, item.day, start));
            for cohort in &cohorts {
                self.cohort_busy.insert((*cohort, item.day, start));
            }
        }
        self.memo.clear();
    }

    /// Clear the marks `add` set for this item
    pub fn remove(&mut self, item: &ScheduleItem, course: &Course) {
        let cohorts = Self::cohorts_of(course);
        for start in self.block_starts(item.time_range).collect::<Vec<_>>() {
            if let Some(teacher_id) = course.teacher_id {
                self.teacher_busy.remove(&(teacher_id, item.day, start));
            }
            self.classroom_busy.remove(&(item.classroom_id, item.day, start));
            for cohort in &cohorts {
                self.cohort_busy.remove(&(*cohort, item.day, start));
            }
        }
        self.memo.clear();
    }

    pub fn has_teacher_conflict(&self, teacher_id: TeacherId, day: Day, range: TimeRange) -> bool {
        self.block_starts(range)
            .any(|start| self.teacher_busy.contains(&(teacher_id, day, start)))
    }

    pub fn has_classroom_conflict(
        &self,
        classroom_id: ClassroomId,
        day: Day,
        range: TimeRange,
    ) -> bool {
        self.block_starts(range)
            .any(|start| self.classroom_busy.contains(&(classroom_id, day, start)))
    }

    /// Electives never participate in cohort occupancy
    pub fn has_cohort_conflict(&self, course: &Course, day: Day, range: TimeRange) -> bool {
        Self::cohorts_of(course).iter().any(|cohort| {
            self.block_starts(range)
                .any(|start| self.cohort_busy.contains(&(*cohort, day, start)))
        })
    }

    /// Memoized composite collision check in teacher, classroom, cohort order
    pub fn check_placement(
        &mut self,
        course: &Course,
        classroom: &Classroom,
        day: Day,
        range: TimeRange,
    ) -> Option<Conflict> {
        let key = (course.id, classroom.id, day, range);
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }
        let result = self.check_placement_uncached(course, classroom, day, range);
        self.memo.insert(key, result.clone());
        result
    }

    fn check_placement_uncached(
        &self,
        course: &Course,
        classroom: &Classroom,
        day: Day,
        range: TimeRange,
    ) -> Option<Conflict> {
        if let Some(teacher_id) = course.teacher_id {
            if self.has_teacher_conflict(teacher_id, day, range) {
                return Some(Conflict {
                    kind: ConflictKind::Teacher,
                    explanation: format!(
                        "teacher {} is already scheduled on {} within {}",
                        teacher_id, day, range
                    ),
                });
            }
        }
        if self.has_classroom_conflict(classroom.id, day, range) {
            return Some(Conflict {
                kind: ConflictKind::Classroom,
                explanation: format!(
                    "classroom {} is already occupied on {} within {}",
                    classroom.id, day, range
                ),
            });
        }
        if self.has_cohort_conflict(course, day, range) {
            return Some(Conflict {
                kind: ConflictKind::Cohort,
                explanation: format!(
                    "a cohort of course {} already has a compulsory class on {} within {}",
                    course.id, day, range
                ),
            });
        }
        None
    }

    /// Number of occupied (resource, block) entries, for metrics
    pub fn occupancy_size(&self) -> usize {
        self.teacher_busy.len() + self.classroom_busy.len() + self.cohort_busy.len()
    }

    /// True when no occupancy is recorded at all
    pub fn is_empty(&self) -> bool {
        self.teacher_busy.is_empty()
            && self.classroom_busy.is_empty()
            && self.cohort_busy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn course(id: u32, category: Category, teacher: Option<u32>) -> Course {
        Course {
            id: CourseId(id),
            code: format!("C{id}"),
            name: format!("Course {id}"),
            faculty: "Engineering".to_string(),
            level: 2,
            category,
            semester: Semester::Fall,
            active: true,
            teacher_id: teacher.map(TeacherId),
            sessions: vec![Session { kind: SessionType::Theoretical, hours: 2 }],
            offerings: vec![DepartmentOffering {
                department_id: DepartmentId(5),
                student_count: 30,
            }],
            capacity_margin_percent: 0,
            hardcoded: vec![],
            weekly_hours: 2,
        }
    }

    fn classroom(id: u32) -> Classroom {
        Classroom {
            id: ClassroomId(id),
            name: format!("R{id}"),
            capacity: 40,
            kind: ClassroomType::Theoretical,
            priority_department: None,
            active: true,
            available_hours: WeeklyHours::new(),
        }
    }

    fn item(course_id: u32, classroom_id: u32, day: Day, range: &str) -> ScheduleItem {
        let time_range: TimeRange = range.parse().unwrap();
        ScheduleItem {
            day,
            time_range,
            course_id: CourseId(course_id),
            classroom_id: ClassroomId(classroom_id),
            session_type: SessionType::Theoretical,
            session_hours: (time_range.duration_minutes() / 60) as u8,
            is_hardcoded: false,
        }
    }

    #[test]
    fn test_add_marks_all_dimensions() {
        let mut index = ConflictIndex::new(60);
        let c = course(1, Category::Compulsory, Some(9));
        index.add(&item(1, 3, Day::Monday, "08:00-10:00"), &c);

        let probe: TimeRange = "09:00-10:00".parse().unwrap();
        assert!(index.has_teacher_conflict(TeacherId(9), Day::Monday, probe));
        assert!(index.has_classroom_conflict(ClassroomId(3), Day::Monday, probe));
        assert!(index.has_cohort_conflict(&c, Day::Monday, probe));

        let other_day: TimeRange = "08:00-10:00".parse().unwrap();
        assert!(!index.has_teacher_conflict(TeacherId(9), Day::Tuesday, other_day));
    }

    #[test]
    fn test_remove_then_add_is_a_noop() {
        let mut index = ConflictIndex::new(60);
        let c = course(1, Category::Compulsory, Some(9));
        let placed = item(1, 3, Day::Monday, "08:00-10:00");

        index.add(&placed, &c);
        let before = index.occupancy_size();
        index.remove(&placed, &c);
        assert!(index.is_empty());
        index.add(&placed, &c);
        assert_eq!(index.occupancy_size(), before);
    }

    #[test]
    fn test_null_teacher_never_conflicts() {
        let mut index = ConflictIndex::new(60);
        let c1 = course(1, Category::Elective, None);
        let c2 = course(2, Category::Elective, None);
        index.add(&item(1, 3, Day::Monday, "08:00-09:00"), &c1);

        let r1 = classroom(4);
        let probe: TimeRange = "08:00-09:00".parse().unwrap();
        assert!(index.check_placement(&c2, &r1, Day::Monday, probe).is_none());
    }

    #[test]
    fn test_electives_skip_cohort_occupancy() {
        let mut index = ConflictIndex::new(60);
        let elective = course(1, Category::Elective, Some(1));
        let compulsory = course(2, Category::Compulsory, Some(2));
        index.add(&item(1, 3, Day::Monday, "08:00-09:00"), &elective);

        let probe: TimeRange = "08:00-09:00".parse().unwrap();
        assert!(!index.has_cohort_conflict(&compulsory, Day::Monday, probe));
    }

    #[test]
    fn test_cohort_conflict_between_compulsory_courses() {
        let mut index = ConflictIndex::new(60);
        let c1 = course(1, Category::Compulsory, Some(1));
        let c2 = course(2, Category::Compulsory, Some(2));
        index.add(&item(1, 3, Day::Monday, "08:00-09:00"), &c1);

        let probe: TimeRange = "08:00-09:00".parse().unwrap();
        assert!(index.has_cohort_conflict(&c2, Day::Monday, probe));
    }

    #[test]
    fn test_check_placement_reports_teacher_first() {
        let mut index = ConflictIndex::new(60);
        let c1 = course(1, Category::Compulsory, Some(9));
        let c2 = course(2, Category::Compulsory, Some(9));
        index.add(&item(1, 3, Day::Monday, "08:00-09:00"), &c1);

        // Same teacher, same classroom, same cohort: teacher wins the report
        let conflict = index
            .check_placement(&c2, &classroom(3), Day::Monday, "08:00-09:00".parse().unwrap())
            .unwrap();
        assert_eq!(conflict.kind, ConflictKind::Teacher);
    }

    #[test]
    fn test_memo_invalidated_by_add() {
        let mut index = ConflictIndex::new(60);
        let c1 = course(1, Category::Compulsory, Some(1));
        let c2 = course(2, Category::Compulsory, Some(2));
        let r = classroom(3);
        let probe: TimeRange = "08:00-09:00".parse().unwrap();

        // Prime the memo while the slot is free
        assert!(index.check_placement(&c2, &r, Day::Monday, probe).is_none());

        index.add(&item(1, 3, Day::Monday, "08:00-09:00"), &c1);
        let conflict = index.check_placement(&c2, &r, Day::Monday, probe);
        assert!(conflict.is_some());
    }

    #[test]
    fn test_partial_overlap_detected() {
        let mut index = ConflictIndex::new(60);
        let c1 = course(1, Category::Compulsory, Some(9));
        index.add(&item(1, 3, Day::Monday, "08:00-10:00"), &c1);

        let overlapping: TimeRange = "09:00-11:00".parse().unwrap();
        let disjoint: TimeRange = "10:00-12:00".parse().unwrap();
        assert!(index.has_teacher_conflict(TeacherId(9), Day::Monday, overlapping));
        assert!(!index.has_teacher_conflict(TeacherId(9), Day::Monday, disjoint));
    }
}
