use crate::error::SolverError;
use crate::types::{Day, TimeOfDay, TimeRange, TimeSettings};
use serde::Serialize;

/// One slot-wide cell of the weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub day: Day,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// Overlaps the lunch window; kept in the grid, excluded from placement
    pub lunch: bool,
}

impl Block {
    pub fn range(&self) -> TimeRange {
        // end > start holds by construction
        TimeRange::new(self.start, self.end).unwrap()
    }
}

/// The canonical ordered block list for a week, derived from settings.
///
/// Blocks are ordered by (day, start); each day holds the same number of
/// slots, so per-day views are fixed-stride slices.
#[derive(Debug, Clone)]
pub struct WeekGrid {
    slot_minutes: u16,
    day_start: TimeOfDay,
    day_end: TimeOfDay,
    slots_per_day: usize,
    blocks: Vec<Block>,
}

impl WeekGrid {
    /// Derive the grid, rejecting settings that cannot produce one.
    pub fn build(settings: &TimeSettings) -> Result<WeekGrid, SolverError> {
        let start = settings.day_start;
        let end = settings.day_end;
        if end <= start {
            return Err(SolverError::InvalidTimeWindow { start, end });
        }

        let span = end.minutes() - start.minutes();
        if settings.slot_duration == 0 || span % settings.slot_duration != 0 {
            return Err(SolverError::InvalidSlotDuration {
                minutes: settings.slot_duration,
                span,
            });
        }

        let lunch_start = settings.lunch_start;
        let lunch_end = settings.lunch_end;
        if lunch_end < lunch_start || lunch_start < start || lunch_end > end {
            return Err(SolverError::InvalidLunchWindow {
                start: lunch_start,
                end: lunch_end,
            });
        }

        let slots_per_day = (span / settings.slot_duration) as usize;
        let mut blocks = Vec::with_capacity(slots_per_day * Day::ALL.len());

        for day in Day::ALL {
            for slot in 0..slots_per_day {
                let block_start = start.minutes() + slot as u16 * settings.slot_duration;
                let block_end = block_start + settings.slot_duration;
                let lunch = lunch_start < lunch_end
                    && block_start < lunch_end.minutes()
                    && lunch_start.minutes() < block_end;
                blocks.push(Block {
                    day,
                    start: TimeOfDay::from_minutes(block_start).unwrap(),
                    end: TimeOfDay::from_minutes(block_end).unwrap(),
                    lunch,
                });
            }
        }

        Ok(WeekGrid {
            slot_minutes: settings.slot_duration,
            day_start: start,
            day_end: end,
            slots_per_day,
            blocks,
        })
    }

    pub fn slot_minutes(&self) -> u16 {
        self.slot_minutes
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_for_day(&self, day: Day) -> &[Block] {
        let base = day.index() * self.slots_per_day;
        &self.blocks[base..base + self.slots_per_day]
    }

    /// Slot position of an aligned time within the day window
    pub fn slot_index(&self, time: TimeOfDay) -> Option<usize> {
        let minutes = time.minutes();
        if minutes < self.day_start.minutes() || minutes >= self.day_end.minutes() {
            return None;
        }
        let offset = minutes - self.day_start.minutes();
        if offset % self.slot_minutes != 0 {
            return None;
        }
        Some((offset / self.slot_minutes) as usize)
    }

    /// True when the range starts on a slot boundary and spans whole slots
    pub fn is_aligned(&self, range: TimeRange) -> bool {
        self.slot_index(range.start()).is_some()
            && range.end() <= self.day_end
            && range.duration_minutes() % self.slot_minutes == 0
    }

    /// Width of an aligned range in slots
    pub fn slot_width(&self, range: TimeRange) -> usize {
        (range.duration_minutes() / self.slot_minutes) as usize
    }

    /// True when every slot-wide sub-block of the range is a non-lunch block
    pub fn is_placement_window(&self, day: Day, range: TimeRange) -> bool {
        if !self.is_aligned(range) {
            return false;
        }
        let first = match self.slot_index(range.start()) {
            Some(i) => i,
            None => return false,
        };
        let width = self.slot_width(range);
        let day_blocks = self.blocks_for_day(day);
        if first + width > day_blocks.len() {
            return false;
        }
        day_blocks[first..first + width].iter().all(|b| !b.lunch)
    }
}
