//! Post-generation overlap check.
//!
//! Groups are checked first, then teachers, then rooms. The scan stops at
//! the first category with an overlap and reports its smallest key, with
//! days and timeslots compared by their labels.

use itertools::Itertools;
use log::{info, warn};
use std::fmt;

use crate::data::{Assignment, Day, TimeSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Group,
    Teacher,
    Room,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictKind::Group => "group",
            ConflictKind::Teacher => "teacher",
            ConflictKind::Room => "room",
        })
    }
}

/// More than one assignment for the same resource at the same (day, timeslot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub resource: String,
    pub day: Day,
    pub timeslot: TimeSlot,
    pub count: usize,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Overlap for {} {} on {} at {}: {} assignments",
            self.kind, self.resource, self.day, self.timeslot, self.count
        )
    }
}

fn group_key(a: &Assignment) -> &str {
    a.group.as_str()
}

fn teacher_key(a: &Assignment) -> &str {
    a.teacher.as_str()
}

fn room_key(a: &Assignment) -> &str {
    a.room.as_str()
}

/// Returns the first overlap found, or `Ok(())` for a clean schedule.
pub fn validate(schedule: &[Assignment]) -> Result<(), Conflict> {
    let checks: [(ConflictKind, fn(&Assignment) -> &str); 3] = [
        (ConflictKind::Group, group_key),
        (ConflictKind::Teacher, teacher_key),
        (ConflictKind::Room, room_key),
    ];

    for (kind, key) in checks {
        if let Some(conflict) = first_conflict(schedule, kind, key) {
            warn!("{conflict}");
            return Err(conflict);
        }
    }

    info!(
        "Schedule checked: no overlaps across {} assignments.",
        schedule.len()
    );
    Ok(())
}

fn first_conflict(
    schedule: &[Assignment],
    kind: ConflictKind,
    key: fn(&Assignment) -> &str,
) -> Option<Conflict> {
    schedule
        .iter()
        .map(|a| (key(a), a.day, a.timeslot))
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .min_by_key(|((resource, day, timeslot), _)| {
            (*resource, day.label(), timeslot.label())
        })
        .map(|((resource, day, timeslot), count)| Conflict {
            kind,
            resource: resource.to_string(),
            day,
            timeslot,
            count,
        })
}
