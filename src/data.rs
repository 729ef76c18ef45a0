use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pairs::PairingPolicy;

macro_rules! named_entity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

named_entity!(
    /// A student group; every group receives its own weekly rotation.
    Group
);
named_entity!(
    /// A lecture room.
    Room
);
named_entity!(Subject);
named_entity!(Teacher);
named_entity!(
    /// Institution tag handed out round-robin across assignments.
    Institution
);

/// Teaching days, in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Day {
    #[serde(rename = "Понедельник")]
    Monday,
    #[serde(rename = "Вторник")]
    Tuesday,
    #[serde(rename = "Среда")]
    Wednesday,
    #[serde(rename = "Четверг")]
    Thursday,
    #[serde(rename = "Пятница")]
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Offset in days from the first day of the week.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Понедельник",
            Day::Tuesday => "Вторник",
            Day::Wednesday => "Среда",
            Day::Thursday => "Четверг",
            Day::Friday => "Пятница",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four class periods of a teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum TimeSlot {
    #[serde(rename = "08:00-09:30")]
    First,
    #[serde(rename = "09:40-11:10")]
    Second,
    #[serde(rename = "11:40-13:10")]
    Third,
    #[serde(rename = "13:30-15:00")]
    Fourth,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::First,
        TimeSlot::Second,
        TimeSlot::Third,
        TimeSlot::Fourth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::First => "08:00-09:30",
            TimeSlot::Second => "09:40-11:10",
            TimeSlot::Third => "11:40-13:10",
            TimeSlot::Fourth => "13:30-15:00",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five input tables, each in file row order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTables {
    pub groups: Vec<Group>,
    pub rooms: Vec<Room>,
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
    pub institutions: Vec<Institution>,
}

/// A subject bound to the teacher on the same row of the teacher table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectTeacherPair {
    pub subject: Subject,
    pub teacher: Teacher,
}

/// Represents a single, scheduled class session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub institution: Institution,
    pub group: Group,
    pub date: NaiveDate,
    pub day: Day,
    pub timeslot: TimeSlot,
    pub subject: Subject,
    pub teacher: Teacher,
    pub room: Room,
}

/// Assignments in generation order.
pub type Schedule = Vec<Assignment>;

/// A (group, day, timeslot) position the allocator could not fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfilledSlot {
    pub group: Group,
    pub day: Day,
    pub timeslot: TimeSlot,
}

impl fmt::Display for UnfilledSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "group {} has no class on {} at {}",
            self.group, self.day, self.timeslot
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub groups: usize,
    pub attempted_slots: usize,
    pub filled_slots: usize,
    pub unfilled_slots: usize,
    pub elapsed_ms: u64,
}

/// Everything the allocator produced for one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generated {
    pub assignments: Schedule,
    pub unfilled_slots: Vec<UnfilledSlot>,
    pub stats: GenerationStats,
}

/// Body of `POST /v1/schedule/generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub tables: EntityTables,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub pairing: PairingPolicy,
}

/// Body of `POST /v1/schedule/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub assignments: Schedule,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub conflict: Option<String>,
}
