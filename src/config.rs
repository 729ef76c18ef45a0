//! Runtime settings, read from the environment (and `.env` when present).

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

use crate::error::{Result, ScheduleError};
use crate::loader::InputPaths;
use crate::pairs::PairingPolicy;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_START_DATE: &str = "2024-12-01";
pub const DEFAULT_OUTPUT: &str = "schedule_with_universities.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub start_date: NaiveDate,
    /// Seed for room selection; OS entropy when unset.
    pub seed: Option<u64>,
    pub pairing: PairingPolicy,
    pub inputs: InputPaths,
    pub output: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let start_raw = or_default("TIMETABLE_START_DATE", DEFAULT_START_DATE);
        let start_date = NaiveDate::parse_from_str(start_raw.trim(), "%Y-%m-%d").map_err(|e| {
            ScheduleError::Config(format!("TIMETABLE_START_DATE '{start_raw}': {e}"))
        })?;

        let seed = lookup("TIMETABLE_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ScheduleError::Config(format!("TIMETABLE_SEED '{raw}': {e}")))
            })
            .transpose()?;

        let pairing = lookup("TIMETABLE_PAIRING")
            .map(|raw| raw.parse::<PairingPolicy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            bind_addr: or_default("TIMETABLE_BIND_ADDR", DEFAULT_BIND_ADDR),
            start_date,
            seed,
            pairing,
            inputs: InputPaths {
                groups: or_default("TIMETABLE_GROUPS", "groups.xlsx").into(),
                rooms: or_default("TIMETABLE_ROOMS", "rooms.xlsx").into(),
                subjects: or_default("TIMETABLE_SUBJECTS", "subjects.xlsx").into(),
                teachers: or_default("TIMETABLE_TEACHERS", "teachers.xlsx").into(),
                institutions: or_default("TIMETABLE_INSTITUTIONS", "universities.xlsx").into(),
            },
            output: or_default("TIMETABLE_OUTPUT", DEFAULT_OUTPUT).into(),
        })
    }
}
