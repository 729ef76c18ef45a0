//! Positional subject ↔ teacher binding.
//!
//! Row `i` of the subject table is taught by row `i` of the teacher table.
//! When the tables differ in length the policy decides between dropping the
//! surplus rows and refusing the input.

use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data::{Subject, SubjectTeacherPair, Teacher};
use crate::error::{Result, ScheduleError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingPolicy {
    /// Keep the first `min(subjects, teachers)` rows.
    #[default]
    Truncate,
    /// Reject tables of different length.
    Strict,
}

impl FromStr for PairingPolicy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(PairingPolicy::Truncate),
            "strict" => Ok(PairingPolicy::Strict),
            other => Err(ScheduleError::Config(format!(
                "unknown pairing policy '{other}', expected 'truncate' or 'strict'"
            ))),
        }
    }
}

/// Builds the ordered pair list once, before allocation starts.
pub fn build_pairs(
    subjects: &[Subject],
    teachers: &[Teacher],
    policy: PairingPolicy,
) -> Result<Vec<SubjectTeacherPair>> {
    if subjects.len() != teachers.len() {
        match policy {
            PairingPolicy::Strict => {
                return Err(ScheduleError::PairLengthMismatch {
                    subjects: subjects.len(),
                    teachers: teachers.len(),
                });
            }
            PairingPolicy::Truncate => warn!(
                "Subject table has {} rows and teacher table has {}; keeping the first {} pairs.",
                subjects.len(),
                teachers.len(),
                subjects.len().min(teachers.len())
            ),
        }
    }

    Ok(subjects
        .iter()
        .zip(teachers)
        .map(|(subject, teacher)| SubjectTeacherPair {
            subject: subject.clone(),
            teacher: teacher.clone(),
        })
        .collect())
}
