//! Generate → validate, and the batch run that wraps it with spreadsheet I/O.

use chrono::NaiveDate;
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::{EntityTables, Generated};
use crate::error::Result;
use crate::export::export_schedule;
use crate::loader::load_tables;
use crate::pairs::PairingPolicy;
use crate::rotation::RandomRooms;
use crate::solver;
use crate::validator::{self, Conflict};

/// Result of a generation that got past input checks.
#[derive(Debug)]
pub enum Outcome {
    Valid(Generated),
    Rejected(Conflict),
}

pub fn plan(
    tables: &EntityTables,
    start_date: NaiveDate,
    pairing: PairingPolicy,
    seed: Option<u64>,
) -> Result<Outcome> {
    let mut picker = RandomRooms::with_optional_seed(seed);
    let generated = solver::generate(tables, start_date, pairing, &mut picker)?;
    Ok(match validator::validate(&generated.assignments) {
        Ok(()) => Outcome::Valid(generated),
        Err(conflict) => Outcome::Rejected(conflict),
    })
}

/// Loads the configured workbooks, builds the week and writes it out.
///
/// Returns `None` when the validator rejects the schedule; nothing is
/// written in that case.
pub fn run_batch(config: &AppConfig) -> Result<Option<PathBuf>> {
    let tables = load_tables(&config.inputs)?;
    let outcome = plan(&tables, config.start_date, config.pairing, config.seed)?;
    finish(outcome, &config.output)
}

/// Exports a valid schedule to `output`; a rejected one is logged and dropped.
pub fn finish(outcome: Outcome, output: &Path) -> Result<Option<PathBuf>> {
    match outcome {
        Outcome::Valid(generated) => {
            let path = export_schedule(&generated.assignments, output)?;
            info!(
                "{} assignments exported, {} slots left empty.",
                generated.stats.filled_slots, generated.stats.unfilled_slots
            );
            Ok(Some(path))
        }
        Outcome::Rejected(conflict) => {
            error!("Schedule has overlaps and will not be saved: {conflict}");
            Ok(None)
        }
    }
}
