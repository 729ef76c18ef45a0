use log::info;
use std::path::{Path, PathBuf};

use crate::data::Assignment;
use crate::error::{Result, ScheduleError};

/// Output columns, in order.
pub const HEADERS: [&str; 8] = [
    "Университет",
    "Группа",
    "Дата",
    "День",
    "Время",
    "Предмет",
    "Преподаватель",
    "Аудитория",
];

fn row_values(a: &Assignment) -> [String; 8] {
    [
        a.institution.to_string(),
        a.group.to_string(),
        a.date.format("%Y-%m-%d").to_string(),
        a.day.to_string(),
        a.timeslot.to_string(),
        a.subject.to_string(),
        a.teacher.to_string(),
        a.room.to_string(),
    ]
}

/// Writes the schedule as a one-sheet xlsx workbook, one row per assignment.
pub fn export_schedule(schedule: &[Assignment], path: &Path) -> Result<PathBuf> {
    let export_err = |reason: String| ScheduleError::Export {
        path: path.to_path_buf(),
        reason,
    };

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| export_err("new workbook has no default sheet".to_string()))?;

    for (col, title) in HEADERS.iter().enumerate() {
        sheet.get_cell_mut((col as u32 + 1, 1u32)).set_value_string(*title);
    }
    for (row, assignment) in schedule.iter().enumerate() {
        for (col, value) in row_values(assignment).into_iter().enumerate() {
            sheet
                .get_cell_mut((col as u32 + 1, row as u32 + 2))
                .set_value_string(value);
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| export_err(e.to_string()))?;
    info!("Schedule saved to {} ({} rows).", path.display(), schedule.len());
    Ok(path.to_path_buf())
}
