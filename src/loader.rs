//! Reads the five input workbooks into `EntityTables`.

use calamine::{Data, Reader, open_workbook_auto};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::data::{EntityTables, Group, Institution, Room, Subject, Teacher};
use crate::error::{Result, ScheduleError};

pub const GROUP_COLUMN: &str = "Группа";
pub const ROOM_COLUMN: &str = "Аудитория";
pub const SUBJECT_COLUMN: &str = "Предмет";
pub const TEACHER_COLUMN: &str = "Преподаватель";
pub const INSTITUTION_COLUMN: &str = "Вуз";

/// Locations of the five input workbooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub groups: PathBuf,
    pub rooms: PathBuf,
    pub subjects: PathBuf,
    pub teachers: PathBuf,
    pub institutions: PathBuf,
}

pub fn load_tables(paths: &InputPaths) -> Result<EntityTables> {
    let (subjects, teachers) = pair_rows(
        read_cells(&paths.subjects, SUBJECT_COLUMN)?,
        read_cells(&paths.teachers, TEACHER_COLUMN)?,
    );
    let tables = EntityTables {
        groups: read_column(&paths.groups, GROUP_COLUMN)?
            .into_iter()
            .map(Group::new)
            .collect(),
        rooms: read_column(&paths.rooms, ROOM_COLUMN)?
            .into_iter()
            .map(Room::new)
            .collect(),
        subjects: subjects.into_iter().map(Subject::new).collect(),
        teachers: teachers.into_iter().map(Teacher::new).collect(),
        institutions: read_column(&paths.institutions, INSTITUTION_COLUMN)?
            .into_iter()
            .map(Institution::new)
            .collect(),
    };
    info!(
        "Loaded {} groups, {} rooms, {} subjects, {} teachers, {} institutions.",
        tables.groups.len(),
        tables.rooms.len(),
        tables.subjects.len(),
        tables.teachers.len(),
        tables.institutions.len()
    );
    Ok(tables)
}

/// Lines the subject and teacher columns up by data row.
///
/// A row blank on either side is dropped from both columns so later rows
/// keep their partner. Rows past the shorter column are kept as they are and
/// left to the pairing policy.
fn pair_rows(
    subjects: Vec<Option<String>>,
    teachers: Vec<Option<String>>,
) -> (Vec<String>, Vec<String>) {
    let shared = subjects.len().min(teachers.len());
    let mut kept_subjects = Vec::with_capacity(subjects.len());
    let mut kept_teachers = Vec::with_capacity(teachers.len());

    for (row, (subject, teacher)) in subjects.iter().zip(&teachers).enumerate() {
        match (subject, teacher) {
            (Some(subject), Some(teacher)) => {
                kept_subjects.push(subject.clone());
                kept_teachers.push(teacher.clone());
            }
            (None, None) => {}
            _ => warn!(
                "Data row {} has a blank subject or teacher; dropping it from both tables.",
                row + 2
            ),
        }
    }
    kept_subjects.extend(subjects.into_iter().skip(shared).flatten());
    kept_teachers.extend(teachers.into_iter().skip(shared).flatten());

    (kept_subjects, kept_teachers)
}

/// Returns the non-empty cells under `column` in the first sheet, in row order.
pub fn read_column(path: &Path, column: &str) -> Result<Vec<String>> {
    Ok(read_cells(path, column)?.into_iter().flatten().collect())
}

/// Returns one entry per data row under `column`, `None` for blank cells.
///
/// The header row is the first row; headers are compared ignoring case and
/// whitespace.
pub fn read_cells(path: &Path, column: &str) -> Result<Vec<Option<String>>> {
    let workbook_err = |reason: String| ScheduleError::Workbook {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| workbook_err("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_err(e.to_string()))?;

    let mut rows = range.rows();
    let wanted = normalize_header(column);
    let index = rows
        .next()
        .and_then(|header| {
            header
                .iter()
                .position(|cell| normalize_header(&cell_to_string(cell)) == wanted)
        })
        .ok_or_else(|| ScheduleError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;

    let cells: Vec<Option<String>> = rows
        .map(|row| {
            row.get(index)
                .map(cell_to_string)
                .filter(|value| !value.is_empty())
        })
        .collect();
    debug!("{}: {} rows under '{}'", path.display(), cells.len(), column);
    Ok(cells)
}

fn normalize_header(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Writes `rows` into the first sheet of a new workbook at `path`.
#[cfg(test)]
pub(crate) fn write_sheet(path: &Path, rows: &[&[&str]]) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut((c as u32 + 1, r as u32 + 1))
                .set_value_string(*value);
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}
