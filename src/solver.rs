use crate::availability::is_available;
use crate::data::{
    Assignment, Day, EntityTables, GenerationStats, Generated, Schedule, Subject,
    SubjectTeacherPair, TimeSlot, UnfilledSlot,
};
use crate::error::{Result, ScheduleError};
use crate::pairs::{PairingPolicy, build_pairs};
use crate::rotation::{InstitutionRotation, RoomPicker};
use chrono::{Days, NaiveDate};
use itertools::Itertools;
use log::{info, trace};
use std::collections::HashSet;
use std::time::Instant;

/// Maps every teaching day to its calendar date, Monday being `start_date`.
pub fn week_dates(start_date: NaiveDate) -> Result<Vec<(Day, NaiveDate)>> {
    Day::ALL
        .iter()
        .map(|&day| {
            start_date
                .checked_add_days(Days::new(day.index() as u64))
                .map(|date| (day, date))
                .ok_or(ScheduleError::DateOutOfRange(start_date))
        })
        .collect()
}

/// Builds a weekly timetable with the first-fit greedy allocator.
///
/// Slots that no pair can fill stay empty and are listed in
/// `Generated::unfilled_slots`; the only errors are malformed inputs.
pub fn generate<P: RoomPicker + ?Sized>(
    tables: &EntityTables,
    start_date: NaiveDate,
    policy: PairingPolicy,
    picker: &mut P,
) -> Result<Generated> {
    let start_time = Instant::now();
    let week = week_dates(start_date)?;
    let pairs = build_pairs(&tables.subjects, &tables.teachers, policy)?;

    info!(
        "Allocating {} groups over {} days x {} timeslots with {} subject/teacher pairs and {} rooms...",
        tables.groups.len(),
        week.len(),
        TimeSlot::ALL.len(),
        pairs.len(),
        tables.rooms.len()
    );

    let (assignments, unfilled_slots) = if tables.groups.is_empty() || pairs.is_empty() {
        (Vec::new(), every_slot_unfilled(tables, &week))
    } else {
        if tables.rooms.is_empty() {
            return Err(ScheduleError::EmptyTable("rooms"));
        }
        let mut rotation = InstitutionRotation::new(tables.institutions.clone())?;
        allocate(tables, &pairs, &week, &mut rotation, picker)?
    };

    let stats = GenerationStats {
        groups: tables.groups.len(),
        attempted_slots: tables.groups.len() * week.len() * TimeSlot::ALL.len(),
        filled_slots: assignments.len(),
        unfilled_slots: unfilled_slots.len(),
        elapsed_ms: start_time.elapsed().as_millis() as u64,
    };
    info!(
        "Schedule generated in {:.2?}: {} assignments, {} empty slots.",
        start_time.elapsed(),
        stats.filled_slots,
        stats.unfilled_slots
    );

    Ok(Generated {
        assignments,
        unfilled_slots,
        stats,
    })
}

/// Core greedy pass over groups × days × timeslots × pairs.
///
/// Every pair that is not skipped draws a room and advances the institution
/// rotation, whether or not it ends up booked. A group's used-subject set is
/// cleared only once it covers every distinct subject of the subject table.
pub fn allocate<P: RoomPicker + ?Sized>(
    tables: &EntityTables,
    pairs: &[SubjectTeacherPair],
    week: &[(Day, NaiveDate)],
    rotation: &mut InstitutionRotation,
    picker: &mut P,
) -> Result<(Schedule, Vec<UnfilledSlot>)> {
    let distinct_subjects = tables.subjects.iter().unique().count();
    let mut schedule: Schedule = Vec::new();
    let mut unfilled = Vec::new();

    for group in &tables.groups {
        let mut used_subjects: HashSet<&Subject> = HashSet::new();

        for &(day, date) in week {
            for timeslot in TimeSlot::ALL {
                let mut placed = false;

                for pair in pairs {
                    if used_subjects.contains(&pair.subject) {
                        continue;
                    }
                    let room = picker
                        .pick(&tables.rooms)
                        .ok_or(ScheduleError::EmptyTable("rooms"))?;
                    let institution = rotation.advance();

                    if is_available(&schedule, day, timeslot, group, &pair.teacher, room) {
                        trace!(
                            "{} {} {}: {} with {} in {} ({})",
                            group, day, timeslot, pair.subject, pair.teacher, room, institution
                        );
                        schedule.push(Assignment {
                            institution,
                            group: group.clone(),
                            date,
                            day,
                            timeslot,
                            subject: pair.subject.clone(),
                            teacher: pair.teacher.clone(),
                            room: room.clone(),
                        });
                        used_subjects.insert(&pair.subject);
                        placed = true;
                        break;
                    }
                }

                if !placed {
                    let slot = UnfilledSlot {
                        group: group.clone(),
                        day,
                        timeslot,
                    };
                    trace!("Left empty: {slot}");
                    unfilled.push(slot);
                }

                if used_subjects.len() == distinct_subjects {
                    used_subjects.clear();
                }
            }
        }
    }

    Ok((schedule, unfilled))
}

fn every_slot_unfilled(tables: &EntityTables, week: &[(Day, NaiveDate)]) -> Vec<UnfilledSlot> {
    tables
        .groups
        .iter()
        .cartesian_product(week.iter())
        .cartesian_product(TimeSlot::ALL)
        .map(|((group, &(day, _)), timeslot)| UnfilledSlot {
            group: group.clone(),
            day,
            timeslot,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Group, Institution, Room, Teacher};
    use crate::rotation::RandomRooms;
    use crate::validator::validate;

    fn tables(
        groups: &[&str],
        rooms: &[&str],
        subjects: &[&str],
        teachers: &[&str],
        institutions: &[&str],
    ) -> EntityTables {
        EntityTables {
            groups: groups.iter().map(|s| Group::from(*s)).collect(),
            rooms: rooms.iter().map(|s| Room::from(*s)).collect(),
            subjects: subjects.iter().map(|s| Subject::from(*s)).collect(),
            teachers: teachers.iter().map(|s| Teacher::from(*s)).collect(),
            institutions: institutions.iter().map(|s| Institution::from(*s)).collect(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_dates_start_on_monday() {
        let week = week_dates(date(2024, 12, 1)).unwrap();
        assert_eq!(week.len(), 5);
        assert_eq!(week[0], (Day::Monday, date(2024, 12, 1)));
        assert_eq!(week[4], (Day::Friday, date(2024, 12, 5)));
    }

    #[test]
    fn test_week_dates_cross_month_end() {
        let week = week_dates(date(2025, 2, 27)).unwrap();
        assert_eq!(week[2], (Day::Wednesday, date(2025, 3, 1)));
    }

    #[test]
    fn test_week_dates_overflow() {
        assert!(matches!(
            week_dates(NaiveDate::MAX),
            Err(ScheduleError::DateOutOfRange(_))
        ));
    }

    #[test]
    fn test_single_group_alternates_subjects() {
        let input = tables(&["G1"], &["R1", "R2"], &["Math", "Phys"], &["Tm", "Tp"], &["Uni1"]);
        let out = generate(
            &input,
            date(2024, 12, 1),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(42),
        )
        .unwrap();

        assert_eq!(out.assignments.len(), 20);
        assert!(out.unfilled_slots.is_empty());
        for (i, a) in out.assignments.iter().enumerate() {
            let expected = if i % 2 == 0 { ("Math", "Tm") } else { ("Phys", "Tp") };
            assert_eq!((a.subject.as_str(), a.teacher.as_str()), expected);
            assert_eq!(a.institution.as_str(), "Uni1");
            assert!(a.room.as_str() == "R1" || a.room.as_str() == "R2");
        }
        assert_eq!(out.assignments[0].date, date(2024, 12, 1));
        assert_eq!(out.assignments[19].day, Day::Friday);
        assert_eq!(out.assignments[19].timeslot, TimeSlot::Fourth);
        assert_eq!(out.assignments[19].date, date(2024, 12, 5));
    }

    #[test]
    fn test_institutions_rotate_across_days() {
        let input = tables(
            &["G1"],
            &["R1"],
            &["S1", "S2", "S3"],
            &["T1", "T2", "T3"],
            &["A", "B", "C"],
        );
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Strict,
            &mut RandomRooms::seeded(3),
        )
        .unwrap();

        let names = ["A", "B", "C"];
        assert_eq!(out.assignments.len(), 20);
        for (k, a) in out.assignments.iter().enumerate() {
            assert_eq!(a.institution.as_str(), names[k % 3]);
        }
    }

    #[test]
    fn test_subject_repeats_only_after_cycle_resets() {
        let input = tables(
            &["G1"],
            &["R1", "R2", "R3"],
            &["S1", "S2", "S3"],
            &["T1", "T2", "T3"],
            &["U"],
        );
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(11),
        )
        .unwrap();

        // Resets happen after every third slot, so the cycle spans day boundaries.
        for chunk in out.assignments.chunks(3) {
            let subjects: HashSet<&str> = chunk.iter().map(|a| a.subject.as_str()).collect();
            assert_eq!(subjects.len(), chunk.len());
        }
        assert_eq!(out.assignments[3].day, Day::Monday);
        assert_eq!(out.assignments[3].subject.as_str(), "S1");
        assert_eq!(out.assignments[4].day, Day::Tuesday);
        assert_eq!(out.assignments[4].subject.as_str(), "S2");
    }

    #[test]
    fn test_truncated_subjects_block_reset() {
        let input = tables(&["G1"], &["R1"], &["S1", "S2", "S3"], &["T1", "T2"], &["U"]);
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(5),
        )
        .unwrap();

        assert_eq!(out.assignments.len(), 2);
        assert_eq!(out.unfilled_slots.len(), 18);
        assert_eq!(out.unfilled_slots[0].day, Day::Monday);
        assert_eq!(out.unfilled_slots[0].timeslot, TimeSlot::Third);
    }

    #[test]
    fn test_busy_teacher_leaves_slots_empty() {
        let input = tables(&["G1", "G2"], &["R1", "R2", "R3"], &["Math"], &["Tm"], &["U"]);
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(9),
        )
        .unwrap();

        assert_eq!(out.assignments.len(), 20);
        assert!(out.assignments.iter().all(|a| a.group.as_str() == "G1"));
        assert_eq!(out.unfilled_slots.len(), 20);
        assert!(out.unfilled_slots.iter().all(|s| s.group.as_str() == "G2"));
        assert_eq!(out.stats.attempted_slots, 40);
        assert_eq!(out.stats.filled_slots, 20);
        assert_eq!(out.stats.unfilled_slots, 20);
    }

    #[test]
    fn test_single_room_is_never_double_booked() {
        let input = tables(&["G1", "G2"], &["R1"], &["A", "B"], &["Ta", "Tb"], &["U"]);
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(1),
        )
        .unwrap();

        assert_eq!(out.assignments.len(), 20);
        assert_eq!(out.unfilled_slots.len(), 20);
        assert!(validate(&out.assignments).is_ok());
    }

    #[test]
    fn test_failed_attempts_still_advance_rotation() {
        let input = tables(&["G1", "G2"], &["R1"], &["A", "B"], &["Ta", "Tb"], &["X", "Y", "Z"]);
        let week = week_dates(date(2024, 12, 2)).unwrap();
        let pairs = build_pairs(&input.subjects, &input.teachers, PairingPolicy::Strict).unwrap();
        let mut rotation = InstitutionRotation::new(input.institutions.clone()).unwrap();

        allocate(&input, &pairs, &week, &mut rotation, &mut RandomRooms::seeded(0)).unwrap();

        // 20 successful attempts for G1, then both pairs fail in each of G2's 20 slots.
        let attempts = 20 + 2 * 20;
        let expected = ["X", "Y", "Z"][attempts % 3];
        assert_eq!(rotation.advance().as_str(), expected);
    }

    #[test]
    fn test_generated_schedules_validate() {
        let input = tables(
            &["G1", "G2", "G3", "G4"],
            &["R1", "R2", "R3", "R4", "R5", "R6"],
            &["Math", "Phys", "Chem", "Bio", "Hist"],
            &["T1", "T2", "T3", "T4", "T5"],
            &["Uni1", "Uni2"],
        );
        for seed in 0..25 {
            let out = generate(
                &input,
                date(2024, 12, 2),
                PairingPolicy::Strict,
                &mut RandomRooms::seeded(seed),
            )
            .unwrap();
            assert!(validate(&out.assignments).is_ok(), "seed {seed}");
            assert_eq!(
                out.assignments.len() + out.unfilled_slots.len(),
                out.stats.attempted_slots
            );
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let input = tables(
            &["G1", "G2"],
            &["R1", "R2", "R3"],
            &["Math", "Phys"],
            &["Tm", "Tp"],
            &["Uni1"],
        );
        let run = |seed| {
            generate(
                &input,
                date(2024, 12, 2),
                PairingPolicy::Truncate,
                &mut RandomRooms::seeded(seed),
            )
            .unwrap()
            .assignments
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn test_empty_groups_need_no_rooms() {
        let input = tables(&[], &[], &["Math"], &["Tm"], &[]);
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(0),
        )
        .unwrap();
        assert!(out.assignments.is_empty());
        assert!(out.unfilled_slots.is_empty());
    }

    #[test]
    fn test_no_pairs_leaves_every_slot_empty() {
        let input = tables(&["G1"], &["R1"], &[], &["Tm"], &["U"]);
        let out = generate(
            &input,
            date(2024, 12, 2),
            PairingPolicy::Truncate,
            &mut RandomRooms::seeded(0),
        )
        .unwrap();
        assert!(out.assignments.is_empty());
        assert_eq!(out.unfilled_slots.len(), 20);
    }

    #[test]
    fn test_missing_rooms_or_institutions_are_errors() {
        let no_rooms = tables(&["G1"], &[], &["Math"], &["Tm"], &["U"]);
        assert!(matches!(
            generate(&no_rooms, date(2024, 12, 2), PairingPolicy::Truncate, &mut RandomRooms::seeded(0)),
            Err(ScheduleError::EmptyTable("rooms"))
        ));

        let no_institutions = tables(&["G1"], &["R1"], &["Math"], &["Tm"], &[]);
        assert!(matches!(
            generate(
                &no_institutions,
                date(2024, 12, 2),
                PairingPolicy::Truncate,
                &mut RandomRooms::seeded(0)
            ),
            Err(ScheduleError::EmptyTable("institutions"))
        ));
    }
}
