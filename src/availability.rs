use crate::data::{Assignment, Day, Group, Room, Teacher, TimeSlot};

/// Checks that neither the group, the teacher nor the room is already booked
/// at this (day, timeslot).
///
/// Linear in the schedule length; the schedule never exceeds
/// groups × 5 days × 4 slots entries.
pub fn is_available(
    schedule: &[Assignment],
    day: Day,
    timeslot: TimeSlot,
    group: &Group,
    teacher: &Teacher,
    room: &Room,
) -> bool {
    !schedule.iter().any(|entry| {
        entry.day == day
            && entry.timeslot == timeslot
            && (entry.group == *group || entry.teacher == *teacher || entry.room == *room)
    })
}
