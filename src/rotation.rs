//! Sources the allocator draws from on every candidate attempt: a room
//! picker and the institution rotation.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{Institution, Room};
use crate::error::{Result, ScheduleError};

/// Chooses the room offered to a candidate pair.
pub trait RoomPicker {
    fn pick<'a>(&mut self, rooms: &'a [Room]) -> Option<&'a Room>;
}

/// Uniform random room selection over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomRooms<R> {
    rng: R,
}

impl<R: Rng> RandomRooms<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomRooms<StdRng> {
    /// Reproducible picker; the same seed yields the same room sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Seeded when a seed is given, OS entropy otherwise.
    pub fn with_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os_rng(),
        }
    }
}

impl<R: Rng> RoomPicker for RandomRooms<R> {
    fn pick<'a>(&mut self, rooms: &'a [Room]) -> Option<&'a Room> {
        rooms.choose(&mut self.rng)
    }
}

/// Round-robin over the institution table, shared by every group and slot.
#[derive(Debug, Clone)]
pub struct InstitutionRotation {
    institutions: Vec<Institution>,
    next: usize,
}

impl InstitutionRotation {
    pub fn new(institutions: Vec<Institution>) -> Result<Self> {
        if institutions.is_empty() {
            return Err(ScheduleError::EmptyTable("institutions"));
        }
        Ok(Self {
            institutions,
            next: 0,
        })
    }

    /// Returns the institution at the front and moves it to the back.
    pub fn advance(&mut self) -> Institution {
        let institution = self.institutions[self.next].clone();
        self.next = (self.next + 1) % self.institutions.len();
        institution
    }
}
