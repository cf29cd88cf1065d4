//! Box and room state model.
//!
//! A [`Room`] owns `box_count` ticket boxes arranged in one uniformly random
//! permutation of `1..=box_count`. Indices are 1-based at the API boundary,
//! matching the riddle's statement; only this module translates to vector
//! offsets. The room is the single enforcement point for the already-opened
//! invariant — [`TicketBox::open`] itself stays idempotent on its flag.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::error::SimError;

/// One box: a hidden ticket value and an open/sealed flag.
///
/// The value is fixed at construction; only the flag ever changes.
#[derive(Clone, Debug)]
pub struct TicketBox {
    value: u32,
    opened: bool,
}

impl TicketBox {
    /// Create a sealed box. Ticket values start at 1; zero is rejected.
    pub fn new(value: u32) -> Result<Self, SimError> {
        if value == 0 {
            return Err(SimError::InvalidValue);
        }
        Ok(Self {
            value,
            opened: false,
        })
    }

    /// Open the box, revealing its ticket. Idempotent on the flag.
    pub fn open(&mut self) -> u32 {
        self.opened = true;
        self.value
    }

    /// Seal the box again.
    pub fn reseal(&mut self) {
        self.opened = false;
    }

    /// Whether the box is currently open.
    pub fn is_opened(&self) -> bool {
        self.opened
    }
}

/// The room: `box_count` boxes in one random permutation, indexed `1..=box_count`.
#[derive(Clone, Debug)]
pub struct Room {
    boxes: Vec<TicketBox>,
}

impl Room {
    /// Create a room whose boxes hold a uniformly random permutation of
    /// `1..=box_count`, drawn from the injected RNG.
    pub fn shuffled(box_count: u32, rng: &mut SmallRng) -> Self {
        let mut values: Vec<u32> = (1..=box_count).collect();
        values.shuffle(rng);
        let boxes = values
            .into_iter()
            .map(|value| TicketBox {
                value,
                opened: false,
            })
            .collect();
        Self { boxes }
    }

    /// Fixture constructor: box `i` (1-based) holds `values[i - 1]`.
    ///
    /// Fails with [`SimError::InvalidValue`] unless `values` is a permutation
    /// of `1..=values.len()`.
    pub fn with_layout(values: Vec<u32>) -> Result<Self, SimError> {
        let n = values.len() as u32;
        let mut seen = vec![false; values.len()];
        for &v in &values {
            if v == 0 || v > n || seen[(v - 1) as usize] {
                return Err(SimError::InvalidValue);
            }
            seen[(v - 1) as usize] = true;
        }
        let boxes = values
            .into_iter()
            .map(TicketBox::new)
            .collect::<Result<_, _>>()?;
        Ok(Self { boxes })
    }

    /// Number of boxes in the room.
    pub fn box_count(&self) -> u32 {
        self.boxes.len() as u32
    }

    /// Reseal every box.
    pub fn close_all(&mut self) {
        for b in &mut self.boxes {
            b.reseal();
        }
    }

    /// Number of currently open boxes.
    pub fn count_opened(&self) -> usize {
        self.boxes.iter().filter(|b| b.opened).count()
    }

    /// 1-based indices of sealed boxes, in ascending order.
    pub fn unopened_indices(&self) -> Vec<u32> {
        self.boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.opened)
            .map(|(i, _)| i as u32 + 1)
            .collect()
    }

    /// Open the box at the 1-based `index`, returning its ticket.
    ///
    /// Fails with [`SimError::IndexOutOfRange`] outside `1..=box_count` and
    /// [`SimError::AlreadyOpened`] when the target box is open; neither
    /// failure changes any box state.
    pub fn open(&mut self, index: u32) -> Result<u32, SimError> {
        if index == 0 || index > self.box_count() {
            return Err(SimError::IndexOutOfRange {
                index,
                box_count: self.box_count(),
            });
        }
        let b = &mut self.boxes[(index - 1) as usize];
        if b.opened {
            return Err(SimError::AlreadyOpened { index });
        }
        Ok(b.open())
    }
}
