//! Retractable spike rows on the side walls

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::effects::{Effect, Effects};
use crate::tuning::Tuning;

/// One of the two spiked side walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    pub const BOTH: [WallSide; 2] = [WallSide::Left, WallSide::Right];

    pub fn opposite(self) -> Self {
        match self {
            WallSide::Left => WallSide::Right,
            WallSide::Right => WallSide::Left,
        }
    }
}

/// A single spike slot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpikeSlot {
    pub active: bool,
    /// Animation progress: 0 = retracted out of the field, 1 = fully extended
    pub extension: f32,
}

/// The spike row on one wall
#[derive(Debug, Clone)]
pub struct WallSpikeSet {
    pub side: WallSide,
    slots: Vec<SpikeSlot>,
}

impl WallSpikeSet {
    /// Create a wall with every slot retracted
    pub fn new(side: WallSide, slot_count: usize) -> Self {
        Self {
            side,
            slots: vec![SpikeSlot::default(); slot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&SpikeSlot> {
        self.slots.get(index)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Indices of active slots, ascending
    pub fn active_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, _)| i)
            .collect()
    }

    /// Arm a slot and signal the extend animation.
    /// Returns false for out-of-range or already active slots.
    pub fn activate(&mut self, index: usize, effects: &mut Effects) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            log::warn!("Spike index {} out of range on {:?} wall", index, self.side);
            return false;
        };
        if slot.active {
            return false;
        }
        slot.active = true;
        effects.push(Effect::ExtendSpike {
            side: self.side,
            index,
        });
        true
    }

    /// Disarm every slot and signal the retract animation for the whole wall
    pub fn clear(&mut self, effects: &mut Effects) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        effects.push(Effect::RetractAllSpikes(self.side));
    }

    /// Uniformly random inactive slot, or `None` when every slot is armed
    pub fn pick_inactive_random<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        let inactive: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.active)
            .map(|(i, _)| i)
            .collect();
        if inactive.is_empty() {
            return None;
        }
        Some(inactive[rng.random_range(0..inactive.len())])
    }

    /// Advance extend/retract animations toward each slot's target
    pub fn advance(&mut self, dt: f32, motion_secs: f32) {
        for slot in &mut self.slots {
            let target = if slot.active { 1.0 } else { 0.0 };
            if motion_secs <= 0.0 {
                slot.extension = target;
                continue;
            }
            let step = dt / motion_secs;
            slot.extension = if slot.extension < target {
                (slot.extension + step).min(target)
            } else {
                (slot.extension - step).max(target)
            };
        }
    }

    /// Collidable region of a slot, or `None` while fully retracted
    pub fn slot_bounds(&self, index: usize, tuning: &Tuning) -> Option<Aabb> {
        let slot = self.slots.get(index)?;
        if slot.extension <= 0.0 {
            return None;
        }
        let reach = tuning.spike_depth * slot.extension;
        let y = tuning.slot_y(index);
        let (x_min, x_max) = match self.side {
            WallSide::Left => (0.0, reach),
            WallSide::Right => (tuning.field_width - reach, tuning.field_width),
        };
        Some(Aabb::new(
            glam::Vec2::new(x_min, y),
            glam::Vec2::new(x_max, y + tuning.spike_height),
        ))
    }
}

/// Both spiked walls
#[derive(Debug, Clone)]
pub struct SpikeWalls {
    pub left: WallSpikeSet,
    pub right: WallSpikeSet,
}

impl SpikeWalls {
    pub fn new(slot_count: usize) -> Self {
        Self {
            left: WallSpikeSet::new(WallSide::Left, slot_count),
            right: WallSpikeSet::new(WallSide::Right, slot_count),
        }
    }

    pub fn wall(&self, side: WallSide) -> &WallSpikeSet {
        match side {
            WallSide::Left => &self.left,
            WallSide::Right => &self.right,
        }
    }

    pub fn wall_mut(&mut self, side: WallSide) -> &mut WallSpikeSet {
        match side {
            WallSide::Left => &mut self.left,
            WallSide::Right => &mut self.right,
        }
    }

    /// Wall sides that currently have at least one armed slot
    pub fn armed_sides(&self) -> Vec<WallSide> {
        WallSide::BOTH
            .into_iter()
            .filter(|&side| self.wall(side).active_count() > 0)
            .collect()
    }

    pub fn advance(&mut self, dt: f32, motion_secs: f32) {
        self.left.advance(dt, motion_secs);
        self.right.advance(dt, motion_secs);
    }
}
