//! Cancellable delayed actions
//!
//! Timers run on the simulation thread: they are advanced by the tick's `dt`
//! and hand back the actions that came due. Cancelling everything bumps the
//! generation, so handles from a previous session can never touch new timers.

use super::powerup::PowerUpKind;

/// Work to do when a timer elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedAction {
    /// A collected power-up's effect window is over
    EndPowerUp(PowerUpKind),
}

/// Handle to a scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    id: u64,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TimerId,
    remaining: f32,
    action: TimedAction,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Scheduled>,
    generation: u32,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` seconds of simulation time
    pub fn schedule(&mut self, delay: f32, action: TimedAction) -> TimerId {
        let handle = TimerId {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.pending.push(Scheduled {
            handle,
            remaining: delay.max(0.0),
            action,
        });
        handle
    }

    /// Drop every pending timer and invalidate outstanding handles
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance time and return the actions that came due, earliest first,
    /// each with the handle it was scheduled under
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerId, TimedAction)> {
        let generation = self.generation;
        let mut due = Vec::new();
        self.pending.retain_mut(|s| {
            if s.handle.generation != generation {
                return false;
            }
            s.remaining -= dt;
            if s.remaining <= 0.0 {
                due.push((s.remaining, s.handle, s.action));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        due.into_iter().map(|(_, handle, action)| (handle, action)).collect()
    }
}
