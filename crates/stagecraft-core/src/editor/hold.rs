//! Hold-to-repeat controls (tempo steppers, nudge arrows).
//!
//! Pressing applies the action once. While held it repeats after the hold
//! delay and then every hold interval. Releasing commits all repeats as a
//! single history step.

use super::{EditingEngine, EditorError};
use crate::level::{MAX_TEMPO, MIN_TEMPO};
use crate::timer::TimerQueue;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An action that repeats while its control is held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HoldAction {
    AdjustTempo { delta: i32 },
    Nudge { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Repeat {
    due: Duration,
}

#[derive(Debug, Clone, Copy)]
struct ActiveHold {
    action: HoldAction,
    repeats: u32,
    changed: bool,
}

#[derive(Debug, Clone, Default)]
pub(super) struct HoldState {
    active: Option<ActiveHold>,
    timers: TimerQueue<Repeat>,
}

impl HoldState {
    /// Drop the active hold without committing. Returns true if one was active.
    pub(super) fn abandon(&mut self) -> bool {
        self.timers.cancel_all();
        self.active.take().is_some()
    }
}

impl EditingEngine {
    /// Press a repeating control at time `now`.
    pub fn begin_hold(&mut self, action: HoldAction, now: Duration) -> Result<bool, EditorError> {
        if self.hold.active.is_some() {
            self.end_hold(now)?;
        }
        if self.is_interacting() {
            self.cancel_interaction()?;
        }
        let changed = self.apply_hold(action);
        let first = now + self.config.hold_delay();
        self.hold.timers.schedule(Repeat { due: first }, first);
        self.hold.active = Some(ActiveHold {
            action,
            repeats: 0,
            changed,
        });
        log::debug!("Hold started: {:?}", action);
        Ok(changed)
    }

    /// Fire repeats due at or before `now`. Returns whether the level changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let interval = self.config.hold_interval().max(Duration::from_millis(1));
        let mut changed = false;
        loop {
            let due = self.hold.timers.pop_expired(now);
            if due.is_empty() {
                break;
            }
            for (_, repeat) in due {
                let Some(action) = self.hold.active.map(|h| h.action) else {
                    continue;
                };
                let applied = self.apply_hold(action);
                if let Some(hold) = self.hold.active.as_mut() {
                    hold.changed |= applied;
                    hold.repeats += 1;
                }
                changed |= applied;
                let next = repeat.due + interval;
                self.hold.timers.schedule(Repeat { due: next }, next);
            }
        }
        changed
    }

    /// Release the held control, committing everything it changed at once.
    pub fn end_hold(&mut self, now: Duration) -> Result<bool, EditorError> {
        self.tick(now);
        self.settle_hold()
    }

    /// Stop repeating and commit what the active hold changed so far.
    pub(super) fn settle_hold(&mut self) -> Result<bool, EditorError> {
        self.hold.timers.cancel_all();
        let Some(hold) = self.hold.active.take() else {
            return Ok(false);
        };
        log::debug!("Hold released after {} repeat(s)", hold.repeats);
        if !hold.changed {
            return Ok(false);
        }
        if let Err(e) = self.commit("hold") {
            log::warn!("Hold rolled back: {}", e);
            self.restore_committed()?;
            return Err(e);
        }
        Ok(true)
    }

    pub fn is_holding(&self) -> bool {
        self.hold.active.is_some()
    }

    /// When the next repeat is due, for hosts that schedule wakeups.
    pub fn next_hold_deadline(&self) -> Option<Duration> {
        self.hold.timers.next_deadline()
    }

    /// Apply one step of a hold action to the live level.
    fn apply_hold(&mut self, action: HoldAction) -> bool {
        match action {
            HoldAction::AdjustTempo { delta } => {
                let tempo = (i64::from(self.level.tempo) + i64::from(delta))
                    .clamp(i64::from(MIN_TEMPO), i64::from(MAX_TEMPO)) as u32;
                let changed = tempo != self.level.tempo;
                self.level.tempo = tempo;
                changed
            }
            HoldAction::Nudge { dx, dy } => self.shift_selection(Vec2::new(dx, dy)),
        }
    }
}
