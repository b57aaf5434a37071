//! Raw pointer input and live contact bookkeeping.
//!
//! Positions arrive in screen space, already corrected for device pixel
//! ratio by the input source. Mouse input is a single pointer with id
//! [`PointerId::MOUSE`] fed through the same events as touch contacts.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Identifier of one contact (finger, pen, or the mouse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The always-present mouse pointer.
    pub const MOUSE: PointerId = PointerId(0);
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Raw contact event delivered by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        id: PointerId,
        position: Point,
        time: Duration,
    },
    Move {
        id: PointerId,
        position: Point,
        time: Duration,
    },
    Up {
        id: PointerId,
        position: Point,
        time: Duration,
    },
    Cancel {
        id: PointerId,
        time: Duration,
    },
}

impl PointerEvent {
    /// Timestamp of the event.
    pub fn time(&self) -> Duration {
        match *self {
            PointerEvent::Down { time, .. }
            | PointerEvent::Move { time, .. }
            | PointerEvent::Up { time, .. }
            | PointerEvent::Cancel { time, .. } => time,
        }
    }

    pub fn id(&self) -> PointerId {
        match *self {
            PointerEvent::Down { id, .. }
            | PointerEvent::Move { id, .. }
            | PointerEvent::Up { id, .. }
            | PointerEvent::Cancel { id, .. } => id,
        }
    }
}

/// One active contact point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    /// Current position.
    pub position: Point,
    /// Position at contact-down.
    pub start: Point,
    /// Time of contact-down.
    pub start_time: Duration,
}

impl PointerSample {
    /// Offset from the contact-down position.
    pub fn offset(&self) -> Vec2 {
        self.position - self.start
    }
}

/// Tracks the live set of active pointers.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    samples: BTreeMap<PointerId, PointerSample>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A contact went down. A repeated down for a live id restarts it.
    pub fn on_contact_down(&mut self, id: PointerId, position: Point, time: Duration) {
        self.samples.insert(
            id,
            PointerSample {
                id,
                position,
                start: position,
                start_time: time,
            },
        );
    }

    /// A live contact moved. Returns false for unknown ids (e.g. mouse hover).
    pub fn on_contact_move(&mut self, id: PointerId, position: Point) -> bool {
        match self.samples.get_mut(&id) {
            Some(sample) => {
                sample.position = position;
                true
            }
            None => false,
        }
    }

    /// A contact lifted or was cancelled.
    pub fn on_contact_up(&mut self, id: PointerId) -> Option<PointerSample> {
        self.samples.remove(&id)
    }

    pub fn active_count(&self) -> usize {
        self.samples.len()
    }

    pub fn get(&self, id: PointerId) -> Option<&PointerSample> {
        self.samples.get(&id)
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.samples.contains_key(&id)
    }

    /// Active samples ordered by pointer id.
    pub fn samples(&self) -> impl Iterator<Item = &PointerSample> {
        self.samples.values()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_down_move_up() {
        let mut tracker = PointerTracker::new();
        let id = PointerId(3);

        tracker.on_contact_down(id, Point::new(10.0, 20.0), ms(5));
        assert_eq!(tracker.active_count(), 1);

        assert!(tracker.on_contact_move(id, Point::new(15.0, 30.0)));
        let sample = tracker.get(id).unwrap();
        assert_eq!(sample.start, Point::new(10.0, 20.0));
        assert_eq!(sample.position, Point::new(15.0, 30.0));
        assert_eq!(sample.start_time, ms(5));
        assert_eq!(sample.offset(), Vec2::new(5.0, 10.0));

        let removed = tracker.on_contact_up(id).unwrap();
        assert_eq!(removed.position, Point::new(15.0, 30.0));
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_move_unknown_pointer_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert!(!tracker.on_contact_move(PointerId::MOUSE, Point::new(1.0, 1.0)));
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_samples_ordered_by_id() {
        let mut tracker = PointerTracker::new();
        tracker.on_contact_down(PointerId(7), Point::ZERO, ms(0));
        tracker.on_contact_down(PointerId(2), Point::ZERO, ms(1));

        let ids: Vec<_> = tracker.samples().map(|s| s.id).collect();
        assert_eq!(ids, vec![PointerId(2), PointerId(7)]);
    }

    #[test]
    fn test_event_accessors() {
        let event = PointerEvent::Cancel {
            id: PointerId(4),
            time: ms(42),
        };
        assert_eq!(event.id(), PointerId(4));
        assert_eq!(event.time(), ms(42));
    }
}
