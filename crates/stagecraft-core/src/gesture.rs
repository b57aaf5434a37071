//! Gesture recognition: turns raw pointer events into semantic gestures.
//!
//! [`GestureRecognizer`] is a stateful processor. Each raw [`PointerEvent`]
//! yields zero or more [`GestureEvent`]s in order; the single consumer is
//! whoever calls [`GestureRecognizer::process`]. Long-press detection is
//! timer driven, so hosts also call [`GestureRecognizer::tick`] with the
//! current time (or just keep feeding events, which fire due timers first).
//!
//! # Sessions
//!
//! - One contact: tap / double-tap / long-press / drag.
//! - Two contacts: pinch and two-pointer pan, emitted side by side from the
//!   same samples.
//! - After a two-contact session ends, leftover contacts are drained
//!   silently until every pointer is up.
//!
//! # Invariants
//!
//! 1. Drag and tap never both emit for the same contact. Once movement
//!    reaches the tap threshold the long-press timer is cancelled.
//! 2. A successful double-tap clears the remembered tap, so a third quick
//!    tap is a plain `Tap`.
//! 3. A drag interrupted by a second contact or a cancel ends with
//!    `DragCancel`, never `DragEnd`.

use crate::config::GestureConfig;
use crate::input::{PointerEvent, PointerId, PointerTracker};
use crate::timer::{TimerId, TimerQueue};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A semantic gesture in screen coordinates. Velocities are px/second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum GestureEvent {
    Tap { position: Point },
    DoubleTap { position: Point },
    LongPress { position: Point },
    /// Anchored at the contact-down position.
    DragStart { position: Point },
    /// `delta` is the movement since the previous sample.
    Drag {
        position: Point,
        delta: Vec2,
        velocity: Vec2,
    },
    DragEnd { position: Point, velocity: Vec2 },
    /// The drag was aborted; consumers should roll back its effects.
    DragCancel { position: Point },
    PinchStart { center: Point, scale: f64 },
    /// `scale` is relative to the distance at `PinchStart`.
    Pinch { center: Point, scale: f64 },
    PinchEnd { center: Point, scale: f64 },
    PanStart { center: Point },
    Pan {
        center: Point,
        delta: Vec2,
        velocity: Vec2,
    },
    PanEnd { center: Point, velocity: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureTimer {
    LongPress,
}

#[derive(Debug, Clone)]
struct SingleContact {
    id: PointerId,
    start: Point,
    start_time: Duration,
    last: Point,
    last_time: Duration,
    velocity: Vec2,
    dragging: bool,
    long_press_fired: bool,
    long_press_timer: Option<TimerId>,
}

#[derive(Debug, Clone)]
struct TwoContacts {
    ids: (PointerId, PointerId),
    initial_distance: f64,
    scale: f64,
    center: Point,
    last_time: Duration,
    velocity: Vec2,
}

impl TwoContacts {
    fn involves(&self, id: PointerId) -> bool {
        self.ids.0 == id || self.ids.1 == id
    }
}

#[derive(Debug, Clone, Default)]
enum Session {
    #[default]
    Idle,
    Single(SingleContact),
    Dual(TwoContacts),
    Draining,
}

#[derive(Debug, Clone, Copy)]
struct TapRecord {
    position: Point,
    released: Duration,
}

/// Velocity of `delta` over `dt`, or `previous` when no time elapsed.
fn velocity(delta: Vec2, dt: Duration, previous: Vec2) -> Vec2 {
    let secs = dt.as_secs_f64();
    if secs > 0.0 { delta / secs } else { previous }
}

/// Stateful recognizer converting pointer streams into [`GestureEvent`]s.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    tracker: PointerTracker,
    timers: TimerQueue<GestureTimer>,
    session: Session,
    last_tap: Option<TapRecord>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    /// Create a recognizer with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            tracker: PointerTracker::new(),
            timers: TimerQueue::new(),
            session: Session::Idle,
            last_tap: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Live contacts.
    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    /// Whether a single-pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(&self.session, Session::Single(s) if s.dragging)
    }

    /// Whether a two-pointer pinch/pan session is in progress.
    pub fn is_pinching(&self) -> bool {
        matches!(self.session, Session::Dual(_))
    }

    /// When the host should next call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Process a raw event, returning the gestures it produces in order.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<GestureEvent> {
        let mut out = Vec::with_capacity(2);
        self.fire_timers(event.time(), &mut out);

        match *event {
            PointerEvent::Down { id, position, time } => self.on_down(id, position, time, &mut out),
            PointerEvent::Move { id, position, time } => self.on_move(id, position, time, &mut out),
            PointerEvent::Up { id, position, time } => self.on_up(id, position, time, &mut out),
            PointerEvent::Cancel { id, .. } => self.on_cancel(id, &mut out),
        }

        out
    }

    /// Fire timers due at or before `now`.
    pub fn tick(&mut self, now: Duration) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        self.fire_timers(now, &mut out);
        out
    }

    /// Drop all contacts, timers and tap memory without emitting anything.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.timers.cancel_all();
        self.session = Session::Idle;
        self.last_tap = None;
    }

    fn fire_timers(&mut self, now: Duration, out: &mut Vec<GestureEvent>) {
        for (id, timer) in self.timers.pop_expired(now) {
            match timer {
                GestureTimer::LongPress => {
                    if let Session::Single(single) = &mut self.session {
                        if single.long_press_timer == Some(id) && !single.dragging {
                            single.long_press_timer = None;
                            single.long_press_fired = true;
                            log::debug!("long press at {:?}", single.last);
                            out.push(GestureEvent::LongPress { position: single.last });
                        }
                    }
                }
            }
        }
    }

    fn on_down(&mut self, id: PointerId, position: Point, time: Duration, out: &mut Vec<GestureEvent>) {
        if self.tracker.contains(id) {
            // Duplicate down without an up; keep the existing contact.
            return;
        }
        self.tracker.on_contact_down(id, position, time);

        self.session = match std::mem::take(&mut self.session) {
            Session::Idle => {
                let timer = self
                    .timers
                    .schedule(GestureTimer::LongPress, time + self.config.long_press_delay());
                Session::Single(SingleContact {
                    id,
                    start: position,
                    start_time: time,
                    last: position,
                    last_time: time,
                    velocity: Vec2::ZERO,
                    dragging: false,
                    long_press_fired: false,
                    long_press_timer: Some(timer),
                })
            }
            Session::Single(single) => {
                if let Some(timer) = single.long_press_timer {
                    self.timers.cancel(timer);
                }
                if single.dragging {
                    out.push(GestureEvent::DragCancel { position: single.last });
                }
                self.start_two_contacts(single.id, id, time, out)
            }
            other => other,
        };
    }

    fn start_two_contacts(
        &mut self,
        first: PointerId,
        second: PointerId,
        time: Duration,
        out: &mut Vec<GestureEvent>,
    ) -> Session {
        let (Some(a), Some(b)) = (self.tracker.get(first), self.tracker.get(second)) else {
            return Session::Draining;
        };
        let center = a.position.midpoint(b.position);
        let initial_distance = a.position.distance(b.position);

        out.push(GestureEvent::PinchStart { center, scale: 1.0 });
        out.push(GestureEvent::PanStart { center });

        Session::Dual(TwoContacts {
            ids: (first, second),
            initial_distance,
            scale: 1.0,
            center,
            last_time: time,
            velocity: Vec2::ZERO,
        })
    }

    fn on_move(&mut self, id: PointerId, position: Point, time: Duration, out: &mut Vec<GestureEvent>) {
        if !self.tracker.on_contact_move(id, position) {
            return;
        }

        match &mut self.session {
            Session::Single(single) if single.id == id => {
                let delta = position - single.last;
                single.velocity = velocity(delta, time.saturating_sub(single.last_time), single.velocity);

                if !single.dragging
                    && !single.long_press_fired
                    && position.distance(single.start) >= self.config.tap_max_movement
                {
                    if let Some(timer) = single.long_press_timer.take() {
                        self.timers.cancel(timer);
                    }
                    single.dragging = true;
                    out.push(GestureEvent::DragStart { position: single.start });
                }

                if single.dragging {
                    out.push(GestureEvent::Drag {
                        position,
                        delta,
                        velocity: single.velocity,
                    });
                }

                single.last = position;
                single.last_time = time;
            }
            Session::Dual(dual) if dual.involves(id) => {
                let (Some(a), Some(b)) = (self.tracker.get(dual.ids.0), self.tracker.get(dual.ids.1)) else {
                    return;
                };
                let distance = a.position.distance(b.position);
                let center = a.position.midpoint(b.position);

                dual.scale = if dual.initial_distance > f64::EPSILON {
                    distance / dual.initial_distance
                } else {
                    1.0
                };
                let delta = center - dual.center;
                dual.velocity = velocity(delta, time.saturating_sub(dual.last_time), dual.velocity);
                dual.center = center;
                dual.last_time = time;

                out.push(GestureEvent::Pinch {
                    center,
                    scale: dual.scale,
                });
                out.push(GestureEvent::Pan {
                    center,
                    delta,
                    velocity: dual.velocity,
                });
            }
            _ => {}
        }
    }

    fn on_up(&mut self, id: PointerId, position: Point, time: Duration, out: &mut Vec<GestureEvent>) {
        if self.tracker.on_contact_up(id).is_none() {
            return;
        }

        self.session = match std::mem::take(&mut self.session) {
            Session::Single(single) if single.id == id => {
                if let Some(timer) = single.long_press_timer {
                    self.timers.cancel(timer);
                }
                if single.dragging {
                    let delta = position - single.last;
                    let velocity = if delta.hypot() > 0.0 {
                        velocity(delta, time.saturating_sub(single.last_time), single.velocity)
                    } else {
                        single.velocity
                    };
                    out.push(GestureEvent::DragEnd { position, velocity });
                } else if !single.long_press_fired
                    && position.distance(single.start) < self.config.tap_max_movement
                    && time.saturating_sub(single.start_time) <= self.config.tap_max_duration()
                {
                    self.emit_tap(single.start, single.start_time, time, out);
                }
                self.idle_or_draining()
            }
            Session::Dual(dual) if dual.involves(id) => {
                out.push(GestureEvent::PinchEnd {
                    center: dual.center,
                    scale: dual.scale,
                });
                out.push(GestureEvent::PanEnd {
                    center: dual.center,
                    velocity: dual.velocity,
                });
                self.idle_or_draining()
            }
            Session::Draining => self.idle_or_draining(),
            other => other,
        };
    }

    fn on_cancel(&mut self, id: PointerId, out: &mut Vec<GestureEvent>) {
        if self.tracker.on_contact_up(id).is_none() {
            return;
        }

        self.session = match std::mem::take(&mut self.session) {
            Session::Single(single) if single.id == id => {
                if let Some(timer) = single.long_press_timer {
                    self.timers.cancel(timer);
                }
                if single.dragging {
                    out.push(GestureEvent::DragCancel { position: single.last });
                }
                self.idle_or_draining()
            }
            Session::Dual(dual) if dual.involves(id) => {
                out.push(GestureEvent::PinchEnd {
                    center: dual.center,
                    scale: dual.scale,
                });
                out.push(GestureEvent::PanEnd {
                    center: dual.center,
                    velocity: dual.velocity,
                });
                self.idle_or_draining()
            }
            Session::Draining => self.idle_or_draining(),
            other => other,
        };
    }

    fn idle_or_draining(&self) -> Session {
        if self.tracker.active_count() == 0 {
            Session::Idle
        } else {
            Session::Draining
        }
    }

    fn emit_tap(&mut self, position: Point, pressed: Duration, released: Duration, out: &mut Vec<GestureEvent>) {
        let is_double = self.last_tap.is_some_and(|prev| {
            pressed >= prev.released
                && pressed - prev.released <= self.config.double_tap_window()
                && position.distance(prev.position) <= self.config.double_tap_max_distance
        });

        if is_double {
            // Forget the pair so a third quick tap starts over.
            self.last_tap = None;
            out.push(GestureEvent::DoubleTap { position });
        } else {
            self.last_tap = Some(TapRecord { position, released });
            out.push(GestureEvent::Tap { position });
        }
    }
}
