//! Platform entity.

use super::{Axis, Placeable};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Gameplay behaviour of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    #[default]
    Solid,
    Bounce,
    Crumble,
    Moving,
    Spike,
    Phase,
    Conveyor,
    Ice,
}

impl PlatformKind {
    /// All kinds in palette order.
    pub const ALL: [PlatformKind; 8] = [
        PlatformKind::Solid,
        PlatformKind::Bounce,
        PlatformKind::Crumble,
        PlatformKind::Moving,
        PlatformKind::Spike,
        PlatformKind::Phase,
        PlatformKind::Conveyor,
        PlatformKind::Ice,
    ];

    /// Cycle to the next kind.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Oscillation of a moving platform around its placed position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovePattern {
    pub axis: Axis,
    /// Travel distance in world units.
    pub distance: f64,
    /// Seconds for a full back-and-forth cycle.
    pub period: f64,
}

impl Default for MovePattern {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            distance: 100.0,
            period: 2.0,
        }
    }
}

/// An axis-aligned platform. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub kind: PlatformKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_pattern: Option<MovePattern>,
    /// Beat offset for phase platforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_offset: Option<f64>,
}

impl Platform {
    /// Create a platform of the given kind.
    pub fn new(origin: Point, width: f64, height: f64, kind: PlatformKind) -> Self {
        let mut platform = Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
            kind: PlatformKind::Solid,
            move_pattern: None,
            phase_offset: None,
        };
        platform.set_kind(kind);
        platform
    }

    /// Change the kind, filling in the parameters the new kind needs.
    pub fn set_kind(&mut self, kind: PlatformKind) {
        self.kind = kind;
        match kind {
            PlatformKind::Moving => {
                self.move_pattern.get_or_insert_with(MovePattern::default);
            }
            PlatformKind::Phase => {
                self.phase_offset.get_or_insert(0.0);
            }
            _ => {}
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl Placeable for Platform {
    fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        let rect = self.as_rect();
        point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
    }
}
