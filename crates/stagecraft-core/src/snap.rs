//! Grid snapping and neighbour alignment for dragged entities.

use crate::level::{Axis, EntityKind, Level, SelectedElement};
use kurbo::{Point, Rect, Size};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Distance within which neighbour edges attract a drag (world units).
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether X aligned to a neighbour rather than the grid.
    pub aligned_x: bool,
    /// Whether Y aligned to a neighbour rather than the grid.
    pub aligned_y: bool,
}

impl SnapResult {
    pub fn is_aligned(&self) -> bool {
        self.aligned_x || self.aligned_y
    }
}

/// Snap a coordinate to the nearest grid multiple.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size > 0.0 {
        (value / grid_size).round() * grid_size
    } else {
        value
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// An alignment line for the renderer. `axis` is the orientation of the
/// line: a vertical guide sits at `x = position` and spans `span_start..span_end` in Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub axis: Axis,
    pub position: f64,
    pub span_start: f64,
    pub span_end: f64,
}

/// The three reference lines of a box along one axis.
#[derive(Debug, Clone, Copy)]
struct Edges {
    low: f64,
    high: f64,
    center: f64,
}

impl Edges {
    fn along(rect: Rect, axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self {
                low: rect.x0,
                high: rect.x1,
                center: (rect.x0 + rect.x1) / 2.0,
            },
            Axis::Horizontal => Self {
                low: rect.y0,
                high: rect.y1,
                center: (rect.y0 + rect.y1) / 2.0,
            },
        }
    }

    /// Candidate (moving, target) pairs in priority order.
    fn pairs(&self, other: &Edges) -> [(f64, f64); 5] {
        [
            (self.low, other.low),
            (self.high, other.high),
            (self.low, other.high),
            (self.high, other.low),
            (self.center, other.center),
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisMatch {
    offset: f64,
    guide: Guide,
}

/// Computes snapped positions and the guides to draw for them.
#[derive(Debug, Clone)]
pub struct AlignmentEngine {
    pub grid_size: f64,
    pub threshold: f64,
    guides: Vec<Guide>,
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self::new(GRID_SIZE, SNAP_THRESHOLD)
    }
}

impl AlignmentEngine {
    pub fn new(grid_size: f64, threshold: f64) -> Self {
        Self {
            grid_size,
            threshold,
            guides: Vec::new(),
        }
    }

    /// Guides from the most recent move snap.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn clear_guides(&mut self) {
        self.guides.clear();
    }

    /// Snap a proposed origin for a single dragged element. Each axis aligns
    /// to the closest neighbour platform edge or centre within the
    /// threshold, otherwise to the grid.
    pub fn snap_move(&mut self, level: &Level, moving: SelectedElement, origin: Point) -> SnapResult {
        self.guides.clear();
        let (Some(current_origin), Some(current_bounds)) = (level.origin(moving), level.bounds(moving)) else {
            return SnapResult {
                point: snap_to_grid(origin, self.grid_size),
                aligned_x: false,
                aligned_y: false,
            };
        };
        let bounds = current_bounds + (origin - current_origin);

        let others: Vec<Rect> = level
            .platforms
            .iter()
            .enumerate()
            .filter(|(i, _)| !(moving.kind == EntityKind::Platform && moving.index == *i))
            .map(|(_, p)| p.as_rect())
            .collect();

        let x_match = self.best_match(bounds, &others, Axis::Vertical);
        let y_match = self.best_match(bounds, &others, Axis::Horizontal);

        let x = match x_match {
            Some(m) => {
                self.guides.push(m.guide);
                origin.x + m.offset
            }
            None => snap_value(origin.x, self.grid_size),
        };
        let y = match y_match {
            Some(m) => {
                self.guides.push(m.guide);
                origin.y + m.offset
            }
            None => snap_value(origin.y, self.grid_size),
        };

        SnapResult {
            point: Point::new(x, y),
            aligned_x: x_match.is_some(),
            aligned_y: y_match.is_some(),
        }
    }

    fn best_match(&self, bounds: Rect, others: &[Rect], axis: Axis) -> Option<AxisMatch> {
        let moving = Edges::along(bounds, axis);
        let mut best: Option<AxisMatch> = None;

        for other in others {
            let target = Edges::along(*other, axis);
            for (from, to) in moving.pairs(&target) {
                let offset = to - from;
                if offset.abs() > self.threshold {
                    continue;
                }
                if best.is_some_and(|b| b.offset.abs() <= offset.abs()) {
                    continue;
                }
                // The guide spans both boxes across the other axis
                let (span_start, span_end) = match axis {
                    Axis::Vertical => (bounds.y0.min(other.y0), bounds.y1.max(other.y1)),
                    Axis::Horizontal => (bounds.x0.min(other.x0), bounds.x1.max(other.x1)),
                };
                best = Some(AxisMatch {
                    offset,
                    guide: Guide {
                        axis,
                        position: to,
                        span_start,
                        span_end,
                    },
                });
            }
        }
        best
    }

    /// Snap a resize. Grid only; neighbour guides never apply to resizes.
    pub fn snap_resize(&mut self, origin: Point, pointer: Point, min_size: f64) -> Size {
        self.guides.clear();
        let width = snap_value(pointer.x - origin.x, self.grid_size).max(min_size);
        let height = snap_value(pointer.y - origin.y, self.grid_size).max(min_size);
        Size::new(width, height)
    }
}
