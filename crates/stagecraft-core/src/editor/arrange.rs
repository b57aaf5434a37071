//! Align, distribute and group selected platforms.

use super::{EditingEngine, EditorError};
use crate::level::{Axis, Level};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Edge or centre line to align platforms on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
    /// Horizontal centre of the selection bounds.
    Center,
    Top,
    Bottom,
    /// Vertical centre of the selection bounds.
    Middle,
}

/// Align platforms to the selection's extreme edge or centre. Needs at least
/// two valid platforms. Returns whether any platform moved.
pub fn align_platforms(level: &mut Level, indices: &[usize], alignment: Alignment) -> bool {
    let rects: Vec<_> = indices
        .iter()
        .filter_map(|&i| level.platforms.get(i).map(|p| (i, p.as_rect())))
        .collect();
    if rects.len() < 2 {
        return false;
    }
    let min_x = rects.iter().map(|(_, r)| r.x0).fold(f64::INFINITY, f64::min);
    let max_x = rects.iter().map(|(_, r)| r.x1).fold(f64::NEG_INFINITY, f64::max);
    let min_y = rects.iter().map(|(_, r)| r.y0).fold(f64::INFINITY, f64::min);
    let max_y = rects.iter().map(|(_, r)| r.y1).fold(f64::NEG_INFINITY, f64::max);

    let mut changed = false;
    for (index, rect) in rects {
        let platform = &mut level.platforms[index];
        let (x, y) = match alignment {
            Alignment::Left => (min_x, rect.y0),
            Alignment::Right => (max_x - rect.width(), rect.y0),
            Alignment::Center => ((min_x + max_x) / 2.0 - rect.width() / 2.0, rect.y0),
            Alignment::Top => (rect.x0, min_y),
            Alignment::Bottom => (rect.x0, max_y - rect.height()),
            Alignment::Middle => (rect.x0, (min_y + max_y) / 2.0 - rect.height() / 2.0),
        };
        if x != platform.x || y != platform.y {
            platform.x = x;
            platform.y = y;
            changed = true;
        }
    }
    changed
}

fn axis_start(rect: &Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => rect.x0,
        Axis::Vertical => rect.y0,
    }
}

fn axis_extent(rect: &Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => rect.width(),
        Axis::Vertical => rect.height(),
    }
}

/// Space platforms evenly along an axis, keeping the first and last in
/// place. Needs at least three valid platforms. Returns whether any moved.
pub fn distribute_platforms(level: &mut Level, indices: &[usize], axis: Axis) -> bool {
    let mut rects: Vec<_> = indices
        .iter()
        .filter_map(|&i| level.platforms.get(i).map(|p| (i, p.as_rect())))
        .collect();
    rects.dedup_by_key(|(i, _)| *i);
    if rects.len() < 3 {
        return false;
    }

    rects.sort_by(|(_, a), (_, b)| axis_start(a, axis).total_cmp(&axis_start(b, axis)));

    let first = rects[0].1;
    let last = rects[rects.len() - 1].1;
    let span = axis_start(&last, axis) + axis_extent(&last, axis) - axis_start(&first, axis);
    let total: f64 = rects.iter().map(|(_, r)| axis_extent(r, axis)).sum();
    let gap = (span - total) / (rects.len() - 1) as f64;

    let inner = rects.len() - 1;
    let mut cursor = axis_start(&first, axis);
    let mut changed = false;
    for (k, (index, rect)) in rects.into_iter().enumerate() {
        if k > 0 && k < inner {
            let platform = &mut level.platforms[index];
            let slot = match axis {
                Axis::Horizontal => &mut platform.x,
                Axis::Vertical => &mut platform.y,
            };
            if *slot != cursor {
                *slot = cursor;
                changed = true;
            }
        }
        cursor += axis_extent(&rect, axis) + gap;
    }
    changed
}

impl EditingEngine {
    pub fn align(&mut self, alignment: Alignment) -> Result<bool, EditorError> {
        let indices = self.selection.platform_indices();
        if indices.len() < 2 {
            log::debug!("Align needs two platforms, {} selected", indices.len());
            return Ok(false);
        }
        self.transact("align", |engine| {
            align_platforms(&mut engine.level, &indices, alignment)
        })
    }

    pub fn distribute(&mut self, axis: Axis) -> Result<bool, EditorError> {
        let indices = self.selection.platform_indices();
        if indices.len() < 3 {
            log::debug!("Distribute needs three platforms, {} selected", indices.len());
            return Ok(false);
        }
        self.transact("distribute", |engine| {
            distribute_platforms(&mut engine.level, &indices, axis)
        })
    }

    /// Group the selected platforms into one new group.
    pub fn group_selection(&mut self) -> Result<bool, EditorError> {
        let indices = self.selection.platform_indices();
        if indices.len() < 2 {
            return Ok(false);
        }
        self.transact("group", |engine| engine.level.group(&indices))
    }

    /// Remove the selected platforms from their groups.
    pub fn ungroup_selection(&mut self) -> Result<bool, EditorError> {
        let indices = self.selection.platform_indices();
        if indices.is_empty() {
            return Ok(false);
        }
        self.transact("ungroup", |engine| engine.level.ungroup(&indices))
    }
}
