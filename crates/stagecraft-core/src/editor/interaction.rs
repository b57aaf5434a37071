//! Gesture dispatch: what taps, drags and pinches do to the level.

use super::{EditingEngine, EditorError, is_finite};
use crate::gesture::GestureEvent;
use crate::level::{Placeable, SelectedElement};
use crate::selection::{BoxSelect, Selection, hit_test_resize_handle};
use crate::snap::snap_to_grid;
use crate::tools::Tool;
use kurbo::{Point, Size, Vec2};

/// The pointer interaction in progress.
#[derive(Debug, Clone, Default)]
pub(super) enum Interaction {
    #[default]
    Idle,
    /// Dragging the selection. Origins are recorded at drag start.
    Moving {
        anchor: Point,
        primary: SelectedElement,
        originals: Vec<(SelectedElement, Point)>,
    },
    /// Dragging the primary platform's resize handle.
    Resizing { index: usize, original: Size },
    /// Rubber-band selection; `previous` is restored on cancel.
    BoxSelecting { rect: BoxSelect, previous: Selection },
    /// Scrolling the view with the pan tool.
    Panning,
    /// Two-pointer pinch/pan. Zoom is relative to `start_zoom`.
    Gesturing { start_zoom: f64 },
}

impl Interaction {
    pub(super) fn box_select(&self) -> Option<&BoxSelect> {
        match self {
            Interaction::BoxSelecting { rect, .. } => Some(rect),
            _ => None,
        }
    }

    pub(super) fn edits_level(&self) -> bool {
        matches!(self, Interaction::Moving { .. } | Interaction::Resizing { .. })
    }
}

impl EditingEngine {
    /// Apply one semantic gesture. Returns whether anything visible changed.
    pub fn handle_gesture(&mut self, gesture: &GestureEvent) -> Result<bool, EditorError> {
        self.selection.retain_valid(&self.level);
        match *gesture {
            GestureEvent::Tap { position } => {
                let world = self.track_pointer(position);
                self.on_tap(world)
            }
            GestureEvent::DoubleTap { position } => {
                let world = self.track_pointer(position);
                match self.level.hit_test(world) {
                    Some(hit) => {
                        self.selection.select(hit);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            GestureEvent::LongPress { position } => {
                let world = self.track_pointer(position);
                match self.level.hit_test(world) {
                    Some(hit) => {
                        self.selection.toggle(hit);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            GestureEvent::DragStart { position } => {
                let world = self.track_pointer(position);
                if !self.interaction.edits_level() {
                    self.settle_hold()?;
                }
                Ok(self.on_drag_start(world))
            }
            GestureEvent::Drag { position, delta, .. } => {
                let world = self.track_pointer(position);
                if matches!(self.interaction, Interaction::Panning) {
                    self.viewport.pan(delta);
                    return Ok(true);
                }
                Ok(self.on_drag(world))
            }
            GestureEvent::DragEnd { position, .. } => {
                self.track_pointer(position);
                self.finish_interaction()
            }
            GestureEvent::DragCancel { .. } => self.cancel_interaction(),
            GestureEvent::PinchStart { .. } | GestureEvent::PanStart { .. } => {
                if !matches!(self.interaction, Interaction::Gesturing { .. }) {
                    self.cancel_interaction()?;
                    self.interaction = Interaction::Gesturing {
                        start_zoom: self.viewport.zoom(),
                    };
                }
                Ok(false)
            }
            GestureEvent::Pinch { center, scale } => {
                if let Interaction::Gesturing { start_zoom } = self.interaction {
                    if scale.is_finite() {
                        self.viewport.set_zoom_at(center, start_zoom * scale);
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            GestureEvent::Pan { delta, .. } => {
                if matches!(self.interaction, Interaction::Gesturing { .. }) {
                    self.viewport.pan(delta);
                    return Ok(true);
                }
                Ok(false)
            }
            GestureEvent::PinchEnd { .. } | GestureEvent::PanEnd { .. } => {
                if matches!(self.interaction, Interaction::Gesturing { .. }) {
                    self.interaction = Interaction::Idle;
                }
                Ok(false)
            }
        }
    }

    /// Convert a screen position to world space and remember it.
    fn track_pointer(&mut self, screen: Point) -> Point {
        let world = self.viewport.screen_to_world(screen);
        if is_finite(world) {
            self.pointer = Some(world);
        }
        world
    }

    fn on_tap(&mut self, world: Point) -> Result<bool, EditorError> {
        if !is_finite(world) {
            return Ok(false);
        }
        match self.tool {
            Tool::Select => {
                let before = self.selection.clone();
                match self.level.hit_test(world) {
                    Some(hit) => self.selection.select_group(&self.level, hit),
                    None => self.selection.clear(),
                }
                Ok(self.selection != before)
            }
            Tool::Pan => Ok(false),
            tool => self.place(tool, world),
        }
    }

    fn on_drag_start(&mut self, world: Point) -> bool {
        if !is_finite(world) || self.interaction.edits_level() {
            return false;
        }
        if self.tool == Tool::Pan {
            self.interaction = Interaction::Panning;
            return true;
        }

        let handle_size = self
            .viewport
            .screen_to_world_length(self.config.resize_handle_size);
        if let Some(index) = hit_test_resize_handle(&self.level, &self.selection, world, handle_size) {
            let platform = &self.level.platforms[index];
            self.interaction = Interaction::Resizing {
                index,
                original: Size::new(platform.width, platform.height),
            };
            log::debug!("Resizing platform {}", index);
            return true;
        }

        match self.level.hit_test(world) {
            Some(hit) => {
                if !self.selection.contains(hit) {
                    self.selection.select_group(&self.level, hit);
                }
                let originals: Vec<_> = self
                    .selection
                    .elements()
                    .iter()
                    .filter_map(|e| self.level.origin(*e).map(|o| (*e, o)))
                    .collect();
                let primary = self.selection.primary().unwrap_or(hit);
                log::debug!("Moving {} element(s)", originals.len());
                self.interaction = Interaction::Moving {
                    anchor: world,
                    primary,
                    originals,
                };
            }
            None => {
                let previous = self.selection.clone();
                self.selection.clear();
                self.interaction = Interaction::BoxSelecting {
                    rect: BoxSelect::new(world),
                    previous,
                };
            }
        }
        true
    }

    fn on_drag(&mut self, world: Point) -> bool {
        if !is_finite(world) {
            return false;
        }
        match &mut self.interaction {
            Interaction::Moving {
                anchor,
                primary,
                originals,
            } => {
                let offset = world - *anchor;
                let primary = *primary;
                let originals = originals.clone();
                if let [(element, original)] = originals.as_slice() {
                    let snapped = self
                        .alignment
                        .snap_move(&self.level, *element, *original + offset)
                        .point;
                    self.move_element(*element, snapped);
                } else {
                    self.alignment.clear_guides();
                    let Some(&(_, primary_origin)) = originals.iter().find(|(e, _)| *e == primary) else {
                        return false;
                    };
                    let snapped = snap_to_grid(primary_origin + offset, self.config.grid_size);
                    let shared = self.clamp_shared_offset(&originals, snapped - primary_origin);
                    for (element, original) in originals {
                        self.move_element(element, original + shared);
                    }
                }
                true
            }
            Interaction::Resizing { index, .. } => {
                let index = *index;
                let Some(platform) = self.level.platforms.get(index) else {
                    return false;
                };
                let size = self
                    .alignment
                    .snap_resize(platform.origin(), world, self.config.min_platform_size);
                if let Some(platform) = self.level.platforms.get_mut(index) {
                    platform.width = size.width;
                    platform.height = size.height;
                }
                true
            }
            Interaction::BoxSelecting { rect, .. } => {
                rect.current = world;
                let hits = rect.hits(&self.level);
                self.selection.set(hits);
                true
            }
            _ => false,
        }
    }

    /// Limit a shared offset vertically so every moved element stays
    /// inside the level and the group keeps its layout.
    fn clamp_shared_offset(&self, originals: &[(SelectedElement, Point)], offset: Vec2) -> Vec2 {
        let mut low = f64::NEG_INFINITY;
        let mut high = f64::INFINITY;
        for (element, original) in originals {
            let top = self
                .level
                .clamp_origin(*element, Point::new(original.x, f64::NEG_INFINITY));
            let bottom = self
                .level
                .clamp_origin(*element, Point::new(original.x, f64::INFINITY));
            low = low.max(top.y - original.y);
            high = high.min(bottom.y - original.y);
        }
        if low <= high {
            Vec2::new(offset.x, offset.y.clamp(low, high))
        } else {
            offset
        }
    }

    /// Complete the current interaction, committing any level change.
    pub(super) fn finish_interaction(&mut self) -> Result<bool, EditorError> {
        let interaction = std::mem::take(&mut self.interaction);
        self.alignment.clear_guides();
        let changed = match &interaction {
            Interaction::Moving { originals, .. } => originals
                .iter()
                .any(|(e, o)| self.level.origin(*e) != Some(*o)),
            Interaction::Resizing { index, original } => self
                .level
                .platforms
                .get(*index)
                .is_some_and(|p| Size::new(p.width, p.height) != *original),
            Interaction::BoxSelecting { .. } => return Ok(true),
            Interaction::Idle | Interaction::Panning | Interaction::Gesturing { .. } => {
                return Ok(false);
            }
        };
        if !changed {
            return Ok(false);
        }
        let label = if matches!(interaction, Interaction::Resizing { .. }) {
            "resize"
        } else {
            "move"
        };
        if let Err(e) = self.commit(label) {
            log::warn!("Drag rolled back: {}", e);
            self.restore_committed()?;
            return Err(e);
        }
        Ok(true)
    }

    /// Abort the current interaction, restoring the last committed level.
    /// Also abandons an active hold-to-repeat control.
    pub(super) fn cancel_interaction(&mut self) -> Result<bool, EditorError> {
        let interaction = std::mem::take(&mut self.interaction);
        self.alignment.clear_guides();
        let held = self.hold.abandon();
        match interaction {
            Interaction::BoxSelecting { previous, .. } => {
                self.selection = previous;
                if held {
                    self.restore_committed()?;
                }
                Ok(true)
            }
            interaction if interaction.edits_level() || held => {
                log::debug!("Interaction cancelled, restoring committed state");
                self.restore_committed()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
