//! Selection model, box-selection and the platform resize handle.

use crate::level::{EntityKind, Level, SelectedElement};
use kurbo::{Point, Rect};

/// Ordered set of selected entities. The first element is the primary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    elements: Vec<SelectedElement>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Target of single-element operations such as resize.
    pub fn primary(&self) -> Option<SelectedElement> {
        self.elements.first().copied()
    }

    pub fn contains(&self, element: SelectedElement) -> bool {
        self.elements.contains(&element)
    }

    pub fn elements(&self) -> &[SelectedElement] {
        &self.elements
    }

    /// Indices of selected platforms, in selection order.
    pub fn platform_indices(&self) -> Vec<usize> {
        self.elements
            .iter()
            .filter(|e| e.kind == EntityKind::Platform)
            .map(|e| e.index)
            .collect()
    }

    /// Replace the selection with one element.
    pub fn select(&mut self, element: SelectedElement) {
        self.elements.clear();
        self.elements.push(element);
    }

    /// Replace the selection, dropping duplicates but keeping order.
    pub fn set(&mut self, elements: impl IntoIterator<Item = SelectedElement>) {
        self.elements.clear();
        for element in elements {
            if !self.elements.contains(&element) {
                self.elements.push(element);
            }
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Add an element if absent, remove it if present. Returns true if it is now selected.
    pub fn toggle(&mut self, element: SelectedElement) -> bool {
        if let Some(pos) = self.elements.iter().position(|e| *e == element) {
            self.elements.remove(pos);
            false
        } else {
            self.elements.push(element);
            true
        }
    }

    /// Select an element together with the rest of its group. The element
    /// itself stays primary; other members follow in index order.
    pub fn select_group(&mut self, level: &Level, element: SelectedElement) {
        self.select(element);
        if element.kind != EntityKind::Platform {
            return;
        }
        if let Some(group) = level.group_of(element.index) {
            for &index in group {
                let member = SelectedElement::platform(index);
                if member != element {
                    self.elements.push(member);
                }
            }
        }
    }

    /// Drop references the level no longer has. Returns how many were dropped.
    pub fn retain_valid(&mut self, level: &Level) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| level.contains(*e));
        let dropped = before - self.elements.len();
        if dropped > 0 {
            log::warn!("Dropped {} stale selection reference(s)", dropped);
        }
        dropped
    }
}

/// An in-progress rubber-band selection, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSelect {
    pub anchor: Point,
    pub current: Point,
}

impl BoxSelect {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            current: anchor,
        }
    }

    /// The normalized selection rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.anchor, self.current)
    }

    /// Elements the box currently covers.
    pub fn hits(&self, level: &Level) -> Vec<SelectedElement> {
        level.elements_in_rect(self.rect())
    }
}

/// Screen-space size of the resize handle.
pub const HANDLE_SIZE: f64 = 16.0;

/// World-space rectangle of the resize handle, centred on the bottom-right
/// corner of `bounds`. `world_size` is the handle size already divided by zoom.
pub fn resize_handle_rect(bounds: Rect, world_size: f64) -> Rect {
    Rect::from_center_size(Point::new(bounds.x1, bounds.y1), (world_size, world_size))
}

/// Whether `point` grabs the resize handle of the primary platform.
pub fn hit_test_resize_handle(
    level: &Level,
    selection: &Selection,
    point: Point,
    world_size: f64,
) -> Option<usize> {
    let primary = selection.primary()?;
    if primary.kind != EntityKind::Platform {
        return None;
    }
    let bounds = level.bounds(primary)?;
    let handle = resize_handle_rect(bounds, world_size);
    let inside = point.x >= handle.x0 && point.x <= handle.x1 && point.y >= handle.y0 && point.y <= handle.y1;
    inside.then_some(primary.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Coin, Platform, PlatformKind};

    fn level_with_platforms(n: usize) -> Level {
        let mut level = Level::new("test");
        for i in 0..n {
            level.platforms.push(Platform::new(
                Point::new(i as f64 * 150.0, 100.0),
                100.0,
                20.0,
                PlatformKind::Solid,
            ));
        }
        level
    }

    #[test]
    fn test_select_and_clear() {
        let mut selection = Selection::new();
        selection.select(SelectedElement::platform(2));
        assert_eq!(selection.primary(), Some(SelectedElement::platform(2)));
        assert_eq!(selection.len(), 1);

        selection.select(SelectedElement::coin(0));
        assert_eq!(selection.elements(), &[SelectedElement::coin(0)]);

        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.primary(), None);
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle(SelectedElement::platform(1)));
        assert!(selection.toggle(SelectedElement::GOAL));
        assert!(!selection.toggle(SelectedElement::platform(1)));
        assert_eq!(selection.primary(), Some(SelectedElement::GOAL));
    }

    #[test]
    fn test_set_deduplicates() {
        let mut selection = Selection::new();
        selection.set([
            SelectedElement::platform(1),
            SelectedElement::coin(0),
            SelectedElement::platform(1),
        ]);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.platform_indices(), vec![1]);
    }

    #[test]
    fn test_select_group() {
        let mut level = level_with_platforms(8);
        level.group(&[2, 5, 7]);

        let mut selection = Selection::new();
        selection.select_group(&level, SelectedElement::platform(5));
        assert_eq!(selection.primary(), Some(SelectedElement::platform(5)));
        let mut indices = selection.platform_indices();
        indices.sort_unstable();
        assert_eq!(indices, vec![2, 5, 7]);

        level.ungroup(&[2, 5, 7]);
        selection.select_group(&level, SelectedElement::platform(5));
        assert_eq!(selection.platform_indices(), vec![5]);
    }

    #[test]
    fn test_retain_valid() {
        let mut level = level_with_platforms(3);
        level.coins.push(Coin::new(Point::new(0.0, 0.0)));

        let mut selection = Selection::new();
        selection.set([
            SelectedElement::platform(2),
            SelectedElement::coin(0),
            SelectedElement::GOAL,
        ]);
        level.remove_platform(2);

        assert_eq!(selection.retain_valid(&level), 2);
        assert_eq!(selection.elements(), &[SelectedElement::coin(0)]);
    }

    #[test]
    fn test_box_select() {
        let level = level_with_platforms(4);
        let mut drag = BoxSelect::new(Point::new(320.0, 150.0));
        drag.current = Point::new(120.0, 50.0);

        let hits = drag.hits(&level);
        assert_eq!(hits, vec![SelectedElement::platform(1), SelectedElement::platform(2)]);
    }

    #[test]
    fn test_resize_handle_hit() {
        let level = level_with_platforms(2);
        let mut selection = Selection::new();
        selection.select(SelectedElement::platform(1));

        // Platform 1 spans (150,100)-(250,120)
        assert_eq!(
            hit_test_resize_handle(&level, &selection, Point::new(255.0, 125.0), HANDLE_SIZE),
            Some(1)
        );
        assert_eq!(
            hit_test_resize_handle(&level, &selection, Point::new(200.0, 110.0), HANDLE_SIZE),
            None
        );

        selection.select(SelectedElement::PLAYER_START);
        assert_eq!(
            hit_test_resize_handle(&level, &selection, Point::new(255.0, 125.0), HANDLE_SIZE),
            None
        );
    }
}
