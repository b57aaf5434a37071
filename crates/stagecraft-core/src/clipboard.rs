//! Value-copy clipboard for platforms and coins.

use crate::level::{Entity, EntityKind, Level, Placeable, SelectedElement};
use kurbo::{Point, Rect, Vec2};

/// Copied entities, independent of the level they came from.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<Entity>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Entity] {
        &self.entries
    }

    /// Replace the contents with copies of the selected platforms and coins.
    /// Returns how many entities were copied; an empty copy leaves the
    /// clipboard as it was.
    pub fn copy(&mut self, level: &Level, elements: &[SelectedElement]) -> usize {
        let copied: Vec<Entity> = elements
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Platform | EntityKind::Coin))
            .filter_map(|e| level.entity(*e))
            .collect();
        if copied.is_empty() {
            return 0;
        }
        self.entries = copied;
        self.entries.len()
    }

    /// Bounding box of the clipboard contents.
    pub fn bounds(&self) -> Option<Rect> {
        self.entries
            .iter()
            .map(|e| e.bounds())
            .reduce(|a, b| a.union(b))
    }

    /// Copies ready to insert. With a target point the group's top-left
    /// lands on it; without one everything shifts by `fallback_offset`.
    pub fn paste(&self, target: Option<Point>, fallback_offset: Vec2) -> Vec<Entity> {
        let offset = match (target, self.bounds()) {
            (Some(point), Some(bounds)) => point - Point::new(bounds.x0, bounds.y0),
            _ => fallback_offset,
        };
        self.entries
            .iter()
            .cloned()
            .map(|mut entity| {
                entity.translate(offset);
                entity
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Coin, Platform, PlatformKind};

    fn sample_level() -> Level {
        let mut level = Level::new("clip");
        level
            .platforms
            .push(Platform::new(Point::new(100.0, 100.0), 100.0, 20.0, PlatformKind::Ice));
        level.coins.push(Coin::new(Point::new(160.0, 60.0)));
        level
    }

    #[test]
    fn test_copy_skips_singletons() {
        let level = sample_level();
        let mut clipboard = Clipboard::new();
        let copied = clipboard.copy(
            &level,
            &[
                SelectedElement::platform(0),
                SelectedElement::PLAYER_START,
                SelectedElement::coin(0),
            ],
        );
        assert_eq!(copied, 2);
        assert_eq!(clipboard.entries()[0].kind(), EntityKind::Platform);
        assert_eq!(clipboard.entries()[1].kind(), EntityKind::Coin);
    }

    #[test]
    fn test_empty_copy_keeps_contents() {
        let level = sample_level();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&level, &[SelectedElement::platform(0)]);
        assert_eq!(clipboard.copy(&level, &[SelectedElement::PLAYER_START]), 0);
        assert_eq!(clipboard.len(), 1);
    }

    #[test]
    fn test_copies_are_independent() {
        let mut level = sample_level();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&level, &[SelectedElement::platform(0)]);
        level.platforms[0].x = 900.0;

        let pasted = clipboard.paste(None, Vec2::new(20.0, 20.0));
        assert_eq!(pasted[0].origin(), Point::new(120.0, 120.0));
    }

    #[test]
    fn test_paste_at_point() {
        let level = sample_level();
        let mut clipboard = Clipboard::new();
        clipboard.copy(&level, &[SelectedElement::platform(0), SelectedElement::coin(0)]);

        // Bounds top-left is (100, 48): the coin's top edge
        let pasted = clipboard.paste(Some(Point::new(400.0, 248.0)), Vec2::ZERO);
        assert_eq!(pasted[0].origin(), Point::new(400.0, 300.0));
        assert_eq!(pasted[1].origin(), Point::new(460.0, 260.0));
    }
}
