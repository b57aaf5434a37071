//! Coins, the player start marker and the goal zone.

use super::Placeable;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A collectible coin. `(x, y)` is its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub x: f64,
    pub y: f64,
}

impl Coin {
    /// Drawn radius.
    pub const RADIUS: f64 = 12.0;
    /// Pointer hit radius around the centre.
    pub const HIT_RADIUS: f64 = 18.0;

    pub fn new(center: Point) -> Self {
        Self {
            x: center.x,
            y: center.y,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Placeable for Coin {
    fn origin(&self) -> Point {
        self.center()
    }

    fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center(), (Self::RADIUS * 2.0, Self::RADIUS * 2.0))
    }

    fn hit_test(&self, point: Point) -> bool {
        point.distance(self.center()) <= Self::HIT_RADIUS
    }
}

/// Where the player spawns. `(x, y)` is the top-left of a fixed-size marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStart {
    pub x: f64,
    pub y: f64,
}

impl PlayerStart {
    /// Side length of the square marker.
    pub const SIZE: f64 = 40.0;

    pub fn new(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
        }
    }
}

impl Default for PlayerStart {
    fn default() -> Self {
        Self { x: 40.0, y: 480.0 }
    }
}

impl Placeable for PlayerStart {
    fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + Self::SIZE, self.y + Self::SIZE)
    }

    fn hit_test(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }
}

/// The zone the player must reach. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Goal {
    pub const DEFAULT_WIDTH: f64 = 60.0;
    pub const DEFAULT_HEIGHT: f64 = 80.0;

    pub fn new(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

impl Placeable for Goal {
    fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn hit_test(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_hit_radius() {
        let coin = Coin::new(Point::new(100.0, 100.0));
        assert!(coin.hit_test(Point::new(110.0, 110.0)));
        assert!(!coin.hit_test(Point::new(120.0, 110.0)));
    }

    #[test]
    fn test_coin_bounds_centered() {
        let coin = Coin::new(Point::new(50.0, 60.0));
        let bounds = coin.bounds();
        assert!((bounds.center().x - 50.0).abs() < f64::EPSILON);
        assert!((bounds.width() - Coin::RADIUS * 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_start_fixed_box() {
        let start = PlayerStart::new(Point::new(0.0, 0.0));
        assert!(start.hit_test(Point::new(40.0, 40.0)));
        assert!(!start.hit_test(Point::new(41.0, 20.0)));
    }

    #[test]
    fn test_goal_bounds() {
        let mut goal = Goal::new(Point::new(10.0, 10.0));
        goal.set_origin(Point::new(20.0, 30.0));
        let b = goal.bounds();
        assert_eq!(b, Rect::new(20.0, 30.0, 80.0, 110.0));
    }
}
