//! Level document: the entities of one platformer level plus its settings.
//!
//! Entities are addressed by [`SelectedElement`] (kind + index). Any
//! structural change goes through the methods here so group membership is
//! renumbered in the same step and never points past the platform list.

mod markers;
mod platform;

pub use markers::{Coin, Goal, PlayerStart};
pub use platform::{MovePattern, Platform, PlatformKind};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

/// Tempo bounds in beats per minute.
pub const MIN_TEMPO: u32 = 40;
pub const MAX_TEMPO: u32 = 240;
pub const DEFAULT_TEMPO: u32 = 120;

/// Structural validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("group {group} references platform {index}, but the level has {len} platforms")]
    InvalidGroupIndex { group: usize, index: usize, len: usize },
    #[error("platform {index} belongs to more than one group")]
    OverlappingGroups { index: usize },
    #[error("non-finite coordinate on {0}")]
    NonFinite(String),
    #[error("{0} has a non-positive size")]
    DegenerateSize(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Horizontal or vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Backdrop shown behind the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Sky,
    Cave,
    Sunset,
    Night,
}

/// Common geometry of every placeable entity.
pub trait Placeable {
    /// Anchor used for moves: top-left for boxes, centre for coins.
    fn origin(&self) -> Point;
    fn set_origin(&mut self, origin: Point);
    fn bounds(&self) -> Rect;
    fn hit_test(&self, point: Point) -> bool;
}

/// The closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Platform,
    Coin,
    PlayerStart,
    Goal,
}

/// Reference to one entity in a level. `index` is 0 for the singletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectedElement {
    pub kind: EntityKind,
    pub index: usize,
}

impl SelectedElement {
    pub const PLAYER_START: SelectedElement = SelectedElement {
        kind: EntityKind::PlayerStart,
        index: 0,
    };
    pub const GOAL: SelectedElement = SelectedElement {
        kind: EntityKind::Goal,
        index: 0,
    };

    pub fn platform(index: usize) -> Self {
        Self {
            kind: EntityKind::Platform,
            index,
        }
    }

    pub fn coin(index: usize) -> Self {
        Self {
            kind: EntityKind::Coin,
            index,
        }
    }

    pub fn is_platform(&self) -> bool {
        self.kind == EntityKind::Platform
    }
}

/// A value copy of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Platform(Platform),
    Coin(Coin),
    PlayerStart(PlayerStart),
    Goal(Goal),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Platform(_) => EntityKind::Platform,
            Entity::Coin(_) => EntityKind::Coin,
            Entity::PlayerStart(_) => EntityKind::PlayerStart,
            Entity::Goal(_) => EntityKind::Goal,
        }
    }

    /// Shift by a world-space offset.
    pub fn translate(&mut self, offset: Vec2) {
        let origin = self.origin();
        self.set_origin(origin + offset);
    }
}

impl Placeable for Entity {
    fn origin(&self) -> Point {
        match self {
            Entity::Platform(p) => p.origin(),
            Entity::Coin(c) => c.origin(),
            Entity::PlayerStart(s) => s.origin(),
            Entity::Goal(g) => g.origin(),
        }
    }

    fn set_origin(&mut self, origin: Point) {
        match self {
            Entity::Platform(p) => p.set_origin(origin),
            Entity::Coin(c) => c.set_origin(origin),
            Entity::PlayerStart(s) => s.set_origin(origin),
            Entity::Goal(g) => g.set_origin(origin),
        }
    }

    fn bounds(&self) -> Rect {
        match self {
            Entity::Platform(p) => p.bounds(),
            Entity::Coin(c) => c.bounds(),
            Entity::PlayerStart(s) => s.bounds(),
            Entity::Goal(g) => g.bounds(),
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        match self {
            Entity::Platform(p) => p.hit_test(point),
            Entity::Coin(c) => c.hit_test(point),
            Entity::PlayerStart(s) => s.hit_test(point),
            Entity::Goal(g) => g.hit_test(point),
        }
    }
}

fn default_tempo() -> u32 {
    DEFAULT_TEMPO
}

/// A level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Unique level identifier.
    pub id: String,
    pub name: String,
    /// World extent. Entities are kept within `0..=height` vertically.
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub coins: Vec<Coin>,
    #[serde(default)]
    pub player_start: PlayerStart,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub background: Background,
    /// Beats per minute driving phase platforms.
    #[serde(default = "default_tempo")]
    pub tempo: u32,
    /// Disjoint sets of platform indices that select together.
    #[serde(default)]
    pub groups: Vec<BTreeSet<usize>>,
}

impl Default for Level {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Level {
    pub const DEFAULT_WIDTH: f64 = 3200.0;
    pub const DEFAULT_HEIGHT: f64 = 600.0;

    /// Create an empty level with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            platforms: Vec::new(),
            coins: Vec::new(),
            player_start: PlayerStart::default(),
            goal: None,
            background: Background::default(),
            tempo: DEFAULT_TEMPO,
            groups: Vec::new(),
        }
    }

    /// Whether `element` refers to an existing entity.
    pub fn contains(&self, element: SelectedElement) -> bool {
        match element.kind {
            EntityKind::Platform => element.index < self.platforms.len(),
            EntityKind::Coin => element.index < self.coins.len(),
            EntityKind::PlayerStart => true,
            EntityKind::Goal => self.goal.is_some(),
        }
    }

    fn placeable(&self, element: SelectedElement) -> Option<&dyn Placeable> {
        match element.kind {
            EntityKind::Platform => self.platforms.get(element.index).map(|p| p as &dyn Placeable),
            EntityKind::Coin => self.coins.get(element.index).map(|c| c as &dyn Placeable),
            EntityKind::PlayerStart => Some(&self.player_start),
            EntityKind::Goal => self.goal.as_ref().map(|g| g as &dyn Placeable),
        }
    }

    fn placeable_mut(&mut self, element: SelectedElement) -> Option<&mut dyn Placeable> {
        match element.kind {
            EntityKind::Platform => self
                .platforms
                .get_mut(element.index)
                .map(|p| p as &mut dyn Placeable),
            EntityKind::Coin => self.coins.get_mut(element.index).map(|c| c as &mut dyn Placeable),
            EntityKind::PlayerStart => Some(&mut self.player_start),
            EntityKind::Goal => self.goal.as_mut().map(|g| g as &mut dyn Placeable),
        }
    }

    pub fn bounds(&self, element: SelectedElement) -> Option<Rect> {
        self.placeable(element).map(|e| e.bounds())
    }

    pub fn origin(&self, element: SelectedElement) -> Option<Point> {
        self.placeable(element).map(|e| e.origin())
    }

    /// Move an entity's origin. Returns false for invalid references.
    pub fn set_origin(&mut self, element: SelectedElement, origin: Point) -> bool {
        match self.placeable_mut(element) {
            Some(entity) => {
                entity.set_origin(origin);
                true
            }
            None => false,
        }
    }

    /// Adjust a proposed origin so the entity stays within the vertical bounds.
    pub fn clamp_origin(&self, element: SelectedElement, origin: Point) -> Point {
        let Some(entity) = self.placeable(element) else {
            return origin;
        };
        let bounds = entity.bounds();
        let top_offset = bounds.y0 - entity.origin().y;
        let max_top = (self.height - bounds.height()).max(0.0);
        let top = (origin.y + top_offset).clamp(0.0, max_top);
        Point::new(origin.x, top - top_offset)
    }

    /// Value copy of an entity.
    pub fn entity(&self, element: SelectedElement) -> Option<Entity> {
        match element.kind {
            EntityKind::Platform => self.platforms.get(element.index).cloned().map(Entity::Platform),
            EntityKind::Coin => self.coins.get(element.index).copied().map(Entity::Coin),
            EntityKind::PlayerStart => Some(Entity::PlayerStart(self.player_start)),
            EntityKind::Goal => self.goal.map(Entity::Goal),
        }
    }

    /// Insert an entity. Platforms and coins are appended; the singletons replace.
    pub fn insert(&mut self, entity: Entity) -> SelectedElement {
        match entity {
            Entity::Platform(p) => {
                self.platforms.push(p);
                SelectedElement::platform(self.platforms.len() - 1)
            }
            Entity::Coin(c) => {
                self.coins.push(c);
                SelectedElement::coin(self.coins.len() - 1)
            }
            Entity::PlayerStart(s) => {
                self.player_start = s;
                SelectedElement::PLAYER_START
            }
            Entity::Goal(g) => {
                self.goal = Some(g);
                SelectedElement::GOAL
            }
        }
    }

    /// Remove a platform, shifting group references above it down by one.
    pub fn remove_platform(&mut self, index: usize) -> Option<Platform> {
        if index >= self.platforms.len() {
            return None;
        }
        let removed = self.platforms.remove(index);
        for group in &mut self.groups {
            *group = group
                .iter()
                .filter(|&&i| i != index)
                .map(|&i| if i > index { i - 1 } else { i })
                .collect();
        }
        self.groups.retain(|g| !g.is_empty());
        Some(removed)
    }

    pub fn remove_coin(&mut self, index: usize) -> Option<Coin> {
        (index < self.coins.len()).then(|| self.coins.remove(index))
    }

    /// Remove a set of entities. Each kind is removed in descending index
    /// order so earlier removals never shift later targets. The player start
    /// cannot be removed. Returns how many entities were removed.
    pub fn remove_elements(&mut self, elements: &[SelectedElement]) -> usize {
        let mut platforms: Vec<usize> = Vec::new();
        let mut coins: Vec<usize> = Vec::new();
        let mut goal = false;
        for element in elements {
            match element.kind {
                EntityKind::Platform => platforms.push(element.index),
                EntityKind::Coin => coins.push(element.index),
                EntityKind::Goal => goal = true,
                EntityKind::PlayerStart => {}
            }
        }
        platforms.sort_unstable_by(|a, b| b.cmp(a));
        platforms.dedup();
        coins.sort_unstable_by(|a, b| b.cmp(a));
        coins.dedup();

        let mut removed = 0;
        for index in platforms {
            if self.remove_platform(index).is_some() {
                removed += 1;
            }
        }
        for index in coins {
            if self.remove_coin(index).is_some() {
                removed += 1;
            }
        }
        if goal && self.goal.take().is_some() {
            removed += 1;
        }
        removed
    }

    /// The group containing a platform, if any.
    pub fn group_of(&self, platform: usize) -> Option<&BTreeSet<usize>> {
        self.groups.iter().find(|g| g.contains(&platform))
    }

    /// Group platforms together, pulling them out of any existing group.
    /// Needs at least two valid platform indices.
    pub fn group(&mut self, platforms: &[usize]) -> bool {
        let members: BTreeSet<usize> = platforms
            .iter()
            .copied()
            .filter(|&i| i < self.platforms.len())
            .collect();
        if members.len() < 2 {
            return false;
        }
        for group in &mut self.groups {
            group.retain(|i| !members.contains(i));
        }
        self.groups.retain(|g| !g.is_empty());
        self.groups.push(members);
        true
    }

    /// Remove platforms from every group, discarding groups left empty.
    /// Returns false when none of them was grouped.
    pub fn ungroup(&mut self, platforms: &[usize]) -> bool {
        let mut changed = false;
        for group in &mut self.groups {
            let before = group.len();
            group.retain(|i| !platforms.contains(i));
            changed |= group.len() != before;
        }
        self.groups.retain(|g| !g.is_empty());
        changed
    }

    /// Topmost entity under a world point: platforms from the top of the draw
    /// order, then coins, then the player start, then the goal.
    pub fn hit_test(&self, point: Point) -> Option<SelectedElement> {
        if let Some(i) = self.platforms.iter().rposition(|p| p.hit_test(point)) {
            return Some(SelectedElement::platform(i));
        }
        if let Some(i) = self.coins.iter().rposition(|c| c.hit_test(point)) {
            return Some(SelectedElement::coin(i));
        }
        if self.player_start.hit_test(point) {
            return Some(SelectedElement::PLAYER_START);
        }
        if self.goal.as_ref().is_some_and(|g| g.hit_test(point)) {
            return Some(SelectedElement::GOAL);
        }
        None
    }

    /// Platforms intersecting `rect` and coins whose centre lies in it, in list order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<SelectedElement> {
        let rect = rect.abs();
        let platforms = self
            .platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                let b = p.as_rect();
                b.x0 <= rect.x1 && rect.x0 <= b.x1 && b.y0 <= rect.y1 && rect.y0 <= b.y1
            })
            .map(|(i, _)| SelectedElement::platform(i));
        let coins = self
            .coins
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.x >= rect.x0 && c.x <= rect.x1 && c.y >= rect.y0 && c.y <= rect.y1
            })
            .map(|(i, _)| SelectedElement::coin(i));
        platforms.chain(coins).collect()
    }

    /// Every platform and coin, in list order.
    pub fn all_elements(&self) -> Vec<SelectedElement> {
        (0..self.platforms.len())
            .map(SelectedElement::platform)
            .chain((0..self.coins.len()).map(SelectedElement::coin))
            .collect()
    }

    /// Set the tempo, clamped to the supported range.
    pub fn set_tempo(&mut self, bpm: u32) {
        self.tempo = bpm.clamp(MIN_TEMPO, MAX_TEMPO);
    }

    /// Check the structural invariants of the level.
    pub fn validate(&self) -> Result<(), LevelError> {
        let finite = |p: Point| p.x.is_finite() && p.y.is_finite();
        for (i, p) in self.platforms.iter().enumerate() {
            if !finite(p.origin()) || !p.width.is_finite() || !p.height.is_finite() {
                return Err(LevelError::NonFinite(format!("platform {i}")));
            }
            if p.width <= 0.0 || p.height <= 0.0 {
                return Err(LevelError::DegenerateSize(format!("platform {i}")));
            }
        }
        for (i, c) in self.coins.iter().enumerate() {
            if !finite(c.center()) {
                return Err(LevelError::NonFinite(format!("coin {i}")));
            }
        }
        if !finite(self.player_start.origin()) {
            return Err(LevelError::NonFinite("player start".to_string()));
        }
        if let Some(goal) = &self.goal {
            if !(finite(goal.origin()) && goal.width.is_finite() && goal.height.is_finite()) {
                return Err(LevelError::NonFinite("goal".to_string()));
            }
        }

        let mut seen = BTreeSet::new();
        for (group, members) in self.groups.iter().enumerate() {
            for &index in members {
                if index >= self.platforms.len() {
                    return Err(LevelError::InvalidGroupIndex {
                        group,
                        index,
                        len: self.platforms.len(),
                    });
                }
                if !seen.insert(index) {
                    return Err(LevelError::OverlappingGroups { index });
                }
            }
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a level. Empty groups are dropped and the tempo clamped.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let mut level: Level =
            serde_json::from_str(json).map_err(|e| LevelError::Serialization(e.to_string()))?;
        level.groups.retain(|g| !g.is_empty());
        level.tempo = level.tempo.clamp(MIN_TEMPO, MAX_TEMPO);
        level.validate()?;
        Ok(level)
    }
}
