//! Static level geometry
//!
//! - Wall: blocks bodies and projectiles
//! - Glass: blocks bodies, projectiles pass through
//! - Platform: one-way for bodies (land from above), blocks projectiles

use serde::{Deserialize, Serialize};

use super::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Glass,
    Platform,
}

impl ObstacleKind {
    /// Whether bodies walking sideways are stopped by this obstacle
    pub fn blocks_horizontal(self) -> bool {
        match self {
            ObstacleKind::Wall | ObstacleKind::Glass => true,
            ObstacleKind::Platform => false,
        }
    }

    /// Whether straight-flying bullets stop on this obstacle
    pub fn blocks_projectiles(self) -> bool {
        match self {
            ObstacleKind::Wall | ObstacleKind::Platform => true,
            ObstacleKind::Glass => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub rect: Rect,
}

/// Obstacles of one level, in insertion order (landing checks depend on it)
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    items: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ObstacleKind, rect: Rect) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Obstacle { id, kind, rect });
        id
    }

    /// Remove by id, keeping the order of the rest
    pub fn remove(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.items.iter().position(|o| o.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.items.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(ObstacleKind, Rect)> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = (ObstacleKind, Rect)>>(iter: I) -> Self {
        let mut set = ObstacleSet::new();
        for (kind, rect) in iter {
            set.insert(kind, rect);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_keeps_order() {
        let mut set = ObstacleSet::new();
        let a = set.insert(ObstacleKind::Wall, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = set.insert(ObstacleKind::Glass, Rect::new(20.0, 0.0, 10.0, 10.0));
        let c = set.insert(ObstacleKind::Platform, Rect::new(40.0, 0.0, 10.0, 10.0));

        assert!(set.remove(b).is_some());
        assert!(set.remove(b).is_none());
        let ids: Vec<u32> = set.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_kind_rules() {
        assert!(ObstacleKind::Glass.blocks_horizontal());
        assert!(!ObstacleKind::Glass.blocks_projectiles());
        assert!(!ObstacleKind::Platform.blocks_horizontal());
        assert!(ObstacleKind::Platform.blocks_projectiles());
    }
}
