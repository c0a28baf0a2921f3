//! Drop zones
//!
//! A scene that accepts a dragged item declares a set of non-overlapping
//! zones. Classification is total: a point is in exactly one zone or in
//! none, so a release always has a single unambiguous answer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Semantic label of a drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneId {
    /// Contract: accept the terms
    Approve,
    /// Contract: push the seal away
    Reject,
    /// Badge photo frame
    Frame,
    /// Where the coffee cup belongs
    Desk,
    /// The far hallway door
    Door,
    /// Shredder feed / bolt catch
    Slot,
    /// Overtime: remain at the desk
    Stay,
    /// Overtime: the exit
    Leave,
}

/// Geometry of a zone, in stage space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneShape {
    Rect { min: Vec2, max: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl ZoneShape {
    /// Closed containment test
    pub fn contains(&self, p: Vec2) -> bool {
        match *self {
            ZoneShape::Rect { min, max } => {
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
            ZoneShape::Circle { center, radius } => p.distance_squared(center) <= radius * radius,
        }
    }

    fn overlaps(&self, other: &ZoneShape) -> bool {
        match (*self, *other) {
            (ZoneShape::Rect { min: a0, max: a1 }, ZoneShape::Rect { min: b0, max: b1 }) => {
                a0.x < b1.x && b0.x < a1.x && a0.y < b1.y && b0.y < a1.y
            }
            (
                ZoneShape::Circle { center: c0, radius: r0 },
                ZoneShape::Circle { center: c1, radius: r1 },
            ) => c0.distance(c1) < r0 + r1,
            (ZoneShape::Rect { min, max }, ZoneShape::Circle { center, radius })
            | (ZoneShape::Circle { center, radius }, ZoneShape::Rect { min, max }) => {
                let closest = center.clamp(min, max);
                closest.distance(center) < radius
            }
        }
    }
}

/// A labelled drop target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub shape: ZoneShape,
}

/// The zone layout of one scene
#[derive(Debug, Clone, Default)]
pub struct ZoneMap {
    zones: Vec<Zone>,
}

impl ZoneMap {
    /// Zones must be pairwise disjoint so classification never has to break
    /// a tie. Checked in debug builds.
    pub fn new(zones: Vec<Zone>) -> Self {
        #[cfg(debug_assertions)]
        for (i, a) in zones.iter().enumerate() {
            for b in zones.iter().skip(i + 1) {
                debug_assert!(
                    !a.shape.overlaps(&b.shape),
                    "zones {:?} and {:?} overlap",
                    a.id,
                    b.id
                );
            }
        }
        Self { zones }
    }

    pub fn empty() -> Self {
        Self { zones: Vec::new() }
    }

    /// The zone containing `p`, or `None` for neutral space
    pub fn classify(&self, p: Vec2) -> Option<ZoneId> {
        self.zones.iter().find(|z| z.shape.contains(p)).map(|z| z.id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_zone_map() -> ZoneMap {
        ZoneMap::new(vec![
            Zone {
                id: ZoneId::Approve,
                shape: ZoneShape::Rect { min: Vec2::new(100.0, 100.0), max: Vec2::new(300.0, 300.0) },
            },
            Zone {
                id: ZoneId::Reject,
                shape: ZoneShape::Circle { center: Vec2::new(900.0, 200.0), radius: 80.0 },
            },
        ])
    }

    #[test]
    fn test_classify_inside_rect() {
        let map = two_zone_map();
        assert_eq!(map.classify(Vec2::new(200.0, 200.0)), Some(ZoneId::Approve));
    }

    #[test]
    fn test_classify_rect_edge_is_inside() {
        let map = two_zone_map();
        assert_eq!(map.classify(Vec2::new(300.0, 300.0)), Some(ZoneId::Approve));
    }

    #[test]
    fn test_classify_inside_circle() {
        let map = two_zone_map();
        assert_eq!(map.classify(Vec2::new(900.0, 250.0)), Some(ZoneId::Reject));
    }

    #[test]
    fn test_classify_neutral_space() {
        let map = two_zone_map();
        assert_eq!(map.classify(Vec2::new(600.0, 600.0)), None);
    }

    #[test]
    fn test_empty_map_classifies_nothing() {
        assert_eq!(ZoneMap::empty().classify(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_rect_circle_overlap_detected() {
        let rect = ZoneShape::Rect { min: Vec2::ZERO, max: Vec2::new(100.0, 100.0) };
        let near = ZoneShape::Circle { center: Vec2::new(120.0, 50.0), radius: 30.0 };
        let far = ZoneShape::Circle { center: Vec2::new(200.0, 50.0), radius: 30.0 };
        assert!(rect.overlaps(&near));
        assert!(!rect.overlaps(&far));
    }

    proptest! {
        #[test]
        fn prop_classify_agrees_with_contains(x in 0.0f32..1280.0, y in 0.0f32..720.0) {
            let map = two_zone_map();
            let p = Vec2::new(x, y);
            match map.classify(p) {
                Some(id) => {
                    let zone = map.zones().iter().find(|z| z.id == id).unwrap();
                    prop_assert!(zone.shape.contains(p));
                }
                None => {
                    for z in map.zones() {
                        prop_assert!(!z.shape.contains(p));
                    }
                }
            }
        }
    }
}
