//! Pointer resistance
//!
//! Scenes can make the cursor fight the player: motion along a chosen axis
//! in a chosen direction is scaled down while the rest passes through. The
//! core tracks both the raw pointer and the presented pointer so the effect
//! is purely a transform, never lost input.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_stage;

/// Which axis a policy dampens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Both,
}

impl Axis {
    #[inline]
    fn covers_x(self) -> bool {
        matches!(self, Axis::X | Axis::Both)
    }

    #[inline]
    fn covers_y(self) -> bool {
        matches!(self, Axis::Y | Axis::Both)
    }
}

/// How one scene bends pointer motion.
///
/// Only motion whose sign along the resisted axis matches `direction` is
/// scaled by `factor`; everything else passes through unchanged. With
/// `active_only_while_dragging` set, the policy sleeps until an item is
/// actually held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistancePolicy {
    pub axis: Axis,
    pub direction: f32,
    pub factor: f32,
    pub active_only_while_dragging: bool,
}

impl ResistancePolicy {
    /// No damping at all. Scenes without resistance use this.
    pub const FREE: ResistancePolicy = ResistancePolicy {
        axis: Axis::Both,
        direction: 1.0,
        factor: 1.0,
        active_only_while_dragging: true,
    };

    /// Direction collapses to its sign, factor clamps into `[0, 1]`.
    /// A zero direction means "resist the positive side".
    pub fn new(axis: Axis, direction: f32, factor: f32, active_only_while_dragging: bool) -> Self {
        let direction = if direction < 0.0 { -1.0 } else { 1.0 };
        Self { axis, direction, factor: factor.clamp(0.0, 1.0), active_only_while_dragging }
    }

    /// Apply the policy to a raw motion delta
    pub fn scale(&self, delta: Vec2, dragging: bool) -> Vec2 {
        if self.active_only_while_dragging && !dragging {
            return delta;
        }
        let mut out = delta;
        if self.axis.covers_x() && delta.x * self.direction > 0.0 {
            out.x = delta.x * self.factor;
        }
        if self.axis.covers_y() && delta.y * self.direction > 0.0 {
            out.y = delta.y * self.factor;
        }
        out
    }
}

/// Raw and presented pointer state for the active scene.
///
/// `raw` is what the device reported, `presented` is what the player sees.
/// The pair resets wholesale on every scene entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistanceVector {
    raw: Vec2,
    presented: Vec2,
    dragging: bool,
    drag_anchor: Vec2,
}

impl ResistanceVector {
    /// Both pointers collapsed to one position, not dragging
    pub fn at(pos: Vec2) -> Self {
        Self { raw: pos, presented: pos, dragging: false, drag_anchor: pos }
    }

    /// A grab resynchronizes raw with the device so the first drag delta is
    /// measured from the press, not from stale motion.
    pub fn begin_drag(&mut self, at: Vec2) {
        self.raw = at;
        self.drag_anchor = self.presented;
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[inline]
    pub fn presented(&self) -> Vec2 {
        self.presented
    }

    #[inline]
    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    /// Fold one raw pointer sample through the policy. Returns the new
    /// presented position, clamped to the stage.
    pub fn update(&mut self, raw: Vec2, policy: &ResistancePolicy) -> Vec2 {
        let delta = raw - self.raw;
        self.raw = raw;
        self.presented = clamp_to_stage(self.presented + policy.scale(delta, self.dragging));
        self.presented
    }
}
