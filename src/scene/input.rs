//! Typed input events
//!
//! The boundary translates raw browser events into these values before the
//! core sees them. Pointer coordinates are already in stage space.

use glam::Vec2;

/// Keyboard input, reduced to what the scenes consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character, already case-preserved
    Char(char),
    Enter,
    Backspace,
    Escape,
}

/// Everything the outside world can tell the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a stage-space position
    PointerMove(Vec2),
    /// Primary button or touch went down
    PointerDown(Vec2),
    /// Primary button or touch released
    PointerUp(Vec2),
    /// A key the core cares about
    Key(Key),
    /// Tab visibility flipped
    Visibility { hidden: bool },
    /// Camera permission resolved
    Capture { granted: bool },
}
