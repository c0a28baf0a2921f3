//! Night Shift - an interactive horror vignette sequence
//!
//! Core modules:
//! - `scene`: Deterministic narrative core (orchestration, completion rules,
//!   resistance interaction, zones)
//! - `audio`: Procedural audio cues (data everywhere, playback on wasm)
//! - `settings`: Player preferences
//!
//! The presentation layer lives in `main.rs` and only ever exchanges typed
//! input events and read-only stage snapshots with the core.

pub mod audio;
pub mod scene;
pub mod settings;

pub use settings::Settings;

use glam::Vec2;

/// Stage configuration constants
pub mod consts {
    /// Logical stage width in stage units (presentation scales to viewport)
    pub const STAGE_WIDTH: f32 = 1280.0;
    /// Logical stage height
    pub const STAGE_HEIGHT: f32 = 720.0;

    /// Maximum delta time accepted from a frame callback (tab-switch spikes)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Pointer-down distance within which a draggable item can be grabbed
    pub const GRAB_RADIUS: f32 = 48.0;

    /// Characters per second for typewriter reveals
    pub const REVEAL_CPS: f32 = 24.0;

    /// Maximum length of the typed buffer in value-match scenes
    pub const MAX_BUFFER_LEN: usize = 64;

    /// Points per qualifying action
    pub const ACTION_SCORE: u64 = 10;
    /// Points per completed scene (refusals and walk-outs score nothing)
    pub const SCENE_SCORE: u64 = 25;
}

/// Size of the stage as a vector
#[inline]
pub fn stage_size() -> Vec2 {
    Vec2::new(consts::STAGE_WIDTH, consts::STAGE_HEIGHT)
}

/// Center of the stage
#[inline]
pub fn stage_center() -> Vec2 {
    stage_size() * 0.5
}

/// Clamp a point to the stage bounds
#[inline]
pub fn clamp_to_stage(p: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, stage_size())
}
