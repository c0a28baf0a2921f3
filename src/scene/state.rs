//! Session state
//!
//! Everything the director mutates lives here. `SceneProgress` is replaced
//! wholesale on every transition; that replacement is what cancels the
//! outgoing scene's timers, tallies, drag and rejection message in one
//! move.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::stage_center;

use super::id::SceneId;
use super::resist::ResistanceVector;
use super::script::{self, SceneScript};
use super::snapshot::CaptureStatus;

/// Per-second drift scale of the pulse walk
const PULSE_STEP: f32 = 0.9;

fn pulse_floor(stress: u8) -> f32 {
    0.15 * stress as f32
}

fn pulse_ceil(stress: u8) -> f32 {
    (0.55 + 0.15 * stress as f32).min(1.0)
}

/// Ambient unease in `[0, 1]`, rendered as vignette throb and heartbeat
/// pacing. A seeded bounded walk: higher stress drifts faster and is
/// confined to a higher band, so the value reads as a mood without ever
/// affecting scene logic.
#[derive(Debug, Clone)]
pub struct Pulse {
    pub value: f32,
    rng: Pcg32,
}

impl Pulse {
    pub fn new(seed: u64) -> Self {
        Self { value: 0.2, rng: Pcg32::seed_from_u64(seed) }
    }

    pub fn tick(&mut self, dt: f32, stress: u8) {
        let drift = self.rng.random_range(-1.0f32..1.0) * PULSE_STEP * (1.0 + stress as f32) * dt;
        self.value = (self.value + drift).clamp(pulse_floor(stress), pulse_ceil(stress));
    }
}

/// Mutable state of the active scene instance. Built fresh from the script
/// on entry, never carried across a transition.
#[derive(Debug, Clone)]
pub struct SceneProgress {
    /// Unhidden seconds since scene entry
    pub elapsed: f32,
    /// Qualifying actions tallied so far
    pub count: u32,
    /// Typed buffer for token scenes
    pub buffer: String,
    /// Set on a failed submit, cleared on the next keystroke
    pub rejection: Option<&'static str>,
    pub cursor: ResistanceVector,
    /// Stage position of the draggable item, meaningful when the script
    /// declares one
    pub item_pos: Vec2,
    pub capture: CaptureStatus,
    /// False until the first pointer report of this scene; the first report
    /// teleports the cursor instead of applying a delta
    pub pointer_seen: bool,
}

impl SceneProgress {
    pub fn fresh(script: &SceneScript) -> Self {
        let rest = script.item_rest.unwrap_or_else(stage_center);
        Self {
            elapsed: 0.0,
            count: 0,
            buffer: String::new(),
            rejection: None,
            cursor: ResistanceVector::at(rest),
            item_pos: rest,
            capture: if script.wants_capture {
                CaptureStatus::Requested
            } else {
                CaptureStatus::Idle
            },
            pointer_seen: false,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub scene: SceneId,
    /// Recomputed from the scene on every transition
    pub stress: u8,
    pub score: u64,
    /// Scene instance counter, bumped on every entry
    pub epoch: u64,
    pub progress: SceneProgress,
    pub pulse: Pulse,
    /// Tab visibility; time does not pass while hidden
    pub hidden: bool,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        let start = SceneId::START;
        Self {
            seed,
            scene: start,
            stress: start.stress(),
            score: 0,
            epoch: 0,
            progress: SceneProgress::fresh(&script::script(start)),
            pulse: Pulse::new(seed),
            hidden: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_stays_in_band() {
        for stress in 0..=3u8 {
            let mut pulse = Pulse::new(7);
            for _ in 0..1000 {
                pulse.tick(1.0 / 60.0, stress);
                assert!(
                    pulse.value >= pulse_floor(stress) && pulse.value <= pulse_ceil(stress),
                    "stress {} value {}",
                    stress,
                    pulse.value
                );
            }
        }
    }

    #[test]
    fn test_pulse_band_rises_with_stress() {
        assert!(pulse_floor(3) > pulse_floor(0));
        assert!(pulse_ceil(3) <= 1.0);
        assert!(pulse_floor(3) < pulse_ceil(3));
    }

    #[test]
    fn test_pulse_is_deterministic() {
        let mut a = Pulse::new(42);
        let mut b = Pulse::new(42);
        for _ in 0..200 {
            a.tick(1.0 / 60.0, 2);
            b.tick(1.0 / 60.0, 2);
        }
        assert_eq!(a.value, b.value);
    }

    #[test]
    fn test_fresh_progress_is_blank() {
        let script = script::script(SceneId::Ledger);
        let p = SceneProgress::fresh(&script);
        assert_eq!(p.elapsed, 0.0);
        assert_eq!(p.count, 0);
        assert!(p.buffer.is_empty());
        assert!(p.rejection.is_none());
        assert!(!p.pointer_seen);
        assert!(!p.cursor.is_dragging());
        assert_eq!(p.capture, CaptureStatus::Idle);
    }

    #[test]
    fn test_fresh_progress_requests_capture_for_camera_scenes() {
        let script = script::script(SceneId::Mirror);
        let p = SceneProgress::fresh(&script);
        assert_eq!(p.capture, CaptureStatus::Requested);
    }

    #[test]
    fn test_fresh_progress_seats_the_item() {
        let script = script::script(SceneId::Contract);
        let p = SceneProgress::fresh(&script);
        assert_eq!(Some(p.item_pos), script.item_rest);
    }

    #[test]
    fn test_new_state_starts_at_boot() {
        let state = GameState::new(1);
        assert_eq!(state.scene, SceneId::START);
        assert_eq!(state.stress, SceneId::START.stress());
        assert_eq!(state.score, 0);
        assert_eq!(state.epoch, 0);
        assert!(!state.hidden);
    }
}
