//! Deterministic narrative core
//!
//! Everything that decides what the player sees next lives here. This module
//! must stay pure and platform-free:
//! - Typed input events only, never raw browser events
//! - Seeded RNG only
//! - Timers are scene-local elapsed-time deadlines polled by `tick`, so
//!   replacing a scene's progress cancels them structurally
//! - No rendering or audio playback, only snapshot data and cue values

pub mod director;
pub mod id;
pub mod input;
pub mod resist;
pub mod rules;
pub mod script;
pub mod snapshot;
pub mod state;
pub mod transitions;
pub mod zones;

pub use director::Director;
pub use id::SceneId;
pub use input::{InputEvent, Key};
pub use resist::{Axis, ResistancePolicy, ResistanceVector};
pub use rules::{CompletionRule, Outcome, Signal};
pub use script::{QualifyingAction, SceneScript, script};
pub use snapshot::{CaptureStatus, DragView, StageSnapshot, TaskView, Theme};
pub use state::{GameState, Pulse, SceneProgress};
pub use transitions::{TransitionError, next, validate};
pub use zones::{Zone, ZoneId, ZoneMap, ZoneShape};
