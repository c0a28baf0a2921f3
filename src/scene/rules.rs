//! Completion rules
//!
//! Every scene owns exactly one rule. Rules are pure: they look at counts,
//! elapsed time, a drop zone or a typed buffer and answer with an outcome
//! or nothing. Firing, scoring and the actual transition live in the
//! director.

use serde::{Deserialize, Serialize};

use super::id::SceneId;
use super::zones::ZoneId;

/// How a scene ended. Tags the transition edge to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The ordinary single exit
    Done,
    /// Contract accepted
    Signed,
    /// Contract pushed away
    Refused,
    /// Overtime: stayed at the desk
    Stay,
    /// Overtime: went for the door
    Leave,
}

/// A completion claim minted by the active scene.
///
/// `epoch` identifies the scene instance, not just the scene id, so a
/// signal left over from an earlier visit of the same scene can never
/// advance the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub scene: SceneId,
    pub outcome: Outcome,
    pub epoch: u64,
}

/// The one way out of a scene (or, for drops and the terminal card, the
/// several labelled ways).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionRule {
    /// Fires on exactly the `target`-th qualifying action
    Threshold { target: u32 },
    /// Fires once `after` seconds of unhidden scene time have passed
    Timed { after: f32 },
    /// Fires when the held item lands in a listed zone
    ZoneDrop { exits: &'static [(ZoneId, Outcome)] },
    /// Fires when the typed buffer matches a listed token
    TokenMatch { tokens: &'static [&'static str], case_insensitive: bool },
    /// Never fires. Only the ending carries this.
    Terminal,
}

impl CompletionRule {
    /// `count` is the tally after the current action was added. Exactly the
    /// target count fires; later actions are inert so a stray extra click
    /// cannot re-complete the scene.
    pub fn on_count(&self, count: u32) -> Option<Outcome> {
        match *self {
            CompletionRule::Threshold { target } if count == target => Some(Outcome::Done),
            _ => None,
        }
    }

    /// Poll against unhidden elapsed seconds
    pub fn on_elapsed(&self, elapsed: f32) -> Option<Outcome> {
        match *self {
            CompletionRule::Timed { after } if elapsed >= after => Some(Outcome::Done),
            _ => None,
        }
    }

    /// Resolve a release. `None` zone (neutral space) never completes.
    pub fn on_drop(&self, zone: Option<ZoneId>) -> Option<Outcome> {
        let zone = zone?;
        match *self {
            CompletionRule::ZoneDrop { exits } => {
                exits.iter().find(|(z, _)| *z == zone).map(|&(_, o)| o)
            }
            _ => None,
        }
    }

    /// Resolve a submitted buffer
    pub fn on_submit(&self, buffer: &str) -> Option<Outcome> {
        match *self {
            CompletionRule::TokenMatch { tokens, case_insensitive } => {
                let hit = tokens.iter().any(|t| {
                    if case_insensitive {
                        t.eq_ignore_ascii_case(buffer)
                    } else {
                        *t == buffer
                    }
                });
                hit.then_some(Outcome::Done)
            }
            _ => None,
        }
    }
}
