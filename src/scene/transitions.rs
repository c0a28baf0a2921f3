//! The transition table
//!
//! One function, total by construction: every (scene, outcome) pair either
//! names the next scene or is explicitly not an edge. `validate` walks the
//! whole graph against the scripts and is cheap enough to run on startup in
//! debug builds.

use std::collections::HashSet;

use thiserror::Error;

use super::id::SceneId;
use super::rules::{CompletionRule, Outcome};
use super::script;

const ALL_OUTCOMES: [Outcome; 5] =
    [Outcome::Done, Outcome::Signed, Outcome::Refused, Outcome::Stay, Outcome::Leave];

/// Where `outcome` leads from `scene`. `None` means the pair is not an
/// edge of the night.
pub fn next(scene: SceneId, outcome: Outcome) -> Option<SceneId> {
    use Outcome::*;
    use SceneId::*;
    Some(match (scene, outcome) {
        (Boot, Done) => Title,
        (Title, Done) => Disclaimer,
        (Disclaimer, Done) => Contract,
        (Contract, Signed) => Orientation,
        (Contract, Refused) => Refusal,
        (Refusal, Done) => Contract,
        (Orientation, Done) => Badge,
        (Badge, Done) => Inbox,
        (Inbox, Done) => Redaction,
        (Redaction, Done) => CoffeeBreak,
        (CoffeeBreak, Done) => Intercom,
        (Intercom, Done) => Ledger,
        (Ledger, Done) => Shredder,
        (Shredder, Done) => Lights,
        (Lights, Done) => Hallway,
        (Hallway, Done) => BreakroomPoster,
        (BreakroomPoster, Done) => CameraCheck,
        (CameraCheck, Done) => Mirror,
        (Mirror, Done) => Memo,
        (Memo, Done) => Archive,
        (Archive, Done) => Bolt,
        (Bolt, Done) => Stairwell,
        (Stairwell, Done) => Blackout,
        (Blackout, Done) => Overtime,
        (Overtime, Stay) => FinalReport,
        (Overtime, Leave) => DoorJammed,
        (DoorJammed, Done) => Overtime,
        (FinalReport, Done) => Ending,
        _ => return None,
    })
}

/// Graph defects caught by [`validate`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("scene {0:?} exit {1:?} leads nowhere")]
    MissingExit(SceneId, Outcome),
    #[error("scene {0:?} can never complete")]
    DeadEnd(SceneId),
    #[error("scene {0:?} is unreachable from the start")]
    Orphan(SceneId),
    #[error("terminal scene {0:?} has an exit")]
    TerminalExit(SceneId),
}

/// Outcomes a scene's rule can actually produce
fn exits(id: SceneId) -> Vec<Outcome> {
    match script::script(id).rule {
        CompletionRule::Threshold { .. }
        | CompletionRule::Timed { .. }
        | CompletionRule::TokenMatch { .. } => vec![Outcome::Done],
        CompletionRule::ZoneDrop { exits } => exits.iter().map(|&(_, o)| o).collect(),
        CompletionRule::Terminal => Vec::new(),
    }
}

/// Check the table against the scripts: every producible outcome has an
/// edge, the terminal scene has none, and everything is reachable.
pub fn validate() -> Result<(), TransitionError> {
    for id in SceneId::ALL {
        if id.is_terminal() {
            for outcome in ALL_OUTCOMES {
                if next(id, outcome).is_some() {
                    return Err(TransitionError::TerminalExit(id));
                }
            }
            continue;
        }
        let exits = exits(id);
        if exits.is_empty() {
            return Err(TransitionError::DeadEnd(id));
        }
        for outcome in exits {
            if next(id, outcome).is_none() {
                return Err(TransitionError::MissingExit(id, outcome));
            }
        }
    }

    let mut seen = HashSet::from([SceneId::START]);
    let mut queue = vec![SceneId::START];
    while let Some(id) = queue.pop() {
        for outcome in exits(id) {
            if let Some(to) = next(id, outcome) {
                if seen.insert(to) {
                    queue.push(to);
                }
            }
        }
    }
    for id in SceneId::ALL {
        if !seen.contains(&id) {
            return Err(TransitionError::Orphan(id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_validates() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn test_terminal_has_no_exits() {
        for outcome in ALL_OUTCOMES {
            assert_eq!(next(SceneId::Ending, outcome), None);
        }
    }

    #[test]
    fn test_contract_branches() {
        assert_eq!(next(SceneId::Contract, Outcome::Signed), Some(SceneId::Orientation));
        assert_eq!(next(SceneId::Contract, Outcome::Refused), Some(SceneId::Refusal));
        assert_eq!(next(SceneId::Contract, Outcome::Done), None);
    }

    #[test]
    fn test_refusal_returns_to_the_contract() {
        assert_eq!(next(SceneId::Refusal, Outcome::Done), Some(SceneId::Contract));
    }

    #[test]
    fn test_leaving_never_works() {
        assert_eq!(next(SceneId::Overtime, Outcome::Leave), Some(SceneId::DoorJammed));
        assert_eq!(next(SceneId::DoorJammed, Outcome::Done), Some(SceneId::Overtime));
    }

    #[test]
    fn test_happy_path_reaches_the_ending() {
        let mut scene = SceneId::START;
        let mut steps = 0;
        while !scene.is_terminal() {
            let outcomes = exits(scene);
            // Prefer the compliant outcome at each branch
            let pick = *outcomes
                .iter()
                .find(|o| matches!(o, Outcome::Done | Outcome::Signed | Outcome::Stay))
                .expect("non-terminal scene with no compliant exit");
            scene = next(scene, pick).expect("validated edge");
            steps += 1;
            assert!(steps <= SceneId::ALL.len(), "walk does not terminate");
        }
        assert_eq!(scene, SceneId::Ending);
    }
}
