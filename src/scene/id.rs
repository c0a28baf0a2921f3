//! Scene identifiers
//!
//! The roster is fixed at build time. Stress tier is a pure function of the
//! id so the derived value can always be recomputed on transition, never
//! stored independently.

use serde::{Deserialize, Serialize};

/// One vignette of the night. Active exclusively at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneId {
    /// CRT power-on card
    Boot,
    /// Title card, waits for a key
    Title,
    /// Consent card
    Disclaimer,
    /// Drag the wax seal onto the contract - signing branches the night
    Contract,
    /// Scolding card shown after a refused contract
    Refusal,
    /// Welcome memo, typewriter reveal
    Orientation,
    /// Drag the badge photo into its frame
    Badge,
    /// File the intake memos
    Inbox,
    /// Strike the forbidden lines
    Redaction,
    /// The cup does not want to leave the desk
    CoffeeBreak,
    /// Announcement plays out
    Intercom,
    /// Type the clerk id from the ledger
    Ledger,
    /// Feed the flagged folders to the shredder
    Shredder,
    /// The breaker needs convincing
    Lights,
    /// The far door resists the cursor
    Hallway,
    /// "YOU ARE DOING FINE"
    BreakroomPoster,
    /// Webcam permission check, degrades gracefully on denial
    CameraCheck,
    /// Overlay dwell in front of the monitor
    Mirror,
    /// Type what the memo tells you to type
    Memo,
    /// Delete the flagged records
    Archive,
    /// Drag the door bolt home
    Bolt,
    /// Descent
    Stairwell,
    /// Completes only when the tab is hidden and shown again
    Blackout,
    /// Stay for the final report or try to leave
    Overtime,
    /// The door is jammed; back to the choice
    DoorJammed,
    /// Sign off the findings
    FinalReport,
    /// Sunrise card, no exit
    Ending,
}

impl SceneId {
    /// Every scene, in the order of the main walkthrough. Used by the
    /// transition-graph validation and by table-driven tests.
    pub const ALL: [SceneId; 27] = [
        SceneId::Boot,
        SceneId::Title,
        SceneId::Disclaimer,
        SceneId::Contract,
        SceneId::Refusal,
        SceneId::Orientation,
        SceneId::Badge,
        SceneId::Inbox,
        SceneId::Redaction,
        SceneId::CoffeeBreak,
        SceneId::Intercom,
        SceneId::Ledger,
        SceneId::Shredder,
        SceneId::Lights,
        SceneId::Hallway,
        SceneId::BreakroomPoster,
        SceneId::CameraCheck,
        SceneId::Mirror,
        SceneId::Memo,
        SceneId::Archive,
        SceneId::Bolt,
        SceneId::Stairwell,
        SceneId::Blackout,
        SceneId::Overtime,
        SceneId::DoorJammed,
        SceneId::FinalReport,
        SceneId::Ending,
    ];

    /// Where a session begins
    pub const START: SceneId = SceneId::Boot;

    /// Where a session ends, reached exactly once
    pub const TERMINAL: SceneId = SceneId::Ending;

    /// Stress tier in `0..=3`. Fixed membership; recomputed on every
    /// transition, never persisted.
    pub fn stress(self) -> u8 {
        use SceneId::*;
        match self {
            Boot | Title | Disclaimer | Orientation | Badge | Ending => 0,
            Contract | Inbox | Redaction | CoffeeBreak | Intercom | Ledger | Shredder
            | BreakroomPoster => 1,
            Refusal | Lights | Hallway | CameraCheck | Memo | Archive | Overtime | FinalReport => 2,
            Mirror | Bolt | Stairwell | Blackout | DoorJammed => 3,
        }
    }

    /// Short identifier for logs and DOM hooks
    pub fn as_str(self) -> &'static str {
        use SceneId::*;
        match self {
            Boot => "boot",
            Title => "title",
            Disclaimer => "disclaimer",
            Contract => "contract",
            Refusal => "refusal",
            Orientation => "orientation",
            Badge => "badge",
            Inbox => "inbox",
            Redaction => "redaction",
            CoffeeBreak => "coffee-break",
            Intercom => "intercom",
            Ledger => "ledger",
            Shredder => "shredder",
            Lights => "lights",
            Hallway => "hallway",
            BreakroomPoster => "breakroom-poster",
            CameraCheck => "camera-check",
            Mirror => "mirror",
            Memo => "memo",
            Archive => "archive",
            Bolt => "bolt",
            Stairwell => "stairwell",
            Blackout => "blackout",
            Overtime => "overtime",
            DoorJammed => "door-jammed",
            FinalReport => "final-report",
            Ending => "ending",
        }
    }

    /// True for the single terminal scene
    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_is_complete_and_unique() {
        for (i, a) in SceneId::ALL.iter().enumerate() {
            for b in SceneId::ALL.iter().skip(i + 1) {
                assert_ne!(a, b, "duplicate scene in roster");
            }
        }
        assert!(SceneId::ALL.contains(&SceneId::START));
        assert!(SceneId::ALL.contains(&SceneId::TERMINAL));
    }

    #[test]
    fn test_stress_is_bounded() {
        for id in SceneId::ALL {
            assert!(id.stress() <= 3, "{:?} stress out of range", id);
        }
    }

    #[test]
    fn test_terminal_is_calm() {
        // The sunrise card releases the player
        assert_eq!(SceneId::Ending.stress(), 0);
    }

    #[test]
    fn test_as_str_unique() {
        for (i, a) in SceneId::ALL.iter().enumerate() {
            for b in SceneId::ALL.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
