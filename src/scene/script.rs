//! Scene scripts
//!
//! All authored content in one place: narration, completion rule, drop
//! zones, resistance, cues. The director asks for a script on every scene
//! entry and consults nothing else, so this table is the whole night.

use glam::Vec2;

use crate::audio::Cue;

use super::id::SceneId;
use super::resist::{Axis, ResistancePolicy};
use super::rules::{CompletionRule, Outcome};
use super::zones::{Zone, ZoneId, ZoneMap, ZoneShape};

/// What kind of player action a threshold scene tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifyingAction {
    /// A press anywhere on the stage
    PointerDown,
    /// A press while the presented cursor is inside a specific zone
    PressInZone(ZoneId),
    /// Any key
    KeyPress,
    /// The held item released inside a specific zone
    DropInZone(ZoneId),
    /// The tab was hidden and became visible again
    VisibilityReturn,
}

/// Everything one scene needs to run
#[derive(Debug, Clone)]
pub struct SceneScript {
    pub id: SceneId,
    pub title: &'static str,
    /// Shown as the browser tab title, doubles as the wall clock
    pub tab_title: &'static str,
    pub narration: &'static str,
    pub rule: CompletionRule,
    /// Seconds of unhidden scene time before actions start to count
    pub min_dwell: f32,
    pub counts: Option<QualifyingAction>,
    /// Rest position of the draggable item, if the scene has one
    pub item_rest: Option<Vec2>,
    pub resistance: Option<ResistancePolicy>,
    pub zones: ZoneMap,
    pub enter_cues: &'static [Cue],
    /// Played on each qualifying action
    pub action_cue: Option<Cue>,
    /// Shown after a failed token submit
    pub rejection: &'static str,
    /// Scene asks the boundary for camera capture
    pub wants_capture: bool,
}

fn card(
    id: SceneId,
    title: &'static str,
    tab_title: &'static str,
    narration: &'static str,
    rule: CompletionRule,
) -> SceneScript {
    SceneScript {
        id,
        title,
        tab_title,
        narration,
        rule,
        min_dwell: 0.0,
        counts: None,
        item_rest: None,
        resistance: None,
        zones: ZoneMap::empty(),
        enter_cues: &[],
        action_cue: None,
        rejection: "",
        wants_capture: false,
    }
}

fn rect(id: ZoneId, min: (f32, f32), max: (f32, f32)) -> Zone {
    Zone { id, shape: ZoneShape::Rect { min: Vec2::new(min.0, min.1), max: Vec2::new(max.0, max.1) } }
}

fn circle(id: ZoneId, center: (f32, f32), radius: f32) -> Zone {
    Zone { id, shape: ZoneShape::Circle { center: Vec2::new(center.0, center.1), radius } }
}

/// The authored script for `id`. Total over the roster.
pub fn script(id: SceneId) -> SceneScript {
    match id {
        SceneId::Boot => SceneScript {
            enter_cues: &[Cue::PowerOn],
            ..card(
                id,
                "TERMINAL 7",
                "NIGHT SHIFT",
                "PROPERTY OF NIGHT AUDIT DIVISION\nTERMINAL 7 WARMING UP",
                CompletionRule::Timed { after: 2.2 },
            )
        },
        SceneId::Title => SceneScript {
            min_dwell: 1.5,
            counts: Some(QualifyingAction::KeyPress),
            action_cue: Some(Cue::KeyClick),
            ..card(
                id,
                "NIGHT SHIFT",
                "NIGHT SHIFT",
                "NIGHT SHIFT\n\npress any key to clock in",
                CompletionRule::Threshold { target: 1 },
            )
        },
        SceneId::Disclaimer => SceneScript {
            min_dwell: 2.5,
            counts: Some(QualifyingAction::KeyPress),
            action_cue: Some(Cue::KeyClick),
            ..card(
                id,
                "NOTICE",
                "NIGHT SHIFT 23:58",
                "By proceeding you acknowledge that the building\nis aware of you.\n\npress any key to agree",
                CompletionRule::Threshold { target: 1 },
            )
        },
        SceneId::Contract => SceneScript {
            item_rest: Some(Vec2::new(640.0, 520.0)),
            // Refusing means dragging into the damped direction; one full
            // sweep of the stage still reaches the reject tray
            resistance: Some(ResistancePolicy::new(Axis::X, 1.0, 0.45, true)),
            zones: ZoneMap::new(vec![
                rect(ZoneId::Approve, (140.0, 420.0), (420.0, 620.0)),
                circle(ZoneId::Reject, (990.0, 520.0), 100.0),
            ]),
            action_cue: Some(Cue::StampThud),
            enter_cues: &[Cue::PaperSlide],
            ..card(
                id,
                "THE CONTRACT",
                "NIGHT SHIFT 00:01",
                "Standard overnight engagement.\nOne night, renewable in perpetuity.\n\nDrag the seal to the signature line. Or push it away.",
                CompletionRule::ZoneDrop {
                    exits: &[(ZoneId::Approve, Outcome::Signed), (ZoneId::Reject, Outcome::Refused)],
                },
            )
        },
        SceneId::Refusal => SceneScript {
            enter_cues: &[Cue::StaticBurst],
            ..card(
                id,
                "DECLINED",
                "NIGHT SHIFT 00:01",
                "The terminal buzzes. The contract is back on the desk.\nIt was always going to be back on the desk.",
                CompletionRule::Timed { after: 4.5 },
            )
        },
        SceneId::Orientation => card(
            id,
            "ORIENTATION",
            "NIGHT SHIFT 00:09",
            "WELCOME, CLERK.\nYour predecessor left everything in order.\nDo not ask where your predecessor went.\n\nThe intake tray is to your left.\nThe night is long on purpose.",
            CompletionRule::Timed { after: 10.0 },
        ),
        SceneId::Badge => SceneScript {
            item_rest: Some(Vec2::new(250.0, 360.0)),
            zones: ZoneMap::new(vec![rect(ZoneId::Frame, (840.0, 200.0), (1080.0, 440.0))]),
            action_cue: Some(Cue::PaperSlide),
            ..card(
                id,
                "IDENTIFICATION",
                "NIGHT SHIFT 00:24",
                "Every employee must be identifiable.\nPut your face where it belongs.",
                CompletionRule::ZoneDrop { exits: &[(ZoneId::Frame, Outcome::Done)] },
            )
        },
        SceneId::Inbox => SceneScript {
            min_dwell: 0.5,
            counts: Some(QualifyingAction::PointerDown),
            action_cue: Some(Cue::PaperSlide),
            enter_cues: &[Cue::PaperSlide],
            ..card(
                id,
                "INTAKE",
                "NIGHT SHIFT 00:51",
                "Four memos tonight. File each one.\nDo not read the fourth one twice.",
                CompletionRule::Threshold { target: 4 },
            )
        },
        SceneId::Redaction => SceneScript {
            min_dwell: 0.5,
            counts: Some(QualifyingAction::PointerDown),
            action_cue: Some(Cue::RedactStroke),
            ..card(
                id,
                "REDACTION",
                "NIGHT SHIFT 01:13",
                "Six lines have been flagged.\nStrike them until they stop being words.",
                CompletionRule::Threshold { target: 6 },
            )
        },
        SceneId::CoffeeBreak => SceneScript {
            item_rest: Some(Vec2::new(1000.0, 400.0)),
            resistance: Some(ResistancePolicy::new(Axis::X, -1.0, 0.55, true)),
            zones: ZoneMap::new(vec![rect(ZoneId::Desk, (200.0, 300.0), (520.0, 520.0))]),
            ..card(
                id,
                "BREAK",
                "NIGHT SHIFT 01:40",
                "You are permitted one beverage.\nThe cup would rather stay where it is.",
                CompletionRule::ZoneDrop { exits: &[(ZoneId::Desk, Outcome::Done)] },
            )
        },
        SceneId::Intercom => SceneScript {
            enter_cues: &[Cue::IntercomChime],
            ..card(
                id,
                "ANNOUNCEMENT",
                "NIGHT SHIFT 02:02",
                "The ceiling speaker clears its throat.\n\n\"CLERKS ARE REMINDED THAT THE THIRD FLOOR\nDOES NOT EXIST. THANK YOU.\"",
                CompletionRule::Timed { after: 8.0 },
            )
        },
        SceneId::Ledger => SceneScript {
            min_dwell: 0.5,
            rejection: "INCORRECT CLERK ID",
            ..card(
                id,
                "THE LEDGER",
                "NIGHT SHIFT 02:19",
                "The ledger lists one clerk on duty: BR9-0441.\nConfirm your designation.",
                CompletionRule::TokenMatch { tokens: &["BR9-0441"], case_insensitive: true },
            )
        },
        SceneId::Shredder => SceneScript {
            counts: Some(QualifyingAction::DropInZone(ZoneId::Slot)),
            item_rest: Some(Vec2::new(260.0, 300.0)),
            zones: ZoneMap::new(vec![rect(ZoneId::Slot, (980.0, 560.0), (1230.0, 660.0))]),
            action_cue: Some(Cue::ShredderGrind),
            ..card(
                id,
                "DISPOSAL",
                "NIGHT SHIFT 02:44",
                "Three folders are marked DISPOSE.\nFeed them to the machine. It is patient.",
                CompletionRule::Threshold { target: 3 },
            )
        },
        SceneId::Lights => SceneScript {
            min_dwell: 0.5,
            counts: Some(QualifyingAction::PointerDown),
            action_cue: Some(Cue::BreakerClunk),
            ..card(
                id,
                "THE BREAKER",
                "NIGHT SHIFT 03:00",
                "The corridor lights are out again.\nThe breaker needs five tries. It counts them.",
                CompletionRule::Threshold { target: 5 },
            )
        },
        SceneId::Hallway => SceneScript {
            // Always-on pull: retreating is damped even with nothing held
            resistance: Some(ResistancePolicy::new(Axis::X, -1.0, 0.35, false)),
            counts: Some(QualifyingAction::PressInZone(ZoneId::Door)),
            zones: ZoneMap::new(vec![rect(ZoneId::Door, (1100.0, 260.0), (1260.0, 560.0))]),
            action_cue: Some(Cue::DoorThud),
            enter_cues: &[Cue::Heartbeat],
            ..card(
                id,
                "THE CORRIDOR",
                "NIGHT SHIFT 03:11",
                "The door at the end of the corridor.\nWalking toward it is easy.\nThe corridor does not want you to change your mind.",
                CompletionRule::Threshold { target: 1 },
            )
        },
        SceneId::BreakroomPoster => card(
            id,
            "BREAKROOM",
            "NIGHT SHIFT 03:18",
            "YOU ARE DOING FINE\n\nThe poster was not there yesterday.",
            CompletionRule::Timed { after: 6.0 },
        ),
        SceneId::CameraCheck => SceneScript {
            wants_capture: true,
            enter_cues: &[Cue::StaticBurst],
            ..card(
                id,
                "SECURITY CHECK",
                "NIGHT SHIFT 03:26",
                "Security requests a picture of your workstation.\nThe camera light may come on. This is normal.",
                CompletionRule::Timed { after: 8.0 },
            )
        },
        SceneId::Mirror => SceneScript {
            wants_capture: true,
            enter_cues: &[Cue::Heartbeat],
            ..card(
                id,
                "THE MONITOR",
                "NIGHT SHIFT 03:33",
                "The monitor is off. Someone is still on it.\nSit still. It is counting your blinks.",
                CompletionRule::Timed { after: 10.0 },
            )
        },
        SceneId::Memo => SceneScript {
            min_dwell: 0.5,
            rejection: "THAT IS NOT WHAT IT SAYS",
            enter_cues: &[Cue::Whisper],
            ..card(
                id,
                "THE MEMO",
                "NIGHT SHIFT 03:40",
                "A memo in your own handwriting:\n\nTYPE EXACTLY WHAT IT SAYS.\nIT SAYS: DO_NOT_LEAVE",
                CompletionRule::TokenMatch { tokens: &["DO_NOT_LEAVE"], case_insensitive: false },
            )
        },
        SceneId::Archive => SceneScript {
            min_dwell: 0.5,
            counts: Some(QualifyingAction::KeyPress),
            action_cue: Some(Cue::KeyClick),
            ..card(
                id,
                "THE ARCHIVE",
                "NIGHT SHIFT 03:51",
                "Five records remain under your name.\nPress any key, five times,\nand they were never here.",
                CompletionRule::Threshold { target: 5 },
            )
        },
        SceneId::Bolt => SceneScript {
            item_rest: Some(Vec2::new(520.0, 360.0)),
            // Heavy: a full sweep of raw travel moves the bolt a fifth as far
            resistance: Some(ResistancePolicy::new(Axis::X, 1.0, 0.2, true)),
            zones: ZoneMap::new(vec![rect(ZoneId::Slot, (640.0, 330.0), (840.0, 400.0))]),
            action_cue: Some(Cue::BoltScrape),
            ..card(
                id,
                "THE BOLT",
                "NIGHT SHIFT 04:02",
                "The front door has a bolt for a reason.\nDrag it home. It drags back.",
                CompletionRule::ZoneDrop { exits: &[(ZoneId::Slot, Outcome::Done)] },
            )
        },
        SceneId::Stairwell => SceneScript {
            enter_cues: &[Cue::Descend],
            ..card(
                id,
                "THE STAIRWELL",
                "NIGHT SHIFT 04:17",
                "The stairs go down further than the building does.",
                CompletionRule::Timed { after: 9.0 },
            )
        },
        SceneId::Blackout => SceneScript {
            min_dwell: 1.0,
            counts: Some(QualifyingAction::VisibilityReturn),
            action_cue: Some(Cue::PowerOn),
            enter_cues: &[Cue::StaticBurst],
            ..card(
                id,
                "BLACKOUT",
                "NIGHT SHIFT 04:44",
                "The floor goes dark.\nIt only ends when you look away\nand make yourself come back.",
                CompletionRule::Threshold { target: 1 },
            )
        },
        SceneId::Overtime => SceneScript {
            item_rest: Some(Vec2::new(660.0, 560.0)),
            resistance: Some(ResistancePolicy::new(Axis::X, 1.0, 0.45, true)),
            zones: ZoneMap::new(vec![
                rect(ZoneId::Stay, (180.0, 420.0), (500.0, 640.0)),
                circle(ZoneId::Leave, (1000.0, 480.0), 110.0),
            ]),
            action_cue: Some(Cue::StampThud),
            enter_cues: &[Cue::Alarm],
            ..card(
                id,
                "OVERTIME",
                "NIGHT SHIFT 05:06",
                "06:00 never comes for everyone.\n\nYour badge, clerk.\nThe desk keeps you. The door tempts you.",
                CompletionRule::ZoneDrop {
                    exits: &[(ZoneId::Stay, Outcome::Stay), (ZoneId::Leave, Outcome::Leave)],
                },
            )
        },
        SceneId::DoorJammed => SceneScript {
            enter_cues: &[Cue::DoorThud],
            ..card(
                id,
                "JAMMED",
                "NIGHT SHIFT 05:06",
                "The door accepts your badge and does not open.\nBack to the desk, then.",
                CompletionRule::Timed { after: 5.0 },
            )
        },
        SceneId::FinalReport => SceneScript {
            min_dwell: 0.5,
            counts: Some(QualifyingAction::PointerDown),
            action_cue: Some(Cue::StampThud),
            enter_cues: &[Cue::PaperSlide],
            ..card(
                id,
                "FINAL REPORT",
                "NIGHT SHIFT 05:31",
                "Four findings await your signature.\nSign them. Do not read them.",
                CompletionRule::Threshold { target: 4 },
            )
        },
        SceneId::Ending => SceneScript {
            enter_cues: &[Cue::Sunrise],
            ..card(
                id,
                "06:00",
                "NIGHT SHIFT 06:00",
                "The sun comes up like nothing happened.\nClock out, clerk.\n\nSee you tonight.",
                CompletionRule::Terminal,
            )
        },
    }
}
