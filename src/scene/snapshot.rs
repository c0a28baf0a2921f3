//! Presentation snapshot
//!
//! The one value the boundary reads per frame. Everything here is derived
//! from session state; nothing in it feeds back into scene logic.

use glam::Vec2;
use serde::Serialize;

use super::id::SceneId;

/// Visual register, derived from stress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Theme {
    Calm,
    Uneasy,
    Tense,
    Terror,
}

impl Theme {
    pub fn from_stress(stress: u8) -> Self {
        match stress {
            0 => Theme::Calm,
            1 => Theme::Uneasy,
            2 => Theme::Tense,
            _ => Theme::Terror,
        }
    }

    /// CSS class applied to the stage body
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Calm => "theme-calm",
            Theme::Uneasy => "theme-uneasy",
            Theme::Tense => "theme-tense",
            Theme::Terror => "theme-terror",
        }
    }
}

/// Where the camera request stands. Denial degrades the scene, it never
/// blocks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptureStatus {
    Idle,
    Requested,
    Granted,
    Denied,
}

/// Draggable item state for scenes that have one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragView {
    pub item: Vec2,
    pub rest: Vec2,
    pub dragging: bool,
}

/// Tally display for threshold scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub done: u32,
    pub target: u32,
}

/// Everything the DOM needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct StageSnapshot {
    pub scene: SceneId,
    pub title: &'static str,
    pub tab_title: &'static str,
    pub theme: Theme,
    pub narration: &'static str,
    /// Characters of `narration` revealed so far
    pub reveal_chars: usize,
    /// Presented cursor position
    pub cursor: Vec2,
    pub item: Option<DragView>,
    pub task: Option<TaskView>,
    pub buffer: String,
    pub rejection: Option<&'static str>,
    pub capture: CaptureStatus,
    pub pulse: f32,
    pub stress: u8,
    pub score: u64,
    pub ended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_tracks_stress() {
        assert_eq!(Theme::from_stress(0), Theme::Calm);
        assert_eq!(Theme::from_stress(1), Theme::Uneasy);
        assert_eq!(Theme::from_stress(2), Theme::Tense);
        assert_eq!(Theme::from_stress(3), Theme::Terror);
        // Out-of-range stress saturates rather than panics
        assert_eq!(Theme::from_stress(200), Theme::Terror);
    }

    #[test]
    fn test_theme_classes_are_distinct() {
        let all = [Theme::Calm, Theme::Uneasy, Theme::Tense, Theme::Terror];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = StageSnapshot {
            scene: SceneId::Title,
            title: "NIGHT SHIFT",
            tab_title: "NIGHT SHIFT",
            theme: Theme::Calm,
            narration: "press any key",
            reveal_chars: 5,
            cursor: Vec2::new(640.0, 360.0),
            item: None,
            task: Some(TaskView { done: 0, target: 1 }),
            buffer: String::new(),
            rejection: None,
            capture: CaptureStatus::Idle,
            pulse: 0.2,
            stress: 0,
            score: 0,
            ended: false,
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"Title\""));
    }
}
