//! The director
//!
//! Owns the session: relays typed input to the active scene, polls its
//! timer, mints completion signals and performs transitions. `advance` is
//! idempotent; a signal can only move the exact scene instance that minted
//! it, so duplicates and leftovers from earlier instances are no-ops.

use glam::Vec2;

use crate::audio::Cue;
use crate::clamp_to_stage;
use crate::consts::*;

use super::id::SceneId;
use super::input::{InputEvent, Key};
use super::resist::{ResistancePolicy, ResistanceVector};
use super::rules::{CompletionRule, Outcome, Signal};
use super::script::{self, QualifyingAction, SceneScript};
use super::snapshot::{CaptureStatus, DragView, StageSnapshot, TaskView, Theme};
use super::state::{GameState, SceneProgress};
use super::transitions;

pub struct Director {
    state: GameState,
    script: SceneScript,
    cue_outbox: Vec<Cue>,
}

impl Director {
    pub fn new(seed: u64) -> Self {
        debug_assert_eq!(transitions::validate(), Ok(()));
        let state = GameState::new(seed);
        let script = script::script(state.scene);
        let mut director = Self { state, script, cue_outbox: Vec::new() };
        director.cue_outbox.extend_from_slice(director.script.enter_cues);
        log::info!("session start, seed {}, scene {}", seed, director.script.id.as_str());
        director
    }

    pub fn scene(&self) -> SceneId {
        self.state.scene
    }

    pub fn script(&self) -> &SceneScript {
        &self.script
    }

    /// Mint a completion claim for the active scene instance
    pub fn signal(&self, outcome: Outcome) -> Signal {
        Signal { scene: self.state.scene, outcome, epoch: self.state.epoch }
    }

    /// Apply a completion signal. Returns the scene active afterwards.
    ///
    /// Signals for a different scene or an older instance of this scene are
    /// dropped, and the terminal scene absorbs everything, so calling this
    /// twice with the same signal moves at most once.
    pub fn advance(&mut self, signal: Signal) -> SceneId {
        if signal.scene != self.state.scene || signal.epoch != self.state.epoch {
            log::debug!(
                "stale signal {:?}/{:?} ignored in {}",
                signal.scene,
                signal.outcome,
                self.state.scene.as_str()
            );
            return self.state.scene;
        }
        if self.state.scene.is_terminal() {
            return self.state.scene;
        }
        let Some(to) = transitions::next(signal.scene, signal.outcome) else {
            // The validated graph makes this unreachable; stay put if it
            // happens anyway in a release build
            debug_assert!(
                false,
                "no edge for {:?} from {}",
                signal.outcome,
                self.state.scene.as_str()
            );
            log::error!("no edge for {:?} from {}", signal.outcome, self.state.scene.as_str());
            return self.state.scene;
        };
        if !matches!(signal.outcome, Outcome::Refused | Outcome::Leave) {
            self.state.score += SCENE_SCORE;
        }
        self.enter(to);
        self.state.scene
    }

    fn enter(&mut self, to: SceneId) {
        log::info!(
            "scene {} -> {} (epoch {})",
            self.state.scene.as_str(),
            to.as_str(),
            self.state.epoch + 1
        );
        self.state.scene = to;
        self.state.epoch += 1;
        self.state.stress = to.stress();
        self.script = script::script(to);
        // Wholesale replacement: the outgoing scene's timer, tally, drag
        // and rejection all die here
        self.state.progress = SceneProgress::fresh(&self.script);
        // Already-requested cues survive the transition
        self.cue_outbox.extend_from_slice(self.script.enter_cues);
    }

    /// Advance scene time. Hidden tabs freeze here, which pauses timers,
    /// the reveal and the pulse all at once.
    pub fn tick(&mut self, dt: f32) {
        if self.state.hidden {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.state.progress.elapsed += dt;
        let stress = self.state.stress;
        self.state.pulse.tick(dt, stress);
        if let Some(outcome) = self.script.rule.on_elapsed(self.state.progress.elapsed) {
            let signal = self.signal(outcome);
            self.advance(signal);
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerUp(p) => self.pointer_up(p),
            InputEvent::Key(key) => self.key(key),
            InputEvent::Visibility { hidden } => self.visibility(hidden),
            InputEvent::Capture { granted } => {
                self.state.progress.capture =
                    if granted { CaptureStatus::Granted } else { CaptureStatus::Denied };
                if !granted {
                    log::warn!("capture denied, continuing degraded");
                }
            }
        }
    }

    fn pointer_move(&mut self, p: Vec2) {
        let p = clamp_to_stage(p);
        let policy = self.script.resistance.unwrap_or(ResistancePolicy::FREE);
        let progress = &mut self.state.progress;
        if progress.pointer_seen {
            progress.cursor.update(p, &policy);
        } else {
            // First report of this scene teleports instead of applying a
            // delta against the entry position
            progress.pointer_seen = true;
            progress.cursor = ResistanceVector::at(p);
        }
        if progress.cursor.is_dragging() {
            progress.item_pos = progress.cursor.presented();
        }
    }

    fn pointer_down(&mut self, p: Vec2) {
        let p = clamp_to_stage(p);
        self.pointer_move(p);

        let epoch = self.state.epoch;
        match self.script.counts {
            Some(QualifyingAction::PointerDown) => self.qualify(),
            Some(QualifyingAction::PressInZone(target)) => {
                let at = self.state.progress.cursor.presented();
                if self.script.zones.classify(at) == Some(target) {
                    self.qualify();
                }
            }
            _ => {}
        }
        if self.state.epoch != epoch {
            return;
        }

        if self.script.item_rest.is_some()
            && !self.state.progress.cursor.is_dragging()
            && self.state.progress.cursor.presented().distance(self.state.progress.item_pos)
                <= GRAB_RADIUS
        {
            self.state.progress.cursor.begin_drag(p);
            log::debug!("grab in {}", self.state.scene.as_str());
        }
    }

    fn pointer_up(&mut self, p: Vec2) {
        let p = clamp_to_stage(p);
        self.pointer_move(p);
        if !self.state.progress.cursor.is_dragging() {
            return;
        }
        self.state.progress.cursor.end_drag();

        let dropped_at = self.state.progress.item_pos;
        let zone = self.script.zones.classify(dropped_at);
        log::debug!("drop at {:?} -> {:?} in {}", dropped_at, zone, self.state.scene.as_str());

        if let Some(outcome) = self.script.rule.on_drop(zone) {
            if let Some(cue) = self.script.action_cue {
                self.cue_outbox.push(cue);
            }
            let signal = self.signal(outcome);
            self.advance(signal);
            return;
        }
        if let (Some(QualifyingAction::DropInZone(target)), Some(hit)) = (self.script.counts, zone)
        {
            if hit == target {
                self.snap_item_to_rest();
                self.qualify();
                return;
            }
        }
        // Neutral or unlisted: the item walks home
        self.snap_item_to_rest();
    }

    fn snap_item_to_rest(&mut self) {
        if let Some(rest) = self.script.item_rest {
            self.state.progress.item_pos = rest;
        }
    }

    fn key(&mut self, key: Key) {
        let epoch = self.state.epoch;
        if self.script.counts == Some(QualifyingAction::KeyPress) {
            self.qualify();
            if self.state.epoch != epoch {
                return;
            }
        }
        if !matches!(self.script.rule, CompletionRule::TokenMatch { .. }) {
            return;
        }
        match key {
            Key::Char(c) => {
                let progress = &mut self.state.progress;
                progress.rejection = None;
                if progress.buffer.chars().count() < MAX_BUFFER_LEN {
                    progress.buffer.push(c);
                }
                self.cue_outbox.push(Cue::KeyClick);
            }
            Key::Backspace => {
                self.state.progress.rejection = None;
                self.state.progress.buffer.pop();
            }
            Key::Enter => self.submit(),
            Key::Escape => {
                self.state.progress.rejection = None;
                self.state.progress.buffer.clear();
            }
        }
    }

    fn submit(&mut self) {
        if self.state.progress.elapsed < self.script.min_dwell {
            return;
        }
        match self.script.rule.on_submit(&self.state.progress.buffer) {
            Some(outcome) => {
                let signal = self.signal(outcome);
                self.advance(signal);
            }
            None => {
                log::debug!(
                    "rejected submit {:?} in {}",
                    self.state.progress.buffer,
                    self.state.scene.as_str()
                );
                self.state.progress.rejection = Some(self.script.rejection);
                self.state.progress.buffer.clear();
            }
        }
    }

    /// Tally one qualifying action, fire the rule if this was the one
    fn qualify(&mut self) {
        if self.state.progress.elapsed < self.script.min_dwell {
            return;
        }
        self.state.progress.count += 1;
        self.state.score += ACTION_SCORE;
        if let Some(cue) = self.script.action_cue {
            self.cue_outbox.push(cue);
        }
        if let Some(outcome) = self.script.rule.on_count(self.state.progress.count) {
            let signal = self.signal(outcome);
            self.advance(signal);
        }
    }

    fn visibility(&mut self, hidden: bool) {
        if hidden == self.state.hidden {
            return;
        }
        self.state.hidden = hidden;
        log::debug!("visibility hidden={}", hidden);
        if !hidden && self.script.counts == Some(QualifyingAction::VisibilityReturn) {
            self.qualify();
        }
    }

    /// Take all cues requested since the last drain
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cue_outbox)
    }

    pub fn snapshot(&self) -> StageSnapshot {
        let state = &self.state;
        let script = &self.script;
        let reveal_chars = ((state.progress.elapsed * REVEAL_CPS) as usize)
            .min(script.narration.chars().count());
        let item = script.item_rest.map(|rest| DragView {
            item: state.progress.item_pos,
            rest,
            dragging: state.progress.cursor.is_dragging(),
        });
        let task = match script.rule {
            CompletionRule::Threshold { target } => {
                Some(TaskView { done: state.progress.count.min(target), target })
            }
            _ => None,
        };
        StageSnapshot {
            scene: state.scene,
            title: script.title,
            tab_title: script.tab_title,
            theme: Theme::from_stress(state.stress),
            narration: script.narration,
            reveal_chars,
            cursor: state.progress.cursor.presented(),
            item,
            task,
            buffer: state.progress.buffer.clone(),
            rejection: state.progress.rejection,
            capture: state.progress.capture,
            pulse: state.pulse.value,
            stress: state.stress,
            score: state.score,
            ended: state.scene.is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::zones::{ZoneId, ZoneShape};

    fn pass(d: &mut Director, secs: f32) {
        let mut t = 0.0;
        while t < secs {
            d.tick(0.1);
            t += 0.1;
        }
    }

    fn press(d: &mut Director, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        d.handle(InputEvent::PointerDown(p));
        d.handle(InputEvent::PointerUp(p));
    }

    fn drag(d: &mut Director, from: Vec2, to: Vec2) {
        d.handle(InputEvent::PointerMove(from));
        d.handle(InputEvent::PointerDown(from));
        d.handle(InputEvent::PointerMove(to));
        d.handle(InputEvent::PointerUp(to));
    }

    fn type_str(d: &mut Director, s: &str) {
        for c in s.chars() {
            d.handle(InputEvent::Key(Key::Char(c)));
        }
    }

    /// Raw pointer target that lands the held item in the compliant zone,
    /// overshooting where the scene damps the motion
    fn raw_drop_target(id: SceneId) -> Vec2 {
        match id {
            SceneId::Contract => Vec2::new(280.0, 520.0),
            SceneId::Badge => Vec2::new(960.0, 320.0),
            SceneId::CoffeeBreak => Vec2::new(0.0, 410.0),
            SceneId::Shredder => Vec2::new(1100.0, 610.0),
            SceneId::Bolt => Vec2::new(1280.0, 360.0),
            SceneId::Overtime => Vec2::new(340.0, 530.0),
            other => panic!("no drop target for {:?}", other),
        }
    }

    fn zone_point(script: &SceneScript, id: ZoneId) -> Vec2 {
        let zone = script.zones.zones().iter().find(|z| z.id == id).unwrap();
        match zone.shape {
            ZoneShape::Rect { min, max } => (min + max) * 0.5,
            ZoneShape::Circle { center, .. } => center,
        }
    }

    /// Complete the active scene along the compliant path
    fn complete_scene(d: &mut Director) {
        let s = d.script().clone();
        pass(d, s.min_dwell + 0.05);
        match s.rule {
            CompletionRule::Timed { after } => pass(d, after + 0.2),
            CompletionRule::Threshold { target } => match s.counts.unwrap() {
                QualifyingAction::PointerDown => {
                    for _ in 0..target {
                        press(d, 620.0, 240.0);
                    }
                }
                QualifyingAction::KeyPress => {
                    for _ in 0..target {
                        d.handle(InputEvent::Key(Key::Enter));
                    }
                }
                QualifyingAction::VisibilityReturn => {
                    for _ in 0..target {
                        d.handle(InputEvent::Visibility { hidden: true });
                        d.handle(InputEvent::Visibility { hidden: false });
                    }
                }
                QualifyingAction::DropInZone(_) => {
                    for _ in 0..target {
                        drag(d, s.item_rest.unwrap(), raw_drop_target(s.id));
                    }
                }
                QualifyingAction::PressInZone(zone) => {
                    let at = zone_point(&s, zone);
                    for _ in 0..target {
                        d.handle(InputEvent::PointerMove(Vec2::new(640.0, 360.0)));
                        d.handle(InputEvent::PointerMove(at));
                        press(d, at.x, at.y);
                    }
                }
            },
            CompletionRule::ZoneDrop { .. } => {
                drag(d, s.item_rest.unwrap(), raw_drop_target(s.id));
            }
            CompletionRule::TokenMatch { tokens, .. } => {
                type_str(d, tokens[0]);
                d.handle(InputEvent::Key(Key::Enter));
            }
            CompletionRule::Terminal => {}
        }
    }

    fn drive_until(d: &mut Director, target: SceneId) {
        for _ in 0..40 {
            if d.scene() == target {
                return;
            }
            let before = d.scene();
            complete_scene(d);
            assert_ne!(d.scene(), before, "stuck in {:?}", before);
        }
        panic!("never reached {:?}", target);
    }

    #[test]
    fn test_compliant_night_reaches_the_ending() {
        let mut d = Director::new(11);
        drive_until(&mut d, SceneId::Ending);
        let snap = d.snapshot();
        assert!(snap.ended);
        assert_eq!(snap.scene, SceneId::Ending);
        assert!(snap.score > 0);
    }

    #[test]
    fn test_terminal_scene_absorbs_everything() {
        let mut d = Director::new(11);
        drive_until(&mut d, SceneId::Ending);
        let sig = d.signal(Outcome::Done);
        assert_eq!(d.advance(sig), SceneId::Ending);
        pass(&mut d, 30.0);
        press(&mut d, 640.0, 360.0);
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Ending);
    }

    #[test]
    fn test_advance_is_idempotent() {
        let mut d = Director::new(3);
        pass(&mut d, 2.3);
        assert_eq!(d.scene(), SceneId::Title);
        pass(&mut d, 1.6);
        let sig = d.signal(Outcome::Done);
        assert_eq!(d.advance(sig), SceneId::Disclaimer);
        // Replay moves nothing
        assert_eq!(d.advance(sig), SceneId::Disclaimer);
    }

    #[test]
    fn test_stale_epoch_signal_cannot_advance_a_revisit() {
        let mut d = Director::new(5);
        drive_until(&mut d, SceneId::Contract);
        let stale = d.signal(Outcome::Signed);

        // Refuse instead: one full damped sweep to the reject tray
        drag(&mut d, Vec2::new(640.0, 520.0), Vec2::new(1280.0, 520.0));
        assert_eq!(d.scene(), SceneId::Refusal);
        pass(&mut d, 4.7);
        assert_eq!(d.scene(), SceneId::Contract);

        // Same scene id, older instance: the leftover claim is dead
        assert_eq!(d.advance(stale), SceneId::Contract);

        drag(&mut d, Vec2::new(640.0, 520.0), Vec2::new(280.0, 520.0));
        assert_eq!(d.scene(), SceneId::Orientation);
    }

    #[test]
    fn test_refusing_scores_nothing() {
        let mut d = Director::new(5);
        drive_until(&mut d, SceneId::Contract);
        let before = d.snapshot().score;
        drag(&mut d, Vec2::new(640.0, 520.0), Vec2::new(1280.0, 520.0));
        assert_eq!(d.scene(), SceneId::Refusal);
        assert_eq!(d.snapshot().score, before);
    }

    #[test]
    fn test_timer_dies_with_its_scene() {
        let mut d = Director::new(9);
        drive_until(&mut d, SceneId::Orientation);
        pass(&mut d, 2.0);
        // Leave early, then wait far past the old deadline
        assert_eq!(d.advance(d.signal(Outcome::Done)), SceneId::Badge);
        pass(&mut d, 20.0);
        assert_eq!(d.scene(), SceneId::Badge);
    }

    #[test]
    fn test_threshold_fires_on_the_exact_action() {
        let mut d = Director::new(13);
        drive_until(&mut d, SceneId::Inbox);
        pass(&mut d, 0.6);
        for i in 1..=3 {
            press(&mut d, 620.0, 240.0);
            assert_eq!(d.scene(), SceneId::Inbox);
            assert_eq!(d.snapshot().task.unwrap().done, i);
        }
        press(&mut d, 620.0, 240.0);
        assert_eq!(d.scene(), SceneId::Redaction);
    }

    #[test]
    fn test_actions_before_dwell_do_not_count() {
        let mut d = Director::new(13);
        pass(&mut d, 2.3);
        assert_eq!(d.scene(), SceneId::Title);
        // Too early: the key is ignored
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Title);
        assert_eq!(d.snapshot().task.unwrap().done, 0);
        pass(&mut d, 1.6);
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Disclaimer);
    }

    #[test]
    fn test_rejected_token_keeps_the_scene() {
        let mut d = Director::new(17);
        drive_until(&mut d, SceneId::Ledger);
        pass(&mut d, 0.6);
        type_str(&mut d, "WRONG");
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Ledger);
        assert_eq!(d.snapshot().rejection, Some("INCORRECT CLERK ID"));
        assert!(d.snapshot().buffer.is_empty());

        // The next keystroke clears the rejection
        d.handle(InputEvent::Key(Key::Char('b')));
        assert_eq!(d.snapshot().rejection, None);

        type_str(&mut d, "r9-0441");
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Shredder);
    }

    #[test]
    fn test_ambiguous_drop_snaps_home() {
        let mut d = Director::new(19);
        drive_until(&mut d, SceneId::Contract);
        drag(&mut d, Vec2::new(640.0, 520.0), Vec2::new(600.0, 300.0));
        assert_eq!(d.scene(), SceneId::Contract);
        let item = d.snapshot().item.unwrap();
        assert_eq!(item.item, item.rest);
        assert!(!item.dragging);
    }

    #[test]
    fn test_hidden_tab_freezes_time() {
        let mut d = Director::new(23);
        d.handle(InputEvent::Visibility { hidden: true });
        pass(&mut d, 10.0);
        assert_eq!(d.scene(), SceneId::Boot);
        d.handle(InputEvent::Visibility { hidden: false });
        pass(&mut d, 2.3);
        assert_eq!(d.scene(), SceneId::Title);
    }

    #[test]
    fn test_capture_denial_degrades_without_blocking() {
        let mut d = Director::new(29);
        drive_until(&mut d, SceneId::CameraCheck);
        assert_eq!(d.snapshot().capture, CaptureStatus::Requested);
        d.handle(InputEvent::Capture { granted: false });
        assert_eq!(d.snapshot().capture, CaptureStatus::Denied);
        pass(&mut d, 8.3);
        assert_eq!(d.scene(), SceneId::Mirror);
    }

    #[test]
    fn test_stress_and_theme_follow_the_scene() {
        let mut d = Director::new(31);
        drive_until(&mut d, SceneId::Mirror);
        let snap = d.snapshot();
        assert_eq!(snap.stress, SceneId::Mirror.stress());
        assert_eq!(snap.theme, Theme::Terror);
    }

    #[test]
    fn test_action_cues_survive_the_transition() {
        let mut d = Director::new(37);
        assert_eq!(d.drain_cues(), vec![Cue::PowerOn]);
        pass(&mut d, 2.3);
        assert_eq!(d.scene(), SceneId::Title);
        d.drain_cues();
        pass(&mut d, 1.6);
        d.drain_cues();
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Disclaimer);
        // The keystroke's click was queued before the transition and is
        // still deliverable after it
        assert_eq!(d.drain_cues(), vec![Cue::KeyClick]);
        assert!(d.drain_cues().is_empty());
    }

    #[test]
    fn test_first_pointer_report_teleports() {
        let mut d = Director::new(41);
        d.handle(InputEvent::PointerMove(Vec2::new(100.0, 100.0)));
        assert_eq!(d.snapshot().cursor, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_typed_buffer_is_capped() {
        let mut d = Director::new(43);
        drive_until(&mut d, SceneId::Ledger);
        pass(&mut d, 0.6);
        for _ in 0..200 {
            d.handle(InputEvent::Key(Key::Char('x')));
        }
        assert_eq!(d.snapshot().buffer.chars().count(), MAX_BUFFER_LEN);
    }

    #[test]
    fn test_jammed_door_loops_back_to_overtime() {
        let mut d = Director::new(47);
        drive_until(&mut d, SceneId::Overtime);
        // Fight the damping all the way to the exit
        drag(&mut d, Vec2::new(660.0, 560.0), Vec2::new(1280.0, 480.0));
        assert_eq!(d.scene(), SceneId::DoorJammed);
        pass(&mut d, 5.3);
        assert_eq!(d.scene(), SceneId::Overtime);
        // Staying is the only way forward
        drag(&mut d, Vec2::new(660.0, 560.0), Vec2::new(340.0, 530.0));
        assert_eq!(d.scene(), SceneId::FinalReport);
    }

    #[test]
    fn test_blackout_needs_the_tab_to_leave_and_return() {
        let mut d = Director::new(53);
        drive_until(&mut d, SceneId::Blackout);
        pass(&mut d, 1.2);
        press(&mut d, 640.0, 360.0);
        d.handle(InputEvent::Key(Key::Enter));
        assert_eq!(d.scene(), SceneId::Blackout);
        d.handle(InputEvent::Visibility { hidden: true });
        d.handle(InputEvent::Visibility { hidden: false });
        assert_eq!(d.scene(), SceneId::Overtime);
    }

    #[test]
    fn test_resisted_refusal_needs_the_full_sweep() {
        let mut d = Director::new(59);
        drive_until(&mut d, SceneId::Contract);
        // Half a sweep is not enough against 0.45 damping
        drag(&mut d, Vec2::new(640.0, 520.0), Vec2::new(960.0, 520.0));
        assert_eq!(d.scene(), SceneId::Contract);
        let item = d.snapshot().item.unwrap();
        assert_eq!(item.item, item.rest);
    }
}
