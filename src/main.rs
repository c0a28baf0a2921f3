//! Night Shift entry point
//!
//! Platform initialization and the frame loop. This file only translates
//! browser events into typed input and snapshots back into DOM updates;
//! every decision lives in the director.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{DomRect, Element, MediaStream, MediaStreamConstraints, PointerEvent};

    use nightshift::Settings;
    use nightshift::audio::AudioEngine;
    use nightshift::consts::*;
    use nightshift::scene::{CaptureStatus, Director, InputEvent, Key, SceneId, StageSnapshot};

    /// App instance holding all state
    struct App {
        director: Director,
        settings: Settings,
        audio: AudioEngine,
        last_time: f64,
        /// Scene the camera request was already dispatched for
        capture_for: Option<SceneId>,
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Night Shift starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let mut audio = AudioEngine::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            director: Director::new(seed),
            settings,
            audio,
            last_time: 0.0,
            capture_for: None,
        }));

        log::info!("Session initialized with seed: {}", seed);

        setup_input_handlers(app.clone());
        setup_visibility(app.clone());
        setup_blur_mute(app.clone());

        request_animation_frame(app);

        log::info!("Night Shift running");
    }

    /// Map a client position into stage space
    fn to_stage(rect: &DomRect, x: f64, y: f64) -> Vec2 {
        let sx = ((x - rect.left()) / rect.width().max(1.0)) as f32 * STAGE_WIDTH;
        let sy = ((y - rect.top()) / rect.height().max(1.0)) as f32 * STAGE_HEIGHT;
        Vec2::new(sx, sy)
    }

    fn map_key(key: &str) -> Option<Key> {
        match key {
            "Enter" => Some(Key::Enter),
            "Backspace" => Some(Key::Backspace),
            "Escape" => Some(Key::Escape),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let stage: Element = document.get_element_by_id("stage").expect("no stage element");

        // Pointer move
        {
            let app = app.clone();
            let stage_clone = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = stage_clone.get_bounding_client_rect();
                let p = to_stage(&rect, event.client_x() as f64, event.client_y() as f64);
                app.borrow_mut().director.handle(InputEvent::PointerMove(p));
            });
            let _ = stage
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down - also the user gesture that unlocks audio
        {
            let app = app.clone();
            let stage_clone = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = stage_clone.get_bounding_client_rect();
                let p = to_stage(&rect, event.client_x() as f64, event.client_y() as f64);
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.director.handle(InputEvent::PointerDown(p));
            });
            let _ = stage
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up on the window so drags that end outside the stage
        // still release
        {
            let app = app.clone();
            let stage_clone = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = stage_clone.get_bounding_client_rect();
                let p = to_stage(&rect, event.client_x() as f64, event.client_y() as f64);
                app.borrow_mut().director.handle(InputEvent::PointerUp(p));
            });
            let _ = window
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.ctrl_key() || event.meta_key() || event.alt_key() {
                    return;
                }
                if let Some(key) = map_key(&event.key()) {
                    event.prevent_default();
                    app.borrow_mut().director.handle(InputEvent::Key(key));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_visibility(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            log::info!("visibility changed, hidden={}", hidden);
            app.borrow_mut().director.handle(InputEvent::Visibility { hidden });
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_blur_mute(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.settings.mute_on_blur {
                    a.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        let mut kick_capture = false;
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            a.last_time = time;

            a.director.tick(dt);

            let cues = a.director.drain_cues();
            for cue in &cues {
                a.audio.play(*cue);
            }
            if a.settings.captions {
                if let (Some(cue), Some(el)) = (
                    cues.last(),
                    web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.get_element_by_id("captions")),
                ) {
                    el.set_text_content(Some(&format!("[{:?}]", cue)));
                }
            }

            let snap = a.director.snapshot();
            if snap.capture == CaptureStatus::Requested && a.capture_for != Some(snap.scene) {
                a.capture_for = Some(snap.scene);
                kick_capture = true;
            }
            update_dom(&a, &snap);
        }

        if kick_capture {
            wasm_bindgen_futures::spawn_local(request_capture(app.clone()));
        }
        request_animation_frame(app);
    }

    /// Push the snapshot into the DOM
    fn update_dom(app: &App, snap: &StageSnapshot) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        document.set_title(snap.tab_title);

        if let Some(stage) = document.get_element_by_id("stage") {
            let mut class = snap.theme.as_str().to_string();
            if !app.settings.allow_flicker() {
                class.push_str(" no-flicker");
            }
            if snap.ended {
                class.push_str(" ended");
            }
            let _ = stage.set_attribute("class", &class);
            let pulse = snap.pulse * app.settings.pulse_scale();
            let _ = stage.set_attribute("style", &format!("--pulse:{:.3}", pulse));
        }

        if let Some(el) = document.get_element_by_id("scene-title") {
            el.set_text_content(Some(snap.title));
        }

        if let Some(el) = document.get_element_by_id("narration") {
            let revealed: String = snap.narration.chars().take(snap.reveal_chars).collect();
            el.set_text_content(Some(&revealed));
        }

        if let Some(el) = document.get_element_by_id("task") {
            match snap.task {
                Some(task) => {
                    el.set_text_content(Some(&format!("{} / {}", task.done, task.target)));
                    let _ = el.set_attribute("class", "");
                }
                None => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        if let Some(el) = document.get_element_by_id("buffer") {
            el.set_text_content(Some(&snap.buffer));
        }

        if let Some(el) = document.get_element_by_id("rejection") {
            match snap.rejection {
                Some(text) => {
                    el.set_text_content(Some(text));
                    let _ = el.set_attribute("class", "");
                }
                None => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&snap.score.to_string()));
        }

        if let Some(el) = document.get_element_by_id("item") {
            match snap.item {
                Some(drag) => {
                    let _ = el.set_attribute("class", if drag.dragging { "held" } else { "" });
                    let _ = el.set_attribute("style", &position_style(drag.item));
                }
                None => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        if let Some(el) = document.get_element_by_id("cursor") {
            let _ = el.set_attribute("style", &position_style(snap.cursor));
        }

        if let Some(el) = document.get_element_by_id("capture-note") {
            let text = match snap.capture {
                CaptureStatus::Idle => "",
                CaptureStatus::Requested => "REQUESTING CAMERA...",
                CaptureStatus::Granted => "FEED LIVE",
                CaptureStatus::Denied => "CAMERA UNAVAILABLE. SECURITY WILL NOTE YOUR REFUSAL.",
            };
            el.set_text_content(Some(text));
        }

        if let Some(el) = document.get_element_by_id("camera-feed") {
            let _ = el.set_attribute(
                "class",
                if snap.capture == CaptureStatus::Granted { "" } else { "hidden" },
            );
        }
    }

    fn position_style(p: Vec2) -> String {
        format!(
            "left:{:.2}%;top:{:.2}%",
            p.x / STAGE_WIDTH * 100.0,
            p.y / STAGE_HEIGHT * 100.0
        )
    }

    async fn request_capture(app: Rc<RefCell<App>>) {
        let granted = acquire_camera().await;
        log::info!("capture request resolved, granted={}", granted);
        app.borrow_mut().director.handle(InputEvent::Capture { granted });
    }

    async fn acquire_camera() -> bool {
        let Some(window) = web_sys::window() else { return false };
        let Ok(media) = window.navigator().media_devices() else { return false };

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        constraints.set_audio(&JsValue::FALSE);
        let Ok(promise) = media.get_user_media_with_constraints(&constraints) else {
            return false;
        };

        match JsFuture::from(promise).await {
            Ok(stream) => {
                let stream: MediaStream = stream.unchecked_into();
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("camera-feed"))
                {
                    if let Ok(video) = el.dyn_into::<web_sys::HtmlVideoElement>() {
                        video.set_src_object(Some(&stream));
                        let _ = video.play();
                    }
                }
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use nightshift::consts::*;
    use nightshift::scene::{
        CompletionRule, Director, InputEvent, Key, Outcome, QualifyingAction, SceneScript,
        ZoneId, ZoneShape,
    };

    fn pass(d: &mut Director, secs: f32) {
        let mut t = 0.0;
        while t < secs {
            d.tick(0.1);
            t += 0.1;
        }
    }

    fn zone_rep(script: &SceneScript, id: ZoneId) -> Vec2 {
        let zone = script
            .zones
            .zones()
            .iter()
            .find(|z| z.id == id)
            .unwrap_or_else(|| panic!("{:?} not in {}", id, script.id.as_str()));
        match zone.shape {
            ZoneShape::Rect { min, max } => (min + max) * 0.5,
            ZoneShape::Circle { center, .. } => center,
        }
    }

    /// Raw pointer target that puts the item into the zone, overshooting
    /// to the stage edge where the scene damps motion toward it
    fn drop_target(script: &SceneScript, id: ZoneId) -> Vec2 {
        let rep = zone_rep(script, id);
        let rest = script.item_rest.unwrap_or(rep);
        if let Some(policy) = script.resistance {
            let damped = policy.factor < 1.0 && (rep.x - rest.x) * policy.direction > 0.0;
            if damped {
                let edge = if rep.x > rest.x { STAGE_WIDTH } else { 0.0 };
                return Vec2::new(edge, rep.y);
            }
        }
        rep
    }

    fn drag(d: &mut Director, from: Vec2, to: Vec2) {
        d.handle(InputEvent::PointerMove(from));
        d.handle(InputEvent::PointerDown(from));
        d.handle(InputEvent::PointerMove(to));
        d.handle(InputEvent::PointerUp(to));
    }

    /// Play the active scene along the compliant path
    fn complete_scene(d: &mut Director) {
        let script = d.script().clone();
        pass(d, script.min_dwell + 0.05);
        match script.rule {
            CompletionRule::Timed { after } => pass(d, after + 0.2),
            CompletionRule::Threshold { target } => match script.counts.unwrap() {
                QualifyingAction::PointerDown => {
                    for _ in 0..target {
                        d.handle(InputEvent::PointerDown(Vec2::new(620.0, 240.0)));
                        d.handle(InputEvent::PointerUp(Vec2::new(620.0, 240.0)));
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
                QualifyingAction::DropInZone(zone) => {
                    for _ in 0..target {
                        let to = drop_target(&script, zone);
                        drag(d, script.item_rest.unwrap(), to);
                    }
                }
                QualifyingAction::PressInZone(zone) => {
                    let at = zone_rep(&script, zone);
                    for _ in 0..target {
                        d.handle(InputEvent::PointerMove(Vec2::new(640.0, 360.0)));
                        d.handle(InputEvent::PointerMove(at));
                        d.handle(InputEvent::PointerDown(at));
                        d.handle(InputEvent::PointerUp(at));
                    }
                }
            },
            CompletionRule::ZoneDrop { exits } => {
                let (zone, _) = exits
                    .iter()
                    .find(|(_, o)| matches!(o, Outcome::Done | Outcome::Signed | Outcome::Stay))
                    .expect("no compliant exit");
                drag(d, script.item_rest.unwrap(), drop_target(&script, *zone));
            }
            CompletionRule::TokenMatch { tokens, .. } => {
                for c in tokens[0].chars() {
                    d.handle(InputEvent::Key(Key::Char(c)));
                }
                d.handle(InputEvent::Key(Key::Enter));
            }
            CompletionRule::Terminal => {}
        }
    }

    /// Drive a full compliant night and report the outcome
    pub fn run_scripted_night() {
        let mut director = Director::new(2026);
        let mut scenes = 1;

        for _ in 0..40 {
            if director.scene().is_terminal() {
                break;
            }
            let before = director.scene();
            complete_scene(&mut director);
            if director.scene() == before {
                eprintln!("stuck in {}", before.as_str());
                std::process::exit(1);
            }
            for cue in director.drain_cues() {
                log::debug!("cue {:?}", cue);
            }
            scenes += 1;
        }

        let snapshot = director.snapshot();
        assert!(snapshot.ended, "the night did not end");
        println!("✓ Night complete: {} scenes visited, final score {}", scenes, snapshot.score);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Night Shift (native) starting...");
    log::info!("Headless mode - run with `trunk serve` for the browser version");

    println!("\nRunning a scripted night...");
    headless::run_scripted_night();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
