//! Meteor Guard entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent, UrlSearchParams};

    use meteor_guard::audio::AudioManager;
    use meteor_guard::consts::FRAME_DT;
    use meteor_guard::platform::HeldKeys;
    use meteor_guard::renderer::{CanvasRenderer, Hud};
    use meteor_guard::sim::autopilot;
    use meteor_guard::sim::{Collaborators, Direction, Field, Session, run_frame};
    use meteor_guard::{Difficulty, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        tuning: Tuning,
        settings: Settings,
        keys: HeldKeys,
        renderer: CanvasRenderer,
        hud: Hud,
        audio: AudioManager,
        /// Autopilot drives the ship (`?demo`)
        demo: bool,
        last_time: f64,
        /// Touch currently dragging the ship: (identifier, target x)
        touch: Option<(i32, f32)>,
    }

    impl Game {
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            let field = self.session.field();
            match Session::new(self.tuning.clone(), field, seed) {
                Ok(session) => self.session = session,
                Err(e) => {
                    log::error!("Cannot restart: {}", e);
                    return;
                }
            }
            self.keys = HeldKeys::default();
            self.touch = None;
            self.hud.reset();
            log::info!("Game restarted with seed: {}", seed);
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            match self.renderer.resize(width, height, window.device_pixel_ratio()) {
                Ok(field) => {
                    self.session.resize(field);
                }
                Err(e) => log::warn!("Resize failed: {:?}", e),
            }
        }

        /// Turn a drag target or the autopilot into held keys
        fn steer(&mut self) {
            if self.demo {
                self.keys.apply(&autopilot::steer(&self.session));
            } else if let Some((_, target_x)) = self.touch {
                let ship = &self.session.player;
                let dx = target_x - ship.aabb.center_x();
                self.keys.release_all();
                if dx < -ship.speed {
                    self.keys.press(Direction::Left);
                } else if dx > ship.speed {
                    self.keys.press(Direction::Right);
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                FRAME_DT
            };
            self.last_time = time;

            self.steer();
            self.renderer.begin_frame();

            let Game {
                session,
                keys,
                renderer,
                hud,
                audio,
                ..
            } = &mut *self;
            let mut out = Collaborators {
                renderer,
                sound: audio,
                stats: hud,
            };
            run_frame(session, keys, dt, &mut out);
            self.hud.draw(self.session.field());
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Meteor Guard starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // ?demo lets the autopilot fly, ?preset=NAME picks the difficulty
        let search = window.location().search().unwrap_or_default();
        let params = UrlSearchParams::new_with_str(&search)?;
        let demo = params.has("demo");
        let difficulty = params
            .get("preset")
            .and_then(|name| Difficulty::from_str(&name))
            .unwrap_or_default();

        let settings = Settings::default();
        let tuning = Tuning::from_preset(difficulty);
        let renderer = CanvasRenderer::new(canvas, &document)?;
        let hud = Hud::new(renderer.context().clone(), &document);
        let audio = AudioManager::new(&settings);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(tuning.clone(), Field::default(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!(
            "Game initialized with seed: {} ({}{})",
            seed,
            difficulty.as_str(),
            if demo { ", demo" } else { "" }
        );

        let game = Rc::new(RefCell::new(Game {
            session,
            tuning,
            settings,
            keys: HeldKeys::default(),
            renderer,
            hud,
            audio,
            demo,
            last_time: 0.0,
            touch: None,
        }));
        game.borrow_mut().resize();

        setup_resize(game.clone())?;
        setup_keyboard(game.clone())?;
        setup_touch(game.clone())?;
        setup_focus(game.clone())?;

        request_animation_frame(game);

        log::info!("Meteor Guard running!");
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let key = event.key();
                match key.as_str() {
                    "Enter" if !g.session.is_running() => g.restart(),
                    "m" | "M" => {
                        let muted = g.settings.toggle_mute();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        log::info!("Muted: {}", muted);
                    }
                    "-" | "=" | "+" => {
                        let steps = if key == "-" { -1 } else { 1 };
                        let volume = g.settings.adjust_volume(steps);
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        log::info!("Volume: {:.1}", volume);
                    }
                    "b" | "B" => {
                        let on = g.settings.toggle_mute_on_blur();
                        log::info!("Mute on blur: {}", on);
                    }
                    _ => {
                        if !g.demo && g.keys.key_down(&key) {
                            event.prevent_default();
                        }
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if !g.demo {
                    g.keys.key_up(&event.key());
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_touch(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Touch start: grab the ship, or restart after the run ends
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if !g.session.is_running() {
                    g.restart();
                    return;
                }
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    let (x, y) = (touch.page_x() as f32, touch.page_y() as f32);
                    let ship = g.session.player.aabb;
                    if x > ship.left() && x < ship.right() && y > ship.top() && y < ship.bottom() {
                        g.touch = Some((touch.identifier(), x));
                    }
                }
            });
            window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move: drag target follows the finger
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((id, _)) = g.touch else { return };
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i).filter(|t| t.identifier() == id) {
                        event.prevent_default();
                        g.touch = Some((id, touch.page_x() as f32));
                    }
                }
            });
            window.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end: lifting the dragging finger fires
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((id, _)) = g.touch else { return };
                let touches = event.changed_touches();
                let lifted = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .any(|t| t.identifier() == id);
                if lifted {
                    g.touch = None;
                    g.keys.release_all();
                    g.keys.trigger_fire();
                }
            });
            window.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_focus(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Window blur (click outside): drop held keys so the ship stops
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.release_all();
                g.touch = None;
                let settings = g.settings.clone();
                g.audio.set_blurred(true, &settings);
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let settings = g.settings.clone();
                g.audio.set_blurred(false, &settings);
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless_run {
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use meteor_guard::consts::FRAME_DT;
    use meteor_guard::platform::HeldKeys;
    use meteor_guard::platform::headless::{LogHud, LogSound, SpriteCounter};
    use meteor_guard::sim::autopilot;
    use meteor_guard::sim::{Collaborators, Session, run_frame};
    use meteor_guard::{Difficulty, Tuning};

    /// Give up on a run the autopilot survives this long
    const MAX_FRAMES: u64 = 60 * 60 * 15;

    fn parse_preset(name: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(name)
            .ok_or_else(|| format!("unknown preset '{}' (relaxed, standard, frantic)", name))
    }

    /// Run one autopilot session without a browser and print its summary
    #[derive(Debug, Parser)]
    #[command(name = "meteor-guard")]
    #[command(about = "Headless autopilot run of Meteor Guard")]
    struct RunArgs {
        /// Tuning JSON file; defaults to the preset
        tuning_path: Option<String>,
        /// Difficulty preset used when no tuning file is given or it fails to load
        #[arg(long, value_parser = parse_preset, default_value = "standard")]
        preset: Difficulty,
        /// RNG seed; defaults to the current time
        #[arg(long)]
        seed: Option<u64>,
    }

    fn load_tuning(args: &RunArgs) -> Tuning {
        let Some(path) = &args.tuning_path else {
            return Tuning::from_preset(args.preset);
        };
        match Tuning::from_json_file(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}; falling back to {} preset", e, args.preset.as_str());
                Tuning::from_preset(args.preset)
            }
        }
    }

    pub fn run() -> std::process::ExitCode {
        let args = RunArgs::parse();

        let tuning = load_tuning(&args);
        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        let field = tuning.field;
        let mut session = match Session::new(tuning, field, seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("{}", e);
                return std::process::ExitCode::FAILURE;
            }
        };

        let mut keys = HeldKeys::default();
        let mut sprites = SpriteCounter::default();
        let mut sound = LogSound::default();
        let mut hud = LogHud::default();

        while session.is_running() && session.frame < MAX_FRAMES {
            keys.apply(&autopilot::steer(&session));
            let mut out = Collaborators {
                renderer: &mut sprites,
                sound: &mut sound,
                stats: &mut hud,
            };
            run_frame(&mut session, &mut keys, FRAME_DT, &mut out);
        }

        if session.is_running() {
            log::warn!("Autopilot still alive after {} frames", session.frame);
        }
        let summary = hud.summary.take().unwrap_or_else(|| session.summary());
        log::info!(
            "{} frames, {} sprites drawn, {} sounds",
            session.frame,
            sprites.sprites,
            sound.played
        );

        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{}", json);
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to encode summary: {}", e);
                std::process::ExitCode::FAILURE
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Meteor Guard (native) starting...");
    headless_run::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
