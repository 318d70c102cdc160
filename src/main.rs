//! Survive entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, MouseEvent, TouchEvent};

    use survive::audio::AudioManager;
    use survive::persistence::LocalStorage;
    use survive::platform::Key;
    use survive::sim::{GameState, ScoringPolicy};
    use survive::{Game, SessionConfig, Settings};

    /// Everything the browser callbacks share
    struct App {
        game: Game<LocalStorage>,
        audio: AudioManager,
        /// Centre of the joystick element in client px, captured on press
        stick_center: Vec2,
    }

    impl App {
        fn key_down(&mut self, key: Key) {
            self.audio.resume();
            self.game.key_down(key);
        }

        fn toggle_sound(&mut self) -> bool {
            let enabled = self.game.toggle_sound();
            self.audio.set_muted(!enabled);
            enabled
        }

        fn frame(&mut self, time: f64) {
            for event in self.game.frame(time) {
                event.dispatch(&mut self.audio);
            }
            render(&self.game);
            update_hud(self.game.state());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Survive starting...");

        let storage = LocalStorage::open();
        let settings = Settings::load(&storage);
        let mut config = SessionConfig::default();
        settings.apply(&mut config);

        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(config, seed, storage) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid game configuration: {}", e);
                return;
            }
        };
        let audio = AudioManager::new(game.sound_enabled());
        let app = Rc::new(RefCell::new(App {
            game,
            audio,
            stick_center: Vec2::ZERO,
        }));

        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        if let Some(btn) = document.get_element_by_id("sound-toggle") {
            btn.set_text_content(Some(sound_label(app.borrow().game.sound_enabled())));
        }

        setup_keyboard(app.clone());
        setup_joystick(app.clone());
        setup_buttons(app.clone());

        request_animation_frame(app);

        log::info!("Survive running!");
    }

    fn sound_label(enabled: bool) -> &'static str {
        if enabled { "Sound: on" } else { "Sound: off" }
    }

    /// Hand the session snapshot to the page's renderer, if it installed one
    fn render(game: &Game<LocalStorage>) {
        let Some(window) = web_sys::window() else { return };
        let Ok(hook) = js_sys::Reflect::get(&window, &JsValue::from_str("surviveRender")) else {
            return;
        };
        let Ok(hook) = hook.dyn_into::<js_sys::Function>() else {
            return;
        };
        match game.snapshot() {
            Ok(json) => {
                if let Err(e) = hook.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Render hook failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
        }
    }

    fn update_hud(state: &GameState) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.get_element_by_id("score") {
            let text = match state.score.policy {
                ScoringPolicy::Cumulative => format!("Steps: {}", state.score.value),
                ScoringPolicy::Countdown => format!("Steps left: {}", state.score.value),
            };
            el.set_text_content(Some(&text));
        }

        if let Some(el) = document.get_element_by_id("status") {
            match state.phase.banner() {
                Some(text) => {
                    el.set_text_content(Some(text));
                    let _ = el.set_attribute("class", "");
                }
                None => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    app.borrow_mut().key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    app.borrow_mut().game.key_up(key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn element_center(el: &Element) -> Vec2 {
        let rect = el.get_bounding_client_rect();
        Vec2::new(
            (rect.left() + rect.width() / 2.0) as f32,
            (rect.top() + rect.height() / 2.0) as f32,
        )
    }

    fn setup_joystick(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let Some(stick) = window
            .document()
            .and_then(|d| d.get_element_by_id("joystick"))
        else {
            log::info!("No #joystick element, touch controls disabled");
            return;
        };

        // Mouse press on the stick
        {
            let app = app.clone();
            let stick_el = stick.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.stick_center = element_center(&stick_el);
                let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let offset = pointer - a.stick_center;
                a.game.joystick_begin(offset);
            });
            let _ = stick
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse drag anywhere on the page
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let offset = pointer - a.stick_center;
                a.game.joystick_move(offset);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.joystick_end();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let stick_el = stick.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.stick_center = element_center(&stick_el);
                    let pointer = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let offset = pointer - a.stick_center;
                    a.game.joystick_begin(offset);
                }
            });
            let _ = stick
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let pointer = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let offset = pointer - a.stick_center;
                    a.game.joystick_move(offset);
                }
            });
            let _ = stick
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().game.joystick_end();
            });
            let _ = stick.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("sound-toggle") {
            let app = app.clone();
            let btn_el = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let enabled = app.borrow_mut().toggle_sound();
                btn_el.set_text_content(Some(sound_label(enabled)));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Survive (native) starting with seed {}", seed);
    log::info!("Rendering is web-only; running headless autopilot sessions");

    if let Err(e) = autopilot::run(seed, 5) {
        log::error!("Autopilot failed: {}", e);
        std::process::exit(1);
    }
}

/// Greedy headless player used by the native build
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::collections::HashMap;

    use glam::IVec2;

    use survive::persistence::MemoryStorage;
    use survive::platform::Key;
    use survive::sim::{GameEvent, GameState, MovementMode, Tile};
    use survive::{ConfigError, Game, SessionConfig, chebyshev};

    /// Simulated time between autopilot steps
    const STEP_MS: f64 = 120.0;
    const MAX_STEPS: u32 = 400;

    pub fn run(seed: u64, sessions: u32) -> Result<(), ConfigError> {
        let config = SessionConfig {
            movement: MovementMode::Discrete,
            ..Default::default()
        };
        let mut game = Game::new(config, seed, MemoryStorage::new())?;
        let mut now = 0.0;
        game.frame(now);

        for _ in 0..sessions {
            let mut visits: HashMap<IVec2, u32> = HashMap::new();
            let mut shots_fired = 0;
            let mut steps = 0;

            while game.state().is_playing() && steps < MAX_STEPS {
                *visits.entry(game.state().player.tile()).or_default() += 1;
                if let Some(key) = choose_key(game.state(), &visits) {
                    game.key_down(key);
                    game.key_up(key);
                }
                steps += 1;
                now += STEP_MS;
                shots_fired += game
                    .frame(now)
                    .iter()
                    .filter(|e| matches!(e, GameEvent::EnemyShoot { .. }))
                    .count();
            }

            let state = game.state();
            log::info!(
                "Session {}: {:?} after {} steps, {} shots fired, score {}",
                state.session,
                state.phase,
                steps,
                shots_fired,
                state.score.value
            );
            game.reset();
        }
        Ok(())
    }

    /// Walkable, trap-free neighbour closest to the goal, preferring tiles
    /// visited less often
    fn choose_key(state: &GameState, visits: &HashMap<IVec2, u32>) -> Option<Key> {
        let here = state.player.tile();
        Key::MOVEMENT
            .into_iter()
            .filter_map(|key| {
                let target = here + key.direction()?.delta();
                (state.grid.get(target) == Some(Tile::Empty)).then_some((key, target))
            })
            .min_by_key(|&(_, target)| {
                chebyshev(target, state.goal) * 4 + *visits.get(&target).unwrap_or(&0) as i32 * 3
            })
            .map(|(key, _)| key)
    }
}
