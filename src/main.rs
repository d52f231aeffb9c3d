//! Bubble Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop. The web
//! build drives a canvas; the native build runs a headless auto-play demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use bubble_pop::Game;
    use bubble_pop::audio::WebAudio;
    use bubble_pop::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use bubble_pop::renderer::CanvasSurface;
    use bubble_pop::sim::GamePhase;

    type WebGame = Game<Box<dyn KeyValueStore>, WebAudio>;

    struct App {
        game: WebGame,
        surface: CanvasSurface,
    }

    impl App {
        /// Click/tap: starts a game from the title or game-over screen, pops otherwise
        fn press(&mut self, x: f32, y: f32) {
            match self.game.phase() {
                GamePhase::Ready | GamePhase::GameOver => self.game.start(),
                _ => {
                    self.game.handle_pointer_down(x, y);
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let size = self.surface.fit_to_client();
            self.game.resize(size.x, size.y);
            self.game.tick(time);
            self.game.render(&mut self.surface);
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.game.phase() == GamePhase::Running {
                self.game.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{} - progress will not be saved", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bubble Pop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let mut surface = CanvasSurface::new(canvas.clone())?;
        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(open_store(), WebAudio::new(), seed);
        let size = surface.fit_to_client();
        game.resize(size.x, size.y);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App { game, surface }));

        setup_input_handlers(&canvas, app.clone())?;
        setup_auto_pause(app.clone())?;
        request_animation_frame(app);

        log::info!("Bubble Pop running!");
        Ok(())
    }

    fn touch_position(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Mouse down - pop or start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .press(event.offset_x() as f32, event.offset_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move - hover
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .game
                    .handle_pointer_move(event.offset_x() as f32, event.offset_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start - same as a click
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_position(&canvas_clone, &event) {
                    app.borrow_mut().press(x, y);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key == " " {
                    // Keep Space from scrolling the page
                    event.prevent_default();
                }
                app.borrow_mut().game.handle_key_down(&key);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use bubble_pop::audio::NullAudio;
    use bubble_pop::consts::FRAME_MS;
    use bubble_pop::persistence::{FileStore, KeyValueStore, MemoryStore};
    use bubble_pop::sim::{GameEvent, GamePhase};
    use bubble_pop::{Difficulty, Game};

    /// Headless demo options
    struct Options {
        seed: u64,
        frames: u32,
        difficulty: Option<Difficulty>,
        data_dir: Option<String>,
        /// Frames between auto-clicks
        click_every: u32,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                seed: 42,
                frames: 60 * 120,
                difficulty: None,
                data_dir: None,
                click_every: 20,
            }
        }
    }

    fn parse_args() -> Options {
        let mut opts = Options::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let value = args.next();
            match (arg.as_str(), value) {
                ("--seed", Some(v)) => opts.seed = v.parse().unwrap_or(opts.seed),
                ("--frames", Some(v)) => opts.frames = v.parse().unwrap_or(opts.frames),
                ("--click-every", Some(v)) => {
                    opts.click_every = v.parse().unwrap_or(opts.click_every).max(1)
                }
                ("--difficulty", Some(v)) => {
                    opts.difficulty = Difficulty::from_str(&v);
                    if opts.difficulty.is_none() {
                        log::warn!("Unknown difficulty {:?}, keeping saved setting", v);
                    }
                }
                ("--data-dir", Some(v)) => opts.data_dir = Some(v),
                (other, _) => log::warn!("Ignoring argument {:?}", other),
            }
        }
        opts
    }

    fn open_store(dir: Option<&str>) -> Box<dyn KeyValueStore> {
        match dir.map(FileStore::open) {
            Some(Ok(store)) => Box::new(store),
            Some(Err(e)) => {
                log::warn!("{} - progress will not be saved", e);
                Box::new(MemoryStore::new())
            }
            None => Box::new(MemoryStore::new()),
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Bubble Pop (native) starting headless demo...");

        let opts = parse_args();
        let mut game = Game::new(open_store(opts.data_dir.as_deref()), NullAudio, opts.seed);
        if let Some(difficulty) = opts.difficulty {
            let settings = bubble_pop::Settings {
                difficulty,
                ..game.settings().clone()
            };
            game.update_settings(settings);
        }
        game.start();

        let mut time = 0.0f64;
        let mut pops = 0u32;
        for frame in 0..opts.frames {
            time += FRAME_MS as f64;
            if !game.tick(time) {
                break;
            }

            // Auto-clicker: go for the bubble closest to escaping
            if frame % opts.click_every == 0 {
                let target = game
                    .state()
                    .bubbles
                    .iter()
                    .filter(|b| b.is_active())
                    .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|b| b.pos);
                if let Some(pos) = target {
                    if game.handle_pointer_down(pos.x, pos.y) {
                        pops += 1;
                    }
                }
            }

            for event in game.drain_events() {
                match event {
                    GameEvent::LevelUp { level } => log::info!("Reached level {}", level),
                    GameEvent::LifeLost { lives } => log::info!("Life lost, {} left", lives),
                    _ => {}
                }
            }
        }

        let state = game.state();
        let outcome = if state.phase == GamePhase::GameOver {
            "game over"
        } else {
            "time up"
        };
        println!(
            "{}: score {}, level {}, lives {}, {} pops, {} bubbles left, best ever {}",
            outcome,
            state.score,
            state.level,
            state.lives,
            pops,
            state.active_bubbles(),
            game.profile().stats.best_score
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
