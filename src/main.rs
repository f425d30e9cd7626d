//! TEDx Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use tedx_runner::leaderboard::{DEFAULT_LEADERBOARD_SIZE, Leaderboard};
    use tedx_runner::persistence::{MemoryStore, ProfileCache};
    use tedx_runner::platform::{FrameClock, KeyPhase, SwipeTracker, command_for_key, now_ms};
    use tedx_runner::renderer::{CanvasRenderer, build_scene};
    use tedx_runner::security::{Shortcut, TamperSignal};
    use tedx_runner::sim::{Command, Field, GamePhase};
    use tedx_runner::{Game, GameObserver, GameOverReport, Settings, Tuning, format_score};

    /// Outer/inner window size gap that suggests docked devtools
    const DEVTOOLS_GAP_PX: f64 = 160.0;
    /// Frames between devtools checks (~1s)
    const DEVTOOLS_CHECK_FRAMES: u64 = 60;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Updates the DOM HUD from game notifications
    struct DomObserver {
        last_score: Option<u32>,
    }

    impl GameObserver for DomObserver {
        fn score_changed(&mut self, score: u32) {
            if self.last_score != Some(score) {
                set_text("score", &format_score(score));
                self.last_score = Some(score);
            }
        }

        fn game_over(&mut self, report: &GameOverReport) {
            set_text("final-score", &report.final_score.to_string());
            set_text("modal-high-score", &report.high_score.to_string());
            set_text("high-score", &format_score(report.high_score));
            set_visible("new-record", report.is_new_record);
            match report.rejection {
                Some(reason) => set_text("game-over-note", &format!("Score not saved: {reason}")),
                None if !report.synced => set_text("game-over-note", "Saved offline"),
                None => set_text("game-over-note", ""),
            }
            set_visible("game-over", true);
        }

        fn paused(&mut self, paused: bool) {
            set_visible("pause-menu", paused);
        }
    }

    /// Browser host state
    struct Host {
        game: Game,
        renderer: CanvasRenderer,
        clock: FrameClock,
        swipe: SwipeTracker,
        settings: Settings,
        /// Stand-in for the remote document store
        store: MemoryStore,
        observer: DomObserver,
        frames: u64,
    }

    impl Host {
        fn push(&mut self, command: Command) {
            match command {
                Command::Jump => self.game.jump(),
                Command::Duck(engage) => self.game.duck(engage),
                Command::TogglePause => self.game.toggle_pause(),
                Command::Pause => self.game.pause(),
            }
        }

        fn restart(&mut self) {
            set_visible("game-over", false);
            set_visible("pause-menu", false);
            self.clock.reset();
            self.game.start();
        }

        fn check_devtools(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let gap = |outer: Result<JsValue, JsValue>, inner: Result<JsValue, JsValue>| {
                let outer = outer.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let inner = inner.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                outer - inner
            };
            let width_gap = gap(window.outer_width(), window.inner_width());
            let height_gap = gap(window.outer_height(), window.inner_height());
            if width_gap > DEVTOOLS_GAP_PX || height_gap > DEVTOOLS_GAP_PX {
                self.game.observe_tamper(TamperSignal::DevtoolsOpen);
            }
        }

        fn update(&mut self, time: f64) {
            for _ in 0..self.clock.advance(time) {
                if let Some(score) = self.game.frame(&mut self.observer) {
                    self.game
                        .finish_run(score, &mut self.store, now_ms(), &mut self.observer);
                }
            }

            self.frames += 1;
            if self.frames % DEVTOOLS_CHECK_FRAMES == 0 {
                self.check_devtools();
            }
        }

        fn render(&self) {
            let cmds = build_scene(&self.game.snapshot(self.settings.dark_mode));
            if let Err(e) = self.renderer.render(&cmds) {
                log::warn!("Render error: {e:?}");
            }
        }

        fn show_leaderboard(&self) {
            let Some(document) = document() else {
                return;
            };
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            if let Err(e) = fill_leaderboard(&document, &list, &self.store) {
                log::warn!("Failed to build leaderboard: {e:?}");
            }
            set_visible("leaderboard", true);
        }

        /// Forget the signed-in player; the next sign-in starts a new session
        fn logout(&mut self) {
            self.game.cache.clear();
            self.game.session.reset();
            set_text("high-score", &format_score(0));
            log::info!("Logged out");
            self.restart();
        }
    }

    /// Rebuild the leaderboard list. Names are user-chosen, so every cell is
    /// set as text.
    fn fill_leaderboard(
        document: &Document,
        list: &Element,
        store: &MemoryStore,
    ) -> Result<(), JsValue> {
        list.set_text_content(None);

        let message = |class: &str, text: &str| -> Result<(), JsValue> {
            let p = document.create_element("p")?;
            p.set_class_name(class);
            p.set_text_content(Some(text));
            list.append_child(&p)?;
            Ok(())
        };

        match store.top_scores(DEFAULT_LEADERBOARD_SIZE) {
            Ok(entries) if entries.is_empty() => message("empty", "No scores yet")?,
            Ok(entries) => {
                const CELL_CLASSES: [&str; 4] = ["rank", "name", "details", "leaderboard-score"];
                for (i, entry) in entries.iter().enumerate() {
                    let row = document.create_element("div")?;
                    row.set_class_name("leaderboard-item");
                    for (class, text) in CELL_CLASSES.iter().zip(entry.cells(i + 1)) {
                        let cell = document.create_element("span")?;
                        cell.set_class_name(class);
                        cell.set_text_content(Some(&text));
                        row.append_child(&cell)?;
                    }
                    list.append_child(&row)?;
                }
            }
            Err(e) => {
                log::warn!("Leaderboard unavailable: {e}");
                message("error", "Leaderboard unavailable")?;
            }
        }
        Ok(())
    }

    /// Balance overrides embedded in the page as `<script id="tuning" type="application/json">`
    fn page_tuning(document: &Document) -> Tuning {
        let json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content());
        Tuning::from_json_or_default(json.as_deref())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("TEDx Runner starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let cache = ProfileCache::load();
        let mut store = MemoryStore::new();
        if let Some(record) = cache.record.clone() {
            store.register(record);
        }

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(
            seed,
            Field::new(width as f32, height as f32),
            page_tuning(&document),
            cache,
        );
        game.apply_settings(&settings);
        if game.cache.user_id().is_some() {
            game.begin_session(now_ms());
        }
        set_text("high-score", &format_score(game.high_score()));
        apply_theme(settings.dark_mode);

        log::info!("Game initialized with seed: {seed}");

        let host = Rc::new(RefCell::new(Host {
            game,
            renderer: CanvasRenderer::new(&canvas)?,
            clock: FrameClock::new(),
            swipe: SwipeTracker::new(),
            settings,
            store,
            observer: DomObserver { last_score: None },
            frames: 0,
        }));

        setup_keyboard(host.clone())?;
        setup_touch(&canvas, host.clone())?;
        setup_buttons(host.clone());
        setup_resize(&canvas, host.clone())?;
        setup_auto_pause(host.clone())?;

        host.borrow_mut().game.start();
        request_animation_frame(host);

        log::info!("TEDx Runner running!");
        Ok(())
    }

    fn apply_theme(dark_mode: bool) {
        if let Some(body) = document().and_then(|d| d.body()) {
            body.set_class_name(if dark_mode { "dark-mode" } else { "" });
        }
    }

    fn setup_keyboard(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut h = host.borrow_mut();

                let ctrl_or_meta = event.ctrl_key() || event.meta_key();
                if let Some(shortcut) = Shortcut::from_key(&key, ctrl_or_meta, event.shift_key()) {
                    event.prevent_default();
                    if let Some(warning) = shortcut.warning() {
                        log::warn!("{warning}");
                    }
                    h.game
                        .observe_tamper(TamperSignal::BlockedShortcut(shortcut));
                    return;
                }

                if let Some(command) = command_for_key(&key, KeyPhase::Down) {
                    event.prevent_default();
                    h.push(command);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(command) = command_for_key(&event.key(), KeyPhase::Up) {
                    event.prevent_default();
                    host.borrow_mut().push(command);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_touch(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        // Touch start
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    host.borrow_mut().swipe.touch_start(touch.client_y() as f32);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut h = host.borrow_mut();
                    if let Some(command) = h.swipe.touch_move(touch.client_y() as f32) {
                        h.push(command);
                    }
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut h = host.borrow_mut();
                    for command in h.swipe.touch_end(touch.client_y() as f32) {
                        h.push(command);
                    }
                }
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(id: &str, host: Rc<RefCell<Host>>, action: fn(&mut Host)) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut host.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(host: Rc<RefCell<Host>>) {
        on_click("restart-btn", host.clone(), Host::restart);
        on_click("resume-btn", host.clone(), |h| h.game.toggle_pause());
        on_click("leaderboard-btn", host.clone(), |h| h.show_leaderboard());
        on_click("close-leaderboard-btn", host.clone(), |_| {
            set_visible("leaderboard", false)
        });
        on_click("logout-btn", host.clone(), Host::logout);
        on_click("dark-mode-toggle", host, |h| {
            let dark = h.settings.toggle_dark_mode();
            h.settings.save();
            apply_theme(dark);
        });
    }

    fn setup_resize(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let width = canvas.client_width().max(1) as u32;
            let height = canvas.client_height().max(1) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            host.borrow_mut().game.resize(width as f32, height as f32);
            log::debug!("Resized to {width}x{height}");
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut h = host.borrow_mut();
                    if h.game.phase() == GamePhase::Running {
                        h.game.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
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
                let mut h = host.borrow_mut();
                if h.game.phase() == GamePhase::Running {
                    h.game.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            h.update(time);
            h.render();
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tedx_runner::leaderboard::{DEFAULT_LEADERBOARD_SIZE, Leaderboard};
    use tedx_runner::persistence::{MemoryStore, ProfileCache, UserRecord};
    use tedx_runner::platform::now_ms;
    use tedx_runner::sim::Field;
    use tedx_runner::{Game, GameObserver, GameOverReport, Tuning, format_score};

    /// Stop a demo run after this many ticks (~5 minutes at 60 Hz)
    const MAX_DEMO_TICKS: u64 = 60 * 60 * 5;

    struct LogObserver;

    impl GameObserver for LogObserver {
        fn score_changed(&mut self, score: u32) {
            if score > 0 && score % 100 == 0 {
                log::debug!("Score {}", format_score(score));
            }
        }

        fn game_over(&mut self, report: &GameOverReport) {
            log::info!(
                "Final score {} (high {}, new record: {}, synced: {})",
                format_score(report.final_score),
                format_score(report.high_score),
                report.is_new_record,
                report.synced
            );
            if let Some(reason) = report.rejection {
                log::warn!("Score rejected: {reason}");
            }
        }
    }

    /// Run seeded autopilot games against an in-memory store
    pub fn run(seed: u64, runs: u32, tuning: Tuning) {
        let mut store = MemoryStore::new();
        let rivals = [("r1", "Priya", "BE", "Computer", 240), ("r2", "Omar", "TE", "IT", 120)];
        for (uid, name, class, department, high_score) in rivals {
            let mut record = UserRecord::new(uid, name, class, department);
            record.high_score = high_score;
            store.register(record);
        }
        let player = UserRecord::new("demo", "Autopilot", "FE", "Mechanical");
        store.register(player.clone());

        let mut game = Game::new(
            seed,
            Field::new(1280.0, 720.0),
            tuning,
            ProfileCache::new(player),
        );
        game.autopilot = true;
        game.begin_session(now_ms());
        let mut observer = LogObserver;

        for run in 1..=runs {
            game.start();
            let mut ticks = 0;
            let final_score = loop {
                if let Some(score) = game.frame(&mut observer) {
                    break score;
                }
                ticks += 1;
                if ticks >= MAX_DEMO_TICKS {
                    log::info!("Run {run} hit the tick limit");
                    break game.score();
                }
            };
            log::info!("Run {run} ended after {ticks} ticks");
            game.finish_run(final_score, &mut store, now_ms(), &mut observer);
        }

        match store.top_scores(DEFAULT_LEADERBOARD_SIZE) {
            Ok(entries) => {
                log::info!("Leaderboard:");
                for (rank, entry) in entries.iter().enumerate() {
                    log::info!(
                        "{:>2}. {:<12} {:<18} {}",
                        rank + 1,
                        entry.display_name,
                        entry.details(),
                        format_score(entry.score)
                    );
                }
            }
            Err(e) => log::error!("Leaderboard unavailable: {e}"),
        }

        let info = game.session_info(now_ms());
        log::info!(
            "Session: {} accepted scores, valid: {}",
            info.score_updates,
            info.is_valid
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("TEDx Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use `trunk serve` to play");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);
    let runs = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    // Optional path to a tuning JSON file
    let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Cannot read tuning file {path}: {e}");
            None
        }
    });
    let tuning = tedx_runner::Tuning::from_json_or_default(tuning_json.as_deref());

    log::info!("Seed {seed}, {runs} runs");
    headless::run(seed, runs, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
