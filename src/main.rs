//! Retro Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use retro_racer::frame::{FrameLoop, FrameScheduler};
    use retro_racer::renderer::{RenderState, SceneOptions, build_frame};
    use retro_racer::sim::{Key, RaceObserver, SimConfig};
    use retro_racer::{
        GameMode, HighScores, RunState, Session, Settings, format_distance, format_speed,
        speed_gauge_percent,
    };

    /// DOM id prefix per seat
    const SEATS: [&str; 2] = ["p1", "p2"];

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Pushes one console's callbacks into its HUD panel
    struct HudObserver {
        seat: &'static str,
    }

    impl RaceObserver for HudObserver {
        fn score_changed(&mut self, score: f32) {
            set_text(&format!("{}-distance", self.seat), &format_distance(score));
        }

        fn speed_changed(&mut self, speed: f32) {
            set_text(&format!("{}-speed", self.seat), &format_speed(speed));
            let gauge = document().and_then(|d| d.get_element_by_id(&format!("{}-gauge", self.seat)));
            if let Some(el) = gauge {
                let style = format!("width: {:.0}%", speed_gauge_percent(speed));
                let _ = el.set_attribute("style", &style);
            }
        }

        fn passed(&mut self) {
            log::debug!("{} passed a car", self.seat);
        }

        fn crashed(&mut self) {
            set_hidden(&format!("{}-crash", self.seat), false);
        }

        fn pause_toggle_requested(&mut self) {
            log::debug!("{} asked for pause", self.seat);
        }
    }

    /// requestAnimationFrame behind the frame-loop seam
    struct RafScheduler;

    impl FrameScheduler for RafScheduler {
        type Handle = i32;

        fn request_frame(&mut self, callback: Box<dyn FnOnce(f64)>) -> i32 {
            let closure = Closure::once_into_js(move |time: f64| callback(time));
            match web_sys::window().map(|w| w.request_animation_frame(closure.unchecked_ref())) {
                Some(Ok(handle)) => handle,
                _ => {
                    log::warn!("requestAnimationFrame unavailable");
                    0
                }
            }
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    struct App {
        session: Session<HudObserver>,
        renderers: [Option<RenderState>; 2],
        /// Seat two only has a loop while a two-player run is up
        loops: [Option<FrameLoop<RafScheduler>>; 2],
        shown_state: Option<RunState>,
    }

    impl App {
        fn render_seat(&mut self, seat: usize) {
            let options = SceneOptions {
                speed_lines: self.session.settings().speed_lines,
            };
            let Some(render_state) = self.renderers[seat].as_mut() else {
                return;
            };
            let vertices = build_frame(self.session.console(seat).state(), options);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {e:?}"),
            }
        }

        /// Show the menus and banners that match the session
        fn sync_overlays(&mut self) {
            for (seat, id) in SEATS.iter().enumerate() {
                let crashed = self.session.console(seat).is_crashed();
                set_hidden(&format!("{id}-crash"), !crashed);
            }

            let state = self.session.run_state();
            if self.shown_state == Some(state) {
                return;
            }
            self.shown_state = Some(state);

            let multi = self.session.mode() == GameMode::Multi && state != RunState::Menu;
            set_hidden("seat-p2", !multi);
            set_hidden("menu", state != RunState::Menu);
            set_hidden("pause-menu", state != RunState::Paused);
            set_hidden("game-over", state != RunState::GameOver);

            if state == RunState::GameOver {
                let [p1, p2] = self.session.final_distances();
                set_text("final-distance", &format!("{p1:06}"));
                set_text("final-distance-p2", &format!("{p2:06}"));
                let best = self.session.high_scores().best();
                set_text("best-distance", &format!("{best:06}"));
                let winner = self.session.winner();
                if let Some(seat) = winner {
                    set_text("winner", &format!("WINNER: PLAYER {}", seat + 1));
                }
                let label = if winner.is_some() { "P1 DISTANCE" } else { "DISTANCE" };
                set_text("p1-result-label", label);
                set_hidden("best-row", winner.is_some());
                set_hidden("p2-result-row", winner.is_none());
                set_hidden("winner", winner.is_none());
            }
        }
    }

    fn schedule_seat(app: &Rc<RefCell<App>>, seat: usize) {
        let handle = app.clone();
        let mut a = app.borrow_mut();
        if let Some(frame_loop) = a.loops[seat].as_mut() {
            frame_loop.schedule(Box::new(move |now| seat_frame(handle, seat, now)));
        }
    }

    fn seat_frame(app: Rc<RefCell<App>>, seat: usize, now: f64) {
        {
            let mut a = app.borrow_mut();
            match a.loops[seat].as_mut() {
                Some(frame_loop) => frame_loop.fired(),
                // Torn down while this frame was in flight
                None => return,
            }
            a.session.console_frame(seat, now);
            a.render_seat(seat);
            a.sync_overlays();
        }
        schedule_seat(&app, seat);
    }

    fn start_run(app: &Rc<RefCell<App>>, mode: GameMode) {
        if !app.borrow_mut().session.start(mode) {
            return;
        }
        if mode == GameMode::Multi {
            app.borrow_mut().loops[1] = Some(FrameLoop::new(RafScheduler));
            schedule_seat(app, 1);
        }
        app.borrow_mut().sync_overlays();
    }

    fn back_to_menu(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if a.session.restart() {
            // Dropping the loop cancels its pending frame
            a.loops[1] = None;
            a.sync_overlays();
        }
    }

    fn canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("#{id} is not a canvas")))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Retro Racer starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        set_hidden("loading", true);

        let config = SimConfig::default();
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            config.clone(),
            settings,
            seed,
            HudObserver { seat: SEATS[0] },
            HudObserver { seat: SEATS[1] },
        )
        .map_err(js_err)?
        .with_high_scores(HighScores::load());

        let canvases = [canvas(&document, "canvas-p1")?, canvas(&document, "canvas-p2")?];
        let (width, height) = (config.field_width as u32, config.field_height as u32);
        for c in &canvases {
            c.set_width(width);
            c.set_height(height);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let mut surfaces = Vec::with_capacity(2);
        for c in &canvases {
            let surface = instance
                .create_surface(wgpu::SurfaceTarget::Canvas(c.clone()))
                .map_err(js_err)?;
            surfaces.push(surface);
        }

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surfaces.first(),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut renderers: [Option<RenderState>; 2] = [None, None];
        let field = (config.field_width, config.field_height);
        for (seat, surface) in surfaces.into_iter().enumerate() {
            match RenderState::new(surface, &adapter, width, height, field).await {
                Ok(render_state) => renderers[seat] = Some(render_state),
                Err(e) => log::error!("{} renderer unavailable: {e}", SEATS[seat]),
            }
        }

        let app = Rc::new(RefCell::new(App {
            session,
            renderers,
            loops: [Some(FrameLoop::new(RafScheduler)), None],
            shown_state: None,
        }));

        setup_keyboard(&app)?;
        for (seat, c) in canvases.iter().enumerate() {
            setup_touch(&app, seat, c)?;
        }
        setup_buttons(&app)?;
        setup_auto_pause(&app)?;

        app.borrow_mut().sync_overlays();
        schedule_seat(&app, 0);

        log::info!("Retro Racer running (seed {seed})");
        Ok(())
    }

    fn setup_keyboard(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                // Auto-repeat would toggle pause over and over
                if event.repeat() {
                    return;
                }
                let mut a = app.borrow_mut();
                a.session.key_down(key);
                a.sync_overlays();
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    app.borrow_mut().session.key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_touch(
        app: &Rc<RefCell<App>>,
        seat: usize,
        canvas: &HtmlCanvasElement,
    ) -> Result<(), JsValue> {
        for name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 {
                    return;
                }
                let mut a = app.borrow_mut();
                // Client pixels to field units
                let field_width = a.session.console(seat).state().config.field_width as f64;
                let x = (touch.client_x() as f64 - rect.left()) * field_width / rect.width();
                a.session.touch(seat, Some(x as f32));
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        for name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() == 0 {
                    app.borrow_mut().session.touch(seat, None);
                }
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(
        document: &Document,
        id: &str,
        app: &Rc<RefCell<App>>,
        action: fn(&Rc<RefCell<App>>),
    ) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("missing #{id}");
            return Ok(());
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| action(&app));
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        on_click(&document, "start-single-btn", app, |app| {
            start_run(app, GameMode::Single)
        })?;
        on_click(&document, "start-multi-btn", app, |app| {
            start_run(app, GameMode::Multi)
        })?;
        on_click(&document, "resume-btn", app, |app| {
            let mut a = app.borrow_mut();
            a.session.toggle_pause();
            a.sync_overlays();
        })?;
        on_click(&document, "restart-btn", app, back_to_menu)?;
        Ok(())
    }

    /// Pause when the window loses focus mid-run
    fn setup_auto_pause(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            if a.session.run_state() == RunState::Playing {
                a.session.toggle_pause();
                a.sync_overlays();
                log::info!("Auto-paused (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        web_sys::console::error_2(&JsValue::from_str("Retro Racer failed to start:"), &e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Headless run: an autopilot drives a single-player session until it crashes
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), retro_racer::ConfigError> {
    use retro_racer::consts::NOMINAL_TICK_MS;
    use retro_racer::sim::{Key, SimConfig};
    use retro_racer::{GameMode, HighScores, RunState, Session, Settings, format_distance};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Retro Racer (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed_cafe);
    let mut session = Session::new(
        SimConfig::default(),
        Settings::load(),
        seed,
        autopilot::PassCounter::default(),
        autopilot::PassCounter::default(),
    )?
    .with_high_scores(HighScores::load());

    session.start(GameMode::Single);
    session.key_down(Key::Up);

    let max_frames = 60 * 60 * 5;
    let mut frame = 0u64;
    while frame < max_frames && session.run_state() != RunState::GameOver {
        autopilot::steer(&mut session);
        session.frame(frame as f64 * NOMINAL_TICK_MS);
        frame += 1;
    }

    let console = session.console(0);
    log::info!(
        "run over after {frame} frames: distance {}, {} cars passed, crashed: {}",
        format_distance(console.state().score),
        console.observer().passes,
        console.is_crashed()
    );
    log::info!("best distance {:06}", session.high_scores().best());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use retro_racer::Session;
    use retro_racer::sim::{Key, RaceObserver, SimState};

    #[derive(Default)]
    pub struct PassCounter {
        pub passes: u32,
    }

    impl RaceObserver for PassCounter {
        fn passed(&mut self) {
            self.passes += 1;
            log::debug!("pass #{}", self.passes);
        }

        fn crashed(&mut self) {
            log::info!("autopilot crashed after {} passes", self.passes);
        }
    }

    /// Look-ahead cap so empty lanes compare equal
    const HORIZON: f32 = 2000.0;

    /// Distance from the player's nose to the nearest car ahead in `lane`
    fn headroom(state: &SimState, lane: u32) -> f32 {
        let config = &state.config;
        let player = &state.player;
        state
            .traffic
            .iter()
            .filter(|car| config.lane_at(car.pos.x + car.dim.width / 2.0) == lane)
            .filter(|car| car.pos.y < player.pos.y + player.dim.height)
            .map(|car| player.pos.y - (car.pos.y + car.dim.height))
            .fold(HORIZON, f32::min)
    }

    /// Hold left or right toward the lane with the most room ahead
    pub fn steer<O: RaceObserver>(session: &mut Session<O>) {
        let state = session.console(0).state();
        let config = &state.config;
        let current = config.lane_at(state.player.center().x);
        let target = (0..config.lane_count)
            .max_by(|&a, &b| {
                // Small bias to stay put when lanes are equally clear
                let score = |lane: u32| {
                    headroom(state, lane) + if lane == current { 50.0 } else { 0.0 }
                };
                score(a).total_cmp(&score(b))
            })
            .unwrap_or(current);

        let dx = config.lane_x(target) - state.player.pos.x;
        let (press, release) = if dx > 4.0 {
            (Some(Key::Right), Key::Left)
        } else if dx < -4.0 {
            (Some(Key::Left), Key::Right)
        } else {
            (None, Key::Left)
        };

        session.key_up(release);
        match press {
            Some(key) => session.key_down(key),
            None => session.key_up(Key::Right),
        }
    }
}
