//! Skyburst entry point
//!
//! In the browser this wires the page (canvas, events, animation frames) to
//! the show. Natively it runs the show headless for a fixed time and reports
//! what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_show {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use skyburst::audio::WebAudioSink;
    use skyburst::palette::Rgb;
    use skyburst::platform;
    use skyburst::renderer::{Canvas, RenderState, VertexCanvas};
    use skyburst::{RenderError, Settings, ShowApp};

    const CANVAS_ID: &str = "fireworks-canvas";
    /// Quiet period before a window resize is applied
    const RESIZE_DEBOUNCE_MS: i32 = 120;

    struct Runtime {
        app: ShowApp<WebAudioSink>,
        canvas: VertexCanvas,
        render_state: Option<RenderState>,
        html_canvas: HtmlCanvasElement,
        frame_request: Option<i32>,
        resize_timer: Option<i32>,
        stopped: bool,
    }

    thread_local! {
        /// Handle for the exported JS functions
        static RUNTIME: RefCell<Option<Rc<RefCell<Runtime>>>> = const { RefCell::new(None) };
    }

    fn with_runtime(f: impl FnOnce(&mut Runtime)) {
        RUNTIME.with(|slot| {
            if let Some(runtime) = slot.borrow().as_ref() {
                f(&mut runtime.borrow_mut());
            }
        });
    }

    impl Runtime {
        fn frame(&mut self, time: f64) {
            self.canvas.clear();
            self.app.frame(time, &mut self.canvas);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.canvas.vertices(), self.canvas.viewport()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn apply_resize(&mut self) {
            self.resize_timer = None;
            let Some(window) = web_sys::window() else {
                return;
            };
            let (viewport, (width, height)) = platform::fit_canvas(&window, &self.html_canvas);
            self.app.resize(viewport);
            self.canvas.set_viewport(viewport);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }

        fn apply_settings(&mut self, settings: Settings) {
            self.canvas
                .set_circle_segments(settings.quality.circle_segments());
            self.app.apply_settings(settings);
        }

        fn stop(&mut self) {
            self.stopped = true;
            if let (Some(id), Some(window)) = (self.frame_request.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            log::info!("Fireworks stopped");
        }
    }

    /// Queue one extra rocket for the next frame
    #[wasm_bindgen]
    pub fn launch_firework() {
        with_runtime(|rt| rt.app.launch());
    }

    /// Let audio start; call from inside a user gesture handler
    #[wasm_bindgen]
    pub fn notify_user_gesture() {
        with_runtime(|rt| rt.app.unlock_audio());
    }

    /// Replace the viewer settings with `json` and remember them
    ///
    /// Missing fields take their defaults; malformed JSON is logged and ignored.
    #[wasm_bindgen]
    pub fn apply_settings(json: &str) {
        match Settings::from_json(json) {
            Ok(settings) => with_runtime(|rt| rt.apply_settings(settings)),
            Err(e) => log::warn!("Ignoring settings: {}", e),
        }
    }

    /// Current viewer settings as JSON
    #[wasm_bindgen]
    pub fn current_settings() -> String {
        let mut json = String::new();
        with_runtime(|rt| {
            json = serde_json::to_string(rt.app.settings()).unwrap_or_default();
        });
        json
    }

    #[wasm_bindgen]
    pub fn stop_fireworks() {
        with_runtime(Runtime::stop);
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        background: Rgb,
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, background).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Skyburst starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let html_canvas = match platform::find_canvas(&document, CANVAS_ID) {
            Ok(canvas) => canvas,
            Err(e) => {
                log::warn!("{} - nothing to draw on", e);
                return;
            }
        };
        let (viewport, (width, height)) = platform::fit_canvas(&window, &html_canvas);

        let config = platform::page_config(&document);
        let settings = Settings::load();
        let segments = settings.quality.circle_segments();
        let background = config.background;
        let seed = js_sys::Date::now() as u64;

        let app = match ShowApp::new(
            config,
            settings,
            WebAudioSink::new(),
            viewport,
            platform::now_ms(&window),
            seed,
        ) {
            Ok(app) => app,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        log::info!("Show initialized with seed: {}", seed);

        let render_state = match init_gpu(&html_canvas, width, height, background).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::warn!("{} - drawing disabled", e);
                None
            }
        };

        let runtime = Rc::new(RefCell::new(Runtime {
            app,
            canvas: VertexCanvas::new(viewport, segments),
            render_state,
            html_canvas,
            frame_request: None,
            resize_timer: None,
            stopped: false,
        }));
        RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime.clone()));

        setup_gesture_unlock(&document);
        setup_resize(&window, runtime.clone());
        setup_visibility(&document, runtime.clone());

        // Start show loop
        request_animation_frame(runtime);

        log::info!("Skyburst running!");
    }

    /// Any of these counts as the user gesture browsers require for audio
    fn setup_gesture_unlock(document: &web_sys::Document) {
        for event in ["click", "keydown", "touchstart"] {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                notify_user_gesture();
            });
            let _ = document
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, runtime: Rc<RefCell<Runtime>>) {
        // One timer callback, rearmed on every resize event
        let apply = {
            let runtime = runtime.clone();
            Closure::<dyn FnMut()>::new(move || {
                runtime.borrow_mut().apply_resize();
            })
        };

        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut rt = runtime.borrow_mut();
            if let Some(handle) = rt.resize_timer.take() {
                window_clone.clear_timeout_with_handle(handle);
            }
            rt.resize_timer = window_clone
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    apply.as_ref().unchecked_ref(),
                    RESIZE_DEBOUNCE_MS,
                )
                .ok();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_visibility(document: &web_sys::Document, runtime: Rc<RefCell<Runtime>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = platform::is_hidden(&document_clone);
            runtime.borrow_mut().app.set_page_hidden(hidden);
            log::info!("Page {}", if hidden { "hidden" } else { "visible" });
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(runtime: Rc<RefCell<Runtime>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let rt = runtime.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(rt, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => runtime.borrow_mut().frame_request = Some(id),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame_loop(runtime: Rc<RefCell<Runtime>>, time: f64) {
        {
            let mut rt = runtime.borrow_mut();
            rt.frame_request = None;
            if rt.stopped {
                return;
            }
            rt.frame(time);
        }

        request_animation_frame(runtime);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_show::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use skyburst::audio::MemorySink;
    use skyburst::renderer::VertexCanvas;
    use skyburst::sim::Viewport;
    use skyburst::{ConfigError, Settings, ShowApp, ShowConfig};

    const FPS: f64 = 60.0;
    const SAMPLE_RATE: f32 = 44_100.0;
    const DEFAULT_SECONDS: f64 = 32.0;
    const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

    /// `skyburst [SECONDS] [CONFIG.json]`
    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), ConfigError> {
        let seconds = match args.next() {
            Some(arg) => arg
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .ok_or_else(|| {
                    ConfigError::invalid(format!("SECONDS must be a number, got '{arg}'"))
                })?,
            None => DEFAULT_SECONDS,
        };
        let config = match args.next() {
            Some(path) => ShowConfig::load(Path::new(&path))?,
            None => ShowConfig::default(),
        };

        let settings = Settings::default();
        let segments = settings.quality.circle_segments();
        let seed: u64 = rand::random();
        let mut app = ShowApp::new(
            config,
            settings,
            MemorySink::new(SAMPLE_RATE),
            VIEWPORT,
            0.0,
            seed,
        )?;
        app.unlock_audio();
        log::info!("Running {:.1} s of show headless (seed {})", seconds, seed);

        let mut canvas = VertexCanvas::new(VIEWPORT, segments);
        let mut peak_particles = 0;
        let mut peak_vertices = 0;
        let frames = (seconds * FPS) as u64;
        for frame in 0..frames {
            canvas.clear();
            app.frame(frame as f64 * 1000.0 / FPS, &mut canvas);
            peak_particles = peak_particles.max(app.show().particle_count());
            peak_vertices = peak_vertices.max(canvas.vertices().len());
        }

        let stats = app.show().stats();
        log::info!(
            "{} frames: {} rockets, {} shells, {} detonations, {} explosions heard",
            stats.frames,
            stats.rockets_launched,
            stats.shells_launched,
            stats.detonations,
            app.audio().sink().explosions()
        );
        log::info!(
            "Peak {} live particles, {} vertices per frame",
            peak_particles,
            peak_vertices
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Skyburst (native) starting...");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
